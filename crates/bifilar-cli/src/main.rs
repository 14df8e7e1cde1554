//! aprbfem - bifilar electromagnet mesh generator
//!
//! Writes the conductor and dielectric solids of a bifilar coil as a pair
//! of binary STL files, and inspects existing STL files.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use bifilar_coil::{dielectric_path_for, write_coil_stl, CoilParams};
use bifilar_stl::{load_stl, MeshBuffer};
use clap::{Parser, Subcommand};
use tracing::warn;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::EnvFilter;

mod config;

use config::ParamArgs;

/// Crates whose logs are shown at `info` by default.
const WORKSPACE_TARGETS: [&str; 3] = ["aprbfem", "bifilar_coil", "bifilar_stl"];

#[derive(Parser)]
#[command(name = "aprbfem")]
#[command(about = "Bifilar electromagnet mesh generator", long_about = None)]
#[command(version)]
struct Cli {
    /// Show derived dimensions and per-pair progress
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate the conductor and dielectric STL files
    Generate {
        /// Conductor output file; the dielectric goes next to it as <name>-dielectric.stl
        #[arg(long, default_value = "aprbfem.stl")]
        out: PathBuf,
        /// Print the build report as JSON
        #[arg(long)]
        json: bool,
        #[command(flatten)]
        params: ParamArgs,
    },
    /// Display triangle count, bounds and open edges of a binary STL file
    Inspect {
        /// Path to the .stl file
        file: PathBuf,
        /// Print the statistics as JSON
        #[arg(long)]
        json: bool,
    },
    /// Print the effective coil parameters as TOML
    Params {
        #[command(flatten)]
        params: ParamArgs,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Commands::Generate { out, json, params } => {
            let params = params.resolve()?;
            generate(&params, &out, json)?;
        }
        Commands::Inspect { file, json } => {
            inspect(&file, json)?;
        }
        Commands::Params { params } => {
            let params = params.resolve()?;
            if let Err(e) = params.validate() {
                warn!("these parameters cannot be built: {e}");
            }
            print!("{}", toml::to_string(&params)?);
        }
    }

    Ok(())
}

fn init_tracing(verbose: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| default_filter(verbose));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn default_filter(verbose: bool) -> EnvFilter {
    let level = if verbose { "debug" } else { "info" };
    WORKSPACE_TARGETS.iter().fold(
        EnvFilter::default().add_directive(LevelFilter::WARN.into()),
        |filter, target| match format!("{target}={level}").parse() {
            Ok(directive) => filter.add_directive(directive),
            Err(_) => filter,
        },
    )
}

fn generate(params: &CoilParams, out: &Path, json: bool) -> Result<()> {
    let report =
        write_coil_stl(params, out).with_context(|| format!("generating {}", out.display()))?;

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    println!(
        "Wrote {} ({} triangles)",
        out.display(),
        report.conductor_triangles
    );
    println!(
        "Wrote {} ({} triangles)",
        dielectric_path_for(out).display(),
        report.dielectric_triangles
    );
    if let Some(clearance) = report.clearance {
        println!("  Coil 2/3 connector clearance: {clearance:.4} mm");
    }
    Ok(())
}

fn inspect(file: &Path, json: bool) -> Result<()> {
    let triangles = load_stl(file).with_context(|| format!("reading {}", file.display()))?;
    let stats = MeshBuffer::from(triangles).stats();

    if json {
        println!("{}", serde_json::to_string_pretty(&stats)?);
        return Ok(());
    }

    println!("STL file: {}", file.display());
    println!("  Triangles: {}", stats.triangles);
    println!("  Degenerate: {}", stats.degenerate);
    println!("  Surface area: {:.3} mm²", stats.area);
    println!("  Open edges: {}", stats.open_edges);
    if let Some(b) = stats.bounds {
        let [sx, sy, sz] = b.size();
        println!(
            "  Bounds: [{:.3}, {:.3}, {:.3}] .. [{:.3}, {:.3}, {:.3}]",
            b.min[0], b.min[1], b.min[2], b.max[0], b.max[1], b.max[2]
        );
        println!("  Size: {sx:.3} x {sy:.3} x {sz:.3} mm");
    }
    Ok(())
}
