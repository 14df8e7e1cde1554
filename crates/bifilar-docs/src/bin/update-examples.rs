//! update-examples - refresh the shader copies in example READMEs

use std::path::PathBuf;

use anyhow::{Context, Result};
use bifilar_docs::update_examples;
use clap::Parser;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "update-examples")]
#[command(
    about = "Update README.md files with minimal versions of each .irmf shader",
    long_about = None
)]
struct Cli {
    /// Directory to walk
    #[arg(long, default_value = "examples")]
    root: PathBuf,
    /// Report what would change without writing
    #[arg(long)]
    dry_run: bool,
    /// Show per-directory scan results
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        let filter = EnvFilter::default().add_directive(LevelFilter::WARN.into());
        match format!("bifilar_docs={level}").parse() {
            Ok(directive) => filter.add_directive(directive),
            Err(_) => filter,
        }
    });
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let updates = update_examples(&cli.root, cli.dry_run)
        .with_context(|| format!("updating READMEs under {}", cli.root.display()))?;
    let changed = updates.iter().filter(|u| u.changed).count();
    let verb = if cli.dry_run { "would change" } else { "changed" };
    println!("{} README files, {changed} {verb}", updates.len());
    Ok(())
}
