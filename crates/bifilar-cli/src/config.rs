//! Coil parameters from defaults, an optional TOML file and flags.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use bifilar_coil::CoilParams;
use clap::Args;

/// Coil dimension flags. Each one overrides the value read from `--config`.
#[derive(Debug, Default, Args)]
pub struct ParamArgs {
    /// TOML file with coil parameters
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,
    /// Gap between metal and dielectric (or support material)
    #[arg(long = "diel_gap", value_name = "MM")]
    pub diel_gap: Option<f64>,
    /// Padding between metal and outer edge of dielectric (or support material)
    #[arg(long = "diel_pad", value_name = "MM")]
    pub diel_pad: Option<f64>,
    /// Inner radius in millimeters
    #[arg(long = "inner_radius", value_name = "MM")]
    pub inner_radius: Option<f64>,
    /// Length of two external leads
    #[arg(long = "lead_len", value_name = "MM")]
    pub lead_len: Option<f64>,
    /// Number of divisions per rotation
    #[arg(long = "num_divs")]
    pub num_divs: Option<usize>,
    /// Number of coil pairs
    #[arg(long = "num_pairs")]
    pub num_pairs: Option<usize>,
    /// Total number of turns per coil
    #[arg(long = "num_turns")]
    pub num_turns: Option<usize>,
    /// Gap between wires in millimeters
    #[arg(long = "wire_gap", value_name = "MM")]
    pub wire_gap: Option<f64>,
    /// Width of (square) wire in millimeters
    #[arg(long = "wire_size", value_name = "MM")]
    pub wire_size: Option<f64>,
}

impl ParamArgs {
    /// Effective parameters: defaults, then the config file, then flags.
    pub fn resolve(&self) -> Result<CoilParams> {
        let mut params = match &self.config {
            Some(path) => load_params(path)?,
            None => CoilParams::default(),
        };
        self.apply(&mut params);
        Ok(params)
    }

    fn apply(&self, params: &mut CoilParams) {
        let lengths = [
            (self.diel_gap, &mut params.diel_gap),
            (self.diel_pad, &mut params.diel_pad),
            (self.inner_radius, &mut params.inner_radius),
            (self.lead_len, &mut params.lead_len),
            (self.wire_gap, &mut params.wire_gap),
            (self.wire_size, &mut params.wire_size),
        ];
        for (flag, field) in lengths {
            if let Some(v) = flag {
                *field = v;
            }
        }
        let counts = [
            (self.num_divs, &mut params.num_divs),
            (self.num_pairs, &mut params.num_pairs),
            (self.num_turns, &mut params.num_turns),
        ];
        for (flag, field) in counts {
            if let Some(v) = flag {
                *field = v;
            }
        }
    }
}

/// Load coil parameters from a TOML file. Missing keys take their defaults.
pub fn load_params(path: &Path) -> Result<CoilParams> {
    let content =
        std::fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    let params = toml::from_str(&content).with_context(|| format!("parsing {}", path.display()))?;
    Ok(params)
}
