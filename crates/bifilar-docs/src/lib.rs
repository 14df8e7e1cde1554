#![warn(missing_docs)]

//! README maintenance for the IRMF examples tree.
//!
//! GitHub READMEs cannot include files, so each example README carries a
//! copy of its shader. [`update_examples`] walks the tree, trims the JSON
//! header of every `.irmf` file and rewrites the `##` sections of each
//! README so they show the current shader, an editor link and the list of
//! voxel slices next to it.

pub mod error;
pub mod irmf;
pub mod readme;
pub mod scan;

use std::fs;
use std::path::PathBuf;

use tracing::info;

pub use error::{DocsError, Result};
pub use irmf::strip_metadata;
pub use readme::rewrite_readme;
pub use scan::{scan, ExampleDir};

/// Outcome for one README.
#[derive(Debug, Clone, PartialEq)]
pub struct ReadmeUpdate {
    /// Path of the README.
    pub path: PathBuf,
    /// Size before the rewrite, in bytes.
    pub before: usize,
    /// Size after the rewrite, in bytes.
    pub after: usize,
    /// Whether the text changed.
    pub changed: bool,
}

/// Rewrite every README under `root`. With `dry_run` nothing is written.
pub fn update_examples(root: &std::path::Path, dry_run: bool) -> Result<Vec<ReadmeUpdate>> {
    let mut updates = Vec::new();
    for dir in scan(root)? {
        let Some(readme) = &dir.readme else {
            continue;
        };
        info!(
            dir = %dir.label,
            irmf = dir.irmfs.len(),
            stl = dir.stl_sizes.len(),
            cbddlp = dir.dlp_sizes.len(),
            "processing README.md"
        );
        let text = rewrite_readme(&dir, readme)?;
        let path = dir.path.join("README.md");
        let update = ReadmeUpdate {
            changed: text != *readme,
            before: readme.len(),
            after: text.len(),
            path,
        };
        if dry_run {
            info!(
                path = %update.path.display(),
                before = update.before,
                after = update.after,
                changed = update.changed,
                "dry run, not written"
            );
        } else if update.changed {
            fs::write(&update.path, &text).map_err(|e| DocsError::io(&update.path, e))?;
        }
        updates.push(update);
    }
    Ok(updates)
}
