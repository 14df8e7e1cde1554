//! Collecting READMEs, shaders and model sizes from an examples tree.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::{DocsError, Result};
use crate::irmf::strip_metadata;

/// Everything the README updater needs from one directory.
#[derive(Debug, Clone, Default)]
pub struct ExampleDir {
    /// Location on disk.
    pub path: PathBuf,
    /// Directory as walked from the root with `/` separators, used in
    /// editor links.
    pub label: String,
    /// Contents of `README.md`, if present.
    pub readme: Option<String>,
    /// `.irmf` file name to shader with a trimmed header.
    pub irmfs: BTreeMap<String, String>,
    /// `.stl` file name to size in bytes.
    pub stl_sizes: BTreeMap<String, u64>,
    /// `.cbddlp` file name to size in bytes.
    pub dlp_sizes: BTreeMap<String, u64>,
}

/// Walk `root` recursively and gather one [`ExampleDir`] per directory,
/// in sorted path order.
pub fn scan(root: &Path) -> Result<Vec<ExampleDir>> {
    let label = root.to_string_lossy().replace('\\', "/");
    let label = label.trim_end_matches('/').to_string();
    let mut out = Vec::new();
    visit(root, label, &mut out)?;
    Ok(out)
}

fn visit(path: &Path, label: String, out: &mut Vec<ExampleDir>) -> Result<()> {
    let mut entries = fs::read_dir(path)
        .map_err(|e| DocsError::io(path, e))?
        .collect::<std::io::Result<Vec<_>>>()
        .map_err(|e| DocsError::io(path, e))?;
    entries.sort_by_key(|e| e.file_name());

    let mut dir = ExampleDir {
        path: path.to_path_buf(),
        label,
        ..Default::default()
    };
    let mut subdirs = Vec::new();

    for entry in entries {
        let entry_path = entry.path();
        let meta = entry.metadata().map_err(|e| DocsError::io(&entry_path, e))?;
        let name = entry.file_name().to_string_lossy().into_owned();
        if meta.is_dir() {
            subdirs.push((entry_path, name));
        } else if name == "README.md" {
            dir.readme = Some(read(&entry_path)?);
        } else if name.ends_with(".stl") {
            dir.stl_sizes.insert(name, meta.len());
        } else if name.ends_with(".cbddlp") {
            dir.dlp_sizes.insert(name, meta.len());
        } else if name.ends_with(".irmf") {
            let shader = strip_metadata(&read(&entry_path)?);
            dir.irmfs.insert(name, shader);
        }
    }

    debug!(
        dir = %dir.label,
        irmf = dir.irmfs.len(),
        stl = dir.stl_sizes.len(),
        cbddlp = dir.dlp_sizes.len(),
        "scanned"
    );
    let label = dir.label.clone();
    out.push(dir);
    for (sub, name) in subdirs {
        visit(&sub, format!("{label}/{name}"), out)?;
    }
    Ok(())
}

fn read(path: &Path) -> Result<String> {
    fs::read_to_string(path).map_err(|e| DocsError::io(path, e))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scan_collects_files_per_directory() {
        let root = tempfile::tempdir().unwrap();
        let coil = root.path().join("012-coil");
        fs::create_dir(&coil).unwrap();
        fs::write(coil.join("README.md"), "# Coil\n").unwrap();
        let shader = "/*{\n  \"units\": \"mm\",\n  \"author\": \"x\"\n}*/\nvoid f() {}\n";
        fs::write(coil.join("coil.irmf"), shader).unwrap();
        fs::write(coil.join("coil.stl"), [0u8; 84]).unwrap();
        fs::write(coil.join("coil-mat01.cbddlp"), [0u8; 10]).unwrap();
        fs::write(coil.join("notes.txt"), "ignored").unwrap();

        let dirs = scan(root.path()).unwrap();
        assert_eq!(dirs.len(), 2);
        assert!(dirs[0].readme.is_none());

        let ex = &dirs[1];
        assert!(ex.label.ends_with("/012-coil"));
        assert_eq!(ex.readme.as_deref(), Some("# Coil\n"));
        assert_eq!(ex.irmfs["coil.irmf"], "/*{\n  units: \"mm\",\n}*/\nvoid f() {}\n");
        assert_eq!(ex.stl_sizes["coil.stl"], 84);
        assert_eq!(ex.dlp_sizes["coil-mat01.cbddlp"], 10);
    }

    #[test]
    fn test_scan_missing_root_is_io_error() {
        let err = scan(Path::new("/nonexistent/examples")).unwrap_err();
        assert!(matches!(err, DocsError::Io { .. }));
    }
}
