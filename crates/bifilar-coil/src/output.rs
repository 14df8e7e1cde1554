//! Writing a coil to a pair of STL files.

use std::path::{Path, PathBuf};

use bifilar_stl::StlWriter;
use tracing::info;

use crate::builder::{build, BuildReport};
use crate::error::Result;
use crate::params::CoilParams;

/// Path of the dielectric file that accompanies `path`.
///
/// A trailing `.stl` is replaced by `-dielectric.stl`; any other name just
/// gains the suffix.
pub fn dielectric_path_for(path: &Path) -> PathBuf {
    let name = path.file_name().map(|n| n.to_string_lossy().into_owned()).unwrap_or_default();
    let stem = name.strip_suffix(".stl").unwrap_or(&name);
    path.with_file_name(format!("{stem}-dielectric.stl"))
}

/// Build the coil and write the conductor to `path` and the dielectric to
/// [`dielectric_path_for`]`(path)`.
///
/// Parameters are validated before either file is created.
pub fn write_coil_stl(params: &CoilParams, path: &Path) -> Result<BuildReport> {
    params.validate()?;
    let diel_path = dielectric_path_for(path);
    let mut conductor = StlWriter::create(path)?;
    let mut dielectric = StlWriter::create(&diel_path)?;

    let report = build(params, &mut conductor, &mut dielectric)?;

    let (metal_records, diel_records) = (conductor.triangle_count(), dielectric.triangle_count());
    conductor.finish()?;
    dielectric.finish()?;
    info!(
        conductor = %path.display(),
        conductor_triangles = metal_records,
        dielectric = %diel_path.display(),
        dielectric_triangles = diel_records,
        "wrote STL files"
    );
    Ok(report)
}
