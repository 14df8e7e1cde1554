use bifilar_math::Triangle;

use crate::error::Result;

/// An append-only destination for triangles.
///
/// Implementors accept triangles one at a time and never expose previously
/// written ones for mutation.
pub trait TriangleSink {
    /// Append one triangle.
    fn write_triangle(&mut self, tri: &Triangle) -> Result<()>;
}

impl<S: TriangleSink + ?Sized> TriangleSink for &mut S {
    fn write_triangle(&mut self, tri: &Triangle) -> Result<()> {
        (**self).write_triangle(tri)
    }
}
