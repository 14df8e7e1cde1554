//! Streaming binary STL writer.

use std::fs::File;
use std::io::{BufWriter, Seek, SeekFrom, Write};
use std::path::Path;

use bifilar_math::{Point3, Triangle, Vec3};

use crate::error::{Result, StlError};
use crate::sink::TriangleSink;
use crate::HEADER_SIZE;

const HEADER_TEXT: &[u8] = b"Binary STL generated by bifilar-stl";

/// Writes triangles to a binary STL stream as they arrive.
///
/// The triangle count is unknown until the end, so a zero placeholder is
/// written up front and patched by [`StlWriter::finish`]. Dropping a writer
/// without finishing leaves a file that declares zero triangles.
pub struct StlWriter<W: Write + Seek> {
    inner: W,
    count: u32,
}

impl StlWriter<BufWriter<File>> {
    /// Create (or truncate) the file at `path` and write the preamble.
    pub fn create<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::create(path)?;
        Self::new(BufWriter::new(file))
    }
}

impl<W: Write + Seek> StlWriter<W> {
    /// Wrap a seekable stream and write the preamble.
    pub fn new(mut inner: W) -> Result<Self> {
        let mut header = [b' '; HEADER_SIZE];
        header[..HEADER_TEXT.len()].copy_from_slice(HEADER_TEXT);
        inner.write_all(&header)?;
        inner.write_all(&0u32.to_le_bytes())?;
        Ok(Self { inner, count: 0 })
    }

    /// Number of triangles written so far.
    pub fn triangle_count(&self) -> u32 {
        self.count
    }

    /// Patch the triangle count, flush, and hand back the stream.
    pub fn finish(mut self) -> Result<W> {
        self.inner.seek(SeekFrom::Start(HEADER_SIZE as u64))?;
        self.inner.write_all(&self.count.to_le_bytes())?;
        self.inner.seek(SeekFrom::End(0))?;
        self.inner.flush()?;
        Ok(self.inner)
    }
}

impl<W: Write + Seek> TriangleSink for StlWriter<W> {
    fn write_triangle(&mut self, tri: &Triangle) -> Result<()> {
        let count = self.count.checked_add(1).ok_or(StlError::TooManyTriangles)?;
        write_vec(&mut self.inner, &tri.normal)?;
        for v in &tri.vertices {
            write_point(&mut self.inner, v)?;
        }
        self.inner.write_all(&0u16.to_le_bytes())?;
        self.count = count;
        Ok(())
    }
}

#[allow(clippy::cast_possible_truncation)]
fn write_vec<W: Write>(w: &mut W, v: &Vec3) -> Result<()> {
    w.write_all(&(v.x as f32).to_le_bytes())?;
    w.write_all(&(v.y as f32).to_le_bytes())?;
    w.write_all(&(v.z as f32).to_le_bytes())?;
    Ok(())
}

fn write_point<W: Write>(w: &mut W, p: &Point3) -> Result<()> {
    write_vec(w, &p.coords)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{read_stl, RECORD_SIZE};
    use std::io::Cursor;

    fn unit_triangle() -> Triangle {
        Triangle::new(
            Point3::origin(),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(0.0, 1.0, 0.0),
        )
    }

    #[test]
    fn test_empty_writer_is_valid_stl() {
        let writer = StlWriter::new(Cursor::new(Vec::new())).unwrap();
        let bytes = writer.finish().unwrap().into_inner();
        assert_eq!(bytes.len(), HEADER_SIZE + 4);
        assert!(bytes.starts_with(HEADER_TEXT));
        assert_eq!(bytes[HEADER_TEXT.len()], b' ');
        assert_eq!(&bytes[HEADER_SIZE..], &[0, 0, 0, 0]);
    }

    #[test]
    fn test_count_is_patched_on_finish() {
        let mut writer = StlWriter::new(Cursor::new(Vec::new())).unwrap();
        for _ in 0..3 {
            writer.write_triangle(&unit_triangle()).unwrap();
        }
        assert_eq!(writer.triangle_count(), 3);
        let bytes = writer.finish().unwrap().into_inner();
        assert_eq!(bytes.len(), HEADER_SIZE + 4 + 3 * RECORD_SIZE);
        assert_eq!(&bytes[HEADER_SIZE..HEADER_SIZE + 4], &3u32.to_le_bytes());
    }

    #[test]
    fn test_record_layout() {
        let mut writer = StlWriter::new(Cursor::new(Vec::new())).unwrap();
        writer.write_triangle(&unit_triangle()).unwrap();
        let bytes = writer.finish().unwrap().into_inner();
        let rec = &bytes[HEADER_SIZE + 4..];
        let f = |i: usize| f32::from_le_bytes([rec[i], rec[i + 1], rec[i + 2], rec[i + 3]]);
        // normal +Z
        assert_eq!((f(0), f(4), f(8)), (0.0, 0.0, 1.0));
        // second vertex (1, 0, 0)
        assert_eq!((f(24), f(28), f(32)), (1.0, 0.0, 0.0));
        assert_eq!(&rec[48..50], &[0, 0]);
    }

    #[test]
    fn test_create_writes_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("one.stl");
        let mut writer = StlWriter::create(&path).unwrap();
        writer.write_triangle(&unit_triangle()).unwrap();
        writer.finish().unwrap();

        let bytes = std::fs::read(&path).unwrap();
        let tris = read_stl(&bytes[..]).unwrap();
        assert_eq!(tris.len(), 1);
        assert_eq!(tris[0].vertices[2], Point3::new(0.0, 1.0, 0.0));
    }
}
