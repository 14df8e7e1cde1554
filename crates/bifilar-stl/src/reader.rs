//! Binary STL reader.

use std::fs::File;
use std::io::{BufReader, ErrorKind, Read};
use std::path::Path;

use bifilar_math::{Point3, Triangle, Vec3};

use crate::error::{Result, StlError};
use crate::{HEADER_SIZE, RECORD_SIZE};

/// Load every triangle from a binary STL file.
pub fn load_stl<P: AsRef<Path>>(path: P) -> Result<Vec<Triangle>> {
    let file = File::open(path)?;
    read_stl(BufReader::new(file))
}

/// Decode a binary STL stream.
///
/// Stored normals are kept as written rather than recomputed. Trailing
/// bytes after the declared records are ignored.
pub fn read_stl<R: Read>(mut reader: R) -> Result<Vec<Triangle>> {
    let mut preamble = Vec::with_capacity(HEADER_SIZE + 4);
    (&mut reader)
        .take((HEADER_SIZE + 4) as u64)
        .read_to_end(&mut preamble)?;
    if preamble.len() < HEADER_SIZE + 4 {
        return Err(StlError::InvalidHeader {
            got: preamble.len(),
        });
    }

    let expected = u32::from_le_bytes([
        preamble[HEADER_SIZE],
        preamble[HEADER_SIZE + 1],
        preamble[HEADER_SIZE + 2],
        preamble[HEADER_SIZE + 3],
    ]);

    // The declared count is untrusted until the records are actually read.
    let mut triangles = Vec::with_capacity((expected as usize).min(1 << 16));
    let mut rec = [0u8; RECORD_SIZE];
    for got in 0..expected {
        match reader.read_exact(&mut rec) {
            Ok(()) => {}
            Err(e) if e.kind() == ErrorKind::UnexpectedEof => {
                return Err(StlError::Truncated { expected, got });
            }
            Err(e) => return Err(e.into()),
        }
        triangles.push(Triangle {
            normal: read_vec(&rec[0..12]),
            vertices: [
                Point3::from(read_vec(&rec[12..24])),
                Point3::from(read_vec(&rec[24..36])),
                Point3::from(read_vec(&rec[36..48])),
            ],
        });
    }
    Ok(triangles)
}

fn read_vec(buf: &[u8]) -> Vec3 {
    let f = |i: usize| f64::from(f32::from_le_bytes([buf[i], buf[i + 1], buf[i + 2], buf[i + 3]]));
    Vec3::new(f(0), f(4), f(8))
}
