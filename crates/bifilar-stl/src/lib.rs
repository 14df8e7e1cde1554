#![warn(missing_docs)]

//! Triangle sinks and binary STL encoding.
//!
//! The coil builder never holds a whole mesh in memory. It pushes each
//! triangle into a [`TriangleSink`], which is either a streaming
//! [`StlWriter`] backed by a file or an in-memory [`MeshBuffer`] used for
//! inspection and tests.
//!
//! # Binary layout
//!
//! ```text
//! UINT8[80]    header, space padded
//! UINT32       triangle count
//! foreach triangle
//!     REAL32[3] normal
//!     REAL32[3] vertex 1
//!     REAL32[3] vertex 2
//!     REAL32[3] vertex 3
//!     UINT16    attribute byte count (0)
//! ```

mod buffer;
mod error;
mod reader;
mod sink;
mod writer;

pub use buffer::{Bounds, MeshBuffer, MeshStats};
pub use error::{Result, StlError};
pub use reader::{load_stl, read_stl};
pub use sink::TriangleSink;
pub use writer::StlWriter;

/// Size of the binary STL header in bytes.
pub const HEADER_SIZE: usize = 80;

/// Size of one binary STL triangle record in bytes.
pub const RECORD_SIZE: usize = 50;
