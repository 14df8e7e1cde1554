//! Error types for STL encoding and decoding.

use thiserror::Error;

/// Errors that can occur while writing or reading STL data.
#[derive(Error, Debug)]
pub enum StlError {
    /// I/O error from the underlying file or stream.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The stream ended before the 84-byte preamble was complete.
    #[error("invalid STL header: expected 84 bytes, got {got}")]
    InvalidHeader {
        /// Bytes actually available.
        got: usize,
    },

    /// Fewer triangle records than the header declares.
    #[error("truncated STL: header declares {expected} triangles, found {got}")]
    Truncated {
        /// Declared triangle count.
        expected: u32,
        /// Complete records read.
        got: u32,
    },

    /// Binary STL stores the triangle count as a `u32`.
    #[error("too many triangles for binary STL")]
    TooManyTriangles,
}

/// Result type for STL operations.
pub type Result<T> = std::result::Result<T, StlError>;
