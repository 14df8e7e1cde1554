//! Error types for the README updater.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while refreshing example READMEs.
#[derive(Error, Debug)]
pub enum DocsError {
    /// Reading or writing a file failed.
    #[error("{path}: {source}")]
    Io {
        /// File or directory being accessed.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },

    /// A `##` section does not start with the name of an `.irmf` file.
    #[error("section {section} of {dir}/README.md does not name an .irmf file")]
    MissingIrmfReference {
        /// Example directory.
        dir: String,
        /// One-based `##` section number.
        section: usize,
    },

    /// A section names an `.irmf` file that is not in the directory.
    #[error("could not find file {name}, path={dir:?}")]
    UnknownIrmf {
        /// Example directory.
        dir: String,
        /// File name taken from the section heading.
        name: String,
    },

    /// A section has no fenced glsl block to replace.
    #[error("unable to find ```glsl...``` in the {name} section of {dir}/README.md")]
    MissingGlslBlock {
        /// Example directory.
        dir: String,
        /// File name taken from the section heading.
        name: String,
    },

    /// The section splitting pattern failed to compile.
    #[error(transparent)]
    Pattern(#[from] regex::Error),
}

impl DocsError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

/// Result type for README updates.
pub type Result<T> = std::result::Result<T, DocsError>;
