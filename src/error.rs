//! Error types.
//!
//! Everything that can go wrong because of *data* (a missing file, a malformed
//! ASE export, a GL allocation failure, a bad config file) is reported through
//! [`MeshError`]. Misuse of the API, such as uploading a mesh without
//! positions, is not an error value: it panics.

use std::path::PathBuf;

use thiserror::Error;

/// Recoverable failures of the mesh pipeline.
#[derive(Error, Debug)]
pub enum MeshError {
    #[error("failed to read '{}': {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("tag '{tag}' not found after byte {offset}")]
    TagNotFound { tag: String, offset: usize },
    #[error("unexpected end of input at byte {offset}")]
    UnexpectedEof { offset: usize },
    #[error("expected {expected} at byte {offset}, found '{token}'")]
    InvalidToken {
        expected: &'static str,
        token: String,
        offset: usize,
    },
    #[error("invalid {what}: {value}")]
    InvalidCount { what: &'static str, value: i64 },
    #[error("{what} index {index} out of range (len {len})")]
    IndexOutOfRange {
        what: &'static str,
        index: i64,
        len: usize,
    },
    #[error("{attribute} array has {len} entries, expected 0 or {expected}")]
    AttributeLength {
        attribute: &'static str,
        len: usize,
        expected: usize,
    },
    #[error("device error: {0}")]
    Device(String),
    #[error("invalid config: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, MeshError>;
