use std::io;

use thiserror::Error;

/// Failures surfaced by the note cache and its callers.
///
/// `Io` and `InvalidFilename` abort the whole operation (a single bad file
/// fails an entire rebuild); the rest are recoverable request-level
/// outcomes for the CLI and HTTP layers.
#[derive(Debug, Error)]
pub enum NoteError {
    #[error("io error: {0}")]
    Io(#[from] io::Error),

    #[error("invalid note filename: {0}")]
    InvalidFilename(String),

    #[error("note not found: {0}")]
    NotFound(String),

    #[error("content is empty")]
    EmptyContent,

    #[error("notes directory is in read-only mode")]
    ReadOnly,
}
