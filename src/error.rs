//! Crate-wide error types.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Card not found: {0}")]
    CardNotFound(String),

    #[error("Unrecognized review outcome: {0:?}")]
    UnknownOutcome(String),

    #[error("Ease factor must be finite, got {0}")]
    InvalidEaseFactor(f64),

    #[error("Could not determine the user data directory")]
    DataDirUnavailable,

    #[error("Card store lock poisoned")]
    StorePoisoned,

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

// Lets an IPC shell that reports string errors use `?` on our results.
impl From<Error> for String {
    fn from(err: Error) -> Self {
        err.to_string()
    }
}

/// Result type alias for all fallible operations in this crate.
pub type Result<T> = std::result::Result<T, Error>;
