//! Error types for remix operations.
//!
//! Rendering is total and never fails; only the generation collaborator
//! calls and document I/O produce these errors.

use thiserror::Error;

/// Errors that can occur while generating, regenerating, or loading content.
#[derive(Error, Debug)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[cfg(feature = "serde")]
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The generation collaborator reported a failure.
    #[error("{0}")]
    Generation(String),

    /// The collaborator answered but produced no image bytes.
    #[error("No image was returned for {0}")]
    EmptyImage(String),

    /// A generation request failed validation before being sent.
    #[error("{0}")]
    InvalidRequest(String),
}

impl Error {
    /// Build a generation failure from any displayable message.
    pub fn generation(message: impl Into<String>) -> Self {
        Error::Generation(message.into())
    }
}

pub type Result<T> = std::result::Result<T, Error>;
