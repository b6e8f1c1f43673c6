//! Error types for dhammapada-core.

use thiserror::Error;

/// Result type alias using ParseError.
pub type Result<T> = std::result::Result<T, ParseError>;

/// Errors that can occur while parsing seed data.
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("invalid seed data: {0}")]
    Json(#[from] serde_json::Error),

    #[error("missing title in entry {index}")]
    MissingTitle { index: usize },

    #[error("missing body in entry {index}")]
    MissingBody { index: usize },
}
