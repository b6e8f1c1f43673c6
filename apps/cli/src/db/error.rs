//! Database error types.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum DbError {
    #[error("sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("verse not found: {0}")]
    VerseNotFound(i64),

    #[error("invalid data: {0}")]
    InvalidData(String),
}
