//! Application state.

use crate::config::Config;
use crate::db::{DbError, SqliteRepository};

/// Handles shared by every command. Built once in `main` and passed
/// explicitly to each command.
pub struct AppState {
    pub repository: SqliteRepository,
    pub config: Config,
}

impl AppState {
    pub fn new(repository: SqliteRepository, config: Config) -> Self {
        Self { repository, config }
    }

    /// Create the database directory if needed and open the repository.
    pub fn open(config: Config) -> Result<Self, DbError> {
        if let Some(parent) = config.db_path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let repository = SqliteRepository::open(&config.db_path)?;
        Ok(Self::new(repository, config))
    }
}
