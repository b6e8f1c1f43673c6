//! Runtime configuration.

use std::path::PathBuf;

/// Environment variable overriding the database location.
pub const DB_PATH_ENV: &str = "DHAMMAPADA_DB";
/// Environment variable pointing at a seed file to use instead of the bundled one.
pub const SEED_FILE_ENV: &str = "DHAMMAPADA_SEED_FILE";

#[derive(Debug, Clone)]
pub struct Config {
    pub db_path: PathBuf,
    /// Seed file used instead of the bundled verses.
    pub seed_file: Option<PathBuf>,
}

impl Config {
    /// Build from an explicit path, falling back to the environment and
    /// then the platform data directory. `.env` must already be loaded.
    pub fn from_env(db_path: Option<PathBuf>) -> Self {
        let db_path = db_path
            .or_else(|| std::env::var_os(DB_PATH_ENV).map(PathBuf::from))
            .unwrap_or_else(default_db_path);
        let seed_file = std::env::var_os(SEED_FILE_ENV).map(PathBuf::from);

        Self { db_path, seed_file }
    }
}

/// `<data dir>/dhammapada/dhammapada.db`, or the current directory when
/// the platform has no data directory.
pub fn default_db_path() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("dhammapada")
        .join("dhammapada.db")
}
