//! Verse reader application: SQLite storage plus the commands behind the
//! `dhammapada` binary.

pub mod commands;
pub mod config;
pub mod db;
pub mod render;
pub mod state;

pub use config::Config;
pub use db::SqliteRepository;
pub use state::AppState;
