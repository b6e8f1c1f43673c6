//! Commands exposed to the command-line front end.

pub mod settings;
pub mod stats;
pub mod verse;
pub mod writing;

pub use settings::{get_settings, update_settings};
pub use stats::{get_stats, next_reminder, ReminderResponse, StatsResponse};
pub use verse::{
    get_verse, list_verses, next_verse, previous_verse, seed_initial_data, set_bookmark,
    share_text, toggle_bookmark, CommandError, SeedResult,
};
pub use writing::{
    finish_writing, score_text, start_writing, submit_writing, ScoreResponse, WritingResponse,
};
