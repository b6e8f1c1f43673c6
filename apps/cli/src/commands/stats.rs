//! Statistics and reminder commands.

use crate::db::date_utils::{next_reminder as next_local_reminder, REMINDER_HOUR, REMINDER_MINUTE};
use crate::db::{ReadingRepository, ReadingStats, StatsRepository};
use crate::state::AppState;

use super::verse::CommandError;

/// Reading statistics plus install time.
#[derive(Debug, serde::Serialize)]
pub struct StatsResponse {
    #[serde(flatten)]
    pub stats: ReadingStats,
    pub installed_at: String,
}

#[derive(Debug, serde::Serialize)]
pub struct ReminderResponse {
    pub next_at: String,
    pub hour: u32,
    pub minute: u32,
}

/// Get reading statistics.
pub fn get_stats(state: &AppState) -> Result<StatsResponse, CommandError> {
    let repo = &state.repository;
    Ok(StatsResponse {
        stats: repo.get_stats()?,
        installed_at: repo.installed_at()?.to_rfc3339(),
    })
}

/// When the daily reading reminder fires next.
pub fn next_reminder() -> Result<ReminderResponse, CommandError> {
    let next_at = next_local_reminder()
        .ok_or_else(|| CommandError::new("no valid local time for the daily reminder"))?;
    Ok(ReminderResponse {
        next_at: next_at.to_rfc3339(),
        hour: REMINDER_HOUR,
        minute: REMINDER_MINUTE,
    })
}
