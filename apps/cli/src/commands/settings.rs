//! Settings commands.

use crate::db::SettingsRepository;
use crate::state::AppState;
use dhammapada_core::types::{AppSettings, SettingsPatch};
use tracing::info;

use super::verse::CommandError;

/// Get reader preferences.
pub fn get_settings(state: &AppState) -> Result<AppSettings, CommandError> {
    state.repository.get_settings().map_err(Into::into)
}

/// Apply a partial update and return the resulting preferences.
pub fn update_settings(state: &AppState, patch: SettingsPatch) -> Result<AppSettings, CommandError> {
    let repo = &state.repository;
    let current = repo.get_settings()?;
    if patch.is_empty() {
        return Ok(current);
    }

    let updated = patch.apply(&current);
    repo.save_settings(&updated)?;
    info!(?updated, "settings saved");
    Ok(updated)
}
