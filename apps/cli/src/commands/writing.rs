//! Type-along writing commands.

use crate::db::{DbError, SettingsRepository, VerseRepository};
use crate::state::AppState;
use dhammapada_core::accuracy::{compute_accuracy, compute_display_split, split_for_display};
use dhammapada_core::session::{Milestone, WritingSession};
use dhammapada_core::types::Verse;
use tracing::info;

use super::verse::CommandError;

/// Score of typed text against a reference.
#[derive(Debug, serde::Serialize)]
pub struct ScoreResponse {
    pub accuracy: f64,
    /// Character index into the reference.
    pub split: usize,
    pub typed_portion: String,
    pub remaining_portion: String,
}

/// Outcome of a writing session.
#[derive(Debug, serde::Serialize)]
pub struct WritingResponse {
    pub verse_id: i64,
    pub accuracy: f64,
    pub split: usize,
    pub char_count: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub milestone: Option<Milestone>,
    pub threshold_met: bool,
    /// Whether this copy was stored as the verse's first completed copy.
    pub saved: bool,
}

/// Score typed text against a reference without touching the database.
pub fn score_text(reference: &str, typed: &str) -> ScoreResponse {
    let parts = split_for_display(reference, typed);
    ScoreResponse {
        accuracy: compute_accuracy(reference, typed),
        split: compute_display_split(reference, typed),
        typed_portion: parts.typed.to_string(),
        remaining_portion: parts.remaining.to_string(),
    }
}

/// Open a writing session for a verse.
///
/// Fails when writing is turned off in settings. With `resume` the session
/// starts from the text saved for the verse earlier.
pub fn start_writing(
    state: &AppState,
    id: i64,
    resume: bool,
) -> Result<(Verse, WritingSession), CommandError> {
    let repo = &state.repository;

    if !repo.get_settings()?.use_writing {
        return Err(CommandError::new(
            "writing is turned off; enable it with `settings --writing true`",
        ));
    }

    let verse = repo.get_verse(id)?.ok_or(DbError::VerseNotFound(id))?;
    let session = match verse.my_content.as_deref() {
        Some(previous) if resume => WritingSession::resume(verse.content.clone(), previous),
        _ => WritingSession::new(verse.content.clone()),
    };
    Ok((verse, session))
}

/// Close a session, storing the typed text if the completion threshold
/// was met. Returns whether anything was stored.
pub fn finish_writing(
    state: &AppState,
    id: i64,
    session: WritingSession,
) -> Result<bool, CommandError> {
    let Some(done) = session.finish() else {
        return Ok(false);
    };

    let saved = state.repository.save_writing(id, &done.typed, done.accuracy)?;
    if saved {
        info!(verse_id = id, accuracy = done.accuracy, "saved written copy");
    }
    Ok(saved)
}

/// Score a complete typed copy of a verse in one step.
pub fn submit_writing(
    state: &AppState,
    id: i64,
    typed: &str,
) -> Result<WritingResponse, CommandError> {
    let (_, mut session) = start_writing(state, id, false)?;
    let update = session.update(typed);
    let milestone = session.milestone_reached();
    let saved = finish_writing(state, id, session)?;

    Ok(WritingResponse {
        verse_id: id,
        accuracy: update.accuracy,
        split: update.split,
        char_count: update.char_count,
        milestone,
        threshold_met: update.threshold_met,
        saved,
    })
}
