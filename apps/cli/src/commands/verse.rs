//! Verse reading, browsing and bookmark commands.

use crate::db::{DbError, ReadingRepository, VerseRepository};
use crate::state::AppState;
use dhammapada_core::parser;
use dhammapada_core::types::{ListFilter, Verse, DEFAULT_CATEGORY};
use std::borrow::Cow;
use std::fs;
use std::path::Path;
use thiserror::Error;
use tracing::{debug, info, warn};

/// Verses shipped with the application.
pub const BUNDLED_SEED: &str = include_str!("../../data/dhammapada_data.json");

#[derive(Debug, serde::Serialize)]
pub struct SeedResult {
    pub inserted: usize,
    /// True when seeding was skipped because it already happened.
    pub skipped: bool,
}

#[derive(Debug, Error, serde::Serialize, serde::Deserialize)]
#[error("{message}")]
pub struct CommandError {
    pub message: String,
}

impl CommandError {
    pub fn new(message: impl Into<String>) -> Self {
        Self { message: message.into() }
    }
}

impl From<DbError> for CommandError {
    fn from(e: DbError) -> Self {
        Self { message: e.to_string() }
    }
}

impl From<dhammapada_core::ParseError> for CommandError {
    fn from(e: dhammapada_core::ParseError) -> Self {
        Self { message: e.to_string() }
    }
}

impl From<std::io::Error> for CommandError {
    fn from(e: std::io::Error) -> Self {
        Self { message: e.to_string() }
    }
}

/// Load the initial verses, once.
///
/// `file` overrides the configured seed file, which overrides the bundled
/// verses. Once seeded, no seed file is read again unless `force` is set,
/// in which case the verses are inserted again.
pub fn seed_initial_data(
    state: &AppState,
    file: Option<&Path>,
    force: bool,
) -> Result<SeedResult, CommandError> {
    let repo = &state.repository;

    let already_seeded = repo.is_seeded()?;
    if already_seeded {
        if !force {
            debug!("seed data already present");
            return Ok(SeedResult {
                inserted: 0,
                skipped: true,
            });
        }
        warn!("forced seeding; verses are inserted again alongside existing ones");
    }

    let content: Cow<'_, str> = match file.or(state.config.seed_file.as_deref()) {
        Some(path) => Cow::Owned(fs::read_to_string(path).map_err(|e| {
            CommandError::new(format!("cannot read {}: {}", path.display(), e))
        })?),
        None => Cow::Borrowed(BUNDLED_SEED),
    };
    let raw_verses = parser::parse(&content)?;

    let ids = if already_seeded {
        repo.insert_verses(DEFAULT_CATEGORY, &raw_verses)?
    } else {
        repo.seed_verses(DEFAULT_CATEGORY, &raw_verses)?
    };
    info!(inserted = ids.len(), "seeded verses");

    Ok(SeedResult {
        inserted: ids.len(),
        skipped: false,
    })
}

/// Show the verse after the last one read, wrapping to the first.
pub fn next_verse(state: &AppState) -> Result<Option<Verse>, CommandError> {
    let repo = &state.repository;
    let read_index = repo.get_read_index()?;

    let verse = match repo.get_next_verse(read_index)? {
        Some(verse) => Some(verse),
        None => repo.get_next_verse(0)?,
    };
    load_verse(state, verse)
}

/// Show the verse before the last one read, wrapping to the last.
pub fn previous_verse(state: &AppState) -> Result<Option<Verse>, CommandError> {
    let repo = &state.repository;
    let read_index = repo.get_read_index()?;

    let verse = match repo.get_previous_verse(read_index)? {
        Some(verse) => Some(verse),
        None => repo.get_last_verse()?,
    };
    load_verse(state, verse)
}

/// Record a read and move the reading position to the verse.
fn load_verse(state: &AppState, verse: Option<Verse>) -> Result<Option<Verse>, CommandError> {
    let Some(verse) = verse else {
        return Ok(None);
    };

    let repo = &state.repository;
    repo.mark_read(verse.id)?;
    repo.set_read_index(verse.id)?;
    debug!(verse_id = verse.id, "moved reading position");

    Ok(repo.get_verse(verse.id)?)
}

/// Get a single verse by ID.
pub fn get_verse(state: &AppState, id: i64) -> Result<Verse, CommandError> {
    state
        .repository
        .get_verse(id)?
        .ok_or_else(|| DbError::VerseNotFound(id).into())
}

/// List verses, optionally searching title and content first.
pub fn list_verses(
    state: &AppState,
    query: Option<&str>,
    filter: ListFilter,
    bookmarked_only: bool,
) -> Result<Vec<Verse>, CommandError> {
    let repo = &state.repository;
    debug!(?query, %filter, bookmarked_only, "listing verses");

    let verses = match query.map(str::trim).filter(|q| !q.is_empty()) {
        Some(query) => repo.search_verses(query)?,
        None => repo.list_verses()?,
    };

    Ok(verses
        .into_iter()
        .filter(|verse| filter.matches(verse))
        .filter(|verse| !bookmarked_only || verse.bookmarked)
        .collect())
}

/// Set the bookmark flag.
pub fn set_bookmark(state: &AppState, id: i64, bookmarked: bool) -> Result<bool, CommandError> {
    state.repository.set_bookmark(id, bookmarked)?;
    Ok(bookmarked)
}

/// Flip the bookmark flag, returning the new value.
pub fn toggle_bookmark(state: &AppState, id: i64) -> Result<bool, CommandError> {
    let verse = get_verse(state, id)?;
    set_bookmark(state, id, !verse.bookmarked)
}

/// Text for sharing a verse elsewhere.
pub fn share_text(state: &AppState, id: i64) -> Result<String, CommandError> {
    Ok(get_verse(state, id)?.share_text())
}
