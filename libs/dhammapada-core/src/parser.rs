//! Seed data parser.
//!
//! # Format
//! ```json
//! [
//!   { "title": "Twin Verses 1", "body": "All that we are is the result of what we have thought.", "url": "" },
//!   { "title": "Twin Verses 2", "body": "..." }
//! ]
//! ```
//! `url` is optional.

use crate::error::{ParseError, Result};
use crate::types::RawVerse;

/// Parse seed JSON into raw verses.
pub fn parse(content: &str) -> Result<Vec<RawVerse>> {
    if content.trim().is_empty() {
        return Ok(vec![]);
    }

    let entries: Vec<RawVerse> = serde_json::from_str(content)?;

    entries
        .into_iter()
        .enumerate()
        .map(|(index, entry)| {
            let title = entry.title.trim();
            let body = entry.body.trim();
            if title.is_empty() {
                return Err(ParseError::MissingTitle { index });
            }
            if body.is_empty() {
                return Err(ParseError::MissingBody { index });
            }
            Ok(RawVerse {
                title: title.to_string(),
                body: body.to_string(),
                url: entry.url.trim().to_string(),
            })
        })
        .collect()
}
