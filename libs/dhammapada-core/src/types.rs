//! Core types for the verse reader.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Category assigned to verses loaded from the bundled seed file.
pub const DEFAULT_CATEGORY: &str = "법구경";

/// Whether a verse has been shown to the reader yet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReadStatus {
    Unread,
    Read,
}

impl Default for ReadStatus {
    fn default() -> Self {
        Self::Unread
    }
}

impl ReadStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Unread => "unread",
            Self::Read => "read",
        }
    }

    /// Parse from the stored string, treating anything unknown as unread.
    pub fn from_db(s: &str) -> Self {
        match s {
            "read" => Self::Read,
            _ => Self::Unread,
        }
    }
}

/// A single verse record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Verse {
    pub id: i64,
    pub category: String,
    pub title: String,
    pub content: String,
    /// Text the reader typed while copying the verse.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub my_content: Option<String>,
    pub created_at: DateTime<Utc>,
    pub reg_date: DateTime<Utc>,
    /// First time the verse was copied past the completion threshold.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub write_date: Option<DateTime<Utc>>,
    pub url: String,
    pub read_count: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub read_time: Option<DateTime<Utc>>,
    pub bookmarked: bool,
    pub status: ReadStatus,
    pub accuracy: f64,
}

impl Verse {
    pub fn is_written(&self) -> bool {
        self.write_date.is_some()
    }

    /// Plain-text form used when sharing a verse.
    pub fn share_text(&self) -> String {
        format!("\u{1F64F} {}\n{}", self.title, self.content)
    }
}

/// Verse parsed from a seed file, before it has an ID.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawVerse {
    pub title: String,
    pub body: String,
    #[serde(default)]
    pub url: String,
}

/// Which verses the list view shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ListFilter {
    /// Verses never copied past the completion threshold.
    Unwritten,
    Written,
    All,
}

impl Default for ListFilter {
    fn default() -> Self {
        Self::Unwritten
    }
}

impl ListFilter {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Unwritten => "unwritten",
            Self::Written => "written",
            Self::All => "all",
        }
    }

    pub fn matches(&self, verse: &Verse) -> bool {
        match self {
            Self::Unwritten => !verse.is_written(),
            Self::Written => verse.is_written(),
            Self::All => true,
        }
    }
}

impl FromStr for ListFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "unwritten" => Ok(Self::Unwritten),
            "written" => Ok(Self::Written),
            "all" => Ok(Self::All),
            other => Err(format!("unknown filter '{}' (expected unwritten, written or all)", other)),
        }
    }
}

impl fmt::Display for ListFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Reader preferences.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppSettings {
    /// Offer text-to-speech playback of verses.
    pub use_tts: bool,
    /// Offer the type-along writing mode.
    pub use_writing: bool,
    pub font_size_large: bool,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            use_tts: false,
            use_writing: true,
            font_size_large: false,
        }
    }
}

impl AppSettings {
    /// Multiplier applied to title and body text sizes.
    pub fn font_scale(&self) -> f32 {
        if self.font_size_large {
            1.3
        } else {
            1.0
        }
    }
}

/// Partial update to [`AppSettings`]; `None` leaves a field unchanged.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct SettingsPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub use_tts: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub use_writing: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font_size_large: Option<bool>,
}

impl SettingsPatch {
    pub fn is_empty(&self) -> bool {
        self.use_tts.is_none() && self.use_writing.is_none() && self.font_size_large.is_none()
    }

    pub fn apply(&self, settings: &AppSettings) -> AppSettings {
        AppSettings {
            use_tts: self.use_tts.unwrap_or(settings.use_tts),
            use_writing: self.use_writing.unwrap_or(settings.use_writing),
            font_size_large: self.font_size_large.unwrap_or(settings.font_size_large),
        }
    }
}
