//! Core verse-reader library shared by the reader applications.
//!
//! Provides:
//! - Typing accuracy scoring and display splitting for type-along mode
//! - Writing sessions that track milestones and the completion threshold
//! - Seed data parser
//! - Shared types (Verse, ListFilter, AppSettings, etc.)

pub mod accuracy;
pub mod error;
pub mod parser;
pub mod session;
pub mod types;

pub use accuracy::{
    compute_accuracy, compute_display_split, normalize, split_for_display, DisplaySplit,
};
pub use error::{ParseError, Result};
pub use parser::parse;
pub use session::{CompletedWriting, Milestone, SessionUpdate, WritingSession};
pub use types::{AppSettings, ListFilter, RawVerse, ReadStatus, SettingsPatch, Verse};
