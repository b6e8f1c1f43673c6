//! Type-along writing sessions.
//!
//! A session owns the reference verse and the growing typed text. Every
//! change to the typed text is fed through [`WritingSession::update`], which
//! rescores it with the pure functions in [`crate::accuracy`].

use crate::accuracy::{compute_accuracy, compute_display_split, split_for_display, DisplaySplit};
use serde::{Deserialize, Serialize};

/// Accuracy at which the halfway celebration fires.
pub const HALFWAY_ACCURACY: f64 = 50.0;
/// Accuracy at which the copy counts as done and is worth persisting.
pub const COMPLETION_THRESHOLD: f64 = 60.0;
/// Accuracy at which the full celebration fires.
pub const COMPLETE_ACCURACY: f64 = 99.0;

/// Celebration point reached while typing. Later variants outrank earlier ones.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Milestone {
    Halfway,
    Complete,
}

/// Result of feeding a new typed value into a session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionUpdate {
    pub accuracy: f64,
    /// Character index into the reference; see [`compute_display_split`].
    pub split: usize,
    /// Characters in the raw typed text.
    pub char_count: usize,
    /// Set only on the update that first reaches a milestone.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub milestone: Option<Milestone>,
    pub threshold_met: bool,
}

/// Typed text worth saving once a session ends.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompletedWriting {
    pub typed: String,
    pub accuracy: f64,
}

#[derive(Debug, Clone)]
pub struct WritingSession {
    reference: String,
    typed: String,
    accuracy: f64,
    threshold_met: bool,
    halfway_reached: bool,
    complete_reached: bool,
    /// Highest milestone fired since the session started.
    best_milestone: Option<Milestone>,
}

impl WritingSession {
    pub fn new(reference: impl Into<String>) -> Self {
        Self {
            reference: reference.into(),
            typed: String::new(),
            accuracy: 0.0,
            threshold_met: false,
            halfway_reached: false,
            complete_reached: false,
            best_milestone: None,
        }
    }

    /// Start from text typed in an earlier session. Milestones already
    /// covered by that text do not fire again.
    pub fn resume(reference: impl Into<String>, previous: &str) -> Self {
        let mut session = Self::new(reference);
        session.update(previous);
        session.best_milestone = None;
        session
    }

    /// Rescore after the typed text changed.
    pub fn update(&mut self, typed: impl Into<String>) -> SessionUpdate {
        self.typed = typed.into();
        self.accuracy = compute_accuracy(&self.reference, &self.typed);

        if self.accuracy >= COMPLETION_THRESHOLD {
            self.threshold_met = true;
        }

        let milestone = if self.accuracy >= COMPLETE_ACCURACY && !self.complete_reached {
            self.complete_reached = true;
            self.halfway_reached = true;
            Some(Milestone::Complete)
        } else if self.accuracy >= HALFWAY_ACCURACY && !self.halfway_reached {
            self.halfway_reached = true;
            Some(Milestone::Halfway)
        } else {
            None
        };
        self.best_milestone = self.best_milestone.max(milestone);

        SessionUpdate {
            accuracy: self.accuracy,
            split: compute_display_split(&self.reference, &self.typed),
            char_count: self.typed.chars().count(),
            milestone,
            threshold_met: self.threshold_met,
        }
    }

    pub fn reference(&self) -> &str {
        &self.reference
    }

    pub fn typed(&self) -> &str {
        &self.typed
    }

    pub fn accuracy(&self) -> f64 {
        self.accuracy
    }

    /// Latched: stays true once reached, even if later edits lower the score.
    pub fn threshold_met(&self) -> bool {
        self.threshold_met
    }

    /// Most significant milestone fired so far, not just on the last update.
    pub fn milestone_reached(&self) -> Option<Milestone> {
        self.best_milestone
    }

    pub fn display_split(&self) -> DisplaySplit<'_> {
        split_for_display(&self.reference, &self.typed)
    }

    /// End the session, yielding the text to persist if the threshold was met.
    pub fn finish(self) -> Option<CompletedWriting> {
        self.threshold_met.then(|| CompletedWriting {
            typed: self.typed,
            accuracy: self.accuracy,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const VERSE: &str = "abcdefghij";

    #[test]
    fn test_update_reports_score_and_split() {
        let mut session = WritingSession::new("Hello, world.");
        let update = session.update("Hello");
        assert_eq!(update.accuracy, 50.0);
        assert_eq!(update.split, 5);
        assert_eq!(update.char_count, 5);
        assert_eq!(session.display_split().remaining, ", world.");
    }

    #[test]
    fn test_milestones_fire_once() {
        let mut session = WritingSession::new(VERSE);
        assert_eq!(session.update("abcd").milestone, None);
        assert_eq!(session.update("abcde").milestone, Some(Milestone::Halfway));
        assert_eq!(session.update("abcdef").milestone, None);
        assert_eq!(session.update("abcde").milestone, None);
        assert_eq!(session.update("abcdefghij").milestone, Some(Milestone::Complete));
        assert_eq!(session.update("abcdefghij").milestone, None);
    }

    #[test]
    fn test_milestone_reached_survives_later_updates() {
        let mut session = WritingSession::new(VERSE);
        assert_eq!(session.milestone_reached(), None);

        session.update("abcde");
        session.update("abcdef");
        assert_eq!(session.milestone_reached(), Some(Milestone::Halfway));

        session.update(VERSE);
        session.update("abcdefgh");
        assert_eq!(session.milestone_reached(), Some(Milestone::Complete));

        // a lower score afterwards does not downgrade it
        session.update("a");
        assert_eq!(session.milestone_reached(), Some(Milestone::Complete));
    }

    #[test]
    fn test_jump_to_complete_consumes_halfway() {
        let mut session = WritingSession::new(VERSE);
        assert_eq!(session.update(VERSE).milestone, Some(Milestone::Complete));
        assert_eq!(session.update("abcde").milestone, None);
    }

    #[test]
    fn test_threshold_latches() {
        let mut session = WritingSession::new(VERSE);
        assert!(!session.update("abcde").threshold_met);
        assert!(session.update("abcdef").threshold_met);
        assert!(session.update("a").threshold_met);
        assert!(session.threshold_met());
    }

    #[test]
    fn test_finish_below_threshold() {
        let mut session = WritingSession::new(VERSE);
        session.update("abc");
        assert_eq!(session.finish(), None);
    }

    #[test]
    fn test_finish_keeps_latest_text() {
        let mut session = WritingSession::new(VERSE);
        session.update("abcdefghij");
        session.update("abcdefgh");
        let done = session.finish().unwrap();
        assert_eq!(done.typed, "abcdefgh");
        assert_eq!(done.accuracy, 80.0);
    }

    #[test]
    fn test_resume_does_not_replay_milestones() {
        let mut session = WritingSession::resume(VERSE, "abcdef");
        assert_eq!(session.typed(), "abcdef");
        assert!(session.threshold_met());
        assert_eq!(session.update("abcdefg").milestone, None);
        assert_eq!(session.milestone_reached(), None);
        assert_eq!(session.update(VERSE).milestone, Some(Milestone::Complete));
        assert_eq!(session.milestone_reached(), Some(Milestone::Complete));
    }

    #[test]
    fn test_char_count_counts_chars_not_bytes() {
        let mut session = WritingSession::new("마음은 모든 일의 근본이다.");
        assert_eq!(session.update("마음은").char_count, 3);
    }
}
