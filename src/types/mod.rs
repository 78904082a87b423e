//! Core data types for the focus timer.
//!
//! This module defines the data structures used for:
//! - Session drafts collected by the setup flow
//! - The active session owned by the timer engine
//! - Terminal session records and the append-only history

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Smallest accepted session length in minutes.
pub const MIN_DURATION_MINUTES: u32 = 1;

/// Largest session length offered by the input widgets.
///
/// Advisory only: drafts built programmatically may exceed it.
pub const MAX_SUGGESTED_DURATION_MINUTES: u32 = 180;

/// Session length pre-filled by the setup flow.
pub const DEFAULT_DURATION_MINUTES: u32 = 25;

/// Coerces free-form duration input into minutes.
///
/// Leading digits are read the way a numeric text field reads them
/// (`"12abc"` is 12). Anything without leading digits, zero and negative
/// values all coerce to [`MIN_DURATION_MINUTES`].
pub fn coerce_duration_input(input: &str) -> u32 {
    let trimmed = input.trim();
    let (negative, digits) = match trimmed.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, trimmed.strip_prefix('+').unwrap_or(trimmed)),
    };

    let leading: String = digits.chars().take_while(|c| c.is_ascii_digit()).collect();
    if leading.is_empty() || negative {
        return MIN_DURATION_MINUTES;
    }

    // Overlong digit strings saturate instead of wrapping
    let value = leading.parse::<u32>().unwrap_or(u32::MAX);
    value.max(MIN_DURATION_MINUTES)
}

// ============================================================================
// FocusRating
// ============================================================================

/// Self-reported focus score, always within 1..=10.
///
/// Deserializing an out-of-range score fails instead of clamping, so a
/// tampered history slot is reported as malformed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(into = "u8", try_from = "u8")]
pub struct FocusRating(u8);

/// A stored focus score outside 1..=10.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("focus rating {0} is outside {min}..={max}", min = FocusRating::MIN, max = FocusRating::MAX)]
pub struct FocusRatingOutOfRange(pub u8);

impl FocusRating {
    /// Lowest rating.
    pub const MIN: u8 = 1;
    /// Highest rating.
    pub const MAX: u8 = 10;
    /// Rating every session starts with.
    pub const DEFAULT: u8 = 5;

    /// Creates a rating, clamping the value into range.
    #[must_use]
    pub fn new(value: u8) -> Self {
        Self(value.clamp(Self::MIN, Self::MAX))
    }

    /// Returns the raw score.
    #[must_use]
    pub fn value(self) -> u8 {
        self.0
    }

    /// Returns the rating moved by `delta`, saturating at the bounds.
    #[must_use]
    pub fn adjusted(self, delta: i8) -> Self {
        let moved = i16::from(self.0) + i16::from(delta);
        let clamped = moved.clamp(i16::from(Self::MIN), i16::from(Self::MAX));
        Self(clamped as u8)
    }
}

impl TryFrom<u8> for FocusRating {
    type Error = FocusRatingOutOfRange;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        if (Self::MIN..=Self::MAX).contains(&value) {
            Ok(Self(value))
        } else {
            Err(FocusRatingOutOfRange(value))
        }
    }
}

impl From<FocusRating> for u8 {
    fn from(rating: FocusRating) -> Self {
        rating.0
    }
}

impl Default for FocusRating {
    fn default() -> Self {
        Self(Self::DEFAULT)
    }
}

impl std::fmt::Display for FocusRating {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.0, Self::MAX)
    }
}

// ============================================================================
// SessionDraft
// ============================================================================

/// A session description captured before the countdown begins.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionDraft {
    goal: String,
    duration: u32,
}

impl SessionDraft {
    /// Creates a draft.
    ///
    /// Returns `None` when the goal is empty or whitespace-only. The
    /// duration is raised to [`MIN_DURATION_MINUTES`] if lower.
    #[must_use]
    pub fn new(goal: impl Into<String>, duration: u32) -> Option<Self> {
        let goal = goal.into();
        if goal.trim().is_empty() {
            return None;
        }
        Some(Self {
            goal,
            duration: duration.max(MIN_DURATION_MINUTES),
        })
    }

    /// Returns the goal text.
    pub fn goal(&self) -> &str {
        &self.goal
    }

    /// Returns the duration in minutes.
    pub fn duration(&self) -> u32 {
        self.duration
    }

    /// Returns the duration in seconds.
    pub fn total_seconds(&self) -> u32 {
        self.duration.saturating_mul(60)
    }
}

// ============================================================================
// ActiveSession
// ============================================================================

/// The single session being timed.
///
/// Owned by [`crate::timer::TimerEngine`] for its whole lifetime.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActiveSession {
    /// The draft this session was promoted from
    pub draft: SessionDraft,
    /// When the user confirmed the start
    pub start_time: DateTime<Utc>,
    /// Whether the countdown is running (as opposed to paused)
    pub running: bool,
    /// Whether the session is on break
    pub in_break: bool,
    /// Seconds left on the countdown
    pub remaining_seconds: u32,
    /// Current focus rating
    pub focus_rating: FocusRating,
}

impl ActiveSession {
    /// Promotes a draft. The countdown starts paused at the full duration.
    pub fn start(draft: SessionDraft, start_time: DateTime<Utc>) -> Self {
        let remaining_seconds = draft.total_seconds();
        Self {
            draft,
            start_time,
            running: false,
            in_break: false,
            remaining_seconds,
            focus_rating: FocusRating::default(),
        }
    }

    /// Returns the goal text.
    pub fn goal(&self) -> &str {
        self.draft.goal()
    }

    /// Returns the duration in minutes.
    pub fn duration(&self) -> u32 {
        self.draft.duration()
    }

    /// Returns the elapsed fraction of the countdown in `0.0..=1.0`.
    pub fn progress(&self) -> f64 {
        let total = self.draft.total_seconds();
        if total == 0 {
            return 1.0;
        }
        f64::from(total - self.remaining_seconds.min(total)) / f64::from(total)
    }
}

// ============================================================================
// SessionRecord
// ============================================================================

/// A finished (completed or forfeited) session.
///
/// Serialized with the field names of the persisted history slot;
/// timestamps are epoch milliseconds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionRecord {
    /// Goal text
    pub goal: String,
    /// Planned duration in minutes
    pub duration: u32,
    /// Focus rating in effect when the session ended
    pub focus_rating: FocusRating,
    /// Penalty count. Nothing assigns penalties yet, so this is always 0.
    pub penalties: u32,
    /// When the session started
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub start_time: DateTime<Utc>,
    /// When the session ended
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub end_time: DateTime<Utc>,
}

impl SessionRecord {
    /// Builds the record for an ended session.
    ///
    /// `end_time` is raised to the start time if a clock step put it earlier.
    pub fn from_session(
        session: ActiveSession,
        focus_rating: FocusRating,
        penalties: u32,
        end_time: DateTime<Utc>,
    ) -> Self {
        let start_time = session.start_time;
        let ActiveSession { draft, .. } = session;
        Self {
            goal: draft.goal,
            duration: draft.duration,
            focus_rating,
            penalties,
            start_time,
            end_time: end_time.max(start_time),
        }
    }
}

// ============================================================================
// SessionHistory
// ============================================================================

/// Append-only, chronologically ordered list of session records.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionHistory(Vec<SessionRecord>);

impl SessionHistory {
    /// Creates an empty history.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a record at the end.
    pub fn push(&mut self, record: SessionRecord) {
        self.0.push(record);
    }

    /// Returns the records in insertion order.
    pub fn records(&self) -> &[SessionRecord] {
        &self.0
    }

    /// Returns the most recent record.
    pub fn last(&self) -> Option<&SessionRecord> {
        self.0.last()
    }

    /// Returns the number of records.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns true if no session has been recorded.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterates over the records in insertion order.
    pub fn iter(&self) -> std::slice::Iter<'_, SessionRecord> {
        self.0.iter()
    }
}

impl From<Vec<SessionRecord>> for SessionHistory {
    fn from(records: Vec<SessionRecord>) -> Self {
        Self(records)
    }
}

impl<'a> IntoIterator for &'a SessionHistory {
    type Item = &'a SessionRecord;
    type IntoIter = std::slice::Iter<'a, SessionRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

// ============================================================================
// Tests
// ============================================================================
