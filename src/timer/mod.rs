//! Timer engine for a single focus session.
//!
//! This module provides the countdown state machine:
//! - Run/pause toggle and an independent break toggle
//! - One-second decrements while running and not on break
//! - Automatic end when the countdown reaches zero, or forfeit at any time
//!
//! The engine never sleeps. Ticks are fed in from outside, normally by a
//! [`TickSchedule`] that is armed only while the engine is counting.

mod schedule;

pub use schedule::TickSchedule;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::types::{ActiveSession, FocusRating};

// ============================================================================
// TimerPhase
// ============================================================================

/// Observable state of the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimerPhase {
    /// Counting down
    Running,
    /// Stopped by the run/pause toggle
    Paused,
    /// On break; no countdown regardless of the run flag
    OnBreak,
    /// Finished; the session end has been emitted
    Ended,
}

impl TimerPhase {
    /// Returns the string representation of the phase.
    pub fn as_str(&self) -> &'static str {
        match self {
            TimerPhase::Running => "running",
            TimerPhase::Paused => "paused",
            TimerPhase::OnBreak => "on_break",
            TimerPhase::Ended => "ended",
        }
    }

    /// Returns true if ticks decrement the countdown in this phase.
    pub fn is_counting(&self) -> bool {
        matches!(self, TimerPhase::Running)
    }
}

// ============================================================================
// SessionEnd / TickOutcome
// ============================================================================

/// Why a session ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EndReason {
    /// The countdown reached zero
    Completed,
    /// The user gave up early
    Forfeited,
}

/// Emitted exactly once when the engine reaches [`TimerPhase::Ended`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionEnd {
    /// Rating in effect at the moment of the transition
    pub focus_rating: FocusRating,
    /// Always 0; no penalty rules exist
    pub penalties: u32,
    /// What caused the end
    pub reason: EndReason,
}

/// Result of feeding one tick to the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// Paused, on break or already ended; nothing changed
    Suspended,
    /// One second was counted
    Counted {
        /// Seconds left after this tick
        remaining_seconds: u32,
    },
    /// This tick brought the countdown to zero
    Expired(SessionEnd),
}

// ============================================================================
// TimerEngine
// ============================================================================

/// Countdown state machine for one active session.
///
/// The engine is created in [`TimerPhase::Paused`] and is meant to be
/// dropped once it has emitted its [`SessionEnd`].
#[derive(Debug, Clone)]
pub struct TimerEngine {
    session: ActiveSession,
    ended: bool,
}

impl TimerEngine {
    /// Takes ownership of a freshly promoted session.
    pub fn new(mut session: ActiveSession) -> Self {
        session.running = false;
        session.remaining_seconds = session.draft.total_seconds();
        debug!(
            goal = %session.goal(),
            remaining = session.remaining_seconds,
            "timer engine created"
        );
        Self {
            session,
            ended: false,
        }
    }

    /// Returns the current phase.
    pub fn phase(&self) -> TimerPhase {
        if self.ended {
            TimerPhase::Ended
        } else if self.session.in_break {
            TimerPhase::OnBreak
        } else if self.session.running {
            TimerPhase::Running
        } else {
            TimerPhase::Paused
        }
    }

    /// Returns true while ticks decrement the countdown.
    pub fn is_counting(&self) -> bool {
        self.phase().is_counting()
    }

    /// Returns the session being timed.
    pub fn session(&self) -> &ActiveSession {
        &self.session
    }

    /// Returns the seconds left on the countdown.
    pub fn remaining_seconds(&self) -> u32 {
        self.session.remaining_seconds
    }

    /// Returns the current focus rating.
    pub fn focus_rating(&self) -> FocusRating {
        self.session.focus_rating
    }

    /// Flips between running and paused. Ignored once ended.
    pub fn toggle_running(&mut self) -> TimerPhase {
        if !self.ended {
            self.session.running = !self.session.running;
            debug!(running = self.session.running, "run toggle");
        }
        self.phase()
    }

    /// Puts the session on or off break. Ignored once ended.
    ///
    /// The run flag is left untouched, so leaving a break while the run
    /// flag is set resumes counting immediately.
    pub fn set_break(&mut self, in_break: bool) -> TimerPhase {
        if !self.ended {
            self.session.in_break = in_break;
            debug!(in_break, "break flag set");
        }
        self.phase()
    }

    /// Flips the break flag.
    pub fn toggle_break(&mut self) -> TimerPhase {
        let in_break = !self.session.in_break;
        self.set_break(in_break)
    }

    /// Updates the focus rating. Ignored once ended.
    pub fn set_focus_rating(&mut self, rating: FocusRating) -> FocusRating {
        if !self.ended {
            self.session.focus_rating = rating;
        }
        self.session.focus_rating
    }

    /// Counts one second if running and not on break.
    pub fn tick(&mut self) -> TickOutcome {
        if !self.is_counting() {
            return TickOutcome::Suspended;
        }

        self.session.remaining_seconds = self.session.remaining_seconds.saturating_sub(1);

        if self.session.remaining_seconds == 0 {
            info!(goal = %self.session.goal(), "countdown finished");
            return TickOutcome::Expired(self.finish(EndReason::Completed));
        }

        TickOutcome::Counted {
            remaining_seconds: self.session.remaining_seconds,
        }
    }

    /// Ends the session early from any non-ended phase.
    ///
    /// Returns `None` if the session already ended.
    pub fn forfeit(&mut self) -> Option<SessionEnd> {
        if self.ended {
            return None;
        }
        info!(
            goal = %self.session.goal(),
            remaining = self.session.remaining_seconds,
            "session forfeited"
        );
        Some(self.finish(EndReason::Forfeited))
    }

    /// Gives the session back, consuming the engine.
    pub fn into_session(self) -> ActiveSession {
        self.session
    }

    fn finish(&mut self, reason: EndReason) -> SessionEnd {
        self.ended = true;
        self.session.running = false;
        SessionEnd {
            focus_rating: self.session.focus_rating,
            penalties: 0,
            reason,
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
