//! Setup flow: collects a goal and a duration and produces a draft.

use tracing::debug;

use crate::types::{coerce_duration_input, SessionDraft, DEFAULT_DURATION_MINUTES, MIN_DURATION_MINUTES};

/// Form state behind the setup screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SetupFlow {
    goal: String,
    duration: u32,
}

impl Default for SetupFlow {
    fn default() -> Self {
        Self {
            goal: String::new(),
            duration: DEFAULT_DURATION_MINUTES,
        }
    }
}

impl SetupFlow {
    /// Creates an empty form with the default duration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the goal text.
    pub fn set_goal(&mut self, goal: impl Into<String>) {
        self.goal = goal.into();
    }

    /// Sets the duration, raising it to the minimum if needed.
    pub fn set_duration(&mut self, minutes: u32) {
        self.duration = minutes.max(MIN_DURATION_MINUTES);
    }

    /// Sets the duration from raw text input.
    pub fn set_duration_input(&mut self, input: &str) {
        self.duration = coerce_duration_input(input);
    }

    /// Returns the goal text as typed.
    pub fn goal(&self) -> &str {
        &self.goal
    }

    /// Returns the duration in minutes.
    pub fn duration(&self) -> u32 {
        self.duration
    }

    /// Returns true if [`commit`](Self::commit) would produce a draft.
    pub fn can_commit(&self) -> bool {
        !self.goal.trim().is_empty()
    }

    /// Builds a draft from the current form.
    ///
    /// Returns `None` without side effects when the goal is blank.
    pub fn commit(&self) -> Option<SessionDraft> {
        let draft = SessionDraft::new(self.goal.clone(), self.duration);
        if draft.is_none() {
            debug!("setup commit refused: blank goal");
        }
        draft
    }
}
