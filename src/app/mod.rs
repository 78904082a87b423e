//! Application controller.
//!
//! Orchestrates setup → timer → store:
//! - Holds the committed draft, the running timer engine and the history
//! - Stamps start/end times from the injected clock
//! - Persists the full history after every append

use tracing::{debug, error, info, warn};

use crate::clock::{Clock, SystemClock};
use crate::store::SessionStore;
use crate::timer::{TickOutcome, TimerEngine, TimerPhase};
use crate::types::{ActiveSession, FocusRating, SessionDraft, SessionHistory, SessionRecord};

/// Owns the session lifecycle and the in-memory history.
pub struct AppController<S, C = SystemClock> {
    store: S,
    clock: C,
    current_draft: Option<SessionDraft>,
    engine: Option<TimerEngine>,
    history: SessionHistory,
    in_break: bool,
}

impl<S: SessionStore> AppController<S, SystemClock> {
    /// Creates a controller on the system clock, loading the history once.
    pub fn new(store: S) -> Self {
        Self::with_clock(store, SystemClock)
    }
}

impl<S: SessionStore, C: Clock> AppController<S, C> {
    /// Creates a controller, loading the history once.
    ///
    /// A missing or unreadable history starts empty.
    pub fn with_clock(store: S, clock: C) -> Self {
        let history = match store.load() {
            Ok(records) => {
                debug!(count = records.len(), "history loaded");
                SessionHistory::from(records)
            }
            Err(e) => {
                warn!(error = %e, "could not load session history; starting empty");
                SessionHistory::new()
            }
        };

        Self {
            store,
            clock,
            current_draft: None,
            engine: None,
            history,
            in_break: false,
        }
    }

    /// Replaces the pending draft. History is untouched.
    pub fn commit_draft(&mut self, draft: SessionDraft) {
        debug!(goal = %draft.goal(), duration = draft.duration(), "draft committed");
        self.current_draft = Some(draft);
    }

    /// Promotes the pending draft to an active session.
    ///
    /// Returns false if there is no draft or a session is already active.
    pub fn start_session(&mut self) -> bool {
        if self.engine.is_some() {
            debug!("start ignored: session already active");
            return false;
        }
        let Some(draft) = self.current_draft.clone() else {
            debug!("start ignored: no draft");
            return false;
        };

        info!(goal = %draft.goal(), duration = draft.duration(), "session started");
        let session = ActiveSession::start(draft, self.clock.now());
        self.engine = Some(TimerEngine::new(session));
        self.in_break = false;
        true
    }

    /// Ends the active session and appends its record.
    ///
    /// Clears the draft, the engine and the break flag, then saves the
    /// whole history. Returns `None` if no session is active.
    pub fn end_session(&mut self, focus_rating: FocusRating, penalties: u32) -> Option<SessionRecord> {
        let engine = self.engine.take()?;
        let record = SessionRecord::from_session(
            engine.into_session(),
            focus_rating,
            penalties,
            self.clock.now(),
        );

        info!(
            goal = %record.goal,
            focus_rating = record.focus_rating.value(),
            "session ended"
        );

        self.history.push(record.clone());
        self.current_draft = None;
        self.in_break = false;
        self.persist();
        Some(record)
    }

    /// Flips the break flag on the active session.
    ///
    /// Returns the new flag, or `None` when no session is active.
    pub fn toggle_break(&mut self) -> Option<bool> {
        let engine = self.engine.as_mut()?;
        self.in_break = !self.in_break;
        engine.set_break(self.in_break);
        Some(self.in_break)
    }

    /// Flips run/pause on the active session.
    pub fn toggle_running(&mut self) -> Option<TimerPhase> {
        self.engine.as_mut().map(TimerEngine::toggle_running)
    }

    /// Updates the focus rating on the active session.
    pub fn set_focus_rating(&mut self, rating: FocusRating) -> Option<FocusRating> {
        self.engine.as_mut().map(|engine| engine.set_focus_rating(rating))
    }

    /// Feeds one tick to the active session.
    ///
    /// Returns the record when this tick finished the session.
    pub fn tick(&mut self) -> Option<SessionRecord> {
        let outcome = self.engine.as_mut()?.tick();
        match outcome {
            TickOutcome::Expired(end) => self.end_session(end.focus_rating, end.penalties),
            TickOutcome::Counted { .. } | TickOutcome::Suspended => None,
        }
    }

    /// Gives up on the active session and records it.
    pub fn forfeit(&mut self) -> Option<SessionRecord> {
        let end = self.engine.as_mut()?.forfeit()?;
        self.end_session(end.focus_rating, end.penalties)
    }

    /// Returns the pending draft.
    pub fn current_draft(&self) -> Option<&SessionDraft> {
        self.current_draft.as_ref()
    }

    /// Returns the running timer engine.
    pub fn engine(&self) -> Option<&TimerEngine> {
        self.engine.as_ref()
    }

    /// Returns the active session.
    pub fn active_session(&self) -> Option<&ActiveSession> {
        self.engine.as_ref().map(TimerEngine::session)
    }

    /// Returns true while the active session is counting down.
    pub fn is_counting(&self) -> bool {
        self.engine.as_ref().is_some_and(TimerEngine::is_counting)
    }

    /// Returns the break flag.
    pub fn in_break(&self) -> bool {
        self.in_break
    }

    /// Returns the recorded sessions.
    pub fn history(&self) -> &SessionHistory {
        &self.history
    }

    fn persist(&self) {
        if let Err(e) = self.store.save(self.history.records()) {
            error!(error = %e, suggestion = e.suggestion(), "failed to save session history");
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::MockClock;
    use crate::store::MockSessionStore;
    use std::sync::Arc;

    type TestController = AppController<Arc<MockSessionStore>, Arc<MockClock>>;

    fn create_controller() -> (TestController, Arc<MockSessionStore>, Arc<MockClock>) {
        let store = Arc::new(MockSessionStore::new());
        let clock = Arc::new(MockClock::default());
        let controller = AppController::with_clock(Arc::clone(&store), Arc::clone(&clock));
        (controller, store, clock)
    }

    fn draft(goal: &str, minutes: u32) -> SessionDraft {
        SessionDraft::new(goal, minutes).unwrap()
    }

    mod lifecycle_tests {
        use super::*;

        #[test]
        fn test_new_controller_is_idle() {
            let (controller, _store, _clock) = create_controller();
            assert!(controller.current_draft().is_none());
            assert!(controller.engine().is_none());
            assert!(controller.history().is_empty());
            assert!(!controller.in_break());
        }

        #[test]
        fn test_commit_draft_does_not_touch_history() {
            let (mut controller, store, _clock) = create_controller();
            controller.commit_draft(draft("Read", 10));
            assert_eq!(controller.current_draft().unwrap().goal(), "Read");
            assert!(controller.history().is_empty());
            assert_eq!(store.save_count(), 0);
        }

        #[test]
        fn test_commit_replaces_prior_draft() {
            let (mut controller, _store, _clock) = create_controller();
            controller.commit_draft(draft("Read", 10));
            controller.commit_draft(draft("Write", 20));
            assert_eq!(controller.current_draft().unwrap().goal(), "Write");
        }

        #[test]
        fn test_start_without_draft_is_noop() {
            let (mut controller, _store, _clock) = create_controller();
            assert!(!controller.start_session());
            assert!(controller.engine().is_none());
        }

        #[test]
        fn test_start_stamps_time_and_pauses() {
            let (mut controller, _store, clock) = create_controller();
            clock.advance_secs(100);
            controller.commit_draft(draft("Read", 10));
            assert!(controller.start_session());

            let session = controller.active_session().unwrap();
            assert_eq!(session.start_time, clock.now());
            assert_eq!(session.remaining_seconds, 600);
            assert_eq!(controller.engine().unwrap().phase(), TimerPhase::Paused);
        }

        #[test]
        fn test_second_start_is_ignored() {
            let (mut controller, _store, _clock) = create_controller();
            controller.commit_draft(draft("Read", 10));
            assert!(controller.start_session());
            controller.toggle_running();
            controller.tick();
            assert!(!controller.start_session());
            assert_eq!(controller.active_session().unwrap().remaining_seconds, 599);
        }

        #[test]
        fn test_end_session_appends_and_clears() {
            let (mut controller, store, clock) = create_controller();
            controller.commit_draft(draft("Read", 10));
            controller.start_session();
            controller.toggle_break();
            clock.advance_secs(42);

            let record = controller.end_session(FocusRating::new(8), 0).unwrap();
            assert_eq!(record.goal, "Read");
            assert_eq!(record.focus_rating.value(), 8);
            assert_eq!((record.end_time - record.start_time).num_seconds(), 42);

            assert!(controller.current_draft().is_none());
            assert!(controller.engine().is_none());
            assert!(!controller.in_break());
            assert_eq!(controller.history().len(), 1);
            assert_eq!(store.save_count(), 1);
            assert_eq!(store.load().unwrap(), vec![record]);
        }

        #[test]
        fn test_end_session_without_active_is_noop() {
            let (mut controller, store, _clock) = create_controller();
            assert!(controller.end_session(FocusRating::default(), 0).is_none());
            assert_eq!(store.save_count(), 0);
        }

        #[test]
        fn test_save_failure_keeps_memory_history() {
            let (mut controller, store, _clock) = create_controller();
            store.set_should_fail_save(true);
            controller.commit_draft(draft("Read", 10));
            controller.start_session();
            assert!(controller.forfeit().is_some());
            assert_eq!(controller.history().len(), 1);

            // Next session still works and re-saves everything
            store.set_should_fail_save(false);
            controller.commit_draft(draft("Write", 5));
            controller.start_session();
            controller.forfeit();
            assert_eq!(store.load().unwrap().len(), 2);
        }
    }

    mod break_tests {
        use super::*;

        #[test]
        fn test_toggle_break_without_session_is_noop() {
            let (mut controller, _store, _clock) = create_controller();
            assert_eq!(controller.toggle_break(), None);
            assert!(!controller.in_break());
        }

        #[test]
        fn test_toggle_break_is_delegated() {
            let (mut controller, _store, _clock) = create_controller();
            controller.commit_draft(draft("Read", 10));
            controller.start_session();
            controller.toggle_running();

            assert_eq!(controller.toggle_break(), Some(true));
            assert_eq!(controller.engine().unwrap().phase(), TimerPhase::OnBreak);
            assert!(!controller.is_counting());

            assert_eq!(controller.toggle_break(), Some(false));
            assert_eq!(controller.engine().unwrap().phase(), TimerPhase::Running);
            assert!(controller.is_counting());
        }
    }

    mod load_tests {
        use super::*;

        #[test]
        fn test_malformed_history_loads_empty() {
            let store = MockSessionStore::with_content("{{{ not json");
            let controller = AppController::with_clock(store, MockClock::default());
            assert!(controller.history().is_empty());
        }

        #[test]
        fn test_existing_history_is_loaded() {
            let content = r#"[{"goal":"Old","duration":30,"focusRating":7,"penalties":0,"startTime":0,"endTime":1800000}]"#;
            let store = MockSessionStore::with_content(content);
            let controller = AppController::with_clock(store, MockClock::default());
            assert_eq!(controller.history().len(), 1);
            assert_eq!(controller.history().last().unwrap().goal, "Old");
        }
    }

    mod ending_tests {
        use super::*;

        #[test]
        fn test_forfeit_records_current_rating() {
            let (mut controller, _store, _clock) = create_controller();
            controller.commit_draft(draft("Read", 10));
            controller.start_session();
            controller.set_focus_rating(FocusRating::new(2));

            let record = controller.forfeit().unwrap();
            assert_eq!(record.focus_rating.value(), 2);
            assert_eq!(record.penalties, 0);
            assert!(record.end_time >= record.start_time);
        }

        #[test]
        fn test_forfeit_without_session_is_noop() {
            let (mut controller, _store, _clock) = create_controller();
            assert!(controller.forfeit().is_none());
        }

        #[test]
        fn test_tick_expiry_records_session() {
            let (mut controller, _store, _clock) = create_controller();
            controller.commit_draft(draft("Short", 1));
            controller.start_session();
            controller.toggle_running();

            let records: Vec<SessionRecord> = (0..60).filter_map(|_| controller.tick()).collect();
            assert_eq!(records.len(), 1);
            assert_eq!(records[0].duration, 1);
            assert!(controller.engine().is_none());
            assert_eq!(controller.tick(), None);
        }
    }
}
