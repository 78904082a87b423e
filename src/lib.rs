//! Lock-In Focus Timer Library
//!
//! This library provides the core functionality for the Lock-In focus timer.
//! It includes:
//! - Domain types for drafts, active sessions and session records
//! - Goal/duration setup flow
//! - Timer engine with run/pause, breaks, forfeit and focus rating
//! - Session history persistence as a JSON slot
//! - Post-session feedback and motivational quotes with static fallbacks
//! - CLI command parsing and display utilities
//! - Interactive terminal UI
//!
//! # Example
//!
//! ```
//! use lockin::{AppController, MockSessionStore, SessionDraft};
//!
//! let mut app = AppController::new(MockSessionStore::new());
//! app.commit_draft(SessionDraft::new("Write report", 25).unwrap());
//! assert!(app.start_session());
//! app.toggle_running();
//! for _ in 0..25 * 60 {
//!     app.tick();
//! }
//! assert_eq!(app.history().len(), 1);
//! ```

pub mod app;
pub mod cli;
pub mod clock;
pub mod feedback;
pub mod setup;
pub mod store;
pub mod timer;
pub mod tui;
pub mod types;

// Re-export commonly used types for convenience
pub use types::{
    coerce_duration_input, ActiveSession, FocusRating, SessionDraft, SessionHistory,
    SessionRecord, DEFAULT_DURATION_MINUTES, MAX_SUGGESTED_DURATION_MINUTES, MIN_DURATION_MINUTES,
};

pub use app::AppController;
pub use clock::{Clock, MockClock, SystemClock};
pub use setup::SetupFlow;

// Re-export timer types
pub use timer::{EndReason, SessionEnd, TickOutcome, TickSchedule, TimerEngine, TimerPhase};

// Re-export store types
pub use store::{default_data_dir, JsonFileStore, MockSessionStore, SessionStore, StoreError};

// Re-export feedback types
pub use feedback::{
    FallbackTier, Feedback, FeedbackConfig, FeedbackError, FeedbackProvider, FeedbackSource,
    GeminiFeedbackProvider, MockFeedbackProvider, SessionFeedback,
};
