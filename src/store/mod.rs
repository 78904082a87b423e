//! Session history persistence.
//!
//! The history lives in a single named slot holding a JSON array of
//! session records:
//!
//! ```text
//! [{"goal": ..., "duration": ..., "focusRating": ..., "penalties": ...,
//!   "startTime": <epoch ms>, "endTime": <epoch ms>}, ...]
//! ```
//!
//! There is no versioning. A missing slot loads as an empty history;
//! malformed content is reported as [`StoreError::Malformed`] and the
//! controller treats it as empty.

mod error;
mod file;

pub use error::StoreError;
pub use file::{JsonFileStore, HISTORY_SLOT_FILE};

use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use crate::types::SessionRecord;

/// Environment variable overriding the data directory.
pub const DATA_DIR_ENV: &str = "LOCKIN_DATA_DIR";

/// Returns the default data directory for the history slot and log file.
///
/// Uses the platform data directory, or `./.lockin` when none is known.
pub fn default_data_dir() -> PathBuf {
    dirs::data_dir()
        .map(|dir| dir.join("lockin"))
        .unwrap_or_else(|| PathBuf::from(".lockin"))
}

/// Decodes the slot content.
pub fn decode_history(content: &str) -> Result<Vec<SessionRecord>, StoreError> {
    serde_json::from_str(content).map_err(|e| StoreError::Malformed(e.to_string()))
}

/// Encodes the full history for the slot.
pub fn encode_history(records: &[SessionRecord]) -> Result<String, StoreError> {
    serde_json::to_string(records).map_err(|e| StoreError::Serialize(e.to_string()))
}

/// Load/save capability for the session history.
///
/// Saves always write the whole sequence.
pub trait SessionStore {
    /// Reads every stored record in order. An absent slot yields an empty list.
    fn load(&self) -> Result<Vec<SessionRecord>, StoreError>;

    /// Replaces the stored history with `records`.
    fn save(&self, records: &[SessionRecord]) -> Result<(), StoreError>;
}

impl<T: SessionStore + ?Sized> SessionStore for Arc<T> {
    fn load(&self) -> Result<Vec<SessionRecord>, StoreError> {
        (**self).load()
    }

    fn save(&self, records: &[SessionRecord]) -> Result<(), StoreError> {
        (**self).save(records)
    }
}

/// In-memory store for testing.
///
/// Keeps the raw slot text so tests can seed malformed content.
#[derive(Debug, Default)]
pub struct MockSessionStore {
    slot: Mutex<Option<String>>,
    save_calls: std::sync::atomic::AtomicUsize,
    should_fail_save: std::sync::atomic::AtomicBool,
}

impl MockSessionStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store whose slot already holds `content`.
    #[must_use]
    pub fn with_content(content: impl Into<String>) -> Self {
        let store = Self::new();
        *store.slot.lock().unwrap() = Some(content.into());
        store
    }

    /// Returns the raw slot text.
    #[must_use]
    pub fn content(&self) -> Option<String> {
        self.slot.lock().unwrap().clone()
    }

    #[must_use]
    pub fn save_count(&self) -> usize {
        self.save_calls.load(std::sync::atomic::Ordering::SeqCst)
    }

    pub fn set_should_fail_save(&self, should_fail: bool) {
        self.should_fail_save
            .store(should_fail, std::sync::atomic::Ordering::SeqCst);
    }
}

impl SessionStore for MockSessionStore {
    fn load(&self) -> Result<Vec<SessionRecord>, StoreError> {
        match self.slot.lock().unwrap().as_deref() {
            Some(content) => decode_history(content),
            None => Ok(Vec::new()),
        }
    }

    fn save(&self, records: &[SessionRecord]) -> Result<(), StoreError> {
        self.save_calls
            .fetch_add(1, std::sync::atomic::Ordering::SeqCst);
        if self
            .should_fail_save
            .load(std::sync::atomic::Ordering::SeqCst)
        {
            return Err(StoreError::Io {
                path: PathBuf::from("<memory>"),
                source: std::io::Error::new(std::io::ErrorKind::Other, "simulated failure"),
            });
        }
        *self.slot.lock().unwrap() = Some(encode_history(records)?);
        Ok(())
    }
}
