//! Session store error types.

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while reading or writing the history slot.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The slot could not be read or written.
    #[error("session store I/O failed at {path}: {source}")]
    Io {
        /// Location of the slot
        path: PathBuf,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },

    /// The slot exists but does not hold a valid record array.
    #[error("session history is malformed: {0}")]
    Malformed(String),

    /// The history could not be encoded.
    #[error("failed to serialize session history: {0}")]
    Serialize(String),
}

impl StoreError {
    /// Returns true if the stored content could not be parsed.
    #[must_use]
    pub fn is_malformed(&self) -> bool {
        matches!(self, Self::Malformed(_))
    }

    /// Returns true if this is a filesystem error.
    #[must_use]
    pub fn is_io(&self) -> bool {
        matches!(self, Self::Io { .. })
    }

    /// Returns a user-friendly suggestion for resolving this error.
    #[must_use]
    pub fn suggestion(&self) -> &'static str {
        match self {
            Self::Io { .. } => "check that the data directory exists and is writable",
            Self::Malformed(_) => "the history file will be replaced on the next saved session",
            Self::Serialize(_) => "this is a bug; please report it",
        }
    }
}
