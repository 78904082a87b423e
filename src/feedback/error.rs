//! Feedback provider error types.
//!
//! These never reach callers of the provider; they are logged and mapped
//! to a fallback tier at the provider boundary.

use thiserror::Error;

/// Errors from a remote feedback call.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum FeedbackError {
    /// No API credential is configured.
    #[error("feedback API key is not configured")]
    NotConfigured,

    /// The request could not be sent or the body could not be read.
    #[error("feedback request failed: {0}")]
    Request(String),

    /// The request did not complete in time.
    #[error("feedback request timed out after {0} seconds")]
    Timeout(u64),

    /// The API answered with a non-success status.
    #[error("feedback API returned {code}: {message}")]
    Status {
        /// HTTP status code
        code: u16,
        /// Error message from the response body
        message: String,
    },

    /// The response contained no text.
    #[error("feedback API returned no text")]
    EmptyResponse,
}

impl FeedbackError {
    /// Returns true if the credential is missing.
    #[must_use]
    pub fn is_not_configured(&self) -> bool {
        matches!(self, Self::NotConfigured)
    }

    /// Returns true if this is a timeout.
    #[must_use]
    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Timeout(_))
    }

    /// Returns true if a later attempt could succeed.
    #[must_use]
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Request(_) | Self::Timeout(_) => true,
            Self::Status { code, .. } => *code == 429 || *code >= 500,
            Self::NotConfigured | Self::EmptyResponse => false,
        }
    }

    /// Returns a user-friendly suggestion for resolving this error.
    #[must_use]
    pub fn suggestion(&self) -> &'static str {
        match self {
            Self::NotConfigured => "set GEMINI_API_KEY or pass --api-key",
            Self::Request(_) => "check your network connection",
            Self::Timeout(_) => "the service is slow; try again later",
            Self::Status { .. } => "check that the API key is valid and has quota left",
            Self::EmptyResponse => "try again; the model returned nothing",
        }
    }
}
