//! Post-session feedback from a generative text service.
//!
//! This module provides:
//!
//! - The [`FeedbackProvider`] capability used by the front end
//! - [`GeminiFeedbackProvider`], backed by the Gemini REST API
//! - Named static fallbacks for every degraded path
//!
//! # Error Handling
//!
//! Providers never fail. A missing credential, a failed call or an
//! unparsable reply each produce a fixed payload, and the returned
//! [`Feedback`] says which [`FallbackTier`] fired.

pub mod config;
pub mod error;
pub mod fallback;
pub mod gemini;

pub use config::{FeedbackConfig, API_KEY_ENV};
pub use error::FeedbackError;
pub use fallback::{
    fallback_for, FallbackFeedback, FallbackTier, CALL_FAILURE_FEEDBACK, CALL_FAILURE_QUOTE,
    PARSE_FAILURE_FEEDBACK, UNCONFIGURED_FEEDBACK, UNCONFIGURED_QUOTE,
};
pub use gemini::GeminiFeedbackProvider;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Structured feedback for one session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionFeedback {
    pub summary: String,
    pub insights: Vec<String>,
    pub recommendations: Vec<String>,
    pub motivational_message: String,
}

/// Where a feedback payload came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeedbackSource {
    /// Parsed from a live model reply
    Live,
    /// A static fallback
    Fallback(FallbackTier),
}

/// Feedback payload tagged with its source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Feedback {
    pub content: SessionFeedback,
    pub source: FeedbackSource,
}

impl Feedback {
    /// Wraps a live payload.
    pub fn live(content: SessionFeedback) -> Self {
        Self {
            content,
            source: FeedbackSource::Live,
        }
    }

    /// Returns the static payload for `tier`.
    pub fn fallback(tier: FallbackTier) -> Self {
        Self {
            content: fallback_for(tier).to_feedback(),
            source: FeedbackSource::Fallback(tier),
        }
    }

    /// Returns the parse-failure payload carrying the raw reply as summary.
    pub fn parse_failure(raw_reply: &str) -> Self {
        let mut feedback = Self::fallback(FallbackTier::ParseFailure);
        let raw = raw_reply.trim();
        if !raw.is_empty() {
            feedback.content.summary = raw.to_string();
        }
        feedback
    }

    /// Returns the tier if this is a fallback.
    pub fn fallback_tier(&self) -> Option<FallbackTier> {
        match self.source {
            FeedbackSource::Live => None,
            FeedbackSource::Fallback(tier) => Some(tier),
        }
    }
}

/// Capability for fetching session feedback and motivational quotes.
///
/// Both methods may take as long as the remote call takes but never fail.
#[async_trait]
pub trait FeedbackProvider: Send + Sync {
    /// Returns feedback for a finished session.
    async fn get_feedback(&self, goal: &str, duration: u32, focus_rating: u8) -> Feedback;

    /// Returns a short motivational quote.
    async fn get_motivational_quote(&self) -> String;
}

/// Scripted provider for testing.
#[derive(Debug)]
pub struct MockFeedbackProvider {
    feedback: std::sync::Mutex<Feedback>,
    quote: std::sync::Mutex<String>,
    feedback_calls: std::sync::Mutex<Vec<(String, u32, u8)>>,
    quote_calls: std::sync::atomic::AtomicUsize,
}

impl Default for MockFeedbackProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl MockFeedbackProvider {
    /// Creates a mock answering with the unconfigured fallbacks.
    #[must_use]
    pub fn new() -> Self {
        Self {
            feedback: std::sync::Mutex::new(Feedback::fallback(FallbackTier::Unconfigured)),
            quote: std::sync::Mutex::new(UNCONFIGURED_QUOTE.to_string()),
            feedback_calls: std::sync::Mutex::new(Vec::new()),
            quote_calls: std::sync::atomic::AtomicUsize::new(0),
        }
    }

    pub fn set_feedback(&self, feedback: Feedback) {
        *self.feedback.lock().unwrap() = feedback;
    }

    pub fn set_quote(&self, quote: impl Into<String>) {
        *self.quote.lock().unwrap() = quote.into();
    }

    #[must_use]
    pub fn feedback_calls(&self) -> Vec<(String, u32, u8)> {
        self.feedback_calls.lock().unwrap().clone()
    }

    #[must_use]
    pub fn quote_call_count(&self) -> usize {
        self.quote_calls.load(std::sync::atomic::Ordering::SeqCst)
    }
}

#[async_trait]
impl FeedbackProvider for MockFeedbackProvider {
    async fn get_feedback(&self, goal: &str, duration: u32, focus_rating: u8) -> Feedback {
        self.feedback_calls
            .lock()
            .unwrap()
            .push((goal.to_string(), duration, focus_rating));
        self.feedback.lock().unwrap().clone()
    }

    async fn get_motivational_quote(&self) -> String {
        self.quote_calls
            .fetch_add(1, std::sync::atomic::Ordering::SeqCst);
        self.quote.lock().unwrap().clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_feedback_json_shape() {
        let json = r#"{
            "summary": "Solid session",
            "insights": ["Stayed on task"],
            "recommendations": ["Take a walk"],
            "motivationalMessage": "Nice!"
        }"#;
        let feedback: SessionFeedback = serde_json::from_str(json).unwrap();
        assert_eq!(feedback.summary, "Solid session");
        assert_eq!(feedback.motivational_message, "Nice!");
    }

    #[test]
    fn test_parse_failure_uses_raw_reply() {
        let feedback = Feedback::parse_failure("  Great job today.  ");
        assert_eq!(feedback.content.summary, "Great job today.");
        assert_eq!(feedback.fallback_tier(), Some(FallbackTier::ParseFailure));
        assert_eq!(feedback.content.insights, vec!["Session data recorded"]);
    }

    #[test]
    fn test_parse_failure_blank_reply_keeps_constant_summary() {
        let feedback = Feedback::parse_failure("   ");
        assert_eq!(feedback.content.summary, PARSE_FAILURE_FEEDBACK.summary);
    }

    #[test]
    fn test_live_has_no_tier() {
        let feedback = Feedback::live(UNCONFIGURED_FEEDBACK.to_feedback());
        assert_eq!(feedback.fallback_tier(), None);
        assert_eq!(feedback.source, FeedbackSource::Live);
    }

    #[tokio::test]
    async fn test_mock_records_calls() {
        let mock = MockFeedbackProvider::new();
        mock.set_quote("Go!");

        let feedback = mock.get_feedback("Read", 10, 7).await;
        assert_eq!(feedback.fallback_tier(), Some(FallbackTier::Unconfigured));
        assert_eq!(mock.get_motivational_quote().await, "Go!");

        assert_eq!(mock.feedback_calls(), vec![("Read".to_string(), 10, 7)]);
        assert_eq!(mock.quote_call_count(), 1);
    }
}
