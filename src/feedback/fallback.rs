//! Static fallback payloads returned when live feedback is unavailable.

use serde::{Deserialize, Serialize};

use super::SessionFeedback;

/// Which degraded path produced a payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FallbackTier {
    /// No API credential configured
    Unconfigured,
    /// The model answered, but not with the requested JSON
    ParseFailure,
    /// The call itself failed
    CallFailure,
}

impl FallbackTier {
    /// Returns the string representation of the tier.
    pub fn as_str(&self) -> &'static str {
        match self {
            FallbackTier::Unconfigured => "unconfigured",
            FallbackTier::ParseFailure => "parse_failure",
            FallbackTier::CallFailure => "call_failure",
        }
    }
}

/// Compile-time feedback payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FallbackFeedback {
    pub summary: &'static str,
    pub insights: &'static [&'static str],
    pub recommendations: &'static [&'static str],
    pub motivational_message: &'static str,
}

impl FallbackFeedback {
    /// Builds an owned payload.
    pub fn to_feedback(&self) -> SessionFeedback {
        SessionFeedback {
            summary: self.summary.to_string(),
            insights: self.insights.iter().map(|s| s.to_string()).collect(),
            recommendations: self.recommendations.iter().map(|s| s.to_string()).collect(),
            motivational_message: self.motivational_message.to_string(),
        }
    }
}

/// Payload when no API credential is configured.
pub const UNCONFIGURED_FEEDBACK: FallbackFeedback = FallbackFeedback {
    summary: "Session completed",
    insights: &["Keep up the good work"],
    recommendations: &["Set clearer goals for next session"],
    motivational_message: "You are building great focus habits!",
};

/// Payload when the model reply is not the requested JSON.
///
/// The raw reply replaces `summary` unless it is blank.
pub const PARSE_FAILURE_FEEDBACK: FallbackFeedback = FallbackFeedback {
    summary: "Session feedback received",
    insights: &["Session data recorded"],
    recommendations: &["Continue building your focus practice"],
    motivational_message: "Great effort on your focus session!",
};

/// Payload when the remote call fails.
pub const CALL_FAILURE_FEEDBACK: FallbackFeedback = FallbackFeedback {
    summary: "Session completed successfully",
    insights: &["You showed commitment to your goal"],
    recommendations: &["Review your next session goals"],
    motivational_message: "Keep pushing towards your goals!",
};

/// Quote when no API credential is configured.
pub const UNCONFIGURED_QUOTE: &str = "You have the power to achieve your goals. Stay focused!";

/// Quote when the remote call fails.
pub const CALL_FAILURE_QUOTE: &str = "Focus is the gateway to success. You got this!";

/// Returns the static payload for a tier.
pub fn fallback_for(tier: FallbackTier) -> &'static FallbackFeedback {
    match tier {
        FallbackTier::Unconfigured => &UNCONFIGURED_FEEDBACK,
        FallbackTier::ParseFailure => &PARSE_FAILURE_FEEDBACK,
        FallbackTier::CallFailure => &CALL_FAILURE_FEEDBACK,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tiers_are_distinct() {
        let payloads = [
            UNCONFIGURED_FEEDBACK.to_feedback(),
            PARSE_FAILURE_FEEDBACK.to_feedback(),
            CALL_FAILURE_FEEDBACK.to_feedback(),
        ];
        assert_ne!(payloads[0], payloads[1]);
        assert_ne!(payloads[1], payloads[2]);
        assert_ne!(payloads[0], payloads[2]);
    }

    #[test]
    fn test_tiers_share_shape() {
        for tier in [
            FallbackTier::Unconfigured,
            FallbackTier::ParseFailure,
            FallbackTier::CallFailure,
        ] {
            let feedback = fallback_for(tier).to_feedback();
            assert!(!feedback.summary.is_empty());
            assert_eq!(feedback.insights.len(), 1);
            assert_eq!(feedback.recommendations.len(), 1);
            assert!(!feedback.motivational_message.is_empty());
        }
    }

    #[test]
    fn test_quotes_differ() {
        assert_ne!(UNCONFIGURED_QUOTE, CALL_FAILURE_QUOTE);
    }

    #[test]
    fn test_tier_as_str() {
        assert_eq!(FallbackTier::Unconfigured.as_str(), "unconfigured");
        assert_eq!(FallbackTier::ParseFailure.as_str(), "parse_failure");
        assert_eq!(FallbackTier::CallFailure.as_str(), "call_failure");
    }
}
