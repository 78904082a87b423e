//! Gemini REST implementation of the feedback provider.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::{
    FallbackTier, Feedback, FeedbackConfig, FeedbackError, FeedbackProvider, SessionFeedback,
    CALL_FAILURE_QUOTE, UNCONFIGURED_QUOTE,
};

const API_KEY_HEADER: &str = "x-goog-api-key";

const QUOTE_PROMPT: &str =
    "Generate a short motivational quote for someone about to start a focus session.";

/// Builds the feedback prompt for a finished session.
pub fn feedback_prompt(goal: &str, duration: u32, focus_rating: u8) -> String {
    format!(
        "Provide feedback for a focus session with these metrics:\n\
         Goal: {goal}\n\
         Duration: {duration} minutes\n\
         Focus Rating: {focus_rating}/10\n\
         \n\
         Respond in JSON format with: summary, insights (array), recommendations (array), \
         and motivationalMessage (string)."
    )
}

/// Parses a model reply into structured feedback.
///
/// Accepts bare JSON or JSON wrapped in a Markdown code fence.
pub fn parse_feedback(reply: &str) -> Result<SessionFeedback, serde_json::Error> {
    serde_json::from_str(strip_code_fence(reply))
}

fn strip_code_fence(reply: &str) -> &str {
    let trimmed = reply.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let body = match rest.split_once('\n') {
        // Drop the info string ("json") on the opening fence line
        Some((_, body)) => body,
        // Single-line fence
        None => rest.strip_prefix("json").unwrap_or(rest),
    };
    body.trim_end().strip_suffix("```").unwrap_or(body).trim()
}

/// Feedback provider backed by the Gemini `generateContent` endpoint.
#[derive(Debug, Clone)]
pub struct GeminiFeedbackProvider {
    client: Client,
    config: FeedbackConfig,
}

impl GeminiFeedbackProvider {
    /// Creates a provider. Remote calls are attempted only with an API key.
    pub fn new(config: FeedbackConfig) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()
            .unwrap_or_else(|e| {
                warn!(error = %e, "falling back to default HTTP client");
                Client::new()
            });

        if !config.is_configured() {
            warn!("feedback API key not configured; using static feedback");
        }

        Self { client, config }
    }

    /// Returns true if remote calls will be attempted.
    pub fn is_configured(&self) -> bool {
        self.config.is_configured()
    }

    /// Sends one prompt and returns the reply text.
    pub async fn generate(&self, prompt: &str) -> Result<String, FeedbackError> {
        let api_key = self.config.api_key().ok_or(FeedbackError::NotConfigured)?;
        let url = format!(
            "{}/{}:generateContent",
            self.config.base_url.trim_end_matches('/'),
            self.config.model
        );
        let body = GenerateContentRequest {
            contents: vec![Content {
                role: "user",
                parts: vec![Part { text: prompt }],
            }],
        };

        debug!(model = %self.config.model, "sending generateContent request");
        let response = self
            .client
            .post(url)
            .header(API_KEY_HEADER, api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| self.map_transport_error(e))?;

        let status = response.status();
        if !status.is_success() {
            let body_text = response.text().await.unwrap_or_default();
            return Err(map_http_error(status, &body_text));
        }

        let parsed: GenerateContentResponse = response
            .json()
            .await
            .map_err(|e| self.map_transport_error(e))?;

        extract_text(parsed).ok_or(FeedbackError::EmptyResponse)
    }

    fn map_transport_error(&self, err: reqwest::Error) -> FeedbackError {
        if err.is_timeout() {
            FeedbackError::Timeout(self.config.timeout_seconds)
        } else {
            FeedbackError::Request(err.to_string())
        }
    }
}

#[async_trait]
impl FeedbackProvider for GeminiFeedbackProvider {
    async fn get_feedback(&self, goal: &str, duration: u32, focus_rating: u8) -> Feedback {
        if !self.is_configured() {
            return Feedback::fallback(FallbackTier::Unconfigured);
        }

        let prompt = feedback_prompt(goal, duration, focus_rating);
        match self.generate(&prompt).await {
            Ok(reply) => match parse_feedback(&reply) {
                Ok(content) => Feedback::live(content),
                Err(e) => {
                    warn!(error = %e, "feedback reply was not the requested JSON");
                    Feedback::parse_failure(&reply)
                }
            },
            Err(e) => {
                warn!(error = %e, suggestion = e.suggestion(), "feedback request failed");
                Feedback::fallback(FallbackTier::CallFailure)
            }
        }
    }

    async fn get_motivational_quote(&self) -> String {
        if !self.is_configured() {
            return UNCONFIGURED_QUOTE.to_string();
        }

        match self.generate(QUOTE_PROMPT).await {
            Ok(quote) if !quote.trim().is_empty() => quote.trim().to_string(),
            Ok(_) => CALL_FAILURE_QUOTE.to_string(),
            Err(e) => {
                warn!(error = %e, "quote request failed");
                CALL_FAILURE_QUOTE.to_string()
            }
        }
    }
}

// ============================================================================
// Wire types
// ============================================================================

#[derive(Serialize)]
struct GenerateContentRequest<'a> {
    contents: Vec<Content<'a>>,
}

#[derive(Serialize)]
struct Content<'a> {
    role: &'a str,
    parts: Vec<Part<'a>>,
}

#[derive(Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Deserialize)]
struct GenerateContentResponse {
    candidates: Option<Vec<Candidate>>,
}

#[derive(Deserialize)]
struct Candidate {
    content: Option<ContentResponse>,
}

#[derive(Deserialize)]
struct ContentResponse {
    #[serde(default)]
    parts: Vec<PartResponse>,
}

#[derive(Deserialize)]
struct PartResponse {
    text: Option<String>,
}

#[derive(Deserialize)]
struct ErrorWrapper {
    error: ErrorBody,
}

#[derive(Deserialize)]
struct ErrorBody {
    message: Option<String>,
    status: Option<String>,
}

fn extract_text(response: GenerateContentResponse) -> Option<String> {
    let text: String = response
        .candidates?
        .into_iter()
        .next()?
        .content?
        .parts
        .into_iter()
        .filter_map(|part| part.text)
        .collect();
    (!text.trim().is_empty()).then_some(text)
}

fn map_http_error(status: StatusCode, body: &str) -> FeedbackError {
    let message = serde_json::from_str::<ErrorWrapper>(body)
        .map(|wrapper| {
            let msg = wrapper.error.message.unwrap_or_else(|| body.to_string());
            match wrapper.error.status {
                Some(status_text) if !status_text.is_empty() => format!("{status_text}: {msg}"),
                _ => msg,
            }
        })
        .unwrap_or_else(|_| body.to_string());

    FeedbackError::Status {
        code: status.as_u16(),
        message,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    mod parse_tests {
        use super::*;

        const REPLY: &str = r#"{"summary":"Good","insights":["a"],"recommendations":["b"],"motivationalMessage":"c"}"#;

        #[test]
        fn test_parse_bare_json() {
            let feedback = parse_feedback(REPLY).unwrap();
            assert_eq!(feedback.summary, "Good");
        }

        #[test]
        fn test_parse_fenced_json() {
            let fenced = format!("```json\n{REPLY}\n```\n");
            assert_eq!(parse_feedback(&fenced).unwrap().summary, "Good");

            let bare_fence = format!("```\n{REPLY}\n```");
            assert_eq!(parse_feedback(&bare_fence).unwrap().insights, vec!["a"]);
        }

        #[test]
        fn test_parse_single_line_fence() {
            let inline = format!("```{REPLY}```");
            assert_eq!(parse_feedback(&inline).unwrap().summary, "Good");

            let tagged = format!("```json {REPLY} ```");
            assert_eq!(parse_feedback(&tagged).unwrap().summary, "Good");
        }

        #[test]
        fn test_parse_free_text_fails() {
            assert!(parse_feedback("You did great, keep going!").is_err());
        }

        #[test]
        fn test_parse_missing_field_fails() {
            assert!(parse_feedback(r#"{"summary":"only"}"#).is_err());
        }
    }

    mod prompt_tests {
        use super::*;

        #[test]
        fn test_prompt_embeds_metrics() {
            let prompt = feedback_prompt("Write report", 25, 8);
            assert!(prompt.contains("Goal: Write report"));
            assert!(prompt.contains("Duration: 25 minutes"));
            assert!(prompt.contains("Focus Rating: 8/10"));
            assert!(prompt.contains("motivationalMessage"));
        }
    }

    mod response_tests {
        use super::*;

        #[test]
        fn test_extract_text_joins_parts() {
            let response: GenerateContentResponse = serde_json::from_str(
                r#"{"candidates":[{"content":{"parts":[{"text":"Hello "},{"text":"world"}]}}]}"#,
            )
            .unwrap();
            assert_eq!(extract_text(response).as_deref(), Some("Hello world"));
        }

        #[test]
        fn test_extract_text_empty() {
            let response: GenerateContentResponse =
                serde_json::from_str(r#"{"candidates":[]}"#).unwrap();
            assert!(extract_text(response).is_none());

            let response: GenerateContentResponse = serde_json::from_str("{}").unwrap();
            assert!(extract_text(response).is_none());
        }

        #[test]
        fn test_map_http_error_reads_wrapper() {
            let body = r#"{"error":{"code":403,"message":"API key not valid","status":"PERMISSION_DENIED"}}"#;
            let err = map_http_error(StatusCode::FORBIDDEN, body);
            assert_eq!(
                err,
                FeedbackError::Status {
                    code: 403,
                    message: "PERMISSION_DENIED: API key not valid".to_string()
                }
            );
        }

        #[test]
        fn test_map_http_error_plain_body() {
            let err = map_http_error(StatusCode::BAD_GATEWAY, "upstream down");
            assert_eq!(
                err,
                FeedbackError::Status {
                    code: 502,
                    message: "upstream down".to_string()
                }
            );
        }
    }

    mod provider_tests {
        use super::*;

        #[tokio::test]
        async fn test_unconfigured_feedback_is_deterministic() {
            let provider = GeminiFeedbackProvider::new(FeedbackConfig::default());
            let first = provider.get_feedback("Read", 10, 5).await;
            let second = provider.get_feedback("Write", 60, 9).await;
            assert_eq!(first, second);
            assert_eq!(first.fallback_tier(), Some(FallbackTier::Unconfigured));
        }

        #[tokio::test]
        async fn test_unconfigured_quote() {
            let provider = GeminiFeedbackProvider::new(FeedbackConfig::default());
            assert_eq!(provider.get_motivational_quote().await, UNCONFIGURED_QUOTE);
        }

        #[tokio::test]
        async fn test_generate_without_key_is_not_configured() {
            let provider = GeminiFeedbackProvider::new(FeedbackConfig::default());
            let err = provider.generate("hi").await.unwrap_err();
            assert!(err.is_not_configured());
        }
    }
}
