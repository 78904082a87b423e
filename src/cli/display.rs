//! Display utilities for the focus timer.
//!
//! This module provides formatted output for:
//! - Session history lines
//! - Countdown clock text
//! - Feedback and quotes
//! - Error messages

use crate::feedback::SessionFeedback;
use crate::types::{SessionHistory, SessionRecord};

/// Shown when no session has been recorded yet.
pub const EMPTY_HISTORY_MESSAGE: &str = "No sessions yet. Start your first focus session!";

// ============================================================================
// Display
// ============================================================================

/// Display utilities for terminal output.
pub struct Display;

impl Display {
    /// Prints the session history.
    pub fn show_history(history: &SessionHistory) {
        println!("{}", Self::history_title(history));
        println!("─────────────────────────────");
        for line in Self::history_lines(history) {
            println!("{line}");
        }
    }

    /// Prints a motivational quote.
    pub fn show_quote(quote: &str) {
        println!("\"{}\"", quote.trim());
    }

    /// Shows an error message.
    pub fn show_error(message: &str) {
        eprintln!("error: {}", message);
    }

    /// Heading for the history list.
    pub fn history_title(history: &SessionHistory) -> String {
        format!("Session History ({})", history.len())
    }

    /// One line per record, or the empty-state message.
    pub fn history_lines(history: &SessionHistory) -> Vec<String> {
        if history.is_empty() {
            return vec![EMPTY_HISTORY_MESSAGE.to_string()];
        }
        history.iter().map(Self::record_line).collect()
    }

    /// Formats one record.
    pub fn record_line(record: &SessionRecord) -> String {
        format!(
            "{} - {}min - Focus: {} - Penalties: {}",
            record.goal, record.duration, record.focus_rating, record.penalties
        )
    }

    /// Formats feedback as display lines.
    pub fn feedback_lines(feedback: &SessionFeedback) -> Vec<String> {
        let mut lines = vec![feedback.summary.clone()];
        lines.extend(feedback.insights.iter().map(|i| format!("  * {i}")));
        lines.extend(feedback.recommendations.iter().map(|r| format!("  > {r}")));
        lines.push(feedback.motivational_message.clone());
        lines
    }

    /// Formats seconds as a zero-padded `MM:SS` clock.
    pub fn format_clock(total_seconds: u32) -> String {
        let (minutes, seconds) = Self::format_time(total_seconds);
        format!("{:02}:{:02}", minutes, seconds)
    }

    /// Formats remaining seconds as (minutes, seconds).
    fn format_time(total_seconds: u32) -> (u32, u32) {
        let minutes = total_seconds / 60;
        let seconds = total_seconds % 60;
        (minutes, seconds)
    }
}

// ============================================================================
// Tests
// ============================================================================
