//! Command definitions for the focus timer binary.
//!
//! Uses clap derive macro for argument parsing.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::feedback::{FeedbackConfig, API_KEY_ENV};
use crate::store::{default_data_dir, DATA_DIR_ENV};

// ============================================================================
// CLI Structure
// ============================================================================

/// Lock-In - bind a goal, run the clock, rate your focus
#[derive(Parser, Debug)]
#[command(
    name = "lockin",
    version,
    about = "Focus timer with goal binding, focus ratings and AI feedback",
    long_about = "Set a goal and a duration, run the countdown, take breaks or forfeit,\n\
                  rate your focus, and get feedback on the session.",
    propagate_version = true
)]
pub struct Cli {
    /// Subcommand to execute (defaults to `run`)
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Enable verbose output for debugging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Directory holding the session history and log file
    #[arg(long, global = true, env = DATA_DIR_ENV, value_name = "DIR")]
    pub data_dir: Option<PathBuf>,

    /// API key for the feedback service
    #[arg(long, global = true, env = API_KEY_ENV, hide_env_values = true)]
    pub api_key: Option<String>,
}

impl Cli {
    /// Returns the data directory, falling back to the platform default.
    pub fn data_dir(&self) -> PathBuf {
        self.data_dir.clone().unwrap_or_else(default_data_dir)
    }

    /// Builds the feedback configuration from the arguments.
    pub fn feedback_config(&self) -> FeedbackConfig {
        FeedbackConfig::default().with_api_key(self.api_key.clone())
    }
}

// ============================================================================
// Subcommands
// ============================================================================

/// Available subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Start the interactive focus timer
    Run,

    /// Print the recorded session history
    History,

    /// Print a motivational quote
    Quote,

    /// Generate shell completion scripts
    Completions {
        /// Shell type for completion script
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    mod cli_tests {
        use super::*;

        #[test]
        fn test_parse_no_args() {
            let cli = Cli::parse_from(["lockin"]);
            assert!(cli.command.is_none());
            assert!(!cli.verbose);
        }

        #[test]
        fn test_parse_verbose_flag() {
            let cli = Cli::parse_from(["lockin", "-v"]);
            assert!(cli.verbose);
        }

        #[test]
        fn test_parse_run_command() {
            let cli = Cli::parse_from(["lockin", "run"]);
            assert!(matches!(cli.command, Some(Commands::Run)));
        }

        #[test]
        fn test_parse_history_command() {
            let cli = Cli::parse_from(["lockin", "history"]);
            assert!(matches!(cli.command, Some(Commands::History)));
        }

        #[test]
        fn test_parse_quote_command() {
            let cli = Cli::parse_from(["lockin", "quote"]);
            assert!(matches!(cli.command, Some(Commands::Quote)));
        }

        #[test]
        fn test_parse_completions_zsh() {
            let cli = Cli::parse_from(["lockin", "completions", "zsh"]);
            match cli.command {
                Some(Commands::Completions { shell }) => {
                    assert_eq!(shell, clap_complete::Shell::Zsh);
                }
                _ => panic!("Expected Completions command"),
            }
        }

        #[test]
        fn test_parse_invalid_shell() {
            let result = Cli::try_parse_from(["lockin", "completions", "cmd"]);
            assert!(result.is_err());
        }

        #[test]
        fn test_data_dir_flag_after_subcommand() {
            let cli = Cli::parse_from(["lockin", "history", "--data-dir", "/tmp/lockin-test"]);
            assert_eq!(cli.data_dir(), PathBuf::from("/tmp/lockin-test"));
        }

        #[test]
        fn test_api_key_flag_configures_feedback() {
            let cli = Cli::parse_from(["lockin", "--api-key", "k-123", "quote"]);
            assert!(cli.feedback_config().is_configured());
        }

        #[test]
        fn test_blank_api_key_is_unconfigured() {
            let cli = Cli::parse_from(["lockin", "--api-key", " ", "quote"]);
            assert!(!cli.feedback_config().is_configured());
        }
    }
}
