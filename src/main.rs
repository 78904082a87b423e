//! Lock-In - a terminal focus timer
//!
//! Bind a goal and a duration, run the countdown, take breaks or forfeit,
//! rate your focus, and get feedback when the session ends.

use std::fs::{self, OpenOptions};
use std::path::Path;
use std::sync::{Arc, Mutex};

use anyhow::{Context, Result};
use clap::{CommandFactory, Parser};

use lockin::cli::{Cli, Commands, Display};
use lockin::feedback::{FeedbackProvider, GeminiFeedbackProvider};
use lockin::store::JsonFileStore;
use lockin::AppController;

/// Log file written while the terminal UI owns the screen.
const LOG_FILE: &str = "lockin.log";

/// Main entry point
#[tokio::main(flavor = "current_thread")]
async fn main() {
    // Parse command line arguments
    let cli = Cli::parse();

    // Initialize logging
    init_tracing(&cli);

    // Execute command
    if let Err(e) = execute(cli).await {
        Display::show_error(&format!("{e:#}"));
        std::process::exit(1);
    }
}

/// Returns true when the command takes over the terminal.
fn is_interactive(cli: &Cli) -> bool {
    matches!(cli.command, None | Some(Commands::Run))
}

/// Initializes the tracing subscriber for logging.
///
/// The interactive UI logs to a file in the data directory; other
/// commands log to stderr.
fn init_tracing(cli: &Cli) {
    use tracing_subscriber::{fmt, EnvFilter};

    let default_level = if cli.verbose { "info" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    if is_interactive(cli) {
        let data_dir = cli.data_dir();
        let file = fs::create_dir_all(&data_dir).and_then(|_| {
            OpenOptions::new()
                .create(true)
                .append(true)
                .open(data_dir.join(LOG_FILE))
        });
        match file {
            Ok(file) => {
                fmt()
                    .with_env_filter(filter)
                    .with_target(false)
                    .with_ansi(false)
                    .with_writer(Mutex::new(file))
                    .init();
            }
            Err(e) => {
                // Nowhere safe to log while the UI is up
                eprintln!("warning: logging disabled: {e}");
            }
        }
        return;
    }

    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .without_time()
        .with_writer(std::io::stderr)
        .init();
}

/// Executes the CLI command.
async fn execute(cli: Cli) -> Result<()> {
    // Set verbose logging if requested
    if cli.verbose {
        tracing::info!("Verbose mode enabled");
    }

    let data_dir = cli.data_dir();

    match cli.command {
        None | Some(Commands::Run) => {
            let provider = Arc::new(GeminiFeedbackProvider::new(cli.feedback_config()));
            lockin::tui::run(&data_dir, provider).await?;
        }
        Some(Commands::History) => {
            show_history(&data_dir)?;
        }
        Some(Commands::Quote) => {
            let provider = GeminiFeedbackProvider::new(cli.feedback_config());
            let quote = provider.get_motivational_quote().await;
            Display::show_quote(&quote);
        }
        Some(Commands::Completions { shell }) => {
            generate_completions(shell);
        }
    }

    Ok(())
}

/// Prints the recorded history from the data directory.
fn show_history(data_dir: &Path) -> Result<()> {
    let store = JsonFileStore::new(data_dir);
    if store.path().exists() {
        // Surface a corrupt slot here instead of silently showing nothing
        let content = fs::read_to_string(store.path())
            .with_context(|| format!("Failed to read {}", store.path().display()))?;
        lockin::store::decode_history(&content)
            .with_context(|| format!("Malformed history in {}", store.path().display()))?;
    }

    let controller = AppController::new(store);
    Display::show_history(controller.history());
    Ok(())
}

/// Generates shell completion scripts.
fn generate_completions(shell: clap_complete::Shell) {
    use clap_complete::generate;
    use std::io;

    let mut cmd = Cli::command();
    let bin_name = cmd.get_name().to_string();
    generate(shell, &mut cmd, bin_name, &mut io::stdout());
}

// ============================================================================
// Tests
// ============================================================================
