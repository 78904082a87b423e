//! Terminal User Interface (TUI) for the focus timer.
//!
//! Setup screen, countdown screen, history and feedback panes.
//! Built with ratatui and crossterm.
//!
//! The event loop multiplexes three sources on the current-thread runtime:
//! key presses from a blocking reader thread, timer ticks from a
//! [`TickSchedule`] armed only while the session counts down, and results
//! of feedback/quote requests running as spawned tasks.

mod app;
mod event;
mod ui;

pub use app::{App, Notice, Request, Screen, SetupField};
pub use event::{map_key, Action};

use std::io;
use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use crossterm::{
    event::Event,
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::prelude::*;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::app::AppController;
use crate::clock::Clock;
use crate::feedback::FeedbackProvider;
use crate::store::{JsonFileStore, SessionStore};
use crate::timer::TickSchedule;

/// Run the TUI application.
///
/// # Errors
///
/// Returns an error if the terminal fails to initialize or draw.
pub async fn run(data_dir: &Path, provider: Arc<dyn FeedbackProvider>) -> Result<()> {
    let store = JsonFileStore::new(data_dir);
    info!(path = %store.path().display(), "using session history");
    let mut app = App::new(AppController::new(store));

    // Setup terminal
    enable_raw_mode().context("Failed to enable raw mode")?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen).context("Failed to setup terminal")?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend).context("Failed to create terminal")?;

    let result = run_app(&mut terminal, &mut app, provider).await;

    // Restore terminal
    disable_raw_mode().ok();
    execute!(terminal.backend_mut(), LeaveAlternateScreen).ok();
    terminal.show_cursor().ok();

    if app.controller.engine().is_some() {
        info!("quit with an active session; it is not recorded");
    }

    result
}

/// Run the main application loop.
async fn run_app<B, S, C>(
    terminal: &mut Terminal<B>,
    app: &mut App<S, C>,
    provider: Arc<dyn FeedbackProvider>,
) -> Result<()>
where
    B: Backend,
    S: SessionStore,
    C: Clock,
{
    let mut events = spawn_event_reader();
    let (notice_tx, mut notices) = mpsc::unbounded_channel();
    let mut ticks = TickSchedule::every_second();

    loop {
        terminal
            .draw(|frame| ui::render(frame, app))
            .context("Failed to draw")?;

        ticks.sync(app.controller.is_counting());

        tokio::select! {
            event = events.recv() => {
                let Some(event) = event else { break };
                if let Event::Key(key) = event {
                    if let Some(action) = map_key(app.screen(), key) {
                        if !app.apply(action) {
                            break;
                        }
                    }
                }
            }
            _ = ticks.next() => app.on_tick(),
            Some(notice) = notices.recv() => app.on_notice(notice),
        }

        for request in app.take_requests() {
            spawn_request(Arc::clone(&provider), request, notice_tx.clone());
        }
    }

    ticks.cancel();
    Ok(())
}

/// Reads terminal events on a blocking thread and forwards them.
fn spawn_event_reader() -> mpsc::UnboundedReceiver<Event> {
    let (tx, rx) = mpsc::unbounded_channel();
    std::thread::spawn(move || loop {
        match crossterm::event::read() {
            Ok(event) => {
                if tx.send(event).is_err() {
                    break;
                }
            }
            Err(e) => {
                warn!(error = %e, "failed to read terminal event");
                break;
            }
        }
    });
    rx
}

/// Runs a feedback or quote request without blocking the loop.
fn spawn_request(
    provider: Arc<dyn FeedbackProvider>,
    request: Request,
    notices: mpsc::UnboundedSender<Notice>,
) {
    debug!(?request, "spawning request");
    tokio::spawn(async move {
        let notice = match request {
            Request::Feedback {
                goal,
                duration,
                focus_rating,
            } => {
                let feedback = provider.get_feedback(&goal, duration, focus_rating).await;
                Notice::Feedback { goal, feedback }
            }
            Request::Quote => Notice::Quote(provider.get_motivational_quote().await),
        };
        // Receiver is gone once the app quits
        let _ = notices.send(notice);
    });
}
