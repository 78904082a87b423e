//! Application state for the TUI.

use tracing::debug;

use crate::app::AppController;
use crate::clock::{Clock, SystemClock};
use crate::feedback::Feedback;
use crate::setup::SetupFlow;
use crate::store::SessionStore;
use crate::tui::event::Action;
use crate::types::{SessionRecord, MAX_SUGGESTED_DURATION_MINUTES, MIN_DURATION_MINUTES};

/// Longest duration text the input accepts.
const DURATION_INPUT_MAX_LEN: usize = 4;

/// Which screen is showing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    /// Goal and duration form
    Setup,
    /// Countdown for the active session
    Timer,
}

/// Focused field on the setup screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SetupField {
    Goal,
    Duration,
}

/// Background work the event loop should start.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Request {
    /// Fetch feedback for a finished session
    Feedback {
        goal: String,
        duration: u32,
        focus_rating: u8,
    },
    /// Fetch a motivational quote
    Quote,
}

/// Result of background work, delivered back to the event loop.
#[derive(Debug, Clone)]
pub enum Notice {
    Feedback { goal: String, feedback: Feedback },
    Quote(String),
}

/// Application state.
pub struct App<S, C = SystemClock> {
    /// Session lifecycle and history.
    pub controller: AppController<S, C>,
    /// Setup form values.
    pub setup: SetupFlow,
    /// Raw text of the duration field.
    pub duration_input: String,
    /// Focused setup field.
    pub field: SetupField,
    /// Latest feedback and the goal it belongs to.
    pub feedback: Option<(String, Feedback)>,
    /// Whether a feedback request is in flight.
    pub feedback_pending: bool,
    /// Latest motivational quote.
    pub quote: Option<String>,
    /// Status message to display.
    pub status: Option<String>,
    /// Whether the form changed since the last commit.
    dirty: bool,
    requests: Vec<Request>,
}

impl<S: SessionStore, C: Clock> App<S, C> {
    /// Create a new app instance around a loaded controller.
    pub fn new(controller: AppController<S, C>) -> Self {
        let setup = SetupFlow::new();
        let duration_input = setup.duration().to_string();
        Self {
            controller,
            setup,
            duration_input,
            field: SetupField::Goal,
            feedback: None,
            feedback_pending: false,
            quote: None,
            status: None,
            dirty: true,
            requests: Vec::new(),
        }
    }

    /// Returns the screen to show.
    pub fn screen(&self) -> Screen {
        if self.controller.engine().is_some() {
            Screen::Timer
        } else {
            Screen::Setup
        }
    }

    /// Returns true if Enter would start the committed draft.
    pub fn ready_to_start(&self) -> bool {
        self.controller.current_draft().is_some() && !self.dirty
    }

    /// Applies an action. Returns false when the app should quit.
    pub fn apply(&mut self, action: Action) -> bool {
        match action {
            Action::Quit => return false,
            Action::Input(c) => self.input(c),
            Action::Backspace => self.backspace(),
            Action::NextField => {
                self.field = match self.field {
                    SetupField::Goal => SetupField::Duration,
                    SetupField::Duration => SetupField::Goal,
                };
            }
            Action::StepDuration(delta) => self.step_duration(delta),
            Action::Submit => self.submit(),
            Action::ToggleRunning => {
                self.controller.toggle_running();
            }
            Action::ToggleBreak => {
                self.controller.toggle_break();
            }
            Action::Forfeit => {
                if let Some(record) = self.controller.forfeit() {
                    self.finished(record, "Session forfeited");
                }
            }
            Action::AdjustRating(delta) => {
                if let Some(engine) = self.controller.engine() {
                    let rating = engine.focus_rating().adjusted(delta);
                    self.controller.set_focus_rating(rating);
                }
            }
        }
        true
    }

    /// Handles one timer tick.
    pub fn on_tick(&mut self) {
        if let Some(record) = self.controller.tick() {
            self.finished(record, "Session complete");
        }
    }

    /// Handles the result of background work.
    pub fn on_notice(&mut self, notice: Notice) {
        match notice {
            Notice::Feedback { goal, feedback } => {
                debug!(goal = %goal, source = ?feedback.source, "feedback received");
                self.feedback = Some((goal, feedback));
                self.feedback_pending = false;
            }
            Notice::Quote(quote) => self.quote = Some(quote),
        }
    }

    /// Drains queued background requests.
    pub fn take_requests(&mut self) -> Vec<Request> {
        std::mem::take(&mut self.requests)
    }

    fn input(&mut self, c: char) {
        match self.field {
            SetupField::Goal => {
                let mut goal = self.setup.goal().to_string();
                goal.push(c);
                self.setup.set_goal(goal);
            }
            SetupField::Duration => {
                if !c.is_ascii_digit() || self.duration_input.len() >= DURATION_INPUT_MAX_LEN {
                    return;
                }
                self.duration_input.push(c);
                self.setup.set_duration_input(&self.duration_input);
            }
        }
        self.dirty = true;
    }

    fn backspace(&mut self) {
        match self.field {
            SetupField::Goal => {
                let mut goal = self.setup.goal().to_string();
                goal.pop();
                self.setup.set_goal(goal);
            }
            SetupField::Duration => {
                self.duration_input.pop();
                self.setup.set_duration_input(&self.duration_input);
            }
        }
        self.dirty = true;
    }

    fn step_duration(&mut self, delta: i32) {
        let current = i64::from(self.setup.duration());
        let stepped = (current + i64::from(delta)).clamp(
            i64::from(MIN_DURATION_MINUTES),
            i64::from(MAX_SUGGESTED_DURATION_MINUTES),
        );
        self.setup.set_duration(stepped as u32);
        self.duration_input = self.setup.duration().to_string();
        self.dirty = true;
    }

    fn submit(&mut self) {
        if self.ready_to_start() {
            if self.controller.start_session() {
                self.requests.push(Request::Quote);
                self.status = Some("Locked in. Press SPACE to start the clock".to_string());
            }
            return;
        }

        match self.setup.commit() {
            Some(draft) => {
                self.controller.commit_draft(draft);
                self.dirty = false;
                self.status = Some("Commitment bound. Press Enter to START".to_string());
            }
            None => {
                self.status = Some("Enter a goal first".to_string());
            }
        }
    }

    fn finished(&mut self, record: SessionRecord, message: &str) {
        self.requests.push(Request::Feedback {
            goal: record.goal.clone(),
            duration: record.duration,
            focus_rating: record.focus_rating.value(),
        });
        self.feedback_pending = true;
        self.setup = SetupFlow::new();
        self.duration_input = self.setup.duration().to_string();
        self.field = SetupField::Goal;
        self.dirty = true;
        self.status = Some(format!("{message}: {}", record.goal));
    }
}
