//! UI rendering for the TUI.

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Gauge, List, ListItem, Paragraph, Wrap},
    Frame,
};

use crate::cli::Display;
use crate::clock::Clock;
use crate::feedback::FeedbackSource;
use crate::store::SessionStore;
use crate::timer::TimerPhase;
use crate::tui::app::{App, Screen, SetupField};

/// Render the application UI.
pub fn render<S: SessionStore, C: Clock>(frame: &mut Frame<'_>, app: &App<S, C>) {
    // Header, body, status bar
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(0),
            Constraint::Length(1),
        ])
        .split(frame.area());

    let body = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
        .split(chunks[1]);

    let side = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(body[1]);

    render_header(frame, app, chunks[0]);
    match app.screen() {
        Screen::Setup => render_setup(frame, app, body[0]),
        Screen::Timer => render_timer(frame, app, body[0]),
    }
    render_history(frame, app, side[0]);
    render_feedback(frame, app, side[1]);
    render_status_bar(frame, app, chunks[2]);
}

fn bordered(title: &str) -> Block<'static> {
    Block::default()
        .title(format!(" {title} "))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan))
}

fn render_header<S: SessionStore, C: Clock>(frame: &mut Frame<'_>, app: &App<S, C>, area: Rect) {
    let subtitle = match &app.quote {
        Some(quote) => format!(" Lock-In  \"{}\" ", quote.trim()),
        None => " Lock-In ".to_string(),
    };

    let header = Paragraph::new(subtitle)
        .style(
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Cyan)),
        );

    frame.render_widget(header, area);
}

fn render_setup<S: SessionStore, C: Clock>(frame: &mut Frame<'_>, app: &App<S, C>, area: Rect) {
    let field_style = |field: SetupField| {
        if app.field == field {
            Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)
        } else {
            Style::default()
        }
    };

    let mut lines = vec![
        Line::from(vec![
            Span::styled("Goal:     ", field_style(SetupField::Goal)),
            Span::raw(app.setup.goal().to_string()),
        ]),
        Line::from(vec![
            Span::styled("Duration: ", field_style(SetupField::Duration)),
            Span::raw(format!("{} min", app.duration_input)),
        ]),
        Line::default(),
    ];

    if let Some(draft) = app.controller.current_draft() {
        lines.push(Line::from(Span::styled(
            format!("Bound: {} ({} min)", draft.goal(), draft.duration()),
            Style::default().fg(Color::Green),
        )));
    }

    let paragraph = Paragraph::new(lines)
        .block(bordered("Set Your Commitment"))
        .wrap(Wrap { trim: false });
    frame.render_widget(paragraph, area);
}

fn render_timer<S: SessionStore, C: Clock>(frame: &mut Frame<'_>, app: &App<S, C>, area: Rect) {
    let Some(engine) = app.controller.engine() else {
        return;
    };
    let session = engine.session();

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(0), Constraint::Length(3)])
        .split(area);

    let phase_color = match engine.phase() {
        TimerPhase::Running => Color::Green,
        TimerPhase::Paused => Color::Yellow,
        TimerPhase::OnBreak => Color::Blue,
        TimerPhase::Ended => Color::DarkGray,
    };

    let lines = vec![
        Line::from(Span::styled(
            session.goal().to_string(),
            Style::default().add_modifier(Modifier::BOLD),
        )),
        Line::default(),
        Line::from(Span::styled(
            Display::format_clock(engine.remaining_seconds()),
            Style::default().fg(phase_color).add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(
            engine.phase().as_str().to_string(),
            Style::default().fg(phase_color),
        )),
        Line::default(),
        Line::from(format!("Focus: {}", engine.focus_rating())),
    ];

    let title = if app.controller.in_break() {
        "Break Time"
    } else {
        "Focus Time"
    };
    let paragraph = Paragraph::new(lines).block(bordered(title));
    frame.render_widget(paragraph, chunks[0]);

    let gauge = Gauge::default()
        .block(Block::default().borders(Borders::ALL))
        .gauge_style(Style::default().fg(phase_color))
        .ratio(session.progress().clamp(0.0, 1.0));
    frame.render_widget(gauge, chunks[1]);
}

fn render_history<S: SessionStore, C: Clock>(frame: &mut Frame<'_>, app: &App<S, C>, area: Rect) {
    let history = app.controller.history();
    let items: Vec<ListItem<'_>> = Display::history_lines(history)
        .into_iter()
        .map(ListItem::new)
        .collect();

    let list = List::new(items).block(bordered(&Display::history_title(history)));
    frame.render_widget(list, area);
}

fn render_feedback<S: SessionStore, C: Clock>(frame: &mut Frame<'_>, app: &App<S, C>, area: Rect) {
    let lines: Vec<Line<'_>> = if app.feedback_pending {
        vec![Line::from(Span::styled(
            "Analyzing your session...",
            Style::default().fg(Color::DarkGray),
        ))]
    } else if let Some((goal, feedback)) = &app.feedback {
        let mut lines = vec![Line::from(Span::styled(
            goal.clone(),
            Style::default().add_modifier(Modifier::BOLD),
        ))];
        lines.extend(
            Display::feedback_lines(&feedback.content)
                .into_iter()
                .map(Line::from),
        );
        if let FeedbackSource::Fallback(tier) = feedback.source {
            lines.push(Line::from(Span::styled(
                format!("({})", tier.as_str()),
                Style::default().fg(Color::DarkGray),
            )));
        }
        lines
    } else {
        Vec::new()
    };

    let paragraph = Paragraph::new(lines)
        .block(bordered("Feedback"))
        .wrap(Wrap { trim: true });
    frame.render_widget(paragraph, area);
}

fn render_status_bar<S: SessionStore, C: Clock>(
    frame: &mut Frame<'_>,
    app: &App<S, C>,
    area: Rect,
) {
    let help = match app.screen() {
        Screen::Setup if app.ready_to_start() => "Enter:start  Tab:field  Esc:quit",
        Screen::Setup => "Enter:commit  Tab:field  Up/Down:duration  Esc:quit",
        Screen::Timer => "Space:run/pause  b:break  f:forfeit  Left/Right:focus  q:quit",
    };

    let status_text = if let Some(ref msg) = app.status {
        format!(" {msg} | {help}")
    } else {
        format!(" {help}")
    };

    let status = Paragraph::new(status_text).style(Style::default().fg(Color::DarkGray));
    frame.render_widget(status, area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::AppController;
    use crate::clock::MockClock;
    use crate::store::MockSessionStore;
    use ratatui::{backend::TestBackend, Terminal};

    fn screen_text(app: &App<MockSessionStore, MockClock>) -> String {
        let mut terminal = Terminal::new(TestBackend::new(120, 30)).unwrap();
        terminal.draw(|frame| render(frame, app)).unwrap();
        let buffer = terminal.backend().buffer();
        buffer
            .content()
            .chunks(buffer.area.width as usize)
            .map(|row| row.iter().map(|cell| cell.symbol()).collect::<String>())
            .collect::<Vec<_>>()
            .join("\n")
    }

    #[test]
    fn test_history_pane_is_chronological() {
        let content = r#"[
            {"goal":"First","duration":5,"focusRating":4,"penalties":0,"startTime":1000,"endTime":2000},
            {"goal":"Second","duration":10,"focusRating":7,"penalties":0,"startTime":3000,"endTime":4000}
        ]"#;
        let controller =
            AppController::with_clock(MockSessionStore::with_content(content), MockClock::default());
        let app = App::new(controller);

        let text = screen_text(&app);
        let first = text.find("First - 5min").expect("first record shown");
        let second = text.find("Second - 10min").expect("second record shown");
        assert!(first < second);
        assert!(text.contains("Session History (2)"));
    }
}
