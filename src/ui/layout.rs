//! Layout components (sidebar, status bar)

use crate::app::App;
use crate::state::{Focus, SubmissionStatus};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

/// Sidebar width in columns
const SIDEBAR_WIDTH: u16 = 34;

/// Create the main layout with sidebar
pub fn create_layout(area: Rect) -> (Rect, Rect) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Length(SIDEBAR_WIDTH), // Sidebar
            Constraint::Min(0),                // Main content
        ])
        .split(area);

    // Reserve bottom line for status bar
    let main_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(0),    // Content
            Constraint::Length(1), // Status bar
        ])
        .split(chunks[1]);

    let sidebar_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(0),    // Sidebar content
            Constraint::Length(1), // Status bar continuation
        ])
        .split(chunks[0]);

    (sidebar_chunks[0], main_chunks[0])
}

/// Draw the contact details sidebar
pub fn draw_sidebar(frame: &mut Frame, area: Rect, app: &App) {
    let heading = Style::default()
        .fg(Color::Cyan)
        .add_modifier(Modifier::BOLD);
    let muted = Style::default().fg(Color::Gray);

    let mut lines = vec![
        Line::from(Span::styled("Let's Connect", heading)),
        Line::raw(""),
        Line::from(Span::styled(
            "Whether you have a project in mind, want to collaborate, or just want to say hello, I'd love to hear from you.",
            muted,
        )),
        Line::raw(""),
    ];

    for entry in &app.state.contact_entries {
        lines.push(Line::from(Span::styled(
            entry.title.clone(),
            Style::default().add_modifier(Modifier::BOLD),
        )));
        lines.push(Line::from(Span::styled(
            entry.value.clone(),
            Style::default().fg(Color::Cyan),
        )));
        lines.push(Line::raw(""));
    }

    lines.push(Line::from(Span::styled("Quick Response", heading)));
    lines.push(Line::from(Span::styled(
        "Expect a response within 24 hours during business days.",
        muted,
    )));

    let block = Block::default()
        .title(" Contact ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray));

    frame.render_widget(
        Paragraph::new(lines)
            .wrap(Wrap { trim: true })
            .block(block),
        area,
    );
}

/// Draw the status bar
pub fn draw_status_bar(frame: &mut Frame, app: &App) {
    let area = frame.area();
    let status_area = Rect {
        x: 0,
        y: area.height.saturating_sub(1),
        width: area.width,
        height: 1,
    };

    let mut spans = vec![];

    // Submission status
    let status = app.pipeline.status();
    let indicator = match status {
        SubmissionStatus::Idle if app.pipeline.last_failure().is_some() => {
            Span::styled(" ✗ ", Style::default().fg(Color::Red))
        }
        SubmissionStatus::Idle => Span::styled(" ● ", Style::default().fg(Color::Gray)),
        SubmissionStatus::Submitting => Span::styled(" ◌ ", Style::default().fg(Color::Yellow)),
        SubmissionStatus::Succeeded => Span::styled(" ✓ ", Style::default().fg(Color::Green)),
    };
    spans.push(indicator);
    spans.push(Span::styled(
        format!("{} via {}  ", status.label(), app.state.transport_name),
        Style::default().fg(Color::White),
    ));

    spans.push(Span::styled(
        get_hints(app),
        Style::default().fg(Color::Gray),
    ));

    // Copy message
    if let Some(msg) = &app.copy_message {
        spans.push(Span::raw(" | "));
        spans.push(Span::styled(msg, Style::default().fg(Color::Green)));
    }

    let status = Paragraph::new(Line::from(spans)).style(Style::default().bg(Color::DarkGray));
    frame.render_widget(status, status_area);

    let quit_hint = " Esc:quit ";
    let quit_area = Rect {
        x: area.width.saturating_sub(quit_hint.len() as u16),
        y: area.height.saturating_sub(1),
        width: quit_hint.len() as u16,
        height: 1,
    };
    let quit_widget =
        Paragraph::new(quit_hint).style(Style::default().bg(Color::DarkGray).fg(Color::Gray));
    frame.render_widget(quit_widget, quit_area);
}

/// Keyboard hints for the current focus
fn get_hints(app: &App) -> String {
    let submit = crate::platform::SUBMIT_SHORTCUT;
    match (app.pipeline.status(), app.state.focus) {
        (SubmissionStatus::Succeeded, _) => "Any key:new message".to_string(),
        (_, Focus::SubmitButton) => format!("Tab:next  Enter/{submit}:send  y:copy contact"),
        (_, Focus::Field(field)) if field.is_multiline() => {
            format!("Tab:next  Enter:newline  {submit}:send")
        }
        _ => format!("Tab:next  Enter:next field  {submit}:send"),
    }
}
