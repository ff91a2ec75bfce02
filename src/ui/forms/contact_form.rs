//! Contact form and the success view that replaces it

use super::field_renderer::{draw_field, draw_help_text};
use crate::app::App;
use crate::state::{Field, Focus};
use crate::ui::components::{render_button, BUTTON_HEIGHT};
use chrono::Local;
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Gauge, Paragraph, Wrap},
    Frame,
};
use std::time::Instant;

const SEND_LABEL: &str = "Send Message";
const SENDING_LABEL: &str = "Sending...";

/// Draw the contact form
pub fn draw_contact_form(frame: &mut Frame, area: Rect, app: &App) {
    let pipeline = &app.pipeline;
    let failure = pipeline.last_failure();

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(if failure.is_some() { 3 } else { 0 }), // Failure banner
            Constraint::Length(3),                                     // Name + Email
            Constraint::Length(3),                                     // Subject
            Constraint::Min(6),                                        // Message
            Constraint::Length(BUTTON_HEIGHT),                         // Send button
            Constraint::Length(1),                                     // Help text
        ])
        .margin(1)
        .split(area);

    let block = Block::default()
        .title(" Send a Message ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));
    frame.render_widget(block, area);

    if let Some(failure) = failure {
        let banner = Paragraph::new(Line::from(vec![
            Span::styled(
                "✗ ",
                Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
            ),
            Span::styled(failure, Style::default().fg(Color::Red)),
        ]))
        .wrap(Wrap { trim: true })
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Red)),
        );
        frame.render_widget(banner, chunks[0]);
    }

    let top_row = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(chunks[1]);

    let field_areas = [top_row[0], top_row[1], chunks[2], chunks[3]];
    for (field, field_area) in Field::ALL.into_iter().zip(field_areas) {
        draw_field(
            frame,
            field_area,
            field,
            pipeline.input().get(field),
            pipeline.errors().get(field),
            app.state.focus == Focus::Field(field),
        );
    }

    let submitting = pipeline.is_submitting();
    let button_area = center_horizontal(chunks[4], 24);
    render_button(
        frame,
        button_area,
        if submitting { SENDING_LABEL } else { SEND_LABEL },
        app.state.is_button_row_focused(),
        !submitting,
    );

    let submit = crate::platform::SUBMIT_SHORTCUT;
    let hints: &[(&str, &str)] = if app.state.is_button_row_focused() {
        &[("Enter", "send"), ("y", "copy contact"), ("Tab", "next field"), ("Esc", "quit")]
    } else {
        &[("Tab", "next field"), (submit, "send"), ("Esc", "quit")]
    };
    draw_help_text(frame, chunks[5], hints);
}

/// Draw the confirmation shown after a successful submission
pub fn draw_success(frame: &mut Frame, area: Rect, app: &App) {
    let block = Block::default()
        .title(" Send a Message ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Green));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let mut lines = vec![
        Line::from(Span::styled(
            "✓",
            Style::default()
                .fg(Color::Green)
                .add_modifier(Modifier::BOLD),
        )),
        Line::raw(""),
        Line::from(Span::styled(
            "Message Sent!",
            Style::default()
                .fg(Color::Green)
                .add_modifier(Modifier::BOLD),
        )),
        Line::raw(""),
        Line::from("Thank you for reaching out. I'll get back to you soon!"),
    ];

    if let Some(receipt) = app.pipeline.last_receipt() {
        if let Some(message) = &receipt.message {
            lines.push(Line::raw(""));
            lines.push(Line::from(Span::styled(
                message.clone(),
                Style::default().fg(Color::Gray),
            )));
        }
        let sent_at = receipt.received_at.with_timezone(&Local);
        lines.push(Line::from(Span::styled(
            format!("Sent at {}", sent_at.format("%Y-%m-%d %H:%M")),
            Style::default().fg(Color::DarkGray),
        )));
    }

    let text_height = lines.len() as u16;
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(0),
            Constraint::Length(text_height),
            Constraint::Length(1),
            Constraint::Length(1), // Countdown
            Constraint::Length(1),
            Constraint::Length(1), // Hint
            Constraint::Min(0),
        ])
        .split(inner);

    frame.render_widget(
        Paragraph::new(lines)
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true }),
        chunks[1],
    );

    // Bar drains as the form reset approaches
    if let Some(progress) = app.pipeline.success_progress(Instant::now()) {
        let remaining = 1.0 - simple_easing::cubic_out(progress.clamp(0.0, 1.0));
        let gauge = Gauge::default()
            .gauge_style(Style::default().fg(Color::Green).bg(Color::Black))
            .ratio(f64::from(remaining.clamp(0.0, 1.0)))
            .label("");
        frame.render_widget(gauge, center_horizontal(chunks[3], 40));
    }

    let hint = Paragraph::new(Line::from(vec![
        Span::styled("Any key", Style::default().fg(Color::Cyan)),
        Span::raw(": write another message"),
    ]))
    .style(Style::default().fg(Color::DarkGray))
    .alignment(Alignment::Center);
    frame.render_widget(hint, chunks[5]);
}

/// Center a fixed-width strip inside `area`
fn center_horizontal(area: Rect, width: u16) -> Rect {
    let width = width.min(area.width);
    Rect {
        x: area.x + (area.width - width) / 2,
        width,
        ..area
    }
}
