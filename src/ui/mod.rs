//! UI module for rendering the TUI

mod components;
mod forms;
mod layout;

use crate::app::App;
use crate::state::SubmissionStatus;
use ratatui::Frame;

/// Main draw function
pub fn draw(frame: &mut Frame, app: &App) {
    let area = frame.area();

    // Draw the main layout with sidebar
    let (sidebar_area, main_area) = layout::create_layout(area);

    // Draw sidebar
    layout::draw_sidebar(frame, sidebar_area, app);

    // The success view replaces the form until the reset fires
    match app.pipeline.status() {
        SubmissionStatus::Succeeded => forms::draw_success(frame, main_area, app),
        SubmissionStatus::Idle | SubmissionStatus::Submitting => {
            forms::draw_contact_form(frame, main_area, app)
        }
    }

    // Draw status bar
    layout::draw_status_bar(frame, app);
}
