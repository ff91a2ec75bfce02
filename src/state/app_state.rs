//! Application state definitions

use super::forms::Field;
use crate::config::ContactEntry;

/// Which part of the form has keyboard focus
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    Field(Field),
    SubmitButton,
}

impl Default for Focus {
    fn default() -> Self {
        Focus::Field(Field::Name)
    }
}

impl Focus {
    /// Number of focus stops (four fields plus the button row)
    pub const COUNT: usize = Field::ALL.len() + 1;

    pub fn index(&self) -> usize {
        match self {
            Focus::Field(field) => field.index(),
            Focus::SubmitButton => Field::ALL.len(),
        }
    }

    pub fn from_index(index: usize) -> Self {
        Field::from_index(index % Self::COUNT)
            .map(Focus::Field)
            .unwrap_or(Focus::SubmitButton)
    }

    pub fn next(&self) -> Self {
        Self::from_index(self.index() + 1)
    }

    pub fn prev(&self) -> Self {
        Self::from_index(self.index() + Self::COUNT - 1)
    }

    pub fn field(&self) -> Option<Field> {
        match self {
            Focus::Field(field) => Some(*field),
            Focus::SubmitButton => None,
        }
    }
}

/// UI state that lives beside the pipeline
#[derive(Debug, Clone, Default)]
pub struct AppState {
    pub focus: Focus,
    /// Contact details shown in the sidebar
    pub contact_entries: Vec<ContactEntry>,
    /// Backend name for the status bar
    pub transport_name: &'static str,
}

impl AppState {
    pub fn new(contact_entries: Vec<ContactEntry>, transport_name: &'static str) -> Self {
        Self {
            focus: Focus::default(),
            contact_entries,
            transport_name,
        }
    }

    pub fn next_focus(&mut self) {
        self.focus = self.focus.next();
    }

    pub fn prev_focus(&mut self) {
        self.focus = self.focus.prev();
    }

    pub fn is_button_row_focused(&self) -> bool {
        self.focus == Focus::SubmitButton
    }
}
