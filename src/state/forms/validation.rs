//! Validation rules for the contact form

use super::field::{Field, FormInput};
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::BTreeMap;

/// Minimum length of the trimmed message, in characters
pub const MIN_MESSAGE_CHARS: usize = 10;

static EMAIL_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern compiles"));

/// Current error message per failing field.
///
/// A field without an entry is valid. The whole map is replaced on every
/// validation pass; edits only ever remove entries.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationErrors(BTreeMap<Field, String>);

impl ValidationErrors {
    pub fn get(&self, field: Field) -> Option<&str> {
        self.0.get(&field).map(String::as_str)
    }

    pub fn contains(&self, field: Field) -> bool {
        self.0.contains_key(&field)
    }

    pub fn insert(&mut self, field: Field, message: impl Into<String>) {
        self.0.insert(field, message.into());
    }

    /// Drop the error for one field, returning whether there was one
    pub fn clear_field(&mut self, field: Field) -> bool {
        self.0.remove(&field).is_some()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Field, &str)> {
        self.0.iter().map(|(f, m)| (*f, m.as_str()))
    }
}

/// Check every field and collect all failures
pub fn validate(input: &FormInput) -> ValidationErrors {
    let mut errors = ValidationErrors::default();

    if input.name.trim().is_empty() {
        errors.insert(Field::Name, "Name is required");
    }

    if input.email.trim().is_empty() {
        errors.insert(Field::Email, "Email is required");
    } else if !is_valid_email(&input.email) {
        errors.insert(Field::Email, "Please enter a valid email");
    }

    if input.subject.trim().is_empty() {
        errors.insert(Field::Subject, "Subject is required");
    }

    let message = input.message.trim();
    if message.is_empty() {
        errors.insert(Field::Message, "Message is required");
    } else if message.chars().count() < MIN_MESSAGE_CHARS {
        errors.insert(
            Field::Message,
            format!("Message must be at least {MIN_MESSAGE_CHARS} characters"),
        );
    }

    errors
}

/// Basic `local@domain.tld` shape check on the untrimmed value
pub fn is_valid_email(value: &str) -> bool {
    EMAIL_PATTERN.is_match(value)
}
