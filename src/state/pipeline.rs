//! Contact form submission pipeline
//!
//! Owns the form values, the validation errors and the submission status,
//! and drives one submission at a time through a [`SubmissionTransport`].
//!
//! Event loops that must keep drawing while a request is in flight use the
//! split form: [`ContactPipeline::begin_submit`] hands out the payload,
//! the caller sends it wherever it likes, and
//! [`ContactPipeline::complete_submit`] applies the outcome.
//! [`ContactPipeline::submit`] does all three in one call.

use super::forms::{validate, Field, FormInput, ValidationErrors};
use super::reset_timer::ResetTimer;
use crate::transport::{SubmissionError, SubmissionTransport};
use chrono::{DateTime, Utc};
use std::time::{Duration, Instant};
use tracing::Instrument;
use uuid::Uuid;

/// Where the form is in its submit cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SubmissionStatus {
    #[default]
    Idle,
    Submitting,
    Succeeded,
}

impl SubmissionStatus {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Idle => "Ready",
            Self::Submitting => "Sending...",
            Self::Succeeded => "Sent",
        }
    }
}

/// Snapshot of the form taken when a request starts
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContactSubmission {
    pub id: Uuid,
    pub input: FormInput,
}

impl ContactSubmission {
    pub fn new(input: FormInput) -> Self {
        Self {
            id: Uuid::new_v4(),
            input,
        }
    }
}

/// What a transport hands back for an accepted submission
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmissionReceipt {
    /// Message from the service, if it sent one
    pub message: Option<String>,
    pub received_at: DateTime<Utc>,
}

impl SubmissionReceipt {
    pub fn new(message: Option<String>) -> Self {
        Self {
            message,
            received_at: Utc::now(),
        }
    }
}

/// Single owned state object for the contact form
#[derive(Debug, Default)]
pub struct ContactPipeline {
    input: FormInput,
    errors: ValidationErrors,
    status: SubmissionStatus,
    reset_timer: ResetTimer,
    in_flight: Option<Uuid>,
    last_failure: Option<String>,
    last_receipt: Option<SubmissionReceipt>,
}

impl ContactPipeline {
    /// Pipeline whose success view lasts `window`; `default()` uses 5 seconds
    pub fn with_success_window(window: Duration) -> Self {
        Self {
            reset_timer: ResetTimer::new(window),
            ..Self::default()
        }
    }

    pub fn input(&self) -> &FormInput {
        &self.input
    }

    pub fn errors(&self) -> &ValidationErrors {
        &self.errors
    }

    pub fn status(&self) -> SubmissionStatus {
        self.status
    }

    pub fn is_submitting(&self) -> bool {
        self.status == SubmissionStatus::Submitting
    }

    /// Message of the most recent failed submission, until the user acts again
    pub fn last_failure(&self) -> Option<&str> {
        self.last_failure.as_deref()
    }

    pub fn last_receipt(&self) -> Option<&SubmissionReceipt> {
        self.last_receipt.as_ref()
    }

    /// How much of the success window has elapsed, while succeeded
    pub fn success_progress(&self, now: Instant) -> Option<f32> {
        match self.status {
            SubmissionStatus::Succeeded => self.reset_timer.progress(now),
            _ => None,
        }
    }

    /// Replace a field's value and drop its stale error without re-validating
    pub fn update_field(&mut self, field: Field, value: impl Into<String>) {
        let value = value.into();
        self.edit_field(field, |current| *current = value);
    }

    /// Edit a field in place; same error handling as [`Self::update_field`]
    pub fn edit_field(&mut self, field: Field, edit: impl FnOnce(&mut String)) {
        edit(self.input.get_mut(field));
        self.errors.clear_field(field);
        self.last_failure = None;
    }

    /// Recompute every field's error from scratch. True when the form is valid.
    pub fn validate(&mut self) -> bool {
        self.errors = validate(&self.input);
        self.errors.is_empty()
    }

    /// Validate and move to `Submitting`.
    ///
    /// Returns the payload to send, or `None` when the form is invalid or a
    /// submission is already in flight. In both cases nothing changes status.
    pub fn begin_submit(&mut self) -> Option<ContactSubmission> {
        if self.is_submitting() {
            tracing::warn!("Submit ignored: a submission is already in flight");
            return None;
        }

        self.last_failure = None;
        if !self.validate() {
            tracing::debug!(
                failing_fields = self.errors.len(),
                "Submit blocked by validation"
            );
            return None;
        }

        self.reset_timer.cancel();
        self.status = SubmissionStatus::Submitting;

        let submission = ContactSubmission::new(self.input.clone());
        self.in_flight = Some(submission.id);
        tracing::info!(submission_id = %submission.id, "Submitting contact form");
        Some(submission)
    }

    /// Apply the outcome of the in-flight submission.
    ///
    /// Every branch leaves `Submitting`. Results for a submission that is
    /// not the one in flight are ignored.
    pub fn complete_submit(
        &mut self,
        submission_id: Uuid,
        result: Result<SubmissionReceipt, SubmissionError>,
        now: Instant,
    ) {
        if self.in_flight != Some(submission_id) {
            tracing::warn!(%submission_id, "Ignoring result for a submission that is not in flight");
            return;
        }
        self.in_flight = None;

        match result {
            Ok(receipt) => {
                tracing::info!(%submission_id, "Contact form sent");
                self.status = SubmissionStatus::Succeeded;
                self.input.clear();
                self.reset_timer.arm(now);
                self.last_receipt = Some(receipt);
            }
            Err(err) => {
                tracing::error!(%submission_id, error = %err, "Form submission error");
                self.status = SubmissionStatus::Idle;
                self.last_failure = Some(err.to_string());
            }
        }
    }

    /// Validate, send through `transport`, and apply the outcome
    pub async fn submit<T>(&mut self, transport: &T) -> SubmissionStatus
    where
        T: SubmissionTransport + ?Sized,
    {
        let Some(submission) = self.begin_submit() else {
            return self.status;
        };

        let span = tracing::info_span!("contact_submission", submission_id = %submission.id);
        let result = transport.submit(&submission).instrument(span).await;
        self.complete_submit(submission.id, result, Instant::now());
        self.status
    }

    /// Fire the success reset once its deadline has passed.
    /// Returns true when the status changed.
    pub fn tick(&mut self, now: Instant) -> bool {
        if self.status == SubmissionStatus::Succeeded && self.reset_timer.is_due(now) {
            self.reset_timer.cancel();
            self.status = SubmissionStatus::Idle;
            return true;
        }
        false
    }

    /// Leave the success view early (user pressed a key)
    pub fn dismiss_success(&mut self) {
        if self.status == SubmissionStatus::Succeeded {
            self.reset_timer.cancel();
            self.status = SubmissionStatus::Idle;
        }
    }
}
