//! Trait abstraction for submission transports to enable mocking in tests

use super::SubmissionError;
use crate::state::{ContactSubmission, SubmissionReceipt};
use async_trait::async_trait;

/// Delivers one contact submission to a backend
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SubmissionTransport: Send + Sync {
    /// Send a submission. Exactly one request per call, no retries.
    async fn submit(
        &self,
        submission: &ContactSubmission,
    ) -> Result<SubmissionReceipt, SubmissionError>;

    /// Short name shown in logs and the status bar
    fn name(&self) -> &'static str;
}
