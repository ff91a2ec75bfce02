//! Submission error taxonomy

use thiserror::Error;

/// Shown when the service fails without saying why
pub const DEFAULT_FAILURE_MESSAGE: &str = "Failed to send message";

/// Why a submission did not go through
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SubmissionError {
    /// The request never completed (DNS, connect, TLS, timeout...)
    #[error("Could not reach the form service: {0}")]
    Transport(String),
    /// The service answered and reported a failure
    #[error("{0}")]
    Rejected(String),
    /// The service answered with something that is not the expected JSON
    #[error("Unexpected response from the form service: {0}")]
    MalformedResponse(String),
}

impl From<reqwest::Error> for SubmissionError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            Self::MalformedResponse(err.to_string())
        } else {
            Self::Transport(err.to_string())
        }
    }
}
