//! Same-origin contact endpoint transport
//!
//! Posts the four fields to `/api/contact` (see `crate::api`). Success is
//! the HTTP status; the JSON envelope only carries the message text.

use super::{SubmissionError, SubmissionTransport, DEFAULT_FAILURE_MESSAGE};
use crate::state::{ContactSubmission, FormInput, SubmissionReceipt};
use anyhow::Result;
use async_trait::async_trait;
use reqwest::header::ACCEPT;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;

/// Default endpoint address, matches the default `serve` bind address
pub const DEFAULT_ENDPOINT_URL: &str = "http://127.0.0.1:3000/api/contact";

#[derive(Debug, Default, Deserialize)]
struct Envelope {
    message: Option<String>,
    error: Option<String>,
}

/// Client for the contact endpoint
pub struct EndpointTransport {
    client: Client,
    url: String,
}

impl EndpointTransport {
    pub fn new(url: impl Into<String>, timeout: Option<Duration>) -> Result<Self> {
        let mut builder = Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        Ok(Self {
            client: builder.build()?,
            url: url.into(),
        })
    }
}

#[async_trait]
impl SubmissionTransport for EndpointTransport {
    async fn submit(
        &self,
        submission: &ContactSubmission,
    ) -> Result<SubmissionReceipt, SubmissionError> {
        let body: &FormInput = &submission.input;
        let response = self
            .client
            .post(&self.url)
            .header(ACCEPT, "application/json")
            .json(body)
            .send()
            .await?;

        let status = response.status();
        let bytes = response.bytes().await?;
        // Status decides; the envelope only carries text
        let envelope: Envelope = serde_json::from_slice(&bytes).unwrap_or_default();

        if status.is_success() {
            Ok(SubmissionReceipt::new(envelope.message))
        } else {
            tracing::debug!(%status, "Contact endpoint refused submission");
            Err(SubmissionError::Rejected(
                envelope
                    .error
                    .unwrap_or_else(|| DEFAULT_FAILURE_MESSAGE.to_string()),
            ))
        }
    }

    fn name(&self) -> &'static str {
        "endpoint"
    }
}
