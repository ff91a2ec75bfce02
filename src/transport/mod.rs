//! Submission transports
//!
//! The pipeline delivers a submission through [`SubmissionTransport`]; the
//! relay transport talks to the third-party form relay, the endpoint
//! transport to the same-origin `/api/contact` endpoint.

mod endpoint;
mod error;
mod relay;
mod traits;

use crate::config::{ContactConfig, TransportKind};
use anyhow::Result;
use std::sync::Arc;

pub use endpoint::{EndpointTransport, DEFAULT_ENDPOINT_URL};
pub use error::{SubmissionError, DEFAULT_FAILURE_MESSAGE};
pub use relay::{RelayTransport, DEFAULT_RELAY_URL};
pub(crate) use relay::is_truthy;
pub use traits::SubmissionTransport;

#[cfg(test)]
pub use traits::MockSubmissionTransport;

/// Build the transport selected by the configuration
pub fn from_config(config: &ContactConfig) -> Result<Arc<dyn SubmissionTransport>> {
    let transport: Arc<dyn SubmissionTransport> = match config.transport_kind() {
        TransportKind::Relay => Arc::new(RelayTransport::new(
            config.relay_url(),
            config.require_access_key()?,
            config.request_timeout(),
        )?),
        TransportKind::Endpoint => Arc::new(EndpointTransport::new(
            config.endpoint_url(),
            config.request_timeout(),
        )?),
    };
    tracing::info!(transport = transport.name(), "Submission transport ready");
    Ok(transport)
}
