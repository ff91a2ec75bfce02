//! Same-origin contact endpoint
//!
//! `POST /api/contact` accepts the four form fields, logs the submission and
//! answers with a small JSON envelope. Nothing is stored or delivered.

mod contact;

use anyhow::{Context, Result};
use axum::{routing::post, Router};
use std::net::SocketAddr;

/// Router with every endpoint route
pub fn router() -> Router {
    Router::new().route("/api/contact", post(contact::submit))
}

/// Serve the endpoint until Ctrl+C
pub async fn serve(addr: SocketAddr) -> Result<()> {
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind contact endpoint to {addr}"))?;
    tracing::info!(%addr, "Contact endpoint listening");

    axum::serve(listener, router())
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Contact endpoint stopped unexpectedly")?;

    tracing::info!("Contact endpoint shut down");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %err, "Failed to listen for Ctrl+C");
    }
}
