// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! HTTP endpoints for metrics scraping and liveness probes.
//!
//! - `GET /metrics` - Prometheus text exposition of [`crate::metrics`]
//! - `GET /healthz` - always `ok` while the process is serving

use crate::metrics::gather_metrics;
use anyhow::{Context, Result};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::Router;
use std::net::SocketAddr;
use tracing::{error, info};

/// Content type of the Prometheus text format
const PROMETHEUS_CONTENT_TYPE: &str = "text/plain; version=0.0.4";

/// Build the router serving `/metrics` and `/healthz`.
pub fn router() -> Router {
    Router::new()
        .route("/metrics", get(metrics_handler))
        .route("/healthz", get(|| async { "ok" }))
}

async fn metrics_handler() -> Response {
    match gather_metrics() {
        Ok(body) => ([(header::CONTENT_TYPE, PROMETHEUS_CONTENT_TYPE)], body).into_response(),
        Err(e) => {
            error!("Failed to gather metrics: {}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()).into_response()
        }
    }
}

/// Serve the metrics and health endpoints on `addr` until the listener fails.
///
/// # Errors
///
/// Returns an error if the address cannot be bound or the server stops.
pub async fn serve(addr: SocketAddr) -> Result<()> {
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind metrics listener on {addr}"))?;

    info!(addr = %addr, "Starting metrics server");

    axum::serve(listener, router())
        .await
        .context("Metrics server stopped")?;
    Ok(())
}
