//! Development relay: forwards same-origin chat-completion calls upstream.
//!
//! The browser posts to `/api/openai` without credentials. The relay rewrites
//! the path to `/v1/chat/completions`, injects `Authorization: Bearer
//! $OPENAI_API_KEY` (when set) and passes the upstream status and body back
//! untouched. Local development only.

use std::time::Duration;

use anyhow::Context;
use axum::{
    body::Body,
    extract::State,
    http::{header::CONTENT_TYPE, HeaderValue, StatusCode},
    response::Response,
};
use bytes::Bytes;
use reqwest::Client;
use tracing::{debug, info};

use crate::errors::AppError;
use crate::state::AppState;

const RELAY_TIMEOUT: Duration = Duration::from_secs(120);

/// Builds the upstream client used by the relay.
pub fn build_upstream_client() -> anyhow::Result<Client> {
    Client::builder()
        .timeout(RELAY_TIMEOUT)
        .build()
        .context("Failed to build upstream HTTP client")
}

/// POST /api/openai
///
/// The request body is forwarded byte-for-byte; only headers are rewritten.
pub async fn handle_relay(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Response, AppError> {
    let upstream_url = state.config.upstream_url();
    debug!("Relaying {} bytes to {}", body.len(), upstream_url);

    let mut request = state
        .http
        .post(&upstream_url)
        .header(reqwest::header::CONTENT_TYPE, "application/json")
        .body(body);
    if let Some(key) = &state.config.openai_api_key {
        request = request.bearer_auth(key);
    }

    let upstream = request.send().await?;
    let status = upstream.status().as_u16();
    let content_type = upstream
        .headers()
        .get(reqwest::header::CONTENT_TYPE)
        .and_then(|v| HeaderValue::from_bytes(v.as_bytes()).ok())
        .unwrap_or_else(|| HeaderValue::from_static("application/json"));
    let payload = upstream.bytes().await?;

    info!("Relay upstream responded {} ({} bytes)", status, payload.len());

    let status = StatusCode::from_u16(status).context("Upstream returned an invalid status")?;
    let response = Response::builder()
        .status(status)
        .header(CONTENT_TYPE, content_type)
        .body(Body::from(payload))
        .context("Failed to build relay response")?;

    Ok(response)
}
