//! Shared HTTP client construction and response checks.

use reqwest::header::{HeaderMap, HeaderValue, CONTENT_TYPE, ORIGIN};
use reqwest::StatusCode;

use crate::config::HybridConfig;
use crate::error::{LanguageModelError, Result};

/// Build a client with default headers and per-phase timeouts.
///
/// Only connecting and each individual read are bounded here. Whole-request
/// deadlines are set per buffered call, never on streamed bodies.
pub fn build_client(config: &HybridConfig) -> Result<reqwest::Client> {
    let timeout = config.request_timeout();
    if timeout.is_zero() {
        return Err(LanguageModelError::Configuration(
            "request timeout must be greater than zero".into(),
        ));
    }
    reqwest::Client::builder()
        .connect_timeout(timeout)
        .read_timeout(timeout)
        .pool_max_idle_per_host(10)
        .default_headers(default_headers(config.origin.as_deref())?)
        .build()
        .map_err(|e| LanguageModelError::Configuration(format!("HTTP client: {e}")))
}

/// JSON content type, plus `Origin` when the peer checks it.
pub fn default_headers(origin: Option<&str>) -> Result<HeaderMap> {
    let mut headers = HeaderMap::new();
    headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
    if let Some(origin) = origin {
        let value = HeaderValue::from_str(origin).map_err(|_| {
            LanguageModelError::Configuration(format!("invalid origin header '{origin}'"))
        })?;
        headers.insert(ORIGIN, value);
    }
    Ok(headers)
}

/// Reject non-success responses and responses without a body.
pub async fn check_response(resp: reqwest::Response) -> Result<reqwest::Response> {
    let status = resp.status();
    if !status.is_success() {
        let body = resp.text().await.unwrap_or_default();
        return Err(status_to_error(status.as_u16(), &body));
    }
    if status == StatusCode::NO_CONTENT {
        return Err(LanguageModelError::transport(
            status.as_u16(),
            "response body is missing",
        ));
    }
    Ok(resp)
}

/// Map a failed status to a transport error, keeping the peer's message.
pub fn status_to_error(status: u16, body: &str) -> LanguageModelError {
    let message = body.trim();
    if message.is_empty() {
        let reason = StatusCode::from_u16(status)
            .ok()
            .and_then(|s| s.canonical_reason())
            .unwrap_or("request failed");
        return LanguageModelError::transport(status, reason);
    }
    LanguageModelError::transport(status, message)
}

/// Convert a request error, keeping timeouts distinct.
pub fn request_error(err: reqwest::Error, timeout_ms: u64) -> LanguageModelError {
    if err.is_timeout() {
        LanguageModelError::Timeout(timeout_ms)
    } else {
        LanguageModelError::Network(err)
    }
}
