//! Shared HTTP handling for the reqwest-backed adapters.
//!
//! The Anthropic and Vertex adapters differ only in endpoint and auth; the
//! status classification, `retry-after` extraction, and success-body parsing
//! are identical and live here.

use super::types::MessagesResponse;
use crate::error::{LlmError, LlmResult};
use std::time::Duration;

/// Classify an error from `reqwest::Client::send` or body collection.
pub(crate) fn classify_transport(
    provider: &'static str,
    timeout: Duration,
    err: reqwest::Error,
) -> LlmError {
    if err.is_timeout() {
        LlmError::timeout(timeout.as_secs())
    } else {
        LlmError::transient_network(
            format!("{provider} request failed: {err}"),
            Some(Box::new(err)),
        )
    }
}

/// Classify a non-success HTTP status.
///
/// 401/403 are credential rejections, 429 is throttling (with the
/// `retry-after` hint when the backend sends one), 5xx-class statuses are
/// transient server faults, and anything else is a hard rejection.
pub(crate) fn classify_status(
    provider: &'static str,
    status: reqwest::StatusCode,
    headers: &reqwest::header::HeaderMap,
    body: &str,
) -> LlmError {
    match status.as_u16() {
        401 | 403 => {
            LlmError::authentication_failed(format!("{provider} rejected the credentials: {body}"))
        }
        429 => LlmError::rate_limit_exceeded(extract_retry_after(headers)),
        500..=599 => {
            LlmError::transient_network(format!("{provider} server error {status}: {body}"), None)
        }
        _ => LlmError::request_failed(format!("{provider} API error {status}: {body}")),
    }
}

/// Seconds from a `retry-after` header, defaulting to 60.
pub(crate) fn extract_retry_after(headers: &reqwest::header::HeaderMap) -> u64 {
    headers
        .get("retry-after")
        .and_then(|h| h.to_str().ok())
        .and_then(|s| s.parse::<u64>().ok())
        .unwrap_or(60)
}

/// Parse a success-status body and pull out the completion text.
pub(crate) fn parse_messages_response(provider: &'static str, raw: &str) -> LlmResult<String> {
    let response: MessagesResponse = serde_json::from_str(raw)
        .map_err(|e| LlmError::malformed_response(format!("invalid {provider} response: {e}"), raw))?;

    let text = response.text();
    if text.is_empty() {
        return Err(LlmError::malformed_response(
            format!(
                "{provider} response contained no text content (stop_reason: {:?})",
                response.stop_reason
            ),
            raw,
        ));
    }
    Ok(text)
}
