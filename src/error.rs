//! Error types for LLM operations.
//!
//! Every failure the client can see is one of the [`LlmError`] variants
//! below, and the variant is what drives the retry protocol:
//! [`LlmError::is_retryable`] decides whether the shared retry layer makes
//! another attempt, and the variant decides which backoff base applies
//! (rate limits climb toward the full cap, timeouts and connection failures
//! start from the shorter base).
//!
//! Construct variants through the constructor methods rather than directly;
//! they emit a structured log event at creation time.
//!
//! # Result Type
//!
//! Use [`LlmResult<T>`] as the alias for `Result<T, LlmError>` throughout.

use crate::logging::{log_error, log_warn};
use thiserror::Error;

/// High-level categorization of errors for routing and handling decisions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// Backend failures surfaced after a request went out (rejections,
    /// malformed payloads, exhausted retry budgets).
    External,

    /// Caller mistakes the caller can fix (credentials, configuration,
    /// unsupported provider names).
    Client,

    /// Temporary failures worth retrying with backoff.
    Transient,
}

/// Convenient result type for LLM operations.
pub type LlmResult<T> = std::result::Result<T, LlmError>;

/// Errors that can occur during LLM operations.
///
/// | Variant | Category | Retryable |
/// |---------|----------|-----------|
/// | `UnsupportedProvider` | Client | No |
/// | `ConfigurationError` | Client | No |
/// | `AuthenticationFailed` | Client | No |
/// | `RateLimitExceeded` | Transient | Yes |
/// | `Timeout` | Transient | Yes |
/// | `TransientNetwork` | Transient | Yes |
/// | `RequestFailed` | External | No |
/// | `MalformedResponse` | External | No |
/// | `RetriesExhausted` | External | No |
#[derive(Error, Debug)]
pub enum LlmError {
    /// The requested provider name is not recognized.
    #[error("unsupported provider: {provider} (supported: anthropic, vertex, bedrock)")]
    UnsupportedProvider {
        /// The provider name that was requested.
        provider: String,
    },

    /// Provider configuration is invalid or incomplete.
    ///
    /// Raised at construction time, before any network use. The message
    /// names the missing field and its environment-variable source.
    #[error("configuration error: {message}")]
    ConfigurationError { message: String },

    /// The backend rejected the supplied credentials.
    #[error("authentication failed: {message}")]
    AuthenticationFailed { message: String },

    /// The backend is throttling requests.
    #[error("rate limit exceeded, retry after {retry_after_seconds}s")]
    RateLimitExceeded {
        /// Wait hint from the backend's `retry-after` header, 60s if absent.
        retry_after_seconds: u64,
    },

    /// A raw call exceeded the per-call timeout.
    #[error("request timed out after {timeout_seconds}s")]
    Timeout { timeout_seconds: u64 },

    /// Connection-level failure between client and backend, including
    /// 5xx-class server faults.
    #[error("network error: {message}")]
    TransientNetwork {
        message: String,
        /// The underlying transport error, if available.
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// The backend rejected the request outright (non-throttling 4xx).
    ///
    /// Not retried: an unchanged request earns the same rejection.
    #[error("request failed: {message}")]
    RequestFailed { message: String },

    /// Transport succeeded but the payload failed JSON or shape validation.
    ///
    /// Not retried. The raw text rides along for diagnosis.
    #[error("malformed model response: {message}; raw response: {raw}")]
    MalformedResponse {
        message: String,
        /// The unparsed response text.
        raw: String,
    },

    /// The retry budget ran out.
    ///
    /// `attempts` counts every underlying call made, including the first.
    #[error("LLM call failed after {attempts} attempts: {source}")]
    RetriesExhausted {
        attempts: u32,
        /// The failure from the final attempt.
        #[source]
        source: Box<LlmError>,
    },
}

impl LlmError {
    /// Get the error category for routing and handling decisions.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::UnsupportedProvider { .. } => ErrorCategory::Client,
            Self::ConfigurationError { .. } => ErrorCategory::Client,
            Self::AuthenticationFailed { .. } => ErrorCategory::Client,
            Self::RateLimitExceeded { .. } => ErrorCategory::Transient,
            Self::Timeout { .. } => ErrorCategory::Transient,
            Self::TransientNetwork { .. } => ErrorCategory::Transient,
            Self::RequestFailed { .. } => ErrorCategory::External,
            Self::MalformedResponse { .. } => ErrorCategory::External,
            Self::RetriesExhausted { .. } => ErrorCategory::External,
        }
    }

    /// Whether this error is transient and should trigger another attempt.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::RateLimitExceeded { .. } | Self::Timeout { .. } | Self::TransientNetwork { .. }
        )
    }

    // =========================================================================
    // Constructor methods with automatic logging
    // =========================================================================

    pub fn unsupported_provider(provider: impl Into<String>) -> Self {
        let provider = provider.into();
        log_error!(
            provider = %provider,
            error_type = "unsupported_provider",
            "Unsupported LLM provider requested"
        );
        Self::UnsupportedProvider { provider }
    }

    pub fn configuration_error(message: impl Into<String>) -> Self {
        let message = message.into();
        log_error!(
            error_type = "configuration_error",
            message = %message,
            "LLM configuration validation failed"
        );
        Self::ConfigurationError { message }
    }

    pub fn authentication_failed(message: impl Into<String>) -> Self {
        let message = message.into();
        log_error!(
            error_type = "authentication_failed",
            message = %message,
            "LLM provider authentication failed"
        );
        Self::AuthenticationFailed { message }
    }

    pub fn rate_limit_exceeded(retry_after_seconds: u64) -> Self {
        log_warn!(
            error_type = "rate_limit_exceeded",
            retry_after_seconds = retry_after_seconds,
            "LLM provider rate limit exceeded"
        );
        Self::RateLimitExceeded {
            retry_after_seconds,
        }
    }

    pub fn timeout(timeout_seconds: u64) -> Self {
        log_warn!(
            error_type = "timeout",
            timeout_seconds = timeout_seconds,
            "LLM request timed out"
        );
        Self::Timeout { timeout_seconds }
    }

    pub fn transient_network(
        message: impl Into<String>,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    ) -> Self {
        let message = message.into();
        log_warn!(
            error_type = "transient_network",
            message = %message,
            "LLM request hit a network failure"
        );
        Self::TransientNetwork { message, source }
    }

    pub fn request_failed(message: impl Into<String>) -> Self {
        let message = message.into();
        log_error!(
            error_type = "request_failed",
            message = %message,
            "LLM request rejected by the backend"
        );
        Self::RequestFailed { message }
    }

    pub fn malformed_response(message: impl Into<String>, raw: impl Into<String>) -> Self {
        let message = message.into();
        let raw = raw.into();
        log_warn!(
            error_type = "malformed_response",
            message = %message,
            raw_length = raw.len(),
            "LLM response failed validation"
        );
        Self::MalformedResponse { message, raw }
    }

    pub fn retries_exhausted(attempts: u32, source: LlmError) -> Self {
        log_error!(
            error_type = "retries_exhausted",
            attempts = attempts,
            last_error = %source,
            "LLM call failed after all retry attempts"
        );
        Self::RetriesExhausted {
            attempts,
            source: Box::new(source),
        }
    }
}
