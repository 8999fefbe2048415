//! Anthropic provider adapter (direct API)

use super::http;
use super::types::MessagesRequest;
use super::ProviderAdapter;
use crate::error::{LlmError, LlmResult};
use crate::logging::{log_debug, log_error};
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, CONTENT_TYPE};
use std::time::Duration;

const DEFAULT_BASE_URL: &str = "https://api.anthropic.com";
const ANTHROPIC_VERSION: &str = "2023-06-01";

/// Adapter for the Anthropic Messages API.
///
/// The canonical model id is used unchanged; Anthropic's naming is the
/// canonical naming.
#[derive(Debug)]
pub struct AnthropicAdapter {
    client: reqwest::Client,
    headers: HeaderMap,
    base_url: String,
    model: String,
    timeout: Duration,
}

impl AnthropicAdapter {
    /// Create an adapter for `api.anthropic.com`.
    ///
    /// # Errors
    ///
    /// Returns [`LlmError::ConfigurationError`] when the API key is empty or
    /// not a valid header value, or when the HTTP client cannot be built.
    pub fn new(api_key: &str, model: &str, timeout: Duration) -> LlmResult<Self> {
        Self::with_base_url(api_key, model, timeout, DEFAULT_BASE_URL)
    }

    /// Create an adapter against a custom endpoint (test servers, proxies).
    pub fn with_base_url(
        api_key: &str,
        model: &str,
        timeout: Duration,
        base_url: &str,
    ) -> LlmResult<Self> {
        if api_key.is_empty() {
            return Err(LlmError::configuration_error(
                "Anthropic API key is required (ANTHROPIC_API_KEY)",
            ));
        }

        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(
            "x-api-key",
            HeaderValue::from_str(api_key).map_err(|e| {
                LlmError::configuration_error(format!("invalid API key format: {e}"))
            })?,
        );
        headers.insert("anthropic-version", HeaderValue::from_static(ANTHROPIC_VERSION));

        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| {
                LlmError::configuration_error(format!("failed to build HTTP client: {e}"))
            })?;

        log_debug!(model = model, "Anthropic adapter initialized");

        Ok(Self {
            client,
            headers,
            base_url: base_url.trim_end_matches('/').to_string(),
            model: model.to_string(),
            timeout,
        })
    }
}

#[async_trait]
impl ProviderAdapter for AnthropicAdapter {
    async fn raw_complete<'a>(
        &self,
        prompt: &str,
        system_prompt: Option<&'a str>,
        max_tokens: u32,
    ) -> LlmResult<String> {
        let url = format!("{}/v1/messages", self.base_url);
        let request = MessagesRequest::for_anthropic(&self.model, prompt, system_prompt, max_tokens);

        let response = self
            .client
            .post(&url)
            .headers(self.headers.clone())
            .json(&request)
            .send()
            .await
            .map_err(|e| http::classify_transport("anthropic", self.timeout, e))?;

        let status = response.status();
        let headers = response.headers().clone();
        let body = response
            .text()
            .await
            .map_err(|e| http::classify_transport("anthropic", self.timeout, e))?;

        if !status.is_success() {
            log_error!(status = %status, body = %body, "Anthropic API error");
            return Err(http::classify_status("anthropic", status, &headers, &body));
        }

        http::parse_messages_response("anthropic", &body)
    }

    fn provider_name(&self) -> &'static str {
        "anthropic"
    }

    fn model_id(&self) -> &str {
        &self.model
    }
}
