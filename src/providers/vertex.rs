//! Vertex AI provider adapter for Anthropic-published models

use super::http;
use super::model_id::vertex_model_id;
use super::types::{MessagesRequest, VERTEX_ANTHROPIC_VERSION};
use super::ProviderAdapter;
use crate::error::{LlmError, LlmResult};
use crate::logging::{log_debug, log_error};
use async_trait::async_trait;
use gcp_auth::TokenProvider;
use std::sync::Arc;
use std::time::Duration;

const CLOUD_PLATFORM_SCOPE: &[&str] = &["https://www.googleapis.com/auth/cloud-platform"];

/// Adapter for Claude models on Vertex AI.
///
/// Talks to the `publishers/anthropic` `rawPredict` endpoint, which speaks
/// the Messages API schema with the model named in the URL. Authentication
/// uses application-default credentials resolved once at construction; the
/// access token itself is fetched (and cached) per request by the provider.
pub struct VertexAdapter {
    client: reqwest::Client,
    token_provider: Arc<dyn TokenProvider>,
    endpoint: String,
    model: String,
    timeout: Duration,
}

impl VertexAdapter {
    /// Resolve application-default credentials and build the endpoint for
    /// `model` translated into Vertex naming.
    ///
    /// # Errors
    ///
    /// Returns [`LlmError::ConfigurationError`] when the project id or
    /// region is empty, or when no application-default credential source can
    /// be found.
    pub async fn new(
        project_id: &str,
        region: &str,
        model: &str,
        timeout: Duration,
    ) -> LlmResult<Self> {
        if project_id.is_empty() {
            return Err(LlmError::configuration_error(
                "Google Cloud project ID is required (GOOGLE_CLOUD_PROJECT)",
            ));
        }
        if region.is_empty() {
            return Err(LlmError::configuration_error(
                "Google Cloud region is required (GOOGLE_CLOUD_REGION)",
            ));
        }

        let token_provider = gcp_auth::provider().await.map_err(|e| {
            LlmError::configuration_error(format!(
                "no Google Cloud credentials found (application default credentials): {e}"
            ))
        })?;

        let model = vertex_model_id(model);
        let endpoint = format!(
            "https://{region}-aiplatform.googleapis.com/v1/projects/{project_id}/locations/{region}/publishers/anthropic/models/{model}:rawPredict"
        );

        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| {
                LlmError::configuration_error(format!("failed to build HTTP client: {e}"))
            })?;

        log_debug!(model = %model, region = region, "Vertex adapter initialized");

        Ok(Self {
            client,
            token_provider,
            endpoint,
            model,
            timeout,
        })
    }

    async fn bearer_token(&self) -> LlmResult<String> {
        let token = self
            .token_provider
            .token(CLOUD_PLATFORM_SCOPE)
            .await
            .map_err(|e| {
                LlmError::authentication_failed(format!(
                    "failed to obtain Google Cloud access token: {e}"
                ))
            })?;
        Ok(token.as_str().to_string())
    }
}

#[async_trait]
impl ProviderAdapter for VertexAdapter {
    async fn raw_complete<'a>(
        &self,
        prompt: &str,
        system_prompt: Option<&'a str>,
        max_tokens: u32,
    ) -> LlmResult<String> {
        let token = self.bearer_token().await?;
        let request =
            MessagesRequest::for_hosted(VERTEX_ANTHROPIC_VERSION, prompt, system_prompt, max_tokens);

        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(token)
            .json(&request)
            .send()
            .await
            .map_err(|e| http::classify_transport("vertex", self.timeout, e))?;

        let status = response.status();
        let headers = response.headers().clone();
        let body = response
            .text()
            .await
            .map_err(|e| http::classify_transport("vertex", self.timeout, e))?;

        if !status.is_success() {
            log_error!(status = %status, body = %body, "Vertex API error");
            return Err(http::classify_status("vertex", status, &headers, &body));
        }

        http::parse_messages_response("vertex", &body)
    }

    fn provider_name(&self) -> &'static str {
        "vertex"
    }

    fn model_id(&self) -> &str {
        &self.model
    }
}
