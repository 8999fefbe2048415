//! AWS Bedrock provider adapter for Anthropic-published models

use super::http;
use super::model_id::bedrock_model_id;
use super::types::{MessagesRequest, BEDROCK_ANTHROPIC_VERSION};
use super::ProviderAdapter;
use crate::error::{LlmError, LlmResult};
use crate::logging::{log_debug, log_error};
use async_trait::async_trait;
use aws_config::retry::RetryConfig;
use aws_config::timeout::TimeoutConfig;
use aws_config::{BehaviorVersion, Region};
use aws_sdk_bedrockruntime::error::SdkError;
use aws_sdk_bedrockruntime::operation::invoke_model::InvokeModelError;
use aws_sdk_bedrockruntime::primitives::Blob;
use std::time::Duration;

/// Adapter for Claude models on AWS Bedrock.
///
/// The SDK owns request signing and the default credential chain; this
/// adapter owns model naming and error classification. SDK-level retries
/// are disabled so the shared retry layer is the only place backoff happens.
pub struct BedrockAdapter {
    client: aws_sdk_bedrockruntime::Client,
    model: String,
    timeout: Duration,
}

impl BedrockAdapter {
    /// Load the default AWS configuration chain for `aws_region` and
    /// translate `model` into Bedrock naming.
    ///
    /// # Errors
    ///
    /// Returns [`LlmError::ConfigurationError`] when the region is empty.
    /// Missing AWS credentials surface on the first call, as an
    /// authentication failure, since the default chain resolves lazily.
    pub async fn new(aws_region: &str, model: &str, timeout: Duration) -> LlmResult<Self> {
        if aws_region.is_empty() {
            return Err(LlmError::configuration_error(
                "AWS region is required (AWS_REGION)",
            ));
        }

        let shared = aws_config::defaults(BehaviorVersion::latest())
            .region(Region::new(aws_region.to_string()))
            .retry_config(RetryConfig::disabled())
            .timeout_config(
                TimeoutConfig::builder()
                    .operation_attempt_timeout(timeout)
                    .build(),
            )
            .load()
            .await;
        let client = aws_sdk_bedrockruntime::Client::new(&shared);
        let model = bedrock_model_id(model);

        log_debug!(model = %model, region = aws_region, "Bedrock adapter initialized");

        Ok(Self {
            client,
            model,
            timeout,
        })
    }

    fn classify_sdk_error(&self, err: SdkError<InvokeModelError>) -> LlmError {
        match &err {
            SdkError::TimeoutError(_) => LlmError::timeout(self.timeout.as_secs()),
            SdkError::DispatchFailure(failure) if failure.is_timeout() => {
                LlmError::timeout(self.timeout.as_secs())
            }
            SdkError::DispatchFailure(_) => {
                LlmError::transient_network(format!("bedrock request failed: {err}"), None)
            }
            SdkError::ServiceError(context) => {
                let service_err = context.err();
                if service_err.is_throttling_exception() {
                    LlmError::rate_limit_exceeded(60)
                } else if service_err.is_access_denied_exception() {
                    LlmError::authentication_failed(format!(
                        "bedrock rejected the credentials: {service_err}"
                    ))
                } else if service_err.is_model_timeout_exception() {
                    LlmError::timeout(self.timeout.as_secs())
                } else if service_err.is_internal_server_exception()
                    || service_err.is_service_unavailable_exception()
                    || service_err.is_model_not_ready_exception()
                {
                    LlmError::transient_network(
                        format!("bedrock service error: {service_err}"),
                        None,
                    )
                } else {
                    LlmError::request_failed(format!("bedrock API error: {service_err}"))
                }
            }
            _ => LlmError::request_failed(format!("bedrock request failed: {err}")),
        }
    }
}

#[async_trait]
impl ProviderAdapter for BedrockAdapter {
    async fn raw_complete<'a>(
        &self,
        prompt: &str,
        system_prompt: Option<&'a str>,
        max_tokens: u32,
    ) -> LlmResult<String> {
        let request =
            MessagesRequest::for_hosted(BEDROCK_ANTHROPIC_VERSION, prompt, system_prompt, max_tokens);
        let body = serde_json::to_vec(&request).map_err(|e| {
            LlmError::request_failed(format!("failed to encode bedrock request: {e}"))
        })?;

        let output = self
            .client
            .invoke_model()
            .model_id(&self.model)
            .content_type("application/json")
            .accept("application/json")
            .body(Blob::new(body))
            .send()
            .await
            .map_err(|e| {
                log_error!(model = %self.model, error = %e, "Bedrock invoke_model failed");
                self.classify_sdk_error(e)
            })?;

        let raw = String::from_utf8_lossy(output.body().as_ref()).into_owned();
        http::parse_messages_response("bedrock", &raw)
    }

    fn provider_name(&self) -> &'static str {
        "bedrock"
    }

    fn model_id(&self) -> &str {
        &self.model
    }
}
