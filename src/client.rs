//! Uniform client over the three backend adapters.

use crate::analysis::{self, AnalysisResult, Finding, PrContext};
use crate::config::{LLMConfig, ProviderCredentials};
use crate::error::LlmResult;
use crate::logging::log_debug;
use crate::providers::{AnthropicAdapter, BedrockAdapter, ProviderAdapter, VertexAdapter};
use crate::retry::{RetryExecutor, RetryPolicy};
use std::sync::Arc;

/// Multi-provider LLM client for finding analysis.
///
/// Construct once per run and reuse across analyses. The adapter holds the
/// only long-lived transport state, and the client is safe to share across
/// concurrent tasks — there is no mutable state between analyses.
pub struct LlmClient {
    adapter: Arc<dyn ProviderAdapter>,
    retry: RetryExecutor,
}

impl std::fmt::Debug for LlmClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LlmClient")
            .field("provider", &self.adapter.provider_name())
            .field("model", &self.adapter.model_id())
            .field("retry", &self.retry)
            .finish()
    }
}

impl LlmClient {
    /// Build a client for the backend named by `config.credentials`.
    ///
    /// # Errors
    ///
    /// Returns [`LlmError::ConfigurationError`](crate::error::LlmError) when
    /// validation fails or the backend's credential source cannot be
    /// resolved. Construction is the only hard failure surface: every later
    /// operation reports failures through its return value.
    pub async fn new(config: LLMConfig) -> LlmResult<Self> {
        config.validate()?;

        let adapter: Arc<dyn ProviderAdapter> = match &config.credentials {
            ProviderCredentials::Anthropic { api_key } => Arc::new(AnthropicAdapter::new(
                api_key,
                &config.model,
                config.timeout,
            )?),
            ProviderCredentials::Vertex { project_id, region } => Arc::new(
                VertexAdapter::new(project_id, region, &config.model, config.timeout).await?,
            ),
            ProviderCredentials::Bedrock { aws_region } => Arc::new(
                BedrockAdapter::new(aws_region, &config.model, config.timeout).await?,
            ),
        };

        log_debug!(
            provider = adapter.provider_name(),
            model = adapter.model_id(),
            "LLM client created"
        );

        Ok(Self {
            adapter,
            retry: RetryExecutor::new(RetryPolicy::with_max_retries(config.max_retries)),
        })
    }

    /// Build a client from environment variables (see [`LLMConfig::from_env`]).
    pub async fn from_env() -> LlmResult<Self> {
        Self::new(LLMConfig::from_env()?).await
    }

    /// Wire a caller-supplied adapter behind the shared retry layer.
    pub fn from_adapter(adapter: Arc<dyn ProviderAdapter>, policy: RetryPolicy) -> Self {
        Self {
            adapter,
            retry: RetryExecutor::new(policy),
        }
    }

    /// Backend identifier: "anthropic", "vertex", or "bedrock".
    pub fn provider_name(&self) -> &'static str {
        self.adapter.provider_name()
    }

    /// Model identifier in the backend's native naming scheme.
    pub fn model_id(&self) -> &str {
        self.adapter.model_id()
    }

    /// Confirm credentials and connectivity with one minimal live call.
    ///
    /// A single probe without retries, intended for startup checks.
    pub async fn validate_access(&self) -> LlmResult<()> {
        self.adapter.validate_access().await
    }

    /// One completion under the shared retry policy.
    pub async fn complete_with_retry(
        &self,
        prompt: &str,
        system_prompt: Option<&str>,
        max_tokens: u32,
    ) -> LlmResult<String> {
        self.retry
            .execute(|| self.adapter.raw_complete(prompt, system_prompt, max_tokens))
            .await
    }

    /// Judge one finding as a true or false positive.
    ///
    /// `custom_instructions` are appended to the prompt verbatim as an
    /// additional directive; they are never interpreted by the client. Call
    /// failures propagate unchanged; a transport-successful reply that fails
    /// verdict validation is a
    /// [`MalformedResponse`](crate::error::LlmError::MalformedResponse)
    /// carrying the raw text.
    pub async fn analyze_finding(
        &self,
        finding: &Finding,
        pr_context: Option<&PrContext>,
        custom_instructions: Option<&str>,
    ) -> LlmResult<AnalysisResult> {
        let prompt = analysis::build_analysis_prompt(finding, pr_context, custom_instructions);
        let response = self
            .complete_with_retry(
                &prompt,
                Some(analysis::ANALYSIS_SYSTEM_PROMPT),
                analysis::ANALYSIS_MAX_TOKENS,
            )
            .await?;
        analysis::parse_verdict(&response)
    }
}
