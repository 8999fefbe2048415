//! Cloud backend adapters
//!
//! One adapter per backend, all implementing [`ProviderAdapter`]:
//!
//! - **anthropic**: the Anthropic Messages API, called directly
//! - **vertex**: Anthropic-published models hosted on Google Vertex AI
//! - **bedrock**: Anthropic-published models hosted on AWS Bedrock
//!
//! Adapters translate the canonical model id into their backend's naming at
//! construction, issue raw completion calls, and convert every transport
//! failure into a classified [`LlmError`](crate::error::LlmError). Retry
//! policy is not their concern; the
//! [`RetryExecutor`](crate::retry::RetryExecutor) decorates any adapter from
//! the outside.

use crate::error::LlmResult;
use async_trait::async_trait;
#[cfg(test)]
use mockall::automock;

pub mod anthropic;
pub mod bedrock;
pub(crate) mod http;
pub(crate) mod model_id;
pub(crate) mod types;
pub mod vertex;

// Re-export the adapter structs
pub use anthropic::AnthropicAdapter;
pub use bedrock::BedrockAdapter;
pub use vertex::VertexAdapter;

/// Uniform calling contract over one cloud backend.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait ProviderAdapter: Send + Sync {
    /// Issue one completion request, without retries.
    ///
    /// Returns the generated text. Failures are classified
    /// [`LlmError`](crate::error::LlmError) values; nothing transport-level
    /// escapes an adapter unclassified.
    async fn raw_complete<'a>(
        &self,
        prompt: &str,
        system_prompt: Option<&'a str>,
        max_tokens: u32,
    ) -> LlmResult<String>;

    /// Confirm credentials and connectivity with one minimal live call.
    ///
    /// Not for business logic; the generated text is discarded.
    async fn validate_access(&self) -> LlmResult<()> {
        self.raw_complete("Hi", None, 1).await.map(|_| ())
    }

    /// Backend identifier for logging: "anthropic", "vertex", or "bedrock".
    fn provider_name(&self) -> &'static str;

    /// Model identifier in the backend's native naming scheme.
    fn model_id(&self) -> &str;
}
