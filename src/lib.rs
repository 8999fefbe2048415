//! # triage-llm
//!
//! Multi-provider LLM client for triaging static-analysis security findings.
//!
//! ## Key Features
//!
//! - **Multiple Providers**: Anthropic API, Vertex AI, and AWS Bedrock
//!   behind one uniform client
//! - **Model Name Translation**: one canonical Claude model id, translated
//!   to each backend's native naming scheme
//! - **Resilience**: shared retry protocol with error classification and
//!   capped exponential backoff
//! - **Structured Verdicts**: per-finding true/false-positive judgments,
//!   parsed and validated from strict-JSON model output
//!
//! ## Example
//!
//! ```rust,no_run
//! use triage_llm::{Finding, LlmClient};
//!
//! # async fn example() -> triage_llm::LlmResult<()> {
//! let client = LlmClient::from_env().await?;
//! client.validate_access().await?;
//!
//! let finding = Finding::new(
//!     "src/handlers.rs",
//!     42,
//!     "HIGH",
//!     "SQL query built by string concatenation",
//! );
//! let verdict = client.analyze_finding(&finding, None, None).await?;
//! if !verdict.keep_finding {
//!     println!("excluded: {}", verdict.exclusion_reason);
//! }
//! # Ok(())
//! # }
//! ```

// Logging utilities (re-exports tracing with log_* naming) - internal only
pub(crate) mod logging;

pub mod analysis;
pub mod client;
pub mod config;
pub mod error;
pub mod providers;
pub mod retry;

#[cfg(test)]
pub mod tests;

// Re-export main types
pub use analysis::{AnalysisResult, Finding, PrContext};
pub use client::LlmClient;
pub use config::{CloudProvider, LLMConfig, ProviderCredentials};
pub use error::{LlmError, LlmResult};
pub use providers::{AnthropicAdapter, BedrockAdapter, ProviderAdapter, VertexAdapter};
pub use retry::{RetryExecutor, RetryPolicy};
