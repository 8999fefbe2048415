//! Provider configuration and environment loading.
//!
//! [`LLMConfig`] is built once, validated before any network use, and handed
//! to [`LlmClient::new`](crate::client::LlmClient::new). Credentials are a
//! sum type keyed by provider, so each variant carries exactly the fields
//! that backend needs; validation reduces to rejecting empty strings.
//!
//! [`LLMConfig::from_env`] is the only place in the crate that reads
//! environment variables.

use crate::error::{LlmError, LlmResult};
use crate::logging::log_debug;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

/// Canonical model used when `CLAUDE_MODEL` is unset.
pub const DEFAULT_MODEL: &str = "claude-opus-4-20250514";

/// Per-call timeout used when `LLM_TIMEOUT_SECONDS` is unset.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(180);

/// Retry budget used when `LLM_MAX_RETRIES` is unset.
pub const DEFAULT_MAX_RETRIES: u32 = 3;

/// Vertex region used when `GOOGLE_CLOUD_REGION` is unset.
pub const DEFAULT_VERTEX_REGION: &str = "us-central1";

/// Bedrock region used when `AWS_REGION` is unset.
pub const DEFAULT_BEDROCK_REGION: &str = "us-east-1";

/// Supported cloud backends for Claude models.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CloudProvider {
    Anthropic,
    Vertex,
    Bedrock,
}

impl FromStr for CloudProvider {
    type Err = LlmError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "anthropic" => Ok(Self::Anthropic),
            "vertex" => Ok(Self::Vertex),
            "bedrock" => Ok(Self::Bedrock),
            _ => Err(LlmError::unsupported_provider(s.trim())),
        }
    }
}

impl fmt::Display for CloudProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Anthropic => write!(f, "anthropic"),
            Self::Vertex => write!(f, "vertex"),
            Self::Bedrock => write!(f, "bedrock"),
        }
    }
}

/// Credentials for one backend.
///
/// Each variant carries only the fields its backend requires, which makes a
/// config with credentials for the wrong provider unrepresentable. Vertex
/// and Bedrock resolve the actual secret material through their cloud
/// credential chains; only the routing fields live here.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProviderCredentials {
    Anthropic { api_key: String },
    Vertex { project_id: String, region: String },
    Bedrock { aws_region: String },
}

impl ProviderCredentials {
    /// The backend these credentials belong to.
    pub fn provider(&self) -> CloudProvider {
        match self {
            Self::Anthropic { .. } => CloudProvider::Anthropic,
            Self::Vertex { .. } => CloudProvider::Vertex,
            Self::Bedrock { .. } => CloudProvider::Bedrock,
        }
    }

    fn validate(&self) -> LlmResult<()> {
        let missing = match self {
            Self::Anthropic { api_key } if api_key.is_empty() => {
                "Anthropic API key is required (ANTHROPIC_API_KEY)"
            }
            Self::Vertex { project_id, .. } if project_id.is_empty() => {
                "Google Cloud project ID is required (GOOGLE_CLOUD_PROJECT)"
            }
            Self::Vertex { region, .. } if region.is_empty() => {
                "Google Cloud region is required (GOOGLE_CLOUD_REGION)"
            }
            Self::Bedrock { aws_region } if aws_region.is_empty() => {
                "AWS region is required (AWS_REGION)"
            }
            _ => return Ok(()),
        };
        Err(LlmError::configuration_error(missing))
    }
}

/// Configuration for an LLM client.
///
/// Immutable after construction; one config builds one client, reused for
/// the lifetime of the run.
#[derive(Debug, Clone)]
pub struct LLMConfig {
    /// Backend selection plus the fields that backend requires.
    pub credentials: ProviderCredentials,
    /// Canonical model identifier, e.g. `claude-opus-4-20250514`. Adapters
    /// translate it to their backend's native naming at construction.
    pub model: String,
    /// Timeout applied to each raw network call (not the retry sequence).
    pub timeout: Duration,
    /// Retries allowed on top of the initial attempt.
    pub max_retries: u32,
}

impl LLMConfig {
    /// Config with the default model/timeout/retry knobs.
    pub fn new(credentials: ProviderCredentials, model: impl Into<String>) -> Self {
        Self {
            credentials,
            model: model.into(),
            timeout: DEFAULT_TIMEOUT,
            max_retries: DEFAULT_MAX_RETRIES,
        }
    }

    /// Validate the configuration before any network use.
    ///
    /// # Errors
    ///
    /// Returns [`LlmError::ConfigurationError`] naming the missing field and
    /// its environment-variable source.
    pub fn validate(&self) -> LlmResult<()> {
        self.credentials.validate()?;
        if self.model.is_empty() {
            return Err(LlmError::configuration_error(
                "model identifier is required (CLAUDE_MODEL)",
            ));
        }
        Ok(())
    }

    /// Load configuration from environment variables.
    ///
    /// Recognized variables: `LLM_PROVIDER` (anthropic | vertex | bedrock),
    /// `CLAUDE_MODEL`, `LLM_TIMEOUT_SECONDS`, `LLM_MAX_RETRIES`, plus the
    /// per-provider credentials `ANTHROPIC_API_KEY`, `GOOGLE_CLOUD_PROJECT`,
    /// `GOOGLE_CLOUD_REGION`, and `AWS_REGION`.
    ///
    /// # Errors
    ///
    /// Returns [`LlmError::UnsupportedProvider`] for an unrecognized
    /// `LLM_PROVIDER` value — there is no silent fallback to a default
    /// backend — and [`LlmError::ConfigurationError`] for missing
    /// credentials or malformed numeric values.
    pub fn from_env() -> LlmResult<Self> {
        let provider: CloudProvider = env_or("LLM_PROVIDER", "anthropic").parse()?;

        let credentials = match provider {
            CloudProvider::Anthropic => ProviderCredentials::Anthropic {
                api_key: require_env("ANTHROPIC_API_KEY", "Anthropic API key")?,
            },
            CloudProvider::Vertex => ProviderCredentials::Vertex {
                project_id: require_env("GOOGLE_CLOUD_PROJECT", "Google Cloud project ID")?,
                region: env_or("GOOGLE_CLOUD_REGION", DEFAULT_VERTEX_REGION),
            },
            CloudProvider::Bedrock => ProviderCredentials::Bedrock {
                aws_region: env_or("AWS_REGION", DEFAULT_BEDROCK_REGION),
            },
        };

        let config = Self {
            credentials,
            model: env_or("CLAUDE_MODEL", DEFAULT_MODEL),
            timeout: Duration::from_secs(parse_env(
                "LLM_TIMEOUT_SECONDS",
                DEFAULT_TIMEOUT.as_secs(),
            )?),
            max_retries: parse_env("LLM_MAX_RETRIES", DEFAULT_MAX_RETRIES)?,
        };
        config.validate()?;

        log_debug!(
            provider = %config.credentials.provider(),
            model = %config.model,
            timeout_seconds = config.timeout.as_secs(),
            max_retries = config.max_retries,
            "LLM configuration loaded from environment"
        );

        Ok(config)
    }
}

fn env_or(name: &str, default: &str) -> String {
    std::env::var(name)
        .ok()
        .filter(|value| !value.trim().is_empty())
        .unwrap_or_else(|| default.to_string())
}

fn require_env(name: &str, label: &str) -> LlmResult<String> {
    std::env::var(name)
        .ok()
        .filter(|value| !value.trim().is_empty())
        .ok_or_else(|| LlmError::configuration_error(format!("{label} is required ({name})")))
}

fn parse_env<T: FromStr>(name: &str, default: T) -> LlmResult<T> {
    match std::env::var(name) {
        Ok(raw) if !raw.trim().is_empty() => raw.trim().parse().map_err(|_| {
            LlmError::configuration_error(format!("invalid {name}: {raw:?} is not a number"))
        }),
        _ => Ok(default),
    }
}
