//! Anthropic Messages API request and response type definitions
//!
//! All three backends speak the same message schema. The direct API names
//! the model in the body; Vertex and Bedrock name it in the endpoint and
//! take an `anthropic_version` marker in the body instead.

use serde::{Deserialize, Serialize};

/// Version marker required by Claude-on-Vertex request bodies.
pub(crate) const VERTEX_ANTHROPIC_VERSION: &str = "vertex-2023-10-16";

/// Version marker required by Claude-on-Bedrock request bodies.
pub(crate) const BEDROCK_ANTHROPIC_VERSION: &str = "bedrock-2023-05-31";

/// Messages API request structure (text-only subset).
#[derive(Debug, Clone, Serialize)]
pub(crate) struct MessagesRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub anthropic_version: Option<String>,
    pub max_tokens: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub system: Option<String>,
    pub messages: Vec<Message>,
}

impl MessagesRequest {
    /// Body for the direct Anthropic API, which names the model in the body.
    pub fn for_anthropic(
        model: &str,
        prompt: &str,
        system_prompt: Option<&str>,
        max_tokens: u32,
    ) -> Self {
        Self {
            model: Some(model.to_string()),
            anthropic_version: None,
            max_tokens,
            system: system_prompt.map(str::to_string),
            messages: vec![Message::user(prompt)],
        }
    }

    /// Body for a hosted backend, which names the model in the endpoint and
    /// requires an `anthropic_version` marker instead.
    pub fn for_hosted(
        version: &str,
        prompt: &str,
        system_prompt: Option<&str>,
        max_tokens: u32,
    ) -> Self {
        Self {
            model: None,
            anthropic_version: Some(version.to_string()),
            max_tokens,
            system: system_prompt.map(str::to_string),
            messages: vec![Message::user(prompt)],
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub(crate) struct Message {
    pub role: String,
    pub content: String,
}

impl Message {
    fn user(content: &str) -> Self {
        Self {
            role: "user".to_string(),
            content: content.to_string(),
        }
    }
}

/// Messages API response subset shared by all three backends.
#[derive(Debug, Deserialize)]
pub(crate) struct MessagesResponse {
    pub content: Vec<ContentBlock>,
    #[serde(default)]
    pub stop_reason: Option<String>,
}

/// Lenient content block: only `text` blocks are consumed, anything else
/// deserializes with empty text and is skipped.
#[derive(Debug, Deserialize)]
pub(crate) struct ContentBlock {
    #[serde(rename = "type")]
    pub block_type: String,
    #[serde(default)]
    pub text: String,
}

impl MessagesResponse {
    /// Concatenated text of all text blocks, in response order.
    pub fn text(&self) -> String {
        let mut out = String::new();
        for block in &self.content {
            if block.block_type != "text" || block.text.is_empty() {
                continue;
            }
            if !out.is_empty() {
                out.push('\n');
            }
            out.push_str(&block.text);
        }
        out
    }
}
