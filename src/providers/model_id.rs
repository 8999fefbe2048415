//! Canonical → provider-native model identifier translation.
//!
//! Callers configure one canonical Claude id (e.g. `claude-opus-4-20250514`).
//! The Anthropic API accepts it unchanged; Vertex AI wants the release date
//! behind an `@`; Bedrock wants an `anthropic.` prefix and a `-vN:0` suffix.
//! Translation happens once, at adapter construction.

use once_cell::sync::Lazy;
use regex::Regex;

/// Canonical id shape: `claude-<family>[-v2]-<YYYYMMDD>`.
static CANONICAL_ID: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(claude-[A-Za-z0-9.-]+?)(-v2)?-([0-9]{8})$").expect("canonical model id pattern")
});

/// Bedrock-native id shape: `anthropic.<model>-vN:M`.
static BEDROCK_NATIVE_ID: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^anthropic\..+-v[0-9]+:[0-9]+$").expect("bedrock native id pattern"));

/// Translate a canonical id into Vertex AI naming.
///
/// `claude-opus-4-20250514` becomes `claude-opus-4@20250514`, and a `-v2`
/// marker before the date is dropped: `claude-3-5-sonnet-v2-20241022`
/// becomes `claude-3-5-sonnet@20241022`. Ids without a date suffix are
/// returned unchanged and left for the backend to reject.
pub(crate) fn vertex_model_id(model: &str) -> String {
    match CANONICAL_ID.captures(model) {
        Some(caps) => format!("{}@{}", &caps[1], &caps[3]),
        None => model.to_string(),
    }
}

/// Translate a canonical id into Bedrock naming.
///
/// `claude-opus-4-20250514` becomes `anthropic.claude-opus-4-20250514-v1:0`,
/// and a `-v2` marker moves into the suffix: `claude-3-5-sonnet-v2-20241022`
/// becomes `anthropic.claude-3-5-sonnet-20241022-v2:0`. Ids already in
/// Bedrock form are returned unchanged, so the translation is idempotent.
pub(crate) fn bedrock_model_id(model: &str) -> String {
    if BEDROCK_NATIVE_ID.is_match(model) {
        return model.to_string();
    }
    match CANONICAL_ID.captures(model) {
        Some(caps) => {
            let version = if caps.get(2).is_some() { "v2" } else { "v1" };
            format!("anthropic.{}-{}-{}:0", &caps[1], &caps[3], version)
        }
        None => model.to_string(),
    }
}
