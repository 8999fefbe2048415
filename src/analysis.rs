//! Finding analysis: prompt construction and verdict parsing.
//!
//! A [`Finding`] plus optional [`PrContext`] and optional custom filtering
//! instructions become one deterministic prompt; the model's reply must be a
//! single JSON object carrying the verdict, which is validated here into an
//! [`AnalysisResult`]. Nothing in this module touches the network — the
//! client wires these functions around the retrying call.

use crate::error::{LlmError, LlmResult};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt::Write;

/// Completion budget for one finding analysis.
pub(crate) const ANALYSIS_MAX_TOKENS: u32 = 16384;

/// System prompt pinning the verdict contract.
pub(crate) const ANALYSIS_SYSTEM_PROMPT: &str = "\
You are a senior application security engineer reviewing findings produced \
by an automated security scanner on a pull request. Judge whether each \
finding is a true positive worth human attention or a false positive that \
should be filtered out. Treat hardcoded credentials in test fixtures, \
unreachable code, and issues the surrounding code already mitigates as \
likely false positives; treat exploitable injection, authentication, and \
data-exposure issues as findings to keep.

Respond with a single JSON object and nothing else, using exactly these keys:
  \"confidence_score\": number from 1 to 10 rating your confidence in the verdict,
  \"keep_finding\": boolean, true when the finding should be kept,
  \"exclusion_reason\": string naming why the finding was excluded, empty when kept,
  \"justification\": string explaining the decision";

/// One security-scanner finding.
///
/// The named fields cover the common scanner schema; anything else the
/// scanner emits is preserved in `extra` and passed through to the model
/// unmodified.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Finding {
    pub file: String,
    pub line: u64,
    pub severity: String,
    pub description: String,
    /// Scanner-defined fields beyond the common schema.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Finding {
    pub fn new(
        file: impl Into<String>,
        line: u64,
        severity: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            file: file.into(),
            line,
            severity: severity.into(),
            description: description.into(),
            extra: Map::new(),
        }
    }
}

/// Pull-request context attached to the analysis prompt.
///
/// Purely additive: the verdict contract does not change when it is absent.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PrContext {
    pub repo_name: String,
    pub pr_number: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Verdict for one finding.
///
/// Produced fresh per call and owned by the caller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    /// The model's self-reported confidence, clamped to [1, 10]. Advisory.
    pub confidence_score: f64,
    /// Whether the finding should be kept as a true positive.
    pub keep_finding: bool,
    /// Why the finding was excluded; empty when kept.
    pub exclusion_reason: String,
    /// The model's explanation of the decision.
    pub justification: String,
}

/// Build the analysis prompt for one finding.
///
/// The finding is embedded as pretty-printed JSON so scanner-defined fields
/// survive unmodified. Custom instructions are appended verbatim as an
/// additional directive, never interpreted.
pub(crate) fn build_analysis_prompt(
    finding: &Finding,
    pr_context: Option<&PrContext>,
    custom_instructions: Option<&str>,
) -> String {
    let mut prompt = String::from(
        "Analyze the following security finding and decide whether it is a \
         true positive or a false positive.\n",
    );

    if let Some(context) = pr_context {
        prompt.push_str("\n## Pull request\n");
        let _ = writeln!(prompt, "Repository: {}", context.repo_name);
        let _ = writeln!(prompt, "PR number: {}", context.pr_number);
        if let Some(title) = &context.title {
            let _ = writeln!(prompt, "Title: {title}");
        }
        for (key, value) in &context.extra {
            let _ = writeln!(prompt, "{key}: {value}");
        }
    }

    prompt.push_str("\n## Finding\n");
    let finding_json =
        serde_json::to_string_pretty(finding).unwrap_or_else(|_| format!("{finding:?}"));
    prompt.push_str(&finding_json);
    prompt.push('\n');

    if let Some(instructions) = custom_instructions {
        prompt.push_str("\n## Additional filtering instructions\n");
        prompt.push_str(instructions);
        prompt.push('\n');
    }

    prompt
}

/// Parse and validate a model response into an [`AnalysisResult`].
///
/// The response must be a single JSON object (markdown code fences are
/// stripped first). `keep_finding` is mandatory and must coerce to a
/// boolean; `confidence_score` coerces from a number or numeric string and
/// is clamped to [1, 10] — the value is advisory, so out-of-range replies
/// are clamped rather than rejected, and an absent score defaults to the
/// midpoint. Missing `exclusion_reason`/`justification` default to empty
/// strings.
///
/// # Errors
///
/// Returns [`LlmError::MalformedResponse`] with the raw text attached when
/// the payload is not a JSON object or `keep_finding` is unusable.
pub(crate) fn parse_verdict(text: &str) -> LlmResult<AnalysisResult> {
    let stripped = strip_code_fences(text);

    let value: Value = serde_json::from_str(stripped)
        .map_err(|e| LlmError::malformed_response(format!("verdict is not valid JSON: {e}"), text))?;

    let object = value
        .as_object()
        .ok_or_else(|| LlmError::malformed_response("verdict is not a JSON object", text))?;

    let keep_finding = object
        .get("keep_finding")
        .and_then(coerce_bool)
        .ok_or_else(|| {
            LlmError::malformed_response("verdict is missing a usable \"keep_finding\" boolean", text)
        })?;

    let confidence_score = object
        .get("confidence_score")
        .and_then(coerce_number)
        .map(|score| score.clamp(1.0, 10.0))
        .unwrap_or(5.0);

    Ok(AnalysisResult {
        confidence_score,
        keep_finding,
        exclusion_reason: string_or_empty(object.get("exclusion_reason")),
        justification: string_or_empty(object.get("justification")),
    })
}

/// Strip a surrounding markdown code fence, with or without a `json` tag.
fn strip_code_fences(text: &str) -> &str {
    let trimmed = text.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let rest = rest.strip_prefix("json").unwrap_or(rest);
    rest.trim_end_matches('`').trim()
}

fn coerce_bool(value: &Value) -> Option<bool> {
    match value {
        Value::Bool(b) => Some(*b),
        Value::String(s) => match s.trim().to_ascii_lowercase().as_str() {
            "true" => Some(true),
            "false" => Some(false),
            _ => None,
        },
        _ => None,
    }
}

fn coerce_number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn string_or_empty(value: Option<&Value>) -> String {
    match value {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Null) | None => String::new(),
        Some(other) => other.to_string(),
    }
}
