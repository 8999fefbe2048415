// Unit tests for prompt construction and verdict parsing, plus the analysis
// flow driven through a mocked adapter.

use crate::analysis::{
    build_analysis_prompt, parse_verdict, Finding, PrContext, ANALYSIS_MAX_TOKENS,
};
use crate::client::LlmClient;
use crate::error::LlmError;
use crate::providers::MockProviderAdapter;
use crate::retry::RetryPolicy;
use serde_json::json;
use std::sync::Arc;

fn sample_finding() -> Finding {
    let mut finding = Finding::new(
        "src/auth/session.rs",
        87,
        "HIGH",
        "Session token compared with non-constant-time equality",
    );
    finding
        .extra
        .insert("rule_id".to_string(), json!("timing-attack"));
    finding
}

fn sample_context() -> PrContext {
    PrContext {
        repo_name: "acme/widget".to_string(),
        pr_number: 123,
        title: Some("Add session handling".to_string()),
        extra: Default::default(),
    }
}

// ============================================================================
// Prompt construction
// ============================================================================

#[test]
fn prompt_embeds_every_finding_field() {
    let prompt = build_analysis_prompt(&sample_finding(), None, None);

    assert!(prompt.contains("src/auth/session.rs"));
    assert!(prompt.contains("87"));
    assert!(prompt.contains("HIGH"));
    assert!(prompt.contains("non-constant-time equality"));
    // Scanner-defined extras ride along unmodified.
    assert!(prompt.contains("timing-attack"));
}

#[test]
fn prompt_includes_pr_context_only_when_present() {
    let without = build_analysis_prompt(&sample_finding(), None, None);
    assert!(!without.contains("## Pull request"));

    let with = build_analysis_prompt(&sample_finding(), Some(&sample_context()), None);
    assert!(with.contains("## Pull request"));
    assert!(with.contains("acme/widget"));
    assert!(with.contains("123"));
    assert!(with.contains("Add session handling"));
}

#[test]
fn custom_instructions_are_appended_verbatim() {
    let instructions = "Ignore anything under tests/fixtures/.";
    let prompt = build_analysis_prompt(&sample_finding(), None, Some(instructions));

    assert!(prompt.contains(instructions));
    // The instructions come after the finding payload.
    let finding_at = prompt.find("## Finding").unwrap();
    let instructions_at = prompt.find(instructions).unwrap();
    assert!(instructions_at > finding_at);
}

#[test]
fn prompt_is_deterministic() {
    let a = build_analysis_prompt(&sample_finding(), Some(&sample_context()), Some("x"));
    let b = build_analysis_prompt(&sample_finding(), Some(&sample_context()), Some("x"));
    assert_eq!(a, b);
}

// ============================================================================
// Verdict parsing
// ============================================================================

#[test]
fn well_formed_verdict_parses() {
    let result = parse_verdict(
        r#"{"keep_finding": false, "confidence_score": 9, "exclusion_reason": "test-only code", "justification": "The flagged file is a fixture."}"#,
    )
    .unwrap();

    assert!(!result.keep_finding);
    assert_eq!(result.confidence_score, 9.0);
    assert_eq!(result.exclusion_reason, "test-only code");
    assert_eq!(result.justification, "The flagged file is a fixture.");
}

#[test]
fn fenced_verdict_parses() {
    let result = parse_verdict(
        "```json\n{\"keep_finding\": true, \"confidence_score\": 7, \"exclusion_reason\": \"\", \"justification\": \"Reachable from user input.\"}\n```",
    )
    .unwrap();

    assert!(result.keep_finding);
    assert_eq!(result.confidence_score, 7.0);
}

#[test]
fn confidence_is_clamped_not_rejected() {
    let high = parse_verdict(r#"{"keep_finding": true, "confidence_score": 22}"#).unwrap();
    assert_eq!(high.confidence_score, 10.0);

    let low = parse_verdict(r#"{"keep_finding": true, "confidence_score": 0}"#).unwrap();
    assert_eq!(low.confidence_score, 1.0);
}

#[test]
fn string_typed_values_coerce() {
    let result =
        parse_verdict(r#"{"keep_finding": "true", "confidence_score": "8.5"}"#).unwrap();
    assert!(result.keep_finding);
    assert_eq!(result.confidence_score, 8.5);
}

#[test]
fn missing_optional_keys_default_to_empty() {
    let result = parse_verdict(r#"{"keep_finding": true, "confidence_score": 6}"#).unwrap();
    assert_eq!(result.exclusion_reason, "");
    assert_eq!(result.justification, "");
}

#[test]
fn missing_confidence_defaults_to_midpoint() {
    let result = parse_verdict(r#"{"keep_finding": false}"#).unwrap();
    assert_eq!(result.confidence_score, 5.0);
}

#[test]
fn non_json_text_is_a_malformed_response() {
    let err = parse_verdict("I think this one is fine to keep.").unwrap_err();
    match err {
        LlmError::MalformedResponse { raw, .. } => {
            assert!(raw.contains("fine to keep"), "raw text kept for diagnosis");
        }
        other => panic!("expected MalformedResponse, got: {other:?}"),
    }
}

#[test]
fn non_object_json_is_a_malformed_response() {
    assert!(matches!(
        parse_verdict("[1, 2, 3]").unwrap_err(),
        LlmError::MalformedResponse { .. }
    ));
}

#[test]
fn missing_keep_finding_is_a_malformed_response() {
    let err = parse_verdict(r#"{"confidence_score": 9}"#).unwrap_err();
    match err {
        LlmError::MalformedResponse { message, .. } => {
            assert!(message.contains("keep_finding"), "got: {message}");
        }
        other => panic!("expected MalformedResponse, got: {other:?}"),
    }
}

#[test]
fn untypeable_keep_finding_is_a_malformed_response() {
    assert!(matches!(
        parse_verdict(r#"{"keep_finding": "maybe"}"#).unwrap_err(),
        LlmError::MalformedResponse { .. }
    ));
}

// ============================================================================
// Analysis flow through a mocked adapter
// ============================================================================

#[tokio::test]
async fn analyze_finding_uses_the_fixed_token_budget_and_system_prompt() {
    let mut adapter = MockProviderAdapter::new();
    adapter
        .expect_raw_complete()
        .withf(|prompt, system_prompt, max_tokens| {
            prompt.contains("src/auth/session.rs")
                && system_prompt.is_some()
                && *max_tokens == ANALYSIS_MAX_TOKENS
        })
        .times(1)
        .returning(|_, _, _| {
            Ok(r#"{"keep_finding": false, "confidence_score": 9, "exclusion_reason": "test-only code", "justification": "fixture"}"#.to_string())
        });

    let client = LlmClient::from_adapter(Arc::new(adapter), RetryPolicy::with_max_retries(0));
    let verdict = client
        .analyze_finding(&sample_finding(), None, None)
        .await
        .unwrap();

    assert!(!verdict.keep_finding);
    assert_eq!(verdict.confidence_score, 9.0);
}

#[tokio::test]
async fn analyze_finding_propagates_call_failures_unchanged() {
    let mut adapter = MockProviderAdapter::new();
    adapter
        .expect_raw_complete()
        .times(1)
        .returning(|_, _, _| Err(LlmError::authentication_failed("bad key")));

    let client = LlmClient::from_adapter(Arc::new(adapter), RetryPolicy::with_max_retries(3));
    let err = client
        .analyze_finding(&sample_finding(), None, None)
        .await
        .unwrap_err();

    assert!(matches!(err, LlmError::AuthenticationFailed { .. }));
}

#[tokio::test]
async fn analyze_finding_reports_unparseable_replies() {
    let mut adapter = MockProviderAdapter::new();
    adapter
        .expect_raw_complete()
        .times(1)
        .returning(|_, _, _| Ok("Sure! Here's my analysis:".to_string()));

    let client = LlmClient::from_adapter(Arc::new(adapter), RetryPolicy::with_max_retries(0));
    let err = client
        .analyze_finding(&sample_finding(), None, None)
        .await
        .unwrap_err();

    assert!(matches!(err, LlmError::MalformedResponse { .. }));
}
