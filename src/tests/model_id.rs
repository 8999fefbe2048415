// Unit tests for canonical → provider-native model id translation.
//
// Translation is a pure function of the canonical id, so every case is a
// plain table check: Vertex output carries exactly one `@`, Bedrock output
// carries the `anthropic.` prefix and a `-vN:0` suffix, and feeding Bedrock
// its own output changes nothing.

use crate::providers::model_id::{bedrock_model_id, vertex_model_id};

#[test]
fn vertex_moves_the_date_behind_an_at_sign() {
    assert_eq!(
        vertex_model_id("claude-opus-4-20250514"),
        "claude-opus-4@20250514"
    );
    assert_eq!(
        vertex_model_id("claude-3-sonnet-20240229"),
        "claude-3-sonnet@20240229"
    );
}

#[test]
fn vertex_drops_the_v2_marker() {
    assert_eq!(
        vertex_model_id("claude-3-5-sonnet-v2-20241022"),
        "claude-3-5-sonnet@20241022"
    );
}

#[test]
fn vertex_output_contains_exactly_one_at_sign() {
    for id in [
        "claude-opus-4-20250514",
        "claude-3-5-sonnet-v2-20241022",
        "claude-3-haiku-20240307",
    ] {
        let translated = vertex_model_id(id);
        assert_eq!(
            translated.matches('@').count(),
            1,
            "expected one @ in {translated}"
        );
    }
}

#[test]
fn vertex_passes_undated_ids_through() {
    assert_eq!(
        vertex_model_id("claude-3-5-sonnet-latest"),
        "claude-3-5-sonnet-latest"
    );
}

#[test]
fn bedrock_adds_prefix_and_v1_suffix() {
    assert_eq!(
        bedrock_model_id("claude-opus-4-20250514"),
        "anthropic.claude-opus-4-20250514-v1:0"
    );
    assert_eq!(
        bedrock_model_id("claude-3-sonnet-20240229"),
        "anthropic.claude-3-sonnet-20240229-v1:0"
    );
}

#[test]
fn bedrock_moves_the_v2_marker_into_the_suffix() {
    assert_eq!(
        bedrock_model_id("claude-3-5-sonnet-v2-20241022"),
        "anthropic.claude-3-5-sonnet-20241022-v2:0"
    );
}

#[test]
fn bedrock_translation_is_idempotent_for_native_ids() {
    let native = "anthropic.claude-3-sonnet-20240229-v1:0";
    assert_eq!(bedrock_model_id(native), native);

    let translated = bedrock_model_id("claude-3-5-sonnet-v2-20241022");
    assert_eq!(bedrock_model_id(&translated), translated);
}

#[test]
fn bedrock_output_always_carries_a_versioned_suffix() {
    for id in ["claude-opus-4-20250514", "claude-3-5-sonnet-v2-20241022"] {
        let translated = bedrock_model_id(id);
        assert!(translated.starts_with("anthropic."), "got: {translated}");
        assert!(
            translated.ends_with("-v1:0") || translated.ends_with("-v2:0"),
            "got: {translated}"
        );
    }
}

#[test]
fn bedrock_passes_unrecognized_ids_through() {
    assert_eq!(
        bedrock_model_id("claude-3-5-sonnet-latest"),
        "claude-3-5-sonnet-latest"
    );
}
