use std::collections::HashMap;

use verivoice::application::services::DecisionPolicy;
use verivoice::domain::{ClassificationResult, Verdict};

fn default_policy() -> DecisionPolicy {
    let thresholds = HashMap::from([
        ("English".to_string(), 0.90),
        ("Hindi".to_string(), 0.92),
        ("Tamil".to_string(), 0.92),
        ("Malayalam".to_string(), 0.92),
        ("Telugu".to_string(), 0.92),
    ]);
    let tokens = vec![
        "fake".to_string(),
        "spoof".to_string(),
        "ai".to_string(),
        "generated".to_string(),
    ];
    DecisionPolicy::new(0.90, thresholds, tokens)
}

#[test]
fn given_confident_fake_label_when_deciding_then_classifies_ai_generated() {
    let policy = default_policy();
    let result = ClassificationResult::new("fake", 0.95);

    let verdict = policy.decide(&result, "English");

    assert_eq!(verdict.classification, Verdict::AiGenerated);
    assert_eq!(verdict.confidence_score, 0.95);
    assert!(verdict.explanation.contains("fake"));
}

#[test]
fn given_low_confidence_fake_label_when_deciding_then_downgrades_to_human() {
    let policy = default_policy();
    let result = ClassificationResult::new("fake", 0.85);

    let verdict = policy.decide(&result, "English");

    assert_eq!(verdict.classification, Verdict::Human);
    assert_eq!(verdict.confidence_score, 0.85);
    assert!(verdict.explanation.contains("treated as human"));
}

#[test]
fn given_bonafide_label_when_deciding_then_classifies_human() {
    let policy = default_policy();
    let result = ClassificationResult::new("bonafide", 0.99);

    let verdict = policy.decide(&result, "Tamil");

    assert_eq!(verdict.classification, Verdict::Human);
    assert_eq!(verdict.confidence_score, 0.99);
    assert!(verdict.explanation.contains("Natural voice patterns"));
}

#[test]
fn given_unrecognized_language_when_deciding_then_uses_default_threshold() {
    let policy = default_policy();
    let result = ClassificationResult::new("fake", 0.91);

    let verdict = policy.decide(&result, "French");

    assert_eq!(verdict.classification, Verdict::AiGenerated);
}

#[test]
fn given_probability_exactly_at_threshold_when_deciding_then_classifies_ai_generated() {
    let policy = default_policy();
    let result = ClassificationResult::new("fake", 0.90);

    let verdict = policy.decide(&result, "English");

    assert_eq!(verdict.classification, Verdict::AiGenerated);
}

#[test]
fn given_probability_just_below_threshold_when_deciding_then_classifies_human() {
    let policy = default_policy();
    let result = ClassificationResult::new("fake", 0.8999);

    let verdict = policy.decide(&result, "English");

    assert_eq!(verdict.classification, Verdict::Human);
}

#[test]
fn given_language_specific_threshold_when_deciding_then_it_overrides_default() {
    let policy = default_policy();
    let result = ClassificationResult::new("fake", 0.91);

    assert_eq!(
        policy.decide(&result, "English").classification,
        Verdict::AiGenerated
    );
    assert_eq!(
        policy.decide(&result, "Hindi").classification,
        Verdict::Human
    );
}

#[test]
fn given_mixed_case_label_when_deciding_then_token_match_is_case_insensitive() {
    let policy = default_policy();

    let verdict = policy.decide(&ClassificationResult::new("Spoof", 0.95), "English");
    assert_eq!(verdict.classification, Verdict::AiGenerated);

    let verdict = policy.decide(&ClassificationResult::new("AI Voice", 0.95), "English");
    assert_eq!(verdict.classification, Verdict::AiGenerated);
}

#[test]
fn given_same_inputs_when_deciding_twice_then_verdicts_are_identical() {
    let policy = default_policy();
    let result = ClassificationResult::new("fake", 0.93);

    let first = policy.decide(&result, "Telugu");
    let second = policy.decide(&result, "Telugu");

    assert_eq!(first, second);
}

#[test]
fn given_long_probability_when_deciding_then_confidence_is_rounded_to_two_decimals() {
    let policy = default_policy();

    let verdict = policy.decide(&ClassificationResult::new("real", 0.8567), "English");
    assert_eq!(verdict.confidence_score, 0.86);

    let verdict = policy.decide(&ClassificationResult::new("real", 0.854), "English");
    assert_eq!(verdict.confidence_score, 0.85);
}

#[test]
fn given_human_label_when_deciding_then_threshold_does_not_matter() {
    let policy = default_policy();

    let verdict = policy.decide(&ClassificationResult::new("real", 0.05), "English");

    assert_eq!(verdict.classification, Verdict::Human);
    assert_eq!(verdict.confidence_score, 0.05);
}
