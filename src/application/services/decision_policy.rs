use std::collections::HashMap;

use crate::domain::{ClassificationResult, DetectionVerdict, Verdict};

/// Maps a classifier result and the requested language to a final verdict.
///
/// The rule is asymmetric on purpose: a clip is only ever `AI_GENERATED` when
/// the label is AI-indicative AND the probability clears the per-language bar.
/// An AI-indicative label below the bar downgrades to `HUMAN` instead of
/// producing an uncertain verdict.
pub struct DecisionPolicy {
    default_threshold: f32,
    language_thresholds: HashMap<String, f32>,
    ai_label_tokens: Vec<String>,
}

impl DecisionPolicy {
    pub fn new(
        default_threshold: f32,
        language_thresholds: HashMap<String, f32>,
        ai_label_tokens: Vec<String>,
    ) -> Self {
        let ai_label_tokens = ai_label_tokens
            .into_iter()
            .map(|t| t.to_lowercase())
            .collect();
        Self {
            default_threshold,
            language_thresholds,
            ai_label_tokens,
        }
    }

    pub fn resolve_threshold(&self, language: &str) -> f32 {
        match self.language_thresholds.get(language) {
            Some(threshold) => *threshold,
            None => {
                tracing::warn!(
                    language = %language,
                    default_threshold = self.default_threshold,
                    "No calibrated threshold for language, using default"
                );
                self.default_threshold
            }
        }
    }

    pub fn is_ai_label(&self, label: &str) -> bool {
        let label = label.to_lowercase();
        self.ai_label_tokens.iter().any(|t| label.contains(t))
    }

    pub fn decide(&self, result: &ClassificationResult, language: &str) -> DetectionVerdict {
        let threshold = self.resolve_threshold(language);
        let confidence_score = round_to_cents(result.probability);

        let (classification, explanation) = if self.is_ai_label(&result.label) {
            if result.probability >= threshold {
                (
                    Verdict::AiGenerated,
                    format!(
                        "AI patterns detected ({}); confidence {:.2} >= threshold {:.2}",
                        result.label, result.probability, threshold
                    ),
                )
            } else {
                (
                    Verdict::Human,
                    format!(
                        "Model suggested '{}', but confidence {:.2} fell below threshold {:.2}; treated as human",
                        result.label, result.probability, threshold
                    ),
                )
            }
        } else {
            (
                Verdict::Human,
                format!("Natural voice patterns detected ({})", result.label),
            )
        };

        DetectionVerdict {
            classification,
            confidence_score,
            explanation,
        }
    }
}

fn round_to_cents(value: f32) -> f32 {
    (value * 100.0).round() / 100.0
}
