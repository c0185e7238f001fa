use serde::Serialize;

/// Final classification of a clip.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Verdict {
    #[serde(rename = "AI_GENERATED")]
    AiGenerated,
    #[serde(rename = "HUMAN")]
    Human,
}

impl Verdict {
    pub fn as_str(&self) -> &'static str {
        match self {
            Verdict::AiGenerated => "AI_GENERATED",
            Verdict::Human => "HUMAN",
        }
    }
}

/// Outcome of the decision rule for one clip.
///
/// `confidence_score` is the classifier probability the decision was made
/// with, rounded to two decimals. It is never re-derived or defaulted.
#[derive(Debug, Clone, PartialEq)]
pub struct DetectionVerdict {
    pub classification: Verdict,
    pub confidence_score: f32,
    pub explanation: String,
}
