/// Raw model output for one clip: the chosen class label and the softmax mass
/// assigned to it. The label vocabulary is model-defined ("fake", "spoof",
/// "bonafide", ...), not fixed by this service.
#[derive(Debug, Clone, PartialEq)]
pub struct ClassificationResult {
    pub label: String,
    pub probability: f32,
}

impl ClassificationResult {
    pub fn new(label: impl Into<String>, probability: f32) -> Self {
        Self {
            label: label.into(),
            probability,
        }
    }
}
