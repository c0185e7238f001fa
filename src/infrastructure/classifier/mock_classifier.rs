use async_trait::async_trait;

use crate::application::ports::{AudioClassifier, ClassifierError};
use crate::domain::{AudioClip, ClassificationResult};

/// Test classifier returning a fixed label and probability.
pub struct MockClassifier {
    pub label: String,
    pub probability: f32,
}

impl MockClassifier {
    pub fn new(label: impl Into<String>, probability: f32) -> Self {
        Self {
            label: label.into(),
            probability,
        }
    }
}

#[async_trait]
impl AudioClassifier for MockClassifier {
    async fn classify(&self, _clip: &AudioClip) -> Result<ClassificationResult, ClassifierError> {
        Ok(ClassificationResult::new(
            self.label.clone(),
            self.probability,
        ))
    }

    fn sampling_rate(&self) -> u32 {
        16_000
    }
}
