use async_trait::async_trait;

use crate::domain::{AudioClip, ClassificationResult};

/// A pretrained audio classifier producing a label and the probability mass
/// assigned to it. Implementations load model state once and must stay
/// read-only under concurrent calls.
#[async_trait]
pub trait AudioClassifier: Send + Sync {
    async fn classify(&self, clip: &AudioClip) -> Result<ClassificationResult, ClassifierError>;

    /// Sample rate the paired feature extractor expects, in Hz.
    fn sampling_rate(&self) -> u32;
}

#[derive(Debug, thiserror::Error)]
pub enum ClassifierError {
    #[error("model loading failed: {0}")]
    ModelLoadFailed(String),
    #[error("inference failed: {0}")]
    InferenceFailed(String),
}
