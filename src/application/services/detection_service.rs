use std::sync::Arc;
use std::time::Duration;

use crate::application::ports::{AudioClassifier, AudioDecoder, ClassifierError};
use crate::application::services::{AudioIngest, DecisionPolicy};
use crate::domain::DetectionVerdict;

/// Runs the full detection pipeline for one request:
/// payload decode -> container decode -> validation -> inference -> decision.
pub struct DetectionService<C, D>
where
    C: AudioClassifier,
    D: AudioDecoder,
{
    classifier: Arc<C>,
    ingest: AudioIngest<D>,
    policy: DecisionPolicy,
    request_timeout: Duration,
}

impl<C, D> DetectionService<C, D>
where
    C: AudioClassifier,
    D: AudioDecoder,
{
    pub fn new(
        classifier: Arc<C>,
        ingest: AudioIngest<D>,
        policy: DecisionPolicy,
        request_timeout: Duration,
    ) -> Self {
        Self {
            classifier,
            ingest,
            policy,
            request_timeout,
        }
    }

    #[tracing::instrument(skip(self, encoded_audio))]
    pub async fn detect(
        &self,
        encoded_audio: &str,
        language: &str,
    ) -> Result<DetectionVerdict, DetectionError> {
        let bytes = self.ingest.decode_payload(encoded_audio)?;
        let clip = self.ingest.load(&bytes)?;
        self.ingest.validate(&clip)?;

        let inference = self.classifier.classify(&clip);
        let result = match tokio::time::timeout(self.request_timeout, inference).await {
            Ok(result) => result?,
            Err(_) => {
                tracing::warn!(
                    timeout_secs = self.request_timeout.as_secs(),
                    "Detection timed out"
                );
                return Err(DetectionError::Timeout(self.request_timeout));
            }
        };

        tracing::info!(
            label = %result.label,
            probability = result.probability,
            language = %language,
            "Classification complete"
        );

        Ok(self.policy.decide(&result, language))
    }
}

#[derive(Debug, thiserror::Error)]
pub enum DetectionError {
    #[error("malformed audio payload: {0}")]
    MalformedInput(String),
    #[error("audio file too large, maximum size is {limit_mb} MB")]
    PayloadTooLarge { limit_mb: usize },
    #[error("unsupported audio: {0}")]
    UnsupportedAudio(String),
    #[error("invalid audio: {0}")]
    InvalidAudio(String),
    #[error("detection model not available: {0}")]
    ModelUnavailable(String),
    #[error("inference failed: {0}")]
    Inference(String),
    #[error("detection timed out after {}s", .0.as_secs())]
    Timeout(Duration),
}

impl From<ClassifierError> for DetectionError {
    fn from(e: ClassifierError) -> Self {
        match e {
            ClassifierError::ModelLoadFailed(msg) => DetectionError::ModelUnavailable(msg),
            ClassifierError::InferenceFailed(msg) => DetectionError::Inference(msg),
        }
    }
}
