use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;

use verivoice::application::ports::{
    AudioClassifier, AudioDecoder, AudioDecoderError, ClassifierError,
};
use verivoice::application::services::{
    AudioIngest, DecisionPolicy, DetectionError, DetectionService,
};
use verivoice::domain::{AudioClip, ClassificationResult, Verdict};
use verivoice::infrastructure::audio::MockAudioDecoder;
use verivoice::infrastructure::classifier::MockClassifier;

struct PanickingDecoder;

impl AudioDecoder for PanickingDecoder {
    fn decode(&self, _data: &[u8]) -> Result<AudioClip, AudioDecoderError> {
        panic!("decoder must not be reached for this input");
    }
}

struct FailingDecoder;

impl AudioDecoder for FailingDecoder {
    fn decode(&self, _data: &[u8]) -> Result<AudioClip, AudioDecoderError> {
        Err(AudioDecoderError::UnsupportedFormat(
            "not an audio container".to_string(),
        ))
    }
}

struct SlowClassifier;

#[async_trait]
impl AudioClassifier for SlowClassifier {
    async fn classify(&self, _clip: &AudioClip) -> Result<ClassificationResult, ClassifierError> {
        tokio::time::sleep(Duration::from_secs(5)).await;
        Ok(ClassificationResult::new("fake", 0.99))
    }

    fn sampling_rate(&self) -> u32 {
        16_000
    }
}

struct FailingClassifier;

#[async_trait]
impl AudioClassifier for FailingClassifier {
    async fn classify(&self, _clip: &AudioClip) -> Result<ClassificationResult, ClassifierError> {
        Err(ClassifierError::InferenceFailed("bad tensor".to_string()))
    }

    fn sampling_rate(&self) -> u32 {
        16_000
    }
}

fn default_policy() -> DecisionPolicy {
    DecisionPolicy::new(
        0.90,
        [("English".to_string(), 0.90)].into_iter().collect(),
        vec!["fake".to_string(), "spoof".to_string()],
    )
}

fn service<C, D>(classifier: C, decoder: D, max_size_mb: usize) -> DetectionService<C, D>
where
    C: AudioClassifier,
    D: AudioDecoder,
{
    let ingest = AudioIngest::new(Arc::new(decoder), max_size_mb, 16_000);
    DetectionService::new(
        Arc::new(classifier),
        ingest,
        default_policy(),
        Duration::from_millis(200),
    )
}

fn valid_payload() -> String {
    BASE64.encode(vec![0u8; 512])
}

#[tokio::test]
async fn given_valid_clip_when_detecting_then_returns_verdict() {
    let service = service(
        MockClassifier::new("fake", 0.95),
        MockAudioDecoder::new(16_000, 1.0),
        2,
    );

    let verdict = service.detect(&valid_payload(), "English").await.unwrap();

    assert_eq!(verdict.classification, Verdict::AiGenerated);
    assert_eq!(verdict.confidence_score, 0.95);
}

#[tokio::test]
async fn given_invalid_base64_when_detecting_then_fails_before_container_decode() {
    let service = service(MockClassifier::new("fake", 0.95), PanickingDecoder, 2);

    let result = service.detect("@@@ not base64 @@@", "English").await;

    assert!(matches!(result, Err(DetectionError::MalformedInput(_))));
}

#[tokio::test]
async fn given_oversized_payload_when_detecting_then_fails_before_container_decode() {
    let service = service(MockClassifier::new("fake", 0.95), PanickingDecoder, 0);

    let result = service.detect(&valid_payload(), "English").await;

    assert!(matches!(
        result,
        Err(DetectionError::PayloadTooLarge { limit_mb: 0 })
    ));
}

#[tokio::test]
async fn given_unparsable_container_when_detecting_then_returns_unsupported_audio() {
    let service = service(MockClassifier::new("fake", 0.95), FailingDecoder, 2);

    let result = service.detect(&valid_payload(), "English").await;

    assert!(matches!(result, Err(DetectionError::UnsupportedAudio(_))));
}

#[tokio::test]
async fn given_clip_below_minimum_duration_when_detecting_then_returns_invalid_audio() {
    let service = service(
        MockClassifier::new("fake", 0.95),
        MockAudioDecoder::new(16_000, 0.2),
        2,
    );

    let result = service.detect(&valid_payload(), "English").await;

    assert!(matches!(result, Err(DetectionError::InvalidAudio(_))));
}

#[tokio::test]
async fn given_slow_inference_when_detecting_then_times_out() {
    let service = service(SlowClassifier, MockAudioDecoder::new(16_000, 1.0), 2);

    let result = service.detect(&valid_payload(), "English").await;

    assert!(matches!(result, Err(DetectionError::Timeout(_))));
}

#[tokio::test]
async fn given_failing_inference_when_detecting_then_returns_inference_error() {
    let service = service(FailingClassifier, MockAudioDecoder::new(16_000, 1.0), 2);

    let result = service.detect(&valid_payload(), "English").await;

    assert!(matches!(result, Err(DetectionError::Inference(_))));
}
