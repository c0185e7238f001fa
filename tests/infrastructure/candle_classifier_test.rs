use verivoice::application::ports::AudioClassifier;
use verivoice::domain::AudioClip;
use verivoice::infrastructure::classifier::{
    normalize_waveform, CandleVoiceClassifier, FeatureExtractorConfig, MockClassifier,
};

#[test]
fn given_gpu_disabled_when_selecting_device_then_returns_cpu() {
    let device = CandleVoiceClassifier::select_device(false);

    assert!(device.is_cpu());
}

#[test]
fn given_waveform_when_normalizing_then_output_is_zero_mean_unit_variance() {
    let samples: Vec<f32> = (0..1_000).map(|i| (i as f32 * 0.01).sin() + 0.3).collect();

    let normalized = normalize_waveform(&samples);

    let n = normalized.len() as f32;
    let mean: f32 = normalized.iter().sum::<f32>() / n;
    let variance: f32 = normalized.iter().map(|s| (s - mean) * (s - mean)).sum::<f32>() / n;

    assert!(mean.abs() < 1e-4);
    assert!((variance - 1.0).abs() < 1e-3);
}

#[test]
fn given_empty_waveform_when_normalizing_then_returns_empty() {
    assert!(normalize_waveform(&[]).is_empty());
}

#[test]
fn given_constant_waveform_when_normalizing_then_output_is_finite() {
    let normalized = normalize_waveform(&[0.5; 100]);

    assert!(normalized.iter().all(|s| s.is_finite()));
}

#[test]
fn given_missing_preprocessor_fields_when_parsing_then_defaults_apply() {
    let config: FeatureExtractorConfig = serde_json::from_str("{}").unwrap();

    assert!(config.do_normalize);
    assert_eq!(config.sampling_rate, 16_000);
}

#[tokio::test]
async fn given_mock_classifier_when_classifying_then_returns_configured_result() {
    let classifier = MockClassifier::new("spoof", 0.88);
    let clip = AudioClip::new(vec![0.0; 16_000], 16_000);

    let result = classifier.classify(&clip).await.unwrap();

    assert_eq!(result.label, "spoof");
    assert_eq!(result.probability, 0.88);
}
