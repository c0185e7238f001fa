use std::path::PathBuf;
use std::sync::Arc;

use async_trait::async_trait;
use candle_core::{Device, Tensor, D};
use candle_nn::VarBuilder;
use hf_hub::api::sync::{Api, ApiBuilder};
use hf_hub::{Repo, RepoType};
use serde::Deserialize;

use crate::application::ports::{AudioClassifier, ClassifierError};
use crate::domain::{AudioClip, ClassificationResult};

use super::wav2vec2::{Wav2Vec2Classifier, Wav2Vec2Config};

fn default_sampling_rate() -> u32 {
    16_000
}

fn default_do_normalize() -> bool {
    true
}

/// The feature-extractor settings shipped next to the model weights
/// (`preprocessor_config.json`).
#[derive(Debug, Clone, Deserialize)]
pub struct FeatureExtractorConfig {
    #[serde(default = "default_do_normalize")]
    pub do_normalize: bool,
    #[serde(default = "default_sampling_rate")]
    pub sampling_rate: u32,
}

impl Default for FeatureExtractorConfig {
    fn default() -> Self {
        Self {
            do_normalize: true,
            sampling_rate: default_sampling_rate(),
        }
    }
}

struct ClassifierInner {
    model: Wav2Vec2Classifier,
    config: Wav2Vec2Config,
    feature_extractor: FeatureExtractorConfig,
    device: Device,
}

/// Candle-backed voice classifier. Weights are fetched from the Hugging Face
/// hub and loaded exactly once; inference shares the loaded model read-only
/// across requests and runs on a blocking thread.
pub struct CandleVoiceClassifier {
    inner: Arc<ClassifierInner>,
}

impl CandleVoiceClassifier {
    pub fn new(
        model_id: &str,
        cache_dir: Option<PathBuf>,
        use_gpu: bool,
        nominal_sample_rate: u32,
    ) -> Result<Self, ClassifierError> {
        let device = Self::select_device(use_gpu);

        tracing::info!(
            device = ?device,
            model = model_id,
            "Initializing Candle voice classifier"
        );

        let api = match cache_dir {
            Some(dir) => ApiBuilder::new()
                .with_cache_dir(dir)
                .build()
                .map_err(|e| ClassifierError::ModelLoadFailed(e.to_string()))?,
            None => Api::new().map_err(|e| ClassifierError::ModelLoadFailed(e.to_string()))?,
        };
        let repo = api.repo(Repo::new(model_id.to_string(), RepoType::Model));

        let config_path = repo
            .get("config.json")
            .map_err(|e| ClassifierError::ModelLoadFailed(format!("config.json: {}", e)))?;
        let weights_path = repo
            .get("model.safetensors")
            .map_err(|e| ClassifierError::ModelLoadFailed(format!("model.safetensors: {}", e)))?;

        let config_contents = std::fs::read_to_string(&config_path)
            .map_err(|e| ClassifierError::ModelLoadFailed(format!("read config: {}", e)))?;
        let config: Wav2Vec2Config = serde_json::from_str(&config_contents)
            .map_err(|e| ClassifierError::ModelLoadFailed(format!("parse config: {}", e)))?;

        let feature_extractor = match repo.get("preprocessor_config.json") {
            Ok(path) => {
                let contents = std::fs::read_to_string(&path).map_err(|e| {
                    ClassifierError::ModelLoadFailed(format!("read preprocessor config: {}", e))
                })?;
                serde_json::from_str(&contents).map_err(|e| {
                    ClassifierError::ModelLoadFailed(format!("parse preprocessor config: {}", e))
                })?
            }
            Err(e) => {
                tracing::debug!(error = %e, "No preprocessor config, using defaults");
                FeatureExtractorConfig {
                    sampling_rate: nominal_sample_rate,
                    ..FeatureExtractorConfig::default()
                }
            }
        };

        // SAFETY: safetensors files are memory-mapped read-only
        let vb = unsafe {
            VarBuilder::from_mmaped_safetensors(&[weights_path], candle_core::DType::F32, &device)
                .map_err(|e| ClassifierError::ModelLoadFailed(format!("weights: {}", e)))?
        };

        let model = Wav2Vec2Classifier::load(vb, &config)
            .map_err(|e| ClassifierError::ModelLoadFailed(format!("model: {}", e)))?;

        tracing::info!(
            labels = ?config.id2label,
            sampling_rate = feature_extractor.sampling_rate,
            "Voice classifier loaded successfully"
        );

        Ok(Self {
            inner: Arc::new(ClassifierInner {
                model,
                config,
                feature_extractor,
                device,
            }),
        })
    }

    pub fn select_device(use_gpu: bool) -> Device {
        if use_gpu {
            Device::cuda_if_available(0).unwrap_or(Device::Cpu)
        } else {
            Device::Cpu
        }
    }
}

#[async_trait]
impl AudioClassifier for CandleVoiceClassifier {
    async fn classify(&self, clip: &AudioClip) -> Result<ClassificationResult, ClassifierError> {
        let inner = Arc::clone(&self.inner);
        let samples = clip.samples.clone();

        let result = tokio::task::spawn_blocking(move || infer(&inner, samples))
            .await
            .map_err(|e| ClassifierError::InferenceFailed(format!("inference task: {}", e)))??;

        Ok(result)
    }

    fn sampling_rate(&self) -> u32 {
        self.inner.feature_extractor.sampling_rate
    }
}

fn infer(
    inner: &ClassifierInner,
    mut samples: Vec<f32>,
) -> Result<ClassificationResult, ClassifierError> {
    if inner.feature_extractor.do_normalize {
        samples = normalize_waveform(&samples);
    }

    let num_samples = samples.len();
    let input_values = Tensor::from_vec(samples, (1, num_samples), &inner.device)
        .map_err(|e| ClassifierError::InferenceFailed(format!("input tensor: {}", e)))?;

    let logits = inner
        .model
        .forward(&input_values)
        .map_err(|e| ClassifierError::InferenceFailed(format!("forward: {}", e)))?;

    let probabilities: Vec<f32> = candle_nn::ops::softmax(&logits, D::Minus1)
        .and_then(|p| p.squeeze(0))
        .and_then(|p| p.to_vec1())
        .map_err(|e| ClassifierError::InferenceFailed(format!("softmax: {}", e)))?;

    let (class_index, probability) = probabilities
        .iter()
        .enumerate()
        .max_by(|a, b| a.1.total_cmp(b.1))
        .map(|(i, p)| (i, *p))
        .ok_or_else(|| ClassifierError::InferenceFailed("empty logits".to_string()))?;

    let label = inner
        .config
        .label(class_index)
        .map(str::to_string)
        .unwrap_or_else(|| format!("LABEL_{}", class_index));

    Ok(ClassificationResult::new(label, probability))
}

/// Zero-mean unit-variance normalization, matching the Wav2Vec2 feature
/// extractor's `do_normalize` behavior.
pub fn normalize_waveform(samples: &[f32]) -> Vec<f32> {
    if samples.is_empty() {
        return Vec::new();
    }
    let n = samples.len() as f32;
    let mean: f32 = samples.iter().sum::<f32>() / n;
    let variance: f32 = samples.iter().map(|s| (s - mean) * (s - mean)).sum::<f32>() / n;
    let scale = 1.0 / (variance + 1e-7).sqrt();
    samples.iter().map(|s| (s - mean) * scale).collect()
}
