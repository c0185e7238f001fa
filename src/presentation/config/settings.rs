use std::collections::HashMap;
use std::path::PathBuf;
use std::str::FromStr;

use serde::Deserialize;

use super::Environment;

impl<'de> Deserialize<'de> for Environment {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        Environment::try_from(raw).map_err(serde::de::Error::custom)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub server: ServerSettings,
    pub model: ModelSettings,
    pub detection: DetectionSettings,
    pub audio: AudioSettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
    pub api_key: String,
    pub environment: Environment,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ModelSettings {
    pub model_id: String,
    pub cache_dir: PathBuf,
    pub use_gpu: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DetectionSettings {
    pub confidence_threshold: f32,
    pub language_thresholds: HashMap<String, f32>,
    pub ai_label_tokens: Vec<String>,
    pub supported_languages: Vec<String>,
    pub request_timeout_secs: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AudioSettings {
    pub max_size_mb: usize,
    pub sample_rate: u32,
}

impl Settings {
    /// Build settings from environment variables, falling back to the
    /// calibrated defaults for anything unset.
    pub fn from_env() -> Self {
        Self {
            server: ServerSettings {
                host: env_or("HOST", "0.0.0.0".to_string()),
                port: env_or("PORT", 8000),
                api_key: env_or("API_KEY", "sk_test_123456789".to_string()),
                environment: std::env::var("ENVIRONMENT")
                    .ok()
                    .and_then(|v| Environment::try_from(v).ok())
                    .unwrap_or(Environment::Development),
            },
            model: ModelSettings {
                model_id: env_or(
                    "HF_MODEL_NAME",
                    "MelodyMachine/Deepfake-audio-detection".to_string(),
                ),
                cache_dir: PathBuf::from(env_or(
                    "HF_MODEL_CACHE_DIR",
                    "./models/huggingface_cache".to_string(),
                )),
                use_gpu: env_or("USE_GPU", true),
            },
            detection: DetectionSettings {
                confidence_threshold: env_or("CONFIDENCE_THRESHOLD", 0.90),
                language_thresholds: language_thresholds_from_env(),
                ai_label_tokens: vec![
                    "fake".to_string(),
                    "spoof".to_string(),
                    "ai".to_string(),
                    "generated".to_string(),
                ],
                supported_languages: vec![
                    "Tamil".to_string(),
                    "English".to_string(),
                    "Hindi".to_string(),
                    "Malayalam".to_string(),
                    "Telugu".to_string(),
                ],
                request_timeout_secs: env_or("REQUEST_TIMEOUT_SECS", 30),
            },
            audio: AudioSettings {
                max_size_mb: env_or("MAX_AUDIO_SIZE_MB", 2),
                sample_rate: env_or("SAMPLE_RATE", 16_000),
            },
        }
    }

    pub fn default_language_thresholds() -> HashMap<String, f32> {
        HashMap::from([
            ("English".to_string(), 0.90),
            ("Hindi".to_string(), 0.92),
            ("Tamil".to_string(), 0.92),
            ("Malayalam".to_string(), 0.92),
            ("Telugu".to_string(), 0.92),
        ])
    }
}

fn env_or<T: FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

// LANGUAGE_THRESHOLDS accepts a JSON object, e.g. {"English": 0.9}.
fn language_thresholds_from_env() -> HashMap<String, f32> {
    match std::env::var("LANGUAGE_THRESHOLDS") {
        Ok(raw) => match serde_json::from_str(&raw) {
            Ok(thresholds) => thresholds,
            Err(e) => {
                tracing::warn!(error = %e, "Ignoring malformed LANGUAGE_THRESHOLDS");
                Settings::default_language_thresholds()
            }
        },
        Err(_) => Settings::default_language_thresholds(),
    }
}
