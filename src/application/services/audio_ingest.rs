use std::sync::Arc;

use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;

use crate::application::ports::{AudioDecoder, AudioDecoderError};
use crate::application::services::DetectionError;
use crate::domain::AudioClip;

const MIN_CLIP_SECONDS: f32 = 0.5;

/// Turns an inbound base64 payload into a validated PCM clip.
///
/// The three steps run strictly in order: `decode_payload` (base64 + size
/// cap), `load` (container decode through the [`AudioDecoder`] port), then
/// `validate` (duration floor). Callers stop at the first failure.
pub struct AudioIngest<D>
where
    D: AudioDecoder,
{
    decoder: Arc<D>,
    max_payload_bytes: usize,
    nominal_sample_rate: u32,
}

impl<D> AudioIngest<D>
where
    D: AudioDecoder,
{
    pub fn new(decoder: Arc<D>, max_size_mb: usize, nominal_sample_rate: u32) -> Self {
        Self {
            decoder,
            max_payload_bytes: max_size_mb * 1024 * 1024,
            nominal_sample_rate,
        }
    }

    pub fn max_size_mb(&self) -> usize {
        self.max_payload_bytes / (1024 * 1024)
    }

    pub fn decode_payload(&self, encoded: &str) -> Result<Vec<u8>, DetectionError> {
        let payload = strip_data_uri_prefix(encoded);
        let compact: String = payload.chars().filter(|c| !c.is_ascii_whitespace()).collect();

        let bytes = BASE64
            .decode(compact.as_bytes())
            .map_err(|e| DetectionError::MalformedInput(format!("invalid base64: {}", e)))?;

        if bytes.len() > self.max_payload_bytes {
            return Err(DetectionError::PayloadTooLarge {
                limit_mb: self.max_size_mb(),
            });
        }

        tracing::debug!(bytes = bytes.len(), "Audio payload decoded");

        Ok(bytes)
    }

    pub fn load(&self, bytes: &[u8]) -> Result<AudioClip, DetectionError> {
        let clip = self.decoder.decode(bytes).map_err(|e| match e {
            AudioDecoderError::UnsupportedFormat(msg) => DetectionError::UnsupportedAudio(msg),
            AudioDecoderError::DecodingFailed(msg) => DetectionError::UnsupportedAudio(msg),
        })?;

        tracing::debug!(
            samples = clip.samples.len(),
            sample_rate = clip.sample_rate,
            duration_secs = clip.duration_seconds(),
            "Audio container decoded"
        );

        Ok(clip)
    }

    pub fn validate(&self, clip: &AudioClip) -> Result<(), DetectionError> {
        if clip.is_empty() {
            return Err(DetectionError::InvalidAudio("audio is empty".to_string()));
        }

        let min_samples = (self.nominal_sample_rate as f32 * MIN_CLIP_SECONDS) as usize;
        if clip.samples.len() < min_samples {
            return Err(DetectionError::InvalidAudio(format!(
                "audio too short: {:.2}s, minimum is {}s",
                clip.duration_seconds(),
                MIN_CLIP_SECONDS
            )));
        }

        Ok(())
    }
}

fn strip_data_uri_prefix(encoded: &str) -> &str {
    if let Some(idx) = encoded.find(',') {
        if encoded[..idx].starts_with("data:") {
            return &encoded[idx + 1..];
        }
    }
    encoded
}
