use crate::application::ports::{AudioDecoder, AudioDecoderError};
use crate::domain::AudioClip;

/// Test decoder that ignores the payload and returns a fixed-length silent
/// clip at the configured rate.
pub struct MockAudioDecoder {
    pub sample_rate: u32,
    pub duration_seconds: f32,
}

impl MockAudioDecoder {
    pub fn new(sample_rate: u32, duration_seconds: f32) -> Self {
        Self {
            sample_rate,
            duration_seconds,
        }
    }
}

impl AudioDecoder for MockAudioDecoder {
    fn decode(&self, _data: &[u8]) -> Result<AudioClip, AudioDecoderError> {
        let num_samples = (self.sample_rate as f32 * self.duration_seconds) as usize;
        Ok(AudioClip::new(vec![0.0; num_samples], self.sample_rate))
    }
}
