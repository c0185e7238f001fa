use crate::domain::AudioClip;

/// Decodes a compressed audio container into a mono PCM clip at the
/// classifier's expected sample rate.
pub trait AudioDecoder: Send + Sync {
    fn decode(&self, data: &[u8]) -> Result<AudioClip, AudioDecoderError>;
}

#[derive(Debug, thiserror::Error)]
pub enum AudioDecoderError {
    #[error("unsupported audio container: {0}")]
    UnsupportedFormat(String),
    #[error("audio decoding failed: {0}")]
    DecodingFailed(String),
}
