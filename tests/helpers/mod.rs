use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;

/// Minimal RIFF/WAVE writer for PCM16 test clips.
pub fn build_wav(sample_rate: u32, channels: u16, samples: &[i16]) -> Vec<u8> {
    let num_samples = samples.len() as u32;
    let block_align = channels * 2;
    let byte_rate = sample_rate * block_align as u32;
    let data_size = num_samples * 2;
    let file_size = 36 + data_size;

    let mut wav = Vec::with_capacity(44 + data_size as usize);
    wav.extend_from_slice(b"RIFF");
    wav.extend_from_slice(&file_size.to_le_bytes());
    wav.extend_from_slice(b"WAVE");
    wav.extend_from_slice(b"fmt ");
    wav.extend_from_slice(&16u32.to_le_bytes());
    wav.extend_from_slice(&1u16.to_le_bytes()); // PCM
    wav.extend_from_slice(&channels.to_le_bytes());
    wav.extend_from_slice(&sample_rate.to_le_bytes());
    wav.extend_from_slice(&byte_rate.to_le_bytes());
    wav.extend_from_slice(&block_align.to_le_bytes());
    wav.extend_from_slice(&16u16.to_le_bytes()); // bits per sample
    wav.extend_from_slice(b"data");
    wav.extend_from_slice(&data_size.to_le_bytes());
    for &s in samples {
        wav.extend_from_slice(&s.to_le_bytes());
    }
    wav
}

/// A base64-encoded mono WAV clip of the given duration at 16 kHz.
pub fn encoded_clip(duration_seconds: f32) -> String {
    let num_samples = (16_000.0 * duration_seconds) as usize;
    let samples: Vec<i16> = (0..num_samples)
        .map(|i| ((i as f32 * 0.05).sin() * 8_000.0) as i16)
        .collect();
    BASE64.encode(build_wav(16_000, 1, &samples))
}
