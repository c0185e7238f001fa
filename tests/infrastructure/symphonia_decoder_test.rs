use verivoice::application::ports::{AudioDecoder, AudioDecoderError};
use verivoice::infrastructure::audio::SymphoniaAudioDecoder;

use crate::helpers::build_wav;

#[test]
fn given_wav_at_target_rate_when_decoding_then_returns_pcm_at_same_rate() {
    let samples: Vec<i16> = vec![1_000i16; 1_600];
    let wav = build_wav(16_000, 1, &samples);
    let decoder = SymphoniaAudioDecoder::new(16_000);

    let clip = decoder.decode(&wav).unwrap();

    assert_eq!(clip.sample_rate, 16_000);
    assert!(!clip.is_empty());
}

#[test]
fn given_wav_at_44100hz_when_decoding_then_resamples_to_target_rate() {
    // 0.1s at 44.1kHz should come out near 1600 samples at 16kHz
    let samples: Vec<i16> = vec![1_000i16; 4_410];
    let wav = build_wav(44_100, 1, &samples);
    let decoder = SymphoniaAudioDecoder::new(16_000);

    let clip = decoder.decode(&wav).unwrap();

    assert_eq!(clip.sample_rate, 16_000);
    assert!(!clip.is_empty());
    assert!(
        clip.samples.len() < 4_410,
        "output should have fewer samples than the 44.1kHz input"
    );
}

#[test]
fn given_stereo_wav_when_decoding_then_downmixes_to_mono() {
    // interleaved stereo: 3200 i16 values = 1600 frames
    let samples: Vec<i16> = vec![500i16; 3_200];
    let wav = build_wav(16_000, 2, &samples);
    let decoder = SymphoniaAudioDecoder::new(16_000);

    let clip = decoder.decode(&wav).unwrap();

    assert_eq!(clip.samples.len(), 1_600);
}

#[test]
fn given_garbage_bytes_when_decoding_then_returns_unsupported_format() {
    let garbage = vec![0xFFu8; 128];
    let decoder = SymphoniaAudioDecoder::new(16_000);

    let result = decoder.decode(&garbage);

    assert!(matches!(
        result,
        Err(AudioDecoderError::UnsupportedFormat(_))
    ));
}

#[test]
fn given_empty_bytes_when_decoding_then_returns_unsupported_format() {
    let decoder = SymphoniaAudioDecoder::new(16_000);

    let result = decoder.decode(&[]);

    assert!(matches!(
        result,
        Err(AudioDecoderError::UnsupportedFormat(_))
    ));
}

#[test]
fn given_decoder_when_asking_target_rate_then_returns_configured_rate() {
    let decoder = SymphoniaAudioDecoder::new(8_000);

    assert_eq!(decoder.target_sample_rate(), 8_000);
}
