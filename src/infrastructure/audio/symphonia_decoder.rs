use std::io::Cursor;

use symphonia::core::audio::SampleBuffer;
use symphonia::core::codecs::DecoderOptions;
use symphonia::core::formats::{FormatOptions, FormatReader};
use symphonia::core::io::MediaSourceStream;
use symphonia::core::meta::MetadataOptions;
use symphonia::core::probe::Hint;

use crate::application::ports::{AudioDecoder, AudioDecoderError};
use crate::domain::AudioClip;

/// Container decoder built on symphonia. Produces mono f32 PCM resampled to
/// the configured target rate regardless of the source container's layout.
pub struct SymphoniaAudioDecoder {
    target_sample_rate: u32,
}

impl SymphoniaAudioDecoder {
    pub fn new(target_sample_rate: u32) -> Self {
        Self { target_sample_rate }
    }

    pub fn target_sample_rate(&self) -> u32 {
        self.target_sample_rate
    }

    fn probe(&self, data: &[u8]) -> Result<Box<dyn FormatReader>, AudioDecoderError> {
        let cursor = Cursor::new(data.to_vec());
        let mss = MediaSourceStream::new(Box::new(cursor), Default::default());

        let probed = symphonia::default::get_probe()
            .format(
                &Hint::new(),
                mss,
                &FormatOptions::default(),
                &MetadataOptions::default(),
            )
            .map_err(|e| AudioDecoderError::UnsupportedFormat(format!("probe: {}", e)))?;

        Ok(probed.format)
    }

    fn decode_track(
        &self,
        format: &mut Box<dyn FormatReader>,
    ) -> Result<(Vec<f32>, u32), AudioDecoderError> {
        let track = format.default_track().ok_or_else(|| {
            AudioDecoderError::UnsupportedFormat("no audio track found".to_string())
        })?;

        let track_id = track.id;
        let codec_params = track.codec_params.clone();
        let source_rate = codec_params.sample_rate.ok_or_else(|| {
            AudioDecoderError::UnsupportedFormat("unknown sample rate".to_string())
        })?;
        let channels = codec_params.channels.map(|c| c.count()).unwrap_or(1);

        let mut decoder = symphonia::default::get_codecs()
            .make(&codec_params, &DecoderOptions::default())
            .map_err(|e| AudioDecoderError::UnsupportedFormat(format!("codec: {}", e)))?;

        let mut pcm: Vec<f32> = Vec::new();

        loop {
            let packet = match format.next_packet() {
                Ok(p) => p,
                Err(symphonia::core::errors::Error::IoError(ref e))
                    if e.kind() == std::io::ErrorKind::UnexpectedEof =>
                {
                    break;
                }
                Err(e) => {
                    return Err(AudioDecoderError::DecodingFailed(format!("packet: {}", e)));
                }
            };

            if packet.track_id() != track_id {
                continue;
            }

            let decoded = match decoder.decode(&packet) {
                Ok(d) => d,
                Err(symphonia::core::errors::Error::DecodeError(e)) => {
                    tracing::warn!(error = %e, "Skipping corrupt audio frame");
                    continue;
                }
                Err(e) => {
                    return Err(AudioDecoderError::DecodingFailed(format!("decode: {}", e)));
                }
            };

            let spec = *decoded.spec();
            let num_frames = decoded.frames();
            if num_frames == 0 {
                continue;
            }

            let mut sample_buf = SampleBuffer::<f32>::new(num_frames as u64, spec);
            sample_buf.copy_interleaved_ref(decoded);
            downmix_into(&mut pcm, sample_buf.samples(), channels);
        }

        Ok((pcm, source_rate))
    }
}

impl AudioDecoder for SymphoniaAudioDecoder {
    fn decode(&self, data: &[u8]) -> Result<AudioClip, AudioDecoderError> {
        let mut format = self.probe(data)?;
        let (mut pcm, source_rate) = self.decode_track(&mut format)?;

        if pcm.is_empty() {
            return Err(AudioDecoderError::DecodingFailed(
                "no audio samples decoded".to_string(),
            ));
        }

        if source_rate != self.target_sample_rate {
            pcm = resample(&pcm, source_rate, self.target_sample_rate)?;
        }

        tracing::debug!(
            samples = pcm.len(),
            source_rate = source_rate,
            target_rate = self.target_sample_rate,
            "Audio decoded to mono PCM"
        );

        Ok(AudioClip::new(pcm, self.target_sample_rate))
    }
}

fn downmix_into(pcm: &mut Vec<f32>, interleaved: &[f32], channels: usize) {
    if channels > 1 {
        for frame in interleaved.chunks(channels) {
            let mono: f32 = frame.iter().sum::<f32>() / channels as f32;
            pcm.push(mono);
        }
    } else {
        pcm.extend_from_slice(interleaved);
    }
}

const RESAMPLE_CHUNK: usize = 1024;

fn resample(samples: &[f32], from_rate: u32, to_rate: u32) -> Result<Vec<f32>, AudioDecoderError> {
    use rubato::{
        Resampler, SincFixedIn, SincInterpolationParameters, SincInterpolationType, WindowFunction,
    };

    let ratio = to_rate as f64 / from_rate as f64;
    let expected_len = (samples.len() as f64 * ratio) as usize;

    let params = SincInterpolationParameters {
        sinc_len: 256,
        f_cutoff: 0.95,
        interpolation: SincInterpolationType::Linear,
        oversampling_factor: 256,
        window: WindowFunction::BlackmanHarris2,
    };
    let mut resampler = SincFixedIn::<f32>::new(ratio, 2.0, params, RESAMPLE_CHUNK, 1)
        .map_err(|e| AudioDecoderError::DecodingFailed(format!("resampler init: {}", e)))?;

    let mut output = Vec::with_capacity(expected_len + RESAMPLE_CHUNK);

    for chunk in samples.chunks(RESAMPLE_CHUNK) {
        // SincFixedIn wants fixed-size input; the last chunk is zero-padded
        // and the excess trimmed off below.
        let mut input = chunk.to_vec();
        input.resize(RESAMPLE_CHUNK, 0.0);

        let resampled = resampler
            .process(&[input], None)
            .map_err(|e| AudioDecoderError::DecodingFailed(format!("resample: {}", e)))?;

        if let Some(channel) = resampled.first() {
            output.extend_from_slice(channel);
        }
    }

    output.truncate(expected_len);

    Ok(output)
}
