mod mock_decoder;
mod symphonia_decoder;

pub use mock_decoder::MockAudioDecoder;
pub use symphonia_decoder::SymphoniaAudioDecoder;
