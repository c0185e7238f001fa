mod audio_classifier;
mod audio_decoder;

pub use audio_classifier::{AudioClassifier, ClassifierError};
pub use audio_decoder::{AudioDecoder, AudioDecoderError};
