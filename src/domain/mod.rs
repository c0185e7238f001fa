mod audio_clip;
mod classification;
mod verdict;

pub use audio_clip::AudioClip;
pub use classification::ClassificationResult;
pub use verdict::{DetectionVerdict, Verdict};
