mod audio_ingest;
mod decision_policy;
mod detection_service;

pub use audio_ingest::AudioIngest;
pub use decision_policy::DecisionPolicy;
pub use detection_service::{DetectionError, DetectionService};
