use std::sync::Arc;

use crate::application::ports::{AudioClassifier, AudioDecoder};
use crate::application::services::DetectionService;
use crate::presentation::config::Settings;

pub struct AppState<C, D>
where
    C: AudioClassifier,
    D: AudioDecoder,
{
    pub detection_service: Arc<DetectionService<C, D>>,
    pub settings: Settings,
}

impl<C, D> Clone for AppState<C, D>
where
    C: AudioClassifier,
    D: AudioDecoder,
{
    fn clone(&self) -> Self {
        Self {
            detection_service: Arc::clone(&self.detection_service),
            settings: self.settings.clone(),
        }
    }
}
