mod detect;
mod health;
mod info;

pub use detect::{detect_handler, normalize_language, DetectionRequest, DetectionResponse};
pub use health::health_handler;
pub use info::info_handler;

use serde::Serialize;

/// Error body shared by every endpoint: `{"status": "error", "message": ...}`.
#[derive(Serialize)]
pub struct ErrorResponse {
    pub status: &'static str,
    pub message: String,
}

impl ErrorResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            status: "error",
            message: message.into(),
        }
    }
}
