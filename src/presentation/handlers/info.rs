use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::Serialize;

use crate::application::ports::{AudioClassifier, AudioDecoder};
use crate::presentation::state::AppState;

#[derive(Serialize)]
pub struct InfoResponse {
    pub service: String,
    pub status: String,
    pub version: String,
    pub model: String,
    pub supported_languages: Vec<String>,
}

pub async fn info_handler<C, D>(State(state): State<AppState<C, D>>) -> impl IntoResponse
where
    C: AudioClassifier + 'static,
    D: AudioDecoder + 'static,
{
    (
        StatusCode::OK,
        Json(InfoResponse {
            service: "AI Voice Detection API".to_string(),
            status: "running".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            model: state.settings.model.model_id.clone(),
            supported_languages: state.settings.detection.supported_languages.clone(),
        }),
    )
}
