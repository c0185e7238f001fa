use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::application::ports::{AudioClassifier, AudioDecoder};
use crate::application::services::DetectionError;
use crate::domain::Verdict;
use crate::presentation::handlers::ErrorResponse;
use crate::presentation::state::AppState;

const MIN_PAYLOAD_CHARS: usize = 100;

fn default_audio_format() -> String {
    "mp3".to_string()
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DetectionRequest {
    pub language: String,
    #[serde(default = "default_audio_format")]
    pub audio_format: String,
    pub audio_base64: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DetectionResponse {
    pub status: &'static str,
    pub language: String,
    pub classification: Verdict,
    pub confidence_score: f32,
    pub explanation: String,
}

#[tracing::instrument(skip(state, request))]
pub async fn detect_handler<C, D>(
    State(state): State<AppState<C, D>>,
    Json(request): Json<DetectionRequest>,
) -> impl IntoResponse
where
    C: AudioClassifier + 'static,
    D: AudioDecoder + 'static,
{
    if !request.audio_format.eq_ignore_ascii_case("mp3") {
        tracing::warn!(format = %request.audio_format, "Unsupported audio format");
        return (
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse::new("Only mp3 format is supported")),
        )
            .into_response();
    }

    if request.audio_base64.len() < MIN_PAYLOAD_CHARS {
        return (
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse::new(format!(
                "audioBase64 must be at least {} characters",
                MIN_PAYLOAD_CHARS
            ))),
        )
            .into_response();
    }

    let language = normalize_language(&request.language);
    if !state
        .settings
        .detection
        .supported_languages
        .iter()
        .any(|l| l == &language)
    {
        tracing::warn!(
            language = %request.language,
            "Unsupported language, proceeding with default threshold"
        );
    }

    tracing::info!(language = %language, "Processing detection request");

    match state
        .detection_service
        .detect(&request.audio_base64, &language)
        .await
    {
        Ok(verdict) => {
            tracing::info!(
                classification = verdict.classification.as_str(),
                confidence = verdict.confidence_score,
                "Detection complete"
            );
            (
                StatusCode::OK,
                Json(DetectionResponse {
                    status: "success",
                    language,
                    classification: verdict.classification,
                    confidence_score: verdict.confidence_score,
                    explanation: verdict.explanation,
                }),
            )
                .into_response()
        }
        Err(e) => {
            tracing::error!(error = %e, "Detection failed");
            (error_status(&e), Json(ErrorResponse::new(e.to_string()))).into_response()
        }
    }
}

fn error_status(error: &DetectionError) -> StatusCode {
    match error {
        DetectionError::MalformedInput(_)
        | DetectionError::UnsupportedAudio(_)
        | DetectionError::InvalidAudio(_) => StatusCode::BAD_REQUEST,
        DetectionError::PayloadTooLarge { .. } => StatusCode::PAYLOAD_TOO_LARGE,
        DetectionError::ModelUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
        DetectionError::Inference(_) => StatusCode::INTERNAL_SERVER_ERROR,
        DetectionError::Timeout(_) => StatusCode::GATEWAY_TIMEOUT,
    }
}

/// Normalizes a requested language name: trimmed, each word title-cased.
pub fn normalize_language(raw: &str) -> String {
    raw.trim()
        .split_whitespace()
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => {
                    first.to_uppercase().collect::<String>() + &chars.as_str().to_lowercase()
                }
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}
