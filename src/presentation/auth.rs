use axum::extract::{Request, State};
use axum::http::StatusCode;
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use axum::Json;

use crate::presentation::handlers::ErrorResponse;

pub const API_KEY_HEADER: &str = "x-api-key";

/// Rejects detection requests whose `x-api-key` header is missing or does not
/// match the configured key.
pub async fn require_api_key(
    State(expected_key): State<String>,
    request: Request,
    next: Next,
) -> Response {
    let provided = request
        .headers()
        .get(API_KEY_HEADER)
        .and_then(|v| v.to_str().ok());

    match provided {
        None => {
            tracing::warn!("Request rejected: missing API key");
            unauthorized(format!("Missing API key in header '{}'", API_KEY_HEADER))
        }
        Some(key) if key != expected_key => {
            tracing::warn!("Request rejected: invalid API key");
            unauthorized("Invalid API key".to_string())
        }
        Some(_) => next.run(request).await,
    }
}

fn unauthorized(message: String) -> Response {
    (
        StatusCode::UNAUTHORIZED,
        Json(ErrorResponse::new(message)),
    )
        .into_response()
}
