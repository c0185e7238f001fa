use axum::middleware;
use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::Level;

use crate::application::ports::{AudioClassifier, AudioDecoder};
use crate::infrastructure::observability::request_id_middleware;
use crate::presentation::auth::require_api_key;
use crate::presentation::handlers::{detect_handler, health_handler, info_handler};
use crate::presentation::state::AppState;

pub fn create_router<C, D>(state: AppState<C, D>) -> Router
where
    C: AudioClassifier + 'static,
    D: AudioDecoder + 'static,
{
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let trace_layer = TraceLayer::new_for_http()
        .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
        .on_response(DefaultOnResponse::new().level(Level::INFO));

    let api_key = state.settings.server.api_key.clone();

    Router::new()
        .route("/health", get(health_handler))
        .route("/api/info", get(info_handler::<C, D>))
        .route(
            "/api/voice-detection",
            post(detect_handler::<C, D>)
                .route_layer(middleware::from_fn_with_state(api_key, require_api_key)),
        )
        .layer(middleware::from_fn(request_id_middleware))
        .layer(trace_layer)
        .layer(cors)
        .with_state(state)
}
