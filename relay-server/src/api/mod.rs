//! HTTP surface of the relay
//!
//! Serves the static frontend, a health endpoint, and the WebSocket
//! endpoint for real-time robot state streaming. Includes CORS
//! configuration and request tracing.

mod websocket;

use std::path::Path;
use std::sync::Arc;

use axum::{extract::State, routing::get, Json, Router};
use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};

use crate::broadcaster::StateBroadcaster;

use websocket::websocket_handler;

#[derive(Clone)]
pub struct AppState {
    pub broadcaster: Arc<StateBroadcaster>,
    pub allowed_origins: Vec<String>,
    pub cors_disabled: bool,
}

pub fn create_router(state: AppState, static_dir: impl AsRef<Path>) -> Router {
    // Either permissive (all origins) or restricted based on config. The
    // stream is read-only, so only GET and the preflight verb are needed.
    let cors = if state.cors_disabled {
        tracing::warn!(
            "CORS is DISABLED - allowing all origins. This should only be used in development!"
        );
        CorsLayer::permissive()
    } else {
        CorsLayer::new()
            .allow_origin(
                state
                    .allowed_origins
                    .iter()
                    .filter_map(|origin| origin.parse().ok())
                    .collect::<Vec<_>>(),
            )
            .allow_methods([axum::http::Method::GET, axum::http::Method::OPTIONS])
            .allow_headers([axum::http::header::CONTENT_TYPE])
    };

    let trace_layer = TraceLayer::new_for_http()
        .make_span_with(DefaultMakeSpan::new().level(tracing::Level::INFO))
        .on_response(DefaultOnResponse::new().level(tracing::Level::INFO));

    Router::new()
        .route("/ws/data_stream", get(websocket_handler))
        .route("/api/health", get(health))
        // Frontend assets, index.html at the root
        .fallback_service(ServeDir::new(static_dir))
        .layer(trace_layer)
        .layer(cors)
        .with_state(state)
}

async fn health(State(state): State<AppState>) -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "ok",
        "subscribers": state.broadcaster.subscriber_count().await,
    }))
}
