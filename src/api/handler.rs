use std::sync::Arc;

use axum::Json;
use axum::Router;
use axum::extract::State;
use axum::http::HeaderMap;
use axum::response::Response;
use axum::routing::{get, post};
use serde_json::{Value, json};
use tower_http::trace::TraceLayer;

use super::AppState;
use super::download::download;
use super::slash_handler::handle_slash_command;
use crate::core::models::ExportKind;

pub const EXPORT_CHANNEL_PATH: &str = "/slack/events/export-channel";
pub const EXPORT_REPLIES_PATH: &str = "/slack/events/export-replies";

/// All routes of the export bot.
pub fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route(EXPORT_CHANNEL_PATH, post(export_channel))
        .route(EXPORT_REPLIES_PATH, post(export_replies))
        .route("/download/{filename}", get(download))
        .route("/health", get(health))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn export_channel(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    body: String,
) -> Response {
    handle_slash_command(&state, &headers, &body, ExportKind::History).await
}

async fn export_replies(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    body: String,
) -> Response {
    handle_slash_command(&state, &headers, &body, ExportKind::Replies).await
}

async fn health() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}
