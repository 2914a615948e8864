use axum::extract::{Path, State};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

use super::http_utils::{file_response, serve_confined};
use crate::responses::ApiResult;
use crate::{matrix, AppState};

pub async fn console_index(State(state): State<AppState>) -> ApiResult<Response> {
    file_response(&state.console_dir().join("index.html")).await
}

pub async fn console_asset(
    State(state): State<AppState>,
    Path(path): Path<String>,
) -> ApiResult<Response> {
    serve_confined(state.console(), &path).await
}

/// Kick off the terminal burst and answer without waiting for it.
pub async fn hack_trigger() -> impl IntoResponse {
    tracing::info!(target: "webdeck::http", "matrix burst triggered");
    matrix::spawn_burst();
    Json(json!({"status": "ACCESS GRANTED"}))
}
