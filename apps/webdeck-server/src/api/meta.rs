use axum::response::IntoResponse;
use axum::{extract::State, Json};
use serde_json::json;

use crate::AppState;

/// Health probe.
pub async fn healthz() -> impl IntoResponse {
    Json(json!({"ok": true}))
}

/// Service metadata and endpoints index.
pub async fn about(State(state): State<AppState>) -> impl IntoResponse {
    Json(json!({
        "service": "webdeck-server",
        "version": env!("CARGO_PKG_VERSION"),
        "web_dir": state.web().root().display().to_string(),
        "endpoints": state.endpoints().as_ref(),
    }))
}
