use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use webdeck_core::store::INDEX_FILE;

use super::http_utils::{file_response, serve_confined};
use crate::responses::ApiResult;
use crate::AppState;

fn project_not_found() -> Response {
    (
        StatusCode::NOT_FOUND,
        Json(json!({"error": "Project not found"})),
    )
        .into_response()
}

pub async fn web_root(State(state): State<AppState>) -> ApiResult<Response> {
    file_response(&state.web().root().join(INDEX_FILE)).await
}

/// `/web/{project}` serves the project's index page; deeper paths are
/// static assets confined to the workspace root.
pub async fn web_path(
    State(state): State<AppState>,
    Path(path): Path<String>,
) -> ApiResult<Response> {
    let trimmed = path.trim_end_matches('/');
    if trimmed.is_empty() {
        return web_root(State(state)).await;
    }
    if !trimmed.contains(['/', '\\']) {
        return Ok(project_index(&state, trimmed).await);
    }
    serve_confined(state.web(), trimmed).await
}

async fn project_index(state: &AppState, project: &str) -> Response {
    let Ok(dir) = state.web().project_dir(project) else {
        return project_not_found();
    };
    let index = dir.join(INDEX_FILE);
    if !tokio::fs::metadata(&index)
        .await
        .map(|m| m.is_file())
        .unwrap_or(false)
    {
        return project_not_found();
    }
    match file_response(&index).await {
        Ok(res) => res,
        Err(err) => err.into_response(),
    }
}
