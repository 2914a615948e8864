use axum::extract::{Query, State};
use axum::response::IntoResponse;
use axum::Json;
use serde::Deserialize;
use serde_json::json;

use crate::responses::ApiResult;
use crate::AppState;

#[derive(Deserialize)]
pub struct EditListQuery {
    pub project: String,
}

#[derive(Deserialize)]
pub struct EditFileQuery {
    pub project: String,
    pub file: String,
}

#[derive(Deserialize)]
pub struct FileWrite {
    pub content: String,
}

pub async fn edit_list(
    State(state): State<AppState>,
    Query(q): Query<EditListQuery>,
) -> ApiResult<impl IntoResponse> {
    let files = state.editor().list_editable(&q.project).await?;
    Ok(Json(json!({ "files": files })))
}

pub async fn edit_file_get(
    State(state): State<AppState>,
    Query(q): Query<EditFileQuery>,
) -> ApiResult<impl IntoResponse> {
    let content = state.editor().read(&q.project, &q.file).await?;
    Ok(Json(json!({
        "project": q.project,
        "file": q.file,
        "content": content,
    })))
}

pub async fn edit_file_set(
    State(state): State<AppState>,
    Query(q): Query<EditFileQuery>,
    Json(body): Json<FileWrite>,
) -> ApiResult<impl IntoResponse> {
    state
        .editor()
        .write(&q.project, &q.file, &body.content)
        .await?;
    Ok(Json(json!({ "ok": true })))
}
