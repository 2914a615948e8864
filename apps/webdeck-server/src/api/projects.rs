use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::Deserialize;
use serde_json::json;

use crate::responses::ApiResult;
use crate::AppState;

#[derive(Deserialize)]
pub struct ProjectCreateRequest {
    pub name: String,
}

pub async fn projects_list(State(state): State<AppState>) -> ApiResult<impl IntoResponse> {
    let projects = state.store().list().await?;
    Ok(Json(json!({ "projects": projects })))
}

pub async fn projects_create(
    State(state): State<AppState>,
    Json(req): Json<ProjectCreateRequest>,
) -> ApiResult<impl IntoResponse> {
    let project = state.store().create(&req.name).await?;
    Ok((
        StatusCode::CREATED,
        Json(json!({ "project": project.name, "files": project.files })),
    ))
}

pub async fn projects_delete(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> ApiResult<impl IntoResponse> {
    state.store().delete(&name).await?;
    Ok(Json(json!({ "deleted": name })))
}
