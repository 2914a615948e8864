use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use tracing::{error, warn};
use webdeck_core::WorkspaceError;

pub(crate) fn problem(status: StatusCode, title: &str, detail: Option<&str>) -> Response {
    let mut body = json!({"type":"about:blank","title": title,"status": status.as_u16()});
    if let Some(d) = detail {
        body["detail"] = json!(d);
    }
    (status, Json(body)).into_response()
}

/// Workspace failure rendered as a problem+json response.
#[derive(Debug)]
pub(crate) struct ApiError(pub WorkspaceError);

pub(crate) type ApiResult<T> = Result<T, ApiError>;

impl From<WorkspaceError> for ApiError {
    fn from(err: WorkspaceError) -> Self {
        ApiError(err)
    }
}

pub(crate) fn status_for(err: &WorkspaceError) -> StatusCode {
    match err {
        WorkspaceError::InvalidName(_)
        | WorkspaceError::InvalidPath(_)
        | WorkspaceError::PathTraversal(_)
        | WorkspaceError::MissingRoot => StatusCode::BAD_REQUEST,
        WorkspaceError::DisallowedType(_) => StatusCode::UNSUPPORTED_MEDIA_TYPE,
        WorkspaceError::OutsideWorkspace(_) => StatusCode::FORBIDDEN,
        WorkspaceError::NotFound(_) => StatusCode::NOT_FOUND,
        WorkspaceError::AlreadyExists(_) => StatusCode::CONFLICT,
        WorkspaceError::Io(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

fn title_for(status: StatusCode) -> &'static str {
    status.canonical_reason().unwrap_or("Error")
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let err = self.0;
        let status = status_for(&err);
        if let WorkspaceError::Io(ref io) = err {
            error!(target: "webdeck::http", error = %io, "workspace operation failed");
            return problem(status, title_for(status), Some("internal error"));
        }
        if err.is_confinement() {
            warn!(target: "webdeck::http", kind = err.kind(), detail = %err, "confinement violation");
        }
        let mut body = json!({
            "type": "about:blank",
            "title": title_for(status),
            "status": status.as_u16(),
            "detail": err.to_string(),
            "kind": err.kind(),
        });
        if matches!(err, WorkspaceError::MissingRoot) {
            body["detail"] = json!("root_folder is required");
        }
        (status, Json(body)).into_response()
    }
}
