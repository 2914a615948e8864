use axum::extract::multipart::{Multipart, MultipartError};
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use webdeck_core::util::parse_bool_flag;
use webdeck_core::{UploadEntry, UploadRequest};

use crate::responses::{problem, ApiError};
use crate::AppState;

const FIELD_PROJECT: &str = "project_name";
const FIELD_ROOT: &str = "root_folder";
const FIELD_OVERWRITE: &str = "overwrite";
const FIELD_FILES: &str = "files";

fn multipart_problem(err: MultipartError) -> Response {
    problem(err.status(), "Bad Request", Some(&err.body_text()))
}

fn bad_request(detail: &str) -> Response {
    problem(StatusCode::BAD_REQUEST, "Bad Request", Some(detail))
}

/// Collect the multipart form into an [`UploadRequest`].
///
/// File parts take their relative path from the part's filename. Unknown
/// fields are ignored; a missing name or root is left empty for the
/// ingester to reject.
async fn read_form(mut form: Multipart) -> Result<UploadRequest, Response> {
    let mut project_name = String::new();
    let mut root_folder = String::new();
    let mut overwrite = false;
    let mut entries = Vec::new();

    while let Some(field) = form.next_field().await.map_err(multipart_problem)? {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            FIELD_PROJECT => {
                project_name = field.text().await.map_err(multipart_problem)?;
            }
            FIELD_ROOT => {
                root_folder = field.text().await.map_err(multipart_problem)?;
            }
            FIELD_OVERWRITE => {
                let raw = field.text().await.map_err(multipart_problem)?;
                overwrite = parse_bool_flag(&raw)
                    .ok_or_else(|| bad_request("overwrite must be a boolean"))?;
            }
            FIELD_FILES => {
                let path = field.file_name().unwrap_or_default().to_string();
                let bytes = field.bytes().await.map_err(multipart_problem)?;
                entries.push(UploadEntry::new(path, bytes.to_vec()));
            }
            _ => {}
        }
    }

    Ok(UploadRequest {
        project_name: project_name.trim().to_string(),
        root_folder: root_folder.trim().to_string(),
        overwrite,
        entries,
    })
}

pub async fn upload_project(State(state): State<AppState>, form: Multipart) -> Response {
    let request = match read_form(form).await {
        Ok(r) => r,
        Err(res) => return res,
    };
    let files = request.entries.len();
    match state.ingester().ingest(request).await {
        Ok(summary) => {
            tracing::info!(
                target: "webdeck::upload",
                project = %summary.project,
                received = files,
                saved = summary.saved,
                skipped = summary.skipped,
                "upload stored"
            );
            Json(json!({
                "project": summary.project,
                "saved_files": summary.saved,
                "skipped_files": summary.skipped,
                "has_index": summary.has_index,
            }))
            .into_response()
        }
        Err(err) => ApiError(err).into_response(),
    }
}
