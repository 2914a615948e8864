use std::path::Path;

use axum::body::Body;
use axum::http::{header, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use tokio::fs as afs;
use webdeck_core::names::extension_of;
use webdeck_core::{Workspace, WorkspaceError};

use crate::responses::{ApiError, ApiResult};

const DIRECTORY_INDEX: &str = "index.html";

/// Content type for a served file, chosen by its lowercase extension.
pub fn content_type_for(path: &Path) -> &'static str {
    let name = path.file_name().and_then(|n| n.to_str()).unwrap_or("");
    match extension_of(name).as_str() {
        ".html" | ".htm" => "text/html; charset=utf-8",
        ".css" => "text/css; charset=utf-8",
        ".js" | ".mjs" => "text/javascript; charset=utf-8",
        ".json" => "application/json",
        ".txt" | ".md" => "text/plain; charset=utf-8",
        ".svg" => "image/svg+xml",
        ".png" => "image/png",
        ".jpg" | ".jpeg" => "image/jpeg",
        ".gif" => "image/gif",
        ".ico" => "image/x-icon",
        ".webp" => "image/webp",
        ".woff" => "font/woff",
        ".woff2" => "font/woff2",
        ".ttf" => "font/ttf",
        ".mp3" => "audio/mpeg",
        ".wav" => "audio/wav",
        ".mp4" => "video/mp4",
        ".webm" => "video/webm",
        _ => "application/octet-stream",
    }
}

/// Read `path` into a response with a content type derived from its name.
pub async fn file_response(path: &Path) -> ApiResult<Response> {
    let bytes = match afs::read(path).await {
        Ok(b) => b,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            return Err(ApiError(WorkspaceError::NotFound(
                path.file_name()
                    .map(|n| n.to_string_lossy().into_owned())
                    .unwrap_or_default(),
            )))
        }
        Err(err) => return Err(ApiError(err.into())),
    };
    let mut res = (StatusCode::OK, Body::from(bytes)).into_response();
    res.headers_mut().insert(
        header::CONTENT_TYPE,
        HeaderValue::from_static(content_type_for(path)),
    );
    Ok(res)
}

/// Serve `relative` from below the workspace root.
///
/// The path goes through the workspace resolver, so anything that lands
/// outside the root is refused. Directories serve their `index.html`.
pub async fn serve_confined(workspace: &Workspace, relative: &str) -> ApiResult<Response> {
    let resolver = workspace.resolver();
    let mut target = resolver.resolve(workspace.root(), relative)?;
    if afs::metadata(&target)
        .await
        .map(|m| m.is_dir())
        .unwrap_or(false)
    {
        let nested = format!("{}/{}", relative.trim_end_matches(['/', '\\']), DIRECTORY_INDEX);
        target = resolver.resolve(workspace.root(), nested.trim_start_matches('/'))?;
    }
    file_response(&target).await
}
