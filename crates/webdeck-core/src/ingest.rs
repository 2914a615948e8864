use serde::Serialize;
use std::io::ErrorKind;
use tokio::fs as afs;

use crate::error::{Result, WorkspaceError};
use crate::names::{extension_of, is_valid_project_name, normalize_relative_path};
use crate::resolve::is_strictly_within;
use crate::store::{is_file, ProjectStore, INDEX_FILE};

/// Extensions accepted from folder uploads. Anything else with an extension
/// is skipped; files without an extension are kept.
pub const UPLOAD_EXTENSIONS: &[&str] = &[
    ".html", ".css", ".js", ".png", ".jpg", ".jpeg", ".gif", ".svg", ".webp", ".ico", ".txt",
    ".json", ".map",
];

pub fn is_uploadable_extension(ext: &str) -> bool {
    ext.is_empty() || UPLOAD_EXTENSIONS.contains(&ext)
}

/// One uploaded file: the path the client reported and its raw bytes.
#[derive(Clone, Debug)]
pub struct UploadEntry {
    pub path: String,
    pub bytes: Vec<u8>,
}

impl UploadEntry {
    pub fn new(path: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            path: path.into(),
            bytes: bytes.into(),
        }
    }
}

#[derive(Clone, Debug)]
pub struct UploadRequest {
    pub project_name: String,
    /// Folder name the client prefixed to every entry path.
    pub root_folder: String,
    pub overwrite: bool,
    pub entries: Vec<UploadEntry>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct UploadSummary {
    pub project: String,
    pub saved: usize,
    pub skipped: usize,
    pub has_index: bool,
}

/// Write an uploaded directory tree into a project.
///
/// Entries are processed in order with no transaction around them: an entry
/// that fails validation aborts the call and leaves earlier entries on disk.
#[derive(Clone, Debug)]
pub struct FolderUploadIngester {
    store: ProjectStore,
}

impl FolderUploadIngester {
    pub fn new(store: ProjectStore) -> Self {
        Self { store }
    }

    pub async fn ingest(&self, request: UploadRequest) -> Result<UploadSummary> {
        let UploadRequest {
            project_name,
            root_folder,
            overwrite,
            entries,
        } = request;
        if !is_valid_project_name(&project_name) {
            return Err(WorkspaceError::InvalidName(project_name));
        }
        if root_folder.is_empty() {
            return Err(WorkspaceError::MissingRoot);
        }
        let workspace = self.store.workspace();
        let dest = workspace.project_dir(&project_name)?;

        match afs::symlink_metadata(&dest).await {
            Ok(meta) => {
                if !overwrite {
                    return Err(WorkspaceError::AlreadyExists(project_name));
                }
                if meta.is_dir() {
                    afs::remove_dir_all(&dest).await?;
                } else {
                    afs::remove_file(&dest).await?;
                }
                tracing::info!(
                    target: "webdeck::upload",
                    project = %project_name,
                    "replacing existing project"
                );
            }
            Err(err) if err.kind() == ErrorKind::NotFound => {}
            Err(err) => return Err(err.into()),
        }
        afs::create_dir_all(&dest).await?;

        let prefix = format!("{}/", root_folder.replace('\\', "/"));
        let mut saved = 0;
        let mut skipped = 0;
        for entry in entries {
            let unified = entry.path.replace('\\', "/");
            let relative = unified.strip_prefix(&prefix).unwrap_or(&unified);
            let Some(rel) = normalize_relative_path(relative) else {
                tracing::warn!(
                    target: "webdeck::upload",
                    project = %project_name,
                    path = %entry.path,
                    saved,
                    "upload aborted on unsafe entry path"
                );
                return Err(WorkspaceError::PathTraversal(entry.path));
            };

            let ext = extension_of(&rel);
            if !is_uploadable_extension(&ext) {
                tracing::debug!(target: "webdeck::upload", path = %rel, "skipping disallowed type");
                skipped += 1;
                continue;
            }

            let out = workspace.resolver().canonical(&dest.join(&rel))?;
            // "." and friends collapse onto the project directory itself.
            if out == dest {
                return Err(WorkspaceError::PathTraversal(entry.path));
            }
            if !is_strictly_within(&dest, &out) {
                return Err(WorkspaceError::OutsideWorkspace(rel));
            }
            if let Some(parent) = out.parent() {
                afs::create_dir_all(parent).await?;
            }
            afs::write(&out, &entry.bytes).await?;
            saved += 1;
        }

        let has_index = is_file(&dest.join(INDEX_FILE)).await;
        tracing::info!(
            target: "webdeck::upload",
            project = %project_name,
            saved,
            skipped,
            has_index,
            "upload complete"
        );
        Ok(UploadSummary {
            project: project_name,
            saved,
            skipped,
            has_index,
        })
    }
}
