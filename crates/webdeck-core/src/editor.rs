use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::fs as afs;
use uuid::Uuid;

use crate::error::{Result, WorkspaceError};
use crate::names::{is_valid_project_name, normalize_relative_path};
use crate::resolve::is_strictly_within;
use crate::store::is_dir;
use crate::workspace::Workspace;

/// Extensions the editor may read and write.
pub const EDITABLE_EXTENSIONS: &[&str] = &[".html", ".css", ".js"];

pub fn is_editable(file: &str) -> bool {
    let lower = file.to_ascii_lowercase();
    EDITABLE_EXTENSIONS.iter().any(|ext| lower.ends_with(ext))
}

/// Read and overwrite individual text files inside a project.
///
/// Every access runs the same pipeline: project name, path shape, extension,
/// confinement, existence. Confinement runs before the only filesystem
/// existence probe. The editor never creates files.
#[derive(Clone, Debug)]
pub struct FileEditor {
    workspace: Workspace,
}

impl FileEditor {
    pub fn new(workspace: Workspace) -> Self {
        Self { workspace }
    }

    pub async fn read(&self, project: &str, file: &str) -> Result<String> {
        let path = self.locate(project, file).await?;
        let bytes = afs::read(&path).await?;
        String::from_utf8(bytes)
            .map_err(|err| std::io::Error::new(ErrorKind::InvalidData, err).into())
    }

    /// Replace the full content of an existing file.
    pub async fn write(&self, project: &str, file: &str, content: &str) -> Result<()> {
        let path = self.locate(project, file).await?;
        save_bytes_atomic(&path, content.as_bytes()).await?;
        tracing::info!(
            target: "webdeck::editor",
            project,
            file,
            bytes = content.len(),
            "file saved"
        );
        Ok(())
    }

    /// Editable files directly inside the project directory, sorted.
    pub async fn list_editable(&self, project: &str) -> Result<Vec<String>> {
        let dir = self.workspace.project_dir(project)?;
        if !is_dir(&dir).await {
            return Err(WorkspaceError::NotFound(project.to_string()));
        }
        let mut out = Vec::new();
        let mut rd = afs::read_dir(&dir).await?;
        while let Some(ent) = rd.next_entry().await? {
            let Some(name) = ent.file_name().to_str().map(str::to_string) else {
                continue;
            };
            if !is_editable(&name) {
                continue;
            }
            let is_file = ent.file_type().await.map(|t| t.is_file()).unwrap_or(false);
            if is_file {
                out.push(name);
            }
        }
        out.sort();
        Ok(out)
    }

    async fn locate(&self, project: &str, file: &str) -> Result<PathBuf> {
        if !is_valid_project_name(project) {
            return Err(WorkspaceError::InvalidName(project.to_string()));
        }
        let Some(rel) = normalize_relative_path(file) else {
            return Err(WorkspaceError::InvalidPath(file.to_string()));
        };
        if !is_editable(&rel) {
            return Err(WorkspaceError::DisallowedType(file.to_string()));
        }

        let dir = self.workspace.project_dir(project)?;
        let root = self.workspace.canonical_root()?;
        let path = self
            .workspace
            .resolver()
            .resolve(&dir, &rel)
            .map_err(|err| match err {
                WorkspaceError::PathTraversal(_) => WorkspaceError::OutsideWorkspace(rel.clone()),
                other => other,
            })?;
        if !is_strictly_within(&root, &path) || !is_strictly_within(&dir, &path) {
            return Err(WorkspaceError::OutsideWorkspace(rel));
        }

        match afs::metadata(&path).await {
            Ok(meta) if meta.is_file() => Ok(path),
            Ok(_) => Err(WorkspaceError::NotFound(rel)),
            Err(err) if err.kind() == ErrorKind::NotFound => Err(WorkspaceError::NotFound(rel)),
            Err(err) => Err(err.into()),
        }
    }
}

/// Write through a sibling temp file and rename over the target.
async fn save_bytes_atomic(path: &Path, bytes: &[u8]) -> std::io::Result<()> {
    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let tmp = path.with_file_name(format!(".{}.{}.tmp", file_name, Uuid::new_v4()));
    afs::write(&tmp, bytes).await?;
    match afs::rename(&tmp, path).await {
        Ok(_) => Ok(()),
        Err(_) => {
            let _ = afs::remove_file(path).await;
            let result = afs::rename(&tmp, path).await;
            if result.is_err() {
                let _ = afs::remove_file(&tmp).await;
            }
            result
        }
    }
}
