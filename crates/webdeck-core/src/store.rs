use serde::Serialize;
use std::io::ErrorKind;
use std::path::Path;
use tokio::fs as afs;
use uuid::Uuid;

use crate::error::{Result, WorkspaceError};
use crate::names::is_valid_project_name;
use crate::resolve::is_strictly_within;
use crate::workspace::Workspace;

/// File whose presence makes a directory a listable project.
pub const INDEX_FILE: &str = "index.html";

const SCAFFOLD_TMP_PREFIX: &str = ".scaffold-";

/// A project as returned by [`ProjectStore::create`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Project {
    pub name: String,
    pub files: Vec<String>,
}

/// Project lifecycle: list, create with scaffold, delete.
#[derive(Clone, Debug)]
pub struct ProjectStore {
    workspace: Workspace,
}

impl ProjectStore {
    pub fn new(workspace: Workspace) -> Self {
        Self { workspace }
    }

    pub fn workspace(&self) -> &Workspace {
        &self.workspace
    }

    /// Names of every project that has an `index.html`, sorted.
    ///
    /// A missing workspace root means no projects. Directories with invalid
    /// names or that resolve outside the workspace are ignored.
    pub async fn list(&self) -> Result<Vec<String>> {
        let mut out = Vec::new();
        let mut rd = match afs::read_dir(self.workspace.root()).await {
            Ok(rd) => rd,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(out),
            Err(err) => return Err(err.into()),
        };
        while let Some(ent) = rd.next_entry().await? {
            let Some(name) = ent.file_name().to_str().map(str::to_string) else {
                continue;
            };
            if !is_valid_project_name(&name) {
                continue;
            }
            let dir = match self.workspace.project_dir(&name) {
                Ok(dir) => dir,
                Err(err) if err.is_confinement() => continue,
                Err(err) => return Err(err),
            };
            if !is_dir(&dir).await {
                continue;
            }
            if is_file(&dir.join(INDEX_FILE)).await {
                out.push(name);
            }
        }
        out.sort();
        Ok(out)
    }

    /// Create project `name` with the starter `index.html`, `style.css` and
    /// `script.js`.
    ///
    /// The scaffold is written into a hidden staging directory and renamed
    /// into place, so the project appears with all three files or not at all.
    pub async fn create(&self, name: &str) -> Result<Project> {
        let dir = self.workspace.project_dir(name)?;
        if exists(&dir).await {
            return Err(WorkspaceError::AlreadyExists(name.to_string()));
        }
        let root = self.workspace.canonical_root()?;
        afs::create_dir_all(&root).await?;

        let staging = root.join(format!("{}{}-{}", SCAFFOLD_TMP_PREFIX, name, Uuid::new_v4()));
        afs::create_dir(&staging).await?;
        let mut files = Vec::with_capacity(3);
        for (file, body) in scaffold(name) {
            if let Err(err) = afs::write(staging.join(file), body).await {
                let _ = afs::remove_dir_all(&staging).await;
                return Err(err.into());
            }
            files.push(file.to_string());
        }
        if let Err(err) = afs::rename(&staging, &dir).await {
            let _ = afs::remove_dir_all(&staging).await;
            if exists(&dir).await {
                return Err(WorkspaceError::AlreadyExists(name.to_string()));
            }
            return Err(err.into());
        }
        files.sort();
        tracing::info!(target: "webdeck::projects", project = name, "project created");
        Ok(Project {
            name: name.to_string(),
            files,
        })
    }

    /// Recursively remove project `name`.
    ///
    /// Confinement is re-checked before the existence probe. Removal is not
    /// atomic: a crash part-way leaves a partial directory behind.
    pub async fn delete(&self, name: &str) -> Result<()> {
        let dir = self.workspace.project_dir(name)?;
        let root = self.workspace.canonical_root()?;
        if !is_strictly_within(&root, &dir) {
            return Err(WorkspaceError::outside(&dir));
        }
        match afs::symlink_metadata(&dir).await {
            Ok(meta) if meta.is_dir() => {}
            Ok(_) => return Err(WorkspaceError::NotFound(name.to_string())),
            Err(err) if err.kind() == ErrorKind::NotFound => {
                return Err(WorkspaceError::NotFound(name.to_string()))
            }
            Err(err) => return Err(err.into()),
        }
        afs::remove_dir_all(&dir).await?;
        tracing::info!(target: "webdeck::projects", project = name, "project deleted");
        Ok(())
    }
}

/// Starter files for a new project. Only the project name varies.
pub fn scaffold(name: &str) -> [(&'static str, String); 3] {
    let html = format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="UTF-8">
  <meta name="viewport" content="width=device-width, initial-scale=1.0">
  <title>{name}</title>
  <link rel="stylesheet" href="style.css">
</head>
<body>
  <h1>{name}</h1>
  <p>Edit this project to get started.</p>
  <script src="script.js"></script>
</body>
</html>
"#
    );
    let css = "body {\n  background: #000;\n  color: #0f0;\n  font-family: monospace;\n  padding: 2rem;\n}\n"
        .to_string();
    let js = format!("console.log(\"{name} loaded\");\n");
    [("index.html", html), ("style.css", css), ("script.js", js)]
}

pub(crate) async fn exists(path: &Path) -> bool {
    afs::symlink_metadata(path).await.is_ok()
}

pub(crate) async fn is_dir(path: &Path) -> bool {
    afs::metadata(path).await.map(|m| m.is_dir()).unwrap_or(false)
}

pub(crate) async fn is_file(path: &Path) -> bool {
    afs::metadata(path).await.map(|m| m.is_file()).unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn store_at(path: &Path) -> ProjectStore {
        ProjectStore::new(Workspace::open(path))
    }

    #[tokio::test]
    async fn list_is_empty_when_root_missing() {
        let tmp = tempdir().expect("tempdir");
        let store = store_at(&tmp.path().join("absent"));
        assert!(store.list().await.expect("list").is_empty());
    }

    #[tokio::test]
    async fn list_requires_index_and_valid_name() {
        let tmp = tempdir().expect("tempdir");
        let root = tmp.path();
        for dir in ["beta", "alpha", "no-index", "bad name"] {
            std::fs::create_dir_all(root.join(dir)).expect("mkdir");
        }
        std::fs::write(root.join("beta/index.html"), "b").expect("write");
        std::fs::write(root.join("alpha/index.html"), "a").expect("write");
        std::fs::write(root.join("bad name/index.html"), "x").expect("write");
        std::fs::write(root.join("no-index/readme.txt"), "x").expect("write");
        std::fs::write(root.join("stray.html"), "x").expect("write");

        let names = store_at(root).list().await.expect("list");
        assert_eq!(names, vec!["alpha".to_string(), "beta".to_string()]);
    }

    #[tokio::test]
    async fn create_writes_scaffold_and_rejects_duplicates() {
        let tmp = tempdir().expect("tempdir");
        let store = store_at(&tmp.path().join("web"));
        let project = store.create("demo").await.expect("create");
        assert_eq!(project.name, "demo");
        assert_eq!(project.files, vec!["index.html", "script.js", "style.css"]);

        let html = std::fs::read_to_string(tmp.path().join("web/demo/index.html")).expect("read");
        assert!(html.contains("<title>demo</title>"));
        assert!(html.contains("<h1>demo</h1>"));

        let err = store.create("demo").await.unwrap_err();
        assert!(matches!(err, WorkspaceError::AlreadyExists(_)));
    }

    #[tokio::test]
    async fn create_leaves_no_staging_directories() {
        let tmp = tempdir().expect("tempdir");
        let store = store_at(tmp.path());
        store.create("one").await.expect("create");
        let entries: Vec<String> = std::fs::read_dir(tmp.path())
            .expect("read_dir")
            .map(|e| e.expect("entry").file_name().to_string_lossy().into_owned())
            .collect();
        assert_eq!(entries, vec!["one".to_string()]);
    }

    #[tokio::test]
    async fn create_and_delete_reject_invalid_names() {
        let tmp = tempdir().expect("tempdir");
        let store = store_at(tmp.path());
        assert!(matches!(
            store.create("../evil").await,
            Err(WorkspaceError::InvalidName(_))
        ));
        assert!(matches!(
            store.delete("a.b").await,
            Err(WorkspaceError::InvalidName(_))
        ));
    }

    #[tokio::test]
    async fn delete_removes_tree_then_reports_not_found() {
        let tmp = tempdir().expect("tempdir");
        let store = store_at(tmp.path());
        store.create("demo").await.expect("create");
        std::fs::create_dir_all(tmp.path().join("demo/img/icons")).expect("nested");
        std::fs::write(tmp.path().join("demo/img/icons/a.svg"), "<svg/>").expect("write");

        store.delete("demo").await.expect("first delete");
        assert!(!tmp.path().join("demo").exists());
        assert!(matches!(
            store.delete("demo").await,
            Err(WorkspaceError::NotFound(_))
        ));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn delete_refuses_symlink_aliases() {
        let tmp = tempdir().expect("tempdir");
        let outside = tempdir().expect("outside");
        std::fs::write(outside.path().join("keep.txt"), "keep").expect("write");
        std::os::unix::fs::symlink(outside.path(), tmp.path().join("demo")).expect("symlink");
        let store = store_at(tmp.path());
        assert!(matches!(
            store.delete("demo").await,
            Err(WorkspaceError::OutsideWorkspace(_))
        ));
        assert!(outside.path().join("keep.txt").exists());
    }
}
