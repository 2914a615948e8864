use std::path::{Path, PathBuf};

use crate::error::{Result, WorkspaceError};
use crate::names::is_valid_project_name;
use crate::resolve::PathResolver;

/// The single directory holding every project, plus the resolver used to
/// confine paths beneath it.
#[derive(Clone, Debug)]
pub struct Workspace {
    root: PathBuf,
    resolver: PathResolver,
}

impl Workspace {
    /// Workspace rooted at `root`, resolved against the real filesystem.
    pub fn open(root: impl Into<PathBuf>) -> Self {
        Self::with_resolver(root, PathResolver::os())
    }

    pub fn with_resolver(root: impl Into<PathBuf>, resolver: PathResolver) -> Self {
        Self {
            root: root.into(),
            resolver,
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn resolver(&self) -> &PathResolver {
        &self.resolver
    }

    /// Canonical form of the workspace root. The root need not exist yet.
    pub fn canonical_root(&self) -> Result<PathBuf> {
        Ok(self.resolver.canonical(&self.root)?)
    }

    /// Confined on-disk location of project `name`, which is always exactly
    /// `<root>/<name>`.
    ///
    /// Validates the name, then requires the canonical location to equal the
    /// syntactic one, so a project directory that is a symlink to somewhere
    /// else (even inside the workspace) is refused. Does not probe whether
    /// the project exists.
    pub fn project_dir(&self, name: &str) -> Result<PathBuf> {
        if !is_valid_project_name(name) {
            return Err(WorkspaceError::InvalidName(name.to_string()));
        }
        let root = self.canonical_root()?;
        let expected = root.join(name);
        let resolved = self
            .resolver
            .confine_strict(&root, &expected)
            .map_err(|err| self.reject(name, err))?;
        if resolved != expected {
            return Err(self.reject(name, WorkspaceError::outside(&expected)));
        }
        Ok(resolved)
    }

    fn reject(&self, name: &str, err: WorkspaceError) -> WorkspaceError {
        if err.is_confinement() {
            tracing::warn!(
                target: "webdeck::confinement",
                project = name,
                root = %self.root.display(),
                "project directory resolves outside the workspace"
            );
        }
        err
    }
}
