use thiserror::Error;

/// Failures surfaced by the workspace operations.
///
/// Every variant except [`WorkspaceError::Io`] is a client-input error that
/// carries enough detail to correct the request. `Io` wraps filesystem
/// failures that the core does not classify further.
#[derive(Debug, Error)]
pub enum WorkspaceError {
    #[error("invalid project name: {0:?}")]
    InvalidName(String),
    #[error("invalid path: {0:?}")]
    InvalidPath(String),
    #[error("path escapes its root: {0:?}")]
    PathTraversal(String),
    #[error("not found: {0}")]
    NotFound(String),
    #[error("already exists: {0}")]
    AlreadyExists(String),
    #[error("file type not allowed: {0:?}")]
    DisallowedType(String),
    #[error("path is outside the workspace: {0:?}")]
    OutsideWorkspace(String),
    #[error("missing root folder")]
    MissingRoot,
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl WorkspaceError {
    /// Stable machine-readable kind, used by adapters and logs.
    pub fn kind(&self) -> &'static str {
        match self {
            WorkspaceError::InvalidName(_) => "invalid_name",
            WorkspaceError::InvalidPath(_) => "invalid_path",
            WorkspaceError::PathTraversal(_) => "path_traversal",
            WorkspaceError::NotFound(_) => "not_found",
            WorkspaceError::AlreadyExists(_) => "already_exists",
            WorkspaceError::DisallowedType(_) => "disallowed_type",
            WorkspaceError::OutsideWorkspace(_) => "outside_workspace",
            WorkspaceError::MissingRoot => "missing_root",
            WorkspaceError::Io(_) => "internal",
        }
    }

    /// True for confinement violations, which are logged as security events.
    pub fn is_confinement(&self) -> bool {
        matches!(
            self,
            WorkspaceError::PathTraversal(_) | WorkspaceError::OutsideWorkspace(_)
        )
    }

    pub(crate) fn outside(path: &std::path::Path) -> Self {
        WorkspaceError::OutsideWorkspace(path.display().to_string())
    }
}

pub type Result<T, E = WorkspaceError> = std::result::Result<T, E>;
