//! Confined project storage for the webdeck workspace server.
//!
//! Every client-supplied project name and file path passes through
//! [`names`] and [`resolve`] before it reaches the filesystem. The
//! operations live in [`ProjectStore`], [`FileEditor`] and
//! [`FolderUploadIngester`]; they keep no in-memory state and re-read the
//! workspace directory on every call.

mod config;
pub use config::{config_schema_json, load_config, parse_config, Config};
pub use config::{ServerConfig, WorkspaceConfig};

pub mod editor;
pub mod error;
pub mod ingest;
pub mod names;
pub mod resolve;
pub mod store;
pub mod util;
mod workspace;

#[cfg(any(test, feature = "test_support"))]
pub mod test_support;

pub use editor::FileEditor;
pub use error::{Result, WorkspaceError};
pub use ingest::{FolderUploadIngester, UploadEntry, UploadRequest, UploadSummary};
pub use resolve::{Canonicalize, OsCanonicalize, PathResolver};
pub use store::{Project, ProjectStore};
pub use workspace::Workspace;
