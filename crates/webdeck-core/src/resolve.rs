//! Confinement of untrusted paths under a root directory.
//!
//! The ancestor checks are pure functions over already-canonical paths. All
//! filesystem access goes through [`Canonicalize`], so the resolver can be
//! driven by an in-memory probe in tests.

use std::ffi::OsString;
use std::io;
use std::path::{Component, Path, PathBuf};
use std::sync::Arc;

use crate::error::{Result, WorkspaceError};

/// Filesystem probe used to resolve symlinks and `.`/`..` segments.
pub trait Canonicalize: Send + Sync {
    /// Canonicalize a path that must exist.
    fn canonicalize(&self, path: &Path) -> io::Result<PathBuf>;
}

/// Probe backed by the operating system.
#[derive(Clone, Copy, Debug, Default)]
pub struct OsCanonicalize;

impl Canonicalize for OsCanonicalize {
    fn canonicalize(&self, path: &Path) -> io::Result<PathBuf> {
        std::fs::canonicalize(path)
    }
}

/// `candidate` equals `root` or lies below it. Both must be canonical.
pub fn is_within(root: &Path, candidate: &Path) -> bool {
    candidate.starts_with(root)
}

/// `candidate` lies below `root` and is not `root` itself.
pub fn is_strictly_within(root: &Path, candidate: &Path) -> bool {
    candidate != root && candidate.starts_with(root)
}

#[derive(Clone)]
pub struct PathResolver {
    fs: Arc<dyn Canonicalize>,
}

impl Default for PathResolver {
    fn default() -> Self {
        Self::os()
    }
}

impl std::fmt::Debug for PathResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PathResolver").finish_non_exhaustive()
    }
}

impl PathResolver {
    pub fn os() -> Self {
        Self::with_probe(Arc::new(OsCanonicalize))
    }

    pub fn with_probe(fs: Arc<dyn Canonicalize>) -> Self {
        Self { fs }
    }

    /// Canonicalize `path`, tolerating a tail that does not exist yet.
    ///
    /// The longest existing prefix is canonicalized by the probe (resolving
    /// symlinks); the remaining components are applied lexically.
    pub fn canonical(&self, path: &Path) -> io::Result<PathBuf> {
        let components: Vec<Component<'_>> = path.components().collect();
        let mut last_err = None;
        for split in (1..=components.len()).rev() {
            let prefix: PathBuf = components[..split].iter().collect();
            match self.fs.canonicalize(&prefix) {
                Ok(base) => return Ok(apply_lexically(base, &components[split..])),
                Err(err) => last_err = Some(err),
            }
        }
        Err(last_err.unwrap_or_else(|| {
            io::Error::new(io::ErrorKind::InvalidInput, "empty path cannot be resolved")
        }))
    }

    /// Join `relative` onto `root` and return the canonical result, provided
    /// it is `root` itself or lies below it.
    ///
    /// Backslashes in `relative` are treated as separators. Escapes are
    /// rejected with [`WorkspaceError::PathTraversal`], never clamped.
    pub fn resolve(&self, root: &Path, relative: &str) -> Result<PathBuf> {
        let root = self.canonical(root)?;
        let unified = relative.replace('\\', "/");
        let candidate = self.canonical(&root.join(&unified))?;
        if is_within(&root, &candidate) {
            Ok(candidate)
        } else {
            tracing::warn!(
                target: "webdeck::confinement",
                root = %root.display(),
                relative,
                resolved = %candidate.display(),
                "rejected path outside its root"
            );
            Err(WorkspaceError::PathTraversal(relative.to_string()))
        }
    }

    /// Canonicalize `candidate` and require it to lie strictly below the
    /// canonical `root`.
    pub fn confine_strict(&self, root: &Path, candidate: &Path) -> Result<PathBuf> {
        let root = self.canonical(root)?;
        let resolved = self.canonical(candidate)?;
        if is_strictly_within(&root, &resolved) {
            Ok(resolved)
        } else {
            Err(WorkspaceError::outside(candidate))
        }
    }
}

fn apply_lexically(mut base: PathBuf, rest: &[Component<'_>]) -> PathBuf {
    for component in rest {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                base.pop();
            }
            Component::Normal(name) => base.push(OsString::from(name)),
            Component::RootDir | Component::Prefix(_) => {
                base = PathBuf::from(component.as_os_str());
            }
        }
    }
    base
}
