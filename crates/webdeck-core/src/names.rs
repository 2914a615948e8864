//! Project-name and relative-path validation.
//!
//! One rule per input kind, shared by every caller: project creation,
//! deletion, editor access, upload targets, listing and static serving all
//! go through [`is_valid_project_name`].

use std::path::{Component, Path};

/// A project name is valid when, with every `-` and `_` removed, what is left
/// is non-empty and entirely ASCII alphanumeric.
pub fn is_valid_project_name(name: &str) -> bool {
    let mut core = name.chars().filter(|c| !matches!(c, '-' | '_')).peekable();
    core.peek().is_some() && core.all(|c| c.is_ascii_alphanumeric())
}

/// Normalize a client-supplied relative path, or `None` when it is unsafe.
///
/// Both `/` and `\` count as separators; the result always uses `/` and has
/// no leading slash. Rejects empty paths, any `..` segment, and absolute
/// paths (including Windows drive and UNC prefixes).
pub fn normalize_relative_path(raw: &str) -> Option<String> {
    let unified = raw.replace('\\', "/");
    let trimmed = unified.trim_start_matches('/');
    if trimmed.is_empty()
        || trimmed == ".."
        || trimmed.starts_with("../")
        || trimmed.contains("/../")
    {
        return None;
    }
    if trimmed.split('/').any(|segment| segment == "..") {
        return None;
    }
    let path = Path::new(trimmed);
    if path.is_absolute() || has_root_or_prefix(path) {
        return None;
    }
    // "C:foo" is relative to a drive on Windows but a plain name elsewhere.
    if cfg!(windows) && looks_like_drive(trimmed) {
        return None;
    }
    Some(trimmed.to_string())
}

/// Whether an upload entry path is safe to join under a project directory.
pub fn is_valid_relative_path(raw: &str) -> bool {
    normalize_relative_path(raw).is_some()
}

fn has_root_or_prefix(path: &Path) -> bool {
    path.components()
        .any(|c| matches!(c, Component::RootDir | Component::Prefix(_)))
}

fn looks_like_drive(path: &str) -> bool {
    let bytes = path.as_bytes();
    bytes.len() >= 2 && bytes[0].is_ascii_alphabetic() && bytes[1] == b':'
}

/// Lower-cased extension including the leading dot, or `""` when the final
/// segment has none (dotfiles such as `.gitignore` have no extension).
pub fn extension_of(rel: &str) -> String {
    Path::new(rel)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| format!(".{}", ext.to_ascii_lowercase()))
        .unwrap_or_default()
}
