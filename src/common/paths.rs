//! Utilities for path checking and directory management.

use anyhow::{Context, Result};
use std::fs;
use std::path::{Component, Path};

/// Ensure a directory exists, creating it (and its parents) if necessary.
pub fn ensure_dir_exists(path: &Path) -> Result<()> {
    fs::create_dir_all(path)
        .with_context(|| format!("Failed to create directory {}", path.display()))?;
    Ok(())
}

/// Ensure all parent directories of a file exist.
///
/// If the path has no parent, does nothing.
pub fn ensure_parent_exists(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        ensure_dir_exists(parent)?;
    }
    Ok(())
}

/// `path` relative to `root`, joined with `/` regardless of platform.
///
/// Returns `None` when `path` is not under `root`.
pub fn relative_unix_path(root: &Path, path: &Path) -> Option<String> {
    let rel = path.strip_prefix(root).ok()?;
    let parts: Vec<String> = rel
        .components()
        .filter_map(|c| match c {
            Component::Normal(part) => Some(part.to_string_lossy().into_owned()),
            _ => None,
        })
        .collect();
    Some(parts.join("/"))
}
