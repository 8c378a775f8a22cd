//! Rename disguised executables to `lib<name>.so`.
//!
//! Package installers only extract `lib*.so` files from the native library
//! directories. Executables that must ship alongside the libraries are built
//! as `<name>-disguised-exe` and renamed here so they survive packaging; the
//! device side restores them to plain executables.

use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};
use walkdir::WalkDir;

/// File name suffix marking a disguised executable.
pub const DISGUISED_EXE_SUFFIX: &str = "-disguised-exe";

/// `lib<base>.so` for a `<base>-disguised-exe` file name, `None` otherwise.
///
/// A bare `-disguised-exe` has no base name and is not renamed.
pub fn disguised_name(file_name: &str) -> Option<String> {
    let base = file_name.strip_suffix(DISGUISED_EXE_SUFFIX)?;
    if base.is_empty() {
        return None;
    }
    Some(format!("lib{}.so", base))
}

/// Collect every non-directory entry under `dest` whose name marks it as a
/// disguised executable. Read-only; nothing is renamed.
pub fn find_disguised(dest: &Path) -> Result<Vec<PathBuf>> {
    let mut found = Vec::new();
    if !dest.exists() {
        return Ok(found);
    }

    for entry in WalkDir::new(dest).sort_by_file_name() {
        let entry = entry.with_context(|| format!("Failed to walk {}", dest.display()))?;
        if entry.file_type().is_dir() {
            continue;
        }
        let matches = entry
            .file_name()
            .to_str()
            .and_then(disguised_name)
            .is_some();
        if matches {
            found.push(entry.into_path());
        }
    }

    Ok(found)
}

/// Rename every disguised executable under `dest` in place.
///
/// Only the last path segment changes. If the new name already exists it is
/// overwritten. Returns the renamed paths as `(from, to)` pairs.
pub fn rename_disguised(dest: &Path) -> Result<Vec<(PathBuf, PathBuf)>> {
    let mut renamed = Vec::new();

    for exe in find_disguised(dest)? {
        let Some(new_name) = exe.file_name().and_then(|n| n.to_str()).and_then(disguised_name)
        else {
            continue;
        };
        let target = exe.with_file_name(new_name);

        if fs::symlink_metadata(&target).is_ok() {
            warn!(
                from = %exe.display(),
                to = %target.display(),
                "disguised executable overwrites an existing file"
            );
        }
        debug!("mv {} {}", exe.display(), target.display());
        fs::rename(&exe, &target).with_context(|| {
            format!("Failed to rename {} to {}", exe.display(), target.display())
        })?;
        renamed.push((exe, target));
    }

    Ok(renamed)
}
