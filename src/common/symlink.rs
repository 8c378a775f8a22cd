//! `ln -f -s` for a single file.

use anyhow::{Context, Result};
use std::fs;
use std::os::unix::fs::symlink;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Create a symlink at `desired_link` pointing to `existing_file`, replacing
/// any file or link already there.
///
/// Both paths are resolved against `root`; absolute paths are used as given.
/// Returns the link path that was created.
pub fn symlink_file(root: &Path, existing_file: &Path, desired_link: &Path) -> Result<PathBuf> {
    let existing = root.join(existing_file);
    let link = root.join(desired_link);

    if let Ok(meta) = fs::symlink_metadata(&link) {
        if meta.is_dir() {
            anyhow::bail!("Cannot replace directory {} with a symlink", link.display());
        }
        fs::remove_file(&link)
            .with_context(|| format!("Failed to remove existing {}", link.display()))?;
    }

    debug!("ln -f -s {} {}", existing.display(), link.display());
    symlink(&existing, &link).with_context(|| {
        format!("Failed to link {} -> {}", link.display(), existing.display())
    })?;
    Ok(link)
}
