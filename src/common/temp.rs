//! Utilities for managing scratch directories.

use anyhow::{Context, Result};
use std::fs;
use std::path::Path;

/// Make `dir` exist and be empty.
///
/// Anything already at `dir` (a previous run's tree, or a stray file) is
/// removed first, so nothing stale survives into the next build.
pub fn make_clean_dir(dir: &Path) -> Result<()> {
    match fs::symlink_metadata(dir) {
        Ok(meta) if meta.is_dir() => fs::remove_dir_all(dir)
            .with_context(|| format!("Failed to clean {}", dir.display()))?,
        Ok(_) => fs::remove_file(dir)
            .with_context(|| format!("Failed to remove {}", dir.display()))?,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
        Err(e) => {
            return Err(e).with_context(|| format!("Failed to stat {}", dir.display()));
        }
    }

    fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create {}", dir.display()))?;
    Ok(())
}
