//! Copy primitives: whole-directory content merges and single files.
//!
//! Both overwrite whatever already sits at the destination. A symlink at the
//! destination is replaced, never written through.

use anyhow::{Context, Result};
use std::fs;
use std::os::unix::fs::symlink;
use std::path::Path;
use tracing::warn;

/// Copy the contents of `src` into `dst` (not `src` itself), recursively.
///
/// `dst` is created if needed. Files already in `dst` are overwritten, files
/// only in `dst` are left alone. Symlinks are recreated as symlinks with the
/// same target. A missing `src` copies nothing.
///
/// Returns the number of files and symlinks written.
pub fn copy_dir_contents(src: &Path, dst: &Path) -> Result<usize> {
    if !src.is_dir() {
        warn!(source = %src.display(), "native library directory does not exist, nothing to copy");
        return Ok(0);
    }

    fs::create_dir_all(dst)
        .with_context(|| format!("Failed to create {}", dst.display()))?;
    copy_dir_recursive(src, dst)
}

fn copy_dir_recursive(src: &Path, dst: &Path) -> Result<usize> {
    let mut count = 0;

    let entries = fs::read_dir(src)
        .with_context(|| format!("Failed to read directory {}", src.display()))?;
    for entry in entries {
        let entry = entry?;
        let src_path = entry.path();
        let dst_path = dst.join(entry.file_name());
        let file_type = entry.file_type()?;

        if file_type.is_symlink() {
            let target = fs::read_link(&src_path)?;
            remove_if_not_dir(&dst_path)?;
            symlink(&target, &dst_path).with_context(|| {
                format!("Failed to link {} -> {}", dst_path.display(), target.display())
            })?;
            count += 1;
        } else if file_type.is_dir() {
            fs::create_dir_all(&dst_path)
                .with_context(|| format!("Failed to create {}", dst_path.display()))?;
            count += copy_dir_recursive(&src_path, &dst_path)?;
        } else {
            copy_file(&src_path, &dst_path)?;
            count += 1;
        }
    }

    Ok(count)
}

/// Copy a single file to `dst`, overwriting it. The parent of `dst` must exist.
pub fn copy_file(src: &Path, dst: &Path) -> Result<()> {
    if dst.is_symlink() {
        fs::remove_file(dst)
            .with_context(|| format!("Failed to replace symlink {}", dst.display()))?;
    }
    fs::copy(src, dst)
        .with_context(|| format!("Failed to copy {} to {}", src.display(), dst.display()))?;
    Ok(())
}

fn remove_if_not_dir(path: &Path) -> Result<()> {
    match fs::symlink_metadata(path) {
        Ok(meta) if !meta.is_dir() => fs::remove_file(path)
            .with_context(|| format!("Failed to remove {}", path.display())),
        _ => Ok(()),
    }
}
