//! Link command - `ln -f -s` relative to a root directory.

use anyhow::Result;
use std::path::Path;

use nativelibs::common::symlink_file;

pub fn cmd_link(root: &Path, existing: &Path, desired: &Path) -> Result<()> {
    let link = symlink_file(root, existing, desired)?;
    println!("{} -> {}", link.display(), root.join(existing).display());
    Ok(())
}
