//! Input fingerprint - a SHA-256 key over everything that shapes the output.
//!
//! Two plans with the same key produce byte-identical trees, so a caller can
//! compare keys to decide whether the pipeline needs to run at all. Symlinks
//! in source directories are copied as links, so their targets are part of the
//! key too. The key never influences what the pipeline writes.

use anyhow::{Context, Result};
use sha2::{Digest, Sha256};
use std::fs;
use std::path::Path;
use walkdir::WalkDir;

use crate::common::relative_unix_path;
use crate::manifest::{generate, sha1_file};
use crate::plan::{NativeLibsPlan, StrippedObject};

/// Compute the input key for `plan`.
///
/// Covers the module name, CPU filters, every declared directory in order
/// together with the files it currently holds, and every stripped object's
/// name, CPU type and content.
pub fn input_key(plan: &NativeLibsPlan) -> Result<String> {
    let mut hasher = Sha256::new();

    hasher.update(format!("module {}\n", plan.module()));
    for cpu in plan.cpu_filters() {
        hasher.update(format!("cpu {}\n", cpu));
    }
    for dir in plan.native_lib_directories() {
        hash_dir(&mut hasher, "lib_dir", dir)?;
    }
    for dir in plan.native_lib_asset_directories() {
        hash_dir(&mut hasher, "asset_dir", dir)?;
    }
    for obj in plan.stripped_libs() {
        hash_object(&mut hasher, "stripped_lib", obj)?;
    }
    for obj in plan.stripped_lib_assets() {
        hash_object(&mut hasher, "stripped_asset", obj)?;
    }

    Ok(format!("{:x}", hasher.finalize()))
}

fn hash_dir(hasher: &mut Sha256, kind: &str, dir: &Path) -> Result<()> {
    hasher.update(format!("{} {}\n", kind, dir.display()));
    if !dir.is_dir() {
        hasher.update("absent\n");
        return Ok(());
    }
    for entry in generate(dir, None)? {
        hasher.update(format!("  {}\n", entry));
    }
    for entry in WalkDir::new(dir).follow_links(false).sort_by_file_name() {
        let entry = entry.with_context(|| format!("Failed to walk {}", dir.display()))?;
        if !entry.path_is_symlink() {
            continue;
        }
        let target = fs::read_link(entry.path())
            .with_context(|| format!("Failed to read link {}", entry.path().display()))?;
        if let Some(path) = relative_unix_path(dir, entry.path()) {
            hasher.update(format!("  {} -> {}\n", path, target.display()));
        }
    }
    Ok(())
}

fn hash_object(hasher: &mut Sha256, kind: &str, obj: &StrippedObject) -> Result<()> {
    hasher.update(format!(
        "{} {} {} {}\n",
        kind,
        obj.name,
        obj.cpu,
        sha1_file(&obj.source)?
    ));
    Ok(())
}
