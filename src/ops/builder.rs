//! Turns a plan into the ordered list of stages and their operations.
//!
//! Building the stages touches no files, so every CPU type that will be used
//! is resolved to its ABI directory before the first directory is cleaned.

use std::path::{Path, PathBuf};

use super::{Op, Stage};
use crate::abi::{require_abi_directory, CpuType};
use crate::error::NativeLibsError;
use crate::layout::OutputLayout;
use crate::plan::{NativeLibsPlan, StrippedObject};

/// Every stage of the pipeline with its operations, in execution order.
pub fn build_stages(
    plan: &NativeLibsPlan,
    layout: &OutputLayout,
) -> Result<Vec<(Stage, Vec<Op>)>, NativeLibsError> {
    let filters = plan.cpu_filters();

    Ok(vec![
        (Stage::CleanRoot, vec![Op::CleanDir(layout.root.clone())]),
        (Stage::CleanLibsDir, vec![Op::CleanDir(layout.libs.clone())]),
        (
            Stage::CleanAssetsDir,
            vec![Op::CleanDir(layout.asset_libs.clone())],
        ),
        (
            Stage::AssembleLibs,
            copy_native_libraries(plan.native_lib_directories(), &layout.libs, filters)?,
        ),
        (
            Stage::AssembleAssets,
            copy_native_libraries(
                plan.native_lib_asset_directories(),
                &layout.asset_libs,
                filters,
            )?,
        ),
        (
            Stage::CopyStrippedLibs,
            copy_stripped_objects(plan.stripped_libs(), &layout.libs)?,
        ),
        (
            Stage::CopyStrippedAssets,
            copy_stripped_objects(plan.stripped_lib_assets(), &layout.asset_libs)?,
        ),
        (
            Stage::GenerateManifest,
            vec![Op::WriteManifest {
                root: layout.root.clone(),
                metadata: layout.metadata.clone(),
            }],
        ),
    ])
}

/// Merge ops for one destination.
///
/// Sources are visited last-declared first so that earlier declarations
/// overwrite later ones. Each source's copies are followed by a disguise
/// rename, which keeps that priority for renamed files too.
pub fn copy_native_libraries(
    source_dirs: &[PathBuf],
    dest: &Path,
    cpu_filters: &[CpuType],
) -> Result<Vec<Op>, NativeLibsError> {
    // Filters only matter once there is a directory to filter.
    if source_dirs.is_empty() {
        return Ok(Vec::new());
    }
    let abis = cpu_filters
        .iter()
        .map(|cpu| require_abi_directory(*cpu))
        .collect::<Result<Vec<_>, _>>()?;

    let mut ops = Vec::new();
    for source in source_dirs.iter().rev() {
        if abis.is_empty() {
            ops.push(Op::CopyTree {
                source: source.clone(),
                dest: dest.to_path_buf(),
            });
        } else {
            for &abi in &abis {
                ops.push(Op::CopyAbiTree {
                    source: source.clone(),
                    dest: dest.to_path_buf(),
                    abi,
                });
            }
        }
        ops.push(Op::RenameDisguised(dest.to_path_buf()));
    }
    Ok(ops)
}

/// One copy per stripped object into `dest/<abi>/<name>`.
pub fn copy_stripped_objects(
    objects: &[StrippedObject],
    dest: &Path,
) -> Result<Vec<Op>, NativeLibsError> {
    objects
        .iter()
        .map(|obj| {
            let abi = require_abi_directory(obj.cpu)?;
            Ok(Op::CopyStripped {
                source: obj.source.clone(),
                dest_dir: dest.join(abi),
                name: obj.name.clone(),
            })
        })
        .collect()
}
