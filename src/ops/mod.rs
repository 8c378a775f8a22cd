//! Declarative operations for assembling a native library tree.
//!
//! The pipeline is described as data first, then interpreted:
//!
//! ```text
//! Plan (INPUTS)              →   build_stages (DATA)          →   executor (LOGIC)
//! ─────────────────              ───────────────────              ────────────────
//! lib_dirs: [A, B]               AssembleLibs: [                  for op in ops {
//! cpu_filters: [arm64]             CopyAbiTree(B, libs, arm64),     execute_op(op)?;
//!                                  CopyAbiTree(A, libs, arm64),   }
//!                                  RenameDisguised(libs),
//!                                ]
//! ```
//!
//! Overwrite priority lives entirely in op order: sources are emitted in
//! reverse declaration order, so the earliest-declared source is applied last
//! and wins. Stripped objects come after every directory copy.

pub mod builder;
pub mod executor;

pub use builder::build_stages;
pub use executor::{execute_op, execute_stage};

use std::fmt;
use std::path::PathBuf;

/// Pipeline states, executed strictly in declaration order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    CleanRoot,
    CleanLibsDir,
    CleanAssetsDir,
    /// Directory merges into `libs/`, then disguise renames.
    AssembleLibs,
    /// Directory merges into `assetLibs/`, then disguise renames.
    AssembleAssets,
    CopyStrippedLibs,
    CopyStrippedAssets,
    GenerateManifest,
}

impl Stage {
    pub const ALL: [Stage; 8] = [
        Stage::CleanRoot,
        Stage::CleanLibsDir,
        Stage::CleanAssetsDir,
        Stage::AssembleLibs,
        Stage::AssembleAssets,
        Stage::CopyStrippedLibs,
        Stage::CopyStrippedAssets,
        Stage::GenerateManifest,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Stage::CleanRoot => "clean_root",
            Stage::CleanLibsDir => "clean_libs_dir",
            Stage::CleanAssetsDir => "clean_assets_dir",
            Stage::AssembleLibs => "assemble_libs",
            Stage::AssembleAssets => "assemble_assets",
            Stage::CopyStrippedLibs => "copy_stripped_libs",
            Stage::CopyStrippedAssets => "copy_stripped_assets",
            Stage::GenerateManifest => "generate_manifest",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A single filesystem operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Op {
    /// Remove `0` if present and recreate it empty.
    CleanDir(PathBuf),

    /// Merge every file under `source` into `dest` (contents only).
    CopyTree { source: PathBuf, dest: PathBuf },

    /// Merge `source/<abi>` into `dest/<abi>`. Skipped unless `source/<abi>` is a directory.
    CopyAbiTree {
        source: PathBuf,
        dest: PathBuf,
        abi: &'static str,
    },

    /// Copy one file to `dest_dir/name`, creating `dest_dir`.
    CopyStripped {
        source: PathBuf,
        dest_dir: PathBuf,
        name: String,
    },

    /// Rename `*-disguised-exe` files under the directory to `lib*.so`.
    RenameDisguised(PathBuf),

    /// Hash everything under `root` into `metadata`.
    WriteManifest { root: PathBuf, metadata: PathBuf },
}

impl fmt::Display for Op {
    /// Shell-like description, for logs and `show plan`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Op::CleanDir(dir) => write!(f, "rm -rf {0} && mkdir -p {0}", dir.display()),
            Op::CopyTree { source, dest } => {
                write!(f, "cp -R {}/. {}", source.display(), dest.display())
            }
            Op::CopyAbiTree { source, dest, abi } => {
                let src = source.join(abi);
                let dst = dest.join(abi);
                write!(
                    f,
                    "[ -d {0} ] && mkdir -p {1} && cp -R {0}/. {1}",
                    src.display(),
                    dst.display()
                )
            }
            Op::CopyStripped {
                source,
                dest_dir,
                name,
            } => write!(
                f,
                "mkdir -p {0} && cp {1} {0}/{2}",
                dest_dir.display(),
                source.display(),
                name
            ),
            Op::RenameDisguised(dir) => write!(f, "rename_native_executables {}", dir.display()),
            Op::WriteManifest { root, metadata } => {
                write!(f, "hash_native_libs {} > {}", root.display(), metadata.display())
            }
        }
    }
}
