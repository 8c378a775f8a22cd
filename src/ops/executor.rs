//! Op executor - the one place where pipeline operations touch the filesystem.

use anyhow::{Context, Result};
use tracing::debug;

use super::{Op, Stage};
use crate::common::{copy_dir_contents, copy_file, ensure_dir_exists, make_clean_dir};
use crate::disguise::rename_disguised;
use crate::manifest::write_manifest;

/// Execute every op of a stage, in order. The first failure aborts the stage.
pub fn execute_stage(stage: Stage, ops: &[Op]) -> Result<()> {
    for op in ops {
        execute_op(op).with_context(|| format!("in stage '{}': {}", stage, op))?;
    }
    Ok(())
}

/// Execute a single operation.
pub fn execute_op(op: &Op) -> Result<()> {
    debug!("{}", op);

    match op {
        Op::CleanDir(dir) => {
            make_clean_dir(dir)?;
        }

        Op::CopyTree { source, dest } => {
            let copied = copy_dir_contents(source, dest)?;
            debug!(copied, source = %source.display(), "merged library directory");
        }

        Op::CopyAbiTree { source, dest, abi } => {
            let abi_source = source.join(abi);
            // Libraries may support only some of the requested ABIs.
            if !abi_source.is_dir() {
                debug!(abi, source = %source.display(), "ABI not provided, skipping");
                return Ok(());
            }
            let abi_dest = dest.join(abi);
            ensure_dir_exists(&abi_dest)?;
            let copied = copy_dir_contents(&abi_source, &abi_dest)?;
            debug!(copied, abi, source = %source.display(), "merged ABI directory");
        }

        Op::CopyStripped {
            source,
            dest_dir,
            name,
        } => {
            ensure_dir_exists(dest_dir)?;
            copy_file(source, &dest_dir.join(name))?;
        }

        Op::RenameDisguised(dir) => {
            for (from, to) in rename_disguised(dir)? {
                debug!(from = %from.display(), to = %to.display(), "renamed disguised executable");
            }
        }

        Op::WriteManifest { root, metadata } => {
            let entries = write_manifest(root, metadata)?;
            debug!(files = entries.len(), "wrote {}", metadata.display());
        }
    }

    Ok(())
}
