//! Clean command - removes a plan's output tree.

use anyhow::Result;
use std::fs;
use std::path::Path;

use nativelibs::config::Config;
use nativelibs::pipeline::layout_for;
use nativelibs::plan::load_plan;

/// Remove the scratch directory a plan builds into.
pub fn cmd_clean(plan_path: &Path, config: &Config) -> Result<()> {
    let plan = load_plan(plan_path, config)?;
    let layout = layout_for(&plan, config);

    if layout.root.exists() {
        println!("Removing {}...", layout.root.display());
        fs::remove_dir_all(&layout.root)?;
        println!("Clean complete.");
    } else {
        println!("Nothing to clean.");
    }
    Ok(())
}
