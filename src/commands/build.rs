//! Build command - assembles the native library tree for a plan.

use anyhow::Result;
use std::path::Path;

use nativelibs::config::Config;
use nativelibs::pipeline;
use nativelibs::plan::load_plan;

/// Execute the build command and print the recorded artifacts.
pub fn cmd_build(plan_path: &Path, config: &Config) -> Result<()> {
    let plan = load_plan(plan_path, config)?;
    let layout = pipeline::run_with_config(&plan, config)?;

    println!("Built {}:", plan.build_unit());
    for artifact in layout.artifacts() {
        println!("  {}", artifact.display());
    }
    Ok(())
}
