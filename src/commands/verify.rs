//! Verify command - re-hashes a built tree and compares it with metadata.txt.

use anyhow::{bail, Result};
use std::path::Path;

use nativelibs::config::Config;
use nativelibs::manifest;
use nativelibs::pipeline::layout_for;
use nativelibs::plan::load_plan;

/// Verify the tree built for a plan. Fails if anything drifted.
pub fn cmd_verify(plan_path: &Path, config: &Config) -> Result<()> {
    let plan = load_plan(plan_path, config)?;
    let layout = layout_for(&plan, config);

    if !layout.metadata.exists() {
        bail!(
            "{} not found. Run 'nativelibs build --plan {}' first.",
            layout.metadata.display(),
            plan_path.display()
        );
    }

    println!("Verifying {}...\n", layout.root.display());
    let report = manifest::verify(&layout)?;
    report.print();

    if !report.is_clean() {
        bail!("native library tree does not match its manifest");
    }
    Ok(())
}
