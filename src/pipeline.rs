//! Orchestration: clean, assemble, copy stripped objects, hash.
//!
//! ```text
//! CLEAN_ROOT → CLEAN_LIBS_DIR → CLEAN_ASSETS_DIR → ASSEMBLE_LIBS → ASSEMBLE_ASSETS
//!   → COPY_STRIPPED_LIBS → COPY_STRIPPED_ASSETS → GENERATE_MANIFEST
//! ```
//!
//! Every stage completes before the next starts. A failure aborts the run and
//! leaves the tree as it was at that point; the next run's clean stages are
//! the only recovery.

use anyhow::Result;
use tracing::info;

use crate::config::Config;
use crate::layout::OutputLayout;
use crate::ops::{build_stages, execute_stage};
use crate::plan::NativeLibsPlan;
use crate::timing::Timer;

/// Output layout for `plan` under the configured output directory.
pub fn layout_for(plan: &NativeLibsPlan, config: &Config) -> OutputLayout {
    OutputLayout::new(&config.out_dir, plan.build_unit(), plan.module())
}

/// Assemble `plan` into `layout` and return the layout as the recorded artifacts.
///
/// Every CPU type the stages need is resolved before anything on disk changes.
pub fn run(plan: &NativeLibsPlan, layout: &OutputLayout) -> Result<OutputLayout> {
    let stages = build_stages(plan, layout)?;

    info!(
        unit = %plan.build_unit(),
        module = plan.module(),
        root = %layout.root.display(),
        "assembling native libraries"
    );
    let total = Timer::start("total");

    for (stage, ops) in &stages {
        let timer = Timer::start(stage.name());
        execute_stage(*stage, ops)?;
        timer.finish();
    }

    total.finish();
    Ok(layout.clone())
}

/// [`run`] with the layout derived from `config`.
pub fn run_with_config(plan: &NativeLibsPlan, config: &Config) -> Result<OutputLayout> {
    run(plan, &layout_for(plan, config))
}
