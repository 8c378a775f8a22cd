//! Show command - displays information.

use anyhow::Result;
use std::path::Path;

use nativelibs::config::Config;
use nativelibs::fingerprint::input_key;
use nativelibs::ops::build_stages;
use nativelibs::pipeline::layout_for;
use nativelibs::plan::load_plan;

/// Show target for the show command.
pub enum ShowTarget<'a> {
    /// Show configuration
    Config,
    /// Show the stages and operations a plan would run
    Plan(&'a Path),
}

/// Execute the show command.
pub fn cmd_show(target: ShowTarget<'_>, config: &Config) -> Result<()> {
    match target {
        ShowTarget::Config => config.print(),
        ShowTarget::Plan(plan_path) => {
            let plan = load_plan(plan_path, config)?;
            let layout = layout_for(&plan, config);

            println!("Build unit: {}", plan.build_unit());
            println!("Module:     {}", plan.module());
            println!("Output:     {}", layout.root.display());
            println!("Input key:  {}", input_key(&plan)?);
            println!();

            for (stage, ops) in build_stages(&plan, &layout)? {
                println!("{}:", stage);
                if ops.is_empty() {
                    println!("  (nothing to do)");
                }
                for op in &ops {
                    println!("  {}", op);
                }
            }
        }
    }
    Ok(())
}
