//! CLI command handlers.
//!
//! Each submodule handles a specific CLI command:
//! - `build` - Assemble the native library tree and manifest
//! - `verify` - Check a built tree against its manifest
//! - `clean` - Remove a plan's output tree
//! - `show` - Display configuration or a plan
//! - `link` - Force-create a symlink

pub mod build;
pub mod clean;
pub mod link;
pub mod show;
pub mod verify;

pub use build::cmd_build;
pub use clean::cmd_clean;
pub use link::cmd_link;
pub use show::cmd_show;
pub use verify::cmd_verify;
