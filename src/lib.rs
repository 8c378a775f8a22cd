//! nativelibs - assembles native shared-object trees for packaging.
//!
//! Merges prioritized per-ABI library directories and individually stripped
//! objects into `libs/` and `assetLibs/`, renames disguised executables, and
//! writes a SHA-1 manifest (`metadata.txt`) for incremental installers.
//!
//! See `pipeline::run` for the entry point.

pub mod abi;
pub mod common;
pub mod config;
pub mod disguise;
pub mod error;
pub mod fingerprint;
pub mod layout;
pub mod manifest;
pub mod ops;
pub mod pipeline;
pub mod plan;
pub mod timing;

pub use abi::CpuType;
pub use config::Config;
pub use error::NativeLibsError;
pub use layout::{BuildUnit, OutputLayout};
pub use plan::{NativeInputs, NativeLibsPlan, StrippedObject};
