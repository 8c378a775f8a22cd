//! Typed failures raised by the native library pipeline.
//!
//! Everything else (copy, rename, walk, hash and write failures) travels as
//! the underlying `std::io::Error` wrapped in `anyhow` context, so callers can
//! still `downcast_ref` to either this enum or the I/O error.

use thiserror::Error;

use crate::abi::CpuType;

#[derive(Debug, Error)]
pub enum NativeLibsError {
    /// Build definition declares no libraries at all.
    #[error("There should be at least one native library to copy.")]
    NoNativeInputs,

    /// A filter or descriptor reached the assembler with a CPU type that has
    /// no ABI directory. Callers are expected to filter these out upstream.
    #[error("CPU type '{0}' has no ABI directory mapping")]
    UnmappedCpuType(CpuType),

    #[error("unknown CPU type '{0}'")]
    UnknownCpuType(String),

    #[error("invalid build unit '{0}': expected '//base/path:name'")]
    InvalidBuildUnit(String),

    /// Module names become part of a directory name, so they cannot carry
    /// path separators or dot segments.
    #[error("invalid module name '{0}'")]
    InvalidModule(String),

    #[error("malformed manifest line {line}: '{text}'")]
    ManifestParse { line: usize, text: String },
}

impl NativeLibsError {
    /// True for the build-definition problems an invoker should report to the user.
    pub fn is_configuration_error(&self) -> bool {
        matches!(
            self,
            Self::NoNativeInputs
                | Self::UnknownCpuType(_)
                | Self::InvalidBuildUnit(_)
                | Self::InvalidModule(_)
        )
    }
}
