//! Target CPU types and the ABI directories their libraries live in.
//!
//! Native libraries are laid out per ABI (`armeabi-v7a/libfoo.so`,
//! `x86_64/libfoo.so`, ...). The CPU filter names a `CpuType`; the assembler
//! needs the directory component.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::NativeLibsError;

pub const ABI_ARMEABI: &str = "armeabi";
pub const ABI_ARMEABI_V7A: &str = "armeabi-v7a";
pub const ABI_ARM64_V8A: &str = "arm64-v8a";
pub const ABI_X86: &str = "x86";
pub const ABI_X86_64: &str = "x86_64";
pub const ABI_MIPS: &str = "mips";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum CpuType {
    Arm,
    Armv7,
    Arm64,
    X86,
    X86_64,
    Mips,
    /// Known to the toolchain but never packaged; has no ABI directory.
    Mips64,
}

impl CpuType {
    pub const ALL: [CpuType; 7] = [
        CpuType::Arm,
        CpuType::Armv7,
        CpuType::Arm64,
        CpuType::X86,
        CpuType::X86_64,
        CpuType::Mips,
        CpuType::Mips64,
    ];

    /// ABI subdirectory holding libraries for this CPU type, if it has one.
    pub fn abi_directory(self) -> Option<&'static str> {
        match self {
            CpuType::Arm => Some(ABI_ARMEABI),
            CpuType::Armv7 => Some(ABI_ARMEABI_V7A),
            CpuType::Arm64 => Some(ABI_ARM64_V8A),
            CpuType::X86 => Some(ABI_X86),
            CpuType::X86_64 => Some(ABI_X86_64),
            CpuType::Mips => Some(ABI_MIPS),
            CpuType::Mips64 => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            CpuType::Arm => "arm",
            CpuType::Armv7 => "armv7",
            CpuType::Arm64 => "arm64",
            CpuType::X86 => "x86",
            CpuType::X86_64 => "x86_64",
            CpuType::Mips => "mips",
            CpuType::Mips64 => "mips64",
        }
    }
}

/// Resolve the ABI directory where a mapping is mandatory (filters, descriptors).
pub fn require_abi_directory(cpu: CpuType) -> Result<&'static str, NativeLibsError> {
    cpu.abi_directory()
        .ok_or(NativeLibsError::UnmappedCpuType(cpu))
}

impl fmt::Display for CpuType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CpuType {
    type Err = NativeLibsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "arm" | "armeabi" => Ok(CpuType::Arm),
            "armv7" | "armeabi-v7a" => Ok(CpuType::Armv7),
            "arm64" | "arm64-v8a" | "aarch64" => Ok(CpuType::Arm64),
            "x86" | "i686" => Ok(CpuType::X86),
            "x86_64" | "amd64" => Ok(CpuType::X86_64),
            "mips" => Ok(CpuType::Mips),
            "mips64" => Ok(CpuType::Mips64),
            _ => Err(NativeLibsError::UnknownCpuType(s.to_string())),
        }
    }
}

impl TryFrom<String> for CpuType {
    type Error = NativeLibsError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<CpuType> for String {
    fn from(cpu: CpuType) -> Self {
        cpu.as_str().to_string()
    }
}

/// Parse a comma-separated CPU list, e.g. `arm64, x86`. Empty items are ignored.
pub fn parse_cpu_list(list: &str) -> Result<Vec<CpuType>, NativeLibsError> {
    list.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(CpuType::from_str)
        .collect()
}
