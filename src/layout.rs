//! Build unit identity and the scratch directory layout derived from it.
//!
//! ```text
//! <out>/bin/<base/path>/__native_<module>_<name>__/
//!     libs/          runtime-loaded libraries, one dir per ABI
//!     assetLibs/     asset-packaged libraries, same shape
//!     metadata.txt   "<relative/path> <sha1>" per file
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use crate::error::NativeLibsError;

pub const LIBS_DIR: &str = "libs";
pub const ASSET_LIBS_DIR: &str = "assetLibs";
pub const METADATA_TXT: &str = "metadata.txt";

/// The build unit that owns one pipeline invocation, e.g. `//apps/demo:app`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct BuildUnit {
    base_path: String,
    name: String,
}

impl BuildUnit {
    pub fn base_path(&self) -> &str {
        &self.base_path
    }

    /// Short name; doubles as the scratch token in the output directory name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Scratch directory for `module`, relative to the output dir.
    pub fn scratch_path(&self, module: &str) -> PathBuf {
        let mut path = PathBuf::from("bin");
        for part in self.base_path.split('/').filter(|p| !p.is_empty()) {
            path.push(part);
        }
        path.push(format!("__native_{}_{}__", module, self.name));
        path
    }
}

impl FromStr for BuildUnit {
    type Err = NativeLibsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || NativeLibsError::InvalidBuildUnit(s.to_string());
        let trimmed = s.trim().trim_start_matches("//");
        let (base_path, name) = trimmed.split_once(':').ok_or_else(invalid)?;
        let base_path = base_path.trim_end_matches('/');

        if name.is_empty()
            || name.contains('/')
            || bad_segment(name)
            || base_path.split('/').any(bad_segment)
        {
            return Err(invalid());
        }

        Ok(Self {
            base_path: base_path.to_string(),
            name: name.to_string(),
        })
    }
}

fn bad_segment(seg: &str) -> bool {
    seg == "." || seg == ".." || seg.contains('\\')
}

/// Check that `module` can sit inside `__native_<module>_<name>__` without
/// leaving the scratch directory.
pub fn validate_module(module: &str) -> Result<(), NativeLibsError> {
    if module.is_empty() || module.contains('/') || bad_segment(module) {
        return Err(NativeLibsError::InvalidModule(module.to_string()));
    }
    Ok(())
}

impl TryFrom<String> for BuildUnit {
    type Error = NativeLibsError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<BuildUnit> for String {
    fn from(unit: BuildUnit) -> Self {
        unit.to_string()
    }
}

impl fmt::Display for BuildUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "//{}:{}", self.base_path, self.name)
    }
}

/// Paths of one invocation's output tree. Also the artifact list handed back
/// to the invoker once the pipeline finishes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputLayout {
    pub root: PathBuf,
    pub libs: PathBuf,
    pub asset_libs: PathBuf,
    pub metadata: PathBuf,
}

impl OutputLayout {
    pub fn new(out_dir: &Path, unit: &BuildUnit, module: &str) -> Self {
        Self::at_root(out_dir.join(unit.scratch_path(module)))
    }

    /// Layout rooted at an explicit directory.
    pub fn at_root(root: PathBuf) -> Self {
        Self {
            libs: root.join(LIBS_DIR),
            asset_libs: root.join(ASSET_LIBS_DIR),
            metadata: root.join(METADATA_TXT),
            root,
        }
    }

    /// The three paths a build records as its outputs.
    pub fn artifacts(&self) -> [&Path; 3] {
        [&self.libs, &self.asset_libs, &self.metadata]
    }
}
