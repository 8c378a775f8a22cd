//! Pipeline inputs: what goes into one native library tree.
//!
//! A plan is built fresh for every invocation, either directly through
//! [`NativeLibsPlan::new`] or from a JSON plan file written by whatever build
//! graph drives this tool:
//!
//! ```json
//! {
//!   "build_unit": "//apps/demo:app",
//!   "module": "dex",
//!   "cpu_filters": ["armv7", "arm64"],
//!   "native_lib_dirs": ["prebuilt/libs", "ndk/out"],
//!   "native_lib_asset_dirs": [],
//!   "stripped_libs": [
//!     { "source": "strip/libfoo.so", "name": "libfoo.so", "cpu": "arm64" }
//!   ],
//!   "stripped_lib_assets": []
//! }
//! ```

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::abi::CpuType;
use crate::config::Config;
use crate::error::NativeLibsError;
use crate::layout::{validate_module, BuildUnit};

/// One already-stripped native object, copied on its own after the bulk merge.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct StrippedObject {
    /// Location of the stripped object.
    pub source: PathBuf,
    /// File name at the destination (`<abi>/<name>`).
    pub name: String,
    pub cpu: CpuType,
    /// Owning logical module. Carried along, never consumed here.
    pub module: String,
}

impl StrippedObject {
    pub fn new(source: impl Into<PathBuf>, name: &str, cpu: CpuType, module: &str) -> Self {
        Self {
            source: source.into(),
            name: name.to_string(),
            cpu,
            module: module.to_string(),
        }
    }
}

/// The four native input categories. Order inside each list is priority:
/// earlier entries win when two sources provide the same path.
#[derive(Debug, Clone, Default)]
pub struct NativeInputs {
    pub lib_dirs: Vec<PathBuf>,
    pub asset_lib_dirs: Vec<PathBuf>,
    pub stripped_libs: Vec<StrippedObject>,
    pub stripped_lib_assets: Vec<StrippedObject>,
}

impl NativeInputs {
    fn is_empty(&self) -> bool {
        self.lib_dirs.is_empty()
            && self.asset_lib_dirs.is_empty()
            && self.stripped_libs.is_empty()
            && self.stripped_lib_assets.is_empty()
    }
}

/// Validated inputs for one pipeline invocation.
#[derive(Debug, Clone)]
pub struct NativeLibsPlan {
    build_unit: BuildUnit,
    module: String,
    cpu_filters: Vec<CpuType>,
    inputs: NativeInputs,
}

impl NativeLibsPlan {
    /// Fails with [`NativeLibsError::NoNativeInputs`] when every input category
    /// is empty, and with [`NativeLibsError::InvalidModule`] when `module`
    /// would not stay inside the scratch directory. Duplicates are dropped,
    /// keeping the first declaration.
    pub fn new(
        build_unit: BuildUnit,
        module: &str,
        cpu_filters: Vec<CpuType>,
        inputs: NativeInputs,
    ) -> Result<Self, NativeLibsError> {
        if inputs.is_empty() {
            return Err(NativeLibsError::NoNativeInputs);
        }
        validate_module(module)?;

        Ok(Self {
            build_unit,
            module: module.to_string(),
            cpu_filters: dedup_ordered(cpu_filters),
            inputs: NativeInputs {
                lib_dirs: dedup_ordered(inputs.lib_dirs),
                asset_lib_dirs: dedup_ordered(inputs.asset_lib_dirs),
                stripped_libs: dedup_ordered(inputs.stripped_libs),
                stripped_lib_assets: dedup_ordered(inputs.stripped_lib_assets),
            },
        })
    }

    pub fn build_unit(&self) -> &BuildUnit {
        &self.build_unit
    }

    pub fn module(&self) -> &str {
        &self.module
    }

    /// Empty means no filtering.
    pub fn cpu_filters(&self) -> &[CpuType] {
        &self.cpu_filters
    }

    pub fn native_lib_directories(&self) -> &[PathBuf] {
        &self.inputs.lib_dirs
    }

    pub fn native_lib_asset_directories(&self) -> &[PathBuf] {
        &self.inputs.asset_lib_dirs
    }

    pub fn stripped_libs(&self) -> &[StrippedObject] {
        &self.inputs.stripped_libs
    }

    pub fn stripped_lib_assets(&self) -> &[StrippedObject] {
        &self.inputs.stripped_lib_assets
    }

    /// Every stripped object, libs first, then asset libs.
    pub fn stripped_object_descriptions(&self) -> Vec<&StrippedObject> {
        self.inputs
            .stripped_libs
            .iter()
            .chain(self.inputs.stripped_lib_assets.iter())
            .collect()
    }
}

fn dedup_ordered<T: PartialEq>(items: Vec<T>) -> Vec<T> {
    let mut out: Vec<T> = Vec::with_capacity(items.len());
    for item in items {
        if !out.contains(&item) {
            out.push(item);
        }
    }
    out
}

/// On-disk form of a plan.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct PlanFile {
    build_unit: BuildUnit,
    module: String,
    cpu_filters: Option<Vec<CpuType>>,
    #[serde(default)]
    native_lib_dirs: Vec<PathBuf>,
    #[serde(default)]
    native_lib_asset_dirs: Vec<PathBuf>,
    #[serde(default)]
    stripped_libs: Vec<StrippedObjectEntry>,
    #[serde(default)]
    stripped_lib_assets: Vec<StrippedObjectEntry>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct StrippedObjectEntry {
    source: PathBuf,
    name: String,
    cpu: CpuType,
    /// Defaults to the plan's module.
    module: Option<String>,
}

/// Load a JSON plan file. Relative paths resolve against the file's directory;
/// a missing `cpu_filters` key falls back to `config.default_cpu_filters`.
pub fn load_plan(path: &Path, config: &Config) -> Result<NativeLibsPlan> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read plan {}", path.display()))?;
    let base = path.parent().unwrap_or_else(|| Path::new("."));
    parse_plan(&content, base, config)
        .with_context(|| format!("Invalid plan {}", path.display()))
}

/// Parse plan JSON, resolving relative paths against `base`.
pub fn parse_plan(content: &str, base: &Path, config: &Config) -> Result<NativeLibsPlan> {
    let file: PlanFile = serde_json::from_str(content)?;
    let resolve = |p: PathBuf| if p.is_absolute() { p } else { base.join(p) };

    let module = file.module;
    let stripped = |entries: Vec<StrippedObjectEntry>| -> Vec<StrippedObject> {
        entries
            .into_iter()
            .map(|e| StrippedObject {
                source: resolve(e.source),
                name: e.name,
                cpu: e.cpu,
                module: e.module.unwrap_or_else(|| module.clone()),
            })
            .collect()
    };

    let inputs = NativeInputs {
        lib_dirs: file.native_lib_dirs.into_iter().map(resolve).collect(),
        asset_lib_dirs: file.native_lib_asset_dirs.into_iter().map(resolve).collect(),
        stripped_libs: stripped(file.stripped_libs),
        stripped_lib_assets: stripped(file.stripped_lib_assets),
    };
    let cpu_filters = file
        .cpu_filters
        .unwrap_or_else(|| config.default_cpu_filters.clone());

    Ok(NativeLibsPlan::new(file.build_unit, &module, cpu_filters, inputs)?)
}
