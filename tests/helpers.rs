//! Shared test utilities for nativelibs tests.

#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

use nativelibs::{BuildUnit, Config, CpuType, NativeInputs, NativeLibsPlan, OutputLayout};

/// Test environment with temporary source and output directories.
pub struct TestEnv {
    /// Temporary directory (kept alive for lifetime of TestEnv)
    pub _temp_dir: TempDir,
    /// Where mock library source trees are created
    pub sources: PathBuf,
    /// Output directory (scratch dirs are created beneath it)
    pub out_dir: PathBuf,
}

impl TestEnv {
    /// Create a new test environment with temporary directories.
    pub fn new() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let sources = temp_dir.path().join("sources");
        let out_dir = temp_dir.path().join("out");
        fs::create_dir_all(&sources).expect("Failed to create sources dir");

        Self {
            _temp_dir: temp_dir,
            sources,
            out_dir,
        }
    }

    pub fn config(&self) -> Config {
        Config::for_testing(&self.out_dir)
    }

    /// Path of a source tree named `name` (not created).
    pub fn source(&self, name: &str) -> PathBuf {
        self.sources.join(name)
    }

    /// Write `content` to `<sources>/<rel>`, creating parents.
    pub fn write_source(&self, rel: &str, content: &str) -> PathBuf {
        let path = self.sources.join(rel);
        write_file(&path, content);
        path
    }

    pub fn plan(&self, cpu_filters: Vec<CpuType>, inputs: NativeInputs) -> NativeLibsPlan {
        NativeLibsPlan::new(unit(), "dex", cpu_filters, inputs).expect("valid plan")
    }

    pub fn layout(&self) -> OutputLayout {
        OutputLayout::new(&self.out_dir, &unit(), "dex")
    }
}

pub fn unit() -> BuildUnit {
    "//apps/demo:app".parse().expect("valid build unit")
}

pub fn write_file(path: &Path, content: &str) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).expect("Failed to create parent dir");
    }
    fs::write(path, content).expect("Failed to write file");
}

/// Assert that a file exists with exactly `expected` content.
pub fn assert_file_content(path: &Path, expected: &str) {
    let content =
        fs::read_to_string(path).unwrap_or_else(|e| panic!("Failed to read {}: {}", path.display(), e));
    assert_eq!(content, expected, "unexpected content in {}", path.display());
}

/// Every non-directory entry under `root`, relative and sorted.
pub fn list_files(root: &Path) -> Vec<String> {
    let mut files: Vec<String> = walkdir::WalkDir::new(root)
        .into_iter()
        .filter_map(Result::ok)
        .filter(|e| !e.file_type().is_dir())
        .map(|e| {
            e.path()
                .strip_prefix(root)
                .expect("under root")
                .to_string_lossy()
                .into_owned()
        })
        .collect();
    files.sort();
    files
}

/// Count directories under `root`, excluding `root` itself.
pub fn count_dirs(root: &Path) -> usize {
    walkdir::WalkDir::new(root)
        .min_depth(1)
        .into_iter()
        .filter_map(Result::ok)
        .filter(|e| e.file_type().is_dir())
        .count()
}
