//! Content hash manifest (`metadata.txt`) for the assembled tree.
//!
//! One line per regular file under the output root:
//!
//! ```text
//! libs/arm64-v8a/libfoo.so 2fd4e1c67a2d28fced849ee1bb76e7391b93eb12
//! assetLibs/x86/libbar.so de9f2c7fd25e1b3afad3e85a0bd17d9b100db4b3
//! ```
//!
//! An incremental installer diffs this against what is already on the device
//! and pushes only the changed files, so the manifest is always rebuilt in
//! full from the tree on disk.

use anyhow::{Context, Result};
use sha1::{Digest, Sha1};
use std::collections::BTreeMap;
use std::fmt;
use std::fs;
use std::io;
use std::path::Path;
use walkdir::WalkDir;

use crate::common::{relative_unix_path, write_lines};
use crate::error::NativeLibsError;
use crate::layout::OutputLayout;

/// One manifest line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManifestEntry {
    /// Path relative to the output root, `/`-separated.
    pub path: String,
    /// Lowercase hex SHA-1 of the file content.
    pub sha1: String,
}

impl fmt::Display for ManifestEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.path, self.sha1)
    }
}

/// SHA-1 of a file's content as 40 lowercase hex characters.
pub fn sha1_file(path: &Path) -> Result<String> {
    let mut file =
        fs::File::open(path).with_context(|| format!("Failed to open {}", path.display()))?;
    let mut hasher = Sha1::new();
    io::copy(&mut file, &mut hasher)
        .with_context(|| format!("Failed to read {} for hashing", path.display()))?;
    Ok(format!("{:x}", hasher.finalize()))
}

/// Hash every regular file under `root`, in walk order.
///
/// Directory entries are visited in file-name order so the same tree always
/// yields the same sequence. Symlinks are not followed and not listed.
/// `exclude` (typically the manifest itself) is skipped.
pub fn generate(root: &Path, exclude: Option<&Path>) -> Result<Vec<ManifestEntry>> {
    let mut entries = Vec::new();

    for entry in WalkDir::new(root).follow_links(false).sort_by_file_name() {
        let entry = entry.with_context(|| format!("Failed to walk {}", root.display()))?;
        if !entry.file_type().is_file() {
            continue;
        }
        if exclude.is_some_and(|ex| entry.path() == ex) {
            continue;
        }
        let Some(path) = relative_unix_path(root, entry.path()) else {
            continue;
        };
        entries.push(ManifestEntry {
            sha1: sha1_file(entry.path())?,
            path,
        });
    }

    Ok(entries)
}

/// Hash the whole output root and write `metadata.txt`.
pub fn write_manifest(root: &Path, metadata: &Path) -> Result<Vec<ManifestEntry>> {
    let entries = generate(root, Some(metadata))?;
    write_lines(metadata, entries.iter().map(ToString::to_string))
        .with_context(|| format!("Failed to write manifest {}", metadata.display()))?;
    Ok(entries)
}

/// Parse manifest text back into entries. Blank lines are ignored.
pub fn parse(text: &str) -> Result<Vec<ManifestEntry>, NativeLibsError> {
    let mut entries = Vec::new();
    for (idx, line) in text.lines().enumerate() {
        if line.is_empty() {
            continue;
        }
        let malformed = || NativeLibsError::ManifestParse {
            line: idx + 1,
            text: line.to_string(),
        };
        // Paths may contain spaces; the hash never does.
        let (path, sha1) = line.rsplit_once(' ').ok_or_else(malformed)?;
        if path.is_empty() || !is_sha1_hex(sha1) {
            return Err(malformed());
        }
        entries.push(ManifestEntry {
            path: path.to_string(),
            sha1: sha1.to_string(),
        });
    }
    Ok(entries)
}

fn is_sha1_hex(s: &str) -> bool {
    s.len() == 40 && s.bytes().all(|b| matches!(b, b'0'..=b'9' | b'a'..=b'f'))
}

/// A difference between `metadata.txt` and the tree on disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Discrepancy {
    /// Listed in the manifest, absent from the tree.
    Missing(String),
    /// Present in both with different content.
    Changed {
        path: String,
        expected: String,
        actual: String,
    },
    /// Present in the tree, absent from the manifest.
    Unlisted(String),
}

impl fmt::Display for Discrepancy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Discrepancy::Missing(path) => write!(f, "missing: {}", path),
            Discrepancy::Changed {
                path,
                expected,
                actual,
            } => write!(f, "changed: {} (manifest {}, disk {})", path, expected, actual),
            Discrepancy::Unlisted(path) => write!(f, "unlisted: {}", path),
        }
    }
}

/// Result of checking a manifest against its tree.
#[derive(Debug, Clone, Default)]
pub struct VerifyReport {
    pub checked: usize,
    pub discrepancies: Vec<Discrepancy>,
}

impl VerifyReport {
    pub fn is_clean(&self) -> bool {
        self.discrepancies.is_empty()
    }

    /// Print the report to stdout.
    pub fn print(&self) {
        for d in &self.discrepancies {
            println!("  ✗ {}", d);
        }
        if self.is_clean() {
            println!("✓ {} files match metadata.txt", self.checked);
        } else {
            println!(
                "✗ {} of {} manifest entries disagree with the tree",
                self.discrepancies.len(),
                self.checked
            );
        }
    }
}

/// Re-hash the tree under `layout.root` and compare it with `metadata.txt`.
pub fn verify(layout: &OutputLayout) -> Result<VerifyReport> {
    let text = fs::read_to_string(&layout.metadata)
        .with_context(|| format!("Failed to read {}", layout.metadata.display()))?;
    let recorded = parse(&text)?;
    let actual: BTreeMap<String, String> = generate(&layout.root, Some(&layout.metadata))?
        .into_iter()
        .map(|e| (e.path, e.sha1))
        .collect();

    let mut report = VerifyReport {
        checked: recorded.len(),
        discrepancies: Vec::new(),
    };
    for entry in &recorded {
        match actual.get(&entry.path) {
            None => report
                .discrepancies
                .push(Discrepancy::Missing(entry.path.clone())),
            Some(sha1) if *sha1 != entry.sha1 => report.discrepancies.push(Discrepancy::Changed {
                path: entry.path.clone(),
                expected: entry.sha1.clone(),
                actual: sha1.clone(),
            }),
            Some(_) => {}
        }
    }
    for path in actual.keys() {
        if !recorded.iter().any(|e| &e.path == path) {
            report.discrepancies.push(Discrepancy::Unlisted(path.clone()));
        }
    }

    Ok(report)
}
