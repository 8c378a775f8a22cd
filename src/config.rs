//! Configuration management for nativelibs.
//!
//! Reads configuration from a .env file and environment variables.
//! Environment variables take precedence over the .env file.

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

use crate::abi::{parse_cpu_list, CpuType};

/// Default output directory, relative to the base directory.
pub const DEFAULT_OUT_DIR: &str = "build-out";

/// Environment variable overriding the output directory.
pub const ENV_OUT_DIR: &str = "NATIVELIBS_OUT_DIR";

/// Environment variable with the CPU filter used when a plan declares none.
pub const ENV_CPU_FILTERS: &str = "NATIVELIBS_CPU_FILTERS";

/// nativelibs configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Root under which per-unit scratch directories are created
    pub out_dir: PathBuf,
    /// CPU filter applied to plans that omit `cpu_filters` (empty = copy every ABI)
    pub default_cpu_filters: Vec<CpuType>,
}

impl Config {
    /// Load configuration from `<base_dir>/.env` and the environment.
    ///
    /// Values already present in the process environment are never
    /// overwritten by the .env file.
    pub fn load(base_dir: &Path) -> Result<Self> {
        let env_path = base_dir.join(".env");
        if env_path.exists() {
            dotenvy::from_path(&env_path)
                .with_context(|| format!("Failed to read {}", env_path.display()))?;
        }

        let out_dir = std::env::var(ENV_OUT_DIR)
            .ok()
            .filter(|s| !s.trim().is_empty())
            .map(|s| {
                let path = PathBuf::from(s.trim());
                if path.is_absolute() {
                    path
                } else {
                    base_dir.join(path)
                }
            })
            .unwrap_or_else(|| base_dir.join(DEFAULT_OUT_DIR));

        let default_cpu_filters = match std::env::var(ENV_CPU_FILTERS) {
            Ok(list) => parse_cpu_list(&list)
                .with_context(|| format!("Invalid {}", ENV_CPU_FILTERS))?,
            Err(_) => Vec::new(),
        };

        Ok(Self {
            out_dir,
            default_cpu_filters,
        })
    }

    /// Configuration with fixed values, ignoring the environment.
    #[doc(hidden)]
    pub fn for_testing(out_dir: &Path) -> Self {
        Self {
            out_dir: out_dir.to_path_buf(),
            default_cpu_filters: Vec::new(),
        }
    }

    /// Print configuration for debugging.
    pub fn print(&self) {
        println!("Configuration:");
        println!("  {}: {}", ENV_OUT_DIR, self.out_dir.display());
        if self.default_cpu_filters.is_empty() {
            println!("  {}: (none, all ABIs copied)", ENV_CPU_FILTERS);
        } else {
            let names: Vec<&str> = self.default_cpu_filters.iter().map(|c| c.as_str()).collect();
            println!("  {}: {}", ENV_CPU_FILTERS, names.join(","));
        }
    }
}
