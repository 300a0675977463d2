//! Configuration file loading for bundlecheck.
//!
//! Discovers and loads `bundlecheck.toml` from the layout root.
//! Merges config file settings with CLI arguments (CLI takes precedence).

use anyhow::Context;
use bundlecheck_loader::LayoutConfig;
use bundlecheck_types::finding::Severity;
use camino::{Utf8Path, Utf8PathBuf};
use fs_err as fs;
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;

/// The config file name to search for.
pub const CONFIG_FILE_NAME: &str = "bundlecheck.toml";

/// Default load-phase timeout in seconds.
pub const DEFAULT_LOAD_TIMEOUT_SECS: u64 = 30;

/// Top-level configuration from bundlecheck.toml.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct BundlecheckConfig {
    /// Where bundles, definitions and emission sources live.
    pub layout: LayoutConfig,

    /// Severity knobs.
    pub policy: PolicyConfig,

    /// Resource limits and execution settings.
    pub run: RunConfig,
}

/// Policy section of the config.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct PolicyConfig {
    /// Severity of `SCHEMA_SHAPE_MISMATCH` findings (`warning` or `error`).
    pub shape_mismatch: Option<Severity>,
}

/// Run section of the config.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RunConfig {
    /// Load-phase timeout in seconds. `0` disables the limit.
    pub load_timeout_secs: Option<u64>,

    /// Check bundles on a thread pool.
    pub parallel: Option<bool>,

    /// Always exit 0 once a report has been written.
    pub report_only: bool,
}

/// Discover the bundlecheck.toml config file.
///
/// Returns `None` if no config file is found.
pub fn discover_config(root: &Utf8Path) -> Option<Utf8PathBuf> {
    let config_path = root.join(CONFIG_FILE_NAME);
    if config_path.exists() {
        debug!("found config file at {}", config_path);
        Some(config_path)
    } else {
        debug!("no config file found at {}", config_path);
        None
    }
}

/// Load and parse a bundlecheck.toml config file.
pub fn load_config(path: &Utf8Path) -> anyhow::Result<BundlecheckConfig> {
    let contents =
        fs::read_to_string(path).with_context(|| format!("read config file {}", path))?;
    parse_config(&contents).with_context(|| format!("parse config file {}", path))
}

/// Parse a config file from a string.
pub fn parse_config(contents: &str) -> anyhow::Result<BundlecheckConfig> {
    let config: BundlecheckConfig = toml::from_str(contents).context("invalid TOML")?;
    Ok(config)
}

/// Load config from the layout root, or return default if not found.
pub fn load_or_default(root: &Utf8Path) -> anyhow::Result<BundlecheckConfig> {
    match discover_config(root) {
        Some(path) => load_config(&path),
        None => Ok(BundlecheckConfig::default()),
    }
}

/// Validate-command flags that can override the config file.
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    pub shape_mismatch: Option<Severity>,
    pub load_timeout_secs: Option<u64>,
    pub no_parallel: bool,
    pub report_only: bool,
}

/// Merged configuration combining config file and CLI arguments.
#[derive(Debug, Clone)]
pub struct MergedConfig {
    pub layout: LayoutConfig,
    pub shape_mismatch: Severity,
    pub load_timeout: Option<Duration>,
    pub parallel: bool,
    pub report_only: bool,
}

/// Builder for merging config file with CLI arguments.
pub struct ConfigMerger {
    config: BundlecheckConfig,
}

impl ConfigMerger {
    pub fn new(config: BundlecheckConfig) -> Self {
        Self { config }
    }

    /// Merge with validate command CLI arguments.
    ///
    /// Values given on the command line replace the config file's. Boolean flags can only
    /// switch a setting on (`--no-parallel`, `--report-only`).
    pub fn merge_validate_args(self, cli: &CliOverrides) -> MergedConfig {
        let shape_mismatch = cli
            .shape_mismatch
            .or(self.config.policy.shape_mismatch)
            .unwrap_or(Severity::Warning);

        let secs = cli
            .load_timeout_secs
            .or(self.config.run.load_timeout_secs)
            .unwrap_or(DEFAULT_LOAD_TIMEOUT_SECS);
        let load_timeout = (secs > 0).then(|| Duration::from_secs(secs));

        let parallel = !cli.no_parallel && self.config.run.parallel.unwrap_or(true);

        MergedConfig {
            layout: self.config.layout,
            shape_mismatch,
            load_timeout,
            parallel,
            report_only: cli.report_only || self.config.run.report_only,
        }
    }
}
