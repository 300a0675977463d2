//! Clap-free settings for the validate pipeline.

use bundlecheck_domain::CheckPolicy;
use bundlecheck_loader::LayoutConfig;
use camino::Utf8PathBuf;
use std::time::Duration;

/// Run mode controls exit-code semantics.
///
/// In `ReportOnly` mode, failed verdicts (exit 2 and 3) are mapped to exit 0
/// because the report still encodes the verdict.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum RunMode {
    #[default]
    Standalone,
    ReportOnly,
}

/// Settings for the validate pipeline.
#[derive(Debug, Clone)]
pub struct ValidateSettings {
    pub root: Utf8PathBuf,
    pub out_dir: Utf8PathBuf,

    // Inputs
    pub layout: LayoutConfig,

    // Policy
    pub policy: CheckPolicy,

    // Resources
    pub load_timeout: Option<Duration>,
    pub parallel: bool,

    // Mode
    pub mode: RunMode,
}

impl Default for ValidateSettings {
    fn default() -> Self {
        Self {
            root: Utf8PathBuf::from("."),
            out_dir: Utf8PathBuf::from("artifacts/bundlecheck"),
            layout: LayoutConfig::default(),
            policy: CheckPolicy::default(),
            load_timeout: Some(Duration::from_secs(30)),
            parallel: true,
            mode: RunMode::default(),
        }
    }
}
