use crate::finding::{Finding, Severity};
use serde::{Deserialize, Serialize};

/// Schema-exact wire representation of `bundlecheck.report.v1`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportV1 {
    pub schema: String,
    pub tool: ToolInfo,
    pub run: ReportRunInfo,
    pub verdict: ReportVerdict,

    /// All findings: load phase, catalog, then bundle by bundle.
    #[serde(default)]
    pub findings: Vec<Finding>,

    #[serde(default)]
    pub bundles: Vec<BundleSummary>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub capabilities: Option<ReportCapabilities>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolInfo {
    pub name: String,
    pub version: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub commit: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportRunInfo {
    /// Deterministic id derived from the input digest.
    pub report_id: String,

    pub started_at: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ended_at: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration_ms: Option<u64>,

    pub root: String,

    /// sha256 over every loaded input path and content.
    pub input_digest: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportVerdict {
    pub status: ReportStatus,
    pub outcome: Outcome,
    pub counts: ReportCounts,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub reasons: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportStatus {
    Passed,
    Failed,
}

/// Failure class of a sealed report; drives exit codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    Passed,
    CheckFailed,
    LoadFailed,
}

impl Outcome {
    pub fn status(&self) -> ReportStatus {
        match self {
            Outcome::Passed => ReportStatus::Passed,
            Outcome::CheckFailed | Outcome::LoadFailed => ReportStatus::Failed,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportCounts {
    pub info: u64,
    pub warning: u64,
    pub error: u64,
}

impl ReportCounts {
    pub fn from_findings<'a>(findings: impl IntoIterator<Item = &'a Finding>) -> Self {
        let mut counts = Self::default();
        for f in findings {
            counts.add(f.severity);
        }
        counts
    }

    pub fn add(&mut self, severity: Severity) {
        match severity {
            Severity::Info => self.info += 1,
            Severity::Warning => self.warning += 1,
            Severity::Error => self.error += 1,
        }
    }

    pub fn total(&self) -> u64 {
        self.info + self.warning + self.error
    }
}

/// Per-bundle rollup.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BundleSummary {
    pub name: String,
    pub path: String,
    pub status: ReportStatus,
    pub counts: ReportCounts,
}

/// Which inputs were seen and which checks ran.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReportCapabilities {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub checks: Vec<String>,

    /// True if some inputs could not be processed.
    #[serde(default)]
    pub partial: bool,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub inputs_available: Vec<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub inputs_failed: Vec<InputFailure>,
}

/// Record of an input that failed to load.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputFailure {
    pub path: String,
    pub reason: String,
}
