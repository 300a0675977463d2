use crate::ValidationReport;
use bundlecheck_types::finding::Finding;
use bundlecheck_types::report::{
    BundleSummary, InputFailure, ReportCapabilities, ReportCounts, ReportStatus, ToolInfo,
};
use chrono::{DateTime, Utc};

/// Facts about the run that every phase carries along.
#[derive(Debug, Clone)]
pub struct RunMeta {
    pub tool: ToolInfo,
    pub root: String,
    pub input_digest: String,
    pub started_at: DateTime<Utc>,
}

/// Findings for one bundle, as produced by the checks.
#[derive(Debug, Clone)]
pub struct BundleResult {
    pub name: String,
    pub path: String,
    pub findings: Vec<Finding>,
}

#[derive(Debug, Default)]
pub struct Loading {
    findings: Vec<Finding>,
    capabilities: ReportCapabilities,
}

#[derive(Debug)]
pub struct Checking {
    findings: Vec<Finding>,
    capabilities: ReportCapabilities,
    bundles: Vec<BundleSummary>,
}

/// Report under construction. The type parameter is the current phase.
#[derive(Debug)]
pub struct ReportBuilder<S> {
    meta: RunMeta,
    state: S,
}

impl ReportBuilder<Loading> {
    pub(crate) fn new(meta: RunMeta) -> Self {
        Self {
            meta,
            state: Loading::default(),
        }
    }

    pub fn input_loaded(&mut self, path: impl Into<String>) {
        self.state.capabilities.inputs_available.push(path.into());
    }

    pub fn input_failed(&mut self, path: impl Into<String>, reason: impl Into<String>) {
        self.state.capabilities.partial = true;
        self.state.capabilities.inputs_failed.push(InputFailure {
            path: path.into(),
            reason: reason.into(),
        });
    }

    pub fn load_findings(&mut self, findings: impl IntoIterator<Item = Finding>) {
        self.state.findings.extend(findings);
    }

    /// Seals the report with only the run-ending load error.
    pub fn abort(self, error: Finding, ended_at: DateTime<Utc>) -> ValidationReport {
        let mut capabilities = self.state.capabilities;
        capabilities.partial = true;
        ValidationReport::seal(self.meta, ended_at, vec![error], vec![], capabilities)
    }

    /// Closes the load phase. `catalog_findings` follow the load findings in the report.
    pub fn begin_checking(
        self,
        catalog_findings: Vec<Finding>,
        checks: Vec<String>,
    ) -> ReportBuilder<Checking> {
        let mut findings = self.state.findings;
        findings.extend(catalog_findings);
        let mut capabilities = self.state.capabilities;
        capabilities.checks = checks;
        ReportBuilder {
            meta: self.meta,
            state: Checking {
                findings,
                capabilities,
                bundles: Vec::new(),
            },
        }
    }
}

impl ReportBuilder<Checking> {
    /// Appends one bundle's findings. Call in bundle order.
    pub fn bundle(&mut self, result: BundleResult) {
        let counts = ReportCounts::from_findings(&result.findings);
        let status = if counts.error > 0 {
            ReportStatus::Failed
        } else {
            ReportStatus::Passed
        };
        self.state.bundles.push(BundleSummary {
            name: result.name,
            path: result.path,
            status,
            counts,
        });
        self.state.findings.extend(result.findings);
    }

    pub fn seal(self, ended_at: DateTime<Utc>) -> ValidationReport {
        ValidationReport::seal(
            self.meta,
            ended_at,
            self.state.findings,
            self.state.bundles,
            self.state.capabilities,
        )
    }
}
