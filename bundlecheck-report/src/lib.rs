//! Aggregation of findings into a sealed validation report.
//!
//! A report moves through `Loading → Checking → Sealed`. Each phase is its own builder type, so a
//! half-built report cannot be observed or serialized; only [`ValidationReport`] is.

mod builder;

pub use builder::{BundleResult, Checking, Loading, ReportBuilder, RunMeta};

use bundlecheck_types::finding::{Finding, Phase, Severity};
use bundlecheck_types::report::{
    BundleSummary, Outcome, ReportCapabilities, ReportCounts, ReportRunInfo, ReportStatus,
    ReportV1, ReportVerdict,
};
use chrono::{DateTime, Utc};
use uuid::Uuid;

pub mod reasons {
    pub const LOAD_ERRORS: &str = "load_errors";
    pub const CHECK_ERRORS: &str = "check_errors";
    pub const PARTIAL_INPUTS: &str = "partial_inputs";
}

/// Immutable result of one validation run.
#[derive(Debug, Clone)]
pub struct ValidationReport {
    meta: RunMeta,
    ended_at: DateTime<Utc>,
    findings: Vec<Finding>,
    bundles: Vec<BundleSummary>,
    capabilities: ReportCapabilities,
    counts: ReportCounts,
    outcome: Outcome,
}

impl ValidationReport {
    pub fn loading(meta: RunMeta) -> ReportBuilder<Loading> {
        ReportBuilder::new(meta)
    }

    pub(crate) fn seal(
        meta: RunMeta,
        ended_at: DateTime<Utc>,
        findings: Vec<Finding>,
        bundles: Vec<BundleSummary>,
        capabilities: ReportCapabilities,
    ) -> Self {
        let counts = ReportCounts::from_findings(&findings);
        let outcome = classify(&findings);
        tracing::debug!(
            outcome = ?outcome,
            errors = counts.error,
            warnings = counts.warning,
            "report sealed"
        );
        Self {
            meta,
            ended_at,
            findings,
            bundles,
            capabilities,
            counts,
            outcome,
        }
    }

    /// Every finding: load phase, catalog, then bundle by bundle.
    pub fn findings(&self) -> &[Finding] {
        &self.findings
    }

    pub fn bundle_findings<'a>(&'a self, bundle: &'a str) -> impl Iterator<Item = &'a Finding> {
        self.findings
            .iter()
            .filter(move |f| f.bundle.as_deref() == Some(bundle))
    }

    pub fn bundles(&self) -> &[BundleSummary] {
        &self.bundles
    }

    pub fn counts(&self) -> ReportCounts {
        self.counts
    }

    pub fn outcome(&self) -> Outcome {
        self.outcome
    }

    pub fn status(&self) -> ReportStatus {
        self.outcome.status()
    }

    pub fn passed(&self) -> bool {
        self.outcome == Outcome::Passed
    }

    pub fn capabilities(&self) -> &ReportCapabilities {
        &self.capabilities
    }

    pub fn meta(&self) -> &RunMeta {
        &self.meta
    }

    /// Deterministic id derived from the input digest.
    pub fn report_id(&self) -> Uuid {
        Uuid::new_v5(&Uuid::NAMESPACE_OID, self.meta.input_digest.as_bytes())
    }

    pub fn to_wire(&self) -> ReportV1 {
        let duration_ms = (self.ended_at - self.meta.started_at)
            .num_milliseconds()
            .max(0) as u64;

        let mut verdict_reasons = Vec::new();
        if self.has_error_in(|p| p == Phase::Load) {
            verdict_reasons.push(reasons::LOAD_ERRORS.to_string());
        }
        if self.has_error_in(|p| p != Phase::Load) {
            verdict_reasons.push(reasons::CHECK_ERRORS.to_string());
        }
        if self.capabilities.partial {
            verdict_reasons.push(reasons::PARTIAL_INPUTS.to_string());
        }

        ReportV1 {
            schema: bundlecheck_types::schema::BUNDLECHECK_REPORT_V1.to_string(),
            tool: self.meta.tool.clone(),
            run: ReportRunInfo {
                report_id: self.report_id().to_string(),
                started_at: self.meta.started_at.to_rfc3339(),
                ended_at: Some(self.ended_at.to_rfc3339()),
                duration_ms: Some(duration_ms),
                root: self.meta.root.clone(),
                input_digest: self.meta.input_digest.clone(),
            },
            verdict: ReportVerdict {
                status: self.status(),
                outcome: self.outcome,
                counts: self.counts,
                reasons: verdict_reasons,
            },
            findings: self.findings.clone(),
            bundles: self.bundles.clone(),
            capabilities: Some(self.capabilities.clone()),
        }
    }

    fn has_error_in(&self, phase: impl Fn(Phase) -> bool) -> bool {
        self.findings
            .iter()
            .any(|f| f.severity == Severity::Error && phase(f.code.phase()))
    }
}

fn classify(findings: &[Finding]) -> Outcome {
    let errors = findings.iter().filter(|f| f.severity == Severity::Error);
    let mut outcome = Outcome::Passed;
    for f in errors {
        if f.code.phase() == Phase::Load {
            return Outcome::LoadFailed;
        }
        outcome = Outcome::CheckFailed;
    }
    outcome
}
