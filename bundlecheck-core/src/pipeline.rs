//! The validate pipeline, extracted from the CLI.
//!
//! The entry point is I/O-agnostic: configuration is read through [`ConfigSource`] and
//! artifacts are written through [`WritePort`].

use crate::cancel::CancelToken;
use crate::ports::{ConfigSource, WritePort};
use crate::settings::{RunMode, ValidateSettings};
use anyhow::Context;
use bundlecheck_domain::{BundleInput, CheckContext, Validator};
use bundlecheck_loader::{
    LoadBudget, LoadError, LoadedLayout, build_catalog, load_error_finding, load_findings,
    sha256_hex,
};
use bundlecheck_render::render_report_md;
use bundlecheck_report::{BundleResult, Loading, ReportBuilder, RunMeta, ValidationReport};
use bundlecheck_types::finding::Finding;
use bundlecheck_types::report::{Outcome, ToolInfo};
use chrono::Utc;
use rayon::prelude::*;
use tracing::{debug, info};

/// Process exit codes.
pub mod exit_codes {
    pub const PASSED: i32 = 0;
    pub const TOOL_ERROR: i32 = 1;
    pub const CHECK_FAILED: i32 = 2;
    pub const LOAD_FAILED: i32 = 3;
}

/// Error type for pipeline results. Every variant maps to exit code 1.
#[derive(Debug, thiserror::Error)]
pub enum ToolError {
    #[error("validation cancelled")]
    Cancelled,
    #[error("{0:#}")]
    Internal(#[from] anyhow::Error),
}

impl ToolError {
    pub fn exit_code(&self) -> i32 {
        exit_codes::TOOL_ERROR
    }
}

/// Outcome of `run_validate`.
#[derive(Debug)]
pub struct ValidateOutcome {
    pub report: ValidationReport,
}

impl ValidateOutcome {
    pub fn exit_code(&self, mode: RunMode) -> i32 {
        if mode == RunMode::ReportOnly {
            return exit_codes::PASSED;
        }
        match self.report.outcome() {
            Outcome::Passed => exit_codes::PASSED,
            Outcome::CheckFailed => exit_codes::CHECK_FAILED,
            Outcome::LoadFailed => exit_codes::LOAD_FAILED,
        }
    }
}

/// Run the validate pipeline: load, check every bundle, seal the report.
///
/// A cancelled run returns [`ToolError::Cancelled`] and no report. The caller is responsible
/// for writing artifacts (see [`write_report_artifacts`]).
pub fn run_validate(
    settings: &ValidateSettings,
    source: &dyn ConfigSource,
    tool: ToolInfo,
    cancel: &CancelToken,
) -> Result<ValidateOutcome, ToolError> {
    cancel.check()?;
    let started_at = Utc::now();
    let budget = LoadBudget::new(settings.load_timeout);

    let layout = match source.load(&budget) {
        Ok(layout) => layout,
        Err(e @ LoadError::Timeout { .. }) => {
            cancel.check()?;
            let meta = RunMeta {
                tool,
                root: settings.root.to_string(),
                input_digest: sha256_hex(b""),
                started_at,
            };
            info!(error = %e, "load phase aborted");
            let report = ValidationReport::loading(meta).abort(load_error_finding(&e), Utc::now());
            return Ok(ValidateOutcome { report });
        }
        Err(e) => {
            return Err(anyhow::Error::new(e)
                .context(format!("load layout under {}", settings.root))
                .into());
        }
    };
    cancel.check()?;

    let meta = RunMeta {
        tool,
        root: settings.root.to_string(),
        input_digest: layout.input_digest(),
        started_at,
    };
    let builder = loading_builder(meta, &layout);

    let catalog = match build_catalog(&layout.definitions) {
        Ok(catalog) => catalog,
        Err(e) => {
            cancel.check()?;
            info!(error = %e, "definition catalog rejected");
            let report = builder.abort(load_error_finding(&e), Utc::now());
            return Ok(ValidateOutcome { report });
        }
    };
    debug!(definitions = catalog.len(), "definition catalog built");

    let validator = Validator::new();
    let ctx = CheckContext {
        catalog: &catalog,
        policy: &settings.policy,
    };
    let checks = validator
        .metas()
        .iter()
        .map(|m| m.key.to_string())
        .collect();
    let mut checking = builder.begin_checking(validator.check_catalog(&ctx), checks);

    let inputs = bundle_inputs(&layout);
    let check_one = |(path, input): &(String, BundleInput<'_>)| -> Result<BundleResult, ToolError> {
        cancel.check()?;
        Ok(BundleResult {
            name: input.config.name.clone(),
            path: path.clone(),
            findings: validator.check_bundle(&ctx, input),
        })
    };

    let results: Vec<BundleResult> = if settings.parallel {
        inputs.par_iter().map(check_one).collect::<Result<_, _>>()?
    } else {
        inputs.iter().map(check_one).collect::<Result<_, _>>()?
    };

    for result in results {
        checking.bundle(result);
    }

    cancel.check()?;
    let report = checking.seal(Utc::now());
    info!(
        outcome = ?report.outcome(),
        bundles = report.bundles().len(),
        findings = report.findings().len(),
        "validation finished"
    );
    Ok(ValidateOutcome { report })
}

fn loading_builder(meta: RunMeta, layout: &LoadedLayout) -> ReportBuilder<Loading> {
    let mut builder = ValidationReport::loading(meta);

    for d in &layout.definitions {
        match &d.definition {
            Ok(_) => builder.input_loaded(d.path.as_str()),
            Err(e) => builder.input_failed(d.path.as_str(), e.to_string()),
        }
    }
    for b in &layout.bundles {
        match &b.config {
            Ok(_) => builder.input_loaded(b.path.as_str()),
            Err(e) => builder.input_failed(b.path.as_str(), e.to_string()),
        }
        if let Err((path, e)) = &b.emissions {
            builder.input_failed(path.as_str(), e.to_string());
        }
    }

    let findings: Vec<Finding> = load_findings(layout);
    builder.load_findings(findings);
    builder
}

/// Bundles that loaded cleanly, with their report path. A bundle whose emission source failed
/// to load is skipped; its load finding stands in for the checks.
fn bundle_inputs(layout: &LoadedLayout) -> Vec<(String, BundleInput<'_>)> {
    layout
        .bundles
        .iter()
        .filter_map(|b| {
            let config = b.config.as_ref().ok()?;
            let emissions = b.emissions.as_ref().ok()?;
            Some((
                b.path.to_string(),
                BundleInput {
                    config,
                    emissions: &emissions.sites,
                    emission_source: emissions.source,
                },
            ))
        })
        .collect()
}

/// Write `report.json` and `report.md` to the output directory.
pub fn write_report_artifacts(
    outcome: &ValidateOutcome,
    out_dir: &camino::Utf8Path,
    writer: &dyn WritePort,
) -> anyhow::Result<()> {
    writer.create_dir_all(out_dir)?;

    let wire = outcome.report.to_wire();
    let json = serde_json::to_string_pretty(&wire).context("serialize report")?;
    writer.write_file(&out_dir.join("report.json"), json.as_bytes())?;

    let md = render_report_md(&wire);
    writer.write_file(&out_dir.join("report.md"), md.as_bytes())?;

    Ok(())
}
