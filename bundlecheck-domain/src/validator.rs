use crate::catalog::check_catalog;
use crate::checkers::{self, Checker, CheckerMeta};
use bundlecheck_types::bundle::BundleConfig;
use bundlecheck_types::definition::DefinitionCatalog;
use bundlecheck_types::emission::{EmissionSite, EmissionSource};
use bundlecheck_types::finding::{Finding, Severity};
use tracing::debug;

/// Severity knobs for checks whose strictness is a team decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CheckPolicy {
    pub shape_mismatch: Severity,
}

impl Default for CheckPolicy {
    fn default() -> Self {
        Self {
            shape_mismatch: Severity::Warning,
        }
    }
}

/// Everything a check may read. Shared read-only across bundles.
#[derive(Debug, Clone, Copy)]
pub struct CheckContext<'a> {
    pub catalog: &'a DefinitionCatalog,
    pub policy: &'a CheckPolicy,
}

/// One bundle and its emission sites.
#[derive(Debug, Clone, Copy)]
pub struct BundleInput<'a> {
    pub config: &'a BundleConfig,
    pub emissions: &'a [EmissionSite],
    pub emission_source: EmissionSource,
}

pub struct Validator {
    checkers: Vec<Box<dyn Checker>>,
}

impl Default for Validator {
    fn default() -> Self {
        Self::new()
    }
}

impl Validator {
    pub fn new() -> Self {
        Self {
            checkers: checkers::builtin_checkers(),
        }
    }

    pub fn metas(&self) -> Vec<CheckerMeta> {
        self.checkers.iter().map(|c| c.meta()).collect()
    }

    pub fn check_catalog(&self, ctx: &CheckContext<'_>) -> Vec<Finding> {
        check_catalog(ctx.catalog)
    }

    /// Runs every checker against one bundle. Findings are tagged with the bundle name and
    /// ordered checker by checker.
    pub fn check_bundle(&self, ctx: &CheckContext<'_>, input: &BundleInput<'_>) -> Vec<Finding> {
        let mut out = Vec::new();
        for checker in &self.checkers {
            let found = checker.check(ctx, input);
            debug!(
                bundle = %input.config.name,
                checker = checker.meta().key,
                findings = found.len(),
                "checker finished"
            );
            out.extend(found.into_iter().map(|f| f.in_bundle(&input.config.name)));
        }
        out
    }
}
