use crate::checkers::{Checker, CheckerMeta, pointer};
use crate::validator::{BundleInput, CheckContext};
use bundlecheck_types::emission::{EmissionSite, EmissionSource};
use bundlecheck_types::finding::{Finding, FindingCode, FindingLocation};
use std::collections::HashSet;

pub struct ArtifactWiringChecker;

impl ArtifactWiringChecker {
    const KEY: &'static str = "bundle.wiring";
    const DESCRIPTION: &'static str =
        "Declared artifact fields and implementation emission sites must match one to one";
    const CODES: &'static [FindingCode] = &[
        FindingCode::MissingEmission,
        FindingCode::UndeclaredEmission,
    ];
}

/// Symmetric difference between declared artifact fields and emitted fields.
#[derive(Debug, Clone, PartialEq)]
pub struct WiringDiff<'a> {
    /// Declared but never emitted, in declaration order.
    pub missing: Vec<&'a str>,
    /// Emitted but never declared: the first site for each name, in emission order.
    pub undeclared: Vec<&'a EmissionSite>,
}

impl WiringDiff<'_> {
    pub fn is_empty(&self) -> bool {
        self.missing.is_empty() && self.undeclared.is_empty()
    }
}

pub fn wiring_diff<'a>(
    declared: impl IntoIterator<Item = &'a str>,
    emitted: &'a [EmissionSite],
) -> WiringDiff<'a> {
    let declared: Vec<&str> = declared.into_iter().collect();
    let declared_set: HashSet<&str> = declared.iter().copied().collect();
    let emitted_set: HashSet<&str> = emitted.iter().map(|s| s.field.as_str()).collect();

    let mut seen = HashSet::new();
    let missing = declared
        .iter()
        .copied()
        .filter(|name| !emitted_set.contains(name) && seen.insert(*name))
        .collect();

    let mut seen = HashSet::new();
    let undeclared = emitted
        .iter()
        .filter(|site| {
            !declared_set.contains(site.field.as_str()) && seen.insert(site.field.as_str())
        })
        .collect();

    WiringDiff {
        missing,
        undeclared,
    }
}

impl Checker for ArtifactWiringChecker {
    fn meta(&self) -> CheckerMeta {
        CheckerMeta {
            key: Self::KEY,
            description: Self::DESCRIPTION,
            codes: Self::CODES,
        }
    }

    fn check(&self, _ctx: &CheckContext<'_>, input: &BundleInput<'_>) -> Vec<Finding> {
        let bundle = input.config;
        let diff = wiring_diff(bundle.artifact_names(), input.emissions);

        let suffix = match input.emission_source {
            EmissionSource::None => " (no emissions manifest or implementation files found)",
            EmissionSource::Manifest | EmissionSource::Implementation => "",
        };

        let mut out = Vec::with_capacity(diff.missing.len() + diff.undeclared.len());
        for name in diff.missing {
            out.push(
                Finding::new(
                    FindingCode::MissingEmission,
                    format!("artifact `{name}` is declared but never emitted{suffix}"),
                )
                .at(FindingLocation::pointer(
                    bundle.path.clone(),
                    pointer(&["artifacts", "properties", name]),
                )),
            );
        }
        for site in diff.undeclared {
            out.push(
                Finding::new(
                    FindingCode::UndeclaredEmission,
                    format!(
                        "implementation emits artifact `{}` which is not declared under artifacts",
                        site.field
                    ),
                )
                .at(FindingLocation::file(site.path.clone()).with_line(site.line, None)),
            );
        }
        out
    }
}
