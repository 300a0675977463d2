use crate::error::{ConfigLoadError, LoadError};
use crate::load::LoadedLayout;
use bundlecheck_types::Provenance;
use bundlecheck_types::finding::{Finding, FindingCode, FindingLocation};
use camino::Utf8Path;
use std::collections::HashSet;

/// Findings for per-file load problems, definitions first, then bundles, each in path order.
pub fn load_findings(layout: &LoadedLayout) -> Vec<Finding> {
    let mut out = Vec::new();

    for d in &layout.definitions {
        match &d.definition {
            Ok(def) => push_provenance(&mut out, &d.path, def.provenance, None),
            Err(e) => out.push(malformed(&d.path, e)),
        }
    }

    // A bundle that lost its name to an earlier one reports its findings at run level.
    let mut claimed = HashSet::new();
    for b in &layout.bundles {
        let bundle = Some(b.report_name()).filter(|name| claimed.insert(*name));
        match &b.config {
            Ok(cfg) => push_provenance(&mut out, &b.path, cfg.provenance, bundle),
            Err(e @ ConfigLoadError::DuplicateName { .. }) => out.push(
                Finding::new(FindingCode::DuplicateBundleName, e.to_string())
                    .at(FindingLocation::pointer(b.path.clone(), "/name")),
            ),
            Err(e) => out.push(tagged(malformed(&b.path, e), bundle)),
        }
        if let Err((path, e)) = &b.emissions {
            out.push(tagged(malformed(path, e), bundle));
        }
    }

    out
}

/// The single finding recorded when the load phase is aborted.
pub fn load_error_finding(err: &LoadError) -> Finding {
    match err {
        LoadError::DuplicateDefinition { second, .. } => {
            Finding::new(FindingCode::DuplicateDefinition, err.to_string())
                .at(FindingLocation::file(second.clone()))
        }
        LoadError::Timeout { .. } => Finding::new(FindingCode::LoadTimeout, err.to_string()),
        LoadError::Pattern { .. } => Finding::new(FindingCode::MalformedConfig, err.to_string()),
    }
}

fn tagged(finding: Finding, bundle: Option<&str>) -> Finding {
    match bundle {
        Some(name) => finding.in_bundle(name),
        None => finding,
    }
}

fn malformed(path: &Utf8Path, err: &ConfigLoadError) -> Finding {
    Finding::new(FindingCode::MalformedConfig, err.to_string())
        .at(FindingLocation::file(path).with_line(err.line(), err.column()))
}

fn push_provenance(
    out: &mut Vec<Finding>,
    path: &Utf8Path,
    provenance: Provenance,
    bundle: Option<&str>,
) {
    if !provenance.is_modified_generated() {
        return;
    }
    let f = Finding::new(
        FindingCode::GeneratedFileModified,
        "generated file no longer matches its recorded digest; hand edits will be lost on regeneration",
    )
    .at(FindingLocation::file(path).with_line(Some(1), None));
    out.push(tagged(f, bundle));
}
