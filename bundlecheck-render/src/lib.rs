//! Rendering helpers (markdown, terminal text) for human-readable reports.
//!
//! Findings are grouped by bundle, then by severity (errors first). Run-level findings that
//! belong to no bundle come first.

use bundlecheck_types::finding::{Finding, Severity};
use bundlecheck_types::report::{ReportStatus, ReportV1};

const SEVERITY_ORDER: [Severity; 3] = [Severity::Error, Severity::Warning, Severity::Info];

struct Group<'a> {
    bundle: Option<&'a str>,
    findings: Vec<&'a Finding>,
}

/// Run-level group first, then bundles in report order. Bundles that only appear on
/// findings (a bundle file that failed to load) follow in first-seen order.
fn group_findings(report: &ReportV1) -> Vec<Group<'_>> {
    let mut groups: Vec<Group<'_>> = vec![Group {
        bundle: None,
        findings: vec![],
    }];
    for b in &report.bundles {
        groups.push(Group {
            bundle: Some(b.name.as_str()),
            findings: vec![],
        });
    }

    for f in &report.findings {
        let key = f.bundle.as_deref();
        match groups.iter_mut().find(|g| g.bundle == key) {
            Some(g) => g.findings.push(f),
            None => groups.push(Group {
                bundle: key,
                findings: vec![f],
            }),
        }
    }

    for g in &mut groups {
        // Stable: keeps checker order within a severity.
        g.findings.sort_by_key(|f| std::cmp::Reverse(f.severity));
    }
    groups
}

fn status_label(s: ReportStatus) -> &'static str {
    match s {
        ReportStatus::Passed => "passed",
        ReportStatus::Failed => "failed",
    }
}

fn location_label(f: &Finding) -> String {
    f.location
        .as_ref()
        .map(|l| l.to_string())
        .unwrap_or_else(|| "-".to_string())
}

pub fn render_report_md(report: &ReportV1) -> String {
    let v = &report.verdict;
    let mut out = String::new();
    out.push_str("# bundlecheck report\n\n");
    out.push_str(&format!(
        "- Status: `{}` ({})\n",
        status_label(v.status),
        outcome_label(report)
    ));
    out.push_str(&format!(
        "- Findings: {} error, {} warning, {} info\n",
        v.counts.error, v.counts.warning, v.counts.info
    ));
    out.push_str(&format!("- Bundles: {}\n", report.bundles.len()));
    if let Some(caps) = &report.capabilities {
        out.push_str(&format!(
            "- Inputs: {} loaded, {} failed\n",
            caps.inputs_available.len(),
            caps.inputs_failed.len()
        ));
    }
    out.push('\n');

    if report.findings.is_empty() {
        out.push_str("_No findings._\n");
        return out;
    }

    for group in group_findings(report) {
        if group.findings.is_empty() {
            continue;
        }
        match group.bundle {
            Some(name) => {
                let status = report
                    .bundles
                    .iter()
                    .find(|b| b.name == name)
                    .map(|b| status_label(b.status))
                    .unwrap_or("not loaded");
                out.push_str(&format!("## Bundle `{}` ({})\n\n", name, status));
            }
            None => out.push_str("## Run\n\n"),
        }

        for severity in SEVERITY_ORDER {
            let items: Vec<&&Finding> = group
                .findings
                .iter()
                .filter(|f| f.severity == severity)
                .collect();
            if items.is_empty() {
                continue;
            }
            out.push_str(&format!("**{}**\n\n", severity_heading(severity)));
            for f in items {
                out.push_str(&format!(
                    "- `{}` {} at `{}`\n",
                    f.code,
                    f.message,
                    location_label(f)
                ));
            }
            out.push('\n');
        }
    }

    out
}

/// Compact terminal summary, one line per finding.
pub fn render_summary_text(report: &ReportV1) -> String {
    let v = &report.verdict;
    let mut out = String::new();

    for group in group_findings(report) {
        if group.findings.is_empty() {
            continue;
        }
        out.push_str(group.bundle.unwrap_or("(run)"));
        out.push('\n');
        for f in group.findings {
            out.push_str(&format!(
                "  {:<7} {} {}: {}\n",
                f.severity.as_str(),
                f.code,
                location_label(f),
                f.message
            ));
        }
    }

    out.push_str(&format!(
        "bundlecheck: {} ({} error, {} warning, {} info; {} bundles)\n",
        status_label(v.status),
        v.counts.error,
        v.counts.warning,
        v.counts.info,
        report.bundles.len()
    ));
    out
}

fn severity_heading(s: Severity) -> &'static str {
    match s {
        Severity::Error => "Errors",
        Severity::Warning => "Warnings",
        Severity::Info => "Info",
    }
}

fn outcome_label(report: &ReportV1) -> &'static str {
    use bundlecheck_types::report::Outcome;
    match report.verdict.outcome {
        Outcome::Passed => "passed",
        Outcome::CheckFailed => "check_failed",
        Outcome::LoadFailed => "load_failed",
    }
}
