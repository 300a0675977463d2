use bundlecheck_bdd::{fixtures_root, name_list, ref_group, write_file};
use bundlecheck_core::adapters::FsConfigSource;
use bundlecheck_core::pipeline::{ToolError, ValidateOutcome, run_validate};
use bundlecheck_core::settings::{RunMode, ValidateSettings};
use bundlecheck_core::{CancelToken, CheckPolicy};
use bundlecheck_types::finding::{Finding, FindingCode, Severity};
use bundlecheck_types::report::ToolInfo;
use camino::Utf8PathBuf;
use cucumber::{World, given, then, when};
use tempfile::TempDir;

#[derive(Debug, Default, World)]
pub struct BundlecheckWorld {
    temp: Option<TempDir>,
    root: Option<Utf8PathBuf>,
    settings: ValidateSettings,
    outcome: Option<ValidateOutcome>,
    error: Option<String>,
}

fn root(world: &BundlecheckWorld) -> &Utf8PathBuf {
    world.root.as_ref().expect("layout root set")
}

fn outcome(world: &BundlecheckWorld) -> &ValidateOutcome {
    world.outcome.as_ref().expect("validation ran and produced a report")
}

fn tool() -> ToolInfo {
    ToolInfo {
        name: "bundlecheck".to_string(),
        version: "bdd".to_string(),
        commit: None,
    }
}

fn run(world: &BundlecheckWorld, settings: &ValidateSettings, cancel: &CancelToken) -> Result<ValidateOutcome, ToolError> {
    let root = root(world).clone();
    let settings = ValidateSettings {
        root: root.clone(),
        ..settings.clone()
    };
    let source = FsConfigSource::new(root, settings.layout.clone());
    run_validate(&settings, &source, tool(), cancel)
}

fn findings_with_code<'a>(world: &'a BundlecheckWorld, code: &str) -> Vec<&'a Finding> {
    let code = FindingCode::parse(code).expect("known finding code");
    outcome(world)
        .report
        .findings()
        .iter()
        .filter(|f| f.code == code)
        .collect()
}

// ============================================================================
// Layouts
// ============================================================================

#[given("an empty layout")]
async fn empty_layout(world: &mut BundlecheckWorld) {
    let td = tempfile::tempdir().expect("tempdir");
    let root = Utf8PathBuf::from_path_buf(td.path().to_path_buf()).unwrap();
    world.temp = Some(td);
    world.root = Some(root);
}

#[given(expr = "the fixture layout {string}")]
async fn fixture_layout(world: &mut BundlecheckWorld, name: String) {
    let root = fixtures_root().join(&name).join("layout");
    assert!(root.exists(), "fixture layout {root} does not exist");
    world.root = Some(root);
}

#[given(expr = "an artifact definition {string}")]
async fn artifact_definition(world: &mut BundlecheckWorld, name: String) {
    let yaml = format!("name: {name}\nschema:\n  type: object\n  required: [id]\n");
    write_file(root(world), &format!("artifact-definitions/{name}.yaml"), &yaml).unwrap();
}

#[given(expr = "a bundle {string} with params {string} and connections {string} referencing {string}")]
async fn bundle_with_params_and_connections(
    world: &mut BundlecheckWorld,
    bundle: String,
    params: String,
    connections: String,
    definition: String,
) {
    let mut yaml = format!("name: {bundle}\n");
    let params = name_list(&params);
    if !params.is_empty() {
        yaml.push_str("params:\n  properties:\n");
        for p in &params {
            yaml.push_str(&format!("    {p}:\n      type: string\n"));
        }
    }
    let connections = name_list(&connections);
    if !connections.is_empty() {
        yaml.push_str("connections:\n");
        yaml.push_str(&ref_group(&connections, &definition));
    }
    write_file(root(world), &format!("bundles/{bundle}/bundle.yaml"), &yaml).unwrap();
}

#[given(expr = "a bundle {string} declaring artifacts {string} referencing {string}")]
async fn bundle_declaring_artifacts(
    world: &mut BundlecheckWorld,
    bundle: String,
    artifacts: String,
    definition: String,
) {
    let yaml = format!(
        "name: {bundle}\nartifacts:\n{}",
        ref_group(&name_list(&artifacts), &definition)
    );
    write_file(root(world), &format!("bundles/{bundle}/bundle.yaml"), &yaml).unwrap();
}

#[given(
    expr = "a bundle {string} declaring artifacts {string} referencing {string} with required fields {string}"
)]
async fn bundle_declaring_artifacts_with_fields(
    world: &mut BundlecheckWorld,
    bundle: String,
    artifacts: String,
    definition: String,
    fields: String,
) {
    let fields = name_list(&fields).join(", ");
    let mut yaml = format!("name: {bundle}\nartifacts:\n  properties:\n");
    for a in name_list(&artifacts) {
        yaml.push_str(&format!(
            "    {a}:\n      $ref: {definition}\n      required: [{fields}]\n"
        ));
    }
    write_file(root(world), &format!("bundles/{bundle}/bundle.yaml"), &yaml).unwrap();
}

#[given(expr = "bundle {string} emits {string}")]
async fn bundle_emits(world: &mut BundlecheckWorld, bundle: String, fields: String) {
    let mut yaml = String::from("emissions:\n");
    let fields = name_list(&fields);
    if fields.is_empty() {
        yaml = String::from("emissions: []\n");
    }
    for f in fields {
        yaml.push_str(&format!("  - field: {f}\n"));
    }
    write_file(root(world), &format!("bundles/{bundle}/emissions.yaml"), &yaml).unwrap();
}

// ============================================================================
// Settings
// ============================================================================

#[given("shape mismatches are errors")]
async fn shape_mismatch_errors(world: &mut BundlecheckWorld) {
    world.settings.policy = CheckPolicy {
        shape_mismatch: Severity::Error,
    };
}

#[given("report-only mode")]
async fn report_only_mode(world: &mut BundlecheckWorld) {
    world.settings.mode = RunMode::ReportOnly;
}

// ============================================================================
// Runs
// ============================================================================

#[when("I validate the layout")]
async fn validate_layout(world: &mut BundlecheckWorld) {
    let settings = world.settings.clone();
    match run(world, &settings, &CancelToken::new()) {
        Ok(outcome) => world.outcome = Some(outcome),
        Err(e) => world.error = Some(e.to_string()),
    }
}

#[when("I validate the layout with a cancelled token")]
async fn validate_cancelled(world: &mut BundlecheckWorld) {
    let cancel = CancelToken::new();
    cancel.cancel();
    let settings = world.settings.clone();
    match run(world, &settings, &cancel) {
        Ok(outcome) => world.outcome = Some(outcome),
        Err(e) => world.error = Some(e.to_string()),
    }
}

// ============================================================================
// Assertions
// ============================================================================

#[then(expr = "there is exactly one {string} finding mentioning {string}")]
async fn exactly_one_finding_mentioning(world: &mut BundlecheckWorld, code: String, text: String) {
    let found = findings_with_code(world, &code);
    assert_eq!(found.len(), 1, "expected one {code} finding, got {found:?}");
    assert!(
        found[0].message.contains(&text),
        "expected {code} message to mention `{text}`, got: {}",
        found[0].message
    );
}

#[then(expr = "there is exactly one {string} finding for bundle {string}")]
async fn exactly_one_finding_for_bundle(world: &mut BundlecheckWorld, code: String, bundle: String) {
    let found = findings_with_code(world, &code);
    assert_eq!(found.len(), 1, "expected one {code} finding, got {found:?}");
    assert_eq!(found[0].bundle.as_deref(), Some(bundle.as_str()));
}

#[then("there are no findings")]
async fn no_findings(world: &mut BundlecheckWorld) {
    let findings = outcome(world).report.findings();
    assert!(findings.is_empty(), "expected no findings, got {findings:?}");
}

#[then(expr = "the report holds {int} finding")]
async fn report_holds(world: &mut BundlecheckWorld, count: usize) {
    assert_eq!(outcome(world).report.findings().len(), count);
}

#[then(expr = "the report status is {string}")]
async fn report_status(world: &mut BundlecheckWorld, expected: String) {
    let wire = outcome(world).report.to_wire();
    let status = serde_json::to_value(wire.verdict.status).unwrap();
    assert_eq!(status, serde_json::json!(expected));
}

#[then(expr = "the report outcome is {string}")]
async fn report_outcome(world: &mut BundlecheckWorld, expected: String) {
    let actual = serde_json::to_value(outcome(world).report.outcome()).unwrap();
    assert_eq!(actual, serde_json::json!(expected));
}

#[then(expr = "the exit code is {int}")]
async fn exit_code(world: &mut BundlecheckWorld, expected: i32) {
    let mode = world.settings.mode;
    assert_eq!(outcome(world).exit_code(mode), expected);
}

#[then(expr = "bundle {string} was checked")]
async fn bundle_was_checked(world: &mut BundlecheckWorld, name: String) {
    let checked = outcome(world)
        .report
        .bundles()
        .iter()
        .any(|b| b.name == name);
    assert!(checked, "bundle {name} was not checked");
}

#[then("a sequential run yields the same findings")]
async fn sequential_matches(world: &mut BundlecheckWorld) {
    let settings = ValidateSettings {
        parallel: false,
        ..world.settings.clone()
    };
    let sequential = run(world, &settings, &CancelToken::new()).expect("sequential run");
    assert_eq!(
        outcome(world).report.findings(),
        sequential.report.findings()
    );
}

#[then("no report is produced")]
async fn no_report(world: &mut BundlecheckWorld) {
    assert!(world.outcome.is_none());
    assert_eq!(world.error.as_deref(), Some("validation cancelled"));
}

#[tokio::main]
async fn main() {
    let features_path = std::path::Path::new(env!("CARGO_MANIFEST_DIR")).join("features");
    BundlecheckWorld::cucumber().run(features_path).await;
}
