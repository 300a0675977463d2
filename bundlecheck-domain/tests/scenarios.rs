//! End-to-end checks over hand-built bundles.

use bundlecheck_domain::{BundleInput, CheckContext, CheckPolicy, Validator};
use bundlecheck_types::Provenance;
use bundlecheck_types::bundle::{ArtifactField, BundleConfig, ConnectionDeclaration, ParamField};
use bundlecheck_types::definition::{ArtifactDefinition, DefinitionCatalog, PresentationMode};
use bundlecheck_types::emission::{EmissionSite, EmissionSource};
use bundlecheck_types::finding::{FindingCode, Severity};
use pretty_assertions::assert_eq;
use serde_json::json;

fn definition(name: &str, required: &[&str]) -> ArtifactDefinition {
    ArtifactDefinition {
        name: name.to_string(),
        path: format!("artifact-definitions/{name}.yaml").into(),
        label: None,
        schema: json!({"type": "object", "required": required}),
        presentation: PresentationMode::Linkable,
        instructions: vec![],
        exports: vec![],
        provenance: Provenance::AUTHORED,
    }
}

fn catalog() -> DefinitionCatalog {
    DefinitionCatalog::from_unique(vec![
        definition("aws-vpc", &["id"]),
        definition("postgres", &["authentication"]),
    ])
}

fn param(name: &str, schema: serde_json::Value) -> ParamField {
    ParamField {
        name: name.to_string(),
        field_type: schema.get("type").and_then(|t| t.as_str()).map(str::to_string),
        default: schema.get("default").cloned(),
        constraints: serde_json::Map::new(),
        immutable: false,
        required: false,
        schema,
    }
}

fn conn(field: &str, reference: Option<&str>) -> ConnectionDeclaration {
    ConnectionDeclaration {
        field: field.to_string(),
        reference: reference.map(str::to_string),
        required: true,
    }
}

fn artifact(field: &str, reference: &str) -> ArtifactField {
    ArtifactField {
        field: field.to_string(),
        reference: Some(reference.to_string()),
        required: true,
        required_fields: None,
    }
}

fn site(field: &str) -> EmissionSite {
    EmissionSite {
        field: field.to_string(),
        shape: None,
        path: "bundles/db/src/main.tf".into(),
        line: Some(1),
    }
}

fn run(
    bundle: &BundleConfig,
    emissions: &[EmissionSite],
    policy: &CheckPolicy,
) -> Vec<bundlecheck_types::finding::Finding> {
    let catalog = catalog();
    let ctx = CheckContext {
        catalog: &catalog,
        policy,
    };
    let input = BundleInput {
        config: bundle,
        emissions,
        emission_source: EmissionSource::Implementation,
    };
    Validator::new().check_bundle(&ctx, &input)
}

fn codes(findings: &[bundlecheck_types::finding::Finding]) -> Vec<FindingCode> {
    findings.iter().map(|f| f.code).collect()
}

#[test]
fn namespace_collision_is_reported_once() {
    let mut b = BundleConfig::new("db", "bundles/db/bundle.yaml");
    b.params = vec![param("network", json!({"type": "string"}))];
    b.connections = vec![conn("network", Some("aws-vpc"))];

    let findings = run(&b, &[], &CheckPolicy::default());
    assert_eq!(codes(&findings), vec![FindingCode::NamespaceCollision]);
    assert_eq!(findings[0].bundle.as_deref(), Some("db"));
    assert!(findings[0].message.contains("`network`"));
}

#[test]
fn unresolved_reference_names_field_and_identifier() {
    let mut b = BundleConfig::new("app", "bundles/app/bundle.yaml");
    b.connections = vec![conn("database", Some("mysql"))];

    let findings = run(&b, &[], &CheckPolicy::default());
    assert_eq!(codes(&findings), vec![FindingCode::UnresolvedReference]);
    assert!(findings[0].message.contains("`database`"));
    assert!(findings[0].message.contains("`mysql`"));
    assert_eq!(
        findings[0].location.as_ref().unwrap().pointer.as_deref(),
        Some("/connections/properties/database/$ref")
    );
}

#[test]
fn suffixed_reference_suggests_bare_name() {
    let mut b = BundleConfig::new("app", "bundles/app/bundle.yaml");
    b.connections = vec![conn("database", Some("postgres.yaml"))];

    let findings = run(&b, &[], &CheckPolicy::default());
    assert!(findings[0].message.contains("use `postgres`"));
}

#[test]
fn missing_ref_is_unresolved() {
    let mut b = BundleConfig::new("app", "bundles/app/bundle.yaml");
    b.connections = vec![conn("database", None)];

    let findings = run(&b, &[], &CheckPolicy::default());
    assert_eq!(codes(&findings), vec![FindingCode::UnresolvedReference]);
    assert!(findings[0].message.contains("no `$ref`"));
}

#[test]
fn references_checked_connections_then_artifacts() {
    let mut b = BundleConfig::new("app", "bundles/app/bundle.yaml");
    b.artifacts = vec![artifact("out", "nope-a")];
    b.connections = vec![conn("z", Some("nope-z")), conn("a", Some("nope-b"))];

    let findings = run(&b, &[site("out")], &CheckPolicy::default());
    let messages: Vec<&str> = findings.iter().map(|f| f.message.as_str()).collect();
    assert!(messages[0].contains("`z`"));
    assert!(messages[1].contains("`a`"));
    assert!(messages[2].contains("`out`"));
}

#[test]
fn matching_wiring_is_clean() {
    let mut b = BundleConfig::new("db", "bundles/db/bundle.yaml");
    b.artifacts = vec![artifact("database", "postgres")];

    assert!(run(&b, &[site("database")], &CheckPolicy::default()).is_empty());
}

#[test]
fn wiring_mismatches_both_directions() {
    let mut b = BundleConfig::new("db", "bundles/db/bundle.yaml");
    b.artifacts = vec![artifact("database", "postgres")];

    let missing = run(&b, &[], &CheckPolicy::default());
    assert_eq!(codes(&missing), vec![FindingCode::MissingEmission]);

    let extra = run(
        &b,
        &[site("database"), site("extra")],
        &CheckPolicy::default(),
    );
    assert_eq!(codes(&extra), vec![FindingCode::UndeclaredEmission]);
    assert!(extra[0].message.contains("`extra`"));
    assert_eq!(extra[0].location.as_ref().unwrap().line, Some(1));
}

#[test]
fn shape_mismatch_severity_follows_policy() {
    let mut b = BundleConfig::new("db", "bundles/db/bundle.yaml");
    let mut art = artifact("database", "postgres");
    art.required_fields = Some(vec!["authentication".to_string(), "tls".to_string()]);
    b.artifacts = vec![art];

    let default = run(&b, &[site("database")], &CheckPolicy::default());
    assert_eq!(codes(&default), vec![FindingCode::SchemaShapeMismatch]);
    assert_eq!(default[0].severity, Severity::Warning);
    assert!(default[0].message.contains("only in artifact [tls]"));

    let strict = CheckPolicy {
        shape_mismatch: Severity::Error,
    };
    let strict = run(&b, &[site("database")], &strict);
    assert_eq!(strict[0].severity, Severity::Error);
}

#[test]
fn same_required_set_in_other_order_is_compatible() {
    let catalog = DefinitionCatalog::from_unique(vec![definition("pair", &["a", "b"])]);
    let mut b = BundleConfig::new("db", "bundles/db/bundle.yaml");
    let mut art = artifact("out", "pair");
    art.required_fields = Some(vec!["b".to_string(), "a".to_string()]);
    b.artifacts = vec![art];

    let policy = CheckPolicy::default();
    let ctx = CheckContext {
        catalog: &catalog,
        policy: &policy,
    };
    let emissions = [site("out")];
    let input = BundleInput {
        config: &b,
        emissions: &emissions,
        emission_source: EmissionSource::Manifest,
    };
    assert!(Validator::new().check_bundle(&ctx, &input).is_empty());
}

#[test]
fn unknown_required_field_and_bad_default() {
    let mut b = BundleConfig::new("db", "bundles/db/bundle.yaml");
    b.params = vec![param(
        "size",
        json!({"type": "integer", "minimum": 10, "default": 5}),
    )];
    b.required.params = vec!["size".to_string(), "region".to_string()];

    let findings = run(&b, &[], &CheckPolicy::default());
    assert_eq!(
        codes(&findings),
        vec![
            FindingCode::UnknownRequiredField,
            FindingCode::InvalidParamDefault
        ]
    );
    assert!(findings[0].message.contains("`region`"));
    assert_eq!(findings[1].severity, Severity::Warning);
}

#[test]
fn valid_default_passes() {
    let mut b = BundleConfig::new("db", "bundles/db/bundle.yaml");
    b.params = vec![param(
        "size",
        json!({"type": "integer", "minimum": 10, "default": 20}),
    )];
    assert!(run(&b, &[], &CheckPolicy::default()).is_empty());
}

#[test]
fn param_with_remote_ref_is_skipped_offline() {
    let mut b = BundleConfig::new("db", "bundles/db/bundle.yaml");
    b.params = vec![
        param(
            "region",
            json!({"$ref": "https://example.com/schemas/region.json", "default": "nowhere"}),
        ),
        param("size", json!({"type": "integer", "default": "big"})),
    ];
    let findings = run(&b, &[], &CheckPolicy::default());
    assert_eq!(codes(&findings), vec![FindingCode::InvalidParamDefault]);
    assert!(findings[0].message.contains("`size`"));
}

#[test]
fn check_is_idempotent() {
    let mut b = BundleConfig::new("db", "bundles/db/bundle.yaml");
    b.params = vec![param("network", json!({}))];
    b.connections = vec![conn("network", Some("missing"))];
    b.artifacts = vec![artifact("database", "postgres")];

    let first = run(&b, &[site("extra")], &CheckPolicy::default());
    let second = run(&b, &[site("extra")], &CheckPolicy::default());
    assert_eq!(first, second);
    assert_eq!(
        codes(&first),
        vec![
            FindingCode::NamespaceCollision,
            FindingCode::UnresolvedReference,
            FindingCode::MissingEmission,
            FindingCode::UndeclaredEmission,
        ]
    );
}
