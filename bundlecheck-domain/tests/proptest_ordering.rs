//! Property-based tests for the pure checks.
//!
//! These tests verify that:
//! - Namespace collisions are exactly the params/connections intersection
//! - Resolvable references never produce UNRESOLVED_REFERENCE
//! - Wiring diffs are the symmetric difference, in input order
//! - Checking the same bundle twice yields identical findings

use bundlecheck_domain::{
    BundleInput, CheckContext, CheckPolicy, Validator, namespace_collisions, wiring_diff,
};
use bundlecheck_types::Provenance;
use bundlecheck_types::bundle::{BundleConfig, ConnectionDeclaration, ParamField};
use bundlecheck_types::definition::{ArtifactDefinition, DefinitionCatalog, PresentationMode};
use bundlecheck_types::emission::{EmissionSite, EmissionSource};
use bundlecheck_types::finding::FindingCode;
use proptest::prelude::*;
use std::collections::BTreeSet;

/// Strategy to generate a list of unique field names.
fn arb_names() -> impl Strategy<Value = Vec<String>> {
    prop::collection::vec(
        prop::string::string_regex(r"[a-z][a-z0-9_]{0,6}").unwrap(),
        0..8,
    )
    .prop_map(|names| {
        let mut seen = BTreeSet::new();
        names
            .into_iter()
            .filter(|n| seen.insert(n.clone()))
            .collect()
    })
}

fn param(name: &str) -> ParamField {
    ParamField {
        name: name.to_string(),
        field_type: None,
        default: None,
        constraints: serde_json::Map::new(),
        immutable: false,
        required: false,
        schema: serde_json::json!({}),
    }
}

fn conn(name: &str, reference: &str) -> ConnectionDeclaration {
    ConnectionDeclaration {
        field: name.to_string(),
        reference: Some(reference.to_string()),
        required: false,
    }
}

fn definition(name: &str) -> ArtifactDefinition {
    ArtifactDefinition {
        name: name.to_string(),
        path: format!("artifact-definitions/{name}.yaml").into(),
        label: None,
        schema: serde_json::json!({"type": "object"}),
        presentation: PresentationMode::Linkable,
        instructions: vec![],
        exports: vec![],
        provenance: Provenance::AUTHORED,
    }
}

fn site(field: &str) -> EmissionSite {
    EmissionSite {
        field: field.to_string(),
        shape: None,
        path: "src/main.tf".into(),
        line: None,
    }
}

proptest! {
    #[test]
    fn collisions_are_exact_intersection(params in arb_names(), conns in arb_names()) {
        let mut b = BundleConfig::new("b", "bundle.yaml");
        b.params = params.iter().map(|n| param(n)).collect();
        b.connections = conns.iter().map(|n| conn(n, "x")).collect();

        let conn_set: BTreeSet<&str> = conns.iter().map(String::as_str).collect();
        let expected: Vec<&str> = params
            .iter()
            .map(String::as_str)
            .filter(|p| conn_set.contains(p))
            .collect();

        prop_assert_eq!(namespace_collisions(&b), expected);
    }

    #[test]
    fn resolvable_references_never_unresolved(defs in arb_names(), picks in prop::collection::vec(any::<prop::sample::Index>(), 0..6)) {
        prop_assume!(!defs.is_empty());
        let catalog = DefinitionCatalog::from_unique(defs.iter().map(|d| definition(d)));
        let mut b = BundleConfig::new("b", "bundle.yaml");
        b.connections = picks
            .iter()
            .enumerate()
            .map(|(i, idx)| conn(&format!("c{i}"), idx.get::<String>(&defs)))
            .collect();

        let policy = CheckPolicy::default();
        let ctx = CheckContext { catalog: &catalog, policy: &policy };
        let input = BundleInput { config: &b, emissions: &[], emission_source: EmissionSource::None };
        let findings = Validator::new().check_bundle(&ctx, &input);
        prop_assert!(findings.iter().all(|f| f.code != FindingCode::UnresolvedReference));
    }

    #[test]
    fn wiring_diff_is_symmetric_difference(declared in arb_names(), emitted in arb_names()) {
        let sites: Vec<EmissionSite> = emitted.iter().map(|e| site(e)).collect();
        let diff = wiring_diff(declared.iter().map(String::as_str), &sites);

        let emitted_set: BTreeSet<&str> = emitted.iter().map(String::as_str).collect();
        let declared_set: BTreeSet<&str> = declared.iter().map(String::as_str).collect();

        let expected_missing: Vec<&str> = declared
            .iter()
            .map(String::as_str)
            .filter(|d| !emitted_set.contains(d))
            .collect();
        let expected_undeclared: Vec<&str> = emitted
            .iter()
            .map(String::as_str)
            .filter(|e| !declared_set.contains(e))
            .collect();

        prop_assert_eq!(diff.missing, expected_missing);
        let undeclared: Vec<&str> = diff.undeclared.iter().map(|s| s.field.as_str()).collect();
        prop_assert_eq!(undeclared, expected_undeclared);
    }

    #[test]
    fn checking_twice_is_identical(params in arb_names(), conns in arb_names()) {
        let catalog = DefinitionCatalog::from_unique(vec![definition("x")]);
        let mut b = BundleConfig::new("b", "bundle.yaml");
        b.params = params.iter().map(|n| param(n)).collect();
        b.connections = conns.iter().map(|n| conn(n, "missing")).collect();

        let policy = CheckPolicy::default();
        let ctx = CheckContext { catalog: &catalog, policy: &policy };
        let input = BundleInput { config: &b, emissions: &[], emission_source: EmissionSource::None };
        let validator = Validator::new();
        prop_assert_eq!(
            validator.check_bundle(&ctx, &input),
            validator.check_bundle(&ctx, &input)
        );
    }
}
