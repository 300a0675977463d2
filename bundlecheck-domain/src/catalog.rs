use crate::schema;
use bundlecheck_types::definition::DefinitionCatalog;
use bundlecheck_types::finding::{Finding, FindingCode, FindingLocation};

/// Checks over the definition snapshot itself, in catalog (name) order.
pub fn check_catalog(catalog: &DefinitionCatalog) -> Vec<Finding> {
    let mut out = Vec::new();

    for def in catalog.iter() {
        if let Some(problem) = name_problem(&def.name) {
            out.push(
                Finding::new(
                    FindingCode::InvalidDefinitionName,
                    format!("definition name `{}` {problem}", def.name),
                )
                .at(FindingLocation::pointer(def.path.clone(), "/name")),
            );
        }

        if let Err(e) = schema::compile(&def.schema) {
            out.push(
                Finding::new(
                    FindingCode::InvalidDefinitionSchema,
                    format!("definition `{}` schema is not valid JSON Schema: {e}", def.name),
                )
                .at(FindingLocation::pointer(def.path.clone(), "/schema")),
            );
        }
    }

    out
}

fn name_problem(name: &str) -> Option<&'static str> {
    if name.trim().is_empty() {
        Some("is empty")
    } else if name.contains('@') {
        Some("carries a version suffix; names are referenced bare")
    } else if name.contains('.') {
        Some("carries a file extension; names are referenced bare")
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bundlecheck_types::Provenance;
    use bundlecheck_types::definition::{ArtifactDefinition, PresentationMode};

    fn def(name: &str, schema: serde_json::Value) -> ArtifactDefinition {
        ArtifactDefinition {
            name: name.to_string(),
            path: format!("artifact-definitions/{name}.yaml").into(),
            label: None,
            schema,
            presentation: PresentationMode::Linkable,
            instructions: vec![],
            exports: vec![],
            provenance: Provenance::AUTHORED,
        }
    }

    #[test]
    fn clean_catalog_has_no_findings() {
        let catalog = DefinitionCatalog::from_unique(vec![def(
            "postgres",
            serde_json::json!({"type": "object", "required": ["authentication"]}),
        )]);
        assert!(check_catalog(&catalog).is_empty());
    }

    #[test]
    fn suffixed_names_are_flagged() {
        let catalog = DefinitionCatalog::from_unique(vec![
            def("postgres.yaml", serde_json::json!({})),
            def("redis@2", serde_json::json!({})),
        ]);
        let codes: Vec<_> = check_catalog(&catalog).into_iter().map(|f| f.code).collect();
        assert_eq!(
            codes,
            vec![
                FindingCode::InvalidDefinitionName,
                FindingCode::InvalidDefinitionName
            ]
        );
    }

    #[test]
    fn broken_schema_is_flagged() {
        let catalog = DefinitionCatalog::from_unique(vec![def(
            "postgres",
            serde_json::json!({"type": "not-a-type"}),
        )]);
        let findings = check_catalog(&catalog);
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].code, FindingCode::InvalidDefinitionSchema);
    }

    #[test]
    fn remote_meta_schema_is_flagged_offline() {
        let catalog = DefinitionCatalog::from_unique(vec![def(
            "postgres",
            serde_json::json!({"$schema": "https://example.com/custom-meta", "type": "object"}),
        )]);
        let first = check_catalog(&catalog);
        assert_eq!(first.len(), 1);
        assert_eq!(first[0].code, FindingCode::InvalidDefinitionSchema);
        assert!(first[0].message.contains("https://example.com/custom-meta"));
        assert!(!first[0].message.contains("error sending request"));
        assert_eq!(first, check_catalog(&catalog));
    }

    #[test]
    fn remote_ref_in_schema_is_flagged_offline() {
        let catalog = DefinitionCatalog::from_unique(vec![def(
            "postgres",
            serde_json::json!({"$ref": "https://example.com/schemas/postgres.json"}),
        )]);
        let findings = check_catalog(&catalog);
        assert_eq!(findings.len(), 1);
        assert!(findings[0].message.contains("not available offline"));
    }
}
