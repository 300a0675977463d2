use crate::checkers::{Checker, CheckerMeta, pointer};
use crate::validator::{BundleInput, CheckContext};
use bundlecheck_types::bundle::BundleConfig;
use bundlecheck_types::definition::{ArtifactDefinition, DefinitionCatalog, Reference};
use bundlecheck_types::finding::{Finding, FindingCode, FindingLocation};
use std::collections::BTreeSet;

pub struct ReferenceResolver;

impl ReferenceResolver {
    const KEY: &'static str = "bundle.references";
    const DESCRIPTION: &'static str =
        "Every connection and artifact `$ref` must name an existing artifact definition";
    const CODES: &'static [FindingCode] = &[
        FindingCode::UnresolvedReference,
        FindingCode::SchemaShapeMismatch,
    ];
}

impl Checker for ReferenceResolver {
    fn meta(&self) -> CheckerMeta {
        CheckerMeta {
            key: Self::KEY,
            description: Self::DESCRIPTION,
            codes: Self::CODES,
        }
    }

    fn check(&self, ctx: &CheckContext<'_>, input: &BundleInput<'_>) -> Vec<Finding> {
        let bundle = input.config;
        let mut out = Vec::new();

        for conn in &bundle.connections {
            if let Err(f) = resolve_one(
                ctx.catalog,
                bundle,
                "connections",
                "connection",
                &conn.field,
                conn.reference.as_deref(),
            ) {
                out.push(f);
            }
        }

        for art in &bundle.artifacts {
            let resolved = resolve_one(
                ctx.catalog,
                bundle,
                "artifacts",
                "artifact",
                &art.field,
                art.reference.as_deref(),
            );
            let def = match resolved {
                Ok(def) => def,
                Err(f) => {
                    out.push(f);
                    continue;
                }
            };

            let Some(asserted) = &art.required_fields else {
                continue;
            };
            let declared: BTreeSet<&str> = asserted.iter().map(String::as_str).collect();
            let expected_fields = def.required_fields();
            let expected: BTreeSet<&str> = expected_fields.iter().map(String::as_str).collect();
            if declared == expected {
                continue;
            }

            let only_artifact: Vec<&str> = declared.difference(&expected).copied().collect();
            let only_definition: Vec<&str> = expected.difference(&declared).copied().collect();
            out.push(
                Finding::new(
                    FindingCode::SchemaShapeMismatch,
                    format!(
                        "artifact `{}` required fields differ from definition `{}`: only in artifact [{}]; only in definition [{}]",
                        art.field,
                        def.name,
                        only_artifact.join(", "),
                        only_definition.join(", "),
                    ),
                )
                .with_severity(ctx.policy.shape_mismatch)
                .at(FindingLocation::pointer(
                    bundle.path.clone(),
                    pointer(&["artifacts", "properties", &art.field, "required"]),
                )),
            );
        }

        out
    }
}

fn resolve_one<'a>(
    catalog: &'a DefinitionCatalog,
    bundle: &BundleConfig,
    group: &str,
    kind: &str,
    field: &str,
    reference: Option<&'a str>,
) -> Result<&'a ArtifactDefinition, Finding> {
    let Some(name) = reference else {
        return Err(Finding::new(
            FindingCode::UnresolvedReference,
            format!("{kind} `{field}` declares no `$ref` to an artifact definition"),
        )
        .at(FindingLocation::pointer(
            bundle.path.clone(),
            pointer(&[group, "properties", field]),
        )));
    };

    match catalog.resolve(name) {
        Reference::Resolved(def) => Ok(def),
        Reference::Unresolved(missing) => {
            let mut message =
                format!("{kind} `{field}` references unknown artifact definition `{missing}`");
            if let Some(bare) = catalog.bare_name_hint(missing) {
                message.push_str(&format!(
                    "; definitions are referenced by bare name, use `{bare}`"
                ));
            }
            Err(Finding::new(FindingCode::UnresolvedReference, message).at(
                FindingLocation::pointer(
                    bundle.path.clone(),
                    pointer(&[group, "properties", field, "$ref"]),
                ),
            ))
        }
    }
}
