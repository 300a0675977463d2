use crate::checkers::{Checker, CheckerMeta, pointer};
use crate::schema;
use crate::validator::{BundleInput, CheckContext};
use bundlecheck_types::bundle::{BundleConfig, ParamField};
use bundlecheck_types::finding::{Finding, FindingCode, FindingLocation};
use std::collections::HashSet;
use tracing::debug;

pub struct FieldChecker;

impl FieldChecker {
    const KEY: &'static str = "bundle.fields";
    const DESCRIPTION: &'static str =
        "Required lists name existing properties and param defaults satisfy their own schema";
    const CODES: &'static [FindingCode] = &[
        FindingCode::UnknownRequiredField,
        FindingCode::InvalidParamDefault,
    ];
}

impl Checker for FieldChecker {
    fn meta(&self) -> CheckerMeta {
        CheckerMeta {
            key: Self::KEY,
            description: Self::DESCRIPTION,
            codes: Self::CODES,
        }
    }

    fn check(&self, _ctx: &CheckContext<'_>, input: &BundleInput<'_>) -> Vec<Finding> {
        let bundle = input.config;
        let mut out = Vec::new();

        unknown_required(
            bundle,
            "params",
            &bundle.required.params,
            bundle.param_names(),
            &mut out,
        );
        unknown_required(
            bundle,
            "connections",
            &bundle.required.connections,
            bundle.connection_names(),
            &mut out,
        );
        unknown_required(
            bundle,
            "artifacts",
            &bundle.required.artifacts,
            bundle.artifact_names(),
            &mut out,
        );

        for param in &bundle.params {
            if let Some(f) = invalid_default(bundle, param) {
                out.push(f);
            }
        }

        out
    }
}

fn unknown_required<'a>(
    bundle: &BundleConfig,
    group: &str,
    required: &[String],
    declared: impl Iterator<Item = &'a str>,
    out: &mut Vec<Finding>,
) {
    let declared: HashSet<&str> = declared.collect();
    let mut seen = HashSet::new();
    for name in required {
        if declared.contains(name.as_str()) || !seen.insert(name.as_str()) {
            continue;
        }
        out.push(
            Finding::new(
                FindingCode::UnknownRequiredField,
                format!("`{name}` is listed in {group}.required but has no property"),
            )
            .at(FindingLocation::pointer(
                bundle.path.clone(),
                pointer(&[group, "required"]),
            )),
        );
    }
}

fn invalid_default(bundle: &BundleConfig, param: &ParamField) -> Option<Finding> {
    let default = param.default.as_ref()?;

    let validator = match schema::compile(&param.schema) {
        Ok(v) => v,
        Err(e) => {
            debug!(
                bundle = %bundle.name,
                param = %param.name,
                error = %e,
                "param schema does not compile; skipping default check"
            );
            return None;
        }
    };

    if validator.is_valid(default) {
        return None;
    }

    Some(
        Finding::new(
            FindingCode::InvalidParamDefault,
            format!(
                "default for param `{}` ({}) does not satisfy its own schema",
                param.name, default
            ),
        )
        .at(FindingLocation::pointer(
            bundle.path.clone(),
            pointer(&["params", "properties", &param.name, "default"]),
        )),
    )
}
