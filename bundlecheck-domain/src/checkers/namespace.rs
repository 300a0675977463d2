use crate::checkers::{Checker, CheckerMeta, pointer};
use crate::validator::{BundleInput, CheckContext};
use bundlecheck_types::bundle::BundleConfig;
use bundlecheck_types::finding::{Finding, FindingCode, FindingLocation};
use std::collections::HashSet;

pub struct NamespaceChecker;

impl NamespaceChecker {
    const KEY: &'static str = "bundle.namespace";
    const DESCRIPTION: &'static str =
        "Params and connections share one flat variable namespace; their names must not overlap";
    const CODES: &'static [FindingCode] = &[FindingCode::NamespaceCollision];
}

/// Names declared in both `params` and `connections`, in params declaration order.
pub fn namespace_collisions(bundle: &BundleConfig) -> Vec<&str> {
    let connections: HashSet<&str> = bundle.connection_names().collect();
    let mut seen = HashSet::new();
    bundle
        .param_names()
        .filter(|name| connections.contains(name) && seen.insert(*name))
        .collect()
}

impl Checker for NamespaceChecker {
    fn meta(&self) -> CheckerMeta {
        CheckerMeta {
            key: Self::KEY,
            description: Self::DESCRIPTION,
            codes: Self::CODES,
        }
    }

    fn check(&self, _ctx: &CheckContext<'_>, input: &BundleInput<'_>) -> Vec<Finding> {
        let bundle = input.config;
        namespace_collisions(bundle)
            .into_iter()
            .map(|name| {
                Finding::new(
                    FindingCode::NamespaceCollision,
                    format!(
                        "`{name}` is declared in both params and connections; both project into the same variable namespace"
                    ),
                )
                .at(FindingLocation::pointer(
                    bundle.path.clone(),
                    pointer(&["connections", "properties", name]),
                ))
            })
            .collect()
    }
}
