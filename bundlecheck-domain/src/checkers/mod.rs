use crate::validator::{BundleInput, CheckContext};
use bundlecheck_types::finding::{Finding, FindingCode};

mod fields;
mod namespace;
mod references;
mod wiring;

pub use namespace::namespace_collisions;
pub use wiring::{WiringDiff, wiring_diff};

/// Static description of a checker, used by `explain` and report capabilities.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CheckerMeta {
    pub key: &'static str,
    pub description: &'static str,
    pub codes: &'static [FindingCode],
}

/// A per-bundle check. Implementations are pure: same inputs, same findings, same order.
pub trait Checker: Send + Sync {
    fn meta(&self) -> CheckerMeta;

    fn check(&self, ctx: &CheckContext<'_>, input: &BundleInput<'_>) -> Vec<Finding>;
}

/// Built-in checkers in report order.
pub fn builtin_checkers() -> Vec<Box<dyn Checker>> {
    vec![
        Box::new(namespace::NamespaceChecker),
        Box::new(references::ReferenceResolver),
        Box::new(wiring::ArtifactWiringChecker),
        Box::new(fields::FieldChecker),
    ]
}

pub fn builtin_checker_metas() -> Vec<CheckerMeta> {
    builtin_checkers().iter().map(|c| c.meta()).collect()
}

/// Builds a JSON pointer from unescaped segments.
pub(crate) fn pointer(segments: &[&str]) -> String {
    let mut out = String::new();
    for seg in segments {
        out.push('/');
        out.push_str(&seg.replace('~', "~0").replace('/', "~1"));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pointer_escapes_segments() {
        assert_eq!(
            pointer(&["connections", "properties", "a/b~c"]),
            "/connections/properties/a~1b~0c"
        );
    }

    #[test]
    fn checker_keys_are_unique() {
        let metas = builtin_checker_metas();
        let mut keys: Vec<_> = metas.iter().map(|m| m.key).collect();
        keys.sort();
        keys.dedup();
        assert_eq!(keys.len(), metas.len());
    }
}
