//! Finding explanations for the `bundlecheck explain` command.
//!
//! Each entry says what the code means, which phase raises it, and how to fix the input.

use bundlecheck_types::finding::{FindingCode, Phase};

/// Information about one finding code.
#[derive(Debug, Clone)]
pub struct CodeExplanation {
    pub code: FindingCode,
    /// Human-readable title.
    pub title: &'static str,
    /// What the check looks at and when it fires.
    pub description: &'static str,
    /// How to make the finding go away.
    pub remediation: &'static str,
}

/// Registry of all finding explanations, in code order.
pub static CODE_REGISTRY: &[CodeExplanation] = &[
    CodeExplanation {
        code: FindingCode::MalformedConfig,
        title: "Malformed configuration file",
        description: r#"A bundle file, artifact definition, or emissions manifest could not be
parsed, or parsed into the wrong shape (for example a property that is a list
instead of a mapping).

Only the offending file is skipped. Every other file is still loaded and
checked, and the report is marked partial."#,
        remediation: r#"Open the file at the reported line and column and fix the YAML syntax or
structure. Property entries under `params`, `connections` and `artifacts` must
be mappings."#,
    },
    CodeExplanation {
        code: FindingCode::DuplicateDefinition,
        title: "Duplicate artifact definition",
        description: r#"Two artifact definition files declare the same `name`. References cannot be
resolved unambiguously, so the run stops after loading and the report holds
only this finding."#,
        remediation: r#"Rename or delete one of the two definitions. The finding points at the second
file in path order; the message names the first."#,
    },
    CodeExplanation {
        code: FindingCode::DuplicateBundleName,
        title: "Duplicate bundle name",
        description: r#"Two bundle files declare the same `name` (or one falls back to a directory
name another declares). The first file in path order keeps the name and is
checked. The later file is skipped and its findings are reported at run level,
so no two bundles share a report entry."#,
        remediation: r#"Give each bundle a unique `name`. The finding points at the later file; the
message names the file that kept the name."#,
    },
    CodeExplanation {
        code: FindingCode::LoadTimeout,
        title: "Load phase timed out",
        description: r#"Loading the layout took longer than the configured limit. No checks run and
the report holds only this finding."#,
        remediation: r#"Raise `[run] load_timeout_secs` in bundlecheck.toml or pass
`--load-timeout-secs`. `0` disables the limit. Narrow the layout globs if they
match far more files than intended."#,
    },
    CodeExplanation {
        code: FindingCode::GeneratedFileModified,
        title: "Generated file was edited",
        description: r#"A file starts with the `# @generated sha256:<digest>` marker but its content
no longer matches the recorded digest. The file is still loaded, but its
content is not what the generator produced."#,
        remediation: r#"Regenerate the file from its source, or delete the marker line if the file is
now maintained by hand."#,
    },
    CodeExplanation {
        code: FindingCode::InvalidDefinitionName,
        title: "Invalid artifact definition name",
        description: r#"An artifact definition name is empty or contains `@` or `.`. Such names
cannot be referenced from a bundle's `$ref`."#,
        remediation: r#"Use a bare name such as `postgres` or `aws-vpc`."#,
    },
    CodeExplanation {
        code: FindingCode::InvalidDefinitionSchema,
        title: "Invalid artifact definition schema",
        description: r#"The `schema` of an artifact definition is not a valid JSON Schema document.
Bundles that reference it may still resolve, but shape comparisons against it
are unreliable."#,
        remediation: r#"Fix the schema so it validates against the JSON Schema meta-schema."#,
    },
    CodeExplanation {
        code: FindingCode::NamespaceCollision,
        title: "Param and connection share a name",
        description: r#"A bundle declares the same name under `params` and `connections`. Both are
passed to the implementation as top-level inputs, so one silently shadows the
other."#,
        remediation: r#"Rename either the param or the connection."#,
    },
    CodeExplanation {
        code: FindingCode::UnresolvedReference,
        title: "Unresolved artifact reference",
        description: r#"A connection or artifact `$ref` names an artifact definition that does not
exist, or declares no `$ref` at all."#,
        remediation: r#"Add the missing artifact definition, or fix the `$ref`. References are bare
definition names; when the message suggests a bare name, drop the
organisation prefix or version suffix."#,
    },
    CodeExplanation {
        code: FindingCode::SchemaShapeMismatch,
        title: "Artifact shape disagrees with its definition",
        description: r#"An artifact property lists `required` fields that differ from the `required`
fields of the definition it references.

Severity is `warning` by default and can be raised to `error` with
`[policy] shape_mismatch = "error"` or `--shape-mismatch error`."#,
        remediation: r#"Align the artifact's `required` list with the definition's schema, or drop the
local list and rely on the definition."#,
    },
    CodeExplanation {
        code: FindingCode::MissingEmission,
        title: "Declared artifact is never emitted",
        description: r#"A bundle declares an artifact that no emission site produces. Consumers wired
to it would never receive a value."#,
        remediation: r#"Emit the artifact from the implementation (an artifact resource with a
matching `field`), record it in the emissions manifest, or remove the
declaration."#,
    },
    CodeExplanation {
        code: FindingCode::UndeclaredEmission,
        title: "Emitted artifact is not declared",
        description: r#"The implementation emits an artifact field that the bundle's `artifacts`
section does not declare."#,
        remediation: r#"Declare the artifact under `artifacts.properties` with a `$ref`, or stop
emitting it."#,
    },
    CodeExplanation {
        code: FindingCode::UnknownRequiredField,
        title: "Required list names an unknown field",
        description: r#"A `required` list under `params`, `connections` or `artifacts` names a field
that is not declared in the same section's `properties`."#,
        remediation: r#"Remove the name from `required`, or declare the property."#,
    },
    CodeExplanation {
        code: FindingCode::InvalidParamDefault,
        title: "Param default fails its own schema",
        description: r#"A param's `default` value does not validate against the param's schema."#,
        remediation: r#"Change the default so it satisfies the param's type and constraints."#,
    },
];

/// Look up a code, accepting any case and `-` in place of `_`.
pub fn lookup_code(query: &str) -> Option<&'static CodeExplanation> {
    let code = FindingCode::parse(query)?;
    CODE_REGISTRY.iter().find(|e| e.code == code)
}

/// List all finding codes.
pub fn list_codes() -> Vec<&'static str> {
    CODE_REGISTRY.iter().map(|e| e.code.as_str()).collect()
}

pub fn format_phase(phase: Phase) -> &'static str {
    match phase {
        Phase::Load => "load",
        Phase::Catalog => "catalog",
        Phase::Check => "check",
    }
}

/// What a finding in the given phase does to the run.
pub fn phase_meaning(phase: Phase) -> &'static str {
    match phase {
        Phase::Load => {
            "LOAD findings are raised while reading files.\n\
             Errors make the run exit 3 (load failure)."
        }
        Phase::Catalog => {
            "CATALOG findings are raised once per run against the artifact definitions.\n\
             Errors make the run exit 2 (check failure)."
        }
        Phase::Check => {
            "CHECK findings are raised per bundle.\n\
             Errors make the run exit 2 (check failure)."
        }
    }
}
