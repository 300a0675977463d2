use camino::Utf8PathBuf;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Finding severity. Ordered so that `Error` ranks highest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Info,
    Warning,
    Error,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Info => "info",
            Severity::Warning => "warning",
            Severity::Error => "error",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Phase of a run that produces a given code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    Load,
    Catalog,
    Check,
}

/// Stable finding codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FindingCode {
    MalformedConfig,
    DuplicateDefinition,
    DuplicateBundleName,
    LoadTimeout,
    GeneratedFileModified,
    InvalidDefinitionName,
    InvalidDefinitionSchema,
    NamespaceCollision,
    UnresolvedReference,
    SchemaShapeMismatch,
    MissingEmission,
    UndeclaredEmission,
    UnknownRequiredField,
    InvalidParamDefault,
}

impl FindingCode {
    pub const ALL: &'static [FindingCode] = &[
        FindingCode::MalformedConfig,
        FindingCode::DuplicateDefinition,
        FindingCode::DuplicateBundleName,
        FindingCode::LoadTimeout,
        FindingCode::GeneratedFileModified,
        FindingCode::InvalidDefinitionName,
        FindingCode::InvalidDefinitionSchema,
        FindingCode::NamespaceCollision,
        FindingCode::UnresolvedReference,
        FindingCode::SchemaShapeMismatch,
        FindingCode::MissingEmission,
        FindingCode::UndeclaredEmission,
        FindingCode::UnknownRequiredField,
        FindingCode::InvalidParamDefault,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            FindingCode::MalformedConfig => "MALFORMED_CONFIG",
            FindingCode::DuplicateDefinition => "DUPLICATE_DEFINITION",
            FindingCode::DuplicateBundleName => "DUPLICATE_BUNDLE_NAME",
            FindingCode::LoadTimeout => "LOAD_TIMEOUT",
            FindingCode::GeneratedFileModified => "GENERATED_FILE_MODIFIED",
            FindingCode::InvalidDefinitionName => "INVALID_DEFINITION_NAME",
            FindingCode::InvalidDefinitionSchema => "INVALID_DEFINITION_SCHEMA",
            FindingCode::NamespaceCollision => "NAMESPACE_COLLISION",
            FindingCode::UnresolvedReference => "UNRESOLVED_REFERENCE",
            FindingCode::SchemaShapeMismatch => "SCHEMA_SHAPE_MISMATCH",
            FindingCode::MissingEmission => "MISSING_EMISSION",
            FindingCode::UndeclaredEmission => "UNDECLARED_EMISSION",
            FindingCode::UnknownRequiredField => "UNKNOWN_REQUIRED_FIELD",
            FindingCode::InvalidParamDefault => "INVALID_PARAM_DEFAULT",
        }
    }

    /// Case-insensitive lookup; accepts `-` in place of `_`.
    pub fn parse(s: &str) -> Option<FindingCode> {
        let wanted = s.trim().replace('-', "_").to_ascii_uppercase();
        Self::ALL.iter().copied().find(|c| c.as_str() == wanted)
    }

    pub fn default_severity(&self) -> Severity {
        match self {
            FindingCode::GeneratedFileModified
            | FindingCode::SchemaShapeMismatch
            | FindingCode::InvalidParamDefault => Severity::Warning,
            _ => Severity::Error,
        }
    }

    pub fn phase(&self) -> Phase {
        match self {
            FindingCode::MalformedConfig
            | FindingCode::DuplicateDefinition
            | FindingCode::DuplicateBundleName
            | FindingCode::LoadTimeout
            | FindingCode::GeneratedFileModified => Phase::Load,
            FindingCode::InvalidDefinitionName | FindingCode::InvalidDefinitionSchema => {
                Phase::Catalog
            }
            _ => Phase::Check,
        }
    }
}

impl fmt::Display for FindingCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Where a finding points.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FindingLocation {
    pub path: Utf8PathBuf,

    /// JSON pointer into the configuration document, e.g. `/connections/properties/network`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pointer: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line: Option<u64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub column: Option<u64>,
}

impl FindingLocation {
    pub fn file(path: impl Into<Utf8PathBuf>) -> Self {
        Self {
            path: path.into(),
            pointer: None,
            line: None,
            column: None,
        }
    }

    pub fn pointer(path: impl Into<Utf8PathBuf>, pointer: impl Into<String>) -> Self {
        Self {
            pointer: Some(pointer.into()),
            ..Self::file(path)
        }
    }

    pub fn with_line(mut self, line: Option<u64>, column: Option<u64>) -> Self {
        self.line = line;
        self.column = column;
        self
    }
}

impl fmt::Display for FindingLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.path)?;
        if let Some(line) = self.line {
            write!(f, ":{}", line)?;
            if let Some(col) = self.column {
                write!(f, ":{}", col)?;
            }
        }
        if let Some(ptr) = &self.pointer {
            write!(f, "#{}", ptr)?;
        }
        Ok(())
    }
}

/// One validation finding. Created during a pass and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Finding {
    pub severity: Severity,
    pub code: FindingCode,
    pub message: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<FindingLocation>,

    /// Bundle the finding belongs to; `None` for run-level findings.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bundle: Option<String>,
}

impl Finding {
    /// A finding at the code's default severity.
    pub fn new(code: FindingCode, message: impl Into<String>) -> Self {
        Self {
            severity: code.default_severity(),
            code,
            message: message.into(),
            location: None,
            bundle: None,
        }
    }

    pub fn with_severity(mut self, severity: Severity) -> Self {
        self.severity = severity;
        self
    }

    pub fn at(mut self, location: FindingLocation) -> Self {
        self.location = Some(location);
        self
    }

    pub fn in_bundle(mut self, bundle: impl Into<String>) -> Self {
        self.bundle = Some(bundle.into());
        self
    }

    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn severity_ranks_error_highest() {
        assert!(Severity::Error > Severity::Warning);
        assert!(Severity::Warning > Severity::Info);
    }

    #[test]
    fn code_as_str_matches_serde() {
        for code in FindingCode::ALL {
            let v = serde_json::to_value(code).expect("serialize");
            assert_eq!(v, serde_json::json!(code.as_str()));
        }
    }

    #[test]
    fn parse_accepts_kebab_and_lowercase() {
        assert_eq!(
            FindingCode::parse("namespace-collision"),
            Some(FindingCode::NamespaceCollision)
        );
        assert_eq!(
            FindingCode::parse("MISSING_EMISSION"),
            Some(FindingCode::MissingEmission)
        );
        assert_eq!(FindingCode::parse("nope"), None);
    }

    #[test]
    fn location_display_includes_line_and_pointer() {
        let loc = FindingLocation::pointer("bundles/db/bundle.yaml", "/params")
            .with_line(Some(3), Some(7));
        assert_eq!(loc.to_string(), "bundles/db/bundle.yaml:3:7#/params");
    }
}
