use crate::Provenance;
use camino::Utf8PathBuf;
use serde::{Deserialize, Serialize};

/// A parsed bundle configuration.
///
/// Every field list keeps the order in which fields were declared in the source file.
/// Checkers rely on that order for reproducible finding output.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BundleConfig {
    pub name: String,

    /// File the bundle was loaded from.
    pub path: Utf8PathBuf,

    #[serde(default)]
    pub params: Vec<ParamField>,

    #[serde(default)]
    pub connections: Vec<ConnectionDeclaration>,

    #[serde(default)]
    pub artifacts: Vec<ArtifactField>,

    /// Names listed in the `required` arrays of each group, verbatim.
    #[serde(default)]
    pub required: RequiredLists,

    #[serde(default)]
    pub provenance: Provenance,
}

impl BundleConfig {
    pub fn new(name: impl Into<String>, path: impl Into<Utf8PathBuf>) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
            params: vec![],
            connections: vec![],
            artifacts: vec![],
            required: RequiredLists::default(),
            provenance: Provenance::default(),
        }
    }

    pub fn param_names(&self) -> impl Iterator<Item = &str> {
        self.params.iter().map(|p| p.name.as_str())
    }

    pub fn connection_names(&self) -> impl Iterator<Item = &str> {
        self.connections.iter().map(|c| c.field.as_str())
    }

    pub fn artifact_names(&self) -> impl Iterator<Item = &str> {
        self.artifacts.iter().map(|a| a.field.as_str())
    }
}

/// Raw `required` arrays, kept so inconsistencies with `properties` can be reported.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequiredLists {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub params: Vec<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub connections: Vec<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub artifacts: Vec<String>,
}

/// An input field.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParamField {
    pub name: String,

    /// JSON-schema `type` keyword, when declared.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub field_type: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<serde_json::Value>,

    /// Remaining JSON-schema keywords (`enum`, `minimum`, `pattern`, ...).
    #[serde(default, skip_serializing_if = "serde_json::Map::is_empty")]
    pub constraints: serde_json::Map<String, serde_json::Value>,

    /// Field cannot change after first deploy.
    #[serde(default)]
    pub immutable: bool,

    #[serde(default)]
    pub required: bool,

    /// The full property schema as written.
    pub schema: serde_json::Value,
}

/// A bundle's dependency on an artifact of a given definition type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConnectionDeclaration {
    pub field: String,

    /// Bare definition name from `$ref`; `None` when the property declares no `$ref`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reference: Option<String>,

    pub required: bool,
}

/// A declared output field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArtifactField {
    pub field: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reference: Option<String>,

    pub required: bool,

    /// Top-level `required` list asserted next to the `$ref`, when present.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub required_fields: Option<Vec<String>>,
}
