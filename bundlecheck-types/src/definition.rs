use crate::Provenance;
use camino::Utf8PathBuf;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A named schema describing data exchanged between bundles.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArtifactDefinition {
    pub name: String,

    pub path: Utf8PathBuf,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,

    pub schema: serde_json::Value,

    #[serde(default)]
    pub presentation: PresentationMode,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub instructions: Vec<Instruction>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub exports: Vec<Export>,

    #[serde(default)]
    pub provenance: Provenance,
}

impl ArtifactDefinition {
    /// Top-level `required` list of the definition schema, in declared order.
    pub fn required_fields(&self) -> Vec<String> {
        self.schema
            .get("required")
            .and_then(|r| r.as_array())
            .map(|arr| {
                arr.iter()
                    .filter_map(|v| v.as_str().map(str::to_string))
                    .collect()
            })
            .unwrap_or_default()
    }
}

/// How the platform UI offers artifacts of this definition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PresentationMode {
    /// Artifacts can be linked between bundles on a canvas.
    #[default]
    Linkable,
    /// Artifacts are only supplied as environment defaults.
    EnvironmentDefaultOnly,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Instruction {
    pub label: String,
    pub path: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Export {
    pub file_format: String,
    pub template_path: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

/// Immutable snapshot of every artifact definition available to one validation run.
///
/// Built once by the loader and shared read-only by all checks.
#[derive(Debug, Clone, Default)]
pub struct DefinitionCatalog {
    definitions: BTreeMap<String, ArtifactDefinition>,
}

/// Outcome of looking a bare definition name up in a [`DefinitionCatalog`].
#[derive(Debug, Clone, Copy)]
pub enum Reference<'a> {
    Unresolved(&'a str),
    Resolved(&'a ArtifactDefinition),
}

impl Reference<'_> {
    pub fn is_resolved(&self) -> bool {
        matches!(self, Reference::Resolved(_))
    }
}

impl DefinitionCatalog {
    /// Builds a catalog from definitions whose names are already known to be unique.
    ///
    /// Later entries with a repeated name replace earlier ones; the loader rejects duplicates
    /// before calling this.
    pub fn from_unique(definitions: impl IntoIterator<Item = ArtifactDefinition>) -> Self {
        let definitions = definitions
            .into_iter()
            .map(|d| (d.name.clone(), d))
            .collect();
        Self { definitions }
    }

    pub fn get(&self, name: &str) -> Option<&ArtifactDefinition> {
        self.definitions.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.definitions.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.definitions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }

    /// Definitions in name order.
    pub fn iter(&self) -> impl Iterator<Item = &ArtifactDefinition> {
        self.definitions.values()
    }

    /// Resolves a bare name. Names are matched verbatim.
    pub fn resolve<'a>(&'a self, name: &'a str) -> Reference<'a> {
        match self.definitions.get(name) {
            Some(def) => Reference::Resolved(def),
            None => Reference::Unresolved(name),
        }
    }

    /// Returns the catalog name `name` would match once a file extension or version
    /// suffix is stripped, if any.
    pub fn bare_name_hint(&self, name: &str) -> Option<&str> {
        let stripped = strip_suffixes(name);
        if stripped == name {
            return None;
        }
        self.definitions
            .get_key_value(stripped)
            .map(|(k, _)| k.as_str())
    }
}

fn strip_suffixes(name: &str) -> &str {
    let name = name.split('@').next().unwrap_or(name);
    for ext in [".yaml", ".yml", ".json"] {
        if let Some(stem) = name.strip_suffix(ext) {
            return stem;
        }
    }
    name
}
