//! YAML → domain conversion.
//!
//! Parsing goes through permissive raw structs so unknown keys never fail a load. Property maps
//! use [`IndexMap`] to keep the order fields were written in.

use crate::error::ConfigLoadError;
use crate::provenance::inspect_provenance;
use bundlecheck_types::bundle::{ArtifactField, BundleConfig, ConnectionDeclaration, ParamField};
use bundlecheck_types::definition::{ArtifactDefinition, Export, Instruction, PresentationMode};
use bundlecheck_types::emission::EmissionSite;
use camino::Utf8Path;
use indexmap::IndexMap;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

/// Schema keywords that describe a param rather than constrain its value.
const ANNOTATION_KEYWORDS: &[&str] = &[
    "type",
    "default",
    "title",
    "description",
    "examples",
    "$md",
];

#[derive(Debug, Deserialize)]
struct RawBundle {
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    params: Option<RawGroup>,
    #[serde(default)]
    connections: Option<RawGroup>,
    #[serde(default)]
    artifacts: Option<RawGroup>,
}

#[derive(Debug, Default, Deserialize)]
struct RawGroup {
    #[serde(default)]
    required: Option<Vec<String>>,
    #[serde(default)]
    properties: Option<IndexMap<String, Value>>,
}

impl RawGroup {
    fn split(self) -> (Vec<String>, IndexMap<String, Value>) {
        (
            self.required.unwrap_or_default(),
            self.properties.unwrap_or_default(),
        )
    }
}

#[derive(Debug, Deserialize)]
struct RawDefinition {
    name: String,
    #[serde(default)]
    label: Option<String>,
    schema: Value,
    #[serde(default)]
    ui: Option<RawUi>,
    #[serde(default)]
    instructions: Option<Vec<Instruction>>,
    #[serde(default)]
    exports: Option<Vec<Export>>,
}

#[derive(Debug, Deserialize)]
struct RawUi {
    #[serde(default)]
    presentation: Option<PresentationMode>,
}

#[derive(Debug, Deserialize)]
struct RawManifest {
    #[serde(default)]
    emissions: Option<Vec<RawEmission>>,
}

#[derive(Debug, Deserialize)]
struct RawEmission {
    field: String,
    #[serde(default)]
    shape: Option<Value>,
    #[serde(default)]
    path: Option<String>,
    #[serde(default)]
    line: Option<u64>,
}

/// Parses a bundle file. `fallback_name` is used when the file declares no `name`.
pub fn parse_bundle(
    path: &Utf8Path,
    fallback_name: &str,
    contents: &str,
) -> Result<BundleConfig, ConfigLoadError> {
    let raw: RawBundle = document(contents)?;

    let name = raw
        .name
        .filter(|n| !n.trim().is_empty())
        .unwrap_or_else(|| fallback_name.to_string());
    let mut bundle = BundleConfig::new(name, path);
    bundle.provenance = inspect_provenance(contents);

    let (required, properties) = raw.params.unwrap_or_default().split();
    for (name, schema) in properties {
        let obj = as_object("params", &name, &schema)?;
        let field_type = obj.get("type").and_then(type_keyword);
        let default = obj.get("default").cloned();
        let immutable = schema
            .pointer("/$md/immutable")
            .and_then(Value::as_bool)
            .unwrap_or(false);
        let constraints = obj
            .iter()
            .filter(|(k, _)| !ANNOTATION_KEYWORDS.contains(&k.as_str()))
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect();
        bundle.params.push(ParamField {
            required: required.contains(&name),
            name,
            field_type,
            default,
            constraints,
            immutable,
            schema,
        });
    }
    bundle.required.params = required;

    let (required, properties) = raw.connections.unwrap_or_default().split();
    for (field, schema) in properties {
        let obj = as_object("connections", &field, &schema)?;
        bundle.connections.push(ConnectionDeclaration {
            reference: ref_name(obj),
            required: required.contains(&field),
            field,
        });
    }
    bundle.required.connections = required;

    let (required, properties) = raw.artifacts.unwrap_or_default().split();
    for (field, schema) in properties {
        let obj = as_object("artifacts", &field, &schema)?;
        let required_fields = obj.get("required").and_then(Value::as_array).map(|arr| {
            arr.iter()
                .filter_map(|v| v.as_str().map(str::to_string))
                .collect()
        });
        bundle.artifacts.push(ArtifactField {
            reference: ref_name(obj),
            required: required.contains(&field),
            required_fields,
            field,
        });
    }
    bundle.required.artifacts = required;

    Ok(bundle)
}

pub fn parse_definition(
    path: &Utf8Path,
    contents: &str,
) -> Result<ArtifactDefinition, ConfigLoadError> {
    let raw: RawDefinition = document(contents)?;

    Ok(ArtifactDefinition {
        name: raw.name,
        path: path.to_path_buf(),
        label: raw.label,
        schema: raw.schema,
        presentation: raw.ui.and_then(|ui| ui.presentation).unwrap_or_default(),
        instructions: raw.instructions.unwrap_or_default(),
        exports: raw.exports.unwrap_or_default(),
        provenance: inspect_provenance(contents),
    })
}

/// Parses an emissions manifest. Entry paths are relative to `bundle_dir`; entries without a
/// path point at the manifest itself.
pub fn parse_emission_manifest(
    path: &Utf8Path,
    bundle_dir: &Utf8Path,
    contents: &str,
) -> Result<Vec<EmissionSite>, ConfigLoadError> {
    let raw: RawManifest = document(contents)?;

    Ok(raw
        .emissions
        .unwrap_or_default()
        .into_iter()
        .map(|e| EmissionSite {
            field: e.field,
            shape: e.shape,
            path: match e.path {
                Some(p) => bundle_dir.join(p),
                None => path.to_path_buf(),
            },
            line: e.line,
        })
        .collect())
}

/// Deserializes one YAML document. An empty or `null` document is malformed.
fn document<T: DeserializeOwned>(contents: &str) -> Result<T, ConfigLoadError> {
    let value: serde_yaml::Value =
        serde_yaml::from_str(contents).map_err(|e| ConfigLoadError::from_yaml(&e))?;
    if value.is_null() {
        return Err(ConfigLoadError::shape("document is empty"));
    }
    serde_yaml::from_str(contents).map_err(|e| ConfigLoadError::from_yaml(&e))
}

fn as_object<'a>(
    group: &str,
    field: &str,
    schema: &'a Value,
) -> Result<&'a serde_json::Map<String, Value>, ConfigLoadError> {
    schema.as_object().ok_or_else(|| {
        ConfigLoadError::shape(format!("{group} property `{field}` must be a mapping"))
    })
}

fn ref_name(obj: &serde_json::Map<String, Value>) -> Option<String> {
    obj.get("$ref")
        .and_then(Value::as_str)
        .map(|s| s.trim().to_string())
}

fn type_keyword(v: &Value) -> Option<String> {
    match v {
        Value::String(s) => Some(s.clone()),
        Value::Array(arr) => {
            let parts: Vec<&str> = arr.iter().filter_map(Value::as_str).collect();
            (!parts.is_empty()).then(|| parts.join("|"))
        }
        _ => None,
    }
}
