use camino::Utf8PathBuf;
use serde::{Deserialize, Serialize};

/// A point in a bundle's implementation layer that produces an artifact.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmissionSite {
    pub field: String,

    /// Asserted JSON shape of the emitted value, when the source records one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shape: Option<serde_json::Value>,

    pub path: Utf8PathBuf,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line: Option<u64>,
}

/// Where a bundle's emission sites came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EmissionSource {
    /// An emissions manifest written by an external analysis pass.
    Manifest,
    /// Artifact resource blocks found in implementation files.
    Implementation,
    /// Neither a manifest nor implementation files exist.
    #[default]
    None,
}
