use crate::error::LoadError;
use serde::Deserialize;
use std::time::{Duration, Instant};

/// Filesystem layout convention. Patterns are relative to the layout root, except
/// `emissions_manifest` and `implementation`, which are relative to each bundle's directory.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    pub bundles: String,
    pub definitions: String,
    pub emissions_manifest: String,
    pub implementation: String,

    /// Resource types in implementation files that emit artifacts.
    pub artifact_resource_types: Vec<String>,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            bundles: "bundles/*/bundle.yaml".to_string(),
            definitions: "artifact-definitions/*.yaml".to_string(),
            emissions_manifest: "emissions.yaml".to_string(),
            implementation: "src/**/*.tf".to_string(),
            artifact_resource_types: vec!["massdriver_artifact".to_string()],
        }
    }
}

/// Wall-clock budget for the load phase.
#[derive(Debug, Clone, Copy)]
pub struct LoadBudget {
    started: Instant,
    limit: Option<Duration>,
}

impl LoadBudget {
    pub fn new(limit: Option<Duration>) -> Self {
        Self {
            started: Instant::now(),
            limit,
        }
    }

    pub fn unlimited() -> Self {
        Self::new(None)
    }

    pub fn check(&self) -> Result<(), LoadError> {
        match self.limit {
            Some(limit) if self.started.elapsed() >= limit => Err(LoadError::Timeout {
                limit_ms: limit.as_millis() as u64,
            }),
            _ => Ok(()),
        }
    }
}
