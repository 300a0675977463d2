use crate::emissions::scan_artifact_blocks;
use crate::error::{ConfigLoadError, LoadError};
use crate::layout::{LayoutConfig, LoadBudget};
use crate::parse::{parse_bundle, parse_definition, parse_emission_manifest};
use crate::provenance::sha256_hex;
use bundlecheck_types::bundle::BundleConfig;
use bundlecheck_types::definition::ArtifactDefinition;
use bundlecheck_types::emission::{EmissionSite, EmissionSource};
use camino::{Utf8Path, Utf8PathBuf};
use fs_err as fs;
use glob::{Pattern, glob};
use std::collections::HashMap;
use tracing::{debug, warn};

/// A file read during the load phase, with the digest of its bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputRecord {
    pub path: Utf8PathBuf,
    /// `None` when the file could not be read.
    pub sha256: Option<String>,
}

#[derive(Debug, Clone)]
pub struct LoadedDefinition {
    /// Path relative to the layout root.
    pub path: Utf8PathBuf,
    pub definition: Result<ArtifactDefinition, ConfigLoadError>,
}

#[derive(Debug, Clone, Default)]
pub struct LoadedEmissions {
    pub source: EmissionSource,
    pub sites: Vec<EmissionSite>,
}

#[derive(Debug, Clone)]
pub struct LoadedBundle {
    /// Path relative to the layout root.
    pub path: Utf8PathBuf,
    /// Name of the directory holding the bundle file.
    pub bundle_id: String,
    pub config: Result<BundleConfig, ConfigLoadError>,
    /// On failure, carries the emission file that could not be loaded.
    pub emissions: Result<LoadedEmissions, (Utf8PathBuf, ConfigLoadError)>,
}

impl LoadedBundle {
    /// Name the bundle is reported under: its declared name, or the directory name when the
    /// file did not load.
    pub fn report_name(&self) -> &str {
        match &self.config {
            Ok(c) => &c.name,
            Err(ConfigLoadError::DuplicateName { name, .. }) => name,
            Err(_) => &self.bundle_id,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct LoadedLayout {
    pub root: Utf8PathBuf,
    pub definitions: Vec<LoadedDefinition>,
    pub bundles: Vec<LoadedBundle>,
    pub inputs: Vec<InputRecord>,
}

impl LoadedLayout {
    /// Digest over every input path and content digest, independent of read order.
    pub fn input_digest(&self) -> String {
        let mut lines: Vec<String> = self
            .inputs
            .iter()
            .map(|i| format!("{}\0{}\n", i.path, i.sha256.as_deref().unwrap_or("-")))
            .collect();
        lines.sort();
        sha256_hex(lines.concat().as_bytes())
    }

    pub fn definitions_ok(&self) -> impl Iterator<Item = &ArtifactDefinition> {
        self.definitions.iter().filter_map(|d| d.definition.as_ref().ok())
    }
}

/// Loads every definition, bundle, and emission source the layout names under `root`.
///
/// Results are ordered by path. Per-file failures are kept in the returned records; only a
/// broken glob pattern or an exhausted budget returns `Err`.
pub fn load_layout(
    root: &Utf8Path,
    layout: &LayoutConfig,
    budget: &LoadBudget,
) -> Result<LoadedLayout, LoadError> {
    let mut out = LoadedLayout {
        root: root.to_path_buf(),
        ..LoadedLayout::default()
    };

    for abs in glob_sorted(root, &layout.definitions)? {
        budget.check()?;
        let path = relative(root, &abs);
        let definition =
            read_input(&abs, &path, &mut out.inputs).and_then(|s| parse_definition(&path, &s));
        if let Err(e) = &definition {
            debug!(path = %path, error = %e, "artifact definition failed to load");
        }
        out.definitions.push(LoadedDefinition { path, definition });
    }

    for abs in glob_sorted(root, &layout.bundles)? {
        budget.check()?;
        let path = relative(root, &abs);
        let bundle_id = abs
            .parent()
            .and_then(|p| p.file_name())
            .unwrap_or("unknown")
            .to_string();

        let config = read_input(&abs, &path, &mut out.inputs)
            .and_then(|s| parse_bundle(&path, &bundle_id, &s));
        if let Err(e) = &config {
            debug!(path = %path, error = %e, "bundle failed to load");
        }

        let bundle_dir = abs.parent().unwrap_or(root);
        let emissions = load_emissions(root, bundle_dir, layout, budget, &mut out.inputs)?;

        out.bundles.push(LoadedBundle {
            path,
            bundle_id,
            config,
            emissions,
        });
    }

    claim_bundle_names(&mut out.bundles);

    debug!(
        definitions = out.definitions.len(),
        bundles = out.bundles.len(),
        inputs = out.inputs.len(),
        "layout loaded"
    );
    Ok(out)
}

/// Gives each report name to the first bundle in path order. A later bundle that declares a
/// taken name is turned into a [`ConfigLoadError::DuplicateName`] and is not checked.
pub fn claim_bundle_names(bundles: &mut [LoadedBundle]) {
    let mut claimed: HashMap<String, Utf8PathBuf> = HashMap::new();
    for b in bundles.iter_mut() {
        let name = b.report_name().to_string();
        match claimed.get(&name) {
            Some(first) => {
                if b.config.is_ok() {
                    warn!(bundle = %name, path = %b.path, first = %first, "duplicate bundle name");
                    b.config = Err(ConfigLoadError::DuplicateName {
                        name,
                        first: first.clone(),
                    });
                }
            }
            None => {
                claimed.insert(name, b.path.clone());
            }
        }
    }
}

fn load_emissions(
    root: &Utf8Path,
    bundle_dir: &Utf8Path,
    layout: &LayoutConfig,
    budget: &LoadBudget,
    inputs: &mut Vec<InputRecord>,
) -> Result<Result<LoadedEmissions, (Utf8PathBuf, ConfigLoadError)>, LoadError> {
    let rel_dir = relative(root, bundle_dir);

    let manifest = bundle_dir.join(&layout.emissions_manifest);
    if manifest.is_file() {
        budget.check()?;
        let path = relative(root, &manifest);
        let parsed = read_input(&manifest, &path, inputs)
            .and_then(|s| parse_emission_manifest(&path, &rel_dir, &s));
        return Ok(match parsed {
            Ok(sites) => Ok(LoadedEmissions {
                source: EmissionSource::Manifest,
                sites,
            }),
            Err(e) => Err((path, e)),
        });
    }

    let files = glob_sorted(bundle_dir, &layout.implementation)?;
    if files.is_empty() {
        return Ok(Ok(LoadedEmissions::default()));
    }

    let mut sites = Vec::new();
    for abs in files {
        budget.check()?;
        let path = relative(root, &abs);
        match read_input(&abs, &path, inputs) {
            Ok(src) => sites.extend(scan_artifact_blocks(
                &path,
                &src,
                &layout.artifact_resource_types,
            )),
            Err(e) => return Ok(Err((path, e))),
        }
    }

    Ok(Ok(LoadedEmissions {
        source: EmissionSource::Implementation,
        sites,
    }))
}

fn read_input(
    abs: &Utf8Path,
    rel: &Utf8Path,
    inputs: &mut Vec<InputRecord>,
) -> Result<String, ConfigLoadError> {
    match fs::read_to_string(abs) {
        Ok(s) => {
            inputs.push(InputRecord {
                path: rel.to_path_buf(),
                sha256: Some(sha256_hex(s.as_bytes())),
            });
            Ok(s)
        }
        Err(e) => {
            inputs.push(InputRecord {
                path: rel.to_path_buf(),
                sha256: None,
            });
            Err(ConfigLoadError::Io {
                message: e.to_string(),
            })
        }
    }
}

fn glob_sorted(base: &Utf8Path, pattern: &str) -> Result<Vec<Utf8PathBuf>, LoadError> {
    let full = format!("{}/{}", Pattern::escape(base.as_str()), pattern);
    debug!(pattern = %full, "scanning layout");

    let entries = glob(&full).map_err(|e| LoadError::Pattern {
        pattern: pattern.to_string(),
        message: e.to_string(),
    })?;

    let mut out = Vec::new();
    for entry in entries {
        match entry {
            Ok(p) => match Utf8PathBuf::from_path_buf(p) {
                Ok(p) if p.is_file() => out.push(p),
                Ok(_) => {}
                Err(p) => warn!(path = %p.display(), "skipping non-UTF-8 path"),
            },
            Err(e) => warn!(error = %e, "skipping unreadable layout entry"),
        }
    }

    // Deterministic order matters.
    out.sort();
    Ok(out)
}

fn relative(root: &Utf8Path, path: &Utf8Path) -> Utf8PathBuf {
    path.strip_prefix(root)
        .map(Utf8Path::to_path_buf)
        .unwrap_or_else(|_| path.to_path_buf())
}
