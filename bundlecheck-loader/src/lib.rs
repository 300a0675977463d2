//! Configuration ingestion for bundlecheck.
//!
//! The loader walks a layout (bundles, artifact definitions, emission sources), parses every file
//! it finds, and hands back per-file results. A file that fails to parse is recorded, not fatal:
//! the pipeline turns it into a finding and keeps checking everything else. Only ambiguity that
//! makes every later check unsafe (duplicate definition names) or an exhausted load budget stop
//! the run.

mod catalog;
mod emissions;
mod error;
mod findings;
mod layout;
mod load;
mod parse;
mod provenance;

pub use catalog::build_catalog;
pub use emissions::scan_artifact_blocks;
pub use error::{ConfigLoadError, LoadError};
pub use findings::{load_error_finding, load_findings};
pub use layout::{LayoutConfig, LoadBudget};
pub use load::{
    InputRecord, LoadedBundle, LoadedDefinition, LoadedEmissions, LoadedLayout,
    claim_bundle_names, load_layout,
};
pub use parse::{parse_bundle, parse_definition, parse_emission_manifest};
pub use provenance::{GENERATED_MARKER, inspect_provenance, sha256_hex};
