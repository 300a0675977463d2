//! Embeddable core library for bundlecheck.
//!
//! Provides a clap-free, I/O-abstracted entry point suitable for linking
//! into a CI runner, an editor integration, or another host process.
//!
//! # Port traits
//!
//! All I/O is abstracted behind port traits in [`ports`]:
//! - [`ConfigSource`](ports::ConfigSource): load bundles, definitions, and emission sites
//! - [`WritePort`](ports::WritePort): write files and create directories
//!
//! The [`adapters`] module provides filesystem-backed and in-memory implementations.
//!
//! # Entry points
//!
//! - [`run_validate`](pipeline::run_validate): load, check, and seal a report
//! - [`write_report_artifacts`](pipeline::write_report_artifacts): persist `report.json` / `report.md`

pub mod adapters;
pub mod cancel;
pub mod pipeline;
pub mod ports;
pub mod settings;

pub use cancel::CancelToken;

// Re-export so embedders don't need the leaf crates directly.
pub use bundlecheck_domain::CheckPolicy;
pub use bundlecheck_loader::{LayoutConfig, LoadedLayout};
pub use bundlecheck_report::ValidationReport;
