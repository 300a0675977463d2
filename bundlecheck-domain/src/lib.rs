//! Domain logic: turn a loaded definition catalog and bundle configurations into findings.
//!
//! This crate owns *what* is wrong and where. It does not read files (that's
//! `bundlecheck-loader`) and it does not decide the run verdict (that's `bundlecheck-report`).

mod catalog;
mod checkers;
mod schema;
mod validator;

pub use catalog::check_catalog;
pub use checkers::{
    CheckerMeta, WiringDiff, builtin_checker_metas, namespace_collisions, wiring_diff,
};
pub use validator::{BundleInput, CheckContext, CheckPolicy, Validator};
