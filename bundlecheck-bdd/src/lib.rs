//! BDD harness (cucumber-rs).
//!
//! This crate exists to keep scenario tests isolated from the production crates.
//! Shared layout helpers live here so step definitions stay declarative.

use anyhow::Context;
use camino::{Utf8Path, Utf8PathBuf};
use fs_err as fs;

/// Root of the shared fixture layouts (`tests/fixtures` at the workspace root).
pub fn fixtures_root() -> Utf8PathBuf {
    Utf8PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .parent()
        .map(|p| p.join("tests").join("fixtures"))
        .unwrap_or_else(|| Utf8PathBuf::from("tests/fixtures"))
}

/// Writes `contents` to `root/rel`, creating parent directories.
pub fn write_file(root: &Utf8Path, rel: &str, contents: &str) -> anyhow::Result<()> {
    let path = root.join(rel);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(&path, contents).with_context(|| format!("write {path}"))
}

/// Splits a comma-separated step argument into trimmed, non-empty names.
pub fn name_list(list: &str) -> Vec<String> {
    list.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

/// YAML for a `properties` group whose entries all `$ref` the same definition.
pub fn ref_group(names: &[String], definition: &str) -> String {
    let mut out = String::from("  properties:\n");
    for name in names {
        out.push_str(&format!("    {name}:\n      $ref: {definition}\n"));
    }
    out
}
