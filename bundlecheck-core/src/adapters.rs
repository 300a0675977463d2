//! Default filesystem-backed port implementations.

use crate::ports::{ConfigSource, WritePort};
use anyhow::Context;
use bundlecheck_loader::{LayoutConfig, LoadBudget, LoadError, LoadedLayout};
use camino::{Utf8Path, Utf8PathBuf};

/// Loads configuration from disk via `bundlecheck_loader::load_layout`.
#[derive(Debug, Clone)]
pub struct FsConfigSource {
    pub root: Utf8PathBuf,
    pub layout: LayoutConfig,
}

impl FsConfigSource {
    pub fn new(root: Utf8PathBuf, layout: LayoutConfig) -> Self {
        Self { root, layout }
    }
}

impl ConfigSource for FsConfigSource {
    fn load(&self, budget: &LoadBudget) -> Result<LoadedLayout, LoadError> {
        bundlecheck_loader::load_layout(&self.root, &self.layout, budget)
    }
}

/// In-memory configuration source for embedding and testing.
///
/// Sorts records by path and claims bundle names on construction, as `FsConfigSource` does.
#[derive(Debug, Clone)]
pub struct InMemoryConfigSource {
    layout: LoadedLayout,
}

impl InMemoryConfigSource {
    pub fn new(mut layout: LoadedLayout) -> Self {
        layout.definitions.sort_by(|a, b| a.path.cmp(&b.path));
        layout.bundles.sort_by(|a, b| a.path.cmp(&b.path));
        bundlecheck_loader::claim_bundle_names(&mut layout.bundles);
        Self { layout }
    }
}

impl ConfigSource for InMemoryConfigSource {
    fn load(&self, budget: &LoadBudget) -> Result<LoadedLayout, LoadError> {
        budget.check()?;
        Ok(self.layout.clone())
    }
}

/// Filesystem write operations.
#[derive(Debug, Clone, Default)]
pub struct FsWritePort;

impl WritePort for FsWritePort {
    fn write_file(&self, path: &Utf8Path, contents: &[u8]) -> anyhow::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("create parent dir for {}", path))?;
        }
        std::fs::write(path, contents).with_context(|| format!("write {}", path))
    }

    fn create_dir_all(&self, path: &Utf8Path) -> anyhow::Result<()> {
        std::fs::create_dir_all(path).with_context(|| format!("create_dir_all {}", path))
    }
}
