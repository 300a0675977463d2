//! Port traits abstracting all I/O away from the pipeline.

use bundlecheck_loader::{LoadBudget, LoadError, LoadedLayout};
use camino::Utf8Path;

/// Source of bundle configuration.
///
/// Implementations must return records in path order and honour `budget` between files.
pub trait ConfigSource {
    fn load(&self, budget: &LoadBudget) -> Result<LoadedLayout, LoadError>;
}

/// File-system write operations.
pub trait WritePort {
    fn write_file(&self, path: &Utf8Path, contents: &[u8]) -> anyhow::Result<()>;
    fn create_dir_all(&self, path: &Utf8Path) -> anyhow::Result<()>;
}
