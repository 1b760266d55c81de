//! High-level public API for materializing resource trees.

use crate::BootstrapConfig;
use crate::MaterializeReport;
use crate::Result;
use crate::bootstrap::Bootstrap;
use crate::report::NoopProgress;
use crate::report::ProgressCallback;
use crate::source::ResourceTree;

/// Materializes a resource tree into the configured destination root.
///
/// The destination root is created if absent, then every directory and
/// file of the tree is written below it. Existing files are overwritten;
/// entries on disk that the tree does not contain are left alone.
///
/// # Arguments
///
/// * `tree` - The resource tree to write out
/// * `config` - Destination root and directory mode
///
/// # Errors
///
/// Returns an error if:
/// - The destination root cannot be created (`Prepare`)
/// - A tree entry cannot be read (`SourceOpen`)
/// - A directory or file cannot be created or written
///
/// Files written before the failure are left in place.
///
/// # Examples
///
/// ```no_run
/// use modstrap_core::BootstrapConfig;
/// use modstrap_core::MemoryTree;
/// use modstrap_core::materialize;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let tree = MemoryTree::new("module").with_file("a.yml", "x: 1");
/// let report = materialize(&tree, &BootstrapConfig::default())?;
/// println!("Wrote {} files", report.files_written);
/// # Ok(())
/// # }
/// ```
pub fn materialize(tree: &dyn ResourceTree, config: &BootstrapConfig) -> Result<MaterializeReport> {
    materialize_with_progress(tree, config, &mut NoopProgress)
}

/// Materializes a resource tree with progress reporting.
///
/// Same as [`materialize`], calling `progress` for every entry.
///
/// # Errors
///
/// Same as [`materialize`].
pub fn materialize_with_progress(
    tree: &dyn ResourceTree,
    config: &BootstrapConfig,
    progress: &mut dyn ProgressCallback,
) -> Result<MaterializeReport> {
    Bootstrap::new(tree, config.clone()).materialize(progress)
}
