//! Materialization reporting.

use std::path::Path;
use std::path::PathBuf;
use std::time::Duration;

/// Report of a completed materialization.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MaterializeReport {
    /// Destination root the tree was written into.
    pub dest_root: PathBuf,

    /// Number of files written (created or overwritten).
    pub files_written: usize,

    /// Number of directory entries processed, including the root.
    pub directories_created: usize,

    /// Total bytes written to disk.
    pub bytes_written: u64,

    /// Duration of the extraction walk.
    pub duration: Duration,
}

impl MaterializeReport {
    /// Creates a new empty report.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns total number of entries materialized.
    #[must_use]
    pub fn total_items(&self) -> usize {
        self.files_written + self.directories_created
    }
}

/// Callback trait for progress reporting during materialization.
///
/// # Examples
///
/// ```
/// use modstrap_core::ProgressCallback;
/// use std::path::Path;
///
/// struct PrintProgress;
///
/// impl ProgressCallback for PrintProgress {
///     fn on_entry_start(&mut self, path: &Path, total: usize, current: usize) {
///         println!("[{current}/{total}] {}", path.display());
///     }
///
///     fn on_bytes_written(&mut self, _bytes: u64) {}
///
///     fn on_entry_complete(&mut self, _path: &Path) {}
///
///     fn on_complete(&mut self) {
///         println!("done");
///     }
/// }
/// ```
pub trait ProgressCallback: Send {
    /// Called before an entry is materialized.
    ///
    /// # Arguments
    ///
    /// * `path` - Path of the entry inside the resource tree
    /// * `total` - Total number of entries in the tree
    /// * `current` - Current entry number (1-indexed)
    fn on_entry_start(&mut self, path: &Path, total: usize, current: usize);

    /// Called after each chunk of file data is written.
    fn on_bytes_written(&mut self, bytes: u64);

    /// Called when an entry has been materialized.
    fn on_entry_complete(&mut self, path: &Path);

    /// Called once after the whole tree has been materialized.
    fn on_complete(&mut self);
}

/// Progress callback that ignores every event.
#[derive(Debug, Default)]
pub struct NoopProgress;

impl ProgressCallback for NoopProgress {
    fn on_entry_start(&mut self, _path: &Path, _total: usize, _current: usize) {}

    fn on_bytes_written(&mut self, _bytes: u64) {}

    fn on_entry_complete(&mut self, _path: &Path) {}

    fn on_complete(&mut self) {}
}
