//! Listing of a resource tree.

use crate::types::EntryKind;
use crate::types::RelPath;

/// One entry of a [`TreeManifest`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManifestEntry {
    /// Path relative to the tree root.
    pub path: RelPath,

    /// Directory or file.
    pub kind: EntryKind,

    /// Size in bytes, `0` for directories.
    pub size: u64,
}

/// Read-only listing of a resource tree, in walk order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TreeManifest {
    /// Name of the tree root.
    pub root: String,

    /// Entries in walk order, starting with the root.
    pub entries: Vec<ManifestEntry>,

    /// Number of files.
    pub total_files: usize,

    /// Number of directories, including the root.
    pub total_directories: usize,

    /// Sum of all file sizes in bytes.
    pub total_size: u64,
}

impl TreeManifest {
    /// Returns the total number of entries.
    #[must_use]
    pub fn total_entries(&self) -> usize {
        self.entries.len()
    }

    /// Iterates over file entries only.
    pub fn files(&self) -> impl Iterator<Item = &ManifestEntry> {
        self.entries.iter().filter(|e| e.kind.is_file())
    }
}
