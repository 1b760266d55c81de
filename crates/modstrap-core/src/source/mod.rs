//! Read-only resource trees that can be materialized onto disk.
//!
//! A [`ResourceTree`] is handed to the extractor explicitly instead of being
//! looked up from a process-wide constant, so the extractor can be driven by
//! a tree compiled into the binary ([`EmbeddedTree`]) as well as by a
//! synthetic one assembled at runtime ([`MemoryTree`]).
//!
//! # Examples
//!
//! ```
//! use modstrap_core::MemoryTree;
//! use modstrap_core::ResourceTree;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let tree = MemoryTree::new("module")
//!     .with_file("a.yml", "x: 1")
//!     .with_file("sub/b.yml", "y: 2");
//!
//! let paths: Vec<_> = tree.walk()?.into_iter().map(|e| e.path).collect();
//! assert_eq!(paths.len(), 4); // module, module/a.yml, module/sub, module/sub/b.yml
//! # Ok(())
//! # }
//! ```

pub mod embedded;
pub mod memory;

use std::io;
use std::io::Read;
use std::path::Path;
use std::path::PathBuf;

use crate::types::EntryKind;

pub use embedded::EmbeddedTree;
pub use memory::MemoryTree;

/// A single node yielded by [`ResourceTree::walk`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreeEntry {
    /// Path of the node, starting with the tree's root name.
    pub path: PathBuf,

    /// Whether the node is a directory or a file.
    pub kind: EntryKind,

    /// Size in bytes for files, `0` for directories.
    pub size: u64,
}

impl TreeEntry {
    /// Creates a directory entry.
    #[must_use]
    pub fn directory(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            kind: EntryKind::Directory,
            size: 0,
        }
    }

    /// Creates a file entry of `size` bytes.
    #[must_use]
    pub fn file(path: impl Into<PathBuf>, size: u64) -> Self {
        Self {
            path: path.into(),
            kind: EntryKind::File,
            size,
        }
    }

    /// Returns `true` if this entry is a directory.
    #[must_use]
    pub const fn is_dir(&self) -> bool {
        self.kind.is_directory()
    }
}

/// An immutable tree of directories and files.
///
/// Implementations must yield entries from [`walk`](Self::walk) in
/// pre-order: the root directory first, every directory before its
/// children, siblings in lexical byte order of their names. The extractor
/// relies on this to create each directory before writing files into it.
pub trait ResourceTree {
    /// Returns the name of the root directory, e.g. `module`.
    ///
    /// Every path yielded by [`walk`](Self::walk) starts with it.
    fn root(&self) -> &Path;

    /// Lists every node of the tree in pre-order, starting with the root.
    ///
    /// # Errors
    ///
    /// Returns an error if the tree cannot be enumerated.
    fn walk(&self) -> io::Result<Vec<TreeEntry>>;

    /// Opens the file at `path` (as yielded by `walk`) for reading.
    ///
    /// # Errors
    ///
    /// Returns an error if `path` does not name a file in the tree or the
    /// file cannot be read.
    fn open(&self, path: &Path) -> io::Result<Box<dyn Read + '_>>;
}

impl<T: ResourceTree + ?Sized> ResourceTree for &T {
    fn root(&self) -> &Path {
        (**self).root()
    }

    fn walk(&self) -> io::Result<Vec<TreeEntry>> {
        (**self).walk()
    }

    fn open(&self, path: &Path) -> io::Result<Box<dyn Read + '_>> {
        (**self).open(path)
    }
}

/// Error returned by `open` for paths that are not files in the tree.
pub(crate) fn not_a_file(path: &Path) -> io::Error {
    io::Error::new(
        io::ErrorKind::NotFound,
        format!("no file in resource tree at {}", path.display()),
    )
}
