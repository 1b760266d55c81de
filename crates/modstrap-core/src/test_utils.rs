//! Test utilities for building resource trees.
//!
//! Shared by unit tests, integration tests, and benchmarks so that tree
//! shapes are described the same way everywhere.
//!
//! # Panics
//!
//! Helpers here may panic on I/O errors since they are meant for tests
//! only.

#![allow(clippy::unwrap_used, clippy::missing_panics_doc)]

use std::fs;
use std::path::Path;

use crate::source::MemoryTree;

/// Name of the root directory used by test trees.
pub const TEST_ROOT: &str = "module";

/// Returns the two-file tree `{a.yml: "x: 1", sub/b.yml: "y: 2"}`.
///
/// # Examples
///
/// ```
/// use modstrap_core::test_utils::scenario_tree;
///
/// let tree = scenario_tree();
/// assert_eq!(tree.file_count(), 2);
/// ```
#[must_use]
pub fn scenario_tree() -> MemoryTree {
    TreeBuilder::new()
        .add_file("a.yml", b"x: 1")
        .add_file("sub/b.yml", b"y: 2")
        .build()
}

/// Builder for in-memory test trees.
///
/// # Examples
///
/// ```
/// use modstrap_core::test_utils::TreeBuilder;
///
/// let tree = TreeBuilder::new()
///     .add_file("file.yml", b"content")
///     .add_directory("empty")
///     .add_many_files("many", 10)
///     .build();
/// assert_eq!(tree.file_count(), 11);
/// ```
#[derive(Debug)]
pub struct TreeBuilder {
    tree: MemoryTree,
}

impl Default for TreeBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl TreeBuilder {
    /// Creates a builder for a tree rooted at [`TEST_ROOT`].
    #[must_use]
    pub fn new() -> Self {
        Self::with_root(TEST_ROOT)
    }

    /// Creates a builder for a tree with a custom root name.
    #[must_use]
    pub fn with_root(root: &str) -> Self {
        Self {
            tree: MemoryTree::new(root),
        }
    }

    /// Adds a file.
    #[must_use]
    pub fn add_file(mut self, path: &str, data: &[u8]) -> Self {
        self.tree.insert_file(path, data);
        self
    }

    /// Adds an empty directory.
    #[must_use]
    pub fn add_directory(mut self, path: &str) -> Self {
        self.tree.insert_dir(path);
        self
    }

    /// Adds `count` small files named `fileNNNN.yml` below `dir`.
    #[must_use]
    pub fn add_many_files(mut self, dir: &str, count: usize) -> Self {
        for i in 0..count {
            let path = format!("{dir}/file{i:04}.yml");
            self.tree.insert_file(path, format!("value: {i}\n"));
        }
        self
    }

    /// Adds a chain of `depth` nested directories ending in one file.
    #[must_use]
    pub fn add_nested(mut self, depth: usize) -> Self {
        let mut path = String::new();
        for i in 0..depth {
            path.push_str(&format!("level{i}/"));
        }
        path.push_str("leaf.yml");
        self.tree.insert_file(path, b"leaf: true\n".as_slice());
        self
    }

    /// Adds one file of `size` bytes.
    #[must_use]
    pub fn add_large_file(mut self, path: &str, size: usize) -> Self {
        self.tree.insert_file(path, vec![0xAB_u8; size]);
        self
    }

    /// Returns the finished tree.
    #[must_use]
    pub fn build(self) -> MemoryTree {
        self.tree
    }
}

/// Reads a materialized file as UTF-8.
#[must_use]
pub fn read_string(dest: &Path, rel: &str) -> String {
    fs::read_to_string(dest.join(rel)).unwrap()
}
