//! In-memory resource tree.

use std::collections::BTreeMap;
use std::io;
use std::io::Read;
use std::path::Path;
use std::path::PathBuf;

use super::ResourceTree;
use super::TreeEntry;
use super::not_a_file;
use crate::types::RelPath;

#[derive(Debug, Clone, PartialEq, Eq)]
enum Node {
    Directory,
    File(Vec<u8>),
}

/// A resource tree held in memory.
///
/// Paths passed to the builder methods are relative to the root. Parent
/// directories are created implicitly; adding a node below an existing
/// file replaces that file with a directory.
///
/// Nodes are kept in a `BTreeMap` keyed by relative path. `PathBuf`
/// orders component by component, which is exactly the pre-order the
/// extractor requires.
///
/// # Examples
///
/// ```
/// use modstrap_core::MemoryTree;
/// use modstrap_core::ResourceTree;
/// use std::io::Read;
/// use std::path::Path;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let tree = MemoryTree::new("module")
///     .with_file("nginx/access.yml", "type: log")
///     .with_dir("empty");
///
/// let mut contents = String::new();
/// tree.open(Path::new("module/nginx/access.yml"))?
///     .read_to_string(&mut contents)?;
/// assert_eq!(contents, "type: log");
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemoryTree {
    root: PathBuf,
    nodes: BTreeMap<PathBuf, Node>,
}

impl MemoryTree {
    /// Creates a tree containing only its root directory.
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        let mut nodes = BTreeMap::new();
        nodes.insert(PathBuf::new(), Node::Directory);
        Self {
            root: root.into(),
            nodes,
        }
    }

    /// Adds a file, replacing any existing node at `path` along with
    /// everything below it.
    ///
    /// Paths that are not clean relative paths (`..`, absolute, NUL bytes)
    /// are ignored.
    pub fn insert_file(&mut self, path: impl AsRef<Path>, contents: impl Into<Vec<u8>>) {
        let Ok(rel) = RelPath::new(path) else {
            return;
        };
        if rel.is_root() {
            return;
        }
        self.insert_parents(rel.as_path());
        self.nodes
            .retain(|path, _| !path.starts_with(rel.as_path()));
        self.nodes
            .insert(rel.into_path_buf(), Node::File(contents.into()));
    }

    /// Adds a directory. Existing directories are left as they are.
    ///
    /// Paths that are not clean relative paths are ignored.
    pub fn insert_dir(&mut self, path: impl AsRef<Path>) {
        let Ok(rel) = RelPath::new(path) else {
            return;
        };
        self.insert_parents(rel.as_path());
        self.nodes.insert(rel.into_path_buf(), Node::Directory);
    }

    /// Builder form of [`insert_file`](Self::insert_file).
    #[must_use]
    pub fn with_file(mut self, path: impl AsRef<Path>, contents: impl Into<Vec<u8>>) -> Self {
        self.insert_file(path, contents);
        self
    }

    /// Builder form of [`insert_dir`](Self::insert_dir).
    #[must_use]
    pub fn with_dir(mut self, path: impl AsRef<Path>) -> Self {
        self.insert_dir(path);
        self
    }

    /// Returns the number of files in the tree.
    #[must_use]
    pub fn file_count(&self) -> usize {
        self.nodes
            .values()
            .filter(|node| matches!(node, Node::File(_)))
            .count()
    }

    /// Returns the contents of the file at `path`, relative to the root.
    #[must_use]
    pub fn contents(&self, path: impl AsRef<Path>) -> Option<&[u8]> {
        match self.nodes.get(path.as_ref()) {
            Some(Node::File(data)) => Some(data),
            _ => None,
        }
    }

    fn insert_parents(&mut self, path: &Path) {
        for parent in path.ancestors().skip(1) {
            self.nodes.insert(parent.to_path_buf(), Node::Directory);
        }
    }
}

impl ResourceTree for MemoryTree {
    fn root(&self) -> &Path {
        &self.root
    }

    fn walk(&self) -> io::Result<Vec<TreeEntry>> {
        Ok(self
            .nodes
            .iter()
            .map(|(rel, node)| {
                let path = if rel.as_os_str().is_empty() {
                    self.root.clone()
                } else {
                    self.root.join(rel)
                };
                match node {
                    Node::Directory => TreeEntry::directory(path),
                    Node::File(data) => TreeEntry::file(path, data.len() as u64),
                }
            })
            .collect())
    }

    fn open(&self, path: &Path) -> io::Result<Box<dyn Read + '_>> {
        let rel = path.strip_prefix(&self.root).map_err(|_| not_a_file(path))?;
        self.contents(rel)
            .map(|data| Box::new(data) as Box<dyn Read + '_>)
            .ok_or_else(|| not_a_file(path))
    }
}
