//! Resource tree compiled into the binary with `include_dir!`.

use std::io;
use std::io::Read;
use std::path::Path;
use std::path::PathBuf;

use include_dir::Dir;
use include_dir::DirEntry;

use super::ResourceTree;
use super::TreeEntry;
use super::not_a_file;

/// A directory embedded at build time via [`include_dir::include_dir!`].
///
/// `include_dir` records paths relative to the included directory, so the
/// tree is given a root name that is prefixed onto every entry.
///
/// # Examples
///
/// ```ignore
/// use include_dir::{Dir, include_dir};
/// use modstrap_core::EmbeddedTree;
///
/// static MODULE_DIR: Dir<'static> = include_dir!("$CARGO_MANIFEST_DIR/module");
///
/// let tree = EmbeddedTree::new("module", &MODULE_DIR);
/// ```
#[derive(Debug, Clone)]
pub struct EmbeddedTree<'a> {
    root: PathBuf,
    dir: &'a Dir<'a>,
}

impl<'a> EmbeddedTree<'a> {
    /// Wraps an embedded directory under the given root name.
    #[must_use]
    pub fn new(root: impl Into<PathBuf>, dir: &'a Dir<'a>) -> Self {
        Self {
            root: root.into(),
            dir,
        }
    }

    fn walk_dir(&self, dir: &Dir<'_>, entries: &mut Vec<TreeEntry>) {
        let mut children: Vec<&DirEntry<'_>> = dir.entries().iter().collect();
        children.sort_by(|a, b| a.path().file_name().cmp(&b.path().file_name()));

        for child in children {
            match child {
                DirEntry::Dir(sub) => {
                    entries.push(TreeEntry::directory(self.root.join(sub.path())));
                    self.walk_dir(sub, entries);
                }
                DirEntry::File(file) => {
                    entries.push(TreeEntry::file(
                        self.root.join(file.path()),
                        file.contents().len() as u64,
                    ));
                }
            }
        }
    }
}

impl ResourceTree for EmbeddedTree<'_> {
    fn root(&self) -> &Path {
        &self.root
    }

    fn walk(&self) -> io::Result<Vec<TreeEntry>> {
        let mut entries = vec![TreeEntry::directory(self.root.clone())];
        self.walk_dir(self.dir, &mut entries);
        Ok(entries)
    }

    fn open(&self, path: &Path) -> io::Result<Box<dyn Read + '_>> {
        let rel = path.strip_prefix(&self.root).map_err(|_| not_a_file(path))?;
        let file = self.dir.get_file(rel).ok_or_else(|| not_a_file(path))?;
        Ok(Box::new(file.contents()))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use include_dir::File;

    static FILES: &[DirEntry<'static>] = &[
        DirEntry::File(File::new("a.yml", b"x: 1")),
        DirEntry::Dir(Dir::new(
            "sub",
            &[DirEntry::File(File::new("sub/b.yml", b"y: 2"))],
        )),
    ];

    // Entries deliberately out of lexical order.
    static UNSORTED: &[DirEntry<'static>] = &[
        DirEntry::File(File::new("z.yml", b"z")),
        DirEntry::Dir(Dir::new("m", &[])),
        DirEntry::File(File::new("a.yml", b"a")),
    ];

    static MODULE_DIR: Dir<'static> = Dir::new("", FILES);
    static UNSORTED_DIR: Dir<'static> = Dir::new("", UNSORTED);

    #[test]
    fn test_walk_prefixes_root_name() {
        let tree = EmbeddedTree::new("module", &MODULE_DIR);
        let entries = tree.walk().unwrap();
        assert_eq!(
            entries,
            vec![
                TreeEntry::directory("module"),
                TreeEntry::file("module/a.yml", 4),
                TreeEntry::directory("module/sub"),
                TreeEntry::file("module/sub/b.yml", 4),
            ]
        );
    }

    #[test]
    fn test_walk_sorts_siblings() {
        let tree = EmbeddedTree::new("module", &UNSORTED_DIR);
        let paths: Vec<_> = tree.walk().unwrap().into_iter().map(|e| e.path).collect();
        assert_eq!(
            paths,
            vec![
                PathBuf::from("module"),
                PathBuf::from("module/a.yml"),
                PathBuf::from("module/m"),
                PathBuf::from("module/z.yml"),
            ]
        );
    }

    #[test]
    fn test_open_embedded_file() {
        let tree = EmbeddedTree::new("module", &MODULE_DIR);
        let mut contents = String::new();
        tree.open(Path::new("module/sub/b.yml"))
            .unwrap()
            .read_to_string(&mut contents)
            .unwrap();
        assert_eq!(contents, "y: 2");
    }

    #[test]
    fn test_open_missing_file() {
        let tree = EmbeddedTree::new("module", &MODULE_DIR);
        let err = tree.open(Path::new("module/nope.yml")).err().unwrap();
        assert_eq!(err.kind(), io::ErrorKind::NotFound);
        assert!(tree.open(Path::new("module/sub")).is_err());
    }
}
