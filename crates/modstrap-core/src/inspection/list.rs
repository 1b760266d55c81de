//! Resource tree listing.

use crate::BootstrapError;
use crate::Result;
use crate::inspection::manifest::ManifestEntry;
use crate::inspection::manifest::TreeManifest;
use crate::source::ResourceTree;
use crate::types::EntryKind;
use crate::types::RelPath;

/// Lists a resource tree without writing anything.
///
/// # Errors
///
/// Returns `SourceOpen` if the tree cannot be walked and
/// `InvalidEntryPath` if an entry lies outside the tree root.
///
/// # Examples
///
/// ```
/// use modstrap_core::MemoryTree;
/// use modstrap_core::list_tree;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let tree = MemoryTree::new("module")
///     .with_file("a.yml", "x: 1")
///     .with_file("sub/b.yml", "y: 2");
///
/// let manifest = list_tree(&tree)?;
/// assert_eq!(manifest.total_files, 2);
/// assert_eq!(manifest.total_directories, 2);
/// assert_eq!(manifest.total_size, 8);
/// # Ok(())
/// # }
/// ```
pub fn list_tree(tree: &dyn ResourceTree) -> Result<TreeManifest> {
    let root = tree.root();
    let walked = tree.walk().map_err(|source| BootstrapError::SourceOpen {
        path: root.to_path_buf(),
        source,
    })?;

    let mut manifest = TreeManifest {
        root: root.to_string_lossy().into_owned(),
        entries: Vec::with_capacity(walked.len()),
        ..TreeManifest::default()
    };

    for entry in walked {
        let path = RelPath::from_entry(&entry.path, root)?;
        match entry.kind {
            EntryKind::Directory => manifest.total_directories += 1,
            EntryKind::File => {
                manifest.total_files += 1;
                manifest.total_size = manifest.total_size.saturating_add(entry.size);
            }
        }
        manifest.entries.push(ManifestEntry {
            path,
            kind: entry.kind,
            size: entry.size,
        });
    }

    Ok(manifest)
}
