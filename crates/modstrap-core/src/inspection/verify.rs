//! Destination verification against a resource tree.

use std::collections::BTreeSet;
use std::fs;
use std::io;
use std::io::Read;
use std::path::Path;
use std::path::PathBuf;

use tracing::debug;
use walkdir::WalkDir;

use crate::BootstrapError;
use crate::Result;
use crate::copy::COPY_BUFFER_SIZE;
use crate::inspection::report::IssueKind;
use crate::inspection::report::VerificationIssue;
use crate::inspection::report::VerificationReport;
use crate::source::ResourceTree;
use crate::source::TreeEntry;
use crate::types::EntryKind;
use crate::types::RelPath;

/// Compares a destination root with the resource tree it should mirror.
///
/// Every tree entry is checked for existence, kind, and (for files) exact
/// content. Paths on disk that are not in the tree are reported as
/// [`IssueKind::Unexpected`]. Nothing is modified.
///
/// A missing destination root yields a single `Missing` issue for the root
/// rather than an error.
///
/// # Errors
///
/// Returns `SourceOpen` if the tree cannot be walked or a tree file cannot
/// be read, and `Io` if the destination cannot be read for reasons other
/// than absence.
///
/// # Examples
///
/// ```no_run
/// use modstrap_core::MemoryTree;
/// use modstrap_core::verify_tree;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let tree = MemoryTree::new("module").with_file("a.yml", "x: 1");
/// let report = verify_tree(&tree, "module")?;
/// if !report.is_clean() {
///     for issue in &report.issues {
///         eprintln!("{issue}");
///     }
/// }
/// # Ok(())
/// # }
/// ```
pub fn verify_tree(tree: &dyn ResourceTree, dest: impl AsRef<Path>) -> Result<VerificationReport> {
    let dest = dest.as_ref();
    let root = tree.root();
    let walked = tree.walk().map_err(|source| BootstrapError::SourceOpen {
        path: root.to_path_buf(),
        source,
    })?;

    let mut report = VerificationReport {
        dest_root: dest.to_path_buf(),
        ..VerificationReport::default()
    };

    let mut expected = BTreeSet::new();
    for entry in &walked {
        let rel = RelPath::from_entry(&entry.path, root)?;
        let target = if rel.is_root() {
            dest.to_path_buf()
        } else {
            dest.join(rel.as_path())
        };
        report.entries_checked += 1;

        if let Some(kind) = check_entry(tree, entry, &target, rel.is_root())? {
            let stop = rel.is_root() && kind == IssueKind::Missing;
            report.issues.push(VerificationIssue { path: rel.clone(), kind });
            if stop {
                return Ok(report);
            }
        }
        expected.insert(rel.into_path_buf());
    }

    if dest.is_dir() {
        collect_unexpected(dest, &expected, &mut report.issues)?;
    }

    report.issues.sort_by(|a, b| a.path.as_path().cmp(b.path.as_path()));
    debug!(
        dest = %dest.display(),
        checked = report.entries_checked,
        issues = report.issues.len(),
        "verification finished"
    );
    Ok(report)
}

fn check_entry(
    tree: &dyn ResourceTree,
    entry: &TreeEntry,
    target: &Path,
    is_root: bool,
) -> Result<Option<IssueKind>> {
    // A symlinked destination root is accepted by `DestRoot::prepare`
    let lookup = if is_root {
        fs::metadata(target)
    } else {
        fs::symlink_metadata(target)
    };
    let meta = match lookup {
        Ok(meta) => meta,
        Err(e) if matches!(
            e.kind(),
            io::ErrorKind::NotFound | io::ErrorKind::NotADirectory
        ) =>
        {
            return Ok(Some(IssueKind::Missing));
        }
        Err(e) => return Err(BootstrapError::Io(e)),
    };

    match entry.kind {
        EntryKind::Directory if meta.is_dir() => Ok(None),
        EntryKind::File if meta.is_file() => {
            if meta.len() != entry.size {
                return Ok(Some(IssueKind::ContentMismatch));
            }
            let mut source = tree
                .open(&entry.path)
                .map_err(|source| BootstrapError::SourceOpen {
                    path: entry.path.clone(),
                    source,
                })?;
            let disk = fs::File::open(target)?;
            if same_content(&mut source, disk)? {
                Ok(None)
            } else {
                Ok(Some(IssueKind::ContentMismatch))
            }
        }
        expected => Ok(Some(IssueKind::KindMismatch { expected })),
    }
}

fn same_content(a: &mut dyn Read, mut b: impl Read) -> io::Result<bool> {
    let mut buf_a = vec![0u8; COPY_BUFFER_SIZE];
    let mut buf_b = vec![0u8; COPY_BUFFER_SIZE];
    loop {
        let n = read_full(a, &mut buf_a)?;
        let m = read_full(&mut b, &mut buf_b)?;
        if n != m || buf_a[..n] != buf_b[..m] {
            return Ok(false);
        }
        if n == 0 {
            return Ok(true);
        }
    }
}

fn read_full<R: Read + ?Sized>(reader: &mut R, buf: &mut [u8]) -> io::Result<usize> {
    let mut filled = 0;
    while filled < buf.len() {
        match reader.read(&mut buf[filled..]) {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => {}
            Err(e) => return Err(e),
        }
    }
    Ok(filled)
}

fn collect_unexpected(
    dest: &Path,
    expected: &BTreeSet<PathBuf>,
    issues: &mut Vec<VerificationIssue>,
) -> Result<()> {
    let mut walker = WalkDir::new(dest).min_depth(1).sort_by_file_name().into_iter();
    while let Some(item) = walker.next() {
        let item = item.map_err(io::Error::from)?;
        let Ok(rel) = item.path().strip_prefix(dest) else {
            continue;
        };
        if expected.contains(rel) {
            continue;
        }
        issues.push(VerificationIssue {
            path: RelPath::new(rel)?,
            kind: IssueKind::Unexpected,
        });
        if item.file_type().is_dir() {
            walker.skip_current_dir();
        }
    }
    Ok(())
}
