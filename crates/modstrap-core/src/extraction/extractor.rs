//! Resource tree extractor.

use std::fs::File;
use std::io;
use std::io::BufWriter;
use std::io::Read;
use std::io::Write;
use std::path::Path;
use std::time::Instant;

use tracing::debug;
use tracing::trace;

use crate::BootstrapConfig;
use crate::BootstrapError;
use crate::MaterializeReport;
use crate::ProgressCallback;
use crate::Result;
use crate::copy::COPY_BUFFER_SIZE;
use crate::copy::CopyBuffer;
use crate::copy::copy_with_buffer;
use crate::source::ResourceTree;
use crate::types::DestRoot;
use crate::types::EntryKind;
use crate::types::RelPath;
use crate::types::dest_root::create_dir_all_with_mode;

/// Writes every node of a resource tree below a destination root.
///
/// Entries are processed in the tree's pre-order: each directory is created
/// before any file inside it is written. Existing files are truncated and
/// overwritten. The first error aborts the walk; entries already written
/// stay on disk.
///
/// # Examples
///
/// ```no_run
/// use modstrap_core::BootstrapConfig;
/// use modstrap_core::DestRoot;
/// use modstrap_core::MemoryTree;
/// use modstrap_core::NoopProgress;
/// use modstrap_core::extraction::Extractor;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let tree = MemoryTree::new("module").with_file("a.yml", "x: 1");
/// let config = BootstrapConfig::default();
/// let dest = DestRoot::prepare(&config.dest_root, config.dir_mode)?;
///
/// let report = Extractor::new(&tree, &config).extract(&dest, &mut NoopProgress)?;
/// assert_eq!(report.files_written, 1);
/// # Ok(())
/// # }
/// ```
pub struct Extractor<'t> {
    tree: &'t dyn ResourceTree,
    dir_mode: u32,
}

impl<'t> Extractor<'t> {
    /// Creates an extractor for `tree`.
    #[must_use]
    pub fn new(tree: &'t dyn ResourceTree, config: &BootstrapConfig) -> Self {
        Self {
            tree,
            dir_mode: config.dir_mode,
        }
    }

    /// Materializes the tree below `dest`.
    ///
    /// # Errors
    ///
    /// Returns the first failure, carrying the path being processed:
    /// - `SourceOpen` if the tree cannot be listed or a file cannot be
    ///   opened or read
    /// - `InvalidEntryPath` if an entry is not a clean path below the root
    /// - `CreateDir` if a directory cannot be created
    /// - `CreateFile` if a destination file cannot be created
    /// - `Write` if copying into a destination file fails
    pub fn extract(
        &self,
        dest: &DestRoot,
        progress: &mut dyn ProgressCallback,
    ) -> Result<MaterializeReport> {
        let start = Instant::now();
        let root = self.tree.root();

        let entries = self
            .tree
            .walk()
            .map_err(|source| BootstrapError::SourceOpen {
                path: root.to_path_buf(),
                source,
            })?;
        let total = entries.len();

        let mut report = MaterializeReport {
            dest_root: dest.as_path().to_path_buf(),
            ..MaterializeReport::default()
        };
        let mut buffer = CopyBuffer::new();

        for (index, entry) in entries.iter().enumerate() {
            progress.on_entry_start(&entry.path, total, index + 1);

            let rel = RelPath::from_entry(&entry.path, root)?;
            let target = dest.join(&rel);

            match entry.kind {
                EntryKind::Directory => {
                    create_dir_all_with_mode(&target, self.dir_mode).map_err(|source| {
                        BootstrapError::CreateDir {
                            path: target.clone(),
                            source,
                        }
                    })?;
                    report.directories_created += 1;
                    trace!(path = %rel, "directory created");
                }
                EntryKind::File => {
                    let written = self.extract_file(&entry.path, &target, &mut buffer, progress)?;
                    report.files_written += 1;
                    report.bytes_written = report.bytes_written.saturating_add(written);
                    trace!(path = %rel, bytes = written, "file written");
                }
            }

            progress.on_entry_complete(&entry.path);
        }

        report.duration = start.elapsed();
        progress.on_complete();

        debug!(
            root = %root.display(),
            dest = %dest.as_path().display(),
            files = report.files_written,
            directories = report.directories_created,
            bytes = report.bytes_written,
            "resource tree materialized"
        );

        Ok(report)
    }

    /// Copies one embedded file to `target`.
    ///
    /// Both handles are dropped on every return path.
    fn extract_file(
        &self,
        entry: &Path,
        target: &Path,
        buffer: &mut CopyBuffer,
        progress: &mut dyn ProgressCallback,
    ) -> Result<u64> {
        let source_err = |source: io::Error| BootstrapError::SourceOpen {
            path: entry.to_path_buf(),
            source,
        };
        let mut source = SourceReader::new(self.tree.open(entry).map_err(source_err)?);

        let file = File::create(target).map_err(|source| BootstrapError::CreateFile {
            path: target.to_path_buf(),
            source,
        })?;

        let write_err = |source: io::Error| BootstrapError::Write {
            path: target.to_path_buf(),
            source,
        };
        let mut writer = BufWriter::with_capacity(COPY_BUFFER_SIZE, file);
        let written = copy_with_buffer(&mut source, &mut writer, buffer, |n| {
            progress.on_bytes_written(n);
        })
        .map_err(|e| {
            if source.failed {
                source_err(e)
            } else {
                write_err(e)
            }
        })?;
        writer.flush().map_err(write_err)?;

        Ok(written)
    }
}

/// Tracks whether a copy error came from the embedded source.
struct SourceReader<R> {
    inner: R,
    failed: bool,
}

impl<R: Read> SourceReader<R> {
    fn new(inner: R) -> Self {
        Self {
            inner,
            failed: false,
        }
    }
}

impl<R: Read> Read for SourceReader<R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.inner.read(buf).inspect_err(|e| {
            if e.kind() != io::ErrorKind::Interrupted {
                self.failed = true;
            }
        })
    }
}
