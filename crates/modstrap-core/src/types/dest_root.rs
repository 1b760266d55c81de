//! Prepared destination root directory.

use std::fs::DirBuilder;
use std::io;
use std::path::Path;
use std::path::PathBuf;

use tracing::debug;

use super::RelPath;
use crate::BootstrapError;
use crate::Result;

/// A destination directory that a resource tree is materialized into.
///
/// A `DestRoot` can only be obtained through [`DestRoot::prepare`], so
/// holding one means the directory existed (as a directory) when the
/// bootstrap started. The path is stored in canonical absolute form.
///
/// # Examples
///
/// ```no_run
/// use modstrap_core::DestRoot;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let dest = DestRoot::prepare("module", 0o755)?;
/// println!("Materializing into: {}", dest.as_path().display());
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DestRoot(PathBuf);

impl DestRoot {
    /// Ensures `path` exists as a directory and returns it as a `DestRoot`.
    ///
    /// Missing intermediate directories are created with `mode` (Unix
    /// only). Succeeds without changes if the directory already exists;
    /// the mode of existing directories is left untouched.
    ///
    /// # Errors
    ///
    /// Returns `BootstrapError::Prepare` if:
    /// - The path is empty
    /// - The path exists but is not a directory
    /// - Directory creation fails (permissions, quota, storage errors)
    /// - The path cannot be canonicalized
    pub fn prepare(path: impl AsRef<Path>, mode: u32) -> Result<Self> {
        let path = path.as_ref();
        let fail = |source: io::Error| BootstrapError::Prepare {
            path: path.to_path_buf(),
            source,
        };

        if path.as_os_str().is_empty() {
            return Err(fail(io::Error::new(
                io::ErrorKind::InvalidInput,
                "destination path is empty",
            )));
        }

        // symlink_metadata would reject a symlink to a directory
        match std::fs::metadata(path) {
            Ok(meta) if meta.is_dir() => {}
            Ok(_) => {
                return Err(fail(io::Error::new(
                    io::ErrorKind::AlreadyExists,
                    "path exists and is not a directory",
                )));
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                create_dir_all_with_mode(path, mode).map_err(fail)?;
            }
            Err(e) => return Err(fail(e)),
        }

        let canonical = path.canonicalize().map_err(fail)?;
        debug!(path = %canonical.display(), mode = %format!("{mode:#o}"), "destination root ready");

        Ok(Self(canonical))
    }

    /// Returns the path as a `&Path`.
    #[inline]
    #[must_use]
    pub fn as_path(&self) -> &Path {
        &self.0
    }

    /// Joins a `RelPath` to this destination root.
    ///
    /// The root relative path maps to the destination root itself.
    #[inline]
    #[must_use]
    pub fn join(&self, rel: &RelPath) -> PathBuf {
        if rel.is_root() {
            self.0.clone()
        } else {
            self.0.join(rel.as_path())
        }
    }

    /// Converts into the inner `PathBuf`.
    #[inline]
    #[must_use]
    pub fn into_path_buf(self) -> PathBuf {
        self.0
    }
}

/// Creates `path` and any missing parents with the given permission mode.
///
/// Idempotent: an existing directory is not an error.
pub(crate) fn create_dir_all_with_mode(path: &Path, mode: u32) -> io::Result<()> {
    let mut builder = DirBuilder::new();
    builder.recursive(true);

    #[cfg(unix)]
    {
        use std::os::unix::fs::DirBuilderExt;
        builder.mode(mode);
    }
    #[cfg(not(unix))]
    let _ = mode;

    builder.create(path)
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_prepare_creates_missing_directories() {
        let temp = TempDir::new().expect("failed to create temp dir");
        let target = temp.path().join("a").join("b").join("module");

        let dest = DestRoot::prepare(&target, 0o755).expect("should prepare");
        assert!(target.is_dir());
        assert!(dest.as_path().is_absolute());
        assert_eq!(dest.as_path(), target.canonicalize().unwrap());
    }

    #[test]
    fn test_prepare_is_idempotent() {
        let temp = TempDir::new().expect("failed to create temp dir");
        let target = temp.path().join("module");
        fs::create_dir(&target).unwrap();
        fs::write(target.join("keep.yml"), "k: v").unwrap();

        let first = DestRoot::prepare(&target, 0o755).expect("first prepare");
        let second = DestRoot::prepare(&target, 0o755).expect("second prepare");
        assert_eq!(first, second);
        assert_eq!(fs::read_to_string(target.join("keep.yml")).unwrap(), "k: v");
    }

    #[test]
    fn test_prepare_rejects_regular_file() {
        let temp = TempDir::new().expect("failed to create temp dir");
        let target = temp.path().join("module");
        fs::write(&target, "not a directory").unwrap();

        let result = DestRoot::prepare(&target, 0o755);
        match result {
            Err(BootstrapError::Prepare { path, source }) => {
                assert_eq!(path, target);
                assert_eq!(source.kind(), io::ErrorKind::AlreadyExists);
            }
            other => panic!("expected Prepare error, got {other:?}"),
        }
        assert!(target.is_file(), "file must be left in place");
    }

    #[test]
    fn test_prepare_rejects_empty_path() {
        let result = DestRoot::prepare("", 0o755);
        assert!(matches!(result, Err(BootstrapError::Prepare { .. })));
    }

    #[test]
    fn test_prepare_fails_below_regular_file() {
        let temp = TempDir::new().expect("failed to create temp dir");
        let blocker = temp.path().join("blocker");
        fs::write(&blocker, "x").unwrap();

        let result = DestRoot::prepare(blocker.join("module"), 0o755);
        assert!(matches!(result, Err(BootstrapError::Prepare { .. })));
    }

    #[test]
    #[cfg(unix)]
    fn test_prepare_applies_mode() {
        use std::os::unix::fs::PermissionsExt;

        let temp = TempDir::new().expect("failed to create temp dir");
        let target = temp.path().join("module");
        DestRoot::prepare(&target, 0o700).expect("should prepare");

        let mode = fs::metadata(&target).unwrap().permissions().mode() & 0o777;
        // umask can only clear bits
        assert_eq!(mode & !0o700, 0);
        assert_ne!(mode & 0o700, 0);
    }

    #[test]
    fn test_join_root_and_nested() {
        let temp = TempDir::new().expect("failed to create temp dir");
        let dest = DestRoot::prepare(temp.path(), 0o755).expect("should prepare");

        assert_eq!(dest.join(&RelPath::root()), dest.as_path());
        let nested = RelPath::new("sub/b.yml").unwrap();
        assert_eq!(dest.join(&nested), dest.as_path().join("sub/b.yml"));
    }

    #[test]
    fn test_into_path_buf() {
        let temp = TempDir::new().expect("failed to create temp dir");
        let dest = DestRoot::prepare(temp.path(), 0o755).expect("should prepare");
        let path = dest.clone().into_path_buf();
        assert_eq!(path, dest.as_path());
    }
}
