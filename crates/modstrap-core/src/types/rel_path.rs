//! Clean relative path of a tree entry below its root.

use std::fmt;
use std::path::Component;
use std::path::Path;
use std::path::PathBuf;

use crate::BootstrapError;
use crate::Result;

/// Path of a resource tree entry relative to the tree root.
///
/// A `RelPath` never contains `..`, root, or prefix components, never
/// contains NUL bytes, and has `.` components removed, so joining it onto a
/// destination root yields a path that is lexically inside that root.
///
/// Symlinks already present below the root are not resolved or rejected.
/// File and directory creation follows them, so a stray symlink can still
/// redirect a write outside the root.
///
/// The tree root itself maps to the empty relative path, displayed as `.`.
///
/// # Examples
///
/// ```
/// use modstrap_core::RelPath;
/// use std::path::Path;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let rel = RelPath::from_entry(Path::new("module/sub/b.yml"), Path::new("module"))?;
/// assert_eq!(rel.as_path(), Path::new("sub/b.yml"));
///
/// let root = RelPath::from_entry(Path::new("module"), Path::new("module"))?;
/// assert!(root.is_root());
/// assert_eq!(root.to_string(), ".");
///
/// assert!(RelPath::from_entry(Path::new("module/../etc"), Path::new("module")).is_err());
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RelPath(PathBuf);

impl RelPath {
    /// Returns the relative path of the tree root.
    #[must_use]
    pub fn root() -> Self {
        Self(PathBuf::new())
    }

    /// Strips `root` from `entry` and validates what remains.
    ///
    /// # Errors
    ///
    /// Returns `BootstrapError::InvalidEntryPath` if `entry` does not start
    /// with `root`, contains NUL bytes, or the remainder contains `..`,
    /// root, or prefix components.
    pub fn from_entry(entry: &Path, root: &Path) -> Result<Self> {
        let invalid = || BootstrapError::InvalidEntryPath {
            path: entry.to_path_buf(),
        };

        if has_null_bytes(entry) {
            return Err(invalid());
        }

        let remainder = entry.strip_prefix(root).map_err(|_| invalid())?;
        Self::validate(remainder).ok_or_else(invalid)
    }

    /// Validates a path that is already relative to the tree root.
    ///
    /// # Errors
    ///
    /// Returns `BootstrapError::InvalidEntryPath` under the same conditions
    /// as [`RelPath::from_entry`].
    pub fn new(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if has_null_bytes(path) {
            return Err(BootstrapError::InvalidEntryPath {
                path: path.to_path_buf(),
            });
        }
        Self::validate(path).ok_or_else(|| BootstrapError::InvalidEntryPath {
            path: path.to_path_buf(),
        })
    }

    fn validate(path: &Path) -> Option<Self> {
        let mut normalized = PathBuf::new();
        for component in path.components() {
            match component {
                Component::Normal(name) => normalized.push(name),
                Component::CurDir => {}
                Component::ParentDir | Component::RootDir | Component::Prefix(_) => return None,
            }
        }
        Some(Self(normalized))
    }

    /// Returns `true` if this is the tree root.
    #[inline]
    #[must_use]
    pub fn is_root(&self) -> bool {
        self.0.as_os_str().is_empty()
    }

    /// Returns the number of components below the root.
    #[must_use]
    pub fn depth(&self) -> usize {
        self.0.components().count()
    }

    /// Returns the path as a `&Path`. Empty for the root.
    #[inline]
    #[must_use]
    pub fn as_path(&self) -> &Path {
        &self.0
    }

    /// Converts into the inner `PathBuf`.
    #[inline]
    #[must_use]
    pub fn into_path_buf(self) -> PathBuf {
        self.0
    }
}

impl fmt::Display for RelPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_root() {
            f.write_str(".")
        } else {
            write!(f, "{}", self.0.display())
        }
    }
}

/// Checks if a path contains null bytes.
#[cfg(unix)]
fn has_null_bytes(path: &Path) -> bool {
    use std::os::unix::ffi::OsStrExt;
    path.as_os_str().as_bytes().contains(&b'\0')
}

/// Checks if a path contains null bytes.
#[cfg(not(unix))]
fn has_null_bytes(path: &Path) -> bool {
    path.to_str().is_none_or(|s| s.contains('\0'))
}
