//! Resource tree entry kind.

use std::fmt;

/// Kind of node in a resource tree.
///
/// Embedded trees only ever contain directories and regular files; links
/// and special files cannot be packaged into a binary.
///
/// # Examples
///
/// ```
/// use modstrap_core::EntryKind;
///
/// assert!(EntryKind::File.is_file());
/// assert!(EntryKind::Directory.is_directory());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum EntryKind {
    /// Directory node.
    Directory,

    /// Regular file node.
    File,
}

impl EntryKind {
    /// Returns `true` if this is a regular file.
    #[must_use]
    pub const fn is_file(self) -> bool {
        matches!(self, Self::File)
    }

    /// Returns `true` if this is a directory.
    #[must_use]
    pub const fn is_directory(self) -> bool {
        matches!(self, Self::Directory)
    }

    /// Returns the lowercase name used in listings and JSON output.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Directory => "directory",
            Self::File => "file",
        }
    }
}

impl fmt::Display for EntryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_predicates() {
        assert!(EntryKind::File.is_file());
        assert!(!EntryKind::File.is_directory());
        assert!(EntryKind::Directory.is_directory());
        assert!(!EntryKind::Directory.is_file());
    }

    #[test]
    fn test_display() {
        assert_eq!(EntryKind::File.to_string(), "file");
        assert_eq!(EntryKind::Directory.to_string(), "directory");
    }

    #[test]
    fn test_directories_sort_first() {
        assert!(EntryKind::Directory < EntryKind::File);
    }
}
