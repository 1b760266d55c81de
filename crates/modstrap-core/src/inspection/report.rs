//! Verification report types.

use std::fmt;
use std::path::PathBuf;

use crate::types::EntryKind;
use crate::types::RelPath;

/// What is wrong with one path of a verified destination.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IssueKind {
    /// The tree has an entry that is absent on disk.
    Missing,
    /// The path exists with the other kind (file vs directory).
    KindMismatch {
        /// Kind recorded in the tree.
        expected: EntryKind,
    },
    /// The file exists but its bytes differ from the tree.
    ContentMismatch,
    /// The path exists on disk but not in the tree.
    Unexpected,
}

impl IssueKind {
    /// Returns a short identifier for machine-readable output.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Missing => "missing",
            Self::KindMismatch { .. } => "kind_mismatch",
            Self::ContentMismatch => "content_mismatch",
            Self::Unexpected => "unexpected",
        }
    }
}

/// A single verification finding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerificationIssue {
    /// Path relative to the destination root.
    pub path: RelPath,

    /// The finding.
    pub kind: IssueKind,
}

impl fmt::Display for VerificationIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            IssueKind::Missing => write!(f, "{}: missing", self.path),
            IssueKind::KindMismatch { expected } => {
                write!(f, "{}: expected a {expected}", self.path)
            }
            IssueKind::ContentMismatch => write!(f, "{}: content differs", self.path),
            IssueKind::Unexpected => write!(f, "{}: not part of the resource tree", self.path),
        }
    }
}

/// Result of comparing a destination root with a resource tree.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VerificationReport {
    /// Destination root that was inspected.
    pub dest_root: PathBuf,

    /// Number of tree entries compared.
    pub entries_checked: usize,

    /// Findings, sorted by path.
    pub issues: Vec<VerificationIssue>,
}

impl VerificationReport {
    /// Returns `true` if the destination mirrors the tree exactly.
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.issues.is_empty()
    }

    /// Counts findings of one kind, ignoring the `expected` payload of
    /// `KindMismatch`.
    #[must_use]
    pub fn count(&self, kind: IssueKind) -> usize {
        self.issues
            .iter()
            .filter(|issue| issue.kind.as_str() == kind.as_str())
            .count()
    }
}
