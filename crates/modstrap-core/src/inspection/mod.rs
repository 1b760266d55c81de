//! Read-only inspection of resource trees and materialized destinations.
//!
//! [`list_tree`] reports what a tree contains without writing anything.
//! [`verify_tree`] checks that a destination root still mirrors the tree.

mod list;
mod manifest;
mod report;
mod verify;

pub use list::list_tree;
pub use manifest::ManifestEntry;
pub use manifest::TreeManifest;
pub use report::IssueKind;
pub use report::VerificationIssue;
pub use report::VerificationReport;
pub use verify::verify_tree;
