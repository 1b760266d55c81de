//! Materialization of embedded resource trees onto the local filesystem.
//!
//! `modstrap-core` writes a read-only directory tree compiled into a binary
//! (configuration modules, templates, rule sets) out to a destination root
//! before the program that needs those files starts. Directories are
//! created before the files inside them, existing files are overwritten,
//! and the first failure aborts the whole bootstrap.
//!
//! # Examples
//!
//! ```no_run
//! use modstrap_core::Bootstrap;
//! use modstrap_core::BootstrapConfig;
//! use modstrap_core::EmbeddedTree;
//! use modstrap_core::NoopProgress;
//! use include_dir::Dir;
//! use include_dir::include_dir;
//!
//! static MODULE: Dir<'static> = include_dir!("$CARGO_MANIFEST_DIR/src");
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let tree = EmbeddedTree::new("module", &MODULE);
//! let mut bootstrap = Bootstrap::new(&tree, BootstrapConfig::default());
//! let report = bootstrap.materialize(&mut NoopProgress)?;
//! println!("Wrote {} files", report.files_written);
//! # Ok(())
//! # }
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod api;
pub mod bootstrap;
pub mod config;
pub mod copy;
pub mod error;
pub mod extraction;
pub mod inspection;
pub mod report;
pub mod source;
pub mod types;

#[doc(hidden)]
pub mod test_utils;

// Re-export main API types
pub use api::materialize;
pub use api::materialize_with_progress;
pub use bootstrap::Application;
pub use bootstrap::Bootstrap;
pub use bootstrap::Phase;
pub use config::BootstrapConfig;
pub use error::ApplicationError;
pub use error::BootstrapError;
pub use error::Result;
pub use inspection::IssueKind;
pub use inspection::ManifestEntry;
pub use inspection::TreeManifest;
pub use inspection::VerificationIssue;
pub use inspection::VerificationReport;
pub use inspection::list_tree;
pub use inspection::verify_tree;
pub use report::MaterializeReport;
pub use report::NoopProgress;
pub use report::ProgressCallback;
pub use source::EmbeddedTree;
pub use source::MemoryTree;
pub use source::ResourceTree;
pub use source::TreeEntry;

// Re-export types module for easier access
pub use types::DestRoot;
pub use types::EntryKind;
pub use types::RelPath;
