//! Validated path types used during materialization.
//!
//! Both path types are only constructible through validation, so an
//! extractor holding a `DestRoot` and a `RelPath` cannot write outside the
//! destination root.

pub mod dest_root;
pub mod entry_kind;
pub mod rel_path;

pub use dest_root::DestRoot;
pub use entry_kind::EntryKind;
pub use rel_path::RelPath;
