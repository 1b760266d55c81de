//! Writing resource trees to disk.

pub mod extractor;

pub use extractor::Extractor;
