//! Error conversion utilities for CLI.
//!
//! Converts modstrap-core's typed errors (thiserror) into user-friendly
//! contextual errors (anyhow) with actionable guidance.

use anyhow::anyhow;
use modstrap_core::BootstrapError;
use std::io;

/// Converts `BootstrapError` to a user-friendly anyhow error naming the
/// failing phase, the path involved, and the OS error.
pub fn convert_bootstrap_error(err: BootstrapError) -> anyhow::Error {
    match err {
        BootstrapError::Prepare { path, source } => {
            let hint = match source.kind() {
                io::ErrorKind::AlreadyExists | io::ErrorKind::NotADirectory => {
                    "\nHINT: Remove the file in the way or choose another location with --dest."
                }
                io::ErrorKind::PermissionDenied => {
                    "\nHINT: Check permissions of the parent directory or choose another location with --dest."
                }
                _ => "",
            };
            anyhow!(
                "failed to create directory {}: {}{}",
                path.display(),
                source,
                hint
            )
        }
        BootstrapError::CreateDir { path, source }
        | BootstrapError::CreateFile { path, source }
        | BootstrapError::Write { path, source } => {
            anyhow!(
                "failed to extract module files: {}: {}{}",
                path.display(),
                source,
                extraction_hint(&source)
            )
        }
        BootstrapError::SourceOpen { path, source } => {
            anyhow!(
                "failed to extract module files: cannot read embedded {}: {}\n\
                 HINT: The binary may be corrupted. Rebuild or reinstall modstrap.",
                path.display(),
                source
            )
        }
        BootstrapError::InvalidEntryPath { path } => {
            anyhow!(
                "failed to extract module files: embedded entry {} lies outside the module root\n\
                 HINT: The binary may be corrupted. Rebuild or reinstall modstrap.",
                path.display()
            )
        }
        BootstrapError::Application(app_err) => anyhow!("application failed: {app_err}"),
        _ => anyhow::Error::from(err).context("bootstrap failed"),
    }
}

fn extraction_hint(source: &io::Error) -> &'static str {
    match source.kind() {
        io::ErrorKind::PermissionDenied => {
            "\nHINT: The destination is not writable. Fix its permissions or choose another location with --dest."
        }
        io::ErrorKind::StorageFull => "\nHINT: Free some disk space and run again.",
        io::ErrorKind::NotADirectory
        | io::ErrorKind::IsADirectory
        | io::ErrorKind::AlreadyExists => {
            "\nHINT: An existing entry has the wrong type. Remove it and run again."
        }
        _ => "",
    }
}

/// Adds bootstrap context to a core result.
pub fn add_bootstrap_context<T>(result: Result<T, BootstrapError>) -> anyhow::Result<T> {
    result.map_err(convert_bootstrap_error)
}
