//! Error types for bootstrap operations.

use std::path::Path;
use std::path::PathBuf;
use thiserror::Error;

use crate::bootstrap::Phase;

/// Result type alias using `BootstrapError`.
pub type Result<T> = std::result::Result<T, BootstrapError>;

/// Boxed error produced by a downstream application.
pub type BoxedError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Exit code used for every failure that does not carry its own.
pub const FAILURE_EXIT_CODE: u8 = 1;

/// Failure reported by the downstream application.
///
/// The bootstrap never inspects the wrapped error. It only carries the exit
/// status that the process should terminate with.
#[derive(Error, Debug)]
#[error("{source}")]
pub struct ApplicationError {
    code: u8,
    #[source]
    source: BoxedError,
}

impl ApplicationError {
    /// Wraps a downstream failure that exits with the default failure code.
    ///
    /// # Examples
    ///
    /// ```
    /// use modstrap_core::ApplicationError;
    ///
    /// let err = ApplicationError::new("pipeline refused to start");
    /// assert_eq!(err.exit_code(), 1);
    /// assert_eq!(err.to_string(), "pipeline refused to start");
    /// ```
    pub fn new(source: impl Into<BoxedError>) -> Self {
        Self::with_code(FAILURE_EXIT_CODE, source)
    }

    /// Wraps a downstream failure that exits with `code`.
    ///
    /// A code of `0` would report success for a failed run, so it is
    /// replaced with the default failure code.
    pub fn with_code(code: u8, source: impl Into<BoxedError>) -> Self {
        let code = if code == 0 { FAILURE_EXIT_CODE } else { code };
        Self {
            code,
            source: source.into(),
        }
    }

    /// Returns the exit code the process should terminate with.
    #[must_use]
    pub const fn exit_code(&self) -> u8 {
        self.code
    }
}

/// Errors that can occur while materializing a resource tree or handing off
/// to the application.
#[derive(Error, Debug)]
pub enum BootstrapError {
    /// The destination root could not be created.
    #[error("failed to create directory {}: {source}", path.display())]
    Prepare {
        /// The destination root.
        path: PathBuf,
        /// Underlying filesystem error.
        #[source]
        source: std::io::Error,
    },

    /// A tree entry does not resolve to a clean path below the tree root.
    #[error("invalid entry path in resource tree: {}", path.display())]
    InvalidEntryPath {
        /// The offending entry path.
        path: PathBuf,
    },

    /// An embedded file could not be opened or read.
    #[error("failed to read embedded file {}: {source}", path.display())]
    SourceOpen {
        /// Path of the entry inside the resource tree.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },

    /// A directory below the destination root could not be created.
    #[error("failed to create directory {}: {source}", path.display())]
    CreateDir {
        /// Target directory.
        path: PathBuf,
        /// Underlying filesystem error.
        #[source]
        source: std::io::Error,
    },

    /// A destination file could not be created or truncated.
    #[error("failed to create file {}: {source}", path.display())]
    CreateFile {
        /// Target file.
        path: PathBuf,
        /// Underlying filesystem error.
        #[source]
        source: std::io::Error,
    },

    /// Copying bytes into a destination file failed part way.
    #[error("failed to write file {}: {source}", path.display())]
    Write {
        /// Target file.
        path: PathBuf,
        /// Underlying filesystem error.
        #[source]
        source: std::io::Error,
    },

    /// An operation was attempted from the wrong bootstrap phase.
    #[error("bootstrap is in phase {actual}, expected {expected}")]
    InvalidPhase {
        /// Phase the operation requires.
        expected: Phase,
        /// Phase the bootstrap was in.
        actual: Phase,
    },

    /// The downstream application reported failure.
    #[error("application failed: {0}")]
    Application(#[from] ApplicationError),

    /// I/O error outside of materialization, e.g. while inspecting a
    /// destination.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl BootstrapError {
    /// Returns the bootstrap phase this error aborted, if it belongs to one.
    ///
    /// # Examples
    ///
    /// ```
    /// use modstrap_core::BootstrapError;
    /// use modstrap_core::Phase;
    /// use std::path::PathBuf;
    ///
    /// let err = BootstrapError::Prepare {
    ///     path: PathBuf::from("module"),
    ///     source: std::io::Error::other("read-only file system"),
    /// };
    /// assert_eq!(err.phase(), Some(Phase::Preparing));
    /// ```
    #[must_use]
    pub const fn phase(&self) -> Option<Phase> {
        match self {
            Self::Prepare { .. } => Some(Phase::Preparing),
            Self::InvalidEntryPath { .. }
            | Self::SourceOpen { .. }
            | Self::CreateDir { .. }
            | Self::CreateFile { .. }
            | Self::Write { .. } => Some(Phase::Extracting),
            Self::Application(_) => Some(Phase::Running),
            Self::InvalidPhase { .. } | Self::Io(_) => None,
        }
    }

    /// Returns the path that was being processed, if known.
    #[must_use]
    pub fn path(&self) -> Option<&Path> {
        match self {
            Self::Prepare { path, .. }
            | Self::InvalidEntryPath { path }
            | Self::SourceOpen { path, .. }
            | Self::CreateDir { path, .. }
            | Self::CreateFile { path, .. }
            | Self::Write { path, .. } => Some(path),
            Self::InvalidPhase { .. } | Self::Application(_) | Self::Io(_) => None,
        }
    }

    /// Returns the underlying filesystem error, if this is one.
    #[must_use]
    pub const fn io_error(&self) -> Option<&std::io::Error> {
        match self {
            Self::Prepare { source, .. }
            | Self::SourceOpen { source, .. }
            | Self::CreateDir { source, .. }
            | Self::CreateFile { source, .. }
            | Self::Write { source, .. }
            | Self::Io(source) => Some(source),
            Self::InvalidEntryPath { .. } | Self::InvalidPhase { .. } | Self::Application(_) => {
                None
            }
        }
    }

    /// Returns `true` if this error originated from the filesystem.
    #[must_use]
    pub const fn is_io(&self) -> bool {
        self.io_error().is_some()
    }

    /// Returns the exit code the process should terminate with.
    ///
    /// Bootstrap failures always exit with `1`. Application failures exit
    /// with the code the application reported.
    #[must_use]
    pub const fn exit_code(&self) -> u8 {
        match self {
            Self::Application(err) => err.exit_code(),
            _ => FAILURE_EXIT_CODE,
        }
    }
}
