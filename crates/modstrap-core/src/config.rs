//! Bootstrap configuration.

use std::path::PathBuf;

/// Default destination root, relative to the working directory.
pub const DEFAULT_DEST_ROOT: &str = "module";

/// Default permission mode for created directories (`rwxr-xr-x`).
pub const DEFAULT_DIR_MODE: u32 = 0o755;

/// Configuration for materializing a resource tree.
///
/// # Examples
///
/// ```
/// use modstrap_core::BootstrapConfig;
///
/// // Write into ./module with rwxr-xr-x directories
/// let config = BootstrapConfig::default();
///
/// let custom = BootstrapConfig::default()
///     .with_dest_root("/var/lib/beat/module")
///     .with_dir_mode(0o750);
/// assert_eq!(custom.dir_mode, 0o750);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BootstrapConfig {
    /// Directory the tree is written into. Relative paths resolve against
    /// the working directory.
    pub dest_root: PathBuf,

    /// Permission mode for every directory created. Ignored on non-Unix
    /// platforms.
    pub dir_mode: u32,
}

impl Default for BootstrapConfig {
    /// Creates a `BootstrapConfig` writing into `./module` with `0o755`
    /// directories.
    fn default() -> Self {
        Self {
            dest_root: PathBuf::from(DEFAULT_DEST_ROOT),
            dir_mode: DEFAULT_DIR_MODE,
        }
    }
}

impl BootstrapConfig {
    /// Sets the destination root.
    #[must_use]
    pub fn with_dest_root(mut self, dest_root: impl Into<PathBuf>) -> Self {
        self.dest_root = dest_root.into();
        self
    }

    /// Sets the directory permission mode.
    #[must_use]
    pub fn with_dir_mode(mut self, dir_mode: u32) -> Self {
        self.dir_mode = dir_mode;
        self
    }
}
