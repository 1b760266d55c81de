//! Startup gate: materialize the resource tree, then hand off to the
//! application.
//!
//! ```text
//! Init -> Preparing -> Extracting -> Ready -> Running -> Exited
//!            |             |
//!            +-------------+--> Aborted
//! ```
//!
//! `Aborted` and `Exited` are terminal. There is no retry: a failed
//! bootstrap needs the underlying condition fixed and a fresh process.

use std::fmt;
use std::path::Path;

use tracing::debug;
use tracing::info;

use crate::ApplicationError;
use crate::BootstrapConfig;
use crate::BootstrapError;
use crate::MaterializeReport;
use crate::ProgressCallback;
use crate::Result;
use crate::extraction::Extractor;
use crate::source::ResourceTree;
use crate::types::DestRoot;

/// Lifecycle phase of a [`Bootstrap`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Phase {
    /// Nothing has happened yet.
    Init,
    /// Creating the destination root.
    Preparing,
    /// Writing the resource tree.
    Extracting,
    /// The tree is on disk; the application has not started.
    Ready,
    /// The application is running.
    Running,
    /// The application returned, successfully or not.
    Exited,
    /// Preparation or extraction failed.
    Aborted,
}

impl Phase {
    /// Returns the lowercase phase name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Init => "init",
            Self::Preparing => "preparing",
            Self::Extracting => "extracting",
            Self::Ready => "ready",
            Self::Running => "running",
            Self::Exited => "exited",
            Self::Aborted => "aborted",
        }
    }

    /// Returns `true` for phases no transition leaves.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Exited | Self::Aborted)
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The application started once the resource tree is on disk.
///
/// The bootstrap does not look into what the application does; it only
/// observes whether `run` succeeds. Closures taking the destination root
/// implement this trait.
///
/// # Examples
///
/// ```
/// use modstrap_core::Application;
/// use modstrap_core::ApplicationError;
/// use std::path::Path;
///
/// struct Pipeline;
///
/// impl Application for Pipeline {
///     fn run(&mut self, root: &Path) -> Result<(), ApplicationError> {
///         if root.join("nginx").is_dir() {
///             Ok(())
///         } else {
///             Err(ApplicationError::new("nginx module missing"))
///         }
///     }
/// }
/// ```
pub trait Application {
    /// Runs the application against the materialized destination root.
    ///
    /// # Errors
    ///
    /// Returns an `ApplicationError` carrying the exit code to propagate.
    fn run(&mut self, root: &Path) -> std::result::Result<(), ApplicationError>;
}

impl<F> Application for F
where
    F: FnMut(&Path) -> std::result::Result<(), ApplicationError>,
{
    fn run(&mut self, root: &Path) -> std::result::Result<(), ApplicationError> {
        self(root)
    }
}

/// Runs the Preparer and the Extractor in order, then the application.
///
/// # Examples
///
/// ```no_run
/// use modstrap_core::ApplicationError;
/// use modstrap_core::Bootstrap;
/// use modstrap_core::BootstrapConfig;
/// use modstrap_core::MemoryTree;
/// use modstrap_core::NoopProgress;
/// use modstrap_core::Phase;
/// use std::path::Path;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let tree = MemoryTree::new("module").with_file("a.yml", "x: 1");
/// let mut bootstrap = Bootstrap::new(&tree, BootstrapConfig::default());
///
/// let mut app = |root: &Path| -> Result<(), ApplicationError> {
///     println!("starting with modules in {}", root.display());
///     Ok(())
/// };
/// bootstrap.run(&mut app, &mut NoopProgress)?;
/// assert_eq!(bootstrap.phase(), Phase::Exited);
/// # Ok(())
/// # }
/// ```
pub struct Bootstrap<'t> {
    tree: &'t dyn ResourceTree,
    config: BootstrapConfig,
    phase: Phase,
    dest: Option<DestRoot>,
}

impl<'t> Bootstrap<'t> {
    /// Creates a bootstrap for `tree` in phase `Init`.
    #[must_use]
    pub fn new(tree: &'t dyn ResourceTree, config: BootstrapConfig) -> Self {
        Self {
            tree,
            config,
            phase: Phase::Init,
            dest: None,
        }
    }

    /// Returns the current phase.
    #[must_use]
    pub const fn phase(&self) -> Phase {
        self.phase
    }

    /// Returns the prepared destination root once preparation succeeded.
    #[must_use]
    pub const fn dest_root(&self) -> Option<&DestRoot> {
        self.dest.as_ref()
    }

    /// Returns the configuration.
    #[must_use]
    pub const fn config(&self) -> &BootstrapConfig {
        &self.config
    }

    /// Prepares the destination root and materializes the tree into it.
    ///
    /// Moves `Init -> Preparing -> Extracting -> Ready`, or to `Aborted` on
    /// the first failure.
    ///
    /// # Errors
    ///
    /// - `InvalidPhase` unless called in phase `Init` (phase unchanged)
    /// - `Prepare` if the destination root cannot be created
    /// - any extraction error from [`Extractor::extract`]
    pub fn materialize(
        &mut self,
        progress: &mut dyn ProgressCallback,
    ) -> Result<MaterializeReport> {
        self.expect_phase(Phase::Init)?;

        self.enter(Phase::Preparing);
        let dest = match DestRoot::prepare(&self.config.dest_root, self.config.dir_mode) {
            Ok(dest) => dest,
            Err(err) => return Err(self.abort(err)),
        };

        self.enter(Phase::Extracting);
        let report = match Extractor::new(self.tree, &self.config).extract(&dest, progress) {
            Ok(report) => report,
            Err(err) => return Err(self.abort(err)),
        };

        info!(
            dest = %dest.as_path().display(),
            files = report.files_written,
            bytes = report.bytes_written,
            "resource tree ready"
        );
        self.dest = Some(dest);
        self.enter(Phase::Ready);

        Ok(report)
    }

    /// Hands control to `app` and returns its outcome.
    ///
    /// Moves `Ready -> Running -> Exited`.
    ///
    /// # Errors
    ///
    /// - `InvalidPhase` unless called in phase `Ready` (phase unchanged)
    /// - `Application` if the application fails
    pub fn launch<A: Application + ?Sized>(&mut self, app: &mut A) -> Result<()> {
        self.expect_phase(Phase::Ready)?;
        let Some(dest) = self.dest.as_ref() else {
            return Err(BootstrapError::InvalidPhase {
                expected: Phase::Ready,
                actual: self.phase,
            });
        };
        let root = dest.as_path().to_path_buf();

        self.enter(Phase::Running);
        let outcome = app.run(&root);
        self.enter(Phase::Exited);

        outcome.map_err(|err| {
            debug!(code = err.exit_code(), error = %err, "application failed");
            BootstrapError::Application(err)
        })
    }

    /// Runs [`materialize`](Self::materialize) and then
    /// [`launch`](Self::launch).
    ///
    /// The application is never started if materialization fails.
    ///
    /// # Errors
    ///
    /// Returns the first error of either step.
    pub fn run<A: Application + ?Sized>(
        &mut self,
        app: &mut A,
        progress: &mut dyn ProgressCallback,
    ) -> Result<MaterializeReport> {
        let report = self.materialize(progress)?;
        self.launch(app)?;
        Ok(report)
    }

    fn expect_phase(&self, expected: Phase) -> Result<()> {
        if self.phase == expected {
            Ok(())
        } else {
            Err(BootstrapError::InvalidPhase {
                expected,
                actual: self.phase,
            })
        }
    }

    fn enter(&mut self, phase: Phase) {
        debug!(from = %self.phase, to = %phase, "bootstrap phase");
        self.phase = phase;
    }

    fn abort(&mut self, err: BootstrapError) -> BootstrapError {
        debug!(phase = %self.phase, error = %err, "bootstrap aborted");
        self.phase = Phase::Aborted;
        err
    }
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::MemoryTree;
    use crate::NoopProgress;
    use std::fs;
    use std::path::PathBuf;
    use tempfile::TempDir;

    fn scenario_tree() -> MemoryTree {
        MemoryTree::new("module")
            .with_file("a.yml", "x: 1")
            .with_file("sub/b.yml", "y: 2")
    }

    fn config_in(temp: &TempDir) -> BootstrapConfig {
        BootstrapConfig::default().with_dest_root(temp.path().join("module"))
    }

    #[test]
    fn test_phase_display() {
        assert_eq!(Phase::Init.to_string(), "init");
        assert_eq!(Phase::Aborted.to_string(), "aborted");
        assert!(Phase::Aborted.is_terminal());
        assert!(Phase::Exited.is_terminal());
        assert!(!Phase::Ready.is_terminal());
    }

    #[test]
    fn test_materialize_reaches_ready() {
        let temp = TempDir::new().expect("failed to create temp dir");
        let tree = scenario_tree();
        let mut bootstrap = Bootstrap::new(&tree, config_in(&temp));
        assert_eq!(bootstrap.phase(), Phase::Init);

        let report = bootstrap.materialize(&mut NoopProgress).unwrap();
        assert_eq!(bootstrap.phase(), Phase::Ready);
        assert_eq!(report.files_written, 2);
        assert!(bootstrap.dest_root().is_some());
        assert!(temp.path().join("module/sub/b.yml").is_file());
    }

    #[test]
    fn test_run_hands_root_to_application() {
        let temp = TempDir::new().expect("failed to create temp dir");
        let tree = scenario_tree();
        let mut bootstrap = Bootstrap::new(&tree, config_in(&temp));

        let mut seen: Option<PathBuf> = None;
        let mut app = |root: &Path| -> std::result::Result<(), ApplicationError> {
            assert_eq!(fs::read_to_string(root.join("a.yml")).unwrap(), "x: 1");
            seen = Some(root.to_path_buf());
            Ok(())
        };
        bootstrap.run(&mut app, &mut NoopProgress).unwrap();

        assert_eq!(bootstrap.phase(), Phase::Exited);
        assert_eq!(
            seen,
            Some(temp.path().join("module").canonicalize().unwrap())
        );
    }

    #[test]
    fn test_prepare_failure_aborts_before_application() {
        let temp = TempDir::new().expect("failed to create temp dir");
        fs::write(temp.path().join("module"), "occupied").unwrap();
        let tree = scenario_tree();
        let mut bootstrap = Bootstrap::new(&tree, config_in(&temp));

        let mut started = false;
        let mut app = |_: &Path| -> std::result::Result<(), ApplicationError> {
            started = true;
            Ok(())
        };
        let err = bootstrap.run(&mut app, &mut NoopProgress).unwrap_err();

        assert!(matches!(err, BootstrapError::Prepare { .. }));
        assert_eq!(err.exit_code(), 1);
        assert_eq!(bootstrap.phase(), Phase::Aborted);
        assert!(bootstrap.dest_root().is_none());
        assert!(!started);
    }

    #[test]
    fn test_extract_failure_aborts() {
        let temp = TempDir::new().expect("failed to create temp dir");
        let dest = temp.path().join("module");
        fs::create_dir(&dest).unwrap();
        fs::write(dest.join("sub"), "blocker").unwrap();
        let tree = scenario_tree();
        let mut bootstrap = Bootstrap::new(&tree, config_in(&temp));

        let err = bootstrap.materialize(&mut NoopProgress).unwrap_err();
        assert_eq!(err.phase(), Some(Phase::Extracting));
        assert_eq!(bootstrap.phase(), Phase::Aborted);
    }

    #[test]
    fn test_application_failure_propagates_code() {
        let temp = TempDir::new().expect("failed to create temp dir");
        let tree = scenario_tree();
        let mut bootstrap = Bootstrap::new(&tree, config_in(&temp));

        let mut app = |_: &Path| -> std::result::Result<(), ApplicationError> {
            Err(ApplicationError::with_code(7, "pipeline crashed"))
        };
        let err = bootstrap.run(&mut app, &mut NoopProgress).unwrap_err();

        assert_eq!(err.exit_code(), 7);
        assert_eq!(bootstrap.phase(), Phase::Exited);
        assert!(err.to_string().contains("pipeline crashed"));
    }

    #[test]
    fn test_launch_before_materialize_rejected() {
        let tree = scenario_tree();
        let mut bootstrap = Bootstrap::new(&tree, BootstrapConfig::default());
        let mut app = |_: &Path| -> std::result::Result<(), ApplicationError> { Ok(()) };

        let err = bootstrap.launch(&mut app).unwrap_err();
        assert!(matches!(
            err,
            BootstrapError::InvalidPhase {
                expected: Phase::Ready,
                actual: Phase::Init
            }
        ));
        assert_eq!(bootstrap.phase(), Phase::Init);
    }

    #[test]
    fn test_materialize_twice_rejected() {
        let temp = TempDir::new().expect("failed to create temp dir");
        let tree = scenario_tree();
        let mut bootstrap = Bootstrap::new(&tree, config_in(&temp));
        bootstrap.materialize(&mut NoopProgress).unwrap();

        let err = bootstrap.materialize(&mut NoopProgress).unwrap_err();
        assert!(matches!(err, BootstrapError::InvalidPhase { .. }));
        assert_eq!(bootstrap.phase(), Phase::Ready);
    }
}
