//! Run command implementation.
//!
//! Materializes the embedded tree, then hands off to the downstream
//! command as a child process.

use crate::cli::RunArgs;
use crate::error::add_bootstrap_context;
use crate::output::OutputFormatter;
use crate::progress::CliProgress;
use anyhow::Result;
use modstrap_core::Application;
use modstrap_core::ApplicationError;
use modstrap_core::Bootstrap;
use modstrap_core::BootstrapError;
use modstrap_core::NoopProgress;
use modstrap_core::ResourceTree;
use std::error::Error;
use std::ffi::OsString;
use std::fmt;
use std::io;
use std::path::Path;
use std::process::Command;
use std::process::ExitCode;
use std::process::ExitStatus;
use tracing::debug;

/// Environment variable carrying the destination root to the child.
pub const ROOT_ENV: &str = "MODSTRAP_ROOT";

pub fn execute(
    args: &RunArgs,
    tree: &dyn ResourceTree,
    formatter: &dyn OutputFormatter,
    show_progress: bool,
) -> Result<ExitCode> {
    let mut bootstrap = Bootstrap::new(tree, args.config());

    let report = if show_progress {
        let mut progress = CliProgress::new("Writing module");
        add_bootstrap_context(bootstrap.materialize(&mut progress))?
    } else {
        add_bootstrap_context(bootstrap.materialize(&mut NoopProgress))?
    };

    formatter.format_materialize_result(&report)?;

    let mut app: Box<dyn Application> = match args.command.split_first() {
        Some((program, rest)) => Box::new(CommandApplication::new(program.clone(), rest.to_vec())),
        None => Box::new(NoopApplication),
    };

    match bootstrap.launch(app.as_mut()) {
        Ok(()) => Ok(ExitCode::SUCCESS),
        // The child already reported its own failure
        Err(BootstrapError::Application(err)) if is_child_exit(&err) => {
            Ok(ExitCode::from(err.exit_code()))
        }
        Err(err) => add_bootstrap_context(Err(err)),
    }
}

fn is_child_exit(err: &ApplicationError) -> bool {
    err.source().is_some_and(|source| source.is::<ChildExit>())
}

/// Application step used when no command is given.
struct NoopApplication;

impl Application for NoopApplication {
    fn run(&mut self, root: &Path) -> Result<(), ApplicationError> {
        debug!(root = %root.display(), "no command given");
        Ok(())
    }
}

/// Runs an external program with the destination root in [`ROOT_ENV`].
#[derive(Debug)]
pub struct CommandApplication {
    program: OsString,
    args: Vec<OsString>,
}

impl CommandApplication {
    pub fn new(program: OsString, args: Vec<OsString>) -> Self {
        Self { program, args }
    }
}

impl Application for CommandApplication {
    fn run(&mut self, root: &Path) -> Result<(), ApplicationError> {
        debug!(program = ?self.program, root = %root.display(), "starting application");

        let status = Command::new(&self.program)
            .args(&self.args)
            .env(ROOT_ENV, root)
            .status()
            .map_err(|e| {
                ApplicationError::new(io::Error::new(
                    e.kind(),
                    format!("cannot start {}: {e}", self.program.to_string_lossy()),
                ))
            })?;

        if status.success() {
            Ok(())
        } else {
            debug!(%status, "application exited");
            Err(ApplicationError::with_code(exit_code_of(status), ChildExit(status)))
        }
    }
}

/// Exit code to propagate for a failed child; `1` if it was killed by a
/// signal or reported a code outside `1..=255`.
fn exit_code_of(status: ExitStatus) -> u8 {
    status
        .code()
        .and_then(|code| u8::try_from(code).ok())
        .unwrap_or(1)
}

#[derive(Debug)]
struct ChildExit(ExitStatus);

impl fmt::Display for ChildExit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "application exited with {}", self.0)
    }
}

impl Error for ChildExit {}
