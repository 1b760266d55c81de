//! Modstrap CLI - writes the module tree compiled into the binary to disk,
//! then runs the downstream command.

mod cli;
mod commands;
mod error;
mod output;
mod progress;

use clap::Parser;
use include_dir::Dir;
use include_dir::include_dir;
use modstrap_core::EmbeddedTree;
use std::io;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

/// Name of the embedded tree root, also the default destination.
const MODULE_ROOT: &str = "module";

static MODULE_DIR: Dir<'static> = include_dir!("$CARGO_MANIFEST_DIR/module");

fn main() -> ExitCode {
    let cli = cli::Cli::parse();
    init_tracing(cli.verbose, cli.quiet);

    let formatter = output::formatter_for(&cli);
    let tree = EmbeddedTree::new(MODULE_ROOT, &MODULE_DIR);

    let result = match &cli.command {
        cli::Commands::Run(args) => {
            let show_progress = progress::CliProgress::should_show(cli.quiet, cli.json);
            commands::run::execute(args, &tree, &*formatter, show_progress)
        }
        cli::Commands::List(args) => {
            commands::list::execute(args, &tree, &*formatter).map(|()| ExitCode::SUCCESS)
        }
        cli::Commands::Verify(args) => commands::verify::execute(args, &tree, &*formatter),
        cli::Commands::Completion(args) => {
            commands::completion::execute(args.shell);
            Ok(ExitCode::SUCCESS)
        }
    };

    result.unwrap_or_else(|err| {
        formatter.format_error(cli.command.operation(), &err);
        ExitCode::FAILURE
    })
}

/// Installs a stderr `fmt` subscriber. `RUST_LOG` takes precedence over the
/// verbosity flags.
fn init_tracing(verbose: bool, quiet: bool) {
    let default = if verbose {
        "debug"
    } else if quiet {
        "error"
    } else {
        "warn"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}
