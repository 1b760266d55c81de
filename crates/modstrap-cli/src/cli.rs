//! CLI argument parsing using clap.

use clap::Parser;
use clap::Subcommand;
use clap_complete::Shell;
use modstrap_core::BootstrapConfig;
use modstrap_core::config::DEFAULT_DEST_ROOT;
use std::ffi::OsString;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "modstrap")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress non-error output
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Output results in JSON format
    #[arg(short, long, global = true)]
    pub json: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Write the embedded module tree to disk, then run COMMAND
    Run(RunArgs),
    /// List the embedded module tree
    List(ListArgs),
    /// Check a destination against the embedded module tree
    Verify(VerifyArgs),
    /// Print shell completions
    Completion(CompletionArgs),
}

impl Commands {
    /// Operation name used in JSON output.
    pub const fn operation(&self) -> &'static str {
        match self {
            Self::Run(_) => "run",
            Self::List(_) => "list",
            Self::Verify(_) => "verify",
            Self::Completion(_) => "completion",
        }
    }
}

#[derive(clap::Args)]
pub struct DestArgs {
    /// Destination root for the module tree
    #[arg(
        short,
        long,
        value_name = "DIR",
        env = "MODSTRAP_DEST",
        default_value = DEFAULT_DEST_ROOT
    )]
    pub dest: PathBuf,
}

#[derive(clap::Args)]
pub struct RunArgs {
    #[command(flatten)]
    pub dest: DestArgs,

    /// Permission mode for created directories (octal)
    #[arg(long, value_name = "MODE", default_value = "755", value_parser = parse_octal_mode)]
    pub dir_mode: u32,

    /// Command to run once the tree is in place
    #[arg(last = true, value_name = "COMMAND")]
    pub command: Vec<OsString>,
}

impl RunArgs {
    pub fn config(&self) -> BootstrapConfig {
        BootstrapConfig::default()
            .with_dest_root(&self.dest.dest)
            .with_dir_mode(self.dir_mode)
    }
}

#[derive(clap::Args)]
pub struct ListArgs {
    /// Show kind and size of every entry
    #[arg(short, long)]
    pub long: bool,

    /// Show sizes in human-readable format
    #[arg(short = 'H', long)]
    pub human_readable: bool,
}

#[derive(clap::Args)]
pub struct VerifyArgs {
    #[command(flatten)]
    pub dest: DestArgs,
}

#[derive(clap::Args)]
pub struct CompletionArgs {
    /// Target shell
    #[arg(value_enum)]
    pub shell: Shell,
}

/// Parse a permission mode written in octal, with or without a `0o` prefix.
fn parse_octal_mode(s: &str) -> Result<u32, String> {
    let s = s.trim();
    let digits = s.strip_prefix("0o").unwrap_or(s);
    if digits.is_empty() {
        return Err("empty mode".to_string());
    }

    let mode = u32::from_str_radix(digits, 8).map_err(|_| format!("invalid octal mode: {s}"))?;
    if mode > 0o7777 {
        return Err(format!("mode out of range: {s}"));
    }
    Ok(mode)
}
