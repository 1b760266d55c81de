//! Verify command implementation

use crate::cli::VerifyArgs;
use crate::error::add_bootstrap_context;
use crate::output::OutputFormatter;
use anyhow::Result;
use modstrap_core::ResourceTree;
use modstrap_core::verify_tree;
use std::process::ExitCode;
use tracing::info;

/// Compares the destination with the tree; exits with `1` on any issue.
pub fn execute(
    args: &VerifyArgs,
    tree: &dyn ResourceTree,
    formatter: &dyn OutputFormatter,
) -> Result<ExitCode> {
    let report = add_bootstrap_context(verify_tree(tree, &args.dest.dest))?;

    formatter.format_verification_report(&report)?;

    if report.is_clean() {
        Ok(ExitCode::SUCCESS)
    } else {
        info!(issues = report.issues.len(), "destination differs from module tree");
        Ok(ExitCode::FAILURE)
    }
}
