//! List command implementation

use crate::cli::ListArgs;
use crate::error::add_bootstrap_context;
use crate::output::OutputFormatter;
use anyhow::Result;
use modstrap_core::ResourceTree;
use modstrap_core::list_tree;

pub fn execute(
    args: &ListArgs,
    tree: &dyn ResourceTree,
    formatter: &dyn OutputFormatter,
) -> Result<()> {
    let manifest = add_bootstrap_context(list_tree(tree))?;

    if args.long {
        formatter.format_manifest_long(&manifest, args.human_readable)?;
    } else {
        formatter.format_manifest_short(&manifest)?;
    }

    Ok(())
}
