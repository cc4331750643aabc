//! `lxcctl info` and `lxcctl state`: read-only container queries.

use clap::Args;

use super::Context;
use crate::output;

/// Arguments for the `info` and `state` commands.
#[derive(Args, Debug)]
pub struct InfoArgs {
    /// Container name.
    pub name: String,
}

/// Prints the container summary.
///
/// # Errors
///
/// Returns an error if the handle cannot be opened.
pub fn execute_info(ctx: &Context, args: &InfoArgs) -> anyhow::Result<()> {
    let handle = ctx.open(&args.name)?;
    output::emit(ctx.json, &handle.summary(), output::summary_table)
}

/// Prints the lifecycle state name.
///
/// # Errors
///
/// Returns an error if the handle cannot be opened.
pub fn execute_state(ctx: &Context, args: &InfoArgs) -> anyhow::Result<()> {
    let handle = ctx.open(&args.name)?;
    output::emit(ctx.json, &handle.state(), ToString::to_string)
}
