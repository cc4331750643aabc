//! `lxcctl create|start|stop|shutdown|freeze|unfreeze|destroy`: state
//! changing operations.
//!
//! Each command opens one handle, issues one native call, and exits non-zero
//! if the call reports failure.

use clap::Args;
use lxcbind_common::constants::DEFAULT_SHUTDOWN_TIMEOUT_SECS;
use lxcbind_common::types::Timeout;

use super::Context;

/// Arguments for commands that only need a container name.
#[derive(Args, Debug)]
pub struct NameArgs {
    /// Container name.
    pub name: String,
}

/// Arguments for the `create` command.
#[derive(Args, Debug)]
pub struct CreateArgs {
    /// Container name.
    pub name: String,

    /// Template to run (e.g. `download`, `busybox`).
    #[arg(short, long)]
    pub template: String,

    /// Arguments forwarded to the template, after `--`.
    #[arg(last = true)]
    pub template_args: Vec<String>,
}

/// Arguments for the `start` command.
#[derive(Args, Debug)]
pub struct StartArgs {
    /// Container name.
    pub name: String,

    /// Run the command under liblxc's init wrapper.
    #[arg(long)]
    pub use_init: bool,

    /// Stay in the foreground instead of daemonizing.
    #[arg(short = 'F', long)]
    pub foreground: bool,

    /// Command to run instead of the configured init, after `--`.
    #[arg(last = true)]
    pub command: Vec<String>,
}

/// Arguments for the `shutdown` command.
#[derive(Args, Debug)]
pub struct ShutdownArgs {
    /// Container name.
    pub name: String,

    /// Seconds to wait; -1 waits forever, 0 does not wait. Defaults to the
    /// configured shutdown timeout.
    #[arg(short, long, allow_hyphen_values = true)]
    pub timeout: Option<i32>,
}

/// `None` for an empty list so the library sees no argument vector.
fn as_args(values: &[String]) -> Option<Vec<&str>> {
    (!values.is_empty()).then(|| values.iter().map(String::as_str).collect())
}

/// Executes the `create` command.
///
/// # Errors
///
/// Returns an error if the template run fails.
pub fn execute_create(ctx: &Context, args: &CreateArgs) -> anyhow::Result<()> {
    let mut handle = ctx.open(&args.name)?;
    let template_args = as_args(&args.template_args);
    handle.create(&args.template, template_args.as_deref())?;
    println!("Created {}", args.name);
    Ok(())
}

/// Executes the `start` command.
///
/// # Errors
///
/// Returns an error if the container cannot start.
pub fn execute_start(ctx: &Context, args: &StartArgs) -> anyhow::Result<()> {
    let mut handle = ctx.open(&args.name)?;
    if !args.foreground {
        handle.want_daemonize();
    }
    let command = as_args(&args.command);
    handle.start(args.use_init, command.as_deref())?;
    println!("Started {}", args.name);
    Ok(())
}

/// Executes the `stop` command.
///
/// # Errors
///
/// Returns an error if the container cannot be stopped.
pub fn execute_stop(ctx: &Context, args: &NameArgs) -> anyhow::Result<()> {
    ctx.open(&args.name)?.stop()?;
    println!("Stopped {}", args.name);
    Ok(())
}

/// Executes the `shutdown` command.
///
/// # Errors
///
/// Returns an error if the container is still running after the timeout.
pub fn execute_shutdown(ctx: &Context, args: &ShutdownArgs) -> anyhow::Result<()> {
    let timeout = args.timeout.map_or_else(
        || Timeout::Seconds(ctx.config.shutdown_timeout_secs),
        Timeout::from_native,
    );
    ctx.open(&args.name)?.shutdown(timeout)?;
    println!("Shut down {}", args.name);
    Ok(())
}

/// Executes the `freeze` command.
///
/// # Errors
///
/// Returns an error unless the container was running.
pub fn execute_freeze(ctx: &Context, args: &NameArgs) -> anyhow::Result<()> {
    ctx.open(&args.name)?.freeze()?;
    println!("Frozen {}", args.name);
    Ok(())
}

/// Executes the `unfreeze` command.
///
/// # Errors
///
/// Returns an error unless the container was frozen.
pub fn execute_unfreeze(ctx: &Context, args: &NameArgs) -> anyhow::Result<()> {
    ctx.open(&args.name)?.unfreeze()?;
    println!("Unfrozen {}", args.name);
    Ok(())
}

/// Executes the `destroy` command.
///
/// # Errors
///
/// Returns an error if the container is undefined or still running.
pub fn execute_destroy(ctx: &Context, args: &NameArgs) -> anyhow::Result<()> {
    ctx.open(&args.name)?.destroy()?;
    println!("Destroyed {}", args.name);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_argument_list_is_absent() {
        assert_eq!(as_args(&[]), None);
    }

    #[test]
    fn argument_list_is_borrowed_in_order() {
        let values = vec!["-d".to_string(), "ubuntu".to_string()];
        assert_eq!(as_args(&values), Some(vec!["-d", "ubuntu"]));
    }
}
