//! `lxcctl wait`: block until a container reaches a lifecycle state.

use clap::Args;
use lxcbind_common::types::{LifecycleState, Timeout};

use super::Context;

/// Arguments for the `wait` command.
#[derive(Args, Debug)]
pub struct WaitArgs {
    /// Container name.
    pub name: String,

    /// Target state (e.g. RUNNING, STOPPED, FROZEN).
    pub state: String,

    /// Seconds to wait; -1 waits forever, 0 checks once.
    #[arg(short, long, default_value_t = -1, allow_hyphen_values = true)]
    pub timeout: i32,
}

/// Executes the `wait` command.
///
/// # Errors
///
/// Returns an error for an unknown state name or if the state is not
/// reached before the timeout.
pub fn execute(ctx: &Context, args: &WaitArgs) -> anyhow::Result<()> {
    let state = parse_state(&args.state)?;
    let timeout = Timeout::from_native(args.timeout);
    ctx.open(&args.name)?.wait_for_state(state, timeout)?;
    println!("{} is {state}", args.name);
    Ok(())
}

fn parse_state(name: &str) -> anyhow::Result<LifecycleState> {
    let Ok(state) = name.parse::<LifecycleState>();
    if state == LifecycleState::Invalid {
        anyhow::bail!("unknown state {name:?}; expected one of {}", known_states());
    }
    Ok(state)
}

fn known_states() -> String {
    LifecycleState::KNOWN
        .into_iter()
        .map(LifecycleState::as_str)
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn state_names_are_case_insensitive() {
        assert_eq!(parse_state("running").unwrap(), LifecycleState::Running);
        assert_eq!(parse_state("FROZEN").unwrap(), LifecycleState::Frozen);
    }

    #[test]
    fn unknown_state_is_rejected() {
        let err = parse_state("sleeping").unwrap_err();
        assert!(err.to_string().contains("STOPPED"));
    }
}
