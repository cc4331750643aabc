//! Domain primitive types used across the lxcbind workspace.

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Lifecycle state of a container as reported by liblxc.
///
/// The native library owns the state machine; this type only names what it
/// reports. Any string liblxc returns that is not one of the known names
/// parses to [`LifecycleState::Invalid`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LifecycleState {
    /// No init process is running.
    Stopped,
    /// The init process is being launched.
    Starting,
    /// The init process is live.
    Running,
    /// The container is being torn down.
    Stopping,
    /// A transition failed and the container is exiting.
    Aborting,
    /// The freezer cgroup is being frozen.
    Freezing,
    /// All processes are frozen.
    Frozen,
    /// The freezer cgroup was thawed.
    Thawed,
    /// Upper bound of the native enumeration, never reached.
    MaxState,
    /// Anything outside the known set.
    #[serde(rename = "<INVALID>")]
    Invalid,
}

impl LifecycleState {
    /// Every state liblxc can name, in native enumeration order.
    pub const KNOWN: [Self; 9] = [
        Self::Stopped,
        Self::Starting,
        Self::Running,
        Self::Stopping,
        Self::Aborting,
        Self::Freezing,
        Self::Frozen,
        Self::Thawed,
        Self::MaxState,
    ];

    /// Returns the native spelling of the state.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Stopped => "STOPPED",
            Self::Starting => "STARTING",
            Self::Running => "RUNNING",
            Self::Stopping => "STOPPING",
            Self::Aborting => "ABORTING",
            Self::Freezing => "FREEZING",
            Self::Frozen => "FROZEN",
            Self::Thawed => "THAWED",
            Self::MaxState => "MAX_STATE",
            Self::Invalid => "<INVALID>",
        }
    }

    /// Maps a native state string, falling back to [`LifecycleState::Invalid`].
    #[must_use]
    pub fn from_native(s: &str) -> Self {
        Self::KNOWN
            .into_iter()
            .find(|state| state.as_str() == s)
            .unwrap_or(Self::Invalid)
    }

    /// Returns whether the container has an init process in this state.
    #[must_use]
    pub const fn is_active(self) -> bool {
        matches!(
            self,
            Self::Starting | Self::Running | Self::Freezing | Self::Frozen | Self::Thawed
        )
    }
}

impl fmt::Display for LifecycleState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LifecycleState {
    type Err = std::convert::Infallible;

    /// Case-insensitive parse used by the CLI; unknown names become `Invalid`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::from_native(&s.trim().to_ascii_uppercase()))
    }
}

/// Bounded wait passed to `shutdown` and `wait`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Timeout {
    /// Block until the condition holds.
    Forever,
    /// Check once and return.
    DontWait,
    /// Block for at most this many seconds.
    Seconds(u32),
}

impl Timeout {
    /// Native sentinel for [`Timeout::Forever`].
    pub const NATIVE_FOREVER: i32 = -1;
    /// Native sentinel for [`Timeout::DontWait`].
    pub const NATIVE_DONT_WAIT: i32 = 0;

    /// Encodes the timeout the way liblxc expects it.
    #[must_use]
    pub fn as_native(self) -> i32 {
        match self {
            Self::Forever => Self::NATIVE_FOREVER,
            Self::DontWait | Self::Seconds(0) => Self::NATIVE_DONT_WAIT,
            Self::Seconds(n) => i32::try_from(n).unwrap_or(i32::MAX),
        }
    }

    /// Decodes a native timeout; any negative value means forever.
    #[must_use]
    pub fn from_native(value: i32) -> Self {
        match value {
            v if v < 0 => Self::Forever,
            0 => Self::DontWait,
            v => Self::Seconds(v.unsigned_abs()),
        }
    }

    /// Returns the wait as a duration, `None` meaning unbounded.
    #[must_use]
    pub fn as_duration(self) -> Option<std::time::Duration> {
        match self {
            Self::Forever => None,
            Self::DontWait => Some(std::time::Duration::ZERO),
            Self::Seconds(n) => Some(std::time::Duration::from_secs(u64::from(n))),
        }
    }
}

impl fmt::Display for Timeout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Forever => write!(f, "forever"),
            Self::DontWait => write!(f, "no wait"),
            Self::Seconds(n) => write!(f, "{n}s"),
        }
    }
}

/// Point-in-time snapshot of a container's observable properties.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContainerSummary {
    /// Container name.
    pub name: String,
    /// Lifecycle state at the time of the query.
    pub state: LifecycleState,
    /// Whether a configuration exists for this container.
    pub defined: bool,
    /// Whether the init process was active.
    pub running: bool,
    /// PID of the init process, if running.
    pub init_pid: Option<i32>,
    /// Path to the container's configuration file.
    pub config_file: Option<PathBuf>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_known_state_roundtrips_through_native_name() {
        for state in LifecycleState::KNOWN {
            assert_eq!(LifecycleState::from_native(state.as_str()), state);
        }
    }

    #[test]
    fn unknown_native_name_is_invalid() {
        assert_eq!(LifecycleState::from_native("BOGUS"), LifecycleState::Invalid);
        assert_eq!(LifecycleState::from_native(""), LifecycleState::Invalid);
        assert_eq!(LifecycleState::Invalid.to_string(), "<INVALID>");
    }

    #[test]
    fn json_spelling_matches_display() {
        for state in LifecycleState::KNOWN
            .into_iter()
            .chain([LifecycleState::Invalid])
        {
            let json = serde_json::to_string(&state).unwrap();
            assert_eq!(json, format!("\"{state}\""));
            assert_eq!(serde_json::from_str::<LifecycleState>(&json).unwrap(), state);
        }
    }

    #[test]
    fn parse_is_case_insensitive() {
        let state: LifecycleState = "running".parse().unwrap();
        assert_eq!(state, LifecycleState::Running);
        let state: LifecycleState = " max_state ".parse().unwrap();
        assert_eq!(state, LifecycleState::MaxState);
    }

    #[test]
    fn timeout_native_sentinels() {
        assert_eq!(Timeout::Forever.as_native(), -1);
        assert_eq!(Timeout::DontWait.as_native(), 0);
        assert_eq!(Timeout::Seconds(0).as_native(), 0);
        assert_eq!(Timeout::Seconds(30).as_native(), 30);
        assert_eq!(Timeout::Seconds(u32::MAX).as_native(), i32::MAX);
    }

    #[test]
    fn timeout_decodes_any_negative_as_forever() {
        assert_eq!(Timeout::from_native(-5), Timeout::Forever);
        assert_eq!(Timeout::from_native(0), Timeout::DontWait);
        assert_eq!(Timeout::from_native(7), Timeout::Seconds(7));
    }

    #[test]
    fn only_live_states_are_active() {
        assert!(LifecycleState::Running.is_active());
        assert!(LifecycleState::Frozen.is_active());
        assert!(!LifecycleState::Stopped.is_active());
        assert!(!LifecycleState::Invalid.is_active());
    }

    #[test]
    fn summary_serializes_state_in_native_spelling() {
        let summary = ContainerSummary {
            name: "web".into(),
            state: LifecycleState::MaxState,
            defined: true,
            running: false,
            init_pid: None,
            config_file: None,
        };
        let json = serde_json::to_string(&summary).unwrap();
        assert!(json.contains("\"MAX_STATE\""));
    }
}
