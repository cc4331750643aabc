//! System-wide constants and default paths.

use std::path::PathBuf;
use std::sync::OnceLock;

/// Default lxcpath for privileged containers.
pub const SYSTEM_LXC_PATH: &str = "/var/lib/lxc";

/// Location of unprivileged containers relative to `$HOME`.
pub const USER_LXC_PATH: &str = ".local/share/lxc";

/// Soname loaded when no library is configured.
pub const DEFAULT_LIBRARY: &str = "liblxc.so.1";

/// Name of the per-container configuration file inside its directory.
pub const CONFIG_FILE_NAME: &str = "config";

/// Environment variable overriding the lxcpath.
pub const LXC_PATH_ENV: &str = "LXCBIND_LXC_PATH";

/// Environment variable overriding the library soname.
pub const LIBRARY_ENV: &str = "LXCBIND_LIBRARY";

/// Default shutdown grace period in seconds.
pub const DEFAULT_SHUTDOWN_TIMEOUT_SECS: u32 = 30;

/// Binary name for the CLI.
pub const BIN_NAME: &str = "lxcctl";

/// Approximates liblxc's built-in lxcpath for the current user; used where
/// liblxc itself is not consulted.
fn resolve_lxc_path() -> PathBuf {
    if nix::unistd::geteuid().is_root() {
        return PathBuf::from(SYSTEM_LXC_PATH);
    }
    match std::env::var("HOME") {
        Ok(home) => PathBuf::from(home).join(USER_LXC_PATH),
        Err(_) => PathBuf::from(SYSTEM_LXC_PATH),
    }
}

static LXC_PATH: OnceLock<PathBuf> = OnceLock::new();

/// Returns the approximate default lxcpath for this session.
pub fn default_lxc_path() -> &'static PathBuf {
    LXC_PATH.get_or_init(resolve_lxc_path)
}

/// Returns the configuration file path of `name` under `lxc_path`.
#[must_use]
pub fn container_config_path(lxc_path: &std::path::Path, name: &str) -> PathBuf {
    lxc_path.join(name).join(CONFIG_FILE_NAME)
}
