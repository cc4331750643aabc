//! Native library abstraction.
//!
//! [`NativeLibrary`] and [`NativeContainer`] mirror liblxc's entry points
//! one-to-one, already translated to Rust primitives: strings arrive as
//! `CStr`, results leave as `bool`, `Option<String>` or raw integers. The
//! handle in [`crate::container`] owns all policy; implementors only forward.

pub mod liblxc;
pub mod simulated;

use std::ffi::CStr;

use lxcbind_common::config::LxcConfig;
use lxcbind_common::constants::default_lxc_path;
use lxcbind_common::error::Result;

use crate::marshal::NativeArgv;

/// A source of native container objects.
pub trait NativeLibrary: Send + Sync {
    /// Allocates a container object for `name` under `config_path`
    /// (the default lxcpath when `None`). `None` means allocation failed.
    fn new_container(
        &self,
        name: &CStr,
        config_path: Option<&CStr>,
    ) -> Option<Box<dyn NativeContainer>>;

    /// Version string of the native library.
    fn version(&self) -> Option<String>;

    /// lxcpath used when a container is opened without one.
    fn default_lxc_path(&self) -> Option<String>;

    /// Short name identifying the backend in logs.
    fn describe(&self) -> &str;
}

/// One native container object.
///
/// Every `bool` is the native success flag; every `i32` keeps the native
/// sentinel encoding.
pub trait NativeContainer: Send {
    /// `is_defined`
    fn is_defined(&self) -> bool;
    /// `is_running`
    fn is_running(&self) -> bool;
    /// `state`; `None` when the native call returned null.
    fn state(&self) -> Option<String>;
    /// `init_pid`; negative when no init process exists.
    fn init_pid(&self) -> i32;
    /// Current value of the `daemonize` flag.
    fn is_daemonized(&self) -> bool;
    /// `want_daemonize`
    fn want_daemonize(&mut self, state: bool) -> bool;
    /// `freeze`
    fn freeze(&mut self) -> bool;
    /// `unfreeze`
    fn unfreeze(&mut self) -> bool;
    /// `create` with no backing-store overrides.
    fn create(&mut self, template: &CStr, argv: Option<&NativeArgv>) -> bool;
    /// `start`
    fn start(&mut self, use_init: bool, argv: Option<&NativeArgv>) -> bool;
    /// `stop`
    fn stop(&mut self) -> bool;
    /// `shutdown` with a native-encoded timeout.
    fn shutdown(&mut self, timeout: i32) -> bool;
    /// `destroy`
    fn destroy(&mut self) -> bool;
    /// `wait` with a native-encoded timeout. Blocks the calling thread.
    fn wait(&self, state: &CStr, timeout: i32) -> bool;
    /// `config_file_name`
    fn config_file_name(&self) -> Option<String>;
    /// `get_config_item`; `None` on native error.
    fn get_config_item(&self, key: &CStr) -> Option<String>;
    /// `set_config_item`
    fn set_config_item(&mut self, key: &CStr, value: &CStr) -> bool;
    /// `clear_config_item`
    fn clear_config_item(&mut self, key: &CStr) -> bool;
    /// `get_keys`; `None` on native error.
    fn get_keys(&self, key: &CStr) -> Option<String>;
    /// `load_config`; `None` reads the default config file.
    fn load_config(&mut self, path: Option<&CStr>) -> bool;
    /// `save_config`; `None` writes the default config file.
    fn save_config(&mut self, path: Option<&CStr>) -> bool;
}

/// Loads liblxc as configured.
///
/// # Errors
///
/// Returns an error if the configured library cannot be loaded.
pub fn open_library(config: &LxcConfig) -> Result<Box<dyn NativeLibrary>> {
    let library = liblxc::LiblxcLibrary::open(&config.library)?;
    Ok(Box::new(library))
}

/// Returns the simulated backend rooted at the configured lxcpath, or at
/// the per-user default when none is configured.
#[must_use]
pub fn simulated_library(config: &LxcConfig) -> Box<dyn NativeLibrary> {
    let root = config
        .lxc_path
        .clone()
        .unwrap_or_else(|| default_lxc_path().clone());
    Box::new(simulated::SimulatedLibrary::new(root))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn open_library_reports_missing_soname() {
        let config = LxcConfig {
            library: "liblxcbind-missing.so.9".into(),
            ..LxcConfig::default()
        };
        assert!(open_library(&config).is_err());
    }

    #[test]
    fn simulated_library_is_always_available() {
        let config = LxcConfig {
            lxc_path: Some("/srv/lxc".into()),
            ..LxcConfig::default()
        };
        let library = simulated_library(&config);
        assert_eq!(library.describe(), "simulated");
        assert!(library.version().is_some());
        assert_eq!(library.default_lxc_path().as_deref(), Some("/srv/lxc"));
    }
}
