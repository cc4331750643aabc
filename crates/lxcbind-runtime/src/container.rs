//! The container handle and its lifecycle and configuration operations.
//!
//! Each method forwards to exactly one native entry point. String arguments
//! are copied into call-scoped C strings first, native `false` becomes
//! [`LxcError::Failed`], and native strings are copied out before returning.

use std::path::{Path, PathBuf};

use lxcbind_common::config::LxcConfig;
use lxcbind_common::error::{LxcError, Result};
use lxcbind_common::types::{ContainerSummary, LifecycleState, Timeout};
use nix::unistd::Pid;

use crate::backend::{self, NativeContainer, NativeLibrary};
use crate::marshal::{native_path, native_string, optional_argv, split_lines};

/// Exclusive owner of one native container object.
///
/// The handle is `Send` but not `Sync`: operations that change native state
/// take `&mut self`, so sharing one handle across threads requires the
/// caller's own lock.
pub struct ContainerHandle {
    name: String,
    native: Box<dyn NativeContainer>,
}

impl std::fmt::Debug for ContainerHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ContainerHandle")
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

impl ContainerHandle {
    /// Opens `name` through liblxc using the default configuration and any
    /// `LXCBIND_*` environment overrides. Without `LXCBIND_LXC_PATH` the
    /// container lives under liblxc's own default lxcpath.
    ///
    /// # Errors
    ///
    /// Returns an error if liblxc cannot be loaded or refuses to allocate
    /// the container object.
    pub fn new(name: &str) -> Result<Self> {
        let config = LxcConfig::default().with_env_overrides();
        let library = backend::open_library(&config)?;
        Self::open(library.as_ref(), name, config.lxc_path.as_deref())
    }

    /// Opens `name` through the given library under `lxc_path`
    /// (liblxc's default when `None`).
    ///
    /// # Errors
    ///
    /// Returns [`LxcError::InvalidArgument`] if `name` or `lxc_path`
    /// contains NUL, or [`LxcError::Allocation`] if the library returns no
    /// object.
    pub fn open(
        library: &dyn NativeLibrary,
        name: &str,
        lxc_path: Option<&Path>,
    ) -> Result<Self> {
        let c_name = native_string("name", name)?;
        let c_path = lxc_path.map(|p| native_path("lxcpath", p)).transpose()?;
        let native = library
            .new_container(&c_name, c_path.as_deref())
            .ok_or_else(|| LxcError::Allocation {
                name: name.to_string(),
            })?;
        tracing::debug!(name, backend = library.describe(), "container handle opened");
        Ok(Self {
            name: name.to_string(),
            native,
        })
    }

    /// Maps a native success flag, logging failures.
    fn check(&self, operation: &'static str, ok: bool) -> Result<()> {
        if ok {
            tracing::debug!(name = %self.name, operation, "native call succeeded");
            Ok(())
        } else {
            tracing::warn!(name = %self.name, operation, "native call failed");
            Err(LxcError::failed(operation, &self.name))
        }
    }

    /// Container name the handle was opened with.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Whether a configuration exists for this container.
    #[must_use]
    pub fn is_defined(&self) -> bool {
        self.native.is_defined()
    }

    /// Whether the container's init process is active.
    #[must_use]
    pub fn is_running(&self) -> bool {
        self.native.is_running()
    }

    /// Current lifecycle state, queried live.
    #[must_use]
    pub fn state(&self) -> LifecycleState {
        self.native
            .state()
            .map_or(LifecycleState::Invalid, |s| LifecycleState::from_native(&s))
    }

    /// PID of the init process, `None` when not running.
    #[must_use]
    pub fn init_pid(&self) -> Option<Pid> {
        let pid = self.native.init_pid();
        (pid > 0).then(|| Pid::from_raw(pid))
    }

    /// Makes subsequent [`start`](Self::start) calls detach into the
    /// background. Idempotent.
    pub fn want_daemonize(&mut self) {
        if !self.native.want_daemonize(true) {
            tracing::warn!(name = %self.name, "daemonize request rejected");
        }
    }

    /// Whether `start` will detach.
    #[must_use]
    pub fn is_daemonized(&self) -> bool {
        self.native.is_daemonized()
    }

    /// Freezes all processes of a running container.
    ///
    /// # Errors
    ///
    /// Fails unless the container is running.
    pub fn freeze(&mut self) -> Result<()> {
        let ok = self.native.freeze();
        self.check("freeze", ok)
    }

    /// Thaws a frozen container.
    ///
    /// # Errors
    ///
    /// Fails unless the container is frozen.
    pub fn unfreeze(&mut self) -> Result<()> {
        let ok = self.native.unfreeze();
        self.check("unfreeze", ok)
    }

    /// Runs `template` to populate the container. `None` passes no argument
    /// vector at all; `Some(&[])` passes an empty one.
    ///
    /// # Errors
    ///
    /// Fails if an argument contains NUL or the template run fails.
    pub fn create(&mut self, template: &str, args: Option<&[&str]>) -> Result<()> {
        let c_template = native_string("template", template)?;
        let argv = optional_argv(args)?;
        tracing::info!(name = %self.name, template, args = ?argv, "creating container");
        let ok = self.native.create(&c_template, argv.as_ref());
        self.check("create", ok)
    }

    /// Launches the init process, optionally under liblxc's init wrapper,
    /// with `args` passed through unmodified.
    ///
    /// # Errors
    ///
    /// Fails if an argument contains NUL or the container cannot start.
    pub fn start(&mut self, use_init: bool, args: Option<&[&str]>) -> Result<()> {
        let argv = optional_argv(args)?;
        tracing::info!(name = %self.name, use_init, args = ?argv, "starting container");
        let ok = self.native.start(use_init, argv.as_ref());
        self.check("start", ok)
    }

    /// Kills the container.
    ///
    /// # Errors
    ///
    /// Fails if the container is not running or cannot be stopped.
    pub fn stop(&mut self) -> Result<()> {
        tracing::info!(name = %self.name, "stopping container");
        let ok = self.native.stop();
        self.check("stop", ok)
    }

    /// Asks the init process to exit and waits up to `timeout`.
    ///
    /// # Errors
    ///
    /// Fails if the request is rejected or the container is still running
    /// when the timeout elapses.
    pub fn shutdown(&mut self, timeout: Timeout) -> Result<()> {
        tracing::info!(name = %self.name, %timeout, "shutting down container");
        let ok = self.native.shutdown(timeout.as_native());
        self.check("shutdown", ok)
    }

    /// Removes the container's persisted storage. Irreversible.
    ///
    /// # Errors
    ///
    /// Fails if the container is undefined or still running.
    pub fn destroy(&mut self) -> Result<()> {
        tracing::info!(name = %self.name, "destroying container");
        let ok = self.native.destroy();
        self.check("destroy", ok)
    }

    /// Blocks the calling thread until the container reaches `state` or
    /// `timeout` elapses.
    ///
    /// # Errors
    ///
    /// Fails if the state was not observed in time. Timeouts and native
    /// errors are reported alike.
    pub fn wait_for_state(&self, state: LifecycleState, timeout: Timeout) -> Result<()> {
        let c_state = native_string("state", state.as_str())?;
        tracing::debug!(name = %self.name, %state, %timeout, "waiting for state");
        let ok = self.native.wait(&c_state, timeout.as_native());
        self.check("wait", ok)
    }

    /// Path of the container's configuration file.
    #[must_use]
    pub fn config_file_path(&self) -> Option<PathBuf> {
        self.native.config_file_name().map(PathBuf::from)
    }

    /// Values of `key`, one entry per line. An unset key yields `[""]`.
    ///
    /// # Errors
    ///
    /// Fails if `key` contains NUL or the native library rejects it.
    pub fn config_item(&self, key: &str) -> Result<Vec<String>> {
        let c_key = native_string("key", key)?;
        let value = self
            .native
            .get_config_item(&c_key)
            .ok_or_else(|| LxcError::failed("get_config_item", &self.name))?;
        Ok(split_lines(&value))
    }

    /// Sets `key`; multi-valued keys append, single-valued keys overwrite.
    ///
    /// # Errors
    ///
    /// Fails if an argument contains NUL or the key is rejected.
    pub fn set_config_item(&mut self, key: &str, value: &str) -> Result<()> {
        let c_key = native_string("key", key)?;
        let c_value = native_string("value", value)?;
        let ok = self.native.set_config_item(&c_key, &c_value);
        self.check("set_config_item", ok)
    }

    /// Removes every value of `key`.
    ///
    /// # Errors
    ///
    /// Fails if `key` contains NUL or is rejected.
    pub fn clear_config_item(&mut self, key: &str) -> Result<()> {
        let c_key = native_string("key", key)?;
        let ok = self.native.clear_config_item(&c_key);
        self.check("clear_config_item", ok)
    }

    /// Valid sub-key names under `key`, one entry per line.
    ///
    /// # Errors
    ///
    /// Fails if `key` contains NUL or the native library rejects it.
    pub fn config_keys(&self, key: &str) -> Result<Vec<String>> {
        let c_key = native_string("key", key)?;
        let keys = self
            .native
            .get_keys(&c_key)
            .ok_or_else(|| LxcError::failed("get_keys", &self.name))?;
        Ok(split_lines(&keys))
    }

    /// Replaces the in-memory configuration with the contents of `path`,
    /// or of the default config file when `None`.
    ///
    /// # Errors
    ///
    /// Fails if the path contains NUL or the file cannot be loaded.
    pub fn load_config(&mut self, path: Option<&Path>) -> Result<()> {
        let c_path = path.map(|p| native_path("path", p)).transpose()?;
        let ok = self.native.load_config(c_path.as_deref());
        self.check("load_config", ok)
    }

    /// Writes the configuration to `path`, or to the default config file
    /// when `None`.
    ///
    /// # Errors
    ///
    /// Fails if the path contains NUL or the file cannot be written.
    pub fn save_config(&mut self, path: Option<&Path>) -> Result<()> {
        let c_path = path.map(|p| native_path("path", p)).transpose()?;
        let ok = self.native.save_config(c_path.as_deref());
        self.check("save_config", ok)
    }

    /// Snapshot of the container's observable properties.
    #[must_use]
    pub fn summary(&self) -> ContainerSummary {
        ContainerSummary {
            name: self.name.clone(),
            state: self.state(),
            defined: self.is_defined(),
            running: self.is_running(),
            init_pid: self.init_pid().map(Pid::as_raw),
            config_file: self.config_file_path(),
        }
    }
}
