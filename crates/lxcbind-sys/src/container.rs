//! ABI of `struct lxc_container` from `<lxc/lxccontainer.h>`.
//!
//! liblxc only ever appends members to this struct, so declaring the prefix
//! up to the last entry point the binding calls is layout-compatible with
//! every 1.x and later release. Never construct or move a value of this type;
//! it is only reached through the pointer `lxc_container_new` returns.
//!
//! Slots the binding does not call (variadic helpers, private locks) are
//! typed as untyped pointers so their size is still accounted for.

use std::ffi::{c_char, c_int, c_void};

/// Opaque `struct lxc_lock`.
#[repr(C)]
pub struct lxc_lock {
    _private: [u8; 0],
}

/// Opaque `struct lxc_conf`.
#[repr(C)]
pub struct lxc_conf {
    _private: [u8; 0],
}

/// Opaque `struct bdev_specs`; the binding always passes null.
#[repr(C)]
pub struct bdev_specs {
    _private: [u8; 0],
}

type Query = Option<unsafe extern "C" fn(*mut lxc_container) -> bool>;
type PathOp = Option<unsafe extern "C" fn(*mut lxc_container, *const c_char) -> bool>;
type SizedRead =
    Option<unsafe extern "C" fn(*mut lxc_container, *const c_char, *mut c_char, c_int) -> c_int>;

/// Leading members of `struct lxc_container`.
///
/// Entry points are named exactly as in the header.
#[repr(C)]
#[allow(missing_docs)]
pub struct lxc_container {
    /// Container name; owned by liblxc.
    pub name: *mut c_char,
    /// Full path of the configuration file.
    pub configfile: *mut c_char,
    /// Path of the pid file, if any.
    pub pidfile: *mut c_char,
    /// Container-wide lock.
    pub slock: *mut lxc_lock,
    /// Per-process lock.
    pub privlock: *mut lxc_lock,
    /// Reference count maintained by `lxc_container_get`/`put`.
    pub numthreads: c_int,
    /// Parsed configuration.
    pub lxc_conf: *mut lxc_conf,
    /// Last error message.
    pub error_string: *mut c_char,
    /// Last error code.
    pub error_num: c_int,
    /// Whether `start` detaches into the background.
    pub daemonize: bool,
    /// lxcpath the container lives under.
    pub config_path: *mut c_char,

    pub is_defined: Query,
    pub state: Option<unsafe extern "C" fn(*mut lxc_container) -> *const c_char>,
    pub is_running: Query,
    pub freeze: Query,
    pub unfreeze: Query,
    pub init_pid: Option<unsafe extern "C" fn(*mut lxc_container) -> libc::pid_t>,
    pub load_config: PathOp,
    pub start:
        Option<unsafe extern "C" fn(*mut lxc_container, c_int, *const *const c_char) -> bool>,
    pub startl: *const c_void,
    pub stop: Query,
    pub want_daemonize: Option<unsafe extern "C" fn(*mut lxc_container, bool) -> bool>,
    pub want_close_all_fds: Option<unsafe extern "C" fn(*mut lxc_container, bool) -> bool>,
    pub config_file_name: Option<unsafe extern "C" fn(*mut lxc_container) -> *mut c_char>,
    pub wait: Option<unsafe extern "C" fn(*mut lxc_container, *const c_char, c_int) -> bool>,
    pub set_config_item:
        Option<unsafe extern "C" fn(*mut lxc_container, *const c_char, *const c_char) -> bool>,
    pub destroy: Query,
    pub save_config: PathOp,
    pub create: Option<
        unsafe extern "C" fn(
            *mut lxc_container,
            *const c_char,
            *const c_char,
            *mut bdev_specs,
            c_int,
            *const *const c_char,
        ) -> bool,
    >,
    pub createl: *const c_void,
    pub rename: PathOp,
    pub reboot: Query,
    pub shutdown: Option<unsafe extern "C" fn(*mut lxc_container, c_int) -> bool>,
    pub clear_config: Option<unsafe extern "C" fn(*mut lxc_container)>,
    pub clear_config_item: PathOp,
    pub get_config_item: SizedRead,
    pub get_running_config_item:
        Option<unsafe extern "C" fn(*mut lxc_container, *const c_char) -> *mut c_char>,
    pub get_keys: SizedRead,
}

/// `struct lxc_container *lxc_container_new(const char *name, const char *configpath)`
pub type ContainerNewFn =
    unsafe extern "C" fn(name: *const c_char, configpath: *const c_char) -> *mut lxc_container;

/// `int lxc_container_put(struct lxc_container *c)`
pub type ContainerPutFn = unsafe extern "C" fn(c: *mut lxc_container) -> c_int;

/// `const char *lxc_get_version(void)`
pub type GetVersionFn = unsafe extern "C" fn() -> *const c_char;

/// `const char *lxc_get_global_config_item(const char *key)`
pub type GetGlobalConfigItemFn = unsafe extern "C" fn(key: *const c_char) -> *const c_char;
