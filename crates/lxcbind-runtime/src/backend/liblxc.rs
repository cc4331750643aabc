//! Backend that forwards to the real liblxc through its function table.

use std::ffi::{CStr, c_char};
use std::ptr::NonNull;
use std::sync::Arc;

use lxcbind_common::error::Result;
use lxcbind_sys::container::lxc_container;
use lxcbind_sys::library::Liblxc;
use lxcbind_sys::strings::{copy_and_free_native_string, copy_native_string};

use super::{NativeContainer, NativeLibrary};
use crate::marshal::{NativeArgv, read_sized};

/// liblxc loaded into the process.
#[derive(Debug, Clone)]
pub struct LiblxcLibrary {
    lib: Arc<Liblxc>,
}

impl LiblxcLibrary {
    /// Opens the library by soname or path.
    ///
    /// # Errors
    ///
    /// Returns an error if the library cannot be loaded.
    pub fn open(soname: &str) -> Result<Self> {
        Ok(Self {
            lib: Arc::new(Liblxc::open(soname)?),
        })
    }
}

impl NativeLibrary for LiblxcLibrary {
    fn new_container(
        &self,
        name: &CStr,
        config_path: Option<&CStr>,
    ) -> Option<Box<dyn NativeContainer>> {
        let config_path = config_path.map_or(std::ptr::null(), CStr::as_ptr);
        // SAFETY: both arguments are null or NUL-terminated and outlive the call.
        let raw = unsafe { (self.lib.container_new())(name.as_ptr(), config_path) };
        let ptr = NonNull::new(raw)?;
        Some(Box::new(LiblxcContainer {
            ptr,
            lib: Arc::clone(&self.lib),
        }))
    }

    fn version(&self) -> Option<String> {
        self.lib.version()
    }

    fn default_lxc_path(&self) -> Option<String> {
        self.lib.global_config_item("lxc.lxcpath")
    }

    fn describe(&self) -> &str {
        self.lib.soname()
    }
}

/// Exclusive owner of one `struct lxc_container` reference.
struct LiblxcContainer {
    ptr: NonNull<lxc_container>,
    // Keeps the function table mapped for as long as the object exists.
    lib: Arc<Liblxc>,
}

// SAFETY: the reference is owned exclusively and every method that mutates
// native state takes `&mut self`; liblxc objects may move between threads.
unsafe impl Send for LiblxcContainer {}

/// Reads a member of the native struct by copy.
macro_rules! member {
    ($self:ident . $field:ident) => {
        // SAFETY: `ptr` is a live object returned by lxc_container_new and
        // released only in Drop.
        unsafe { (*$self.ptr.as_ptr()).$field }
    };
}

/// Calls an entry point, treating a missing one as failure.
macro_rules! call {
    ($self:ident . $field:ident ( $($arg:expr),* ) or $default:expr) => {
        match member!($self.$field) {
            // SAFETY: the entry point belongs to this object and every
            // pointer argument outlives the call.
            Some(f) => unsafe { f($self.ptr.as_ptr() $(, $arg)*) },
            None => {
                tracing::warn!(entry = stringify!($field), "liblxc entry point missing");
                $default
            }
        }
    };
}

fn argv_ptr(argv: Option<&NativeArgv>) -> *const *const c_char {
    argv.map_or(std::ptr::null(), NativeArgv::as_ptr)
}

fn path_ptr(path: Option<&CStr>) -> *const c_char {
    path.map_or(std::ptr::null(), CStr::as_ptr)
}

impl NativeContainer for LiblxcContainer {
    fn is_defined(&self) -> bool {
        call!(self.is_defined() or false)
    }

    fn is_running(&self) -> bool {
        call!(self.is_running() or false)
    }

    fn state(&self) -> Option<String> {
        let state = call!(self.state() or std::ptr::null());
        // SAFETY: liblxc returns a static state name or null.
        unsafe { copy_native_string(state) }
    }

    fn init_pid(&self) -> i32 {
        call!(self.init_pid() or -1)
    }

    fn is_daemonized(&self) -> bool {
        member!(self.daemonize)
    }

    fn want_daemonize(&mut self, state: bool) -> bool {
        call!(self.want_daemonize(state) or false)
    }

    fn freeze(&mut self) -> bool {
        call!(self.freeze() or false)
    }

    fn unfreeze(&mut self) -> bool {
        call!(self.unfreeze() or false)
    }

    fn create(&mut self, template: &CStr, argv: Option<&NativeArgv>) -> bool {
        call!(self.create(
            template.as_ptr(),
            std::ptr::null(),
            std::ptr::null_mut(),
            0,
            argv_ptr(argv)
        ) or false)
    }

    fn start(&mut self, use_init: bool, argv: Option<&NativeArgv>) -> bool {
        call!(self.start(i32::from(use_init), argv_ptr(argv)) or false)
    }

    fn stop(&mut self) -> bool {
        call!(self.stop() or false)
    }

    fn shutdown(&mut self, timeout: i32) -> bool {
        call!(self.shutdown(timeout) or false)
    }

    fn destroy(&mut self) -> bool {
        call!(self.destroy() or false)
    }

    fn wait(&self, state: &CStr, timeout: i32) -> bool {
        call!(self.wait(state.as_ptr(), timeout) or false)
    }

    fn config_file_name(&self) -> Option<String> {
        let name = call!(self.config_file_name() or std::ptr::null_mut());
        // SAFETY: config_file_name returns a malloc'd copy owned by the caller.
        unsafe { copy_and_free_native_string(name) }
    }

    fn get_config_item(&self, key: &CStr) -> Option<String> {
        let f = member!(self.get_config_item)?;
        let c = self.ptr.as_ptr();
        // SAFETY: key outlives both calls; buf is null or holds `len` bytes.
        read_sized(|buf, len| unsafe { f(c, key.as_ptr(), buf, len) })
    }

    fn set_config_item(&mut self, key: &CStr, value: &CStr) -> bool {
        call!(self.set_config_item(key.as_ptr(), value.as_ptr()) or false)
    }

    fn clear_config_item(&mut self, key: &CStr) -> bool {
        call!(self.clear_config_item(key.as_ptr()) or false)
    }

    fn get_keys(&self, key: &CStr) -> Option<String> {
        let f = member!(self.get_keys)?;
        let c = self.ptr.as_ptr();
        // SAFETY: key outlives both calls; buf is null or holds `len` bytes.
        read_sized(|buf, len| unsafe { f(c, key.as_ptr(), buf, len) })
    }

    fn load_config(&mut self, path: Option<&CStr>) -> bool {
        call!(self.load_config(path_ptr(path)) or false)
    }

    fn save_config(&mut self, path: Option<&CStr>) -> bool {
        call!(self.save_config(path_ptr(path)) or false)
    }
}

impl Drop for LiblxcContainer {
    fn drop(&mut self) {
        // SAFETY: drops the single reference taken by lxc_container_new.
        let _ = unsafe { (self.lib.container_put())(self.ptr.as_ptr()) };
    }
}
