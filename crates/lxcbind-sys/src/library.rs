//! Runtime loading of liblxc.
//!
//! The library is opened with `dlopen(3)` rather than linked, so binaries
//! built from this workspace start on hosts without liblxc and report a
//! typed error only when a native container is actually requested.

use std::ffi::{CStr, CString, c_void};
use std::ptr::NonNull;

use lxcbind_common::error::{LxcError, Result};

use crate::container::{ContainerNewFn, ContainerPutFn, GetGlobalConfigItemFn, GetVersionFn};

/// A loaded liblxc and the exported entry points the binding needs.
pub struct Liblxc {
    handle: NonNull<c_void>,
    soname: String,
    container_new: ContainerNewFn,
    container_put: ContainerPutFn,
    get_version: Option<GetVersionFn>,
    get_global_config_item: Option<GetGlobalConfigItemFn>,
}

// SAFETY: a dlopen handle and resolved function addresses are process-global
// and may be used from any thread; liblxc's own entry points are thread-safe
// for distinct container objects.
unsafe impl Send for Liblxc {}
// SAFETY: see above; `Liblxc` holds no interior mutable state.
unsafe impl Sync for Liblxc {}

impl std::fmt::Debug for Liblxc {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Liblxc")
            .field("soname", &self.soname)
            .finish_non_exhaustive()
    }
}

/// Returns the pending `dlerror(3)` message, if any.
fn last_dl_error() -> String {
    // SAFETY: dlerror returns null or a thread-local NUL-terminated string.
    let err = unsafe { libc::dlerror() };
    if err.is_null() {
        "unknown dynamic loader error".to_string()
    } else {
        // SAFETY: non-null result of dlerror.
        unsafe { CStr::from_ptr(err) }.to_string_lossy().into_owned()
    }
}

impl Liblxc {
    /// Opens `soname` and resolves the container entry points.
    ///
    /// # Errors
    ///
    /// Returns [`LxcError::LibraryUnavailable`] if the library cannot be
    /// opened or lacks `lxc_container_new`/`lxc_container_put`.
    pub fn open(soname: &str) -> Result<Self> {
        let unavailable = |reason: String| LxcError::LibraryUnavailable {
            library: soname.to_string(),
            reason,
        };
        let c_soname =
            CString::new(soname).map_err(|_| unavailable("soname contains NUL".into()))?;

        // SAFETY: valid NUL-terminated path; flags are standard.
        let raw = unsafe { libc::dlopen(c_soname.as_ptr(), libc::RTLD_NOW | libc::RTLD_LOCAL) };
        let Some(handle) = NonNull::new(raw) else {
            let reason = last_dl_error();
            tracing::debug!(library = soname, %reason, "dlopen failed");
            return Err(unavailable(reason));
        };

        let lookup = |symbol: &CStr| -> Option<NonNull<c_void>> {
            // SAFETY: handle is a live dlopen handle, symbol is NUL-terminated.
            NonNull::new(unsafe { libc::dlsym(handle.as_ptr(), symbol.as_ptr()) })
        };

        let (Some(new_sym), Some(put_sym)) =
            (lookup(c"lxc_container_new"), lookup(c"lxc_container_put"))
        else {
            let reason = last_dl_error();
            // SAFETY: handle came from dlopen above and is not used again.
            let _ = unsafe { libc::dlclose(handle.as_ptr()) };
            return Err(unavailable(format!("missing container entry points: {reason}")));
        };

        // SAFETY: the symbols are the documented liblxc functions whose
        // signatures the aliases in `container` reproduce.
        let library = unsafe {
            Self {
                handle,
                soname: soname.to_string(),
                container_new: std::mem::transmute::<*mut c_void, ContainerNewFn>(
                    new_sym.as_ptr(),
                ),
                container_put: std::mem::transmute::<*mut c_void, ContainerPutFn>(
                    put_sym.as_ptr(),
                ),
                get_version: lookup(c"lxc_get_version")
                    .map(|p| std::mem::transmute::<*mut c_void, GetVersionFn>(p.as_ptr())),
                get_global_config_item: lookup(c"lxc_get_global_config_item").map(|p| {
                    std::mem::transmute::<*mut c_void, GetGlobalConfigItemFn>(p.as_ptr())
                }),
            }
        };
        tracing::info!(library = soname, version = ?library.version(), "liblxc loaded");
        Ok(library)
    }

    /// Soname this library was opened with.
    #[must_use]
    pub fn soname(&self) -> &str {
        &self.soname
    }

    /// `lxc_container_new`.
    #[must_use]
    pub const fn container_new(&self) -> ContainerNewFn {
        self.container_new
    }

    /// `lxc_container_put`.
    #[must_use]
    pub const fn container_put(&self) -> ContainerPutFn {
        self.container_put
    }

    /// Version string reported by the library.
    #[must_use]
    pub fn version(&self) -> Option<String> {
        let get_version = self.get_version?;
        // SAFETY: returns a static string owned by liblxc.
        unsafe { crate::strings::copy_native_string(get_version()) }
    }

    /// Reads a global liblxc setting such as `lxc.lxcpath`.
    #[must_use]
    pub fn global_config_item(&self, key: &str) -> Option<String> {
        let get = self.get_global_config_item?;
        let key = CString::new(key).ok()?;
        // SAFETY: key is NUL-terminated; the result is owned by liblxc.
        unsafe { crate::strings::copy_native_string(get(key.as_ptr())) }
    }
}

impl Drop for Liblxc {
    fn drop(&mut self) {
        // SAFETY: the handle came from dlopen and every container object
        // holding function pointers into it keeps this value alive.
        let _ = unsafe { libc::dlclose(self.handle.as_ptr()) };
        tracing::debug!(library = %self.soname, "liblxc unloaded");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_library_is_unavailable() {
        let err = Liblxc::open("liblxcbind-does-not-exist.so.0").unwrap_err();
        assert!(matches!(err, LxcError::LibraryUnavailable { .. }));
    }

    #[test]
    fn soname_with_nul_is_rejected() {
        let err = Liblxc::open("liblxc\0.so").unwrap_err();
        assert!(err.to_string().contains("NUL"));
    }

    #[cfg(all(target_os = "linux", target_env = "gnu"))]
    #[test]
    fn library_without_lxc_symbols_is_rejected() {
        // libc is always loadable but exports no container entry points.
        let err = Liblxc::open("libc.so.6").unwrap_err();
        assert!(err.to_string().contains("missing container entry points"));
    }
}
