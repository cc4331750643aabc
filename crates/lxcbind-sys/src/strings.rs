//! Copying strings out of native memory.
//!
//! liblxc returns two kinds of strings: borrowed ones that stay owned by the
//! library (and may be overwritten by the next call), and heap strings whose
//! ownership moves to the caller. Both are copied into a Rust `String`
//! immediately; the latter are released with `free(3)` afterwards.

use std::ffi::{CStr, c_char};

/// Copies a borrowed native string. Null yields `None`.
///
/// # Safety
///
/// `ptr` must be null or point to a NUL-terminated string that stays valid
/// for the duration of this call.
#[must_use]
pub unsafe fn copy_native_string(ptr: *const c_char) -> Option<String> {
    if ptr.is_null() {
        return None;
    }
    // SAFETY: non-null and NUL-terminated per the caller contract.
    let s = unsafe { CStr::from_ptr(ptr) };
    Some(s.to_string_lossy().into_owned())
}

/// Copies a caller-owned native string and frees the native buffer.
///
/// # Safety
///
/// `ptr` must be null or a NUL-terminated string allocated with `malloc(3)`
/// that no one else will free.
#[must_use]
pub unsafe fn copy_and_free_native_string(ptr: *mut c_char) -> Option<String> {
    // SAFETY: forwarded caller contract.
    let copy = unsafe { copy_native_string(ptr) };
    if !ptr.is_null() {
        // SAFETY: the buffer came from malloc and ownership was handed to us.
        unsafe { libc::free(ptr.cast()) };
    }
    copy
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn null_copies_to_none() {
        // SAFETY: null is explicitly allowed.
        assert_eq!(unsafe { copy_native_string(std::ptr::null()) }, None);
        // SAFETY: null is explicitly allowed.
        assert_eq!(
            unsafe { copy_and_free_native_string(std::ptr::null_mut()) },
            None
        );
    }

    #[test]
    fn borrowed_string_is_copied() {
        let native = c"RUNNING";
        // SAFETY: a static C string literal.
        let copy = unsafe { copy_native_string(native.as_ptr()) };
        assert_eq!(copy.as_deref(), Some("RUNNING"));
    }

    #[test]
    fn malloced_string_is_copied_and_freed() {
        // SAFETY: strdup returns a malloc'd copy we own.
        let owned = unsafe { libc::strdup(c"/var/lib/lxc/web/config".as_ptr()) };
        assert!(!owned.is_null());
        // SAFETY: ownership of the strdup buffer passes to the helper.
        let copy = unsafe { copy_and_free_native_string(owned) };
        assert_eq!(copy.as_deref(), Some("/var/lib/lxc/web/config"));
    }
}
