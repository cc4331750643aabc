//! Argument and result marshaling across the liblxc boundary.
//!
//! Every string handed to the native library is copied into a
//! NUL-terminated buffer whose lifetime is the enclosing call; the copies are
//! released when the owning value drops, on every exit path.

use std::ffi::{CStr, CString, c_char, c_int};
use std::os::unix::ffi::OsStrExt;
use std::path::Path;

use lxcbind_common::error::{LxcError, Result};

/// Copies `value` into a C string, naming the argument on failure.
///
/// # Errors
///
/// Returns [`LxcError::InvalidArgument`] if `value` contains a NUL byte.
pub fn native_string(what: &'static str, value: &str) -> Result<CString> {
    CString::new(value).map_err(|_| LxcError::InvalidArgument { what })
}

/// Copies a filesystem path into a C string without UTF-8 conversion.
///
/// # Errors
///
/// Returns [`LxcError::InvalidArgument`] if the path contains a NUL byte.
pub fn native_path(what: &'static str, path: &Path) -> Result<CString> {
    CString::new(path.as_os_str().as_bytes()).map_err(|_| LxcError::InvalidArgument { what })
}

/// A null-terminated `char *const argv[]` built from Rust strings.
pub struct NativeArgv {
    strings: Vec<CString>,
    pointers: Vec<*const c_char>,
}

impl NativeArgv {
    /// Builds the vector; an empty slice yields an argv holding only the
    /// terminating null.
    ///
    /// # Errors
    ///
    /// Returns [`LxcError::InvalidArgument`] if any argument contains NUL.
    pub fn new(args: &[&str]) -> Result<Self> {
        let strings = args
            .iter()
            .map(|arg| native_string("argument", arg))
            .collect::<Result<Vec<_>>>()?;
        let pointers = strings
            .iter()
            .map(|s| s.as_ptr())
            .chain(std::iter::once(std::ptr::null()))
            .collect();
        Ok(Self { strings, pointers })
    }

    /// Pointer suitable for an `argv` parameter. Valid while `self` lives.
    #[must_use]
    pub fn as_ptr(&self) -> *const *const c_char {
        self.pointers.as_ptr()
    }

    /// Iterates over the arguments without the terminator.
    pub fn iter(&self) -> impl Iterator<Item = &CStr> {
        self.strings.iter().map(CString::as_c_str)
    }

    /// Number of arguments, excluding the terminator.
    #[must_use]
    pub fn len(&self) -> usize {
        self.strings.len()
    }

    /// Returns whether there are no arguments.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.strings.is_empty()
    }
}

impl std::fmt::Debug for NativeArgv {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

/// Builds an argv only when the caller supplied one.
///
/// # Errors
///
/// Returns [`LxcError::InvalidArgument`] if any argument contains NUL.
pub fn optional_argv(args: Option<&[&str]>) -> Result<Option<NativeArgv>> {
    args.map(NativeArgv::new).transpose()
}

/// Runs liblxc's length-then-fill protocol.
///
/// `fill` is called first with a null buffer to learn the length, then with
/// a buffer of that length plus the terminator. A negative return from
/// either call is a native error and yields `None`.
pub fn read_sized(mut fill: impl FnMut(*mut c_char, c_int) -> c_int) -> Option<String> {
    let len = fill(std::ptr::null_mut(), 0);
    let len = usize::try_from(len).ok()?;
    let mut buf = vec![0_u8; len + 1];
    let capacity = c_int::try_from(buf.len()).ok()?;
    if fill(buf.as_mut_ptr().cast(), capacity) < 0 {
        return None;
    }
    CStr::from_bytes_until_nul(&buf)
        .ok()
        .map(|s| s.to_string_lossy().into_owned())
}

/// Splits a newline-delimited native value. Empty input yields `[""]`.
#[must_use]
pub fn split_lines(value: &str) -> Vec<String> {
    value.split('\n').map(str::to_owned).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn argv_is_null_terminated() {
        let argv = NativeArgv::new(&["-d", "ubuntu"]).unwrap();
        assert_eq!(argv.len(), 2);
        // SAFETY: the argv holds len + 1 pointers while `argv` lives.
        let terminator = unsafe { *argv.as_ptr().add(2) };
        assert!(terminator.is_null());
        let args: Vec<_> = argv.iter().map(|s| s.to_str().unwrap()).collect();
        assert_eq!(args, ["-d", "ubuntu"]);
    }

    #[test]
    fn empty_argv_holds_only_the_terminator() {
        let argv = NativeArgv::new(&[]).unwrap();
        assert!(argv.is_empty());
        // SAFETY: the terminator is always present.
        assert!(unsafe { *argv.as_ptr() }.is_null());
    }

    #[test]
    fn absent_argv_stays_absent() {
        assert!(optional_argv(None).unwrap().is_none());
        assert!(optional_argv(Some(&[])).unwrap().is_some());
    }

    #[test]
    fn nul_in_argument_is_rejected() {
        let err = NativeArgv::new(&["ok", "bad\0arg"]).unwrap_err();
        assert!(matches!(err, LxcError::InvalidArgument { what: "argument" }));
    }

    #[test]
    fn split_keeps_empty_entries() {
        assert_eq!(split_lines(""), vec![String::new()]);
        assert_eq!(split_lines("a\nb"), vec!["a", "b"]);
        assert_eq!(split_lines("a\n"), vec!["a", ""]);
    }

    #[test]
    fn read_sized_copies_filled_buffer() {
        let value = b"veth\nbr0";
        let out = read_sized(|buf, cap| {
            if !buf.is_null() {
                let n = usize::try_from(cap).unwrap() - 1;
                // SAFETY: buf has `cap` writable bytes.
                unsafe {
                    std::ptr::copy_nonoverlapping(value.as_ptr(), buf.cast::<u8>(), n);
                }
            }
            c_int::try_from(value.len()).unwrap()
        });
        assert_eq!(out.as_deref(), Some("veth\nbr0"));
    }

    #[test]
    fn read_sized_negative_length_is_error() {
        assert_eq!(read_sized(|_, _| -1), None);
    }

    #[test]
    fn native_path_keeps_bytes() {
        let p = native_path("path", Path::new("/var/lib/lxc/web/config")).unwrap();
        assert_eq!(p.as_bytes(), b"/var/lib/lxc/web/config");
    }
}
