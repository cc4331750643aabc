//! Unified error types for the lxcbind workspace.
//!
//! Native calls report failure as a `false` or a negative sentinel; the
//! runtime crate turns each of those into [`LxcError::Failed`] at the
//! boundary so callers only ever see typed results.

use std::path::PathBuf;

use thiserror::Error;

/// Top-level error type shared across the workspace.
#[derive(Debug, Error)]
pub enum LxcError {
    /// The native library refused to allocate a container object.
    #[error("liblxc could not allocate a container object for {name:?}")]
    Allocation {
        /// Name the allocation was requested for.
        name: String,
    },

    /// A forwarded native operation reported failure.
    #[error("{operation} failed for container {container:?}")]
    Failed {
        /// Operation that failed, e.g. `"start"`.
        operation: &'static str,
        /// Name of the container the operation was issued against.
        container: String,
    },

    /// An argument cannot be represented as a C string.
    #[error("invalid argument: {what} contains an interior NUL byte")]
    InvalidArgument {
        /// Which argument was rejected.
        what: &'static str,
    },

    /// The native library could not be loaded or is missing a symbol.
    #[error("{library} is unavailable: {reason}")]
    LibraryUnavailable {
        /// Library soname that was requested.
        library: String,
        /// Loader diagnostic.
        reason: String,
    },

    /// An I/O operation failed.
    #[error("I/O error at {path}: {source}")]
    Io {
        /// Path where the I/O error occurred.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// A configuration value is invalid.
    #[error("invalid configuration: {message}")]
    Config {
        /// Description of the invalid configuration.
        message: String,
    },

    /// Serialization or deserialization failed.
    #[error("serialization error: {source}")]
    Serialization {
        /// Underlying serialization error.
        #[from]
        source: serde_json::Error,
    },
}

impl LxcError {
    /// Shorthand for [`LxcError::Failed`].
    #[must_use]
    pub fn failed(operation: &'static str, container: impl Into<String>) -> Self {
        Self::Failed {
            operation,
            container: container.into(),
        }
    }

    /// Returns whether this error came from a native call reporting failure.
    #[must_use]
    pub const fn is_operation_failure(&self) -> bool {
        matches!(self, Self::Failed { .. })
    }
}

/// Convenience alias used throughout the workspace.
pub type Result<T> = std::result::Result<T, LxcError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn failed_error_names_operation_and_container() {
        let err = LxcError::failed("freeze", "web");
        assert_eq!(err.to_string(), "freeze failed for container \"web\"");
        assert!(err.is_operation_failure());
    }

    #[test]
    fn invalid_argument_is_not_an_operation_failure() {
        let err = LxcError::InvalidArgument { what: "key" };
        assert!(!err.is_operation_failure());
        assert!(err.to_string().contains("interior NUL"));
    }
}
