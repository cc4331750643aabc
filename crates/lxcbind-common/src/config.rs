//! Binding configuration.
//!
//! Loaded from an optional JSON file; environment variables and CLI flags
//! override individual fields afterwards.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{LxcError, Result};

/// Root configuration for the binding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LxcConfig {
    /// Directory under which liblxc stores container definitions. `None`
    /// leaves the choice to liblxc (`lxc.lxcpath` from its own `lxc.conf`).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lxc_path: Option<PathBuf>,
    /// Soname or path of the native library to load.
    pub library: String,
    /// Grace period used by `shutdown` when none is given.
    pub shutdown_timeout_secs: u32,
}

impl Default for LxcConfig {
    fn default() -> Self {
        Self {
            lxc_path: None,
            library: crate::constants::DEFAULT_LIBRARY.to_string(),
            shutdown_timeout_secs: crate::constants::DEFAULT_SHUTDOWN_TIMEOUT_SECS,
        }
    }
}

impl LxcConfig {
    /// Reads a configuration file; missing fields take their defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or is not valid JSON.
    pub fn load(path: &Path) -> Result<Self> {
        tracing::debug!(path = %path.display(), "loading binding configuration");
        let content = std::fs::read_to_string(path).map_err(|e| LxcError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;
        let config: Self = serde_json::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Writes the configuration as pretty-printed JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or the write fails.
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content).map_err(|e| LxcError::Io {
            path: path.to_path_buf(),
            source: e,
        })
    }

    /// Applies `LXCBIND_LXC_PATH` and `LXCBIND_LIBRARY` when set.
    #[must_use]
    pub fn with_env_overrides(mut self) -> Self {
        if let Ok(path) = std::env::var(crate::constants::LXC_PATH_ENV) {
            self.lxc_path = Some(PathBuf::from(path));
        }
        if let Ok(library) = std::env::var(crate::constants::LIBRARY_ENV) {
            self.library = library;
        }
        self
    }

    /// Checks invariants that serde cannot express.
    ///
    /// # Errors
    ///
    /// Returns an error if the library name or an explicit lxcpath is empty.
    pub fn validate(&self) -> Result<()> {
        if self.library.trim().is_empty() {
            return Err(LxcError::Config {
                message: "library must not be empty".into(),
            });
        }
        if self
            .lxc_path
            .as_ref()
            .is_some_and(|p| p.as_os_str().is_empty())
        {
            return Err(LxcError::Config {
                message: "lxc_path must not be empty".into(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_fields_take_defaults() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("lxcbind.json");
        std::fs::write(&path, r#"{ "lxc_path": "/srv/lxc" }"#).unwrap();

        let config = LxcConfig::load(&path).expect("load");
        assert_eq!(config.lxc_path, Some(PathBuf::from("/srv/lxc")));
        assert_eq!(config.library, "liblxc.so.1");
        assert_eq!(config.shutdown_timeout_secs, 30);
    }

    #[test]
    fn save_and_load_roundtrip() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("lxcbind.json");
        let config = LxcConfig {
            lxc_path: Some(PathBuf::from("/tmp/lxc")),
            library: "/opt/lxc/lib/liblxc.so.1".into(),
            shutdown_timeout_secs: 5,
        };
        config.save(&path).expect("save");
        assert_eq!(LxcConfig::load(&path).expect("load"), config);
    }

    #[test]
    fn lxc_path_is_left_to_liblxc_by_default() {
        assert_eq!(LxcConfig::default().lxc_path, None);

        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("lxcbind.json");
        std::fs::write(&path, r#"{ "library": "liblxc.so.1" }"#).unwrap();
        assert_eq!(LxcConfig::load(&path).expect("load").lxc_path, None);

        LxcConfig::default().save(&path).expect("save");
        let written = std::fs::read_to_string(&path).unwrap();
        assert!(!written.contains("lxc_path"));
    }

    #[test]
    fn explicit_empty_lxc_path_is_rejected() {
        let config = LxcConfig {
            lxc_path: Some(PathBuf::new()),
            ..LxcConfig::default()
        };
        assert!(matches!(config.validate(), Err(LxcError::Config { .. })));
    }

    #[test]
    fn empty_library_is_rejected() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("lxcbind.json");
        std::fs::write(&path, r#"{ "library": "  " }"#).unwrap();
        assert!(matches!(
            LxcConfig::load(&path),
            Err(LxcError::Config { .. })
        ));
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = LxcConfig::load(Path::new("/nonexistent/lxcbind.json")).unwrap_err();
        assert!(matches!(err, LxcError::Io { .. }));
    }
}
