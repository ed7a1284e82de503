//! Resolution of the configuration directory used by one invocation
//!
//! The resolved [`ControlConfig`] is an explicit value handed to the
//! dispatcher. It is computed once per invocation and never cached.

use crate::error::ControlError;
use std::path::{Path, PathBuf};
use tracing::info;

/// Name of the configuration file inside the configuration directory
pub const CONFIG_FILENAME: &str = "config.json";

/// Name of the per-user configuration directory
pub const CONFIG_DIR_NAME: &str = "key-mapper";

/// The configuration location that is authoritative for this invocation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ControlConfig {
    config_dir: PathBuf,
}

impl ControlConfig {
    /// Default per-user location, `$XDG_CONFIG_HOME/key-mapper`
    ///
    /// Nothing is checked on disk, the directory is created lazily elsewhere.
    /// Without any home directory the system-wide `/etc/key-mapper` is used.
    pub fn user_default() -> Self {
        let base = dirs::config_dir()
            .or_else(|| dirs::home_dir().map(|home| home.join(".config")))
            .unwrap_or_else(|| PathBuf::from("/etc"));

        Self {
            config_dir: base.join(CONFIG_DIR_NAME),
        }
    }

    /// Resolve an optional `--config-dir` override
    ///
    /// With an override the path is expanded to absolute form and must contain
    /// [`CONFIG_FILENAME`], otherwise `ConfigNotFound` is returned.
    pub fn resolve(config_dir: Option<&Path>) -> Result<Self, ControlError> {
        let Some(raw) = config_dir else {
            return Ok(Self::user_default());
        };

        // Expand `~` and anchor relative paths at the working directory
        let config_dir = absolute(&expand_home(raw))?;
        let config_path = config_dir.join(CONFIG_FILENAME);

        if !config_path.exists() {
            return Err(ControlError::ConfigNotFound(config_path));
        }

        info!("Using config from \"{}\" instead", config_path.display());
        Ok(Self { config_dir })
    }

    pub fn config_dir(&self) -> &Path {
        &self.config_dir
    }
}

/// Expand a leading `~` component to the home directory of the current user
fn expand_home(raw: &Path) -> PathBuf {
    let Ok(rest) = raw.strip_prefix("~") else {
        return raw.to_path_buf();
    };

    match dirs::home_dir() {
        Some(home) if rest.as_os_str().is_empty() => home,
        Some(home) => home.join(rest),
        None => raw.to_path_buf(),
    }
}

fn absolute(path: &Path) -> Result<PathBuf, ControlError> {
    if path.is_absolute() {
        Ok(path.to_path_buf())
    } else {
        Ok(std::env::current_dir()?.join(path))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::ffi::OsStr;
    use std::os::unix::ffi::OsStrExt;
    use tempfile::TempDir;

    #[test]
    fn test_default_location_is_not_checked() {
        let config = ControlConfig::resolve(None).unwrap();
        assert!(config.config_dir().ends_with(CONFIG_DIR_NAME));
    }

    #[test]
    fn test_override_with_config_file() {
        let temp_dir = TempDir::new().unwrap();
        std::fs::write(temp_dir.path().join(CONFIG_FILENAME), "{}").unwrap();

        let config = ControlConfig::resolve(Some(temp_dir.path())).unwrap();
        assert_eq!(config.config_dir(), temp_dir.path());
    }

    #[test]
    fn test_override_with_non_utf8_name() {
        let temp_dir = TempDir::new().unwrap();
        let config_dir = temp_dir.path().join(OsStr::from_bytes(b"presets_\xff"));
        std::fs::create_dir(&config_dir).unwrap();
        std::fs::write(config_dir.join(CONFIG_FILENAME), "{}").unwrap();

        let config = ControlConfig::resolve(Some(config_dir.as_path())).unwrap();
        assert_eq!(config.config_dir(), config_dir.as_path());
    }

    #[test]
    fn test_override_without_config_file() {
        let temp_dir = TempDir::new().unwrap();

        match ControlConfig::resolve(Some(temp_dir.path())) {
            Err(ControlError::ConfigNotFound(path)) => {
                assert_eq!(path, temp_dir.path().join(CONFIG_FILENAME));
            }
            other => panic!("Expected ConfigNotFound, got {:?}", other),
        }
    }

    #[test]
    fn test_override_to_missing_directory() {
        let temp_dir = TempDir::new().unwrap();
        let missing = temp_dir.path().join("does/not/exist");

        assert!(matches!(
            ControlConfig::resolve(Some(missing.as_path())),
            Err(ControlError::ConfigNotFound(_))
        ));
    }

    #[test]
    fn test_home_shorthand_is_expanded() {
        let Some(home) = dirs::home_dir() else {
            return;
        };

        assert_eq!(expand_home(Path::new("~")), home);
        assert_eq!(expand_home(Path::new("~/presets")), home.join("presets"));
        assert_eq!(expand_home(Path::new("/etc/key-mapper")), PathBuf::from("/etc/key-mapper"));
        assert_eq!(expand_home(Path::new("~other/x")), PathBuf::from("~other/x"));
    }

    #[test]
    fn test_relative_override_becomes_absolute() {
        let resolved = absolute(Path::new("some/dir")).unwrap();
        assert!(resolved.is_absolute());
        assert!(resolved.ends_with("some/dir"));
    }
}
