//! Configuration loading.
//!
//! Settings come from `config.toml`, looked up in order:
//! 1. the `--config` path
//! 2. `$NOVA_HOME/config.toml`
//! 3. `~/.nova/config.toml`
//!
//! A missing file means defaults. `NOVA_API_URL` and command-line flags are
//! applied on top.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;
use tracing::debug;

/// Configuration file name.
pub const CONFIG_FILE: &str = "config.toml";

/// Environment variable for the config directory.
pub const NOVA_HOME_ENV: &str = "NOVA_HOME";

/// Environment variable overriding `api_url`.
pub const NOVA_API_URL_ENV: &str = "NOVA_API_URL";

/// Errors raised while loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Config file not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("Failed to read {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid config file {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

/// Reply reveal settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct RevealConfig {
    /// Reveal replies progressively instead of all at once
    pub animate: bool,
    /// Milliseconds between reveal ticks
    pub tick_ms: u64,
}

impl Default for RevealConfig {
    fn default() -> Self {
        Self {
            animate: true,
            tick_ms: 16,
        }
    }
}

/// Nova CLI configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct NovaConfig {
    /// Base URL of the Nova server
    pub api_url: String,
    /// Per-request timeout in seconds
    pub request_timeout_secs: u64,
    /// Reply reveal settings
    pub reveal: RevealConfig,
    /// Where exported CSV files go (current directory when unset)
    pub export_dir: Option<PathBuf>,
}

impl Default for NovaConfig {
    fn default() -> Self {
        Self {
            api_url: nova_client::DEFAULT_NOVA_URL.to_string(),
            request_timeout_secs: nova_client::DEFAULT_REQUEST_TIMEOUT.as_secs(),
            reveal: RevealConfig::default(),
            export_dir: None,
        }
    }
}

impl NovaConfig {
    /// Loads the configuration and applies environment overrides.
    ///
    /// An explicit path must exist; the default locations may be absent.
    pub fn load(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        let mut config = match explicit {
            Some(path) if !path.exists() => return Err(ConfigError::NotFound(path.to_path_buf())),
            Some(path) => Self::from_file(path)?,
            None => match default_config_path() {
                Some(path) if path.exists() => Self::from_file(&path)?,
                _ => {
                    debug!("No config file found, using defaults");
                    Self::default()
                }
            },
        };
        config.apply_env_overrides(|key| std::env::var(key).ok());
        Ok(config)
    }

    /// Reads and parses a TOML file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config = toml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        debug!(path = %path.display(), "Loaded config file");
        Ok(config)
    }

    /// Applies overrides from the environment, looked up through `lookup`.
    pub fn apply_env_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(url) = lookup(NOVA_API_URL_ENV).filter(|v| !v.trim().is_empty()) {
            debug!(url = %url, "Using NOVA_API_URL");
            self.api_url = url;
        }
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.reveal.tick_ms)
    }

    /// Directory for exported files.
    pub fn export_dir(&self) -> PathBuf {
        self.export_dir
            .clone()
            .unwrap_or_else(|| PathBuf::from("."))
    }
}

/// Find the Nova home directory.
///
/// Uses `NOVA_HOME` when set, otherwise `~/.nova`.
pub fn find_nova_home() -> Option<PathBuf> {
    match std::env::var(NOVA_HOME_ENV) {
        Ok(val) if !val.is_empty() => {
            let path = PathBuf::from(val);
            debug!(path = %path.display(), "Using NOVA_HOME");
            Some(path)
        }
        _ => dirs::home_dir().map(|home| home.join(".nova")),
    }
}

/// Default location of `config.toml`.
pub fn default_config_path() -> Option<PathBuf> {
    find_nova_home().map(|home| home.join(CONFIG_FILE))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serial_test::serial;
    use tempfile::TempDir;

    fn write_config(dir: &TempDir, content: &str) -> PathBuf {
        let path = dir.path().join(CONFIG_FILE);
        std::fs::write(&path, content).expect("write config");
        path
    }

    #[test]
    fn test_defaults() {
        let config = NovaConfig::default();
        assert_eq!(config.api_url, "http://127.0.0.1:5000");
        assert_eq!(config.request_timeout(), Duration::from_secs(120));
        assert!(config.reveal.animate);
        assert_eq!(config.tick_interval(), Duration::from_millis(16));
        assert_eq!(config.export_dir(), PathBuf::from("."));
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let dir = TempDir::new().expect("tempdir");
        let path = write_config(
            &dir,
            r#"
api_url = "http://nova.internal:8080"
export_dir = "/tmp/tables"

[reveal]
animate = false
"#,
        );

        let config = NovaConfig::from_file(&path).expect("load");
        assert_eq!(config.api_url, "http://nova.internal:8080");
        assert_eq!(config.request_timeout_secs, 120);
        assert!(!config.reveal.animate);
        assert_eq!(config.reveal.tick_ms, 16);
        assert_eq!(config.export_dir(), PathBuf::from("/tmp/tables"));
    }

    #[test]
    fn test_invalid_toml_names_the_file() {
        let dir = TempDir::new().expect("tempdir");
        let path = write_config(&dir, "api_url = [unterminated");

        let err = NovaConfig::from_file(&path).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
        assert!(err.to_string().contains(CONFIG_FILE));
    }

    #[test]
    fn test_explicit_path_must_exist() {
        let dir = TempDir::new().expect("tempdir");
        let missing = dir.path().join("nope.toml");
        let err = NovaConfig::load(Some(&missing)).unwrap_err();
        assert!(matches!(err, ConfigError::NotFound(path) if path == missing));
    }

    #[test]
    fn test_env_override() {
        let mut config = NovaConfig::default();
        config.apply_env_overrides(|key| {
            (key == NOVA_API_URL_ENV).then(|| "http://10.0.0.2:5000".to_string())
        });
        assert_eq!(config.api_url, "http://10.0.0.2:5000");

        let mut config = NovaConfig::default();
        config.apply_env_overrides(|_| Some("  ".to_string()));
        assert_eq!(config.api_url, "http://127.0.0.1:5000");
    }

    #[test]
    #[serial]
    fn test_nova_home_lookup() {
        let dir = TempDir::new().expect("tempdir");
        write_config(&dir, "request_timeout_secs = 30\n");

        // SAFETY: serialized with the other env tests
        unsafe { std::env::set_var(NOVA_HOME_ENV, dir.path()) };
        assert_eq!(default_config_path(), Some(dir.path().join(CONFIG_FILE)));
        let config = NovaConfig::load(None);
        unsafe { std::env::remove_var(NOVA_HOME_ENV) };

        let config = config.expect("load");
        assert_eq!(config.request_timeout(), Duration::from_secs(30));
    }
}
