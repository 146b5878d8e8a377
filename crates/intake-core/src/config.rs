//! Configuration management for intake.
//!
//! Loads configuration from ${INTAKE_HOME}/config.toml with sensible defaults.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Credential mode selected in the dialog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum AccountTab {
    /// Web-session tokens.
    #[default]
    Web,
    /// Service-issued API key.
    Api,
}

impl AccountTab {
    /// Returns the other tab.
    pub fn toggled(self) -> Self {
        match self {
            AccountTab::Web => AccountTab::Api,
            AccountTab::Api => AccountTab::Web,
        }
    }
}

/// Dialog timing and defaults.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DialogConfig {
    /// Delay before closing after a successful submission.
    pub auto_close_ms: u64,
    /// Delay before clearing the OAuth autofill confirmation.
    pub status_clear_ms: u64,
    /// Tab selected on open.
    pub default_tab: AccountTab,
}

impl DialogConfig {
    pub const DEFAULT_AUTO_CLOSE_MS: u64 = 1500;
    pub const DEFAULT_STATUS_CLEAR_MS: u64 = 2000;

    pub fn auto_close(&self) -> Duration {
        Duration::from_millis(self.auto_close_ms)
    }

    pub fn status_clear(&self) -> Duration {
        Duration::from_millis(self.status_clear_ms)
    }
}

impl Default for DialogConfig {
    fn default() -> Self {
        Self {
            auto_close_ms: Self::DEFAULT_AUTO_CLOSE_MS,
            status_clear_ms: Self::DEFAULT_STATUS_CLEAR_MS,
            default_tab: AccountTab::Web,
        }
    }
}

/// OAuth bridge configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OAuthConfig {
    /// Name of the completion event to subscribe to.
    pub success_event: String,
}

impl Default for OAuthConfig {
    fn default() -> Self {
        Self {
            success_event: crate::oauth::OAUTH_SUCCESS_EVENT.to_string(),
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// `tracing_subscriber::EnvFilter` directive.
    pub filter: String,
}

impl LoggingConfig {
    /// Environment variable that overrides `filter`.
    pub const ENV_VAR: &str = "INTAKE_LOG";

    /// Returns the filter from `INTAKE_LOG`, falling back to the config value.
    pub fn effective_filter(&self) -> String {
        std::env::var(Self::ENV_VAR)
            .ok()
            .filter(|value| !value.trim().is_empty())
            .unwrap_or_else(|| self.filter.clone())
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: "info".to_string(),
        }
    }
}

pub mod paths {
    //! Path resolution for intake configuration and data directories.
    //!
    //! INTAKE_HOME resolution order:
    //! 1. INTAKE_HOME environment variable (if set)
    //! 2. ~/.config/intake (default)
    //! 3. ./.intake when no home directory is known

    use std::path::PathBuf;

    /// Returns the intake home directory.
    pub fn intake_home() -> PathBuf {
        if let Ok(home) = std::env::var("INTAKE_HOME") {
            return PathBuf::from(home);
        }

        dirs::home_dir().map_or_else(
            || PathBuf::from(".intake"),
            |h| h.join(".config").join("intake"),
        )
    }

    /// Returns the path to the config.toml file.
    pub fn config_path() -> PathBuf {
        intake_home().join("config.toml")
    }

    /// Returns the path to the logs directory.
    pub fn logs_dir() -> PathBuf {
        intake_home().join("logs")
    }
}

/// Returns the default config template with comments.
fn default_config_template() -> &'static str {
    include_str!("../default_config.toml")
}

/// Main configuration structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub dialog: DialogConfig,
    pub oauth: OAuthConfig,
    pub logging: LoggingConfig,
    /// Overrides for dialog strings, keyed by dotted identifier.
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub strings: BTreeMap<String, String>,
}

impl Config {
    /// Loads configuration from the default config path.
    ///
    /// # Errors
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn load() -> Result<Self> {
        Self::load_from(&paths::config_path())
    }

    /// Loads configuration from a specific path.
    /// Returns defaults if file doesn't exist.
    ///
    /// # Errors
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let contents = fs::read_to_string(path)
                .with_context(|| format!("Failed to read config from {}", path.display()))?;
            toml::from_str(&contents)
                .with_context(|| format!("Failed to parse config from {}", path.display()))
        } else {
            Ok(Config::default())
        }
    }

    /// Creates a default config file at the given path.
    ///
    /// # Errors
    /// Returns an error if the file already exists or cannot be written.
    pub fn init(path: &Path) -> Result<()> {
        if path.exists() {
            anyhow::bail!("Config file already exists at {}", path.display());
        }

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory {}", parent.display()))?;
        }
        fs::write(path, default_config_template())
            .with_context(|| format!("Failed to write config to {}", path.display()))
    }
}

#[cfg(test)]
mod tests {
    use tempfile::tempdir;

    use super::*;

    #[test]
    fn test_load_missing_file_returns_defaults() {
        let dir = tempdir().unwrap();
        let config = Config::load_from(&dir.path().join("nonexistent.toml")).unwrap();

        assert_eq!(config.dialog.auto_close(), Duration::from_millis(1500));
        assert_eq!(config.dialog.status_clear(), Duration::from_millis(2000));
        assert_eq!(config.dialog.default_tab, AccountTab::Web);
        assert_eq!(config.oauth.success_event, "openai-oauth-success");
        assert!(config.strings.is_empty());
    }

    #[test]
    fn test_load_partial_config_merges_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "[dialog]\nauto_close_ms = 0\ndefault_tab = \"api\"\n").unwrap();

        let config = Config::load_from(&path).unwrap();
        assert_eq!(config.dialog.auto_close(), Duration::ZERO);
        assert_eq!(config.dialog.status_clear_ms, 2000);
        assert_eq!(config.dialog.default_tab, AccountTab::Api);
        assert_eq!(config.logging.filter, "info");
    }

    #[test]
    fn test_load_string_overrides() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(
            &path,
            "[strings]\n\"accounts.add.openai.title\" = \"Add ChatGPT Account\"\n",
        )
        .unwrap();

        let config = Config::load_from(&path).unwrap();
        assert_eq!(
            config.strings.get("accounts.add.openai.title").map(String::as_str),
            Some("Add ChatGPT Account")
        );
    }

    #[test]
    fn test_load_invalid_toml_fails() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "[dialog\n").unwrap();

        let err = Config::load_from(&path).unwrap_err();
        assert!(format!("{err:#}").contains("Failed to parse config"));
    }

    #[test]
    fn test_init_writes_template_that_parses_to_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("subdir").join("config.toml");

        Config::init(&path).unwrap();

        let contents = fs::read_to_string(&path).unwrap();
        assert!(contents.contains("auto_close_ms = 1500"));
        let config = Config::load_from(&path).unwrap();
        assert_eq!(config.dialog.status_clear_ms, 2000);
    }

    #[test]
    fn test_init_fails_if_exists() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "").unwrap();

        assert!(Config::init(&path).is_err());
    }

    #[test]
    fn test_tab_toggle() {
        assert_eq!(AccountTab::Web.toggled(), AccountTab::Api);
        assert_eq!(AccountTab::Api.toggled(), AccountTab::Web);
    }

    #[test]
    fn test_load_uses_intake_home() {
        let dir = tempdir().unwrap();
        fs::write(
            dir.path().join("config.toml"),
            "[oauth]\nsuccess_event = \"custom-login\"\n",
        )
        .unwrap();
        // SAFETY: INTAKE_HOME is only read by this test in this crate.
        unsafe {
            std::env::set_var("INTAKE_HOME", dir.path());
        }

        assert_eq!(paths::config_path(), dir.path().join("config.toml"));
        assert_eq!(paths::logs_dir(), dir.path().join("logs"));
        let config = Config::load().unwrap();
        assert_eq!(config.oauth.success_event, "custom-login");
        assert_eq!(config.dialog.auto_close_ms, 1500);
    }

    #[test]
    fn test_intake_log_overrides_filter() {
        let logging = LoggingConfig {
            filter: "warn".to_string(),
        };
        // SAFETY: INTAKE_LOG is only read by this test in this crate.
        unsafe {
            std::env::set_var(LoggingConfig::ENV_VAR, "intake=debug");
        }
        assert_eq!(logging.effective_filter(), "intake=debug");

        unsafe {
            std::env::set_var(LoggingConfig::ENV_VAR, "  ");
        }
        assert_eq!(logging.effective_filter(), "warn");
    }
}
