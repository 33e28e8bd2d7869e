//! Configuration system for gsg.
//!
//! Supports layered configuration:
//! 1. Environment variables (highest priority)
//! 2. User config (`~/.config/gsg/config.toml`, honoring `XDG_CONFIG_HOME`)
//! 3. Compiled defaults (lowest priority)
//!
//! The hook must never fail because of configuration problems, so an
//! unreadable or invalid config file silently falls back to defaults.

use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::PathBuf;

/// Environment variable: set to `1` or `true` to bypass the guard entirely.
pub const ENV_BYPASS: &str = "GSG_BYPASS";

/// Environment variable: path to the blocked-command log file.
pub const ENV_LOG_FILE: &str = "GSG_LOG_FILE";

/// Environment variable: maximum accepted hook input size in bytes.
pub const ENV_MAX_INPUT_BYTES: &str = "GSG_MAX_INPUT_BYTES";

/// Environment variable: maximum accepted command size in bytes.
pub const ENV_MAX_COMMAND_BYTES: &str = "GSG_MAX_COMMAND_BYTES";

/// Default limit for the hook input JSON read from stdin.
pub const DEFAULT_MAX_HOOK_INPUT_BYTES: usize = 256 * 1024;

/// Default limit for the extracted command string.
pub const DEFAULT_MAX_COMMAND_BYTES: usize = 64 * 1024;

/// Main configuration structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// General settings.
    pub general: GeneralConfig,
}

/// General configuration options.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// Path to log file for blocked commands (optional). Supports `~`.
    pub log_file: Option<String>,

    /// Maximum hook input size in bytes (`None` = default).
    pub max_hook_input_bytes: Option<usize>,

    /// Maximum command size in bytes (`None` = default).
    pub max_command_bytes: Option<usize>,
}

impl Config {
    /// Load configuration: user config file overlaid with env overrides.
    #[must_use]
    pub fn load() -> Self {
        let mut config = Self::load_user_file().unwrap_or_default();
        config.apply_env_overrides();
        config
    }

    /// Check whether the bypass escape hatch is active.
    #[must_use]
    pub fn is_bypassed() -> bool {
        matches!(
            env::var(ENV_BYPASS).as_deref(),
            Ok("1") | Ok("true") | Ok("TRUE")
        )
    }

    /// Path of the user config file, if a config directory can be determined.
    #[must_use]
    pub fn user_config_path() -> Option<PathBuf> {
        let base = env::var_os("XDG_CONFIG_HOME")
            .map(PathBuf::from)
            .filter(|p| p.is_absolute())
            .or_else(dirs::config_dir)?;
        Some(base.join("gsg").join("config.toml"))
    }

    fn load_user_file() -> Option<Self> {
        let path = Self::user_config_path()?;
        let content = fs::read_to_string(path).ok()?;
        toml::from_str(&content).ok()
    }

    fn apply_env_overrides(&mut self) {
        if let Ok(log_file) = env::var(ENV_LOG_FILE) {
            if !log_file.is_empty() {
                self.general.log_file = Some(log_file);
            }
        }
        if let Some(bytes) = env_usize(ENV_MAX_INPUT_BYTES) {
            self.general.max_hook_input_bytes = Some(bytes);
        }
        if let Some(bytes) = env_usize(ENV_MAX_COMMAND_BYTES) {
            self.general.max_command_bytes = Some(bytes);
        }
    }

    /// Effective hook input limit.
    #[must_use]
    pub fn max_hook_input_bytes(&self) -> usize {
        self.general
            .max_hook_input_bytes
            .unwrap_or(DEFAULT_MAX_HOOK_INPUT_BYTES)
    }

    /// Effective command size limit.
    #[must_use]
    pub fn max_command_bytes(&self) -> usize {
        self.general
            .max_command_bytes
            .unwrap_or(DEFAULT_MAX_COMMAND_BYTES)
    }
}

fn env_usize(name: &str) -> Option<usize> {
    env::var(name).ok()?.parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_limits() {
        let config = Config::default();
        assert_eq!(config.max_hook_input_bytes(), 256 * 1024);
        assert_eq!(config.max_command_bytes(), 64 * 1024);
        assert!(config.general.log_file.is_none());
    }

    #[test]
    fn explicit_limits_override_defaults() {
        let mut config = Config::default();
        config.general.max_hook_input_bytes = Some(128 * 1024);
        config.general.max_command_bytes = Some(32 * 1024);
        assert_eq!(config.max_hook_input_bytes(), 128 * 1024);
        assert_eq!(config.max_command_bytes(), 32 * 1024);
    }

    #[test]
    fn parses_toml_config() {
        let sample = r#"
            [general]
            log_file = "~/.local/share/gsg/blocked.log"
            max_command_bytes = 32768
        "#;
        let config: Config = toml::from_str(sample).unwrap();
        assert_eq!(
            config.general.log_file.as_deref(),
            Some("~/.local/share/gsg/blocked.log")
        );
        assert_eq!(config.max_command_bytes(), 32768);
        assert_eq!(config.max_hook_input_bytes(), DEFAULT_MAX_HOOK_INPUT_BYTES);
    }

    #[test]
    fn empty_toml_is_all_defaults() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config.max_hook_input_bytes(), DEFAULT_MAX_HOOK_INPUT_BYTES);
    }

    #[test]
    #[allow(clippy::assertions_on_constants)]
    fn default_constants_are_reasonable() {
        assert!(DEFAULT_MAX_HOOK_INPUT_BYTES >= 64 * 1024);
        assert!(DEFAULT_MAX_HOOK_INPUT_BYTES <= 1024 * 1024);
        assert!(DEFAULT_MAX_COMMAND_BYTES >= 16 * 1024);
        assert!(DEFAULT_MAX_COMMAND_BYTES <= DEFAULT_MAX_HOOK_INPUT_BYTES);
    }
}
