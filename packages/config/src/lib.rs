#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Startup configuration for `SceneBay`.
//!
//! Configuration is read once at startup and handed to the server, CLI and
//! theme controller as a plain value. Sources, in increasing priority:
//!
//! 1. Built-in defaults.
//! 2. A TOML file: `$SCENEBAY_CONFIG`, or `scenebay.toml` in the working
//!    directory if it exists.
//! 3. Environment variables (`AI_PROVIDER`, `AI_MODEL`, `AI_BASE_URL`,
//!    `BIND_ADDR`, `PORT`, `SCENEBAY_THEME_FILE`, `SCENEBAY_PREFERS_DARK`).
//!
//! API keys are not part of the file format; providers read
//! them from the environment.

use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

/// Default config file looked up in the working directory.
pub const DEFAULT_CONFIG_PATH: &str = "scenebay.toml";

/// Default location of the persisted theme preference.
pub const DEFAULT_THEME_FILE: &str = "data/theme.toml";

/// Errors from loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The config file could not be read.
    #[error("Failed to read config file {path}: {source}")]
    Io {
        /// File that failed to read.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// The config file is not valid TOML for [`AppConfig`].
    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    /// An environment override has an unusable value.
    #[error("Invalid value for {key}: {value}")]
    InvalidEnv {
        /// Environment variable name.
        key: &'static str,
        /// The rejected value.
        value: String,
    },
}

/// Complete application configuration.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AppConfig {
    /// Generative model settings.
    pub ai: AiConfig,
    /// HTTP server settings.
    pub server: ServerConfig,
    /// Theme preference settings.
    pub theme: ThemeSettings,
}

/// Generative model settings.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AiConfig {
    /// Provider name (`gemini`, `openai`, `anthropic`). Auto-detected from
    /// available credentials when unset.
    pub provider: Option<String>,
    /// Model identifier. Each provider has its own default.
    pub model: Option<String>,
    /// Override for the provider's API base URL (e.g. a local
    /// OpenAI-compatible server).
    pub base_url: Option<String>,
    /// Sampling temperature.
    pub temperature: f32,
}

impl Default for AiConfig {
    fn default() -> Self {
        Self {
            provider: None,
            model: None,
            base_url: None,
            temperature: 0.5,
        }
    }
}

/// HTTP server settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ServerConfig {
    /// Address to bind.
    pub bind_addr: String,
    /// Port to bind.
    pub port: u16,
    /// Directory holding the built frontend.
    pub static_dir: PathBuf,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: "127.0.0.1".to_string(),
            port: 8080,
            static_dir: PathBuf::from("app/dist"),
        }
    }
}

/// Theme preference settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ThemeSettings {
    /// File the chosen theme is persisted to.
    pub file: PathBuf,
    /// Stand-in for the OS-level dark mode preference, consulted when no
    /// theme has been persisted yet.
    pub prefers_dark: bool,
}

impl Default for ThemeSettings {
    fn default() -> Self {
        Self {
            file: PathBuf::from(DEFAULT_THEME_FILE),
            prefers_dark: false,
        }
    }
}

impl AppConfig {
    /// Loads configuration from the default file locations and the process
    /// environment.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if an explicitly configured file cannot be
    /// read, the file does not parse, or an environment override is
    /// malformed.
    pub fn load() -> Result<Self, ConfigError> {
        let lookup = |key: &str| std::env::var(key).ok();

        let mut config = match lookup("SCENEBAY_CONFIG") {
            Some(path) => Self::from_file(Path::new(&path))?,
            None if Path::new(DEFAULT_CONFIG_PATH).exists() => {
                Self::from_file(Path::new(DEFAULT_CONFIG_PATH))?
            }
            None => Self::default(),
        };

        config.apply_env(lookup)?;
        Ok(config)
    }

    /// Reads and parses a TOML config file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the file cannot be read or parsed.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        log::debug!("Loading config from {}", path.display());
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&text)
    }

    /// Parses a TOML config document.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] if the document is invalid.
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        Ok(toml::de::from_str(text)?)
    }

    /// Applies environment overrides using `lookup` to read variables.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidEnv`] if `PORT` or
    /// `SCENEBAY_PREFERS_DARK` cannot be parsed.
    pub fn apply_env(
        &mut self,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<(), ConfigError> {
        if let Some(provider) = lookup("AI_PROVIDER") {
            self.ai.provider = Some(provider);
        }
        if let Some(model) = lookup("AI_MODEL") {
            self.ai.model = Some(model);
        }
        if let Some(base_url) = lookup("AI_BASE_URL") {
            self.ai.base_url = Some(base_url);
        }
        if let Some(bind_addr) = lookup("BIND_ADDR") {
            self.server.bind_addr = bind_addr;
        }
        if let Some(port) = lookup("PORT") {
            self.server.port = port.parse().map_err(|_| ConfigError::InvalidEnv {
                key: "PORT",
                value: port.clone(),
            })?;
        }
        if let Some(file) = lookup("SCENEBAY_THEME_FILE") {
            self.theme.file = PathBuf::from(file);
        }
        if let Some(value) = lookup("SCENEBAY_PREFERS_DARK") {
            self.theme.prefers_dark = parse_bool(&value).ok_or(ConfigError::InvalidEnv {
                key: "SCENEBAY_PREFERS_DARK",
                value,
            })?;
        }
        Ok(())
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use super::*;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: BTreeMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn empty_document_yields_defaults() {
        let config = AppConfig::from_toml_str("").unwrap();
        assert_eq!(config, AppConfig::default());
        assert!((config.ai.temperature - 0.5).abs() < f32::EPSILON);
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.theme.file, PathBuf::from(DEFAULT_THEME_FILE));
    }

    #[test]
    fn parses_partial_document() {
        let config = AppConfig::from_toml_str(
            r#"
            [ai]
            provider = "openai"
            temperature = 0.2

            [server]
            port = 9000
            "#,
        )
        .unwrap();
        assert_eq!(config.ai.provider.as_deref(), Some("openai"));
        assert_eq!(config.server.port, 9000);
        assert_eq!(config.server.bind_addr, "127.0.0.1");
    }

    #[test]
    fn rejects_unknown_keys() {
        assert!(AppConfig::from_toml_str("[ai]\napi_key = \"nope\"").is_err());
    }

    #[test]
    fn env_overrides_file_values() {
        let mut config = AppConfig::from_toml_str("[server]\nport = 9000").unwrap();
        config
            .apply_env(env(&[
                ("PORT", "7070"),
                ("AI_MODEL", "gemini-2.5-pro"),
                ("SCENEBAY_PREFERS_DARK", "yes"),
            ]))
            .unwrap();
        assert_eq!(config.server.port, 7070);
        assert_eq!(config.ai.model.as_deref(), Some("gemini-2.5-pro"));
        assert!(config.theme.prefers_dark);
    }

    #[test]
    fn malformed_env_values_are_errors() {
        let mut config = AppConfig::default();
        assert!(matches!(
            config.apply_env(env(&[("PORT", "eighty")])),
            Err(ConfigError::InvalidEnv { key: "PORT", .. })
        ));
        assert!(matches!(
            config.apply_env(env(&[("SCENEBAY_PREFERS_DARK", "maybe")])),
            Err(ConfigError::InvalidEnv {
                key: "SCENEBAY_PREFERS_DARK",
                ..
            })
        ));
    }
}
