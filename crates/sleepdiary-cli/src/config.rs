//! TOML-based CLI configuration.
//!
//! Stores the default locale and questionnaire type, and the API endpoint
//! for commands that talk to a live server. Stored at
//! `~/.config/sleepdiary/config.toml`.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// API endpoint configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Base URL of the questionnaire API (e.g. "https://host/api").
    #[serde(default)]
    pub base_url: Option<String>,
    /// Bearer token attached to every request.
    #[serde(default)]
    pub token: Option<String>,
}

/// CLI configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_locale")]
    pub locale: String,
    #[serde(default = "default_questionnaire")]
    pub questionnaire: String,
    #[serde(default)]
    pub api: ApiConfig,
}

fn default_locale() -> String {
    "da".into()
}

fn default_questionnaire() -> String {
    "morning".into()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            locale: default_locale(),
            questionnaire: default_questionnaire(),
            api: ApiConfig::default(),
        }
    }
}

impl Config {
    fn path() -> Result<PathBuf, Box<dyn std::error::Error>> {
        let base = dirs::config_dir().ok_or("cannot determine config directory")?;
        Ok(base.join("sleepdiary").join("config.toml"))
    }

    /// Load from disk or return defaults when no config file exists.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file exists but cannot be parsed.
    pub fn load() -> Result<Self, Box<dyn std::error::Error>> {
        let path = Self::path()?;
        match std::fs::read_to_string(&path) {
            Ok(content) => {
                let cfg: Config = toml::from_str(&content)?;
                Ok(cfg)
            }
            Err(_) => Ok(Self::default()),
        }
    }

    /// Load from disk, returning defaults on any error.
    pub fn load_or_default() -> Self {
        Self::load().unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_roundtrip() {
        let cfg = Config::default();
        let toml_str = toml::to_string_pretty(&cfg).unwrap();
        let parsed: Config = toml::from_str(&toml_str).unwrap();
        assert_eq!(parsed.locale, "da");
        assert_eq!(parsed.questionnaire, "morning");
        assert!(parsed.api.base_url.is_none());
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let parsed: Config = toml::from_str("locale = \"en\"").unwrap();
        assert_eq!(parsed.locale, "en");
        assert_eq!(parsed.questionnaire, "morning");
    }
}
