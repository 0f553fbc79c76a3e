//! Deployment configuration, read from `config.json`

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{i18n::Language, position::WatchOptions};

/// How eagerly to ask for fresh fixes.
#[derive(Deserialize, Serialize, Copy, Clone, Debug, Eq, PartialEq, Default)]
#[serde(rename_all = "snake_case")]
pub enum WatchProfile {
    /// Tolerate slow fixes and reuse fixes up to a second old.
    Balanced,

    /// Fail fast and never reuse a cached fix.
    #[default]
    Aggressive,
}

impl WatchProfile {
    /// The provider options for this profile.
    #[must_use]
    pub const fn options(self) -> WatchOptions {
        match self {
            WatchProfile::Balanced => WatchOptions {
                high_accuracy: true,
                timeout_ms: 15_000,
                max_cache_age_ms: 1_000,
            },
            WatchProfile::Aggressive => WatchOptions {
                high_accuracy: true,
                timeout_ms: 8_000,
                max_cache_age_ms: 0,
            },
        }
    }
}

/// The static assets needed to load the page offline.
pub const STATIC_ASSETS: [&str; 7] = [
    "./",
    "./index.html",
    "./styles.css",
    "./config.json",
    "./vista_frontend.js",
    "./vista_frontend_bg.wasm",
    "./manifest.json",
];

/// Configuration for the page and its service worker.
#[derive(Deserialize, Serialize, Clone, Debug, Eq, PartialEq)]
#[serde(default)]
pub struct Config {
    /// How to watch the location provider.
    pub watch: WatchProfile,

    /// Language used until the user picks one.
    pub default_language: Language,

    /// Assets to store for offline use.
    pub assets: Vec<String>,

    /// Prefix of the cache name; the build version is appended.
    pub cache_prefix: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            watch: WatchProfile::default(),
            default_language: Language::DEFAULT,
            assets: STATIC_ASSETS.iter().map(ToString::to_string).collect(),
            cache_prefix: "vista-static-".to_string(),
        }
    }
}

/// An error loading the configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The configuration could not be parsed.
    #[error("Invalid configuration: {0}")]
    Json(#[from] serde_json::Error),
}

impl Config {
    /// Parse a configuration; missing fields use their defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON is malformed or a field has the wrong type.
    pub fn from_json(json: &str) -> Result<Config, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    /// The name of the cache generation for a build.
    #[must_use]
    pub fn cache_name(&self, build: &str) -> String {
        format!("{}{build}", self.cache_prefix)
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;

    #[test]
    fn test_empty_config_is_default() {
        let config = Config::from_json("{}").unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.watch.options().timeout_ms, 8_000);
        assert_eq!(config.watch.options().max_cache_age_ms, 0);
    }

    #[test]
    fn test_partial_config() {
        let config =
            Config::from_json(r#"{"watch": "balanced", "default_language": "en"}"#).unwrap();
        assert_eq!(config.watch, WatchProfile::Balanced);
        assert_eq!(config.default_language, Language::En);
        assert_eq!(config.assets.len(), STATIC_ASSETS.len());
        assert!(config.watch.options().high_accuracy);
        assert_eq!(config.watch.options().timeout_ms, 15_000);
    }

    #[test]
    fn test_bad_config() {
        assert!(Config::from_json(r#"{"watch": "lazy"}"#).is_err());
        assert!(Config::from_json("not json").is_err());
    }

    #[test]
    fn test_cache_name() {
        let config = Config::default();
        assert_eq!(config.cache_name("2024-05-16"), "vista-static-2024-05-16");
    }
}
