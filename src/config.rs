use crate::i18n::Language;
use anyhow::{Context, Result};
use std::path::PathBuf;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct Config {
    // Persistence (geo cache + saved language)
    pub state_dir: PathBuf,

    // Detection
    pub default_language: Language,
    pub provider_timeout: Duration,
    pub geo_providers_enabled: bool,

    // Optional ipinfo.io token
    pub ipinfo_token: Option<String>,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            state_dir: std::env::var("LOCALE_STATE_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| default_state_dir()),

            default_language: match std::env::var("DEFAULT_LANGUAGE") {
                Ok(code) => Language::from_code(code.trim())
                    .context("DEFAULT_LANGUAGE is not a supported language")?,
                Err(_) => Language::canonical(),
            },

            provider_timeout: std::env::var("GEO_PROVIDER_TIMEOUT_MS")
                .ok()
                .map(|v| v.parse::<u64>())
                .transpose()
                .context("GEO_PROVIDER_TIMEOUT_MS must be a number of milliseconds")?
                .map(Duration::from_millis)
                .unwrap_or(crate::providers::DEFAULT_PROVIDER_TIMEOUT),

            geo_providers_enabled: std::env::var("GEO_PROVIDERS_ENABLED")
                .ok()
                .map(|v| !matches!(v.trim().to_ascii_lowercase().as_str(), "0" | "false" | "no" | "off"))
                .unwrap_or(true),

            ipinfo_token: std::env::var("IPINFO_TOKEN")
                .ok()
                .filter(|v| !v.trim().is_empty()),
        })
    }
}

fn default_state_dir() -> PathBuf {
    dirs::data_local_dir()
        .map(|dir| dir.join("locale-engine"))
        .unwrap_or_else(|| PathBuf::from(".locale-engine"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    const VARS: [&str; 5] = [
        "LOCALE_STATE_DIR",
        "DEFAULT_LANGUAGE",
        "GEO_PROVIDER_TIMEOUT_MS",
        "GEO_PROVIDERS_ENABLED",
        "IPINFO_TOKEN",
    ];

    fn clear_env() {
        for var in VARS {
            std::env::remove_var(var);
        }
    }

    #[test]
    #[serial]
    fn test_defaults() {
        clear_env();
        let config = Config::from_env().expect("Should load defaults");

        assert_eq!(config.default_language, Language::ENGLISH);
        assert_eq!(config.provider_timeout, Duration::from_millis(1500));
        assert!(config.geo_providers_enabled);
        assert_eq!(config.ipinfo_token, None);
        assert!(config.state_dir.to_string_lossy().ends_with("locale-engine"));
    }

    #[test]
    #[serial]
    fn test_overrides() {
        clear_env();
        std::env::set_var("LOCALE_STATE_DIR", "/tmp/locale-test");
        std::env::set_var("DEFAULT_LANGUAGE", "fr");
        std::env::set_var("GEO_PROVIDER_TIMEOUT_MS", "250");
        std::env::set_var("GEO_PROVIDERS_ENABLED", "false");
        std::env::set_var("IPINFO_TOKEN", "tok");

        let config = Config::from_env().expect("Should load overrides");
        clear_env();

        assert_eq!(config.state_dir, PathBuf::from("/tmp/locale-test"));
        assert_eq!(config.default_language, Language::FRENCH);
        assert_eq!(config.provider_timeout, Duration::from_millis(250));
        assert!(!config.geo_providers_enabled);
        assert_eq!(config.ipinfo_token.as_deref(), Some("tok"));
    }

    #[test]
    #[serial]
    fn test_invalid_default_language_is_error() {
        clear_env();
        std::env::set_var("DEFAULT_LANGUAGE", "it");
        let result = Config::from_env();
        clear_env();

        let err = result.unwrap_err();
        assert!(format!("{:#}", err).contains("DEFAULT_LANGUAGE"));
    }

    #[test]
    #[serial]
    fn test_invalid_timeout_is_error() {
        clear_env();
        std::env::set_var("GEO_PROVIDER_TIMEOUT_MS", "soon");
        let result = Config::from_env();
        clear_env();

        assert!(result.is_err());
    }

    #[test]
    #[serial]
    fn test_blank_token_is_none() {
        clear_env();
        std::env::set_var("IPINFO_TOKEN", "   ");
        let config = Config::from_env().expect("Should load");
        clear_env();

        assert_eq!(config.ipinfo_token, None);
    }
}
