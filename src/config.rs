use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{Result, ScanError};

/// Public CORS relay used when none is configured
pub const DEFAULT_RELAY_URL: &str = "https://api.allorigins.win/raw";

/// Largest accepted `delay_scale`; at this scale a DataLayer run takes about 12 minutes
pub const MAX_DELAY_SCALE: f64 = 100.0;

/// Domain the DataLayer simulation always treats as fully instrumented
pub const DEFAULT_SAMPLE_DOMAIN: &str = "whitespark.ca";

/// Global schemascope configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Relay endpoint; the target URL is passed as its `url` query parameter
    #[serde(default = "default_relay_url")]
    pub relay_url: String,

    /// User-Agent sent to the relay
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// Overall fetch timeout. Unset means wait for the relay indefinitely.
    #[serde(default)]
    pub fetch_timeout_secs: Option<u64>,

    /// Multiplier for the DataLayer simulation phase delays (0 disables them)
    #[serde(default = "default_delay_scale")]
    pub delay_scale: f64,

    /// URL substring that makes every DataLayer checkpoint succeed
    #[serde(default = "default_sample_domain")]
    pub sample_domain: String,
}

fn default_relay_url() -> String {
    DEFAULT_RELAY_URL.to_string()
}

fn default_user_agent() -> String {
    format!(
        "Mozilla/5.0 (compatible; schemascope/{})",
        env!("CARGO_PKG_VERSION")
    )
}

fn default_delay_scale() -> f64 {
    1.0
}

fn default_sample_domain() -> String {
    DEFAULT_SAMPLE_DOMAIN.to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            relay_url: default_relay_url(),
            user_agent: default_user_agent(),
            fetch_timeout_secs: None,
            delay_scale: default_delay_scale(),
            sample_domain: default_sample_domain(),
        }
    }
}

impl Config {
    /// Load configuration from the default location
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path()?)
    }

    /// Load configuration from a specific file, falling back to defaults if it is missing
    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let content = std::fs::read_to_string(path)?;
            let config: Config = toml::from_str(&content)?;
            config.validate()?;
            Ok(config)
        } else {
            Ok(Self::default())
        }
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)
            .map_err(|e| ScanError::ConfigError(e.to_string()))?;
        std::fs::write(path, content)?;
        Ok(())
    }

    fn validate(&self) -> Result<()> {
        if !(self.delay_scale.is_finite() && (0.0..=MAX_DELAY_SCALE).contains(&self.delay_scale)) {
            return Err(ScanError::ConfigError(format!(
                "delay_scale must be between 0 and {}, got {}",
                MAX_DELAY_SCALE, self.delay_scale
            )));
        }
        if url::Url::parse(&self.relay_url).is_err() {
            return Err(ScanError::ConfigError(format!(
                "relay_url is not a valid URL: {}",
                self.relay_url
            )));
        }
        Ok(())
    }

    /// Get the config file path
    ///
    /// Supports SCHEMASCOPE_CONFIG environment variable for test isolation
    pub fn config_path() -> Result<PathBuf> {
        if let Ok(path) = std::env::var("SCHEMASCOPE_CONFIG") {
            return Ok(PathBuf::from(path));
        }
        let dirs = ProjectDirs::from("", "", "schemascope")
            .ok_or_else(|| ScanError::ConfigError("Could not determine config directory".into()))?;
        Ok(dirs.config_dir().join("config.toml"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.relay_url, DEFAULT_RELAY_URL);
        assert_eq!(config.sample_domain, "whitespark.ca");
        assert_eq!(config.fetch_timeout_secs, None);
        assert_eq!(config.delay_scale, 1.0);
    }

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load_from(&dir.path().join("absent.toml")).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "fetch_timeout_secs = 20\ndelay_scale = 0.0\n").unwrap();

        let config = Config::load_from(&path).unwrap();
        assert_eq!(config.fetch_timeout_secs, Some(20));
        assert_eq!(config.delay_scale, 0.0);
        assert_eq!(config.relay_url, DEFAULT_RELAY_URL);
    }

    #[test]
    fn test_save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");
        let config = Config {
            relay_url: "https://relay.internal/fetch".into(),
            ..Config::default()
        };
        config.save_to(&path).unwrap();
        assert_eq!(Config::load_from(&path).unwrap(), config);
    }

    #[test]
    fn test_negative_delay_scale_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "delay_scale = -1.0\n").unwrap();
        assert!(matches!(Config::load_from(&path), Err(ScanError::ConfigError(_))));
    }

    #[test]
    fn test_huge_delay_scale_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "delay_scale = 1e300\n").unwrap();
        assert!(matches!(Config::load_from(&path), Err(ScanError::ConfigError(_))));

        std::fs::write(&path, "delay_scale = 100.0\n").unwrap();
        assert_eq!(Config::load_from(&path).unwrap().delay_scale, MAX_DELAY_SCALE);
    }
}
