//! Configuration settings for onset.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, Result};
use crate::extraction::ExtractionConfig;

/// Main configuration structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub extraction: ExtractionConfig,
    pub output: OutputConfig,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let expanded = shellexpand::tilde(
            path.as_ref()
                .to_str()
                .ok_or_else(|| ConfigError::Invalid("non-UTF-8 config path".to_string()))?,
        )
        .to_string();
        let content = std::fs::read_to_string(expanded).map_err(ConfigError::ReadFile)?;
        Self::from_toml(&content)
    }

    /// Parse configuration from a TOML string.
    pub fn from_toml(content: &str) -> Result<Self> {
        let config: Config = toml::from_str(content).map_err(ConfigError::Parse)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from default locations or use defaults.
    pub fn load() -> Result<Self> {
        let config_paths = [
            // Current directory
            PathBuf::from("onset.toml"),
            // User config directory
            dirs::config_dir()
                .map(|p| p.join("onset/config.toml"))
                .unwrap_or_default(),
        ];

        for path in &config_paths {
            if path.exists() {
                tracing::info!("Loading config from: {}", path.display());
                return Self::from_file(path);
            }
        }

        tracing::info!("No config file found, using defaults");
        Ok(Config::default())
    }

    /// Validate the configuration.
    fn validate(&self) -> Result<()> {
        let policy = &self.extraction.resolver;
        if policy.century_threshold >= 100 {
            return Err(
                ConfigError::Invalid("century_threshold must be below 100".to_string()).into(),
            );
        }
        if policy.month_days.iter().any(|d| !(28..=31).contains(d)) {
            return Err(
                ConfigError::Invalid("month_days entries must be 28-31".to_string()).into(),
            );
        }
        Ok(())
    }
}

/// Output configuration for the CLI.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Emit JSON instead of the human-readable span table.
    pub json: bool,
    /// Include IGNORE-role spans (ages, frequencies) in output.
    pub include_ignored: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            json: false,
            include_ignored: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.extraction.resolver.century_threshold, 30);
        assert_eq!(config.extraction.resolver.fallback_year, 1900);
        assert_eq!(config.extraction.resolver.month_days[1], 29);
    }

    #[test]
    fn test_parse_toml_overrides() {
        let config = Config::from_toml(
            r#"
            [extraction]
            reference_date = "2020-01-01"

            [extraction.resolver]
            century_threshold = 50
            "#,
        )
        .unwrap();
        assert_eq!(config.extraction.resolver.century_threshold, 50);
        assert!(config.extraction.reference_date.is_some());
    }

    #[test]
    fn test_invalid_threshold_rejected() {
        let result = Config::from_toml(
            r#"
            [extraction.resolver]
            century_threshold = 150
            "#,
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_invalid_month_days_rejected() {
        let result = Config::from_toml(
            r#"
            [extraction.resolver]
            month_days = [31, 29, 31, 30, 31, 30, 31, 31, 30, 31, 30, 45]
            "#,
        );
        assert!(result.is_err());
    }
}
