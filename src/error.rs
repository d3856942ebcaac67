//! Error types for onset.
//!
//! The extraction core itself never fails: unresolvable spans degrade to
//! partial or dropped results. These types cover the ambient surfaces —
//! configuration loading, I/O, and result serialization.

use thiserror::Error;

/// Main error type for onset operations.
#[derive(Error, Debug)]
pub enum OnsetError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Configuration-related errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    ReadFile(#[source] std::io::Error),

    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Result type alias for onset operations.
pub type Result<T> = std::result::Result<T, OnsetError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = OnsetError::Config(ConfigError::Invalid(
            "century_threshold must be below 100".to_string(),
        ));
        assert!(err.to_string().contains("century_threshold"));
    }

    #[test]
    fn test_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: OnsetError = io_err.into();
        assert!(matches!(err, OnsetError::Io(_)));
    }
}
