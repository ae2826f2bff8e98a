//! Error types for configuration handling.

use thiserror::Error;

/// Errors raised while loading or validating [`crate::Settings`].
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Config file or environment layer failed to load or deserialize.
    #[error("Configuration error: {0}")]
    Load(String),

    /// A setting value is out of range or otherwise unusable.
    #[error("Invalid setting: {0}")]
    Invalid(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = ConfigError::Load("missing file".to_string());
        assert_eq!(err.to_string(), "Configuration error: missing file");

        let err = ConfigError::Invalid("top_k must be >= 1".to_string());
        assert_eq!(err.to_string(), "Invalid setting: top_k must be >= 1");
    }
}
