//! Error types for keyseed core

use thiserror::Error;

/// Main error type for keyseed operations
///
/// Per-query failures never surface through this type: the fetcher turns them
/// into diagnostics. What remains are boundary failures (bad keywords, bad
/// configuration) and export I/O.
#[derive(Debug, Error)]
pub enum KeyseedError {
    /// Precondition failure on caller-supplied input
    #[error("Validation error: {0}")]
    Validation(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Network/HTTP error
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Delimited export error
    #[error("Export error: {0}")]
    Csv(#[from] csv::Error),
}

/// Convenient Result type using KeyseedError
pub type Result<T> = std::result::Result<T, KeyseedError>;

impl KeyseedError {
    /// Create a validation error
    pub fn validation(msg: impl Into<String>) -> Self {
        KeyseedError::Validation(msg.into())
    }

    /// Create a config error
    pub fn config(msg: impl Into<String>) -> Self {
        KeyseedError::Config(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_creation() {
        let err = KeyseedError::validation("keyword is empty");
        assert_eq!(err.to_string(), "Validation error: keyword is empty");

        let err = KeyseedError::config("timeout must be positive");
        assert_eq!(err.to_string(), "Configuration error: timeout must be positive");
    }

    #[test]
    fn test_io_conversion() {
        fn returns_io() -> Result<()> {
            Err(std::io::Error::new(std::io::ErrorKind::BrokenPipe, "pipe closed"))?;
            Ok(())
        }

        let err = returns_io().unwrap_err();
        assert!(matches!(err, KeyseedError::Io(_)));
    }
}
