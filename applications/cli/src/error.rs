/// CLI error types
use thiserror::Error;

/// Result type for CLI operations
pub type Result<T> = std::result::Result<T, AppError>;

/// CLI errors
#[derive(Debug, Error)]
pub enum AppError {
    /// Configuration could not be loaded or is invalid
    #[error("Configuration error: {0}")]
    Config(String),

    /// Audio client error
    #[error(transparent)]
    Client(#[from] outport_core::ClientError),
}

impl From<config::ConfigError> for AppError {
    fn from(err: config::ConfigError) -> Self {
        AppError::Config(err.to_string())
    }
}

impl From<outport_cpal::CpalClientError> for AppError {
    fn from(err: outport_cpal::CpalClientError) -> Self {
        AppError::Config(err.to_string())
    }
}
