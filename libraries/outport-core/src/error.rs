/// Core error types for Outport
use crate::types::LifecycleState;
use thiserror::Error;

/// Result type alias using `ClientError`
pub type Result<T> = std::result::Result<T, ClientError>;

/// Errors raised by the handle or propagated from a native client
#[derive(Error, Debug)]
pub enum ClientError {
    /// The native resource could not be acquired
    #[error("Audio resource unavailable: {0}")]
    ResourceUnavailable(String),

    /// Operation is not legal in the current lifecycle state
    #[error("Cannot {operation} while {state}")]
    InvalidStateTransition {
        /// What the caller tried to do
        operation: &'static str,
        /// State the handle was in
        state: LifecycleState,
    },

    /// The native client was already released by `stop`
    #[error("Cannot {operation}: client already released")]
    AlreadyReleased {
        /// What the caller tried to do
        operation: &'static str,
    },

    /// Device errors reported by the native client
    #[error("Device error: {0}")]
    Device(String),

    /// Stream errors reported by the native client
    #[error("Stream error: {0}")]
    Stream(String),

    /// Timed out waiting on the native client
    #[error("Timed out: {0}")]
    Timeout(String),

    /// Invalid client configuration
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

impl ClientError {
    /// Create a resource unavailable error
    pub fn unavailable(msg: impl Into<String>) -> Self {
        Self::ResourceUnavailable(msg.into())
    }

    /// Create a device error
    pub fn device(msg: impl Into<String>) -> Self {
        Self::Device(msg.into())
    }

    /// Create a stream error
    pub fn stream(msg: impl Into<String>) -> Self {
        Self::Stream(msg.into())
    }

    /// Create an invalid configuration error
    pub fn invalid_config(msg: impl Into<String>) -> Self {
        Self::InvalidConfig(msg.into())
    }

    /// True for errors produced by the handle's own lifecycle checks
    pub fn is_lifecycle_error(&self) -> bool {
        matches!(
            self,
            Self::InvalidStateTransition { .. } | Self::AlreadyReleased { .. }
        )
    }
}
