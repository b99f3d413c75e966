/// cpal client errors
use thiserror::Error;

use crate::backend::BackendError;
use crate::device::DeviceError;

/// Result type for cpal client operations
pub type Result<T> = std::result::Result<T, CpalClientError>;

/// Errors raised by the cpal native client
#[derive(Debug, Error)]
pub enum CpalClientError {
    /// Backend could not be opened
    #[error(transparent)]
    Backend(#[from] BackendError),

    /// Device lookup failed
    #[error(transparent)]
    Device(#[from] DeviceError),

    /// No stream configuration matches the request
    #[error("Unsupported stream configuration: {0}")]
    UnsupportedConfig(String),

    /// Invalid client configuration
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Failed to build output stream
    #[error("Failed to build output stream: {0}")]
    StreamBuildError(String),

    /// Failed to play stream
    #[error("Failed to play stream: {0}")]
    PlayError(String),

    /// Failed to pause stream
    #[error("Failed to pause stream: {0}")]
    PauseError(String),

    /// Stream is already running
    #[error("Stream already active")]
    AlreadyActive,

    /// No free buffer came back in time
    #[error("No free output buffer after {0:?}")]
    BufferTimeout(std::time::Duration),

    /// The audio thread did not answer a command in time
    #[error("Audio thread did not answer within {0:?}")]
    CommandTimeout(std::time::Duration),

    /// The audio thread exited
    #[error("Audio thread is gone")]
    AudioThreadGone,

    /// Failed to spawn the audio thread
    #[error("Failed to spawn audio thread: {0}")]
    Spawn(#[from] std::io::Error),

    /// CPAL error
    #[error("CPAL error: {0}")]
    CpalError(String),
}

impl From<cpal::BuildStreamError> for CpalClientError {
    fn from(err: cpal::BuildStreamError) -> Self {
        CpalClientError::StreamBuildError(err.to_string())
    }
}

impl From<cpal::PlayStreamError> for CpalClientError {
    fn from(err: cpal::PlayStreamError) -> Self {
        CpalClientError::PlayError(err.to_string())
    }
}

impl From<cpal::PauseStreamError> for CpalClientError {
    fn from(err: cpal::PauseStreamError) -> Self {
        CpalClientError::PauseError(err.to_string())
    }
}

impl From<cpal::DefaultStreamConfigError> for CpalClientError {
    fn from(err: cpal::DefaultStreamConfigError) -> Self {
        CpalClientError::CpalError(err.to_string())
    }
}

impl From<cpal::SupportedStreamConfigsError> for CpalClientError {
    fn from(err: cpal::SupportedStreamConfigsError) -> Self {
        CpalClientError::CpalError(err.to_string())
    }
}

impl From<CpalClientError> for outport_core::ClientError {
    fn from(err: CpalClientError) -> Self {
        use outport_core::ClientError;

        match err {
            CpalClientError::Backend(_)
            | CpalClientError::Spawn(_)
            | CpalClientError::Device(
                DeviceError::BackendUnavailable(_)
                | DeviceError::NoDeviceFound
                | DeviceError::DeviceNotFound(_),
            ) => ClientError::unavailable(err.to_string()),
            CpalClientError::Device(_) | CpalClientError::UnsupportedConfig(_) => {
                ClientError::device(err.to_string())
            }
            CpalClientError::InvalidConfig(msg) => ClientError::invalid_config(msg),
            CpalClientError::BufferTimeout(_) | CpalClientError::CommandTimeout(_) => {
                ClientError::Timeout(err.to_string())
            }
            _ => ClientError::stream(err.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use outport_core::ClientError;
    use std::time::Duration;

    #[test]
    fn missing_device_maps_to_unavailable() {
        let err: ClientError = CpalClientError::Device(DeviceError::NoDeviceFound).into();
        assert!(matches!(err, ClientError::ResourceUnavailable(_)));
    }

    #[test]
    fn unavailable_backend_maps_to_unavailable() {
        let err: ClientError =
            CpalClientError::Device(DeviceError::BackendUnavailable("JACK")).into();
        assert!(matches!(err, ClientError::ResourceUnavailable(_)));

        let err: ClientError =
            CpalClientError::Backend(BackendError::BackendUnavailable("JACK")).into();
        assert!(matches!(err, ClientError::ResourceUnavailable(_)));
    }

    #[test]
    fn buffer_timeout_maps_to_timeout() {
        let err: ClientError =
            CpalClientError::BufferTimeout(Duration::from_millis(500)).into();
        assert!(matches!(err, ClientError::Timeout(_)));

        let err: ClientError = CpalClientError::CommandTimeout(Duration::from_secs(5)).into();
        assert!(matches!(err, ClientError::Timeout(_)));
    }

    #[test]
    fn stream_failures_map_to_stream() {
        let err: ClientError = CpalClientError::AlreadyActive.into();
        assert!(matches!(err, ClientError::Stream(_)));

        let err: ClientError = CpalClientError::InvalidConfig("ring_size".into()).into();
        assert!(matches!(err, ClientError::InvalidConfig(ref msg) if msg == "ring_size"));
    }
}
