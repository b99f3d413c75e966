//! Configuration for the cpal native client

use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::backend::AudioBackend;
use crate::error::{CpalClientError, Result};

/// cpal client configuration
///
/// `sample_rate` and `channels` of 0 mean "use the device default".
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Name used for the audio thread and in logs
    pub client_name: String,

    /// Audio backend to use
    pub backend: AudioBackend,

    /// Device name (None for default device)
    pub device_name: Option<String>,

    /// Target sample rate (Hz) - 0 for device native
    pub sample_rate: u32,

    /// Output channel count - 0 for device default
    pub channels: u16,

    /// Frames per output buffer handed to the caller
    pub chunk_frames: usize,

    /// Number of output buffers in circulation
    pub ring_size: usize,

    /// How long buffer exchange waits for a free buffer
    pub exchange_timeout_ms: u64,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            client_name: "outport".to_string(),
            backend: AudioBackend::Default,
            device_name: None,
            sample_rate: 0,
            channels: 2,
            chunk_frames: 1024,
            ring_size: 3,
            exchange_timeout_ms: 2000,
        }
    }
}

impl ClientConfig {
    /// Config for low-latency output (small chunks, short ring)
    pub fn low_latency() -> Self {
        Self {
            chunk_frames: 128,
            ring_size: 2,
            ..Default::default()
        }
    }

    /// Set client name
    pub fn with_client_name(mut self, name: &str) -> Self {
        self.client_name = name.to_string();
        self
    }

    /// Set backend
    pub fn with_backend(mut self, backend: AudioBackend) -> Self {
        self.backend = backend;
        self
    }

    /// Set device by name
    pub fn with_device(mut self, name: &str) -> Self {
        self.device_name = Some(name.to_string());
        self
    }

    /// Set sample rate
    pub fn with_sample_rate(mut self, rate: u32) -> Self {
        self.sample_rate = rate;
        self
    }

    /// Set channel count
    pub fn with_channels(mut self, channels: u16) -> Self {
        self.channels = channels;
        self
    }

    /// Set frames per output buffer
    pub fn with_chunk_frames(mut self, frames: usize) -> Self {
        self.chunk_frames = frames;
        self
    }

    /// Set number of buffers in circulation
    pub fn with_ring_size(mut self, size: usize) -> Self {
        self.ring_size = size;
        self
    }

    /// Buffer exchange timeout
    pub fn exchange_timeout(&self) -> Duration {
        Duration::from_millis(self.exchange_timeout_ms)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.chunk_frames == 0 {
            return Err(CpalClientError::InvalidConfig(
                "chunk_frames must be greater than 0".to_string(),
            ));
        }

        if self.ring_size < 2 {
            return Err(CpalClientError::InvalidConfig(format!(
                "ring_size must be at least 2, got {}",
                self.ring_size
            )));
        }

        if self.exchange_timeout_ms == 0 {
            return Err(CpalClientError::InvalidConfig(
                "exchange_timeout_ms must be greater than 0".to_string(),
            ));
        }

        if self.device_name.as_deref() == Some("") {
            return Err(CpalClientError::InvalidConfig(
                "device_name must not be empty".to_string(),
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = ClientConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.sample_rate, 0);
        assert_eq!(config.exchange_timeout(), Duration::from_secs(2));
    }

    #[test]
    fn test_builder() {
        let config = ClientConfig::low_latency()
            .with_client_name("tone")
            .with_device("hw:1")
            .with_sample_rate(96_000)
            .with_channels(1)
            .with_ring_size(4);

        assert_eq!(config.client_name, "tone");
        assert_eq!(config.device_name.as_deref(), Some("hw:1"));
        assert_eq!(config.sample_rate, 96_000);
        assert_eq!(config.channels, 1);
        assert_eq!(config.chunk_frames, 128);
        assert_eq!(config.ring_size, 4);
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        assert!(ClientConfig::default().with_chunk_frames(0).validate().is_err());
        assert!(ClientConfig::default().with_ring_size(1).validate().is_err());
        assert!(ClientConfig::default().with_device("").validate().is_err());

        let config = ClientConfig {
            exchange_timeout_ms: 0,
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(CpalClientError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        let config: ClientConfig =
            serde_json::from_str(r#"{ "chunk_frames": 256, "device_name": "USB DAC" }"#)
                .unwrap();

        assert_eq!(config.chunk_frames, 256);
        assert_eq!(config.device_name.as_deref(), Some("USB DAC"));
        assert_eq!(config.ring_size, ClientConfig::default().ring_size);
        assert_eq!(config.backend, AudioBackend::Default);
    }
}
