// outport-cpal/src/backend.rs
//
// Audio backend selection (system default host, or JACK when built with it)

use cpal::traits::HostTrait;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use thiserror::Error;

/// Audio backend / driver selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AudioBackend {
    /// System default backend (WASAPI on Windows, CoreAudio on macOS, ALSA on Linux)
    #[default]
    Default,

    /// JACK Audio Connection Kit - Professional routing, low-latency
    #[cfg(feature = "jack")]
    Jack,
}

impl AudioBackend {
    /// Get human-readable name of backend
    pub fn name(&self) -> &'static str {
        match self {
            Self::Default => {
                #[cfg(target_os = "windows")]
                return "WASAPI";

                #[cfg(target_os = "macos")]
                return "CoreAudio";

                #[cfg(target_os = "linux")]
                return "ALSA";

                #[cfg(not(any(
                    target_os = "windows",
                    target_os = "macos",
                    target_os = "linux"
                )))]
                return "Default";
            }

            #[cfg(feature = "jack")]
            Self::Jack => "JACK",
        }
    }

    /// Get detailed description of backend
    pub fn description(&self) -> &'static str {
        match self {
            Self::Default => "System default audio backend",

            #[cfg(feature = "jack")]
            Self::Jack => "Professional audio routing (cross-application, low-latency)",
        }
    }

    /// Convert backend to CPAL host
    pub fn to_cpal_host(&self) -> Result<cpal::Host, BackendError> {
        match self {
            Self::Default => Ok(cpal::default_host()),

            #[cfg(feature = "jack")]
            Self::Jack => {
                let host_id = cpal::available_hosts()
                    .into_iter()
                    .find(|id| matches!(id, cpal::HostId::Jack))
                    .ok_or_else(|| BackendError::BackendUnavailable(self.name()))?;

                cpal::host_from_id(host_id)
                    .map_err(|_| BackendError::BackendUnavailable(self.name()))
            }
        }
    }

    /// Check if backend is available on current system
    pub fn is_available(&self) -> bool {
        self.to_cpal_host().is_ok()
    }

    /// Count output devices, 0 when the backend cannot be opened
    pub fn output_device_count(&self) -> usize {
        self.to_cpal_host()
            .ok()
            .and_then(|host| host.output_devices().ok())
            .map(|devices| devices.count())
            .unwrap_or(0)
    }
}

impl FromStr for AudioBackend {
    type Err = BackendError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "default" => Ok(Self::Default),
            #[cfg(feature = "jack")]
            "jack" => Ok(Self::Jack),
            _ => Err(BackendError::UnknownBackend(s.to_string())),
        }
    }
}

/// List all available audio backends on current platform
pub fn list_available_backends() -> Vec<AudioBackend> {
    #[allow(unused_mut)]
    let mut backends = vec![AudioBackend::Default];

    #[cfg(feature = "jack")]
    {
        if AudioBackend::Jack.is_available() {
            backends.push(AudioBackend::Jack);
        }
    }

    backends
}

/// Backend-related errors
#[derive(Debug, Error)]
pub enum BackendError {
    /// Backend not available on this system
    #[error("Audio backend '{0}' is not available on this system")]
    BackendUnavailable(&'static str),

    /// Backend name not recognised
    #[error("Unknown audio backend '{0}'")]
    UnknownBackend(String),
}
