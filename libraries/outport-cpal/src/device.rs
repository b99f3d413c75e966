// outport-cpal/src/device.rs
//
// Output device enumeration and lookup

use cpal::traits::{DeviceTrait, HostTrait};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::backend::{AudioBackend, BackendError};

/// Information about an audio output device
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AudioDeviceInfo {
    /// Device name (human-readable)
    pub name: String,

    /// Backend/host this device belongs to
    pub backend: AudioBackend,

    /// Is this the system default device for this backend?
    pub is_default: bool,

    /// Native sample rate (Hz)
    pub sample_rate: u32,

    /// Number of output channels
    pub channels: u16,
}

/// Enumerate all output devices for a specific backend
///
/// The default device comes first, the rest are sorted by name.
pub fn list_devices(backend: AudioBackend) -> Result<Vec<AudioDeviceInfo>, DeviceError> {
    let host = backend.to_cpal_host()?;

    let default_name = host.default_output_device().and_then(|d| d.name().ok());

    let devices = host
        .output_devices()
        .map_err(|e| DeviceError::EnumerationFailed(e.to_string()))?;

    let mut device_list: Vec<AudioDeviceInfo> = devices
        .filter_map(|device| {
            let name = device.name().ok()?;
            let config = device.default_output_config().ok()?;
            Some(AudioDeviceInfo {
                is_default: default_name.as_deref() == Some(name.as_str()),
                name,
                backend,
                sample_rate: config.sample_rate(),
                channels: config.channels(),
            })
        })
        .collect();

    sort_devices(&mut device_list);
    Ok(device_list)
}

/// Get information about the default output device for a backend
pub fn get_default_device(backend: AudioBackend) -> Result<AudioDeviceInfo, DeviceError> {
    let device = default_output_device(backend)?;

    let name = device
        .name()
        .map_err(|e| DeviceError::DeviceInfoFailed(e.to_string()))?;

    let config = device
        .default_output_config()
        .map_err(|e| DeviceError::DeviceInfoFailed(e.to_string()))?;

    Ok(AudioDeviceInfo {
        name,
        backend,
        is_default: true,
        sample_rate: config.sample_rate(),
        channels: config.channels(),
    })
}

/// The default output device of a backend
pub fn default_output_device(backend: AudioBackend) -> Result<cpal::Device, DeviceError> {
    backend
        .to_cpal_host()?
        .default_output_device()
        .ok_or(DeviceError::NoDeviceFound)
}

/// Find an output device by name within a backend
pub fn find_device_by_name(
    backend: AudioBackend,
    device_name: &str,
) -> Result<cpal::Device, DeviceError> {
    let host = backend.to_cpal_host()?;

    let mut devices = host
        .output_devices()
        .map_err(|e| DeviceError::EnumerationFailed(e.to_string()))?;

    devices
        .find(|device| device.name().map(|n| n == device_name).unwrap_or(false))
        .ok_or_else(|| DeviceError::DeviceNotFound(device_name.to_string()))
}

fn sort_devices(devices: &mut [AudioDeviceInfo]) {
    devices.sort_by(|a, b| b.is_default.cmp(&a.is_default).then_with(|| a.name.cmp(&b.name)));
}

/// Device-related errors
#[derive(Debug, Error)]
pub enum DeviceError {
    /// Backend not available
    #[error("Audio backend '{0}' is not available")]
    BackendUnavailable(&'static str),

    /// Failed to enumerate devices
    #[error("Failed to enumerate audio devices: {0}")]
    EnumerationFailed(String),

    /// No devices found
    #[error("No audio output devices found")]
    NoDeviceFound,

    /// Device with specified name not found
    #[error("Audio device '{0}' not found")]
    DeviceNotFound(String),

    /// Failed to get device information
    #[error("Failed to get device information: {0}")]
    DeviceInfoFailed(String),
}

impl From<BackendError> for DeviceError {
    fn from(err: BackendError) -> Self {
        match err {
            BackendError::BackendUnavailable(name) => DeviceError::BackendUnavailable(name),
            BackendError::UnknownBackend(_) => DeviceError::EnumerationFailed(err.to_string()),
        }
    }
}
