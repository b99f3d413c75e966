//! cpal native client for Outport
//!
//! This crate provides [`CpalClient`], an implementation of
//! [`outport_core::NativeClient`] for cross-platform desktop audio output, and
//! [`CpalClientFactory`] to plug it into an [`outport_core::ClientHandle`].
//!
//! # Features
//!
//! - Output to the default device or a named one
//! - JACK backend behind the `jack` feature
//! - A fixed ring of planar `f32` buffers between caller and audio callback
//! - Underrun counting
//!
//! # Example
//!
//! ```no_run
//! use outport_core::ClientHandle;
//! use outport_cpal::{ClientConfig, CpalClientFactory};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let mut handle = ClientHandle::new(CpalClientFactory::new(ClientConfig::default()));
//!
//! handle.start()?;
//! let info = handle.activate()?;
//!
//! // One second of silence
//! for _ in 0..(info.sample_rate as usize / info.chunk_frames) {
//!     handle.current_output_buffer()?.fill(0.0);
//!     handle.send_and_get_output_buffer()?;
//! }
//!
//! handle.stop()?;
//! # Ok(())
//! # }
//! ```

#![deny(unsafe_code)]

pub mod backend;
mod client;
mod config;
pub mod device;
mod error;
mod render;
mod ring;

pub use backend::{list_available_backends, AudioBackend, BackendError};
pub use client::{CpalClient, CpalClientFactory};
pub use config::ClientConfig;
pub use device::{AudioDeviceInfo, DeviceError};
pub use error::{CpalClientError, Result};
