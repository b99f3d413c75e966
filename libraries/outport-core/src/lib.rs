//! Outport Core
//!
//! Lifecycle handle and native-client traits for audio output.
//!
//! This crate holds no audio engine of its own. A [`ClientHandle`] owns one
//! native client, obtained from a [`ClientFactory`], and forwards the five
//! lifecycle operations to it:
//!
//! - **start**: acquire a fresh native client
//! - **activate**: begin streaming, returning the negotiated [`StreamInfo`]
//! - **buffer exchange**: [`ClientHandle::current_output_buffer`] and
//!   [`ClientHandle::send_and_get_output_buffer`]
//! - **deactivate**: stop streaming, keep the resource
//! - **stop**: release the resource
//!
//! Out-of-order calls are rejected with [`ClientError`] rather than forwarded.
//!
//! # Example
//!
//! ```rust
//! use outport_core::{ClientHandle, NativeClient, OutputBuffer, Result, StreamInfo};
//!
//! struct Silent {
//!     buffer: OutputBuffer,
//! }
//!
//! impl NativeClient for Silent {
//!     fn activate(&mut self) -> Result<StreamInfo> {
//!         Ok(StreamInfo::new(48_000, 2, 256))
//!     }
//!     fn current_output_buffer(&mut self) -> Result<&mut OutputBuffer> {
//!         Ok(&mut self.buffer)
//!     }
//!     fn send_and_get_output_buffer(&mut self) -> Result<&mut OutputBuffer> {
//!         Ok(&mut self.buffer)
//!     }
//!     fn deactivate(&mut self) -> Result<()> {
//!         Ok(())
//!     }
//!     fn dispose(self) -> Result<()> {
//!         Ok(())
//!     }
//! }
//!
//! # fn main() -> Result<()> {
//! let mut handle = ClientHandle::new(|| -> Result<Silent> {
//!     Ok(Silent {
//!         buffer: OutputBuffer::new(2, 256),
//!     })
//! });
//!
//! handle.start()?;
//! let info = handle.activate()?;
//! assert_eq!(info.sample_rate, 48_000);
//!
//! handle.current_output_buffer()?.fill(0.25);
//! handle.send_and_get_output_buffer()?;
//!
//! handle.stop()?;
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]

pub mod error;
pub mod handle;
pub mod traits;
pub mod types;

pub use error::{ClientError, Result};
pub use handle::ClientHandle;
pub use traits::{ClientFactory, NativeClient};
pub use types::{LifecycleState, OutputBuffer, StreamInfo};
