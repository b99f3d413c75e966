//! Core types for Outport
mod buffer;
mod state;
mod stream;

pub use buffer::OutputBuffer;
pub use state::LifecycleState;
pub use stream::StreamInfo;
