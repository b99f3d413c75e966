/// Native client traits
use crate::error::Result;
use crate::types::{OutputBuffer, StreamInfo};

/// A native audio output client
///
/// Implementers own the actual device, stream and buffer ring. The
/// [`ClientHandle`](crate::ClientHandle) only forwards to these methods and
/// guarantees they are called in lifecycle order.
pub trait NativeClient: Send {
    /// Start streaming
    ///
    /// Returns the negotiated stream parameters.
    fn activate(&mut self) -> Result<StreamInfo>;

    /// Buffer the caller should fill next
    ///
    /// Repeated calls without an exchange return the same buffer.
    fn current_output_buffer(&mut self) -> Result<&mut OutputBuffer>;

    /// Submit the current buffer for playback and return the next one
    fn send_and_get_output_buffer(&mut self) -> Result<&mut OutputBuffer>;

    /// Stop streaming without releasing the resource
    fn deactivate(&mut self) -> Result<()>;

    /// Release the resource
    fn dispose(self) -> Result<()>;
}

/// Constructs native clients for [`ClientHandle::start`](crate::ClientHandle::start)
pub trait ClientFactory {
    /// Client type produced by this factory
    type Client: NativeClient;

    /// Acquire a new native client
    fn create(&mut self) -> Result<Self::Client>;
}

impl<C, F> ClientFactory for F
where
    C: NativeClient,
    F: FnMut() -> Result<C>,
{
    type Client = C;

    fn create(&mut self) -> Result<C> {
        self()
    }
}
