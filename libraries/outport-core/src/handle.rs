//! Lifecycle handle over a native audio client
//!
//! The handle owns at most one native client at a time. It adds no locking
//! and no buffering: every call goes straight to the client, after the
//! lifecycle check for that call passes. Any thread-safety the client offers
//! is inherited unchanged.

use crate::error::{ClientError, Result};
use crate::traits::{ClientFactory, NativeClient};
use crate::types::{LifecycleState, OutputBuffer, StreamInfo};

/// Owning handle for one native audio client
///
/// ```text
/// Idle ──start──▶ Started ──activate──▶ Active
///                    ▲                    │
///                    └────deactivate──────┘
///
/// Started | Active ──stop──▶ Released ──start──▶ Started
/// ```
///
/// Calls outside their legal state fail with
/// [`ClientError::InvalidStateTransition`], or with
/// [`ClientError::AlreadyReleased`] once the client has been stopped.
/// Dropping a handle that still holds a client releases it.
pub struct ClientHandle<F: ClientFactory> {
    factory: F,
    client: Option<F::Client>,
    state: LifecycleState,
}

impl<F: ClientFactory> ClientHandle<F> {
    /// Create an empty handle; no native resource is acquired until `start`
    pub fn new(factory: F) -> Self {
        Self {
            factory,
            client: None,
            state: LifecycleState::Idle,
        }
    }

    /// Current lifecycle state
    pub fn state(&self) -> LifecycleState {
        self.state
    }

    /// True while a native client is held
    pub fn is_started(&self) -> bool {
        self.state.holds_client()
    }

    /// True while the native client is streaming
    pub fn is_active(&self) -> bool {
        self.state == LifecycleState::Active
    }

    /// The held native client, if any
    pub fn client(&self) -> Option<&F::Client> {
        self.client.as_ref()
    }

    /// Mutable access to the held native client, for client-specific calls
    ///
    /// Lifecycle changes still go through the handle; the client cannot be
    /// disposed through this borrow.
    pub fn client_mut(&mut self) -> Option<&mut F::Client> {
        self.client.as_mut()
    }

    /// Acquire a new native client
    ///
    /// Legal from `Idle` and `Released`. On failure the handle stays empty.
    pub fn start(&mut self) -> Result<()> {
        if self.state.holds_client() {
            return Err(ClientError::InvalidStateTransition {
                operation: "start",
                state: self.state,
            });
        }

        match self.factory.create() {
            Ok(client) => {
                self.client = Some(client);
                self.state = LifecycleState::Started;
                tracing::info!("Audio client started");
                Ok(())
            }
            Err(e) => {
                tracing::warn!("Failed to start audio client: {}", e);
                Err(e)
            }
        }
    }

    /// Start streaming and return the client's stream parameters unchanged
    pub fn activate(&mut self) -> Result<StreamInfo> {
        self.require("activate", LifecycleState::Started)?;

        let info = self.held_client("activate")?.activate()?;
        self.state = LifecycleState::Active;

        tracing::info!(
            "Audio client active: rate={}, ch={}, chunk={}",
            info.sample_rate,
            info.channels,
            info.chunk_frames,
        );

        Ok(info)
    }

    /// Buffer the caller should fill next
    pub fn current_output_buffer(&mut self) -> Result<&mut OutputBuffer> {
        self.require("get the output buffer", LifecycleState::Active)?;
        self.held_client("get the output buffer")?
            .current_output_buffer()
    }

    /// Submit the current buffer and return the next one
    pub fn send_and_get_output_buffer(&mut self) -> Result<&mut OutputBuffer> {
        self.require("exchange output buffers", LifecycleState::Active)?;
        let buffer = self
            .held_client("exchange output buffers")?
            .send_and_get_output_buffer()?;
        tracing::trace!("Exchanged output buffer, next sequence {}", buffer.sequence());
        Ok(buffer)
    }

    /// Stop streaming without releasing the native client
    pub fn deactivate(&mut self) -> Result<()> {
        self.require("deactivate", LifecycleState::Active)?;

        self.held_client("deactivate")?.deactivate()?;
        self.state = LifecycleState::Started;

        tracing::info!("Audio client deactivated");
        Ok(())
    }

    /// Release the native client
    ///
    /// An active client is deactivated first. The handle is empty afterwards
    /// even if the client reports an error while being disposed.
    pub fn stop(&mut self) -> Result<()> {
        match self.state {
            LifecycleState::Started | LifecycleState::Active => {}
            LifecycleState::Released => {
                return Err(ClientError::AlreadyReleased { operation: "stop" });
            }
            LifecycleState::Idle => {
                return Err(ClientError::InvalidStateTransition {
                    operation: "stop",
                    state: self.state,
                });
            }
        }

        let was_active = self.state == LifecycleState::Active;
        let client = self.client.take();
        self.state = LifecycleState::Released;

        let Some(mut client) = client else {
            return Err(ClientError::AlreadyReleased { operation: "stop" });
        };

        if was_active {
            if let Err(e) = client.deactivate() {
                tracing::warn!("Failed to deactivate audio client before stop: {}", e);
            }
        }

        client.dispose()?;
        tracing::info!("Audio client stopped");
        Ok(())
    }

    fn require(&self, operation: &'static str, expected: LifecycleState) -> Result<()> {
        match self.state {
            state if state == expected => Ok(()),
            LifecycleState::Released => Err(ClientError::AlreadyReleased { operation }),
            state => Err(ClientError::InvalidStateTransition { operation, state }),
        }
    }

    fn held_client(&mut self, operation: &'static str) -> Result<&mut F::Client> {
        let state = self.state;
        self.client
            .as_mut()
            .ok_or(ClientError::InvalidStateTransition { operation, state })
    }
}

impl<F: ClientFactory> Drop for ClientHandle<F> {
    fn drop(&mut self) {
        let Some(mut client) = self.client.take() else {
            return;
        };

        if self.state == LifecycleState::Active {
            if let Err(e) = client.deactivate() {
                tracing::warn!("Failed to deactivate audio client on drop: {}", e);
            }
        }

        if let Err(e) = client.dispose() {
            tracing::warn!("Failed to release audio client on drop: {}", e);
        }
        self.state = LifecycleState::Released;
    }
}

impl<F: ClientFactory> std::fmt::Debug for ClientHandle<F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientHandle")
            .field("state", &self.state)
            .finish_non_exhaustive()
    }
}
