//! Caller side of the buffer ring
//!
//! A fixed set of [`OutputBuffer`]s circulates between two bounded channels:
//! `free` (ready for the caller) and `filled` (queued for the callback). The
//! caller holds at most one buffer at a time. Every buffer taken from the
//! free side is cleared and gets the next sequence number.

use crossbeam_channel::{bounded, Receiver, RecvTimeoutError, Sender};
use outport_core::OutputBuffer;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use crate::error::{CpalClientError, Result};
use crate::render::Renderer;

/// Create a ring of `size` buffers of `channels × frames`
pub(crate) fn buffer_ring(
    channels: usize,
    frames: usize,
    size: usize,
    timeout: Duration,
) -> (BufferRing, RingEnds) {
    let (free_tx, free_rx) = bounded(size);
    let (filled_tx, filled_rx) = bounded(size);
    for _ in 0..size {
        // Capacity is exactly `size`
        let _ = free_tx.try_send(OutputBuffer::new(channels, frames));
    }

    let underruns = Arc::new(AtomicU64::new(0));
    let draining = Arc::new(AtomicBool::new(false));

    let ring = BufferRing {
        filled_tx,
        free_tx: free_tx.clone(),
        free_rx,
        current: None,
        next_sequence: 0,
        size,
        timeout,
        underruns: Arc::clone(&underruns),
        draining: Arc::clone(&draining),
    };
    let ends = RingEnds {
        filled_rx,
        free_tx,
        channels,
        underruns,
        draining,
    };

    (ring, ends)
}

/// Buffers as seen by the caller
pub(crate) struct BufferRing {
    filled_tx: Sender<OutputBuffer>,
    free_tx: Sender<OutputBuffer>,
    free_rx: Receiver<OutputBuffer>,
    current: Option<OutputBuffer>,
    next_sequence: u64,
    size: usize,
    timeout: Duration,
    underruns: Arc<AtomicU64>,
    draining: Arc<AtomicBool>,
}

impl BufferRing {
    /// The held buffer, taking a free one first if none is held
    pub(crate) fn current(&mut self) -> Result<&mut OutputBuffer> {
        let buffer = match self.current.take() {
            Some(buffer) => buffer,
            None => self.take_free()?,
        };
        Ok(self.current.insert(buffer))
    }

    /// Queue the held buffer (if any) and return the next one
    pub(crate) fn send_and_next(&mut self) -> Result<&mut OutputBuffer> {
        self.queue_current()?;
        self.current()
    }

    /// Queue the held buffer and wait until every buffer has been played
    ///
    /// Silence after the last queued buffer is not counted as an underrun.
    pub(crate) fn drain(&mut self) -> Result<()> {
        self.finish()?;
        self.wait_drained()
    }

    /// Callbacks that had to pad with silence
    pub(crate) fn underruns(&self) -> u64 {
        self.underruns.load(Ordering::Relaxed)
    }

    /// Queue the held buffer and mark the ring as draining
    fn finish(&mut self) -> Result<()> {
        self.queue_current()?;
        self.draining.store(true, Ordering::Release);
        Ok(())
    }

    /// Block until all buffers are back on the free side
    fn wait_drained(&mut self) -> Result<()> {
        let mut returned = Vec::with_capacity(self.size);
        let mut result = Ok(());
        for _ in 0..self.size {
            match self.recv_free() {
                Ok(buffer) => returned.push(buffer),
                Err(e) => {
                    result = Err(e);
                    break;
                }
            }
        }

        for buffer in returned {
            let _ = self.free_tx.try_send(buffer);
        }

        if result.is_ok() {
            tracing::debug!("Output ring drained ({} buffers)", self.size);
        }
        result
    }

    fn queue_current(&mut self) -> Result<()> {
        let Some(buffer) = self.current.take() else {
            return Ok(());
        };

        tracing::trace!("Queueing output buffer {}", buffer.sequence());
        self.draining.store(false, Ordering::Release);
        self.filled_tx
            .send(buffer)
            .map_err(|_| CpalClientError::AudioThreadGone)
    }

    fn take_free(&mut self) -> Result<OutputBuffer> {
        let mut buffer = self.recv_free()?;
        buffer.silence();
        self.next_sequence += 1;
        buffer.set_sequence(self.next_sequence);
        Ok(buffer)
    }

    fn recv_free(&self) -> Result<OutputBuffer> {
        match self.free_rx.recv_timeout(self.timeout) {
            Ok(buffer) => Ok(buffer),
            Err(RecvTimeoutError::Timeout) => {
                tracing::warn!(
                    "No free output buffer after {:?} (stream stalled?)",
                    self.timeout
                );
                Err(CpalClientError::BufferTimeout(self.timeout))
            }
            Err(RecvTimeoutError::Disconnected) => Err(CpalClientError::AudioThreadGone),
        }
    }
}

/// Ends of the ring handed to each new stream
pub(crate) struct RingEnds {
    filled_rx: Receiver<OutputBuffer>,
    free_tx: Sender<OutputBuffer>,
    channels: usize,
    underruns: Arc<AtomicU64>,
    draining: Arc<AtomicBool>,
}

impl RingEnds {
    pub(crate) fn renderer(&self) -> Renderer {
        Renderer::new(
            self.filled_rx.clone(),
            self.free_tx.clone(),
            self.channels,
            Arc::clone(&self.underruns),
            Arc::clone(&self.draining),
        )
    }
}
