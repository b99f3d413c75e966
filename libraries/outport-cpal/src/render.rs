//! Callback side of the buffer ring
//!
//! The caller fills planar [`OutputBuffer`]s and queues them; the renderer
//! runs inside the cpal data callback, interleaves queued buffers into the
//! device buffer and hands consumed ones back to the free ring. It never
//! blocks: only `try_recv`/`try_send` and atomics are used.
//!
//! Running dry counts as an underrun only while the caller is still expected
//! to queue audio. Once the caller has finished (the shared `draining` flag),
//! the trailing silence is not reported.

use crossbeam_channel::{Receiver, Sender};
use outport_core::OutputBuffer;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;

/// Drains queued output buffers into device callbacks
pub(crate) struct Renderer {
    filled_rx: Receiver<OutputBuffer>,
    free_tx: Sender<OutputBuffer>,
    current: Option<OutputBuffer>,
    position: usize,
    channels: usize,
    primed: bool,
    underruns: Arc<AtomicU64>,
    draining: Arc<AtomicBool>,
}

impl Renderer {
    pub(crate) fn new(
        filled_rx: Receiver<OutputBuffer>,
        free_tx: Sender<OutputBuffer>,
        channels: usize,
        underruns: Arc<AtomicU64>,
        draining: Arc<AtomicBool>,
    ) -> Self {
        Self {
            filled_rx,
            free_tx,
            current: None,
            position: 0,
            channels,
            primed: false,
            underruns,
            draining,
        }
    }

    /// Fill one interleaved device buffer
    ///
    /// Padding with silence after playback has started counts as one underrun,
    /// unless the caller has finished and the ring is draining.
    pub(crate) fn render(&mut self, data: &mut [f32]) {
        let mut written = 0;
        let mut starved = false;

        while written < data.len() {
            if self.current.is_none() {
                if let Ok(buffer) = self.filled_rx.try_recv() {
                    self.current = Some(buffer);
                    self.position = 0;
                    self.primed = true;
                } else {
                    starved = true;
                    break;
                }
            }

            let Some(buffer) = self.current.as_ref() else {
                break;
            };

            let frames = buffer.write_interleaved(self.position, &mut data[written..], self.channels);
            self.position += frames;
            written += frames * self.channels;

            if self.position >= buffer.frames() {
                self.recycle_current();
            } else if frames == 0 {
                // Less than one frame of room left in the device buffer
                break;
            }
        }

        if written < data.len() {
            data[written..].fill(0.0);
            if starved && self.primed && !self.draining.load(Ordering::Acquire) {
                self.underruns.fetch_add(1, Ordering::Relaxed);
            }
        }
    }

    fn recycle_current(&mut self) {
        if let Some(buffer) = self.current.take() {
            // The free ring has room for every buffer in circulation
            let _ = self.free_tx.try_send(buffer);
        }
        self.position = 0;
    }
}

impl Drop for Renderer {
    fn drop(&mut self) {
        // Return everything in flight so a later activation starts with a full ring
        self.recycle_current();
        while let Ok(buffer) = self.filled_rx.try_recv() {
            let _ = self.free_tx.try_send(buffer);
        }
    }
}
