/// Stream parameters negotiated on activation
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Parameters reported by a native client when it starts streaming
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StreamInfo {
    /// Actual sample rate in Hz
    pub sample_rate: u32,

    /// Number of output channels
    pub channels: u16,

    /// Frames per output buffer
    pub chunk_frames: usize,
}

impl StreamInfo {
    /// Create stream info
    pub fn new(sample_rate: u32, channels: u16, chunk_frames: usize) -> Self {
        Self {
            sample_rate,
            channels,
            chunk_frames,
        }
    }

    /// Playback time covered by one output buffer
    pub fn chunk_duration(&self) -> Duration {
        if self.sample_rate == 0 {
            return Duration::ZERO;
        }
        Duration::from_secs_f64(self.chunk_frames as f64 / f64::from(self.sample_rate))
    }
}
