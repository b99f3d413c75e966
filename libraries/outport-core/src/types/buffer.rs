//! Output buffer exchanged between the caller and a native client

/// Planar `f32` audio chunk
///
/// Samples are stored channel after channel, each channel holding `frames`
/// samples. Native clients stamp a sequence number every time a buffer is
/// handed to the caller, so callers (and tests) can tell buffers apart.
#[derive(Debug, Clone, PartialEq)]
pub struct OutputBuffer {
    samples: Vec<f32>,
    channels: usize,
    frames: usize,
    sequence: u64,
}

impl OutputBuffer {
    /// Create a silent buffer
    pub fn new(channels: usize, frames: usize) -> Self {
        Self {
            samples: vec![0.0; channels * frames],
            channels,
            frames,
            sequence: 0,
        }
    }

    /// Number of channels
    pub fn channels(&self) -> usize {
        self.channels
    }

    /// Number of frames (samples per channel)
    pub fn frames(&self) -> usize {
        self.frames
    }

    /// Total number of samples across all channels
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// True when the buffer holds no samples
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Sequence number stamped by the native client
    pub fn sequence(&self) -> u64 {
        self.sequence
    }

    /// Stamp a new sequence number
    pub fn set_sequence(&mut self, sequence: u64) {
        self.sequence = sequence;
    }

    /// Samples of one channel
    ///
    /// # Panics
    /// Panics if `index >= channels()`
    pub fn channel(&self, index: usize) -> &[f32] {
        assert!(index < self.channels, "channel {index} out of range");
        &self.samples[index * self.frames..(index + 1) * self.frames]
    }

    /// Mutable samples of one channel
    ///
    /// # Panics
    /// Panics if `index >= channels()`
    pub fn channel_mut(&mut self, index: usize) -> &mut [f32] {
        assert!(index < self.channels, "channel {index} out of range");
        &mut self.samples[index * self.frames..(index + 1) * self.frames]
    }

    /// Iterate over mutable channel slices
    pub fn channels_mut(&mut self) -> impl Iterator<Item = &mut [f32]> {
        // chunks_mut(0) panics, and a zero-frame buffer has nothing to yield
        let frames = self.frames.max(1);
        self.samples.chunks_mut(frames)
    }

    /// Set every sample to `value`
    pub fn fill(&mut self, value: f32) {
        self.samples.fill(value);
    }

    /// Set every sample to zero
    pub fn silence(&mut self) {
        self.fill(0.0);
    }

    /// Copy frames starting at `start_frame` into an interleaved destination
    ///
    /// `dest` is interpreted as interleaved frames of `dest_channels` samples.
    /// Source channels beyond `dest_channels` are dropped, missing ones are
    /// written as silence. Returns the number of frames copied.
    pub fn write_interleaved(
        &self,
        start_frame: usize,
        dest: &mut [f32],
        dest_channels: usize,
    ) -> usize {
        if dest_channels == 0 || start_frame >= self.frames {
            return 0;
        }

        let available = self.frames - start_frame;
        let count = available.min(dest.len() / dest_channels);

        for (offset, frame) in dest.chunks_mut(dest_channels).take(count).enumerate() {
            let src_frame = start_frame + offset;
            for (ch, sample) in frame.iter_mut().enumerate() {
                *sample = if ch < self.channels {
                    self.samples[ch * self.frames + src_frame]
                } else {
                    0.0
                };
            }
        }

        count
    }
}
