//! Sine test tone

use outport_core::OutputBuffer;
use std::f32::consts::TAU;

/// Phase-continuous sine generator writing the same signal to every channel
#[derive(Debug, Clone)]
pub struct SineTone {
    step: f32,
    amplitude: f32,
    phase: f32,
}

impl SineTone {
    pub fn new(frequency: f32, amplitude: f32, sample_rate: u32) -> Self {
        let step = if sample_rate == 0 {
            0.0
        } else {
            TAU * frequency / sample_rate as f32
        };

        Self {
            step,
            amplitude,
            phase: 0.0,
        }
    }

    /// Overwrite `buffer` with the next chunk of the tone
    pub fn fill(&mut self, buffer: &mut OutputBuffer) {
        let start = self.phase;
        let step = self.step;
        let amplitude = self.amplitude;

        for channel in buffer.channels_mut() {
            let mut phase = start;
            for sample in channel.iter_mut() {
                *sample = phase.sin() * amplitude;
                phase = (phase + step) % TAU;
            }
        }

        self.phase = (start + step * buffer.frames() as f32) % TAU;
    }
}
