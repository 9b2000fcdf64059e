// Bounded sample ring buffer between the emulation loop and the audio
// callback. Overruns drop the oldest samples (a skip beats unbounded
// latency); underruns hand the device silence.

use std::collections::VecDeque;

/// Shared FIFO of mixed f32 samples
pub struct SampleBuffer {
    samples: VecDeque<f32>,
    capacity: usize,
}

impl SampleBuffer {
    /// `capacity` in samples; roughly 100ms at the output rate is a
    /// comfortable cushion
    pub fn new(capacity: usize) -> Self {
        SampleBuffer {
            samples: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    pub fn push(&mut self, sample: f32) {
        if self.samples.len() == self.capacity {
            self.samples.pop_front();
        }
        self.samples.push_back(sample);
    }

    /// Next sample, or silence when the producer fell behind
    pub fn pop(&mut self) -> f32 {
        self.samples.pop_front().unwrap_or(0.0)
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }
}
