//! Noise channel
//!
//! A 15-bit linear-feedback shift register stepped by the channel timer.
//! Feedback XORs bit 0 with bit 1 (mode 0) or bit 6 (mode 1, the "tonal"
//! short sequence). Output sign comes from the inverted low bit, scaled
//! by the envelope.

use crate::apu::components::{Envelope, LengthCounter, Sequencer};
use crate::apu::constants::NOISE_PERIOD_TABLE;

/// The noise channel
pub struct NoiseChannel {
    pub sequencer: Sequencer,
    pub envelope: Envelope,
    pub length_counter: LengthCounter,
    pub enabled: bool,
    /// Short-sequence mode ($400E bit 7)
    pub mode: bool,
}

impl NoiseChannel {
    pub fn new() -> Self {
        let mut sequencer = Sequencer::new();
        sequencer.sequence = 0x7FFF;

        NoiseChannel {
            sequencer,
            envelope: Envelope::new(),
            length_counter: LengthCounter::new(),
            enabled: false,
            mode: false,
        }
    }

    /// $400C: envelope control
    pub fn write_control(&mut self, data: u8) {
        self.envelope.write_control(data);
    }

    /// $400E: mode bit + period table index
    pub fn write_mode_period(&mut self, data: u8) {
        self.mode = data & 0x80 != 0;
        self.sequencer.reload = NOISE_PERIOD_TABLE[(data & 0x0F) as usize];
    }

    /// $400F: length load + envelope restart
    pub fn write_length(&mut self, data: u8) {
        if self.enabled {
            self.length_counter.load(data);
        }
        self.envelope.start();
    }

    /// Channel tick: step the LFSR on timer underflow
    pub fn clock(&mut self) {
        let mode = self.mode;
        self.sequencer.clock(self.enabled, |lfsr| {
            let bit0 = lfsr & 0x01;
            let tap = if mode { (lfsr >> 6) & 0x01 } else { (lfsr >> 1) & 0x01 };
            ((bit0 ^ tap) << 14) | (lfsr >> 1)
        });
    }

    pub fn quarter_frame_clock(&mut self) {
        self.envelope.clock();
    }

    pub fn half_frame_clock(&mut self) {
        self.length_counter
            .clock(self.enabled, self.envelope.loop_flag);
    }

    /// Signed output: +envelope when the LFSR low bit is clear,
    /// -envelope when set, zero when gated
    pub fn output(&self) -> f32 {
        if !self.enabled || !self.length_counter.is_active() {
            return 0.0;
        }

        let sign = if self.sequencer.sequence & 0x01 == 0 {
            1.0
        } else {
            -1.0
        };
        sign * self.envelope.output() as f32
    }
}

impl Default for NoiseChannel {
    fn default() -> Self {
        Self::new()
    }
}
