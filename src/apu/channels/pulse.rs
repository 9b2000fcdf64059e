//! Pulse (square) channel
//!
//! The sequencer rotates an 8-bit duty pattern; the current bit, scaled
//! by the envelope, is the channel output. The sweep unit retunes the
//! timer on half-frame clocks, and both the timer floor and the sweep
//! target can mute the channel outright.

use crate::apu::components::{Envelope, LengthCounter, Sequencer, Sweep};
use crate::apu::constants::DUTY_SEQUENCES;

/// One of the two pulse channels
pub struct PulseChannel {
    pub sequencer: Sequencer,
    pub envelope: Envelope,
    pub sweep: Sweep,
    pub length_counter: LengthCounter,
    pub enabled: bool,
}

impl PulseChannel {
    /// `channel_one` selects the sweep's negate flavor
    pub fn new(channel_one: bool) -> Self {
        let mut sequencer = Sequencer::new();
        sequencer.sequence = DUTY_SEQUENCES[0] as u16;

        PulseChannel {
            sequencer,
            envelope: Envelope::new(),
            sweep: Sweep::new(channel_one),
            length_counter: LengthCounter::new(),
            enabled: false,
        }
    }

    /// $4000/$4004: duty + envelope control
    pub fn write_control(&mut self, data: u8) {
        self.sequencer.sequence = DUTY_SEQUENCES[(data >> 6) as usize] as u16;
        self.envelope.write_control(data);
    }

    /// $4001/$4005: sweep control
    pub fn write_sweep(&mut self, data: u8) {
        self.sweep.write_control(data);
    }

    /// $4002/$4006: timer low byte
    pub fn write_timer_low(&mut self, data: u8) {
        self.sequencer.set_reload_low(data);
    }

    /// $4003/$4007: timer high bits + length load + envelope restart
    pub fn write_timer_high(&mut self, data: u8) {
        self.sequencer.set_reload_high(data);
        if self.enabled {
            self.length_counter.load(data);
        }
        self.envelope.start();
    }

    /// Channel tick: rotate the duty sequence on timer underflow
    pub fn clock(&mut self) {
        self.sequencer
            .clock(self.enabled, |s| ((s & 0x01) << 7) | ((s & 0xFF) >> 1));
    }

    /// Quarter-frame: envelope decay
    pub fn quarter_frame_clock(&mut self) {
        self.envelope.clock();
    }

    /// Half-frame: sweep retune and length countdown
    pub fn half_frame_clock(&mut self) {
        if let Some(period) = self.sweep.clock(self.sequencer.reload) {
            self.sequencer.reload = period;
        }
        self.length_counter
            .clock(self.enabled, self.envelope.loop_flag);
    }

    /// Current output level (0-15)
    pub fn output(&self) -> u8 {
        if !self.enabled
            || !self.length_counter.is_active()
            || self.sequencer.reload < 8
            || self.sweep.is_muting(self.sequencer.reload)
        {
            return 0;
        }

        if self.sequencer.sequence & 0x01 != 0 {
            self.envelope.output()
        } else {
            0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn audible_pulse() -> PulseChannel {
        let mut pulse = PulseChannel::new(true);
        pulse.enabled = true;
        pulse.write_control(0xBF); // 50% duty, constant volume 15
        pulse.write_timer_low(0x40);
        pulse.write_timer_high(0x00); // period 0x040, length index 0 -> 10
        pulse
    }

    #[test]
    fn test_duty_rotation_produces_square_wave() {
        let mut pulse = audible_pulse();

        // Drive enough timer underflows to walk the whole 8-step duty
        // cycle and count the high steps of the 50% pattern
        let mut high_steps = 0;
        for _ in 0..8 {
            for _ in 0..=0x40 {
                pulse.clock();
            }
            if pulse.output() > 0 {
                high_steps += 1;
            }
        }
        assert_eq!(high_steps, 4, "50% duty is high for four of eight steps");
    }

    #[test]
    fn test_muted_below_timer_floor() {
        let mut pulse = audible_pulse();
        pulse.write_timer_low(0x07);
        pulse.write_timer_high(0x00);

        assert_eq!(pulse.output(), 0, "timer below 8 silences the channel");
    }

    #[test]
    fn test_silent_when_length_expires() {
        let mut pulse = audible_pulse();
        pulse.envelope.loop_flag = false;

        // Length index 0 loads 10; ten half-frames drain it
        for _ in 0..10 {
            pulse.half_frame_clock();
        }
        assert!(!pulse.length_counter.is_active());
        assert_eq!(pulse.output(), 0);
    }

    #[test]
    fn test_length_not_loaded_while_disabled() {
        let mut pulse = PulseChannel::new(true);
        pulse.write_timer_high(0x00);

        assert!(!pulse.length_counter.is_active());
    }
}
