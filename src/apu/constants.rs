// APU lookup tables and mixer constants

/// Pulse duty sequences, one bit per step, rotated right by the channel
/// sequencer. Index = register bits 6-7.
pub const DUTY_SEQUENCES: [u8; 4] = [
    0b0100_0000, // 12.5%
    0b0110_0000, // 25%
    0b0111_1000, // 50%
    0b1001_1111, // 75% (25% inverted)
];

/// Noise channel timer periods, indexed by the low nibble of $400E
pub const NOISE_PERIOD_TABLE: [u16; 16] = [
    4, 8, 16, 32, 64, 96, 128, 160, 202, 254, 380, 508, 1016, 2034, 4068, 0,
];

/// Linear-approximation mixer gains
pub const PULSE_MIX_GAIN: f32 = 0.00752;
pub const NOISE_MIX_GAIN: f32 = 0.00494;
