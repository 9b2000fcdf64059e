// Tone channels: two pulse generators and the noise generator

mod noise;
mod pulse;

pub use noise::NoiseChannel;
pub use pulse::PulseChannel;
