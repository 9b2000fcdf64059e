// Shared channel building blocks: the timer/sequencer, envelope
// generator, sweep unit, length counter and the frame sequencer that
// clocks them all.

mod envelope;
mod frame_counter;
mod length_counter;
mod sequencer;
mod sweep;

pub use envelope::Envelope;
pub use frame_counter::{FrameClock, FrameCounter};
pub use length_counter::{LengthCounter, LENGTH_TABLE};
pub use sequencer::Sequencer;
pub use sweep::Sweep;
