// Audio module - host-side sample delivery
//
// The core pushes mixed samples into a mutex-guarded ring buffer; the
// cpal output stream drains it from the audio callback. Everything here
// is host plumbing and sits behind the `audio` cargo feature, except the
// buffer itself which the tests exercise directly.

mod buffer;
#[cfg(feature = "audio")]
mod output;

pub use buffer::SampleBuffer;
#[cfg(feature = "audio")]
pub use output::AudioOutput;
