// cpal output stream
//
// Opens the default output device as mono f32 at the requested rate and
// feeds it from the shared sample buffer.

use std::sync::{Arc, Mutex};

use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::{SampleRate, Stream, StreamConfig};

use super::SampleBuffer;

/// Running audio output; dropping it stops the stream
pub struct AudioOutput {
    _stream: Stream,
}

impl AudioOutput {
    /// Open the default output device and start draining `buffer`
    pub fn new(sample_rate: u32, buffer: Arc<Mutex<SampleBuffer>>) -> Result<Self, String> {
        let host = cpal::default_host();
        let device = host
            .default_output_device()
            .ok_or("no audio output device available")?;

        log::info!(
            "audio device: {}",
            device.name().unwrap_or_else(|_| "unknown".into())
        );

        let config = StreamConfig {
            channels: 1,
            sample_rate: SampleRate(sample_rate),
            buffer_size: cpal::BufferSize::Default,
        };

        let stream = device
            .build_output_stream(
                &config,
                move |data: &mut [f32], _| {
                    let mut buffer = buffer.lock().expect("audio buffer lock");
                    for slot in data.iter_mut() {
                        *slot = buffer.pop();
                    }
                },
                |err| log::warn!("audio stream error: {}", err),
                None,
            )
            .map_err(|err| format!("could not open audio stream: {}", err))?;

        stream
            .play()
            .map_err(|err| format!("could not start audio stream: {}", err))?;

        Ok(AudioOutput { _stream: stream })
    }
}
