// emu - NES emulator CLI
//
// Usage: emu <rom.nes> [--mute] [--scale N]
//
// Exit codes: 0 clean shutdown, 1 load/host error, 2 unsupported mapper.

use std::env;
use std::process;

use nes_emu::cartridge::INesError;
use nes_emu::display::{self, HostOptions};
use nes_emu::emulator::{Emulator, EmulatorConfig};

fn usage() -> ! {
    eprintln!("usage: emu <rom.nes> [--mute] [--scale N]");
    process::exit(1);
}

fn main() {
    env_logger::init();

    let mut rom_path: Option<String> = None;
    let mut mute = false;
    let mut scale_override: Option<u32> = None;

    let mut args = env::args().skip(1);
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--mute" => mute = true,
            "--scale" => match args.next().and_then(|v| v.parse().ok()) {
                Some(value) => scale_override = Some(value),
                None => usage(),
            },
            _ if rom_path.is_none() => rom_path = Some(arg),
            _ => usage(),
        }
    }

    let Some(rom_path) = rom_path else {
        usage();
    };

    let config = EmulatorConfig::load_or_default();
    let scale = scale_override.unwrap_or(config.scale).clamp(1, 8);

    let mut emulator = Emulator::new();
    if let Err(err) = emulator.load_rom(&rom_path) {
        eprintln!("emu: {}", err);
        let code = match err {
            INesError::Mapper(_) => 2,
            _ => 1,
        };
        process::exit(code);
    }

    emulator.set_sample_rate(config.sample_rate);

    // Audio runs through a ring buffer drained by the cpal stream; if no
    // device is available we keep going silently
    #[cfg(feature = "audio")]
    let _audio = if config.audio_enabled && !mute {
        start_audio(&mut emulator, &config)
    } else {
        None
    };
    #[cfg(not(feature = "audio"))]
    let _ = mute;

    let title = format!("emu - {}", rom_path);
    if let Err(err) = display::run(emulator, HostOptions {
        title,
        scale,
        vsync: config.vsync,
    }) {
        eprintln!("emu: {}", err);
        process::exit(1);
    }
}

#[cfg(feature = "audio")]
fn start_audio(
    emulator: &mut Emulator,
    config: &EmulatorConfig,
) -> Option<nes_emu::audio::AudioOutput> {
    use std::sync::{Arc, Mutex};

    use nes_emu::audio::{AudioOutput, SampleBuffer};

    // ~100ms of cushion between the emulation loop and the callback
    let capacity = config.sample_rate as usize / 10;
    let buffer = Arc::new(Mutex::new(SampleBuffer::new(capacity)));

    match AudioOutput::new(config.sample_rate, buffer.clone()) {
        Ok(output) => {
            let volume = config.volume.clamp(0.0, 1.0);
            emulator.set_audio_sink(Box::new(move |sample| {
                buffer.lock().expect("audio buffer lock").push(sample * volume);
            }));
            Some(output)
        }
        Err(err) => {
            log::warn!("audio disabled: {}", err);
            None
        }
    }
}
