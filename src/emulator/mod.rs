// Emulator module - the system: master clock and component wiring
//
// One `Emulator` owns the CPU, the bus (PPU, APU, controllers, DMA) and
// the cartridge. `clock` advances one master cycle in the fixed order
// APU, PPU, CPU-or-DMA (every third cycle), NMI delivery, IRQ delivery,
// audio accumulation; interrupts raised on a cycle are therefore taken
// before the next CPU instruction starts.

mod config;

pub use config::EmulatorConfig;

use std::cell::RefCell;
use std::path::Path;
use std::rc::Rc;

use crate::bus::Bus;
use crate::cartridge::{Cartridge, INesError};
use crate::cpu::Cpu;

/// NTSC master clock rate (PPU dot rate), in Hz
pub const MASTER_CLOCK_HZ: f64 = 5_369_318.0;

/// Audio sample rate used when the host does not configure one
pub const DEFAULT_SAMPLE_RATE: u32 = 44_100;

/// Callback receiving each mixed audio sample as it is produced
pub type AudioSink = Box<dyn FnMut(f32) + Send>;

/// The complete console
pub struct Emulator {
    cpu: Cpu,
    bus: Bus,
    cartridge: Option<Rc<RefCell<Cartridge>>>,

    master_cycles: u64,

    // Audio resampling: accumulate emulated time and emit one sample
    // every 1/sample_rate seconds
    audio_time: f64,
    sample_period: f64,
    audio_sample: f32,
    audio_sink: Option<AudioSink>,
}

impl Emulator {
    pub fn new() -> Self {
        Emulator {
            cpu: Cpu::new(),
            bus: Bus::new(),
            cartridge: None,
            master_cycles: 0,
            audio_time: 0.0,
            sample_period: 1.0 / DEFAULT_SAMPLE_RATE as f64,
            audio_sample: 0.0,
            audio_sink: None,
        }
    }

    // ========================================
    // Setup
    // ========================================

    /// Load an iNES file, wire the cartridge to the bus and PPU, and
    /// reset so PC comes from the cartridge's reset vector
    pub fn load_rom<P: AsRef<Path>>(&mut self, path: P) -> Result<(), INesError> {
        let cartridge = Cartridge::from_ines_file(path)?;
        self.insert_cartridge(cartridge);
        Ok(())
    }

    /// Load a cartridge from an in-memory iNES image (tests)
    pub fn load_rom_bytes(&mut self, bytes: &[u8]) -> Result<(), INesError> {
        let cartridge = Cartridge::from_ines_bytes(bytes, None)?;
        self.insert_cartridge(cartridge);
        Ok(())
    }

    fn insert_cartridge(&mut self, cartridge: Cartridge) {
        let cartridge = Rc::new(RefCell::new(cartridge));
        self.bus.connect_cartridge(cartridge.clone());
        self.cartridge = Some(cartridge);
        self.reset();
    }

    /// Press the reset button: CPU back to the reset vector, PPU and APU
    /// to power-on state
    pub fn reset(&mut self) {
        self.cpu.reset(&mut self.bus);
        self.bus.ppu.reset();
        self.bus.apu.reset();
        self.master_cycles = 0;
        self.audio_time = 0.0;
        self.audio_sample = 0.0;
    }

    /// Output sample rate for the audio resampler
    pub fn set_sample_rate(&mut self, sample_rate: u32) {
        self.sample_period = 1.0 / sample_rate.max(1) as f64;
    }

    /// Sink invoked from `clock` whenever a sample is ready
    pub fn set_audio_sink(&mut self, sink: AudioSink) {
        self.audio_sink = Some(sink);
    }

    /// Host-side controller update; sampled by the game at its next
    /// strobe write
    pub fn set_controller(&mut self, port: usize, byte: u8) {
        self.bus.controllers.set_state(port, byte);
    }

    // ========================================
    // Master clock
    // ========================================

    /// Advance one master cycle. Returns true when an audio sample was
    /// emitted this cycle.
    pub fn clock(&mut self) -> bool {
        self.bus.apu.clock();
        self.bus.ppu.clock();

        // The CPU runs at a third of the master rate; DMA steals its slot
        if self.master_cycles % 3 == 0 {
            if self.bus.dma_in_progress() {
                self.bus.dma_clock(self.master_cycles);
            } else {
                self.cpu.clock(&mut self.bus);
            }
        }

        // VBlank edge
        if self.bus.ppu.take_nmi() {
            self.cpu.nmi(&mut self.bus);
        }

        // Cartridge IRQ line (MMC3 scanline counter)
        if let Some(cartridge) = &self.cartridge {
            if cartridge.borrow().irq_state() && !self.cpu.get_interrupt_disable() {
                cartridge.borrow_mut().irq_clear();
                self.cpu.irq(&mut self.bus);
            }
        }

        // APU frame IRQ; level-held until the game reads $4015
        if self.bus.apu.irq_state() && !self.cpu.get_interrupt_disable() {
            self.cpu.irq(&mut self.bus);
        }

        // Audio resampling accumulator
        let mut sample_ready = false;
        self.audio_time += 1.0 / MASTER_CLOCK_HZ;
        if self.audio_time >= self.sample_period {
            self.audio_time -= self.sample_period;
            self.audio_sample = self.bus.apu.output();
            if let Some(sink) = &mut self.audio_sink {
                sink(self.audio_sample);
            }
            sample_ready = true;
        }

        self.master_cycles += 1;
        sample_ready
    }

    /// Execute one whole CPU instruction without advancing the PPU/APU.
    /// Debug and conformance harnesses drive the CPU this way; normal
    /// emulation goes through `clock`.
    pub fn step_instruction(&mut self) -> u8 {
        self.cpu.step(&mut self.bus)
    }

    /// Run until the PPU finishes the current frame
    pub fn run_frame(&mut self) {
        loop {
            self.clock();
            if self.bus.ppu.take_frame_complete() {
                break;
            }
        }
    }

    // ========================================
    // Accessors
    // ========================================

    /// The last rendered frame as NES palette indices
    pub fn frame(&self) -> &[u8] {
        self.bus.ppu.frame()
    }

    /// The most recent mixed audio sample
    pub fn audio_sample(&self) -> f32 {
        self.audio_sample
    }

    pub fn master_cycles(&self) -> u64 {
        self.master_cycles
    }

    pub fn cpu(&self) -> &Cpu {
        &self.cpu
    }

    pub fn cpu_mut(&mut self) -> &mut Cpu {
        &mut self.cpu
    }

    pub fn bus(&self) -> &Bus {
        &self.bus
    }

    pub fn bus_mut(&mut self) -> &mut Bus {
        &mut self.bus
    }
}

impl Default for Emulator {
    fn default() -> Self {
        Self::new()
    }
}
