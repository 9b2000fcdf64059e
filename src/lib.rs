// NES emulator core library
//
// Cycle-stepped emulation of the 2A03 CPU, the 2C02 PPU, the APU's pulse
// and noise channels, the shared bus with OAM DMA, and the common
// cartridge mappers. The `display` and `audio` modules are the thin host
// wrapper the `emu` binary uses.

pub mod apu;
pub mod audio;
pub mod bus;
pub mod cartridge;
pub mod cpu;
pub mod display;
pub mod emulator;
pub mod input;
pub mod ppu;

pub use apu::Apu;
pub use bus::Bus;
pub use cartridge::{Cartridge, INesError, INesHeader, MapResult, Mapper, Mirroring};
pub use cpu::Cpu;
pub use display::FrameBuffer;
pub use emulator::{Emulator, EmulatorConfig};
pub use input::{Controller, ControllerIO};
pub use ppu::Ppu;
