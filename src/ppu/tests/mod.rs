//! PPU test suite
//!
//! Split by concern: register behavior, memory mirroring, frame timing
//! and the rendering pipeline.

mod registers;
mod rendering;
mod timing;

use std::cell::RefCell;
use std::rc::Rc;

use super::*;
use crate::cartridge::{test_rom, Cartridge};

/// A PPU wired to a small NROM cartridge (1 PRG chunk, 1 CHR chunk whose
/// bytes are all 0x80). `vertical` picks the header mirroring bit.
pub(super) fn ppu_with_cartridge(vertical: bool) -> Ppu {
    let image = test_rom::build(0, 1, 1, if vertical { 0x01 } else { 0x00 });
    let cartridge = Rc::new(RefCell::new(
        Cartridge::from_ines_bytes(&image, None).expect("test image is valid"),
    ));

    let mut ppu = Ppu::new();
    ppu.connect_cartridge(cartridge);
    ppu
}
