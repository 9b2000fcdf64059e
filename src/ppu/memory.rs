// PPU address-space access: pattern tables, nametables, palette RAM
//
// The PPU bus is 14 bits. Pattern tables ($0000-$1FFF) belong to the
// cartridge; nametables ($2000-$3EFF) are the 2KB of internal VRAM folded
// through the cartridge's mirroring mode; $3F00-$3FFF is the 32-byte
// palette with its sprite-backdrop aliasing.

use super::constants::NAMETABLE_SIZE;
use super::Ppu;
use crate::cartridge::Mirroring;

impl Ppu {
    /// Current mirroring mode, as the cartridge reports it
    fn mirroring(&self) -> Mirroring {
        self.cartridge
            .as_ref()
            .map(|cartridge| cartridge.borrow().mirroring())
            .unwrap_or(Mirroring::Horizontal)
    }

    /// Fold a nametable address ($2000-$2FFF) into the 2KB of VRAM
    ///
    /// | Mode          | $2000 | $2400 | $2800 | $2C00 |
    /// |---------------|-------|-------|-------|-------|
    /// | Horizontal    | 0     | 0     | 1     | 1     |
    /// | Vertical      | 0     | 1     | 0     | 1     |
    /// | OneScreenLow  | 0     | 0     | 0     | 0     |
    /// | OneScreenHigh | 1     | 1     | 1     | 1     |
    pub(super) fn mirror_nametable_addr(&self, addr: u16) -> usize {
        let addr = (addr & 0x0FFF) as usize;
        let table = addr / NAMETABLE_SIZE;
        let offset = addr % NAMETABLE_SIZE;

        let bank = match self.mirroring() {
            Mirroring::Horizontal | Mirroring::HardwareHeader => table / 2,
            Mirroring::Vertical => table % 2,
            Mirroring::OneScreenLow => 0,
            Mirroring::OneScreenHigh => 1,
        };

        bank * NAMETABLE_SIZE + offset
    }

    /// Fold a palette address to its RAM index, applying the aliasing of
    /// $3F10/$3F14/$3F18/$3F1C onto $3F00/$3F04/$3F08/$3F0C
    pub(super) fn mirror_palette_addr(&self, addr: u16) -> usize {
        let addr = (addr & 0x001F) as usize;
        if addr >= 0x10 && addr % 4 == 0 {
            addr - 0x10
        } else {
            addr
        }
    }

    /// Read a byte from the PPU's own address space
    pub(crate) fn read_ppu_memory(&self, addr: u16) -> u8 {
        let addr = addr & 0x3FFF;

        match addr {
            0x0000..=0x1FFF => self
                .cartridge
                .as_ref()
                .and_then(|cartridge| cartridge.borrow().ppu_read(addr))
                .unwrap_or(0),

            0x2000..=0x3EFF => {
                let index = self.mirror_nametable_addr(addr);
                self.nametables[index]
            }

            _ => {
                let index = self.mirror_palette_addr(addr);
                self.palette_ram[index]
            }
        }
    }

    /// Write a byte into the PPU's own address space
    pub(crate) fn write_ppu_memory(&mut self, addr: u16, data: u8) {
        let addr = addr & 0x3FFF;

        match addr {
            0x0000..=0x1FFF => {
                if let Some(cartridge) = &self.cartridge {
                    cartridge.borrow_mut().ppu_write(addr, data);
                }
            }

            0x2000..=0x3EFF => {
                let index = self.mirror_nametable_addr(addr);
                self.nametables[index] = data;
            }

            _ => {
                let index = self.mirror_palette_addr(addr);
                self.palette_ram[index] = data;
            }
        }
    }
}
