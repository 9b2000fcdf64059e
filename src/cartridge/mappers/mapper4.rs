// Mapper 4 (MMC3) - 8KB PRG / 1KB CHR banking with a scanline IRQ
//
// Memory Layout:
// - CPU $6000-$7FFF: 8KB WRAM
// - CPU $8000-$9FFF: 8KB PRG bank (R6 or second-to-last, per PRG mode)
// - CPU $A000-$BFFF: 8KB PRG bank (always R7)
// - CPU $C000-$DFFF: 8KB PRG bank (second-to-last or R6, per PRG mode)
// - CPU $E000-$FFFF: 8KB PRG bank, fixed to the last bank
// - PPU: two 2KB banks (R0, R1) and four 1KB banks (R2-R5), with the
//   halves swapped when the CHR inversion bit is set
//
// Register Interface (address parity selects the register):
// - $8000 even: bank select (bits 0-2 target register, bit 6 PRG mode,
//   bit 7 CHR inversion); $8001 odd: bank data
// - $A000 even: mirroring (bit 0: 0 = vertical, 1 = horizontal)
// - $A001 odd: WRAM protect (not emulated; WRAM stays enabled)
// - $C000 even: IRQ latch (counter reload value); $C001 odd: request
//   counter reload on the next scanline clock
// - $E000 even: IRQ disable + acknowledge; $E001 odd: IRQ enable
//
// The PPU drives `scanline_tick` once per rendered scanline, which steps
// the IRQ counter.

use crate::cartridge::{MapResult, Mapper, Mirroring};

/// PRG bank granularity (8KB)
const PRG_BANK_SIZE: u32 = 8 * 1024;

/// CHR bank granularity (1KB)
const CHR_BANK_SIZE: u32 = 1024;

/// WRAM size (8KB)
const WRAM_SIZE: usize = 8 * 1024;

/// Mapper 4 implementation (MMC3)
///
/// Used by Super Mario Bros. 3, Kirby's Adventure and the later Mega Man
/// titles.
pub struct Mapper4 {
    /// Number of 8KB PRG banks
    prg_banks: u8,
    /// Number of 1KB CHR banks
    chr_banks: u16,

    wram: Vec<u8>,

    // Banking state
    bank_select: u8,
    bank_registers: [u8; 8],
    mirroring: Mirroring,

    // IRQ state
    irq_latch: u8,
    irq_counter: u8,
    irq_reload: bool,
    irq_enabled: bool,
    irq_pending: bool,
}

impl Mapper4 {
    pub fn new(prg_chunks: u8, chr_chunks: u8) -> Self {
        Mapper4 {
            prg_banks: prg_chunks * 2,
            chr_banks: if chr_chunks == 0 {
                8
            } else {
                chr_chunks as u16 * 8
            },
            wram: vec![0u8; WRAM_SIZE],
            bank_select: 0,
            bank_registers: [0; 8],
            mirroring: Mirroring::HardwareHeader,
            irq_latch: 0,
            irq_counter: 0,
            irq_reload: false,
            irq_enabled: false,
            irq_pending: false,
        }
    }

    fn prg_mode_swapped(&self) -> bool {
        self.bank_select & 0x40 != 0
    }

    fn chr_inverted(&self) -> bool {
        self.bank_select & 0x80 != 0
    }

    fn prg_index(&self, addr: u16) -> u32 {
        let banks = self.prg_banks as u32;
        let r6 = self.bank_registers[6] as u32;
        let r7 = self.bank_registers[7] as u32;
        let second_last = banks - 2;
        let last = banks - 1;

        let bank = match (addr & 0xE000, self.prg_mode_swapped()) {
            (0x8000, false) => r6,
            (0x8000, true) => second_last,
            (0xA000, _) => r7,
            (0xC000, false) => second_last,
            (0xC000, true) => r6,
            _ => last, // $E000-$FFFF
        };

        (bank % banks) * PRG_BANK_SIZE + (addr & 0x1FFF) as u32
    }

    fn chr_index(&self, addr: u16) -> u32 {
        let banks = self.chr_banks as u32;
        let r = &self.bank_registers;

        // Slot layout before inversion: R0/R1 cover the 2KB pairs at
        // $0000/$0800, R2-R5 the 1KB slots at $1000-$1C00. Inversion swaps
        // the 4KB halves.
        let slot_addr = if self.chr_inverted() {
            addr ^ 0x1000
        } else {
            addr
        };

        let (bank, offset) = match slot_addr {
            0x0000..=0x07FF => ((r[0] & 0xFE) as u32, (slot_addr & 0x07FF) as u32),
            0x0800..=0x0FFF => ((r[1] & 0xFE) as u32, (slot_addr & 0x07FF) as u32),
            0x1000..=0x13FF => (r[2] as u32, (slot_addr & 0x03FF) as u32),
            0x1400..=0x17FF => (r[3] as u32, (slot_addr & 0x03FF) as u32),
            0x1800..=0x1BFF => (r[4] as u32, (slot_addr & 0x03FF) as u32),
            _ => (r[5] as u32, (slot_addr & 0x03FF) as u32),
        };

        (bank % banks) * CHR_BANK_SIZE + offset
    }
}

impl Mapper for Mapper4 {
    fn cpu_map_read(&self, addr: u16) -> MapResult {
        match addr {
            0x6000..=0x7FFF => MapResult::RamHit(self.wram[(addr & 0x1FFF) as usize]),
            0x8000..=0xFFFF => MapResult::RomAddress(self.prg_index(addr)),
            _ => MapResult::Unmapped,
        }
    }

    fn cpu_map_write(&mut self, addr: u16, data: u8) -> MapResult {
        match addr {
            0x6000..=0x7FFF => {
                self.wram[(addr & 0x1FFF) as usize] = data;
                MapResult::RamHit(data)
            }
            0x8000..=0x9FFF => {
                if addr & 0x01 == 0 {
                    self.bank_select = data;
                } else {
                    let target = (self.bank_select & 0x07) as usize;
                    self.bank_registers[target] = data;
                }
                MapResult::RamHit(data)
            }
            0xA000..=0xBFFF => {
                if addr & 0x01 == 0 {
                    self.mirroring = if data & 0x01 == 0 {
                        Mirroring::Vertical
                    } else {
                        Mirroring::Horizontal
                    };
                }
                // Odd writes are WRAM protect; WRAM stays enabled here
                MapResult::RamHit(data)
            }
            0xC000..=0xDFFF => {
                if addr & 0x01 == 0 {
                    self.irq_latch = data;
                } else {
                    self.irq_reload = true;
                }
                MapResult::RamHit(data)
            }
            0xE000..=0xFFFF => {
                if addr & 0x01 == 0 {
                    self.irq_enabled = false;
                    self.irq_pending = false;
                } else {
                    self.irq_enabled = true;
                }
                MapResult::RamHit(data)
            }
            _ => MapResult::Unmapped,
        }
    }

    fn ppu_map_read(&self, addr: u16) -> MapResult {
        match addr {
            0x0000..=0x1FFF => MapResult::RomAddress(self.chr_index(addr)),
            _ => MapResult::Unmapped,
        }
    }

    fn ppu_map_write(&mut self, addr: u16) -> MapResult {
        match addr {
            0x0000..=0x1FFF => MapResult::RomAddress(self.chr_index(addr)),
            _ => MapResult::Unmapped,
        }
    }

    fn mirroring(&self) -> Mirroring {
        self.mirroring
    }

    fn irq_state(&self) -> bool {
        self.irq_pending
    }

    fn irq_clear(&mut self) {
        self.irq_pending = false;
    }

    fn scanline_tick(&mut self) {
        if self.irq_counter == 0 || self.irq_reload {
            self.irq_counter = self.irq_latch;
            self.irq_reload = false;
        } else {
            self.irq_counter -= 1;
        }

        if self.irq_counter == 0 && self.irq_enabled {
            self.irq_pending = true;
        }
    }
}
