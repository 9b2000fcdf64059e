// Cartridge module - iNES ROM loading and the mapper contract
//
// A cartridge owns the PRG and CHR memories parsed out of an iNES image and
// a mapper that translates CPU/PPU bus addresses into indices of those
// memories (or services them from mapper-private RAM). The mapper also
// drives cartridge-side IRQs and dynamic nametable mirroring.
//
// # iNES format (bit-exact)
//
// ```text
// bytes 0..3   magic "NES\x1A"
// byte  4      PRG-ROM chunk count (16 KiB units)
// byte  5      CHR-ROM chunk count (8 KiB units; 0 means 8 KiB CHR-RAM)
// byte  6      flags6: bit 0 mirroring, bit 2 trainer, bits 4-7 mapper low nibble
// byte  7      flags7: bits 4-7 mapper high nibble
// bytes 8..15  reserved / size fields (ignored)
// ```
//
// A 512-byte trainer (flags6 bit 2) is skipped. Mapper id is
// `(flags7 & 0xF0) | (flags6 >> 4)`.

pub mod mappers;

use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

pub use mappers::{create_mapper, MapperError};

/// Size of one PRG-ROM chunk (16 KiB)
pub const PRG_CHUNK_SIZE: usize = 16 * 1024;

/// Size of one CHR chunk (8 KiB)
pub const CHR_CHUNK_SIZE: usize = 8 * 1024;

/// Length of the iNES header
const HEADER_SIZE: usize = 16;

/// Length of the optional trainer blob
const TRAINER_SIZE: usize = 512;

/// Nametable mirroring arrangement
///
/// `HardwareHeader` defers to the solder-pad bit in the iNES header;
/// mappers with mirroring control (MMC1, MMC3) return one of the concrete
/// variants instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mirroring {
    OneScreenLow,
    OneScreenHigh,
    Horizontal,
    Vertical,
    HardwareHeader,
}

/// Result of a mapper address translation
///
/// - `Unmapped`: the mapper does not claim the address; the access falls
///   through (reads return nothing, writes are dropped).
/// - `RomAddress`: an index into the cartridge's PRG memory (CPU side) or
///   CHR memory (PPU side). On the PPU write path this is only honored
///   when the CHR memory is RAM.
/// - `RamHit`: the mapper serviced the access internally (WRAM or a bank
///   register); the payload is the byte read, or the byte stored for
///   writes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MapResult {
    Unmapped,
    RomAddress(u32),
    RamHit(u8),
}

/// The cartridge mapper contract
///
/// Implementations translate bus addresses to ROM indices, own any
/// mapper-private RAM and bank registers, and expose the cartridge IRQ
/// line. `scanline_tick` is invoked by the PPU once per rendered scanline
/// (MMC3 counts these for its IRQ).
pub trait Mapper {
    /// Translate a CPU bus read (0x4020-0xFFFF)
    fn cpu_map_read(&self, addr: u16) -> MapResult;

    /// Translate (or consume) a CPU bus write
    fn cpu_map_write(&mut self, addr: u16, data: u8) -> MapResult;

    /// Translate a PPU pattern-table read (0x0000-0x1FFF)
    fn ppu_map_read(&self, addr: u16) -> MapResult;

    /// Translate a PPU pattern-table write
    fn ppu_map_write(&mut self, addr: u16) -> MapResult;

    /// Current nametable mirroring
    fn mirroring(&self) -> Mirroring {
        Mirroring::HardwareHeader
    }

    /// Level state of the cartridge IRQ line
    fn irq_state(&self) -> bool {
        false
    }

    /// Acknowledge a delivered IRQ
    fn irq_clear(&mut self) {}

    /// One visible scanline elapsed with rendering enabled
    fn scanline_tick(&mut self) {}
}

/// Parsed iNES header fields
#[derive(Debug, Clone, Copy)]
pub struct INesHeader {
    /// PRG-ROM size in 16 KiB chunks
    pub prg_chunks: u8,
    /// CHR-ROM size in 8 KiB chunks (0 = cartridge supplies CHR-RAM)
    pub chr_chunks: u8,
    /// Flags byte 6 (mirroring, trainer, mapper low nibble)
    pub flags6: u8,
    /// Flags byte 7 (mapper high nibble)
    pub flags7: u8,
}

impl INesHeader {
    /// Mapper id from the two flag nibbles
    pub fn mapper_id(&self) -> u8 {
        (self.flags7 & 0xF0) | (self.flags6 >> 4)
    }

    /// Hard-wired mirroring from flags6 bit 0
    pub fn mirroring(&self) -> Mirroring {
        if self.flags6 & 0x01 != 0 {
            Mirroring::Vertical
        } else {
            Mirroring::Horizontal
        }
    }

    /// Whether a 512-byte trainer precedes the PRG data
    pub fn has_trainer(&self) -> bool {
        self.flags6 & 0x04 != 0
    }
}

/// Error type for ROM loading
#[derive(Debug)]
pub enum INesError {
    /// Underlying file I/O failure
    Io(io::Error),
    /// Header magic is not "NES\x1A"
    BadMagic,
    /// File is shorter than the header advertises
    Truncated { expected: usize, actual: usize },
    /// Header reports zero PRG-ROM chunks
    NoPrgRom,
    /// Mapper construction failed (unsupported id)
    Mapper(MapperError),
}

impl fmt::Display for INesError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            INesError::Io(err) => write!(f, "failed to read ROM file: {}", err),
            INesError::BadMagic => write!(f, "not an iNES image (bad magic)"),
            INesError::Truncated { expected, actual } => {
                write!(
                    f,
                    "truncated ROM image: header promises {} bytes, file holds {}",
                    expected, actual
                )
            }
            INesError::NoPrgRom => write!(f, "ROM image reports zero PRG-ROM chunks"),
            INesError::Mapper(err) => write!(f, "{}", err),
        }
    }
}

impl std::error::Error for INesError {}

impl From<io::Error> for INesError {
    fn from(err: io::Error) -> Self {
        INesError::Io(err)
    }
}

impl From<MapperError> for INesError {
    fn from(err: MapperError) -> Self {
        INesError::Mapper(err)
    }
}

/// A loaded cartridge: header fields, PRG/CHR memories and the mapper
///
/// The ROM buffers are immutable after load, except that CHR memory is
/// writable when the header reported zero CHR chunks (CHR-RAM).
pub struct Cartridge {
    header: INesHeader,
    program_memory: Vec<u8>,
    char_memory: Vec<u8>,
    chr_is_ram: bool,
    mapper: Box<dyn Mapper>,
}

impl Cartridge {
    /// Load a cartridge from an iNES file on disk
    ///
    /// Battery-backed mappers persist their WRAM next to the ROM as
    /// `{rom_basename}.sav`.
    pub fn from_ines_file<P: AsRef<Path>>(path: P) -> Result<Self, INesError> {
        let path = path.as_ref();
        let bytes = fs::read(path)?;
        let save_path = path.with_extension("sav");
        let cartridge = Self::from_ines_bytes(&bytes, Some(save_path))?;

        log::info!(
            "loaded {}: mapper {}, {} KiB PRG, {} KiB CHR{}",
            path.display(),
            cartridge.mapper_id(),
            cartridge.program_memory.len() / 1024,
            cartridge.char_memory.len() / 1024,
            if cartridge.chr_is_ram { " (RAM)" } else { "" },
        );

        Ok(cartridge)
    }

    /// Load a cartridge from an in-memory iNES image
    ///
    /// `save_path` is handed to battery-backed mappers; pass `None` to keep
    /// WRAM volatile (tests do this).
    pub fn from_ines_bytes(bytes: &[u8], save_path: Option<PathBuf>) -> Result<Self, INesError> {
        if bytes.len() < HEADER_SIZE || &bytes[0..4] != b"NES\x1A" {
            return Err(INesError::BadMagic);
        }

        let header = INesHeader {
            prg_chunks: bytes[4],
            chr_chunks: bytes[5],
            flags6: bytes[6],
            flags7: bytes[7],
        };

        if header.prg_chunks == 0 {
            return Err(INesError::NoPrgRom);
        }

        let mut offset = HEADER_SIZE;
        if header.has_trainer() {
            offset += TRAINER_SIZE;
        }

        let prg_size = header.prg_chunks as usize * PRG_CHUNK_SIZE;
        let chr_size = header.chr_chunks as usize * CHR_CHUNK_SIZE;
        let expected = offset + prg_size + chr_size;
        if bytes.len() < expected {
            return Err(INesError::Truncated {
                expected,
                actual: bytes.len(),
            });
        }

        let program_memory = bytes[offset..offset + prg_size].to_vec();
        offset += prg_size;

        // Zero CHR chunks means the board carries 8 KiB of CHR-RAM instead
        let (char_memory, chr_is_ram) = if header.chr_chunks == 0 {
            (vec![0u8; CHR_CHUNK_SIZE], true)
        } else {
            (bytes[offset..offset + chr_size].to_vec(), false)
        };

        let mapper = create_mapper(&header, save_path)?;

        Ok(Cartridge {
            header,
            program_memory,
            char_memory,
            chr_is_ram,
            mapper,
        })
    }

    /// Mapper id from the header nibbles
    pub fn mapper_id(&self) -> u8 {
        self.header.mapper_id()
    }

    /// Parsed header fields
    pub fn header(&self) -> &INesHeader {
        &self.header
    }

    /// Read from the CPU bus (0x4020-0xFFFF)
    ///
    /// Returns `None` when the mapper leaves the address unmapped, letting
    /// the bus fall through to open-bus behavior.
    pub fn cpu_read(&self, addr: u16) -> Option<u8> {
        match self.mapper.cpu_map_read(addr) {
            MapResult::Unmapped => None,
            MapResult::RomAddress(index) => {
                Some(self.program_memory[index as usize % self.program_memory.len()])
            }
            MapResult::RamHit(data) => Some(data),
        }
    }

    /// Write from the CPU bus; returns true when the cartridge claimed it
    pub fn cpu_write(&mut self, addr: u16, data: u8) -> bool {
        match self.mapper.cpu_map_write(addr, data) {
            MapResult::Unmapped => false,
            // PRG is ROM; bank-switch writes are consumed by the mapper
            // before this point, so a RomAddress on the write path is
            // claimed but dropped.
            MapResult::RomAddress(_) => true,
            MapResult::RamHit(_) => true,
        }
    }

    /// Read from the PPU bus pattern-table region (0x0000-0x1FFF)
    pub fn ppu_read(&self, addr: u16) -> Option<u8> {
        match self.mapper.ppu_map_read(addr) {
            MapResult::Unmapped => None,
            MapResult::RomAddress(index) => {
                Some(self.char_memory[index as usize % self.char_memory.len()])
            }
            MapResult::RamHit(data) => Some(data),
        }
    }

    /// Write to the PPU bus pattern-table region; only lands when the
    /// cartridge carries CHR-RAM
    pub fn ppu_write(&mut self, addr: u16, data: u8) -> bool {
        match self.mapper.ppu_map_write(addr) {
            MapResult::Unmapped => false,
            MapResult::RomAddress(index) => {
                if self.chr_is_ram {
                    let len = self.char_memory.len();
                    self.char_memory[index as usize % len] = data;
                }
                true
            }
            MapResult::RamHit(_) => true,
        }
    }

    /// Effective mirroring: the mapper's choice, or the header bit when the
    /// mapper defers
    pub fn mirroring(&self) -> Mirroring {
        match self.mapper.mirroring() {
            Mirroring::HardwareHeader => self.header.mirroring(),
            concrete => concrete,
        }
    }

    /// Cartridge IRQ line state
    pub fn irq_state(&self) -> bool {
        self.mapper.irq_state()
    }

    /// Acknowledge a delivered cartridge IRQ
    pub fn irq_clear(&mut self) {
        self.mapper.irq_clear()
    }

    /// Forward a rendered-scanline notification to the mapper
    pub fn scanline_tick(&mut self) {
        self.mapper.scanline_tick()
    }
}
