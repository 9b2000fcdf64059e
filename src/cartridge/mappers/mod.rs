// Mappers module - cartridge address-translation boards
//
// The factory picks the board implementation from the header's mapper id.
// Mappers never own ROM data; they turn bus addresses into PRG/CHR indices
// (see `MapResult`) and keep their own bank registers and WRAM.

mod mapper0;
mod mapper1;
mod mapper2;
mod mapper3;
mod mapper4;
mod mapper66;

use std::path::PathBuf;

use super::{INesHeader, Mapper};
pub use mapper0::Mapper0;
pub use mapper1::Mapper1;
pub use mapper2::Mapper2;
pub use mapper3::Mapper3;
pub use mapper4::Mapper4;
pub use mapper66::Mapper66;

/// Error type for mapper creation
#[derive(Debug, PartialEq, Eq)]
pub enum MapperError {
    /// The requested mapper number is not supported
    UnsupportedMapper(u8),
}

impl std::fmt::Display for MapperError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MapperError::UnsupportedMapper(num) => {
                write!(f, "mapper {} is not supported", num)
            }
        }
    }
}

impl std::error::Error for MapperError {}

/// Create the mapper implementation selected by the header
///
/// `save_path` is the `.sav` sidecar for battery-backed boards; only MMC1
/// uses it here.
pub fn create_mapper(
    header: &INesHeader,
    save_path: Option<PathBuf>,
) -> Result<Box<dyn Mapper>, MapperError> {
    let prg_chunks = header.prg_chunks;
    let chr_chunks = header.chr_chunks;

    match header.mapper_id() {
        0 => Ok(Box::new(Mapper0::new(prg_chunks, chr_chunks))),
        1 => Ok(Box::new(Mapper1::new(prg_chunks, chr_chunks, save_path))),
        2 => Ok(Box::new(Mapper2::new(prg_chunks, chr_chunks))),
        3 => Ok(Box::new(Mapper3::new(prg_chunks, chr_chunks))),
        4 => Ok(Box::new(Mapper4::new(prg_chunks, chr_chunks))),
        66 => Ok(Box::new(Mapper66::new(prg_chunks, chr_chunks))),
        mapper_num => Err(MapperError::UnsupportedMapper(mapper_num)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn header(mapper_id: u8, prg_chunks: u8, chr_chunks: u8) -> INesHeader {
        INesHeader {
            prg_chunks,
            chr_chunks,
            flags6: (mapper_id & 0x0F) << 4,
            flags7: mapper_id & 0xF0,
        }
    }

    #[test]
    fn test_supported_mappers_construct() {
        for id in [0u8, 1, 2, 3, 4, 66] {
            assert!(
                create_mapper(&header(id, 2, 1), None).is_ok(),
                "mapper {} should construct",
                id
            );
        }
    }

    #[test]
    fn test_unsupported_mapper() {
        let result = create_mapper(&header(7, 2, 1), None);
        assert_eq!(result.err(), Some(MapperError::UnsupportedMapper(7)));
    }
}
