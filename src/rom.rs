use std::fs;
use std::io;
use std::path::Path;

use thiserror::Error;

const NES_MAGIC_BYTES: &[u8; 4] = b"NES\x1A";
const HEADER_SIZE: usize = 16;
const PRG_ROM_PAGE_SIZE: usize = 0x4000;
const CHR_ROM_PAGE_SIZE: usize = 0x2000;

#[derive(Debug, Error)]
pub enum RomError {
    #[error("unable to open ROM file: {0}")]
    InvalidPath(#[from] io::Error),

    #[error("malformed ROM image: {0}")]
    MalformedRom(String),

    #[error("file is not in iNES format")]
    InvalidMagic,

    #[error("unsupported mapper: {0}")]
    UnsupportedMapper(u8),
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Mirroring {
    Horizontal,
    Vertical,
    FourScreen,
}

/// Console family from flags7 bits 0-1.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ConsoleType {
    Family,
    VsSystem,
    PlayChoice10,
    Extended,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum TvSystem {
    Ntsc,
    Pal,
}

/// A parsed iNES image: the PRG/CHR payloads plus every header field the
/// container declares. Construction goes through [`Rom::load`] or
/// [`Rom::parse`]; nothing here touches the filesystem afterwards.
pub struct Rom {
    pub prg_rom: Vec<u8>,
    pub chr_rom: Vec<u8>,
    pub mapper_id: u8,
    pub mirroring: Mirroring,
    pub has_battery_ram: bool,
    pub has_trainer: bool,
    pub console_type: ConsoleType,
    pub prg_ram_banks: u8,
    pub tv_system: TvSystem,
    pub is_dual_tv_system: bool,
    pub has_prg_ram: bool,
    pub has_bus_conflicts: bool,
}

impl Rom {
    /// Reads and parses an iNES file from disk. The file handle is closed
    /// before this returns.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Rom, RomError> {
        let raw = fs::read(path)?;
        Rom::parse(&raw)
    }

    pub fn parse(raw: &[u8]) -> Result<Rom, RomError> {
        if raw.len() < HEADER_SIZE {
            return Err(RomError::MalformedRom(format!(
                "file is {} bytes, smaller than the {} byte header",
                raw.len(),
                HEADER_SIZE
            )));
        }
        if &raw[0..4] != NES_MAGIC_BYTES {
            return Err(RomError::InvalidMagic);
        }

        let prg_rom_size = raw[4] as usize * PRG_ROM_PAGE_SIZE;
        let chr_rom_size = raw[5] as usize * CHR_ROM_PAGE_SIZE;

        // Declared sizes must account for the whole file. A trainer (flags6
        // bit 2) makes the file 512 bytes longer than declared, so trainer
        // images are rejected here as well.
        if HEADER_SIZE + prg_rom_size + chr_rom_size != raw.len() {
            return Err(RomError::MalformedRom(format!(
                "header declares {} PRG + {} CHR bytes but file holds {}",
                prg_rom_size,
                chr_rom_size,
                raw.len() - HEADER_SIZE
            )));
        }

        let flags6 = raw[6];
        let flags7 = raw[7];

        if (flags7 >> 2) & 0b11 == 2 {
            return Err(RomError::MalformedRom(
                "NES 2.0 images are not supported".to_string(),
            ));
        }

        let four_screen = flags6 & 0b1000 != 0;
        let vertical_mirroring = flags6 & 0b1 != 0;
        let mirroring = match (four_screen, vertical_mirroring) {
            (true, _) => Mirroring::FourScreen,
            (false, true) => Mirroring::Vertical,
            (false, false) => Mirroring::Horizontal,
        };

        let mapper_id = (flags7 & 0b1111_0000) | (flags6 >> 4);

        let console_type = match flags7 & 0b11 {
            0 => ConsoleType::Family,
            1 => ConsoleType::VsSystem,
            2 => ConsoleType::PlayChoice10,
            _ => ConsoleType::Extended,
        };

        let tv_system = if raw[9] & 0b1 != 0 {
            TvSystem::Pal
        } else {
            TvSystem::Ntsc
        };

        let tv_system_id = raw[10] & 0b11;
        let is_dual_tv_system = tv_system_id == 1 || tv_system_id == 3;

        let prg_rom_start = HEADER_SIZE;
        let chr_rom_start = prg_rom_start + prg_rom_size;

        Ok(Rom {
            prg_rom: raw[prg_rom_start..chr_rom_start].to_vec(),
            chr_rom: raw[chr_rom_start..chr_rom_start + chr_rom_size].to_vec(),
            mapper_id,
            mirroring,
            has_battery_ram: flags6 & 0b10 != 0,
            has_trainer: flags6 & 0b100 != 0,
            console_type,
            prg_ram_banks: raw[8],
            tv_system,
            is_dual_tv_system,
            has_prg_ram: raw[10] & 0b1_0000 != 0,
            has_bus_conflicts: raw[10] & 0b10_0000 != 0,
        })
    }

    pub fn new_custom(
        prg_rom: Vec<u8>,
        chr_rom: Vec<u8>,
        mapper_id: u8,
        mirroring: Mirroring,
    ) -> Rom {
        Rom {
            prg_rom,
            chr_rom,
            mapper_id,
            mirroring,
            has_battery_ram: false,
            has_trainer: false,
            console_type: ConsoleType::Family,
            prg_ram_banks: 0,
            tv_system: TvSystem::Ntsc,
            is_dual_tv_system: false,
            has_prg_ram: false,
            has_bus_conflicts: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn build_test_image(prg_banks: u8, chr_banks: u8, mapper: u8, flags6_low: u8) -> Vec<u8> {
        let prg_len = prg_banks as usize * PRG_ROM_PAGE_SIZE;
        let chr_len = chr_banks as usize * CHR_ROM_PAGE_SIZE;
        let mut raw = Vec::with_capacity(HEADER_SIZE + prg_len + chr_len);
        raw.extend_from_slice(NES_MAGIC_BYTES);
        raw.push(prg_banks);
        raw.push(chr_banks);
        raw.push((mapper & 0x0F) << 4 | flags6_low);
        raw.push(mapper & 0xF0);
        raw.extend_from_slice(&[0; 8]);
        raw.extend(vec![1; prg_len]);
        raw.extend(vec![2; chr_len]);
        raw
    }

    #[test]
    fn parses_header_fields() {
        let raw = build_test_image(2, 1, 0, 0b0001);
        let rom = Rom::parse(&raw).unwrap();

        assert_eq!(rom.prg_rom.len(), 2 * PRG_ROM_PAGE_SIZE);
        assert_eq!(rom.chr_rom.len(), CHR_ROM_PAGE_SIZE);
        assert_eq!(rom.mapper_id, 0);
        assert_eq!(rom.mirroring, Mirroring::Vertical);
        assert_eq!(rom.console_type, ConsoleType::Family);
        assert_eq!(rom.tv_system, TvSystem::Ntsc);
        assert!(!rom.has_battery_ram);
        assert!(!rom.has_trainer);
        assert!(!rom.is_dual_tv_system);
    }

    #[test]
    fn composes_mapper_number_from_both_nibbles() {
        let raw = build_test_image(1, 0, 0x42, 0);
        let rom = Rom::parse(&raw).unwrap();
        assert_eq!(rom.mapper_id, 0x42);
    }

    #[test]
    fn decodes_battery_and_four_screen_flags() {
        let raw = build_test_image(1, 1, 0, 0b1010);
        let rom = Rom::parse(&raw).unwrap();

        assert!(rom.has_battery_ram);
        assert_eq!(rom.mirroring, Mirroring::FourScreen);
    }

    #[test]
    fn decodes_tv_system_and_flags10() {
        let mut raw = build_test_image(1, 0, 0, 0);
        raw[9] = 0b1; // PAL
        raw[10] = 0b11_0001; // dual TV, PRG RAM present, bus conflicts
        let rom = Rom::parse(&raw).unwrap();

        assert_eq!(rom.tv_system, TvSystem::Pal);
        assert!(rom.is_dual_tv_system);
        assert!(rom.has_prg_ram);
        assert!(rom.has_bus_conflicts);
    }

    #[test]
    fn rejects_file_shorter_than_header() {
        assert!(matches!(
            Rom::parse(b"NES\x1A"),
            Err(RomError::MalformedRom(_))
        ));
    }

    #[test]
    fn rejects_bad_magic() {
        let mut raw = build_test_image(1, 0, 0, 0);
        raw[3] = 0x00;
        assert!(matches!(Rom::parse(&raw), Err(RomError::InvalidMagic)));
    }

    #[test]
    fn rejects_nes20_images() {
        let mut raw = build_test_image(1, 0, 0, 0);
        raw[7] |= 0b1000; // NES 2.0 marker in flags7 bits 2-3
        assert!(matches!(Rom::parse(&raw), Err(RomError::MalformedRom(_))));
    }

    #[test]
    fn rejects_size_mismatch() {
        let mut raw = build_test_image(1, 0, 0, 0);
        raw.push(0xFF);
        assert!(matches!(Rom::parse(&raw), Err(RomError::MalformedRom(_))));
    }

    #[test]
    fn rejects_trainer_image_by_size() {
        let mut raw = build_test_image(1, 0, 0, 0b100);
        let trainer = [0u8; 512];
        raw.splice(HEADER_SIZE..HEADER_SIZE, trainer);
        assert!(matches!(Rom::parse(&raw), Err(RomError::MalformedRom(_))));
    }
}
