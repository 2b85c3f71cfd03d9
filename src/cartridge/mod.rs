use std::path::Path;

use log::info;

use crate::rom::{ConsoleType, Mirroring, Rom, RomError, TvSystem};

pub mod nrom;

use nrom::Nrom;

/// One variant per supported mapper. With only NROM on board a closed enum
/// keeps dispatch static; a trait object earns its keep once bank-switching
/// mappers show up.
pub enum Mapper {
    Nrom(Nrom),
}

impl Mapper {
    fn read(&self, addr: u16) -> u8 {
        match self {
            Mapper::Nrom(nrom) => nrom.read(addr),
        }
    }

    fn write(&mut self, addr: u16, value: u8) {
        match self {
            Mapper::Nrom(nrom) => nrom.write(addr, value),
        }
    }
}

/// A loaded cartridge: the decoded iNES header fields plus the mapper that
/// owns the PRG/CHR data. Reads and writes are pure forwards to the mapper.
pub struct Cartridge {
    pub mirroring: Mirroring,
    pub has_battery_ram: bool,
    pub has_trainer: bool,
    pub console_type: ConsoleType,
    pub prg_ram_banks: u8,
    pub tv_system: TvSystem,
    pub is_dual_tv_system: bool,
    pub has_prg_ram: bool,
    pub has_bus_conflicts: bool,
    pub mapper_id: u8,
    mapper: Mapper,
}

impl Cartridge {
    pub fn new(rom: Rom) -> Result<Cartridge, RomError> {
        let mapper = match rom.mapper_id {
            0 => Mapper::Nrom(Nrom::new(rom.prg_rom, rom.chr_rom)),
            id => return Err(RomError::UnsupportedMapper(id)),
        };

        Ok(Cartridge {
            mirroring: rom.mirroring,
            has_battery_ram: rom.has_battery_ram,
            has_trainer: rom.has_trainer,
            console_type: rom.console_type,
            prg_ram_banks: rom.prg_ram_banks,
            tv_system: rom.tv_system,
            is_dual_tv_system: rom.is_dual_tv_system,
            has_prg_ram: rom.has_prg_ram,
            has_bus_conflicts: rom.has_bus_conflicts,
            mapper_id: rom.mapper_id,
            mapper,
        })
    }

    /// Loads an iNES file and selects its mapper. The file is read once
    /// here; no handle is kept afterwards.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Cartridge, RomError> {
        let rom = Rom::load(path)?;
        let cartridge = Cartridge::new(rom)?;
        info!(
            "cartridge loaded: mapper {}, {:?} mirroring, {:?}, {:?}{}",
            cartridge.mapper_id,
            cartridge.mirroring,
            cartridge.console_type,
            cartridge.tv_system,
            if cartridge.has_battery_ram {
                ", battery RAM"
            } else {
                ""
            },
        );
        Ok(cartridge)
    }

    pub fn read(&self, addr: u16) -> u8 {
        self.mapper.read(addr)
    }

    pub fn write(&mut self, addr: u16, value: u8) {
        self.mapper.write(addr, value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn selects_nrom_for_mapper_zero() {
        let rom = Rom::new_custom(vec![0xEA; 0x4000], vec![], 0, Mirroring::Horizontal);
        let cartridge = Cartridge::new(rom).unwrap();

        assert_eq!(cartridge.read(0x8000), 0xEA);
        assert_eq!(cartridge.mapper_id, 0);
    }

    #[test]
    fn rejects_other_mappers() {
        let rom = Rom::new_custom(vec![0; 0x4000], vec![], 4, Mirroring::Horizontal);
        assert!(matches!(
            Cartridge::new(rom),
            Err(RomError::UnsupportedMapper(4))
        ));
    }

    #[test]
    fn forwards_writes_to_the_mapper() {
        let rom = Rom::new_custom(vec![0x42; 0x4000], vec![], 0, Mirroring::Vertical);
        let mut cartridge = Cartridge::new(rom).unwrap();

        cartridge.write(0x8000, 0x00);
        assert_eq!(cartridge.read(0x8000), 0x42);
    }
}
