pub mod bus;
pub mod cartridge;
pub mod cpu;
pub mod rom;

// Re-exports
pub use bus::Bus;
pub use cartridge::Cartridge;
pub use cpu::{Cpu, CpuError, Flags};
pub use rom::{ConsoleType, Mirroring, Rom, RomError, TvSystem};
