//! Cartridge storage: PRG ROM, CHR ROM/RAM and battery SRAM.
//!
//! The container format is somebody else's problem. A `Cartridge` is built from
//! raw PRG and CHR images that a loader has already pulled out of the file, and
//! mappers index into it with offsets they compute themselves.
//!
//! Access beyond the end of an image is a configuration error and panics; mappers
//! keep their offsets in range by wrapping bank numbers modulo the bank count.

use crate::MapperError;

/// PRG bank granularity used by bank-aware access.
pub const PRG_BANK_SIZE: usize = 0x4000;
/// CHR bank granularity used by bank-aware access.
pub const CHR_BANK_SIZE: usize = 0x1000;
/// Size of the $6000-$7FFF work/battery RAM window.
pub const SRAM_SIZE: usize = 0x2000;

/// Nametable arrangement selected by the board or by the mapper at runtime.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Default)]
pub enum Mirroring {
    #[default]
    Horizontal,
    Vertical,
    SingleScreenLower,
    SingleScreenUpper,
    FourScreen,
}

#[derive(Clone, Debug)]
pub struct Cartridge {
    prg: Vec<u8>,
    chr: Vec<u8>,
    sram: Vec<u8>,
    chr_is_ram: bool,
    mirroring: Mirroring,
}

impl Cartridge {
    /// Wraps raw images.
    ///
    /// PRG must be a non-empty multiple of 16KB. An empty CHR image means the
    /// board carries 8KB of CHR RAM instead.
    pub fn new(prg: Vec<u8>, chr: Vec<u8>) -> Result<Self, MapperError> {
        if prg.is_empty() || prg.len() % PRG_BANK_SIZE != 0 {
            return Err(MapperError::BadBankSize {
                what: "PRG",
                len: prg.len(),
                bank: PRG_BANK_SIZE,
            });
        }
        let chr_is_ram = chr.is_empty();
        let chr = if chr_is_ram { vec![0; 0x2000] } else { chr };
        if chr.len() % CHR_BANK_SIZE != 0 {
            return Err(MapperError::BadBankSize {
                what: "CHR",
                len: chr.len(),
                bank: CHR_BANK_SIZE,
            });
        }
        Ok(Self {
            prg,
            chr,
            sram: vec![0; SRAM_SIZE],
            chr_is_ram,
            mirroring: Mirroring::default(),
        })
    }

    /// A blank cartridge with `prg_banks` 16KB banks of zeroed PRG and 8KB of CHR RAM.
    pub fn blank(prg_banks: usize) -> Self {
        Self {
            prg: vec![0; prg_banks.max(1) * PRG_BANK_SIZE],
            chr: vec![0; 0x2000],
            sram: vec![0; SRAM_SIZE],
            chr_is_ram: true,
            mirroring: Mirroring::default(),
        }
    }

    pub fn prg_len(&self) -> usize {
        self.prg.len()
    }

    pub fn chr_len(&self) -> usize {
        self.chr.len()
    }

    /// Number of 16KB PRG banks.
    pub fn prg_banks(&self) -> usize {
        self.prg.len() / PRG_BANK_SIZE
    }

    /// Number of 4KB CHR banks.
    pub fn chr_banks(&self) -> usize {
        self.chr.len() / CHR_BANK_SIZE
    }

    pub fn chr_is_ram(&self) -> bool {
        self.chr_is_ram
    }

    pub fn mirroring(&self) -> Mirroring {
        self.mirroring
    }

    pub fn set_mirroring(&mut self, mirroring: Mirroring) {
        self.mirroring = mirroring;
    }

    #[inline]
    pub fn read_prg(&self, offset: usize) -> u8 {
        self.prg[offset]
    }

    #[inline]
    pub fn write_prg(&mut self, offset: usize, value: u8) {
        self.prg[offset] = value;
    }

    #[inline]
    pub fn read_chr(&self, offset: usize) -> u8 {
        self.chr[offset]
    }

    #[inline]
    pub fn write_chr(&mut self, offset: usize, value: u8) {
        self.chr[offset] = value;
    }

    #[inline]
    pub fn read_sram(&self, offset: usize) -> u8 {
        self.sram[offset % SRAM_SIZE]
    }

    #[inline]
    pub fn write_sram(&mut self, offset: usize, value: u8) {
        self.sram[offset % SRAM_SIZE] = value;
    }

    pub fn prg(&self) -> &[u8] {
        &self.prg
    }

    pub fn chr(&self) -> &[u8] {
        &self.chr
    }
}
