//! MMC1 (mappers 1 and 5).
//!
//! Implements:
//! - Serial shift register: five single-bit writes at $8000+ build a 5-bit value,
//!   committed to the register selected by the address of the fifth write
//! - Bit 7 set on any write resets the shift register and forces PRG mode 3
//! - PRG banking: 32K switch (modes 0/1), 16K with first bank fixed (mode 2)
//!   or last bank fixed (mode 3)
//! - CHR banking: 8K (mode 0) or 4K+4K (mode 1)
//! - Mirroring from control bits 0-1
//!
//! Offsets are recomputed on every register commit.

use crate::cartridge::{Cartridge, Mirroring, CHR_BANK_SIZE, PRG_BANK_SIZE};
use crate::mapper::{offsets_line, register_offset, register_port, tail_offset, Mapper};
use crate::MapperError;

const SHIFT_RESET: u8 = 0x10;

#[derive(Debug, Clone)]
pub struct Mmc1 {
    cart: Cartridge,

    // Serial latch; the marker bit reaching bit 0 means the next write completes it
    shift_register: u8,

    control: u8,
    prg_mode: u8,
    chr_mode: u8,
    prg_bank: u8,
    chr_bank0: u8,
    chr_bank1: u8,

    // Byte offsets into PRG for $8000/$C000 and into CHR for $0000/$1000
    prg_offset: [usize; 2],
    chr_offset: [usize; 2],
}

impl Mmc1 {
    pub fn new(cart: Cartridge) -> Self {
        let mut m = Self {
            cart,
            shift_register: SHIFT_RESET,
            control: 0,
            prg_mode: 0,
            chr_mode: 0,
            prg_bank: 0,
            chr_bank0: 0,
            chr_bank1: 0,
            prg_offset: [0; 2],
            chr_offset: [0; 2],
        };
        // Power-on: 16K mode with the last bank at $C000
        m.write_control(0x0C);
        m.update_offsets();
        m
    }

    pub fn prg_mode(&self) -> u8 {
        self.prg_mode
    }

    pub fn chr_mode(&self) -> u8 {
        self.chr_mode
    }

    pub fn prg_bank(&self) -> u8 {
        self.prg_bank
    }

    pub fn prg_offsets(&self) -> [usize; 2] {
        self.prg_offset
    }

    pub fn chr_offsets(&self) -> [usize; 2] {
        self.chr_offset
    }

    fn prg_bank_offset(&self, index: u8) -> usize {
        register_offset(index, PRG_BANK_SIZE, self.cart.prg_len())
    }

    fn chr_bank_offset(&self, index: u8) -> usize {
        register_offset(index, CHR_BANK_SIZE, self.cart.chr_len())
    }

    fn write_control(&mut self, value: u8) {
        self.control = value;
        self.chr_mode = (value >> 4) & 1;
        self.prg_mode = (value >> 2) & 3;
        self.cart.set_mirroring(match value & 3 {
            0 => Mirroring::SingleScreenLower,
            1 => Mirroring::SingleScreenUpper,
            2 => Mirroring::Vertical,
            _ => Mirroring::Horizontal,
        });
    }

    fn update_offsets(&mut self) {
        self.prg_offset = match self.prg_mode {
            0 | 1 => [
                self.prg_bank_offset(self.prg_bank & 0xFE),
                self.prg_bank_offset(self.prg_bank | 0x01),
            ],
            2 => [0, self.prg_bank_offset(self.prg_bank)],
            _ => [
                self.prg_bank_offset(self.prg_bank),
                tail_offset(-1, PRG_BANK_SIZE, self.cart.prg_len()),
            ],
        };
        self.chr_offset = match self.chr_mode {
            0 => [
                self.chr_bank_offset(self.chr_bank0 & 0xFE),
                self.chr_bank_offset(self.chr_bank0 | 0x01),
            ],
            _ => [
                self.chr_bank_offset(self.chr_bank0),
                self.chr_bank_offset(self.chr_bank1),
            ],
        };
        tracing::debug!(
            prg = ?self.prg_offset,
            chr = ?self.chr_offset,
            "MMC1 offsets"
        );
    }

    fn commit(&mut self, addr: u16, value: u8) {
        match addr {
            0x0000..=0x9FFF => self.write_control(value),
            0xA000..=0xBFFF => self.chr_bank0 = value,
            0xC000..=0xDFFF => self.chr_bank1 = value,
            _ => self.prg_bank = value & 0x0F,
        }
        tracing::debug!("MMC1 register ${addr:04X} <- {value:02x}");
        self.update_offsets();
    }

    /// One CPU write to the serial port.
    pub fn load_register(&mut self, addr: u16, value: u8) {
        if value & 0x80 != 0 {
            self.shift_register = SHIFT_RESET;
            self.write_control(self.control | 0x0C);
            self.update_offsets();
            return;
        }
        let complete = self.shift_register & 1 != 0;
        self.shift_register = (self.shift_register >> 1) | ((value & 1) << 4);
        if complete {
            let v = self.shift_register;
            self.shift_register = SHIFT_RESET;
            self.commit(addr, v);
        }
    }
}

impl Mapper for Mmc1 {
    fn name(&self) -> &'static str {
        "MMC1"
    }

    fn cartridge(&self) -> &Cartridge {
        &self.cart
    }

    fn cartridge_mut(&mut self) -> &mut Cartridge {
        &mut self.cart
    }

    fn read(&self, addr: u16) -> u8 {
        match addr {
            0x0000..=0x1FFF => {
                let bank = (addr / 0x1000) as usize;
                self.cart
                    .read_chr(self.chr_offset[bank] + (addr % 0x1000) as usize)
            }
            0x6000..=0x7FFF => self.cart.read_sram(addr as usize - 0x6000),
            0x8000..=0xFFFF => {
                let rel = addr - 0x8000;
                let bank = (rel / 0x4000) as usize;
                self.cart
                    .read_prg(self.prg_offset[bank] + (rel % 0x4000) as usize)
            }
            _ => {
                tracing::warn!("Unhandled MMC1 read at ${addr:04X}");
                0
            }
        }
    }

    fn write(&mut self, addr: u16, value: u8) {
        match addr {
            0x0000..=0x1FFF => {
                let bank = (addr / 0x1000) as usize;
                let at = self.chr_offset[bank] + (addr % 0x1000) as usize;
                self.cart.write_chr(at, value);
            }
            0x6000..=0x7FFF => self.cart.write_sram(addr as usize - 0x6000, value),
            0x8000..=0xFFFF => self.load_register(addr, value),
            _ => tracing::warn!("Unhandled MMC1 write at ${addr:04X}"),
        }
    }

    fn write_register(&mut self, reg: &str, value: u8) -> Result<(), MapperError> {
        match reg {
            "prg_mode" => self.prg_mode = value,
            "chr_mode" => self.chr_mode = value,
            "prg_bank" => self.prg_bank = value,
            "chr_bank0" => self.chr_bank0 = value,
            "chr_bank1" => self.chr_bank1 = value,
            _ => {
                let addr = register_port(reg)?;
                self.load_register(addr, value);
            }
        }
        self.update_offsets();
        Ok(())
    }

    fn describe(&self) -> String {
        [
            format!("prg_mode={:02x} prg_bank={:02x}", self.prg_mode, self.prg_bank),
            offsets_line("prg", &self.prg_offset),
            format!(
                "chr_mode={:02x} chr_bank0={:02x} chr_bank1={:02x}",
                self.chr_mode, self.chr_bank0, self.chr_bank1
            ),
            offsets_line("chr", &self.chr_offset),
        ]
        .join("\n")
    }
}
