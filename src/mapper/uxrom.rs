/*!
UxROM (mappers 2 and 0).

- PRG: 16 KiB switchable bank at $8000-$BFFF, last bank fixed at $C000-$FFFF.
- Any CPU write at $8000+ selects the low bank (value modulo bank count).
- CHR: 8 KiB, not banked.
- NROM boards (mapper 0) behave the same as long as nothing writes ROM space.
*/

use crate::cartridge::{Cartridge, PRG_BANK_SIZE};
use crate::mapper::{register_port, Mapper};
use crate::MapperError;

#[derive(Debug, Clone)]
pub struct Uxrom {
    cart: Cartridge,
    prg_banks: usize,
    prg_bank: usize,
}

impl Uxrom {
    pub fn new(cart: Cartridge) -> Self {
        let prg_banks = cart.prg_banks();
        Self {
            cart,
            prg_banks,
            prg_bank: 0,
        }
    }

    pub fn prg_bank(&self) -> usize {
        self.prg_bank
    }

    fn select(&mut self, value: u8) {
        self.prg_bank = value as usize % self.prg_banks;
        tracing::debug!(bank = self.prg_bank, "UxROM bank select");
    }
}

impl Mapper for Uxrom {
    fn name(&self) -> &'static str {
        "UxROM"
    }

    fn cartridge(&self) -> &Cartridge {
        &self.cart
    }

    fn cartridge_mut(&mut self) -> &mut Cartridge {
        &mut self.cart
    }

    fn read(&self, addr: u16) -> u8 {
        match addr {
            0x0000..=0x1FFF => self.cart.read_chr(addr as usize % self.cart.chr_len()),
            0x6000..=0x7FFF => self.cart.read_sram(addr as usize - 0x6000),
            0x8000..=0xBFFF => self
                .cart
                .read_prg(self.prg_bank * PRG_BANK_SIZE + (addr as usize - 0x8000)),
            0xC000..=0xFFFF => self
                .cart
                .read_prg((self.prg_banks - 1) * PRG_BANK_SIZE + (addr as usize - 0xC000)),
            _ => {
                tracing::warn!("Unhandled UxROM read at ${addr:04X}");
                0
            }
        }
    }

    fn write(&mut self, addr: u16, value: u8) {
        match addr {
            0x0000..=0x1FFF => {
                let len = self.cart.chr_len();
                self.cart.write_chr(addr as usize % len, value)
            }
            0x6000..=0x7FFF => self.cart.write_sram(addr as usize - 0x6000, value),
            0x8000..=0xFFFF => self.select(value),
            _ => tracing::warn!("Unhandled UxROM write at ${addr:04X}"),
        }
    }

    fn write_register(&mut self, reg: &str, value: u8) -> Result<(), MapperError> {
        match reg {
            "prg_bank" => self.select(value),
            _ => {
                register_port(reg)?;
                self.select(value);
            }
        }
        Ok(())
    }

    fn describe(&self) -> String {
        format!(
            "prg_bank={:02x} fixed={:02x}\n# prg offsets = 0x{:05x} 0x{:05x}",
            self.prg_bank,
            self.prg_banks - 1,
            self.prg_bank * PRG_BANK_SIZE,
            (self.prg_banks - 1) * PRG_BANK_SIZE
        )
    }
}
