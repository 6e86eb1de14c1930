/*!
CNROM (mapper 3).

- PRG: fixed. 16 KiB images are mirrored into $C000, 32 KiB map directly.
- CHR: 8 KiB bank selected by any CPU write to $8000-$FFFF (value modulo bank count).
- Mirroring comes from the board.
*/

use crate::cartridge::Cartridge;
use crate::mapper::{register_port, Mapper};
use crate::MapperError;

const CHR_WINDOW: usize = 0x2000;

#[derive(Debug, Clone)]
pub struct Cnrom {
    cart: Cartridge,
    chr_bank: usize,
    chr_bank_count: usize,
}

impl Cnrom {
    pub fn new(cart: Cartridge) -> Self {
        let chr_bank_count = (cart.chr_len() / CHR_WINDOW).max(1);
        Self {
            cart,
            chr_bank: 0,
            chr_bank_count,
        }
    }

    pub fn chr_bank(&self) -> usize {
        self.chr_bank
    }

    fn select(&mut self, value: u8) {
        self.chr_bank = value as usize % self.chr_bank_count;
        tracing::debug!(bank = self.chr_bank, "CNROM CHR select");
    }

    fn chr_index(&self, addr: u16) -> usize {
        (self.chr_bank * CHR_WINDOW + (addr as usize & (CHR_WINDOW - 1))) % self.cart.chr_len()
    }
}

impl Mapper for Cnrom {
    fn name(&self) -> &'static str {
        "CNROM"
    }

    fn cartridge(&self) -> &Cartridge {
        &self.cart
    }

    fn cartridge_mut(&mut self) -> &mut Cartridge {
        &mut self.cart
    }

    fn read(&self, addr: u16) -> u8 {
        match addr {
            0x0000..=0x1FFF => self.cart.read_chr(self.chr_index(addr)),
            0x6000..=0x7FFF => self.cart.read_sram(addr as usize - 0x6000),
            0x8000..=0xFFFF => {
                let rel = (addr - 0x8000) as usize;
                self.cart.read_prg(rel % self.cart.prg_len())
            }
            _ => {
                tracing::warn!("Unhandled CNROM read at ${addr:04X}");
                0
            }
        }
    }

    fn write(&mut self, addr: u16, value: u8) {
        match addr {
            0x0000..=0x1FFF => {
                if self.cart.chr_is_ram() {
                    let at = self.chr_index(addr);
                    self.cart.write_chr(at, value);
                }
            }
            0x6000..=0x7FFF => self.cart.write_sram(addr as usize - 0x6000, value),
            0x8000..=0xFFFF => self.select(value),
            _ => tracing::warn!("Unhandled CNROM write at ${addr:04X}"),
        }
    }

    fn write_register(&mut self, reg: &str, value: u8) -> Result<(), MapperError> {
        if reg != "chr_bank" {
            register_port(reg)?;
        }
        self.select(value);
        Ok(())
    }

    fn describe(&self) -> String {
        format!(
            "chr_bank={:02x} of {}\n# chr offsets = 0x{:05x}",
            self.chr_bank,
            self.chr_bank_count,
            self.chr_bank * CHR_WINDOW
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cartridge::PRG_BANK_SIZE;

    fn cart() -> Cartridge {
        let mut prg = vec![0; PRG_BANK_SIZE];
        prg[0] = 0xAB;
        let mut chr = vec![0; 4 * CHR_WINDOW];
        for (i, chunk) in chr.chunks_mut(CHR_WINDOW).enumerate() {
            chunk.fill(0xD0 | i as u8);
        }
        Cartridge::new(prg, chr).unwrap()
    }

    #[test]
    fn test_prg_16k_is_mirrored() {
        let m = Cnrom::new(cart());
        assert_eq!(m.read(0x8000), 0xAB);
        assert_eq!(m.read(0xC000), 0xAB);
    }

    #[test]
    fn test_chr_bank_switch_wraps() {
        let mut m = Cnrom::new(cart());
        assert_eq!(m.read(0x0000), 0xD0);
        m.write(0x8000, 2);
        assert_eq!(m.read(0x1FFF), 0xD2);
        m.write(0xFFFF, 5);
        assert_eq!(m.chr_bank(), 1);
    }

    #[test]
    fn test_chr_rom_is_read_only() {
        let mut m = Cnrom::new(cart());
        m.write(0x0010, 0x00);
        assert_eq!(m.read(0x0010), 0xD0);
    }
}
