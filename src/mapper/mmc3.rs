//! MMC3 (mapper 4).
//!
//! - PRG: four 8K windows. Mode 0 is `[R6, R7, -2, -1]`, mode 1 swaps R6 and
//!   the second-to-last bank: `[-2, R7, R6, -1]`.
//! - CHR: eight 1K windows. R0/R1 select 2K pairs, R2-R5 select 1K banks;
//!   CHR mode 1 swaps the two 4K halves.
//! - Mirroring register at $A000 (even): 0 vertical, 1 horizontal.
//! - Scanline IRQ counter: $C000 sets the reload value, $C001 clears the
//!   counter, $E000 disables and acknowledges, $E001 enables.

use crate::cartridge::{Cartridge, Mirroring};
use crate::mapper::{offsets_line, register_offset, register_port, tail_offset, Mapper};
use crate::MapperError;

const PRG_WINDOW: usize = 0x2000;
const CHR_WINDOW: usize = 0x0400;

#[derive(Debug, Clone)]
pub struct Mmc3 {
    cart: Cartridge,

    register: u8,
    registers: [u8; 8],
    prg_mode: u8,
    chr_mode: u8,

    reload: u8,
    counter: u8,
    irq_enabled: bool,
    irq_line: bool,

    prg_offset: [usize; 4],
    chr_offset: [usize; 8],
}

impl Mmc3 {
    pub fn new(cart: Cartridge) -> Self {
        let mut m = Self {
            cart,
            register: 0,
            registers: [0; 8],
            prg_mode: 0,
            chr_mode: 0,
            reload: 0,
            counter: 0,
            irq_enabled: false,
            irq_line: false,
            prg_offset: [0; 4],
            chr_offset: [0; 8],
        };
        m.registers[7] = 1;
        m.update_offsets();
        m
    }

    pub fn prg_offsets(&self) -> [usize; 4] {
        self.prg_offset
    }

    pub fn chr_offsets(&self) -> [usize; 8] {
        self.chr_offset
    }

    pub fn counter(&self) -> u8 {
        self.counter
    }

    fn prg(&self, index: u8) -> usize {
        register_offset(index, PRG_WINDOW, self.cart.prg_len())
    }

    fn prg_tail(&self, from_end: i32) -> usize {
        tail_offset(from_end, PRG_WINDOW, self.cart.prg_len())
    }

    fn chr(&self, index: u8) -> usize {
        register_offset(index, CHR_WINDOW, self.cart.chr_len())
    }

    fn update_offsets(&mut self) {
        let r = self.registers;
        self.prg_offset = match self.prg_mode {
            0 => [self.prg(r[6]), self.prg(r[7]), self.prg_tail(-2), self.prg_tail(-1)],
            _ => [self.prg_tail(-2), self.prg(r[7]), self.prg(r[6]), self.prg_tail(-1)],
        };
        let pairs = [
            self.chr(r[0] & 0xFE),
            self.chr(r[0] | 0x01),
            self.chr(r[1] & 0xFE),
            self.chr(r[1] | 0x01),
        ];
        let singles = [self.chr(r[2]), self.chr(r[3]), self.chr(r[4]), self.chr(r[5])];
        let (lo, hi) = match self.chr_mode {
            0 => (pairs, singles),
            _ => (singles, pairs),
        };
        self.chr_offset[..4].copy_from_slice(&lo);
        self.chr_offset[4..].copy_from_slice(&hi);
    }

    fn write_bank_select(&mut self, value: u8) {
        self.prg_mode = (value >> 6) & 1;
        self.chr_mode = (value >> 7) & 1;
        self.register = value & 7;
    }

    fn commit(&mut self, addr: u16, value: u8) {
        let even = addr & 1 == 0;
        match addr {
            0x8000..=0x9FFF => {
                if even {
                    self.write_bank_select(value);
                } else {
                    self.registers[self.register as usize] = value;
                }
                self.update_offsets();
            }
            0xA000..=0xBFFF => {
                if even {
                    self.cart.set_mirroring(if value & 1 == 0 {
                        Mirroring::Vertical
                    } else {
                        Mirroring::Horizontal
                    });
                }
            }
            0xC000..=0xDFFF => {
                if even {
                    self.reload = value;
                } else {
                    self.counter = 0;
                }
            }
            _ => {
                self.irq_enabled = !even;
                if even {
                    self.irq_line = false;
                }
            }
        }
        tracing::debug!("MMC3 register ${addr:04X} <- {value:02x}");
    }
}

impl Mapper for Mmc3 {
    fn name(&self) -> &'static str {
        "MMC3"
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
                let a = addr as usize;
                self.cart
                    .read_chr(self.chr_offset[a / CHR_WINDOW] + a % CHR_WINDOW)
            }
            0x6000..=0x7FFF => self.cart.read_sram(addr as usize - 0x6000),
            0x8000..=0xFFFF => {
                let a = addr as usize - 0x8000;
                self.cart
                    .read_prg(self.prg_offset[a / PRG_WINDOW] + a % PRG_WINDOW)
            }
            _ => {
                tracing::warn!("Unhandled MMC3 read at ${addr:04X}");
                0
            }
        }
    }

    fn write(&mut self, addr: u16, value: u8) {
        match addr {
            0x0000..=0x1FFF => {
                let a = addr as usize;
                let at = self.chr_offset[a / CHR_WINDOW] + a % CHR_WINDOW;
                self.cart.write_chr(at, value);
            }
            0x6000..=0x7FFF => self.cart.write_sram(addr as usize - 0x6000, value),
            0x8000..=0xFFFF => self.commit(addr, value),
            _ => tracing::warn!("Unhandled MMC3 write at ${addr:04X}"),
        }
    }

    fn write_register(&mut self, reg: &str, value: u8) -> Result<(), MapperError> {
        match reg {
            "prg_mode" => self.prg_mode = value & 1,
            "chr_mode" => self.chr_mode = value & 1,
            _ => {
                if let Some(i) = reg.strip_prefix('r').and_then(|n| n.parse::<usize>().ok()) {
                    if i < 8 {
                        self.registers[i] = value;
                        self.update_offsets();
                        return Ok(());
                    }
                }
                let addr = register_port(reg)?;
                self.commit(addr, value);
                return Ok(());
            }
        }
        self.update_offsets();
        Ok(())
    }

    fn describe(&self) -> String {
        [
            format!(
                "prg_mode={:02x} chr_mode={:02x} select={} regs={:02x?}",
                self.prg_mode, self.chr_mode, self.register, self.registers
            ),
            offsets_line("prg", &self.prg_offset),
            offsets_line("chr", &self.chr_offset),
            format!(
                "irq reload={:02x} counter={:02x} enabled={} line={}",
                self.reload, self.counter, self.irq_enabled, self.irq_line
            ),
        ]
        .join("\n")
    }

    fn irq_active(&self) -> bool {
        self.irq_line
    }

    fn clock_scanline(&mut self) {
        if self.counter == 0 {
            self.counter = self.reload;
        } else {
            self.counter -= 1;
            if self.counter == 0 && self.irq_enabled {
                self.irq_line = true;
            }
        }
    }
}
