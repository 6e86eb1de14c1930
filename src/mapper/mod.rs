//! Mapper subsystem: the bank-switching hardware between the CPU and a cartridge.
//!
//! Every board exposes two views of the same storage:
//!
//! - CPU-visible access at a 16-bit address (`read`/`write`). Writes at $8000+
//!   usually land in the board's control registers rather than in ROM.
//! - Bank-aware access (`read_prg_bank`, `write_chr_bank`, ...) that names a
//!   physical bank directly and ignores whatever is switched in. Tooling uses
//!   this to dump, patch, disassemble and assemble any bank of the ROM.
//!
//! Boards are created by iNES mapper number through [`create`].

use std::collections::BTreeMap;
use std::fmt::Write as _;

use once_cell::sync::Lazy;

use crate::address::Address;
use crate::cartridge::{Cartridge, Mirroring, CHR_BANK_SIZE, PRG_BANK_SIZE};
use crate::{MapperError, MemoryBus};

pub mod cnrom;
pub mod mmc1;
pub mod mmc3;
pub mod uxrom;

pub use cnrom::Cnrom;
pub use mmc1::Mmc1;
pub use mmc3::Mmc3;
pub use uxrom::Uxrom;

/// Common interface of all cartridge boards.
pub trait Mapper {
    /// Short board name (`"MMC1"`, `"UxROM"`, ...).
    fn name(&self) -> &'static str;

    fn cartridge(&self) -> &Cartridge;
    fn cartridge_mut(&mut self) -> &mut Cartridge;

    /// CPU-visible read through the currently switched-in banks.
    fn read(&self, addr: u16) -> u8;

    /// CPU-visible write. Register writes change the banking.
    fn write(&mut self, addr: u16, value: u8);

    /// Reads PRG `bank` (16KB units, negative counts from the end) at `addr & $3FFF`.
    fn read_prg_bank(&self, bank: i32, addr: u16) -> u8 {
        let cart = self.cartridge();
        let base = wrap_bank(bank, cart.prg_banks()) * PRG_BANK_SIZE;
        cart.read_prg(base + (addr as usize & (PRG_BANK_SIZE - 1)))
    }

    fn write_prg_bank(&mut self, bank: i32, addr: u16, value: u8) {
        let cart = self.cartridge_mut();
        let base = wrap_bank(bank, cart.prg_banks()) * PRG_BANK_SIZE;
        cart.write_prg(base + (addr as usize & (PRG_BANK_SIZE - 1)), value);
    }

    /// Reads CHR `bank` (4KB units, negative counts from the end) at `addr & $0FFF`.
    fn read_chr_bank(&self, bank: i32, addr: u16) -> u8 {
        let cart = self.cartridge();
        let base = wrap_bank(bank, cart.chr_banks()) * CHR_BANK_SIZE;
        cart.read_chr(base + (addr as usize & (CHR_BANK_SIZE - 1)))
    }

    fn write_chr_bank(&mut self, bank: i32, addr: u16, value: u8) {
        let cart = self.cartridge_mut();
        let base = wrap_bank(bank, cart.chr_banks()) * CHR_BANK_SIZE;
        cart.write_chr(base + (addr as usize & (CHR_BANK_SIZE - 1)), value);
    }

    fn read_at(&self, addr: Address, offset: u16) -> u8 {
        let a = addr.add(offset);
        self.read_prg_bank(a.bank, a.offset)
    }

    fn read_word(&self, addr: Address, offset: u16) -> u16 {
        let lo = self.read_at(addr, offset) as u16;
        let hi = self.read_at(addr, offset.wrapping_add(1)) as u16;
        (hi << 8) | lo
    }

    /// Follows a stored pointer: same bank, offset read from `addr + offset`.
    fn read_addr(&self, addr: Address, offset: u16) -> Address {
        Address::new(addr.bank, self.read_word(addr, offset))
    }

    fn write_at(&mut self, addr: Address, offset: u16, value: u8) {
        let a = addr.add(offset);
        self.write_prg_bank(a.bank, a.offset, value);
    }

    fn write_word(&mut self, addr: Address, offset: u16, value: u16) {
        self.write_at(addr, offset, value as u8);
        self.write_at(addr, offset.wrapping_add(1), (value >> 8) as u8);
    }

    /// Debug write of a named register, or a raw register port given as a number.
    fn write_register(&mut self, reg: &str, value: u8) -> Result<(), MapperError> {
        let _ = (reg, value);
        Err(MapperError::NotSupported(self.name()))
    }

    /// Human-readable register dump.
    fn describe(&self) -> String {
        format!("{}: no registers", self.name())
    }

    /// Current nametable mirroring.
    fn mirroring(&self) -> Mirroring {
        self.cartridge().mirroring()
    }

    /// Level of the board's IRQ output.
    fn irq_active(&self) -> bool {
        false
    }

    /// One rendered scanline has elapsed (drives scanline counters).
    fn clock_scanline(&mut self) {}
}

impl<T: Mapper + ?Sized> Mapper for Box<T> {
    fn name(&self) -> &'static str {
        (**self).name()
    }
    fn cartridge(&self) -> &Cartridge {
        (**self).cartridge()
    }
    fn cartridge_mut(&mut self) -> &mut Cartridge {
        (**self).cartridge_mut()
    }
    fn read(&self, addr: u16) -> u8 {
        (**self).read(addr)
    }
    fn write(&mut self, addr: u16, value: u8) {
        (**self).write(addr, value)
    }
    fn read_prg_bank(&self, bank: i32, addr: u16) -> u8 {
        (**self).read_prg_bank(bank, addr)
    }
    fn write_prg_bank(&mut self, bank: i32, addr: u16, value: u8) {
        (**self).write_prg_bank(bank, addr, value)
    }
    fn read_chr_bank(&self, bank: i32, addr: u16) -> u8 {
        (**self).read_chr_bank(bank, addr)
    }
    fn write_chr_bank(&mut self, bank: i32, addr: u16, value: u8) {
        (**self).write_chr_bank(bank, addr, value)
    }
    fn write_register(&mut self, reg: &str, value: u8) -> Result<(), MapperError> {
        (**self).write_register(reg, value)
    }
    fn describe(&self) -> String {
        (**self).describe()
    }
    fn mirroring(&self) -> Mirroring {
        (**self).mirroring()
    }
    fn irq_active(&self) -> bool {
        (**self).irq_active()
    }
    fn clock_scanline(&mut self) {
        (**self).clock_scanline()
    }
}

/// Reduces a possibly negative bank number modulo `count`.
#[inline]
pub fn wrap_bank(bank: i32, count: usize) -> usize {
    (bank as i64).rem_euclid(count as i64) as usize
}

/// Byte offset of a bank register value, where values >= $80 count from the end.
///
/// `bank_size` is the window granularity, `len` the total image size.
#[inline]
pub(crate) fn register_offset(index: u8, bank_size: usize, len: usize) -> usize {
    wrap_bank(index as i8 as i32, len / bank_size) * bank_size
}

/// Like [`register_offset`] for a bank counted from the end (`-1` = last).
#[inline]
pub(crate) fn tail_offset(from_end: i32, bank_size: usize, len: usize) -> usize {
    wrap_bank(from_end, len / bank_size) * bank_size
}

/// Resolves a `wm` register argument that is not a register name: a port address.
pub(crate) fn register_port(reg: &str) -> Result<u16, MapperError> {
    crate::address::parse_number(reg)
        .and_then(|n| u16::try_from(n).ok())
        .filter(|&addr| addr >= 0x8000)
        .ok_or_else(|| MapperError::UnknownRegister(reg.to_string()))
}

type Constructor = fn(Cartridge) -> Box<dyn Mapper>;

static REGISTRY: Lazy<BTreeMap<u8, Constructor>> = Lazy::new(|| {
    let mut m: BTreeMap<u8, Constructor> = BTreeMap::new();
    m.insert(0, |c| Box::new(Uxrom::new(c)));
    m.insert(1, |c| Box::new(Mmc1::new(c)));
    m.insert(2, |c| Box::new(Uxrom::new(c)));
    m.insert(3, |c| Box::new(Cnrom::new(c)));
    m.insert(4, |c| Box::new(Mmc3::new(c)));
    m.insert(5, |c| Box::new(Mmc1::new(c)));
    m
});

/// Builds the board for iNES mapper number `id`.
pub fn create(id: u8, cartridge: Cartridge) -> Result<Box<dyn Mapper>, MapperError> {
    let ctor = REGISTRY.get(&id).ok_or(MapperError::Unsupported(id))?;
    Ok(ctor(cartridge))
}

/// Mapper numbers accepted by [`create`].
pub fn supported_ids() -> impl Iterator<Item = u8> {
    REGISTRY.keys().copied()
}

/// CPU address space over a cartridge, pinned to one PRG bank.
///
/// With a bank selected, $8000-$BFFF shows that 16KB bank and $C000-$FFFF
/// shows the last bank, and writes at $8000+ patch the ROM. Without one
/// (`live`), $8000+ goes through the board's own banking and registers.
///
/// $0000-$1FFF is 2KB of work RAM (mirrored) and $6000-$7FFF goes to the board.
pub struct BankView<M: Mapper> {
    mapper: M,
    bank: Option<i32>,
    ram: [u8; 0x800],
}

impl<M: Mapper> BankView<M> {
    /// View pinned to `bank` below $C000.
    pub fn new(mapper: M, bank: i32) -> Self {
        Self {
            mapper,
            bank: Some(bank),
            ram: [0; 0x800],
        }
    }

    /// View that follows the board's live banking.
    pub fn live(mapper: M) -> Self {
        Self {
            mapper,
            bank: None,
            ram: [0; 0x800],
        }
    }

    pub fn bank(&self) -> Option<i32> {
        self.bank
    }

    pub fn set_bank(&mut self, bank: Option<i32>) {
        self.bank = bank;
    }

    pub fn mapper(&self) -> &M {
        &self.mapper
    }

    pub fn mapper_mut(&mut self) -> &mut M {
        &mut self.mapper
    }

    pub fn into_inner(self) -> M {
        self.mapper
    }
}

impl<M: Mapper> MemoryBus for BankView<M> {
    fn read(&self, addr: u16) -> u8 {
        match (addr, self.bank) {
            (0x0000..=0x1FFF, _) => self.ram[(addr & 0x07FF) as usize],
            (0x6000..=0x7FFF, _) => self.mapper.read(addr),
            (0x8000..=0xBFFF, Some(bank)) => self.mapper.read_prg_bank(bank, addr),
            (0xC000..=0xFFFF, Some(_)) => self.mapper.read_prg_bank(-1, addr),
            (0x8000..=0xFFFF, None) => self.mapper.read(addr),
            _ => {
                tracing::warn!(addr = format_args!("${addr:04X}"), "unmapped read");
                0
            }
        }
    }

    fn write(&mut self, addr: u16, value: u8) {
        match (addr, self.bank) {
            (0x0000..=0x1FFF, _) => self.ram[(addr & 0x07FF) as usize] = value,
            (0x6000..=0x7FFF, _) => self.mapper.write(addr, value),
            (0x8000..=0xBFFF, Some(bank)) => self.mapper.write_prg_bank(bank, addr, value),
            (0xC000..=0xFFFF, Some(_)) => self.mapper.write_prg_bank(-1, addr, value),
            (0x8000..=0xFFFF, None) => self.mapper.write(addr, value),
            _ => {
                tracing::warn!(addr = format_args!("${addr:04X}"), value, "unmapped write");
            }
        }
    }

    fn irq_active(&self) -> bool {
        self.mapper.irq_active()
    }
}

/// Formats an offset table for `describe()` output.
pub(crate) fn offsets_line(label: &str, offsets: &[usize]) -> String {
    let mut s = format!("# {label} offsets =");
    for o in offsets {
        let _ = write!(s, " 0x{o:05x}");
    }
    s
}

#[cfg(test)]
mod tests {
    use super::*;

    fn numbered_prg(banks: usize) -> Vec<u8> {
        let mut prg = vec![0; banks * PRG_BANK_SIZE];
        for (i, chunk) in prg.chunks_mut(PRG_BANK_SIZE).enumerate() {
            chunk.fill(i as u8);
        }
        prg
    }

    #[test]
    fn test_wrap_bank() {
        assert_eq!(wrap_bank(-1, 8), 7);
        assert_eq!(wrap_bank(-2, 8), 6);
        assert_eq!(wrap_bank(9, 8), 1);
        assert_eq!(wrap_bank(0, 8), 0);
    }

    #[test]
    fn test_register_offset_treats_high_values_as_negative() {
        assert_eq!(register_offset(0xFF, 0x4000, 0x20000), 7 * 0x4000);
        assert_eq!(register_offset(3, 0x4000, 0x20000), 3 * 0x4000);
        assert_eq!(tail_offset(-2, 0x2000, 0x20000), 14 * 0x2000);
    }

    #[test]
    fn test_registry() {
        let ids: Vec<u8> = supported_ids().collect();
        assert_eq!(ids, vec![0, 1, 2, 3, 4, 5]);
        assert_eq!(create(1, Cartridge::blank(2)).unwrap().name(), "MMC1");
        assert_eq!(create(5, Cartridge::blank(2)).unwrap().name(), "MMC1");
        assert_eq!(create(4, Cartridge::blank(2)).unwrap().name(), "MMC3");
        assert!(matches!(
            create(9, Cartridge::blank(2)),
            Err(MapperError::Unsupported(9))
        ));
    }

    #[test]
    fn test_bank_aware_access_ignores_switching() {
        let cart = Cartridge::new(numbered_prg(8), vec![]).unwrap();
        let mut m = create(1, cart).unwrap();
        assert_eq!(m.read_prg_bank(5, 0x8123), 5);
        assert_eq!(m.read_prg_bank(-1, 0xC000), 7);
        m.write_prg_bank(-1, 0xFFFC, 0xAA);
        assert_eq!(m.cartridge().read_prg(7 * PRG_BANK_SIZE + 0x3FFC), 0xAA);
    }

    #[test]
    fn test_word_helpers() {
        let mut m = create(2, Cartridge::blank(4)).unwrap();
        let at = Address::new(2, 0x8010);
        m.write_word(at, 2, 0xBEEF);
        assert_eq!(m.read_at(at, 2), 0xEF);
        assert_eq!(m.read_at(at, 3), 0xBE);
        assert_eq!(m.read_word(at, 2), 0xBEEF);
        assert_eq!(m.read_addr(at, 2), Address::new(2, 0xBEEF));
    }

    #[test]
    fn test_bank_view_windows() {
        let cart = Cartridge::new(numbered_prg(4), vec![]).unwrap();
        let mut view = BankView::new(create(2, cart).unwrap(), 2);
        assert_eq!(view.read(0x8000), 2);
        assert_eq!(view.read(0xBFFF), 2);
        assert_eq!(view.read(0xC000), 3);

        view.write(0x0801, 0x55);
        assert_eq!(view.read(0x0001), 0x55);

        view.write(0x8000, 0x99);
        assert_eq!(view.mapper().read_prg_bank(2, 0x8000), 0x99);

        view.set_bank(Some(1));
        assert_eq!(view.read(0x8001), 1);
    }

    #[test]
    fn test_live_view_follows_registers() {
        let cart = Cartridge::new(numbered_prg(4), vec![]).unwrap();
        let mut view = BankView::live(create(2, cart).unwrap());
        assert_eq!(view.read(0x8000), 0);
        view.write(0x8000, 2);
        assert_eq!(view.read(0x8000), 2);
        assert_eq!(view.read(0xC000), 3);
    }
}
