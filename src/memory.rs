//! # Memory Bus Abstraction
//!
//! The CPU never touches storage directly. Every fetch, operand read and store
//! goes through [`MemoryBus`], so the same interpreter runs over a flat 64KB
//! array in tests or over a bank-switched cartridge
//! ([`BankView`](crate::mapper::BankView)) in the console.
//!
//! Reads take `&self`. A mapper's side effects live on the write path (the
//! MMC1 serial port, MMC3 bank select), so a read never needs to mutate.

/// Byte-addressed view of the 16-bit CPU address space.
///
/// # Examples
///
/// ```
/// use nes6502::{FlatMemory, MemoryBus};
///
/// let mut mem = FlatMemory::new();
/// mem.write(0x1234, 0x42);
/// assert_eq!(mem.read(0x1234), 0x42);
/// ```
///
/// ## Implementing Custom Memory
///
/// ```
/// use nes6502::MemoryBus;
///
/// struct RamOverRom {
///     ram: [u8; 0x0800],
///     rom: Vec<u8>,
/// }
///
/// impl MemoryBus for RamOverRom {
///     fn read(&self, addr: u16) -> u8 {
///         match addr {
///             0x0000..=0x1FFF => self.ram[(addr & 0x07FF) as usize],
///             0x8000..=0xFFFF => self.rom[(addr as usize - 0x8000) % self.rom.len()],
///             _ => 0,
///         }
///     }
///
///     fn write(&mut self, addr: u16, value: u8) {
///         if addr < 0x2000 {
///             self.ram[(addr & 0x07FF) as usize] = value;
///         }
///     }
/// }
/// ```
pub trait MemoryBus {
    /// Reads a byte. Must never panic; unmapped addresses may return anything.
    fn read(&self, addr: u16) -> u8;

    /// Writes a byte. Writes to read-only or unmapped space may be dropped.
    fn write(&mut self, addr: u16, value: u8);

    /// Level of the shared IRQ line.
    ///
    /// Sampled by the CPU before every instruction. Memory without
    /// interrupt-capable hardware keeps the default.
    fn irq_active(&self) -> bool {
        false
    }

    /// Reads a little-endian word. The high byte address wraps at $FFFF.
    fn read_word(&self, addr: u16) -> u16 {
        let lo = self.read(addr) as u16;
        let hi = self.read(addr.wrapping_add(1)) as u16;
        (hi << 8) | lo
    }
}

impl<T: MemoryBus + ?Sized> MemoryBus for &mut T {
    fn read(&self, addr: u16) -> u8 {
        (**self).read(addr)
    }

    fn write(&mut self, addr: u16, value: u8) {
        (**self).write(addr, value)
    }

    fn irq_active(&self) -> bool {
        (**self).irq_active()
    }
}

/// Simple 64KB flat memory.
///
/// Every address is writable RAM, initialised to zero.
///
/// ```
/// use nes6502::{Cpu, FlatMemory, MemoryBus};
///
/// let mut memory = FlatMemory::new();
/// memory.write(0xFFFC, 0x00);
/// memory.write(0xFFFD, 0x80);
///
/// let cpu = Cpu::new(memory);
/// assert_eq!(cpu.pc(), 0x8000);
/// ```
pub struct FlatMemory {
    data: Box<[u8; 65536]>,
}

impl FlatMemory {
    pub fn new() -> Self {
        Self {
            data: Box::new([0; 65536]),
        }
    }

    /// Copies `bytes` into memory starting at `origin`, wrapping at $FFFF.
    pub fn load(&mut self, origin: u16, bytes: &[u8]) {
        let mut addr = origin;
        for &b in bytes {
            self.data[addr as usize] = b;
            addr = addr.wrapping_add(1);
        }
    }
}

impl Default for FlatMemory {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryBus for FlatMemory {
    fn read(&self, addr: u16) -> u8 {
        self.data[addr as usize]
    }

    fn write(&mut self, addr: u16, value: u8) {
        self.data[addr as usize] = value;
    }
}
