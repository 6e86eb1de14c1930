//! # Processor Status Register
//!
//! The 6502 status register (P) packs seven flags into one byte (NV-BDIZC).
//! Bit 5 is not a real flag: it reads back as 1 whenever the register is pushed.
//! The break bit only exists in pushed copies; `PLP`/`RTI` drop it again.

use bitflags::bitflags;

bitflags! {
    /// Status register bits.
    ///
    /// ```
    /// use nes6502::Status;
    ///
    /// let p = Status::INTERRUPT_DISABLE | Status::UNUSED;
    /// assert_eq!(p.bits(), 0x24);
    /// ```
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct Status: u8 {
        /// Carry / not-borrow
        const CARRY = 0b0000_0001;
        /// Result was zero
        const ZERO = 0b0000_0010;
        /// IRQ masked
        const INTERRUPT_DISABLE = 0b0000_0100;
        /// Decimal mode (stored, never used for arithmetic on the 2A03)
        const DECIMAL = 0b0000_1000;
        /// Set in pushed copies of P
        const BREAK = 0b0001_0000;
        /// Always 1 when pushed
        const UNUSED = 0b0010_0000;
        /// Signed overflow
        const OVERFLOW = 0b0100_0000;
        /// Bit 7 of the result
        const NEGATIVE = 0b1000_0000;
    }
}

impl Status {
    /// Value written to the stack by `PHP`, `BRK` and interrupt entry.
    ///
    /// The unused bit is forced on and the break bit is set.
    pub const fn pushed(self) -> u8 {
        self.bits() | Status::BREAK.bits() | Status::UNUSED.bits()
    }

    /// Status restored by `PLP` and `RTI`: break dropped, unused kept set.
    pub const fn pulled(value: u8) -> Status {
        Status::from_bits_retain((value & !Status::BREAK.bits()) | Status::UNUSED.bits())
    }

    /// Updates Z and N from a result byte.
    #[inline]
    pub fn set_zn(&mut self, value: u8) {
        self.set(Status::ZERO, value == 0);
        self.set(Status::NEGATIVE, value & 0x80 != 0);
    }

    /// Renders the flags as `NVUBDIZC`, upper case for set bits.
    pub fn render(self) -> String {
        const NAMES: [(Status, char); 8] = [
            (Status::NEGATIVE, 'n'),
            (Status::OVERFLOW, 'v'),
            (Status::UNUSED, 'u'),
            (Status::BREAK, 'b'),
            (Status::DECIMAL, 'd'),
            (Status::INTERRUPT_DISABLE, 'i'),
            (Status::ZERO, 'z'),
            (Status::CARRY, 'c'),
        ];
        NAMES
            .iter()
            .map(|&(flag, ch)| {
                if self.contains(flag) {
                    ch.to_ascii_uppercase()
                } else {
                    ch
                }
            })
            .collect()
    }
}
