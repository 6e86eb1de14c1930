//! # Opcode Table
//!
//! This module contains the complete 256-entry opcode table that serves as the
//! single source of truth for all 6502 instruction information. The interpreter,
//! the disassembler and the assembler all index into this one table, so any change
//! to a mode assignment here changes what all three agree on.
//!
//! The table covers:
//! - **151 documented instructions** - Official NMOS 6502 opcodes
//! - **105 illegal/undocumented opcodes** - Marked with the `"???"` mnemonic and a
//!   size of 0
//!
//! Each entry includes:
//! - Mnemonic (instruction name)
//! - Addressing mode
//! - Instruction size in bytes (0 marks an illegal opcode)
//! - Base cycle cost
//! - Extra cycles charged when indexing crosses a page boundary
//!
//! Cycle values on illegal entries are placeholders carried over from the
//! neighbouring legal encodings; the interpreter charges them but they are not
//! authoritative hardware timings.

use crate::addressing::AddressingMode;

/// Metadata for a single 6502 opcode.
///
/// # Examples
///
/// ```
/// use nes6502::{OPCODE_TABLE, AddressingMode};
///
/// // Look up LDA immediate (opcode 0xA9)
/// let lda_imm = &OPCODE_TABLE[0xA9];
/// assert_eq!(lda_imm.mnemonic, "LDA");
/// assert_eq!(lda_imm.mode, AddressingMode::Immediate);
/// assert_eq!(lda_imm.cycles, 2);
/// assert_eq!(lda_imm.size, 2);
/// assert!(lda_imm.is_legal());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OpcodeInfo {
    /// Instruction mnemonic (e.g., "LDA", "STA", "???" for illegal opcodes).
    pub mnemonic: &'static str,

    /// Addressing mode for this instruction.
    pub mode: AddressingMode,

    /// Total instruction size in bytes (opcode + operands), 0 for illegal opcodes.
    pub size: u8,

    /// Base cycle cost (before page crossing and branch penalties).
    pub cycles: u8,

    /// Extra cycles charged when the indexed address lands on another page.
    pub page_cycles: u8,
}

impl OpcodeInfo {
    /// Returns true for the 151 documented opcodes.
    pub const fn is_legal(&self) -> bool {
        self.size != 0
    }

    /// Number of bytes the interpreter and disassembler advance past this opcode.
    ///
    /// Illegal opcodes advance by a single byte.
    pub const fn advance(&self) -> u16 {
        if self.size == 0 {
            1
        } else {
            self.size as u16
        }
    }
}

const fn op(
    mnemonic: &'static str,
    mode: AddressingMode,
    size: u8,
    cycles: u8,
    page_cycles: u8,
) -> OpcodeInfo {
    OpcodeInfo {
        mnemonic,
        mode,
        size,
        cycles,
        page_cycles,
    }
}

const fn illegal(mode: AddressingMode, cycles: u8, page_cycles: u8) -> OpcodeInfo {
    op("???", mode, 0, cycles, page_cycles)
}

use AddressingMode::*;

/// Complete 256-entry opcode table indexed by opcode byte value.
///
/// # Examples
///
/// ```
/// use nes6502::OPCODE_TABLE;
///
/// let brk = &OPCODE_TABLE[0x00];
/// assert_eq!(brk.mnemonic, "BRK");
/// assert_eq!(brk.cycles, 7);
///
/// // Illegal opcodes have a size of zero
/// let illegal = &OPCODE_TABLE[0x02];
/// assert_eq!(illegal.mnemonic, "???");
/// assert_eq!(illegal.size, 0);
/// ```
pub const OPCODE_TABLE: [OpcodeInfo; 256] = [
    // 0x00
    op("BRK", Implied, 1, 7, 0),
    op("ORA", IndexedIndirect, 2, 6, 0),
    illegal(Implied, 2, 0),
    illegal(IndexedIndirect, 8, 0),
    illegal(ZeroPage, 3, 0),
    op("ORA", ZeroPage, 2, 3, 0),
    op("ASL", ZeroPage, 2, 5, 0),
    illegal(ZeroPage, 5, 0),
    op("PHP", Implied, 1, 3, 0),
    op("ORA", Immediate, 2, 2, 0),
    op("ASL", Accumulator, 1, 2, 0),
    illegal(Immediate, 2, 0),
    illegal(Absolute, 4, 0),
    op("ORA", Absolute, 3, 4, 0),
    op("ASL", Absolute, 3, 6, 0),
    illegal(Absolute, 6, 0),
    // 0x10
    op("BPL", Relative, 2, 2, 1),
    op("ORA", IndirectIndexed, 2, 5, 1),
    illegal(Implied, 2, 0),
    illegal(IndirectIndexed, 8, 0),
    illegal(ZeroPageX, 4, 0),
    op("ORA", ZeroPageX, 2, 4, 0),
    op("ASL", ZeroPageX, 2, 6, 0),
    illegal(ZeroPageX, 6, 0),
    op("CLC", Implied, 1, 2, 0),
    op("ORA", AbsoluteY, 3, 4, 1),
    illegal(Implied, 2, 0),
    illegal(AbsoluteY, 7, 0),
    illegal(AbsoluteX, 4, 1),
    op("ORA", AbsoluteX, 3, 4, 1),
    op("ASL", AbsoluteX, 3, 7, 0),
    illegal(AbsoluteX, 7, 0),
    // 0x20
    op("JSR", Absolute, 3, 6, 0),
    op("AND", IndexedIndirect, 2, 6, 0),
    illegal(Implied, 2, 0),
    illegal(IndexedIndirect, 8, 0),
    op("BIT", ZeroPage, 2, 3, 0),
    op("AND", ZeroPage, 2, 3, 0),
    op("ROL", ZeroPage, 2, 5, 0),
    illegal(ZeroPage, 5, 0),
    op("PLP", Implied, 1, 4, 0),
    op("AND", Immediate, 2, 2, 0),
    op("ROL", Accumulator, 1, 2, 0),
    illegal(Immediate, 2, 0),
    op("BIT", Absolute, 3, 4, 0),
    op("AND", Absolute, 3, 4, 0),
    op("ROL", Absolute, 3, 6, 0),
    illegal(Absolute, 6, 0),
    // 0x30
    op("BMI", Relative, 2, 2, 1),
    op("AND", IndirectIndexed, 2, 5, 1),
    illegal(Implied, 2, 0),
    illegal(IndirectIndexed, 8, 0),
    illegal(ZeroPageX, 4, 0),
    op("AND", ZeroPageX, 2, 4, 0),
    op("ROL", ZeroPageX, 2, 6, 0),
    illegal(ZeroPageX, 6, 0),
    op("SEC", Implied, 1, 2, 0),
    op("AND", AbsoluteY, 3, 4, 1),
    illegal(Implied, 2, 0),
    illegal(AbsoluteY, 7, 0),
    illegal(AbsoluteX, 4, 1),
    op("AND", AbsoluteX, 3, 4, 1),
    op("ROL", AbsoluteX, 3, 7, 0),
    illegal(AbsoluteX, 7, 0),
    // 0x40
    op("RTI", Implied, 1, 6, 0),
    op("EOR", IndexedIndirect, 2, 6, 0),
    illegal(Implied, 2, 0),
    illegal(IndexedIndirect, 8, 0),
    illegal(ZeroPage, 3, 0),
    op("EOR", ZeroPage, 2, 3, 0),
    op("LSR", ZeroPage, 2, 5, 0),
    illegal(ZeroPage, 5, 0),
    op("PHA", Implied, 1, 3, 0),
    op("EOR", Immediate, 2, 2, 0),
    op("LSR", Accumulator, 1, 2, 0),
    illegal(Immediate, 2, 0),
    op("JMP", Absolute, 3, 3, 0),
    op("EOR", Absolute, 3, 4, 0),
    op("LSR", Absolute, 3, 6, 0),
    illegal(Absolute, 6, 0),
    // 0x50
    op("BVC", Relative, 2, 2, 1),
    op("EOR", IndirectIndexed, 2, 5, 1),
    illegal(Implied, 2, 0),
    illegal(IndirectIndexed, 8, 0),
    illegal(ZeroPageX, 4, 0),
    op("EOR", ZeroPageX, 2, 4, 0),
    op("LSR", ZeroPageX, 2, 6, 0),
    illegal(ZeroPageX, 6, 0),
    op("CLI", Implied, 1, 2, 0),
    op("EOR", AbsoluteY, 3, 4, 1),
    illegal(Implied, 2, 0),
    illegal(AbsoluteY, 7, 0),
    illegal(AbsoluteX, 4, 1),
    op("EOR", AbsoluteX, 3, 4, 1),
    op("LSR", AbsoluteX, 3, 7, 0),
    illegal(AbsoluteX, 7, 0),
    // 0x60
    op("RTS", Implied, 1, 6, 0),
    op("ADC", IndexedIndirect, 2, 6, 0),
    illegal(Implied, 2, 0),
    illegal(IndexedIndirect, 8, 0),
    illegal(ZeroPage, 3, 0),
    op("ADC", ZeroPage, 2, 3, 0),
    op("ROR", ZeroPage, 2, 5, 0),
    illegal(ZeroPage, 5, 0),
    op("PLA", Implied, 1, 4, 0),
    op("ADC", Immediate, 2, 2, 0),
    op("ROR", Accumulator, 1, 2, 0),
    illegal(Immediate, 2, 0),
    op("JMP", Indirect, 3, 5, 0),
    op("ADC", Absolute, 3, 4, 0),
    op("ROR", Absolute, 3, 6, 0),
    illegal(Absolute, 6, 0),
    // 0x70
    op("BVS", Relative, 2, 2, 1),
    op("ADC", IndirectIndexed, 2, 5, 1),
    illegal(Implied, 2, 0),
    illegal(IndirectIndexed, 8, 0),
    illegal(ZeroPageX, 4, 0),
    op("ADC", ZeroPageX, 2, 4, 0),
    op("ROR", ZeroPageX, 2, 6, 0),
    illegal(ZeroPageX, 6, 0),
    op("SEI", Implied, 1, 2, 0),
    op("ADC", AbsoluteY, 3, 4, 1),
    illegal(Implied, 2, 0),
    illegal(AbsoluteY, 7, 0),
    illegal(AbsoluteX, 4, 1),
    op("ADC", AbsoluteX, 3, 4, 1),
    op("ROR", AbsoluteX, 3, 7, 0),
    illegal(AbsoluteX, 7, 0),
    // 0x80
    illegal(Immediate, 2, 0),
    op("STA", IndexedIndirect, 2, 6, 0),
    illegal(Immediate, 2, 0),
    illegal(IndexedIndirect, 6, 0),
    op("STY", ZeroPage, 2, 3, 0),
    op("STA", ZeroPage, 2, 3, 0),
    op("STX", ZeroPage, 2, 3, 0),
    illegal(ZeroPage, 3, 0),
    op("DEY", Implied, 1, 2, 0),
    illegal(Immediate, 2, 0),
    op("TXA", Implied, 1, 2, 0),
    illegal(Immediate, 2, 0),
    op("STY", Absolute, 3, 4, 0),
    op("STA", Absolute, 3, 4, 0),
    op("STX", Absolute, 3, 4, 0),
    illegal(Absolute, 4, 0),
    // 0x90
    op("BCC", Relative, 2, 2, 1),
    op("STA", IndirectIndexed, 2, 6, 0),
    illegal(Implied, 2, 0),
    illegal(IndirectIndexed, 6, 0),
    op("STY", ZeroPageX, 2, 4, 0),
    op("STA", ZeroPageX, 2, 4, 0),
    op("STX", ZeroPageY, 2, 4, 0),
    illegal(ZeroPageY, 4, 0),
    op("TYA", Implied, 1, 2, 0),
    op("STA", AbsoluteY, 3, 5, 0),
    op("TXS", Implied, 1, 2, 0),
    illegal(AbsoluteY, 5, 0),
    illegal(AbsoluteX, 5, 0),
    op("STA", AbsoluteX, 3, 5, 0),
    illegal(AbsoluteY, 5, 0),
    illegal(AbsoluteY, 5, 0),
    // 0xA0
    op("LDY", Immediate, 2, 2, 0),
    op("LDA", IndexedIndirect, 2, 6, 0),
    op("LDX", Immediate, 2, 2, 0),
    illegal(IndexedIndirect, 6, 0),
    op("LDY", ZeroPage, 2, 3, 0),
    op("LDA", ZeroPage, 2, 3, 0),
    op("LDX", ZeroPage, 2, 3, 0),
    illegal(ZeroPage, 3, 0),
    op("TAY", Implied, 1, 2, 0),
    op("LDA", Immediate, 2, 2, 0),
    op("TAX", Implied, 1, 2, 0),
    illegal(Immediate, 2, 0),
    op("LDY", Absolute, 3, 4, 0),
    op("LDA", Absolute, 3, 4, 0),
    op("LDX", Absolute, 3, 4, 0),
    illegal(Absolute, 4, 0),
    // 0xB0
    op("BCS", Relative, 2, 2, 1),
    op("LDA", IndirectIndexed, 2, 5, 1),
    illegal(Implied, 2, 0),
    illegal(IndirectIndexed, 5, 1),
    op("LDY", ZeroPageX, 2, 4, 0),
    op("LDA", ZeroPageX, 2, 4, 0),
    op("LDX", ZeroPageY, 2, 4, 0),
    illegal(ZeroPageY, 4, 0),
    op("CLV", Implied, 1, 2, 0),
    op("LDA", AbsoluteY, 3, 4, 1),
    op("TSX", Implied, 1, 2, 0),
    illegal(AbsoluteY, 4, 1),
    op("LDY", AbsoluteX, 3, 4, 1),
    op("LDA", AbsoluteX, 3, 4, 1),
    op("LDX", AbsoluteY, 3, 4, 1),
    illegal(AbsoluteY, 4, 1),
    // 0xC0
    op("CPY", Immediate, 2, 2, 0),
    op("CMP", IndexedIndirect, 2, 6, 0),
    illegal(Immediate, 2, 0),
    illegal(IndexedIndirect, 8, 0),
    op("CPY", ZeroPage, 2, 3, 0),
    op("CMP", ZeroPage, 2, 3, 0),
    op("DEC", ZeroPage, 2, 5, 0),
    illegal(ZeroPage, 5, 0),
    op("INY", Implied, 1, 2, 0),
    op("CMP", Immediate, 2, 2, 0),
    op("DEX", Implied, 1, 2, 0),
    illegal(Immediate, 2, 0),
    op("CPY", Absolute, 3, 4, 0),
    op("CMP", Absolute, 3, 4, 0),
    op("DEC", Absolute, 3, 6, 0),
    illegal(Absolute, 6, 0),
    // 0xD0
    op("BNE", Relative, 2, 2, 1),
    op("CMP", IndirectIndexed, 2, 5, 1),
    illegal(Implied, 2, 0),
    illegal(IndirectIndexed, 8, 0),
    illegal(ZeroPageX, 4, 0),
    op("CMP", ZeroPageX, 2, 4, 0),
    op("DEC", ZeroPageX, 2, 6, 0),
    illegal(ZeroPageX, 6, 0),
    op("CLD", Implied, 1, 2, 0),
    op("CMP", AbsoluteY, 3, 4, 1),
    illegal(Implied, 2, 0),
    illegal(AbsoluteY, 7, 0),
    illegal(AbsoluteX, 4, 1),
    op("CMP", AbsoluteX, 3, 4, 1),
    op("DEC", AbsoluteX, 3, 7, 0),
    illegal(AbsoluteX, 7, 0),
    // 0xE0
    op("CPX", Immediate, 2, 2, 0),
    op("SBC", IndexedIndirect, 2, 6, 0),
    illegal(Immediate, 2, 0),
    illegal(IndexedIndirect, 8, 0),
    op("CPX", ZeroPage, 2, 3, 0),
    op("SBC", ZeroPage, 2, 3, 0),
    op("INC", ZeroPage, 2, 5, 0),
    illegal(ZeroPage, 5, 0),
    op("INX", Implied, 1, 2, 0),
    op("SBC", Immediate, 2, 2, 0),
    op("NOP", Implied, 1, 2, 0),
    illegal(Immediate, 2, 0),
    op("CPX", Absolute, 3, 4, 0),
    op("SBC", Absolute, 3, 4, 0),
    op("INC", Absolute, 3, 6, 0),
    illegal(Absolute, 6, 0),
    // 0xF0
    op("BEQ", Relative, 2, 2, 1),
    op("SBC", IndirectIndexed, 2, 5, 1),
    illegal(Implied, 2, 0),
    illegal(IndirectIndexed, 8, 0),
    illegal(ZeroPageX, 4, 0),
    op("SBC", ZeroPageX, 2, 4, 0),
    op("INC", ZeroPageX, 2, 6, 0),
    illegal(ZeroPageX, 6, 0),
    op("SED", Implied, 1, 2, 0),
    op("SBC", AbsoluteY, 3, 4, 1),
    illegal(Implied, 2, 0),
    illegal(AbsoluteY, 7, 0),
    illegal(AbsoluteX, 4, 1),
    op("SBC", AbsoluteX, 3, 4, 1),
    op("INC", AbsoluteX, 3, 7, 0),
    illegal(AbsoluteX, 7, 0),
];

/// Iterates `(opcode, info)` over the documented opcodes.
pub fn legal_opcodes() -> impl Iterator<Item = (u8, &'static OpcodeInfo)> {
    OPCODE_TABLE
        .iter()
        .enumerate()
        .filter(|(_, info)| info.is_legal())
        .map(|(i, info)| (i as u8, info))
}

/// Finds the opcode byte for a mnemonic/mode pair, if the 6502 encodes one.
///
/// ```
/// use nes6502::{opcodes::find_opcode, AddressingMode};
///
/// assert_eq!(find_opcode("STA", AddressingMode::Absolute), Some(0x8D));
/// assert_eq!(find_opcode("STA", AddressingMode::Immediate), None);
/// ```
pub fn find_opcode(mnemonic: &str, mode: AddressingMode) -> Option<u8> {
    legal_opcodes()
        .find(|(_, info)| info.mode == mode && info.mnemonic.eq_ignore_ascii_case(mnemonic))
        .map(|(opcode, _)| opcode)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_legal_opcode_count() {
        assert_eq!(legal_opcodes().count(), 151);
    }

    #[test]
    fn test_size_matches_mode_for_legal_opcodes() {
        for (opcode, info) in legal_opcodes() {
            assert_eq!(
                info.size,
                1 + info.mode.operand_len(),
                "opcode 0x{:02X} ({})",
                opcode,
                info.mnemonic
            );
        }
    }

    #[test]
    fn test_illegal_opcodes_advance_one_byte() {
        for info in OPCODE_TABLE.iter().filter(|info| !info.is_legal()) {
            assert_eq!(info.mnemonic, "???");
            assert_eq!(info.advance(), 1);
        }
    }

    #[test]
    fn test_page_penalty_only_on_indexed_reads() {
        // Stores and read-modify-write never pay the page penalty
        assert_eq!(OPCODE_TABLE[0x9D].page_cycles, 0); // STA abs,X
        assert_eq!(OPCODE_TABLE[0x91].page_cycles, 0); // STA (zp),Y
        assert_eq!(OPCODE_TABLE[0xFE].page_cycles, 0); // INC abs,X
        assert_eq!(OPCODE_TABLE[0xBD].page_cycles, 1); // LDA abs,X
        assert_eq!(OPCODE_TABLE[0xB1].page_cycles, 1); // LDA (zp),Y
    }

    #[test]
    fn test_find_opcode() {
        assert_eq!(find_opcode("jmp", AddressingMode::Indirect), Some(0x6C));
        assert_eq!(find_opcode("ASL", AddressingMode::Accumulator), Some(0x0A));
        assert_eq!(find_opcode("NOP", AddressingMode::Implied), Some(0xEA));
        assert_eq!(find_opcode("???", AddressingMode::Implied), None);
    }
}
