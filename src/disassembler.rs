//! 6502 Disassembler Module
//!
//! Turns machine code back into text, one instruction per line:
//!
//! ```text
//! 8000: A9 05    LDA #$05
//! 8002: D0 FC    BNE #$FC ;[dest=$8000]
//! 8004: 02       .DB $02
//! ```
//!
//! Every line reassembles to the same bytes with [`crate::assembler`]. Branch
//! displacements are written in the assembler's raw `#disp` form with the
//! resolved target appended as a comment, and illegal opcodes as `.DB`.

pub mod decoder;
pub mod formatter;

use crate::addressing::AddressingMode;
use crate::memory::MemoryBus;

/// A single disassembled instruction.
#[derive(Debug, Clone, PartialEq)]
pub struct Instruction {
    /// Memory address where this instruction starts
    pub address: u16,

    /// The opcode byte value (0x00-0xFF)
    pub opcode: u8,

    /// Instruction mnemonic (e.g., "LDA", "STA", "JMP"), `".DB"` for illegal opcodes
    pub mnemonic: &'static str,

    /// Addressing mode used by this instruction
    pub mode: AddressingMode,

    /// Operand bytes (0-2 bytes depending on addressing mode)
    pub operand_bytes: Vec<u8>,

    /// Bytes the cursor advances past (1-3)
    pub size: u8,

    /// Base cycle cost (excluding page-crossing and branch penalties)
    pub cycles: u8,
}

impl Instruction {
    pub fn is_legal(&self) -> bool {
        self.mnemonic != decoder::ILLEGAL_MNEMONIC
    }

    /// Operand bytes as a little-endian value.
    pub fn operand(&self) -> u16 {
        match self.operand_bytes.as_slice() {
            [lo] => *lo as u16,
            [lo, hi] => u16::from_le_bytes([*lo, *hi]),
            _ => 0,
        }
    }

    /// Destination of a relative branch.
    pub fn branch_target(&self) -> Option<u16> {
        if self.mode != AddressingMode::Relative {
            return None;
        }
        let displacement = *self.operand_bytes.first()? as i8;
        Some(
            self.address
                .wrapping_add(self.size as u16)
                .wrapping_add(displacement as u16),
        )
    }

    /// Raw bytes: opcode followed by operands.
    pub fn bytes(&self) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(self.size as usize);
        bytes.push(self.opcode);
        bytes.extend_from_slice(&self.operand_bytes);
        bytes
    }
}

/// Disassembles the instruction at `*cursor` and advances the cursor past it.
///
/// ```
/// use nes6502::{disassembler, FlatMemory};
///
/// let mut memory = FlatMemory::new();
/// memory.load(0x8000, &[0xAD, 0x34, 0x12]);
///
/// let mut cursor = 0x8000;
/// let line = disassembler::disassemble(&memory, &mut cursor);
/// assert_eq!(line, "8000: AD 34 12 LDA $1234");
/// assert_eq!(cursor, 0x8003);
/// ```
pub fn disassemble<B: MemoryBus + ?Sized>(bus: &B, cursor: &mut u16) -> String {
    let instr = decoder::decode_at(bus, *cursor);
    *cursor = cursor.wrapping_add(instr.size as u16);
    formatter::format_line(&instr)
}

/// Disassembles `count` consecutive instructions starting at `start`.
pub fn disassemble_range<B: MemoryBus + ?Sized>(bus: &B, start: u16, count: usize) -> Vec<String> {
    let mut cursor = start;
    (0..count).map(|_| disassemble(bus, &mut cursor)).collect()
}

/// Disassembles a byte slice loaded at `origin`.
///
/// An instruction cut short by the end of the slice is emitted as `.DB`
/// bytes.
pub fn disassemble_bytes(bytes: &[u8], origin: u16) -> Vec<Instruction> {
    let mut instructions = Vec::new();
    let mut pos = 0;
    let mut address = origin;

    while pos < bytes.len() {
        let instr = decoder::decode_instruction(&bytes[pos..], address)
            .unwrap_or_else(|| decoder::raw_byte(bytes[pos], address));
        pos += instr.size as usize;
        address = address.wrapping_add(instr.size as u16);
        instructions.push(instr);
    }

    instructions
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::FlatMemory;

    #[test]
    fn test_disassemble_empty() {
        assert!(disassemble_bytes(&[], 0x8000).is_empty());
    }

    #[test]
    fn test_disassemble_bytes_sequence() {
        let instrs = disassemble_bytes(&[0xA9, 0x05, 0xEA, 0x8D, 0x00], 0x8000);
        let mnemonics: Vec<_> = instrs.iter().map(|i| i.mnemonic).collect();
        assert_eq!(mnemonics, vec!["LDA", "NOP", ".DB", "BRK"]);
        assert_eq!(instrs[2].address, 0x8003);
        assert_eq!(instrs[3].address, 0x8004);
    }

    #[test]
    fn test_cursor_advance() {
        let mut memory = FlatMemory::new();
        memory.load(0x8000, &[0x02, 0xA9, 0x01, 0x4C, 0x00, 0x80]);

        let mut cursor = 0x8000;
        assert_eq!(disassemble(&memory, &mut cursor), "8000: 02       .DB $02");
        assert_eq!(cursor, 0x8001);
        assert_eq!(disassemble(&memory, &mut cursor), "8001: A9 01    LDA #$01");
        assert_eq!(cursor, 0x8003);
        assert_eq!(disassemble(&memory, &mut cursor), "8003: 4C 00 80 JMP $8000");
        assert_eq!(cursor, 0x8006);
    }

    #[test]
    fn test_range() {
        let mut memory = FlatMemory::new();
        memory.load(0x0600, &[0xE8, 0xCA, 0x60]);
        let lines = disassemble_range(&memory, 0x0600, 3);
        assert_eq!(lines[2], "0602: 60       RTS");
    }

    #[test]
    fn test_branch_target() {
        let instr = decoder::decode_instruction(&[0xD0, 0xFC], 0x8002).unwrap();
        assert_eq!(instr.branch_target(), Some(0x8000));
        assert_eq!(instr.bytes(), vec![0xD0, 0xFC]);
    }
}
