//! Instruction decoder for the 6502 disassembler

use crate::addressing::AddressingMode;
use crate::disassembler::Instruction;
use crate::memory::MemoryBus;
use crate::opcodes::OPCODE_TABLE;

/// Mnemonic given to bytes that do not decode to a documented instruction.
pub const ILLEGAL_MNEMONIC: &str = ".DB";

/// Decode a single instruction from a byte slice.
///
/// Returns `None` for an illegal opcode or when the slice is shorter than the
/// instruction.
pub fn decode_instruction(bytes: &[u8], address: u16) -> Option<Instruction> {
    let (&opcode, rest) = bytes.split_first()?;
    let info = &OPCODE_TABLE[opcode as usize];

    if !info.is_legal() {
        return None;
    }

    let operand_len = info.size as usize - 1;
    let operand_bytes = rest.get(..operand_len)?.to_vec();

    Some(Instruction {
        address,
        opcode,
        mnemonic: info.mnemonic,
        mode: info.mode,
        operand_bytes,
        size: info.size,
        cycles: info.cycles,
    })
}

/// Decode the instruction at `address` on a bus. Never fails: illegal
/// opcodes come back as a one-byte `.DB`.
pub fn decode_at<B: MemoryBus + ?Sized>(bus: &B, address: u16) -> Instruction {
    let bytes = [
        bus.read(address),
        bus.read(address.wrapping_add(1)),
        bus.read(address.wrapping_add(2)),
    ];
    decode_instruction(&bytes, address).unwrap_or_else(|| raw_byte(bytes[0], address))
}

pub(crate) fn raw_byte(byte: u8, address: u16) -> Instruction {
    Instruction {
        address,
        opcode: byte,
        mnemonic: ILLEGAL_MNEMONIC,
        mode: AddressingMode::Pseudo,
        operand_bytes: Vec::new(),
        size: 1,
        cycles: OPCODE_TABLE[byte as usize].cycles,
    }
}
