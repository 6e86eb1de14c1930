//! Formatting functions for disassembled instructions

use std::fmt::Write;

use crate::addressing::AddressingMode;
use crate::disassembler::Instruction;

/// Format a full listing line: address, raw bytes, then the instruction text.
pub fn format_line(instr: &Instruction) -> String {
    let mut hex = String::with_capacity(8);
    for (i, byte) in instr.bytes().iter().enumerate() {
        if i > 0 {
            hex.push(' ');
        }
        let _ = write!(hex, "{byte:02X}");
    }
    format!("{:04X}: {hex:<8} {}", instr.address, format_instruction(instr))
}

/// Format a single instruction as assembly text.
pub fn format_instruction(instr: &Instruction) -> String {
    if !instr.is_legal() {
        return format!("{} ${:02X}", instr.mnemonic, instr.opcode);
    }

    let operand = format_operand(instr);
    let mut text = if operand.is_empty() {
        instr.mnemonic.to_string()
    } else {
        format!("{} {}", instr.mnemonic, operand)
    };

    if let Some(target) = instr.branch_target() {
        let _ = write!(text, " ;[dest=${target:04X}]");
    }
    text
}

/// Format the operand based on addressing mode
fn format_operand(instr: &Instruction) -> String {
    use AddressingMode::*;

    let value = instr.operand();
    match instr.mode {
        Implied | Pseudo | Invalid => String::new(),
        Accumulator => "A".to_string(),
        Immediate | Relative => format!("#${value:02X}"),
        ZeroPage => format!("${value:02X}"),
        ZeroPageX => format!("${value:02X},X"),
        ZeroPageY => format!("${value:02X},Y"),
        Absolute => format!("${value:04X}"),
        AbsoluteX => format!("${value:04X},X"),
        AbsoluteY => format!("${value:04X},Y"),
        Indirect => format!("(${value:04X})"),
        IndexedIndirect => format!("(${value:02X},X)"),
        IndirectIndexed => format!("(${value:02X}),Y"),
    }
}
