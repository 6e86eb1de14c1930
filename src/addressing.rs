//! # Addressing Modes
//!
//! This module defines the 13 addressing modes of the 6502 processor plus two
//! pseudo modes used by the opcode table and the assembler. Each mode determines
//! how the CPU interprets operand bytes and calculates effective addresses.
//!
//! The declaration order is significant: it is the column order of the
//! assembler's per-mnemonic opcode map and of the help table produced by
//! [`asm_help`](crate::assembler::asm_help).

/// 6502 addressing mode enumeration.
///
/// # Operand Sizes
///
/// - **0 bytes**: Implied, Accumulator
/// - **1 byte**: Immediate, ZeroPage, ZeroPageX, ZeroPageY, Relative, IndexedIndirect, IndirectIndexed
/// - **2 bytes**: Absolute, AbsoluteX, AbsoluteY, Indirect
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum AddressingMode {
    /// Full 16-bit address.
    ///
    /// Example: JMP $1234 (jump to address 0x1234)
    Absolute,

    /// 16-bit address indexed by X register.
    ///
    /// Example: LDA $1234,X (load from address 0x1234 + X)
    /// May incur +1 cycle penalty if page boundary is crossed.
    AbsoluteX,

    /// 16-bit address indexed by Y register.
    ///
    /// Example: LDA $1234,Y (load from address 0x1234 + Y)
    /// May incur +1 cycle penalty if page boundary is crossed.
    AbsoluteY,

    /// Operates directly on the accumulator register.
    ///
    /// Examples: LSR, ROL A, ASL
    Accumulator,

    /// 8-bit constant operand in instruction.
    ///
    /// Example: LDA #$10 (load immediate value 0x10 into accumulator)
    Immediate,

    /// No operand, operation implied by instruction.
    ///
    /// Examples: CLC, RTS, NOP
    Implied,

    /// Indexed indirect: (ZP + X) then dereference.
    ///
    /// Example: LDA ($40,X). The pointer location wraps within the zero page.
    IndexedIndirect,

    /// Indirect jump through 16-bit pointer.
    ///
    /// Example: JMP ($FFFC). Only used by JMP. Reproduces the NMOS page-wrap
    /// bug when the pointer's low byte is 0xFF.
    Indirect,

    /// Indirect indexed: ZP dereference then + Y.
    ///
    /// Example: LDA ($40),Y
    /// May incur +1 cycle penalty if page boundary is crossed.
    IndirectIndexed,

    /// Signed 8-bit offset for branch instructions.
    ///
    /// Example: BEQ label (offset is relative to the following instruction)
    Relative,

    /// 8-bit address in zero page (0x00-0xFF).
    ///
    /// Example: LDA $80
    ZeroPage,

    /// Zero page address indexed by X register, wrapping within the zero page.
    ///
    /// Example: LDA $80,X
    ZeroPageX,

    /// Zero page address indexed by Y register, wrapping within the zero page.
    ///
    /// Example: LDX $80,Y
    ZeroPageY,

    /// Assembler directive (`.ORG`, `.DB`, `NAME = value`). Never executed.
    Pseudo,

    /// Sentinel for operand syntax that maps to no mode.
    Invalid,
}

impl AddressingMode {
    /// All modes in column order.
    pub const ALL: [AddressingMode; 15] = [
        AddressingMode::Absolute,
        AddressingMode::AbsoluteX,
        AddressingMode::AbsoluteY,
        AddressingMode::Accumulator,
        AddressingMode::Immediate,
        AddressingMode::Implied,
        AddressingMode::IndexedIndirect,
        AddressingMode::Indirect,
        AddressingMode::IndirectIndexed,
        AddressingMode::Relative,
        AddressingMode::ZeroPage,
        AddressingMode::ZeroPageX,
        AddressingMode::ZeroPageY,
        AddressingMode::Pseudo,
        AddressingMode::Invalid,
    ];

    /// Column index of this mode (its position in [`AddressingMode::ALL`]).
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Number of operand bytes that follow the opcode byte.
    pub const fn operand_len(self) -> u8 {
        use AddressingMode::*;
        match self {
            Accumulator | Implied | Pseudo | Invalid => 0,
            Immediate | ZeroPage | ZeroPageX | ZeroPageY | Relative | IndexedIndirect
            | IndirectIndexed => 1,
            Absolute | AbsoluteX | AbsoluteY | Indirect => 2,
        }
    }

    /// Short column heading used by the assembler help table.
    pub const fn abbrev(self) -> &'static str {
        use AddressingMode::*;
        match self {
            Absolute => "Abs",
            AbsoluteX => "AbX",
            AbsoluteY => "AbY",
            Accumulator => "Acc",
            Immediate => "Imm",
            Implied => "Imp",
            IndexedIndirect => "InX",
            Indirect => "Ind",
            IndirectIndexed => "InY",
            Relative => "Rel",
            ZeroPage => "Zp",
            ZeroPageX => "ZpX",
            ZeroPageY => "ZpY",
            Pseudo => "Fake",
            Invalid => "---",
        }
    }
}
