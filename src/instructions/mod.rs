//! # 6502 Instruction Implementations
//!
//! Opcode semantics, organised by category. By the time one of these runs the
//! CPU has already advanced PC past the instruction and charged its base and
//! page-crossing cycles; each function receives the effective address and only
//! applies the operation (branches and jumps overwrite PC).
//!
//! ## Categories
//!
//! - **alu**: ADC, SBC, AND, ORA, EOR, CMP, CPX, CPY, BIT
//! - **branches**: BCC, BCS, BEQ, BNE, BMI, BPL, BVC, BVS
//! - **shifts**: ASL, LSR, ROL, ROR
//! - **load_store**: LDA, LDX, LDY, STA, STX, STY
//! - **inc_dec**: INC, DEC, INX, INY, DEX, DEY
//! - **control**: JMP, JSR, RTS, RTI, BRK, NOP
//! - **stack**: PHA, PHP, PLA, PLP
//! - **flags**: CLC, SEC, CLI, SEI, CLD, SED, CLV
//! - **transfer**: TAX, TAY, TXA, TYA, TSX, TXS

pub(crate) mod alu;
pub(crate) mod branches;
pub(crate) mod control;
pub(crate) mod flags;
pub(crate) mod inc_dec;
pub(crate) mod load_store;
pub(crate) mod shifts;
pub(crate) mod stack;
pub(crate) mod transfer;

use crate::{Cpu, MemoryBus};

/// Runs the semantics of a legal `opcode` against effective address `addr`.
pub(crate) fn execute<M: MemoryBus>(cpu: &mut Cpu<M>, opcode: u8, addr: u16) {
    match opcode {
        // ALU
        0x61 | 0x65 | 0x69 | 0x6D | 0x71 | 0x75 | 0x79 | 0x7D => alu::execute_adc(cpu, addr),
        0xE1 | 0xE5 | 0xE9 | 0xED | 0xF1 | 0xF5 | 0xF9 | 0xFD => alu::execute_sbc(cpu, addr),
        0x21 | 0x25 | 0x29 | 0x2D | 0x31 | 0x35 | 0x39 | 0x3D => alu::execute_and(cpu, addr),
        0x01 | 0x05 | 0x09 | 0x0D | 0x11 | 0x15 | 0x19 | 0x1D => alu::execute_ora(cpu, addr),
        0x41 | 0x45 | 0x49 | 0x4D | 0x51 | 0x55 | 0x59 | 0x5D => alu::execute_eor(cpu, addr),
        0xC1 | 0xC5 | 0xC9 | 0xCD | 0xD1 | 0xD5 | 0xD9 | 0xDD => alu::execute_cmp(cpu, addr),
        0xE0 | 0xE4 | 0xEC => alu::execute_cpx(cpu, addr),
        0xC0 | 0xC4 | 0xCC => alu::execute_cpy(cpu, addr),
        0x24 | 0x2C => alu::execute_bit(cpu, addr),

        // Branches
        0x90 => branches::execute_bcc(cpu, addr),
        0xB0 => branches::execute_bcs(cpu, addr),
        0xF0 => branches::execute_beq(cpu, addr),
        0xD0 => branches::execute_bne(cpu, addr),
        0x30 => branches::execute_bmi(cpu, addr),
        0x10 => branches::execute_bpl(cpu, addr),
        0x50 => branches::execute_bvc(cpu, addr),
        0x70 => branches::execute_bvs(cpu, addr),

        // Shifts
        0x0A => shifts::execute_asl_acc(cpu),
        0x06 | 0x0E | 0x16 | 0x1E => shifts::execute_asl(cpu, addr),
        0x4A => shifts::execute_lsr_acc(cpu),
        0x46 | 0x4E | 0x56 | 0x5E => shifts::execute_lsr(cpu, addr),
        0x2A => shifts::execute_rol_acc(cpu),
        0x26 | 0x2E | 0x36 | 0x3E => shifts::execute_rol(cpu, addr),
        0x6A => shifts::execute_ror_acc(cpu),
        0x66 | 0x6E | 0x76 | 0x7E => shifts::execute_ror(cpu, addr),

        // Loads and stores
        0xA1 | 0xA5 | 0xA9 | 0xAD | 0xB1 | 0xB5 | 0xB9 | 0xBD => {
            load_store::execute_lda(cpu, addr)
        }
        0xA2 | 0xA6 | 0xAE | 0xB6 | 0xBE => load_store::execute_ldx(cpu, addr),
        0xA0 | 0xA4 | 0xAC | 0xB4 | 0xBC => load_store::execute_ldy(cpu, addr),
        0x81 | 0x85 | 0x8D | 0x91 | 0x95 | 0x99 | 0x9D => load_store::execute_sta(cpu, addr),
        0x86 | 0x8E | 0x96 => load_store::execute_stx(cpu, addr),
        0x84 | 0x8C | 0x94 => load_store::execute_sty(cpu, addr),

        // Increments and decrements
        0xE6 | 0xEE | 0xF6 | 0xFE => inc_dec::execute_inc(cpu, addr),
        0xC6 | 0xCE | 0xD6 | 0xDE => inc_dec::execute_dec(cpu, addr),
        0xE8 => inc_dec::execute_inx(cpu),
        0xC8 => inc_dec::execute_iny(cpu),
        0xCA => inc_dec::execute_dex(cpu),
        0x88 => inc_dec::execute_dey(cpu),

        // Control flow
        0x4C | 0x6C => control::execute_jmp(cpu, addr),
        0x20 => control::execute_jsr(cpu, addr),
        0x60 => control::execute_rts(cpu),
        0x40 => control::execute_rti(cpu),
        0x00 => control::execute_brk(cpu),
        0xEA => {}

        // Stack
        0x48 => stack::execute_pha(cpu),
        0x08 => stack::execute_php(cpu),
        0x68 => stack::execute_pla(cpu),
        0x28 => stack::execute_plp(cpu),

        // Flags
        0x18 => flags::execute_clc(cpu),
        0x38 => flags::execute_sec(cpu),
        0x58 => flags::execute_cli(cpu),
        0x78 => flags::execute_sei(cpu),
        0xD8 => flags::execute_cld(cpu),
        0xF8 => flags::execute_sed(cpu),
        0xB8 => flags::execute_clv(cpu),

        // Transfers
        0xAA => transfer::execute_tax(cpu),
        0xA8 => transfer::execute_tay(cpu),
        0x8A => transfer::execute_txa(cpu),
        0x98 => transfer::execute_tya(cpu),
        0xBA => transfer::execute_tsx(cpu),
        0x9A => transfer::execute_txs(cpu),

        // Illegal opcodes are filtered out by the caller
        _ => {}
    }
}
