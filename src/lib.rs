//! # NES 6502 Core
//!
//! A cycle-counting NMOS 6502 interpreter running over bank-switched NES
//! cartridge memory, with a one-line disassembler and a hand assembler that
//! share the interpreter's opcode table.
//!
//! ## Quick Start
//!
//! ```rust
//! use nes6502::{Cpu, FlatMemory, MemoryBus};
//!
//! // 64KB of flat memory with the reset vector pointing at $8000
//! let mut memory = FlatMemory::new();
//! memory.write(0xFFFC, 0x00);
//! memory.write(0xFFFD, 0x80);
//!
//! let cpu = Cpu::new(memory);
//!
//! assert_eq!(cpu.pc(), 0x8000);
//! assert_eq!(cpu.sp(), 0xFD);
//! assert!(cpu.flag_i());
//! assert_eq!(cpu.cpu_state(), "PC=8000 A=00 X=00 Y=00 SP=1FD nvUbdIzc");
//! ```
//!
//! Working on one bank of a cartridge:
//!
//! ```rust
//! use nes6502::assembler::Assembler;
//! use nes6502::mapper::{self, BankView};
//! use nes6502::{disassembler, Cartridge};
//!
//! let mapper = mapper::create(1, Cartridge::blank(8)).unwrap();
//! let mut view = BankView::new(mapper, 3);
//!
//! let mut asm = Assembler::new();
//! let mut cursor = 0x8000;
//! asm.assemble(&mut view, "LDA #$05", &mut cursor).unwrap();
//!
//! let mut cursor = 0x8000;
//! assert_eq!(
//!     disassembler::disassemble(&view, &mut cursor),
//!     "8000: A9 05    LDA #$05"
//! );
//! ```
//!
//! ## Modules
//!
//! - `cpu` - registers, reset, stepping and interrupts
//! - `memory` - the [`MemoryBus`] trait and a flat 64KB memory
//! - `mapper` - cartridge bank switching (UxROM, MMC1, CNROM, MMC3)
//! - `opcodes` - the 256-entry opcode table
//! - `disassembler` - one-line listings
//! - `assembler` - line-at-a-time assembly with forward references
//! - `console` - text commands over a CPU bound to a mapper

pub mod address;
pub mod addressing;
pub mod assembler;
pub mod cartridge;
pub mod console;
pub mod cpu;
pub mod disassembler;
pub mod mapper;
pub mod memory;
pub mod opcodes;
pub mod status;

// Opcode semantics, reached only through `Cpu::step`
mod instructions;

pub use address::Address;
pub use addressing::AddressingMode;
pub use assembler::{AsmError, AsmStatus, Assembler, FixupError};
pub use cartridge::{Cartridge, Mirroring};
pub use cpu::{Cpu, CpuConfig};
pub use mapper::{BankView, Mapper};
pub use memory::{FlatMemory, MemoryBus};
pub use opcodes::{OpcodeInfo, OPCODE_TABLE};
pub use status::Status;

use thiserror::Error;

/// Errors reported by [`Cpu::step`].
///
/// Both are recoverable: the step that produced one has already been charged.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExecutionError {
    /// The opcode has no defined semantics.
    #[error("Illegal opcode {opcode:02x} at {pc:04x}")]
    IllegalOpcode { opcode: u8, pc: u16 },

    /// The watchdog saw `count` consecutive steps land back on `pc`.
    #[error("Self loop at {pc:04x} after {count} steps")]
    SelfLoop { pc: u16, count: u32 },
}

/// Errors from creating or poking a mapper.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MapperError {
    #[error("mapper {0} is not supported")]
    Unsupported(u8),

    #[error("{what} size {len:#x} is not a non-empty multiple of {bank:#x}")]
    BadBankSize {
        what: &'static str,
        len: usize,
        bank: usize,
    },

    #[error("unknown register '{0}'")]
    UnknownRegister(String),

    #[error("{0} has no writable registers")]
    NotSupported(&'static str),
}
