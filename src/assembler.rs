//! 6502 Assembler Module
//!
//! Assembles one line at a time straight into memory, the way a monitor's
//! `a` command does. Forward references are allowed: an operand naming a
//! label that does not exist yet is written as a placeholder and recorded as
//! a fixup, and [`Assembler::apply_fixups`] patches every placeholder once
//! the whole program has been entered.
//!
//! ```
//! use nes6502::{Assembler, AsmStatus, FlatMemory, MemoryBus};
//!
//! let mut mem = FlatMemory::new();
//! let mut asm = Assembler::new();
//! let mut cursor = 0;
//!
//! for line in [".ORG $8000", "JMP LATER", "NOP", "LATER: RTS", ".END"] {
//!     asm.assemble(&mut mem, line, &mut cursor).unwrap();
//! }
//! assert!(asm.apply_fixups(&mut mem).is_empty());
//! assert_eq!(mem.read_word(0x8001), 0x8004);
//! ```
//!
//! Grammar, one statement per line, case-insensitive:
//!
//! | Line | Effect |
//! |---|---|
//! | `; comment`, blank | nothing |
//! | `LABEL:` | bind `LABEL` to the cursor; may be followed by a statement |
//! | `NAME = value` | bind `NAME` to `value` |
//! | `.ORG value` | move the cursor |
//! | `.END` | end of program |
//! | `.DB`/`.DW`/`.DD a, b, ...` | 1, 2 or 4 byte little-endian data |
//! | `MNEMONIC [operand]` | one instruction |
//!
//! Values are decimal, `$` or `0x` hex, `%` binary (optionally negated), a
//! label, or `*` for the cursor.

pub mod encoder;
pub mod parser;
pub mod symbol_table;

pub use encoder::asm_help;

use thiserror::Error;

use crate::addressing::AddressingMode;
use crate::memory::MemoryBus;
use crate::opcodes::OPCODE_TABLE;
use parser::{Statement, Value};
use symbol_table::SymbolTable;

/// What a successfully assembled line did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AsmStatus {
    /// An instruction was emitted, or the line was blank
    Code,
    /// `.END` was reached
    End,
    /// A label, assignment, `.ORG` or data directive
    Meta,
}

impl AsmStatus {
    /// Result-code name shown by the console.
    pub fn code(self) -> &'static str {
        match self {
            AsmStatus::Code => "None",
            AsmStatus::End => "End",
            AsmStatus::Meta => "Meta",
        }
    }
}

/// A line that could not be assembled. Nothing was written.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AsmError {
    #[error("unknown opcode '{0}'")]
    UnknownOpcode(String),

    #[error("invalid operand '{0}'")]
    InvalidOperand(String),

    #[error("{mnemonic} has no {mode:?} form")]
    InvalidMode {
        mnemonic: String,
        mode: AddressingMode,
    },
}

impl AsmError {
    /// Result-code name shown by the console.
    pub fn code(&self) -> &'static str {
        match self {
            AsmError::UnknownOpcode(_) => "UnknownOpcode",
            AsmError::InvalidOperand(_) => "InvalidOperand",
            AsmError::InvalidMode { .. } => "InvalidMode",
        }
    }
}

/// A fixup that [`Assembler::apply_fixups`] could not apply.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FixupError {
    #[error("Fixup at ${at:04X}: label {symbol} not found")]
    UnresolvedSymbol { at: u16, symbol: String },

    #[error("Fixup at ${at:04X}: label {symbol} (${target:04X}) is out of branch range")]
    BranchOutOfRange { at: u16, symbol: String, target: u32 },

    #[error("Fixup at ${at:04X}: label {symbol} (${target:04X}) does not fit its field")]
    ValueOutOfRange { at: u16, symbol: String, target: u32 },

    #[error("Impossible to have a fixup at ${at:04X}")]
    NotPatchable { at: u16 },
}

/// A hand-assembly session: the label table and the pending fixups.
///
/// Keep one `Assembler` per program. Labels and fixups survive across
/// [`assemble`](Assembler::assemble) calls until [`reset`](Assembler::reset).
#[derive(Debug, Clone, Default)]
pub struct Assembler {
    symbols: SymbolTable,
}

impl Assembler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn symbols(&self) -> &SymbolTable {
        &self.symbols
    }

    /// Value of a label, if defined.
    pub fn label(&self, name: &str) -> Option<u32> {
        self.symbols.lookup(&name.to_ascii_uppercase())
    }

    /// Forgets all labels and pending fixups.
    pub fn reset(&mut self) {
        self.symbols.clear();
    }

    /// Assembles one line at `*cursor`, writing through `bus` and advancing
    /// the cursor past whatever was emitted.
    ///
    /// # Errors
    ///
    /// - [`AsmError::UnknownOpcode`]: the mnemonic is not in the table.
    /// - [`AsmError::InvalidOperand`]: the operand does not parse, a value does
    ///   not fit its field, or a directive is malformed.
    /// - [`AsmError::InvalidMode`]: the mnemonic has no encoding for the
    ///   operand's mode.
    pub fn assemble<B: MemoryBus + ?Sized>(
        &mut self,
        bus: &mut B,
        line: &str,
        cursor: &mut u16,
    ) -> Result<AsmStatus, AsmError> {
        let parsed = parser::parse_line(line)?;

        let Some(label) = &parsed.label else {
            return self.statement(bus, parsed.statement, cursor);
        };
        if parsed.statement == Statement::Empty {
            self.symbols.define(label, *cursor as u32);
            return Ok(AsmStatus::Meta);
        }

        // Bound first so `LOOP: BNE LOOP` sees itself; unbound again on error
        let previous = self.symbols.lookup(label);
        self.symbols.define(label, *cursor as u32);
        let result = self.statement(bus, parsed.statement, cursor);
        if result.is_err() {
            self.symbols.restore(label, previous);
        }
        result
    }

    fn statement<B: MemoryBus + ?Sized>(
        &mut self,
        bus: &mut B,
        statement: Statement,
        cursor: &mut u16,
    ) -> Result<AsmStatus, AsmError> {
        match statement {
            Statement::Empty => Ok(AsmStatus::Code),
            Statement::End => Ok(AsmStatus::End),
            Statement::Data { width, args } => self.data(bus, width, &args, cursor),
            Statement::Assign { name, value } => {
                let value = self.evaluate(&value, *cursor)?;
                self.symbols.define(&name, value as u32);
                Ok(AsmStatus::Meta)
            }
            Statement::Instruction { mnemonic, operand } => {
                self.instruction(bus, &mnemonic, &operand, cursor)
            }
        }
    }

    fn instruction<B: MemoryBus + ?Sized>(
        &mut self,
        bus: &mut B,
        mnemonic: &str,
        text: &str,
        cursor: &mut u16,
    ) -> Result<AsmStatus, AsmError> {
        let row = encoder::opcodes_for(mnemonic)
            .ok_or_else(|| AsmError::UnknownOpcode(mnemonic.to_string()))?;
        let invalid = || AsmError::InvalidOperand(text.to_string());

        let operand = parser::parse_operand(text)?;
        let written = operand.mode().ok_or_else(invalid)?;
        let (mode, opcode) = encoder::select_mode(mnemonic, row, written)?;

        let here = *cursor;
        let (value, pending) = match &operand.value {
            None => (None, None),
            Some(Value::Number(n)) => (Some(*n), None),
            Some(Value::Here) => (Some(here as i64), None),
            Some(Value::Symbol(name)) => match self.symbols.lookup(name) {
                Some(v) => (Some(v as i64), None),
                None => (None, Some(name.as_str())),
            },
        };

        if mode == AddressingMode::Pseudo {
            if mnemonic != ".ORG" {
                return Err(invalid());
            }
            let target = value.ok_or_else(invalid)?;
            *cursor = u16::try_from(target).map_err(|_| invalid())?;
            return Ok(AsmStatus::Meta);
        }

        let stored = match (mode, value) {
            (_, None) => 0xFFFF,
            (AddressingMode::Relative, Some(target)) => {
                let disp = target - (here as i64 + 2);
                if !(-128..=127).contains(&disp) {
                    return Err(invalid());
                }
                disp as u16
            }
            (m, Some(v)) if m.operand_len() == 1 => {
                if !(-0x80..=0xFF).contains(&v) {
                    return Err(invalid());
                }
                v as u16
            }
            (_, Some(v)) => v as u16,
        };

        let bytes = encoder::encode(opcode, mode, stored);
        for (i, byte) in bytes.iter().enumerate() {
            bus.write(here.wrapping_add(i as u16), *byte);
        }
        if let Some(symbol) = pending {
            self.symbols.add_code_fixup(here, symbol);
        }
        *cursor = here.wrapping_add(bytes.len() as u16);
        Ok(AsmStatus::Code)
    }

    fn data<B: MemoryBus + ?Sized>(
        &mut self,
        bus: &mut B,
        width: u8,
        args: &[String],
        cursor: &mut u16,
    ) -> Result<AsmStatus, AsmError> {
        // Resolve every argument first so a bad one writes nothing
        let mut items = Vec::with_capacity(args.len());
        let mut at = *cursor;
        for arg in args {
            let invalid = || AsmError::InvalidOperand(arg.clone());
            let (value, _) = parser::parse_value(arg).ok_or_else(invalid)?;
            let item = match value {
                Value::Number(n) if fits_width(n, width) => Ok(n as u32),
                Value::Here if fits_width(at as i64, width) => Ok(at as u32),
                Value::Number(_) | Value::Here => return Err(invalid()),
                Value::Symbol(name) => match self.symbols.lookup(&name) {
                    Some(v) if fits_width(v as i64, width) => Ok(v),
                    Some(_) => return Err(invalid()),
                    None => Err(name),
                },
            };
            items.push((at, item));
            at = at.wrapping_add(width as u16);
        }

        for (at, item) in items {
            let value = item.unwrap_or_else(|name| {
                self.symbols.add_data_fixup(at, width, &name);
                u32::MAX
            });
            write_le(bus, at, width, value);
        }
        *cursor = at;
        Ok(AsmStatus::Meta)
    }

    /// Value of an assignment's right-hand side. Symbols must already be
    /// defined.
    fn evaluate(&self, text: &str, cursor: u16) -> Result<i64, AsmError> {
        let invalid = || AsmError::InvalidOperand(text.to_string());
        match parser::parse_value(text).ok_or_else(invalid)?.0 {
            Value::Number(n) => Ok(n),
            Value::Here => Ok(cursor as i64),
            Value::Symbol(name) => self.symbols.lookup(&name).map(i64::from).ok_or_else(invalid),
        }
    }

    /// Patches every pending fixup and clears the fixup tables.
    ///
    /// Code fixups are patched according to the mode of the opcode found at
    /// the fixup address: a word for two-byte operands, a byte for one-byte
    /// operands, a displacement for branches. Failures are collected; all
    /// other fixups are still applied.
    pub fn apply_fixups<B: MemoryBus + ?Sized>(&mut self, bus: &mut B) -> Vec<FixupError> {
        let mut errors = Vec::new();

        for (at, symbol) in self.symbols.take_code_fixups() {
            let Some(target) = self.symbols.lookup(&symbol) else {
                errors.push(FixupError::UnresolvedSymbol { at, symbol });
                continue;
            };

            let info = &OPCODE_TABLE[bus.read(at) as usize];
            let operand_at = at.wrapping_add(1);
            match info.mode {
                AddressingMode::Relative => {
                    let disp = target as i64 - (at as i64 + 2);
                    if !(-128..=127).contains(&disp) {
                        errors.push(FixupError::BranchOutOfRange { at, symbol, target });
                        continue;
                    }
                    bus.write(operand_at, disp as u8);
                }
                mode if mode.operand_len() == 2 => write_le(bus, operand_at, 2, target),
                mode if mode.operand_len() == 1 => {
                    if target > 0xFF {
                        errors.push(FixupError::ValueOutOfRange { at, symbol, target });
                        continue;
                    }
                    bus.write(operand_at, target as u8);
                }
                _ => errors.push(FixupError::NotPatchable { at }),
            }
        }

        for (at, fixup) in self.symbols.take_data_fixups() {
            match self.symbols.lookup(&fixup.symbol) {
                Some(target) if !fits_width(target as i64, fixup.width) => {
                    errors.push(FixupError::ValueOutOfRange {
                        at,
                        symbol: fixup.symbol,
                        target,
                    })
                }
                Some(value) => write_le(bus, at, fixup.width, value),
                None => errors.push(FixupError::UnresolvedSymbol {
                    at,
                    symbol: fixup.symbol,
                }),
            }
        }

        errors
    }
}

/// Whether `value` fits a `width`-byte field, signed or unsigned.
fn fits_width(value: i64, width: u8) -> bool {
    let bits = 8 * width as u32;
    (-(1i64 << (bits - 1))..(1i64 << bits)).contains(&value)
}

fn write_le<B: MemoryBus + ?Sized>(bus: &mut B, at: u16, width: u8, value: u32) {
    for (i, byte) in value.to_le_bytes().iter().take(width as usize).enumerate() {
        bus.write(at.wrapping_add(i as u16), *byte);
    }
}
