//! Assembly line and operand parser
//!
//! Lines are upper-cased and stripped of `;` comments before parsing, so
//! mnemonics and labels are case-insensitive.

use bitflags::bitflags;

use crate::address::parse_signed;
use crate::addressing::AddressingMode;
use crate::assembler::AsmError;

/// What a single source line asks for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Statement {
    /// Blank or comment-only
    Empty,
    /// `.END`
    End,
    /// `.DB`, `.DW` or `.DD` with its comma-separated arguments
    Data { width: u8, args: Vec<String> },
    /// `NAME = value`
    Assign { name: String, value: String },
    /// `MNEMONIC [operand]`, including `.ORG`
    Instruction { mnemonic: String, operand: String },
}

/// A parsed line: an optional leading `LABEL:` and the rest of the line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssemblyLine {
    pub label: Option<String>,
    pub statement: Statement,
}

/// Parses one line of source.
///
/// # Errors
///
/// [`AsmError::InvalidOperand`] for a malformed label or assignment name.
pub fn parse_line(line: &str) -> Result<AssemblyLine, AsmError> {
    let mut code = line.to_ascii_uppercase();
    if let Some(p) = code.find(';') {
        code.truncate(p);
    }
    let mut code = code.trim();

    let mut label = None;
    if let Some((first, rest)) = split_token(code) {
        if let Some(name) = first.strip_suffix(':') {
            validate_label(name).map_err(AsmError::InvalidOperand)?;
            label = Some(name.to_string());
            code = rest;
        }
    }

    Ok(AssemblyLine {
        label,
        statement: parse_statement(code)?,
    })
}

fn parse_statement(code: &str) -> Result<Statement, AsmError> {
    let Some((op, rest)) = split_token(code) else {
        return Ok(Statement::Empty);
    };

    if let Some(value) = rest.strip_prefix('=') {
        validate_label(op).map_err(AsmError::InvalidOperand)?;
        return Ok(Statement::Assign {
            name: op.to_string(),
            value: value.trim().to_string(),
        });
    }

    let width = match op {
        ".END" => return Ok(Statement::End),
        ".DB" => 1,
        ".DW" => 2,
        ".DD" => 4,
        _ => {
            return Ok(Statement::Instruction {
                mnemonic: op.to_string(),
                operand: rest.to_string(),
            })
        }
    };
    let args: Vec<String> = rest.split(',').map(|arg| arg.trim().to_string()).collect();
    if args.iter().any(String::is_empty) {
        return Err(AsmError::InvalidOperand(rest.to_string()));
    }
    Ok(Statement::Data { width, args })
}

/// Splits off the first token, which ends at whitespace or `=`. The rest is
/// trimmed. `None` for an empty line.
fn split_token(code: &str) -> Option<(&str, &str)> {
    let code = code.trim();
    if code.is_empty() {
        return None;
    }
    let end = code
        .find(|c: char| c.is_whitespace() || c == '=')
        .unwrap_or(code.len());
    Some((&code[..end], code[end..].trim()))
}

bitflags! {
    /// Syntax markers found in an operand. Together they pick the addressing
    /// mode.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct Syntax: u8 {
        /// `,X`
        const INDEX_X = 1 << 0;
        /// `,Y`
        const INDEX_Y = 1 << 1;
        /// `(...)`
        const PAREN = 1 << 2;
        /// `#`
        const IMMEDIATE = 1 << 3;
        /// Needs a 16-bit operand
        const WIDE = 1 << 4;
        /// An address or value was given
        const VALUE = 1 << 5;
    }
}

/// The value part of an operand.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
    Number(i64),
    /// `*`, the address of the current instruction
    Here,
    Symbol(String),
}

/// A parsed operand.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Operand {
    pub syntax: Syntax,
    pub value: Option<Value>,
}

impl Operand {
    /// The addressing mode the operand's syntax spells, or `None` when the
    /// markers contradict each other (`#$10,X`, `($10,X),Y`, ...).
    pub fn mode(&self) -> Option<AddressingMode> {
        use AddressingMode::*;

        if !self.syntax.contains(Syntax::VALUE) {
            return self.syntax.is_empty().then_some(Accumulator);
        }
        let wide = self.syntax.contains(Syntax::WIDE);
        let shape = self.syntax.difference(Syntax::VALUE | Syntax::WIDE);

        if shape.is_empty() {
            Some(if wide { Absolute } else { ZeroPage })
        } else if shape == Syntax::INDEX_X {
            Some(if wide { AbsoluteX } else { ZeroPageX })
        } else if shape == Syntax::INDEX_Y {
            Some(if wide { AbsoluteY } else { ZeroPageY })
        } else if shape == Syntax::PAREN {
            Some(Indirect)
        } else if shape == Syntax::PAREN | Syntax::INDEX_X {
            Some(IndexedIndirect)
        } else if shape == Syntax::PAREN | Syntax::INDEX_Y {
            Some(IndirectIndexed)
        } else if shape == Syntax::IMMEDIATE {
            Some(Immediate)
        } else {
            None
        }
    }
}

/// Parses an instruction operand (already upper-cased).
///
/// `A` or nothing means the accumulator. `!` forces the 16-bit form. Hex
/// literals with more than two digits are 16-bit even when the value is
/// small, so `LDA $0010` keeps its absolute encoding. Symbols and `*` are
/// always 16-bit.
pub fn parse_operand(text: &str) -> Result<Operand, AsmError> {
    let text = text.trim();
    let invalid = || AsmError::InvalidOperand(text.to_string());

    let mut syntax = Syntax::empty();
    if text.is_empty() || text == "A" {
        return Ok(Operand {
            syntax,
            value: None,
        });
    }

    let mut start = 0;
    let mut end = text.len();
    if let Some(p) = text.find(",X") {
        syntax |= Syntax::INDEX_X;
        end = end.min(p);
    }
    if let Some(p) = text.find(",Y") {
        syntax |= Syntax::INDEX_Y;
        end = end.min(p);
    }
    if let Some(p) = text.find('(') {
        syntax |= Syntax::PAREN;
        start = p + 1;
        if let Some(close) = text.find(')') {
            end = end.min(close);
        }
    }
    if let Some(p) = text.find('#') {
        syntax |= Syntax::IMMEDIATE;
        start = start.max(p + 1);
    }
    if let Some(p) = text.find('!') {
        syntax |= Syntax::WIDE;
        start = start.max(p + 1);
    }

    let body = text.get(start..end).ok_or_else(invalid)?.trim();
    let (value, wide) = parse_value(body).ok_or_else(invalid)?;
    if wide {
        syntax |= Syntax::WIDE;
    }
    syntax |= Syntax::VALUE;

    Ok(Operand {
        syntax,
        value: Some(value),
    })
}

/// Parses a bare value and reports whether it needs 16 bits.
pub fn parse_value(body: &str) -> Option<(Value, bool)> {
    if body == "*" {
        return Some((Value::Here, true));
    }

    let digits = body.trim_start_matches('-');
    let literal = digits.starts_with(|c: char| c.is_ascii_digit() || c == '$' || c == '%');
    if literal {
        let n = parse_signed(body)?;
        let long_spelling = match digits.strip_prefix('$') {
            Some(hex) => hex.len() > 2,
            None => digits
                .strip_prefix("0X")
                .is_some_and(|hex| hex.len() > 2),
        };
        let wide = long_spelling || !(-0x80..=0xFF).contains(&n);
        return Some((Value::Number(n), wide));
    }

    validate_label(body).ok()?;
    Some((Value::Symbol(body.to_string()), true))
}

/// Validate a label name.
///
/// Labels must:
/// - Start with a letter or underscore
/// - Contain only alphanumeric characters and underscores
/// - Not exceed 32 characters in length
/// - Not be a register name (`A`, `X`, `Y`)
pub fn validate_label(name: &str) -> Result<(), String> {
    let mut chars = name.chars();
    let Some(first) = chars.next() else {
        return Err("label name cannot be empty".to_string());
    };

    if name.len() > 32 {
        return Err(format!("label name too long (max 32 characters): {name}"));
    }

    if !first.is_ascii_alphabetic() && first != '_' {
        return Err(format!("label must start with a letter, not '{first}'"));
    }

    if let Some(ch) = chars.find(|ch| !ch.is_ascii_alphanumeric() && *ch != '_') {
        return Err(format!("label contains invalid character '{ch}'"));
    }

    if matches!(name, "A" | "X" | "Y") {
        return Err(format!("'{name}' is a register name"));
    }

    Ok(())
}
