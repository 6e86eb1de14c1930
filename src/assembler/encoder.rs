//! Instruction encoder for the 6502 assembler
//!
//! Maps each mnemonic to its opcode in every addressing-mode column, built
//! once from [`OPCODE_TABLE`](crate::OPCODE_TABLE) so the assembler can only emit what the
//! interpreter decodes.

use std::collections::BTreeMap;

use once_cell::sync::Lazy;

use crate::addressing::AddressingMode;
use crate::assembler::AsmError;
use crate::opcodes::legal_opcodes;

/// Opcode per addressing-mode column (see [`AddressingMode::ALL`]).
pub type OpcodeRow = [Option<u8>; COLUMNS];

const COLUMNS: usize = AddressingMode::ALL.len();

/// Marker in the `Pseudo` column of directives.
const DIRECTIVE: u8 = 0xFF;

const DIRECTIVES: [&str; 6] = [".DB", ".DW", ".DD", ".END", ".ORG", "="];

static OPCODE_MAP: Lazy<BTreeMap<&'static str, OpcodeRow>> = Lazy::new(|| {
    let mut map: BTreeMap<&'static str, OpcodeRow> = BTreeMap::new();
    for (opcode, info) in legal_opcodes() {
        let row = map.entry(info.mnemonic).or_insert([None; COLUMNS]);
        row[info.mode.index()] = Some(opcode);
        // Branches also take a raw displacement: `BNE #$FC`
        if info.mode == AddressingMode::Relative {
            row[AddressingMode::Immediate.index()] = Some(opcode);
        }
    }
    for name in DIRECTIVES {
        let mut row = [None; COLUMNS];
        row[AddressingMode::Pseudo.index()] = Some(DIRECTIVE);
        map.insert(name, row);
    }
    map
});

/// The opcode row of a mnemonic or directive.
pub fn opcodes_for(mnemonic: &str) -> Option<&'static OpcodeRow> {
    OPCODE_MAP.get(mnemonic)
}

/// Picks the mode to encode and its opcode.
///
/// When the written mode has no encoding:
/// - a zero-page form is promoted to its absolute twin (`STA $10,Y`);
/// - an address falls back to `Relative` for branches;
/// - an empty operand falls back to `Implied`;
/// - anything falls back to `Pseudo` for directives.
///
/// # Errors
///
/// [`AsmError::InvalidMode`] when none of these apply.
pub fn select_mode(
    mnemonic: &str,
    row: &OpcodeRow,
    mode: AddressingMode,
) -> Result<(AddressingMode, u8), AsmError> {
    use AddressingMode::*;

    let promoted = match mode {
        ZeroPage => Some(Absolute),
        ZeroPageX => Some(AbsoluteX),
        ZeroPageY => Some(AbsoluteY),
        _ => None,
    };
    let fallback = match mode {
        Accumulator => Implied,
        Immediate => Invalid,
        _ => Relative,
    };

    [Some(mode), promoted, Some(fallback), Some(Pseudo)]
        .into_iter()
        .flatten()
        .find_map(|m| row[m.index()].map(|opcode| (m, opcode)))
        .ok_or_else(|| AsmError::InvalidMode {
            mnemonic: mnemonic.to_string(),
            mode,
        })
}

/// Lays out the bytes of an instruction. `operand` is already reduced to
/// what gets stored: a byte for one-byte forms, a word for two-byte forms.
pub fn encode(opcode: u8, mode: AddressingMode, operand: u16) -> Vec<u8> {
    match mode.operand_len() {
        0 => vec![opcode],
        1 => vec![opcode, operand as u8],
        _ => {
            let [lo, hi] = operand.to_le_bytes();
            vec![opcode, lo, hi]
        }
    }
}

/// Mnemonic table with the opcode in each addressing-mode column.
///
/// ```
/// let help = nes6502::assembler::asm_help();
/// assert!(help[0].starts_with("Instruction    Abs AbX"));
/// assert!(help.iter().any(|l| l.starts_with("LDA            ad  bd  b9      a9")));
/// ```
pub fn asm_help() -> Vec<String> {
    // Every column but `Invalid`
    let columns = &AddressingMode::ALL[..COLUMNS - 1];

    let mut header = format!("{:<15}", "Instruction");
    for mode in columns {
        header.push_str(&format!("{:<4}", mode.abbrev()));
    }
    let mut lines = vec![
        header.trim_end().to_string(),
        format!("{:<15}{}", "-----------", "-".repeat(columns.len() * 4)),
    ];

    for (name, row) in OPCODE_MAP.iter() {
        let mut line = format!("{name:<15}");
        for mode in columns {
            match row[mode.index()] {
                Some(opcode) => line.push_str(&format!("{opcode:02x}  ")),
                None => line.push_str("    "),
            }
        }
        lines.push(line.trim_end().to_string());
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use AddressingMode::*;

    fn select(mnemonic: &str, mode: AddressingMode) -> Result<(AddressingMode, u8), AsmError> {
        select_mode(mnemonic, opcodes_for(mnemonic).unwrap(), mode)
    }

    #[test]
    fn test_map_covers_table() {
        let lda = opcodes_for("LDA").unwrap();
        assert_eq!(lda[Immediate.index()], Some(0xA9));
        assert_eq!(lda[IndirectIndexed.index()], Some(0xB1));
        assert_eq!(lda[Implied.index()], None);
        assert!(opcodes_for("FOOBAR").is_none());
        assert_eq!(opcodes_for(".ORG").unwrap()[Pseudo.index()], Some(0xFF));
    }

    #[test]
    fn test_select_exact_and_promoted() {
        assert_eq!(select("LDA", ZeroPage), Ok((ZeroPage, 0xA5)));
        assert_eq!(select("STA", ZeroPageY), Ok((AbsoluteY, 0x99)));
        assert_eq!(select("JMP", ZeroPage), Ok((Absolute, 0x4C)));
    }

    #[test]
    fn test_select_fallbacks() {
        assert_eq!(select("BNE", Absolute), Ok((Relative, 0xD0)));
        assert_eq!(select("BNE", Immediate), Ok((Immediate, 0xD0)));
        assert_eq!(select("NOP", Accumulator), Ok((Implied, 0xEA)));
        assert_eq!(select("LSR", Accumulator), Ok((Accumulator, 0x4A)));
        assert_eq!(select(".ORG", Absolute), Ok((Pseudo, 0xFF)));
    }

    #[test]
    fn test_select_invalid_mode() {
        assert_eq!(
            select("STA", Immediate),
            Err(AsmError::InvalidMode {
                mnemonic: "STA".to_string(),
                mode: Immediate
            })
        );
        assert!(select("NOP", ZeroPage).is_err());
        assert!(select("LDX", ZeroPageX).is_err());
    }

    #[test]
    fn test_encode_lengths() {
        assert_eq!(encode(0xEA, Implied, 0), vec![0xEA]);
        assert_eq!(encode(0xA9, Immediate, 0x05), vec![0xA9, 0x05]);
        assert_eq!(encode(0x4C, Absolute, 0x8000), vec![0x4C, 0x00, 0x80]);
    }
}
