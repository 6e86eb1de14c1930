//! Banked cartridge locations and numeric literal parsing.

use std::fmt;
use std::str::FromStr;

/// A location in banked PRG storage: a 16KB bank number plus a CPU-style offset.
///
/// Negative banks count back from the last bank, so `bank: -1` is always the
/// bank that sits at $C000 on a fixed-last board.
///
/// ```
/// use nes6502::Address;
///
/// let a: Address = "-1:$FFFC".parse().unwrap();
/// assert_eq!(a, Address::new(-1, 0xFFFC));
/// assert_eq!(a.to_string(), "-1:$FFFC");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Address {
    pub bank: i32,
    pub offset: u16,
}

impl Address {
    pub const fn new(bank: i32, offset: u16) -> Self {
        Self { bank, offset }
    }

    /// Same bank, offset moved by `delta` (wrapping).
    pub const fn add(self, delta: u16) -> Self {
        Self {
            bank: self.bank,
            offset: self.offset.wrapping_add(delta),
        }
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:${:04X}", self.bank, self.offset)
    }
}

/// Error returned when an [`Address`] or number fails to parse.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid number or address: {0:?}")]
pub struct ParseAddressError(pub String);

impl FromStr for Address {
    type Err = ParseAddressError;

    /// Accepts `offset` (bank 0) or `bank:offset`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || ParseAddressError(s.to_string());
        let (bank, offset) = match s.split_once(':') {
            Some((b, o)) => {
                let bank = parse_signed(b).ok_or_else(err)?;
                (i32::try_from(bank).map_err(|_| err())?, o)
            }
            None => (0, s),
        };
        let offset = parse_number(offset).ok_or_else(err)?;
        let offset = u16::try_from(offset).map_err(|_| err())?;
        Ok(Address::new(bank, offset))
    }
}

/// Parses an unsigned console/assembler literal.
///
/// `$FF` and `0xFF` are hex, `%1010` is binary, anything else is decimal.
pub fn parse_number(text: &str) -> Option<u32> {
    let text = text.trim();
    let (digits, radix) = if let Some(hex) = text.strip_prefix('$') {
        (hex, 16)
    } else if let Some(hex) = text
        .strip_prefix("0x")
        .or_else(|| text.strip_prefix("0X"))
    {
        (hex, 16)
    } else if let Some(bin) = text.strip_prefix('%') {
        (bin, 2)
    } else {
        (text, 10)
    };
    if digits.is_empty() {
        return None;
    }
    u32::from_str_radix(digits, radix).ok()
}

/// Like [`parse_number`] but allows a leading `-`.
pub fn parse_signed(text: &str) -> Option<i64> {
    let text = text.trim();
    match text.strip_prefix('-') {
        Some(rest) => parse_number(rest).map(|n| -(n as i64)),
        None => parse_number(text).map(i64::from),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_number_radixes() {
        assert_eq!(parse_number("$ff"), Some(0xFF));
        assert_eq!(parse_number("0x8000"), Some(0x8000));
        assert_eq!(parse_number("%101"), Some(5));
        assert_eq!(parse_number("42"), Some(42));
        assert_eq!(parse_number("$"), None);
        assert_eq!(parse_number("zz"), None);
    }

    #[test]
    fn test_parse_signed() {
        assert_eq!(parse_signed("-1"), Some(-1));
        assert_eq!(parse_signed("-$10"), Some(-16));
        assert_eq!(parse_signed("7"), Some(7));
    }

    #[test]
    fn test_address_from_str() {
        assert_eq!("$8000".parse(), Ok(Address::new(0, 0x8000)));
        assert_eq!("3:$8000".parse(), Ok(Address::new(3, 0x8000)));
        assert!("3:$10000".parse::<Address>().is_err());
        assert!("x:1".parse::<Address>().is_err());
    }

    #[test]
    fn test_address_bank_out_of_i32_range() {
        assert!("$FFFFFFFF:$8000".parse::<Address>().is_err());
        assert!("2147483648:0".parse::<Address>().is_err());
        assert_eq!("-1:$C000".parse(), Ok(Address::new(-1, 0xC000)));
        assert_eq!(
            "-$80000000:0".parse(),
            Ok(Address::new(i32::MIN, 0))
        );
    }

    #[test]
    fn test_add_wraps() {
        assert_eq!(Address::new(2, 0xFFFF).add(2), Address::new(2, 0x0001));
    }
}
