//! Labels and pending fixups for one assembly session

use std::collections::BTreeMap;

/// A `.DB`/`.DW`/`.DD` operand waiting for its symbol.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataFixup {
    /// Bytes to patch (1, 2 or 4)
    pub width: u8,
    pub symbol: String,
}

/// Label values plus the code and data fixups that still refer to
/// undefined labels.
///
/// Labels are added or overwritten, and only removed to undo a failed
/// line. Fixups are keyed by the address
/// they patch; a later fixup at the same address replaces the earlier one.
#[derive(Debug, Clone, Default)]
pub struct SymbolTable {
    labels: BTreeMap<String, u32>,
    code_fixups: BTreeMap<u16, String>,
    data_fixups: BTreeMap<u16, DataFixup>,
}

impl SymbolTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Binds `name` to `value`, replacing any earlier binding.
    pub fn define(&mut self, name: &str, value: u32) {
        tracing::debug!(label = name, value = format_args!("${value:04X}"), "define label");
        self.labels.insert(name.to_string(), value);
    }

    /// Puts `name` back to `previous`, removing it when it had no value.
    pub(crate) fn restore(&mut self, name: &str, previous: Option<u32>) {
        match previous {
            Some(value) => {
                self.labels.insert(name.to_string(), value);
            }
            None => {
                self.labels.remove(name);
            }
        }
    }

    pub fn lookup(&self, name: &str) -> Option<u32> {
        self.labels.get(name).copied()
    }

    /// All labels in name order.
    pub fn labels(&self) -> impl Iterator<Item = (&str, u32)> {
        self.labels.iter().map(|(name, value)| (name.as_str(), *value))
    }

    /// Records that the instruction at `at` needs `symbol` patched into its operand.
    pub fn add_code_fixup(&mut self, at: u16, symbol: &str) {
        tracing::debug!(at = format_args!("${at:04X}"), symbol, "code fixup");
        self.code_fixups.insert(at, symbol.to_string());
    }

    /// Records that `width` bytes at `at` must hold the value of `symbol`.
    pub fn add_data_fixup(&mut self, at: u16, width: u8, symbol: &str) {
        tracing::debug!(at = format_args!("${at:04X}"), width, symbol, "data fixup");
        self.data_fixups.insert(
            at,
            DataFixup {
                width,
                symbol: symbol.to_string(),
            },
        );
    }

    /// Number of fixups not yet applied.
    pub fn pending(&self) -> usize {
        self.code_fixups.len() + self.data_fixups.len()
    }

    pub(crate) fn take_code_fixups(&mut self) -> BTreeMap<u16, String> {
        std::mem::take(&mut self.code_fixups)
    }

    pub(crate) fn take_data_fixups(&mut self) -> BTreeMap<u16, DataFixup> {
        std::mem::take(&mut self.data_fixups)
    }

    /// Forgets every label and fixup.
    pub fn clear(&mut self) {
        self.labels.clear();
        self.code_fixups.clear();
        self.data_fixups.clear();
    }
}
