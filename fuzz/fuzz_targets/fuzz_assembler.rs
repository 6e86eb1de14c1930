//! Fuzz target for the assembler.
//!
//! Feeds arbitrary lines to one assembly session, then applies its fixups.
//! Errors are fine; panics are not.

#![no_main]

use libfuzzer_sys::fuzz_target;
use nes6502::{Assembler, FlatMemory};

fuzz_target!(|data: &[u8]| {
    let source = String::from_utf8_lossy(data);
    let mut memory = FlatMemory::new();
    let mut asm = Assembler::new();
    let mut cursor = 0x8000;

    for line in source.lines() {
        let _ = asm.assemble(&mut memory, line, &mut cursor);
    }
    let _ = asm.apply_fixups(&mut memory);
});
