//! Fuzz target for the disassembler.
//!
//! Checks that decoding arbitrary bytes covers them exactly and that every
//! listed line goes back through the assembler.

#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use nes6502::disassembler::{disassemble_bytes, formatter};
use nes6502::{Assembler, FlatMemory, MemoryBus};

#[derive(Debug, Arbitrary)]
struct FuzzInput {
    origin: u16,
    bytes: Vec<u8>,
}

fuzz_target!(|input: FuzzInput| {
    if input.bytes.len() > 4096 {
        return;
    }

    let instructions = disassemble_bytes(&input.bytes, input.origin);

    let mut total = 0usize;
    let mut expected = input.origin;
    for instr in &instructions {
        assert_eq!(instr.address, expected);
        assert!((1..=3).contains(&instr.size));
        assert_eq!(instr.bytes().len(), instr.size as usize);
        total += instr.size as usize;
        expected = expected.wrapping_add(instr.size as u16);

        // Every decoded line reassembles to its own bytes
        let text = formatter::format_instruction(instr);
        let mut memory = FlatMemory::new();
        let mut cursor = instr.address;
        Assembler::new()
            .assemble(&mut memory, &text, &mut cursor)
            .unwrap_or_else(|e| panic!("{text}: {e}"));
        let emitted: Vec<u8> = (0..instr.size as u16)
            .map(|i| memory.read(instr.address.wrapping_add(i)))
            .collect();
        assert_eq!(emitted, instr.bytes(), "{text}");
    }
    assert_eq!(total, input.bytes.len());
});
