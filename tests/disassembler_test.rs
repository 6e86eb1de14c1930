//! Listings produced from memory, banked ROM and the CPU's PC.

use nes6502::disassembler::{self, disassemble_bytes};
use nes6502::{mapper, BankView, Cartridge, Cpu, FlatMemory};

#[test]
fn test_listing_with_branch_and_illegal() {
    let mut memory = FlatMemory::new();
    memory.load(0x8000, &[0xA9, 0x05, 0xD0, 0xFC, 0x02, 0x6C, 0xFF, 0x10]);

    let lines = disassembler::disassemble_range(&memory, 0x8000, 4);
    assert_eq!(
        lines,
        vec![
            "8000: A9 05    LDA #$05",
            "8002: D0 FC    BNE #$FC ;[dest=$8000]",
            "8004: 02       .DB $02",
            "8005: 6C FF 10 JMP ($10FF)",
        ]
    );
}

#[test]
fn test_cursor_wraps_at_top_of_memory() {
    let mut memory = FlatMemory::new();
    memory.load(0xFFFF, &[0xAD]);
    memory.load(0x0000, &[0x34, 0x12]);

    let mut cursor = 0xFFFF;
    let line = disassembler::disassemble(&memory, &mut cursor);
    assert_eq!(line, "FFFF: AD 34 12 LDA $1234");
    assert_eq!(cursor, 0x0002);
}

#[test]
fn test_listing_from_selected_bank() {
    let mut cart = Cartridge::blank(4);
    cart.write_prg(2 * 0x4000, 0xE8); // INX at bank 2, $8000
    let board = mapper::create(2, cart).unwrap();

    let view = BankView::new(board, 2);
    assert_eq!(
        disassembler::disassemble_range(&view, 0x8000, 2),
        vec!["8000: E8       INX", "8001: 00       BRK"]
    );
}

#[test]
fn test_cpu_listing_follows_pc() {
    let mut memory = FlatMemory::new();
    memory.load(0xFFFC, &[0x00, 0x90]);
    memory.load(0x9000, &[0x0A, 0x95, 0x10]);
    let mut cpu = Cpu::new(memory);

    assert_eq!(cpu.disassemble(None), "9000: 0A       ASL A");
    cpu.step().unwrap();
    assert_eq!(cpu.disassemble(None), "9001: 95 10    STA $10,X");

    // An explicit cursor of zero starts at PC and is advanced
    let mut cursor = 0;
    cpu.disassemble(Some(&mut cursor));
    assert_eq!(cursor, 0x9003);
}

#[test]
fn test_truncated_tail_is_data() {
    let instrs = disassemble_bytes(&[0xEA, 0x20, 0x00], 0xC000);
    let mnemonics: Vec<&str> = instrs.iter().map(|i| i.mnemonic).collect();
    assert_eq!(mnemonics, vec!["NOP", ".DB", "BRK"]);
    assert_eq!(instrs[1].address, 0xC001);
}
