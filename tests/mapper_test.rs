//! Cartridge boards driven through the CPU.
//!
//! Tests cover:
//! - MMC1 serial register writes issued by a running program
//! - The pinned and live `BankView` address maps
//! - Board registry lookup and banked word helpers

use nes6502::cartridge::PRG_BANK_SIZE;
use nes6502::mapper::{self, Mmc1};
use nes6502::{Address, Assembler, BankView, Cartridge, Cpu, Mapper, MapperError, MemoryBus};

/// PRG where every byte of bank `i` is `i`.
fn numbered_cart(banks: usize) -> Cartridge {
    let mut prg = vec![0; banks * PRG_BANK_SIZE];
    for (i, chunk) in prg.chunks_mut(PRG_BANK_SIZE).enumerate() {
        chunk.fill(i as u8);
    }
    Cartridge::new(prg, Vec::new()).unwrap()
}

/// Assembles `lines` into the last bank, then hands back a live view.
fn program<M: Mapper>(mapper: M, lines: &[&str]) -> BankView<M> {
    let mut view = BankView::new(mapper, -1);
    let mut asm = Assembler::new();
    let mut cursor = 0xC000;
    for line in lines {
        asm.assemble(&mut view, line, &mut cursor)
            .unwrap_or_else(|e| panic!("{line}: {e}"));
    }
    assert!(asm.apply_fixups(&mut view).is_empty());
    view.set_bank(None);
    view
}

#[test]
fn test_mmc1_serial_writes_from_program() {
    let view = program(
        Mmc1::new(numbered_cart(8)),
        &[
            "      LDA #3",
            "      LDX #5",
            "LOOP: STA $E000",
            "      LSR A",
            "      DEX",
            "      BNE LOOP",
            "      LDA $8000",
            "DONE: JMP DONE",
            ".ORG $FFFC",
            ".DW $C000",
        ],
    );
    let mut cpu = Cpu::new(view);
    assert_eq!(cpu.pc(), 0xC000);

    for _ in 0..23 {
        cpu.step().unwrap();
    }
    assert_eq!(cpu.a(), 3);
    let mmc1 = cpu.memory().mapper();
    assert_eq!(mmc1.prg_mode(), 3);
    assert_eq!(mmc1.prg_bank(), 3);
    assert_eq!(cpu.memory().read(0xC000), 0xA9);
}

#[test]
fn test_mmc1_reset_bit_from_program() {
    let view = program(
        Mmc1::new(numbered_cart(4)),
        &[
            "LDA #0",
            "STA $8000",
            "STA $8000",
            "STA $8000",
            "STA $8000",
            "STA $8000",
            ".ORG $FFFC",
            ".DW $C000",
        ],
    );
    let mut cpu = Cpu::new(view);

    for _ in 0..6 {
        cpu.step().unwrap();
    }
    // 32KB mode: bank pair 0/1
    assert_eq!(cpu.memory().mapper().prg_mode(), 0);
    assert_eq!(cpu.memory().read(0xC000), 1);

    cpu.memory_mut().write(0x8000, 0x80);
    assert_eq!(cpu.memory().mapper().prg_mode(), 3);
    assert_eq!(cpu.memory().read(0xC000), 3);
}

/// Five single-bit CPU writes of `value` to the MMC1 port at `addr`.
fn serial_write<B: MemoryBus>(bus: &mut B, addr: u16, value: u8) {
    for bit in 0..5 {
        bus.write(addr, (value >> bit) & 1);
    }
}

#[test]
fn test_mmc1_mode3_bank3_from_any_prior_state() {
    // (control, prg bank) left behind by earlier code
    let prior = [(0x08, 5), (0x00, 6), (0x04, 2), (0x0C, 7)];
    for (control, bank) in prior {
        let mut view = BankView::live(Mmc1::new(numbered_cart(8)));
        serial_write(&mut view, 0x8000, control);
        serial_write(&mut view, 0xE000, bank);
        // A dangling partial write is cleared by the reset bit
        view.write(0xE000, 1);
        view.write(0x8000, 0x80);

        serial_write(&mut view, 0x8000, 0x0C);
        serial_write(&mut view, 0xE000, 3);

        let mmc1 = view.mapper();
        assert_eq!((mmc1.prg_mode(), mmc1.prg_bank()), (3, 3), "from {control:02x}/{bank}");
        assert_eq!(view.read(0x8000), 3);
        assert_eq!(view.read(0xBFFF), 3);
        assert_eq!(view.read(0xC000), 7);
        assert_eq!(view.read(0xFFFF), 7);
    }
}

#[test]
fn test_pinned_view_map() {
    let mut view = BankView::new(mapper::Uxrom::new(numbered_cart(4)), 2);
    assert_eq!(view.read(0x8000), 2);
    assert_eq!(view.read(0xBFFF), 2);
    assert_eq!(view.read(0xC000), 3);

    // Work RAM mirrors every 2KB
    view.write(0x0801, 0x5A);
    assert_eq!(view.read(0x0001), 0x5A);

    // Writes patch the selected bank
    view.write(0x8010, 0xEE);
    assert_eq!(view.mapper().cartridge().read_prg(2 * PRG_BANK_SIZE + 0x10), 0xEE);

    view.set_bank(Some(-4));
    assert_eq!(view.read(0x8000), 0);
}

#[test]
fn test_live_view_follows_board() {
    let mut view = BankView::live(mapper::Uxrom::new(numbered_cart(4)));
    assert_eq!(view.read(0x8000), 0);
    view.write(0x8000, 2);
    assert_eq!(view.read(0x8000), 2);
    assert_eq!(view.read(0xC000), 3);
}

#[test]
fn test_registry() {
    let ids: Vec<u8> = mapper::supported_ids().collect();
    assert_eq!(ids, vec![0, 1, 2, 3, 4, 5]);

    let board = mapper::create(1, numbered_cart(2)).unwrap();
    assert_eq!(board.name(), "MMC1");

    assert!(matches!(
        mapper::create(7, numbered_cart(2)),
        Err(MapperError::Unsupported(7))
    ));
}

#[test]
fn test_bad_prg_size_rejected() {
    assert_eq!(
        Cartridge::new(vec![0; 100], Vec::new()).err(),
        Some(MapperError::BadBankSize {
            what: "PRG",
            len: 100,
            bank: PRG_BANK_SIZE
        })
    );
}

#[test]
fn test_banked_word_helpers() {
    let mut board = mapper::create(1, numbered_cart(4)).unwrap();
    let at = Address::new(2, 0x9000);

    board.write_word(at, 4, 0xBEEF);
    assert_eq!(board.read_word(at, 4), 0xBEEF);
    assert_eq!(board.read_at(at, 4), 0xEF);
    assert_eq!(board.read_at(Address::new(-2, 0x9004), 1), 0xBE);

    board.write_word(at, 0, 0x8123);
    assert_eq!(board.read_addr(at, 0), Address::new(2, 0x8123));
}
