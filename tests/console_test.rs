//! Console sessions over a boxed MMC1 board, the way `nesmon` drives them.

use nes6502::cartridge::PRG_BANK_SIZE;
use nes6502::console::{Console, ConsoleError};
use nes6502::mapper::{self, Mapper};
use nes6502::Cartridge;

/// Four blank banks with the reset vector at $C000, following live banking.
fn session() -> Console<Box<dyn Mapper>> {
    let mut cart = Cartridge::blank(4);
    cart.write_prg(4 * PRG_BANK_SIZE - 3, 0xC0);
    let board = mapper::create(1, cart).unwrap();
    Console::new(board, None)
}

fn run(console: &mut Console<Box<dyn Mapper>>, line: &str) -> Vec<String> {
    console
        .execute(line)
        .unwrap_or_else(|e| panic!("{line}: {e}"))
}

#[test]
fn test_live_session() {
    let mut c = session();
    assert_eq!(run(&mut c, "bank"), vec!["bank live"]);
    assert_eq!(run(&mut c, "regs"), vec!["PC=C000 A=00 X=00 Y=00 SP=1FD nvUbdIzc"]);

    // Assemble into the fixed bank, read it back through the board
    assert_eq!(
        run(&mut c, "a b=-1 $C000 LDA #$02"),
        vec!["C000: A9 02    LDA #$02"]
    );
    assert_eq!(run(&mut c, "u $C000 1"), vec!["C000: A9 02    LDA #$02"]);
    run(&mut c, "wbp b=-1 $C002 $02");

    let out = run(&mut c, "step 2");
    assert_eq!(
        out,
        vec![
            "C000: A9 02    LDA #$02",
            "C002: 02       .DB $02",
            "[warn] Illegal opcode 02 at c002",
            "PC=C003 A=02 X=00 Y=00 SP=1FD nvUbdIzc",
        ]
    );
}

#[test]
fn test_mapper_registers_switch_banks() {
    let mut c = session();
    run(&mut c, "wbp b=2 $8000 $42");
    assert!(run(&mut c, "db $8000 1")[0].starts_with("8000:  00"));

    let out = run(&mut c, "wm prg_bank 2");
    assert_eq!(out[0], "prg_mode=03 prg_bank=02");
    assert!(run(&mut c, "db $8000 1")[0].starts_with("8000:  42"));

    // Five writes to the serial port select bank 1
    for bit in ["1", "0", "0", "0", "0"] {
        run(&mut c, &format!("wm $E000 {bit}"));
    }
    let out = run(&mut c, "wm");
    assert_eq!(out[0], "prg_mode=03 prg_bank=01");
}

#[test]
fn test_labels_and_unresolved_fixups() {
    let mut c = session();
    run(&mut c, "a b=-1 $C000 JSR INIT");
    run(&mut c, "a b=-1 JMP MISSING");
    assert_eq!(run(&mut c, "a b=-1 INIT:"), vec!["C006: Meta"]);
    assert_eq!(run(&mut c, "labels"), vec!["INIT = $C006"]);

    assert_eq!(
        run(&mut c, "fixups"),
        vec!["Fixup at $C003: label MISSING not found"]
    );
    assert_eq!(run(&mut c, "u b=-1 $C000 1"), vec!["C000: 20 06 C0 JSR $C006"]);

    run(&mut c, "asmreset");
    assert!(run(&mut c, "labels").is_empty());
}

#[test]
fn test_errors() {
    let mut c = session();
    assert!(matches!(c.execute("db"), Err(ConsoleError::Usage(_))));
    assert!(matches!(c.execute("db $zz"), Err(ConsoleError::BadNumber(_))));
    assert_eq!(
        c.execute("a $C000 STA #1").unwrap_err().to_string(),
        "InvalidMode: STA has no Immediate form"
    );
    assert!(c.execute("wm nope 1").is_err());
}

#[test]
fn test_help_lists_commands() {
    let mut c = session();
    let help = run(&mut c, "help");
    assert!(help.iter().any(|l| l.starts_with("asmhelp")));
    assert!(run(&mut c, "asmhelp")[0].starts_with("Instruction"));
}
