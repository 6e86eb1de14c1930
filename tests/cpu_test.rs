//! Interpreter behaviour through the public `Cpu` API.
//!
//! Tests cover:
//! - Reset state and the register dump
//! - Base cycles, page-crossing and branch penalties
//! - The indirect JMP page-wrap bug
//! - Stack page wrapping and the B/U bits of pushed and pulled status
//! - NMI/IRQ priority, masking and the level-triggered IRQ line
//! - Illegal opcodes, stall injection and the self-loop watchdog

use nes6502::{Cpu, CpuConfig, ExecutionError, FlatMemory, MemoryBus};

/// Helper function to create a CPU with reset vector at 0x8000
fn setup_cpu() -> Cpu<FlatMemory> {
    let mut memory = FlatMemory::new();
    memory.write(0xFFFC, 0x00);
    memory.write(0xFFFD, 0x80);
    Cpu::new(memory)
}

fn load(cpu: &mut Cpu<FlatMemory>, origin: u16, bytes: &[u8]) {
    cpu.memory_mut().load(origin, bytes);
}

fn set_vector(cpu: &mut Cpu<FlatMemory>, vector: u16, target: u16) {
    cpu.memory_mut().write(vector, target as u8);
    cpu.memory_mut().write(vector + 1, (target >> 8) as u8);
}

// ========== Reset ==========

#[test]
fn test_reset_state() {
    let cpu = setup_cpu();
    assert_eq!(cpu.pc(), 0x8000);
    assert_eq!(cpu.sp(), 0xFD);
    assert_eq!(cpu.status(), 0x24);
    assert_eq!(cpu.cycles(), 0);
    assert_eq!(cpu.cpu_state(), "PC=8000 A=00 X=00 Y=00 SP=1FD nvUbdIzc");
}

#[test]
fn test_reset_clears_pending_work() {
    let mut cpu = setup_cpu();
    cpu.set_a(0x42);
    cpu.nmi();
    cpu.stall(10);
    cpu.reset();
    assert_eq!(cpu.a(), 0);
    assert!(!cpu.nmi_pending());
    assert_eq!(cpu.stalled(), 0);
}

#[test]
fn test_reset_flags_from_config() {
    let mut memory = FlatMemory::new();
    memory.write(0xFFFD, 0xC0);
    let cpu = Cpu::with_config(memory, CpuConfig::default().with_reset_flags(0x34));
    assert_eq!(cpu.pc(), 0xC000);
    assert_eq!(cpu.status(), 0x34);
}

// ========== Cycles ==========

#[test]
fn test_immediate_load_cycles() {
    let mut cpu = setup_cpu();
    load(&mut cpu, 0x8000, &[0xA9, 0x05]); // LDA #$05
    assert_eq!(cpu.step(), Ok(2));
    assert_eq!(cpu.a(), 0x05);
    assert_eq!(cpu.pc(), 0x8002);
}

#[test]
fn test_indexed_load_page_cross_costs_one() {
    let mut cpu = setup_cpu();
    // LDX #$20 ; LDA $12F0,X ; LDA $1200,X
    load(&mut cpu, 0x8000, &[0xA2, 0x20, 0xBD, 0xF0, 0x12, 0xBD, 0x00, 0x12]);
    cpu.memory_mut().write(0x1310, 0x77);
    cpu.memory_mut().write(0x1220, 0x66);

    assert_eq!(cpu.step(), Ok(2));
    assert_eq!(cpu.step(), Ok(5));
    assert_eq!(cpu.a(), 0x77);
    assert_eq!(cpu.step(), Ok(4));
    assert_eq!(cpu.a(), 0x66);
    assert_eq!(cpu.cycles(), 11);
}

#[test]
fn test_indexed_store_has_no_page_penalty() {
    let mut cpu = setup_cpu();
    cpu.set_x(0x20);
    load(&mut cpu, 0x8000, &[0x9D, 0xF0, 0x12]); // STA $12F0,X
    assert_eq!(cpu.step(), Ok(5));
}

#[test]
fn test_branch_not_taken() {
    let mut cpu = setup_cpu();
    load(&mut cpu, 0x8000, &[0xF0, 0x02]); // BEQ +2, Z clear
    assert_eq!(cpu.step(), Ok(2));
    assert_eq!(cpu.pc(), 0x8002);
}

#[test]
fn test_branch_taken_same_page() {
    let mut cpu = setup_cpu();
    load(&mut cpu, 0x8000, &[0xD0, 0x02]); // BNE +2
    assert_eq!(cpu.step(), Ok(3));
    assert_eq!(cpu.pc(), 0x8004);
}

#[test]
fn test_branch_taken_backwards() {
    let mut cpu = setup_cpu();
    load(&mut cpu, 0x8010, &[0xD0, 0xFC]); // BNE -4
    cpu.set_pc(0x8010);
    assert_eq!(cpu.step(), Ok(3));
    assert_eq!(cpu.pc(), 0x800E);
}

#[test]
fn test_branch_taken_cross_page() {
    let mut cpu = setup_cpu();
    load(&mut cpu, 0x80F0, &[0xD0, 0x20]); // BNE +$20
    cpu.set_pc(0x80F0);
    assert_eq!(cpu.step(), Ok(4));
    assert_eq!(cpu.pc(), 0x8112);
}

// ========== Jumps ==========

#[test]
fn test_jmp_indirect_page_wrap_bug() {
    let mut cpu = setup_cpu();
    load(&mut cpu, 0x8000, &[0x6C, 0xFF, 0x10]); // JMP ($10FF)
    cpu.memory_mut().write(0x10FF, 0x12);
    cpu.memory_mut().write(0x1000, 0x34);
    cpu.memory_mut().write(0x1100, 0x56);

    assert_eq!(cpu.step(), Ok(5));
    assert_eq!(cpu.pc(), 0x3412);
}

#[test]
fn test_jsr_rts() {
    let mut cpu = setup_cpu();
    load(&mut cpu, 0x8000, &[0x20, 0x00, 0x90]); // JSR $9000
    load(&mut cpu, 0x9000, &[0x60]); // RTS

    assert_eq!(cpu.step(), Ok(6));
    assert_eq!(cpu.pc(), 0x9000);
    assert_eq!(cpu.memory().read(0x01FD), 0x80);
    assert_eq!(cpu.memory().read(0x01FC), 0x02);

    assert_eq!(cpu.step(), Ok(6));
    assert_eq!(cpu.pc(), 0x8003);
    assert_eq!(cpu.sp(), 0xFD);
}

#[test]
fn test_brk_pushes_pc_plus_two() {
    let mut cpu = setup_cpu();
    set_vector(&mut cpu, 0xFFFE, 0xA000);
    load(&mut cpu, 0x8000, &[0x00]);

    assert_eq!(cpu.step(), Ok(7));
    assert_eq!(cpu.pc(), 0xA000);
    assert_eq!(cpu.memory().read_word(0x01FC), 0x8002);
    assert_eq!(cpu.memory().read(0x01FB), 0x34);
    assert!(cpu.flag_i());
}

// ========== Stack and status ==========

#[test]
fn test_php_sets_break_and_unused_plp_clears_break() {
    let mut cpu = setup_cpu();
    // PHP ; PLA ; LDA #$FF ; PHA ; PLP
    load(&mut cpu, 0x8000, &[0x08, 0x68, 0xA9, 0xFF, 0x48, 0x28]);

    assert_eq!(cpu.step(), Ok(3));
    assert_eq!(cpu.step(), Ok(4));
    assert_eq!(cpu.a(), 0x34);

    for _ in 0..3 {
        cpu.step().unwrap();
    }
    assert_eq!(cpu.status(), 0xEF);
    assert!(!cpu.flag_b());
    assert_eq!(cpu.sp(), 0xFD);
}

#[test]
fn test_stack_wraps_inside_page_one() {
    let mut cpu = setup_cpu();
    cpu.set_sp(0x00);
    cpu.set_a(0x99);
    load(&mut cpu, 0x8000, &[0x48, 0x48, 0x68]); // PHA ; PHA ; PLA

    cpu.step().unwrap();
    assert_eq!(cpu.sp(), 0xFF);
    assert_eq!(cpu.memory().read(0x0100), 0x99);

    cpu.step().unwrap();
    assert_eq!(cpu.memory().read(0x01FF), 0x99);
    assert_eq!(cpu.memory().read(0x0000), 0x00);

    cpu.step().unwrap();
    assert_eq!(cpu.sp(), 0xFF);
    assert_eq!(cpu.a(), 0x99);
}

// ========== Interrupts ==========

#[test]
fn test_nmi_taken_before_irq() {
    let mut cpu = setup_cpu();
    set_vector(&mut cpu, 0xFFFA, 0x9000);
    set_vector(&mut cpu, 0xFFFE, 0xA000);
    load(&mut cpu, 0x9000, &[0xEA, 0x40]); // NOP ; RTI
    load(&mut cpu, 0xA000, &[0xEA]);
    cpu.set_flag_i(false);

    cpu.irq();
    cpu.nmi();

    // 7 for the interrupt sequence, 2 for the NOP at the vector
    assert_eq!(cpu.step(), Ok(9));
    assert_eq!(cpu.pc(), 0x9001);
    assert_eq!(cpu.memory().read(0x01FD), 0x80);
    assert_eq!(cpu.memory().read(0x01FC), 0x00);
    assert_eq!(cpu.memory().read(0x01FB), 0x30);
    assert!(cpu.flag_i());
    assert!(cpu.irq_pending());

    // RTI restores I clear; the IRQ waits until then
    cpu.step().unwrap();
    assert_eq!(cpu.pc(), 0x8000);
    assert!(!cpu.flag_i());

    cpu.step().unwrap();
    assert_eq!(cpu.pc(), 0xA001);
    assert!(!cpu.irq_pending());
}

#[test]
fn test_irq_masked_by_interrupt_disable() {
    let mut cpu = setup_cpu();
    set_vector(&mut cpu, 0xFFFE, 0xA000);
    load(&mut cpu, 0x8000, &[0xEA, 0x58, 0xEA]); // NOP ; CLI ; NOP
    load(&mut cpu, 0xA000, &[0xEA]);

    cpu.irq();
    cpu.step().unwrap();
    assert_eq!(cpu.pc(), 0x8001);
    cpu.step().unwrap();
    assert_eq!(cpu.pc(), 0x8002);

    cpu.step().unwrap();
    assert_eq!(cpu.pc(), 0xA001);
    assert_eq!(cpu.memory().read_word(0x01FC), 0x8002);
}

/// Flat RAM with an externally driven IRQ line.
struct IrqBus {
    ram: FlatMemory,
    line: bool,
}

impl MemoryBus for IrqBus {
    fn read(&self, addr: u16) -> u8 {
        self.ram.read(addr)
    }

    fn write(&mut self, addr: u16, value: u8) {
        self.ram.write(addr, value)
    }

    fn irq_active(&self) -> bool {
        self.line
    }
}

#[test]
fn test_irq_line_is_level_triggered() {
    let mut ram = FlatMemory::new();
    ram.write(0xFFFD, 0x80);
    ram.write(0xFFFF, 0xA0);
    ram.load(0x8000, &[0xEA, 0xEA]);
    ram.load(0xA000, &[0x40]); // RTI
    let mut cpu = Cpu::new(IrqBus { ram, line: true });

    // Line held high but masked
    cpu.step().unwrap();
    assert_eq!(cpu.pc(), 0x8001);

    // Interrupt sequence plus the RTI at the vector
    cpu.set_flag_i(false);
    assert_eq!(cpu.step(), Ok(13));
    assert_eq!(cpu.pc(), 0x8001);

    // Still asserted after RTI: taken again
    assert_eq!(cpu.step(), Ok(13));
    assert_eq!(cpu.pc(), 0x8001);

    cpu.memory_mut().line = false;
    assert_eq!(cpu.step(), Ok(2));
    assert_eq!(cpu.pc(), 0x8002);
}

// ========== Diagnostics ==========

#[test]
fn test_illegal_opcode_is_reported_and_skipped() {
    let mut cpu = setup_cpu();
    load(&mut cpu, 0x8000, &[0x02, 0xA9, 0x01]);
    cpu.set_a(0x10);

    let err = cpu.step().unwrap_err();
    assert_eq!(
        err,
        ExecutionError::IllegalOpcode {
            opcode: 0x02,
            pc: 0x8000
        }
    );
    assert_eq!(err.to_string(), "Illegal opcode 02 at 8000");
    assert_eq!(cpu.pc(), 0x8001);
    assert_eq!(cpu.a(), 0x10);
    assert_eq!(cpu.status(), 0x24);

    assert_eq!(cpu.emulate(), 2);
    assert_eq!(cpu.a(), 0x01);
}

#[test]
fn test_stall_consumes_single_cycles() {
    let mut cpu = setup_cpu();
    load(&mut cpu, 0x8000, &[0xEA]);
    cpu.stall(3);

    for _ in 0..3 {
        assert_eq!(cpu.step(), Ok(1));
        assert_eq!(cpu.pc(), 0x8000);
    }
    assert_eq!(cpu.step(), Ok(2));
    assert_eq!(cpu.cycles(), 5);
}

#[test]
fn test_self_loop_watchdog() {
    let mut memory = FlatMemory::new();
    memory.write(0xFFFD, 0x80);
    memory.load(0x8000, &[0x4C, 0x00, 0x80]); // JMP $8000
    let mut cpu = Cpu::with_config(memory, CpuConfig::default().with_self_loop_limit(3));

    assert!(cpu.step().is_ok());
    assert!(cpu.step().is_ok());
    assert_eq!(
        cpu.step(),
        Err(ExecutionError::SelfLoop {
            pc: 0x8000,
            count: 3
        })
    );
    // Counter restarts
    assert!(cpu.step().is_ok());
}

#[test]
fn test_self_loop_ignored_by_default() {
    let mut cpu = setup_cpu();
    load(&mut cpu, 0x8000, &[0x4C, 0x00, 0x80]);
    assert_eq!(cpu.run_for_cycles(300), Ok(300));
    assert_eq!(cpu.pc(), 0x8000);
}
