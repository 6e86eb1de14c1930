//! Fuzz target for CPU step execution.
//!
//! Runs a few steps from an arbitrary register state and memory image,
//! including pending interrupts and stalls.

#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use nes6502::{Cpu, FlatMemory, MemoryBus};

#[derive(Debug, Arbitrary)]
struct FuzzCpuState {
    a: u8,
    x: u8,
    y: u8,
    sp: u8,
    status: u8,
    nmi: bool,
    irq: bool,
    stall: u8,
}

#[derive(Debug, Arbitrary)]
struct FuzzInput {
    cpu: FuzzCpuState,
    /// Code at $8000
    program: [u8; 16],
    zero_page: [u8; 256],
    stack_page: [u8; 256],
    vectors: [u8; 6],
}

fuzz_target!(|input: FuzzInput| {
    let mut memory = FlatMemory::new();
    memory.load(0x8000, &input.program);
    memory.load(0x0000, &input.zero_page);
    memory.load(0x0100, &input.stack_page);
    memory.load(0xFFFA, &input.vectors);
    memory.write(0xFFFC, 0x00);
    memory.write(0xFFFD, 0x80);

    let mut cpu = Cpu::new(memory);
    cpu.set_a(input.cpu.a);
    cpu.set_x(input.cpu.x);
    cpu.set_y(input.cpu.y);
    cpu.set_sp(input.cpu.sp);
    cpu.set_status(input.cpu.status);
    if input.cpu.nmi {
        cpu.nmi();
    }
    if input.cpu.irq {
        cpu.irq();
    }
    cpu.stall(input.cpu.stall as u32);

    for _ in 0..8 {
        let before = cpu.cycles();
        let _ = cpu.step();
        assert!(cpu.cycles() > before);
        let _ = cpu.cpu_state();
        let _ = cpu.disassemble(None);
    }
});
