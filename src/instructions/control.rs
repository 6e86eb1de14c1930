//! # Control Flow Instructions
//!
//! JMP, JSR, RTS, RTI and BRK. NOP has no semantics and is handled by the
//! dispatcher.
//!
//! Return addresses follow the hardware convention: JSR pushes the address of
//! its own last byte and RTS adds one after pulling it. BRK is a one-byte
//! opcode whose pushed return address skips a padding byte.

use crate::cpu::IRQ_VECTOR;
use crate::status::Status;
use crate::{Cpu, MemoryBus};

pub(crate) fn execute_jmp<M: MemoryBus>(cpu: &mut Cpu<M>, target: u16) {
    cpu.pc = target;
}

pub(crate) fn execute_jsr<M: MemoryBus>(cpu: &mut Cpu<M>, target: u16) {
    cpu.push_word(cpu.pc.wrapping_sub(1));
    cpu.pc = target;
}

pub(crate) fn execute_rts<M: MemoryBus>(cpu: &mut Cpu<M>) {
    cpu.pc = cpu.pull_word().wrapping_add(1);
}

pub(crate) fn execute_rti<M: MemoryBus>(cpu: &mut Cpu<M>) {
    let p = cpu.pull();
    cpu.p = Status::pulled(p);
    cpu.pc = cpu.pull_word();
}

pub(crate) fn execute_brk<M: MemoryBus>(cpu: &mut Cpu<M>) {
    cpu.push_word(cpu.pc.wrapping_add(1));
    cpu.push(cpu.p.pushed());
    cpu.p.insert(Status::INTERRUPT_DISABLE);
    cpu.pc = cpu.memory.read_word(IRQ_VECTOR);
}
