//! # Load and Store Instructions
//!
//! Loads set Z and N from the loaded value. Stores leave the flags alone.

use crate::{Cpu, MemoryBus};

pub(crate) fn execute_lda<M: MemoryBus>(cpu: &mut Cpu<M>, addr: u16) {
    cpu.a = cpu.memory.read(addr);
    cpu.p.set_zn(cpu.a);
}

pub(crate) fn execute_ldx<M: MemoryBus>(cpu: &mut Cpu<M>, addr: u16) {
    cpu.x = cpu.memory.read(addr);
    cpu.p.set_zn(cpu.x);
}

pub(crate) fn execute_ldy<M: MemoryBus>(cpu: &mut Cpu<M>, addr: u16) {
    cpu.y = cpu.memory.read(addr);
    cpu.p.set_zn(cpu.y);
}

pub(crate) fn execute_sta<M: MemoryBus>(cpu: &mut Cpu<M>, addr: u16) {
    cpu.memory.write(addr, cpu.a);
}

pub(crate) fn execute_stx<M: MemoryBus>(cpu: &mut Cpu<M>, addr: u16) {
    cpu.memory.write(addr, cpu.x);
}

pub(crate) fn execute_sty<M: MemoryBus>(cpu: &mut Cpu<M>, addr: u16) {
    cpu.memory.write(addr, cpu.y);
}
