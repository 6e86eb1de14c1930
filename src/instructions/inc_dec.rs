//! # Increment and Decrement Instructions
//!
//! All of them wrap at 8 bits and set Z and N from the result. Carry and
//! overflow are untouched.

use crate::{Cpu, MemoryBus};

pub(crate) fn execute_inc<M: MemoryBus>(cpu: &mut Cpu<M>, addr: u16) {
    let value = cpu.memory.read(addr).wrapping_add(1);
    cpu.memory.write(addr, value);
    cpu.p.set_zn(value);
}

pub(crate) fn execute_dec<M: MemoryBus>(cpu: &mut Cpu<M>, addr: u16) {
    let value = cpu.memory.read(addr).wrapping_sub(1);
    cpu.memory.write(addr, value);
    cpu.p.set_zn(value);
}

pub(crate) fn execute_inx<M: MemoryBus>(cpu: &mut Cpu<M>) {
    cpu.x = cpu.x.wrapping_add(1);
    cpu.p.set_zn(cpu.x);
}

pub(crate) fn execute_iny<M: MemoryBus>(cpu: &mut Cpu<M>) {
    cpu.y = cpu.y.wrapping_add(1);
    cpu.p.set_zn(cpu.y);
}

pub(crate) fn execute_dex<M: MemoryBus>(cpu: &mut Cpu<M>) {
    cpu.x = cpu.x.wrapping_sub(1);
    cpu.p.set_zn(cpu.x);
}

pub(crate) fn execute_dey<M: MemoryBus>(cpu: &mut Cpu<M>) {
    cpu.y = cpu.y.wrapping_sub(1);
    cpu.p.set_zn(cpu.y);
}
