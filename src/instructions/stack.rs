//! # Stack Instructions
//!
//! PHP pushes P with the break and unused bits set. PLP restores P with
//! break cleared and unused set, since neither is a real flip-flop.

use crate::status::Status;
use crate::{Cpu, MemoryBus};

pub(crate) fn execute_pha<M: MemoryBus>(cpu: &mut Cpu<M>) {
    cpu.push(cpu.a);
}

pub(crate) fn execute_php<M: MemoryBus>(cpu: &mut Cpu<M>) {
    cpu.push(cpu.p.pushed());
}

pub(crate) fn execute_pla<M: MemoryBus>(cpu: &mut Cpu<M>) {
    cpu.a = cpu.pull();
    cpu.p.set_zn(cpu.a);
}

pub(crate) fn execute_plp<M: MemoryBus>(cpu: &mut Cpu<M>) {
    let value = cpu.pull();
    cpu.p = Status::pulled(value);
}
