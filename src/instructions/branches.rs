//! # Branch Instructions
//!
//! All eight conditional branches share one timing rule: a taken branch costs
//! one extra cycle, and one more when the target lies on a different page from
//! the instruction that follows the branch.

use crate::status::Status;
use crate::{Cpu, MemoryBus};

fn branch_if<M: MemoryBus>(cpu: &mut Cpu<M>, condition: bool, target: u16) {
    if !condition {
        return;
    }
    cpu.cycles += 1;
    if (cpu.pc & 0xFF00) != (target & 0xFF00) {
        cpu.cycles += 1;
    }
    cpu.pc = target;
}

pub(crate) fn execute_bcc<M: MemoryBus>(cpu: &mut Cpu<M>, target: u16) {
    let taken = !cpu.p.contains(Status::CARRY);
    branch_if(cpu, taken, target);
}

pub(crate) fn execute_bcs<M: MemoryBus>(cpu: &mut Cpu<M>, target: u16) {
    let taken = cpu.p.contains(Status::CARRY);
    branch_if(cpu, taken, target);
}

pub(crate) fn execute_beq<M: MemoryBus>(cpu: &mut Cpu<M>, target: u16) {
    let taken = cpu.p.contains(Status::ZERO);
    branch_if(cpu, taken, target);
}

pub(crate) fn execute_bne<M: MemoryBus>(cpu: &mut Cpu<M>, target: u16) {
    let taken = !cpu.p.contains(Status::ZERO);
    branch_if(cpu, taken, target);
}

pub(crate) fn execute_bmi<M: MemoryBus>(cpu: &mut Cpu<M>, target: u16) {
    let taken = cpu.p.contains(Status::NEGATIVE);
    branch_if(cpu, taken, target);
}

pub(crate) fn execute_bpl<M: MemoryBus>(cpu: &mut Cpu<M>, target: u16) {
    let taken = !cpu.p.contains(Status::NEGATIVE);
    branch_if(cpu, taken, target);
}

pub(crate) fn execute_bvc<M: MemoryBus>(cpu: &mut Cpu<M>, target: u16) {
    let taken = !cpu.p.contains(Status::OVERFLOW);
    branch_if(cpu, taken, target);
}

pub(crate) fn execute_bvs<M: MemoryBus>(cpu: &mut Cpu<M>, target: u16) {
    let taken = cpu.p.contains(Status::OVERFLOW);
    branch_if(cpu, taken, target);
}
