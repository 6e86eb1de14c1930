//! # Flag Instructions

use crate::status::Status;
use crate::{Cpu, MemoryBus};

pub(crate) fn execute_clc<M: MemoryBus>(cpu: &mut Cpu<M>) {
    cpu.p.remove(Status::CARRY);
}

pub(crate) fn execute_sec<M: MemoryBus>(cpu: &mut Cpu<M>) {
    cpu.p.insert(Status::CARRY);
}

pub(crate) fn execute_cli<M: MemoryBus>(cpu: &mut Cpu<M>) {
    cpu.p.remove(Status::INTERRUPT_DISABLE);
}

pub(crate) fn execute_sei<M: MemoryBus>(cpu: &mut Cpu<M>) {
    cpu.p.insert(Status::INTERRUPT_DISABLE);
}

pub(crate) fn execute_cld<M: MemoryBus>(cpu: &mut Cpu<M>) {
    cpu.p.remove(Status::DECIMAL);
}

pub(crate) fn execute_sed<M: MemoryBus>(cpu: &mut Cpu<M>) {
    cpu.p.insert(Status::DECIMAL);
}

pub(crate) fn execute_clv<M: MemoryBus>(cpu: &mut Cpu<M>) {
    cpu.p.remove(Status::OVERFLOW);
}
