//! # Shift and Rotate Instructions
//!
//! Each operation exists in an accumulator form and a read-modify-write
//! memory form. The bit shifted out lands in carry; Z and N follow the result.

use crate::status::Status;
use crate::{Cpu, MemoryBus};

fn asl(p: &mut Status, value: u8) -> u8 {
    p.set(Status::CARRY, value & 0x80 != 0);
    let result = value << 1;
    p.set_zn(result);
    result
}

fn lsr(p: &mut Status, value: u8) -> u8 {
    p.set(Status::CARRY, value & 0x01 != 0);
    let result = value >> 1;
    p.set_zn(result);
    result
}

fn rol(p: &mut Status, value: u8) -> u8 {
    let carry_in = p.contains(Status::CARRY) as u8;
    p.set(Status::CARRY, value & 0x80 != 0);
    let result = (value << 1) | carry_in;
    p.set_zn(result);
    result
}

fn ror(p: &mut Status, value: u8) -> u8 {
    let carry_in = (p.contains(Status::CARRY) as u8) << 7;
    p.set(Status::CARRY, value & 0x01 != 0);
    let result = (value >> 1) | carry_in;
    p.set_zn(result);
    result
}

fn modify<M: MemoryBus>(cpu: &mut Cpu<M>, addr: u16, op: fn(&mut Status, u8) -> u8) {
    let value = cpu.memory.read(addr);
    let result = op(&mut cpu.p, value);
    cpu.memory.write(addr, result);
}

pub(crate) fn execute_asl_acc<M: MemoryBus>(cpu: &mut Cpu<M>) {
    cpu.a = asl(&mut cpu.p, cpu.a);
}

pub(crate) fn execute_asl<M: MemoryBus>(cpu: &mut Cpu<M>, addr: u16) {
    modify(cpu, addr, asl);
}

pub(crate) fn execute_lsr_acc<M: MemoryBus>(cpu: &mut Cpu<M>) {
    cpu.a = lsr(&mut cpu.p, cpu.a);
}

pub(crate) fn execute_lsr<M: MemoryBus>(cpu: &mut Cpu<M>, addr: u16) {
    modify(cpu, addr, lsr);
}

pub(crate) fn execute_rol_acc<M: MemoryBus>(cpu: &mut Cpu<M>) {
    cpu.a = rol(&mut cpu.p, cpu.a);
}

pub(crate) fn execute_rol<M: MemoryBus>(cpu: &mut Cpu<M>, addr: u16) {
    modify(cpu, addr, rol);
}

pub(crate) fn execute_ror_acc<M: MemoryBus>(cpu: &mut Cpu<M>) {
    cpu.a = ror(&mut cpu.p, cpu.a);
}

pub(crate) fn execute_ror<M: MemoryBus>(cpu: &mut Cpu<M>, addr: u16) {
    modify(cpu, addr, ror);
}
