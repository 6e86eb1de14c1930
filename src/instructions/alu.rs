//! # ALU (Arithmetic Logic Unit) Instructions
//!
//! - ADC / SBC: binary add and subtract through carry (decimal mode is ignored,
//!   as on the 2A03)
//! - AND / ORA / EOR: bitwise logic into A
//! - CMP / CPX / CPY: register minus operand, flags only
//! - BIT: test A against memory

use crate::status::Status;
use crate::{Cpu, MemoryBus};

/// Executes ADC (Add with Carry).
///
/// Overflow is set when both inputs have the same sign and the result's sign
/// differs from it.
pub(crate) fn execute_adc<M: MemoryBus>(cpu: &mut Cpu<M>, addr: u16) {
    let value = cpu.memory.read(addr);
    add(cpu, value);
}

/// Executes SBC (Subtract with Carry). Carry clear means borrow.
///
/// A - M - (1 - C) is computed as A + !M + C, which yields the same carry
/// and overflow as the subtraction.
pub(crate) fn execute_sbc<M: MemoryBus>(cpu: &mut Cpu<M>, addr: u16) {
    let value = cpu.memory.read(addr);
    add(cpu, !value);
}

fn add<M: MemoryBus>(cpu: &mut Cpu<M>, value: u8) {
    let a = cpu.a;
    let carry_in = cpu.p.contains(Status::CARRY) as u16;
    let sum = a as u16 + value as u16 + carry_in;
    let result = sum as u8;

    cpu.p.set(Status::CARRY, sum > 0xFF);
    cpu.p.set(
        Status::OVERFLOW,
        (a ^ value) & 0x80 == 0 && (a ^ result) & 0x80 != 0,
    );
    cpu.p.set_zn(result);
    cpu.a = result;
}

pub(crate) fn execute_and<M: MemoryBus>(cpu: &mut Cpu<M>, addr: u16) {
    cpu.a &= cpu.memory.read(addr);
    cpu.p.set_zn(cpu.a);
}

pub(crate) fn execute_ora<M: MemoryBus>(cpu: &mut Cpu<M>, addr: u16) {
    cpu.a |= cpu.memory.read(addr);
    cpu.p.set_zn(cpu.a);
}

pub(crate) fn execute_eor<M: MemoryBus>(cpu: &mut Cpu<M>, addr: u16) {
    cpu.a ^= cpu.memory.read(addr);
    cpu.p.set_zn(cpu.a);
}

fn compare<M: MemoryBus>(cpu: &mut Cpu<M>, register: u8, addr: u16) {
    let value = cpu.memory.read(addr);
    cpu.p.set_zn(register.wrapping_sub(value));
    cpu.p.set(Status::CARRY, register >= value);
}

pub(crate) fn execute_cmp<M: MemoryBus>(cpu: &mut Cpu<M>, addr: u16) {
    let register = cpu.a;
    compare(cpu, register, addr);
}

pub(crate) fn execute_cpx<M: MemoryBus>(cpu: &mut Cpu<M>, addr: u16) {
    let register = cpu.x;
    compare(cpu, register, addr);
}

pub(crate) fn execute_cpy<M: MemoryBus>(cpu: &mut Cpu<M>, addr: u16) {
    let register = cpu.y;
    compare(cpu, register, addr);
}

/// Executes BIT: Z from `A & M`, V and N copied from bits 6 and 7 of M.
pub(crate) fn execute_bit<M: MemoryBus>(cpu: &mut Cpu<M>, addr: u16) {
    let value = cpu.memory.read(addr);
    cpu.p.set(Status::ZERO, value & cpu.a == 0);
    cpu.p.set(Status::OVERFLOW, value & 0x40 != 0);
    cpu.p.set(Status::NEGATIVE, value & 0x80 != 0);
}
