//! # CPU State and Execution
//!
//! This module contains the [`Cpu`] struct representing the 6502 processor state
//! and the fetch-decode-execute loop.
//!
//! ## CPU State
//!
//! - **Registers**: accumulator (A), index registers (X, Y)
//! - **Program counter** (PC): 16-bit address of the next instruction
//! - **Stack pointer** (SP): 8-bit offset into page one ($0100-$01FF)
//! - **Status**: the packed [`Status`] word
//! - **Cycle counter**: monotonically increasing
//! - **Stall counter**: cycles injected by outside hardware (DMA)
//! - **Pending interrupts**: NMI and IRQ requests, serviced at the next step
//!
//! ## Execution Model
//!
//! One call to [`Cpu::step`] does, in order:
//!
//! 1. burn one stalled cycle and return, if any are pending;
//! 2. service at most one interrupt (NMI before an unmasked IRQ);
//! 3. fetch the opcode and look it up in [`OPCODE_TABLE`];
//! 4. compute the effective address, noting page crossings;
//! 5. advance PC by the instruction size and charge the base cycles;
//! 6. run the opcode's semantics, which may overwrite PC.

use crate::addressing::AddressingMode;
use crate::disassembler;
use crate::instructions;
use crate::status::Status;
use crate::{ExecutionError, MemoryBus, OPCODE_TABLE};

pub const NMI_VECTOR: u16 = 0xFFFA;
pub const RESET_VECTOR: u16 = 0xFFFC;
pub const IRQ_VECTOR: u16 = 0xFFFE;

/// Cycles charged for interrupt entry.
const INTERRUPT_CYCLES: u64 = 7;

/// Interpreter options.
///
/// ```
/// use nes6502::CpuConfig;
///
/// let config = CpuConfig::default().with_self_loop_limit(2);
/// assert_eq!(config.self_loop_limit, Some(2));
/// assert_eq!(config.reset_flags, 0x24);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CpuConfig {
    /// Report [`ExecutionError::SelfLoop`] after this many consecutive
    /// instructions that jump or branch to their own address. `None` disables
    /// the check.
    pub self_loop_limit: Option<u32>,

    /// Status word loaded by [`Cpu::reset`].
    pub reset_flags: u8,
}

impl Default for CpuConfig {
    fn default() -> Self {
        Self {
            self_loop_limit: None,
            reset_flags: (Status::INTERRUPT_DISABLE | Status::UNUSED).bits(),
        }
    }
}

impl CpuConfig {
    pub fn with_self_loop_limit(mut self, limit: u32) -> Self {
        self.self_loop_limit = Some(limit);
        self
    }

    pub fn with_reset_flags(mut self, flags: u8) -> Self {
        self.reset_flags = flags;
        self
    }
}

/// 6502 CPU state and execution context.
///
/// Generic over the memory it runs on through [`MemoryBus`].
///
/// # Examples
///
/// ```
/// use nes6502::{Cpu, FlatMemory, MemoryBus};
///
/// let mut memory = FlatMemory::new();
/// memory.write(0xFFFC, 0x00);
/// memory.write(0xFFFD, 0x80);
/// memory.write(0x8000, 0xA9); // LDA #$05
/// memory.write(0x8001, 0x05);
///
/// let mut cpu = Cpu::new(memory);
/// assert_eq!(cpu.pc(), 0x8000);
/// assert_eq!(cpu.sp(), 0xFD);
/// assert!(cpu.flag_i());
///
/// assert_eq!(cpu.emulate(), 2);
/// assert_eq!(cpu.a(), 0x05);
/// ```
pub struct Cpu<M: MemoryBus> {
    pub(crate) a: u8,
    pub(crate) x: u8,
    pub(crate) y: u8,
    pub(crate) pc: u16,
    pub(crate) sp: u8,
    pub(crate) p: Status,

    /// Total CPU cycles executed
    pub(crate) cycles: u64,

    stall: u32,
    nmi_pending: bool,
    irq_pending: bool,

    config: CpuConfig,
    self_loops: u32,

    pub(crate) memory: M,
}

impl<M: MemoryBus> Cpu<M> {
    /// Creates a CPU over `memory` and runs [`Cpu::reset`].
    pub fn new(memory: M) -> Self {
        Self::with_config(memory, CpuConfig::default())
    }

    pub fn with_config(memory: M, config: CpuConfig) -> Self {
        let mut cpu = Self {
            a: 0,
            x: 0,
            y: 0,
            pc: 0,
            sp: 0,
            p: Status::empty(),
            cycles: 0,
            stall: 0,
            nmi_pending: false,
            irq_pending: false,
            config,
            self_loops: 0,
            memory,
        };
        cpu.reset();
        cpu
    }

    /// Loads PC from the reset vector and returns every other register to
    /// its power-on value. Pending interrupts, stalls and the cycle counter
    /// are cleared.
    pub fn reset(&mut self) {
        self.pc = self.memory.read_word(RESET_VECTOR);
        self.sp = 0xFD;
        self.p = Status::from_bits_retain(self.config.reset_flags);
        self.a = 0;
        self.x = 0;
        self.y = 0;
        self.cycles = 0;
        self.stall = 0;
        self.nmi_pending = false;
        self.irq_pending = false;
        self.self_loops = 0;
    }

    /// Requests a non-maskable interrupt, taken at the next step.
    pub fn nmi(&mut self) {
        self.nmi_pending = true;
    }

    /// Requests a maskable interrupt, taken at the first step where I is clear.
    pub fn irq(&mut self) {
        self.irq_pending = true;
    }

    /// Adds `cycles` idle cycles before the next instruction.
    pub fn stall(&mut self, cycles: u32) {
        self.stall = self.stall.saturating_add(cycles);
    }

    /// Executes one step and returns the cycles it consumed.
    ///
    /// Illegal opcodes and watchdog trips are logged and otherwise ignored;
    /// use [`Cpu::step`] to see them.
    pub fn emulate(&mut self) -> u32 {
        let start = self.cycles;
        if let Err(err) = self.step() {
            tracing::warn!("{err}");
        }
        (self.cycles - start) as u32
    }

    /// Executes one step.
    ///
    /// On error the step has still been charged: cycles are counted and PC has
    /// moved, so the caller may keep stepping.
    ///
    /// # Errors
    ///
    /// - [`ExecutionError::IllegalOpcode`] for an opcode with no defined semantics.
    ///   PC advances by one byte and registers are untouched.
    /// - [`ExecutionError::SelfLoop`] when the configured watchdog trips.
    pub fn step(&mut self) -> Result<u32, ExecutionError> {
        let start = self.cycles;

        if self.stall > 0 {
            self.stall -= 1;
            self.cycles += 1;
            return Ok(1);
        }

        self.service_interrupts();

        let pc = self.pc;
        let opcode = self.memory.read(pc);
        let info = &OPCODE_TABLE[opcode as usize];

        if !info.is_legal() {
            self.cycles += info.cycles as u64;
            self.pc = pc.wrapping_add(info.advance());
            return Err(ExecutionError::IllegalOpcode { opcode, pc });
        }

        let (addr, page_crossed) = self.effective_address(info.mode);
        self.pc = pc.wrapping_add(info.size as u16);
        self.cycles += info.cycles as u64;
        if page_crossed {
            self.cycles += info.page_cycles as u64;
        }

        instructions::execute(self, opcode, addr);

        let spent = (self.cycles - start) as u32;
        tracing::trace!(
            pc = format_args!("{pc:04X}"),
            opcode = format_args!("{opcode:02X}"),
            mnemonic = info.mnemonic,
            cycles = spent
        );

        self.check_self_loop(pc)?;
        Ok(spent)
    }

    /// Runs until at least `cycle_budget` cycles have elapsed.
    ///
    /// Stops at the first error.
    pub fn run_for_cycles(&mut self, cycle_budget: u64) -> Result<u64, ExecutionError> {
        let start = self.cycles;
        let target = start + cycle_budget;
        while self.cycles < target {
            self.step()?;
        }
        Ok(self.cycles - start)
    }

    /// Register dump: `PC=8000 A=00 X=00 Y=00 SP=1FD nvUbdIzc`.
    pub fn cpu_state(&self) -> String {
        format!(
            "PC={:04X} A={:02X} X={:02X} Y={:02X} SP=1{:02X} {}",
            self.pc,
            self.a,
            self.x,
            self.y,
            self.sp,
            self.p.render()
        )
    }

    /// One listing line for the instruction at `cursor`, or at PC.
    ///
    /// A cursor of zero starts at PC. The cursor is left just past the
    /// instruction.
    pub fn disassemble(&self, cursor: Option<&mut u16>) -> String {
        let mut pc = self.pc;
        let cursor = match cursor {
            Some(c) => {
                if *c == 0 {
                    *c = self.pc;
                }
                c
            }
            None => &mut pc,
        };
        disassembler::disassemble(&self.memory, cursor)
    }

    fn service_interrupts(&mut self) {
        if self.nmi_pending {
            self.nmi_pending = false;
            self.interrupt(NMI_VECTOR);
        } else if (self.irq_pending || self.memory.irq_active())
            && !self.p.contains(Status::INTERRUPT_DISABLE)
        {
            self.irq_pending = false;
            self.interrupt(IRQ_VECTOR);
        }
    }

    fn interrupt(&mut self, vector: u16) {
        self.push_word(self.pc);
        self.push(self.p.pushed());
        self.p.insert(Status::INTERRUPT_DISABLE);
        self.pc = self.memory.read_word(vector);
        self.cycles += INTERRUPT_CYCLES;
    }

    fn check_self_loop(&mut self, pc: u16) -> Result<(), ExecutionError> {
        let Some(limit) = self.config.self_loop_limit else {
            return Ok(());
        };
        if self.pc != pc {
            self.self_loops = 0;
            return Ok(());
        }
        self.self_loops += 1;
        if self.self_loops < limit {
            return Ok(());
        }
        let count = self.self_loops;
        self.self_loops = 0;
        Err(ExecutionError::SelfLoop { pc, count })
    }

    /// Effective address for `mode` of the instruction at PC, and whether
    /// indexing crossed a page.
    fn effective_address(&self, mode: AddressingMode) -> (u16, bool) {
        let operand = self.pc.wrapping_add(1);
        match mode {
            AddressingMode::Absolute => (self.memory.read_word(operand), false),
            AddressingMode::AbsoluteX => indexed(self.memory.read_word(operand), self.x),
            AddressingMode::AbsoluteY => indexed(self.memory.read_word(operand), self.y),
            AddressingMode::Immediate => (operand, false),
            AddressingMode::IndexedIndirect => {
                let ptr = self.memory.read(operand).wrapping_add(self.x);
                (self.read_word_bug(ptr as u16), false)
            }
            AddressingMode::Indirect => {
                let ptr = self.memory.read_word(operand);
                (self.read_word_bug(ptr), false)
            }
            AddressingMode::IndirectIndexed => {
                let ptr = self.memory.read(operand);
                indexed(self.read_word_bug(ptr as u16), self.y)
            }
            AddressingMode::Relative => {
                let offset = self.memory.read(operand) as i8;
                (self.pc.wrapping_add(2).wrapping_add(offset as u16), false)
            }
            AddressingMode::ZeroPage => (self.memory.read(operand) as u16, false),
            AddressingMode::ZeroPageX => {
                (self.memory.read(operand).wrapping_add(self.x) as u16, false)
            }
            AddressingMode::ZeroPageY => {
                (self.memory.read(operand).wrapping_add(self.y) as u16, false)
            }
            AddressingMode::Accumulator
            | AddressingMode::Implied
            | AddressingMode::Pseudo
            | AddressingMode::Invalid => (0, false),
        }
    }

    /// Word read where the high byte comes from the same page as the low byte.
    pub(crate) fn read_word_bug(&self, addr: u16) -> u16 {
        let hi_addr = (addr & 0xFF00) | (addr.wrapping_add(1) & 0x00FF);
        let lo = self.memory.read(addr) as u16;
        let hi = self.memory.read(hi_addr) as u16;
        (hi << 8) | lo
    }

    // ========== Stack ==========

    pub(crate) fn push(&mut self, value: u8) {
        self.memory.write(0x0100 | self.sp as u16, value);
        self.sp = self.sp.wrapping_sub(1);
    }

    pub(crate) fn pull(&mut self) -> u8 {
        self.sp = self.sp.wrapping_add(1);
        self.memory.read(0x0100 | self.sp as u16)
    }

    pub(crate) fn push_word(&mut self, value: u16) {
        self.push((value >> 8) as u8);
        self.push(value as u8);
    }

    pub(crate) fn pull_word(&mut self) -> u16 {
        let lo = self.pull() as u16;
        let hi = self.pull() as u16;
        (hi << 8) | lo
    }

    // ========== Memory ==========

    pub fn memory(&self) -> &M {
        &self.memory
    }

    pub fn memory_mut(&mut self) -> &mut M {
        &mut self.memory
    }

    pub fn into_memory(self) -> M {
        self.memory
    }

    pub fn config(&self) -> &CpuConfig {
        &self.config
    }

    // ========== Register Getters ==========

    pub fn a(&self) -> u8 {
        self.a
    }

    pub fn x(&self) -> u8 {
        self.x
    }

    pub fn y(&self) -> u8 {
        self.y
    }

    pub fn pc(&self) -> u16 {
        self.pc
    }

    /// Stack pointer. The stack lives at $0100 + SP and grows downward.
    pub fn sp(&self) -> u8 {
        self.sp
    }

    /// Status register as a packed byte (NV-BDIZC).
    pub fn status(&self) -> u8 {
        self.p.bits()
    }

    pub fn flags(&self) -> Status {
        self.p
    }

    /// Total cycles since the last reset.
    pub fn cycles(&self) -> u64 {
        self.cycles
    }

    /// Idle cycles still queued by [`Cpu::stall`].
    pub fn stalled(&self) -> u32 {
        self.stall
    }

    pub fn nmi_pending(&self) -> bool {
        self.nmi_pending
    }

    pub fn irq_pending(&self) -> bool {
        self.irq_pending
    }

    pub fn flag_n(&self) -> bool {
        self.p.contains(Status::NEGATIVE)
    }

    pub fn flag_v(&self) -> bool {
        self.p.contains(Status::OVERFLOW)
    }

    pub fn flag_b(&self) -> bool {
        self.p.contains(Status::BREAK)
    }

    pub fn flag_d(&self) -> bool {
        self.p.contains(Status::DECIMAL)
    }

    pub fn flag_i(&self) -> bool {
        self.p.contains(Status::INTERRUPT_DISABLE)
    }

    pub fn flag_z(&self) -> bool {
        self.p.contains(Status::ZERO)
    }

    pub fn flag_c(&self) -> bool {
        self.p.contains(Status::CARRY)
    }

    // ========== Register Setters ==========

    pub fn set_a(&mut self, value: u8) {
        self.a = value;
    }

    pub fn set_x(&mut self, value: u8) {
        self.x = value;
    }

    pub fn set_y(&mut self, value: u8) {
        self.y = value;
    }

    pub fn set_pc(&mut self, value: u16) {
        self.pc = value;
    }

    pub fn set_sp(&mut self, value: u8) {
        self.sp = value;
    }

    pub fn set_status(&mut self, value: u8) {
        self.p = Status::from_bits_retain(value);
    }

    pub fn set_flag_n(&mut self, value: bool) {
        self.p.set(Status::NEGATIVE, value);
    }

    pub fn set_flag_v(&mut self, value: bool) {
        self.p.set(Status::OVERFLOW, value);
    }

    pub fn set_flag_b(&mut self, value: bool) {
        self.p.set(Status::BREAK, value);
    }

    pub fn set_flag_d(&mut self, value: bool) {
        self.p.set(Status::DECIMAL, value);
    }

    pub fn set_flag_i(&mut self, value: bool) {
        self.p.set(Status::INTERRUPT_DISABLE, value);
    }

    pub fn set_flag_z(&mut self, value: bool) {
        self.p.set(Status::ZERO, value);
    }

    pub fn set_flag_c(&mut self, value: bool) {
        self.p.set(Status::CARRY, value);
    }
}

#[inline]
fn indexed(base: u16, index: u8) -> (u16, bool) {
    let addr = base.wrapping_add(index as u16);
    (addr, (base & 0xFF00) != (addr & 0xFF00))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::FlatMemory;

    fn cpu_with(program: &[u8]) -> Cpu<FlatMemory> {
        let mut mem = FlatMemory::new();
        mem.write(0xFFFC, 0x00);
        mem.write(0xFFFD, 0x80);
        mem.load(0x8000, program);
        Cpu::new(mem)
    }

    #[test]
    fn test_cpu_initialization() {
        let cpu = cpu_with(&[]);
        assert_eq!(cpu.pc(), 0x8000);
        assert_eq!(cpu.sp(), 0xFD);
        assert_eq!(cpu.a(), 0x00);
        assert_eq!(cpu.x(), 0x00);
        assert_eq!(cpu.y(), 0x00);
        assert_eq!(cpu.status(), 0x24);
        assert_eq!(cpu.cycles(), 0);
    }

    #[test]
    fn test_reset_flags_from_config() {
        let mut mem = FlatMemory::new();
        mem.write(0xFFFD, 0x90);
        let cpu = Cpu::with_config(mem, CpuConfig::default().with_reset_flags(0x04));
        assert_eq!(cpu.status(), 0x04);
        assert_eq!(cpu.pc(), 0x9000);
    }

    #[test]
    fn test_reset_clears_pending_state() {
        let mut cpu = cpu_with(&[0xEA]);
        cpu.nmi();
        cpu.irq();
        cpu.stall(3);
        cpu.set_a(9);
        cpu.reset();
        assert!(!cpu.nmi_pending());
        assert!(!cpu.irq_pending());
        assert_eq!(cpu.stalled(), 0);
        assert_eq!(cpu.a(), 0);
    }

    #[test]
    fn test_indexed_page_cross() {
        assert_eq!(indexed(0x10FF, 1), (0x1100, true));
        assert_eq!(indexed(0x1000, 0xFF), (0x10FF, false));
        assert_eq!(indexed(0xFFFF, 1), (0x0000, true));
    }

    #[test]
    fn test_read_word_bug() {
        let mut cpu = cpu_with(&[]);
        cpu.memory_mut().write(0x10FF, 0x12);
        cpu.memory_mut().write(0x1000, 0x34);
        cpu.memory_mut().write(0x1100, 0x56);
        assert_eq!(cpu.read_word_bug(0x10FF), 0x3412);
    }

    #[test]
    fn test_stall_consumes_single_cycles() {
        let mut cpu = cpu_with(&[0xEA]);
        cpu.stall(2);
        assert_eq!(cpu.emulate(), 1);
        assert_eq!(cpu.emulate(), 1);
        assert_eq!(cpu.pc(), 0x8000);
        assert_eq!(cpu.emulate(), 2);
        assert_eq!(cpu.pc(), 0x8001);
    }

    #[test]
    fn test_cpu_state_format() {
        let cpu = cpu_with(&[]);
        assert_eq!(cpu.cpu_state(), "PC=8000 A=00 X=00 Y=00 SP=1FD nvUbdIzc");
    }

    #[test]
    fn test_disassemble_defaults_to_pc() {
        let cpu = cpu_with(&[0xA9, 0x05, 0xEA]);
        assert_eq!(cpu.disassemble(None), "8000: A9 05    LDA #$05");

        let mut cursor = 0;
        cpu.disassemble(Some(&mut cursor));
        assert_eq!(cursor, 0x8002);
        assert_eq!(cpu.disassemble(Some(&mut cursor)), "8002: EA       NOP");
        assert_eq!(cursor, 0x8003);
    }

    #[test]
    fn test_self_loop_watchdog() {
        let mut mem = FlatMemory::new();
        mem.write(0xFFFD, 0x80);
        mem.load(0x8000, &[0x4C, 0x00, 0x80]); // JMP $8000
        let mut cpu = Cpu::with_config(mem, CpuConfig::default().with_self_loop_limit(3));
        assert!(cpu.step().is_ok());
        assert!(cpu.step().is_ok());
        assert_eq!(
            cpu.step(),
            Err(ExecutionError::SelfLoop { pc: 0x8000, count: 3 })
        );
        // Counter restarts after reporting
        assert!(cpu.step().is_ok());
    }

    #[test]
    fn test_no_watchdog_by_default() {
        let mut cpu = cpu_with(&[0x4C, 0x00, 0x80]);
        for _ in 0..100 {
            assert_eq!(cpu.step(), Ok(3));
        }
    }
}
