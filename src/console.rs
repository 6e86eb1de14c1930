//! # Debug Console
//!
//! Text commands over a CPU running on a cartridge, one command per line.
//! Numbers accept `$`/`0x` hex, `%` binary and decimal. Commands that take
//! `b=<bank>` work on that PRG (or CHR) bank instead of the live mapping.
//!
//! ```
//! use nes6502::console::Console;
//! use nes6502::{mapper, Cartridge};
//!
//! let mapper = mapper::create(2, Cartridge::blank(4)).unwrap();
//! let mut console = Console::new(mapper, Some(0));
//!
//! console.execute("a $8000 LDA #$05").unwrap();
//! let out = console.execute("u $8000 1").unwrap();
//! assert_eq!(out, vec!["8000: A9 05    LDA #$05"]);
//! ```

use thiserror::Error;

use crate::address::{parse_number, parse_signed};
use crate::assembler::{asm_help, AsmError, AsmStatus, Assembler};
use crate::cpu::Cpu;
use crate::disassembler;
use crate::mapper::{BankView, Mapper};
use crate::memory::MemoryBus;
use crate::MapperError;

/// Largest `step`, `u` or dump count; a dump this long covers all 64KB.
const MAX_COUNT: u32 = 0x10000;

const HELP: &[(&str, &str)] = &[
    ("reset", "Reset the CPU from the reset vector."),
    ("step [n]", "Execute n instructions (default 1)."),
    ("nmi", "Request a non-maskable interrupt."),
    ("irq", "Request a maskable interrupt."),
    ("regs", "Show the registers."),
    ("bank [n|live]", "Pin bank n below $C000, or follow the mapper."),
    ("u [b=<bank>] [addr] [len]", "Disassemble len instructions (default 10)."),
    ("a [b=<bank>] [addr] [line]", "Assemble one line at addr."),
    ("fixups [b=<bank>]", "Apply pending fixups in the bank last assembled into."),
    ("labels", "List assembler labels."),
    ("asmreset", "Forget assembler labels and fixups."),
    ("asmhelp", "List opcodes per addressing mode."),
    ("db|dbp|dbc [b=<bank>] <addr> [len]", "Hexdump bytes via CPU / PRG / CHR."),
    ("dw|dwp|dwc [b=<bank>] <addr> [len]", "Hexdump words via CPU / PRG / CHR."),
    ("wb|wbp|wbc [b=<bank>] <addr> <val>...", "Write bytes via CPU / PRG / CHR."),
    ("ww|wwp|wwc [b=<bank>] <addr> <val>...", "Write words via CPU / PRG / CHR."),
    ("wm [reg val]", "Write a mapper register, or show them."),
    ("help", "This list."),
];

#[derive(Debug, Error)]
pub enum ConsoleError {
    #[error("unknown command '{0}'")]
    UnknownCommand(String),

    #[error("usage: {0}")]
    Usage(&'static str),

    #[error("bad number '{0}'")]
    BadNumber(String),

    #[error("count {0} is above {MAX_COUNT}")]
    TooMany(u32),

    #[error("{code}: {0}", code = .0.code())]
    Asm(#[from] AsmError),

    #[error(transparent)]
    Mapper(#[from] MapperError),
}

/// Where a dump or write goes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Target {
    /// The CPU address space
    Cpu,
    Prg(i32),
    Chr(i32),
}

/// A CPU bound to a mapper, an assembly session and the `u`/`a` cursors.
pub struct Console<M: Mapper> {
    cpu: Cpu<BankView<M>>,
    asm: Assembler,
    asm_cursor: u16,
    /// Bank pinned by the last `a`, where its fixups belong
    asm_bank: Option<i32>,
    dis_cursor: u16,
}

impl<M: Mapper> Console<M> {
    /// Console over `mapper`, pinned to `bank` or following the mapper's
    /// live banking when `None`.
    pub fn new(mapper: M, bank: Option<i32>) -> Self {
        let view = match bank {
            Some(bank) => BankView::new(mapper, bank),
            None => BankView::live(mapper),
        };
        let cpu = Cpu::new(view);
        let pc = cpu.pc();
        Self {
            cpu,
            asm: Assembler::new(),
            asm_cursor: pc,
            asm_bank: bank,
            dis_cursor: pc,
        }
    }

    pub fn cpu(&self) -> &Cpu<BankView<M>> {
        &self.cpu
    }

    pub fn cpu_mut(&mut self) -> &mut Cpu<BankView<M>> {
        &mut self.cpu
    }

    pub fn assembler(&self) -> &Assembler {
        &self.asm
    }

    /// Runs one command line and returns its output.
    pub fn execute(&mut self, line: &str) -> Result<Vec<String>, ConsoleError> {
        let mut args: Vec<&str> = line.split_whitespace().collect();
        if args.is_empty() {
            return Ok(Vec::new());
        }
        let cmd = args.remove(0).to_ascii_lowercase();
        tracing::debug!(command = %cmd, ?args, "console");

        match cmd.as_str() {
            "reset" => {
                self.cpu.reset();
                Ok(vec![self.cpu.cpu_state()])
            }
            "step" => self.step(&args),
            "nmi" => {
                self.cpu.nmi();
                Ok(Vec::new())
            }
            "irq" => {
                self.cpu.irq();
                Ok(Vec::new())
            }
            "regs" => Ok(vec![self.cpu.cpu_state()]),
            "bank" => self.bank(&args),
            "u" => self.unassemble(&args),
            "a" => self.assemble(&args),
            "fixups" => self.fixups(&args),
            "labels" => Ok(self
                .asm
                .symbols()
                .labels()
                .map(|(name, value)| format!("{name} = ${value:04X}"))
                .collect()),
            "asmreset" => {
                self.asm.reset();
                Ok(Vec::new())
            }
            "asmhelp" => Ok(asm_help()),
            "db" | "dbp" | "dbc" => {
                let (target, rest) = parse_target(&cmd, &args)?;
                self.dump(target, rest, 1)
            }
            "dw" | "dwp" | "dwc" => {
                let (target, rest) = parse_target(&cmd, &args)?;
                self.dump(target, rest, 2)
            }
            "wb" | "wbp" | "wbc" => {
                let (target, rest) = parse_target(&cmd, &args)?;
                self.write(target, rest, 1)
            }
            "ww" | "wwp" | "wwc" => {
                let (target, rest) = parse_target(&cmd, &args)?;
                self.write(target, rest, 2)
            }
            "wm" => self.write_mapper(&args),
            "help" => Ok(HELP
                .iter()
                .map(|(usage, text)| format!("{usage:<40} {text}"))
                .collect()),
            _ => Err(ConsoleError::UnknownCommand(cmd)),
        }
    }

    fn step(&mut self, args: &[&str]) -> Result<Vec<String>, ConsoleError> {
        let count = match args.first() {
            Some(n) => count(n)?,
            None => 1,
        };
        let mut out = Vec::new();
        for _ in 0..count {
            out.push(self.cpu.disassemble(None));
            if let Err(err) = self.cpu.step() {
                out.push(format!("[warn] {err}"));
            }
        }
        out.push(self.cpu.cpu_state());
        Ok(out)
    }

    fn bank(&mut self, args: &[&str]) -> Result<Vec<String>, ConsoleError> {
        let view = self.cpu.memory_mut();
        match args.first() {
            None => {}
            Some(&"live") => view.set_bank(None),
            Some(n) => view.set_bank(Some(signed(n)?)),
        }
        let shown = match view.bank() {
            Some(bank) => format!("bank {bank}"),
            None => "bank live".to_string(),
        };
        Ok(vec![shown])
    }

    /// Runs `f` with the view pinned to `bank`, if one was given.
    fn with_bank<T>(&mut self, bank: Option<i32>, f: impl FnOnce(&mut Self) -> T) -> T {
        let saved = self.cpu.memory().bank();
        if bank.is_some() {
            self.cpu.memory_mut().set_bank(bank);
        }
        let result = f(self);
        self.cpu.memory_mut().set_bank(saved);
        result
    }

    fn unassemble(&mut self, args: &[&str]) -> Result<Vec<String>, ConsoleError> {
        let (bank, args) = bank_arg(args)?;
        if let Some(addr) = args.first() {
            self.dis_cursor = address(addr)?;
        }
        let len = match args.get(1) {
            Some(n) => count(n)?,
            None => 10,
        };

        Ok(self.with_bank(bank, |console| {
            let view = console.cpu.memory();
            (0..len)
                .map(|_| disassembler::disassemble(view, &mut console.dis_cursor))
                .collect::<Vec<String>>()
        }))
    }

    fn assemble(&mut self, args: &[&str]) -> Result<Vec<String>, ConsoleError> {
        let (bank, mut args) = bank_arg(args)?;
        if let Some(addr) = args.first().and_then(|a| parse_number(a)) {
            self.asm_cursor =
                u16::try_from(addr).map_err(|_| ConsoleError::BadNumber(args[0].to_string()))?;
            args = &args[1..];
        }
        let source = args.join(" ");
        self.asm_bank = bank.or(self.cpu.memory().bank());

        self.with_bank(bank, |console| -> Result<Vec<String>, ConsoleError> {
            let start = console.asm_cursor;
            let view = console.cpu.memory_mut();
            let status = console.asm.assemble(view, &source, &mut console.asm_cursor)?;
            let out = match status {
                AsmStatus::Code if console.asm_cursor != start => {
                    let mut at = start;
                    vec![disassembler::disassemble(console.cpu.memory(), &mut at)]
                }
                _ => vec![format!("{:04X}: {}", console.asm_cursor, status.code())],
            };
            Ok(out)
        })
    }

    /// Patches through the bank the fixups were assembled into, not the
    /// current mapping, so a live view never sees the writes as registers.
    fn fixups(&mut self, args: &[&str]) -> Result<Vec<String>, ConsoleError> {
        let (bank, _) = bank_arg(args)?;
        let bank = bank.or(self.asm_bank);

        let saved = self.cpu.memory().bank();
        self.cpu.memory_mut().set_bank(bank);
        let errors = self.asm.apply_fixups(self.cpu.memory_mut());
        self.cpu.memory_mut().set_bank(saved);

        if errors.is_empty() {
            return Ok(vec!["fixups applied".to_string()]);
        }
        Ok(errors.iter().map(ToString::to_string).collect())
    }

    fn read(&self, target: Target, addr: u16) -> u8 {
        let view = self.cpu.memory();
        match target {
            Target::Cpu => view.read(addr),
            Target::Prg(bank) => view.mapper().read_prg_bank(bank, addr),
            Target::Chr(bank) => view.mapper().read_chr_bank(bank, addr),
        }
    }

    fn write_byte(&mut self, target: Target, addr: u16, value: u8) {
        let view = self.cpu.memory_mut();
        match target {
            Target::Cpu => view.write(addr, value),
            Target::Prg(bank) => view.mapper_mut().write_prg_bank(bank, addr, value),
            Target::Chr(bank) => view.mapper_mut().write_chr_bank(bank, addr, value),
        }
    }

    fn dump(&self, target: Target, args: &[&str], width: u16) -> Result<Vec<String>, ConsoleError> {
        let addr = args
            .first()
            .ok_or(ConsoleError::Usage("db [b=<bank>] <addr> [len]"))
            .and_then(|a| address(a))?;
        let len = match args.get(1) {
            Some(n) => count(n)?,
            None => 64,
        };

        let bytes: Vec<u8> = (0..len)
            .map(|i| self.read(target, addr.wrapping_add(i as u16)))
            .collect();
        Ok(bytes
            .chunks(16)
            .enumerate()
            .map(|(row, chunk)| hexdump_row(addr.wrapping_add((row * 16) as u16), chunk, width))
            .collect())
    }

    fn write(&mut self, target: Target, args: &[&str], width: u16) -> Result<Vec<String>, ConsoleError> {
        let usage = ConsoleError::Usage("wb [b=<bank>] <addr> <val>...");
        let (addr, values) = args.split_first().ok_or(usage)?;
        if values.is_empty() {
            return Err(ConsoleError::Usage("wb [b=<bank>] <addr> <val>..."));
        }
        let mut at = address(addr)?;
        let values = values.iter().map(|v| number(v)).collect::<Result<Vec<_>, _>>()?;
        for value in values {
            for byte in value.to_le_bytes().iter().take(width as usize) {
                self.write_byte(target, at, *byte);
                at = at.wrapping_add(1);
            }
        }
        Ok(Vec::new())
    }

    fn write_mapper(&mut self, args: &[&str]) -> Result<Vec<String>, ConsoleError> {
        let mapper = self.cpu.memory_mut().mapper_mut();
        match args {
            [] => Ok(mapper.describe().lines().map(str::to_string).collect()),
            [reg, value] => {
                let value = u8::try_from(number(value)?)
                    .map_err(|_| ConsoleError::BadNumber(value.to_string()))?;
                mapper.write_register(reg, value)?;
                Ok(mapper.describe().lines().map(str::to_string).collect())
            }
            _ => Err(ConsoleError::Usage("wm [<reg> <val>]")),
        }
    }
}

fn hexdump_row(addr: u16, chunk: &[u8], width: u16) -> String {
    let mut hex = String::new();
    if width == 2 {
        for pair in chunk.chunks(2) {
            let lo = pair[0] as u16;
            let hi = pair.get(1).copied().unwrap_or(0) as u16;
            hex.push_str(&format!(" {:04x}", hi << 8 | lo));
        }
    } else {
        for byte in chunk {
            hex.push_str(&format!(" {byte:02x}"));
        }
    }
    let text: String = chunk
        .iter()
        .map(|&b| if (32..127).contains(&b) { b as char } else { '.' })
        .collect();
    let pad = if width == 2 { 40 } else { 48 };
    format!("{addr:04x}: {hex:<pad$}  {text}")
}

/// Splits a leading `b=<bank>` off `args`.
fn bank_arg<'a, 'b>(args: &'a [&'b str]) -> Result<(Option<i32>, &'a [&'b str]), ConsoleError> {
    match args.split_first() {
        Some((first, rest)) => match first.strip_prefix("b=") {
            Some(bank) => Ok((Some(signed(bank)?), rest)),
            None => Ok((None, args)),
        },
        None => Ok((None, args)),
    }
}

/// Target of a `d*`/`w*` command from its suffix (`p` or `c`) and `b=` argument.
fn parse_target<'a, 'b>(cmd: &str, args: &'a [&'b str]) -> Result<(Target, &'a [&'b str]), ConsoleError> {
    let (bank, rest) = bank_arg(args)?;
    let bank = bank.unwrap_or(0);
    let target = match cmd.as_bytes().get(2) {
        Some(b'p') => Target::Prg(bank),
        Some(b'c') => Target::Chr(bank),
        _ => Target::Cpu,
    };
    Ok((target, rest))
}

fn number(text: &str) -> Result<u32, ConsoleError> {
    parse_number(text).ok_or_else(|| ConsoleError::BadNumber(text.to_string()))
}

fn count(text: &str) -> Result<u32, ConsoleError> {
    match number(text)? {
        n if n > MAX_COUNT => Err(ConsoleError::TooMany(n)),
        n => Ok(n),
    }
}

fn signed(text: &str) -> Result<i32, ConsoleError> {
    parse_signed(text)
        .and_then(|n| i32::try_from(n).ok())
        .ok_or_else(|| ConsoleError::BadNumber(text.to_string()))
}

fn address(text: &str) -> Result<u16, ConsoleError> {
    u16::try_from(number(text)?).map_err(|_| ConsoleError::BadNumber(text.to_string()))
}
