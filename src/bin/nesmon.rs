//! nesmon: a line console over a 6502 and a bank-switched NES cartridge.
//!
//! ```text
//! nesmon --prg game.prg --mapper 1 --bank 0 -c "u 8000 10"
//! ```
//!
//! Commands given with `-c` run first, then lines are read from stdin until
//! EOF or `quit`.

use std::fs;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use nes6502::console::Console;
use nes6502::{mapper, Cartridge};

/// Monitor, assembler and single-stepper for NES cartridge code.
#[derive(Parser)]
#[command(version)]
struct Args {
    /// Raw PRG ROM image (a multiple of 16KB); a blank 32KB ROM when omitted
    #[arg(long)]
    prg: Option<PathBuf>,

    /// Raw CHR ROM image (a multiple of 4KB); 8KB of CHR RAM when omitted
    #[arg(long)]
    chr: Option<PathBuf>,

    /// iNES mapper number
    #[arg(long, default_value_t = 0)]
    mapper: u8,

    /// Pin the CPU view to this 16KB PRG bank instead of the live banking
    #[arg(long, allow_hyphen_values = true)]
    bank: Option<i32>,

    /// Console command to run before reading stdin (repeatable)
    #[arg(short, long)]
    command: Vec<String>,

    /// Log filter when RUST_LOG is unset
    #[arg(long, default_value = "warn")]
    log: String,
}

fn main() -> Result<()> {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&args.log)),
        )
        .with_writer(io::stderr)
        .init();

    let cartridge = load_cartridge(&args)?;
    let board = mapper::create(args.mapper, cartridge)
        .with_context(|| format!("mapper {}", args.mapper))?;
    tracing::info!(mapper = args.mapper, bank = ?args.bank, "board ready");

    let mut console = Console::new(board, args.bank);
    let mut out = io::stdout().lock();

    for command in &args.command {
        run(&mut console, command, &mut out)?;
    }

    let stdin = io::stdin();
    for line in stdin.lock().lines() {
        let line = line.context("reading stdin")?;
        let trimmed = line.trim();
        if matches!(trimmed, "q" | "quit" | "exit") {
            break;
        }
        run(&mut console, trimmed, &mut out)?;
    }
    Ok(())
}

fn load_cartridge(args: &Args) -> Result<Cartridge> {
    let Some(prg_path) = &args.prg else {
        return Ok(Cartridge::blank(2));
    };
    let prg = fs::read(prg_path).with_context(|| format!("reading {}", prg_path.display()))?;
    let chr = match &args.chr {
        Some(path) => fs::read(path).with_context(|| format!("reading {}", path.display()))?,
        None => Vec::new(),
    };
    Ok(Cartridge::new(prg, chr)?)
}

fn run<M, W>(console: &mut Console<M>, line: &str, out: &mut W) -> Result<()>
where
    M: mapper::Mapper,
    W: Write,
{
    match console.execute(line) {
        Ok(lines) => {
            for l in lines {
                writeln!(out, "{l}")?;
            }
        }
        Err(e) => writeln!(out, "[error] {e}")?,
    }
    out.flush()?;
    Ok(())
}
