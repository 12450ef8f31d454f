//! # NES CPU CLI
//!
//! ヘッドレスでROMを実行し、トレースや最終レジスタを出力するフロントエンド

mod trace;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use nes_cpu::Nes;
use std::path::PathBuf;

/// NES CPU ランナー
#[derive(Parser, Debug)]
#[command(name = "nes_cpu_cli")]
#[command(about = "Headless 6502 runner for NES ROMs", long_about = None)]
struct Args {
    /// ROMファイルのパス
    #[arg(value_name = "ROM")]
    rom_path: PathBuf,

    /// 実行開始アドレス（16進数、例: C000）。指定時は電源投入状態から開始
    #[arg(short, long, value_parser = parse_hex)]
    entry: Option<u16>,

    /// 実行する命令数の上限
    #[arg(short = 'n', long)]
    instructions: Option<u64>,

    /// このアドレスに到達したら停止（16進数）
    #[arg(long, value_parser = parse_hex)]
    stop_at: Option<u16>,

    /// 実行するフレーム数の上限
    #[arg(short, long)]
    frames: Option<u64>,

    /// 各命令の実行前にトレース行を出力
    #[arg(short, long)]
    trace: bool,

    /// 終了時のレジスタ出力形式
    #[arg(long, value_enum, default_value_t = DumpFormat::Text)]
    dump: DumpFormat,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
enum DumpFormat {
    Text,
    Json,
}

fn parse_hex(s: &str) -> std::result::Result<u16, std::num::ParseIntError> {
    let digits = s.trim_start_matches("0x").trim_start_matches('$');
    u16::from_str_radix(digits, 16)
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    // ROMの読み込み
    let rom_data = std::fs::read(&args.rom_path)
        .with_context(|| format!("failed to read {}", args.rom_path.display()))?;
    log::info!("Loaded ROM: {:?}", args.rom_path);

    let mut nes = Nes::new();
    nes.load_rom(&rom_data)?;
    if let Some(entry) = args.entry {
        nes.start_at(entry);
    }

    // 停止命令に当たった場合もレジスタは出力する
    let outcome = run(&mut nes, &args);
    dump(&nes, args.dump)?;
    outcome
}

fn run(nes: &mut Nes, args: &Args) -> Result<()> {
    let start_frame = nes.ppu().frame();
    let mut executed: u64 = 0;

    loop {
        let registers = nes.cpu().registers();

        if args.stop_at == Some(registers.pc) {
            log::info!("Reached stop address {:#06x}", registers.pc);
            break;
        }
        if args.instructions.is_some_and(|limit| executed >= limit) {
            break;
        }
        if args
            .frames
            .is_some_and(|limit| nes.ppu().frame() - start_frame >= limit)
        {
            break;
        }

        if args.trace {
            let line = trace::format_line(|a| nes.peek_memory(a), registers, nes.cpu().cycles());
            println!("{}", line);
        }

        nes.step()
            .with_context(|| format!("execution stopped after {} instructions", executed))?;
        executed += 1;
    }

    log::info!("Executed {} instructions", executed);
    Ok(())
}

fn dump(nes: &Nes, format: DumpFormat) -> Result<()> {
    let registers = nes.cpu().registers();
    let cycles = nes.cpu().cycles();

    match format {
        DumpFormat::Text => {
            println!("{} CYC:{}", registers, cycles);
            println!("Flags: {}", registers.p);
        }
        DumpFormat::Json => {
            let snapshot = serde_json::json!({
                "registers": registers,
                "cycles": cycles,
                "frame": nes.ppu().frame(),
            });
            println!("{}", serde_json::to_string_pretty(&snapshot)?);
        }
    }
    Ok(())
}
