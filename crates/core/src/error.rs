//! エラー型の定義

use crate::cpu::Registers;
use thiserror::Error;

/// NESエミュレータのエラー型
#[derive(Error, Debug)]
pub enum NesError {
    #[error("Invalid ROM format: {0}")]
    InvalidRom(String),

    #[error("Unsupported mapper: {0}")]
    UnsupportedMapper(u8),

    #[error("Illegal CPU instruction: {opcode:#04x} at {pc:#06x} ({registers})")]
    IllegalOpcode {
        opcode: u8,
        pc: u16,
        registers: Registers,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result型のエイリアス
pub type Result<T> = std::result::Result<T, NesError>;
