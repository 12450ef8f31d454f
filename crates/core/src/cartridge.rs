//! # カートリッジ
//!
//! iNES形式のROMイメージを読み込む。対応するのはバンク切り替えのない
//! フラットなPRGウィンドウ（マッパー0）のみ。

use crate::error::{NesError, Result};

const HEADER_SIZE: usize = 16;
const TRAINER_SIZE: usize = 512;
const PRG_BANK_SIZE: usize = 16384;
const CHR_BANK_SIZE: usize = 8192;
const PRG_RAM_SIZE: usize = 8192;

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Mirroring {
    Horizontal,
    Vertical,
    FourScreen,
}

/// カートリッジ
pub struct Cartridge {
    /// PRG ROM（プログラムメモリ）
    prg_rom: Vec<u8>,
    /// PRG RAM（$6000-$7FFF）
    prg_ram: Vec<u8>,
    /// CHR ROM、またはヘッダーのCHRサイズが0の場合はCHR RAM
    chr: Vec<u8>,
    chr_is_ram: bool,
    mapper: u8,
    mirroring: Mirroring,
}

impl Cartridge {
    /// iNES形式のROMデータから作成
    pub fn from_ines(data: &[u8]) -> Result<Self> {
        if data.len() < HEADER_SIZE {
            return Err(NesError::InvalidRom("File too small".to_string()));
        }

        if &data[0..4] != b"NES\x1A" {
            return Err(NesError::InvalidRom("Invalid iNES header".to_string()));
        }

        let prg_rom_size = data[4] as usize * PRG_BANK_SIZE; // 16KB単位
        let chr_rom_size = data[5] as usize * CHR_BANK_SIZE; // 8KB単位
        let flags6 = data[6];
        let flags7 = data[7];

        let mapper = (flags7 & 0xF0) | (flags6 >> 4);
        if mapper != 0 {
            return Err(NesError::UnsupportedMapper(mapper));
        }

        if prg_rom_size == 0 {
            return Err(NesError::InvalidRom("No PRG ROM".to_string()));
        }

        let mirroring = if flags6 & 0x08 != 0 {
            Mirroring::FourScreen
        } else if flags6 & 0x01 != 0 {
            Mirroring::Vertical
        } else {
            Mirroring::Horizontal
        };

        // トレーナーの有無（512バイト）
        let has_trainer = (flags6 & 0x04) != 0;
        let prg_start = HEADER_SIZE + if has_trainer { TRAINER_SIZE } else { 0 };
        let chr_start = prg_start + prg_rom_size;

        if data.len() < chr_start + chr_rom_size {
            return Err(NesError::InvalidRom("File size mismatch".to_string()));
        }

        let prg_rom = data[prg_start..chr_start].to_vec();
        let (chr, chr_is_ram) = if chr_rom_size > 0 {
            (data[chr_start..chr_start + chr_rom_size].to_vec(), false)
        } else {
            (vec![0; CHR_BANK_SIZE], true)
        };

        log::info!(
            "Loaded ROM: PRG={} KB, CHR={} KB{}, Mapper={}, Mirroring={:?}",
            prg_rom_size / 1024,
            chr.len() / 1024,
            if chr_is_ram { " (RAM)" } else { "" },
            mapper,
            mirroring
        );

        Ok(Self {
            prg_rom,
            prg_ram: vec![0; PRG_RAM_SIZE],
            chr,
            chr_is_ram,
            mapper,
            mirroring,
        })
    }

    /// CPU側の読み込み（$6000-$FFFF）
    pub fn read_prg_byte(&self, addr: u16) -> u8 {
        match addr {
            0x6000..=0x7FFF => self.prg_ram[(addr - 0x6000) as usize],
            0x8000..=0xFFFF => {
                // 16KB ROM の場合は$C000以降にミラーリング
                let index = (addr - 0x8000) as usize % self.prg_rom.len();
                self.prg_rom[index]
            }
            _ => crate::bus::OPEN_BUS,
        }
    }

    /// CPU側の書き込み
    pub fn write_prg_byte(&mut self, addr: u16, value: u8) {
        match addr {
            0x6000..=0x7FFF => self.prg_ram[(addr - 0x6000) as usize] = value,
            _ => {
                log::warn!("Attempted write {:#04x} to PRG-ROM at {:#06x}", value, addr);
            }
        }
    }

    /// PPU側の読み込み（$0000-$1FFF）
    pub fn read_chr_byte(&self, addr: u16) -> u8 {
        self.chr[(addr & 0x1FFF) as usize]
    }

    /// PPU側の書き込み（CHR RAMの場合のみ有効）
    pub fn write_chr_byte(&mut self, addr: u16, value: u8) {
        if self.chr_is_ram {
            self.chr[(addr & 0x1FFF) as usize] = value;
        } else {
            log::trace!("Attempted write to CHR-ROM at {:#06x}", addr);
        }
    }

    pub fn mapper(&self) -> u8 {
        self.mapper
    }

    pub fn mirroring(&self) -> Mirroring {
        self.mirroring
    }
}
