//! # PPU (Picture Processing Unit)
//!
//! 描画は行わず、CPUから見えるレジスタとVBlankのタイミングだけを再現する。
//! 1ドット = 1/3 CPUサイクル、341ドット × 262ライン = 1フレーム。

use crate::cartridge::{Cartridge, Mirroring};
use std::cell::RefCell;
use std::rc::Rc;

pub const DOTS_PER_SCANLINE: u16 = 341;
pub const SCANLINES_PER_FRAME: u16 = 262;

const VBLANK_SCANLINE: u16 = 241;
const PRE_RENDER_SCANLINE: u16 = 261;

const STATUS_VBLANK: u8 = 0x80;
const STATUS_SPRITE_0_HIT: u8 = 0x40;
const STATUS_OVERFLOW: u8 = 0x20;
const CTRL_NMI_ENABLE: u8 = 0x80;
const CTRL_INCREMENT_32: u8 = 0x04;

pub struct Ppu {
    registers: Registers,
    vram: [u8; 4096],
    palette: [u8; 32],
    oam: [u8; 256],
    dot: u16,
    scanline: u16,
    frame: u64,
    /// VBlank開始時にCTRLのbit7が立っていればセットされる
    pub nmi: bool,
    cartridge: Option<Rc<RefCell<Cartridge>>>,
}

#[derive(Default)]
struct Registers {
    ctrl: u8,   // $2000
    status: u8, // $2002
    oam_addr: u8,
    data_buffer: u8,
    v: u16,  // Current VRAM address
    t: u16,  // Temporary VRAM address
    w: bool, // Write toggle
}

impl Ppu {
    pub fn new() -> Self {
        Ppu {
            registers: Registers::default(),
            vram: [0; 4096],
            palette: [0; 32],
            oam: [0; 256],
            dot: 0,
            scanline: 0,
            frame: 0,
            nmi: false,
            cartridge: None,
        }
    }

    pub fn set_cartridge(&mut self, cartridge: Rc<RefCell<Cartridge>>) {
        self.cartridge = Some(cartridge);
    }

    /// 1ドット進める
    pub fn tick(&mut self) {
        self.dot += 1;
        if self.dot >= DOTS_PER_SCANLINE {
            self.dot = 0;
            self.scanline += 1;
            if self.scanline >= SCANLINES_PER_FRAME {
                self.scanline = 0;
                self.frame += 1;
            }
        }

        if self.dot != 1 {
            return;
        }

        match self.scanline {
            VBLANK_SCANLINE => {
                self.registers.status |= STATUS_VBLANK;
                if self.registers.ctrl & CTRL_NMI_ENABLE != 0 {
                    self.nmi = true;
                }
            }
            PRE_RENDER_SCANLINE => {
                self.registers.status &= !(STATUS_VBLANK | STATUS_SPRITE_0_HIT | STATUS_OVERFLOW);
                self.nmi = false;
            }
            _ => {}
        }
    }

    /// 保留中のNMI要求を取り出す
    pub fn take_nmi(&mut self) -> bool {
        std::mem::take(&mut self.nmi)
    }

    pub fn read_register(&mut self, addr: u16) -> u8 {
        match addr & 0x2007 {
            0x2002 => {
                let data = self.registers.status;
                self.registers.status &= !STATUS_VBLANK;
                self.registers.w = false;
                data
            }
            0x2004 => self.oam[self.registers.oam_addr as usize],
            0x2007 => {
                let addr = self.registers.v & 0x3FFF;
                self.increment_vram_addr();

                if addr >= 0x3F00 {
                    // パレットは即座に返り、バッファには下のネームテーブルが入る
                    self.registers.data_buffer = self.read_vram(addr & 0x2FFF);
                    self.read_vram(addr)
                } else {
                    let result = self.registers.data_buffer;
                    self.registers.data_buffer = self.read_vram(addr);
                    result
                }
            }
            _ => self.registers.data_buffer,
        }
    }

    /// 副作用なしのレジスタ読み込み
    pub fn peek_register(&self, addr: u16) -> u8 {
        match addr & 0x2007 {
            0x2002 => self.registers.status,
            0x2004 => self.oam[self.registers.oam_addr as usize],
            _ => self.registers.data_buffer,
        }
    }

    pub fn write_register(&mut self, addr: u16, value: u8) {
        match addr & 0x2007 {
            0x2000 => {
                let was_enabled = self.registers.ctrl & CTRL_NMI_ENABLE != 0;
                self.registers.ctrl = value;

                // VBlank中にNMIを有効化すると即座に発生する
                if !was_enabled
                    && value & CTRL_NMI_ENABLE != 0
                    && self.registers.status & STATUS_VBLANK != 0
                {
                    self.nmi = true;
                }
            }
            // 描画しないのでPPUMASKは保持しない
            0x2001 => log::trace!("Ignored write {:#04x} to PPUMASK", value),
            0x2002 => log::trace!("Ignored write {:#04x} to PPUSTATUS", value),
            0x2003 => self.registers.oam_addr = value,
            0x2004 => self.write_oam_data(value),
            // スクロール値は使わないが、書き込みトグルはPPUADDRと共有している
            0x2005 => {
                log::trace!("Ignored write {:#04x} to PPUSCROLL", value);
                self.registers.w = !self.registers.w;
            }
            0x2006 => {
                if !self.registers.w {
                    self.registers.t = (self.registers.t & 0x80FF) | (((value as u16) & 0x3F) << 8);
                } else {
                    self.registers.t = (self.registers.t & 0xFF00) | (value as u16);
                    self.registers.v = self.registers.t;
                }
                self.registers.w = !self.registers.w;
            }
            _ => {
                let addr = self.registers.v & 0x3FFF;
                self.increment_vram_addr();
                self.write_vram(addr, value);
            }
        }
    }

    pub fn write_oam_data(&mut self, value: u8) {
        self.oam[self.registers.oam_addr as usize] = value;
        self.registers.oam_addr = self.registers.oam_addr.wrapping_add(1);
    }

    pub fn oam(&self) -> &[u8; 256] {
        &self.oam
    }

    pub fn scanline(&self) -> u16 {
        self.scanline
    }

    pub fn dot(&self) -> u16 {
        self.dot
    }

    pub fn frame(&self) -> u64 {
        self.frame
    }

    fn increment_vram_addr(&mut self) {
        let increment = if self.registers.ctrl & CTRL_INCREMENT_32 != 0 { 32 } else { 1 };
        self.registers.v = self.registers.v.wrapping_add(increment);
    }

    fn read_vram(&self, addr: u16) -> u8 {
        match addr {
            0x0000..=0x1FFF => match self.cartridge {
                Some(ref c) => c.borrow().read_chr_byte(addr),
                None => 0,
            },
            0x2000..=0x3EFF => self.vram[self.nametable_index(addr)],
            _ => self.palette[palette_index(addr)],
        }
    }

    fn write_vram(&mut self, addr: u16, value: u8) {
        match addr {
            0x0000..=0x1FFF => {
                if let Some(ref c) = self.cartridge {
                    c.borrow_mut().write_chr_byte(addr, value);
                }
            }
            0x2000..=0x3EFF => {
                let index = self.nametable_index(addr);
                self.vram[index] = value;
            }
            _ => self.palette[palette_index(addr)] = value,
        }
    }

    fn nametable_index(&self, addr: u16) -> usize {
        let offset = (addr - 0x2000) as usize & 0x0FFF;
        let table = offset / 0x400;
        let inner = offset % 0x400;

        let mirroring = match self.cartridge {
            Some(ref c) => c.borrow().mirroring(),
            None => Mirroring::Horizontal,
        };

        match mirroring {
            Mirroring::Horizontal => (table / 2) * 0x400 + inner,
            Mirroring::Vertical => (table % 2) * 0x400 + inner,
            Mirroring::FourScreen => offset,
        }
    }
}

/// $3F10/$3F14/$3F18/$3F1C は $3F00/$3F04/$3F08/$3F0C のミラー
fn palette_index(addr: u16) -> usize {
    let index = (addr as usize) & 0x1F;
    if index >= 0x10 && index % 4 == 0 {
        index & 0x0F
    } else {
        index
    }
}

impl Default for Ppu {
    fn default() -> Self {
        Self::new()
    }
}
