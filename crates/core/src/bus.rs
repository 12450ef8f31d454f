//! # Memory Bus
//!
//! CPUから見た16ビットのアドレス空間。CPUは[`Bus`]トレイトの読み書きだけに依存し、
//! アドレスのデコードは各実装に任せる。

use crate::cartridge::Cartridge;
use crate::ppu::Ppu;
use std::cell::RefCell;
use std::rc::Rc;

/// 未接続のアドレスを読んだときに返す値
pub const OPEN_BUS: u8 = 0xFF;

const OAM_DMA_CYCLES: u32 = 513;

/// CPUが利用するバスの契約
///
/// 読み込みは全アドレスで定義されていなければならない。ROMや未接続領域への
/// 書き込みは無視してよいが、パニックしてはならない。
pub trait Bus {
    fn read_byte(&mut self, address: u16) -> u8;

    fn write_byte(&mut self, address: u16, value: u8);

    fn read_noncontinuous_word(&mut self, lo: u16, hi: u16) -> u16 {
        (self.read_byte(lo) as u16) | (self.read_byte(hi) as u16) << 8
    }

    fn read_word(&mut self, address: u16) -> u16 {
        self.read_noncontinuous_word(address, address.wrapping_add(1))
    }
}

/// 64KB全域がRAMのバス（テストや組み込み用）
pub struct FlatBus {
    memory: Box<[u8]>,
}

impl FlatBus {
    pub fn new() -> Self {
        FlatBus {
            memory: vec![0; 0x10000].into_boxed_slice(),
        }
    }

    /// 指定アドレスからデータを配置（$FFFFを超えた分は$0000に折り返す）
    pub fn load(&mut self, address: u16, data: &[u8]) {
        for (i, &value) in data.iter().enumerate() {
            let addr = address.wrapping_add(i as u16);
            self.memory[addr as usize] = value;
        }
    }

    pub fn peek_byte(&self, address: u16) -> u8 {
        self.memory[address as usize]
    }
}

impl Bus for FlatBus {
    fn read_byte(&mut self, address: u16) -> u8 {
        self.memory[address as usize]
    }

    fn write_byte(&mut self, address: u16, value: u8) {
        self.memory[address as usize] = value;
    }
}

impl Default for FlatBus {
    fn default() -> Self {
        Self::new()
    }
}

/// NES本体のメモリマップ
pub struct NesBus {
    pub ram: [u8; 2048],
    pub ppu: Ppu,
    pub cartridge: Option<Rc<RefCell<Cartridge>>>,
    dma_pending: bool,
}

impl NesBus {
    pub fn new() -> Self {
        NesBus {
            ram: [0; 2048],
            ppu: Ppu::new(),
            cartridge: None,
            dma_pending: false,
        }
    }

    pub fn attach_cartridge(&mut self, cartridge: Cartridge) {
        let c = Rc::new(RefCell::new(cartridge));
        self.ppu.set_cartridge(c.clone());
        self.cartridge = Some(c);
    }

    /// OAM DMAで発生したCPUの停止サイクル数を取り出す
    ///
    /// DMAは奇数サイクルで開始すると1サイクル余分にかかる。
    pub fn take_stall_cycles(&mut self, cpu_cycles: u64) -> u32 {
        if !self.dma_pending {
            return 0;
        }
        self.dma_pending = false;
        OAM_DMA_CYCLES + (cpu_cycles % 2) as u32
    }

    /// 副作用なしの読み込み（デバッガ・トレース用）
    pub fn peek_byte(&self, address: u16) -> u8 {
        match address {
            0x0000..=0x1FFF => self.ram[address as usize % 0x0800],
            0x2000..=0x3FFF => self.ppu.peek_register(address),
            0x4000..=0x5FFF => OPEN_BUS,
            _ => self.read_cartridge(address),
        }
    }

    fn read_cartridge(&self, address: u16) -> u8 {
        match self.cartridge {
            Some(ref c) => c.borrow().read_prg_byte(address),
            None => OPEN_BUS,
        }
    }

    fn oam_dma(&mut self, page: u8) {
        let base = (page as u16) << 8;
        for i in 0..256 {
            let v = self.read_byte(base | i);
            self.ppu.write_oam_data(v);
        }
        self.dma_pending = true;
    }
}

impl Bus for NesBus {
    fn read_byte(&mut self, address: u16) -> u8 {
        match address {
            0x0000..=0x1FFF => self.ram[address as usize % 0x0800],
            0x2000..=0x3FFF => self.ppu.read_register(address),
            0x4000..=0x4017 => {
                log::trace!("Read from APU/IO register {:#06x}", address);
                OPEN_BUS
            }
            0x4018..=0x401F => {
                log::warn!("Read from CPU test mode region {:#06x}", address);
                OPEN_BUS
            }
            0x4020..=0x5FFF => OPEN_BUS,
            _ => self.read_cartridge(address),
        }
    }

    fn write_byte(&mut self, address: u16, value: u8) {
        match address {
            0x0000..=0x1FFF => self.ram[address as usize % 0x0800] = value,
            0x2000..=0x3FFF => self.ppu.write_register(address, value),
            0x4014 => self.oam_dma(value),
            0x4000..=0x4017 => {
                log::debug!("Ignored write {:#04x} to APU/IO register {:#06x}", value, address);
            }
            0x4018..=0x401F => {
                log::warn!("Ignored write to CPU test mode region {:#06x}", address);
            }
            0x4020..=0x5FFF => {
                log::debug!("Ignored write to unmapped address {:#06x}", address);
            }
            _ => {
                if let Some(ref c) = self.cartridge {
                    c.borrow_mut().write_prg_byte(address, value);
                }
            }
        }
    }
}

impl Default for NesBus {
    fn default() -> Self {
        Self::new()
    }
}
