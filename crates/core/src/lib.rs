//! # NES CPU Core
//!
//! サイクル精度の6502（2A03）エミュレーションと、それを動かすための
//! 最小限の周辺デバイス（メモリバス、カートリッジ、PPUのタイミング）。

pub mod bus;
pub mod cartridge;
pub mod cpu;
pub mod error;
pub mod ppu;

pub use bus::{Bus, FlatBus, NesBus};
pub use cartridge::{Cartridge, Mirroring};
pub use cpu::{AddressingMode, Cpu, Flag, Flags, Instruction, Opcode, Registers, OPCODES};
pub use error::{NesError, Result};
pub use ppu::Ppu;

/// PPUはCPUの3倍の速度で動く
const PPU_DOTS_PER_CPU_CYCLE: u32 = 3;

/// NESエミュレータのメインインスタンス
pub struct Nes {
    cpu: Cpu<NesBus>,
}

impl Nes {
    /// 新しいNESインスタンスを作成
    pub fn new() -> Self {
        Self {
            cpu: Cpu::new(NesBus::new()),
        }
    }

    /// ROMをロードしてリセット
    pub fn load_rom(&mut self, rom_data: &[u8]) -> Result<()> {
        let cartridge = Cartridge::from_ines(rom_data)?;
        self.cpu.bus_mut().attach_cartridge(cartridge);
        self.cpu.reset();
        Ok(())
    }

    /// システムをリセット
    pub fn reset(&mut self) {
        self.cpu.reset();
    }

    /// 電源投入状態のレジスタで指定アドレスから実行を始める
    pub fn start_at(&mut self, pc: u16) {
        self.cpu.power_on_at(pc);
        log::info!("Starting at {:#06x}", pc);
    }

    /// 1命令実行し、経過したCPUサイクル数を返す
    ///
    /// 直前の命令がOAM DMAを起動していた場合、その停止サイクルも含まれる。
    /// 停止サイクルはCPUのサイクルカウンタにも加算される。
    pub fn step(&mut self) -> Result<u32> {
        let elapsed = self.cpu.cycles();
        let stall_cycles = self.cpu.bus_mut().take_stall_cycles(elapsed);
        self.cpu.stall(stall_cycles);
        let cycles = stall_cycles + self.cpu.try_tick()? as u32;

        let ppu = &mut self.cpu.bus_mut().ppu;
        for _ in 0..cycles * PPU_DOTS_PER_CPU_CYCLE {
            ppu.tick();
        }

        if ppu.take_nmi() {
            self.cpu.nmi();
        }

        Ok(cycles)
    }

    /// PPUのフレームカウンタが進むまで実行
    pub fn step_frame(&mut self) -> Result<()> {
        let frame = self.cpu.bus().ppu.frame();
        while self.cpu.bus().ppu.frame() == frame {
            self.step()?;
        }
        Ok(())
    }

    /// CPU状態の取得（デバッグ用）
    pub fn cpu(&self) -> &Cpu<NesBus> {
        &self.cpu
    }

    pub fn cpu_mut(&mut self) -> &mut Cpu<NesBus> {
        &mut self.cpu
    }

    /// PPU状態の取得（デバッグ用）
    pub fn ppu(&self) -> &Ppu {
        &self.cpu.bus().ppu
    }

    /// 任意のCPUメモリアドレスを副作用なしで読み取り
    pub fn peek_memory(&self, address: u16) -> u8 {
        self.cpu.bus().peek_byte(address)
    }

    /// メモリ範囲を読み取り
    pub fn read_memory_range(&self, start: u16, length: usize) -> Vec<u8> {
        (0..length)
            .map(|i| self.peek_memory(start.wrapping_add(i as u16)))
            .collect()
    }
}

impl Default for Nes {
    fn default() -> Self {
        Self::new()
    }
}
