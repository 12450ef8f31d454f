//! # 6502 CPU Implementation
//!
//! NESに搭載された6502（2A03）の命令実行エンジン。
//! バスは構築時に注入され、[`Cpu::tick`] が1命令を実行して消費サイクル数を返す。
//! PPUなど他のデバイスをそのサイクル数に合わせて進めるのは呼び出し側の責任。

mod addressing;
mod instructions;
mod interrupt;
mod opcodes;
mod registers;

#[cfg(test)]
mod tests;

pub use addressing::{resolve, Operand};
pub use interrupt::{Interrupt, INTERRUPT_CYCLES};
pub use opcodes::{AddressingMode, Instruction, Opcode, OPCODES};
pub use registers::{Flag, Flags, Registers};

use crate::bus::Bus;
use crate::error::{NesError, Result};

const STACK_BASE: u16 = 0x0100;

pub struct Cpu<B: Bus> {
    bus: B,
    registers: Registers,
    /// 構築からの累積サイクル数（DMAによる停止も含む）
    cycles: u64,
    pending_nmi: bool,
    pending_irq: bool,
}

impl<B: Bus> Cpu<B> {
    /// 電源投入時のレジスタで作成する
    ///
    /// PCはまだ設定されない。カートリッジ接続後に [`Cpu::reset`] を呼ぶこと。
    pub fn new(bus: B) -> Self {
        Cpu {
            bus,
            registers: Registers::power_on(),
            cycles: 0,
            pending_nmi: false,
            pending_irq: false,
        }
    }

    /// RESETシーケンス（7サイクル）
    pub fn reset(&mut self) {
        self.pending_nmi = false;
        self.pending_irq = false;
        let cycles = self.interrupt(Interrupt::Reset);
        self.cycles += cycles as u64;
        log::info!("CPU reset: PC={:#06x}", self.registers.pc);
    }

    /// 電源投入状態で指定アドレスから実行を始める（テストROM用）
    ///
    /// RESET後と同じく7サイクル経過した扱いになる。
    pub fn power_on_at(&mut self, pc: u16) {
        self.registers = Registers::power_on();
        self.registers.pc = pc;
        self.cycles = INTERRUPT_CYCLES as u64;
        self.pending_nmi = false;
        self.pending_irq = false;
    }

    /// NMIを要求する。次の [`Cpu::tick`] で処理される
    pub fn nmi(&mut self) {
        self.pending_nmi = true;
    }

    /// IRQを要求する。InterruptDisableが立っている間は保留される
    pub fn irq(&mut self) {
        self.pending_irq = true;
    }

    /// 保留中のIRQ要求を取り下げる
    pub fn clear_irq(&mut self) {
        self.pending_irq = false;
    }

    /// 1命令（または保留中の割り込み）を実行し、消費サイクル数を返す
    ///
    /// # Panics
    ///
    /// 実行できないオペコードに到達した場合、オペコード・PC・レジスタを含む
    /// メッセージでパニックする。
    pub fn tick(&mut self) -> u8 {
        match self.try_tick() {
            Ok(cycles) => cycles,
            Err(e) => panic!("{}", e),
        }
    }

    /// [`Cpu::tick`] と同じだが、実行できないオペコードをエラーとして返す
    ///
    /// エラー時はレジスタを一切変更しない。
    pub fn try_tick(&mut self) -> Result<u8> {
        if let Some(kind) = self.pending_interrupt() {
            let cycles = self.interrupt(kind);
            self.cycles += cycles as u64;
            return Ok(cycles);
        }

        let pc = self.registers.pc;
        let opcode = self.bus.read_byte(pc);
        let descriptor = &OPCODES[opcode as usize];

        if descriptor.traps() {
            log::error!(
                "Illegal instruction {} ({:#04x}) at {:#06x}",
                descriptor.mnemonic(),
                opcode,
                pc
            );
            return Err(NesError::IllegalOpcode {
                opcode,
                pc,
                registers: self.registers,
            });
        }

        log::trace!("{:04X}  {:02X}", pc, opcode);

        let (operand, page_crossed) = resolve(&self.registers, &mut self.bus, descriptor.mode);
        self.registers.pc = pc.wrapping_add(descriptor.size as u16);

        let extra = self.execute(descriptor.instruction, operand, page_crossed);
        let cycles = descriptor.cycles + extra;
        self.cycles += cycles as u64;
        Ok(cycles)
    }

    /// 命令を実行せずにサイクルだけ進める（OAM DMAによる停止）
    pub fn stall(&mut self, cycles: u32) {
        self.cycles += cycles as u64;
    }

    /// レジスタのスナップショット
    pub fn registers(&self) -> Registers {
        self.registers
    }

    pub fn cycles(&self) -> u64 {
        self.cycles
    }

    pub fn set_program_counter(&mut self, pc: u16) {
        self.registers.pc = pc;
    }

    pub fn bus(&self) -> &B {
        &self.bus
    }

    pub fn bus_mut(&mut self) -> &mut B {
        &mut self.bus
    }

    pub fn into_bus(self) -> B {
        self.bus
    }

    fn pop_byte(&mut self) -> u8 {
        self.registers.sp = self.registers.sp.wrapping_add(1);
        let address = STACK_BASE + self.registers.sp as u16;
        self.bus.read_byte(address)
    }

    fn push_byte(&mut self, value: u8) {
        let address = STACK_BASE + self.registers.sp as u16;
        self.bus.write_byte(address, value);
        self.registers.sp = self.registers.sp.wrapping_sub(1);
    }

    fn pop_word(&mut self) -> u16 {
        let lo = self.pop_byte() as u16;
        let hi = self.pop_byte() as u16;
        (hi << 8) | lo
    }

    fn push_word(&mut self, value: u16) {
        self.push_byte((value >> 8) as u8);
        self.push_byte(value as u8);
    }

    fn get_flag(&self, flag: Flag) -> bool {
        self.registers.p.get(flag)
    }

    fn set_flag(&mut self, flag: Flag, value: bool) {
        self.registers.p.set(flag, value);
    }

    fn set_flags_zero_negative(&mut self, value: u8) {
        self.set_flag(Flag::Zero, value == 0);
        self.set_flag(Flag::Negative, value & 0b1000_0000 != 0);
    }

    fn set_flags_carry_overflow(&mut self, m: u8, n: u8, result: u16) {
        self.set_flag(Flag::Carry, result > 0xFF);
        self.set_flag(
            Flag::Overflow,
            (m ^ result as u8) & (n ^ result as u8) & 0x80 != 0,
        );
    }

    fn carry(&self) -> u8 {
        if self.get_flag(Flag::Carry) {
            1
        } else {
            0
        }
    }
}
