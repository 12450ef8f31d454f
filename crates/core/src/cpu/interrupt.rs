//! 割り込み処理（RESET / NMI / IRQ / BRK）

use super::registers::Flag;
use super::Cpu;
use crate::bus::Bus;

/// 割り込みシーケンスにかかるサイクル数
pub const INTERRUPT_CYCLES: u8 = 7;

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Interrupt {
    Nmi,
    Reset,
    Irq,
    Break,
}

impl Interrupt {
    /// ジャンプ先を格納したベクタのアドレス
    pub fn vector(self) -> u16 {
        match self {
            Interrupt::Nmi => 0xFFFA,
            Interrupt::Reset => 0xFFFC,
            Interrupt::Irq | Interrupt::Break => 0xFFFE,
        }
    }
}

impl<B: Bus> Cpu<B> {
    /// 割り込みシーケンスを実行する
    ///
    /// BRKの場合、PCは既に命令長ぶん進んでいる。
    pub(super) fn interrupt(&mut self, kind: Interrupt) -> u8 {
        match kind {
            Interrupt::Reset => {
                // スタックへのダミー書き込みぶんだけSPが下がる
                self.registers.sp = self.registers.sp.wrapping_sub(3);
            }
            Interrupt::Nmi | Interrupt::Irq | Interrupt::Break => {
                self.push_word(self.registers.pc);
                let mut status = self.registers.p;
                status.set(Flag::Break, kind == Interrupt::Break);
                self.push_byte(status.bits());
            }
        }

        self.set_flag(Flag::InterruptDisable, true);
        self.registers.pc = self.bus.read_word(kind.vector());

        log::debug!("{:?} -> {:#06x}", kind, self.registers.pc);
        INTERRUPT_CYCLES
    }

    /// 保留中の割り込みを1つ取り出す（NMIが優先）
    pub(super) fn pending_interrupt(&mut self) -> Option<Interrupt> {
        if std::mem::take(&mut self.pending_nmi) {
            return Some(Interrupt::Nmi);
        }
        if self.pending_irq && !self.get_flag(Flag::InterruptDisable) {
            self.pending_irq = false;
            return Some(Interrupt::Irq);
        }
        None
    }
}
