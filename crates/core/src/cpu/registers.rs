//! レジスタファイルとステータスフラグ

use std::fmt;

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Flag {
    Carry            = 0b00000001,
    Zero             = 0b00000010,
    InterruptDisable = 0b00000100,
    Decimal          = 0b00001000,
    Break            = 0b00010000,
    Unused           = 0b00100000,
    Overflow         = 0b01000000,
    Negative         = 0b10000000,
}

/// ステータスレジスタ（P）
///
/// bit 5 は常に1として読める。Breakビットはスタックに積まれたときだけ意味を持つ。
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Flags(u8);

impl Flags {
    /// 電源投入時の値（Unused + InterruptDisable）
    pub const POWER_ON: Flags = Flags(0x24);

    pub fn from_bits(bits: u8) -> Self {
        Flags(bits | Flag::Unused as u8)
    }

    pub fn bits(self) -> u8 {
        self.0 | Flag::Unused as u8
    }

    pub fn get(self, flag: Flag) -> bool {
        (self.0 & flag as u8) != 0
    }

    /// Unusedビットは落とせない
    pub fn set(&mut self, flag: Flag, value: bool) {
        if value {
            self.0 |= flag as u8;
        } else {
            self.0 &= !(flag as u8);
        }
        self.0 |= Flag::Unused as u8;
    }
}

impl Default for Flags {
    fn default() -> Self {
        Self::POWER_ON
    }
}

impl fmt::Display for Flags {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        const NAMES: [(Flag, char); 8] = [
            (Flag::Negative, 'N'),
            (Flag::Overflow, 'V'),
            (Flag::Unused, 'U'),
            (Flag::Break, 'B'),
            (Flag::Decimal, 'D'),
            (Flag::InterruptDisable, 'I'),
            (Flag::Zero, 'Z'),
            (Flag::Carry, 'C'),
        ];
        for (flag, name) in NAMES {
            let c = if self.get(flag) { name } else { '-' };
            write!(f, "{}", c)?;
        }
        Ok(())
    }
}

/// CPUレジスタのスナップショット
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Registers {
    /// プログラムカウンタ
    pub pc: u16,
    /// スタックポインタ（$0100-$01FF内のオフセット）
    pub sp: u8,
    /// アキュムレータ
    pub a: u8,
    pub x: u8,
    pub y: u8,
    /// ステータスレジスタ
    pub p: Flags,
}

impl Registers {
    /// 電源投入時のレジスタ（SP=$FD, P=$24）
    pub fn power_on() -> Self {
        Registers {
            pc: 0,
            sp: 0xFD,
            a: 0,
            x: 0,
            y: 0,
            p: Flags::POWER_ON,
        }
    }
}

impl Default for Registers {
    fn default() -> Self {
        Self::power_on()
    }
}

impl fmt::Display for Registers {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "PC:{:04X} A:{:02X} X:{:02X} Y:{:02X} P:{:02X} SP:{:02X}",
            self.pc,
            self.a,
            self.x,
            self.y,
            self.p.bits(),
            self.sp
        )
    }
}
