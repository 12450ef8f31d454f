//! # アドレッシングモード
//!
//! 実効アドレスの計算。レジスタは変更せず、間接モードでバスを読むだけ。

use super::opcodes::AddressingMode;
use super::registers::Registers;
use crate::bus::Bus;

/// 命令が操作する対象
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Operand {
    Implied,
    Accumulator,
    Address(u16),
}

/// `registers.pc` がオペコードを指している状態で実効アドレスを求める
///
/// 戻り値の `bool` はインデックス加算や分岐でページを跨いだかどうか。
pub fn resolve<B: Bus>(registers: &Registers, bus: &mut B, mode: AddressingMode) -> (Operand, bool) {
    let pc = registers.pc;
    let arg = pc.wrapping_add(1);

    let (address, page_crossed) = match mode {
        AddressingMode::Implied => return (Operand::Implied, false),
        AddressingMode::Accumulator => return (Operand::Accumulator, false),
        AddressingMode::Immediate => (arg, false),
        AddressingMode::ZeroPage => (bus.read_byte(arg) as u16, false),
        AddressingMode::ZeroPageX => (low_byte(offset(bus.read_byte(arg), registers.x)), false),
        AddressingMode::ZeroPageY => (low_byte(offset(bus.read_byte(arg), registers.y)), false),
        AddressingMode::Relative => {
            let displacement = bus.read_byte(arg) as i8;
            let next = pc.wrapping_add(2);
            let target = next.wrapping_add(displacement as u16);
            (target, high_byte(next) != high_byte(target))
        }
        AddressingMode::Absolute => (bus.read_word(arg), false),
        AddressingMode::AbsoluteX => {
            let base = bus.read_word(arg);
            (offset(base, registers.x), cross(base, registers.x))
        }
        AddressingMode::AbsoluteY => {
            let base = bus.read_word(arg);
            (offset(base, registers.y), cross(base, registers.y))
        }
        AddressingMode::Indirect => {
            // 下位バイトが$FFのとき、上位バイトは同じページの先頭から読まれる
            let i = bus.read_word(arg);
            let target = bus.read_noncontinuous_word(i, high_byte(i) | low_byte(i.wrapping_add(1)));
            (target, false)
        }
        AddressingMode::IndirectX => {
            let i = offset(bus.read_byte(arg), registers.x);
            (bus.read_noncontinuous_word(low_byte(i), low_byte(i + 1)), false)
        }
        AddressingMode::IndirectY => {
            let i = bus.read_byte(arg) as u16;
            let base = bus.read_noncontinuous_word(i, low_byte(i + 1));
            (offset(base, registers.y), cross(base, registers.y))
        }
    };

    (Operand::Address(address), page_crossed)
}

fn cross(base: u16, offset: u8) -> bool {
    (base & 0xFF) + offset as u16 > 0xFF
}

fn offset<T: Into<u16>>(base: T, offset: u8) -> u16 {
    base.into().wrapping_add(offset as u16)
}

fn low_byte<T: Into<u16>>(value: T) -> u16 {
    value.into() & 0xFF
}

fn high_byte(value: u16) -> u16 {
    value & 0xFF00
}
