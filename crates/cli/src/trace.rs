//! nestest形式のトレース行

use nes_cpu::{AddressingMode, Registers, OPCODES};

/// `PC  バイト列  命令 オペランド  レジスタ CYC` の1行を作る
///
/// `peek` は副作用なしでメモリを読む関数。非公式命令には `*` が付く。
pub fn format_line<F: Fn(u16) -> u8>(peek: F, registers: Registers, cycles: u64) -> String {
    let pc = registers.pc;
    let opcode = &OPCODES[peek(pc) as usize];
    let bytes: Vec<u8> = (0..opcode.size as u16)
        .map(|i| peek(pc.wrapping_add(i)))
        .collect();

    let hex = bytes
        .iter()
        .map(|b| format!("{:02X}", b))
        .collect::<Vec<_>>()
        .join(" ");

    let lo = bytes.get(1).copied().unwrap_or(0);
    let hi = bytes.get(2).copied().unwrap_or(0);
    let word = u16::from_le_bytes([lo, hi]);

    let operand = match opcode.mode {
        AddressingMode::Implied => String::new(),
        AddressingMode::Accumulator => "A".to_string(),
        AddressingMode::Immediate => format!("#${:02X}", lo),
        AddressingMode::ZeroPage => format!("${:02X}", lo),
        AddressingMode::ZeroPageX => format!("${:02X},X", lo),
        AddressingMode::ZeroPageY => format!("${:02X},Y", lo),
        AddressingMode::Relative => {
            let target = pc.wrapping_add(2).wrapping_add(lo as i8 as u16);
            format!("${:04X}", target)
        }
        AddressingMode::Absolute => format!("${:04X}", word),
        AddressingMode::AbsoluteX => format!("${:04X},X", word),
        AddressingMode::AbsoluteY => format!("${:04X},Y", word),
        AddressingMode::Indirect => format!("(${:04X})", word),
        AddressingMode::IndirectX => format!("(${:02X},X)", lo),
        AddressingMode::IndirectY => format!("(${:02X}),Y", lo),
    };

    let marker = if opcode.illegal { '*' } else { ' ' };
    let disassembly = format!("{:04X}  {:<9}{}{} {}", pc, hex, marker, opcode.mnemonic(), operand);

    format!(
        "{:<47} A:{:02X} X:{:02X} Y:{:02X} P:{:02X} SP:{:02X} CYC:{}",
        disassembly.trim_end(),
        registers.a,
        registers.x,
        registers.y,
        registers.p.bits(),
        registers.sp,
        cycles
    )
}
