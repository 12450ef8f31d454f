//! # 命令デコードテーブル
//!
//! 256個のオペコードそれぞれについて、命令・アドレッシングモード・バイト数・
//! 基本サイクル数を静的に定義する。

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum AddressingMode {
    Implied,
    Accumulator,
    Immediate,
    ZeroPage,
    ZeroPageX,
    ZeroPageY,
    Relative,
    Absolute,
    AbsoluteX,
    AbsoluteY,
    Indirect,
    IndirectX,
    IndirectY,
}

impl AddressingMode {
    /// オペコードに続くオペランドのバイト数
    pub const fn operand_size(self) -> u8 {
        match self {
            AddressingMode::Implied | AddressingMode::Accumulator => 0,
            AddressingMode::Absolute
            | AddressingMode::AbsoluteX
            | AddressingMode::AbsoluteY
            | AddressingMode::Indirect => 2,
            _ => 1,
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Instruction {
    Adc, And, Asl, Bcc, Bcs, Beq, Bit, Bmi, Bne, Bpl, Brk, Bvc, Bvs, Clc,
    Cld, Cli, Clv, Cmp, Cpx, Cpy, Dec, Dex, Dey, Eor, Inc, Inx, Iny, Jmp,
    Jsr, Lda, Ldx, Ldy, Lsr, Nop, Ora, Pha, Php, Pla, Plp, Rol, Ror, Rti,
    Rts, Sbc, Sec, Sed, Sei, Sta, Stx, Sty, Tax, Tay, Tsx, Txa, Txs, Tya,

    // Stable illegal opcodes
    Alr, Anc, Arr, Axs, Dcp, Isb, Lax, Rla, Rra, Sax, Slo, Sre,

    // Unstable illegal opcodes (always trap)
    Ahx, Las, Lxa, Shx, Shy, Tas, Xaa,

    // Halts the processor
    Jam,
}

impl Instruction {
    pub const fn mnemonic(self) -> &'static str {
        use Instruction::*;
        match self {
            Adc => "ADC", And => "AND", Asl => "ASL", Bcc => "BCC", Bcs => "BCS",
            Beq => "BEQ", Bit => "BIT", Bmi => "BMI", Bne => "BNE", Bpl => "BPL",
            Brk => "BRK", Bvc => "BVC", Bvs => "BVS", Clc => "CLC", Cld => "CLD",
            Cli => "CLI", Clv => "CLV", Cmp => "CMP", Cpx => "CPX", Cpy => "CPY",
            Dec => "DEC", Dex => "DEX", Dey => "DEY", Eor => "EOR", Inc => "INC",
            Inx => "INX", Iny => "INY", Jmp => "JMP", Jsr => "JSR", Lda => "LDA",
            Ldx => "LDX", Ldy => "LDY", Lsr => "LSR", Nop => "NOP", Ora => "ORA",
            Pha => "PHA", Php => "PHP", Pla => "PLA", Plp => "PLP", Rol => "ROL",
            Ror => "ROR", Rti => "RTI", Rts => "RTS", Sbc => "SBC", Sec => "SEC",
            Sed => "SED", Sei => "SEI", Sta => "STA", Stx => "STX", Sty => "STY",
            Tax => "TAX", Tay => "TAY", Tsx => "TSX", Txa => "TXA", Txs => "TXS",
            Tya => "TYA",
            Alr => "ALR", Anc => "ANC", Arr => "ARR", Axs => "AXS", Dcp => "DCP",
            Isb => "ISB", Lax => "LAX", Rla => "RLA", Rra => "RRA", Sax => "SAX",
            Slo => "SLO", Sre => "SRE",
            Ahx => "AHX", Las => "LAS", Lxa => "LXA", Shx => "SHX", Shy => "SHY",
            Tas => "TAS", Xaa => "XAA",
            Jam => "JAM",
        }
    }

    /// 挙動が不定、またはCPUを停止させる命令
    pub const fn is_unstable(self) -> bool {
        use Instruction::*;
        matches!(self, Ahx | Las | Lxa | Shx | Shy | Tas | Xaa | Jam)
    }

    /// インデックスでページを跨いだときに1サイクル追加される読み込み系の命令
    ///
    /// ストアとリードモディファイライトは基本サイクル数に含まれている。
    pub const fn pays_page_penalty(self) -> bool {
        use Instruction::*;
        matches!(
            self,
            Adc | And | Cmp | Eor | Lda | Ldx | Ldy | Ora | Sbc | Lax | Nop
        )
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Opcode {
    pub instruction: Instruction,
    pub mode: AddressingMode,
    /// オペコードを含む命令長（1-3）
    pub size: u8,
    /// ページ跨ぎや分岐を含まない基本サイクル数
    pub cycles: u8,
    /// 非公式命令かどうか
    pub illegal: bool,
}

impl Opcode {
    pub fn mnemonic(&self) -> &'static str {
        self.instruction.mnemonic()
    }

    /// 実行せずに停止すべきオペコードかどうか
    ///
    /// 不安定な命令は常に停止する。`illegal-opcodes` フィーチャーが無効な場合は
    /// 全ての非公式命令が停止する。
    pub fn traps(&self) -> bool {
        self.instruction.is_unstable() || (self.illegal && !cfg!(feature = "illegal-opcodes"))
    }
}

const fn op(instruction: Instruction, mode: AddressingMode, cycles: u8) -> Opcode {
    // BRKはパディングバイトを1つ読み飛ばす
    let size = match instruction {
        Instruction::Brk => 2,
        _ => 1 + mode.operand_size(),
    };
    Opcode {
        instruction,
        mode,
        size,
        cycles,
        illegal: false,
    }
}

const fn illegal(instruction: Instruction, mode: AddressingMode, cycles: u8) -> Opcode {
    let mut opcode = op(instruction, mode, cycles);
    opcode.illegal = true;
    opcode
}

const fn decode(opcode: u8) -> Opcode {
    use AddressingMode::*;
    use Instruction::*;

    match opcode {
        // Loads
        0xa9 => op(Lda, Immediate, 2),
        0xa5 => op(Lda, ZeroPage, 3),
        0xb5 => op(Lda, ZeroPageX, 4),
        0xad => op(Lda, Absolute, 4),
        0xbd => op(Lda, AbsoluteX, 4),
        0xb9 => op(Lda, AbsoluteY, 4),
        0xa1 => op(Lda, IndirectX, 6),
        0xb1 => op(Lda, IndirectY, 5),

        0xa2 => op(Ldx, Immediate, 2),
        0xa6 => op(Ldx, ZeroPage, 3),
        0xb6 => op(Ldx, ZeroPageY, 4),
        0xae => op(Ldx, Absolute, 4),
        0xbe => op(Ldx, AbsoluteY, 4),

        0xa0 => op(Ldy, Immediate, 2),
        0xa4 => op(Ldy, ZeroPage, 3),
        0xb4 => op(Ldy, ZeroPageX, 4),
        0xac => op(Ldy, Absolute, 4),
        0xbc => op(Ldy, AbsoluteX, 4),

        // Stores
        0x85 => op(Sta, ZeroPage, 3),
        0x95 => op(Sta, ZeroPageX, 4),
        0x8d => op(Sta, Absolute, 4),
        0x9d => op(Sta, AbsoluteX, 5),
        0x99 => op(Sta, AbsoluteY, 5),
        0x81 => op(Sta, IndirectX, 6),
        0x91 => op(Sta, IndirectY, 6),

        0x86 => op(Stx, ZeroPage, 3),
        0x96 => op(Stx, ZeroPageY, 4),
        0x8e => op(Stx, Absolute, 4),

        0x84 => op(Sty, ZeroPage, 3),
        0x94 => op(Sty, ZeroPageX, 4),
        0x8c => op(Sty, Absolute, 4),

        // Arithmetic
        0x69 => op(Adc, Immediate, 2),
        0x65 => op(Adc, ZeroPage, 3),
        0x75 => op(Adc, ZeroPageX, 4),
        0x6d => op(Adc, Absolute, 4),
        0x7d => op(Adc, AbsoluteX, 4),
        0x79 => op(Adc, AbsoluteY, 4),
        0x61 => op(Adc, IndirectX, 6),
        0x71 => op(Adc, IndirectY, 5),

        0xe9 => op(Sbc, Immediate, 2),
        0xe5 => op(Sbc, ZeroPage, 3),
        0xf5 => op(Sbc, ZeroPageX, 4),
        0xed => op(Sbc, Absolute, 4),
        0xfd => op(Sbc, AbsoluteX, 4),
        0xf9 => op(Sbc, AbsoluteY, 4),
        0xe1 => op(Sbc, IndirectX, 6),
        0xf1 => op(Sbc, IndirectY, 5),

        // Comparisons
        0xc9 => op(Cmp, Immediate, 2),
        0xc5 => op(Cmp, ZeroPage, 3),
        0xd5 => op(Cmp, ZeroPageX, 4),
        0xcd => op(Cmp, Absolute, 4),
        0xdd => op(Cmp, AbsoluteX, 4),
        0xd9 => op(Cmp, AbsoluteY, 4),
        0xc1 => op(Cmp, IndirectX, 6),
        0xd1 => op(Cmp, IndirectY, 5),

        0xe0 => op(Cpx, Immediate, 2),
        0xe4 => op(Cpx, ZeroPage, 3),
        0xec => op(Cpx, Absolute, 4),

        0xc0 => op(Cpy, Immediate, 2),
        0xc4 => op(Cpy, ZeroPage, 3),
        0xcc => op(Cpy, Absolute, 4),

        // Bitwise operations
        0x29 => op(And, Immediate, 2),
        0x25 => op(And, ZeroPage, 3),
        0x35 => op(And, ZeroPageX, 4),
        0x2d => op(And, Absolute, 4),
        0x3d => op(And, AbsoluteX, 4),
        0x39 => op(And, AbsoluteY, 4),
        0x21 => op(And, IndirectX, 6),
        0x31 => op(And, IndirectY, 5),

        0x09 => op(Ora, Immediate, 2),
        0x05 => op(Ora, ZeroPage, 3),
        0x15 => op(Ora, ZeroPageX, 4),
        0x0d => op(Ora, Absolute, 4),
        0x1d => op(Ora, AbsoluteX, 4),
        0x19 => op(Ora, AbsoluteY, 4),
        0x01 => op(Ora, IndirectX, 6),
        0x11 => op(Ora, IndirectY, 5),

        0x49 => op(Eor, Immediate, 2),
        0x45 => op(Eor, ZeroPage, 3),
        0x55 => op(Eor, ZeroPageX, 4),
        0x4d => op(Eor, Absolute, 4),
        0x5d => op(Eor, AbsoluteX, 4),
        0x59 => op(Eor, AbsoluteY, 4),
        0x41 => op(Eor, IndirectX, 6),
        0x51 => op(Eor, IndirectY, 5),

        0x24 => op(Bit, ZeroPage, 3),
        0x2c => op(Bit, Absolute, 4),

        // Shifts and rotates
        0x2a => op(Rol, Accumulator, 2),
        0x26 => op(Rol, ZeroPage, 5),
        0x36 => op(Rol, ZeroPageX, 6),
        0x2e => op(Rol, Absolute, 6),
        0x3e => op(Rol, AbsoluteX, 7),

        0x6a => op(Ror, Accumulator, 2),
        0x66 => op(Ror, ZeroPage, 5),
        0x76 => op(Ror, ZeroPageX, 6),
        0x6e => op(Ror, Absolute, 6),
        0x7e => op(Ror, AbsoluteX, 7),

        0x0a => op(Asl, Accumulator, 2),
        0x06 => op(Asl, ZeroPage, 5),
        0x16 => op(Asl, ZeroPageX, 6),
        0x0e => op(Asl, Absolute, 6),
        0x1e => op(Asl, AbsoluteX, 7),

        0x4a => op(Lsr, Accumulator, 2),
        0x46 => op(Lsr, ZeroPage, 5),
        0x56 => op(Lsr, ZeroPageX, 6),
        0x4e => op(Lsr, Absolute, 6),
        0x5e => op(Lsr, AbsoluteX, 7),

        // Increments and decrements
        0xe6 => op(Inc, ZeroPage, 5),
        0xf6 => op(Inc, ZeroPageX, 6),
        0xee => op(Inc, Absolute, 6),
        0xfe => op(Inc, AbsoluteX, 7),

        0xc6 => op(Dec, ZeroPage, 5),
        0xd6 => op(Dec, ZeroPageX, 6),
        0xce => op(Dec, Absolute, 6),
        0xde => op(Dec, AbsoluteX, 7),

        0xe8 => op(Inx, Implied, 2),
        0xca => op(Dex, Implied, 2),
        0xc8 => op(Iny, Implied, 2),
        0x88 => op(Dey, Implied, 2),

        // Register moves
        0xaa => op(Tax, Implied, 2),
        0xa8 => op(Tay, Implied, 2),
        0x8a => op(Txa, Implied, 2),
        0x98 => op(Tya, Implied, 2),
        0x9a => op(Txs, Implied, 2),
        0xba => op(Tsx, Implied, 2),

        // Flag operations
        0x18 => op(Clc, Implied, 2),
        0x38 => op(Sec, Implied, 2),
        0x58 => op(Cli, Implied, 2),
        0x78 => op(Sei, Implied, 2),
        0xb8 => op(Clv, Implied, 2),
        0xd8 => op(Cld, Implied, 2),
        0xf8 => op(Sed, Implied, 2),

        // Branches
        0x10 => op(Bpl, Relative, 2),
        0x30 => op(Bmi, Relative, 2),
        0x50 => op(Bvc, Relative, 2),
        0x70 => op(Bvs, Relative, 2),
        0x90 => op(Bcc, Relative, 2),
        0xb0 => op(Bcs, Relative, 2),
        0xd0 => op(Bne, Relative, 2),
        0xf0 => op(Beq, Relative, 2),

        // Jumps
        0x4c => op(Jmp, Absolute, 3),
        0x6c => op(Jmp, Indirect, 5),

        // Procedure calls
        0x20 => op(Jsr, Absolute, 6),
        0x60 => op(Rts, Implied, 6),
        0x00 => op(Brk, Implied, 7),
        0x40 => op(Rti, Implied, 6),

        // Stack operations
        0x48 => op(Pha, Implied, 3),
        0x68 => op(Pla, Implied, 4),
        0x08 => op(Php, Implied, 3),
        0x28 => op(Plp, Implied, 4),

        // No operation
        0xea => op(Nop, Implied, 2),

        // Illegal NOP variants
        0x1a | 0x3a | 0x5a | 0x7a | 0xda | 0xfa => illegal(Nop, Implied, 2),
        0x80 | 0x82 | 0x89 | 0xc2 | 0xe2 => illegal(Nop, Immediate, 2),
        0x04 | 0x44 | 0x64 => illegal(Nop, ZeroPage, 3),
        0x14 | 0x34 | 0x54 | 0x74 | 0xd4 | 0xf4 => illegal(Nop, ZeroPageX, 4),
        0x0c => illegal(Nop, Absolute, 4),
        0x1c | 0x3c | 0x5c | 0x7c | 0xdc | 0xfc => illegal(Nop, AbsoluteX, 4),

        // LAX - Load A and X
        0xa7 => illegal(Lax, ZeroPage, 3),
        0xb7 => illegal(Lax, ZeroPageY, 4),
        0xaf => illegal(Lax, Absolute, 4),
        0xbf => illegal(Lax, AbsoluteY, 4),
        0xa3 => illegal(Lax, IndirectX, 6),
        0xb3 => illegal(Lax, IndirectY, 5),

        // SAX - Store A AND X
        0x87 => illegal(Sax, ZeroPage, 3),
        0x97 => illegal(Sax, ZeroPageY, 4),
        0x8f => illegal(Sax, Absolute, 4),
        0x83 => illegal(Sax, IndirectX, 6),

        0xeb => illegal(Sbc, Immediate, 2),

        // DCP - Decrement then Compare
        0xc7 => illegal(Dcp, ZeroPage, 5),
        0xd7 => illegal(Dcp, ZeroPageX, 6),
        0xcf => illegal(Dcp, Absolute, 6),
        0xdf => illegal(Dcp, AbsoluteX, 7),
        0xdb => illegal(Dcp, AbsoluteY, 7),
        0xc3 => illegal(Dcp, IndirectX, 8),
        0xd3 => illegal(Dcp, IndirectY, 8),

        // ISB - Increment then Subtract with Carry
        0xe7 => illegal(Isb, ZeroPage, 5),
        0xf7 => illegal(Isb, ZeroPageX, 6),
        0xef => illegal(Isb, Absolute, 6),
        0xff => illegal(Isb, AbsoluteX, 7),
        0xfb => illegal(Isb, AbsoluteY, 7),
        0xe3 => illegal(Isb, IndirectX, 8),
        0xf3 => illegal(Isb, IndirectY, 8),

        // SLO - Shift Left then OR
        0x07 => illegal(Slo, ZeroPage, 5),
        0x17 => illegal(Slo, ZeroPageX, 6),
        0x0f => illegal(Slo, Absolute, 6),
        0x1f => illegal(Slo, AbsoluteX, 7),
        0x1b => illegal(Slo, AbsoluteY, 7),
        0x03 => illegal(Slo, IndirectX, 8),
        0x13 => illegal(Slo, IndirectY, 8),

        // RLA - Rotate Left then AND
        0x27 => illegal(Rla, ZeroPage, 5),
        0x37 => illegal(Rla, ZeroPageX, 6),
        0x2f => illegal(Rla, Absolute, 6),
        0x3f => illegal(Rla, AbsoluteX, 7),
        0x3b => illegal(Rla, AbsoluteY, 7),
        0x23 => illegal(Rla, IndirectX, 8),
        0x33 => illegal(Rla, IndirectY, 8),

        // SRE - Shift Right then EOR
        0x47 => illegal(Sre, ZeroPage, 5),
        0x57 => illegal(Sre, ZeroPageX, 6),
        0x4f => illegal(Sre, Absolute, 6),
        0x5f => illegal(Sre, AbsoluteX, 7),
        0x5b => illegal(Sre, AbsoluteY, 7),
        0x43 => illegal(Sre, IndirectX, 8),
        0x53 => illegal(Sre, IndirectY, 8),

        // RRA - Rotate Right then Add with Carry
        0x67 => illegal(Rra, ZeroPage, 5),
        0x77 => illegal(Rra, ZeroPageX, 6),
        0x6f => illegal(Rra, Absolute, 6),
        0x7f => illegal(Rra, AbsoluteX, 7),
        0x7b => illegal(Rra, AbsoluteY, 7),
        0x63 => illegal(Rra, IndirectX, 8),
        0x73 => illegal(Rra, IndirectY, 8),

        // Immediate combinations
        0x0b | 0x2b => illegal(Anc, Immediate, 2),
        0x4b => illegal(Alr, Immediate, 2),
        0x6b => illegal(Arr, Immediate, 2),
        0xcb => illegal(Axs, Immediate, 2),

        // Unstable
        0x8b => illegal(Xaa, Immediate, 2),
        0xab => illegal(Lxa, Immediate, 2),
        0x93 => illegal(Ahx, IndirectY, 6),
        0x9f => illegal(Ahx, AbsoluteY, 5),
        0x9c => illegal(Shy, AbsoluteX, 5),
        0x9e => illegal(Shx, AbsoluteY, 5),
        0x9b => illegal(Tas, AbsoluteY, 5),
        0xbb => illegal(Las, AbsoluteY, 4),

        // 0x02, 0x12, ... 0xf2
        _ => illegal(Jam, Implied, 0),
    }
}

const fn build_table() -> [Opcode; 256] {
    let mut table = [decode(0x02); 256];
    let mut i = 0;
    while i < 256 {
        table[i] = decode(i as u8);
        i += 1;
    }
    table
}

/// オペコードからデコード情報を引くテーブル
pub static OPCODES: [Opcode; 256] = build_table();
