//! 命令ごとの実装

use super::addressing::Operand;
use super::interrupt::Interrupt;
use super::opcodes::Instruction;
use super::registers::{Flag, Flags};
use super::Cpu;
use crate::bus::Bus;

impl<B: Bus> Cpu<B> {
    /// 命令を実行し、基本サイクル数に加算するサイクル数を返す
    ///
    /// PCは呼び出し前に命令長ぶん進められている。
    pub(super) fn execute(&mut self, instruction: Instruction, operand: Operand, page_crossed: bool) -> u8 {
        use Instruction::*;

        match instruction {
            // Branches
            Bpl => return self.branch(!self.get_flag(Flag::Negative), operand, page_crossed),
            Bmi => return self.branch(self.get_flag(Flag::Negative), operand, page_crossed),
            Bvc => return self.branch(!self.get_flag(Flag::Overflow), operand, page_crossed),
            Bvs => return self.branch(self.get_flag(Flag::Overflow), operand, page_crossed),
            Bcc => return self.branch(!self.get_flag(Flag::Carry), operand, page_crossed),
            Bcs => return self.branch(self.get_flag(Flag::Carry), operand, page_crossed),
            Bne => return self.branch(!self.get_flag(Flag::Zero), operand, page_crossed),
            Beq => return self.branch(self.get_flag(Flag::Zero), operand, page_crossed),

            // Loads
            Lda => self.lda(operand),
            Ldx => self.ldx(operand),
            Ldy => self.ldy(operand),

            // Stores
            Sta => self.store(operand, self.registers.a),
            Stx => self.store(operand, self.registers.x),
            Sty => self.store(operand, self.registers.y),

            // Arithmetic
            Adc => self.adc(operand),
            Sbc => self.sbc(operand),

            // Comparisons
            Cmp => self.compare(self.registers.a, operand),
            Cpx => self.compare(self.registers.x, operand),
            Cpy => self.compare(self.registers.y, operand),

            // Bitwise operations
            And => self.and(operand),
            Ora => self.ora(operand),
            Eor => self.eor(operand),
            Bit => self.bit(operand),

            // Shifts and rotates
            Asl => {
                self.asl(operand);
            }
            Lsr => {
                self.lsr(operand);
            }
            Rol => {
                self.rol(operand);
            }
            Ror => {
                self.ror(operand);
            }

            // Increments and decrements
            Inc => {
                self.inc(operand);
            }
            Dec => {
                self.dec(operand);
            }
            Inx => self.inx(),
            Dex => self.dex(),
            Iny => self.iny(),
            Dey => self.dey(),

            // Register moves
            Tax => self.tax(),
            Tay => self.tay(),
            Txa => self.txa(),
            Tya => self.tya(),
            Txs => self.txs(),
            Tsx => self.tsx(),

            // Flag operations
            Clc => self.set_flag(Flag::Carry, false),
            Sec => self.set_flag(Flag::Carry, true),
            Cli => self.set_flag(Flag::InterruptDisable, false),
            Sei => self.set_flag(Flag::InterruptDisable, true),
            Clv => self.set_flag(Flag::Overflow, false),
            Cld => self.set_flag(Flag::Decimal, false),
            Sed => self.set_flag(Flag::Decimal, true),

            // Jumps
            Jmp => self.jmp(operand),

            // Procedure calls
            Jsr => self.jsr(operand),
            Rts => self.rts(),
            Brk => self.brk(),
            Rti => self.rti(),

            // Stack operations
            Pha => self.pha(),
            Pla => self.pla(),
            Php => self.php(),
            Plp => self.plp(),

            // オペランドの読み込みだけ行う（ページ跨ぎのペナルティは共通処理）
            Nop => {}

            // Illegal opcodes
            Lax => self.lax(operand),
            Sax => self.store(operand, self.registers.a & self.registers.x),
            Dcp => self.dcp(operand),
            Isb => self.isb(operand),
            Slo => self.slo(operand),
            Rla => self.rla(operand),
            Sre => self.sre(operand),
            Rra => self.rra(operand),
            Anc => self.anc(operand),
            Alr => self.alr(operand),
            Arr => self.arr(operand),
            Axs => self.axs(operand),

            Ahx | Las | Lxa | Shx | Shy | Tas | Xaa | Jam => {
                unreachable!("trapping instruction {:?} reached the executor", instruction)
            }
        }

        if page_crossed && instruction.pays_page_penalty() {
            1
        } else {
            0
        }
    }

    fn operand_address(&self, operand: Operand) -> u16 {
        match operand {
            Operand::Address(address) => address,
            _ => panic!("{:?} has no memory address", operand),
        }
    }

    fn read_operand(&mut self, operand: Operand) -> u8 {
        match operand {
            Operand::Address(address) => self.bus.read_byte(address),
            Operand::Accumulator => self.registers.a,
            Operand::Implied => panic!("Operand::Implied should never be used to read a value"),
        }
    }

    fn write_operand(&mut self, operand: Operand, value: u8) {
        match operand {
            Operand::Address(address) => self.bus.write_byte(address, value),
            Operand::Accumulator => self.registers.a = value,
            Operand::Implied => panic!("Operand::Implied should never be used to write a value"),
        }
    }

    fn lda(&mut self, operand: Operand) {
        let value = self.read_operand(operand);
        self.set_flags_zero_negative(value);
        self.registers.a = value;
    }

    fn ldx(&mut self, operand: Operand) {
        let value = self.read_operand(operand);
        self.set_flags_zero_negative(value);
        self.registers.x = value;
    }

    fn ldy(&mut self, operand: Operand) {
        let value = self.read_operand(operand);
        self.set_flags_zero_negative(value);
        self.registers.y = value;
    }

    fn store(&mut self, operand: Operand, value: u8) {
        let address = self.operand_address(operand);
        self.bus.write_byte(address, value);
    }

    fn add_with_carry(&mut self, operand: u8) {
        let a = self.registers.a;
        let result = a as u16 + operand as u16 + self.carry() as u16;
        self.set_flags_carry_overflow(a, operand, result);
        self.set_flags_zero_negative(result as u8);
        self.registers.a = result as u8;
    }

    fn adc(&mut self, operand: Operand) {
        let value = self.read_operand(operand);
        self.add_with_carry(value);
    }

    // A + !M + C == A - M - (1 - C)
    fn sbc(&mut self, operand: Operand) {
        let value = self.read_operand(operand);
        self.add_with_carry(!value);
    }

    fn compare(&mut self, register: u8, operand: Operand) {
        let value = self.read_operand(operand);
        self.compare_value(register, value);
    }

    fn compare_value(&mut self, register: u8, value: u8) {
        self.set_flags_zero_negative(register.wrapping_sub(value));
        self.set_flag(Flag::Carry, register >= value);
    }

    fn and(&mut self, operand: Operand) {
        let value = self.read_operand(operand);
        self.and_value(value);
    }

    fn and_value(&mut self, value: u8) {
        let result = self.registers.a & value;
        self.set_flags_zero_negative(result);
        self.registers.a = result;
    }

    fn ora(&mut self, operand: Operand) {
        let value = self.read_operand(operand);
        self.ora_value(value);
    }

    fn ora_value(&mut self, value: u8) {
        let result = self.registers.a | value;
        self.set_flags_zero_negative(result);
        self.registers.a = result;
    }

    fn eor(&mut self, operand: Operand) {
        let value = self.read_operand(operand);
        self.eor_value(value);
    }

    fn eor_value(&mut self, value: u8) {
        let result = self.registers.a ^ value;
        self.set_flags_zero_negative(result);
        self.registers.a = result;
    }

    fn bit(&mut self, operand: Operand) {
        let value = self.read_operand(operand);
        self.set_flag(Flag::Zero, self.registers.a & value == 0);
        self.set_flag(Flag::Overflow, value & 0b0100_0000 != 0);
        self.set_flag(Flag::Negative, value & 0b1000_0000 != 0);
    }

    fn asl(&mut self, operand: Operand) -> u8 {
        let value = self.read_operand(operand);
        let result = value << 1;
        self.set_flag(Flag::Carry, value & 0b1000_0000 != 0);
        self.set_flags_zero_negative(result);
        self.write_operand(operand, result);
        result
    }

    fn lsr(&mut self, operand: Operand) -> u8 {
        let value = self.read_operand(operand);
        let result = value >> 1;
        self.set_flag(Flag::Carry, value & 0b0000_0001 != 0);
        self.set_flags_zero_negative(result);
        self.write_operand(operand, result);
        result
    }

    fn rol(&mut self, operand: Operand) -> u8 {
        let value = self.read_operand(operand);
        let result = (value << 1) | self.carry();
        self.set_flag(Flag::Carry, value & 0b1000_0000 != 0);
        self.set_flags_zero_negative(result);
        self.write_operand(operand, result);
        result
    }

    fn ror(&mut self, operand: Operand) -> u8 {
        let value = self.read_operand(operand);
        let result = (value >> 1) | (self.carry() << 7);
        self.set_flag(Flag::Carry, value & 0b0000_0001 != 0);
        self.set_flags_zero_negative(result);
        self.write_operand(operand, result);
        result
    }

    fn inc(&mut self, operand: Operand) -> u8 {
        let result = self.read_operand(operand).wrapping_add(1);
        self.set_flags_zero_negative(result);
        self.write_operand(operand, result);
        result
    }

    fn dec(&mut self, operand: Operand) -> u8 {
        let result = self.read_operand(operand).wrapping_sub(1);
        self.set_flags_zero_negative(result);
        self.write_operand(operand, result);
        result
    }

    fn inx(&mut self) {
        let result = self.registers.x.wrapping_add(1);
        self.set_flags_zero_negative(result);
        self.registers.x = result;
    }

    fn dex(&mut self) {
        let result = self.registers.x.wrapping_sub(1);
        self.set_flags_zero_negative(result);
        self.registers.x = result;
    }

    fn iny(&mut self) {
        let result = self.registers.y.wrapping_add(1);
        self.set_flags_zero_negative(result);
        self.registers.y = result;
    }

    fn dey(&mut self) {
        let result = self.registers.y.wrapping_sub(1);
        self.set_flags_zero_negative(result);
        self.registers.y = result;
    }

    fn tax(&mut self) {
        let result = self.registers.a;
        self.set_flags_zero_negative(result);
        self.registers.x = result;
    }

    fn tay(&mut self) {
        let result = self.registers.a;
        self.set_flags_zero_negative(result);
        self.registers.y = result;
    }

    fn txa(&mut self) {
        let result = self.registers.x;
        self.set_flags_zero_negative(result);
        self.registers.a = result;
    }

    fn tya(&mut self) {
        let result = self.registers.y;
        self.set_flags_zero_negative(result);
        self.registers.a = result;
    }

    fn txs(&mut self) {
        self.registers.sp = self.registers.x;
    }

    fn tsx(&mut self) {
        let result = self.registers.sp;
        self.set_flags_zero_negative(result);
        self.registers.x = result;
    }

    fn branch(&mut self, condition: bool, operand: Operand, page_crossed: bool) -> u8 {
        if !condition {
            return 0;
        }
        self.registers.pc = self.operand_address(operand);
        if page_crossed {
            2
        } else {
            1
        }
    }

    fn jmp(&mut self, operand: Operand) {
        self.registers.pc = self.operand_address(operand);
    }

    // 戻りアドレスはJSR命令の最終バイトを指す
    fn jsr(&mut self, operand: Operand) {
        let target_address = self.operand_address(operand);
        let return_address = self.registers.pc.wrapping_sub(1);
        self.push_word(return_address);
        self.registers.pc = target_address;
    }

    fn rts(&mut self) {
        self.registers.pc = self.pop_word().wrapping_add(1);
    }

    fn brk(&mut self) {
        self.interrupt(Interrupt::Break);
    }

    fn rti(&mut self) {
        let status = self.pop_byte();
        self.restore_status(status);
        self.registers.pc = self.pop_word();
    }

    fn pha(&mut self) {
        let a = self.registers.a;
        self.push_byte(a);
    }

    fn pla(&mut self) {
        let result = self.pop_byte();
        self.set_flags_zero_negative(result);
        self.registers.a = result;
    }

    fn php(&mut self) {
        let p = self.registers.p.bits() | Flag::Break as u8;
        self.push_byte(p);
    }

    fn plp(&mut self) {
        let status = self.pop_byte();
        self.restore_status(status);
    }

    // スタック上のBreakビットは実在するラッチではないので、現在の値を残す
    fn restore_status(&mut self, status: u8) {
        let live_break = self.get_flag(Flag::Break);
        self.registers.p = Flags::from_bits(status);
        self.set_flag(Flag::Break, live_break);
    }

    // LAX - Load A and X
    fn lax(&mut self, operand: Operand) {
        let value = self.read_operand(operand);
        self.set_flags_zero_negative(value);
        self.registers.a = value;
        self.registers.x = value;
    }

    // DCP - Decrement then Compare
    fn dcp(&mut self, operand: Operand) {
        let result = self.dec(operand);
        self.compare_value(self.registers.a, result);
    }

    // ISB - Increment then Subtract with Carry
    fn isb(&mut self, operand: Operand) {
        let result = self.inc(operand);
        self.add_with_carry(!result);
    }

    // SLO - Shift Left then OR
    fn slo(&mut self, operand: Operand) {
        let result = self.asl(operand);
        self.ora_value(result);
    }

    // RLA - Rotate Left then AND
    fn rla(&mut self, operand: Operand) {
        let result = self.rol(operand);
        self.and_value(result);
    }

    // SRE - Shift Right then EOR
    fn sre(&mut self, operand: Operand) {
        let result = self.lsr(operand);
        self.eor_value(result);
    }

    // RRA - Rotate Right then Add with Carry
    fn rra(&mut self, operand: Operand) {
        let result = self.ror(operand);
        self.add_with_carry(result);
    }

    // ANC - AND, then copy N into C
    fn anc(&mut self, operand: Operand) {
        self.and(operand);
        let negative = self.get_flag(Flag::Negative);
        self.set_flag(Flag::Carry, negative);
    }

    // ALR - AND then LSR A
    fn alr(&mut self, operand: Operand) {
        self.and(operand);
        self.lsr(Operand::Accumulator);
    }

    // ARR - AND then ROR A, with C and V taken from bits 6 and 5
    fn arr(&mut self, operand: Operand) {
        self.and(operand);
        let result = self.ror(Operand::Accumulator);
        let bit6 = result & 0b0100_0000 != 0;
        let bit5 = result & 0b0010_0000 != 0;
        self.set_flag(Flag::Carry, bit6);
        self.set_flag(Flag::Overflow, bit6 ^ bit5);
    }

    // AXS - X = (A & X) - M, without borrow
    fn axs(&mut self, operand: Operand) {
        let value = self.read_operand(operand);
        let ax = self.registers.a & self.registers.x;
        let result = ax.wrapping_sub(value);
        self.set_flag(Flag::Carry, ax >= value);
        self.set_flags_zero_negative(result);
        self.registers.x = result;
    }
}
