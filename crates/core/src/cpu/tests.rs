use super::*;
use crate::bus::FlatBus;
use crate::error::NesError;

fn cpu_with_program(program: &[u8]) -> Cpu<FlatBus> {
    let mut bus = FlatBus::new();
    bus.load(0x0600, program);
    bus.load(0xFFFC, &[0x00, 0x06]);
    let mut cpu = Cpu::new(bus);
    cpu.reset();
    cpu
}

fn assert_zero_negative(cpu: &Cpu<FlatBus>, value: u8) {
    assert_eq!(cpu.get_flag(Flag::Zero), value == 0, "Z for {:#04x}", value);
    assert_eq!(cpu.get_flag(Flag::Negative), value & 0x80 != 0, "N for {:#04x}", value);
}

/// 256通りの値で1命令を実行し、ZとNが結果バイトに従うことを確認する
fn sweep_zero_negative(
    program: &[u8],
    setup: impl Fn(&mut Cpu<FlatBus>, u8),
    result: impl Fn(&Cpu<FlatBus>, u8) -> u8,
) {
    let mut cpu = cpu_with_program(program);
    for v in 0..=255u8 {
        cpu.set_program_counter(0x0600);
        cpu.registers.sp = 0xFA;
        setup(&mut cpu, v);
        cpu.tick();

        let value = result(&cpu, v);
        assert_eq!(
            cpu.get_flag(Flag::Zero),
            value == 0,
            "Z: opcode {:#04x} input {:#04x}",
            program[0],
            v
        );
        assert_eq!(
            cpu.get_flag(Flag::Negative),
            value & 0x80 != 0,
            "N: opcode {:#04x} input {:#04x}",
            program[0],
            v
        );
    }
}

fn immediate(cpu: &mut Cpu<FlatBus>, v: u8) {
    cpu.bus_mut().load(0x0601, &[v]);
}

fn zero_page(cpu: &mut Cpu<FlatBus>, v: u8) {
    cpu.bus_mut().load(0x0010, &[v]);
}

fn zero_page_result(cpu: &Cpu<FlatBus>, _: u8) -> u8 {
    cpu.bus().peek_byte(0x0010)
}

fn accumulator_result(cpu: &Cpu<FlatBus>, _: u8) -> u8 {
    cpu.registers.a
}

#[test]
fn test_reset() {
    let mut bus = FlatBus::new();
    bus.load(0xFFFC, &[0x00, 0x80]);
    let mut cpu = Cpu::new(bus);
    cpu.set_flag(Flag::InterruptDisable, false);

    cpu.reset();
    assert_eq!(cpu.registers().pc, 0x8000);
    assert!(cpu.get_flag(Flag::InterruptDisable));
    assert_eq!(cpu.registers().sp, 0xFA);
    assert_eq!(cpu.cycles(), 7);

    cpu.reset();
    assert_eq!(cpu.registers().sp, 0xF7);
    assert_eq!(cpu.cycles(), 14);
}

#[test]
fn test_power_on_at() {
    let mut cpu = cpu_with_program(&[]);
    cpu.registers.a = 0x12;
    cpu.power_on_at(0xC000);
    let registers = cpu.registers();
    assert_eq!(registers.pc, 0xC000);
    assert_eq!(registers.sp, 0xFD);
    assert_eq!(registers.a, 0x00);
    assert_eq!(registers.p.bits(), 0x24);
    assert_eq!(cpu.cycles(), 7);
}

#[test]
fn test_adc_sbc_inverse() {
    let mut cpu = cpu_with_program(&[0x69, 0x00, 0xE9, 0x00]);
    for a in 0..=255u8 {
        for b in 0..=255u8 {
            for carry in [false, true] {
                cpu.bus_mut().load(0x0601, &[b]);
                cpu.bus_mut().load(0x0603, &[b]);
                cpu.set_program_counter(0x0600);
                cpu.registers.a = a;
                cpu.set_flag(Flag::Carry, carry);

                cpu.tick();
                cpu.set_flag(Flag::Carry, !carry);
                cpu.tick();

                assert_eq!(cpu.registers.a, a, "a={:#04x} b={:#04x} c={}", a, b, carry);
            }
        }
    }
}

#[test]
fn test_zero_and_negative_follow_result() {
    // LDA #v; TAX; INX; ASL A
    let mut cpu = cpu_with_program(&[]);
    for v in 0..=255u8 {
        cpu.bus_mut().load(0x0600, &[0xA9, v, 0xAA, 0xE8, 0x0A]);
        cpu.set_program_counter(0x0600);

        cpu.tick();
        assert_zero_negative(&cpu, cpu.registers.a);
        cpu.tick();
        assert_zero_negative(&cpu, cpu.registers.x);
        cpu.tick();
        assert_zero_negative(&cpu, cpu.registers.x);
        cpu.tick();
        assert_zero_negative(&cpu, cpu.registers.a);
    }
}

#[test]
fn test_zero_and_negative_for_logic() {
    // AND #v
    sweep_zero_negative(
        &[0x29, 0x00],
        |cpu, v| {
            immediate(cpu, v);
            cpu.registers.a = 0xCF;
        },
        accumulator_result,
    );
    // ORA #v
    sweep_zero_negative(
        &[0x09, 0x00],
        |cpu, v| {
            immediate(cpu, v);
            cpu.registers.a = 0x00;
        },
        accumulator_result,
    );
    // EOR #v
    sweep_zero_negative(
        &[0x49, 0x00],
        |cpu, v| {
            immediate(cpu, v);
            cpu.registers.a = 0x3C;
        },
        accumulator_result,
    );
}

#[test]
fn test_zero_and_negative_for_arithmetic() {
    // ADC #v
    sweep_zero_negative(
        &[0x69, 0x00],
        |cpu, v| {
            immediate(cpu, v);
            cpu.registers.a = 0x10;
            cpu.set_flag(Flag::Carry, false);
        },
        accumulator_result,
    );
    // SBC #v
    sweep_zero_negative(
        &[0xE9, 0x00],
        |cpu, v| {
            immediate(cpu, v);
            cpu.registers.a = 0x10;
            cpu.set_flag(Flag::Carry, true);
        },
        accumulator_result,
    );
}

#[test]
fn test_zero_and_negative_for_compares() {
    // CMP #v
    sweep_zero_negative(
        &[0xC9, 0x00],
        |cpu, v| {
            immediate(cpu, v);
            cpu.registers.a = 0x40;
        },
        |_, v| 0x40u8.wrapping_sub(v),
    );
    // CPX #v
    sweep_zero_negative(
        &[0xE0, 0x00],
        |cpu, v| {
            immediate(cpu, v);
            cpu.registers.x = 0x80;
        },
        |_, v| 0x80u8.wrapping_sub(v),
    );
    // CPY #v
    sweep_zero_negative(
        &[0xC0, 0x00],
        |cpu, v| {
            immediate(cpu, v);
            cpu.registers.y = 0x00;
        },
        |_, v| 0x00u8.wrapping_sub(v),
    );
}

#[test]
fn test_zero_and_negative_for_read_modify_write() {
    // INC $10
    sweep_zero_negative(&[0xE6, 0x10], zero_page, zero_page_result);
    // DEC $10
    sweep_zero_negative(&[0xC6, 0x10], zero_page, zero_page_result);
    // LSR $10
    sweep_zero_negative(&[0x46, 0x10], zero_page, zero_page_result);
    // ROR $10
    sweep_zero_negative(
        &[0x66, 0x10],
        |cpu, v| {
            zero_page(cpu, v);
            cpu.set_flag(Flag::Carry, true);
        },
        zero_page_result,
    );
    // ROL A
    sweep_zero_negative(
        &[0x2A],
        |cpu, v| {
            cpu.registers.a = v;
            cpu.set_flag(Flag::Carry, v & 0x01 != 0);
        },
        accumulator_result,
    );
}

#[test]
fn test_zero_and_negative_for_registers_and_stack() {
    // LDY #v
    sweep_zero_negative(&[0xA0, 0x00], immediate, |cpu, _| cpu.registers.y);
    // TXA
    sweep_zero_negative(&[0x8A], |cpu, v| cpu.registers.x = v, accumulator_result);
    // TYA
    sweep_zero_negative(&[0x98], |cpu, v| cpu.registers.y = v, accumulator_result);
    // DEX
    sweep_zero_negative(&[0xCA], |cpu, v| cpu.registers.x = v, |cpu, _| cpu.registers.x);
    // DEY
    sweep_zero_negative(&[0x88], |cpu, v| cpu.registers.y = v, |cpu, _| cpu.registers.y);
    // TSX
    sweep_zero_negative(&[0xBA], |cpu, v| cpu.registers.sp = v, |cpu, _| cpu.registers.x);
    // PLA
    sweep_zero_negative(
        &[0x68],
        |cpu, v| cpu.bus_mut().load(0x01FB, &[v]),
        accumulator_result,
    );
}

#[test]
fn test_adc_signed_overflow() {
    let mut cpu = cpu_with_program(&[0x69, 0x50]);
    cpu.registers.a = 0x50;
    cpu.set_flag(Flag::Carry, false);

    assert_eq!(cpu.tick(), 2);
    assert_eq!(cpu.registers.a, 0xA0);
    assert!(!cpu.get_flag(Flag::Carry));
    assert!(!cpu.get_flag(Flag::Zero));
    assert!(cpu.get_flag(Flag::Negative));
    assert!(cpu.get_flag(Flag::Overflow));
}

#[test]
fn test_decimal_flag_is_inert() {
    let mut cpu = cpu_with_program(&[0xF8, 0x69, 0x01]);
    cpu.registers.a = 0x09;
    cpu.set_flag(Flag::Carry, false);
    cpu.tick();
    cpu.tick();
    assert!(cpu.get_flag(Flag::Decimal));
    assert_eq!(cpu.registers.a, 0x0A);
}

#[test]
fn test_sbc_borrow() {
    let mut cpu = cpu_with_program(&[0xE9, 0x01]);
    cpu.registers.a = 0x00;
    cpu.set_flag(Flag::Carry, true);
    cpu.tick();
    assert_eq!(cpu.registers.a, 0xFF);
    assert!(!cpu.get_flag(Flag::Carry));
    assert!(cpu.get_flag(Flag::Negative));
}

#[test]
fn test_inx_wraps() {
    let mut cpu = cpu_with_program(&[0xE8]);
    cpu.registers.x = 0xFF;
    assert_eq!(cpu.tick(), 2);
    assert_eq!(cpu.registers.x, 0x00);
    assert!(cpu.get_flag(Flag::Zero));
    assert!(!cpu.get_flag(Flag::Negative));
}

#[test]
fn test_dec_memory_wraps() {
    let mut cpu = cpu_with_program(&[0xC6, 0x10]);
    assert_eq!(cpu.tick(), 5);
    assert_eq!(cpu.bus().peek_byte(0x0010), 0xFF);
    assert!(cpu.get_flag(Flag::Negative));
}

#[test]
fn test_lda_absolute_x_page_cross() {
    let mut cpu = cpu_with_program(&[0xBD, 0xFF, 0x30]);
    cpu.bus_mut().load(0x3100, &[0x42]);
    cpu.registers.x = 1;
    assert_eq!(cpu.tick(), 5);
    assert_eq!(cpu.registers.a, 0x42);
    assert_eq!(cpu.registers.pc, 0x0603);

    cpu.set_program_counter(0x0600);
    cpu.registers.x = 0;
    assert_eq!(cpu.tick(), 4);
}

#[test]
fn test_lda_indirect_y_page_cross() {
    let mut cpu = cpu_with_program(&[0xB1, 0x20]);
    cpu.bus_mut().load(0x0020, &[0xFF, 0x30]);
    cpu.bus_mut().load(0x3100, &[0x99]);
    cpu.registers.y = 1;
    assert_eq!(cpu.tick(), 6);
    assert_eq!(cpu.registers.a, 0x99);
}

#[test]
fn test_store_indexed_always_pays() {
    let mut cpu = cpu_with_program(&[0x9D, 0x00, 0x30, 0x9D, 0xFF, 0x30]);
    cpu.registers.a = 0x77;
    cpu.registers.x = 1;
    assert_eq!(cpu.tick(), 5);
    assert_eq!(cpu.tick(), 5);
    assert_eq!(cpu.bus().peek_byte(0x3001), 0x77);
    assert_eq!(cpu.bus().peek_byte(0x3100), 0x77);
}

#[test]
fn test_branch_cycles() {
    // BNE +$10
    let mut cpu = cpu_with_program(&[0xD0, 0x10]);
    cpu.set_flag(Flag::Zero, false);
    assert_eq!(cpu.tick(), 3);
    assert_eq!(cpu.registers.pc, 0x0612);

    cpu.set_program_counter(0x0600);
    cpu.set_flag(Flag::Zero, true);
    assert_eq!(cpu.tick(), 2);
    assert_eq!(cpu.registers.pc, 0x0602);

    cpu.bus_mut().load(0x06F0, &[0xD0, 0x20]);
    cpu.set_program_counter(0x06F0);
    cpu.set_flag(Flag::Zero, false);
    assert_eq!(cpu.tick(), 4);
    assert_eq!(cpu.registers.pc, 0x0712);
}

#[test]
fn test_branch_backwards() {
    let mut cpu = cpu_with_program(&[0xD0, 0xFC]);
    cpu.set_flag(Flag::Zero, false);
    assert_eq!(cpu.tick(), 4);
    assert_eq!(cpu.registers.pc, 0x05FE);
}

#[test]
fn test_jmp_indirect_page_wrap_bug() {
    let mut cpu = cpu_with_program(&[0x6C, 0xFF, 0x30]);
    cpu.bus_mut().load(0x30FF, &[0x80]);
    cpu.bus_mut().load(0x3000, &[0x50]);
    cpu.bus_mut().load(0x3100, &[0x60]);
    assert_eq!(cpu.tick(), 5);
    assert_eq!(cpu.registers.pc, 0x5080);
}

#[test]
fn test_jsr_rts() {
    let mut cpu = cpu_with_program(&[0x20, 0x34, 0x12]);
    cpu.bus_mut().load(0x1234, &[0x60]);

    assert_eq!(cpu.tick(), 6);
    assert_eq!(cpu.registers.pc, 0x1234);
    assert_eq!(cpu.registers.sp, 0xF8);
    // 戻りアドレスはJSRの最終バイト
    assert_eq!(cpu.bus().peek_byte(0x01FA), 0x06);
    assert_eq!(cpu.bus().peek_byte(0x01F9), 0x02);

    assert_eq!(cpu.tick(), 6);
    assert_eq!(cpu.registers.pc, 0x0603);
    assert_eq!(cpu.registers.sp, 0xFA);
}

#[test]
fn test_brk_rti() {
    let mut cpu = cpu_with_program(&[0x00, 0xEA]);
    cpu.bus_mut().load(0xFFFE, &[0x00, 0x07]);
    cpu.bus_mut().load(0x0700, &[0x40]);
    cpu.set_flag(Flag::InterruptDisable, false);
    cpu.set_flag(Flag::Carry, true);
    cpu.set_flag(Flag::Overflow, true);
    let before = cpu.registers();

    assert_eq!(cpu.tick(), 7);
    assert_eq!(cpu.registers.pc, 0x0700);
    assert!(cpu.get_flag(Flag::InterruptDisable));
    assert_eq!(cpu.bus().peek_byte(0x01FA), 0x06);
    assert_eq!(cpu.bus().peek_byte(0x01F9), 0x02);
    assert_eq!(cpu.bus().peek_byte(0x01F8), before.p.bits() | 0x10);

    assert_eq!(cpu.tick(), 6);
    let after = cpu.registers();
    assert_eq!(after.pc, 0x0602);
    assert_eq!(after.sp, before.sp);
    assert_eq!(after.p.bits() & !0x10, before.p.bits() & !0x10);
}

#[test]
fn test_php_forces_break() {
    let mut cpu = cpu_with_program(&[0x08]);
    assert_eq!(cpu.tick(), 3);
    assert_eq!(cpu.bus().peek_byte(0x01FA), 0x34);
    assert!(!cpu.get_flag(Flag::Break));
}

#[test]
fn test_plp_keeps_live_break() {
    let mut cpu = cpu_with_program(&[0x28]);
    cpu.bus_mut().load(0x01FB, &[0xD3]);
    assert_eq!(cpu.tick(), 4);
    assert_eq!(cpu.registers.p.bits(), 0xE3);
}

#[test]
fn test_pha_pla() {
    let mut cpu = cpu_with_program(&[0x48, 0xA9, 0x00, 0x68]);
    cpu.registers.a = 0x80;
    assert_eq!(cpu.tick(), 3);
    cpu.tick();
    assert!(cpu.get_flag(Flag::Zero));
    assert_eq!(cpu.tick(), 4);
    assert_eq!(cpu.registers.a, 0x80);
    assert!(cpu.get_flag(Flag::Negative));
    assert!(!cpu.get_flag(Flag::Zero));
}

#[test]
fn test_stack_pointer_wraps() {
    let mut cpu = cpu_with_program(&[0x48, 0x68]);
    cpu.registers.sp = 0x00;
    cpu.registers.a = 0x42;
    cpu.tick();
    assert_eq!(cpu.bus().peek_byte(0x0100), 0x42);
    assert_eq!(cpu.registers.sp, 0xFF);

    cpu.registers.a = 0;
    cpu.tick();
    assert_eq!(cpu.registers.sp, 0x00);
    assert_eq!(cpu.registers.a, 0x42);
}

#[test]
fn test_txs_does_not_touch_flags() {
    let mut cpu = cpu_with_program(&[0x9A]);
    cpu.registers.x = 0x00;
    cpu.set_flag(Flag::Zero, false);
    cpu.tick();
    assert_eq!(cpu.registers.sp, 0x00);
    assert!(!cpu.get_flag(Flag::Zero));
}

#[test]
fn test_bit_uses_bit_six() {
    let mut cpu = cpu_with_program(&[0x24, 0x10, 0x24, 0x11]);
    cpu.bus_mut().load(0x0010, &[0x40, 0x20]);
    cpu.registers.a = 0xFF;

    assert_eq!(cpu.tick(), 3);
    assert!(cpu.get_flag(Flag::Overflow));
    assert!(!cpu.get_flag(Flag::Negative));
    assert!(!cpu.get_flag(Flag::Zero));

    cpu.tick();
    assert!(!cpu.get_flag(Flag::Overflow));
    assert!(!cpu.get_flag(Flag::Zero));
}

#[test]
fn test_compare() {
    let mut cpu = cpu_with_program(&[0xC9, 0x20, 0xC9, 0x10, 0xE0, 0x01]);
    cpu.registers.a = 0x10;
    cpu.tick();
    assert!(!cpu.get_flag(Flag::Carry));
    assert!(!cpu.get_flag(Flag::Zero));
    assert!(cpu.get_flag(Flag::Negative));

    cpu.tick();
    assert!(cpu.get_flag(Flag::Carry));
    assert!(cpu.get_flag(Flag::Zero));
    assert!(!cpu.get_flag(Flag::Negative));

    cpu.registers.x = 0x00;
    cpu.tick();
    assert!(!cpu.get_flag(Flag::Carry));
    assert!(cpu.get_flag(Flag::Negative));
}

#[test]
fn test_rotates_shift_in_previous_carry() {
    let mut cpu = cpu_with_program(&[0x2A, 0x66, 0x10]);
    cpu.registers.a = 0x80;
    cpu.set_flag(Flag::Carry, true);
    assert_eq!(cpu.tick(), 2);
    assert_eq!(cpu.registers.a, 0x01);
    assert!(cpu.get_flag(Flag::Carry));

    cpu.bus_mut().load(0x0010, &[0x01]);
    cpu.set_flag(Flag::Carry, false);
    assert_eq!(cpu.tick(), 5);
    assert_eq!(cpu.bus().peek_byte(0x0010), 0x00);
    assert!(cpu.get_flag(Flag::Carry));
    assert!(cpu.get_flag(Flag::Zero));
}

#[test]
fn test_lsr_clears_negative() {
    let mut cpu = cpu_with_program(&[0x4A]);
    cpu.registers.a = 0xFF;
    cpu.set_flag(Flag::Negative, true);
    cpu.tick();
    assert_eq!(cpu.registers.a, 0x7F);
    assert!(cpu.get_flag(Flag::Carry));
    assert!(!cpu.get_flag(Flag::Negative));
}

#[test]
fn test_nmi() {
    let mut cpu = cpu_with_program(&[0xEA]);
    cpu.bus_mut().load(0xFFFA, &[0x00, 0x08]);
    cpu.nmi();

    // InterruptDisableが立っていてもNMIは処理される
    assert_eq!(cpu.tick(), 7);
    assert_eq!(cpu.registers.pc, 0x0800);
    assert_eq!(cpu.bus().peek_byte(0x01FA), 0x06);
    assert_eq!(cpu.bus().peek_byte(0x01F9), 0x00);
    assert_eq!(cpu.bus().peek_byte(0x01F8), 0x24);
    assert_eq!(cpu.cycles(), 14);
}

#[test]
fn test_irq_waits_for_cli() {
    let mut cpu = cpu_with_program(&[0xEA, 0x58, 0xEA]);
    cpu.bus_mut().load(0xFFFE, &[0x00, 0x09]);
    cpu.irq();

    assert_eq!(cpu.tick(), 2);
    assert_eq!(cpu.registers.pc, 0x0601);
    assert_eq!(cpu.tick(), 2);
    assert_eq!(cpu.tick(), 7);
    assert_eq!(cpu.registers.pc, 0x0900);
    assert_eq!(cpu.bus().peek_byte(0x01F8), 0x20);
    assert!(cpu.get_flag(Flag::InterruptDisable));
}

#[test]
fn test_clear_irq() {
    let mut cpu = cpu_with_program(&[0x58, 0xEA]);
    cpu.irq();
    cpu.clear_irq();
    cpu.tick();
    assert_eq!(cpu.tick(), 2);
    assert_eq!(cpu.registers.pc, 0x0602);
}

#[test]
fn test_nmi_before_irq() {
    let mut cpu = cpu_with_program(&[0xEA]);
    cpu.bus_mut().load(0xFFFA, &[0x00, 0x08]);
    cpu.bus_mut().load(0xFFFE, &[0x00, 0x09]);
    cpu.bus_mut().load(0x0800, &[0x58, 0xEA]);
    cpu.set_flag(Flag::InterruptDisable, false);
    cpu.nmi();
    cpu.irq();

    cpu.tick();
    assert_eq!(cpu.registers.pc, 0x0800);
    // NMIでIが立つのでIRQは保留のまま
    cpu.tick();
    assert_eq!(cpu.registers.pc, 0x0801);
    cpu.tick();
    assert_eq!(cpu.registers.pc, 0x0900);
}

#[test]
fn test_jam_reports_error_without_side_effects() {
    let mut cpu = cpu_with_program(&[0x02]);
    let before = cpu.registers();
    let cycles = cpu.cycles();

    match cpu.try_tick() {
        Err(NesError::IllegalOpcode { opcode, pc, registers }) => {
            assert_eq!(opcode, 0x02);
            assert_eq!(pc, 0x0600);
            assert_eq!(registers, before);
        }
        other => panic!("unexpected result: {:?}", other),
    }
    assert_eq!(cpu.registers(), before);
    assert_eq!(cpu.cycles(), cycles);
}

#[test]
#[should_panic(expected = "Illegal CPU instruction: 0x02 at 0x0600")]
fn test_tick_panics_on_jam() {
    let mut cpu = cpu_with_program(&[0x02]);
    cpu.tick();
}

#[test]
fn test_unstable_opcode_traps() {
    let mut cpu = cpu_with_program(&[0x8B, 0x00]);
    assert!(cpu.try_tick().is_err());
}

#[cfg(not(feature = "illegal-opcodes"))]
#[test]
fn test_documented_illegal_opcode_traps_without_feature() {
    let mut cpu = cpu_with_program(&[0xA7, 0x10]);
    assert!(matches!(
        cpu.try_tick(),
        Err(NesError::IllegalOpcode { opcode: 0xA7, .. })
    ));
}

#[cfg(feature = "illegal-opcodes")]
mod illegal {
    use super::*;

    #[test]
    fn test_zero_and_negative_for_composites() {
        // LAX $10
        sweep_zero_negative(&[0xA7, 0x10], zero_page, accumulator_result);
        // DCP $10: 比較の差分
        sweep_zero_negative(
            &[0xC7, 0x10],
            |cpu, v| {
                zero_page(cpu, v);
                cpu.registers.a = 0x40;
            },
            |_, v| 0x40u8.wrapping_sub(v.wrapping_sub(1)),
        );
        // ISB $10
        sweep_zero_negative(
            &[0xE7, 0x10],
            |cpu, v| {
                zero_page(cpu, v);
                cpu.registers.a = 0x10;
                cpu.set_flag(Flag::Carry, true);
            },
            accumulator_result,
        );
        // SLO $10
        sweep_zero_negative(
            &[0x07, 0x10],
            |cpu, v| {
                zero_page(cpu, v);
                cpu.registers.a = 0x00;
            },
            accumulator_result,
        );
        // RLA $10
        sweep_zero_negative(
            &[0x27, 0x10],
            |cpu, v| {
                zero_page(cpu, v);
                cpu.registers.a = 0xF3;
            },
            accumulator_result,
        );
        // SRE $10
        sweep_zero_negative(
            &[0x47, 0x10],
            |cpu, v| {
                zero_page(cpu, v);
                cpu.registers.a = 0x5A;
            },
            accumulator_result,
        );
        // RRA $10
        sweep_zero_negative(
            &[0x67, 0x10],
            |cpu, v| {
                zero_page(cpu, v);
                cpu.registers.a = 0x10;
                cpu.set_flag(Flag::Carry, false);
            },
            accumulator_result,
        );
    }

    #[test]
    fn test_lax() {
        let mut cpu = cpu_with_program(&[0xA7, 0x10]);
        cpu.bus_mut().load(0x0010, &[0x80]);
        assert_eq!(cpu.tick(), 3);
        assert_eq!(cpu.registers.a, 0x80);
        assert_eq!(cpu.registers.x, 0x80);
        assert!(cpu.get_flag(Flag::Negative));
    }

    #[test]
    fn test_lax_absolute_y_page_cross() {
        let mut cpu = cpu_with_program(&[0xBF, 0xFF, 0x30]);
        cpu.registers.y = 1;
        assert_eq!(cpu.tick(), 5);
    }

    #[test]
    fn test_sax() {
        let mut cpu = cpu_with_program(&[0x87, 0x10]);
        cpu.registers.a = 0xF0;
        cpu.registers.x = 0x3C;
        let p = cpu.registers.p;
        cpu.tick();
        assert_eq!(cpu.bus().peek_byte(0x0010), 0x30);
        assert_eq!(cpu.registers.p, p);
    }

    #[test]
    fn test_dcp() {
        let mut cpu = cpu_with_program(&[0xC7, 0x10]);
        cpu.bus_mut().load(0x0010, &[0x06]);
        cpu.registers.a = 0x05;
        assert_eq!(cpu.tick(), 5);
        assert_eq!(cpu.bus().peek_byte(0x0010), 0x05);
        assert!(cpu.get_flag(Flag::Zero));
        assert!(cpu.get_flag(Flag::Carry));
    }

    #[test]
    fn test_isb() {
        let mut cpu = cpu_with_program(&[0xE7, 0x10]);
        cpu.bus_mut().load(0x0010, &[0x04]);
        cpu.registers.a = 0x10;
        cpu.set_flag(Flag::Carry, true);
        cpu.tick();
        assert_eq!(cpu.bus().peek_byte(0x0010), 0x05);
        assert_eq!(cpu.registers.a, 0x0B);
        assert!(cpu.get_flag(Flag::Carry));
    }

    #[test]
    fn test_slo() {
        let mut cpu = cpu_with_program(&[0x07, 0x10]);
        cpu.bus_mut().load(0x0010, &[0x81]);
        cpu.registers.a = 0x01;
        cpu.tick();
        assert_eq!(cpu.bus().peek_byte(0x0010), 0x02);
        assert_eq!(cpu.registers.a, 0x03);
        assert!(cpu.get_flag(Flag::Carry));
    }

    #[test]
    fn test_rla() {
        let mut cpu = cpu_with_program(&[0x27, 0x10]);
        cpu.bus_mut().load(0x0010, &[0x81]);
        cpu.registers.a = 0xFF;
        cpu.set_flag(Flag::Carry, false);
        cpu.tick();
        assert_eq!(cpu.bus().peek_byte(0x0010), 0x02);
        assert_eq!(cpu.registers.a, 0x02);
        assert!(cpu.get_flag(Flag::Carry));
    }

    #[test]
    fn test_sre() {
        let mut cpu = cpu_with_program(&[0x47, 0x10]);
        cpu.bus_mut().load(0x0010, &[0x03]);
        cpu.registers.a = 0x01;
        cpu.tick();
        assert_eq!(cpu.bus().peek_byte(0x0010), 0x01);
        assert_eq!(cpu.registers.a, 0x00);
        assert!(cpu.get_flag(Flag::Zero));
        assert!(cpu.get_flag(Flag::Carry));
    }

    #[test]
    fn test_rra() {
        let mut cpu = cpu_with_program(&[0x67, 0x10]);
        cpu.bus_mut().load(0x0010, &[0x02]);
        cpu.registers.a = 0x10;
        cpu.set_flag(Flag::Carry, true);
        cpu.tick();
        assert_eq!(cpu.bus().peek_byte(0x0010), 0x81);
        assert_eq!(cpu.registers.a, 0x91);
        assert!(!cpu.get_flag(Flag::Carry));
    }

    #[test]
    fn test_nop_absolute_x_page_penalty() {
        let mut cpu = cpu_with_program(&[0x1C, 0xFF, 0x30, 0x1C, 0x00, 0x30]);
        cpu.registers.x = 1;
        let before = cpu.registers();
        assert_eq!(cpu.tick(), 5);
        assert_eq!(cpu.tick(), 4);
        let after = cpu.registers();
        assert_eq!(after.pc, 0x0606);
        assert_eq!(after.a, before.a);
        assert_eq!(after.p, before.p);
    }

    #[test]
    fn test_anc_alr_arr_axs() {
        let mut cpu = cpu_with_program(&[0x0B, 0x80, 0x4B, 0x03, 0x6B, 0x40, 0xCB, 0x10]);

        cpu.registers.a = 0xFF;
        cpu.tick();
        assert_eq!(cpu.registers.a, 0x80);
        assert!(cpu.get_flag(Flag::Carry));

        cpu.registers.a = 0xFF;
        cpu.tick();
        assert_eq!(cpu.registers.a, 0x01);
        assert!(cpu.get_flag(Flag::Carry));

        cpu.registers.a = 0xFF;
        cpu.set_flag(Flag::Carry, true);
        cpu.tick();
        assert_eq!(cpu.registers.a, 0xA0);
        assert!(!cpu.get_flag(Flag::Carry));
        assert!(cpu.get_flag(Flag::Overflow));
        assert!(cpu.get_flag(Flag::Negative));

        cpu.registers.a = 0xF0;
        cpu.registers.x = 0x3C;
        cpu.tick();
        assert_eq!(cpu.registers.x, 0x20);
        assert!(cpu.get_flag(Flag::Carry));
    }

    #[test]
    fn test_sbc_alias() {
        let mut cpu = cpu_with_program(&[0xEB, 0x01]);
        cpu.registers.a = 0x05;
        cpu.set_flag(Flag::Carry, true);
        assert_eq!(cpu.tick(), 2);
        assert_eq!(cpu.registers.a, 0x04);
    }
}
