use super::*;

#[path = "addressing_tests.rs"]
mod addressing_mode_tests;

struct TestBus {
    memory: [u8; 0x10000],
}

impl TestBus {
    fn new() -> Self {
        TestBus { memory: [0; 0x10000] }
    }

    fn load_program(&mut self, program: &[u8], start: u16) {
        let base = start as usize;
        self.memory[base..base + program.len()].copy_from_slice(program);
    }
}

impl CpuBus for TestBus {
    fn read(&mut self, addr: u16) -> u8 {
        self.memory[addr as usize]
    }

    fn write(&mut self, addr: u16, data: u8) {
        self.memory[addr as usize] = data;
    }
}

/// A freshly reset CPU whose reset vector points at $8000.
fn boot_cpu() -> (Cpu, TestBus) {
    let mut cpu = Cpu::new();
    let mut bus = TestBus::new();
    bus.write(0xFFFC, 0x00);
    bus.write(0xFFFD, 0x80);
    cpu.reset(&mut bus);
    (cpu, bus)
}

fn step_cycles(cpu: &mut Cpu, bus: &mut TestBus) -> u8 {
    match cpu.step(bus) {
        StepResult::Executed(cycles) => cycles,
        StepResult::Halted(reason) => panic!("unexpected halt: {:?}", reason),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reset_reads_vector_and_clears_state() {
        let (mut cpu, mut bus) = boot_cpu();
        cpu.a = 0x12;
        cpu.x = 0x34;
        cpu.y = 0x56;
        cpu.sp = 0x10;
        cpu.status = StatusFlags::from_bits_truncate(0xFF);

        bus.write(0xFFFC, 0x34);
        bus.write(0xFFFD, 0x12);
        cpu.reset(&mut bus);

        assert_eq!(cpu.pc, 0x1234);
        assert_eq!(cpu.a, 0x00);
        assert_eq!(cpu.x, 0x00);
        assert_eq!(cpu.y, 0x00);
        assert_eq!(cpu.sp, 0xFD);
        assert_eq!(cpu.status.bits(), 0x24);
        assert_eq!(cpu.cycles, 7);
    }

    #[test]
    fn test_lda_immediate() {
        let (mut cpu, mut bus) = boot_cpu();

        // LDA #$42
        bus.load_program(&[0xA9, 0x42], 0x8000);

        let cycles = step_cycles(&mut cpu, &mut bus);

        assert_eq!(cpu.a, 0x42);
        assert_eq!(cpu.pc, 0x8002);
        assert_eq!(cycles, 2);
        assert!(!cpu.status.contains(StatusFlags::ZERO));
        assert!(!cpu.status.contains(StatusFlags::NEGATIVE));
    }

    #[test]
    fn test_zero_negative_track_every_value() {
        // LDA #v for all 256 values: Z iff v == 0, N iff bit 7 is set
        for value in 0..=255u8 {
            let (mut cpu, mut bus) = boot_cpu();

            bus.load_program(&[0xA9, value], 0x8000);

            cpu.step(&mut bus);

            assert_eq!(
                cpu.status.contains(StatusFlags::ZERO),
                value == 0,
                "zero flag for {:02X}",
                value
            );
            assert_eq!(
                cpu.status.contains(StatusFlags::NEGATIVE),
                value & 0x80 != 0,
                "negative flag for {:02X}",
                value
            );
        }
    }

    #[test]
    fn test_sta_zero_page() {
        let (mut cpu, mut bus) = boot_cpu();

        cpu.a = 0x42;
        // STA $10
        bus.load_program(&[0x85, 0x10], 0x8000);

        let cycles = step_cycles(&mut cpu, &mut bus);

        assert_eq!(bus.read(0x0010), 0x42);
        assert_eq!(cpu.pc, 0x8002);
        assert_eq!(cycles, 3);
    }

    #[test]
    fn test_ldx_ldy_stx_sty() {
        let (mut cpu, mut bus) = boot_cpu();

        // LDX #$10, LDY #$20, STX $30, STY $31
        bus.load_program(&[0xA2, 0x10, 0xA0, 0x20, 0x86, 0x30, 0x84, 0x31], 0x8000);

        cpu.step(&mut bus);
        assert_eq!(cpu.x, 0x10);

        cpu.step(&mut bus);
        assert_eq!(cpu.y, 0x20);

        cpu.step(&mut bus);
        assert_eq!(bus.read(0x0030), 0x10);

        cpu.step(&mut bus);
        assert_eq!(bus.read(0x0031), 0x20);
    }

    #[test]
    fn test_adc_immediate() {
        let (mut cpu, mut bus) = boot_cpu();

        cpu.a = 0x10;
        // ADC #$20
        bus.load_program(&[0x69, 0x20], 0x8000);

        cpu.step(&mut bus);

        assert_eq!(cpu.a, 0x30);
        assert!(!cpu.status.contains(StatusFlags::CARRY));
        assert!(!cpu.status.contains(StatusFlags::OVERFLOW));
    }

    #[test]
    fn test_adc_sets_carry_and_zero() {
        let (mut cpu, mut bus) = boot_cpu();

        cpu.a = 0xFF;
        // ADC #$01 with carry clear: wraps to zero
        bus.load_program(&[0x69, 0x01], 0x8000);

        cpu.step(&mut bus);

        assert_eq!(cpu.a, 0x00);
        assert!(cpu.status.contains(StatusFlags::CARRY));
        assert!(cpu.status.contains(StatusFlags::ZERO));
        assert!(!cpu.status.contains(StatusFlags::OVERFLOW));
        assert!(!cpu.status.contains(StatusFlags::NEGATIVE));
    }

    #[test]
    fn test_adc_uses_incoming_carry() {
        let (mut cpu, mut bus) = boot_cpu();

        cpu.a = 0x10;
        cpu.status.insert(StatusFlags::CARRY);
        // ADC #$20
        bus.load_program(&[0x69, 0x20], 0x8000);

        cpu.step(&mut bus);

        assert_eq!(cpu.a, 0x31);
    }

    #[test]
    fn test_adc_signed_overflow() {
        let (mut cpu, mut bus) = boot_cpu();

        cpu.a = 0x50;
        // ADC #$50: two positives produce a negative
        bus.load_program(&[0x69, 0x50], 0x8000);

        cpu.step(&mut bus);

        assert_eq!(cpu.a, 0xA0);
        assert!(cpu.status.contains(StatusFlags::OVERFLOW));
        assert!(cpu.status.contains(StatusFlags::NEGATIVE));
        assert!(!cpu.status.contains(StatusFlags::CARRY));
    }

    #[test]
    fn test_sbc_borrows_through_zero() {
        let (mut cpu, mut bus) = boot_cpu();

        cpu.a = 0x00;
        cpu.status.insert(StatusFlags::CARRY);
        // SBC #$01: 0 - 1 underflows
        bus.load_program(&[0xE9, 0x01], 0x8000);

        cpu.step(&mut bus);

        assert_eq!(cpu.a, 0xFF);
        assert!(!cpu.status.contains(StatusFlags::CARRY));
        assert!(cpu.status.contains(StatusFlags::NEGATIVE));
        assert!(!cpu.status.contains(StatusFlags::OVERFLOW));
    }

    #[test]
    fn test_sbc_without_borrow() {
        let (mut cpu, mut bus) = boot_cpu();

        cpu.a = 0x10;
        cpu.status.insert(StatusFlags::CARRY);
        // SBC #$05
        bus.load_program(&[0xE9, 0x05], 0x8000);

        cpu.step(&mut bus);

        assert_eq!(cpu.a, 0x0B);
        assert!(cpu.status.contains(StatusFlags::CARRY));
    }

    #[test]
    fn test_sbc_with_borrow_in() {
        let (mut cpu, mut bus) = boot_cpu();

        cpu.a = 0x10;
        // Carry clear: an extra one is subtracted
        bus.load_program(&[0xE9, 0x05], 0x8000);

        cpu.step(&mut bus);

        assert_eq!(cpu.a, 0x0A);
        assert!(cpu.status.contains(StatusFlags::CARRY));
    }

    #[test]
    fn test_and_ora_eor() {
        let (mut cpu, mut bus) = boot_cpu();

        cpu.a = 0b1100_1100;
        // AND #$F0, ORA #$03, EOR #$FF
        bus.load_program(&[0x29, 0xF0, 0x09, 0x03, 0x49, 0xFF], 0x8000);

        cpu.step(&mut bus);
        assert_eq!(cpu.a, 0b1100_0000);
        assert!(cpu.status.contains(StatusFlags::NEGATIVE));

        cpu.step(&mut bus);
        assert_eq!(cpu.a, 0b1100_0011);

        cpu.step(&mut bus);
        assert_eq!(cpu.a, 0b0011_1100);
        assert!(!cpu.status.contains(StatusFlags::NEGATIVE));
    }

    #[test]
    fn test_bit_reads_flags_from_memory() {
        let (mut cpu, mut bus) = boot_cpu();

        cpu.a = 0x0F;
        bus.write(0x0010, 0xC0);
        // BIT $10
        bus.load_program(&[0x24, 0x10], 0x8000);

        cpu.step(&mut bus);

        // A is untouched; Z from the mask, N and V from bits 7 and 6
        assert_eq!(cpu.a, 0x0F);
        assert!(cpu.status.contains(StatusFlags::ZERO));
        assert!(cpu.status.contains(StatusFlags::NEGATIVE));
        assert!(cpu.status.contains(StatusFlags::OVERFLOW));
    }

    #[test]
    fn test_cmp_sets_flags() {
        let (mut cpu, mut bus) = boot_cpu();

        cpu.a = 0x42;
        // CMP #$42 (equal), CMP #$50 (less), CMP #$20 (greater)
        bus.load_program(&[0xC9, 0x42, 0xC9, 0x50, 0xC9, 0x20], 0x8000);

        cpu.step(&mut bus);
        assert!(cpu.status.contains(StatusFlags::CARRY));
        assert!(cpu.status.contains(StatusFlags::ZERO));

        cpu.step(&mut bus);
        assert!(!cpu.status.contains(StatusFlags::CARRY));
        assert!(!cpu.status.contains(StatusFlags::ZERO));
        assert!(cpu.status.contains(StatusFlags::NEGATIVE));

        cpu.step(&mut bus);
        assert!(cpu.status.contains(StatusFlags::CARRY));
        assert!(!cpu.status.contains(StatusFlags::ZERO));
        assert!(!cpu.status.contains(StatusFlags::NEGATIVE));
    }

    #[test]
    fn test_cpx_cpy() {
        let (mut cpu, mut bus) = boot_cpu();

        cpu.x = 0x10;
        cpu.y = 0x20;
        // CPX #$10, CPY #$30
        bus.load_program(&[0xE0, 0x10, 0xC0, 0x30], 0x8000);

        cpu.step(&mut bus);
        assert!(cpu.status.contains(StatusFlags::ZERO));
        assert!(cpu.status.contains(StatusFlags::CARRY));

        cpu.step(&mut bus);
        assert!(!cpu.status.contains(StatusFlags::ZERO));
        assert!(!cpu.status.contains(StatusFlags::CARRY));
    }

    #[test]
    fn test_asl_accumulator_carry_from_bit7() {
        let (mut cpu, mut bus) = boot_cpu();

        cpu.a = 0x80;
        // ASL A: the bit shifted out lands in carry
        bus.load_program(&[0x0A], 0x8000);

        let cycles = step_cycles(&mut cpu, &mut bus);

        assert_eq!(cpu.a, 0x00);
        assert_eq!(cycles, 2);
        assert!(cpu.status.contains(StatusFlags::CARRY));
        assert!(cpu.status.contains(StatusFlags::ZERO));
    }

    #[test]
    fn test_asl_memory() {
        let (mut cpu, mut bus) = boot_cpu();

        bus.write(0x0010, 0x41);
        // ASL $10
        bus.load_program(&[0x06, 0x10], 0x8000);

        cpu.step(&mut bus);

        assert_eq!(bus.read(0x0010), 0x82);
        assert!(!cpu.status.contains(StatusFlags::CARRY));
        assert!(cpu.status.contains(StatusFlags::NEGATIVE));
    }

    #[test]
    fn test_lsr_carry_from_bit0() {
        let (mut cpu, mut bus) = boot_cpu();

        cpu.a = 0x01;
        // LSR A
        bus.load_program(&[0x4A], 0x8000);

        cpu.step(&mut bus);

        assert_eq!(cpu.a, 0x00);
        assert!(cpu.status.contains(StatusFlags::CARRY));
        assert!(cpu.status.contains(StatusFlags::ZERO));
    }

    #[test]
    fn test_rol_shifts_carry_in() {
        let (mut cpu, mut bus) = boot_cpu();

        cpu.a = 0x80;
        cpu.status.insert(StatusFlags::CARRY);
        // ROL A: old carry enters bit 0, old bit 7 becomes carry
        bus.load_program(&[0x2A], 0x8000);

        cpu.step(&mut bus);

        assert_eq!(cpu.a, 0x01);
        assert!(cpu.status.contains(StatusFlags::CARRY));
    }

    #[test]
    fn test_ror_shifts_carry_in() {
        let (mut cpu, mut bus) = boot_cpu();

        cpu.a = 0x01;
        cpu.status.insert(StatusFlags::CARRY);
        // ROR A: old carry enters bit 7, old bit 0 becomes carry
        bus.load_program(&[0x6A], 0x8000);

        cpu.step(&mut bus);

        assert_eq!(cpu.a, 0x80);
        assert!(cpu.status.contains(StatusFlags::CARRY));
        assert!(cpu.status.contains(StatusFlags::NEGATIVE));
    }

    #[test]
    fn test_inc_dec_memory_wraparound() {
        let (mut cpu, mut bus) = boot_cpu();

        bus.write(0x0010, 0xFF);
        bus.write(0x0011, 0x00);
        // INC $10, DEC $11
        bus.load_program(&[0xE6, 0x10, 0xC6, 0x11], 0x8000);

        cpu.step(&mut bus);
        assert_eq!(bus.read(0x0010), 0x00);
        assert!(cpu.status.contains(StatusFlags::ZERO));

        cpu.step(&mut bus);
        assert_eq!(bus.read(0x0011), 0xFF);
        assert!(cpu.status.contains(StatusFlags::NEGATIVE));
    }

    #[test]
    fn test_inx_wraparound() {
        let (mut cpu, mut bus) = boot_cpu();

        cpu.x = 0xFF;
        // INX
        bus.load_program(&[0xE8], 0x8000);

        cpu.step(&mut bus);

        assert_eq!(cpu.x, 0x00);
        assert!(cpu.status.contains(StatusFlags::ZERO));
    }

    #[test]
    fn test_dex_dey() {
        let (mut cpu, mut bus) = boot_cpu();

        cpu.x = 0x01;
        cpu.y = 0x00;
        // DEX, DEY
        bus.load_program(&[0xCA, 0x88], 0x8000);

        cpu.step(&mut bus);
        assert_eq!(cpu.x, 0x00);
        assert!(cpu.status.contains(StatusFlags::ZERO));

        cpu.step(&mut bus);
        assert_eq!(cpu.y, 0xFF);
        assert!(cpu.status.contains(StatusFlags::NEGATIVE));
    }

    #[test]
    fn test_bne_taken_backwards() {
        let (mut cpu, mut bus) = boot_cpu();

        cpu.status.remove(StatusFlags::ZERO);
        // BNE -11 ($F5)
        bus.load_program(&[0xD0, 0xF5], 0x8000);

        let cycles = step_cycles(&mut cpu, &mut bus);

        // Displacement is applied to the address after the instruction
        assert_eq!(cpu.pc, 0x7FF7);
        assert_eq!(cycles, 3);
    }

    #[test]
    fn test_beq_not_taken() {
        let (mut cpu, mut bus) = boot_cpu();

        cpu.status.remove(StatusFlags::ZERO);
        // BEQ +16
        bus.load_program(&[0xF0, 0x10], 0x8000);

        let cycles = step_cycles(&mut cpu, &mut bus);

        assert_eq!(cpu.pc, 0x8002);
        assert_eq!(cycles, 2);
    }

    #[test]
    fn test_branch_offset_extremes() {
        // $7F is +127, $80 is -128
        let (mut cpu, mut bus) = boot_cpu();
        cpu.status.remove(StatusFlags::ZERO);
        bus.load_program(&[0xD0, 0x7F], 0x8000);
        cpu.step(&mut bus);
        assert_eq!(cpu.pc, 0x8081);

        let (mut cpu, mut bus) = boot_cpu();
        cpu.status.remove(StatusFlags::ZERO);
        bus.load_program(&[0xD0, 0x80], 0x8000);
        cpu.step(&mut bus);
        assert_eq!(cpu.pc, 0x7F82);
    }

    #[test]
    fn test_each_branch_watches_its_flag() {
        let cases: [(u8, StatusFlags, bool); 8] = [
            (0x90, StatusFlags::CARRY, false),    // BCC
            (0xB0, StatusFlags::CARRY, true),     // BCS
            (0xD0, StatusFlags::ZERO, false),     // BNE
            (0xF0, StatusFlags::ZERO, true),      // BEQ
            (0x10, StatusFlags::NEGATIVE, false), // BPL
            (0x30, StatusFlags::NEGATIVE, true),  // BMI
            (0x50, StatusFlags::OVERFLOW, false), // BVC
            (0x70, StatusFlags::OVERFLOW, true),  // BVS
        ];

        for (opcode, flag, taken_when_set) in cases {
            for flag_set in [false, true] {
                let (mut cpu, mut bus) = boot_cpu();
                cpu.status.set(flag, flag_set);

                bus.load_program(&[opcode, 0x10], 0x8000);

                cpu.step(&mut bus);

                let taken = flag_set == taken_when_set;
                let expected = if taken { 0x8012 } else { 0x8002 };
                assert_eq!(
                    cpu.pc, expected,
                    "opcode {:02X} with flag set {}",
                    opcode, flag_set
                );
            }
        }
    }

    #[test]
    fn test_jmp_absolute() {
        let (mut cpu, mut bus) = boot_cpu();

        // JMP $1234
        bus.load_program(&[0x4C, 0x34, 0x12], 0x8000);

        let cycles = step_cycles(&mut cpu, &mut bus);

        assert_eq!(cpu.pc, 0x1234);
        assert_eq!(cycles, 3);
    }

    #[test]
    fn test_jmp_indirect() {
        let (mut cpu, mut bus) = boot_cpu();

        bus.write(0x0300, 0x78);
        bus.write(0x0301, 0x56);
        // JMP ($0300)
        bus.load_program(&[0x6C, 0x00, 0x03], 0x8000);

        cpu.step(&mut bus);

        assert_eq!(cpu.pc, 0x5678);
    }

    #[test]
    fn test_jmp_indirect_page_boundary_quirk() {
        let (mut cpu, mut bus) = boot_cpu();

        // Pointer at $02FF: the high byte comes from $0200, not $0300
        bus.write(0x02FF, 0x40);
        bus.write(0x0200, 0x30);
        bus.write(0x0300, 0xAA);
        // JMP ($02FF)
        bus.load_program(&[0x6C, 0xFF, 0x02], 0x8000);

        cpu.step(&mut bus);

        assert_eq!(cpu.pc, 0x3040);
    }

    #[test]
    fn test_jsr_pushes_resume_address() {
        let (mut cpu, mut bus) = boot_cpu();

        // JSR $9000 at $8000: the address after the instruction, high first
        bus.load_program(&[0x20, 0x00, 0x90], 0x8000);

        let cycles = step_cycles(&mut cpu, &mut bus);

        assert_eq!(cpu.pc, 0x9000);
        assert_eq!(cpu.sp, 0xFB);
        assert_eq!(bus.read(0x01FD), 0x80);
        assert_eq!(bus.read(0x01FC), 0x03);
        assert_eq!(cycles, 6);
    }

    #[test]
    fn test_jsr_rts_round_trip() {
        let (mut cpu, mut bus) = boot_cpu();

        // JSR $9000 ... RTS
        bus.load_program(&[0x20, 0x00, 0x90], 0x8000);
        bus.load_program(&[0x60], 0x9000);

        cpu.step(&mut bus);
        assert_eq!(cpu.pc, 0x9000);

        cpu.step(&mut bus);

        // Execution resumes at exactly the pushed address
        assert_eq!(cpu.pc, 0x8003);
        assert_eq!(cpu.sp, 0xFD);
    }

    #[test]
    fn test_jsr_rts_with_stack_wraparound() {
        let (mut cpu, mut bus) = boot_cpu();

        cpu.sp = 0x00;
        bus.load_program(&[0x20, 0x00, 0x90], 0x8000);
        bus.load_program(&[0x60], 0x9000);

        cpu.step(&mut bus);
        // The pointer wrapped within the stack page
        assert_eq!(cpu.sp, 0xFE);
        assert_eq!(bus.read(0x0100), 0x80);
        assert_eq!(bus.read(0x01FF), 0x03);

        cpu.step(&mut bus);
        assert_eq!(cpu.pc, 0x8003);
        assert_eq!(cpu.sp, 0x00);
    }

    #[test]
    fn test_rti_restores_flags_then_pc() {
        let (mut cpu, mut bus) = boot_cpu();

        cpu.sp = 0xFA;
        bus.write(0x01FB, 0xC3);
        bus.write(0x01FC, 0x34);
        bus.write(0x01FD, 0x12);
        // RTI
        bus.load_program(&[0x40], 0x8000);

        cpu.step(&mut bus);

        assert_eq!(cpu.status.bits(), 0xC3);
        assert_eq!(cpu.pc, 0x1234);
        assert_eq!(cpu.sp, 0xFD);
    }

    #[test]
    fn test_pha_pla() {
        let (mut cpu, mut bus) = boot_cpu();

        cpu.a = 0x42;
        // PHA, LDA #$00, PLA
        bus.load_program(&[0x48, 0xA9, 0x00, 0x68], 0x8000);

        cpu.step(&mut bus);
        assert_eq!(bus.read(0x01FD), 0x42);
        assert_eq!(cpu.sp, 0xFC);

        cpu.step(&mut bus);
        assert_eq!(cpu.a, 0x00);

        cpu.step(&mut bus);
        assert_eq!(cpu.a, 0x42);
        assert_eq!(cpu.sp, 0xFD);
        assert!(!cpu.status.contains(StatusFlags::ZERO));
    }

    #[test]
    fn test_php_plp_round_trip() {
        let (mut cpu, mut bus) = boot_cpu();

        cpu.status = StatusFlags::from_bits_truncate(0xC3);
        // PHP, PLP: the byte comes back exactly as pushed
        bus.load_program(&[0x08, 0x28], 0x8000);

        cpu.step(&mut bus);
        assert_eq!(bus.read(0x01FD), 0xC3);

        cpu.status = StatusFlags::from_bits_truncate(0x24);
        cpu.step(&mut bus);
        assert_eq!(cpu.status.bits(), 0xC3);
    }

    #[test]
    fn test_transfers_set_flags() {
        let (mut cpu, mut bus) = boot_cpu();

        cpu.a = 0x80;
        // TAX, TAY
        bus.load_program(&[0xAA, 0xA8], 0x8000);

        cpu.step(&mut bus);
        assert_eq!(cpu.x, 0x80);
        assert!(cpu.status.contains(StatusFlags::NEGATIVE));

        cpu.step(&mut bus);
        assert_eq!(cpu.y, 0x80);
    }

    #[test]
    fn test_tsx_sets_flags_txs_does_not() {
        let (mut cpu, mut bus) = boot_cpu();

        // TSX: SP is $FD, so N lands in the flags
        bus.load_program(&[0xBA, 0x9A], 0x8000);

        cpu.step(&mut bus);
        assert_eq!(cpu.x, 0xFD);
        assert!(cpu.status.contains(StatusFlags::NEGATIVE));

        cpu.x = 0x00;
        cpu.step(&mut bus);
        assert_eq!(cpu.sp, 0x00);
        // TXS leaves the flags alone even for a zero value
        assert!(!cpu.status.contains(StatusFlags::ZERO));
        assert!(cpu.status.contains(StatusFlags::NEGATIVE));
    }

    #[test]
    fn test_flag_instructions() {
        let (mut cpu, mut bus) = boot_cpu();

        // SEC, SED, SEI, CLC, CLD, CLI, CLV
        bus.load_program(&[0x38, 0xF8, 0x78, 0x18, 0xD8, 0x58, 0xB8], 0x8000);

        cpu.step(&mut bus);
        assert!(cpu.status.contains(StatusFlags::CARRY));
        cpu.step(&mut bus);
        assert!(cpu.status.contains(StatusFlags::DECIMAL));
        cpu.step(&mut bus);
        assert!(cpu.status.contains(StatusFlags::INTERRUPT_DISABLE));

        cpu.step(&mut bus);
        assert!(!cpu.status.contains(StatusFlags::CARRY));
        cpu.step(&mut bus);
        assert!(!cpu.status.contains(StatusFlags::DECIMAL));
        cpu.step(&mut bus);
        assert!(!cpu.status.contains(StatusFlags::INTERRUPT_DISABLE));

        cpu.status.insert(StatusFlags::OVERFLOW);
        cpu.step(&mut bus);
        assert!(!cpu.status.contains(StatusFlags::OVERFLOW));
    }

    #[test]
    fn test_nop_only_advances_pc() {
        let (mut cpu, mut bus) = boot_cpu();

        let before = cpu.status;
        // NOP
        bus.load_program(&[0xEA], 0x8000);

        let cycles = step_cycles(&mut cpu, &mut bus);

        assert_eq!(cpu.pc, 0x8001);
        assert_eq!(cycles, 2);
        assert_eq!(cpu.status, before);
    }

    #[test]
    fn test_cycles_accumulate() {
        let (mut cpu, mut bus) = boot_cpu();
        assert_eq!(cpu.cycles, 7);

        // LDA #$01 (2 cycles), STA $10 (3 cycles)
        bus.load_program(&[0xA9, 0x01, 0x85, 0x10], 0x8000);

        cpu.step(&mut bus);
        cpu.step(&mut bus);

        assert_eq!(cpu.cycles, 12);
    }

    #[test]
    fn test_brk_halts_without_side_effects() {
        let (mut cpu, mut bus) = boot_cpu();

        // BRK
        bus.load_program(&[0x00], 0x8000);

        let result = cpu.step(&mut bus);

        assert_eq!(result, StepResult::Halted(HaltReason::Break));
        // PC stays on the BRK byte; nothing was pushed
        assert_eq!(cpu.pc, 0x8000);
        assert_eq!(cpu.sp, 0xFD);
        assert_eq!(bus.read(0x01FD), 0x00);
        assert_eq!(cpu.status.bits(), 0x24);
        assert_eq!(cpu.cycles, 7);

        // The halt is terminal: stepping again reports the same thing
        assert_eq!(cpu.step(&mut bus), StepResult::Halted(HaltReason::Break));
        assert_eq!(cpu.pc, 0x8000);
    }

    #[test]
    fn test_undefined_opcode_halts_without_side_effects() {
        let (mut cpu, mut bus) = boot_cpu();

        cpu.a = 0x11;
        cpu.x = 0x22;
        cpu.y = 0x33;
        // $02 has no instruction assigned
        bus.load_program(&[0x02], 0x8000);

        let result = cpu.step(&mut bus);

        assert_eq!(result, StepResult::Halted(HaltReason::InvalidOpcode(0x02)));
        assert_eq!(cpu.pc, 0x8000);
        assert_eq!(cpu.a, 0x11);
        assert_eq!(cpu.x, 0x22);
        assert_eq!(cpu.y, 0x33);
        assert_eq!(cpu.sp, 0xFD);
        assert_eq!(cpu.status.bits(), 0x24);
        assert_eq!(cpu.cycles, 7);
    }

    #[test]
    fn test_every_documented_opcode_decodes() {
        let defined = (0u16..256)
            .filter(|&byte| opcodes::lookup(byte as u8).is_some())
            .count();
        assert_eq!(defined, 151);
    }

    #[test]
    fn test_descriptor_lengths_match_modes() {
        for byte in 0u16..256 {
            if let Some(opcode) = opcodes::lookup(byte as u8) {
                assert_eq!(
                    opcode.bytes,
                    1 + opcode.mode.operand_bytes(),
                    "length of {:02X}",
                    byte
                );
            }
        }
    }
}
