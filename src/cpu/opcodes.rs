//! Static opcode descriptor table for the 151 documented instructions.
//! Bytes with no entry decode to `None` and halt the machine.

use super::addressing::AddressingMode;

/// The 56 documented instruction mnemonics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[allow(clippy::upper_case_acronyms)]
pub enum Mnemonic {
    ADC, AND, ASL, BCC, BCS, BEQ, BIT, BMI, BNE, BPL, BRK, BVC, BVS,
    CLC, CLD, CLI, CLV, CMP, CPX, CPY, DEC, DEX, DEY, EOR, INC, INX,
    INY, JMP, JSR, LDA, LDX, LDY, LSR, NOP, ORA, PHA, PHP, PLA, PLP,
    ROL, ROR, RTI, RTS, SBC, SEC, SED, SEI, STA, STX, STY, TAX, TAY,
    TSX, TXA, TXS, TYA,
}

/// Descriptor for one defined opcode value. Cycle counts are nominal
/// documentation carried into traces; nothing schedules off them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Opcode {
    pub mnemonic: Mnemonic,
    pub mode: AddressingMode,
    pub bytes: u8,
    pub cycles: u8,
}

const fn op(mnemonic: Mnemonic, mode: AddressingMode, cycles: u8) -> Option<Opcode> {
    Some(Opcode {
        mnemonic,
        mode,
        bytes: 1 + mode.operand_bytes(),
        cycles,
    })
}

const fn decode(byte: u8) -> Option<Opcode> {
    use AddressingMode::*;
    use Mnemonic::*;
    match byte {
        0x00 => op(BRK, Implied, 7),
        0x01 => op(ORA, IndirectX, 6),
        0x05 => op(ORA, ZeroPage, 3),
        0x06 => op(ASL, ZeroPage, 5),
        0x08 => op(PHP, Implied, 3),
        0x09 => op(ORA, Immediate, 2),
        0x0A => op(ASL, Accumulator, 2),
        0x0D => op(ORA, Absolute, 4),
        0x0E => op(ASL, Absolute, 6),

        0x10 => op(BPL, Relative, 2),
        0x11 => op(ORA, IndirectY, 5),
        0x15 => op(ORA, ZeroPageX, 4),
        0x16 => op(ASL, ZeroPageX, 6),
        0x18 => op(CLC, Implied, 2),
        0x19 => op(ORA, AbsoluteY, 4),
        0x1D => op(ORA, AbsoluteX, 4),
        0x1E => op(ASL, AbsoluteX, 7),

        0x20 => op(JSR, Absolute, 6),
        0x21 => op(AND, IndirectX, 6),
        0x24 => op(BIT, ZeroPage, 3),
        0x25 => op(AND, ZeroPage, 3),
        0x26 => op(ROL, ZeroPage, 5),
        0x28 => op(PLP, Implied, 4),
        0x29 => op(AND, Immediate, 2),
        0x2A => op(ROL, Accumulator, 2),
        0x2C => op(BIT, Absolute, 4),
        0x2D => op(AND, Absolute, 4),
        0x2E => op(ROL, Absolute, 6),

        0x30 => op(BMI, Relative, 2),
        0x31 => op(AND, IndirectY, 5),
        0x35 => op(AND, ZeroPageX, 4),
        0x36 => op(ROL, ZeroPageX, 6),
        0x38 => op(SEC, Implied, 2),
        0x39 => op(AND, AbsoluteY, 4),
        0x3D => op(AND, AbsoluteX, 4),
        0x3E => op(ROL, AbsoluteX, 7),

        0x40 => op(RTI, Implied, 6),
        0x41 => op(EOR, IndirectX, 6),
        0x45 => op(EOR, ZeroPage, 3),
        0x46 => op(LSR, ZeroPage, 5),
        0x48 => op(PHA, Implied, 3),
        0x49 => op(EOR, Immediate, 2),
        0x4A => op(LSR, Accumulator, 2),
        0x4C => op(JMP, Absolute, 3),
        0x4D => op(EOR, Absolute, 4),
        0x4E => op(LSR, Absolute, 6),

        0x50 => op(BVC, Relative, 2),
        0x51 => op(EOR, IndirectY, 5),
        0x55 => op(EOR, ZeroPageX, 4),
        0x56 => op(LSR, ZeroPageX, 6),
        0x58 => op(CLI, Implied, 2),
        0x59 => op(EOR, AbsoluteY, 4),
        0x5D => op(EOR, AbsoluteX, 4),
        0x5E => op(LSR, AbsoluteX, 7),

        0x60 => op(RTS, Implied, 6),
        0x61 => op(ADC, IndirectX, 6),
        0x65 => op(ADC, ZeroPage, 3),
        0x66 => op(ROR, ZeroPage, 5),
        0x68 => op(PLA, Implied, 4),
        0x69 => op(ADC, Immediate, 2),
        0x6A => op(ROR, Accumulator, 2),
        0x6C => op(JMP, Indirect, 5),
        0x6D => op(ADC, Absolute, 4),
        0x6E => op(ROR, Absolute, 6),

        0x70 => op(BVS, Relative, 2),
        0x71 => op(ADC, IndirectY, 5),
        0x75 => op(ADC, ZeroPageX, 4),
        0x76 => op(ROR, ZeroPageX, 6),
        0x78 => op(SEI, Implied, 2),
        0x79 => op(ADC, AbsoluteY, 4),
        0x7D => op(ADC, AbsoluteX, 4),
        0x7E => op(ROR, AbsoluteX, 7),

        0x81 => op(STA, IndirectX, 6),
        0x84 => op(STY, ZeroPage, 3),
        0x85 => op(STA, ZeroPage, 3),
        0x86 => op(STX, ZeroPage, 3),
        0x88 => op(DEY, Implied, 2),
        0x8A => op(TXA, Implied, 2),
        0x8C => op(STY, Absolute, 4),
        0x8D => op(STA, Absolute, 4),
        0x8E => op(STX, Absolute, 4),

        0x90 => op(BCC, Relative, 2),
        0x91 => op(STA, IndirectY, 6),
        0x94 => op(STY, ZeroPageX, 4),
        0x95 => op(STA, ZeroPageX, 4),
        0x96 => op(STX, ZeroPageY, 4),
        0x98 => op(TYA, Implied, 2),
        0x99 => op(STA, AbsoluteY, 5),
        0x9A => op(TXS, Implied, 2),
        0x9D => op(STA, AbsoluteX, 5),

        0xA0 => op(LDY, Immediate, 2),
        0xA1 => op(LDA, IndirectX, 6),
        0xA2 => op(LDX, Immediate, 2),
        0xA4 => op(LDY, ZeroPage, 3),
        0xA5 => op(LDA, ZeroPage, 3),
        0xA6 => op(LDX, ZeroPage, 3),
        0xA8 => op(TAY, Implied, 2),
        0xA9 => op(LDA, Immediate, 2),
        0xAA => op(TAX, Implied, 2),
        0xAC => op(LDY, Absolute, 4),
        0xAD => op(LDA, Absolute, 4),
        0xAE => op(LDX, Absolute, 4),

        0xB0 => op(BCS, Relative, 2),
        0xB1 => op(LDA, IndirectY, 5),
        0xB4 => op(LDY, ZeroPageX, 4),
        0xB5 => op(LDA, ZeroPageX, 4),
        0xB6 => op(LDX, ZeroPageY, 4),
        0xB8 => op(CLV, Implied, 2),
        0xB9 => op(LDA, AbsoluteY, 4),
        0xBA => op(TSX, Implied, 2),
        0xBC => op(LDY, AbsoluteX, 4),
        0xBD => op(LDA, AbsoluteX, 4),
        0xBE => op(LDX, AbsoluteY, 4),

        0xC0 => op(CPY, Immediate, 2),
        0xC1 => op(CMP, IndirectX, 6),
        0xC4 => op(CPY, ZeroPage, 3),
        0xC5 => op(CMP, ZeroPage, 3),
        0xC6 => op(DEC, ZeroPage, 5),
        0xC8 => op(INY, Implied, 2),
        0xC9 => op(CMP, Immediate, 2),
        0xCA => op(DEX, Implied, 2),
        0xCC => op(CPY, Absolute, 4),
        0xCD => op(CMP, Absolute, 4),
        0xCE => op(DEC, Absolute, 6),

        0xD0 => op(BNE, Relative, 2),
        0xD1 => op(CMP, IndirectY, 5),
        0xD5 => op(CMP, ZeroPageX, 4),
        0xD6 => op(DEC, ZeroPageX, 6),
        0xD8 => op(CLD, Implied, 2),
        0xD9 => op(CMP, AbsoluteY, 4),
        0xDD => op(CMP, AbsoluteX, 4),
        0xDE => op(DEC, AbsoluteX, 7),

        0xE0 => op(CPX, Immediate, 2),
        0xE1 => op(SBC, IndirectX, 6),
        0xE4 => op(CPX, ZeroPage, 3),
        0xE5 => op(SBC, ZeroPage, 3),
        0xE6 => op(INC, ZeroPage, 5),
        0xE8 => op(INX, Implied, 2),
        0xE9 => op(SBC, Immediate, 2),
        0xEA => op(NOP, Implied, 2),
        0xEC => op(CPX, Absolute, 4),
        0xED => op(SBC, Absolute, 4),
        0xEE => op(INC, Absolute, 6),

        0xF0 => op(BEQ, Relative, 2),
        0xF1 => op(SBC, IndirectY, 5),
        0xF5 => op(SBC, ZeroPageX, 4),
        0xF6 => op(INC, ZeroPageX, 6),
        0xF8 => op(SED, Implied, 2),
        0xF9 => op(SBC, AbsoluteY, 4),
        0xFD => op(SBC, AbsoluteX, 4),
        0xFE => op(INC, AbsoluteX, 7),

        _ => None,
    }
}

const fn build_table() -> [Option<Opcode>; 256] {
    let mut table = [None; 256];
    let mut i = 0;
    while i < 256 {
        table[i] = decode(i as u8);
        i += 1;
    }
    table
}

/// Dense descriptor table indexed by the raw opcode byte.
pub static OPCODE_TABLE: [Option<Opcode>; 256] = build_table();

pub fn lookup(byte: u8) -> Option<&'static Opcode> {
    OPCODE_TABLE[byte as usize].as_ref()
}
