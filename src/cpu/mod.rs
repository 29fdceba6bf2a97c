use bitflags::bitflags;

use crate::cpu_bus::CpuBus;

pub mod addressing;
pub mod opcodes;

#[cfg(test)]
mod tests;

use addressing::Operand;
use opcodes::{Mnemonic, Opcode};

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct StatusFlags: u8 {
        const CARRY = 0b00000001;
        const ZERO = 0b00000010;
        const INTERRUPT_DISABLE = 0b00000100;
        const DECIMAL = 0b00001000;
        const BREAK = 0b00010000;
        const UNUSED = 0b00100000;
        const OVERFLOW = 0b01000000;
        const NEGATIVE = 0b10000000;
    }
}

/// Why the machine stopped. Both variants are terminal; only an external
/// reset starts execution again.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HaltReason {
    Break,
    InvalidOpcode(u8),
}

/// Outcome of one fetch-decode-execute step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepResult {
    Executed(u8),
    Halted(HaltReason),
}

pub struct Cpu {
    pub a: u8,   // Accumulator
    pub x: u8,   // X register
    pub y: u8,   // Y register
    pub sp: u8,  // Stack pointer
    pub pc: u16, // Program counter
    pub status: StatusFlags,
    pub cycles: u64,
}

impl Cpu {
    pub fn new() -> Self {
        Cpu {
            a: 0,
            x: 0,
            y: 0,
            sp: 0xFD,
            pc: 0,
            status: StatusFlags::from_bits_truncate(0x24),
            cycles: 0,
        }
    }

    pub fn reset(&mut self, bus: &mut dyn CpuBus) {
        self.a = 0;
        self.x = 0;
        self.y = 0;
        self.sp = 0xFD;
        self.status = StatusFlags::from_bits_truncate(0x24);

        self.pc = bus.read_word(0xFFFC);

        self.cycles = 7;
    }

    /// Executes the instruction at PC. A halt leaves PC on the faulting
    /// opcode byte so diagnostics point at the site, and mutates nothing
    /// else.
    pub fn step(&mut self, bus: &mut dyn CpuBus) -> StepResult {
        let byte = bus.read(self.pc);
        let opcode = match opcodes::lookup(byte) {
            Some(opcode) => opcode,
            None => {
                log::error!(
                    "Halting on undefined opcode 0x{:02X} at PC 0x{:04X}",
                    byte,
                    self.pc
                );
                return StepResult::Halted(HaltReason::InvalidOpcode(byte));
            }
        };

        self.pc = self.pc.wrapping_add(1);
        let operand = self.resolve_operand(bus, opcode.mode);
        let result = self.execute_instruction(bus, opcode, operand);
        if let StepResult::Executed(cycles) = result {
            self.cycles += cycles as u64;
        }
        result
    }

    fn execute_instruction(
        &mut self,
        bus: &mut dyn CpuBus,
        opcode: &Opcode,
        operand: Operand,
    ) -> StepResult {
        use Mnemonic::*;

        let mut cycles = opcode.cycles;
        match opcode.mnemonic {
            BRK => {
                // Controlled halt. Rewind past the opcode fetch so the
                // dump shows the BRK's own address.
                self.pc = self.pc.wrapping_sub(1);
                return StepResult::Halted(HaltReason::Break);
            }

            LDA => {
                self.a = self.operand_value(bus, operand);
                self.set_zero_negative_flags(self.a);
            }
            LDX => {
                self.x = self.operand_value(bus, operand);
                self.set_zero_negative_flags(self.x);
            }
            LDY => {
                self.y = self.operand_value(bus, operand);
                self.set_zero_negative_flags(self.y);
            }
            STA => self.write_back(bus, operand, self.a),
            STX => self.write_back(bus, operand, self.x),
            STY => self.write_back(bus, operand, self.y),

            ADC => {
                let value = self.operand_value(bus, operand);
                self.adc(value);
            }
            SBC => {
                let value = self.operand_value(bus, operand);
                self.sbc(value);
            }

            AND => {
                self.a &= self.operand_value(bus, operand);
                self.set_zero_negative_flags(self.a);
            }
            ORA => {
                self.a |= self.operand_value(bus, operand);
                self.set_zero_negative_flags(self.a);
            }
            EOR => {
                self.a ^= self.operand_value(bus, operand);
                self.set_zero_negative_flags(self.a);
            }
            BIT => {
                let value = self.operand_value(bus, operand);
                self.status.set(StatusFlags::ZERO, self.a & value == 0);
                self.status.set(StatusFlags::NEGATIVE, value & 0x80 != 0);
                self.status.set(StatusFlags::OVERFLOW, value & 0x40 != 0);
            }

            ASL => self.asl(bus, operand),
            LSR => self.lsr(bus, operand),
            ROL => self.rol(bus, operand),
            ROR => self.ror(bus, operand),

            CMP => {
                let value = self.operand_value(bus, operand);
                self.compare(self.a, value);
            }
            CPX => {
                let value = self.operand_value(bus, operand);
                self.compare(self.x, value);
            }
            CPY => {
                let value = self.operand_value(bus, operand);
                self.compare(self.y, value);
            }

            INC => {
                let value = self.operand_value(bus, operand).wrapping_add(1);
                self.write_back(bus, operand, value);
                self.set_zero_negative_flags(value);
            }
            DEC => {
                let value = self.operand_value(bus, operand).wrapping_sub(1);
                self.write_back(bus, operand, value);
                self.set_zero_negative_flags(value);
            }
            INX => {
                self.x = self.x.wrapping_add(1);
                self.set_zero_negative_flags(self.x);
            }
            INY => {
                self.y = self.y.wrapping_add(1);
                self.set_zero_negative_flags(self.y);
            }
            DEX => {
                self.x = self.x.wrapping_sub(1);
                self.set_zero_negative_flags(self.x);
            }
            DEY => {
                self.y = self.y.wrapping_sub(1);
                self.set_zero_negative_flags(self.y);
            }

            BCC => cycles = self.branch(operand, !self.status.contains(StatusFlags::CARRY), cycles),
            BCS => cycles = self.branch(operand, self.status.contains(StatusFlags::CARRY), cycles),
            BNE => cycles = self.branch(operand, !self.status.contains(StatusFlags::ZERO), cycles),
            BEQ => cycles = self.branch(operand, self.status.contains(StatusFlags::ZERO), cycles),
            BPL => {
                cycles = self.branch(operand, !self.status.contains(StatusFlags::NEGATIVE), cycles)
            }
            BMI => {
                cycles = self.branch(operand, self.status.contains(StatusFlags::NEGATIVE), cycles)
            }
            BVC => {
                cycles = self.branch(operand, !self.status.contains(StatusFlags::OVERFLOW), cycles)
            }
            BVS => {
                cycles = self.branch(operand, self.status.contains(StatusFlags::OVERFLOW), cycles)
            }

            JMP => {
                if let Operand::Address(addr) = operand {
                    self.pc = addr;
                }
            }
            JSR => {
                if let Operand::Address(addr) = operand {
                    // PC already points past the 3-byte instruction; that is
                    // the resume address, pushed high byte first.
                    let return_addr = self.pc;
                    self.push(bus, (return_addr >> 8) as u8);
                    self.push(bus, return_addr as u8);
                    self.pc = addr;
                }
            }
            RTS => {
                let low = self.pull(bus) as u16;
                let high = self.pull(bus) as u16;
                self.pc = (high << 8) | low;
            }
            RTI => {
                let bits = self.pull(bus);
                self.status = StatusFlags::from_bits_truncate(bits);
                let low = self.pull(bus) as u16;
                let high = self.pull(bus) as u16;
                self.pc = (high << 8) | low;
            }

            PHA => self.push(bus, self.a),
            PLA => {
                self.a = self.pull(bus);
                self.set_zero_negative_flags(self.a);
            }
            PHP => self.push(bus, self.status.bits()),
            PLP => {
                let bits = self.pull(bus);
                self.status = StatusFlags::from_bits_truncate(bits);
            }

            TAX => {
                self.x = self.a;
                self.set_zero_negative_flags(self.x);
            }
            TAY => {
                self.y = self.a;
                self.set_zero_negative_flags(self.y);
            }
            TXA => {
                self.a = self.x;
                self.set_zero_negative_flags(self.a);
            }
            TYA => {
                self.a = self.y;
                self.set_zero_negative_flags(self.a);
            }
            TSX => {
                self.x = self.sp;
                self.set_zero_negative_flags(self.x);
            }
            TXS => self.sp = self.x,

            CLC => self.status.remove(StatusFlags::CARRY),
            SEC => self.status.insert(StatusFlags::CARRY),
            CLI => self.status.remove(StatusFlags::INTERRUPT_DISABLE),
            SEI => self.status.insert(StatusFlags::INTERRUPT_DISABLE),
            CLV => self.status.remove(StatusFlags::OVERFLOW),
            CLD => self.status.remove(StatusFlags::DECIMAL),
            SED => self.status.insert(StatusFlags::DECIMAL),

            NOP => {}
        }

        StepResult::Executed(cycles)
    }

    fn fetch_byte(&mut self, bus: &mut dyn CpuBus) -> u8 {
        let byte = bus.read(self.pc);
        self.pc = self.pc.wrapping_add(1);
        byte
    }

    fn fetch_word(&mut self, bus: &mut dyn CpuBus) -> u16 {
        let low = self.fetch_byte(bus) as u16;
        let high = self.fetch_byte(bus) as u16;
        (high << 8) | low
    }

    /// Reads the value an instruction operates on. The descriptor table
    /// never pairs a value-consuming mnemonic with Implied or Relative.
    fn operand_value(&mut self, bus: &mut dyn CpuBus, operand: Operand) -> u8 {
        match operand {
            Operand::Immediate(value) => value,
            Operand::Address(addr) => bus.read(addr),
            Operand::Accumulator => self.a,
            Operand::None | Operand::Relative(_) => 0,
        }
    }

    /// Stores a result where the operand came from: the accumulator or a
    /// memory address. Other operand kinds never reach a writing opcode.
    fn write_back(&mut self, bus: &mut dyn CpuBus, operand: Operand, value: u8) {
        match operand {
            Operand::Accumulator => self.a = value,
            Operand::Address(addr) => bus.write(addr, value),
            Operand::None | Operand::Immediate(_) | Operand::Relative(_) => {}
        }
    }

    fn push(&mut self, bus: &mut dyn CpuBus, value: u8) {
        let addr = 0x0100 | self.sp as u16;
        bus.write(addr, value);
        self.sp = self.sp.wrapping_sub(1);
    }

    fn pull(&mut self, bus: &mut dyn CpuBus) -> u8 {
        self.sp = self.sp.wrapping_add(1);
        let addr = 0x0100 | self.sp as u16;
        bus.read(addr)
    }

    fn set_zero_negative_flags(&mut self, value: u8) {
        self.status.set(StatusFlags::ZERO, value == 0);
        self.status.set(StatusFlags::NEGATIVE, value & 0x80 != 0);
    }

    /// PC already sits past the 2-byte instruction, so a taken branch is a
    /// plain signed displacement from here.
    fn branch(&mut self, operand: Operand, condition: bool, base_cycles: u8) -> u8 {
        if let Operand::Relative(offset) = operand {
            if condition {
                self.pc = self.pc.wrapping_add(offset as u16);
                return base_cycles + 1;
            }
        }
        base_cycles
    }

    fn adc(&mut self, value: u8) {
        let carry = if self.status.contains(StatusFlags::CARRY) { 1 } else { 0 };
        let result = self.a as u16 + value as u16 + carry;

        self.status.set(StatusFlags::CARRY, result > 0xFF);
        self.status.set(
            StatusFlags::OVERFLOW,
            (self.a ^ result as u8) & (value ^ result as u8) & 0x80 != 0,
        );

        self.a = result as u8;
        self.set_zero_negative_flags(self.a);
    }

    // SBC is ADC with the operand's complement: borrow is the inverse of
    // carry, and the overflow rule falls out unchanged.
    fn sbc(&mut self, value: u8) {
        self.adc(!value);
    }

    fn compare(&mut self, reg: u8, value: u8) {
        let result = reg.wrapping_sub(value);
        self.status.set(StatusFlags::CARRY, reg >= value);
        self.status.set(StatusFlags::ZERO, reg == value);
        self.status.set(StatusFlags::NEGATIVE, result & 0x80 != 0);
    }

    // Carry takes the bit shifted out, computed before the shift.
    fn asl(&mut self, bus: &mut dyn CpuBus, operand: Operand) {
        let value = self.operand_value(bus, operand);
        self.status.set(StatusFlags::CARRY, value & 0x80 != 0);
        let result = value << 1;
        self.write_back(bus, operand, result);
        self.set_zero_negative_flags(result);
    }

    fn lsr(&mut self, bus: &mut dyn CpuBus, operand: Operand) {
        let value = self.operand_value(bus, operand);
        self.status.set(StatusFlags::CARRY, value & 0x01 != 0);
        let result = value >> 1;
        self.write_back(bus, operand, result);
        self.set_zero_negative_flags(result);
    }

    fn rol(&mut self, bus: &mut dyn CpuBus, operand: Operand) {
        let value = self.operand_value(bus, operand);
        let carry_in = if self.status.contains(StatusFlags::CARRY) { 1 } else { 0 };
        self.status.set(StatusFlags::CARRY, value & 0x80 != 0);
        let result = (value << 1) | carry_in;
        self.write_back(bus, operand, result);
        self.set_zero_negative_flags(result);
    }

    fn ror(&mut self, bus: &mut dyn CpuBus, operand: Operand) {
        let value = self.operand_value(bus, operand);
        let carry_in = if self.status.contains(StatusFlags::CARRY) { 0x80 } else { 0 };
        self.status.set(StatusFlags::CARRY, value & 0x01 != 0);
        let result = (value >> 1) | carry_in;
        self.write_back(bus, operand, result);
        self.set_zero_negative_flags(result);
    }
}

impl Default for Cpu {
    fn default() -> Self {
        Cpu::new()
    }
}
