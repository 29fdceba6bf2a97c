use super::Cpu;
use crate::cpu_bus::CpuBus;

/// Operand interpretation for an opcode. Determines how many bytes follow
/// the opcode and how the effective address or value is produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddressingMode {
    Implied,
    Accumulator,
    Immediate,
    ZeroPage,
    ZeroPageX,
    ZeroPageY,
    Absolute,
    AbsoluteX,
    AbsoluteY,
    Indirect,
    IndirectX,
    IndirectY,
    Relative,
}

impl AddressingMode {
    /// Operand bytes following the opcode byte.
    pub const fn operand_bytes(self) -> u8 {
        match self {
            AddressingMode::Implied | AddressingMode::Accumulator => 0,
            AddressingMode::Immediate
            | AddressingMode::ZeroPage
            | AddressingMode::ZeroPageX
            | AddressingMode::ZeroPageY
            | AddressingMode::IndirectX
            | AddressingMode::IndirectY
            | AddressingMode::Relative => 1,
            AddressingMode::Absolute
            | AddressingMode::AbsoluteX
            | AddressingMode::AbsoluteY
            | AddressingMode::Indirect => 2,
        }
    }
}

/// A resolved operand: either nothing, the accumulator itself, an
/// immediate value, an effective memory address, or a branch offset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operand {
    None,
    Accumulator,
    Immediate(u8),
    Address(u16),
    Relative(i8),
}

impl Cpu {
    /// Consumes the operand bytes at PC and computes the effective operand.
    /// PC ends up past the full instruction; control-transfer handlers
    /// overwrite it afterwards.
    pub(crate) fn resolve_operand(&mut self, bus: &mut dyn CpuBus, mode: AddressingMode) -> Operand {
        match mode {
            AddressingMode::Implied => Operand::None,
            AddressingMode::Accumulator => Operand::Accumulator,
            AddressingMode::Immediate => Operand::Immediate(self.fetch_byte(bus)),
            AddressingMode::ZeroPage => Operand::Address(self.fetch_byte(bus) as u16),
            AddressingMode::ZeroPageX => {
                let base = self.fetch_byte(bus);
                Operand::Address(base.wrapping_add(self.x) as u16)
            }
            AddressingMode::ZeroPageY => {
                let base = self.fetch_byte(bus);
                Operand::Address(base.wrapping_add(self.y) as u16)
            }
            AddressingMode::Absolute => Operand::Address(self.fetch_word(bus)),
            AddressingMode::AbsoluteX => {
                let base = self.fetch_word(bus);
                Operand::Address(base.wrapping_add(self.x as u16))
            }
            AddressingMode::AbsoluteY => {
                let base = self.fetch_word(bus);
                Operand::Address(base.wrapping_add(self.y as u16))
            }
            AddressingMode::Indirect => {
                let ptr = self.fetch_word(bus);
                Operand::Address(read_word_page_wrapped(bus, ptr))
            }
            AddressingMode::IndirectX => {
                let ptr = self.fetch_byte(bus).wrapping_add(self.x);
                Operand::Address(read_zero_page_word(bus, ptr))
            }
            AddressingMode::IndirectY => {
                let ptr = self.fetch_byte(bus);
                let base = read_zero_page_word(bus, ptr);
                Operand::Address(base.wrapping_add(self.y as u16))
            }
            AddressingMode::Relative => Operand::Relative(self.fetch_byte(bus) as i8),
        }
    }
}

/// Pointer word fetch that never leaves page zero: the high byte of a
/// pointer stored at 0xFF comes from 0x00, not 0x100.
fn read_zero_page_word(bus: &mut dyn CpuBus, ptr: u8) -> u16 {
    let lo = bus.read(ptr as u16) as u16;
    let hi = bus.read(ptr.wrapping_add(1) as u16) as u16;
    (hi << 8) | lo
}

/// JMP (indirect) pointer fetch with the NMOS quirk: a pointer ending in
/// 0xFF takes its high byte from the start of the same page instead of
/// carrying into the next one.
fn read_word_page_wrapped(bus: &mut dyn CpuBus, ptr: u16) -> u16 {
    let lo = bus.read(ptr) as u16;
    let hi_addr = if ptr & 0x00FF == 0x00FF {
        ptr & 0xFF00
    } else {
        ptr.wrapping_add(1)
    };
    let hi = bus.read(hi_addr) as u16;
    (hi << 8) | lo
}
