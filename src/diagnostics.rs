use crate::bus::Bus;
use crate::cpu::addressing::AddressingMode;
use crate::cpu::opcodes;
use crate::cpu::{Cpu, HaltReason, StatusFlags};

#[derive(Debug, Clone)]
pub struct RegisterSnapshot {
    pub a: u8,
    pub x: u8,
    pub y: u8,
    pub sp: u8,
    pub status: u8,
}

impl RegisterSnapshot {
    pub fn of(cpu: &Cpu) -> Self {
        RegisterSnapshot {
            a: cpu.a,
            x: cpu.x,
            y: cpu.y,
            sp: cpu.sp,
            status: cpu.status.bits(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct TraceEntry {
    pub pc: u16,
    pub opcode: u8,
    pub operands: Vec<u8>,
    pub disassembly: String,
    pub registers: RegisterSnapshot,
    pub cycle_count: u64,
}

/// Bounded ring of the most recent instructions, recorded before each step
/// and printed when the machine dies.
pub struct Tracer {
    entries: Vec<TraceEntry>,
    capacity: usize,
    instruction_count: u64,
}

impl Tracer {
    pub fn new(capacity: usize) -> Self {
        Tracer {
            entries: Vec::new(),
            capacity,
            instruction_count: 0,
        }
    }

    pub fn record(&mut self, cpu: &Cpu, bus: &Bus) {
        let pc = cpu.pc;
        let opcode = bus.peek(pc);
        let operand_count = opcodes::lookup(opcode).map(|op| op.bytes - 1).unwrap_or(0);
        let mut operands = Vec::with_capacity(operand_count as usize);
        for i in 0..operand_count {
            operands.push(bus.peek(pc.wrapping_add(1 + i as u16)));
        }

        let entry = TraceEntry {
            pc,
            opcode,
            operands,
            disassembly: disassemble(bus, pc),
            registers: RegisterSnapshot::of(cpu),
            cycle_count: cpu.cycles,
        };

        self.entries.push(entry);
        if self.entries.len() > self.capacity {
            self.entries.remove(0);
        }
        self.instruction_count += 1;
    }

    pub fn print_recent(&self, count: usize) {
        let start = self.entries.len().saturating_sub(count);

        println!(
            "\n=== Execution Trace (last {} of {} instructions) ===",
            self.entries.len() - start,
            self.instruction_count
        );
        for entry in &self.entries[start..] {
            let bytes = std::iter::once(entry.opcode)
                .chain(entry.operands.iter().copied())
                .map(|b| format!("{:02X}", b))
                .collect::<Vec<_>>()
                .join(" ");
            println!(
                "${:04X}: {:<8} {:<14} | A:{:02X} X:{:02X} Y:{:02X} SP:{:02X} P:{:02X} cyc:{}",
                entry.pc,
                bytes,
                entry.disassembly,
                entry.registers.a,
                entry.registers.x,
                entry.registers.y,
                entry.registers.sp,
                entry.registers.status,
                entry.cycle_count
            );
        }
    }
}

/// One-line disassembly of the instruction at `pc`. Unknown bytes come out
/// as "???" so the dump still shows something useful.
pub fn disassemble(bus: &Bus, pc: u16) -> String {
    let byte = bus.peek(pc);
    let opcode = match opcodes::lookup(byte) {
        Some(opcode) => opcode,
        None => return format!("??? (0x{:02X})", byte),
    };

    let name = format!("{:?}", opcode.mnemonic);
    let lo = bus.peek(pc.wrapping_add(1));
    let hi = bus.peek(pc.wrapping_add(2));
    let word = ((hi as u16) << 8) | lo as u16;

    match opcode.mode {
        AddressingMode::Implied => name,
        AddressingMode::Accumulator => format!("{} A", name),
        AddressingMode::Immediate => format!("{} #${:02X}", name, lo),
        AddressingMode::ZeroPage => format!("{} ${:02X}", name, lo),
        AddressingMode::ZeroPageX => format!("{} ${:02X},X", name, lo),
        AddressingMode::ZeroPageY => format!("{} ${:02X},Y", name, lo),
        AddressingMode::Absolute => format!("{} ${:04X}", name, word),
        AddressingMode::AbsoluteX => format!("{} ${:04X},X", name, word),
        AddressingMode::AbsoluteY => format!("{} ${:04X},Y", name, word),
        AddressingMode::Indirect => format!("{} (${:04X})", name, word),
        AddressingMode::IndirectX => format!("{} (${:02X},X)", name, lo),
        AddressingMode::IndirectY => format!("{} (${:02X}),Y", name, lo),
        AddressingMode::Relative => {
            let target = pc.wrapping_add(2).wrapping_add(lo as i8 as u16);
            format!("{} ${:04X}", name, target)
        }
    }
}

/// Register dump emitted when the machine halts: PC, the offending opcode,
/// registers and flags in raw and symbolic form.
pub fn dump_halt(cpu: &Cpu, bus: &Bus, reason: HaltReason) {
    let title = match reason {
        HaltReason::Break => "BRK".to_string(),
        HaltReason::InvalidOpcode(byte) => format!("undefined opcode 0x{:02X}", byte),
    };

    println!("\n=== CPU halted: {} ===", title);
    println!("PC: ${:04X}  {}", cpu.pc, disassemble(bus, cpu.pc));
    println!(
        "A: ${:02X}  X: ${:02X}  Y: ${:02X}  SP: ${:02X}",
        cpu.a, cpu.x, cpu.y, cpu.sp
    );

    let bits = cpu.status.bits();
    println!(
        "FLAGS: ${:02X} [{}{}{}{}{}{}{}{}]",
        bits,
        if cpu.status.contains(StatusFlags::NEGATIVE) { 'N' } else { '-' },
        if cpu.status.contains(StatusFlags::OVERFLOW) { 'V' } else { '-' },
        if cpu.status.contains(StatusFlags::UNUSED) { 'U' } else { '-' },
        if cpu.status.contains(StatusFlags::BREAK) { 'B' } else { '-' },
        if cpu.status.contains(StatusFlags::DECIMAL) { 'D' } else { '-' },
        if cpu.status.contains(StatusFlags::INTERRUPT_DISABLE) { 'I' } else { '-' },
        if cpu.status.contains(StatusFlags::ZERO) { 'Z' } else { '-' },
        if cpu.status.contains(StatusFlags::CARRY) { 'C' } else { '-' },
    );
    println!("Cycles: {}", cpu.cycles);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cpu_bus::CpuBus;

    #[test]
    fn disassembles_common_forms() {
        let mut bus = Bus::new();
        bus.write(0x8000, 0xA9); // LDA #$80
        bus.write(0x8001, 0x80);
        bus.write(0x8002, 0x9D); // STA $0200,X
        bus.write(0x8003, 0x00);
        bus.write(0x8004, 0x02);
        bus.write(0x8005, 0xD0); // BNE back to $8000
        bus.write(0x8006, 0xF9);

        assert_eq!(disassemble(&bus, 0x8000), "LDA #$80");
        assert_eq!(disassemble(&bus, 0x8002), "STA $0200,X");
        assert_eq!(disassemble(&bus, 0x8005), "BNE $8000");
        assert_eq!(disassemble(&bus, 0x0000), "BRK");
    }

    #[test]
    fn trace_ring_is_bounded() {
        let mut tracer = Tracer::new(4);
        let cpu = Cpu::new();
        let bus = Bus::new();
        for _ in 0..10 {
            tracer.record(&cpu, &bus);
        }
        assert_eq!(tracer.entries.len(), 4);
        assert_eq!(tracer.instruction_count, 10);
    }
}
