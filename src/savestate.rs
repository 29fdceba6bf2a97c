use serde::{Deserialize, Serialize};

use crate::bus::Bus;
use crate::cpu::{Cpu, StatusFlags};

const FORMAT_VERSION: u32 = 1;

#[derive(Serialize, Deserialize)]
pub struct SaveState {
    pub version: u32,

    // CPU state
    pub cpu_a: u8,
    pub cpu_x: u8,
    pub cpu_y: u8,
    pub cpu_sp: u8,
    pub cpu_pc: u16,
    pub cpu_status: u8,
    pub cpu_cycles: u64,

    // Entire address space, ROM copy included
    pub memory: Vec<u8>,

    // Guards against restoring over a different image
    pub rom_checksum: u32,
    pub timestamp: u64,
}

impl SaveState {
    pub fn capture(cpu: &Cpu, bus: &Bus, rom_checksum: u32) -> Self {
        SaveState {
            version: FORMAT_VERSION,
            cpu_a: cpu.a,
            cpu_x: cpu.x,
            cpu_y: cpu.y,
            cpu_sp: cpu.sp,
            cpu_pc: cpu.pc,
            cpu_status: cpu.status.bits(),
            cpu_cycles: cpu.cycles,
            memory: bus.memory().to_vec(),
            rom_checksum,
            timestamp: std::time::SystemTime::now()
                .duration_since(std::time::UNIX_EPOCH)
                .map(|d| d.as_secs())
                .unwrap_or(0),
        }
    }

    pub fn restore(&self, cpu: &mut Cpu, bus: &mut Bus, rom_checksum: u32) -> Result<(), String> {
        if self.version != FORMAT_VERSION {
            return Err(format!(
                "save state version {} does not match supported version {}",
                self.version, FORMAT_VERSION
            ));
        }
        if self.rom_checksum != rom_checksum {
            return Err(format!(
                "save state was taken with a different ROM (checksum 0x{:08X}, loaded 0x{:08X})",
                self.rom_checksum, rom_checksum
            ));
        }
        if self.memory.len() != 0x10000 {
            return Err(format!(
                "save state memory image is {} bytes, expected 65536",
                self.memory.len()
            ));
        }

        cpu.a = self.cpu_a;
        cpu.x = self.cpu_x;
        cpu.y = self.cpu_y;
        cpu.sp = self.cpu_sp;
        cpu.pc = self.cpu_pc;
        cpu.status = StatusFlags::from_bits_truncate(self.cpu_status);
        cpu.cycles = self.cpu_cycles;
        bus.restore_memory(&self.memory);
        Ok(())
    }

    pub fn save_to_file(&self, path: &str) -> Result<(), Box<dyn std::error::Error>> {
        std::fs::write(path, bincode::serialize(self)?)?;
        println!("Save state written to: {}", path);
        Ok(())
    }

    pub fn load_from_file(path: &str) -> Result<SaveState, Box<dyn std::error::Error>> {
        let bytes = std::fs::read(path)?;
        let state = bincode::deserialize(&bytes)?;
        println!("Save state loaded from: {}", path);
        Ok(state)
    }
}
