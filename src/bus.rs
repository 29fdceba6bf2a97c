use crate::cpu_bus::CpuBus;
use crate::rom::RomImage;

pub const VIDEO_BASE: u16 = 0x0200;
pub const VIDEO_SIZE: usize = 0x0400;
pub const VIDEO_COLS: usize = 32;
pub const VIDEO_ROWS: usize = 32;
pub const CHAR_ROM_BASE: u16 = 0x8000;
pub const GLYPH_BYTES: usize = 8;

pub const NMI_VECTOR: u16 = 0xFFFA;
pub const RESET_VECTOR: u16 = 0xFFFC;
pub const IRQ_VECTOR: u16 = 0xFFFE;

/// Flat 64KB memory map. The ROM image is copied in at its layout base;
/// everything else reads as zero until written. No address faults: the
/// whole 16-bit space is backed.
pub struct Bus {
    memory: [u8; 0x10000],
}

impl Bus {
    pub fn new() -> Self {
        Bus {
            memory: [0; 0x10000],
        }
    }

    pub fn load_rom(&mut self, rom: &RomImage) {
        let base = rom.layout().base() as usize;
        self.memory[base..base + rom.bytes().len()].copy_from_slice(rom.bytes());
    }

    /// Read without the &mut the bus trait requires. Used by collaborators
    /// that only inspect state between instructions.
    pub fn peek(&self, addr: u16) -> u8 {
        self.memory[addr as usize]
    }

    pub fn peek_word(&self, addr: u16) -> u16 {
        let lo = self.peek(addr) as u16;
        let hi = self.peek(addr.wrapping_add(1)) as u16;
        (hi << 8) | lo
    }

    pub fn reset_vector(&self) -> u16 {
        self.peek_word(RESET_VECTOR)
    }

    pub fn irq_vector(&self) -> u16 {
        self.peek_word(IRQ_VECTOR)
    }

    pub fn nmi_vector(&self) -> u16 {
        self.peek_word(NMI_VECTOR)
    }

    /// The 32x32 character-cell grid the display polls, row-major.
    pub fn video_cells(&self) -> &[u8] {
        let base = VIDEO_BASE as usize;
        &self.memory[base..base + VIDEO_SIZE]
    }

    /// Eight pixel rows for one glyph, MSB = leftmost pixel.
    pub fn glyph(&self, index: u8) -> [u8; GLYPH_BYTES] {
        let base = CHAR_ROM_BASE as usize + index as usize * GLYPH_BYTES;
        let mut rows = [0u8; GLYPH_BYTES];
        rows.copy_from_slice(&self.memory[base..base + GLYPH_BYTES]);
        rows
    }

    pub fn memory(&self) -> &[u8] {
        &self.memory
    }

    pub fn restore_memory(&mut self, bytes: &[u8]) {
        self.memory.copy_from_slice(bytes);
    }
}

impl CpuBus for Bus {
    fn read(&mut self, addr: u16) -> u8 {
        self.memory[addr as usize]
    }

    fn write(&mut self, addr: u16, value: u8) {
        self.memory[addr as usize] = value;
    }
}

impl Default for Bus {
    fn default() -> Self {
        Bus::new()
    }
}
