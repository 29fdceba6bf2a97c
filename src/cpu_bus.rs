//! Trait representing the minimal bus interface required by the CPU core.

pub trait CpuBus {
    fn read(&mut self, addr: u16) -> u8;
    fn write(&mut self, addr: u16, value: u8);

    /// Little-endian word read. Each byte fetch wraps the address
    /// independently, so a read at 0xFFFF takes its high byte from 0x0000.
    fn read_word(&mut self, addr: u16) -> u16 {
        let lo = self.read(addr) as u16;
        let hi = self.read(addr.wrapping_add(1)) as u16;
        (hi << 8) | lo
    }
}
