#![cfg_attr(not(test), no_std)]

pub mod define;
pub mod eeprom;
pub mod error;
pub mod hal;
pub mod plain;
pub mod serial_interface;

pub use error::{Error, Result};

/// Identity and geometry of one EEPROM chip.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EepromInfo {
    device_address: u8,
    capacity: u32,
    page_size: u16,
    write_cycle_ms: u32,
}

impl EepromInfo {
    pub fn new(device_address: u8, capacity: u32, page_size: u16, write_cycle_ms: u32) -> Self {
        EepromInfo {
            device_address,
            capacity,
            page_size,
            write_cycle_ms,
        }
    }

    pub fn at24c32(device_address: u8) -> Self {
        Self::new(device_address, 4 * 1024, 32, 10)
    }

    pub fn at24c64(device_address: u8) -> Self {
        Self::new(device_address, 8 * 1024, 32, 5)
    }

    pub fn at24c128(device_address: u8) -> Self {
        Self::new(device_address, 16 * 1024, 64, 5)
    }

    pub fn at24c256(device_address: u8) -> Self {
        Self::new(device_address, 32 * 1024, 64, 5)
    }

    pub fn at24c512(device_address: u8) -> Self {
        Self::new(device_address, 64 * 1024, 128, 5)
    }

    pub fn device_address(&self) -> u8 {
        self.device_address
    }

    pub fn capacity(&self) -> u32 {
        self.capacity
    }

    pub fn page_size(&self) -> u16 {
        self.page_size
    }

    pub fn write_cycle_ms(&self) -> u32 {
        self.write_cycle_ms
    }
}

/// Byte-oriented operations of a paged EEPROM.
pub trait EepromOperations {
    /// Reads `buffer.len()` bytes starting at `address`. The chip wraps past its end.
    fn read(&mut self, address: u16, buffer: &mut [u8]) -> Result<()>;
    /// Waits for the self-timed write cycle to end.
    fn poll(&mut self, address: u16) -> Result<()>;
    /// Whether `repetitions` copies of `pattern` are stored from `address` on.
    fn equals(&mut self, address: u16, pattern: &[u8], repetitions: usize) -> bool;
    /// Writes `data` unless the chip already holds it.
    fn write(&mut self, address: u16, data: &[u8]) -> Result<()>;
    /// Writes `data` unconditionally. Bytes past the capacity are dropped.
    fn force_write(&mut self, address: u16, data: &[u8]) -> Result<()>;
    /// Sets `length` bytes from `address` to `value`.
    fn fill(&mut self, value: u8, address: u16, length: usize, force: bool) -> Result<()>;
    fn clear(&mut self, address: u16, length: usize, force: bool) -> Result<()> {
        self.fill(0, address, length, force)
    }
}
