use core::fmt::Write;

use embedded_hal::delay::DelayNs;
use log::{debug, error, trace};

use crate::define::{self, ADDRESS_BYTES, ADDRESS_SPACE, DEFAULT_SCRATCH, MAX_POLL_ATTEMPTS};
use crate::error::{Error, Result};
use crate::plain::{self, Plain};
use crate::serial_interface::TwoWireInterface;
use crate::{EepromInfo, EepromOperations};

/// An EEPROM chip on a two-wire bus.
///
/// `SCRATCH` bounds the stack buffer used per call by equality checks, fills
/// and dumps. It must hold at least one page.
pub struct Eeprom<I, D, const SCRATCH: usize = { DEFAULT_SCRATCH }>
where
    I: TwoWireInterface,
    D: DelayNs,
{
    eeprom_info: EepromInfo,
    interface: I,
    delay: D,
}

impl<I, D, const SCRATCH: usize> Eeprom<I, D, SCRATCH>
where
    I: TwoWireInterface,
    D: DelayNs,
{
    pub fn new(interface: I, delay: D, eeprom_info: EepromInfo) -> Self {
        let page_size = eeprom_info.page_size() as usize;
        assert!(eeprom_info.device_address() <= 0x7F, "device address must be 7-bit");
        assert!(page_size >= 1, "page_size must be at least 1");
        assert!(
            page_size <= I::BUFFER_SIZE.saturating_sub(ADDRESS_BYTES),
            "page_size must fit in one bus transfer with its address"
        );
        assert!(page_size <= SCRATCH, "page_size must fit in the scratch buffer");
        assert!(
            eeprom_info.capacity() <= ADDRESS_SPACE,
            "capacity must be addressable with a two-byte address"
        );

        Eeprom {
            eeprom_info,
            interface,
            delay,
        }
    }

    pub fn info(&self) -> &EepromInfo {
        &self.eeprom_info
    }

    pub fn capacity(&self) -> u32 {
        self.eeprom_info.capacity()
    }

    pub fn page_size(&self) -> u16 {
        self.eeprom_info.page_size()
    }

    pub fn interface(&self) -> &I {
        &self.interface
    }

    pub fn interface_mut(&mut self) -> &mut I {
        &mut self.interface
    }

    /// Gives back the bus and the delay source.
    pub fn release(self) -> (I, D) {
        (self.interface, self.delay)
    }

    /// Bytes compared per read transaction when checking `repetitions` copies
    /// of a `pattern_len`-byte pattern.
    ///
    /// Stays within one page unless the pattern alone is larger than a page,
    /// in which case one pattern is read at a time.
    pub fn chunk_size(&self, pattern_len: usize, repetitions: usize) -> usize {
        let page_size = self.eeprom_info.page_size() as usize;
        if pattern_len > page_size {
            return pattern_len;
        }

        let span = pattern_len.saturating_mul(repetitions);
        if span > page_size {
            return (page_size / pattern_len).min(repetitions) * pattern_len;
        }

        span
    }

    pub fn read_value<T: Plain>(&mut self, address: u16) -> Result<T> {
        // SAFETY: `Plain` types accept any bit pattern, zero included.
        let mut value: T = unsafe { core::mem::zeroed() };
        self.read(address, plain::bytes_of_mut(&mut value))?;
        Ok(value)
    }

    pub fn read_into<T: Plain>(&mut self, address: u16, value: &mut T) -> Result<()> {
        self.read(address, plain::bytes_of_mut(value))
    }

    pub fn write_value<T: Plain>(&mut self, address: u16, value: &T) -> Result<()> {
        self.write(address, plain::bytes_of(value))
    }

    pub fn force_write_value<T: Plain>(&mut self, address: u16, value: &T) -> Result<()> {
        self.force_write(address, plain::bytes_of(value))
    }

    /// Fills the whole chip with `value`.
    pub fn fill_device(&mut self, value: u8, force: bool) -> Result<()> {
        let capacity = self.eeprom_info.capacity() as usize;
        self.fill(value, 0, capacity, force)
    }

    /// Zeroes the whole chip.
    pub fn clear_device(&mut self, force: bool) -> Result<()> {
        self.fill_device(0, force)
    }

    /// Dumps `length` bytes from `address` as decimal values, `chunk_size`
    /// bytes per line. Zero `chunk_size` means one page per line, zero
    /// `length` the whole chip.
    pub fn print<W: Write>(
        &mut self,
        out: &mut W,
        address: u16,
        length: usize,
        info: Option<&str>,
        chunk_size: usize,
    ) -> Result<()> {
        let chunk_size = match chunk_size {
            0 => self.eeprom_info.page_size() as usize,
            n => n,
        }
        .min(SCRATCH);
        let mut remaining = match length {
            0 => self.eeprom_info.capacity() as usize,
            n => n,
        };

        if let Some(info) = info {
            writeln!(out, "{}", info).map_err(|_| Error::Other)?;
        }

        let mut scratch = [0u8; SCRATCH];
        let mut current = address;
        let mut ret = Err(Error::Unset);
        while remaining > 0 {
            let count = remaining.min(chunk_size);
            let data = &mut scratch[..count];
            ret = self.read(current, data);
            if ret.is_err() {
                break;
            }
            print_line(out, data)?;

            current = current.wrapping_add(count as u16);
            remaining -= count;
        }
        ret
    }

    fn set_address(&mut self, address: u16, send_stop: bool) -> Result<()> {
        self.interface
            .begin_transmission(self.eeprom_info.device_address());
        self.interface.write(&define::address_prefix(address));
        self.interface.end_transmission(send_stop)
    }
}

fn print_line<W: Write>(out: &mut W, data: &[u8]) -> Result<()> {
    let mut bytes = data.iter();
    if let Some(first) = bytes.next() {
        write!(out, "{}", first).map_err(|_| Error::Other)?;
    }
    for byte in bytes {
        write!(out, " {}", byte).map_err(|_| Error::Other)?;
    }
    writeln!(out).map_err(|_| Error::Other)
}

impl<I, D, const SCRATCH: usize> EepromOperations for Eeprom<I, D, SCRATCH>
where
    I: TwoWireInterface,
    D: DelayNs,
{
    fn read(&mut self, address: u16, buffer: &mut [u8]) -> Result<()> {
        // keep the bus so the chip's address counter feeds the reads below
        if let Err(e) = self.set_address(address, false) {
            error!("Failed to set read address {:04X}: {}", address, e);
            return Err(e);
        }

        let device_address = self.eeprom_info.device_address();
        let total = buffer.len();
        let mut done = 0;
        for window in buffer.chunks_mut(I::BUFFER_SIZE) {
            let last = done + window.len() == total;
            if self.interface.request_from(device_address, window.len(), last) == 0 {
                error!(
                    "No bytes returned reading {} bytes at {:04X}",
                    window.len(),
                    address as usize + done
                );
                return Err(Error::NoBytesAvailable);
            }
            for byte in window.iter_mut() {
                match self.interface.read() {
                    Some(value) => *byte = value,
                    None => {
                        error!("Read window at {:04X} came back short", address as usize + done);
                        return Err(Error::NoBytesAvailable);
                    }
                }
            }
            done += window.len();
        }
        Ok(())
    }

    fn poll(&mut self, address: u16) -> Result<()> {
        let mut ret = Err(Error::Unset);
        for attempt in 1..=MAX_POLL_ATTEMPTS {
            self.delay.delay_ms(self.eeprom_info.write_cycle_ms());
            ret = self.set_address(address, true);
            if ret.is_ok() {
                trace!("Write cycle finished after {} polls", attempt);
                return ret;
            }
        }

        if let Err(e) = ret {
            error!("Device still busy after {} polls: {}", MAX_POLL_ATTEMPTS, e);
        }
        ret
    }

    fn equals(&mut self, address: u16, pattern: &[u8], repetitions: usize) -> bool {
        let mut remaining = pattern.len().saturating_mul(repetitions);
        if remaining == 0 {
            return true;
        }

        let chunk_size = self.chunk_size(pattern.len(), repetitions).min(SCRATCH);
        let mut scratch = [0u8; SCRATCH];
        let mut current = address;
        let mut offset = 0;
        while remaining > 0 {
            let count = remaining.min(chunk_size);
            let chunk = &mut scratch[..count];
            if let Err(e) = self.read(current, chunk) {
                debug!("Treating {:04X} as different, read failed: {}", current, e);
                return false;
            }

            for &byte in chunk.iter() {
                if byte != pattern[offset] {
                    return false;
                }
                offset += 1;
                if offset == pattern.len() {
                    offset = 0;
                }
            }

            current = current.wrapping_add(count as u16);
            remaining -= count;
        }
        true
    }

    fn write(&mut self, address: u16, data: &[u8]) -> Result<()> {
        if self.equals(address, data, 1) {
            debug!("{} bytes at {:04X} already stored, skipping write", data.len(), address);
            return Ok(());
        }

        self.force_write(address, data)
    }

    fn force_write(&mut self, address: u16, data: &[u8]) -> Result<()> {
        let page_size = self.eeprom_info.page_size() as usize;
        let max_payload = I::BUFFER_SIZE - ADDRESS_BYTES;
        let start = address as usize;
        let end = (start + data.len()).min(self.eeprom_info.capacity() as usize);

        let mut current = start;
        let mut ret = Err(Error::Unset);
        while current < end {
            // a page write past the page end wraps to the page start
            let count = (page_size - current % page_size)
                .min(max_payload)
                .min(end - current);
            let offset = current - start;

            self.interface
                .begin_transmission(self.eeprom_info.device_address());
            self.interface.write(&define::address_prefix(current as u16));
            self.interface.write(&data[offset..offset + count]);
            ret = self.interface.end_transmission(true);
            if let Err(e) = ret {
                error!("Failed to write {} bytes at {:04X}: {}", count, current, e);
                break;
            }
            trace!("Wrote {} bytes at {:04X}", count, current);
            current += count;

            ret = self.poll(address);
            if ret.is_err() {
                break;
            }
        }
        ret
    }

    fn fill(&mut self, value: u8, address: u16, length: usize, force: bool) -> Result<()> {
        let page_size = self.eeprom_info.page_size() as usize;
        let available = (self.eeprom_info.capacity() as usize).saturating_sub(address as usize);
        let mut remaining = length.min(available);
        let mut count = remaining.min(page_size);
        let chunk = [value; SCRATCH];

        let mut current = address as usize;
        let mut ret = Err(Error::Unset);
        while remaining > 0 {
            ret = if force {
                self.force_write(current as u16, &chunk[..count])
            } else {
                self.write(current as u16, &chunk[..count])
            };
            if ret.is_err() {
                break;
            }

            current += count;
            remaining -= count;
            count = remaining.min(page_size);
        }
        ret
    }
}
