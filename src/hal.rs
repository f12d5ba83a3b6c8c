//! [`TwoWireInterface`] on top of an `embedded-hal` I2C bus.
//!
//! Queued bytes go out as one I2C write when the transmission ends. The HAL
//! always finishes a transaction with a stop condition, so a transmission ended
//! with `send_stop == false` still stops; AT24-style chips keep the latched
//! address for the next current-address read, which is all the driver relies on.

use embedded_hal::i2c::{ErrorKind, I2c, NoAcknowledgeSource};
use log::{error, warn};

use crate::define::DEFAULT_BUFFER_SIZE;
use crate::error::{Error, Result};
use crate::serial_interface::TwoWireInterface;

pub struct HalTwoWire<I2C, const BUFFER: usize = { DEFAULT_BUFFER_SIZE }>
where
    I2C: I2c,
{
    i2c: I2C,
    address: u8,
    tx: [u8; BUFFER],
    tx_len: usize,
    overflow: bool,
    rx: [u8; BUFFER],
    rx_len: usize,
    rx_pos: usize,
}

impl<I2C, const BUFFER: usize> HalTwoWire<I2C, BUFFER>
where
    I2C: I2c,
{
    pub fn new(i2c: I2C) -> Self {
        HalTwoWire {
            i2c,
            address: 0,
            tx: [0; BUFFER],
            tx_len: 0,
            overflow: false,
            rx: [0; BUFFER],
            rx_len: 0,
            rx_pos: 0,
        }
    }

    pub fn release(self) -> I2C {
        self.i2c
    }
}

fn map_error<E: embedded_hal::i2c::Error>(e: E) -> Error {
    match e.kind() {
        ErrorKind::NoAcknowledge(NoAcknowledgeSource::Data) => Error::NackOnData,
        ErrorKind::NoAcknowledge(_) => Error::NackOnAddress,
        _ => Error::Other,
    }
}

impl<I2C, const BUFFER: usize> TwoWireInterface for HalTwoWire<I2C, BUFFER>
where
    I2C: I2c,
{
    const BUFFER_SIZE: usize = BUFFER;

    fn begin_transmission(&mut self, address: u8) {
        self.address = address;
        self.tx_len = 0;
        self.overflow = false;
    }

    fn write(&mut self, data: &[u8]) -> usize {
        let count = data.len().min(BUFFER - self.tx_len);
        self.tx[self.tx_len..self.tx_len + count].copy_from_slice(&data[..count]);
        self.tx_len += count;
        if count < data.len() {
            self.overflow = true;
        }
        count
    }

    fn end_transmission(&mut self, _send_stop: bool) -> Result<()> {
        if self.overflow {
            error!("Transmission to {:02X} exceeds {} bytes", self.address, BUFFER);
            return Err(Error::DataTooLong);
        }

        self.i2c
            .write(self.address, &self.tx[..self.tx_len])
            .map_err(map_error)
    }

    fn request_from(&mut self, address: u8, count: usize, _send_stop: bool) -> usize {
        let count = count.min(BUFFER);
        self.rx_len = 0;
        self.rx_pos = 0;
        if count == 0 {
            return 0;
        }

        match self.i2c.read(address, &mut self.rx[..count]) {
            Ok(()) => {
                self.rx_len = count;
                count
            }
            Err(e) => {
                warn!("Read of {} bytes from {:02X} failed: {}", count, address, map_error(e));
                0
            }
        }
    }

    fn read(&mut self) -> Option<u8> {
        if self.rx_pos >= self.rx_len {
            return None;
        }
        let byte = self.rx[self.rx_pos];
        self.rx_pos += 1;
        Some(byte)
    }
}
