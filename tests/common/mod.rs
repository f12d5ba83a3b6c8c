//! Simulated AT24-style chip and a virtual clock for driving `Eeprom` on the host.

#![allow(dead_code)]

use std::cell::Cell;
use std::rc::Rc;

use at24cx_rs::serial_interface::TwoWireInterface;
use at24cx_rs::{Error, Result};
use embedded_hal::delay::DelayNs;

pub const DEVICE_ADDRESS: u8 = 0x50;

pub fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// A page write the chip accepted: target address and payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageWrite {
    pub address: usize,
    pub data: Vec<u8>,
}

/// Behaves like an AT24Cxx: two address bytes, page-wrapping writes, a busy
/// window after each write and auto-incrementing reads.
pub struct SimulatedChip<const BUFFER: usize = 32> {
    pub memory: Vec<u8>,
    page_size: usize,
    /// Address probes answered with NACK after each page write.
    pub busy_polls: usize,
    busy_remaining: usize,
    pointer: usize,
    target: u8,
    queue: Vec<u8>,
    rx: Vec<u8>,
    /// Every accepted page write.
    pub writes: Vec<PageWrite>,
    /// Address-only transactions (address sets and polls).
    pub address_sets: usize,
    pub read_requests: Vec<usize>,
    /// `send_stop` of every transaction, writes and reads in bus order.
    pub stops: Vec<bool>,
    /// NACK every address phase.
    pub absent: bool,
    /// `request_from` returns nothing.
    pub mute: bool,
    /// Page writes accepted before the chip starts NACKing data.
    pub writes_before_data_nack: Option<usize>,
}

impl<const BUFFER: usize> SimulatedChip<BUFFER> {
    pub fn new(capacity: usize, page_size: usize) -> Self {
        SimulatedChip {
            memory: vec![0xFF; capacity],
            page_size,
            busy_polls: 0,
            busy_remaining: 0,
            pointer: 0,
            target: 0,
            queue: Vec::new(),
            rx: Vec::new(),
            writes: Vec::new(),
            address_sets: 0,
            read_requests: Vec::new(),
            stops: Vec::new(),
            absent: false,
            mute: false,
            writes_before_data_nack: None,
        }
    }

    pub fn with_contents(mut self, address: usize, data: &[u8]) -> Self {
        self.memory[address..address + data.len()].copy_from_slice(data);
        self
    }

    fn capacity(&self) -> usize {
        self.memory.len()
    }

    fn acknowledges(&mut self, address: u8) -> bool {
        if self.absent || address != DEVICE_ADDRESS {
            return false;
        }
        if self.busy_remaining > 0 {
            self.busy_remaining -= 1;
            return false;
        }
        true
    }
}

impl<const BUFFER: usize> TwoWireInterface for SimulatedChip<BUFFER> {
    const BUFFER_SIZE: usize = BUFFER;

    fn begin_transmission(&mut self, address: u8) {
        self.target = address;
        self.queue.clear();
    }

    fn write(&mut self, data: &[u8]) -> usize {
        self.queue.extend_from_slice(data);
        data.len()
    }

    fn end_transmission(&mut self, send_stop: bool) -> Result<()> {
        self.stops.push(send_stop);
        if self.queue.len() > BUFFER {
            return Err(Error::DataTooLong);
        }
        if !self.acknowledges(self.target) {
            return Err(Error::NackOnAddress);
        }
        if self.queue.len() < 2 {
            return Err(Error::NackOnData);
        }

        let address = usize::from(u16::from_be_bytes([self.queue[0], self.queue[1]])) % self.capacity();
        let data = self.queue[2..].to_vec();
        if data.is_empty() {
            self.address_sets += 1;
            self.pointer = address;
            return Ok(());
        }

        if let Some(limit) = self.writes_before_data_nack {
            if self.writes.len() >= limit {
                return Err(Error::NackOnData);
            }
        }

        let page_start = address - address % self.page_size;
        for (i, byte) in data.iter().enumerate() {
            let offset = (address - page_start + i) % self.page_size;
            let target = page_start + offset;
            if target < self.capacity() {
                self.memory[target] = *byte;
            }
        }
        self.pointer = page_start + (address - page_start + data.len()) % self.page_size;
        self.writes.push(PageWrite { address, data });
        self.busy_remaining = self.busy_polls;
        Ok(())
    }

    fn request_from(&mut self, address: u8, count: usize, send_stop: bool) -> usize {
        self.read_requests.push(count);
        self.stops.push(send_stop);
        self.rx.clear();
        if self.mute || !self.acknowledges(address) {
            return 0;
        }
        let count = count.min(BUFFER);
        for _ in 0..count {
            self.rx.push(self.memory[self.pointer]);
            self.pointer = (self.pointer + 1) % self.capacity();
        }
        self.rx.reverse();
        count
    }

    fn read(&mut self) -> Option<u8> {
        self.rx.pop()
    }
}

/// Delay source that only advances a shared virtual clock.
#[derive(Clone, Default)]
pub struct VirtualClock {
    elapsed_ns: Rc<Cell<u64>>,
}

impl VirtualClock {
    pub fn elapsed_ms(&self) -> u64 {
        self.elapsed_ns.get() / 1_000_000
    }
}

impl DelayNs for VirtualClock {
    fn delay_ns(&mut self, ns: u32) {
        self.elapsed_ns.set(self.elapsed_ns.get() + u64::from(ns));
    }
}
