use crate::error::Result;

/// Byte-level access to a two-wire bus, shaped after the Arduino `Wire` API.
///
/// A write transaction is `begin_transmission`, any number of `write`s and an
/// `end_transmission`. A read transaction is `request_from` followed by one
/// `read` per returned byte.
pub trait TwoWireInterface {
    /// Largest number of bytes one transaction can carry, address prefix included.
    const BUFFER_SIZE: usize;

    fn begin_transmission(&mut self, address: u8);

    /// Queues bytes for the open transmission, returns how many were accepted.
    fn write(&mut self, data: &[u8]) -> usize;

    /// Sends the queued bytes. With `send_stop == false` the bus is kept for a
    /// following read.
    fn end_transmission(&mut self, send_stop: bool) -> Result<()>;

    /// Reads up to `count` bytes from the device, returns how many arrived.
    fn request_from(&mut self, address: u8, count: usize, send_stop: bool) -> usize;

    /// Next byte of the last `request_from`, `None` once it is used up.
    fn read(&mut self) -> Option<u8>;
}
