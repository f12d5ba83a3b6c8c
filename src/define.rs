/// Bytes of memory address sent in front of every transaction (high byte first).
pub const ADDRESS_BYTES: usize = 2;

/// Bytes reachable through a two-byte memory address.
pub const ADDRESS_SPACE: u32 = 1 << (8 * ADDRESS_BYTES);

/// Acknowledge polling gives up after this many probes.
pub const MAX_POLL_ATTEMPTS: u8 = 10;

/// Largest page of the supported parts.
pub const MAX_PAGE_SIZE: usize = 128;

/// Default transfer limit: one full page plus its address prefix.
pub const DEFAULT_BUFFER_SIZE: usize = MAX_PAGE_SIZE + ADDRESS_BYTES;

/// Default stack scratch used by equality checks, fills and dumps.
pub const DEFAULT_SCRATCH: usize = MAX_PAGE_SIZE;

/// Splits a memory address into its on-wire prefix.
pub(crate) fn address_prefix(address: u16) -> [u8; ADDRESS_BYTES] {
    address.to_be_bytes()
}
