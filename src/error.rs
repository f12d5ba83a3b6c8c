//! Outcome of EEPROM and bus operations
//!
//! Bus-level outcomes and driver-level outcomes share one flat enum; success is
//! the `Ok` side of [`Result`].

use core::fmt;

/// Result type for EEPROM operations
pub type Result<T> = core::result::Result<T, Error>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// The transport could not queue the whole transaction
    DataTooLong,
    /// The device did not acknowledge its address (absent or busy writing)
    NackOnAddress,
    /// The device did not acknowledge a data byte
    NackOnData,
    /// Any other bus fault
    Other,
    /// A read window returned fewer bytes than requested
    NoBytesAvailable,
    /// No transaction was issued at all (zero-length request)
    Unset,
}

impl Error {
    /// Maps a Wire-style numeric status (0 = success) onto a result.
    pub fn from_status(code: u8) -> Result<()> {
        match code {
            0 => Ok(()),
            1 => Err(Error::DataTooLong),
            2 => Err(Error::NackOnAddress),
            3 => Err(Error::NackOnData),
            _ => Err(Error::Other),
        }
    }

    /// Numeric code of this outcome; the driver-only outcomes follow the bus ones.
    pub fn code(&self) -> u8 {
        match self {
            Error::DataTooLong => 1,
            Error::NackOnAddress => 2,
            Error::NackOnData => 3,
            Error::Other => 4,
            Error::NoBytesAvailable => 5,
            Error::Unset => 6,
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::DataTooLong => write!(f, "data too long for transmit buffer"),
            Error::NackOnAddress => write!(f, "address not acknowledged"),
            Error::NackOnData => write!(f, "data not acknowledged"),
            Error::Other => write!(f, "bus error"),
            Error::NoBytesAvailable => write!(f, "no bytes available"),
            Error::Unset => write!(f, "no transaction issued"),
        }
    }
}
