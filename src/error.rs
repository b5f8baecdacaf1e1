use std::io;
use thiserror::Error;

/// An error that can occur during DDC/CI communication.
///
/// This error is generic over the underlying I2C communication. Nothing is
/// retried: the first failed bus transfer aborts the whole transaction.
#[derive(Debug, Clone, Error)]
pub enum Error<I> {
    /// Writing a frame or register pointer to the bus failed
    #[error("DDC/CI bus write failed: {0}")]
    BusWriteFailed(#[source] I),
    /// Reading a reply from the bus failed
    #[error("DDC/CI bus read failed: {0}")]
    BusReadFailed(#[source] I),
    /// A command parameter does not fit in a single byte
    #[error(transparent)]
    InvalidParameter(#[from] ParameterError),
}

impl<I> Error<I> {
    /// The underlying bus error, if this failure came from the bus.
    pub fn bus_error(&self) -> Option<&I> {
        match *self {
            Error::BusWriteFailed(ref e) | Error::BusReadFailed(ref e) => Some(e),
            Error::InvalidParameter(..) => None,
        }
    }
}

impl<I: std::error::Error + Send + Sync + 'static> From<Error<I>> for io::Error {
    fn from(e: Error<I>) -> io::Error {
        match e {
            Error::BusWriteFailed(e) | Error::BusReadFailed(e) => io::Error::new(io::ErrorKind::Other, e),
            Error::InvalidParameter(e) => io::Error::new(io::ErrorKind::InvalidInput, e),
        }
    }
}

/// A caller supplied parameter outside of the 0-255 byte range.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Error)]
#[error("parameter `{name}` out of range: {value} (expected 0-255)")]
pub struct ParameterError {
    /// Name of the offending parameter
    pub name: &'static str,
    /// The rejected value
    pub value: i64,
}

/// DDC/CI reply envelope errors
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Error)]
pub enum ErrorCode {
    /// Reply shorter than its own length byte claims
    #[error("invalid DDC/CI length")]
    InvalidLength,
    /// Reply length byte is missing the 0x80 marker
    #[error("expected DDC/CI length bit")]
    InvalidLengthBit,
    /// Checksum mismatch
    #[error("DDC/CI checksum mismatch")]
    InvalidChecksum,
}
