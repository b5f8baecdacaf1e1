//! DDC/CI command frames.
//!
//! A frame is the complete byte sequence placed on the wire for one command:
//! `[source, 0x80 | len, 0x03, opcode, param_high, param_low, checksum]`.

use std::{fmt, iter, ops};

/// Host source address that opens every command frame.
pub const SOURCE_ADDRESS_HOST: u8 = 0x50;

/// Leading body byte tagging a host-to-display command.
pub const COMMAND_TAG: u8 = 0x03;

/// Length bit set on the second byte of every frame.
pub const LENGTH_BIT: u8 = 0x80;

/// Body length: tag, opcode and two parameter bytes.
pub const BODY_LEN: usize = 4;

/// Total frame length including header and checksum.
pub const FRAME_LEN: usize = 2 + BODY_LEN + 1;

/// Fold `bytes` into a running xor seeded with the shifted device address.
pub fn checksum<II: IntoIterator<Item=u8>>(address: u8, bytes: II) -> u8 {
    iter::once(address << 1)
        .chain(bytes)
        .fold(0u8, |sum, v| sum ^ v)
}

/// A fully encoded DDC/CI command frame, checksum included.
#[derive(Copy, Clone, PartialEq, Eq, Hash)]
pub struct Frame([u8; FRAME_LEN]);

impl Frame {
    /// Encode a command destined for the device at `address`.
    ///
    /// The checksum is always recomputed here; there is no way to build a
    /// frame from caller-supplied checksum bytes.
    pub fn encode(address: u8, opcode: u8, param_high: u8, param_low: u8) -> Self {
        let body = [COMMAND_TAG, opcode, param_high, param_low];

        let mut frame = [0u8; FRAME_LEN];
        frame[0] = SOURCE_ADDRESS_HOST;
        frame[1] = LENGTH_BIT | body.len() as u8;
        frame[2..2 + BODY_LEN].copy_from_slice(&body);
        frame[FRAME_LEN - 1] = checksum(address, frame[..FRAME_LEN - 1].iter().cloned());

        Frame(frame)
    }

    /// Opcode carried by this frame.
    pub fn opcode(&self) -> u8 {
        self.0[3]
    }

    /// The trailing checksum byte.
    pub fn checksum(&self) -> u8 {
        self.0[FRAME_LEN - 1]
    }

    /// Raw bytes as written to the bus.
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }
}

impl ops::Deref for Frame {
    type Target = [u8];

    fn deref(&self) -> &[u8] {
        &self.0
    }
}

impl fmt::Debug for Frame {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Frame({})", HexBytes(&self.0))
    }
}

/// Formats bytes as space separated lowercase hex pairs.
#[derive(Copy, Clone)]
pub struct HexBytes<'a>(pub &'a [u8]);

impl<'a> fmt::Display for HexBytes<'a> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for (i, byte) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            write!(f, "{:02x}", byte)?;
        }

        Ok(())
    }
}

impl<'a> fmt::Debug for HexBytes<'a> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}
