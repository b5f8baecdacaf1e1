//! The LG vendor opcode catalog.
//!
//! Every command is a direct binding of an opcode and two parameter bytes to
//! the generic transaction in [`LgDdc::execute`](../struct.LgDdc.html#method.execute).
//! Nothing here touches the bus.

#![allow(missing_docs)]
use std::{fmt, iter, ops};
use crate::frame::{self, HexBytes, LENGTH_BIT};
use crate::{ErrorCode, ParameterError, I2C_ADDRESS_DDC_CI};

/// A single LG DDC/CI command.
pub trait Command {
    /// Decoded result of executing the command.
    type Ok: CommandResult;
    /// Opcode byte placed after the command tag.
    const OPCODE: u8;
    /// Number of reply bytes to read back; zero means write-only.
    const REPLY_LEN: usize;

    /// The `(param_high, param_low)` bytes of the frame.
    fn params(&self) -> (u8, u8);

    /// Encode the command into a frame for the DDC/CI address.
    fn frame(&self) -> frame::Frame {
        let (high, low) = self.params();
        frame::Frame::encode(I2C_ADDRESS_DDC_CI as u8, Self::OPCODE, high, low)
    }
}

/// Conversion from the raw bytes read back for a command.
pub trait CommandResult: Sized {
    /// Build the result from exactly `REPLY_LEN` raw bytes.
    fn from_reply(data: Vec<u8>) -> Self;
}

impl CommandResult for () {
    fn from_reply(_data: Vec<u8>) -> Self { }
}

impl CommandResult for Reply {
    fn from_reply(data: Vec<u8>) -> Self {
        Reply(data)
    }
}

/// Validate a caller supplied value as a single parameter byte.
pub fn param_byte(name: &'static str, value: i64) -> Result<u8, ParameterError> {
    if value < 0 || value > 0xff {
        Err(ParameterError { name: name, value: value })
    } else {
        Ok(value as u8)
    }
}

/// Select the active video input.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct InputSelect {
    pub display: u8,
}

impl InputSelect {
    pub fn new(display: u8) -> Self {
        InputSelect {
            display: display,
        }
    }

    pub fn from_index(display: i64) -> Result<Self, ParameterError> {
        param_byte("display", display).map(Self::new)
    }
}

impl Command for InputSelect {
    type Ok = Reply;
    const OPCODE: u8 = 0xf4;
    const REPLY_LEN: usize = 0x26;

    fn params(&self) -> (u8, u8) { (0x00, self.display) }
}

/// Factory style reset of the monitor settings.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct SystemReset;

impl Command for SystemReset {
    type Ok = Reply;
    const OPCODE: u8 = 0xf5;
    const REPLY_LEN: usize = 0x10;

    fn params(&self) -> (u8, u8) { (0x00, 0x00) }
}

/// Select the on-screen display language by index.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct SelectLanguage {
    pub language: u8,
}

impl SelectLanguage {
    pub fn new(language: u8) -> Self {
        SelectLanguage {
            language: language,
        }
    }

    pub fn from_index(language: i64) -> Result<Self, ParameterError> {
        param_byte("language", language).map(Self::new)
    }
}

impl Command for SelectLanguage {
    type Ok = ();
    const OPCODE: u8 = 0x68;
    const REPLY_LEN: usize = 0;

    fn params(&self) -> (u8, u8) { (0x00, self.language) }
}

/// Request the model name string.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct GetModelString;

impl Command for GetModelString {
    type Ok = Reply;
    const OPCODE: u8 = 0xca;
    const REPLY_LEN: usize = 0x26;

    fn params(&self) -> (u8, u8) { (0x00, 0x00) }
}

/// Read one 128 byte page of the monitor's internal EEPROM.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct ReadEeprom {
    pub adh: u8,
    pub adl: u8,
}

impl ReadEeprom {
    pub fn new(adh: u8, adl: u8) -> Self {
        ReadEeprom {
            adh: adh,
            adl: adl,
        }
    }

    pub fn from_address(adh: i64, adl: i64) -> Result<Self, ParameterError> {
        Ok(Self::new(param_byte("adh", adh)?, param_byte("adl", adl)?))
    }

    /// The combined 16-bit page address.
    pub fn address(&self) -> u16 {
        ((self.adh as u16) << 8) | self.adl as u16
    }
}

impl Command for ReadEeprom {
    type Ok = Reply;
    const OPCODE: u8 = 0xe7;
    const REPLY_LEN: usize = 0x80;

    fn params(&self) -> (u8, u8) { (self.adh, self.adl) }
}

/// First and one-past-last high address bytes of the EEPROM dump.
pub const EEPROM_ADH_RANGE: ops::Range<u8> = 0xa0..0xb0;

/// Low address bytes read for every high address.
pub const EEPROM_ADL_PAGES: [u8; 2] = [0x00, 0x80];

/// Every page of a full EEPROM dump, in read order.
///
/// `adh` steps through `0xa0, 0xa2, ... 0xae`, each split into the `0x00` and
/// `0x80` halves. Callers execute these one at a time.
pub fn eeprom_pages() -> impl Iterator<Item=ReadEeprom> {
    EEPROM_ADH_RANGE.step_by(2)
        .flat_map(|adh| EEPROM_ADL_PAGES.iter().map(move |&adl| ReadEeprom::new(adh, adl)))
}

/// Raw reply bytes read back from the monitor.
///
/// The transport never validates these; [`payload`](#method.payload) can be
/// used to opportunistically decode a DDC/CI reply envelope.
#[derive(Clone, PartialEq, Eq, Hash, Default)]
pub struct Reply(Vec<u8>);

impl Reply {
    /// Exactly the bytes that were read.
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn into_inner(self) -> Vec<u8> {
        self.0
    }

    /// Decode `[source, 0x80 | len, payload.., checksum]`.
    ///
    /// The checksum is the xor of the virtual host address with every byte
    /// preceding it, source address included.
    pub fn payload(&self) -> Result<&[u8], ErrorCode> {
        let data = &self.0[..];
        if data.len() < 2 {
            return Err(ErrorCode::InvalidLength)
        }

        if data[1] & LENGTH_BIT == 0 {
            return Err(ErrorCode::InvalidLengthBit)
        }

        let len = (data[1] & !LENGTH_BIT) as usize;
        if data.len() < len + 3 {
            return Err(ErrorCode::InvalidLength)
        }

        let checksum = iter::once(frame::SOURCE_ADDRESS_HOST)
            .chain(data[..2 + len].iter().cloned())
            .fold(0u8, |sum, v| sum ^ v);

        if data[2 + len] != checksum {
            return Err(ErrorCode::InvalidChecksum)
        }

        Ok(&data[2..2 + len])
    }

    /// Printable ASCII rendering, with other bytes shown as `.`.
    pub fn to_ascii_lossy(&self) -> String {
        self.0.iter()
            .map(|&b| if b.is_ascii_graphic() || b == b' ' { b as char } else { '.' })
            .collect()
    }
}

impl ops::Deref for Reply {
    type Target = [u8];

    fn deref(&self) -> &[u8] {
        &self.0
    }
}

impl From<Vec<u8>> for Reply {
    fn from(data: Vec<u8>) -> Self {
        Reply(data)
    }
}

impl fmt::Debug for Reply {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Reply({})", HexBytes(&self.0))
    }
}

impl<'a, C: Command> Command for &'a C {
    type Ok = C::Ok;
    const OPCODE: u8 = C::OPCODE;
    const REPLY_LEN: usize = C::REPLY_LEN;

    fn params(&self) -> (u8, u8) { (*self).params() }
}
