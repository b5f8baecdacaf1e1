#![deny(missing_docs)]

//! Issue LG vendor DDC/CI commands and read the EDID over I2C.
//!
//! # Example
//!
//! ```rust,no_run
//! use lgddc::{LgDdc, commands};
//!
//! # #[cfg(feature = "i2c-linux")] fn lgddc() {
//! let mut ddc = LgDdc::from_bus(4).unwrap();
//! let model = ddc.execute(commands::GetModelString).unwrap();
//! println!("model: {}", model.to_ascii_lossy());
//! # }
//! ```

use std::time::Duration;
use log::{debug, trace};

/// EDID EEPROM I2C address
pub const I2C_ADDRESS_EDID: u16 = 0x50;

/// DDC/CI command and control I2C address
pub const I2C_ADDRESS_DDC_CI: u16 = 0x37;

/// Number of EDID bytes read in one block
pub const EDID_LEN: usize = 0x82;

pub mod commands;
pub use commands::{Command, CommandResult, Reply};

mod delay;
pub use delay::{Sleep, ThreadSleep, Timing, DELAY_COMMAND_SETTLE_MS, DELAY_EDID_SETTLE_MS};

mod error;
pub use error::{Error, ErrorCode, ParameterError};

pub mod frame;
pub use frame::{Frame, HexBytes};

/// A handle to issue LG DDC/CI commands on an I2C bus.
///
/// The handle owns the bus for its whole lifetime. A transaction holds
/// `&mut self` across its write, settle delay and read, so requests through
/// one handle can never interleave.
#[derive(Clone, Debug)]
pub struct LgDdc<I, S = ThreadSleep> {
    inner: I,
    sleeper: S,
    timing: Timing,
}

/// LG DDC/CI on Linux i2c-dev
#[cfg(feature = "i2c-linux")]
pub type I2cDeviceLgDdc = LgDdc<i2c_linux::I2c<std::fs::File>>;

#[cfg(feature = "i2c-linux")]
impl LgDdc<i2c_linux::I2c<std::fs::File>> {
    /// Open a new handle with the specified I2C device node path
    pub fn from_path<P: AsRef<std::path::Path>>(p: P) -> std::io::Result<Self> {
        Ok(LgDdc::new(i2c_linux::I2c::from_path(p)?))
    }

    /// Open `/dev/i2c-<bus>`
    pub fn from_bus(bus: u32) -> std::io::Result<Self> {
        Self::from_path(format!("/dev/i2c-{}", bus))
    }
}

impl<I> LgDdc<I> {
    /// Create a new handle with an existing open device.
    pub fn new(i2c: I) -> Self {
        LgDdc::with_sleeper(i2c, ThreadSleep)
    }
}

impl<I, S> LgDdc<I, S> {
    /// Create a new handle that waits out settle delays with `sleeper`.
    pub fn with_sleeper(i2c: I, sleeper: S) -> Self {
        LgDdc {
            inner: i2c,
            sleeper: sleeper,
            timing: Default::default(),
        }
    }

    /// Replace the settle delays.
    pub fn with_timing(mut self, timing: Timing) -> Self {
        self.timing = timing;
        self
    }

    /// The settle delays in use.
    pub fn timing(&self) -> &Timing {
        &self.timing
    }

    /// Consume the handle to return the inner device.
    pub fn into_inner(self) -> I {
        self.inner
    }

    /// Borrow the inner device.
    pub fn inner_ref(&self) -> &I {
        &self.inner
    }

    /// Mutably borrow the inner device.
    pub fn inner_mut(&mut self) -> &mut I {
        &mut self.inner
    }
}

impl<I: i2c::Address + i2c::ReadWrite, S: Sleep> LgDdc<I, S> {
    /// Execute a catalog command. See the `commands` module for all available
    /// commands. The return type is dependent on the executed command.
    ///
    /// # Example
    ///
    /// ```rust,no_run
    /// use lgddc::{LgDdc, commands};
    ///
    /// # #[cfg(feature = "i2c-linux")] fn lgddc() {
    /// let mut ddc = LgDdc::from_bus(4).unwrap();
    /// ddc.execute(commands::SelectLanguage::new(2)).unwrap();
    /// # }
    /// ```
    pub fn execute<C: Command>(&mut self, command: C) -> Result<C::Ok, Error<I::Error>> {
        let frame = command.frame();
        let reply = self.transact(I2C_ADDRESS_DDC_CI, &frame, C::REPLY_LEN)?;

        Ok(C::Ok::from_reply(reply))
    }

    /// Perform one request/response cycle with a prebuilt frame.
    ///
    /// Writes `frame` to `address`. When `reply_len` is zero nothing is read
    /// and an empty buffer is returned, otherwise the configured command
    /// settle delay is waited out and exactly `reply_len` bytes are read back.
    /// The reply is returned as-is without any validation.
    pub fn transact(&mut self, address: u16, frame: &Frame, reply_len: usize) -> Result<Vec<u8>, Error<I::Error>> {
        debug!("write: {}", HexBytes(frame));
        self.write(address, frame)?;

        if reply_len == 0 {
            return Ok(Vec::new())
        }

        let delay = self.timing.command_settle;
        self.settle(delay);

        let mut reply = vec![0u8; reply_len];
        self.read(address, &mut reply)?;
        debug!("read: {}", HexBytes(&reply));

        Ok(reply)
    }

    /// Select the active video input.
    pub fn input_select(&mut self, display: u8) -> Result<Reply, Error<I::Error>> {
        self.execute(commands::InputSelect::new(display))
    }

    /// Reset the monitor settings to factory defaults.
    pub fn system_reset(&mut self) -> Result<Reply, Error<I::Error>> {
        self.execute(commands::SystemReset)
    }

    /// Select the on-screen display language.
    pub fn select_language(&mut self, language: u8) -> Result<(), Error<I::Error>> {
        self.execute(commands::SelectLanguage::new(language))
    }

    /// Read the raw model string reply.
    pub fn get_model_str(&mut self) -> Result<Reply, Error<I::Error>> {
        self.execute(commands::GetModelString)
    }

    /// Read one page of the internal EEPROM.
    pub fn read_eeprom(&mut self, adh: u8, adl: u8) -> Result<Reply, Error<I::Error>> {
        self.execute(commands::ReadEeprom::new(adh, adl))
    }

    /// Read the raw EDID block.
    ///
    /// This resets the EDID register pointer with a single zero byte, waits
    /// for the EDID settle delay, then reads `EDID_LEN` bytes. No DDC/CI
    /// framing is involved and the bytes are not validated.
    ///
    /// # Example
    ///
    /// ```rust,no_run
    /// use lgddc::LgDdc;
    ///
    /// # #[cfg(feature = "i2c-linux")] fn lgddc() {
    /// let mut ddc = LgDdc::from_bus(4).unwrap();
    /// let edid = ddc.read_edid().unwrap();
    ///
    /// println!("EDID: {:?}", &edid[..]);
    /// # }
    /// ```
    pub fn read_edid(&mut self) -> Result<Vec<u8>, Error<I::Error>> {
        let pointer = [0x00];
        debug!("write: {}", HexBytes(&pointer));
        self.write(I2C_ADDRESS_EDID, &pointer)?;

        let delay = self.timing.edid_settle;
        self.settle(delay);

        let mut edid = vec![0u8; EDID_LEN];
        self.read(I2C_ADDRESS_EDID, &mut edid)?;
        debug!("read: {}", HexBytes(&edid));

        Ok(edid)
    }

    fn write(&mut self, address: u16, data: &[u8]) -> Result<(), Error<I::Error>> {
        self.inner.set_slave_address(address, false).map_err(Error::BusWriteFailed)?;
        self.inner.i2c_write(data).map_err(Error::BusWriteFailed)
    }

    fn read(&mut self, address: u16, data: &mut [u8]) -> Result<usize, Error<I::Error>> {
        self.inner.set_slave_address(address, false).map_err(Error::BusReadFailed)?;
        self.inner.i2c_read(data).map_err(Error::BusReadFailed)
    }

    fn settle(&mut self, delay: Duration) {
        trace!("settle {:?}", delay);
        self.sleeper.sleep(delay)
    }
}
