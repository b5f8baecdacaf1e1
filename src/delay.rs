use std::thread;
use std::time::Duration;

/// Time the monitor needs between a command write and its reply read.
pub const DELAY_COMMAND_SETTLE_MS: u64 = 500;

/// Time between resetting the EDID register pointer and reading the block.
pub const DELAY_EDID_SETTLE_MS: u64 = 150;

/// Settle delays applied between writes and their following reads.
///
/// These are empirical hardware latencies rather than protocol values.
/// Shortening them tends to read back stale or empty buffers.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct Timing {
    /// Wait after a DDC/CI command write before reading its reply.
    pub command_settle: Duration,
    /// Wait after the EDID pointer write before reading the block.
    pub edid_settle: Duration,
}

impl Default for Timing {
    fn default() -> Self {
        Timing {
            command_settle: Duration::from_millis(DELAY_COMMAND_SETTLE_MS),
            edid_settle: Duration::from_millis(DELAY_EDID_SETTLE_MS),
        }
    }
}

/// Something that can block the calling thread for a settle delay.
pub trait Sleep {
    /// Block for `duration`.
    fn sleep(&mut self, duration: Duration);
}

/// Blocks with `std::thread::sleep`.
#[derive(Copy, Clone, Debug, Default)]
pub struct ThreadSleep;

impl Sleep for ThreadSleep {
    fn sleep(&mut self, duration: Duration) {
        thread::sleep(duration)
    }
}

impl<'a, S: Sleep + ?Sized> Sleep for &'a mut S {
    fn sleep(&mut self, duration: Duration) {
        (**self).sleep(duration)
    }
}
