use jiff::Timestamp;
use modular_bitfield::prelude::*;
use std::cmp::Ordering;
use std::fmt;

use crate::error::Error;
use crate::flake::TIME_UNIT_MS;

/// A 64-bit time-ordered identifier.
///
/// Fields are declared least significant first, so the numeric layout is
/// `unused(1) | elapsed(39) | machine_id(16) | sequence(8)` from the top bit
/// down. Comparing two ids numerically therefore orders them by creation time.
#[bitfield]
#[repr(u64)]
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct FlakeId {
    /// 8 bits for sequence number (resets every time unit).
    pub sequence: B8,
    /// 16 bits for the machine id of the issuing generator.
    pub machine_id: B16,
    /// 39 bits for elapsed time in 10 ms units since a custom epoch.
    pub elapsed: B39,
    #[skip]
    __: B1,
}

impl FlakeId {
    /// Returns the raw integer value.
    pub fn as_u64(self) -> u64 {
        self.into()
    }

    /// Returns the creation time relative to the epoch the generator was
    /// configured with.
    pub fn created_at(&self, epoch: Timestamp) -> Result<Timestamp, Error> {
        let millis = i64::try_from(self.elapsed())
            .ok()
            .and_then(|elapsed| elapsed.checked_mul(TIME_UNIT_MS))
            .and_then(|offset| epoch.as_millisecond().checked_add(offset))
            .ok_or(Error::OverTimeLimit)?;
        Timestamp::from_millisecond(millis).map_err(|_| Error::OverTimeLimit)
    }
}

impl PartialOrd for FlakeId {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for FlakeId {
    fn cmp(&self, other: &Self) -> Ordering {
        self.as_u64().cmp(&other.as_u64())
    }
}

impl fmt::Debug for FlakeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FlakeId")
            .field("elapsed", &self.elapsed())
            .field("machine_id", &self.machine_id())
            .field("sequence", &self.sequence())
            .finish()
    }
}

impl fmt::Display for FlakeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_u64())
    }
}
