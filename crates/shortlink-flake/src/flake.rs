use crate::{
    clock::{Clock, SystemClock},
    error::Error,
    FlakeId,
};
use jiff::Timestamp;
use std::sync::Mutex;
use typed_builder::TypedBuilder;

/// Width of one time slot in milliseconds.
pub(crate) const TIME_UNIT_MS: i64 = 10;
const MAX_ELAPSED_UNITS: i64 = (1_i64 << 39) - 1;
const MAX_SEQUENCE: u8 = u8::MAX;

/// 2014-09-01T00:00:00Z, the default zero point of the elapsed-time field.
pub const DEFAULT_EPOCH: Timestamp = Timestamp::constant(1_409_529_600, 0);

/// Configures a Flake generator instance.
#[derive(Debug, Clone, Copy, TypedBuilder)]
pub struct FlakeSettings {
    /// Identifies this generator. Every concurrently running generator that
    /// shares an epoch must use a distinct value.
    pub machine_id: u16,
    /// Custom epoch used as the zero point for the 39-bit elapsed field.
    #[builder(default = DEFAULT_EPOCH)]
    pub start_epoch: Timestamp,
}

#[derive(Debug, Default)]
struct GeneratorState {
    last_elapsed: Option<i64>,
    sequence: u8,
}

/// Sonyflake-style ID generator.
///
/// The elapsed time and sequence counter form a single critical section
/// guarded by a mutex. The lock is only ever held while the clock is read
/// or while waiting out an exhausted time slot.
pub struct Flake<C: Clock> {
    start_time: Timestamp,
    machine_id: u16,
    clock: C,
    state: Mutex<GeneratorState>,
}

impl Flake<SystemClock> {
    /// Creates a generator backed by the real system clock.
    pub fn new(settings: FlakeSettings) -> Result<Self, Error> {
        Self::with_clock(settings, SystemClock)
    }
}

impl<C: Clock> Flake<C> {
    pub fn with_clock(settings: FlakeSettings, clock: C) -> Result<Self, Error> {
        let now = clock.now();
        if settings.start_epoch > now {
            return Err(Error::EpochAhead {
                epoch: settings.start_epoch,
                now,
            });
        }

        Ok(Self {
            start_time: settings.start_epoch,
            machine_id: settings.machine_id,
            clock,
            state: Mutex::new(GeneratorState::default()),
        })
    }

    pub fn machine_id(&self) -> u16 {
        self.machine_id
    }

    pub fn start_epoch(&self) -> Timestamp {
        self.start_time
    }

    /// Generates the next unique FlakeId.
    ///
    /// - if the per-slot sequence is exhausted, wait for the next slot
    /// - if the clock moved backward, fail with [`Error::ClockRegression`]
    ///   and leave the generator state untouched
    pub fn next_id(&self) -> Result<FlakeId, Error> {
        let mut state = self.state.lock().map_err(|_| Error::StatePoisoned)?;

        let mut now = self.clock.now();
        let mut elapsed = self.elapsed_units(now)?;

        match state.last_elapsed {
            None => {
                state.sequence = 0;
            }
            Some(last) if elapsed < last => {
                return Err(Error::ClockRegression {
                    now,
                    last: self.slot_start(last)?,
                });
            }
            Some(last) if elapsed == last => {
                if state.sequence < MAX_SEQUENCE {
                    state.sequence += 1;
                } else {
                    let next_slot = self.slot_start(last + 1)?;
                    while elapsed <= last {
                        self.clock.wait_until(next_slot);
                        now = self.clock.now();
                        elapsed = self.elapsed_units(now)?;
                        if elapsed < last {
                            return Err(Error::ClockRegression {
                                now,
                                last: self.slot_start(last)?,
                            });
                        }
                    }
                    state.sequence = 0;
                }
            }
            Some(_) => {
                state.sequence = 0;
            }
        }

        if elapsed > MAX_ELAPSED_UNITS {
            return Err(Error::OverTimeLimit);
        }

        let id = FlakeId::new()
            .with_elapsed(elapsed as u64)
            .with_machine_id(self.machine_id)
            .with_sequence(state.sequence);

        state.last_elapsed = Some(elapsed);

        Ok(id)
    }

    fn elapsed_units(&self, now: Timestamp) -> Result<i64, Error> {
        let elapsed_ms = now.as_millisecond() - self.start_time.as_millisecond();
        if elapsed_ms < 0 {
            return Err(Error::EpochAhead {
                epoch: self.start_time,
                now,
            });
        }
        Ok(elapsed_ms / TIME_UNIT_MS)
    }

    fn slot_start(&self, elapsed: i64) -> Result<Timestamp, Error> {
        Timestamp::from_millisecond(self.start_time.as_millisecond() + elapsed * TIME_UNIT_MS)
            .map_err(|_| Error::OverTimeLimit)
    }
}
