//! Beacon configuration.
//!
//! All values are fixed at build time on the reference hardware; they are
//! gathered in [`BeaconConfig`] so that a board can override them and so
//! that [`BeaconConfig::validate`] can prove, before the first tick, that the
//! scheduler can never overrun the transmit schedule.

use crate::codebook::Symbol;
use crate::consts::{
    ALTITUDE_SLOW_FACTOR, CALLSIGN_GUARD, CALLSIGN_SLOW_FACTOR, MS_PER_TICK, REFILL_MARGIN,
    SCHEDULE_CAPACITY, SLOW_REFILL_MARGIN, TICKS_PER_CALLSIGN, TIMER_RELOAD,
};
use crate::encoding::{MAX_READING_ELEMENTS, length_of};
use crate::error::BeaconError;

/// Timing and content parameters of the beacon.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BeaconConfig {
    /// Tick period in milliseconds. Informational; the timer reload sets it.
    pub tick_ms: u16,
    /// Value written to the tick timer on every re-arm.
    pub timer_reload: u16,
    /// Ticks between the starts of two callsigns.
    pub callsign_interval: u16,
    /// Identification phrase keyed at the slow cadence.
    pub callsign: &'static [Symbol],
    /// Ticks per payload element.
    pub fast_factor: u8,
    /// Ticks per identification element.
    pub slow_factor: u8,
    /// Refill when at most this many payload elements remain queued.
    pub refill_margin: u8,
    /// Refill threshold while an identification sequence is in flight.
    pub slow_refill_margin: u8,
    /// Ticks added to a reading's length when checking the callsign deadline.
    pub callsign_guard: u16,
}

impl BeaconConfig {
    /// The reference beacon: 120 ms ticks, a callsign every 5000 ticks
    /// keyed 25 times slower than the altitude.
    pub const DEFAULT: BeaconConfig = BeaconConfig {
        tick_ms: MS_PER_TICK,
        timer_reload: TIMER_RELOAD,
        callsign_interval: TICKS_PER_CALLSIGN,
        callsign: &Symbol::CALLSIGN,
        fast_factor: ALTITUDE_SLOW_FACTOR,
        slow_factor: CALLSIGN_SLOW_FACTOR,
        refill_margin: REFILL_MARGIN,
        slow_refill_margin: SLOW_REFILL_MARGIN,
        callsign_guard: CALLSIGN_GUARD,
    };

    /// Checks that the scheduler can run this configuration without ever
    /// overrunning the schedule.
    ///
    /// Every push happens only once the queue has drained to the refill
    /// margin, so the margin plus the longest sequence ever pushed must fit
    /// in the schedule.
    ///
    /// # Errors
    /// [`BeaconError::InvalidConfig`] naming the first violated rule.
    pub fn validate(&self) -> Result<(), BeaconError> {
        if self.fast_factor == 0 || self.slow_factor == 0 {
            return Err(BeaconError::InvalidConfig("skip factors must be at least 1"));
        }
        if self.callsign.is_empty() {
            return Err(BeaconError::InvalidConfig("callsign is empty"));
        }
        if self.slow_refill_margin > self.refill_margin {
            return Err(BeaconError::InvalidConfig(
                "slow refill margin exceeds the payload refill margin",
            ));
        }
        if self.callsign_interval <= self.callsign_guard {
            return Err(BeaconError::InvalidConfig(
                "callsign interval must exceed the callsign guard",
            ));
        }

        let capacity = u16::from(SCHEDULE_CAPACITY);
        let margin = u16::from(self.refill_margin);
        if length_of(self.callsign) + margin > capacity {
            return Err(BeaconError::InvalidConfig(
                "callsign does not fit in the schedule",
            ));
        }
        if MAX_READING_ELEMENTS + margin > capacity {
            return Err(BeaconError::InvalidConfig(
                "refill margin leaves no room for a full reading",
            ));
        }
        Ok(())
    }
}

impl Default for BeaconConfig {
    fn default() -> Self {
        Self::DEFAULT
    }
}
