//! Morse altitude beacon: the interrupt-side stepper and the main-loop
//! transmission scheduler.
//!
//! This module provides the [`Beacon`] struct, which keys an altitude reading
//! in Morse on a single output line and, every few minutes, replaces the
//! reading with a slowly keyed station identification.
//!
//! The beacon is driven from two places:
//!
//! - [`tick()`](Beacon::tick) on every timer interrupt. It re-arms the timer,
//!   counts the tick, and keys at most one element from the schedule.
//! - [`poll()`](Beacon::poll) (or the finer-grained
//!   [`needs_refill()`](Beacon::needs_refill) and
//!   [`submit_reading()`](Beacon::submit_reading)) from the main loop. It
//!   tops up the schedule whenever it has nearly drained.
//!
//! ## Example
//!
//! ```rust
//! # use embedded_hal_mock::eh1::digital::{Mock as Pin, State as PinState, Transaction as PinTransaction};
//! use eoss_beacon::beacon::{Beacon, Transmission};
//! use eoss_beacon::config::BeaconConfig;
//! use eoss_beacon::timer::NoopTimer;
//!
//! fn main() {
//!     # let out = Pin::new(&[PinTransaction::set(PinState::Low)]);
//!     let mut beacon = Beacon::new(out, NoopTimer, BeaconConfig::DEFAULT).unwrap();
//!
//!     // Straight after boot the callsign is due, so it preempts the reading.
//!     let sent = beacon.submit_reading(1234).unwrap();
//!     assert!(matches!(sent, Transmission::Callsign { elements: 84 }));
//!     # beacon.out.done();
//! }
//! ```
//!
//! ## Design Notes
//!
//! The schedule cursors each have one writer: the write cursor belongs to the
//! main loop, the read cursor to [`tick()`](Beacon::tick). The slow-element
//! count belongs to the rate governor inside `tick()`; the main loop only
//! files a request. What is left, `time_since_callsign`, is reset by the
//! main loop and counted by the interrupt, so callers sharing a beacon
//! between the two contexts must hold a critical section around every call
//! (see [`crate::timer`]).
//!
//! Elements queued before a callsign are keyed at the slow cadence too,
//! because slow mode starts on the tick after the request, not when the
//! callsign's first element comes up. The skew is at most one refill margin
//! of elements.

use core::num::Wrapping;

use embedded_hal::digital::OutputPin;

use crate::config::BeaconConfig;
use crate::encoding::{encode_literal, encode_reading, length_of};
use crate::error::BeaconError;
use crate::governor::RateGovernor;
use crate::schedule::ScheduleBuffer;
use crate::sensor::{Sensor, read_altitude};
use crate::timer::TickTimer;

/// What the scheduler queued on one refill.
#[derive(PartialEq, Eq, Clone, Copy, Debug)]
#[cfg_attr(feature = "defmt-0-3", derive(defmt::Format))]
pub enum Transmission {
    /// An altitude reading.
    Reading {
        /// The reading, in metres.
        altitude: u32,
        /// Elements queued.
        elements: u16,
    },
    /// The station identification, keyed at the slow cadence. The reading
    /// that triggered the refill was dropped.
    Callsign {
        /// Elements queued.
        elements: u16,
    },
}

/// A Morse beacon keying altitude readings and a periodic callsign.
///
/// ## Type Parameters
///
/// - `OUT`: A type implementing [`embedded_hal::digital::OutputPin`] used for
///   the keyed line (`HIGH` = mark)
/// - `TIM`: A [`TickTimer`] re-armed on every tick
#[derive(Debug)]
pub struct Beacon<OUT, TIM>
where
    OUT: OutputPin,
    TIM: TickTimer,
{
    /// Keyed output line
    pub out: OUT,
    /// Tick timer
    pub timer: TIM,
    config: BeaconConfig,
    schedule: ScheduleBuffer,
    governor: RateGovernor,

    /// Ticks since the last callsign was queued. Free running.
    time_since_callsign: Wrapping<u16>,

    /// Low byte of `time_since_callsign` at which the sensor slot comes round.
    next_reading_time: u8,
    first_callsign: bool,
    last_store: Option<u16>,

    /// Readings queued since boot.
    pub readings_sent: u16,

    /// Callsigns queued since boot.
    pub callsigns_sent: u16,

    /// Refills that found no reading available.
    pub sensor_misses: u16,
}

impl<OUT, TIM> Beacon<OUT, TIM>
where
    OUT: OutputPin,
    TIM: TickTimer,
{
    /// Creates a beacon and arms the tick timer.
    ///
    /// # Arguments
    /// - `out`: the keyed output line
    /// - `timer`: the tick timer, armed once here with the configured reload
    /// - `config`: timing and content parameters
    ///
    /// # Errors
    /// [`BeaconError::InvalidConfig`] if `config` fails
    /// [`BeaconConfig::validate`].
    ///
    /// # Notes
    /// The line is driven `LOW` initially, and the elapsed time is set past
    /// the callsign interval so the first refill sends the callsign.
    pub fn new(out: OUT, timer: TIM, config: BeaconConfig) -> Result<Self, BeaconError> {
        config.validate()?;
        let mut beacon = Self {
            out,
            timer,
            config,
            schedule: ScheduleBuffer::new(),
            governor: RateGovernor::new(config.fast_factor, config.slow_factor),
            time_since_callsign: Wrapping(config.callsign_interval.wrapping_add(1)),
            next_reading_time: 0,
            first_callsign: true,
            last_store: None,
            readings_sent: 0,
            callsigns_sent: 0,
            sensor_misses: 0,
        };
        beacon.write_out(false);
        beacon.timer.rearm(config.timer_reload);
        info!(
            "beacon: tick {} ms, callsign every {} ticks",
            config.tick_ms,
            config.callsign_interval
        );
        Ok(beacon)
    }

    /// The configuration in use.
    pub fn config(&self) -> &BeaconConfig {
        &self.config
    }

    /// The transmit schedule, for inspection and dumps.
    pub fn schedule(&self) -> &ScheduleBuffer {
        &self.schedule
    }

    /// The rate governor, for inspection.
    pub fn governor(&self) -> &RateGovernor {
        &self.governor
    }

    /// Ticks since the last callsign was queued.
    pub fn time_since_callsign(&self) -> u16 {
        self.time_since_callsign.0
    }

    fn write_out(&mut self, mark: bool) {
        let _ = if mark {
            self.out.set_high()
        } else {
            self.out.set_low()
        };
    }

    /// Advances the beacon by one timer tick.
    ///
    /// Re-arms the timer, counts the tick, and keys the next scheduled
    /// element unless the rate governor skips this tick. Bounded time, no
    /// I/O apart from the output line.
    ///
    /// # Timing
    /// Must be called once per timer period, ideally from the timer interrupt.
    pub fn tick(&mut self) {
        self.timer.rearm(self.config.timer_reload);
        self.time_since_callsign += Wrapping(1);
        if self.governor.accept() {
            let bit = self.schedule.step();
            self.write_out(bit);
        }
    }

    /// Whether the schedule has drained far enough to queue the next reading.
    ///
    /// The threshold is the payload refill margin, or the smaller slow margin
    /// while a callsign is being keyed: slow elements drain predictably, so
    /// the queue can run nearly dry before it is topped up.
    pub fn needs_refill(&self) -> bool {
        let margin = if self.governor.is_slow() {
            self.config.slow_refill_margin
        } else {
            self.config.refill_margin
        };
        self.schedule.bits_in_flight() <= margin
    }

    /// Whether keying a reading of `elements` would run into the callsign
    /// deadline.
    pub fn callsign_due(&self, elements: u16) -> bool {
        u32::from(self.time_since_callsign.0)
            + u32::from(elements)
            + u32::from(self.config.callsign_guard)
            > u32::from(self.config.callsign_interval)
    }

    /// Queues a fresh reading, or the callsign if it is due.
    ///
    /// The reading is encoded first so its length can be checked against the
    /// callsign deadline. If it would not finish in time, the callsign is
    /// queued instead and the reading is dropped.
    ///
    /// # Errors
    /// - [`BeaconError::ReadingOutOfRange`] for readings above 99 999
    /// - [`BeaconError::Overrun`] if called while the schedule is still too
    ///   full; check [`needs_refill()`](Self::needs_refill) first
    pub fn submit_reading(&mut self, altitude: u32) -> Result<Transmission, BeaconError> {
        let encoded = encode_reading(altitude)?;
        let elements = length_of(&encoded);

        if self.callsign_due(elements) {
            let elements = self.send_callsign()?;
            return Ok(Transmission::Callsign { elements });
        }

        let _ = self.schedule.push_symbols(&encoded)?;
        self.readings_sent = self.readings_sent.wrapping_add(1);
        debug!(
            "beacon: altitude {} m, {} elements, {} in flight",
            altitude,
            elements,
            self.schedule.bits_in_flight()
        );
        Ok(Transmission::Reading { altitude, elements })
    }

    /// Queues the identification sequence and starts the callsign interval
    /// over.
    ///
    /// The slow cadence is requested for the callsign's element count; the
    /// stepper adopts it on its next tick.
    ///
    /// # Returns
    /// The number of elements queued.
    ///
    /// # Errors
    /// [`BeaconError::Overrun`] if the callsign does not fit. Nothing is
    /// queued or reset in that case.
    pub fn send_callsign(&mut self) -> Result<u16, BeaconError> {
        let phrase = encode_literal(self.config.callsign);
        let elements = self.schedule.push_symbols(phrase)?;

        // Keep the sensor slot at the same point of the free-running tick count.
        self.next_reading_time = self
            .next_reading_time
            .wrapping_sub(self.time_since_callsign.0 as u8);
        self.time_since_callsign = Wrapping(0);
        if self.first_callsign {
            self.next_reading_time = 0;
            self.first_callsign = false;
        }

        self.governor.request_slow(elements);
        self.callsigns_sent = self.callsigns_sent.wrapping_add(1);
        info!("beacon: callsign queued, {} slow elements", elements);
        Ok(elements)
    }

    /// Reports whether the sensor slot has come round.
    ///
    /// The slot recurs every 256 ticks, when the low byte of
    /// `time_since_callsign` equals the scheduled reading time. Each slot is
    /// reported once, however often the main loop asks during that tick.
    ///
    /// # Returns
    /// The tick count at the slot, or `None` if it is not due.
    pub fn store_due(&mut self) -> Option<u16> {
        let now = self.time_since_callsign.0;
        if now as u8 != self.next_reading_time || self.last_store == Some(now) {
            return None;
        }
        self.last_store = Some(now);
        Some(now)
    }

    /// Runs one main-loop iteration against `sensor`.
    ///
    /// If the schedule needs a refill, samples the sensor and queues the
    /// reading (or the callsign). Then hands the sensor slot to
    /// [`Sensor::store`] when it is due.
    ///
    /// Only suitable when the caller owns the beacon outright, e.g. with the
    /// blocking loop. When `tick()` runs in an interrupt, use
    /// `global_beacon_poll` so the sensor I/O happens outside the critical
    /// section.
    ///
    /// # Returns
    /// What was queued, if anything.
    ///
    /// # Errors
    /// [`BeaconError::Overrun`] signals a scheduling bug and should stop the
    /// beacon.
    pub fn poll<S: Sensor>(&mut self, sensor: &mut S) -> Result<Option<Transmission>, BeaconError> {
        let mut sent = None;
        if self.needs_refill() {
            debug!("beacon: refill, {} in flight", self.schedule.bits_in_flight());
            sent = match read_altitude(sensor) {
                Some(altitude) => Some(self.submit_reading(altitude)?),
                None => self.submit_miss()?,
            };
        }
        if let Some(tick) = self.store_due() {
            sensor.store(tick);
        }
        Ok(sent)
    }

    /// Handles a refill that found no reading.
    ///
    /// Counts the miss and still sends the callsign once it is due, so a dead
    /// sensor never holds back the identification.
    ///
    /// # Returns
    /// `Some(Transmission::Callsign)` if the callsign was queued.
    ///
    /// # Errors
    /// [`BeaconError::Overrun`] if the callsign does not fit.
    pub fn submit_miss(&mut self) -> Result<Option<Transmission>, BeaconError> {
        self.sensor_misses = self.sensor_misses.wrapping_add(1);
        if !self.callsign_due(0) {
            return Ok(None);
        }
        let elements = self.send_callsign()?;
        Ok(Some(Transmission::Callsign { elements }))
    }
}
