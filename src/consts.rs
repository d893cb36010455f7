//! Constants used across the beacon implementation.
//!
//! This module defines the fixed sizes of the transmit schedule, the timing
//! of the tick interrupt, and the margins the scheduler keeps so that the
//! producer (main loop) can never overtake the consumer (timer interrupt).
//!
//! ## Key Concepts
//!
//! - **Schedule**: 256 one-bit elements stored as 32 groups of 8 bits. The two
//!   cursors are 8-bit counters, so the ring size is the counter range.
//! - **Ticks**: one firing of the timer interrupt, 120 ms by default.
//! - **Slow factor**: the callsign is keyed once every 25 ticks, payload once
//!   every tick.
//! - **Margins**: the refill threshold and the guard added to a reading's
//!   length before it is allowed to run into the callsign deadline.

use crate::timer::{ticks_per_interval, timer_reload};

/// Number of elements in the transmit schedule.
///
/// Equal to the range of the `u8` cursors: wrap-around of the cursors *is*
/// the ring arithmetic.
pub const SCHEDULE_BITS: usize = 256;

/// Elements per storage group.
pub const GROUP_BITS: u8 = 8;

/// Number of storage groups backing the schedule.
pub const SCHEDULE_GROUPS: usize = SCHEDULE_BITS / GROUP_BITS as usize;

/// Elements the producer may have in flight at most.
///
/// One group short of the full ring, so the write cursor can never step into
/// the group the read cursor is still draining.
pub const SCHEDULE_CAPACITY: u8 = (SCHEDULE_BITS - GROUP_BITS as usize) as u8;

/// Bytes of element pattern per codebook entry.
pub const PATTERN_BYTES: usize = 4;

/// Longest pattern a codebook entry can hold.
pub const MAX_PATTERN_ELEMENTS: u8 = (PATTERN_BYTES * 8) as u8;

/// Largest reading the encoder accepts (five decimal digits).
pub const MAX_READING: u32 = 99_999;

/// Decimal digits in the largest reading.
pub const READING_DIGITS: usize = 5;

/// Symbols in the longest encoded reading: prefix, five digits, suffix.
pub const MAX_ENCODED_SYMBOLS: usize = 8;

/// Raw id that terminates a symbol sequence on the wire.
pub const TERMINATOR: u8 = 0xff;

/// Milliseconds per timer tick.
pub const MS_PER_TICK: u16 = 120;

/// Milliseconds between callsigns (ten minutes).
pub const MS_PER_CALLSIGN: u32 = 10 * 60 * 1000;

/// Ticks between callsigns.
pub const TICKS_PER_CALLSIGN: u16 = ticks_per_interval(MS_PER_CALLSIGN, MS_PER_TICK);

/// Oscillator frequency of the reference board, in Hz.
pub const F_OSC: u32 = 8_000_000;

/// Timer prescaler of the reference board.
pub const TIMER_PRESCALER: u32 = 4;

/// Value written to the 16-bit tick timer on every re-arm.
pub const TIMER_RELOAD: u16 = timer_reload(F_OSC, TIMER_PRESCALER, MS_PER_TICK);

/// Ticks per callsign element (about three seconds per element).
pub const CALLSIGN_SLOW_FACTOR: u8 = 25;

/// Ticks per payload element.
pub const ALTITUDE_SLOW_FACTOR: u8 = 1;

/// Refill threshold while payload is keyed: about three seconds of elements.
pub const REFILL_MARGIN: u8 = 25;

/// Refill threshold while a callsign drains at slow speed.
pub const SLOW_REFILL_MARGIN: u8 = 1;

/// Ticks added to a reading's length when checking it against the callsign
/// deadline.
pub const CALLSIGN_GUARD: u16 = 25;
