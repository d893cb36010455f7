//! Timer and tick-loop utilities for the beacon.
//!
//! The beacon advances on a fixed-period timer. This employs two approaches:
//! an interrupt service routine that shares the beacon with the main loop
//! through `critical_section::with` (`timer-isr` feature), or a busy loop that
//! ticks and polls from a single context (`delay-loop` feature).
//!
//! Contains:
//! - [`TickTimer`]: the seam the stepper uses to re-arm the hardware timer
//! - [`timer_reload`]: compile-time reload value for a 16-bit up-counter
//! - [`ticks_per_interval`]: converts a wall-clock interval into ticks
//! - `run_beacon_loop`: blocking tick/poll loop (feature `delay-loop`)
//! - `global_beacon_tick`, `global_beacon_poll` and `tick_beacon!()`:
//!   interrupt-side and main-loop-side wrappers (feature `timer-isr`)
//!
//! Reload values for an 8 MHz oscillator (2 MHz instruction clock):
//!
//! | PRESCALER | Tick    | Reload |
//! |-----------|---------|--------|
//! |         4 |  120 ms |   5536 |
//! |         4 |  100 ms |  15536 |
//! |         8 |  200 ms |  15536 |

#[cfg(feature = "delay-loop")]
mod delay;
#[cfg_attr(feature = "delay-loop", allow(unused_imports))]
#[cfg(feature = "delay-loop")]
pub use delay::*;

#[cfg(feature = "timer-isr")]
mod isr;
#[cfg_attr(feature = "timer-isr", allow(unused_imports))]
#[cfg(feature = "timer-isr")]
pub use isr::*;

#[cfg(feature = "timer-isr")]
mod macros;

/// Range of a 16-bit up-counting timer.
pub const TIMER_COUNTS: u32 = 1 << 16;

/// A periodic timer the stepper re-arms on every tick.
///
/// On parts whose timer does not reload itself the interrupt has to write the
/// start value back before returning; `rearm` is that write.
pub trait TickTimer {
    /// Restarts the count from `reload`.
    fn rearm(&mut self, reload: u16);
}

/// A tick timer for free-running or auto-reloading sources.
///
/// Use it with the blocking loop, or with hardware that reloads in silicon.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopTimer;

impl TickTimer for NoopTimer {
    fn rearm(&mut self, _reload: u16) {}
}

/// Compile-time reload value for a 16-bit up-counter that overflows after
/// `tick_ms`.
///
/// # Arguments
/// - `f_osc`: oscillator frequency in Hz; the timer counts the instruction
///   clock `f_osc / 4`
/// - `prescaler`: timer prescaler (e.g., 1, 2, 4, 8, 256)
/// - `tick_ms`: desired tick interval in milliseconds
///
/// # Returns
/// The value to write to the counter so it overflows after one tick. An
/// interval longer than the counter range yields 0, the longest possible tick.
pub const fn timer_reload(f_osc: u32, prescaler: u32, tick_ms: u16) -> u16 {
    let counts_per_second = (f_osc / 4 / prescaler) as u64;
    let counts = counts_per_second * tick_ms as u64 / 1_000;
    if counts >= TIMER_COUNTS as u64 {
        0
    } else {
        (TIMER_COUNTS as u64 - counts) as u16
    }
}

/// Number of whole ticks in `interval_ms`, saturating at `u16::MAX`.
pub const fn ticks_per_interval(interval_ms: u32, tick_ms: u16) -> u16 {
    if tick_ms == 0 {
        return u16::MAX;
    }
    let ticks = interval_ms / tick_ms as u32;
    if ticks > u16::MAX as u32 {
        u16::MAX
    } else {
        ticks as u16
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reference_reload() {
        assert_eq!(timer_reload(8_000_000, 4, 120), 5536);
        assert_eq!(timer_reload(8_000_000, 4, 100), 15536);
        assert_eq!(timer_reload(8_000_000, 8, 200), 15536);
    }

    #[test]
    fn test_reload_saturates() {
        assert_eq!(timer_reload(8_000_000, 1, 1000), 0);
    }

    #[test]
    fn test_ticks_per_interval() {
        assert_eq!(ticks_per_interval(10 * 60 * 1000, 120), 5000);
        assert_eq!(ticks_per_interval(u32::MAX, 1), u16::MAX);
        assert_eq!(ticks_per_interval(1000, 0), u16::MAX);
    }
}
