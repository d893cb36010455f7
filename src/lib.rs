//! # eoss-beacon
//!
//! A portable, no_std Rust implementation of a Morse altitude beacon for
//! high-altitude balloon payloads. The beacon keys a radio transmitter with
//! its barometric altitude in Morse code and, at a fixed interval, sends a
//! slow identification phrase (the callsign).
//!
//! The beacon is built from:
//! - `embedded-hal` traits for the keyed output line and for blocking delays
//! - a 256-element transmit schedule, stepped out one element per tick
//! - a rate governor that keys payload and callsign at different speeds
//! - interrupt-safe sharing of the beacon with `critical-section`
//! - optional tick sources using either timer interrupts or a blocking delay
//!
//! ## Crate features
//! | Feature               | Description |
//! |-----------------------|-------------|
//! | `std`                 | Disables `#![no_std]` support |
//! | `delay-loop`          | Uses `embedded_hal::delay::DelayNs` for tick timing |
//! | `timer-isr` (default) | Uses `critical_section::with` to share the beacon with the tick interrupt |
//! | `defmt-0-3`           | Uses `defmt` logging |
//! | `log`                 | Uses `log` logging |
//!
//! ## Software Features
//!
//! - **Morse codebook** covering digits, a prefix, a suffix and a three-word callsign
//! - **Leading-zero suppression** for altitude readings up to 99 999 m
//! - **Two keying speeds**: payload at one element per tick, callsign 25 times slower
//! - **Callsign budget check**: a reading that would make the callsign late is
//!   replaced by the callsign
//! - Pluggable pressure sensor with the international barometric formula
//!
//! ## Usage
//!
//! ```rust,ignore
//! use eoss_beacon::beacon::Beacon;
//! use eoss_beacon::config::BeaconConfig;
//!
//! let mut beacon = Beacon::new(morse_pin, timer0, BeaconConfig::DEFAULT)?;
//! loop {
//!     beacon.tick(); // Call every 120 ms
//!     beacon.poll(&mut bmp085)?;
//! }
//! ```
//!
//! Or, use `run_beacon_loop()` with a `DelayNs` implementation:
//!
//! ```rust,ignore
//! let err = eoss_beacon::timer::run_beacon_loop(&mut beacon, &mut bmp085, &mut delay);
//! ```
//!
//! ## Feature Flags
//!
//! - `timer-isr`: Use a hardware timer ISR to call `tick()` through `tick_beacon!()`
//!   while the main loop calls `global_beacon_poll()`
//! - `delay-loop`: Use a blocking loop to drive `tick()` and `poll()` with
//!   `embedded_hal::delay::DelayNs`
//!
//! ## Integration Notes
//!
//! - The reference board ticks every 120 ms from an 8 MHz oscillator
//! - Only `tick()` writes the output line; keep it in the interrupt
//! - Only one beacon instance should be active at a time in interrupt-driven mode
//!
//! --
//! Designed for `#![no_std]` use in resource-constrained embedded environments.

#![deny(
    bad_style,
    dead_code,
    improper_ctypes,
    non_shorthand_field_patterns,
    no_mangle_generic_items,
    overflowing_literals,
    path_statements,
    patterns_in_fns_without_body,
    unconditional_recursion,
    unused,
    while_true,
    missing_debug_implementations,
    missing_docs,
    trivial_casts,
    trivial_numeric_casts,
    unused_extern_crates,
    unused_import_braces,
    unused_qualifications,
    unused_results
)]
#![cfg_attr(not(any(feature = "std", test)), no_std)]

#[macro_use]
mod fmt;

#[cfg(feature = "timer-isr")]
pub use critical_section;

pub use heapless;

pub mod beacon;
pub mod codebook;
pub mod config;
pub mod consts;
pub mod encoding;
pub mod error;
pub mod governor;
pub mod schedule;
pub mod sensor;
pub mod timer;

#[cfg(test)]
mod testing;
