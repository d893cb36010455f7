/// Declares a static global `BEACON` instance protected by a `critical_section` mutex.
///
/// This macro creates a `static` singleton `BEACON` suitable for use in
/// interrupt-based environments, where both the main loop and the timer ISR
/// need to safely access the shared beacon state.
///
/// # Arguments
/// - `$out`: The concrete type of the keyed output pin (must implement `OutputPin`)
/// - `$tim`: The concrete type of the tick timer (must implement `TickTimer`)
///
/// # Example
/// ```rust
/// use embedded_hal_mock::eh1::digital::Mock as Pin;
/// use eoss_beacon::init_beacon;
/// use eoss_beacon::timer::NoopTimer;
///
/// init_beacon!(Pin, NoopTimer);
/// ```
#[macro_export]
macro_rules! init_beacon {
    ( $out:ty, $tim:ty ) => {
        pub static BEACON: $crate::timer::GlobalBeacon<$out, $tim> =
            $crate::timer::global_beacon_init::<$out, $tim>();
    };
}

/// Builds the beacon and stores it in the global `BEACON`.
///
/// Expands to a call to [`global_beacon_setup`](crate::timer::global_beacon_setup)
/// and evaluates to its `Result`. The configuration defaults to
/// [`BeaconConfig::DEFAULT`](crate::config::BeaconConfig::DEFAULT).
///
/// # Example
/// ```rust,ignore
/// setup_beacon!(morse_pin, timer0).unwrap();
/// setup_beacon!(morse_pin, timer0, MY_CONFIG).unwrap();
/// ```
///
/// # Notes
/// - Requires `init_beacon!` to have been used earlier.
#[macro_export]
macro_rules! setup_beacon {
    ( $out:expr, $tim:expr ) => {
        $crate::timer::global_beacon_setup(
            &BEACON,
            $out,
            $tim,
            $crate::config::BeaconConfig::DEFAULT,
        )
    };
    ( $out:expr, $tim:expr, $config:expr ) => {
        $crate::timer::global_beacon_setup(&BEACON, $out, $tim, $config)
    };
}

/// Calls `tick()` on the global `BEACON` if it has been initialized.
///
/// This macro is intended to be invoked from the timer ISR to advance the
/// beacon once per tick (120 ms on the reference board).
///
/// # Example
/// ```rust,ignore
/// #[interrupt]
/// fn TIMER0() {
///     tick_beacon!();
/// }
/// ```
///
/// # Notes
/// - This macro assumes `BEACON` was declared with `init_beacon!`
///   and initialized via `setup_beacon!`.
/// - Safe to call repeatedly; does nothing until the beacon has been set up.
#[macro_export]
macro_rules! tick_beacon {
    () => {
        $crate::timer::global_beacon_tick(&BEACON)
    };
}

#[cfg(test)]
mod tests {
    use crate::beacon::Transmission;
    use crate::testing::{CountingTimer, RecordingPin, ScriptedSensor};
    use crate::timer::global_beacon_poll;

    init_beacon!(RecordingPin, CountingTimer);

    #[test]
    fn test_macros_drive_global_beacon() {
        setup_beacon!(RecordingPin::default(), CountingTimer::default()).unwrap();
        let mut sensor = ScriptedSensor::steady(101_325);
        assert!(matches!(
            global_beacon_poll(&BEACON, &mut sensor).unwrap(),
            Some(Transmission::Callsign { .. })
        ));
        for _ in 0..50 {
            tick_beacon!();
        }
        critical_section::with(|cs| {
            let cell = BEACON.borrow(cs).borrow();
            let beacon = cell.as_ref().unwrap();
            assert_eq!(beacon.timer.rearms, 51);
            assert_eq!(beacon.schedule().bits_in_flight(), 82);
        });
    }
}
