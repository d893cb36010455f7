use crate::beacon::{Beacon, Transmission};
use crate::config::BeaconConfig;
use crate::error::BeaconError;
use crate::sensor::{Sensor, read_altitude};
use crate::timer::TickTimer;
use core::cell::RefCell;
use critical_section::Mutex;
use embedded_hal::digital::OutputPin;

/// A beacon shared between the timer interrupt and the main loop.
pub type GlobalBeacon<OUT, TIM> = Mutex<RefCell<Option<Beacon<OUT, TIM>>>>;

/// Used to initialize the global static `Beacon` for use with
/// `critical_section`.
///
/// # Returns
/// * An empty mutable ref-cell
///
/// # Example
/// ```rust
/// use eoss_beacon::timer::{GlobalBeacon, NoopTimer, global_beacon_init};
/// use embedded_hal_mock::eh1::digital::Mock as Pin;
///
/// static BEACON: GlobalBeacon<Pin, NoopTimer> = global_beacon_init();
/// ```
pub const fn global_beacon_init<OUT: OutputPin, TIM: TickTimer>() -> GlobalBeacon<OUT, TIM> {
    Mutex::new(RefCell::new(None))
}

/// Builds the beacon and stores it in the global.
///
/// # Arguments
/// * The global static `Beacon`
/// * The keyed output pin
/// * The tick timer
/// * The beacon configuration
///
/// # Errors
/// [`BeaconError::InvalidConfig`] if the configuration is rejected; the
/// global stays empty.
///
/// # Example
/// ```rust,ignore
/// fn main() {
///     global_beacon_setup(&BEACON, morse_pin, timer0, BeaconConfig::DEFAULT).unwrap();
/// }
/// ```
pub fn global_beacon_setup<OUT: OutputPin, TIM: TickTimer>(
    global_beacon: &'static GlobalBeacon<OUT, TIM>,
    out: OUT,
    timer: TIM,
    config: BeaconConfig,
) -> Result<(), BeaconError> {
    let beacon = Beacon::new(out, timer, config)?;
    critical_section::with(|cs| {
        let _ = global_beacon.borrow(cs).replace(Some(beacon));
    });
    Ok(())
}

/// Runs the tick at each interrupt
///
/// # Arguments
/// * The global static `Beacon`
///
/// # Example
/// ```rust,ignore
/// #[interrupt]
/// fn TIMER0() {
///     global_beacon_tick(&BEACON);
/// }
/// ```
pub fn global_beacon_tick<OUT: OutputPin, TIM: TickTimer>(
    global_beacon: &'static GlobalBeacon<OUT, TIM>,
) {
    critical_section::with(|cs| {
        if let Some(beacon) = global_beacon.borrow(cs).borrow_mut().as_mut() {
            beacon.tick();
        }
    });
}

/// Runs one main-loop iteration against the global beacon.
///
/// The refill decision, the push, and the sensor-slot check each take a
/// short critical section. The sensor itself is sampled and stored with
/// interrupts enabled, so a slow bus transaction never delays a tick.
///
/// # Returns
/// What was queued, if anything. `Ok(None)` as well when the global has not
/// been set up yet.
///
/// # Errors
/// [`BeaconError::Overrun`] signals a scheduling bug and should stop the
/// beacon.
///
/// # Example
/// ```rust,ignore
/// loop {
///     global_beacon_poll(&BEACON, &mut bmp085)?;
/// }
/// ```
pub fn global_beacon_poll<OUT: OutputPin, TIM: TickTimer, S: Sensor>(
    global_beacon: &'static GlobalBeacon<OUT, TIM>,
    sensor: &mut S,
) -> Result<Option<Transmission>, BeaconError> {
    let refill = with_beacon(global_beacon, |beacon| beacon.needs_refill()).unwrap_or(false);

    let mut sent = None;
    if refill {
        let altitude = read_altitude(sensor);
        sent = with_beacon(global_beacon, |beacon| match altitude {
            Some(altitude) => beacon.submit_reading(altitude).map(Some),
            None => beacon.submit_miss(),
        })
        .transpose()?
        .flatten();
    }

    if let Some(tick) = with_beacon(global_beacon, |beacon| beacon.store_due()).flatten() {
        sensor.store(tick);
    }
    Ok(sent)
}

fn with_beacon<OUT: OutputPin, TIM: TickTimer, R>(
    global_beacon: &'static GlobalBeacon<OUT, TIM>,
    f: impl FnOnce(&mut Beacon<OUT, TIM>) -> R,
) -> Option<R> {
    critical_section::with(|cs| global_beacon.borrow(cs).borrow_mut().as_mut().map(f))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{RecordingPin, ScriptedSensor};
    use crate::timer::NoopTimer;
    use embedded_hal_mock::eh1::digital::{
        Mock as PinMock, State as PinState, Transaction as PinTransaction,
    };

    static BEACON: GlobalBeacon<PinMock, NoopTimer> = global_beacon_init();
    static EMPTY: GlobalBeacon<PinMock, NoopTimer> = global_beacon_init();

    #[test]
    fn test_global_beacon_lifecycle() {
        // initial low, then 24 skipped ticks and one slow element (W = .--, a mark)
        let out = PinMock::new(&[
            PinTransaction::set(PinState::Low),
            PinTransaction::set(PinState::High),
        ]);
        global_beacon_setup(&BEACON, out, NoopTimer, BeaconConfig::DEFAULT).unwrap();

        let mut sensor = ScriptedSensor::steady(101_325);
        assert_eq!(
            global_beacon_poll(&BEACON, &mut sensor).unwrap(),
            Some(Transmission::Callsign { elements: 84 })
        );
        assert_eq!(sensor.stored, vec![0]);

        for _ in 0..25 {
            global_beacon_tick(&BEACON);
        }
        assert_eq!(global_beacon_poll(&BEACON, &mut sensor).unwrap(), None);

        critical_section::with(|cs| {
            let mut cell = BEACON.borrow(cs).borrow_mut();
            let beacon = cell.as_mut().unwrap();
            assert_eq!(beacon.schedule().bits_in_flight(), 83);
            assert_eq!(beacon.time_since_callsign(), 25);
            beacon.out.done();
        });
    }

    #[test]
    fn test_unset_global_is_inert() {
        let mut sensor = ScriptedSensor::steady(101_325);
        global_beacon_tick(&EMPTY);
        assert_eq!(global_beacon_poll(&EMPTY, &mut sensor).unwrap(), None);
        assert_eq!(sensor.samples_taken(), 0);
    }

    #[test]
    fn test_dead_sensor_still_identifies() {
        static DEAD: GlobalBeacon<RecordingPin, NoopTimer> = global_beacon_init();
        global_beacon_setup(&DEAD, RecordingPin::default(), NoopTimer, BeaconConfig::DEFAULT)
            .unwrap();
        let mut sensor = ScriptedSensor::new(&[Err(nb::Error::Other(()))]);
        assert_eq!(
            global_beacon_poll(&DEAD, &mut sensor).unwrap(),
            Some(Transmission::Callsign { elements: 84 })
        );
        assert_eq!(sensor.samples_taken(), 1);
        critical_section::with(|cs| {
            let cell = DEAD.borrow(cs).borrow();
            let beacon = cell.as_ref().unwrap();
            assert_eq!(beacon.sensor_misses, 1);
            assert_eq!(beacon.callsigns_sent, 1);
        });
    }

    #[test]
    fn test_setup_rejects_bad_config() {
        static REJECTED: GlobalBeacon<RecordingPin, NoopTimer> = global_beacon_init();
        let config = BeaconConfig {
            callsign: &[],
            ..BeaconConfig::DEFAULT
        };
        assert!(global_beacon_setup(&REJECTED, RecordingPin::default(), NoopTimer, config).is_err());
        critical_section::with(|cs| assert!(REJECTED.borrow(cs).borrow().is_none()));
    }
}
