use crate::beacon::Beacon;
use crate::error::BeaconError;
use crate::sensor::Sensor;
use crate::timer::TickTimer;
use embedded_hal::delay::DelayNs;
use embedded_hal::digital::OutputPin;

/// Runs a blocking loop that ticks and polls the beacon from one context.
///
/// This is a simple timing loop for use in environments where interrupts are
/// unavailable or undesired. Each iteration calls `tick()`, runs one
/// main-loop step with `poll()`, and then waits for the configured tick
/// period using a delay provider implementing `embedded_hal::delay::DelayNs`.
///
/// # Arguments
/// - `beacon`: A mutable reference to a `Beacon` instance.
/// - `sensor`: The pressure sensor sampled on every refill.
/// - `delay`: A delay provider implementing `DelayNs`, typically from the HAL.
///
/// # Returns
/// Only on a fatal scheduling error, which it returns.
///
/// # Example
/// ```rust,ignore
/// use eoss_beacon::timer::{NoopTimer, run_beacon_loop};
/// let mut beacon = Beacon::new(morse_pin, NoopTimer, BeaconConfig::DEFAULT)?;
/// let err = run_beacon_loop(&mut beacon, &mut bmp085, &mut delay);
/// ```
///
/// # Notes
/// - Sensor I/O inside `poll()` lengthens the tick it happens in; prefer
///   interrupt-driven ticks when the timing of every element matters.
/// - Use [`NoopTimer`](crate::timer::NoopTimer) unless a hardware timer also
///   needs re-arming.
pub fn run_beacon_loop<OUT, TIM, S, D>(
    beacon: &mut Beacon<OUT, TIM>,
    sensor: &mut S,
    delay: &mut D,
) -> BeaconError
where
    OUT: OutputPin,
    TIM: TickTimer,
    S: Sensor,
    D: DelayNs,
{
    let tick_ms = u32::from(beacon.config().tick_ms);
    loop {
        beacon.tick();
        if let Err(err) = beacon.poll(sensor) {
            error!("beacon: stopped, scheduling fault");
            return err;
        }
        delay.delay_ms(tick_ms);
    }
}
