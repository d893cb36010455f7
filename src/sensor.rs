//! Pressure sensor seam and the barometric altitude formula.
//!
//! The beacon does not drive the sensor bus itself. A board implements
//! [`Sensor`] for its pressure/temperature part (a BMP085 on the reference
//! board) and hands it to the main loop. Acquisition is non-blocking in the
//! [`nb`] sense: a sensor that is still converting answers
//! [`nb::Error::WouldBlock`] and the scheduler simply tries again on a later
//! iteration. Drivers that can only block may do so inside `sample`.

use libm::{floorf, powf};

use crate::consts::MAX_READING;

/// Sea-level standard pressure in pascal.
pub const SEA_LEVEL_PA: f32 = 101_325.0;

/// One compensated sensor reading.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt-0-3", derive(defmt::Format))]
pub struct Sample {
    /// Temperature in tenths of a degree Celsius.
    pub temperature: i32,
    /// Pressure in pascal.
    pub pressure: i32,
}

/// The pressure/temperature collaborator of the beacon.
pub trait Sensor {
    /// Bus or conversion error reported by the driver.
    type Error: core::fmt::Debug;

    /// Acquires one compensated sample.
    fn sample(&mut self) -> nb::Result<Sample, Self::Error>;

    /// Called once whenever the scheduled sample slot comes round.
    ///
    /// Boards that log readings to external memory do it here. `tick` is the
    /// value of the ticks-since-callsign counter at the slot.
    fn store(&mut self, tick: u16) {
        let _ = tick;
    }
}

/// Altitude in metres for a station pressure, by the international
/// barometric formula `44330 * (1 - (p / 101325)^0.19029)`.
///
/// # Returns
/// - `Some(altitude)` rounded to the nearest metre and clamped to `0..=99_999`
/// - `None` for a non-positive pressure, which no working sensor reports
pub fn pressure_to_altitude(pressure_pa: i32) -> Option<u32> {
    if pressure_pa <= 0 {
        return None;
    }
    let ratio = pressure_pa as f32 / SEA_LEVEL_PA;
    let metres = floorf(44_330.0 * (1.0 - powf(ratio, 0.190_29)) + 0.5);
    if metres <= 0.0 {
        Some(0)
    } else if metres >= MAX_READING as f32 {
        Some(MAX_READING)
    } else {
        Some(metres as u32)
    }
}

/// Samples `sensor` once and converts the pressure into an altitude.
///
/// A sensor that would block, reports an error, or returns an impossible
/// pressure yields `None`: the beacon then just has no new reading this
/// cycle.
pub fn read_altitude<S: Sensor>(sensor: &mut S) -> Option<u32> {
    let sample = match sensor.sample() {
        Ok(sample) => sample,
        Err(nb::Error::WouldBlock) => return None,
        Err(nb::Error::Other(_)) => {
            warn!("sensor: sample failed");
            return None;
        }
    };
    let altitude = pressure_to_altitude(sample.pressure);
    match altitude {
        Some(metres) => debug!(
            "sensor: {} Pa, {} dC -> {} m",
            sample.pressure,
            sample.temperature,
            metres
        ),
        None => warn!("sensor: rejected pressure {} Pa", sample.pressure),
    }
    altitude
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::ScriptedSensor;

    #[test]
    fn test_sea_level_is_zero() {
        assert_eq!(pressure_to_altitude(101_325), Some(0));
    }

    #[test]
    fn test_high_pressure_clamps_to_zero() {
        assert_eq!(pressure_to_altitude(104_000), Some(0));
    }

    #[test]
    fn test_half_atmosphere() {
        // about 5.5 km
        let alt = pressure_to_altitude(50_000).unwrap();
        assert!((5_560..=5_590).contains(&alt), "altitude {alt}");
    }

    #[test]
    fn test_near_vacuum_clamps() {
        let alt = pressure_to_altitude(1).unwrap();
        assert!(alt <= MAX_READING);
        assert!(alt > 35_000);
    }

    #[test]
    fn test_invalid_pressure() {
        assert_eq!(pressure_to_altitude(0), None);
        assert_eq!(pressure_to_altitude(-5), None);
    }

    #[test]
    fn test_read_altitude_folds_failures() {
        let mut sensor = ScriptedSensor::new(&[
            Err(nb::Error::WouldBlock),
            Err(nb::Error::Other(())),
            Ok(0),
            Ok(101_325),
        ]);
        assert_eq!(read_altitude(&mut sensor), None);
        assert_eq!(read_altitude(&mut sensor), None);
        assert_eq!(read_altitude(&mut sensor), None);
        assert_eq!(read_altitude(&mut sensor), Some(0));
        assert_eq!(sensor.samples_taken(), 4);
    }
}
