//! Host-side doubles shared by the unit tests.

use core::convert::Infallible;

use embedded_hal::digital::{ErrorType, OutputPin};

use crate::sensor::{Sample, Sensor};
use crate::timer::TickTimer;

/// Output pin that records every level it is driven to.
#[derive(Debug, Default)]
pub(crate) struct RecordingPin {
    pub(crate) levels: Vec<bool>,
}

impl ErrorType for RecordingPin {
    type Error = Infallible;
}

impl OutputPin for RecordingPin {
    fn set_low(&mut self) -> Result<(), Self::Error> {
        self.levels.push(false);
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), Self::Error> {
        self.levels.push(true);
        Ok(())
    }
}

/// Tick timer that counts re-arms.
#[derive(Debug, Default)]
pub(crate) struct CountingTimer {
    pub(crate) rearms: u32,
    pub(crate) last_reload: Option<u16>,
}

impl TickTimer for CountingTimer {
    fn rearm(&mut self, reload: u16) {
        self.rearms += 1;
        self.last_reload = Some(reload);
    }
}

/// Sensor replaying a fixed list of pressures, then repeating the last one.
#[derive(Debug)]
pub(crate) struct ScriptedSensor {
    script: Vec<nb::Result<i32, ()>>,
    taken: usize,
    pub(crate) stored: Vec<u16>,
}

impl ScriptedSensor {
    pub(crate) fn new(script: &[nb::Result<i32, ()>]) -> Self {
        Self {
            script: script.to_vec(),
            taken: 0,
            stored: Vec::new(),
        }
    }

    /// A sensor that always reports `pressure`.
    pub(crate) fn steady(pressure: i32) -> Self {
        Self::new(&[Ok(pressure)])
    }

    pub(crate) fn samples_taken(&self) -> usize {
        self.taken
    }
}

impl Sensor for ScriptedSensor {
    type Error = ();

    fn sample(&mut self) -> nb::Result<Sample, ()> {
        let step = self
            .script
            .get(self.taken)
            .or(self.script.last())
            .cloned()
            .unwrap_or(Err(nb::Error::WouldBlock));
        self.taken += 1;
        step.map(|pressure| Sample {
            temperature: 215,
            pressure,
        })
    }

    fn store(&mut self, tick: u16) {
        self.stored.push(tick);
    }
}
