//! Rate governor: decides on every tick whether the stepper keys an element.
//!
//! Payload is keyed at one element per `fast_factor` ticks. While a callsign
//! is owed, elements go out once every `slow_factor` ticks, which stretches
//! the identification to a cadence clearly distinguishable from the data.
//!
//! The main loop never writes the remaining slow count itself. It files a
//! request with [`RateGovernor::request_slow`] and the stepper adopts it on
//! its next tick, so the count has exactly one writer. Elements that were
//! already queued ahead of the callsign are therefore also keyed slowly; the
//! skew is bounded by the refill margin and accepted as is.

/// The two speeds of the beacon.
#[derive(PartialEq, Eq, Clone, Copy, Default, Debug)]
#[cfg_attr(feature = "defmt-0-3", derive(defmt::Format))]
pub enum RateMode {
    /// One element per `fast_factor` ticks.
    #[default]
    Fast,
    /// One element per `slow_factor` ticks until `remaining` elements have
    /// been keyed.
    Slow {
        /// Slow elements still owed to the identification sequence.
        remaining: u16,
    },
}

/// Per-tick skip decision with a FAST and a SLOW cadence.
#[derive(Debug, Clone)]
pub struct RateGovernor {
    mode: RateMode,
    phase: u8,
    fast_factor: u8,
    slow_factor: u8,
    pending: Option<u16>,
}

impl RateGovernor {
    /// Creates a governor in FAST mode.
    ///
    /// # Arguments
    /// - `fast_factor`: ticks per payload element (1 keys every tick)
    /// - `slow_factor`: ticks per identification element
    ///
    /// Factors of zero are treated as one.
    pub fn new(fast_factor: u8, slow_factor: u8) -> Self {
        let fast_factor = fast_factor.max(1);
        Self {
            mode: RateMode::Fast,
            phase: fast_factor,
            fast_factor,
            slow_factor: slow_factor.max(1),
            pending: None,
        }
    }

    /// The mode currently in effect in the stepper.
    pub fn mode(&self) -> RateMode {
        self.mode
    }

    /// `true` while slow elements are owed or a slow request is pending.
    pub fn is_slow(&self) -> bool {
        matches!(self.mode, RateMode::Slow { .. }) || self.pending.is_some_and(|n| n > 0)
    }

    /// Asks for the next `elements` accepted ticks to run at the slow cadence.
    ///
    /// Takes effect on the next call to [`accept`](Self::accept). A request
    /// replaces any request that has not been adopted yet.
    pub fn request_slow(&mut self, elements: u16) {
        self.pending = Some(elements);
    }

    /// Advances the governor by one tick.
    ///
    /// # Returns
    /// `true` if the stepper should key an element on this tick.
    pub fn accept(&mut self) -> bool {
        if let Some(elements) = self.pending.take() {
            self.mode = if elements > 0 {
                RateMode::Slow {
                    remaining: elements,
                }
            } else {
                RateMode::Fast
            };
            debug!("rate governor: slow for {} elements", elements);
        }

        let factor = match self.mode {
            RateMode::Fast => self.fast_factor,
            RateMode::Slow { .. } => self.slow_factor,
        };
        if self.phase < factor {
            self.phase += 1;
            return false;
        }

        self.phase = 1;
        if let RateMode::Slow { remaining } = self.mode {
            let remaining = remaining.saturating_sub(1);
            self.mode = if remaining == 0 {
                debug!("rate governor: back to fast");
                RateMode::Fast
            } else {
                RateMode::Slow { remaining }
            };
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::{ALTITUDE_SLOW_FACTOR, CALLSIGN_SLOW_FACTOR};

    fn accepted(gov: &mut RateGovernor, ticks: u32) -> u32 {
        (0..ticks).filter(|_| gov.accept()).count() as u32
    }

    #[test]
    fn test_fast_mode_accepts_every_tick() {
        let mut gov = RateGovernor::new(ALTITUDE_SLOW_FACTOR, CALLSIGN_SLOW_FACTOR);
        assert_eq!(accepted(&mut gov, 1000), 1000);
        assert_eq!(gov.mode(), RateMode::Fast);
    }

    #[test]
    fn test_slow_mode_accepts_one_in_twenty_five() {
        let mut gov = RateGovernor::new(ALTITUDE_SLOW_FACTOR, CALLSIGN_SLOW_FACTOR);
        gov.request_slow(u16::MAX);
        let n = accepted(&mut gov, 1000);
        assert!((39..=41).contains(&n), "accepted {n}");
        assert!(gov.is_slow());
    }

    #[test]
    fn test_slow_mode_ends_after_remaining_elements() {
        let mut gov = RateGovernor::new(1, 25);
        gov.request_slow(2);
        assert!(gov.is_slow());
        assert_eq!(gov.mode(), RateMode::Fast);

        assert_eq!(accepted(&mut gov, 25), 1);
        assert_eq!(gov.mode(), RateMode::Slow { remaining: 1 });
        assert_eq!(accepted(&mut gov, 25), 1);
        assert_eq!(gov.mode(), RateMode::Fast);
        assert!(!gov.is_slow());
        assert_eq!(accepted(&mut gov, 10), 10);
    }

    #[test]
    fn test_fast_factor_above_one() {
        let mut gov = RateGovernor::new(4, 25);
        assert_eq!(accepted(&mut gov, 400), 100);
    }

    #[test]
    fn test_zero_request_stays_fast() {
        let mut gov = RateGovernor::new(1, 25);
        gov.request_slow(0);
        assert!(!gov.is_slow());
        assert!(gov.accept());
        assert_eq!(gov.mode(), RateMode::Fast);
    }
}
