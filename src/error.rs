//! Error type shared by every beacon module.

use thiserror::Error;

/// Everything that can go wrong inside the beacon core.
///
/// Apart from sensor trouble (which the core folds into "no reading this
/// cycle") every variant is a programming or configuration error: the
/// scheduler is built so that none of them can occur at runtime once
/// [`BeaconConfig::validate`](crate::config::BeaconConfig::validate) has
/// accepted the configuration.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt-0-3", derive(defmt::Format))]
pub enum BeaconError {
    /// A raw symbol id that has no codebook entry.
    #[error("symbol {0} is not in the codebook")]
    UnknownSymbol(u8),

    /// A reading with more than five decimal digits.
    #[error("reading {0} does not fit in five digits")]
    ReadingOutOfRange(u32),

    /// A push that would overtake elements the stepper has not consumed yet.
    #[error("schedule overrun: {needed} elements requested, {headroom} free")]
    Overrun {
        /// Elements the caller tried to enqueue.
        needed: u16,
        /// Free slots at the time of the attempt.
        headroom: u8,
    },

    /// A configuration the scheduler cannot run safely.
    #[error("invalid beacon configuration: {0}")]
    InvalidConfig(&'static str),
}
