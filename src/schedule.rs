//! The transmit schedule: a 256-element ring of signal elements.
//!
//! The schedule sits between the main loop, which pushes whole symbol
//! sequences, and the timer interrupt, which steps out one element per
//! accepted tick. Elements are single bits packed into 32 groups of eight.
//!
//! ## Cursors
//!
//! The read cursor (`tx_pos`) and write cursor (`write_pos`) are 8-bit
//! [`Wrapping`] counters. Their range is exactly the ring size, so
//! `write_pos - tx_pos` is the number of elements in flight and wrap-around
//! needs no masking. Bits 7..3 of a cursor select the group, bits 2..0 the
//! element inside it.
//!
//! ## Clearing
//!
//! Pushing ORs an element into its group, so consumed elements must be wiped
//! before the write cursor comes round again. A group is cleared as soon as
//! its last element has been stepped out, never earlier: clearing a partially
//! read group would erase elements that are still queued.
//!
//! ## Capacity
//!
//! The producer may have at most [`SCHEDULE_CAPACITY`] (248) elements in
//! flight. Keeping one group in reserve guarantees the write cursor never
//! enters the group the read cursor is still draining, so the two sides
//! never touch the same group at the same time.

use core::num::Wrapping;

use crate::codebook::{Pattern, Symbol, lookup};
use crate::consts::{GROUP_BITS, SCHEDULE_CAPACITY, SCHEDULE_GROUPS};
use crate::encoding::length_of;
use crate::error::BeaconError;

/// Ring of pending signal elements with independent read and write cursors.
#[derive(Debug, Clone)]
pub struct ScheduleBuffer {
    groups: [u8; SCHEDULE_GROUPS],
    tx_pos: Wrapping<u8>,
    write_pos: Wrapping<u8>,
}

impl Default for ScheduleBuffer {
    fn default() -> Self {
        Self::new()
    }
}

impl ScheduleBuffer {
    /// Creates an empty, fully cleared schedule.
    pub const fn new() -> Self {
        Self {
            groups: [0; SCHEDULE_GROUPS],
            tx_pos: Wrapping(0),
            write_pos: Wrapping(0),
        }
    }

    /// Elements pushed but not yet stepped out.
    pub fn bits_in_flight(&self) -> u8 {
        (self.write_pos - self.tx_pos).0
    }

    /// Elements that can still be pushed without overtaking the reader.
    pub fn headroom(&self) -> u8 {
        SCHEDULE_CAPACITY.saturating_sub(self.bits_in_flight())
    }

    /// `true` when every pushed element has been stepped out.
    pub fn is_empty(&self) -> bool {
        self.write_pos == self.tx_pos
    }

    /// The read cursor.
    pub fn tx_pos(&self) -> u8 {
        self.tx_pos.0
    }

    /// The write cursor.
    pub fn write_pos(&self) -> u8 {
        self.write_pos.0
    }

    /// Raw group storage, for schedule dumps.
    pub fn groups(&self) -> &[u8; SCHEDULE_GROUPS] {
        &self.groups
    }

    /// Appends one element at the write cursor.
    ///
    /// # Errors
    /// [`BeaconError::Overrun`] if the schedule has no headroom left. Nothing
    /// is written in that case.
    pub fn push(&mut self, bit: bool) -> Result<(), BeaconError> {
        if self.headroom() == 0 {
            return Err(BeaconError::Overrun {
                needed: 1,
                headroom: 0,
            });
        }
        self.write(bit);
        Ok(())
    }

    /// Appends every element of `pattern`.
    ///
    /// # Errors
    /// [`BeaconError::Overrun`] if the whole pattern does not fit. Nothing is
    /// written in that case.
    pub fn push_pattern(&mut self, pattern: &Pattern) -> Result<(), BeaconError> {
        self.reserve(u16::from(pattern.len()))?;
        pattern.elements().for_each(|bit| self.write(bit));
        Ok(())
    }

    /// Appends the elements of every symbol in `symbols`, in order.
    ///
    /// The headroom check covers the whole sequence before the first element
    /// is written, so a sequence is either queued completely or not at all.
    ///
    /// # Returns
    /// The number of elements queued.
    ///
    /// # Errors
    /// [`BeaconError::Overrun`] if the sequence does not fit.
    pub fn push_symbols(&mut self, symbols: &[Symbol]) -> Result<u16, BeaconError> {
        let needed = length_of(symbols);
        self.reserve(needed)?;
        for &symbol in symbols {
            lookup(symbol).elements().for_each(|bit| self.write(bit));
        }
        Ok(needed)
    }

    /// Takes the element under the read cursor.
    ///
    /// Advances the read cursor and, once the last element of a group has
    /// been taken, clears that group. On an empty schedule the cursor stays
    /// put and the idle level (`false`) is returned.
    pub fn step(&mut self) -> bool {
        if self.is_empty() {
            return false;
        }
        let pos = self.tx_pos.0;
        let group = usize::from(pos >> 3);
        let bit = (self.groups[group] >> (pos & 0x07)) & 0x01 != 0;
        self.tx_pos += Wrapping(1);
        if self.tx_pos.0 % GROUP_BITS == 0 {
            self.groups[group] = 0;
        }
        bit
    }

    fn reserve(&self, needed: u16) -> Result<(), BeaconError> {
        let headroom = self.headroom();
        if needed > u16::from(headroom) {
            return Err(BeaconError::Overrun { needed, headroom });
        }
        Ok(())
    }

    fn write(&mut self, bit: bool) {
        let pos = self.write_pos.0;
        self.groups[usize::from(pos >> 3)] |= u8::from(bit) << (pos & 0x07);
        self.write_pos += Wrapping(1);
    }
}
