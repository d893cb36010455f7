//! Morse codebook: symbol ids and their element patterns.
//!
//! Each entry stores up to 32 signal elements, least significant bit first,
//! together with its element count. A `1` element keys the output line for
//! one element time, a `0` leaves it idle. Dots are `1`, dashes `111`, and
//! the gaps between marks and characters are runs of `0`, so every entry
//! already carries its trailing character space.
//!
//! ## Symbol Table
//!
//! | Ids     | Content |
//! |---------|---------|
//! | 0 – 9   | digits `0` to `9` |
//! | 10 – 15 | letters `A` to `F` |
//! | 16      | prefix `ALT ` |
//! | 17      | suffix `H M ` |
//! | 18 – 20 | the callsign `W0DK/B`, split across three entries |
//!
//! Ids outside the table are rejected when a [`Symbol`] is built, so
//! [`lookup`] never fails.

use crate::consts::{MAX_PATTERN_ELEMENTS, PATTERN_BYTES};
use crate::error::BeaconError;

/// A validated index into the codebook.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt-0-3", derive(defmt::Format))]
pub struct Symbol(u8);

impl Symbol {
    /// The `ALT ` block sent before every reading.
    pub const PREFIX: Symbol = Symbol(16);

    /// The `H M ` block sent after every reading.
    pub const SUFFIX: Symbol = Symbol(17);

    /// The station identification, in transmit order.
    pub const CALLSIGN: [Symbol; 3] = [Symbol(18), Symbol(19), Symbol(20)];

    const DIGITS: [Symbol; 10] = [
        Symbol(0),
        Symbol(1),
        Symbol(2),
        Symbol(3),
        Symbol(4),
        Symbol(5),
        Symbol(6),
        Symbol(7),
        Symbol(8),
        Symbol(9),
    ];

    /// Validates a raw id.
    ///
    /// # Errors
    /// [`BeaconError::UnknownSymbol`] if `id` has no codebook entry.
    pub const fn new(id: u8) -> Result<Self, BeaconError> {
        if (id as usize) < CODEBOOK_LEN {
            Ok(Symbol(id))
        } else {
            Err(BeaconError::UnknownSymbol(id))
        }
    }

    /// The symbol for a decimal digit. Only the last decimal digit of `d` is used.
    pub const fn digit(d: u8) -> Self {
        Self::DIGITS[(d % 10) as usize]
    }

    /// The raw id.
    pub const fn id(self) -> u8 {
        self.0
    }

    /// The text this symbol keys, for diagnostics.
    pub fn label(self) -> &'static str {
        LABELS[self.0 as usize]
    }
}

/// The elements of one codebook entry.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Pattern {
    bits: [u8; PATTERN_BYTES],
    len: u8,
}

impl Pattern {
    const fn new(bits: [u8; PATTERN_BYTES], len: u8) -> Self {
        Self { bits, len }
    }

    /// Number of elements in the pattern.
    pub const fn len(&self) -> u8 {
        self.len
    }

    /// `true` for a pattern without elements. No codebook entry is empty.
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Element `i`, or `false` past the end of the pattern.
    pub const fn element(&self, i: u8) -> bool {
        if i >= self.len {
            return false;
        }
        (self.bits[(i >> 3) as usize] >> (i & 0x07)) & 0x01 != 0
    }

    /// Iterates the elements in transmit order.
    pub fn elements(&self) -> impl Iterator<Item = bool> + '_ {
        (0..self.len).map(move |i| self.element(i))
    }
}

const CODEBOOK_LEN: usize = 21;

const TABLE: [Pattern; CODEBOOK_LEN] = [
    Pattern::new([0x77, 0x77, 0x07, 0x00], 22), // 0
    Pattern::new([0xdd, 0xdd, 0x01, 0x00], 20), // 1
    Pattern::new([0x75, 0x77, 0x00, 0x00], 18), // 2
    Pattern::new([0xd5, 0x1d, 0x00, 0x00], 16), // 3
    Pattern::new([0x55, 0x07, 0x00, 0x00], 14), // 4
    Pattern::new([0x55, 0x01, 0x00, 0x00], 12), // 5
    Pattern::new([0x57, 0x05, 0x00, 0x00], 14), // 6
    Pattern::new([0x77, 0x15, 0x00, 0x00], 16), // 7
    Pattern::new([0x77, 0x57, 0x00, 0x00], 18), // 8
    Pattern::new([0x77, 0x77, 0x01, 0x00], 20), // 9
    Pattern::new([0x1d, 0x00, 0x00, 0x00], 8),  // A
    Pattern::new([0x57, 0x01, 0x00, 0x00], 12), // B
    Pattern::new([0xd7, 0x05, 0x00, 0x00], 14), // C
    Pattern::new([0x57, 0x00, 0x00, 0x00], 10), // D
    Pattern::new([0x01, 0x00, 0x00, 0x00], 4),  // E
    Pattern::new([0x75, 0x01, 0x00, 0x00], 12), // F
    Pattern::new([0x1d, 0x5d, 0x71, 0x00], 30), // ALT
    Pattern::new([0x55, 0xc0, 0x1d, 0x00], 28), // H M
    Pattern::new([0xdd, 0x71, 0x77, 0x77], 32), // W0DK/B, first part
    Pattern::new([0x5c, 0x71, 0x1d, 0x57], 32), // W0DK/B, second part
    Pattern::new([0x17, 0x57, 0x01, 0x00], 20), // W0DK/B, third part
];

static CODEBOOK: [Pattern; CODEBOOK_LEN] = TABLE;

static LABELS: [&str; CODEBOOK_LEN] = [
    "0", "1", "2", "3", "4", "5", "6", "7", "8", "9", "A", "B", "C", "D", "E", "F", "ALT ",
    "H M ", "W0DK/B (1/3)", "W0DK/B (2/3)", "W0DK/B (3/3)",
];

// Every entry must fit its storage and key at least one element.
const _: () = {
    let mut i = 0;
    while i < CODEBOOK_LEN {
        let len = TABLE[i].len;
        assert!(len >= 1 && len <= MAX_PATTERN_ELEMENTS);
        i += 1;
    }
};

/// Element count of `symbol`, usable in constant expressions.
pub(crate) const fn pattern_len(symbol: Symbol) -> u8 {
    TABLE[symbol.0 as usize].len
}

/// Returns the pattern keyed for `symbol`.
pub fn lookup(symbol: Symbol) -> &'static Pattern {
    &CODEBOOK[symbol.0 as usize]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_symbol_validation() {
        assert_eq!(Symbol::new(0), Ok(Symbol::digit(0)));
        assert_eq!(Symbol::new(20), Ok(Symbol::CALLSIGN[2]));
        assert_eq!(Symbol::new(21), Err(BeaconError::UnknownSymbol(21)));
        assert_eq!(Symbol::new(0xff), Err(BeaconError::UnknownSymbol(0xff)));
    }

    #[test]
    fn test_digit_symbols_map_to_ids() {
        for d in 0..10 {
            assert_eq!(Symbol::digit(d).id(), d);
        }
        assert_eq!(Symbol::digit(7).label(), "7");
        assert_eq!(Symbol::PREFIX.label(), "ALT ");
    }

    #[test]
    fn test_zero_is_five_dashes() {
        let zero: Vec<bool> = lookup(Symbol::digit(0)).elements().collect();
        let mut expected = Vec::new();
        for _ in 0..5 {
            expected.extend_from_slice(&[true, true, true, false]);
        }
        // last mark space plus two more make the character space
        expected.extend_from_slice(&[false, false]);
        assert_eq!(zero, expected);
    }

    #[test]
    fn test_letter_e_is_a_dot() {
        let e = lookup(Symbol::new(14).unwrap());
        assert_eq!(e.len(), 4);
        assert_eq!(e.elements().collect::<Vec<_>>(), vec![true, false, false, false]);
    }

    #[test]
    fn test_no_entry_is_empty() {
        for id in 0..CODEBOOK_LEN as u8 {
            let pattern = lookup(Symbol::new(id).unwrap());
            assert!(!pattern.is_empty(), "symbol {id}");
            assert_eq!(pattern.elements().count(), usize::from(pattern.len()));
        }
    }

    #[test]
    fn test_element_past_end_is_idle() {
        let a = lookup(Symbol::new(10).unwrap());
        assert!(a.element(0));
        assert!(!a.element(a.len()));
        assert!(!a.element(31));
    }

    #[test]
    fn test_callsign_lengths() {
        let total: u16 = Symbol::CALLSIGN
            .iter()
            .map(|&s| u16::from(lookup(s).len()))
            .sum();
        assert_eq!(total, 84);
    }
}
