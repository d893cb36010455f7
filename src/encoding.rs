//! Conversion of readings and phrases into codebook symbol sequences.
//!
//! A reading is keyed as `ALT <digits> H M `: the prefix block, the decimal
//! digits most significant first, and the suffix block. Leading zeros are
//! suppressed, but the least significant digit is always sent, so a reading
//! of zero still keys one `0`.
//!
//! ## Functions
//!
//! - [`encode_reading`]: builds the symbol sequence for one reading
//! - [`encode_literal`]: passes a fixed phrase (the callsign) through
//! - [`length_of`]: element count of a sequence, used for budgeting
//! - [`parse_terminated`]: validates raw ids ending in [`TERMINATOR`]
//!
//! ## Terminator
//!
//! Sequences are bounded [`heapless::Vec`]s or slices, so their end marks the
//! end of the transmission. Raw id streams still use the `0xFF` sentinel and
//! are converted with [`parse_terminated`].

use heapless::Vec;

use crate::codebook::{Symbol, lookup, pattern_len};
use crate::consts::{MAX_ENCODED_SYMBOLS, MAX_READING, READING_DIGITS, TERMINATOR};
use crate::error::BeaconError;

/// An encoded reading, ready for the schedule.
pub type Encoded = Vec<Symbol, MAX_ENCODED_SYMBOLS>;

/// Element count of the longest reading the encoder can produce.
pub const MAX_READING_ELEMENTS: u16 = max_reading_elements();

const fn max_reading_elements() -> u16 {
    let mut widest_digit = 0;
    let mut d = 0;
    while d < 10 {
        let len = lookup_len(Symbol::digit(d));
        if len > widest_digit {
            widest_digit = len;
        }
        d += 1;
    }
    lookup_len(Symbol::PREFIX) + READING_DIGITS as u16 * widest_digit + lookup_len(Symbol::SUFFIX)
}

const fn lookup_len(symbol: Symbol) -> u16 {
    pattern_len(symbol) as u16
}

/// Encodes one reading as prefix, digits and suffix.
///
/// # Errors
/// [`BeaconError::ReadingOutOfRange`] if `value` has more than five digits.
///
/// # Example
/// ```rust
/// use eoss_beacon::codebook::Symbol;
/// use eoss_beacon::encoding::encode_reading;
///
/// let encoded = encode_reading(305).unwrap();
/// assert_eq!(
///     encoded.as_slice(),
///     &[Symbol::PREFIX, Symbol::digit(3), Symbol::digit(0), Symbol::digit(5), Symbol::SUFFIX]
/// );
/// ```
pub fn encode_reading(value: u32) -> Result<Encoded, BeaconError> {
    if value > MAX_READING {
        return Err(BeaconError::ReadingOutOfRange(value));
    }

    let mut out = Encoded::new();
    // Capacity covers prefix, five digits and suffix, so the pushes cannot fail.
    let _ = out.push(Symbol::PREFIX);

    let mut leading_zero = true;
    let mut divisor = 10_u32.pow(READING_DIGITS as u32 - 1);
    while divisor > 0 {
        let digit = ((value / divisor) % 10) as u8;
        let last = divisor == 1;
        if !(leading_zero && digit == 0 && !last) {
            let _ = out.push(Symbol::digit(digit));
            leading_zero = false;
        }
        divisor /= 10;
    }

    let _ = out.push(Symbol::SUFFIX);
    Ok(out)
}

/// Returns the identification phrase unchanged.
///
/// Phrases are built from validated [`Symbol`]s and already end where the
/// slice ends, so there is nothing to encode.
pub fn encode_literal(phrase: &[Symbol]) -> &[Symbol] {
    phrase
}

/// Total number of signal elements in `symbols`.
pub fn length_of(symbols: &[Symbol]) -> u16 {
    symbols.iter().map(|&s| u16::from(lookup(s).len())).sum()
}

/// Validates a raw id stream terminated by [`TERMINATOR`].
///
/// Ids after the terminator are ignored. A stream without a terminator is
/// read to its end.
///
/// # Errors
/// - [`BeaconError::UnknownSymbol`] for an id outside the codebook
/// - [`BeaconError::InvalidConfig`] if more than eight symbols precede the terminator
pub fn parse_terminated(ids: &[u8]) -> Result<Encoded, BeaconError> {
    let mut out = Encoded::new();
    for &id in ids.iter().take_while(|&&id| id != TERMINATOR) {
        out.push(Symbol::new(id)?)
            .map_err(|_| BeaconError::InvalidConfig("symbol sequence longer than eight symbols"))?;
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn digits(encoded: &Encoded) -> Vec<u8, MAX_ENCODED_SYMBOLS> {
        assert_eq!(encoded.first(), Some(&Symbol::PREFIX));
        assert_eq!(encoded.last(), Some(&Symbol::SUFFIX));
        encoded[1..encoded.len() - 1].iter().map(|s| s.id()).collect()
    }

    #[test]
    fn test_zero_keys_a_single_digit() {
        let encoded = encode_reading(0).unwrap();
        assert_eq!(digits(&encoded).as_slice(), &[0]);
    }

    #[test]
    fn test_internal_zero_is_kept() {
        let encoded = encode_reading(305).unwrap();
        assert_eq!(digits(&encoded).as_slice(), &[3, 0, 5]);
    }

    #[test]
    fn test_trailing_zeros_are_kept() {
        let encoded = encode_reading(10_000).unwrap();
        assert_eq!(digits(&encoded).as_slice(), &[1, 0, 0, 0, 0]);
    }

    #[test]
    fn test_five_digits() {
        let encoded = encode_reading(12_345).unwrap();
        assert_eq!(digits(&encoded).as_slice(), &[1, 2, 3, 4, 5]);
        assert_eq!(encoded.len(), 7);
    }

    #[test]
    fn test_six_digits_rejected() {
        assert_eq!(
            encode_reading(100_000),
            Err(BeaconError::ReadingOutOfRange(100_000))
        );
        assert!(encode_reading(MAX_READING).is_ok());
    }

    #[test]
    fn test_length_matches_codebook_sum() {
        let framing =
            u16::from(lookup(Symbol::PREFIX).len()) + u16::from(lookup(Symbol::SUFFIX).len());
        let digit_len: [u16; 10] =
            core::array::from_fn(|d| u16::from(lookup(Symbol::digit(d as u8)).len()));
        for v in 0..=MAX_READING {
            let expected = framing
                + v.to_string()
                    .bytes()
                    .map(|c| digit_len[usize::from(c - b'0')])
                    .sum::<u16>();
            let encoded = encode_reading(v).unwrap();
            assert_eq!(length_of(&encoded), expected, "reading {v}");
            assert!(expected <= MAX_READING_ELEMENTS);
        }
    }

    #[test]
    fn test_known_lengths() {
        // ALT (30) + 0 (22) + H M (28)
        assert_eq!(length_of(&encode_reading(0).unwrap()), 80);
        // ALT (30) + 5 (12) + H M (28)
        assert_eq!(length_of(&encode_reading(5).unwrap()), 70);
        assert_eq!(length_of(encode_literal(&Symbol::CALLSIGN)), 84);
        assert_eq!(MAX_READING_ELEMENTS, 168);
    }

    #[test]
    fn test_parse_terminated() {
        let parsed = parse_terminated(&[18, 19, 20, TERMINATOR, 3]).unwrap();
        assert_eq!(parsed.as_slice(), &Symbol::CALLSIGN);
        assert!(parse_terminated(&[TERMINATOR]).unwrap().is_empty());
        assert_eq!(
            parse_terminated(&[1, 42, TERMINATOR]),
            Err(BeaconError::UnknownSymbol(42))
        );
        assert!(parse_terminated(&[1; 9]).is_err());
    }
}
