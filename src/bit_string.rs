use std::fmt;
use std::str::FromStr;

use num_bigint::BigUint;
use serde::{Serialize, Serializer};
use winnow::ModalResult;
use winnow::combinator::{alt, repeat};
use winnow::prelude::*;

use crate::error::{Error, Result};

/// A fixed-length sequence of bits supplied by an entropy source.
///
/// Nothing is assumed about its structure beyond the length.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct BitString {
    bits: Vec<bool>,
}

impl BitString {
    pub fn new(bits: Vec<bool>) -> Self {
        Self { bits }
    }

    pub fn len(&self) -> usize {
        self.bits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bits.is_empty()
    }

    pub fn as_bits(&self) -> &[bool] {
        &self.bits
    }

    /// Borrow `len` bits starting at `start`.
    ///
    /// Panics if the window extends past the end.
    pub fn window(&self, start: usize, len: usize) -> &[bool] {
        &self.bits[start..start + len]
    }

    /// Parse text made only of `0` and `1`.
    ///
    /// # Errors
    /// Returns [`Error::InvalidBitString`] on an empty string or any other
    /// character, reporting the offending position.
    pub fn parse(s: &str) -> Result<Self> {
        fn bit(input: &mut &str) -> ModalResult<bool> {
            alt(('0'.value(false), '1'.value(true))).parse_next(input)
        }

        let mut input = s;
        let bits: Vec<bool> = repeat(0.., bit)
            .parse_next(&mut input)
            .map_err(|_| Error::InvalidBitString {
                position: 0,
                found: s.chars().next(),
            })?;

        if !input.is_empty() || bits.is_empty() {
            return Err(Error::InvalidBitString {
                position: s.len() - input.len(),
                found: input.chars().next(),
            });
        }

        Ok(Self { bits })
    }
}

/// Interpret `bits` as a big-endian unsigned integer. An empty slice is zero.
pub fn to_biguint_be(bits: &[bool]) -> BigUint {
    let pad = (8 - bits.len() % 8) % 8;
    let padded: Vec<bool> = std::iter::repeat_n(false, pad)
        .chain(bits.iter().copied())
        .collect();
    let bytes: Vec<u8> = padded
        .chunks(8)
        .map(|chunk| chunk.iter().fold(0u8, |byte, &bit| (byte << 1) | bit as u8))
        .collect();
    BigUint::from_bytes_be(&bytes)
}

impl From<Vec<bool>> for BitString {
    fn from(bits: Vec<bool>) -> Self {
        Self::new(bits)
    }
}

impl FromStr for BitString {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl fmt::Display for BitString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for &bit in &self.bits {
            f.write_str(if bit { "1" } else { "0" })?;
        }
        Ok(())
    }
}

impl Serialize for BitString {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn parses_binary_text() {
        let bits: BitString = "1011".parse().unwrap();
        assert_eq!(bits.as_bits(), &[true, false, true, true]);
        assert_eq!(bits.to_string(), "1011");
    }

    #[test]
    fn rejects_foreign_character() {
        assert_eq!(
            BitString::parse("10201"),
            Err(Error::InvalidBitString {
                position: 2,
                found: Some('2'),
            })
        );
    }

    #[test]
    fn rejects_empty_string() {
        assert_eq!(
            BitString::parse(""),
            Err(Error::InvalidBitString {
                position: 0,
                found: None,
            })
        );
    }

    #[test]
    fn rejects_whitespace() {
        assert!(BitString::parse("01 10").is_err());
    }

    #[test]
    fn big_endian_values() {
        assert_eq!(to_biguint_be(&[]), BigUint::from(0u32));
        assert_eq!(to_biguint_be(&[true]), BigUint::from(1u32));
        assert_eq!(to_biguint_be(&[true, false]), BigUint::from(2u32));
        assert_eq!(
            to_biguint_be(&[true, false, false, false, false, false, false, false, true]),
            BigUint::from(257u32)
        );
    }

    #[test]
    fn windows_are_contiguous() {
        let bits: BitString = "110010".parse().unwrap();
        assert_eq!(bits.window(0, 2), &[true, true]);
        assert_eq!(bits.window(2, 2), &[false, false]);
        assert_eq!(bits.window(4, 2), &[true, false]);
    }

    proptest! {
        #[test]
        fn matches_u64_radix_parsing(text in "[01]{1,64}") {
            let bits = BitString::parse(&text).unwrap();
            let expected = u64::from_str_radix(&text, 2).unwrap();
            prop_assert_eq!(to_biguint_be(bits.as_bits()), BigUint::from(expected));
            prop_assert_eq!(bits.to_string(), text);
        }
    }
}
