use num_bigint::BigUint;
use num_traits::{One, ToPrimitive, Zero};
use rayon::prelude::*;
use serde::{Serialize, Serializer};
use tracing::debug;

use crate::bit_string::{BitString, to_biguint_be};
use crate::combination::Combination;
use crate::error::{Error, Result};

/// Minimum number of bits `b` such that `[0, 2^b)` covers every index of a
/// universe of `universe_size` combinations, i.e. `ceil(log2(universe_size))`.
pub fn required_bits(universe_size: &BigUint) -> Result<u64> {
    if universe_size.is_zero() {
        return Err(Error::invalid("universe size must be at least 1"));
    }
    Ok((universe_size.clone() - 1u32).bits())
}

/// Bits needed to decode `selections` independent combinations.
pub fn total_bits(universe_size: &BigUint, selections: u64) -> Result<u64> {
    if selections < 1 {
        return Err(Error::invalid("number of selections must be at least 1"));
    }
    required_bits(universe_size)?
        .checked_mul(selections)
        .ok_or_else(|| Error::invalid(format!("{selections} selections overflow the bit count")))
}

/// Outcome of a single [`decode`] call.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct DecodingResult {
    combinations: Vec<Combination>,
    bits_per_selection: u64,
    total_bits_required: u64,
    #[serde(serialize_with = "serialize_decimal")]
    universe_size: BigUint,
}

impl DecodingResult {
    /// Decoded combinations in window order.
    pub fn combinations(&self) -> &[Combination] {
        &self.combinations
    }

    pub fn bits_per_selection(&self) -> u64 {
        self.bits_per_selection
    }

    pub fn total_bits_required(&self) -> u64 {
        self.total_bits_required
    }

    pub fn universe_size(&self) -> &BigUint {
        &self.universe_size
    }
}

/// Split `bits` into `selections` contiguous windows and map each one to a
/// combination through modulo-reduction indexing.
///
/// Window `i` covers bits `[i * b, (i + 1) * b)` where `b` is
/// [`required_bits`]. Its big-endian value `v` selects `lookup(v mod universe_size)`.
/// The reduction is intentionally biased when `universe_size` is not a power
/// of two; see [`ModuloBias`].
///
/// # Errors
/// [`Error::LengthMismatch`] unless `bits` has exactly
/// `total_bits(universe_size, selections)` bits. Errors from `lookup` are
/// returned unchanged.
pub fn decode<F>(
    bits: &BitString,
    universe_size: &BigUint,
    selections: u64,
    lookup: F,
) -> Result<DecodingResult>
where
    F: Fn(&BigUint) -> Result<Combination> + Sync,
{
    let bits_per_selection = required_bits(universe_size)?;
    let expected = total_bits(universe_size, selections)?;
    let actual = bits.len() as u64;
    if actual != expected {
        return Err(Error::LengthMismatch { expected, actual });
    }

    let width = bits_per_selection as usize;
    let combinations = (0..selections as usize)
        .into_par_iter()
        .map(|selection| {
            let window = bits.window(selection * width, width);
            let value = to_biguint_be(window);
            let index = &value % universe_size;
            let combination = lookup(&index)?.into_sorted();
            debug!(
                selection,
                bits = %BitString::new(window.to_vec()),
                %value,
                %index,
                %combination,
                "decoded window"
            );
            Ok(combination)
        })
        .collect::<Result<Vec<Combination>>>()?;

    Ok(DecodingResult {
        combinations,
        bits_per_selection,
        total_bits_required: expected,
        universe_size: universe_size.clone(),
    })
}

/// Bias introduced by reducing a `b`-bit value modulo the universe size.
///
/// Every index is reached `floor(2^b / u)` times, and the first
/// `surplus = 2^b mod u` indices are reached once more.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ModuloBias {
    #[serde(serialize_with = "serialize_decimal")]
    universe_size: BigUint,
    bits: u64,
    #[serde(serialize_with = "serialize_decimal")]
    surplus: BigUint,
}

impl ModuloBias {
    pub fn new(universe_size: &BigUint) -> Result<Self> {
        let bits = required_bits(universe_size)?;
        let surplus = (BigUint::one() << bits) % universe_size;
        Ok(Self {
            universe_size: universe_size.clone(),
            bits,
            surplus,
        })
    }

    pub fn bits(&self) -> u64 {
        self.bits
    }

    /// Number of over-represented indices, `2^b mod u`.
    pub fn surplus(&self) -> &BigUint {
        &self.surplus
    }

    pub fn is_uniform(&self) -> bool {
        self.surplus.is_zero()
    }

    /// `(2^b mod u) / 2^b`: the share of the `b`-bit space that lands on an
    /// over-represented index.
    pub fn bias_fraction(&self) -> f64 {
        let shift = self.bits.saturating_sub(64);
        let numerator = (self.surplus.clone() >> shift).to_u64().unwrap_or(u64::MAX) as f64;
        numerator / 2f64.powi((self.bits - shift) as i32)
    }

    /// Extra probability an over-represented index receives compared to the
    /// others, `1 / 2^b`, or zero when the reduction is uniform.
    pub fn max_index_excess(&self) -> f64 {
        if self.is_uniform() {
            return 0.0;
        }
        0.5f64.powi(i32::try_from(self.bits).unwrap_or(i32::MAX))
    }
}

pub(crate) fn serialize_decimal<S: Serializer>(
    value: &BigUint,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    serializer.collect_str(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::universe::Universe;
    use proptest::prelude::*;

    fn bits(text: &str) -> BitString {
        if text.is_empty() {
            BitString::default()
        } else {
            text.parse().unwrap()
        }
    }

    fn decode_with(universe: &Universe, text: &str, selections: u64) -> Result<DecodingResult> {
        decode(&bits(text), universe.cardinality(), selections, |index| {
            universe.combination_at(index)
        })
    }

    #[test]
    fn required_bits_small_values() {
        let cases = [(1u32, 0u64), (2, 1), (3, 2), (4, 2), (5, 3), (8, 3), (9, 4), (10, 4)];
        for (size, expected) in cases {
            assert_eq!(required_bits(&BigUint::from(size)).unwrap(), expected, "{size}");
        }
    }

    #[test]
    fn zero_universe_is_invalid() {
        assert!(matches!(
            required_bits(&BigUint::zero()),
            Err(Error::InvalidParameters { .. })
        ));
    }

    #[test]
    fn zero_selections_are_invalid() {
        assert!(matches!(
            total_bits(&BigUint::from(10u32), 0),
            Err(Error::InvalidParameters { .. })
        ));
    }

    #[test]
    fn windows_decode_in_order() {
        let universe = Universe::new(5, 2).unwrap();
        let result = decode_with(&universe, "000000011011", 3).unwrap();
        let rendered: Vec<String> = result.combinations().iter().map(|c| c.to_string()).collect();
        // 0b1011 = 11 wraps to index 1.
        assert_eq!(rendered, ["[1, 2]", "[1, 3]", "[1, 3]"]);
        assert_eq!(result.bits_per_selection(), 4);
        assert_eq!(result.total_bits_required(), 12);
        assert_eq!(result.universe_size(), &BigUint::from(10u32));
    }

    #[test]
    fn single_combination_universe_needs_no_bits() {
        let universe = Universe::new(3, 3).unwrap();
        let result = decode_with(&universe, "", 2).unwrap();
        assert_eq!(result.total_bits_required(), 0);
        assert_eq!(result.combinations().len(), 2);
        assert!(result.combinations().iter().all(|c| **c == [1, 2, 3]));
    }

    #[test]
    fn lookup_output_is_sorted() {
        let result = decode(&bits("01"), &BigUint::from(3u32), 1, |_| {
            Ok(Combination::sorted(vec![9, 4, 7]))
        })
        .unwrap();
        assert_eq!(&*result.combinations()[0], &[4, 7, 9]);
    }

    #[test]
    fn lookup_errors_propagate() {
        let size = BigUint::from(10u32);
        let err = decode(&bits("1111"), &size, 1, |index| {
            Err(Error::IndexOutOfRange {
                index: index.clone(),
                size: BigUint::from(4u32),
            })
        })
        .unwrap_err();
        assert_eq!(
            err,
            Error::IndexOutOfRange {
                index: BigUint::from(5u32),
                size: BigUint::from(4u32),
            }
        );
    }

    #[test]
    fn power_of_two_universe_is_uniform() {
        let bias = ModuloBias::new(&BigUint::from(16u32)).unwrap();
        assert!(bias.is_uniform());
        assert_eq!(bias.bias_fraction(), 0.0);
        assert_eq!(bias.max_index_excess(), 0.0);
    }

    #[test]
    fn bias_of_ten() {
        // 16 mod 10 = 6 indices are hit twice.
        let bias = ModuloBias::new(&BigUint::from(10u32)).unwrap();
        assert_eq!(bias.surplus(), &BigUint::from(6u32));
        assert_eq!(bias.bias_fraction(), 6.0 / 16.0);
        assert_eq!(bias.max_index_excess(), 1.0 / 16.0);
    }

    #[test]
    fn serializes_universe_size_as_decimal() {
        let universe = Universe::new(5, 2).unwrap();
        let result = decode_with(&universe, "0001", 1).unwrap();
        let json = serde_json::to_string(&result).unwrap();
        assert_eq!(
            json,
            r#"{"combinations":[[1,3]],"bits_per_selection":4,"total_bits_required":4,"universe_size":"10"}"#
        );
    }

    proptest! {
        #[test]
        fn bit_width_is_sufficient_and_tight(size in 1u64..=u64::MAX) {
            let b = required_bits(&BigUint::from(size)).unwrap();
            prop_assert!(BigUint::one() << b >= BigUint::from(size));
            if b > 0 {
                prop_assert!(BigUint::one() << (b - 1) < BigUint::from(size));
            }
        }

        #[test]
        fn length_must_match_exactly(
            (n, k) in (1u32..=12).prop_flat_map(|n| (Just(n), 1..=n)),
            selections in 1u64..=5,
        ) {
            let universe = Universe::new(n, k).unwrap();
            let expected = total_bits(universe.cardinality(), selections).unwrap();
            let lookup = |index: &BigUint| universe.combination_at(index);

            let long = BitString::new(vec![true; expected as usize + 1]);
            prop_assert_eq!(
                decode(&long, universe.cardinality(), selections, lookup),
                Err(Error::LengthMismatch { expected, actual: expected + 1 })
            );
            if expected > 0 {
                let short = BitString::new(vec![true; expected as usize - 1]);
                prop_assert_eq!(
                    decode(&short, universe.cardinality(), selections, lookup),
                    Err(Error::LengthMismatch { expected, actual: expected - 1 })
                );
            }
        }

        #[test]
        fn decoding_is_deterministic(raw in proptest::collection::vec(any::<bool>(), 23 * 4)) {
            let universe = Universe::new(45, 6).unwrap();
            let input = BitString::new(raw);
            let first = decode_with(&universe, &input.to_string(), 4).unwrap();
            let second = decode_with(&universe, &input.to_string(), 4).unwrap();
            prop_assert_eq!(&first, &second);
            for combination in first.combinations() {
                prop_assert_eq!(combination.len(), 6);
                prop_assert!(combination.windows(2).all(|w| w[0] < w[1]));
            }
        }
    }
}
