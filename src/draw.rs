use num_bigint::BigUint;
use num_traits::One;
use serde::Serialize;
use tracing::info;

use crate::bit_string::BitString;
use crate::entropy::EntropySource;
use crate::error::{Error, Result};
use crate::slice_decoder::{self, DecodingResult, ModuloBias, serialize_decimal};
use crate::universe::Universe;

/// How many numbers to pick, from how large a pool, and how many times.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct SelectionRequest {
    pub pool_size: u32,
    pub pick_size: u32,
    pub selections: u64,
}

impl Default for SelectionRequest {
    /// Four games of 6 from 45.
    fn default() -> Self {
        Self {
            pool_size: 45,
            pick_size: 6,
            selections: 4,
        }
    }
}

impl SelectionRequest {
    pub fn new(pool_size: u32, pick_size: u32, selections: u64) -> Self {
        Self {
            pool_size,
            pick_size,
            selections,
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.selections < 1 {
            return Err(Error::invalid(format!(
                "number of selections must be at least 1, got {}",
                self.selections
            )));
        }
        Universe::new(self.pool_size, self.pick_size).map(|_| ())
    }

    pub fn universe(&self) -> Result<Universe> {
        self.validate()?;
        Universe::new(self.pool_size, self.pick_size)
    }

    /// Size metadata for this request, without drawing anything.
    pub fn requirements(&self) -> Result<Requirements> {
        let universe = self.universe()?;
        let universe_size = universe.cardinality().clone();
        let bits_per_selection = slice_decoder::required_bits(&universe_size)?;
        let total_bits = slice_decoder::total_bits(&universe_size, self.selections)?;
        let bias = ModuloBias::new(&universe_size)?;

        info!(
            total_bits,
            bits_per_selection,
            %universe_size,
            "computed entropy requirements"
        );

        Ok(Requirements {
            state_space_size: BigUint::one() << total_bits,
            universe_size,
            bits_per_selection,
            total_bits,
            bias,
        })
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Requirements {
    #[serde(serialize_with = "serialize_decimal")]
    pub universe_size: BigUint,
    pub bits_per_selection: u64,
    pub total_bits: u64,
    /// `2^total_bits`, the number of distinct bit strings a source can return.
    #[serde(serialize_with = "serialize_decimal")]
    pub state_space_size: BigUint,
    pub bias: ModuloBias,
}

/// A completed draw together with the raw bits it was decoded from.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct DrawReport {
    pub result: DecodingResult,
    pub bits: BitString,
    pub source: String,
    #[serde(serialize_with = "serialize_decimal")]
    pub state_space_size: BigUint,
}

/// Request exactly the required number of bits from `source` and decode them.
pub fn draw<S>(request: &SelectionRequest, source: &mut S) -> Result<DrawReport>
where
    S: EntropySource + ?Sized,
{
    let universe = request.universe()?;
    let requirements = request.requirements()?;

    let bits = source.fetch_bits(requirements.total_bits)?;
    info!(source = source.name(), measurement = %bits, "received bits");

    let result = slice_decoder::decode(
        &bits,
        universe.cardinality(),
        request.selections,
        |index| universe.combination_at(index),
    )?;

    Ok(DrawReport {
        result,
        bits,
        source: source.name().to_string(),
        state_space_size: requirements.state_space_size,
    })
}
