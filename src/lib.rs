//! Deterministic decoding of a random bit string into lottery-style combinations.
//!
//! A [`Universe`] enumerates every k-combination of `{1..n}` in lexicographic
//! order. The [`slice_decoder`] splits one bit string into equal windows and
//! maps each window onto that universe by modulo reduction. Where the bits come
//! from is left to an [`EntropySource`].

pub mod bit_string;
pub mod combination;
pub mod combinatorics;
pub mod draw;
pub mod entropy;
pub mod error;
pub mod slice_decoder;
pub mod universe;

pub use bit_string::BitString;
pub use combination::Combination;
pub use draw::{DrawReport, Requirements, SelectionRequest, draw};
pub use entropy::{EntropySource, ReplaySource, RngSource};
pub use error::{Error, Result};
pub use slice_decoder::{DecodingResult, ModuloBias, decode, required_bits, total_bits};
pub use universe::{Universe, cardinality, combination_at};
