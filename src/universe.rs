use std::iter::FusedIterator;

use num_bigint::BigUint;

use crate::combination::Combination;
use crate::combinatorics::{n_choose_k, rank_combination, unrank_combination};
use crate::error::{Error, Result};

/// The lexicographically ordered set of all k-combinations of `{1..n}`.
///
/// Only the cardinality is computed up front. Individual combinations are
/// produced on demand by unranking, or lazily through [`Universe::iter`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Universe {
    pool_size: u32,
    pick_size: u32,
    cardinality: BigUint,
}

impl Universe {
    pub fn new(pool_size: u32, pick_size: u32) -> Result<Self> {
        if pool_size < 1 {
            return Err(Error::invalid(format!(
                "pool size must be at least 1, got {pool_size}"
            )));
        }
        if pick_size < 1 {
            return Err(Error::invalid(format!(
                "pick size must be at least 1, got {pick_size}"
            )));
        }
        if pick_size > pool_size {
            return Err(Error::invalid(format!(
                "pick size {pick_size} exceeds pool size {pool_size}"
            )));
        }

        Ok(Self {
            pool_size,
            pick_size,
            cardinality: n_choose_k(pool_size, pick_size),
        })
    }

    pub fn pool_size(&self) -> u32 {
        self.pool_size
    }

    pub fn pick_size(&self) -> u32 {
        self.pick_size
    }

    /// Number of combinations, `C(n, k)`.
    pub fn cardinality(&self) -> &BigUint {
        &self.cardinality
    }

    /// The `index`-th combination (0-based) in lexicographic order.
    pub fn combination_at(&self, index: &BigUint) -> Result<Combination> {
        if *index >= self.cardinality {
            return Err(Error::IndexOutOfRange {
                index: index.clone(),
                size: self.cardinality.clone(),
            });
        }
        let zero_based = unrank_combination(self.pool_size, self.pick_size, index.clone());
        Ok(Combination::sorted(
            zero_based.into_iter().map(|c| c + 1).collect(),
        ))
    }

    /// Position of `combination` in lexicographic order.
    pub fn index_of(&self, combination: &Combination) -> Result<BigUint> {
        if combination.len() != self.pick_size as usize {
            return Err(Error::invalid(format!(
                "combination has {} numbers, universe picks {}",
                combination.len(),
                self.pick_size
            )));
        }
        if combination
            .iter()
            .any(|&value| value < 1 || value > self.pool_size)
        {
            return Err(Error::invalid(format!(
                "combination {combination} has numbers outside 1..={}",
                self.pool_size
            )));
        }
        if combination.windows(2).any(|w| w[0] == w[1]) {
            return Err(Error::invalid(format!(
                "combination {combination} repeats a number"
            )));
        }

        let zero_based: Vec<u32> = combination.iter().map(|&value| value - 1).collect();
        Ok(rank_combination(self.pool_size, &zero_based))
    }

    /// Lazily walk every combination in lexicographic order.
    pub fn iter(&self) -> Combinations {
        Combinations {
            pool_size: self.pool_size,
            current: Some((1..=self.pick_size).collect()),
        }
    }
}

impl<'a> IntoIterator for &'a Universe {
    type Item = Combination;
    type IntoIter = Combinations;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Lexicographic successor iterator returned by [`Universe::iter`].
#[derive(Clone, Debug)]
pub struct Combinations {
    pool_size: u32,
    current: Option<Vec<u32>>,
}

impl Iterator for Combinations {
    type Item = Combination;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.current.take()?;
        let k = current.len();
        let n = self.pool_size as usize;

        // Rightmost position that has not reached its ceiling `n - k + i + 1`.
        let pivot = (0..k)
            .rev()
            .find(|&i| (current[i] as usize) < n - k + i + 1);
        if let Some(i) = pivot {
            let mut next = current.clone();
            next[i] += 1;
            for j in i + 1..k {
                next[j] = next[j - 1] + 1;
            }
            self.current = Some(next);
        }

        Some(Combination::sorted(current))
    }
}

impl FusedIterator for Combinations {}

/// `C(n, k)` for a validated `(n, k)`.
pub fn cardinality(pool_size: u32, pick_size: u32) -> Result<BigUint> {
    Universe::new(pool_size, pick_size).map(|universe| universe.cardinality)
}

/// The `index`-th k-combination of `{1..n}` in lexicographic order.
pub fn combination_at(pool_size: u32, pick_size: u32, index: &BigUint) -> Result<Combination> {
    Universe::new(pool_size, pick_size)?.combination_at(index)
}
