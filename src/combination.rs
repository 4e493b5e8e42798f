use std::fmt;
use std::ops::Deref;

use itertools::Itertools;
use serde::Serialize;

/// An ascending selection of distinct numbers from a pool, e.g. `[3, 11, 19, 27, 38, 44]`.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct Combination(Vec<u32>);

impl Combination {
    /// Build a combination from numbers in any order.
    pub fn sorted(mut numbers: Vec<u32>) -> Self {
        numbers.sort_unstable();
        Self(numbers)
    }

    /// Re-sort in place and return self.
    pub(crate) fn into_sorted(self) -> Self {
        Self::sorted(self.0)
    }

    pub fn into_inner(self) -> Vec<u32> {
        self.0
    }
}

impl Deref for Combination {
    type Target = [u32];

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl From<Combination> for Vec<u32> {
    fn from(value: Combination) -> Self {
        value.0
    }
}

impl fmt::Display for Combination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}]", self.0.iter().join(", "))
    }
}
