use num_bigint::BigUint;
use num_traits::{One, Zero};

/// Exact binomial coefficient `C(n, k)`, or zero when `k > n`.
pub fn n_choose_k(n: u32, k: u32) -> BigUint {
    if k > n {
        return BigUint::zero();
    }
    let k = k.min(n - k);
    let mut result = BigUint::one();
    for i in 1..=k {
        result = result * (n - (k - i)) / i;
    }
    result
}

/// Returns the `rank`-th k-subset of `0..n` in lexicographic order.
///
/// `rank` must be below `n_choose_k(n, k)`.
pub fn unrank_combination(n: u32, k: u32, mut rank: BigUint) -> Vec<u32> {
    debug_assert!(rank < n_choose_k(n, k));
    let mut combo = Vec::with_capacity(k as usize);
    let mut x = 0u32;
    for i in 0..k {
        let mut c = x;
        loop {
            let count = n_choose_k(n - c - 1, k - i - 1);
            if count <= rank {
                rank -= count;
                c += 1;
            } else {
                combo.push(c);
                x = c + 1;
                break;
            }
        }
    }
    combo
}

/// Inverse of [`unrank_combination`] for ascending `indices` drawn from `0..n`.
pub fn rank_combination(n: u32, indices: &[u32]) -> BigUint {
    let k = indices.len() as u32;
    let mut rank = BigUint::zero();
    for (i, &c) in indices.iter().enumerate() {
        let i = i as u32;
        let start = if i == 0 { 0 } else { indices[i as usize - 1] + 1 };
        for j in start..c {
            rank += n_choose_k(n - j - 1, k - i - 1);
        }
    }
    rank
}
