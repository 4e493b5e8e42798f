use rand::rngs::StdRng;
use rand::{Rng, RngCore, SeedableRng};

use crate::bit_string::BitString;
use crate::error::{Error, Result};

/// Anything that can produce `len` independent, uniformly distributed bits.
///
/// Implementations may be backed by hardware, a remote service or a PRNG.
/// Decoding never relies on how the bits were obtained.
pub trait EntropySource {
    /// Human readable name of the backend, reported alongside draws.
    fn name(&self) -> &str;

    fn fetch_bits(&mut self, len: u64) -> Result<BitString>;
}

/// Pseudo-random bits from a [`rand`] generator.
pub struct RngSource<R> {
    name: String,
    rng: R,
}

impl<R: RngCore> RngSource<R> {
    pub fn new(name: impl Into<String>, rng: R) -> Self {
        Self {
            name: name.into(),
            rng,
        }
    }
}

impl RngSource<StdRng> {
    /// Generator seeded from the operating system.
    pub fn from_entropy() -> Self {
        Self::new("os-seeded-prng", StdRng::from_entropy())
    }

    /// Reproducible generator for a fixed seed.
    pub fn seeded(seed: u64) -> Self {
        Self::new(format!("seeded-prng({seed})"), StdRng::seed_from_u64(seed))
    }
}

impl<R: RngCore> EntropySource for RngSource<R> {
    fn name(&self) -> &str {
        &self.name
    }

    fn fetch_bits(&mut self, len: u64) -> Result<BitString> {
        let len = usize::try_from(len)
            .map_err(|_| Error::Entropy(format!("cannot allocate {len} bits")))?;
        let bits = (0..len).map(|_| self.rng.gen_bool(0.5)).collect();
        Ok(BitString::new(bits))
    }
}

/// Hands back a previously recorded measurement, whatever length is asked for.
///
/// A recording of the wrong length is not adjusted; decoding rejects it.
pub struct ReplaySource {
    bits: Option<BitString>,
}

impl ReplaySource {
    pub fn new(bits: BitString) -> Self {
        Self { bits: Some(bits) }
    }
}

impl EntropySource for ReplaySource {
    fn name(&self) -> &str {
        "replay"
    }

    fn fetch_bits(&mut self, _len: u64) -> Result<BitString> {
        self.bits
            .take()
            .ok_or_else(|| Error::Entropy("recorded bit string was already consumed".into()))
    }
}
