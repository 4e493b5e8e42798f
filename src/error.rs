use num_bigint::BigUint;

/// Errors raised while building a universe or decoding a bit string.
///
/// None of these are retried internally; retry policy belongs to the caller.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    /// Pool size, pick size, selection count or universe size violate
    /// `n >= k >= 1`, `m >= 1` or `universe_size >= 1`.
    #[error("invalid parameters: {reason}")]
    InvalidParameters { reason: String },
    /// An unranking index fell outside `[0, size)`.
    #[error("index {index} is out of range for a universe of {size} combinations")]
    IndexOutOfRange { index: BigUint, size: BigUint },
    /// The bit string length does not match the computed total.
    #[error("expected a bit string of {expected} bits, got {actual}")]
    LengthMismatch { expected: u64, actual: u64 },
    /// Text could not be parsed as a bit string.
    #[error("invalid bit string: unexpected {found:?} at position {position}")]
    InvalidBitString { position: usize, found: Option<char> },
    /// The entropy source failed to produce bits.
    #[error("entropy source failed: {0}")]
    Entropy(String),
}

impl Error {
    pub(crate) fn invalid(reason: impl Into<String>) -> Self {
        Error::InvalidParameters {
            reason: reason.into(),
        }
    }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
