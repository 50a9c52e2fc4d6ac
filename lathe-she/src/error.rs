//! Failure kinds reported by the scheme.

/// A type representing all errors that can occur in the scheme.
///
/// Decryption noise crossing the rounding boundary is deliberately not an
/// error: the scheme cannot detect it, so it is a correctness property of
/// the chosen parameters rather than a reportable condition.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    /// Parameters violate a constructor precondition, or an operation's
    /// inputs are inconsistent with the configured parameters.
    #[error("invalid parameter: {0}")]
    InvalidParameter(&'static str),

    /// A keyed operation was invoked on a parametrised-only instance.
    #[error("keys are not ready, call keygen first")]
    KeysNotReady,

    /// No invertible secret key was found within the retry bound.
    #[error("key generation failed after {0} attempts")]
    KeyGenFailure(usize),

    /// An input vector is longer than the ring (or the slot table) can hold.
    #[error("input length {len} exceeds capacity {max}")]
    DimensionMismatch {
        /// The offending input length.
        len: usize,
        /// The maximum the operation accepts.
        max: usize,
    },
}
