//! Runtime parameters for the YASHE encryption scheme.
//!
//! Keys and ciphertexts produced under different parameters are
//! incompatible; the scheme instance owns one immutable parameter set for
//! its whole lifetime.

use num_bigint::BigInt;

use crate::error::Error;

/// The parameter set accepted by [`crate::Yashe::new`].
#[derive(Clone, Debug, PartialEq)]
pub struct SchemeParams {
    /// The plaintext coefficient modulus `t`.
    pub t: u64,

    /// The ciphertext coefficient modulus `q`.
    pub q: BigInt,

    /// The cyclotomic index `m`; the working ring is `Z_q[x]/Φ_m(x)` with
    /// degree `φ(m)`.
    pub m: u64,

    /// The standard deviation of the discrete gaussian error distribution.
    pub std_dev: f64,

    /// The radix `w` of the evaluation-key decomposition.
    pub radix: BigInt,
}

impl SchemeParams {
    /// Builds a validated parameter set.
    pub fn new(t: u64, q: BigInt, m: u64, std_dev: f64, radix: BigInt) -> Result<Self, Error> {
        let params = Self {
            t,
            q,
            m,
            std_dev,
            radix,
        };
        params.validate()?;
        Ok(params)
    }

    /// Checks the constructor preconditions.
    ///
    /// The fields are public, so this runs again inside [`crate::Yashe::new`]
    /// in case a caller assembled the struct by hand.
    pub fn validate(&self) -> Result<(), Error> {
        if self.t < 2 {
            return Err(Error::InvalidParameter("plaintext modulus must be at least 2"));
        }
        if self.q <= BigInt::from(self.t) {
            return Err(Error::InvalidParameter(
                "ciphertext modulus must exceed the plaintext modulus",
            ));
        }
        if self.m < 3 {
            return Err(Error::InvalidParameter("cyclotomic index must be at least 3"));
        }
        if self.radix < BigInt::from(2) {
            return Err(Error::InvalidParameter("decomposition radix must be at least 2"));
        }
        if !self.std_dev.is_finite() || self.std_dev <= 0.0 {
            return Err(Error::InvalidParameter(
                "error standard deviation must be positive and finite",
            ));
        }
        Ok(())
    }

    /// Full resolution parameters: `t = 257`, `q = 2^61 − 1`, `m = 2048`
    /// (ring degree 1024), `σ = 8`, `w = 2^16`.
    pub fn full() -> Self {
        Self {
            t: 257,
            q: BigInt::from(2_305_843_009_213_693_951_u64),
            m: 2048,
            std_dev: 8.0,
            radix: BigInt::from(1_u64 << 16),
        }
    }

    /// Tiny parameters: as [`SchemeParams::full`] but with `m = 64` (ring
    /// degree 32).
    ///
    /// The small ring keeps failing tests easy to read and diagnose, and
    /// keeps key generation fast enough to run in every test.
    pub fn tiny() -> Self {
        Self {
            m: 64,
            ..Self::full()
        }
    }
}

#[cfg(test)]
mod tests {
    use num_bigint::BigInt;

    use super::SchemeParams;
    use crate::error::Error;

    #[test]
    fn presets_are_valid() {
        SchemeParams::full().validate().expect("full parameters are valid");
        SchemeParams::tiny().validate().expect("tiny parameters are valid");
    }

    #[test]
    fn preconditions_are_enforced() {
        let mut params = SchemeParams::tiny();
        params.t = 1;
        assert!(matches!(params.validate(), Err(Error::InvalidParameter(_))));

        let mut params = SchemeParams::tiny();
        params.q = BigInt::from(7);
        assert!(matches!(params.validate(), Err(Error::InvalidParameter(_))));

        let mut params = SchemeParams::tiny();
        params.m = 2;
        assert!(matches!(params.validate(), Err(Error::InvalidParameter(_))));

        let mut params = SchemeParams::tiny();
        params.radix = BigInt::from(1);
        assert!(matches!(params.validate(), Err(Error::InvalidParameter(_))));

        let mut params = SchemeParams::tiny();
        params.std_dev = 0.0;
        assert!(matches!(params.validate(), Err(Error::InvalidParameter(_))));
    }
}
