//! Unit tests for the scheme operations.

use lazy_static::lazy_static;

use super::{Message, PrivateKey, Yashe};
use crate::conf::SchemeParams;

mod encdec;
mod keygen;

lazy_static! {
    /// A keyed tiny-parameter scheme shared across the test suite.
    ///
    /// Key generation dominates test runtime, so it runs once; everything
    /// read from here is immutable.
    pub static ref TINY: (Yashe, PrivateKey) = {
        lathe_test::init_logger();
        let mut rng = lathe_test::test_rng();
        let mut scheme = Yashe::new(SchemeParams::tiny()).expect("tiny parameters are valid");
        let private_key = scheme
            .keygen(&mut rng)
            .expect("keygen finds an invertible key");
        (scheme, private_key)
    };
}

/// The message coefficients as a vector padded to the ring degree, the
/// shape [`Yashe::decrypt_vec`] returns.
pub fn message_coeffs(scheme: &Yashe, message: &Message) -> Vec<u64> {
    use num_traits::ToPrimitive;

    let mut out = vec![0u64; scheme.ring_degree()];
    for (i, c) in message.m.coeffs().iter().enumerate() {
        out[i] = c.to_u64().expect("plaintext coefficients fit in u64");
    }
    out
}
