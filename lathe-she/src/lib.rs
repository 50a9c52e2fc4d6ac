//! Somewhat-homomorphic encryption over cyclotomic rings.
//!
//! This library implements the YASHE cryptosystem: messages are small
//! integers modulo a plaintext modulus `t`, ciphertexts are single elements
//! of the quotient ring `Z_q[x]/Φ_m(x)`, and ciphertexts support a bounded
//! number of homomorphic additions and multiplications before the embedded
//! noise overwhelms the decryption budget.
//!
//! The library has 3 layers:
//! [`conf`]: runtime scheme parameters and their validation,
//! [`primitives::poly`]: big-integer polynomial arithmetic in explicit
//!                       modulus contexts,
//! [`primitives::yashe`]: key generation, encryption, decryption, and the
//!                        homomorphic evaluation operations built on them.
//!
//! # Thread safety
//!
//! A scheme instance is immutable after [`primitives::yashe::Yashe::keygen`]
//! returns, so it can be shared across threads freely. Randomness is never
//! stored in the instance: every sampling operation takes its own
//! `&mut impl Rng + CryptoRng` handle, which also makes tests deterministic.

#[macro_use]
extern crate static_assertions;

pub mod conf;
pub mod error;
pub mod primitives;

pub use conf::SchemeParams;
pub use error::Error;
pub use primitives::yashe::{
    Ciphertext, EvaluationKey, Message, PrivateKey, PublicKey, Yashe,
};
