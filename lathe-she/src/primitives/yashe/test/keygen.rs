//! Unit tests for key generation.

use num_bigint::BigInt;
use num_traits::{One, Zero};

use super::TINY;
use crate::conf::SchemeParams;
use crate::primitives::poly::Poly;
use crate::primitives::yashe::Yashe;

/// Lifts a canonical coefficient into the centered range `(−q/2, q/2]`.
fn center(c: &BigInt, q: &BigInt) -> BigInt {
    if c + c > *q {
        c - q
    } else {
        c.clone()
    }
}

#[test]
fn secret_key_is_one_modulo_t() {
    let (scheme, private_key) = &*TINY;
    let q = scheme.cipher_modulus();
    let t = BigInt::from(scheme.plain_modulus());

    for (i, c) in private_key.f.coeffs().iter().enumerate() {
        let mut centered = center(c, q);
        if i == 0 {
            centered -= BigInt::one();
        }
        assert!(
            (centered % &t).is_zero(),
            "coefficient {i} of the secret key breaks the t·f' + 1 form",
        );
    }
}

#[test]
fn secret_key_inverts() {
    let (scheme, private_key) = &*TINY;
    assert_eq!(
        scheme.mod_q.mul(&private_key.f, &private_key.f_inv),
        Poly::one()
    );
}

#[test]
fn key_material_stays_inside_the_ring() {
    let (scheme, _) = &*TINY;
    let n = scheme.ring_degree();

    let public_key = scheme.public_key().expect("instance is keyed");
    assert!(public_key.h.degree() < n);

    let eval_key = scheme.eval_key().expect("instance is keyed");
    assert_eq!(eval_key.parts.len(), scheme.decomp_len());
    for part in &eval_key.parts {
        assert!(part.degree() < n);
    }
}

#[test]
fn fresh_randomness_gives_fresh_keys() {
    let mut rng = lathe_test::test_rng_with(1);
    let mut scheme = Yashe::new(SchemeParams::tiny()).expect("tiny parameters are valid");

    let first = scheme.keygen(&mut rng).expect("keygen succeeds");
    let first_public = scheme.public_key().expect("instance is keyed").clone();

    let second = scheme.keygen(&mut rng).expect("keygen succeeds");
    let second_public = scheme.public_key().expect("instance is keyed").clone();

    assert_ne!(first, second, "two keygens drew the same secret key");
    assert_ne!(first_public, second_public);
}

#[test]
fn keygen_works_across_instances_with_the_same_parameters() {
    let mut scheme_a = Yashe::new(SchemeParams::tiny()).expect("tiny parameters are valid");
    let mut scheme_b = Yashe::new(SchemeParams::tiny()).expect("tiny parameters are valid");

    let key_a = scheme_a
        .keygen(&mut lathe_test::test_rng_with(7))
        .expect("keygen succeeds");
    let key_b = scheme_b
        .keygen(&mut lathe_test::test_rng_with(8))
        .expect("keygen succeeds");

    assert_ne!(key_a, key_b);
}
