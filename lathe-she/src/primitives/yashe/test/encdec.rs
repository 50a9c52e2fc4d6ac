//! Unit tests for encryption and decryption.

use num_bigint::BigInt;

use super::{message_coeffs, TINY};
use crate::conf::SchemeParams;
use crate::error::Error;
use crate::primitives::yashe::{rounded_division, Yashe};

#[test]
fn low_coefficients_roundtrip() {
    let (scheme, private_key) = &*TINY;
    let mut rng = lathe_test::test_rng();

    let message = scheme.message(&[1, 2, 3]).expect("message fits the ring");
    let ciphertext = scheme.encrypt(&message, &mut rng).expect("instance is keyed");
    let decrypted = scheme
        .decrypt_vec(&ciphertext, private_key)
        .expect("instance is keyed");

    let mut expected = vec![0u64; scheme.ring_degree()];
    expected[..3].copy_from_slice(&[1, 2, 3]);
    assert_eq!(decrypted, expected);
}

#[test]
fn scalars_roundtrip() {
    let (scheme, private_key) = &*TINY;
    let mut rng = lathe_test::test_rng();
    let t = scheme.plain_modulus();

    for value in [0, 1, 5, t - 1, t, t + 5] {
        let ciphertext = scheme
            .encrypt_scalar(value, &mut rng)
            .expect("instance is keyed");
        let decrypted = scheme.decrypt(&ciphertext, private_key).expect("instance is keyed");
        assert_eq!(decrypted, value % t, "scalar {value} did not roundtrip");
    }
}

#[test]
fn random_messages_roundtrip() {
    let (scheme, private_key) = &*TINY;
    let mut rng = lathe_test::test_rng();

    for _ in 0..10 {
        let message = scheme.sample_message(&mut rng);
        let ciphertext = scheme.encrypt(&message, &mut rng).expect("instance is keyed");
        let decrypted = scheme
            .decrypt_vec(&ciphertext, private_key)
            .expect("instance is keyed");
        assert_eq!(decrypted, message_coeffs(scheme, &message));
    }
}

/// Noise stays below the rounding boundary at depth 0.
#[test]
fn a_thousand_zero_encryptions_decrypt_to_zero() {
    let (scheme, private_key) = &*TINY;
    let mut rng = lathe_test::test_rng();

    for i in 0..1000 {
        let ciphertext = scheme.encrypt_scalar(0, &mut rng).expect("instance is keyed");
        let decrypted = scheme.decrypt(&ciphertext, private_key).expect("instance is keyed");
        assert_eq!(decrypted, 0, "encryption {i} of zero decrypted wrong");
    }
}

#[test]
fn operations_require_keys() {
    let scheme = Yashe::new(SchemeParams::tiny()).expect("tiny parameters are valid");
    let (keyed, private_key) = &*TINY;
    let mut rng = lathe_test::test_rng();

    let message = scheme.scalar_message(1);
    assert_eq!(scheme.encrypt(&message, &mut rng), Err(Error::KeysNotReady));
    assert_eq!(scheme.public_key(), Err(Error::KeysNotReady));

    let ciphertext = keyed.encrypt_scalar(1, &mut rng).expect("fixture is keyed");
    assert_eq!(scheme.decrypt(&ciphertext, private_key), Err(Error::KeysNotReady));
    assert_eq!(
        scheme.round_multiply(&ciphertext.c, &ciphertext.c),
        Err(Error::KeysNotReady)
    );
    assert_eq!(scheme.key_switch(&ciphertext.c), Err(Error::KeysNotReady));
}

#[test]
fn oversized_messages_are_rejected() {
    let (scheme, _) = &*TINY;
    let too_long = vec![1u64; scheme.ring_degree() + 1];

    assert_eq!(
        scheme.message(&too_long),
        Err(Error::DimensionMismatch {
            len: scheme.ring_degree() + 1,
            max: scheme.ring_degree(),
        })
    );
}

#[test]
fn rounding_rule_rounds_half_away_only_above_the_tie() {
    let div = |a: u64, b: u64| rounded_division(&BigInt::from(a), &BigInt::from(b));

    assert_eq!(div(20, 10), BigInt::from(2));
    // below the boundary: truncate
    assert_eq!(div(14, 10), BigInt::from(1));
    // above the boundary: round up
    assert_eq!(div(16, 10), BigInt::from(2));
    // the exact tie rounds down
    assert_eq!(div(15, 10), BigInt::from(1));
    // odd denominators have no tie
    assert_eq!(div(10, 7), BigInt::from(1));
    assert_eq!(div(11, 7), BigInt::from(2));
}

/// The divmod formulation agrees with `⌊(2a + b − 1) / 2b⌋`, a closed form
/// of round-half-up with ties broken down, across a dense grid.
#[test]
fn rounding_rule_matches_the_closed_form() {
    for b in 1u64..=20 {
        for a in 0u64..=200 {
            let expected = (2 * a + b - 1) / (2 * b);
            assert_eq!(
                rounded_division(&BigInt::from(a), &BigInt::from(b)),
                BigInt::from(expected),
                "disagreement at {a}/{b}",
            );
        }
    }
}

/// The boundary case of the decryption scaling: x = q/2.
#[test]
fn rounding_the_half_modulus_point() {
    for (t, q) in [(4u64, 10u64), (3, 10), (5, 8), (3, 7)] {
        let x = q / 2;
        let result = rounded_division(&BigInt::from(t * x), &BigInt::from(q));
        let expected = (2 * t * x + q - 1) / (2 * q);
        assert_eq!(result, BigInt::from(expected), "disagreement at t={t}, q={q}");
    }
}

#[test]
#[ignore = "full-resolution parameters take minutes in debug builds"]
fn full_resolution_roundtrip() {
    let mut rng = lathe_test::test_rng();
    let mut scheme = Yashe::new(SchemeParams::full()).expect("full parameters are valid");
    let private_key = scheme.keygen(&mut rng).expect("keygen succeeds");

    let message = scheme.message(&[1, 2, 3]).expect("message fits the ring");
    let ciphertext = scheme.encrypt(&message, &mut rng).expect("instance is keyed");
    let decrypted = scheme
        .decrypt_vec(&ciphertext, &private_key)
        .expect("instance is keyed");

    let mut expected = vec![0u64; scheme.ring_degree()];
    expected[..3].copy_from_slice(&[1, 2, 3]);
    assert_eq!(decrypted, expected);
}
