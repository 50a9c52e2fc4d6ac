//! Polynomial multiplication over the integers.
//!
//! Products are computed over plain `Z[x]`; modular reduction is the
//! caller's job, through [`super::CycloModulus`]. Reducing once after the
//! full product is cheaper than reducing along the way.

use num_bigint::BigInt;
use num_traits::Zero;

use super::Poly;

/// Minimum operand width for recursive Karatsuba calls.
///
/// Below this the schoolbook product wins on allocation overhead alone.
pub const KARATSUBA_MIN_COEFFS: usize = 8;

/// Returns `a * b` by the schoolbook method.
pub fn naive_mul(a: &Poly, b: &Poly) -> Poly {
    if a.is_zero() || b.is_zero() {
        return Poly::zero();
    }

    let mut res = vec![BigInt::zero(); a.len() + b.len() - 1];
    for (i, ai) in a.coeffs().iter().enumerate() {
        if ai.is_zero() {
            continue;
        }
        for (j, bj) in b.coeffs().iter().enumerate() {
            res[i + j] += ai * bj;
        }
    }

    Poly::from_coefficients_vec(res)
}

/// Returns `a * b` using the recursive Karatsuba method.
///
/// Three half-width products replace four:
/// `a·b = z0 + (z1 − z0 − z2)·xˆh + z2·xˆ2h`
/// with `z0 = al·bl`, `z2 = ah·bh`, `z1 = (al + ah)·(bl + bh)`.
pub fn karatsuba_mul(a: &Poly, b: &Poly) -> Poly {
    if a.len().min(b.len()) <= KARATSUBA_MIN_COEFFS {
        return naive_mul(a, b);
    }

    let half = (a.len().max(b.len()) + 1) / 2;
    let (a_low, a_high) = split_at(a, half);
    let (b_low, b_high) = split_at(b, half);

    let z0 = karatsuba_mul(&a_low, &b_low);
    let z2 = karatsuba_mul(&a_high, &b_high);

    let a_sum = &a_low + &a_high;
    let b_sum = &b_low + &b_high;
    let mut z1 = karatsuba_mul(&a_sum, &b_sum);
    z1 -= &z0;
    z1 -= &z2;

    let mut res = z0;
    z1.mul_xn(half);
    res += z1;

    let mut z2 = z2;
    z2.mul_xn(2 * half);
    res += z2;

    res
}

/// Splits into `(low, high)` with `low` holding the first `at` coefficients,
/// so that `p = low + high·xˆat`. Either part can be zero.
fn split_at(p: &Poly, at: usize) -> (Poly, Poly) {
    if p.len() <= at {
        return (p.clone(), Poly::zero());
    }
    (
        Poly::from_coefficients_vec(p.coeffs()[..at].to_vec()),
        Poly::from_coefficients_vec(p.coeffs()[at..].to_vec()),
    )
}
