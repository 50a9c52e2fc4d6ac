//! Number-theoretic helpers: totients, cyclotomic polynomials, and CRT
//! recombination over the plaintext ring.

use num_bigint::BigInt;
use num_traits::{One, Zero};

use crate::error::Error;
use crate::primitives::poly::{inverse, karatsuba_mul, CycloModulus, Poly};

/// Euler's totient `φ(m)`.
pub fn euler_totient(m: u64) -> u64 {
    let mut n = m;
    let mut result = m;
    let mut p = 2;
    while p * p <= n {
        if n % p == 0 {
            while n % p == 0 {
                n /= p;
            }
            result -= result / p;
        }
        p += 1;
    }
    if n > 1 {
        result -= result / n;
    }
    result
}

/// All divisors of `m`, ascending.
pub fn divisors(m: u64) -> Vec<u64> {
    let mut result = Vec::new();
    let mut d = 1;
    while d * d <= m {
        if m % d == 0 {
            result.push(d);
            if d * d != m {
                result.push(m / d);
            }
        }
        d += 1;
    }
    result.sort_unstable();
    result
}

/// Primality by trial division; the plaintext modulus is small.
pub fn is_prime(n: u64) -> bool {
    if n < 2 {
        return false;
    }
    let mut d = 2;
    while d * d <= n {
        if n % d == 0 {
            return false;
        }
        d += 1;
    }
    true
}

/// The multiplicative order of `t` modulo `m`, or `None` when
/// `gcd(t, m) ≠ 1`.
pub fn multiplicative_order(t: u64, m: u64) -> Option<u64> {
    let base = t % m;
    if gcd(base, m) != 1 {
        return None;
    }
    let mut acc = base;
    let mut order = 1;
    while acc != 1 {
        acc = ((acc as u128 * base as u128) % m as u128) as u64;
        order += 1;
    }
    Some(order)
}

fn gcd(mut a: u64, mut b: u64) -> u64 {
    while b != 0 {
        (a, b) = (b, a % b);
    }
    a
}

/// The m-th cyclotomic polynomial, monic over `Z`.
///
/// Computed by iterative division:
/// `Φ_m(x) = (x^m − 1) / ∏_{d | m, d < m} Φ_d(x)`,
/// walking the divisors of `m` in ascending order so each `Φ_d` is ready
/// when needed. Every division here is exact and the divisors are monic.
pub fn cyclotomic_poly(m: u64) -> Poly {
    let mut table: Vec<(u64, Poly)> = Vec::new();
    for d in divisors(m) {
        // x^d − 1
        let mut num = Poly::non_canonical_zeroes(d as usize + 1);
        num[0] = BigInt::from(-1);
        num[d as usize] = BigInt::one();

        for (e, phi) in &table {
            if d % e == 0 {
                num = exact_div(&num, phi);
            }
        }
        table.push((d, num));
    }
    table.pop().expect("m has at least one divisor").1
}

/// Exact division of integer polynomials by a monic divisor.
fn exact_div(a: &Poly, b: &Poly) -> Poly {
    let db = b.degree();
    debug_assert!(b.coeffs()[db].is_one());
    debug_assert!(a.degree() >= db);

    let mut rem = a.clone();
    rem.truncate_to_canonical_form();
    let mut quot = Poly::non_canonical_zeroes(rem.degree() - db + 1);
    while !rem.is_zero() && rem.degree() >= db {
        let dr = rem.degree();
        let lead = rem[dr].clone();
        for (j, c) in b.coeffs().iter().enumerate() {
            if c.is_zero() {
                continue;
            }
            let updated = &rem[dr - db + j] - &lead * c;
            rem[dr - db + j] = updated;
        }
        quot[dr - db] = lead;
        rem.truncate_to_canonical_form();
    }
    debug_assert!(rem.is_zero(), "division was not exact");
    quot.truncate_to_canonical_form();
    quot
}

/// The Lagrange-style CRT basis for a factor list of the context's
/// polynomial modulus: `basis_i ≡ 1 (mod F_i)` and `≡ 0 (mod F_j)` for
/// `j ≠ i`.
///
/// Fails with [`Error::InvalidParameter`] if the factors do not multiply
/// back to the polynomial modulus or a required inverse does not exist.
pub fn crt_basis(ctx: &CycloModulus, factors: &[Poly]) -> Result<Vec<Poly>, Error> {
    if factors.is_empty() {
        return Err(Error::InvalidParameter("the factor set is empty"));
    }

    let mut modulus = ctx.poly_modulus().clone();
    ctx.canonicalize(&mut modulus);

    // multiply over Z_M[x] only: the full product has the modulus' degree,
    // so reducing by the polynomial modulus would collapse it to zero
    let mut product = Poly::one();
    for f in factors {
        product = karatsuba_mul(&product, f);
        ctx.canonicalize(&mut product);
    }
    if product != modulus {
        return Err(Error::InvalidParameter(
            "the factor set does not multiply to the polynomial modulus",
        ));
    }

    let mut basis = Vec::with_capacity(factors.len());
    for f in factors {
        let (cofactor, rem) = ctx
            .divmod(&modulus, f)
            .ok_or(Error::InvalidParameter("a factor is not invertible-led"))?;
        if !rem.is_zero() {
            return Err(Error::InvalidParameter(
                "a factor does not divide the polynomial modulus",
            ));
        }

        // invert the cofactor modulo the factor itself
        let factor_ring = CycloModulus::new(ctx.coeff_modulus().clone(), f.clone());
        let cofactor_inv = inverse(&factor_ring, &cofactor).ok_or(Error::InvalidParameter(
            "a factor cofactor is not invertible",
        ))?;

        basis.push(ctx.mul(&cofactor, &cofactor_inv));
    }
    Ok(basis)
}

/// CRT recombination: the unique `p` with `p ≡ values[i] (mod F_i)` for
/// the factor list behind `basis`, and `p ≡ 0` beyond the given values.
pub fn crt_combine(ctx: &CycloModulus, basis: &[Poly], values: &[u64]) -> Result<Poly, Error> {
    if values.len() > basis.len() {
        return Err(Error::DimensionMismatch {
            len: values.len(),
            max: basis.len(),
        });
    }

    let mut result = Poly::zero();
    for (v, b) in values.iter().zip(basis) {
        result += &ctx.mul_scalar(b, &BigInt::from(*v));
    }
    ctx.canonicalize(&mut result);
    Ok(result)
}
