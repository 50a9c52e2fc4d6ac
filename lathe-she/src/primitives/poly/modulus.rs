//! Modular reduction contexts for the quotient rings.
//!
//! A [`CycloModulus`] pairs a coefficient modulus with a monic polynomial
//! modulus and performs all reduction for one ring. The scheme builds one
//! context per ring it touches (`R_q`, the wide intermediate ring, `R_t`)
//! and passes the right one to every arithmetic call, so no operation ever
//! depends on ambient modulus state.

use num_bigint::{BigInt, BigUint};
use num_traits::{One, Signed, Zero};

use super::{karatsuba_mul, Poly};

/// The reduction context for one quotient ring `Z_M[x]/f(x)`.
///
/// `f` must be monic, so reduction by `f` needs no coefficient inversion
/// and works over any coefficient modulus, prime or not.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CycloModulus {
    /// The coefficient modulus `M`.
    coeff_modulus: BigInt,
    /// The monic polynomial modulus `f`.
    poly_modulus: Poly,
    /// `deg f`, cached.
    degree: usize,
}

impl CycloModulus {
    /// Builds a context for `Z_M[x]/f(x)`.
    pub fn new(coeff_modulus: BigInt, poly_modulus: Poly) -> Self {
        assert!(coeff_modulus >= BigInt::from(2), "coefficient modulus must be at least 2");
        let degree = poly_modulus.degree();
        assert!(degree >= 1, "polynomial modulus must not be constant");
        assert!(
            poly_modulus.coeffs()[degree].is_one(),
            "polynomial modulus must be monic"
        );
        Self {
            coeff_modulus,
            poly_modulus,
            degree,
        }
    }

    /// The coefficient modulus `M`.
    pub fn coeff_modulus(&self) -> &BigInt {
        &self.coeff_modulus
    }

    /// The polynomial modulus `f`.
    pub fn poly_modulus(&self) -> &Poly {
        &self.poly_modulus
    }

    /// `deg f`: the ring dimension.
    pub fn degree(&self) -> usize {
        self.degree
    }

    /// The canonical representative of `c` in `[0, M)`.
    pub fn canonical_coeff(&self, c: &BigInt) -> BigInt {
        let mut r = c % &self.coeff_modulus;
        if r.is_negative() {
            r += &self.coeff_modulus;
        }
        r
    }

    /// Maps every coefficient into `[0, M)` without touching the degree,
    /// then restores the canonical form.
    pub fn canonicalize(&self, p: &mut Poly) {
        for c in p.coeffs_mut() {
            *c = self.canonical_coeff(c);
        }
        p.truncate_to_canonical_form();
    }

    /// Returns the canonical representative of `p` modulo `(M, f)`.
    pub fn reduce(&self, p: &Poly) -> Poly {
        let mut r = p.clone();
        self.reduce_in_place(&mut r);
        r
    }

    /// Reduces `r` modulo `(M, f)` in place.
    ///
    /// `f` is monic, so each step subtracts `lead·xˆ{i−n}·f` outright.
    pub fn reduce_in_place(&self, r: &mut Poly) {
        for c in r.coeffs_mut() {
            *c = self.canonical_coeff(c);
        }

        let n = self.degree;
        let mut i = r.len();
        while i > n {
            i -= 1;
            let lead = std::mem::take(&mut r[i]);
            if lead.is_zero() {
                continue;
            }
            for (j, c) in self.poly_modulus.coeffs()[..n].iter().enumerate() {
                if c.is_zero() {
                    continue;
                }
                let updated = self.canonical_coeff(&(&r[i - n + j] - &lead * c));
                r[i - n + j] = updated;
            }
        }

        r.truncate(n);
        r.truncate_to_canonical_form();
    }

    /// `a + b` in the ring.
    pub fn add(&self, a: &Poly, b: &Poly) -> Poly {
        let mut r = a + b;
        self.canonicalize(&mut r);
        r
    }

    /// `a − b` in the ring.
    pub fn sub(&self, a: &Poly, b: &Poly) -> Poly {
        let mut r = a - b;
        self.canonicalize(&mut r);
        r
    }

    /// `a · b` in the ring: full integer product, one reduction at the end.
    pub fn mul(&self, a: &Poly, b: &Poly) -> Poly {
        let mut r = karatsuba_mul(a, b);
        self.reduce_in_place(&mut r);
        r
    }

    /// `a · s` for a scalar `s`, coefficients reduced into `[0, M)`.
    pub fn mul_scalar(&self, a: &Poly, s: &BigInt) -> Poly {
        let mut r = a.clone();
        for c in r.coeffs_mut() {
            *c = self.canonical_coeff(&(&*c * s));
        }
        r.truncate_to_canonical_form();
        r
    }

    /// The inverse of `c` modulo `M`, by the extended euclidean algorithm.
    ///
    /// `None` when `gcd(c, M) ≠ 1`; with a composite `M` this is how
    /// non-invertibility surfaces to key generation.
    pub fn inv_coeff(&self, c: &BigInt) -> Option<BigInt> {
        let c = self.canonical_coeff(c);
        if c.is_zero() {
            return None;
        }

        let mut r_prev = self.coeff_modulus.clone();
        let mut r_cur = c;
        let mut s_prev = BigInt::zero();
        let mut s_cur = BigInt::one();
        while !r_cur.is_zero() {
            let quotient = &r_prev / &r_cur;
            let r_next = &r_prev - &quotient * &r_cur;
            r_prev = std::mem::replace(&mut r_cur, r_next);
            let s_next = &s_prev - &quotient * &s_cur;
            s_prev = std::mem::replace(&mut s_cur, s_next);
        }

        if r_prev.is_one() {
            Some(self.canonical_coeff(&s_prev))
        } else {
            None
        }
    }

    /// Division with remainder in `Z_M[x]`: `a = quot·b + rem` with
    /// `deg rem < deg b`. The polynomial modulus plays no part here.
    ///
    /// `None` when the divisor's leading coefficient is not a unit mod `M`.
    pub fn divmod(&self, a: &Poly, b: &Poly) -> Option<(Poly, Poly)> {
        let mut rem = a.clone();
        self.canonicalize(&mut rem);
        let mut divisor = b.clone();
        self.canonicalize(&mut divisor);
        if divisor.is_zero() {
            return None;
        }

        let db = divisor.degree();
        let lead_inv = self.inv_coeff(&divisor[db])?;
        if rem.is_zero() || rem.degree() < db {
            return Some((Poly::zero(), rem));
        }

        let mut quot = Poly::non_canonical_zeroes(rem.degree() - db + 1);
        while !rem.is_zero() && rem.degree() >= db {
            let dr = rem.degree();
            let factor = self.canonical_coeff(&(&rem[dr] * &lead_inv));
            // rem −= factor·xˆ{dr−db}·divisor; the leading term cancels exactly
            for (j, c) in divisor.coeffs().iter().enumerate() {
                if c.is_zero() {
                    continue;
                }
                let updated = self.canonical_coeff(&(&rem[dr - db + j] - &factor * c));
                rem[dr - db + j] = updated;
            }
            debug_assert!(rem[dr].is_zero());
            quot[dr - db] = factor;
            rem.truncate_to_canonical_form();
        }

        quot.truncate_to_canonical_form();
        Some((quot, rem))
    }

    /// The remainder of `a` divided by `b` in `Z_M[x]`.
    pub fn rem(&self, a: &Poly, b: &Poly) -> Option<Poly> {
        self.divmod(a, b).map(|(_, rem)| rem)
    }

    /// The monic greatest common divisor of `a` and `b` in `Z_M[x]`.
    ///
    /// Meaningful when `M` is prime; a failed leading-coefficient inversion
    /// reports `None`.
    pub fn gcd(&self, a: &Poly, b: &Poly) -> Option<Poly> {
        let mut r_prev = a.clone();
        self.canonicalize(&mut r_prev);
        let mut r_cur = b.clone();
        self.canonicalize(&mut r_cur);

        while !r_cur.is_zero() {
            let (_, r_next) = self.divmod(&r_prev, &r_cur)?;
            r_prev = std::mem::replace(&mut r_cur, r_next);
        }

        if r_prev.is_zero() {
            return Some(r_prev);
        }
        let lead_inv = self.inv_coeff(&r_prev[r_prev.degree()])?;
        Some(self.mul_scalar(&r_prev, &lead_inv))
    }

    /// `baseˆexp` modulo `(M, f)` for a monic `f`, by left-to-right
    /// square-and-multiply.
    pub fn powmod(&self, base: &Poly, exp: &BigUint, f: &Poly) -> Option<Poly> {
        let base = self.rem(base, f)?;
        let mut result = Poly::one();
        for i in (0..exp.bits()).rev() {
            result = self.mul_rem(&result, &result, f)?;
            if exp.bit(i) {
                result = self.mul_rem(&result, &base, f)?;
            }
        }
        Some(result)
    }

    /// `a · b` reduced by a monic `f` (rather than the context polynomial).
    fn mul_rem(&self, a: &Poly, b: &Poly, f: &Poly) -> Option<Poly> {
        let product = karatsuba_mul(a, b);
        self.rem(&product, f)
    }
}
