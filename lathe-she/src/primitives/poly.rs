//! Dense polynomials over big-integer coefficients.
//!
//! [`Poly`] is the single representation used everywhere in the scheme: a
//! plain element of `Z[x]` with no intrinsic modulus. All modular semantics
//! live in [`CycloModulus`], which every reducing operation takes
//! explicitly; there is no ambient "current modulus" state.

use std::ops::{Add, AddAssign, Mul, MulAssign, Neg, Sub, SubAssign};

use derive_more::{AsRef, Deref, DerefMut, From, Index, IndexMut, Into};
use num_bigint::BigInt;
use num_traits::{One, Zero};

pub mod inv;
pub mod modulus;
pub mod mul;

#[cfg(any(test, feature = "benchmark"))]
pub mod test;

pub use inv::inverse;
pub use modulus::CycloModulus;
pub use mul::{karatsuba_mul, naive_mul};

/// A dense polynomial with [`BigInt`] coefficients, constant term first.
///
/// The canonical form has no trailing zero coefficients, so the zero
/// polynomial is the empty coefficient vector. Raw coefficient access must
/// be followed by a truncation check.
#[derive(
    Clone,
    Debug,
    Default,
    PartialEq,
    Eq,
    Hash,
    AsRef,
    Deref,
    DerefMut,
    From,
    Into,
    Index,
    IndexMut,
)]
pub struct Poly(Vec<BigInt>);

impl Poly {
    /// Converts `coeffs` into a canonical polynomial.
    pub fn from_coefficients_vec(coeffs: Vec<BigInt>) -> Self {
        let mut poly = Self(coeffs);
        poly.truncate_to_canonical_form();
        poly
    }

    /// The constant polynomial `c`.
    pub fn constant(c: BigInt) -> Self {
        Self::from_coefficients_vec(vec![c])
    }

    /// Returns the zero polynomial with `len` coefficient slots.
    ///
    /// This is not the canonical form, but it's useful for building other
    /// polynomials by indexed writes.
    pub fn non_canonical_zeroes(len: usize) -> Self {
        Self(vec![BigInt::zero(); len])
    }

    /// The degree of the polynomial, taking the zero polynomial as degree 0.
    ///
    /// Only meaningful on the canonical form.
    pub fn degree(&self) -> usize {
        self.0.len().saturating_sub(1)
    }

    /// The coefficient slice, constant term first.
    pub fn coeffs(&self) -> &[BigInt] {
        &self.0
    }

    /// Mutable access to the coefficients.
    ///
    /// Raw coefficient access must be followed by a truncation check.
    pub fn coeffs_mut(&mut self) -> &mut [BigInt] {
        &mut self.0
    }

    /// Drops trailing zero coefficients, restoring the canonical form.
    pub fn truncate_to_canonical_form(&mut self) {
        while self.0.last().is_some_and(Zero::is_zero) {
            self.0.pop();
        }
    }

    /// Multiplies by `x^n`, shifting every coefficient up by `n` places.
    pub fn mul_xn(&mut self, n: usize) {
        if self.is_zero() {
            return;
        }
        let mut shifted = vec![BigInt::zero(); n];
        shifted.append(&mut self.0);
        self.0 = shifted;
    }
}

impl Zero for Poly {
    fn zero() -> Self {
        Self(Vec::new())
    }

    fn is_zero(&self) -> bool {
        self.0.is_empty()
    }
}

impl One for Poly {
    fn one() -> Self {
        Self(vec![BigInt::one()])
    }

    fn is_one(&self) -> bool {
        self.0.len() == 1 && self.0[0].is_one()
    }
}

impl Add<&Poly> for &Poly {
    type Output = Poly;

    fn add(self, rhs: &Poly) -> Poly {
        let (longer, shorter) = if self.0.len() >= rhs.0.len() {
            (self, rhs)
        } else {
            (rhs, self)
        };
        let mut res = longer.clone();
        for (i, c) in shorter.0.iter().enumerate() {
            res.0[i] += c;
        }
        res.truncate_to_canonical_form();
        res
    }
}

impl Add for Poly {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        &self + &rhs
    }
}

impl AddAssign<&Poly> for Poly {
    fn add_assign(&mut self, rhs: &Self) {
        if self.0.len() < rhs.0.len() {
            self.0.resize(rhs.0.len(), BigInt::zero());
        }
        for (i, c) in rhs.0.iter().enumerate() {
            self.0[i] += c;
        }
        self.truncate_to_canonical_form();
    }
}

impl AddAssign for Poly {
    fn add_assign(&mut self, rhs: Self) {
        *self += &rhs;
    }
}

impl Sub<&Poly> for &Poly {
    type Output = Poly;

    fn sub(self, rhs: &Poly) -> Poly {
        let mut res = self.clone();
        res -= rhs;
        res
    }
}

impl Sub for Poly {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        &self - &rhs
    }
}

impl SubAssign<&Poly> for Poly {
    fn sub_assign(&mut self, rhs: &Self) {
        if self.0.len() < rhs.0.len() {
            self.0.resize(rhs.0.len(), BigInt::zero());
        }
        for (i, c) in rhs.0.iter().enumerate() {
            self.0[i] -= c;
        }
        self.truncate_to_canonical_form();
    }
}

impl SubAssign for Poly {
    fn sub_assign(&mut self, rhs: Self) {
        *self -= &rhs;
    }
}

impl Neg for Poly {
    type Output = Self;

    fn neg(mut self) -> Self {
        for c in &mut self.0 {
            *c = -std::mem::take(c);
        }
        self
    }
}

impl Mul<&Poly> for &Poly {
    type Output = Poly;

    fn mul(self, rhs: &Poly) -> Poly {
        karatsuba_mul(self, rhs)
    }
}

impl Mul for Poly {
    type Output = Self;

    fn mul(self, rhs: Self) -> Self {
        &self * &rhs
    }
}

impl MulAssign<&BigInt> for Poly {
    fn mul_assign(&mut self, rhs: &BigInt) {
        for c in &mut self.0 {
            *c *= rhs;
        }
        self.truncate_to_canonical_form();
    }
}
