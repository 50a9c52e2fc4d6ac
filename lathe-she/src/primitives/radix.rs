//! Base-w decomposition of scalars and ring elements.
//!
//! Key switching relies on the identity `Σ pᵢ·wⁱ ≡ p (mod q)` between a
//! decomposed ciphertext and the powers-of-w evaluation key; both halves of
//! that identity live here.

use num_bigint::BigInt;
use num_traits::{One, Zero};

use crate::primitives::poly::{CycloModulus, Poly};

/// Base-w digit decomposition with a fixed digit count
/// `ℓ = ⌊log_w q⌋ + 1`, so every canonical scalar in `[0, q)` decomposes
/// without loss.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RadixDecomposer {
    /// The radix `w`.
    radix: BigInt,
    /// The digit count `ℓ`.
    digits: usize,
}

impl RadixDecomposer {
    /// Builds a decomposer for scalars below `modulus`.
    ///
    /// The digit count is found by exact integer search: the smallest `ℓ`
    /// with `wˆℓ > modulus`.
    pub fn new(radix: BigInt, modulus: &BigInt) -> Self {
        debug_assert!(radix >= BigInt::from(2));

        let mut digits = 0;
        let mut pow = BigInt::one();
        while &pow <= modulus {
            pow *= &radix;
            digits += 1;
        }

        Self { radix, digits }
    }

    /// The digit count `ℓ`.
    pub fn digits(&self) -> usize {
        self.digits
    }

    /// The radix `w`.
    pub fn radix(&self) -> &BigInt {
        &self.radix
    }

    /// The base-w digits of a scalar in `[0, wˆℓ)`, least significant
    /// first, each in `[0, w)`.
    pub fn decompose_coeff(&self, input: &BigInt) -> Vec<BigInt> {
        let mut output = Vec::with_capacity(self.digits);
        let mut numerator = input.clone();
        for _ in 0..self.digits {
            let quotient = &numerator / &self.radix;
            let remainder = &numerator - &quotient * &self.radix;
            output.push(remainder);
            numerator = quotient;
        }
        debug_assert!(numerator.is_zero(), "input had more than ℓ digits");
        output
    }

    /// Coefficient-wise decomposition of a canonical ring element into ℓ
    /// ring elements with coefficients in `[0, w)`.
    pub fn decompose(&self, poly: &Poly) -> Vec<Poly> {
        let mut output = vec![Poly::non_canonical_zeroes(poly.len()); self.digits];
        for (i, c) in poly.coeffs().iter().enumerate() {
            for (j, digit) in self.decompose_coeff(c).into_iter().enumerate() {
                output[j][i] = digit;
            }
        }
        for p in &mut output {
            p.truncate_to_canonical_form();
        }
        output
    }

    /// `(p, p·w, p·w², …, p·wˆ{ℓ−1})`, each reduced in the ring context.
    pub fn powers(&self, poly: &Poly, ctx: &CycloModulus) -> Vec<Poly> {
        let mut output = Vec::with_capacity(self.digits);
        output.push(ctx.reduce(poly));
        for i in 1..self.digits {
            let next = ctx.mul_scalar(&output[i - 1], &self.radix);
            output.push(next);
        }
        output
    }
}

#[cfg(test)]
mod tests {
    use num_bigint::BigInt;
    use num_traits::{One, Zero};

    use super::RadixDecomposer;
    use crate::primitives::number_theory::cyclotomic_poly;
    use crate::primitives::poly::test::gen::rand_poly;
    use crate::primitives::poly::{CycloModulus, Poly};

    /// q = 2^61 − 1 and w = 2^16 give ℓ = 4.
    fn decomposer() -> (RadixDecomposer, BigInt) {
        let q = BigInt::from(2_305_843_009_213_693_951_u64);
        (RadixDecomposer::new(BigInt::from(1_u64 << 16), &q), q)
    }

    fn ring() -> CycloModulus {
        let q = BigInt::from(2_305_843_009_213_693_951_u64);
        CycloModulus::new(q, cyclotomic_poly(64))
    }

    #[test]
    fn digit_count_is_log_radix_plus_one() {
        let (decomposer, _) = decomposer();
        assert_eq!(decomposer.digits(), 4);

        // an exact power boundary: ⌊log_2 8⌋ + 1 = 4
        let exact = RadixDecomposer::new(BigInt::from(2), &BigInt::from(8));
        assert_eq!(exact.digits(), 4);
    }

    #[test]
    fn scalar_digits_recompose() {
        let (decomposer, q) = decomposer();
        let samples = [
            BigInt::zero(),
            BigInt::one(),
            BigInt::from(123_456_789_u64),
            &q - BigInt::one(),
        ];
        for x in samples {
            let digits = decomposer.decompose_coeff(&x);
            assert_eq!(digits.len(), decomposer.digits());

            let mut recomposed = BigInt::zero();
            let mut power = BigInt::one();
            for digit in &digits {
                assert!(digit >= &BigInt::zero() && digit < decomposer.radix());
                recomposed += digit * &power;
                power *= decomposer.radix();
            }
            assert_eq!(recomposed, x);
        }
    }

    #[test]
    fn poly_digits_recompose() {
        let mut rng = lathe_test::test_rng();
        let (decomposer, _) = decomposer();
        let ctx = ring();
        let p = rand_poly(ctx.degree(), ctx.coeff_modulus(), &mut rng);

        let decomp = decomposer.decompose(&p);
        let mut recomposed = Poly::zero();
        let mut power = BigInt::one();
        for part in &decomp {
            let mut scaled = part.clone();
            scaled *= &power;
            recomposed += &scaled;
            power *= decomposer.radix();
        }
        assert_eq!(recomposed, p);
    }

    #[test]
    fn powers_scale_by_the_radix() {
        let mut rng = lathe_test::test_rng();
        let (decomposer, _) = decomposer();
        let ctx = ring();
        let p = rand_poly(ctx.degree(), ctx.coeff_modulus(), &mut rng);

        let powers = decomposer.powers(&p, &ctx);
        assert_eq!(powers.len(), decomposer.digits());

        let mut scale = BigInt::one();
        for power in &powers {
            assert_eq!(power, &ctx.mul_scalar(&p, &scale));
            scale *= decomposer.radix();
        }
    }

    /// The algebraic backbone of key switching:
    /// `Σ decompose(a)ᵢ · powers(b)ᵢ ≡ a·b (mod q, Φ)`.
    #[test]
    fn decompose_dot_powers_is_the_product() {
        let mut rng = lathe_test::test_rng();
        let (decomposer, _) = decomposer();
        let ctx = ring();
        let a = rand_poly(ctx.degree(), ctx.coeff_modulus(), &mut rng);
        let b = rand_poly(ctx.degree(), ctx.coeff_modulus(), &mut rng);

        let decomp = decomposer.decompose(&a);
        let powers = decomposer.powers(&b, &ctx);

        let mut dot = Poly::zero();
        for (d, p) in decomp.iter().zip(&powers) {
            dot = ctx.add(&dot, &ctx.mul(d, p));
        }
        assert_eq!(dot, ctx.mul(&a, &b));
    }
}
