//! CRT slot packing.
//!
//! Over `F_t` the cyclotomic modulus splits into `k = n/d` distinct monic
//! irreducible factors, all of degree `d = ord_m(t)`. Packing stores one
//! scalar of `Z_t` per factor; a single homomorphic operation then acts on
//! all `k` slots at once.

use log::debug;
use num_bigint::{BigInt, BigUint};
use num_traits::{One, ToPrimitive, Zero};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::error::Error;
use crate::primitives::number_theory;
use crate::primitives::poly::{CycloModulus, Poly};

/// Seed for the equal-degree splitting draws.
///
/// The factorisation of a public polynomial is not secret, and a fixed seed
/// gives every instance the same factor order, hence the same slot order.
const SPLITTING_SEED: u64 = 0x59415348_45u64;

/// Draws per splitting round before giving up on the factor set.
///
/// Each draw splits with probability at least 1/2, so hitting this bound
/// means the modulus was not the expected product of equal-degree factors.
const MAX_SPLITTING_DRAWS: usize = 128;

/// The factor table and CRT basis for one parameter set.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SlotEncoder {
    /// The monic irreducible factors of the cyclotomic modulus over `F_t`,
    /// in a deterministic order. One plaintext slot each.
    factors: Vec<Poly>,
    /// `basis[i] ≡ 1 (mod factors[i])`, `≡ 0` modulo every other factor.
    basis: Vec<Poly>,
}

impl SlotEncoder {
    /// Factors the plaintext-ring modulus and precomputes the CRT basis.
    ///
    /// Requires `t` to be an odd prime with `gcd(t, m) = 1`: the splitting
    /// below works in the field `F_t` and draws quadratic residues, and the
    /// coprimality keeps the cyclotomic squarefree modulo `t`.
    pub fn build(ctx_t: &CycloModulus, t: u64, m: u64) -> Result<Self, Error> {
        if t == 2 || !number_theory::is_prime(t) {
            return Err(Error::InvalidParameter(
                "batching requires an odd prime plaintext modulus",
            ));
        }
        let order = number_theory::multiplicative_order(t, m)
            .ok_or(Error::InvalidParameter(
                "batching requires the plaintext modulus to be coprime with the cyclotomic index",
            ))?;

        let factors = factor_equal_degree(ctx_t, order as usize, t)?;
        let basis = number_theory::crt_basis(ctx_t, &factors)?;
        debug!(
            "split the cyclotomic modulus into {} slots of degree {}",
            factors.len(),
            order
        );

        Ok(Self { factors, basis })
    }

    /// The number of plaintext slots `k`.
    pub fn slot_count(&self) -> usize {
        self.factors.len()
    }

    /// Packs one scalar per slot: the unique `p ∈ Z_t[x]/Φ` with
    /// `p ≡ values[i] (mod F_i)`, zero in the remaining slots.
    pub fn pack(&self, ctx_t: &CycloModulus, values: &[u64]) -> Result<Poly, Error> {
        number_theory::crt_combine(ctx_t, &self.basis, values)
    }

    /// Reads every slot back: the constant term of `p mod F_i`.
    pub fn unpack(&self, ctx_t: &CycloModulus, p: &Poly) -> Result<Vec<u64>, Error> {
        let mut output = Vec::with_capacity(self.factors.len());
        for f in &self.factors {
            let rem = ctx_t
                .rem(p, f)
                .ok_or(Error::InvalidParameter("slot factor lost its monic lead"))?;
            let slot = if rem.is_zero() {
                0
            } else {
                rem[0].to_u64().expect("canonical residues fit in u64")
            };
            output.push(slot);
        }
        Ok(output)
    }
}

/// Factors the context's polynomial modulus into monic irreducibles, all of
/// degree `degree`, by Cantor–Zassenhaus equal-degree splitting.
///
/// For a product `f` of distinct odd-characteristic irreducibles of degree
/// `d`, a random `u` gives a proper factor `gcd(f, uˆ((tᵈ−1)/2) − 1)` with
/// probability at least 1/2.
fn factor_equal_degree(
    ctx_t: &CycloModulus,
    degree: usize,
    t: u64,
) -> Result<Vec<Poly>, Error> {
    let mut modulus = ctx_t.poly_modulus().clone();
    ctx_t.canonicalize(&mut modulus);
    debug_assert_eq!(ctx_t.degree() % degree, 0);

    // (t^degree − 1) / 2
    let mut exponent = BigUint::from(t).pow(degree as u32);
    exponent -= 1_u32;
    exponent /= 2_u32;

    let mut rng = ChaCha8Rng::seed_from_u64(SPLITTING_SEED);
    let mut pending = vec![modulus];
    let mut factors = Vec::with_capacity(ctx_t.degree() / degree);

    while let Some(f) = pending.pop() {
        if f.degree() == degree {
            factors.push(f);
            continue;
        }

        let mut split = None;
        for _ in 0..MAX_SPLITTING_DRAWS {
            let u = random_poly(f.degree(), t, &mut rng);
            let power = ctx_t
                .powmod(&u, &exponent, &f)
                .ok_or(Error::InvalidParameter("plaintext modulus is not a field"))?;
            let shifted = {
                let mut s = &power - &Poly::one();
                ctx_t.canonicalize(&mut s);
                s
            };
            let g = ctx_t
                .gcd(&f, &shifted)
                .ok_or(Error::InvalidParameter("plaintext modulus is not a field"))?;

            if !g.is_zero() && g.degree() > 0 && g.degree() < f.degree() {
                let (cofactor, rem) = ctx_t
                    .divmod(&f, &g)
                    .ok_or(Error::InvalidParameter("plaintext modulus is not a field"))?;
                debug_assert!(rem.is_zero());
                split = Some((g, cofactor));
                break;
            }
        }

        match split {
            Some((g, cofactor)) => {
                pending.push(g);
                pending.push(cofactor);
            }
            None => {
                return Err(Error::InvalidParameter(
                    "cyclotomic modulus did not split into equal-degree factors",
                ))
            }
        }
    }

    // a deterministic slot order, independent of the splitting path
    factors.sort_by(|a, b| a.coeffs().cmp(b.coeffs()));
    Ok(factors)
}

/// A uniform polynomial over `F_t` with fewer than `len` coefficients.
fn random_poly<R: Rng>(len: usize, t: u64, rng: &mut R) -> Poly {
    let mut p = Poly::non_canonical_zeroes(len);
    for i in 0..len {
        p[i] = BigInt::from(rng.gen_range(0..t));
    }
    p.truncate_to_canonical_form();
    p
}
