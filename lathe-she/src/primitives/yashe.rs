//! Implementation of the YASHE cryptosystem
//! `<https://eprint.iacr.org/2013/075.pdf>`
//!
//! A scheme instance has two lifecycle phases: *parametrised* after
//! [`Yashe::new`], and *keyed* after [`Yashe::keygen`]. Encryption,
//! decryption and the homomorphic operations require the keyed phase and
//! fail with [`Error::KeysNotReady`] before it. `keygen` takes `&mut self`
//! and is the only mutating operation; once it returns, the instance is
//! read-only and can be shared across threads.

use itertools::izip;
use log::{debug, warn};
use num_bigint::BigInt;
use num_traits::{One, ToPrimitive, Zero};
use once_cell::sync::OnceCell;
use rand::{CryptoRng, Rng};
use rand_distr::{Distribution, Normal};

use crate::conf::SchemeParams;
use crate::error::Error;
use crate::primitives::batch::SlotEncoder;
use crate::primitives::number_theory;
use crate::primitives::poly::{inverse, CycloModulus, Poly};
use crate::primitives::radix::RadixDecomposer;

#[cfg(test)]
pub mod test;

/// Secret keys sampled before key generation reports failure.
pub const MAX_KEYGEN_ATTEMPTS: usize = 64;
const_assert!(MAX_KEYGEN_ATTEMPTS > 0);

/// Yashe scheme instance.
///
/// Owns the parameters, the per-ring reduction contexts, and (after
/// [`Yashe::keygen`]) the public and evaluation keys. The secret key is
/// returned to the caller and never stored.
#[derive(Clone, Debug)]
pub struct Yashe {
    /// The validated parameters.
    params: SchemeParams,
    /// The ring degree `n = φ(m)`.
    degree: usize,
    /// `Δ = ⌊q/t⌋`, the plaintext embedding factor.
    delta: BigInt,
    /// The ciphertext ring `Z_q[x]/Φ`.
    mod_q: CycloModulus,
    /// The wide ring holding round-multiply products.
    ///
    /// Its modulus is `n·q²`: big enough for any coefficient of a product
    /// of canonical operands, and a multiple of q², so a wrapped
    /// coefficient still rounds to the correct residue.
    mod_wide: CycloModulus,
    /// The plaintext ring `Z_t[x]/Φ`.
    mod_t: CycloModulus,
    /// The base-w machinery shared by key generation and key switching.
    decomposer: RadixDecomposer,
    /// The slot table, built on first batched operation.
    slots: OnceCell<SlotEncoder>,
    /// The public material, present in the keyed phase.
    keys: Option<SchemeKeys>,
}

/// Private key struct
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct PrivateKey {
    /// The secret key `f = t·f' + 1`, invertible in `R_q`.
    pub f: Poly,
    /// The inverse of `f` in `R_q`.
    pub f_inv: Poly,
}

/// Public key struct
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct PublicKey {
    /// The public key `h = t·g·f⁻¹`.
    pub h: Poly,
}

/// Evaluation key struct
///
/// `parts[i] = f·wⁱ + eᵢ + h·sᵢ`: a masked powers-of-w encoding of the
/// secret key, consumed by key switching.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct EvaluationKey {
    /// One part per radix digit, ℓ in total.
    pub parts: Vec<Poly>,
}

/// The public material owned by a keyed instance.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct SchemeKeys {
    /// Read by every encryption.
    pub public_key: PublicKey,
    /// Read by every key switch.
    pub eval_key: EvaluationKey,
}

/// Message struct
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Message {
    /// Message encoded as a polynomial with coefficients in `[0, t)`.
    pub m: Poly,
}

/// Ciphertext struct
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Ciphertext {
    /// Ciphertext encoded as a polynomial in `R_q`.
    pub c: Poly,
}

impl Yashe {
    /// Yashe constructor: derives the ring contexts from the parameters.
    pub fn new(params: SchemeParams) -> Result<Self, Error> {
        params.validate()?;

        let degree = number_theory::euler_totient(params.m) as usize;
        let phi = number_theory::cyclotomic_poly(params.m);
        let delta = &params.q / BigInt::from(params.t);
        let wide_modulus = BigInt::from(degree as u64) * &params.q * &params.q;

        let mod_q = CycloModulus::new(params.q.clone(), phi.clone());
        let mod_wide = CycloModulus::new(wide_modulus, phi.clone());
        let mod_t = CycloModulus::new(BigInt::from(params.t), phi);
        let decomposer = RadixDecomposer::new(params.radix.clone(), &params.q);

        let scheme = Self {
            params,
            degree,
            delta,
            mod_q,
            mod_wide,
            mod_t,
            decomposer,
            slots: OnceCell::new(),
            keys: None,
        };
        scheme.warn_on_tight_noise_budget();
        Ok(scheme)
    }

    /// Generate the key pair: store the public material, return the secret.
    ///
    /// Secret keys are sampled until an invertible `f` is found, up to
    /// [`MAX_KEYGEN_ATTEMPTS`] tries.
    pub fn keygen<R: Rng + CryptoRng>(&mut self, rng: &mut R) -> Result<PrivateKey, Error> {
        let t = BigInt::from(self.params.t);

        for attempt in 1..=MAX_KEYGEN_ATTEMPTS {
            // f = t·f' + 1
            let f_small = self.sample_key(rng);
            let mut f = self.mod_q.mul_scalar(&f_small, &t);
            f = self.mod_q.add(&f, &Poly::one());

            let f_inv = match inverse(&self.mod_q, &f) {
                Some(f_inv) => f_inv,
                None => {
                    debug!("keygen attempt {attempt}: secret key not invertible, resampling");
                    continue;
                }
            };
            // a composite q can yield a spurious unit from the gcd
            if self.mod_q.mul(&f, &f_inv) != Poly::one() {
                debug!("keygen attempt {attempt}: inverse check failed, resampling");
                continue;
            }

            // h = t·g·f⁻¹
            let g = self.sample_key(rng);
            let h = self
                .mod_q
                .mul_scalar(&self.mod_q.mul(&g, &f_inv), &t);

            // ekᵢ = f·wⁱ + eᵢ + h·sᵢ
            let powers = self.decomposer.powers(&f, &self.mod_q);
            let mut parts = Vec::with_capacity(powers.len());
            for power in powers {
                let e = self.sample_err(rng);
                let s = self.sample_err(rng);
                let masked = self
                    .mod_q
                    .add(&self.mod_q.add(&power, &e), &self.mod_q.mul(&h, &s));
                parts.push(masked);
            }

            self.keys = Some(SchemeKeys {
                public_key: PublicKey { h },
                eval_key: EvaluationKey { parts },
            });
            return Ok(PrivateKey { f, f_inv });
        }

        Err(Error::KeyGenFailure(MAX_KEYGEN_ATTEMPTS))
    }

    /// Encrypt a message encoded in the polynomial ring:
    /// `c = Δ·m + e + h·s` with `e, s ← χ_err`.
    pub fn encrypt<R: Rng + CryptoRng>(
        &self,
        m: &Message,
        rng: &mut R,
    ) -> Result<Ciphertext, Error> {
        let keys = self.keyed()?;

        let s = self.sample_err(rng);
        let e = self.sample_err(rng);

        let mut c = self.mod_q.mul(&keys.public_key.h, &s);
        c = self.mod_q.add(&c, &e);
        c = self
            .mod_q
            .add(&c, &self.mod_q.mul_scalar(&m.m, &self.delta));

        Ok(Ciphertext { c })
    }

    /// Encrypt a scalar: the message polynomial with only the constant
    /// term set.
    pub fn encrypt_scalar<R: Rng + CryptoRng>(
        &self,
        value: u64,
        rng: &mut R,
    ) -> Result<Ciphertext, Error> {
        self.encrypt(&self.scalar_message(value), rng)
    }

    /// Encrypt one scalar per plaintext slot.
    pub fn encrypt_batch<R: Rng + CryptoRng>(
        &self,
        values: &[u64],
        rng: &mut R,
    ) -> Result<Ciphertext, Error> {
        let encoder = self.slot_encoder()?;
        if values.len() > encoder.slot_count() {
            return Err(Error::DimensionMismatch {
                len: values.len(),
                max: encoder.slot_count(),
            });
        }

        let values: Vec<u64> = values.iter().map(|v| v % self.params.t).collect();
        let m = encoder.pack(&self.mod_t, &values)?;
        self.encrypt(&Message { m }, rng)
    }

    /// Decrypt the constant coefficient:
    /// `round(t·(f·c)₀ / q) mod t`.
    pub fn decrypt(&self, c: &Ciphertext, private_key: &PrivateKey) -> Result<u64, Error> {
        self.keyed()?;

        let d = self.mod_q.mul(&private_key.f, &c.c);
        let constant = if d.is_zero() {
            BigInt::zero()
        } else {
            d[0].clone()
        };
        Ok(self.rounded_residue(&constant))
    }

    /// Decrypt every coefficient: the message vector of length `n`.
    pub fn decrypt_vec(
        &self,
        c: &Ciphertext,
        private_key: &PrivateKey,
    ) -> Result<Vec<u64>, Error> {
        self.keyed()?;

        let d = self.mod_q.mul(&private_key.f, &c.c);
        let mut output = vec![0u64; self.degree];
        for (i, coeff) in d.coeffs().iter().enumerate() {
            output[i] = self.rounded_residue(coeff);
        }
        Ok(output)
    }

    /// Decrypt one scalar per plaintext slot.
    pub fn decrypt_batch(
        &self,
        c: &Ciphertext,
        private_key: &PrivateKey,
    ) -> Result<Vec<u64>, Error> {
        self.keyed()?;
        let encoder = self.slot_encoder()?;

        let d = self.mod_q.mul(&private_key.f, &c.c);
        let mut rounded = Poly::non_canonical_zeroes(d.len());
        for (i, coeff) in d.coeffs().iter().enumerate() {
            rounded[i] = BigInt::from(self.rounded_residue(coeff));
        }
        rounded.truncate_to_canonical_form();

        encoder.unpack(&self.mod_t, &rounded)
    }

    /// The modulus-switched product `round((t/q)·a·b)` in `R_q`.
    ///
    /// The product is taken in the wide ring, then every coefficient is
    /// scaled by `t/q` with exact divmod rounding and re-interpreted
    /// modulo `q`. The result decrypts under `f²`; [`Yashe::key_switch`]
    /// brings it back under `f`.
    pub fn round_multiply(&self, a: &Poly, b: &Poly) -> Result<Poly, Error> {
        self.keyed()?;

        let t = BigInt::from(self.params.t);
        let product = self.mod_wide.mul(a, b);

        let mut output = Poly::non_canonical_zeroes(product.len());
        for (i, coeff) in product.coeffs().iter().enumerate() {
            output[i] = rounded_division(&(coeff * &t), &self.params.q);
        }
        self.mod_q.canonicalize(&mut output);
        Ok(output)
    }

    /// Key switching: `Σ radixDecomp(c')ᵢ · ekᵢ`.
    ///
    /// Takes a ring element that decrypts under `f²` (the output of
    /// [`Yashe::round_multiply`]) to one that decrypts under `f`, up to
    /// the decomposition noise.
    pub fn key_switch(&self, input: &Poly) -> Result<Poly, Error> {
        let keys = self.keyed()?;

        let canonical = self.mod_q.reduce(input);
        let decomp = self.decomposer.decompose(&canonical);
        Ok(self.dot(&decomp, &keys.eval_key.parts))
    }

    /// The inner product `Σ aᵢ·bᵢ` in `R_q`.
    fn dot(&self, a: &[Poly], b: &[Poly]) -> Poly {
        let mut output = Poly::zero();
        for (lhs, rhs) in izip!(a, b) {
            output = self.mod_q.add(&output, &self.mod_q.mul(lhs, rhs));
        }
        output
    }

    /// Homomorphic addition: plain ring addition of the ciphertexts.
    pub fn ciphertext_add(&self, c1: &Ciphertext, c2: &Ciphertext) -> Ciphertext {
        Ciphertext {
            c: self.mod_q.add(&c1.c, &c2.c),
        }
    }

    /// Adds a plaintext to a ciphertext without touching the noise budget
    /// beyond the embedding: `c + Δ·m`.
    pub fn ciphertext_add_plain(&self, c: &Ciphertext, m: &Message) -> Ciphertext {
        Ciphertext {
            c: self
                .mod_q
                .add(&c.c, &self.mod_q.mul_scalar(&m.m, &self.delta)),
        }
    }

    /// Multiplies a ciphertext by a plaintext polynomial: the ring product
    /// `c·m`, no key switch needed.
    pub fn ciphertext_mul_plain(&self, c: &Ciphertext, m: &Message) -> Ciphertext {
        Ciphertext {
            c: self.mod_q.mul(&c.c, &m.m),
        }
    }

    /// Homomorphic multiplication: round-multiply, then switch the result
    /// back under the original secret key.
    pub fn ciphertext_mul(
        &self,
        c1: &Ciphertext,
        c2: &Ciphertext,
    ) -> Result<Ciphertext, Error> {
        let wide = self.round_multiply(&c1.c, &c2.c)?;
        Ok(Ciphertext {
            c: self.key_switch(&wide)?,
        })
    }

    /// Plaintext addition in `R_t`, the reference for the homomorphism.
    pub fn plaintext_add(&self, m1: &Message, m2: &Message) -> Message {
        Message {
            m: self.mod_t.add(&m1.m, &m2.m),
        }
    }

    /// Plaintext multiplication in `R_t`, the reference for the
    /// homomorphism.
    pub fn plaintext_mul(&self, m1: &Message, m2: &Message) -> Message {
        Message {
            m: self.mod_t.mul(&m1.m, &m2.m),
        }
    }

    /// Builds a message from plaintext coefficients, each coerced into
    /// `Z_t`.
    pub fn message(&self, coeffs: &[u64]) -> Result<Message, Error> {
        if coeffs.len() > self.degree {
            return Err(Error::DimensionMismatch {
                len: coeffs.len(),
                max: self.degree,
            });
        }

        let mut m = Poly::non_canonical_zeroes(coeffs.len());
        for (i, c) in coeffs.iter().enumerate() {
            m[i] = BigInt::from(c % self.params.t);
        }
        m.truncate_to_canonical_form();
        Ok(Message { m })
    }

    /// The message with only the constant term set.
    pub fn scalar_message(&self, value: u64) -> Message {
        Message {
            m: Poly::constant(BigInt::from(value % self.params.t)),
        }
    }

    /// Sample from message space
    pub fn sample_message<R: Rng + CryptoRng>(&self, rng: &mut R) -> Message {
        let mut m = Poly::non_canonical_zeroes(self.degree);
        for i in 0..self.degree {
            m[i] = BigInt::from(rng.gen_range(0..self.params.t));
        }
        m.truncate_to_canonical_form();
        Message { m }
    }

    /// Sample a polynomial with coefficients independently uniform over
    /// `{−1, 0, 1}`.
    pub fn sample_key<R: Rng + CryptoRng>(&self, rng: &mut R) -> Poly {
        let mut res = Poly::non_canonical_zeroes(self.degree);
        for i in 0..self.degree {
            res[i] = BigInt::from(rng.gen_range(-1_i64..=1));
        }
        res.truncate_to_canonical_form();
        res
    }

    /// Sample a polynomial with small random coefficients using a rounded
    /// gaussian distribution.
    pub fn sample_err<R: Rng + CryptoRng>(&self, rng: &mut R) -> Poly {
        let normal =
            Normal::new(0.0, self.params.std_dev).expect("validated parameters are a valid σ");

        let mut res = Poly::non_canonical_zeroes(self.degree);
        for i in 0..self.degree {
            let v: f64 = normal.sample(rng);
            res[i] = BigInt::from(v.round() as i64);
        }
        res.truncate_to_canonical_form();
        res
    }

    /// The validated parameters.
    pub fn params(&self) -> &SchemeParams {
        &self.params
    }

    /// The plaintext modulus `t`.
    pub fn plain_modulus(&self) -> u64 {
        self.params.t
    }

    /// The ciphertext modulus `q`.
    pub fn cipher_modulus(&self) -> &BigInt {
        &self.params.q
    }

    /// The ring degree `n = φ(m)`.
    pub fn ring_degree(&self) -> usize {
        self.degree
    }

    /// `Δ = ⌊q/t⌋`.
    pub fn modulus_ratio(&self) -> &BigInt {
        &self.delta
    }

    /// The decomposition length `ℓ`.
    pub fn decomp_len(&self) -> usize {
        self.decomposer.digits()
    }

    /// The number of plaintext slots `k`.
    ///
    /// Builds the factor table on first call; fails with
    /// [`Error::InvalidParameter`] when the parameters do not admit
    /// batching.
    pub fn slot_count(&self) -> Result<usize, Error> {
        Ok(self.slot_encoder()?.slot_count())
    }

    /// The public key, in the keyed phase.
    pub fn public_key(&self) -> Result<&PublicKey, Error> {
        Ok(&self.keyed()?.public_key)
    }

    /// The evaluation key, in the keyed phase.
    pub fn eval_key(&self) -> Result<&EvaluationKey, Error> {
        Ok(&self.keyed()?.eval_key)
    }

    /// The key material, or [`Error::KeysNotReady`] in the parametrised
    /// phase.
    fn keyed(&self) -> Result<&SchemeKeys, Error> {
        self.keys.as_ref().ok_or(Error::KeysNotReady)
    }

    /// The slot table, built on first use.
    fn slot_encoder(&self) -> Result<&SlotEncoder, Error> {
        self.slots
            .get_or_try_init(|| SlotEncoder::build(&self.mod_t, self.params.t, self.params.m))
    }

    /// `round(t·value / q) mod t` for a canonical coefficient.
    fn rounded_residue(&self, value: &BigInt) -> u64 {
        let t = BigInt::from(self.params.t);
        let rounded = rounded_division(&(value * &t), &self.params.q);
        (rounded % &t)
            .to_u64()
            .expect("residues modulo t fit in u64")
    }

    /// Logs a warning when one multiplication looks likely to exhaust the
    /// noise budget.
    ///
    /// Expected-case estimate: the worst-case bounds from the paper are so
    /// pessimistic they would reject parameter sets that decrypt reliably
    /// in practice.
    fn warn_on_tight_noise_budget(&self) {
        let n = self.degree as f64;
        let t = self.params.t as f64;
        let sigma = self.params.std_dev;
        let radix = self.params.radix.to_f64().unwrap_or(f64::MAX);
        let q = self.params.q.to_f64().unwrap_or(f64::MAX);

        let depth_one = t * t * n * n.sqrt() * sigma
            + self.decomposer.digits() as f64 * radix * sigma * n.sqrt();
        let budget = q / (2.0 * t);
        if depth_one > budget {
            warn!(
                "noise budget looks exhausted after one multiplication: \
                 estimated noise 2^{:.1} against budget 2^{:.1}",
                depth_one.log2(),
                budget.log2()
            );
        }
    }
}

/// `round(numerator / denominator)` for non-negative operands, entirely in
/// the exact integer domain.
///
/// The rounding rule: take `(quotient, remainder)`, then round up when
/// `2·remainder > denominator`. Ties round down.
pub(crate) fn rounded_division(numerator: &BigInt, denominator: &BigInt) -> BigInt {
    let quotient = numerator / denominator;
    let remainder = numerator - &quotient * denominator;
    if &remainder + &remainder > *denominator {
        quotient + BigInt::one()
    } else {
        quotient
    }
}
