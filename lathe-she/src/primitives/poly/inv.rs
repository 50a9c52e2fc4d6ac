//! Polynomial inverse in the quotient ring.

use num_traits::{One, Zero};

use super::{karatsuba_mul, CycloModulus, Poly};

/// Returns the inverse of `a` modulo the context's `(M, f)`, if it exists.
///
/// Extended euclidean algorithm on `(f, a)`, after Algorithm 3.3.1 (Page
/// 118) of "A Course in Computational Algebraic Number Theory", Henri
/// Cohen. Only the Bézout coefficient of `a` is tracked.
///
/// `None` covers the zero polynomial, a non-trivial gcd with `f`, and any
/// leading coefficient that is not a unit modulo `M` (possible when `M` is
/// composite). Callers that must have an inverse, like key generation,
/// resample and retry.
pub fn inverse(ctx: &CycloModulus, a: &Poly) -> Option<Poly> {
    let a = ctx.reduce(a);
    if a.is_zero() {
        return None;
    }

    // Invariant: x_i·f + y_i·a = r_i

    // init with y0=0, r0=f
    let mut y_prev = Poly::zero();
    let mut r_prev = ctx.poly_modulus().clone();
    // next:     y1=1, r1=a
    let mut y_cur = Poly::one();
    let mut r_cur = a;

    // loop until r_cur = 0
    while !r_cur.is_zero() {
        let (q, r_next) = ctx.divmod(&r_prev, &r_cur)?;
        r_prev = std::mem::replace(&mut r_cur, r_next);

        // y_cur = y_prev - q·y_cur
        (y_cur, y_prev) = update_bezout(ctx, y_prev, y_cur, &q);
    }

    // r_prev is the gcd; a unit gcd means a is invertible
    if r_prev.is_zero() || r_prev.degree() > 0 {
        return None;
    }
    let content_inv = ctx.inv_coeff(&r_prev[0])?;

    Some(ctx.mul_scalar(&y_prev, &content_inv))
}

/// Helps to calculate the equation `cur = prev - q·cur`.
fn update_bezout(ctx: &CycloModulus, mut prev: Poly, cur: Poly, q: &Poly) -> (Poly, Poly) {
    let mul_res = karatsuba_mul(q, &cur);
    let new_prev = cur;

    prev -= mul_res;
    ctx.canonicalize(&mut prev);
    let new_cur = prev;

    (new_cur, new_prev)
}
