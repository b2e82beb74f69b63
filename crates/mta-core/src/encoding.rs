//! Randomized encoding of the receiver's input.
//!
//! The receiver does not use the bits of `b` as its choices. Instead it draws `n = L + k` uniform
//! signs `t_i` in `{-1, +1}` and, once the transfers are checked, reveals coefficients `v` with
//! `sum_i t_i v_i = b`. The choices are independent of `b`, so whether a run aborts tells the
//! sender nothing about it. `v` is uniform among the solutions for the hidden signs.
//!
//! Signs are represented as choice bits, `true` standing for `+1`.

use mta_fields::{FieldElement, PrimeField};
use rand::Rng;

/// Returns the number of encoded positions `n = L + k`.
pub(crate) fn positions(field: &PrimeField, statistical_parameter: usize) -> usize {
    field.bit_len() + statistical_parameter
}

/// Samples `len` uniform signs.
pub(crate) fn sample_signs<R: Rng + ?Sized>(len: usize, rng: &mut R) -> Vec<bool> {
    (0..len).map(|_| rng.gen()).collect()
}

/// Returns `x` if `sign` is `+1`, otherwise `-x`.
pub(crate) fn signed(field: &PrimeField, sign: bool, x: &FieldElement) -> FieldElement {
    if sign {
        x.clone()
    } else {
        field.neg(x)
    }
}

/// Returns `sum_i t_i x_i`.
pub(crate) fn signed_sum(field: &PrimeField, signs: &[bool], xs: &[FieldElement]) -> FieldElement {
    signs
        .iter()
        .zip(xs)
        .fold(FieldElement::zero(), |acc, (&sign, x)| {
            field.add(&acc, &signed(field, sign, x))
        })
}

/// Returns `sum_i x_i y_i`.
pub(crate) fn inner_product(
    field: &PrimeField,
    xs: &[FieldElement],
    ys: &[FieldElement],
) -> FieldElement {
    xs.iter().zip(ys).fold(FieldElement::zero(), |acc, (x, y)| {
        field.add(&acc, &field.mul(x, y))
    })
}

/// Samples coefficients `v` with `sum_i t_i v_i = b`.
///
/// All coefficients are drawn uniformly, then a random one absorbs the difference to `b`.
/// `signs` must not be empty.
pub(crate) fn encode<R: Rng + ?Sized>(
    field: &PrimeField,
    b: &FieldElement,
    signs: &[bool],
    rng: &mut R,
) -> Vec<FieldElement> {
    let mut coefficients: Vec<FieldElement> =
        (0..signs.len()).map(|_| field.random_element(rng)).collect();

    let j = rng.gen_range(0..signs.len());
    let excess = field.sub(b, &signed_sum(field, signs, &coefficients));
    // t_j^2 = 1
    coefficients[j] = field.add(&coefficients[j], &signed(field, signs[j], &excess));

    coefficients
}
