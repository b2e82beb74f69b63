//! Batched consistency check over the transferred offers.
//!
//! The sender embeds `a` in the value lane and an independent uniform `a_hat` in the check lane.
//! After all transfers the receiver draws `theta` and nonzero weights `w_i`. The sender answers
//! with
//!
//! ```text
//! eta = a_hat + theta * a
//! mu  = sum_i w_i (delta_hat_i + theta * delta_i)
//! ```
//!
//! and the receiver accepts iff `sum_i w_i (z_hat_i + theta * z_i - t_i * eta) == mu`.
//!
//! `eta` is masked by `a_hat` and `mu` is determined by values the receiver already holds, so the
//! response reveals nothing about `a`. If the multipliers selected at two positions differ, the
//! combined multipliers agree for at most one `theta`.

use mta_fields::{FieldElement, PrimeField};
use rand::Rng;

use crate::{
    encoding,
    msgs::{Challenge, Response},
    BitOffer,
};

/// Samples a challenge for `len` positions.
pub(crate) fn sample_challenge<R: Rng + ?Sized>(
    field: &PrimeField,
    len: usize,
    rng: &mut R,
) -> Challenge {
    let theta = field.random_element(rng);
    let weights = (0..len).map(|_| field.random_nonzero(rng)).collect();

    Challenge { theta, weights }
}

/// Checks that a challenge is well formed for `len` positions.
pub(crate) fn validate_challenge(
    field: &PrimeField,
    len: usize,
    challenge: &Challenge,
) -> Result<(), String> {
    if challenge.weights.len() != len {
        return Err(format!(
            "expected {len} weights, got {}",
            challenge.weights.len()
        ));
    }

    if !field.contains(&challenge.theta) {
        return Err("theta is not a field element".to_string());
    }

    if !challenge
        .weights
        .iter()
        .all(|w| field.contains(w) && !w.is_zero())
    {
        return Err("weights must be nonzero field elements".to_string());
    }

    Ok(())
}

/// Checks that a response is well formed.
pub(crate) fn validate_response(field: &PrimeField, response: &Response) -> Result<(), String> {
    if !field.contains(&response.eta) || !field.contains(&response.mu) {
        return Err("response is not a pair of field elements".to_string());
    }

    Ok(())
}

/// Computes the sender's response.
///
/// # Arguments
///
/// * `field` - The field.
/// * `a` - The sender's input.
/// * `a_hat` - The check multiplier.
/// * `masks` - The value lane masks `delta_i`.
/// * `check_masks` - The check lane masks `delta_hat_i`.
/// * `challenge` - A validated challenge.
pub(crate) fn respond(
    field: &PrimeField,
    a: &FieldElement,
    a_hat: &FieldElement,
    masks: &[FieldElement],
    check_masks: &[FieldElement],
    challenge: &Challenge,
) -> Response {
    let Challenge { theta, weights } = challenge;

    let eta = field.add(a_hat, &field.mul(theta, a));
    let mu = weights
        .iter()
        .zip(masks.iter().zip(check_masks))
        .fold(FieldElement::zero(), |acc, (w, (delta, delta_hat))| {
            let combined = field.add(delta_hat, &field.mul(theta, delta));
            field.add(&acc, &field.mul(w, &combined))
        });

    Response { eta, mu }
}

/// Returns `true` if the response is consistent with the received offers.
///
/// # Arguments
///
/// * `field` - The field.
/// * `signs` - The receiver's choices.
/// * `received` - The received offers `z_i`.
/// * `challenge` - The challenge sent to the sender.
/// * `response` - A validated response.
pub(crate) fn verify(
    field: &PrimeField,
    signs: &[bool],
    received: &[BitOffer],
    challenge: &Challenge,
    response: &Response,
) -> bool {
    let Challenge { theta, weights } = challenge;
    let Response { eta, mu } = response;

    let lhs = weights.iter().zip(signs.iter().zip(received)).fold(
        FieldElement::zero(),
        |acc, (w, (&sign, z))| {
            let u = field.sub(
                &field.add(&z.check, &field.mul(theta, &z.value)),
                &encoding::signed(field, sign, eta),
            );
            field.add(&acc, &field.mul(w, &u))
        },
    );

    lhs == *mu
}
