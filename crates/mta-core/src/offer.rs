use mta_fields::{FieldElement, PrimeField};
use mta_ot_core::Payload;
use rand::Rng;
use serde::{Deserialize, Serialize};
use zeroize::Zeroize;

use crate::encoding;

/// A message transferred for one encoded position of the receiver's input.
///
/// The value lane carries the multiplication correlation, the check lane carries the same
/// correlation under an independent random multiplier. Both lanes travel in one transfer so a
/// single choice selects both.
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize, Zeroize)]
pub struct BitOffer {
    /// `delta_i + t * a` for the sign `t` the message answers.
    pub value: FieldElement,
    /// `delta_hat_i + t * a_hat`.
    pub check: FieldElement,
}

opaque_debug::implement!(BitOffer);

impl BitOffer {
    /// Creates the offer answering `sign`, adding (`+1`) or subtracting (`-1`) each multiplier to
    /// the mask of its lane.
    pub(crate) fn signed(
        field: &PrimeField,
        sign: bool,
        mask: &FieldElement,
        check_mask: &FieldElement,
        multiplier: &FieldElement,
        check_multiplier: &FieldElement,
    ) -> Self {
        Self {
            value: field.add(mask, &encoding::signed(field, sign, multiplier)),
            check: field.add(check_mask, &encoding::signed(field, sign, check_multiplier)),
        }
    }
}

impl Payload for BitOffer {
    fn is_canonical(&self, field: &PrimeField) -> bool {
        field.contains(&self.value) && field.contains(&self.check)
    }

    fn random<R: Rng + ?Sized>(field: &PrimeField, rng: &mut R) -> Self {
        Self {
            value: field.random_element(rng),
            check: field.random_element(rng),
        }
    }

    fn mask(&self, field: &PrimeField, pad: &Self) -> Self {
        Self {
            value: field.add(&self.value, &pad.value),
            check: field.add(&self.check, &pad.check),
        }
    }

    fn unmask(&self, field: &PrimeField, pad: &Self) -> Self {
        Self {
            value: field.sub(&self.value, &pad.value),
            check: field.sub(&self.check, &pad.check),
        }
    }
}
