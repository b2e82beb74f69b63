//! This crate provides arithmetic over prime fields `Z_q` whose modulus is chosen at runtime.
//!
//! Elements are canonical residues in `[0, q)` and do not carry their modulus. All operations are
//! performed through a [`PrimeField`], which is validated once at construction.

#![deny(missing_docs, unreachable_pub, unused_must_use)]
#![deny(clippy::all)]
#![forbid(unsafe_code)]

mod prime;

use std::fmt::{Display, Formatter};

use num_bigint::{BigUint, RandBigInt};
use rand::Rng;
use serde::{Deserialize, Serialize};
use zeroize::Zeroize;

/// A field error.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FieldError {
    /// The modulus is not a prime `>= 2`.
    #[error("invalid modulus: {0} is not a prime >= 2")]
    InvalidModulus(BigUint),
    /// The value is not a canonical element of the field.
    #[error("value is not an element of Z_{modulus}")]
    NotInField {
        /// The modulus of the field.
        modulus: BigUint,
    },
}

/// An element of a prime field, stored as its canonical residue.
#[derive(Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FieldElement(BigUint);

opaque_debug::implement!(FieldElement);

impl FieldElement {
    /// Returns the additive identity.
    pub fn zero() -> Self {
        Self(BigUint::default())
    }

    /// Returns the multiplicative identity.
    pub fn one() -> Self {
        Self(BigUint::from(1u8))
    }

    /// Returns `true` if this is the additive identity.
    pub fn is_zero(&self) -> bool {
        self.0.bits() == 0
    }

    /// Returns the residue as an integer.
    pub fn as_biguint(&self) -> &BigUint {
        &self.0
    }

    /// Returns bit `index` of the residue, least significant first.
    pub fn bit(&self, index: usize) -> bool {
        self.0.bit(index as u64)
    }
}

impl From<FieldElement> for BigUint {
    fn from(value: FieldElement) -> Self {
        value.0
    }
}

impl Display for FieldElement {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Best-effort scrub of the value.
///
/// Clearing bits through the public `BigUint` interface overwrites the limbs that hold the value
/// today, but depends on `num-bigint` not reallocating or shrinking the buffer before the last
/// write. Temporaries produced by field arithmetic (`%`, `*` and friends) are dropped without
/// being cleared and are out of reach here.
impl Zeroize for FieldElement {
    fn zeroize(&mut self) {
        // Clearing from the least significant bit keeps the limb buffer alive until every limb has
        // been overwritten.
        for i in 0..self.0.bits() {
            self.0.set_bit(i, false);
        }
    }
}

/// The prime field `Z_q`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrimeField {
    modulus: BigUint,
    bit_len: usize,
}

impl PrimeField {
    /// Creates a new prime field.
    ///
    /// # Arguments
    ///
    /// * `modulus` - The modulus `q`, which must be a prime `>= 2`.
    pub fn new(modulus: impl Into<BigUint>) -> Result<Self, FieldError> {
        let modulus = modulus.into();

        if !prime::is_prime(&modulus, prime::RANDOM_ROUNDS) {
            return Err(FieldError::InvalidModulus(modulus));
        }

        // For a prime q, ceil(log2(q)) is the bit length of q - 1.
        let bit_len = (&modulus - BigUint::from(1u8)).bits() as usize;

        Ok(Self { modulus, bit_len })
    }

    /// Returns the modulus `q`.
    pub fn modulus(&self) -> &BigUint {
        &self.modulus
    }

    /// Returns `L = ceil(log2(q))`, the number of bits of a field element.
    pub fn bit_len(&self) -> usize {
        self.bit_len
    }

    /// Returns `true` if `x` is a canonical element of this field.
    pub fn contains(&self, x: &FieldElement) -> bool {
        x.0 < self.modulus
    }

    /// Converts a value into a field element, failing if it is not in `[0, q)`.
    pub fn element(&self, value: impl Into<BigUint>) -> Result<FieldElement, FieldError> {
        let value = value.into();
        if value < self.modulus {
            Ok(FieldElement(value))
        } else {
            Err(FieldError::NotInField {
                modulus: self.modulus.clone(),
            })
        }
    }

    /// Reduces an arbitrary non-negative integer modulo `q`.
    pub fn reduce(&self, value: impl Into<BigUint>) -> FieldElement {
        FieldElement(value.into() % &self.modulus)
    }

    /// Returns `x + y`.
    pub fn add(&self, x: &FieldElement, y: &FieldElement) -> FieldElement {
        FieldElement((&x.0 + &y.0) % &self.modulus)
    }

    /// Returns `-x`.
    pub fn neg(&self, x: &FieldElement) -> FieldElement {
        if x.is_zero() {
            FieldElement::zero()
        } else {
            FieldElement(&self.modulus - &x.0)
        }
    }

    /// Returns `x - y`.
    pub fn sub(&self, x: &FieldElement, y: &FieldElement) -> FieldElement {
        self.add(x, &self.neg(y))
    }

    /// Returns `x * y`.
    pub fn mul(&self, x: &FieldElement, y: &FieldElement) -> FieldElement {
        FieldElement((&x.0 * &y.0) % &self.modulus)
    }

    /// Returns `2^exp`.
    pub fn two_pow(&self, exp: usize) -> FieldElement {
        self.reduce(BigUint::from(1u8) << exp)
    }

    /// Returns the sum of all elements.
    pub fn sum<'a>(&self, elements: impl IntoIterator<Item = &'a FieldElement>) -> FieldElement {
        elements
            .into_iter()
            .fold(FieldElement::zero(), |acc, x| self.add(&acc, x))
    }

    /// Samples a uniformly random element.
    pub fn random_element<R: Rng + ?Sized>(&self, rng: &mut R) -> FieldElement {
        FieldElement(rng.gen_biguint_below(&self.modulus))
    }

    /// Samples a uniformly random nonzero element.
    pub fn random_nonzero<R: Rng + ?Sized>(&self, rng: &mut R) -> FieldElement {
        FieldElement(rng.gen_biguint_range(&BigUint::from(1u8), &self.modulus))
    }

    /// Decomposes `x` into `len` bits, least significant first.
    ///
    /// Bits beyond the bit length of `x` are `false`.
    pub fn bits_of(&self, x: &FieldElement, len: usize) -> Vec<bool> {
        (0..len).map(|i| x.bit(i)).collect()
    }

    /// Reconstructs `sum b_i * 2^i` from bits, least significant first.
    pub fn from_bits(&self, bits: &[bool]) -> FieldElement {
        bits.iter()
            .enumerate()
            .filter(|(_, &bit)| bit)
            .fold(FieldElement::zero(), |acc, (i, _)| {
                self.add(&acc, &self.two_pow(i))
            })
    }
}
