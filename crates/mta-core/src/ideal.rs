//! Ideal MtA functionality.

use mta_fields::{FieldElement, FieldError, PrimeField};
use num_bigint::BigUint;
use rand::Rng;

/// The ideal MtA functionality.
#[derive(Debug, Default)]
pub struct IdealMta {
    counter: usize,
}

impl IdealMta {
    /// Creates a new ideal MtA functionality.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of conversions executed.
    pub fn count(&self) -> usize {
        self.counter
    }

    /// Converts the inputs `a` and `b` into additive shares of `a * b`.
    ///
    /// Returns `(alpha, beta)` where `alpha` is uniformly random and `alpha + beta = a * b`.
    pub fn generate<R: Rng + ?Sized>(
        &mut self,
        field: &PrimeField,
        a: impl Into<BigUint>,
        b: impl Into<BigUint>,
        rng: &mut R,
    ) -> Result<(FieldElement, FieldElement), FieldError> {
        let a = field.element(a)?;
        let b = field.element(b)?;

        let alpha = field.random_element(rng);
        let beta = field.sub(&field.mul(&a, &b), &alpha);

        self.counter += 1;

        Ok((alpha, beta))
    }
}
