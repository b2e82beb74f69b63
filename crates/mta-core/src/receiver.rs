//! MtA receiver.

use std::mem;

use mta_fields::{FieldElement, PrimeField};
use mta_ot_core::{OTChannel, OTError, Payload, SendHandle};
use num_bigint::BigUint;
use rand::Rng;

use crate::{
    check, encoding,
    msgs::{Challenge, Encoding, Response, Verdict},
    BitOffer, ReceiverError,
};

/// MtA receiver, holding the multiplicative input `b`.
#[derive(Debug)]
pub struct Receiver<T: state::State = state::Initialized> {
    field: PrimeField,
    state: T,
}

impl<T: state::State> Receiver<T> {
    /// Returns the field of the protocol.
    pub fn field(&self) -> &PrimeField {
        &self.field
    }
}

impl Receiver {
    /// Creates a new receiver.
    ///
    /// # Arguments
    ///
    /// * `field` - The field of the protocol.
    /// * `b` - The receiver's input, which must be in `[0, q)`.
    pub fn new(field: PrimeField, b: impl Into<BigUint>) -> Result<Self, ReceiverError> {
        let b = field.element(b).map_err(ReceiverError::InvalidSecret)?;

        Ok(Receiver {
            field,
            state: state::Initialized { b },
        })
    }

    /// Encodes the input and starts the bit phase.
    ///
    /// Draws `n = L + k` uniform signs as the choices for the transfers, then coefficients `v`
    /// with `sum_i t_i v_i = b`. The input itself is not kept.
    ///
    /// # Arguments
    ///
    /// * `statistical_parameter` - `k`, the run transfers `L + k` positions.
    /// * `rng` - The receiver's source of randomness.
    pub fn start<R: Rng + ?Sized>(
        self,
        statistical_parameter: usize,
        rng: &mut R,
    ) -> Receiver<state::BitPhase> {
        let len = encoding::positions(&self.field, statistical_parameter);
        let signs = encoding::sample_signs(len, rng);
        let coefficients = encoding::encode(&self.field, &self.state.b, &signs, rng);

        Receiver {
            field: self.field.clone(),
            state: state::BitPhase {
                signs,
                coefficients,
                received: Vec::with_capacity(len),
                beta: FieldElement::zero(),
            },
        }
    }
}

impl Receiver<state::BitPhase> {
    /// Returns the number of positions which remain to be received.
    pub fn remaining(&self) -> usize {
        self.state.signs.len() - self.state.received.len()
    }

    /// Redeems the transfer for the next position with the corresponding sign.
    ///
    /// # Arguments
    ///
    /// * `channel` - The OT channel.
    /// * `handle` - The sender's handle for this position.
    pub fn receive_bit<C: OTChannel<BitOffer> + ?Sized>(
        &mut self,
        channel: &mut C,
        handle: SendHandle,
    ) -> Result<(), ReceiverError> {
        let i = self.state.received.len();
        if i == self.state.signs.len() {
            return Err(ReceiverError::BitPhaseComplete(i));
        }

        let z = channel.choose(handle, self.state.signs[i])?;
        if !z.is_canonical(&self.field) {
            return Err(OTError::InvalidMessage(handle.id()).into());
        }

        let share = self.field.mul(&z.value, &self.state.coefficients[i]);
        self.state.beta = self.field.add(&self.state.beta, &share);
        self.state.received.push(z);

        Ok(())
    }

    /// Ends the bit phase and samples the consistency check challenge.
    ///
    /// The challenge is drawn from `rng` alone and does not depend on `b`.
    ///
    /// # Arguments
    ///
    /// * `rng` - The receiver's source of randomness.
    pub fn challenge<R: Rng + ?Sized>(
        mut self,
        rng: &mut R,
    ) -> Result<(Receiver<state::CheckPhase>, Challenge), ReceiverError> {
        let expected = self.state.signs.len();
        let received = self.state.received.len();
        if received != expected {
            return Err(ReceiverError::IncompleteBitPhase { received, expected });
        }

        let challenge = check::sample_challenge(&self.field, expected, rng);

        Ok((
            Receiver {
                field: self.field.clone(),
                state: state::CheckPhase {
                    signs: mem::take(&mut self.state.signs),
                    coefficients: mem::take(&mut self.state.coefficients),
                    received: mem::take(&mut self.state.received),
                    beta: mem::take(&mut self.state.beta),
                    challenge: challenge.clone(),
                },
            },
            challenge,
        ))
    }
}

impl Receiver<state::CheckPhase> {
    /// Verifies the sender's response.
    ///
    /// On failure the receiver is consumed and its provisional output scrubbed, and the
    /// coefficients are never revealed.
    ///
    /// # Arguments
    ///
    /// * `response` - The sender's response.
    pub fn verify(
        mut self,
        response: &Response,
    ) -> Result<Receiver<state::Verified>, ReceiverError> {
        check::validate_response(&self.field, response)
            .map_err(ReceiverError::MalformedResponse)?;

        let phase = &self.state;
        if !check::verify(
            &self.field,
            &phase.signs,
            &phase.received,
            &phase.challenge,
            response,
        ) {
            return Err(ReceiverError::ConsistencyCheckFailed);
        }

        Ok(Receiver {
            field: self.field.clone(),
            state: state::Verified {
                coefficients: mem::take(&mut self.state.coefficients),
                beta: mem::take(&mut self.state.beta),
            },
        })
    }
}

impl Receiver<state::Verified> {
    /// Returns the verdict to send to the sender, revealing the coefficients `v`.
    pub fn verdict(&self) -> Verdict {
        Verdict::Accepted(Encoding {
            coefficients: self.state.coefficients.clone(),
        })
    }

    /// Returns the receiver's output share `beta = sum_i z_i v_i`.
    pub fn output(&self) -> &FieldElement {
        &self.state.beta
    }

    /// Consumes the receiver, returning its output share `beta`.
    pub fn into_output(mut self) -> FieldElement {
        mem::take(&mut self.state.beta)
    }
}

/// The receiver's state.
pub mod state {
    use mta_fields::FieldElement;
    use zeroize::{Zeroize, ZeroizeOnDrop};

    use crate::{msgs::Challenge, BitOffer};

    mod sealed {
        pub trait Sealed {}
        impl Sealed for super::Initialized {}
        impl Sealed for super::BitPhase {}
        impl Sealed for super::CheckPhase {}
        impl Sealed for super::Verified {}
    }

    /// The receiver's state.
    pub trait State: sealed::Sealed {}

    /// The receiver's initial state.
    #[derive(Zeroize, ZeroizeOnDrop)]
    pub struct Initialized {
        pub(super) b: FieldElement,
    }

    impl State for Initialized {}
    opaque_debug::implement!(Initialized);

    /// The receiver's state while redeeming one transfer per position.
    #[derive(Zeroize, ZeroizeOnDrop)]
    pub struct BitPhase {
        /// Choices `t_i`, `true` for `+1`.
        pub(super) signs: Vec<bool>,
        /// Coefficients `v_i` with `sum_i t_i v_i = b`.
        pub(super) coefficients: Vec<FieldElement>,
        /// Received offers `z_i`.
        pub(super) received: Vec<BitOffer>,
        /// Running sum `sum_i z_i v_i` over the value lanes.
        pub(super) beta: FieldElement,
    }

    impl State for BitPhase {}
    opaque_debug::implement!(BitPhase);

    /// The receiver's state after sending the challenge, awaiting the response.
    #[derive(Zeroize, ZeroizeOnDrop)]
    pub struct CheckPhase {
        pub(super) signs: Vec<bool>,
        pub(super) coefficients: Vec<FieldElement>,
        pub(super) received: Vec<BitOffer>,
        /// Provisional output.
        pub(super) beta: FieldElement,
        pub(super) challenge: Challenge,
    }

    impl State for CheckPhase {}
    opaque_debug::implement!(CheckPhase);

    /// The receiver's state after a successful check.
    #[derive(Zeroize, ZeroizeOnDrop)]
    pub struct Verified {
        pub(super) coefficients: Vec<FieldElement>,
        pub(super) beta: FieldElement,
    }

    impl State for Verified {}
    opaque_debug::implement!(Verified);
}
