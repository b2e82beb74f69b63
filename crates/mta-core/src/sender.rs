//! MtA sender.

use std::mem;

use mta_fields::{FieldElement, PrimeField};
use mta_ot_core::{OTChannel, SendHandle};
use num_bigint::BigUint;
use rand::Rng;

use crate::{
    check, encoding,
    msgs::{Challenge, Encoding, Response, Verdict},
    BitOffer, SenderError,
};

/// MtA sender, holding the multiplicative input `a`.
#[derive(Debug)]
pub struct Sender<T: state::State = state::Initialized> {
    field: PrimeField,
    state: T,
}

impl<T: state::State> Sender<T> {
    /// Returns the field of the protocol.
    pub fn field(&self) -> &PrimeField {
        &self.field
    }
}

impl Sender {
    /// Creates a new sender.
    ///
    /// # Arguments
    ///
    /// * `field` - The field of the protocol.
    /// * `a` - The sender's input, which must be in `[0, q)`.
    pub fn new(field: PrimeField, a: impl Into<BigUint>) -> Result<Self, SenderError> {
        let a = field.element(a).map_err(SenderError::InvalidSecret)?;

        Ok(Sender {
            field,
            state: state::Initialized { a },
        })
    }

    /// Samples the masks for this run and starts the bit phase.
    ///
    /// # Arguments
    ///
    /// * `statistical_parameter` - `k`, the run transfers `L + k` positions.
    /// * `rng` - The sender's source of randomness.
    pub fn start<R: Rng + ?Sized>(
        mut self,
        statistical_parameter: usize,
        rng: &mut R,
    ) -> Sender<state::BitPhase> {
        let len = encoding::positions(&self.field, statistical_parameter);
        let a_hat = self.field.random_element(rng);
        let masks = (0..len).map(|_| self.field.random_element(rng)).collect();
        let check_masks = (0..len).map(|_| self.field.random_element(rng)).collect();

        Sender {
            field: self.field.clone(),
            state: state::BitPhase {
                a: mem::take(&mut self.state.a),
                a_hat,
                masks,
                check_masks,
                sent: 0,
            },
        }
    }
}

impl Sender<state::BitPhase> {
    /// Returns the number of positions which remain to be sent.
    pub fn remaining(&self) -> usize {
        self.state.masks.len() - self.state.sent
    }

    /// Offers the pair of messages for the next position.
    ///
    /// For position `i` the message chosen with `-1` is `(delta_i - a, delta_hat_i - a_hat)` and
    /// the message chosen with `+1` is `(delta_i + a, delta_hat_i + a_hat)`.
    ///
    /// # Arguments
    ///
    /// * `channel` - The OT channel.
    pub fn send_bit<C: OTChannel<BitOffer> + ?Sized>(
        &mut self,
        channel: &mut C,
    ) -> Result<SendHandle, SenderError> {
        let i = self.state.sent;
        if i == self.state.masks.len() {
            return Err(SenderError::BitPhaseComplete(i));
        }

        let phase = &self.state;
        let [minus, plus] = [false, true].map(|sign| {
            BitOffer::signed(
                &self.field,
                sign,
                &phase.masks[i],
                &phase.check_masks[i],
                &phase.a,
                &phase.a_hat,
            )
        });

        let handle = channel.send([minus, plus])?;
        self.state.sent += 1;

        Ok(handle)
    }

    /// Ends the bit phase.
    ///
    /// Fails unless a message pair was sent for every position.
    pub fn finish_bits(mut self) -> Result<Sender<state::CheckPhase>, SenderError> {
        let expected = self.state.masks.len();
        if self.state.sent != expected {
            return Err(SenderError::IncompleteBitPhase {
                sent: self.state.sent,
                expected,
            });
        }

        Ok(Sender {
            field: self.field.clone(),
            state: state::CheckPhase {
                a: mem::take(&mut self.state.a),
                a_hat: mem::take(&mut self.state.a_hat),
                masks: mem::take(&mut self.state.masks),
                check_masks: mem::take(&mut self.state.check_masks),
            },
        })
    }
}

impl Sender<state::CheckPhase> {
    /// Answers the receiver's challenge.
    ///
    /// # Arguments
    ///
    /// * `challenge` - The receiver's challenge.
    pub fn respond(
        mut self,
        challenge: &Challenge,
    ) -> Result<(Sender<state::Responded>, Response), SenderError> {
        check::validate_challenge(&self.field, self.state.masks.len(), challenge)
            .map_err(SenderError::MalformedChallenge)?;

        let phase = &self.state;
        let response = check::respond(
            &self.field,
            &phase.a,
            &phase.a_hat,
            &phase.masks,
            &phase.check_masks,
            challenge,
        );

        Ok((
            Sender {
                field: self.field.clone(),
                state: state::Responded {
                    masks: mem::take(&mut self.state.masks),
                },
            },
            response,
        ))
    }
}

impl Sender<state::Responded> {
    /// Applies the receiver's verdict.
    ///
    /// On acceptance the output is `alpha = -sum_i delta_i v_i` for the revealed coefficients
    /// `v`. A rejection aborts the run and scrubs the masks.
    pub fn finalize(self, verdict: Verdict) -> Result<Sender<state::Done>, SenderError> {
        let Verdict::Accepted(Encoding { coefficients }) = verdict else {
            return Err(SenderError::CheckAborted);
        };

        let expected = self.state.masks.len();
        if coefficients.len() != expected {
            return Err(SenderError::MalformedEncoding(format!(
                "expected {expected} coefficients, got {}",
                coefficients.len()
            )));
        }

        if !coefficients.iter().all(|v| self.field.contains(v)) {
            return Err(SenderError::MalformedEncoding(
                "coefficients must be field elements".to_string(),
            ));
        }

        let alpha = self.field.neg(&encoding::inner_product(
            &self.field,
            &self.state.masks,
            &coefficients,
        ));

        Ok(Sender {
            field: self.field.clone(),
            state: state::Done { alpha },
        })
    }
}

impl Sender<state::Done> {
    /// Returns the sender's output share `alpha`.
    pub fn output(&self) -> &FieldElement {
        &self.state.alpha
    }

    /// Consumes the sender, returning its output share `alpha`.
    pub fn into_output(mut self) -> FieldElement {
        mem::take(&mut self.state.alpha)
    }
}

/// The sender's state.
pub mod state {
    use mta_fields::FieldElement;
    use zeroize::{Zeroize, ZeroizeOnDrop};

    mod sealed {
        pub trait Sealed {}
        impl Sealed for super::Initialized {}
        impl Sealed for super::BitPhase {}
        impl Sealed for super::CheckPhase {}
        impl Sealed for super::Responded {}
        impl Sealed for super::Done {}
    }

    /// The sender's state.
    pub trait State: sealed::Sealed {}

    /// The sender's initial state.
    #[derive(Zeroize, ZeroizeOnDrop)]
    pub struct Initialized {
        pub(super) a: FieldElement,
    }

    impl State for Initialized {}
    opaque_debug::implement!(Initialized);

    /// The sender's state while offering one message pair per position.
    #[derive(Zeroize, ZeroizeOnDrop)]
    pub struct BitPhase {
        pub(super) a: FieldElement,
        /// Check multiplier.
        pub(super) a_hat: FieldElement,
        /// Value lane masks `delta_i`.
        pub(super) masks: Vec<FieldElement>,
        /// Check lane masks `delta_hat_i`.
        pub(super) check_masks: Vec<FieldElement>,
        /// Number of positions offered so far.
        pub(super) sent: usize,
    }

    impl State for BitPhase {}
    opaque_debug::implement!(BitPhase);

    /// The sender's state after all positions were offered, awaiting the challenge.
    #[derive(Zeroize, ZeroizeOnDrop)]
    pub struct CheckPhase {
        pub(super) a: FieldElement,
        pub(super) a_hat: FieldElement,
        pub(super) masks: Vec<FieldElement>,
        pub(super) check_masks: Vec<FieldElement>,
    }

    impl State for CheckPhase {}
    opaque_debug::implement!(CheckPhase);

    /// The sender's state after responding, awaiting the verdict.
    #[derive(Zeroize, ZeroizeOnDrop)]
    pub struct Responded {
        pub(super) masks: Vec<FieldElement>,
    }

    impl State for Responded {}
    opaque_debug::implement!(Responded);

    /// The sender's final state.
    #[derive(Zeroize, ZeroizeOnDrop)]
    pub struct Done {
        pub(super) alpha: FieldElement,
    }

    impl State for Done {}
    opaque_debug::implement!(Done);
}
