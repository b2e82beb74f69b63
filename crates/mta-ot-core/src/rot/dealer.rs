//! Trusted dealer of random oblivious transfers.

use mta_fields::PrimeField;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha12Rng;
use rand_core::{CryptoRng, RngCore};

use crate::{Payload, ROTReceiverOutput, ROTSenderOutput, TransferId};

/// Deals correlated random-OT tables to a sender and a receiver.
///
/// For every dealt OT the sender gets two uniformly random pads `(k_0, k_1)` and the receiver gets
/// a uniformly random choice bit `c` together with `k_c`.
pub struct RotDealer {
    field: PrimeField,
    rng: ChaCha12Rng,
    transfer_id: TransferId,
    counter: usize,
}

opaque_debug::implement!(RotDealer);

impl RotDealer {
    /// Creates a new dealer.
    ///
    /// # Arguments
    ///
    /// * `field` - The field the pads are sampled from.
    /// * `seed` - The seed for the dealer's randomness.
    pub fn new(field: PrimeField, seed: [u8; 32]) -> Self {
        Self {
            field,
            rng: ChaCha12Rng::from_seed(seed),
            transfer_id: TransferId::default(),
            counter: 0,
        }
    }

    /// Creates a new dealer seeded from `rng`.
    pub fn from_rng<R: RngCore + CryptoRng + ?Sized>(field: PrimeField, rng: &mut R) -> Self {
        let mut seed = [0u8; 32];
        rng.fill_bytes(&mut seed);
        Self::new(field, seed)
    }

    /// Returns the id of the next batch.
    pub fn transfer_id(&self) -> TransferId {
        self.transfer_id
    }

    /// Returns the number of OTs dealt.
    pub fn count(&self) -> usize {
        self.counter
    }

    /// Deals a batch of random OTs.
    ///
    /// # Arguments
    ///
    /// * `count` - The number of OTs to deal.
    pub fn random<T: Payload>(
        &mut self,
        count: usize,
    ) -> (ROTSenderOutput<[T; 2]>, ROTReceiverOutput<bool, T>) {
        let msgs: Vec<[T; 2]> = (0..count)
            .map(|_| {
                [
                    T::random(&self.field, &mut self.rng),
                    T::random(&self.field, &mut self.rng),
                ]
            })
            .collect();

        let choices: Vec<bool> = (0..count).map(|_| self.rng.gen()).collect();

        let chosen = choices
            .iter()
            .zip(msgs.iter())
            .map(|(&choice, [zero, one])| if choice { one.clone() } else { zero.clone() })
            .collect();

        self.counter += count;
        let id = self.transfer_id.next_id();

        (
            ROTSenderOutput { id, msgs },
            ROTReceiverOutput {
                id,
                choices,
                msgs: chosen,
            },
        )
    }
}
