//! This crate provides a multiplicative-to-additive (MtA) share conversion protocol over a prime
//! field, built from oblivious transfer on a randomized encoding of the receiver's input, with a
//! consistency check.
//!
//! The sender holds `a`, the receiver holds `b`. A run returns [`Shares`] with
//! `alpha + beta = a * b (mod q)`, or an [`AbortReason`].
//!
//! ```
//! use mta::{run, Receiver, Sender};
//! use mta_fields::PrimeField;
//! use mta_ot_core::ideal::IdealOTChannel;
//! use rand::SeedableRng;
//! use rand_chacha::ChaCha12Rng;
//!
//! let field = PrimeField::new(65537u64).unwrap();
//! let mut channel = IdealOTChannel::new(field.clone());
//! let mut rng = ChaCha12Rng::seed_from_u64(0);
//!
//! let sender = Sender::new(field.clone(), 12345u64).unwrap();
//! let receiver = Receiver::new(field.clone(), 6789u64).unwrap();
//!
//! let shares = run(sender, receiver, &mut channel, &mut rng).unwrap();
//! assert_eq!(shares.reconstruct(&field), field.element(53919u64).unwrap());
//! ```

#![deny(missing_docs, unreachable_pub, unused_must_use)]
#![deny(unsafe_code)]
#![deny(clippy::all)]

mod config;
mod error;

pub use config::{ProtocolConfig, ProtocolConfigBuilder, ProtocolConfigBuilderError};
pub use error::AbortReason;
pub use mta_core::{
    msgs::{Encoding, Verdict},
    BitOffer, Receiver, ReceiverError, Sender, SenderError,
};

use mta_fields::{FieldElement, PrimeField};
use mta_ot_core::OTChannel;
use rand_chacha::ChaCha12Rng;
use rand_core::{CryptoRng, RngCore, SeedableRng};
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument, trace};
use zeroize::{Zeroize, ZeroizeOnDrop};

/// The output of a run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Zeroize, ZeroizeOnDrop)]
pub struct Shares {
    /// The sender's share.
    pub alpha: FieldElement,
    /// The receiver's share.
    pub beta: FieldElement,
}

impl Shares {
    /// Returns `alpha + beta`.
    pub fn reconstruct(&self, field: &PrimeField) -> FieldElement {
        field.add(&self.alpha, &self.beta)
    }
}

/// Sequences a run between a [`Sender`] and a [`Receiver`].
#[derive(Debug, Clone, Default)]
pub struct Orchestrator {
    config: ProtocolConfig,
}

impl Orchestrator {
    /// Creates a new orchestrator.
    pub fn new(config: ProtocolConfig) -> Self {
        Self { config }
    }

    /// Returns the configuration.
    pub fn config(&self) -> &ProtocolConfig {
        &self.config
    }

    /// Runs the protocol.
    ///
    /// The bit phase offers and redeems one transfer per encoded position, `L + k` in total,
    /// strictly in order. The consistency check follows, and shares are only returned if the
    /// receiver accepts it.
    ///
    /// # Arguments
    ///
    /// * `sender` - The sender, holding `a`.
    /// * `receiver` - The receiver, holding `b`.
    /// * `channel` - The OT channel.
    /// * `rng` - Randomness from which each party's randomness for this run is derived.
    #[instrument(
        level = "debug",
        fields(
            bits = sender.field().bit_len(),
            k = self.config.statistical_parameter()
        ),
        skip_all,
        err
    )]
    pub fn run<C, R>(
        &self,
        sender: Sender,
        receiver: Receiver,
        channel: &mut C,
        rng: &mut R,
    ) -> Result<Shares, AbortReason>
    where
        C: OTChannel<BitOffer> + ?Sized,
        R: RngCore + CryptoRng + ?Sized,
    {
        if sender.field() != receiver.field() {
            return Err(AbortReason::ModulusMismatch {
                sender: sender.field().modulus().clone(),
                receiver: receiver.field().modulus().clone(),
            });
        }

        let bits = sender.field().bit_len();
        let max = self.config.max_modulus_bits();
        if bits > max {
            return Err(AbortReason::ModulusTooLarge { bits, max });
        }

        let mut sender_rng = fork(rng);
        let mut receiver_rng = fork(rng);

        let k = self.config.statistical_parameter();
        let mut sender = sender.start(k, &mut sender_rng);
        let mut receiver = receiver.start(k, &mut receiver_rng);

        debug!(positions = sender.remaining(), "starting bit phase");

        for position in 0..sender.remaining() {
            let handle = sender.send_bit(&mut *channel)?;
            receiver.receive_bit(&mut *channel, handle)?;
            trace!(position, id = %handle.id(), "transferred bit");
        }

        let sender = sender.finish_bits()?;

        debug!("starting consistency check");

        let (receiver, challenge) = receiver.challenge(&mut receiver_rng)?;
        let (sender, response) = sender.respond(&challenge)?;

        let receiver = match receiver.verify(&response) {
            Ok(receiver) => receiver,
            Err(err) => {
                if let Err(abort) = sender.finalize(Verdict::Rejected) {
                    debug!(%abort, "sender aborted");
                }
                return Err(err.into());
            }
        };
        let sender = sender.finalize(receiver.verdict())?;

        debug!("consistency check passed");

        Ok(Shares {
            alpha: sender.into_output(),
            beta: receiver.into_output(),
        })
    }
}

/// Runs the protocol with the default configuration.
///
/// See [`Orchestrator::run`].
pub fn run<C, R>(
    sender: Sender,
    receiver: Receiver,
    channel: &mut C,
    rng: &mut R,
) -> Result<Shares, AbortReason>
where
    C: OTChannel<BitOffer> + ?Sized,
    R: RngCore + CryptoRng + ?Sized,
{
    Orchestrator::default().run(sender, receiver, channel, rng)
}

/// Derives an independent generator from `rng`.
fn fork<R: RngCore + CryptoRng + ?Sized>(rng: &mut R) -> ChaCha12Rng {
    let mut seed = <ChaCha12Rng as SeedableRng>::Seed::default();
    rng.fill_bytes(&mut seed);
    ChaCha12Rng::from_seed(seed)
}
