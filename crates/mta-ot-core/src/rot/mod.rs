//! Oblivious transfer from a dealt random-OT table.
//!
//! A trusted [`RotDealer`] hands the sender random pad pairs `(k_0, k_1)` and the receiver random
//! entries `(c, k_c)`. A chosen-message transfer is then derandomized with one message in each
//! direction: the receiver sends `e = b ^ c` ([`Derandomize`](crate::msgs::Derandomize)) and the
//! sender replies with `y_j = m_j + k_{j ^ e}` ([`MaskedPair`](crate::msgs::MaskedPair)). The
//! receiver outputs `y_b - k_c`. Pads are uniform in the field, so the unchosen message is
//! perfectly hidden.

mod config;
mod dealer;
mod receiver;
mod sender;

pub use config::{RandomOTConfig, RandomOTConfigBuilder, RandomOTConfigBuilderError};
pub use dealer::RotDealer;
pub use receiver::RotReceiver;
pub use sender::RotSender;

use std::io::{Error as IoError, ErrorKind};

use mta_fields::PrimeField;
use rand_core::{CryptoRng, RngCore};
use serde::{de::DeserializeOwned, Serialize};

use crate::{OTChannel, OTError, Payload, SendHandle};

/// An OT channel connecting a [`RotSender`] and a [`RotReceiver`] over an in-memory loopback.
///
/// The table is refilled from the dealer whenever the sender runs out of pads.
#[derive(Debug)]
pub struct RandomOTChannel<T> {
    config: RandomOTConfig,
    dealer: RotDealer,
    sender: RotSender<T>,
    receiver: RotReceiver<T>,
}

impl<T: Payload> RandomOTChannel<T> {
    /// Creates a new channel.
    ///
    /// # Arguments
    ///
    /// * `field` - The field the messages belong to.
    /// * `config` - The channel configuration.
    /// * `seed` - The seed for the dealer.
    pub fn new(field: PrimeField, config: RandomOTConfig, seed: [u8; 32]) -> Self {
        Self {
            config,
            dealer: RotDealer::new(field.clone(), seed),
            sender: RotSender::new(field.clone()),
            receiver: RotReceiver::new(field),
        }
    }

    /// Creates a new channel whose dealer is seeded from `rng`.
    pub fn from_rng<R: RngCore + CryptoRng + ?Sized>(
        field: PrimeField,
        config: RandomOTConfig,
        rng: &mut R,
    ) -> Self {
        let mut seed = [0u8; 32];
        rng.fill_bytes(&mut seed);
        Self::new(field, config, seed)
    }

    /// Returns the channel configuration.
    pub fn config(&self) -> &RandomOTConfig {
        &self.config
    }

    /// Returns the number of random OTs dealt so far.
    pub fn dealt(&self) -> usize {
        self.dealer.count()
    }

    /// Returns the number of dealt random OTs not yet consumed.
    pub fn remaining(&self) -> usize {
        self.sender.remaining()
    }
}

impl<T> OTChannel<T> for RandomOTChannel<T>
where
    T: Payload + Serialize + DeserializeOwned,
{
    fn send(&mut self, msgs: [T; 2]) -> Result<SendHandle, OTError> {
        if self.sender.remaining() == 0 {
            let (sender_output, receiver_output) = self.dealer.random(self.config.batch_size());
            self.sender.extend(sender_output);
            self.receiver.extend(receiver_output);
        }

        self.sender.offer(msgs).map(SendHandle::new)
    }

    fn choose(&mut self, handle: SendHandle, choice: bool) -> Result<T, OTError> {
        let derandomize = loopback(&self.receiver.derandomize(handle.id(), choice)?)?;
        let masked = loopback(&self.sender.respond(derandomize)?)?;

        self.receiver.receive(masked)
    }
}

/// Sends a message through an in-memory wire encoding.
fn loopback<M: Serialize + DeserializeOwned>(msg: &M) -> Result<M, OTError> {
    let bytes =
        bincode::serialize(msg).map_err(|err| IoError::new(ErrorKind::InvalidData, err))?;
    let msg =
        bincode::deserialize(&bytes).map_err(|err| IoError::new(ErrorKind::InvalidData, err))?;

    Ok(msg)
}
