//! Low-level crate containing 1-out-of-2 oblivious transfer over prime field payloads.
//!
//! The [`OTChannel`] trait is the capability the multiplication protocol consumes. Two reference
//! realizations are provided: [`ideal::IdealOTChannel`], a trusted functionality, and
//! [`rot::RandomOTChannel`], which derandomizes a dealt random-OT table.
//!
//! # ⚠️ Warning ⚠️
//!
//! Neither realization is a production OT protocol. Both assume a trusted party and exist to run
//! and test the layers above.

#![deny(
    unsafe_code,
    missing_docs,
    unused_imports,
    unused_must_use,
    unreachable_pub,
    clippy::all
)]

use mta_fields::{FieldElement, PrimeField};
use rand::Rng;
use serde::{Deserialize, Serialize};
use zeroize::Zeroize;

pub mod ideal;
pub mod msgs;
pub mod rot;
#[cfg(any(test, feature = "test-utils"))]
pub mod test;

/// An oblivious transfer identifier.
#[derive(
    Debug, Default, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct TransferId(u64);

impl std::fmt::Display for TransferId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "TransferId({})", self.0)
    }
}

impl TransferId {
    /// Creates a transfer ID from its sequence number.
    pub fn new(id: u64) -> Self {
        Self(id)
    }

    /// Returns the current transfer ID, incrementing `self` in-place.
    pub fn next_id(&mut self) -> Self {
        let id = *self;
        self.0 += 1;
        id
    }
}

/// A handle to a pair of messages offered to a channel, redeemed by the receiver with its choice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SendHandle {
    id: TransferId,
}

impl SendHandle {
    /// Creates a handle for the given transfer.
    pub fn new(id: TransferId) -> Self {
        Self { id }
    }

    /// Returns the transfer this handle names.
    pub fn id(&self) -> TransferId {
        self.id
    }
}

/// An oblivious transfer error.
#[derive(Debug, thiserror::Error)]
#[allow(missing_docs)]
pub enum OTError {
    #[error("invalid message in {0}: not a canonical field encoding")]
    InvalidMessage(TransferId),
    #[error("transfer out of order: expected {expected}, got {got}")]
    OutOfOrder { expected: TransferId, got: TransferId },
    #[error("unknown transfer: {0}")]
    UnknownTransfer(TransferId),
    #[error("transport error: {0}")]
    Transport(#[from] std::io::Error),
    #[error("random OT table exhausted")]
    TableExhausted,
}

/// A message which can be carried by an oblivious transfer.
///
/// Payloads are encoded as elements of a prime field, which lets a channel check them and mask
/// them with uniformly random pads.
pub trait Payload: Clone + Zeroize {
    /// Returns `true` if every component is a canonical element of `field`.
    fn is_canonical(&self, field: &PrimeField) -> bool;

    /// Samples a uniformly random payload.
    fn random<R: Rng + ?Sized>(field: &PrimeField, rng: &mut R) -> Self;

    /// Returns `self + pad`, componentwise.
    fn mask(&self, field: &PrimeField, pad: &Self) -> Self;

    /// Returns `self - pad`, componentwise.
    fn unmask(&self, field: &PrimeField, pad: &Self) -> Self;
}

impl Payload for FieldElement {
    fn is_canonical(&self, field: &PrimeField) -> bool {
        field.contains(self)
    }

    fn random<R: Rng + ?Sized>(field: &PrimeField, rng: &mut R) -> Self {
        field.random_element(rng)
    }

    fn mask(&self, field: &PrimeField, pad: &Self) -> Self {
        field.add(self, pad)
    }

    fn unmask(&self, field: &PrimeField, pad: &Self) -> Self {
        field.sub(self, pad)
    }
}

/// A 1-out-of-2 oblivious transfer channel.
///
/// The sender offers two messages and receives a [`SendHandle`]. The receiver redeems the handle
/// with a choice bit and obtains exactly the chosen message. Transfers must be redeemed in the
/// order they were offered.
pub trait OTChannel<T> {
    /// Offers a pair of messages.
    ///
    /// # Arguments
    ///
    /// * `msgs` - The `0`-bit and `1`-bit messages.
    fn send(&mut self, msgs: [T; 2]) -> Result<SendHandle, OTError>;

    /// Redeems a transfer, returning the message selected by `choice`.
    ///
    /// # Arguments
    ///
    /// * `handle` - The handle returned when the messages were offered.
    /// * `choice` - The receiver's choice bit.
    fn choose(&mut self, handle: SendHandle, choice: bool) -> Result<T, OTError>;
}

impl<T, C: OTChannel<T> + ?Sized> OTChannel<T> for &mut C {
    fn send(&mut self, msgs: [T; 2]) -> Result<SendHandle, OTError> {
        (**self).send(msgs)
    }

    fn choose(&mut self, handle: SendHandle, choice: bool) -> Result<T, OTError> {
        (**self).choose(handle, choice)
    }
}

/// Checks that `got` names the oldest transfer in `pending`.
pub(crate) fn check_order<U>(
    pending: &std::collections::VecDeque<(TransferId, U)>,
    got: TransferId,
) -> Result<(), OTError> {
    match pending.front() {
        Some((expected, _)) if *expected == got => Ok(()),
        Some((expected, _)) if pending.iter().any(|(id, _)| *id == got) => {
            Err(OTError::OutOfOrder {
                expected: *expected,
                got,
            })
        }
        _ => Err(OTError::UnknownTransfer(got)),
    }
}

/// The output the sender receives from the ROT functionality.
#[derive(Debug)]
pub struct ROTSenderOutput<T> {
    /// The transfer id.
    pub id: TransferId,
    /// The random messages.
    pub msgs: Vec<T>,
}

/// The output the receiver receives from the ROT functionality.
#[derive(Debug)]
pub struct ROTReceiverOutput<T, U> {
    /// The transfer id.
    pub id: TransferId,
    /// The choice bits.
    pub choices: Vec<T>,
    /// The chosen messages.
    pub msgs: Vec<U>,
}
