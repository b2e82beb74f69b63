//! Random OT sender endpoint.

use std::collections::VecDeque;

use mta_fields::PrimeField;
use zeroize::Zeroize;

use crate::{
    check_order,
    msgs::{Derandomize, MaskedPair},
    OTError, Payload, ROTSenderOutput, TransferId,
};

/// The sender side of a derandomized random OT.
///
/// Each offered pair consumes one dealt pad pair `(k_0, k_1)`. When the receiver announces
/// `e = b ^ c`, the sender replies with `y_j = m_j + k_{j ^ e}`.
pub struct RotSender<T> {
    field: PrimeField,
    transfer_id: TransferId,
    pads: VecDeque<[T; 2]>,
    pending: VecDeque<(TransferId, Offer<T>)>,
}

struct Offer<T> {
    msgs: [T; 2],
    pads: [T; 2],
}

impl<T> std::fmt::Debug for RotSender<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RotSender")
            .field("transfer_id", &self.transfer_id)
            .field("remaining", &self.pads.len())
            .field("pending", &self.pending.len())
            .finish_non_exhaustive()
    }
}

impl<T: Payload> RotSender<T> {
    /// Creates a new sender with an empty table.
    pub fn new(field: PrimeField) -> Self {
        Self {
            field,
            transfer_id: TransferId::default(),
            pads: VecDeque::new(),
            pending: VecDeque::new(),
        }
    }

    /// Appends dealt random OTs to the table.
    pub fn extend(&mut self, output: ROTSenderOutput<[T; 2]>) {
        self.pads.extend(output.msgs);
    }

    /// Returns the number of unused random OTs.
    pub fn remaining(&self) -> usize {
        self.pads.len()
    }

    /// Offers a pair of messages, returning the id of the transfer.
    ///
    /// # Arguments
    ///
    /// * `msgs` - The `0`-bit and `1`-bit messages.
    pub fn offer(&mut self, msgs: [T; 2]) -> Result<TransferId, OTError> {
        if !msgs.iter().all(|msg| msg.is_canonical(&self.field)) {
            return Err(OTError::InvalidMessage(self.transfer_id));
        }

        let pads = self.pads.pop_front().ok_or(OTError::TableExhausted)?;
        let id = self.transfer_id.next_id();
        self.pending.push_back((id, Offer { msgs, pads }));

        Ok(id)
    }

    /// Answers the receiver's derandomization message.
    pub fn respond(&mut self, msg: Derandomize) -> Result<MaskedPair<T>, OTError> {
        let Derandomize { id, flip } = msg;
        check_order(&self.pending, id)?;

        let Some((_, mut offer)) = self.pending.pop_front() else {
            return Err(OTError::UnknownTransfer(id));
        };

        let [zero, one] = &offer.msgs;
        let [k0, k1] = &offer.pads;
        let masked = if flip {
            [zero.mask(&self.field, k1), one.mask(&self.field, k0)]
        } else {
            [zero.mask(&self.field, k0), one.mask(&self.field, k1)]
        };

        offer.msgs.zeroize();
        offer.pads.zeroize();

        Ok(MaskedPair { id, masked })
    }
}
