//! Random OT receiver endpoint.

use std::collections::VecDeque;

use mta_fields::PrimeField;

use crate::{
    check_order,
    msgs::{Derandomize, MaskedPair},
    OTError, Payload, ROTReceiverOutput, TransferId,
};

/// The receiver side of a derandomized random OT.
///
/// Each redeemed transfer consumes one dealt entry `(c, k_c)`. The receiver announces
/// `e = b ^ c` and recovers `m_b = y_b - k_c`.
pub struct RotReceiver<T> {
    field: PrimeField,
    transfer_id: TransferId,
    table: VecDeque<(bool, T)>,
    pending: VecDeque<(TransferId, (bool, T))>,
}

impl<T> std::fmt::Debug for RotReceiver<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RotReceiver")
            .field("transfer_id", &self.transfer_id)
            .field("remaining", &self.table.len())
            .field("pending", &self.pending.len())
            .finish_non_exhaustive()
    }
}

impl<T: Payload> RotReceiver<T> {
    /// Creates a new receiver with an empty table.
    pub fn new(field: PrimeField) -> Self {
        Self {
            field,
            transfer_id: TransferId::default(),
            table: VecDeque::new(),
            pending: VecDeque::new(),
        }
    }

    /// Appends dealt random OTs to the table.
    pub fn extend(&mut self, output: ROTReceiverOutput<bool, T>) {
        self.table
            .extend(output.choices.into_iter().zip(output.msgs));
    }

    /// Returns the number of unused random OTs.
    pub fn remaining(&self) -> usize {
        self.table.len()
    }

    /// Starts redeeming transfer `id` with `choice`.
    ///
    /// Transfers must be redeemed in the order they were offered.
    pub fn derandomize(&mut self, id: TransferId, choice: bool) -> Result<Derandomize, OTError> {
        if id != self.transfer_id {
            return Err(if id > self.transfer_id {
                OTError::OutOfOrder {
                    expected: self.transfer_id,
                    got: id,
                }
            } else {
                OTError::UnknownTransfer(id)
            });
        }

        let (random_choice, pad) = self.table.pop_front().ok_or(OTError::TableExhausted)?;
        self.transfer_id.next_id();
        self.pending.push_back((id, (choice, pad)));

        Ok(Derandomize {
            id,
            flip: choice ^ random_choice,
        })
    }

    /// Recovers the chosen message from the sender's masked pair.
    pub fn receive(&mut self, msg: MaskedPair<T>) -> Result<T, OTError> {
        let MaskedPair { id, masked } = msg;
        check_order(&self.pending, id)?;

        let Some((_, (choice, mut pad))) = self.pending.pop_front() else {
            return Err(OTError::UnknownTransfer(id));
        };

        if !masked.iter().all(|msg| msg.is_canonical(&self.field)) {
            pad.zeroize();
            return Err(OTError::InvalidMessage(id));
        }

        let [zero, one] = masked;
        let chosen = if choice { one } else { zero };
        let msg = chosen.unmask(&self.field, &pad);
        pad.zeroize();

        Ok(msg)
    }
}
