//! Ideal chosen-message oblivious transfer channel.

use std::collections::VecDeque;

use mta_fields::PrimeField;

use crate::{check_order, OTChannel, OTError, Payload, SendHandle, TransferId};

/// The ideal OT channel.
///
/// Offered pairs are queued in order and released one at a time to the receiver. The unchosen
/// message of every pair is scrubbed when the transfer is redeemed.
pub struct IdealOTChannel<T> {
    field: PrimeField,
    transfer_id: TransferId,
    pending: VecDeque<(TransferId, [T; 2])>,
    counter: usize,
}

impl<T> IdealOTChannel<T> {
    /// Creates a new ideal OT channel over `field`.
    pub fn new(field: PrimeField) -> Self {
        Self {
            field,
            transfer_id: TransferId::default(),
            pending: VecDeque::new(),
            counter: 0,
        }
    }

    /// Returns the next transfer id.
    pub fn transfer_id(&self) -> TransferId {
        self.transfer_id
    }

    /// Returns the number of OTs executed.
    pub fn count(&self) -> usize {
        self.counter
    }

    /// Returns the number of offered transfers which have not been redeemed.
    pub fn pending(&self) -> usize {
        self.pending.len()
    }
}

impl<T> std::fmt::Debug for IdealOTChannel<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IdealOTChannel")
            .field("transfer_id", &self.transfer_id)
            .field("pending", &self.pending.len())
            .field("counter", &self.counter)
            .finish_non_exhaustive()
    }
}

impl<T: Payload> OTChannel<T> for IdealOTChannel<T> {
    fn send(&mut self, msgs: [T; 2]) -> Result<SendHandle, OTError> {
        if !msgs.iter().all(|msg| msg.is_canonical(&self.field)) {
            return Err(OTError::InvalidMessage(self.transfer_id));
        }

        let id = self.transfer_id.next_id();
        self.pending.push_back((id, msgs));

        Ok(SendHandle::new(id))
    }

    fn choose(&mut self, handle: SendHandle, choice: bool) -> Result<T, OTError> {
        let got = handle.id();
        check_order(&self.pending, got)?;

        let Some((_, [zero, one])) = self.pending.pop_front() else {
            return Err(OTError::UnknownTransfer(got));
        };

        let (chosen, mut other) = if choice { (one, zero) } else { (zero, one) };
        other.zeroize();
        self.counter += 1;

        Ok(chosen)
    }
}
