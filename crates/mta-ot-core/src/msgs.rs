//! Messages exchanged by the random OT endpoints.

use serde::{Deserialize, Serialize};

use crate::TransferId;

/// Receiver's derandomization message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Derandomize {
    /// The transfer id.
    pub id: TransferId,
    /// The receiver's choice bit XOR the dealt random choice bit.
    pub flip: bool,
}

/// Sender's messages masked with the dealt random pads.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MaskedPair<T> {
    /// The transfer id.
    pub id: TransferId,
    /// The masked `0`-bit and `1`-bit messages.
    pub masked: [T; 2],
}
