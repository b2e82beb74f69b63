use mta_core::{ReceiverError, SenderError};
use mta_ot_core::OTError;
use num_bigint::BigUint;

/// The reason a run was aborted.
///
/// Every abort is terminal and no party keeps an output.
#[derive(Debug, thiserror::Error)]
#[allow(missing_docs)]
pub enum AbortReason {
    #[error("modulus mismatch: sender uses {sender}, receiver uses {receiver}")]
    ModulusMismatch { sender: BigUint, receiver: BigUint },
    #[error("modulus too large: {bits} bits exceeds the maximum of {max}")]
    ModulusTooLarge { bits: usize, max: usize },
    #[error("channel error: {0}")]
    Channel(#[source] OTError),
    #[error("consistency check failed")]
    ConsistencyCheckFailed,
    #[error("sender error: {0}")]
    Sender(#[source] SenderError),
    #[error("receiver error: {0}")]
    Receiver(#[source] ReceiverError),
}

impl From<SenderError> for AbortReason {
    fn from(err: SenderError) -> Self {
        match err {
            SenderError::Channel(err) => Self::Channel(err),
            SenderError::CheckAborted => Self::ConsistencyCheckFailed,
            err => Self::Sender(err),
        }
    }
}

impl From<ReceiverError> for AbortReason {
    fn from(err: ReceiverError) -> Self {
        match err {
            ReceiverError::Channel(err) => Self::Channel(err),
            ReceiverError::ConsistencyCheckFailed => Self::ConsistencyCheckFailed,
            err => Self::Receiver(err),
        }
    }
}
