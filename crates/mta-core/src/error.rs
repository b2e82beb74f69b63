//! Errors that can occur when running MtA.

use mta_fields::FieldError;
use mta_ot_core::OTError;

/// Errors that can occur when using the MtA sender.
#[derive(Debug, thiserror::Error)]
#[allow(missing_docs)]
pub enum SenderError {
    #[error("invalid secret: {0}")]
    InvalidSecret(#[source] FieldError),
    #[error("bit phase complete: all {0} positions were already sent")]
    BitPhaseComplete(usize),
    #[error("incomplete bit phase: sent {sent} of {expected} positions")]
    IncompleteBitPhase { sent: usize, expected: usize },
    #[error("malformed challenge: {0}")]
    MalformedChallenge(String),
    #[error("malformed encoding: {0}")]
    MalformedEncoding(String),
    #[error("channel error: {0}")]
    Channel(#[from] OTError),
    #[error("receiver rejected the consistency check")]
    CheckAborted,
}

/// Errors that can occur when using the MtA receiver.
#[derive(Debug, thiserror::Error)]
#[allow(missing_docs)]
pub enum ReceiverError {
    #[error("invalid secret: {0}")]
    InvalidSecret(#[source] FieldError),
    #[error("bit phase complete: all {0} positions were already received")]
    BitPhaseComplete(usize),
    #[error("incomplete bit phase: received {received} of {expected} positions")]
    IncompleteBitPhase { received: usize, expected: usize },
    #[error("malformed response: {0}")]
    MalformedResponse(String),
    #[error("channel error: {0}")]
    Channel(#[from] OTError),
    #[error("consistency check failed")]
    ConsistencyCheckFailed,
}
