//! Message types exchanged after the transfers.

use mta_fields::FieldElement;
use serde::{Deserialize, Serialize};
use zeroize::Zeroize;

/// The receiver's challenge.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Zeroize)]
pub struct Challenge {
    /// Uniformly random scalar combining the value and check lanes.
    pub theta: FieldElement,
    /// Nonzero weights, one per encoded position.
    pub weights: Vec<FieldElement>,
}

/// The sender's response to a [`Challenge`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Response {
    /// The combined multiplier `a_hat + theta * a`.
    pub eta: FieldElement,
    /// The combined masks `sum w_i (delta_hat_i + theta * delta_i)`.
    pub mu: FieldElement,
}

/// The coefficients `v` decoding the receiver's choices, with `sum_i t_i v_i = b`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Encoding {
    /// One coefficient per encoded position.
    pub coefficients: Vec<FieldElement>,
}

/// The receiver's verdict on the consistency check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Verdict {
    /// The check passed. Carries the encoding the sender needs for its output.
    Accepted(Encoding),
    /// The check failed and the run is aborted.
    Rejected,
}
