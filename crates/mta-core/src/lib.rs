//! Multiplicative-to-additive (MtA) share conversion over a prime field.
//!
//! The sender holds `a`, the receiver holds `b`. The receiver encodes `b` as `n = L + k` random
//! signs `t_i` and coefficients `v_i` with `sum_i t_i v_i = b`, where `L = ceil(log2 q)`. Each
//! sign selects one of two messages `delta_i +- a` in a 1-out-of-2 oblivious transfer. At the
//! end the parties hold `alpha = -sum_i delta_i v_i` and `beta = sum_i z_i v_i` with
//! `alpha + beta = a * b`.
//!
//! A batched consistency check, run after the transfers, lets the receiver reject a sender that
//! embedded different multipliers at different positions. The signs do not depend on `b`, so a
//! sender that tampers with single messages learns nothing about `b` from whether it is caught.
//!
//! Core logic of the protocol without I/O.

#![deny(missing_docs, unreachable_pub, unused_must_use)]
#![deny(clippy::all)]
#![deny(unsafe_code)]

mod check;
mod encoding;
mod error;
pub mod ideal;
pub mod msgs;
mod offer;
pub mod receiver;
pub mod sender;

pub use error::{ReceiverError, SenderError};
pub use offer::BitOffer;
pub use receiver::Receiver;
pub use sender::Sender;
