#![cfg_attr(not(test), deny(clippy::unwrap_used))]

//! A crate containing code shared by the other crates in the workspace:
//!
//!  * [`Network`]: the network the tool operates on, decided once from the
//!    target address at input-parsing time
//!  * [`bip44`]: the BIP44 candidate grid and the search returning the
//!    derivation path of a target address
//!  * [`SigningRequest`]: what the user asked the device to sign
//!
//! To avoid circular dependencies this crate must not depend on other crates
//! of the workspace.

pub mod bip44;

mod amount;
mod error;
mod model;
mod network;

pub use crate::amount::sats_to_btc;
pub use crate::error::Error;
pub use crate::model::{SigningRequest, TransactionRequest};
pub use crate::network::Network;
