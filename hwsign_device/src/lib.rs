#![cfg_attr(not(test), deny(clippy::unwrap_used))]

//! Blocking client for the hardware signer.
//!
//! The device speaks a CBOR request/response protocol over a byte transport:
//! a TCP stream when running against the emulator, a serial port for
//! physical units (behind the `serial` feature). One request produces
//! exactly one response, there are no notifications, so every method here is
//! a single blocking round-trip.

pub mod chain;
pub mod consts;
pub mod error;
pub mod protocol;

mod connection;
mod sync;

pub use consts::{BAUD_RATE, TIMEOUT};
pub use error::Error;
pub use hwsign_common::Network;
pub use sync::Device;

#[cfg(feature = "serial")]
pub use serialport;

pub type Result<T> = std::result::Result<T, error::Error>;

fn try_parse_response<T>(reader: &[u8]) -> Option<Result<T>>
where
    T: std::fmt::Debug + serde::de::DeserializeOwned,
{
    match serde_cbor::from_reader::<protocol::Response<T>, &[u8]>(reader) {
        Ok(r) => {
            if let Some(result) = r.result {
                tracing::debug!(
                    "\n<---\t{:?}\n\t({} bytes) {}",
                    &result,
                    reader.len(),
                    hex::encode(reader)
                );
                return Some(Ok(result));
            }
            if let Some(error) = r.error {
                return Some(Err(Error::DeviceError(error)));
            }
            return Some(Err(Error::NeitherErrorNorResult));
        }

        Err(e) => {
            let res = serde_cbor::from_reader::<serde_cbor::Value, &[u8]>(reader);
            if let Ok(value) = res {
                // The value returned is a valid CBOR, but our structs doesn't map it correctly
                tracing::debug!("valid cbor not mapping our struct: {:?}", &value);
                return Some(Err(Error::SerdeCbor(e)));
            }
        }
    }
    None
}

pub fn derivation_path_to_vec(path: &bitcoin::bip32::DerivationPath) -> Vec<u32> {
    path.into_iter().map(|e| (*e).into()).collect()
}
