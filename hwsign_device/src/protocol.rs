use std::fmt::Debug;

use rand::RngCore;
use serde::{Deserialize, Serialize};
use serde_bytes::ByteBuf;

use crate::{error::ErrorDetails, Network};

#[derive(Debug, Serialize)]
pub struct FullRequest {
    pub id: String,
    pub method: String,
    pub params: Request,
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum Request {
    Ping,
    Logout,
    GetVersionInfo,
    GetReceiveAddress(GetReceiveAddressParams),
    SignMessage(SignMessageParams),
    SignTx(SignTxParams),
}

impl std::fmt::Display for Request {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Request::Ping => write!(f, "ping"),
            Request::Logout => write!(f, "logout"),
            Request::GetVersionInfo => write!(f, "get_version_info"),
            Request::GetReceiveAddress(_) => write!(f, "get_receive_address"),
            Request::SignMessage(_) => write!(f, "sign_message"),
            Request::SignTx(_) => write!(f, "sign_tx"),
        }
    }
}

impl Request {
    pub fn network(&self) -> Option<Network> {
        match self {
            Request::GetReceiveAddress(e) => Some(e.network),
            Request::SignMessage(e) => Some(e.network),
            Request::SignTx(e) => Some(e.network),
            _ => None,
        }
    }

    pub fn serialize(self) -> Result<Vec<u8>, crate::Error> {
        let mut rng = rand::thread_rng();
        let id = rng.next_u32().to_string();
        let method = self.to_string();
        let req = FullRequest {
            id,
            method,
            params: self,
        };
        let mut buf = Vec::new();
        serde_cbor::to_writer(&mut buf, &req)?;
        tracing::debug!(
            "\n--->\t{:#?}\n\t({} bytes) {}",
            &req,
            buf.len(),
            &hex::encode(&buf),
        );
        Ok(buf)
    }
}

#[derive(Debug, Deserialize, Serialize)]
pub struct GetReceiveAddressParams {
    pub network: Network,

    /// Derive the master node (m) with the given path and return the address
    /// of the resulting key
    pub path: Vec<u32>,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct SignMessageParams {
    pub network: Network,
    pub message: String,
    pub path: Vec<u32>,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct SignTxParams {
    pub network: Network,
    pub inputs: Vec<TxInputParams>,
    pub outputs: Vec<TxOutputParams>,
}

#[derive(Deserialize, Serialize)]
pub struct TxInputParams {
    pub path: Vec<u32>,

    #[serde(with = "serde_bytes")]
    pub prev_hash: Vec<u8>,
    pub prev_index: u32,

    /// Full previous transaction, the device checks the spent amount against
    /// it before displaying the confirmation.
    #[serde(with = "serde_bytes")]
    pub prev_tx: Vec<u8>,
}

impl Debug for TxInputParams {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TxInputParams")
            .field("path", &self.path)
            .field("prev_hash", &hex::encode(&self.prev_hash))
            .field("prev_index", &self.prev_index)
            .field("prev_tx", &hex::encode(&self.prev_tx))
            .finish()
    }
}

#[derive(Debug, Deserialize, Serialize)]
pub struct TxOutputParams {
    pub address: String,
    pub satoshi: u64,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct Response<T> {
    pub id: String,
    pub result: Option<T>,
    pub error: Option<ErrorDetails>,
}

#[derive(Debug, Deserialize, Serialize, PartialEq, Eq)]
pub struct VersionInfoResult {
    pub firmware_version: String,
    pub board_type: String,
    pub state: DeviceState,
    pub networks: String,
    pub has_pin: bool,
}

#[derive(Debug, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "UPPERCASE")]
pub enum DeviceState {
    /// no wallet set on the hw, mnemonic not entered, unit uninitialised
    Uninit,

    /// wallet set, but currently locked - requires PIN entry to unlock.
    Locked,

    /// wallet set and unlocked for this interface, ready to use.
    Ready,

    /// hw currently set with a temporary wallet, ready to use.
    Temp,
}

#[derive(Debug, Deserialize)]
pub struct SignTxResult {
    /// One DER signature per input, in input order.
    pub signatures: Vec<ByteBuf>,

    /// The fully signed transaction, ready for broadcast.
    pub tx: ByteBuf,
}
