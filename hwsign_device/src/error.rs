use std::sync::{MutexGuard, PoisonError};

use serde::{Deserialize, Serialize};
use serde_cbor::Value;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Device Error: {0}")]
    DeviceError(ErrorDetails),

    #[error(transparent)]
    IoError(#[from] std::io::Error),

    #[cfg(feature = "serial")]
    #[error("Serial Error: {0}")]
    SerialError(#[from] serialport::Error),

    #[error("No available ports")]
    NoAvailablePorts,

    #[error("Device returned neither an error nor a result")]
    NeitherErrorNorResult,

    #[error(transparent)]
    SerdeCbor(#[from] serde_cbor::Error),

    #[error("Mismatching network, the device session was opened with: {init} but the method params received {passed}")]
    MismatchingNetwork {
        init: crate::Network,
        passed: crate::Network,
    },

    #[error("Poison error: {0}")]
    PoisonError(String),

    #[error(transparent)]
    SerdeJson(#[from] serde_json::Error),

    #[error("Http request to {0} returned {1} instead of 200")]
    HttpStatus(String, u16),

    #[error(transparent)]
    HttpReqwest(#[from] reqwest::Error),

    #[error("No chain api backend is available for mainnet")]
    NoMainnetChainApi,

    #[error("The chain api response for transaction {0} carries no raw hex")]
    MissingTxHex(String),

    #[error(transparent)]
    InvalidTxHex(#[from] hex::FromHexError),
}

#[derive(Debug, Deserialize, Serialize)]
pub struct ErrorDetails {
    code: i64,
    message: String,
    data: Option<Value>,
}

impl ErrorDetails {
    pub fn code(&self) -> i64 {
        self.code
    }
}

impl std::fmt::Display for ErrorDetails {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Error code: {} - message: {}", self.code, self.message)
    }
}

impl<T> From<PoisonError<MutexGuard<'_, T>>> for Error {
    fn from(e: PoisonError<MutexGuard<'_, T>>) -> Self {
        Error::PoisonError(e.to_string())
    }
}
