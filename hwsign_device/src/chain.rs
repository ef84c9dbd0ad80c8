//! Blockchain metadata lookups needed while assembling a signing request.
//!
//! The device refuses to sign an input without seeing the full previous
//! transaction, so the host fetches it from a block explorer api. This is
//! the only network access the tool performs besides the device transport.

use bitcoin::Txid;

use crate::{Error, Network, Result};

/// Base url of the BlockCypher testnet api.
pub const BLOCKCYPHER_TESTNET_URL: &str = "https://api.blockcypher.com/v1/btc/test3/";

/// A blocking client of a BlockCypher-style chain api.
pub struct ChainApi {
    base_url: String,
    client: reqwest::blocking::Client,
}

impl ChainApi {
    /// Client for the default backend of the given network.
    ///
    /// There is no mainnet backend, mainnet signing is disabled by policy.
    pub fn new(network: Network) -> Result<Self> {
        match network {
            Network::Testnet => Ok(Self::with_url(BLOCKCYPHER_TESTNET_URL)),
            Network::Bitcoin => Err(Error::NoMainnetChainApi),
        }
    }

    /// Client for a custom backend, the url must end with a slash.
    pub fn with_url(url: impl Into<String>) -> Self {
        Self {
            base_url: url.into(),
            client: reqwest::blocking::Client::new(),
        }
    }

    /// Fetch the raw bytes of the transaction `txid`.
    pub fn raw_transaction(&self, txid: &Txid) -> Result<Vec<u8>> {
        let url = format!("{}txs/{}?includeHex=true", self.base_url, txid);
        tracing::debug!("GET {url}");
        let resp = self.client.get(&url).send()?;
        let status_code = resp.status().as_u16();
        if status_code != 200 {
            return Err(Error::HttpStatus(url, status_code));
        }
        let value: serde_json::Value = serde_json::from_slice(resp.bytes()?.as_ref())?;
        tx_bytes_from_json(&value, txid)
    }
}

fn tx_bytes_from_json(value: &serde_json::Value, txid: &Txid) -> Result<Vec<u8>> {
    let hex = value
        .get("hex")
        .and_then(|h| h.as_str())
        .ok_or_else(|| Error::MissingTxHex(txid.to_string()))?;
    Ok(hex::decode(hex)?)
}

#[cfg(test)]
mod test {
    use std::str::FromStr;

    use bitcoin::Txid;

    use super::tx_bytes_from_json;
    use crate::Error;

    const TXID: &str = "d9d0d2919dd9d207af7bd4b55a2774ac4f3c9c86b8d8c1d6f38deef9f2d92b03";

    #[test]
    fn parse_tx_hex() {
        let txid = Txid::from_str(TXID).unwrap();

        let value = serde_json::json!({ "hash": TXID, "hex": "0200ff" });
        assert_eq!(
            tx_bytes_from_json(&value, &txid).unwrap(),
            vec![0x02, 0x00, 0xff]
        );

        let no_hex = serde_json::json!({ "hash": TXID });
        assert!(matches!(
            tx_bytes_from_json(&no_hex, &txid),
            Err(Error::MissingTxHex(_))
        ));

        let bad_hex = serde_json::json!({ "hex": "zz" });
        assert!(matches!(
            tx_bytes_from_json(&bad_hex, &txid),
            Err(Error::InvalidTxHex(_))
        ));
    }
}
