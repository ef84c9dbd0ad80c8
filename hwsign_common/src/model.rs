use std::str::FromStr;

use bitcoin::Txid;

use crate::Error;

/// What the user asked the device to sign. Built from the command line,
/// consumed exactly once.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SigningRequest {
    /// Sign a text message with the key of the resolved path.
    Message { text: String },

    /// Sign a one-input one-output transaction spending the resolved path.
    Transaction(TransactionRequest),
}

/// A minimal spend: one previous output consumed entirely by one destination.
///
/// No change output and no fee calculation, whatever is not sent is fee.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransactionRequest {
    pub prev_hash: Txid,
    pub prev_index: u32,
    pub destination: String,
    pub satoshi: u64,
}

impl TransactionRequest {
    /// Parse the four `--tx` fields `<PREV_HASH> <PREV_INDEX> <DEST_ADDRESS>
    /// <SATOSHI>`, failing before any device interaction happens.
    pub fn from_cli_fields(fields: &[String]) -> Result<Self, Error> {
        match fields {
            [prev_hash, prev_index, destination, satoshi] => Ok(TransactionRequest {
                prev_hash: Txid::from_str(prev_hash).map_err(|_| {
                    Error::InvalidTransactionField {
                        field: "prev hash",
                        value: prev_hash.clone(),
                    }
                })?,
                prev_index: prev_index
                    .parse()
                    .map_err(|_| Error::InvalidTransactionField {
                        field: "prev index",
                        value: prev_index.clone(),
                    })?,
                destination: destination.clone(),
                satoshi: satoshi
                    .parse()
                    .map_err(|_| Error::InvalidTransactionField {
                        field: "amount",
                        value: satoshi.clone(),
                    })?,
            }),
            _ => Err(Error::InvalidTransactionField {
                field: "field count",
                value: fields.len().to_string(),
            }),
        }
    }
}

#[cfg(test)]
mod test {
    use super::TransactionRequest;
    use crate::Error;

    const TXID: &str = "d9d0d2919dd9d207af7bd4b55a2774ac4f3c9c86b8d8c1d6f38deef9f2d92b03";

    fn fields(hash: &str, index: &str, dest: &str, amount: &str) -> Vec<String> {
        [hash, index, dest, amount]
            .iter()
            .map(|s| s.to_string())
            .collect()
    }

    #[test]
    fn parse_tx_fields() {
        let parsed = TransactionRequest::from_cli_fields(&fields(
            TXID,
            "1",
            "mipcBbFg9gMiCh81Kj8tqqdgoZub1ZJRfn",
            "150000",
        ))
        .unwrap();
        assert_eq!(parsed.prev_hash.to_string(), TXID);
        assert_eq!(parsed.prev_index, 1);
        assert_eq!(parsed.satoshi, 150_000);
    }

    #[test]
    fn reject_malformed_fields() {
        let bad_hash = TransactionRequest::from_cli_fields(&fields("nothex", "1", "mip", "10"));
        assert!(matches!(
            bad_hash,
            Err(Error::InvalidTransactionField { field: "prev hash", .. })
        ));

        let bad_index = TransactionRequest::from_cli_fields(&fields(TXID, "one", "mip", "10"));
        assert!(matches!(
            bad_index,
            Err(Error::InvalidTransactionField { field: "prev index", .. })
        ));

        let bad_amount = TransactionRequest::from_cli_fields(&fields(TXID, "1", "mip", "ten"));
        assert!(matches!(
            bad_amount,
            Err(Error::InvalidTransactionField { field: "amount", .. })
        ));
    }
}
