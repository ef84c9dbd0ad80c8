#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("Mainnet signing is disabled, refusing to operate on address {0}")]
    MainnetDisabled(String),

    #[error("The address {0} is not a valid address on any supported network")]
    UnsupportedAddress(String),

    #[error("The address {address} was not found on the connected signer while searching for its bip32 path")]
    AddressNotFound { address: String },

    #[error("Invalid transaction {field}: {value}")]
    InvalidTransactionField {
        field: &'static str,
        value: String,
    },
}
