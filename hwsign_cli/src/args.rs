use std::net::SocketAddr;

use clap::{ArgGroup, Parser};

/// Sign a message or a simple transaction with a hardware signer.
/// The bip32 path of the signing address is searched on the device first.
/// WARNING: testnet only, mainnet addresses are refused.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
#[command(group(ArgGroup::new("operation").required(true).multiple(false)))]
pub struct Cli {
    /// Address to sign from
    #[arg(short, long)]
    pub addr: String,

    /// Sign the following message
    #[arg(short, long, group = "operation")]
    pub msg: Option<String>,

    /// Sign the following transaction
    #[arg(
        short,
        long,
        group = "operation",
        num_args = 4,
        value_names = ["PREV_HASH", "PREV_INDEX", "DEST_ADDRESS", "SATOSHI"]
    )]
    pub tx: Option<Vec<String>>,

    /// Connect to an emulator at this socket instead of a physical device
    #[arg(long)]
    pub emulator: Option<SocketAddr>,

    /// Base url of the chain api used to fetch previous transactions
    #[arg(long, env = "HWSIGN_CHAIN_URL")]
    pub chain_url: Option<String>,
}
