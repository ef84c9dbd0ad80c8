#![cfg_attr(not(test), deny(clippy::unwrap_used))]

//! Command line interface of the hardware signer tool.
//!
//! All input validation happens before the device session is opened: the
//! network is decided once from the target address, mainnet is refused by
//! policy, and the transaction fields are parsed. Only then the device is
//! reached, the bip32 path of the address searched, and the requested
//! signing operation performed.

use anyhow::Context;
use bitcoin::hashes::Hash;
use tracing_subscriber::{filter::LevelFilter, EnvFilter, FmtSubscriber};

use hwsign_common::{bip44, sats_to_btc, Error, Network, SigningRequest, TransactionRequest};
use hwsign_device::chain::ChainApi;
use hwsign_device::protocol::{SignTxParams, TxInputParams, TxOutputParams};
use hwsign_device::{derivation_path_to_vec, Device};

pub use args::Cli;

mod args;

pub fn inner_main(args: Cli) -> anyhow::Result<()> {
    let (appender, _guard) = tracing_appender::non_blocking(std::io::stderr());
    let filter = EnvFilter::builder()
        .with_default_directive(LevelFilter::WARN.into())
        .from_env_lossy();
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_writer(appender)
        .finish();
    match tracing::subscriber::set_global_default(subscriber) {
        Ok(_) => tracing::info!("logging initialized"),
        Err(_) => tracing::debug!("logging already initialized"),
    }

    tracing::info!("CLI initialized with args: {:?}", args);

    let network = Network::from_address(&args.addr)?;
    if network.is_mainnet() {
        return Err(Error::MainnetDisabled(args.addr).into());
    }

    let request = signing_request(&args)?;

    let device = connect(&args, network)?;
    let result = sign(&device, &args.addr, network, request, args.chain_url.as_deref());

    // the transport closes on drop, the logout additionally locks the wallet
    // on the device side
    if let Err(e) = device.logout() {
        tracing::warn!("logout failed: {e}");
    }

    result
}

fn signing_request(args: &Cli) -> anyhow::Result<SigningRequest> {
    match (&args.msg, &args.tx) {
        (Some(text), None) => Ok(SigningRequest::Message { text: text.clone() }),
        (None, Some(fields)) => Ok(SigningRequest::Transaction(
            TransactionRequest::from_cli_fields(fields)?,
        )),
        _ => anyhow::bail!("exactly one of --msg or --tx must be given"),
    }
}

fn connect(args: &Cli, network: Network) -> anyhow::Result<Device> {
    match args.emulator {
        Some(socket) => Device::from_socket(socket, network)
            .with_context(|| format!("Cannot connect to the emulator at {socket}")),
        None => Ok(connect_physical(network)?),
    }
}

#[cfg(feature = "serial")]
fn connect_physical(network: Network) -> hwsign_device::Result<Device> {
    Device::first_from_serial(network, None)
}

#[cfg(not(feature = "serial"))]
fn connect_physical(_network: Network) -> hwsign_device::Result<Device> {
    Err(hwsign_device::Error::NoAvailablePorts)
}

fn sign(
    device: &Device,
    addr: &str,
    network: Network,
    request: SigningRequest,
    chain_url: Option<&str>,
) -> anyhow::Result<()> {
    println!("Searching the bip32 path of {addr} on the device, this may take a while");
    let path = bip44::find_path(addr, network, |candidate| device.address_at(candidate))?
        .ok_or_else(|| Error::AddressNotFound {
            address: addr.to_string(),
        })?;
    println!("Found bip32 path: {path}");

    match request {
        SigningRequest::Message { text } => {
            println!("Signing message: \"{text}\"\nFrom address: {addr}");
            let signature = device.sign_message(&path, &text)?;
            println!("Signature: {signature}");
        }
        SigningRequest::Transaction(tx) => {
            let chain = match chain_url {
                Some(url) => ChainApi::with_url(url),
                None => ChainApi::new(network)?,
            };
            let prev_tx = chain.raw_transaction(&tx.prev_hash).with_context(|| {
                format!("Cannot fetch the previous transaction {}", tx.prev_hash)
            })?;

            let params = SignTxParams {
                network,
                inputs: vec![TxInputParams {
                    path: derivation_path_to_vec(&path),
                    prev_hash: tx.prev_hash.to_byte_array().to_vec(),
                    prev_index: tx.prev_index,
                    prev_tx,
                }],
                outputs: vec![TxOutputParams {
                    address: tx.destination.clone(),
                    satoshi: tx.satoshi,
                }],
            };

            println!("Signing tx from address: {addr}");
            let result = device.sign_tx(params)?;
            println!(
                "Using UTXO: {} index {} to send {} BTC to {}",
                tx.prev_hash,
                tx.prev_index,
                sats_to_btc(tx.satoshi),
                tx.destination
            );
            println!("Transaction: {}", hex::encode(result.tx.as_ref()));
        }
    }
    Ok(())
}
