use clap::Parser;

use hwsign_cli::{inner_main, Cli};
use hwsign_common::{bip44, Error, Network};
use hwsign_device::derivation_path_to_vec;
use hwsign_test_util::{spawn_chain_stub, MockDevice, TEST_TESTNET_ADDRESS};

const MAINNET_ADDRESS: &str = "1BgGZ9tcN4rm9KBzDn7KprQz87SZ26SAMH";
const TXID: &str = "d9d0d2919dd9d207af7bd4b55a2774ac4f3c9c86b8d8c1d6f38deef9f2d92b03";

fn parse(args: &[&str]) -> Cli {
    let mut all = vec!["hwsign_cli"];
    all.extend_from_slice(args);
    Cli::try_parse_from(all).unwrap()
}

fn planted_mock() -> std::net::SocketAddr {
    let planted = bip44::path(Network::Testnet, 0, 1, 5);
    MockDevice::new()
        .with_address(derivation_path_to_vec(&planted), TEST_TESTNET_ADDRESS)
        .spawn()
}

#[test]
fn mainnet_is_refused_before_any_device_interaction() {
    // no device nor emulator exists, the policy error must come first
    let args = parse(&["--addr", MAINNET_ADDRESS, "--msg", "hello"]);
    let err = inner_main(args).unwrap_err();
    assert!(matches!(
        err.downcast_ref::<Error>(),
        Some(Error::MainnetDisabled(_))
    ));
}

#[test]
fn garbage_address_is_refused() {
    let args = parse(&["--addr", "not-an-address", "--msg", "hello"]);
    let err = inner_main(args).unwrap_err();
    assert!(matches!(
        err.downcast_ref::<Error>(),
        Some(Error::UnsupportedAddress(_))
    ));
}

#[test]
fn malformed_tx_fields_are_refused_before_any_device_interaction() {
    let args = parse(&[
        "--addr",
        TEST_TESTNET_ADDRESS,
        "--tx",
        TXID,
        "not-a-number",
        TEST_TESTNET_ADDRESS,
        "1000",
    ]);
    let err = inner_main(args).unwrap_err();
    assert!(matches!(
        err.downcast_ref::<Error>(),
        Some(Error::InvalidTransactionField {
            field: "prev index",
            ..
        })
    ));
}

#[cfg(not(feature = "serial"))]
#[test]
fn no_transport_is_a_device_not_found() {
    let args = parse(&["--addr", TEST_TESTNET_ADDRESS, "--msg", "hello"]);
    let err = inner_main(args).unwrap_err();
    assert!(matches!(
        err.downcast_ref::<hwsign_device::Error>(),
        Some(hwsign_device::Error::NoAvailablePorts)
    ));
}

#[test]
fn sign_message_against_the_emulator() {
    let device_addr = planted_mock();
    let args = parse(&[
        "--emulator",
        &device_addr.to_string(),
        "--addr",
        TEST_TESTNET_ADDRESS,
        "--msg",
        "hello",
    ]);
    inner_main(args).unwrap();
}

#[test]
fn unknown_address_exhausts_the_search() {
    let device_addr = MockDevice::new().spawn();
    let args = parse(&[
        "--emulator",
        &device_addr.to_string(),
        "--addr",
        TEST_TESTNET_ADDRESS,
        "--msg",
        "hello",
    ]);
    let err = inner_main(args).unwrap_err();
    assert!(matches!(
        err.downcast_ref::<Error>(),
        Some(Error::AddressNotFound { .. })
    ));
}

#[test]
fn sign_tx_against_the_emulator() {
    let device_addr = planted_mock();
    let chain_body = serde_json::json!({ "hash": TXID, "hex": "02000000" }).to_string();
    let chain_addr = spawn_chain_stub(chain_body);
    let args = parse(&[
        "--emulator",
        &device_addr.to_string(),
        "--chain-url",
        &format!("http://{chain_addr}/"),
        "--addr",
        TEST_TESTNET_ADDRESS,
        "--tx",
        TXID,
        "0",
        "mx4dFZLfs7AhgjEtcCcLKDEPAhej8KHmgz",
        "150000",
    ]);
    inner_main(args).unwrap();
}

#[test]
fn declined_signing_surfaces_the_device_error() {
    let planted = bip44::path(Network::Testnet, 0, 1, 5);
    let device_addr = MockDevice::new()
        .with_address(derivation_path_to_vec(&planted), TEST_TESTNET_ADDRESS)
        .decline_signing()
        .spawn();
    let args = parse(&[
        "--emulator",
        &device_addr.to_string(),
        "--addr",
        TEST_TESTNET_ADDRESS,
        "--msg",
        "hello",
    ]);
    let err = inner_main(args).unwrap_err();
    assert!(matches!(
        err.downcast_ref::<hwsign_device::Error>(),
        Some(hwsign_device::Error::DeviceError(_))
    ));
}
