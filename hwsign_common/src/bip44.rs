//! The BIP44 candidate grid searched on the device.
//!
//! The tool does not know the derivation path of the address it is asked to
//! sign from, so it walks a bounded grid of BIP44 paths asking the device for
//! the address at each until one matches. Derivation is one-way, there is no
//! cheaper direction to search from the address itself.

use bitcoin::bip32::{ChildNumber, DerivationPath};

use crate::Network;

/// BIP44 purpose level.
pub const PURPOSE: u32 = 44;

/// How many accounts are searched.
pub const ACCOUNTS: u32 = 5;

/// How many address indexes are searched per chain.
pub const INDEXES: u32 = 100;

/// External and change chain.
pub const CHAINS: u32 = 2;

/// Build the path `m/44'/coin'/account'/chain/index` for the given network.
pub fn path(network: Network, account: u32, chain: u32, index: u32) -> DerivationPath {
    let components = vec![
        ChildNumber::from_hardened_idx(PURPOSE).expect("static"),
        ChildNumber::from_hardened_idx(network.coin_type()).expect("static"),
        ChildNumber::from_hardened_idx(account).expect("below grid bound"),
        ChildNumber::from_normal_idx(chain).expect("below grid bound"),
        ChildNumber::from_normal_idx(index).expect("below grid bound"),
    ];
    DerivationPath::from(components)
}

/// All candidate paths in search order: account-major, then index, then chain.
///
/// The order is deterministic so repeated runs against the same device and
/// address resolve the same path with the same number of round-trips.
pub fn candidates(network: Network) -> impl Iterator<Item = DerivationPath> {
    (0..ACCOUNTS).flat_map(move |account| {
        (0..INDEXES).flat_map(move |index| {
            (0..CHAINS).map(move |chain| path(network, account, chain, index))
        })
    })
}

/// Search the candidate grid for the path deriving `target`.
///
/// `derive` is expected to perform one device round-trip per call, which is
/// the dominant cost of the search: the full grid is `5 * 100 * 2 = 1000`
/// calls. The first candidate whose derived address equals `target` is
/// returned, `Ok(None)` when the grid is exhausted. Exhaustion is a normal
/// negative result, a failing `derive` call instead aborts the search.
pub fn find_path<F, E>(
    target: &str,
    network: Network,
    mut derive: F,
) -> Result<Option<DerivationPath>, E>
where
    F: FnMut(&DerivationPath) -> Result<String, E>,
{
    for candidate in candidates(network) {
        if derive(&candidate)? == target {
            return Ok(Some(candidate));
        }
    }
    Ok(None)
}
