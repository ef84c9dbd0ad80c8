use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize};

use crate::Error;

/// The network of the bitcoin blockchain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Network {
    /// Bitcoin mainnet
    Bitcoin,
    /// Bitcoin testnet
    Testnet,
}

impl Network {
    /// Return true if the network is mainnet.
    pub fn is_mainnet(&self) -> bool {
        self == &Self::Bitcoin
    }

    /// Return the BIP44 coin type of this network.
    pub fn coin_type(&self) -> u32 {
        match self {
            Network::Bitcoin => 0,
            Network::Testnet => 1,
        }
    }

    /// Classify the network an address string belongs to.
    ///
    /// Strings that are not a valid address on any supported network are
    /// rejected here, so the decision is taken exactly once at input-parsing
    /// time and never re-derived from the address text later.
    pub fn from_address(address: &str) -> Result<Network, Error> {
        let parsed = bitcoin::Address::from_str(address)
            .map_err(|_| Error::UnsupportedAddress(address.to_string()))?;
        if parsed.is_valid_for_network(bitcoin::Network::Bitcoin) {
            Ok(Network::Bitcoin)
        } else if parsed.is_valid_for_network(bitcoin::Network::Testnet) {
            Ok(Network::Testnet)
        } else {
            Err(Error::UnsupportedAddress(address.to_string()))
        }
    }
}

impl std::fmt::Display for Network {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Network::Bitcoin => write!(f, "bitcoin"),
            Network::Testnet => write!(f, "testnet"),
        }
    }
}

impl FromStr for Network {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "bitcoin" => Ok(Network::Bitcoin),
            "testnet" => Ok(Network::Testnet),
            _ => Err("invalid network, possible value are: 'bitcoin', 'testnet'".to_string()),
        }
    }
}

impl Serialize for Network {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Network {
    fn deserialize<D: Deserializer<'de>>(d: D) -> Result<Self, D::Error> {
        let string = String::deserialize(d)?;
        string.parse().map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod test {
    use super::Network;
    use crate::Error;

    #[test]
    fn roundtrip() {
        for network in [Network::Bitcoin, Network::Testnet] {
            assert_eq!(network.to_string().parse::<Network>().unwrap(), network);
        }
        assert!("mainnet".parse::<Network>().is_err());
    }

    #[test]
    fn classify_address() {
        // P2PKH on both networks
        let mainnet = "1BgGZ9tcN4rm9KBzDn7KprQz87SZ26SAMH";
        let testnet = "mipcBbFg9gMiCh81Kj8tqqdgoZub1ZJRfn";
        // P2SH mainnet
        let mainnet_script = "3P14159f73E4gFr7JterCCQh9QjiTjiZrG";

        assert_eq!(Network::from_address(mainnet).unwrap(), Network::Bitcoin);
        assert_eq!(Network::from_address(testnet).unwrap(), Network::Testnet);
        assert_eq!(
            Network::from_address(mainnet_script).unwrap(),
            Network::Bitcoin
        );

        assert!(matches!(
            Network::from_address("not-an-address"),
            Err(Error::UnsupportedAddress(_))
        ));
    }
}
