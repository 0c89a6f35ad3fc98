//! Public XRP Ledger networks and their JSON-RPC endpoints.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// A public XRP Ledger network.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Network {
    #[default]
    Mainnet,
    Testnet,
    Devnet,
}

impl Network {
    pub const ALL: [Network; 3] = [Network::Mainnet, Network::Testnet, Network::Devnet];

    /// Public JSON-RPC URL operated by Ripple for this network.
    pub fn public_json_rpc_url(self) -> &'static str {
        match self {
            Network::Mainnet => "https://s1.ripple.com:51234/",
            Network::Testnet => "https://s.altnet.rippletest.net:51234/",
            Network::Devnet => "https://s.devnet.rippletest.net:51234/",
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Network::Mainnet => "mainnet",
            Network::Testnet => "testnet",
            Network::Devnet => "devnet",
        }
    }
}

impl fmt::Display for Network {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Network {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        Network::ALL
            .into_iter()
            .find(|n| n.as_str() == wanted)
            .ok_or_else(|| format!("unknown network '{}', expected mainnet, testnet or devnet", s))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mainnet_is_default() {
        assert_eq!(Network::default(), Network::Mainnet);
        assert_eq!(
            Network::default().public_json_rpc_url(),
            "https://s1.ripple.com:51234/"
        );
    }

    #[test]
    fn test_parse() {
        assert_eq!("TESTNET".parse::<Network>().unwrap(), Network::Testnet);
        assert_eq!(" devnet".parse::<Network>().unwrap(), Network::Devnet);
        assert!("sidechain".parse::<Network>().is_err());
    }

    #[test]
    fn test_urls_are_distinct() {
        let urls: std::collections::HashSet<_> =
            Network::ALL.iter().map(|n| n.public_json_rpc_url()).collect();
        assert_eq!(urls.len(), Network::ALL.len());
    }
}
