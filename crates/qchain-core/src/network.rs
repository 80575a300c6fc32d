//! Target test network and job-logger contract.

use serde::{Deserialize, Serialize};

use crate::address::Address;

/// Default chain id of the test network.
pub const DEFAULT_CHAIN_ID: u64 = 9000;

/// Default job-logger contract deployment.
pub const DEFAULT_CONTRACT_ADDRESS: &str = "0xd1471126F18d76be253625CcA75e16a0F1C5B3e2";

/// Native currency of an EVM network.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NativeCurrency {
    pub name: String,
    pub symbol: String,
    pub decimals: u8,
}

impl Default for NativeCurrency {
    fn default() -> Self {
        Self {
            name: "ETH".to_string(),
            symbol: "ETH".to_string(),
            decimals: 18,
        }
    }
}

/// Chain parameters and contract location.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetworkConfig {
    #[serde(default = "default_chain_id")]
    pub chain_id: u64,

    #[serde(default = "default_chain_name")]
    pub chain_name: String,

    /// JSON-RPC endpoint
    #[serde(default = "default_rpc_url")]
    pub rpc_url: String,

    /// Block explorer base URL
    #[serde(default = "default_explorer_url")]
    pub explorer_url: String,

    #[serde(default = "default_contract_address")]
    pub contract_address: Address,

    #[serde(default)]
    pub native_currency: NativeCurrency,
}

fn default_chain_id() -> u64 {
    DEFAULT_CHAIN_ID
}

fn default_chain_name() -> String {
    "Megaeth Testnet".to_string()
}

fn default_rpc_url() -> String {
    "https://testnet.megaeth.io".to_string()
}

fn default_explorer_url() -> String {
    "https://www.megaexplorer.xyz/".to_string()
}

fn default_contract_address() -> Address {
    Address::parse(DEFAULT_CONTRACT_ADDRESS).unwrap_or_else(|_| Address::from_bytes([0; 20]))
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            chain_id: default_chain_id(),
            chain_name: default_chain_name(),
            rpc_url: default_rpc_url(),
            explorer_url: default_explorer_url(),
            contract_address: default_contract_address(),
            native_currency: NativeCurrency::default(),
        }
    }
}

impl NetworkConfig {
    /// Chain id as the `0x`-prefixed hex string wallets use, e.g. `0x2328`.
    pub fn chain_id_hex(&self) -> String {
        format!("{:#x}", self.chain_id)
    }

    fn explorer_base(&self) -> &str {
        self.explorer_url.trim_end_matches('/')
    }

    /// Explorer page of a transaction.
    pub fn tx_url(&self, tx_hash: &str) -> String {
        format!("{}/tx/{}", self.explorer_base(), tx_hash)
    }

    /// Explorer page of an account or contract.
    pub fn address_url(&self, address: &Address) -> String {
        format!("{}/address/{}", self.explorer_base(), address)
    }

    /// Explorer statistics endpoint.
    pub fn stats_url(&self) -> String {
        format!("{}/api/v2/stats", self.explorer_base())
    }
}

/// Parse a chain id given as decimal (`9000`) or wallet-style hex (`0x2328`).
pub fn parse_chain_id(s: &str) -> Option<u64> {
    let s = s.trim();
    match s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        Some(hex) => u64::from_str_radix(hex, 16).ok(),
        None => s.parse().ok(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let net = NetworkConfig::default();
        assert_eq!(net.chain_id_hex(), "0x2328");
        assert_eq!(net.chain_name, "Megaeth Testnet");
        assert!(net.contract_address.matches(DEFAULT_CONTRACT_ADDRESS));
    }

    #[test]
    fn test_explorer_links() {
        let net = NetworkConfig::default();
        assert_eq!(net.tx_url("0xabc"), "https://www.megaexplorer.xyz/tx/0xabc");
        assert_eq!(
            net.address_url(&net.contract_address),
            "https://www.megaexplorer.xyz/address/0xd1471126f18d76be253625cca75e16a0f1c5b3e2"
        );
        assert_eq!(net.stats_url(), "https://www.megaexplorer.xyz/api/v2/stats");
    }

    #[test]
    fn test_partial_yaml_uses_defaults() {
        let net: NetworkConfig = serde_yaml_ng::from_str("chain_id: 31337\n").unwrap();
        assert_eq!(net.chain_id, 31337);
        assert_eq!(net.rpc_url, "https://testnet.megaeth.io");
    }

    #[test]
    fn test_parse_chain_id() {
        assert_eq!(parse_chain_id("9000"), Some(9000));
        assert_eq!(parse_chain_id(" 0x2328 "), Some(9000));
        assert_eq!(parse_chain_id("0X1"), Some(1));
        assert_eq!(parse_chain_id("0xzz"), None);
        assert_eq!(parse_chain_id("megaeth"), None);
    }
}
