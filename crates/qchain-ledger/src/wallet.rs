//! Connected wallet state.

use qchain_core::{Address, NetworkConfig};
use serde::{Deserialize, Serialize};

use crate::error::LedgerResult;
use crate::rpc::JsonRpcClient;

/// A wallet as reported by a client: the selected account and its chain.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WalletSession {
    pub address: Address,
    pub chain_id: u64,
}

impl WalletSession {
    pub fn new(address: Address, chain_id: u64) -> Self {
        Self { address, chain_id }
    }

    /// Wallet-style hex chain id, e.g. `0x2328`.
    pub fn chain_id_hex(&self) -> String {
        format!("{:#x}", self.chain_id)
    }

    /// Whether the wallet must switch to the configured network.
    pub fn requires_switch(&self, network: &NetworkConfig) -> bool {
        self.chain_id != network.chain_id
    }

    /// Native balance in wei.
    pub async fn balance(&self, rpc: &JsonRpcClient) -> LedgerResult<u128> {
        rpc.balance(&self.address).await
    }
}

/// Format a wei amount with `decimals` places as a decimal string, trimming
/// trailing zeros (`1.5`, `0.000001`, `3`).
pub fn format_units(amount: u128, decimals: u8) -> String {
    let scale = 10u128.pow(u32::from(decimals));
    let whole = amount / scale;
    let frac = amount % scale;
    if frac == 0 {
        return whole.to_string();
    }
    let frac = format!("{:0width$}", frac, width = decimals as usize);
    format!("{whole}.{}", frac.trim_end_matches('0'))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn wallet(chain_id: u64) -> WalletSession {
        WalletSession::new(
            Address::parse("0x00000000000000000000000000000000000000aa").unwrap(),
            chain_id,
        )
    }

    #[test]
    fn test_requires_switch() {
        let net = NetworkConfig::default();
        assert!(!wallet(9000).requires_switch(&net));
        assert!(wallet(1).requires_switch(&net));
        assert_eq!(wallet(9000).chain_id_hex(), "0x2328");
    }

    #[test]
    fn test_format_units() {
        assert_eq!(format_units(0, 18), "0");
        assert_eq!(format_units(3_000_000_000_000_000_000, 18), "3");
        assert_eq!(format_units(1_500_000_000_000_000_000, 18), "1.5");
        assert_eq!(format_units(1_000_000_000_000, 18), "0.000001");
    }
}
