//! Service-account signing of legacy (EIP-155) transactions.

use std::fmt;

use k256::ecdsa::SigningKey;
use qchain_core::Address;

use crate::abi::keccak256;
use crate::error::{LedgerError, LedgerResult};
use crate::rlp;

/// Unsigned legacy transaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LegacyTransaction {
    pub nonce: u64,
    pub gas_price: u128,
    pub gas_limit: u64,
    pub to: Address,
    pub value: u128,
    pub data: Vec<u8>,
    pub chain_id: u64,
}

impl LegacyTransaction {
    fn fields(&self) -> Vec<Vec<u8>> {
        vec![
            rlp::encode_uint(self.nonce as u128),
            rlp::encode_uint(self.gas_price),
            rlp::encode_uint(self.gas_limit as u128),
            rlp::encode_bytes(&self.to.to_bytes()),
            rlp::encode_uint(self.value),
            rlp::encode_bytes(&self.data),
        ]
    }

    /// Hash signed under EIP-155: the six fields plus `chain_id, 0, 0`.
    pub fn signing_hash(&self) -> [u8; 32] {
        let mut items = self.fields();
        items.push(rlp::encode_uint(self.chain_id as u128));
        items.push(rlp::encode_uint(0));
        items.push(rlp::encode_uint(0));
        keccak256(&rlp::encode_list(&items))
    }

    fn encode_signed(&self, v: u64, r: &[u8], s: &[u8]) -> Vec<u8> {
        let mut items = self.fields();
        items.push(rlp::encode_uint(v as u128));
        items.push(rlp::encode_scalar(r));
        items.push(rlp::encode_scalar(s));
        rlp::encode_list(&items)
    }
}

/// A signed transaction ready for `eth_sendRawTransaction`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedTransaction {
    pub raw: Vec<u8>,
    pub hash: [u8; 32],
}

impl SignedTransaction {
    pub fn raw_hex(&self) -> String {
        format!("0x{}", hex::encode(&self.raw))
    }

    pub fn hash_hex(&self) -> String {
        format!("0x{}", hex::encode(self.hash))
    }
}

/// secp256k1 key held in process memory.
pub struct LocalSigner {
    key: SigningKey,
    address: Address,
}

impl fmt::Debug for LocalSigner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LocalSigner")
            .field("address", &self.address)
            .field("key", &"[REDACTED]")
            .finish()
    }
}

impl LocalSigner {
    /// Parse a hex private key, with or without `0x`.
    pub fn from_hex(private_key: &str) -> LedgerResult<Self> {
        let digits = private_key.trim();
        let digits = digits.strip_prefix("0x").unwrap_or(digits);
        let bytes = hex::decode(digits).map_err(|e| LedgerError::InvalidKey(e.to_string()))?;
        if bytes.len() != 32 {
            return Err(LedgerError::InvalidKey(format!(
                "expected 32 bytes, got {}",
                bytes.len()
            )));
        }
        let key =
            SigningKey::from_slice(&bytes).map_err(|e| LedgerError::InvalidKey(e.to_string()))?;
        let address = derive_address(&key);
        Ok(Self { key, address })
    }

    /// Account address of this key.
    pub fn address(&self) -> &Address {
        &self.address
    }

    /// Sign `tx` with replay protection for its chain id.
    pub fn sign(&self, tx: &LegacyTransaction) -> LedgerResult<SignedTransaction> {
        let hash = tx.signing_hash();
        let (signature, recovery_id) = self
            .key
            .sign_prehash_recoverable(&hash)
            .map_err(|e| LedgerError::InvalidKey(format!("signing failed: {e}")))?;

        let v = tx.chain_id * 2 + 35 + u64::from(recovery_id.to_byte());
        let r = signature.r().to_bytes();
        let s = signature.s().to_bytes();
        let raw = tx.encode_signed(v, &r, &s);
        let hash = keccak256(&raw);
        Ok(SignedTransaction { raw, hash })
    }
}

/// Last 20 bytes of the hash of the uncompressed public key.
fn derive_address(key: &SigningKey) -> Address {
    let point = key.verifying_key().to_encoded_point(false);
    let hash = keccak256(&point.as_bytes()[1..]);
    let mut bytes = [0u8; 20];
    bytes.copy_from_slice(&hash[12..]);
    Address::from_bytes(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_address_of_key_one() {
        let signer = LocalSigner::from_hex(&format!("0x{}1", "0".repeat(63))).unwrap();
        assert_eq!(
            signer.address().as_str(),
            "0x7e5f4552091a69125d5dfcb7b8c2659029395bdf"
        );
    }

    #[test]
    fn test_rejects_bad_keys() {
        assert!(LocalSigner::from_hex("0x1234").is_err());
        assert!(LocalSigner::from_hex("not hex").is_err());
        assert!(LocalSigner::from_hex(&"0".repeat(64)).is_err());
    }

    #[test]
    fn test_debug_redacts_key() {
        let signer = LocalSigner::from_hex(&"46".repeat(32)).unwrap();
        assert!(format!("{signer:?}").contains("[REDACTED]"));
    }

    // Reference transaction from EIP-155.
    fn eip155_tx() -> LegacyTransaction {
        LegacyTransaction {
            nonce: 9,
            gas_price: 20_000_000_000,
            gas_limit: 21_000,
            to: Address::parse("0x3535353535353535353535353535353535353535").unwrap(),
            value: 1_000_000_000_000_000_000,
            data: Vec::new(),
            chain_id: 1,
        }
    }

    #[test]
    fn test_eip155_signing_hash() {
        assert_eq!(
            hex::encode(eip155_tx().signing_hash()),
            "daf5a779ae972f972197303d7b574746c7ef83eadac0f2791ad23db92e4c8e53"
        );
    }

    #[test]
    fn test_eip155_signed_transaction() {
        let signer = LocalSigner::from_hex(&"46".repeat(32)).unwrap();
        let signed = signer.sign(&eip155_tx()).unwrap();
        assert_eq!(
            signed.raw_hex(),
            "0xf86c098504a817c800825208943535353535353535353535353535353535353535880de0b6b3a76400008025a028ef61340bd939bc2195fe537567866003e1a15d3c71ff63e1590620aa636276a067cbe9d8997f761aecb703304b3800ccf555c9f3dc64214b297fb1966a3b6d83"
        );
        assert_eq!(signed.hash_hex().len(), 66);
    }
}
