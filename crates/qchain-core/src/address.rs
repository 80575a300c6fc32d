//! EVM account addresses.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, CoreResult};

/// A 20-byte account address.
///
/// Stored lowercased with a `0x` prefix so that equality is case-insensitive
/// with respect to the input (checksummed and lowercase forms compare equal).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Address(String);

impl Address {
    /// Parse a hex address, with or without the `0x` prefix.
    pub fn parse(s: &str) -> CoreResult<Self> {
        let trimmed = s.trim();
        let digits = trimmed
            .strip_prefix("0x")
            .or_else(|| trimmed.strip_prefix("0X"))
            .unwrap_or(trimmed);

        if digits.len() != 40 || !digits.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(CoreError::InvalidAddress(s.to_string()));
        }

        Ok(Self(format!("0x{}", digits.to_ascii_lowercase())))
    }

    /// Build an address from its raw bytes.
    pub fn from_bytes(bytes: [u8; 20]) -> Self {
        Self(format!("0x{}", hex::encode(bytes)))
    }

    /// Raw 20 bytes of the address.
    pub fn to_bytes(&self) -> [u8; 20] {
        let mut out = [0u8; 20];
        // Forty hex digits are checked at construction.
        if hex::decode_to_slice(&self.0[2..], &mut out).is_err() {
            out = [0u8; 20];
        }
        out
    }

    /// Lowercase `0x`-prefixed form.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Case-insensitive comparison against an unparsed address string.
    pub fn matches(&self, other: &str) -> bool {
        Address::parse(other).is_ok_and(|a| a == *self)
    }

    /// Abbreviated form for display, e.g. `0x1234...abcd`.
    pub fn short(&self) -> String {
        format!("{}...{}", &self.0[..6], &self.0[self.0.len() - 4..])
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for Address {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for Address {
    type Error = CoreError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::parse(&s)
    }
}

impl From<Address> for String {
    fn from(a: Address) -> Self {
        a.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MIXED: &str = "0xD1471126F18d76be253625CcA75e16a0F1C5B3e2";

    #[test]
    fn test_parse_lowercases() {
        let a = Address::parse(MIXED).unwrap();
        assert_eq!(a.as_str(), "0xd1471126f18d76be253625cca75e16a0f1c5b3e2");
    }

    #[test]
    fn test_parse_without_prefix() {
        let a = Address::parse("d1471126f18d76be253625cca75e16a0f1c5b3e2").unwrap();
        assert_eq!(a, Address::parse(MIXED).unwrap());
    }

    #[test]
    fn test_rejects_bad_length_and_chars() {
        assert!(Address::parse("0x1234").is_err());
        assert!(Address::parse("0xzz471126f18d76be253625cca75e16a0f1c5b3e2").is_err());
        assert!(Address::parse("").is_err());
    }

    #[test]
    fn test_case_insensitive_match() {
        let a = Address::parse("0xabcdefabcdefabcdefabcdefabcdefabcdefabcd").unwrap();
        assert!(a.matches("0xABCDEFABCDEFABCDEFABCDEFABCDEFABCDEFABCD"));
        assert!(!a.matches("0xabcdefabcdefabcdefabcdefabcdefabcdefabce"));
        assert!(!a.matches("garbage"));
    }

    #[test]
    fn test_bytes_roundtrip() {
        let a = Address::parse(MIXED).unwrap();
        assert_eq!(Address::from_bytes(a.to_bytes()), a);
    }

    #[test]
    fn test_short() {
        let a = Address::parse(MIXED).unwrap();
        assert_eq!(a.short(), "0xd147...b3e2");
    }

    #[test]
    fn test_serde_validates() {
        let ok: Address = serde_json::from_str(&format!("\"{MIXED}\"")).unwrap();
        assert_eq!(ok.to_string(), MIXED.to_lowercase());
        assert!(serde_json::from_str::<Address>("\"0x12\"").is_err());
    }
}
