//! Shared types for the MCM compiler
//!
//! Values that cross module boundaries (hashes, signer addresses) live here
//! so the hierarchy, proposal and merkle modules agree on one representation.

use crate::utils::crypto::to_checksum_address;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// A 32-byte keccak output (leaf, inner node, root or proof element)
pub type Hash32 = [u8; 32];

/// Width of an EVM-style signer address
pub const EVM_ADDRESS_LEN: usize = 20;

// =============================================================================
// Hex helpers
// =============================================================================

/// Encode bytes as `0x`-prefixed lowercase hex
pub fn to_hex_prefixed(bytes: &[u8]) -> String {
    format!("0x{}", hex::encode(bytes))
}

/// Decode a `0x`-prefixed hex string. `0x` alone decodes to an empty vector.
pub fn decode_hex_prefixed(value: &str) -> Result<Vec<u8>, hex::FromHexError> {
    let digits = value
        .strip_prefix("0x")
        .or_else(|| value.strip_prefix("0X"))
        .ok_or(hex::FromHexError::InvalidStringLength)?;
    hex::decode(digits)
}

/// Decode a `0x`-prefixed hex string into exactly 32 bytes
pub fn decode_hash32(value: &str) -> Result<Hash32, String> {
    let bytes = decode_hex_prefixed(value).map_err(|e| format!("invalid hex: {}", e))?;
    let len = bytes.len();
    bytes
        .try_into()
        .map_err(|_| format!("expected 32 bytes, got {}", len))
}

// =============================================================================
// Signer addresses
// =============================================================================

/// A 20-byte signer address.
///
/// Ordering is byte-wise, which is the numeric order an on-chain config
/// expects when signers must be sorted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct EvmAddress(pub [u8; EVM_ADDRESS_LEN]);

/// Why an address token was rejected
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AddressError {
    #[error("address must start with 0x")]
    MissingPrefix,

    #[error("address has no hex digits")]
    Empty,

    #[error("address has {0} hex digits, at most 40 allowed")]
    TooLong(usize),

    #[error("address contains non-hex character '{0}'")]
    InvalidCharacter(char),
}

impl EvmAddress {
    /// Parse a `0x`-prefixed address of up to 40 hex digits.
    ///
    /// Shorter values are zero-extended on the left, so `0x0A` is the same
    /// address as `0x000...0A`.
    pub fn parse(value: &str) -> Result<Self, AddressError> {
        let digits = value
            .strip_prefix("0x")
            .or_else(|| value.strip_prefix("0X"))
            .ok_or(AddressError::MissingPrefix)?;

        if digits.is_empty() {
            return Err(AddressError::Empty);
        }
        if digits.len() > EVM_ADDRESS_LEN * 2 {
            return Err(AddressError::TooLong(digits.len()));
        }
        if let Some(bad) = digits.chars().find(|c| !c.is_ascii_hexdigit()) {
            return Err(AddressError::InvalidCharacter(bad));
        }

        let padded = format!("{:0>40}", digits);
        let mut bytes = [0u8; EVM_ADDRESS_LEN];
        hex::decode_to_slice(&padded, &mut bytes)
            .map_err(|_| AddressError::InvalidCharacter('?'))?;
        Ok(Self(bytes))
    }

    pub fn as_bytes(&self) -> &[u8; EVM_ADDRESS_LEN] {
        &self.0
    }

    /// EIP-55 checksummed form
    pub fn to_checksum(&self) -> String {
        to_checksum_address(&self.0)
    }
}

impl FromStr for EvmAddress {
    type Err = AddressError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for EvmAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", to_hex_prefixed(&self.0))
    }
}

impl Serialize for EvmAddress {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for EvmAddress {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Self::parse(&s).map_err(serde::de::Error::custom)
    }
}
