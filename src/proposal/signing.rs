//! Signing digest for a proposal root
//!
//! Signers never sign the root directly. They sign an Ethereum
//! personal-message hash over the root and its expiry, which the on-chain
//! verifier recomputes when the root is set.

use super::encoder::encode_u32;
use crate::types::Hash32;
use crate::utils::crypto::keccak256_concat;

/// Prefix of an Ethereum signed message over a 32-byte payload
pub const ETH_SIGNED_MESSAGE_PREFIX: &[u8] = b"\x19Ethereum Signed Message:\n32";

/// `keccak256(root || validUntil)`, the payload wrapped by the signed message.
///
/// `validUntil` is a u32 word: 4 little-endian bytes after 28 zero bytes.
pub fn root_commitment(root: &Hash32, valid_until: u32) -> Hash32 {
    keccak256_concat(&[&root[..], &encode_u32(valid_until)[..]])
}

/// Digest each signer signs for `root` expiring at `valid_until`
pub fn signing_hash(root: &Hash32, valid_until: u32) -> Hash32 {
    let commitment = root_commitment(root, valid_until);
    keccak256_concat(&[ETH_SIGNED_MESSAGE_PREFIX, &commitment[..]])
}
