//! Leaf Hashing
//!
//! Domain-separated keccak leaves for the root metadata and each operation.
//!
//! ```text
//! metadata  = keccak256(METADATA_DOMAIN || chainId || multisig || preOpCount
//!                       || postOpCount || overridePreviousRoot)
//! operation = keccak256(OPERATION_DOMAIN || chainId || multisig || nonce || target
//!                       || len(data) || data || len(accounts) || accounts)
//! ```

use super::encoder::*;
use super::types::*;
use crate::types::Hash32;
use crate::utils::crypto::keccak256;
use lazy_static::lazy_static;

/// Label hashed into the metadata domain separator
pub const METADATA_DOMAIN_LABEL: &[u8] = b"MANY_CHAIN_MULTI_SIG_DOMAIN_SEPARATOR_METADATA_SOLANA";

/// Label hashed into the operation domain separator
pub const OPERATION_DOMAIN_LABEL: &[u8] = b"MANY_CHAIN_MULTI_SIG_DOMAIN_SEPARATOR_OP_SOLANA";

lazy_static! {
    /// Prefix of every metadata leaf preimage
    pub static ref METADATA_DOMAIN_SEPARATOR: Hash32 = keccak256(METADATA_DOMAIN_LABEL);

    /// Prefix of every operation leaf preimage
    pub static ref OPERATION_DOMAIN_SEPARATOR: Hash32 = keccak256(OPERATION_DOMAIN_LABEL);
}

/// Bytes hashed into the metadata leaf
pub fn metadata_preimage(metadata: &RootMetadata) -> Vec<u8> {
    let [chain_id, multisig] = encode_chain_scope(metadata);

    let mut encoded = Vec::with_capacity(6 * WORD_LEN);
    encoded.extend_from_slice(&*METADATA_DOMAIN_SEPARATOR);
    encoded.extend_from_slice(&chain_id);
    encoded.extend_from_slice(&multisig);
    encoded.extend_from_slice(&encode_u64(metadata.pre_op_count));
    encoded.extend_from_slice(&encode_u64(metadata.post_op_count));
    encoded.extend_from_slice(&encode_bool(metadata.override_previous_root));
    encoded
}

/// Leaf committing to the root metadata
pub fn metadata_leaf(metadata: &RootMetadata) -> Hash32 {
    keccak256(&metadata_preimage(metadata))
}

/// Bytes hashed into the leaf of `operation` executed at `nonce`
pub fn operation_preimage(metadata: &RootMetadata, nonce: u64, operation: &Operation) -> Vec<u8> {
    let [chain_id, multisig] = encode_chain_scope(metadata);
    let accounts = encode_accounts(&operation.accounts);

    let mut encoded =
        Vec::with_capacity(7 * WORD_LEN + operation.data.len() + accounts.len());
    encoded.extend_from_slice(&*OPERATION_DOMAIN_SEPARATOR);
    encoded.extend_from_slice(&chain_id);
    encoded.extend_from_slice(&multisig);
    encoded.extend_from_slice(&encode_u64(nonce));
    encoded.extend_from_slice(&encode_pubkey(&operation.target));
    encoded.extend_from_slice(&encode_u64(operation.data.len() as u64));
    encoded.extend_from_slice(&operation.data);
    encoded.extend_from_slice(&encode_u64(operation.accounts.len() as u64));
    encoded.extend_from_slice(&accounts);
    encoded
}

/// Leaf committing to `operation` at `nonce`, scoped by the metadata's
/// chain id and multisig
pub fn operation_leaf(metadata: &RootMetadata, nonce: u64, operation: &Operation) -> Hash32 {
    keccak256(&operation_preimage(metadata, nonce, operation))
}

#[cfg(test)]
mod hasher_tests {
    use super::*;
    use solana_sdk::pubkey::Pubkey;

    fn metadata() -> RootMetadata {
        RootMetadata {
            chain_id: 1_399_300_952_838_017_768,
            multisig: Pubkey::new_from_array([0x11; 32]),
            pre_op_count: 4,
            post_op_count: 6,
            override_previous_root: false,
        }
    }

    fn operation() -> Operation {
        Operation::new(
            Pubkey::new_from_array([0x22; 32]),
            vec![0xde, 0xad, 0xbe],
            vec![
                AccountRef::new(Pubkey::new_from_array([0x33; 32]), AccountRole::WritableSigner),
                AccountRef::new(Pubkey::new_from_array([0x44; 32]), AccountRole::Readonly),
            ],
        )
    }

    #[test]
    fn test_domain_separators_differ() {
        assert_ne!(*METADATA_DOMAIN_SEPARATOR, *OPERATION_DOMAIN_SEPARATOR);
        assert_eq!(*METADATA_DOMAIN_SEPARATOR, keccak256(METADATA_DOMAIN_LABEL));
    }

    #[test]
    fn test_metadata_preimage_layout() {
        let preimage = metadata_preimage(&metadata());
        assert_eq!(preimage.len(), 6 * 32);
        assert_eq!(&preimage[..32], &*METADATA_DOMAIN_SEPARATOR);
        assert_eq!(&preimage[32..64], &encode_u64(1_399_300_952_838_017_768));
        assert_eq!(&preimage[64..96], &[0x11; 32]);
        assert_eq!(preimage[96 + 24], 4);
        assert_eq!(preimage[128 + 24], 6);
        assert_eq!(preimage[191], 0);
    }

    #[test]
    fn test_operation_preimage_layout() {
        let op = operation();
        let preimage = operation_preimage(&metadata(), 5, &op);

        // 7 words + 3 data bytes + 2 accounts of 33 bytes
        assert_eq!(preimage.len(), 7 * 32 + 3 + 66);
        assert_eq!(&preimage[..32], &*OPERATION_DOMAIN_SEPARATOR);
        assert_eq!(preimage[96 + 24], 5);
        assert_eq!(&preimage[128..160], &[0x22; 32]);
        assert_eq!(&preimage[160..192], &encode_u64(3));
        assert_eq!(&preimage[192..195], &[0xde, 0xad, 0xbe]);
        assert_eq!(&preimage[195..227], &encode_u64(2));
        assert_eq!(&preimage[227..259], &[0x33; 32]);
        assert_eq!(preimage[259], 3);
        assert_eq!(&preimage[260..292], &[0x44; 32]);
        assert_eq!(preimage[292], 0);
    }

    #[test]
    fn test_domain_separation() {
        // Same body bytes, only the separator differs
        let preimage = metadata_preimage(&metadata());
        let mut as_operation = preimage.clone();
        as_operation[..32].copy_from_slice(&*OPERATION_DOMAIN_SEPARATOR);

        assert_eq!(preimage[32..], as_operation[32..]);
        assert_ne!(keccak256(&preimage), keccak256(&as_operation));
        assert_eq!(metadata_leaf(&metadata()), keccak256(&preimage));
    }

    #[test]
    fn test_nonce_and_description_effects() {
        let meta = metadata();
        let op = operation();
        assert_ne!(operation_leaf(&meta, 4, &op), operation_leaf(&meta, 5, &op));

        // Informational fields are not hashed
        let described = op
            .clone()
            .with_description(Some("router".to_string()), Some("set fee".to_string()));
        assert_eq!(operation_leaf(&meta, 4, &op), operation_leaf(&meta, 4, &described));
    }

    #[test]
    fn test_override_flag_changes_metadata_leaf() {
        let mut overriding = metadata();
        overriding.override_previous_root = true;
        assert_ne!(metadata_leaf(&metadata()), metadata_leaf(&overriding));
    }
}
