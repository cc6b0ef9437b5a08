//! Leaf field encoding
//!
//! Every fixed field is widened to a 32-byte word by zero-extending on the
//! left. Integers are little-endian before widening, so a u64 word reads
//! `[24 zero bytes][8 LE bytes]`.

use super::types::{AccountRef, RootMetadata};
use crate::types::Hash32;
use solana_sdk::pubkey::Pubkey;

/// Width of one encoded field
pub const WORD_LEN: usize = 32;

/// Encoded width of one account entry: address word plus flags byte
pub const ACCOUNT_ENTRY_LEN: usize = WORD_LEN + 1;

/// `u64` as 8 little-endian bytes, left zero-extended
pub fn encode_u64(value: u64) -> Hash32 {
    let mut word = [0u8; WORD_LEN];
    word[WORD_LEN - 8..].copy_from_slice(&value.to_le_bytes());
    word
}

/// `u32` as 4 little-endian bytes, left zero-extended
pub fn encode_u32(value: u32) -> Hash32 {
    let mut word = [0u8; WORD_LEN];
    word[WORD_LEN - 4..].copy_from_slice(&value.to_le_bytes());
    word
}

/// `bool` as a single 0x00/0x01 byte, left zero-extended
pub fn encode_bool(value: bool) -> Hash32 {
    let mut word = [0u8; WORD_LEN];
    word[WORD_LEN - 1] = value as u8;
    word
}

/// A Solana address is already word-sized
pub fn encode_pubkey(pubkey: &Pubkey) -> Hash32 {
    pubkey.to_bytes()
}

/// `(isSigner << 1) | isWritable`
pub fn account_flags(account: &AccountRef) -> u8 {
    ((account.is_signer as u8) << 1) | account.is_writable as u8
}

/// Address word followed by the flags byte
pub fn encode_account(account: &AccountRef) -> [u8; ACCOUNT_ENTRY_LEN] {
    let mut entry = [0u8; ACCOUNT_ENTRY_LEN];
    entry[..WORD_LEN].copy_from_slice(&encode_pubkey(&account.address));
    entry[WORD_LEN] = account_flags(account);
    entry
}

/// Accounts concatenated in list order
pub fn encode_accounts(accounts: &[AccountRef]) -> Vec<u8> {
    let mut encoded = Vec::with_capacity(accounts.len() * ACCOUNT_ENTRY_LEN);
    for account in accounts {
        encoded.extend_from_slice(&encode_account(account));
    }
    encoded
}

/// The fields shared by metadata and operation leaves: chain id and multisig
pub fn encode_chain_scope(metadata: &RootMetadata) -> [Hash32; 2] {
    [encode_u64(metadata.chain_id), encode_pubkey(&metadata.multisig)]
}
