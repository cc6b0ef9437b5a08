//! Proposal file loading
//!
//! The interchange form is JSON written by the proposal builder. Loading
//! checks every field before any hashing happens and reports all
//! violations together.

use super::types::*;
use crate::types::{decode_hash32, decode_hex_prefixed, to_hex_prefixed};
use crate::utils::json::{value_as_u32, value_as_u64};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use solana_sdk::pubkey::Pubkey;
use std::path::Path;
use std::str::FromStr;

/// On-disk proposal layout
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProposalFile {
    pub multisig_id: String,
    pub valid_until: Value,
    pub ixs: Vec<InstructionFile>,
    pub root_metadata: RootMetadataFile,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InstructionFile {
    pub program_address: String,
    pub data: String,
    #[serde(default)]
    pub accounts: Vec<AccountFile>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub program: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccountFile {
    pub address: String,
    /// Numeric role (0..=3) or a role name
    pub role: Value,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RootMetadataFile {
    pub chain_id: Value,
    pub multisig: String,
    pub pre_op_count: Value,
    pub post_op_count: Value,
    pub override_previous_root: bool,
}

impl Proposal {
    /// Parse and validate a proposal from JSON
    pub fn from_json(json: &str) -> Result<Self, ProposalError> {
        let file: ProposalFile =
            serde_json::from_str(json).map_err(|e| ProposalError::Json(e.to_string()))?;
        file.into_proposal()
    }

    /// Read, parse and validate a proposal file
    pub fn from_file(path: &Path) -> Result<Self, ProposalError> {
        let json = std::fs::read_to_string(path)
            .map_err(|e| ProposalError::Io(format!("{}: {}", path.display(), e)))?;
        Self::from_json(&json)
    }

    /// The interchange form of this proposal
    pub fn to_file(&self) -> ProposalFile {
        let metadata = self.root_metadata();
        ProposalFile {
            multisig_id: to_hex_prefixed(self.multisig_id()),
            valid_until: Value::from(self.valid_until()),
            ixs: self
                .operations()
                .iter()
                .map(|op| InstructionFile {
                    program_address: op.target.to_string(),
                    data: to_hex_prefixed(&op.data),
                    accounts: op
                        .accounts
                        .iter()
                        .map(|account| AccountFile {
                            address: account.address.to_string(),
                            role: Value::from(account.role().as_u8()),
                        })
                        .collect(),
                    program: op.program.clone(),
                    description: op.description.clone(),
                })
                .collect(),
            root_metadata: RootMetadataFile {
                chain_id: Value::String(metadata.chain_id.to_string()),
                multisig: metadata.multisig.to_string(),
                pre_op_count: Value::from(metadata.pre_op_count),
                post_op_count: Value::from(metadata.post_op_count),
                override_previous_root: metadata.override_previous_root,
            },
        }
    }
}

impl ProposalFile {
    /// Convert to a `Proposal`, collecting every violation on the way
    pub fn into_proposal(self) -> Result<Proposal, ProposalError> {
        let mut errors = ValidationErrors::default();

        let multisig_id = decode_hash32(&self.multisig_id)
            .map_err(|e| errors.push("multisigId", e))
            .ok();

        let valid_until = value_as_u32(&self.valid_until);
        if valid_until.is_none() {
            errors.push("validUntil", "expected unix seconds fitting in u32");
        }

        let operations: Vec<Option<Operation>> = self
            .ixs
            .into_iter()
            .enumerate()
            .map(|(i, ix)| ix.into_operation(&format!("ixs[{}]", i), &mut errors))
            .collect();

        let root_metadata = self.root_metadata.into_metadata(&mut errors);

        if let Some(metadata) = &root_metadata {
            if metadata.pre_op_count > metadata.post_op_count {
                errors.push(
                    "rootMetadata.preOpCount",
                    format!(
                        "{} exceeds postOpCount {}",
                        metadata.pre_op_count, metadata.post_op_count
                    ),
                );
            } else if metadata.post_op_count - metadata.pre_op_count != operations.len() as u64 {
                errors.push(
                    "rootMetadata.postOpCount",
                    format!(
                        "expected preOpCount + {} operations = {}, got {}",
                        operations.len(),
                        metadata.pre_op_count.saturating_add(operations.len() as u64),
                        metadata.post_op_count
                    ),
                );
            }
        }

        errors.into_result()?;

        match (multisig_id, valid_until, root_metadata) {
            (Some(multisig_id), Some(valid_until), Some(root_metadata)) => Proposal::new(
                multisig_id,
                valid_until,
                operations.into_iter().flatten().collect(),
                root_metadata,
            ),
            // every None above recorded a violation
            _ => Err(ProposalError::Json("incomplete proposal".to_string())),
        }
    }
}

impl InstructionFile {
    fn into_operation(self, path: &str, errors: &mut ValidationErrors) -> Option<Operation> {
        let target = parse_pubkey(&self.program_address, &format!("{}.programAddress", path), errors);

        let data = decode_hex_prefixed(&self.data)
            .map_err(|e| errors.push(format!("{}.data", path), format!("invalid hex: {}", e)))
            .ok();

        let accounts: Vec<Option<AccountRef>> = self
            .accounts
            .iter()
            .enumerate()
            .map(|(j, account)| account.to_account_ref(&format!("{}.accounts[{}]", path, j), errors))
            .collect();

        let accounts: Option<Vec<AccountRef>> = accounts.into_iter().collect();
        Some(
            Operation::new(target?, data?, accounts?)
                .with_description(self.program, self.description),
        )
    }
}

impl AccountFile {
    fn to_account_ref(&self, path: &str, errors: &mut ValidationErrors) -> Option<AccountRef> {
        let address = parse_pubkey(&self.address, &format!("{}.address", path), errors);

        let role = match &self.role {
            Value::Number(_) => value_as_u64(&self.role)
                .and_then(|n| u8::try_from(n).ok())
                .and_then(AccountRole::from_u8),
            Value::String(name) => AccountRole::from_name(name)
                .or_else(|| name.parse::<u8>().ok().and_then(AccountRole::from_u8)),
            _ => None,
        };
        if role.is_none() {
            errors.push(format!("{}.role", path), format!("unknown account role {}", self.role));
        }

        Some(AccountRef::new(address?, role?))
    }
}

impl RootMetadataFile {
    fn into_metadata(self, errors: &mut ValidationErrors) -> Option<RootMetadata> {
        let mut counter = |value: &Value, field: &str| {
            let parsed = value_as_u64(value);
            if parsed.is_none() {
                errors.push(format!("rootMetadata.{}", field), format!("expected u64, got {}", value));
            }
            parsed
        };

        let chain_id = counter(&self.chain_id, "chainId");
        let pre_op_count = counter(&self.pre_op_count, "preOpCount");
        let post_op_count = counter(&self.post_op_count, "postOpCount");
        let multisig = parse_pubkey(&self.multisig, "rootMetadata.multisig", errors);

        Some(RootMetadata {
            chain_id: chain_id?,
            multisig: multisig?,
            pre_op_count: pre_op_count?,
            post_op_count: post_op_count?,
            override_previous_root: self.override_previous_root,
        })
    }
}

fn parse_pubkey(value: &str, path: &str, errors: &mut ValidationErrors) -> Option<Pubkey> {
    Pubkey::from_str(value.trim())
        .map_err(|e| errors.push(path, format!("invalid address '{}': {}", value, e)))
        .ok()
}
