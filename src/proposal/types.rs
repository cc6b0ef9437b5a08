//! Proposal Type Definitions
//!
//! Core data structures for an MCM proposal: the root metadata record and
//! the ordered privileged operations it authorizes.

use crate::types::Hash32;
use serde::{Deserialize, Serialize};
use solana_sdk::pubkey::Pubkey;
use std::fmt;

/// Role of an account in an instruction.
///
/// Bit 0 marks the account writable, bit 1 marks it a signer, the same
/// layout the Solana client libraries use for their numeric roles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccountRole {
    Readonly,
    Writable,
    ReadonlySigner,
    WritableSigner,
}

impl AccountRole {
    pub fn new(is_signer: bool, is_writable: bool) -> Self {
        match (is_signer, is_writable) {
            (false, false) => AccountRole::Readonly,
            (false, true) => AccountRole::Writable,
            (true, false) => AccountRole::ReadonlySigner,
            (true, true) => AccountRole::WritableSigner,
        }
    }

    /// Decode the numeric role (0..=3)
    pub fn from_u8(value: u8) -> Option<Self> {
        match value {
            0 => Some(AccountRole::Readonly),
            1 => Some(AccountRole::Writable),
            2 => Some(AccountRole::ReadonlySigner),
            3 => Some(AccountRole::WritableSigner),
            _ => None,
        }
    }

    /// Decode a role name such as `writable_signer` (case-insensitive)
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().replace('-', "_").as_str() {
            "readonly" => Some(AccountRole::Readonly),
            "writable" => Some(AccountRole::Writable),
            "readonly_signer" => Some(AccountRole::ReadonlySigner),
            "writable_signer" => Some(AccountRole::WritableSigner),
            _ => None,
        }
    }

    pub fn is_signer(&self) -> bool {
        matches!(self, AccountRole::ReadonlySigner | AccountRole::WritableSigner)
    }

    pub fn is_writable(&self) -> bool {
        matches!(self, AccountRole::Writable | AccountRole::WritableSigner)
    }

    pub fn as_u8(&self) -> u8 {
        ((self.is_signer() as u8) << 1) | self.is_writable() as u8
    }
}

/// An account referenced by an operation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AccountRef {
    pub address: Pubkey,
    pub is_signer: bool,
    pub is_writable: bool,
}

impl AccountRef {
    pub fn new(address: Pubkey, role: AccountRole) -> Self {
        Self {
            address,
            is_signer: role.is_signer(),
            is_writable: role.is_writable(),
        }
    }

    pub fn role(&self) -> AccountRole {
        AccountRole::new(self.is_signer, self.is_writable)
    }
}

/// A privileged instruction the multisig will execute
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Operation {
    /// Program the instruction is sent to
    pub target: Pubkey,
    /// Raw instruction payload
    pub data: Vec<u8>,
    pub accounts: Vec<AccountRef>,
    /// Informational; never hashed
    pub program: Option<String>,
    /// Informational; never hashed
    pub description: Option<String>,
}

impl Operation {
    pub fn new(target: Pubkey, data: Vec<u8>, accounts: Vec<AccountRef>) -> Self {
        Self {
            target,
            data,
            accounts,
            program: None,
            description: None,
        }
    }

    pub fn with_description(mut self, program: Option<String>, description: Option<String>) -> Self {
        self.program = program;
        self.description = description;
        self
    }
}

/// Metadata committed alongside the operations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RootMetadata {
    pub chain_id: u64,
    /// The multisig config account the root is set on
    pub multisig: Pubkey,
    /// Executed-op counter on chain when the root is set
    pub pre_op_count: u64,
    /// Counter value once every operation has run
    pub post_op_count: u64,
    pub override_previous_root: bool,
}

/// A complete proposal. Immutable once constructed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Proposal {
    multisig_id: Hash32,
    valid_until: u32,
    operations: Vec<Operation>,
    root_metadata: RootMetadata,
}

impl Proposal {
    /// Assemble a proposal, checking the counter invariants
    pub fn new(
        multisig_id: Hash32,
        valid_until: u32,
        operations: Vec<Operation>,
        root_metadata: RootMetadata,
    ) -> Result<Self, ProposalError> {
        let mut errors = ValidationErrors::default();

        if root_metadata.pre_op_count > root_metadata.post_op_count {
            errors.push(
                "rootMetadata.preOpCount",
                format!(
                    "{} exceeds postOpCount {}",
                    root_metadata.pre_op_count, root_metadata.post_op_count
                ),
            );
        }
        if root_metadata
            .pre_op_count
            .checked_add(operations.len() as u64)
            .is_none()
        {
            errors.push("rootMetadata.preOpCount", "operation nonces overflow u64");
        }

        errors.into_result()?;
        Ok(Self {
            multisig_id,
            valid_until,
            operations,
            root_metadata,
        })
    }

    pub fn multisig_id(&self) -> &Hash32 {
        &self.multisig_id
    }

    pub fn valid_until(&self) -> u32 {
        self.valid_until
    }

    pub fn operations(&self) -> &[Operation] {
        &self.operations
    }

    pub fn root_metadata(&self) -> &RootMetadata {
        &self.root_metadata
    }

    /// Nonce of the operation at `index`: `preOpCount + index`
    pub fn nonce_of(&self, index: usize) -> u64 {
        self.root_metadata.pre_op_count + index as u64
    }
}

/// One schema violation, located by field path
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Violation {
    pub path: String,
    pub message: String,
}

impl Violation {
    pub fn new(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.path, self.message)
    }
}

/// Every violation found while checking a proposal
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationErrors(Vec<Violation>);

impl ValidationErrors {
    pub fn push(&mut self, path: impl Into<String>, message: impl Into<String>) {
        self.0.push(Violation::new(path, message));
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn violations(&self) -> &[Violation] {
        &self.0
    }

    /// `Ok` when nothing was recorded
    pub fn into_result(self) -> Result<(), ProposalError> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(ProposalError::Validation(self))
        }
    }
}

impl From<Vec<Violation>> for ValidationErrors {
    fn from(violations: Vec<Violation>) -> Self {
        Self(violations)
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let joined = self
            .0
            .iter()
            .map(|v| v.to_string())
            .collect::<Vec<_>>()
            .join("; ");
        write!(f, "{}", joined)
    }
}

/// Errors that can occur while loading a proposal
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ProposalError {
    #[error("Invalid proposal: {0}")]
    Validation(ValidationErrors),

    #[error("Invalid proposal JSON: {0}")]
    Json(String),

    #[error("Cannot read proposal: {0}")]
    Io(String),
}
