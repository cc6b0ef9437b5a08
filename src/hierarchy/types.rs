//! Hierarchy Type Definitions

use crate::types::EvmAddress;
use serde::{Deserialize, Serialize};

/// Width of the on-chain group arrays
pub const MAX_NUM_GROUPS: usize = 32;

/// Upper bound on signers accepted by the on-chain config
pub const MAX_NUM_SIGNERS: usize = 180;

/// Group id of the root multisig
pub const ROOT_GROUP_ID: u8 = 0;

/// Approval threshold of a group
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Quorum {
    pub required: u8,
    /// Declared member count. Parsed and checked against `required`, never
    /// written to the on-chain arrays.
    pub total: u8,
}

/// A multisig node of the hierarchy
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Group {
    pub group_id: u8,
    pub name: String,
    pub quorum: Quorum,
    /// Enclosing group; the root is its own parent
    pub parent_group_id: u8,
}

impl Group {
    pub fn is_root(&self) -> bool {
        self.group_id == self.parent_group_id
    }
}

/// A signer leaf, assigned to its enclosing group
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Signer {
    pub address: EvmAddress,
    pub group_id: u8,
}

/// Flat form of a hierarchy DSL string.
///
/// `groups` is in pre-order, so `groups[i].group_id == i`. `signer_groups`
/// is parallel to `signers`. The two fixed arrays are what gets written on
/// chain; slots past the last group are zero.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParsedHierarchy {
    pub groups: Vec<Group>,
    pub signers: Vec<Signer>,
    pub signer_groups: Vec<u8>,
    pub group_quorums: [u8; MAX_NUM_GROUPS],
    pub group_parents: [u8; MAX_NUM_GROUPS],
}

impl ParsedHierarchy {
    pub(crate) fn empty() -> Self {
        Self {
            groups: Vec::new(),
            signers: Vec::new(),
            signer_groups: Vec::new(),
            group_quorums: [0; MAX_NUM_GROUPS],
            group_parents: [0; MAX_NUM_GROUPS],
        }
    }

    pub fn group_count(&self) -> usize {
        self.groups.len()
    }

    /// Signers directly assigned to `group_id`
    pub fn members_of(&self, group_id: u8) -> impl Iterator<Item = &Signer> + '_ {
        self.signers.iter().filter(move |s| s.group_id == group_id)
    }

    /// Child groups of `group_id` (the root is never its own child)
    pub fn children_of(&self, group_id: u8) -> impl Iterator<Item = &Group> + '_ {
        self.groups
            .iter()
            .filter(move |g| g.parent_group_id == group_id && !g.is_root())
    }
}

/// Errors raised while compiling or checking a hierarchy
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum HierarchyError {
    #[error("Syntax error at offset {offset}: {message}")]
    Syntax { offset: usize, message: String },

    #[error("Capacity exceeded at offset {offset}: at most {capacity} groups fit on chain")]
    CapacityExceeded { capacity: usize, offset: usize },

    #[error("Hierarchy violates chain limits: {}", .0.join("; "))]
    Validation(Vec<String>),
}

impl HierarchyError {
    pub(crate) fn syntax(offset: usize, message: impl Into<String>) -> Self {
        Self::Syntax {
            offset,
            message: message.into(),
        }
    }
}
