//! Proposal compilation
//!
//! `[metadataLeaf, op0Leaf, op1Leaf, ...]` → merkle root plus a proof per
//! leaf. Pure in the proposal's content: same proposal, same root.

use super::hasher::{metadata_leaf, operation_leaf};
use super::signing::signing_hash;
use super::types::Proposal;
use crate::merkle::{build_merkle_tree, verify_proof, MerkleError, Proof};
use crate::types::{to_hex_prefixed, Hash32};
use serde::{Deserialize, Serialize};

/// Root and proofs of a compiled proposal
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProposalRoot {
    pub root: Hash32,
    pub metadata_leaf: Hash32,
    pub operation_leaves: Vec<Hash32>,
    pub metadata_proof: Proof,
    /// `operation_proofs[i]` justifies the operation at nonce `preOpCount + i`
    pub operation_proofs: Vec<Proof>,
}

/// Compile a proposal into its merkle root and inclusion proofs
pub fn compute_proposal_root(proposal: &Proposal) -> Result<ProposalRoot, MerkleError> {
    let metadata = proposal.root_metadata();
    let metadata_leaf = metadata_leaf(metadata);

    let operation_leaves: Vec<Hash32> = proposal
        .operations()
        .iter()
        .enumerate()
        .map(|(i, op)| operation_leaf(metadata, proposal.nonce_of(i), op))
        .collect();

    let mut leaves = Vec::with_capacity(1 + operation_leaves.len());
    leaves.push(metadata_leaf);
    leaves.extend_from_slice(&operation_leaves);

    let tree = build_merkle_tree(&leaves)?;
    let mut proofs = tree.proofs.into_iter();
    let metadata_proof = proofs.next().ok_or(MerkleError::EmptyTree)?;

    Ok(ProposalRoot {
        root: tree.root,
        metadata_leaf,
        operation_leaves,
        metadata_proof,
        operation_proofs: proofs.collect(),
    })
}

impl ProposalRoot {
    /// Proof for the operation at position `index` of the proposal
    pub fn operation_proof(&self, index: usize) -> Option<&Proof> {
        self.operation_proofs.get(index)
    }

    /// Check every leaf against the root
    pub fn verify(&self) -> bool {
        verify_proof(&self.metadata_leaf, &self.metadata_proof, &self.root)
            && self.operation_leaves.len() == self.operation_proofs.len()
            && self
                .operation_leaves
                .iter()
                .zip(&self.operation_proofs)
                .all(|(leaf, proof)| verify_proof(leaf, proof, &self.root))
    }

    pub fn root_hex(&self) -> String {
        to_hex_prefixed(&self.root)
    }

    /// Interchange form with the signing digest attached
    pub fn to_report(&self, proposal: &Proposal) -> RootReport {
        RootReport {
            multisig_id: *proposal.multisig_id(),
            valid_until: proposal.valid_until(),
            pre_op_count: proposal.root_metadata().pre_op_count,
            root: self.root,
            signing_hash: signing_hash(&self.root, proposal.valid_until()),
            metadata_leaf: self.metadata_leaf,
            metadata_proof: self.metadata_proof.clone(),
            operation_leaves: self.operation_leaves.clone(),
            operation_proofs: self.operation_proofs.clone(),
        }
    }
}

/// Hex-encoded output of `compute-root`, read back by `mcm-verify`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RootReport {
    #[serde(with = "crate::serde_bytes::hex32")]
    pub multisig_id: Hash32,
    pub valid_until: u32,
    pub pre_op_count: u64,
    #[serde(with = "crate::serde_bytes::hex32")]
    pub root: Hash32,
    #[serde(with = "crate::serde_bytes::hex32")]
    pub signing_hash: Hash32,
    #[serde(with = "crate::serde_bytes::hex32")]
    pub metadata_leaf: Hash32,
    #[serde(with = "crate::serde_bytes::hex32_vec")]
    pub metadata_proof: Proof,
    #[serde(with = "crate::serde_bytes::hex32_vec")]
    pub operation_leaves: Vec<Hash32>,
    #[serde(with = "crate::serde_bytes::hex32_nested")]
    pub operation_proofs: Vec<Proof>,
}

impl RootReport {
    /// Rebuild the root view of the report
    pub fn to_proposal_root(&self) -> ProposalRoot {
        ProposalRoot {
            root: self.root,
            metadata_leaf: self.metadata_leaf,
            operation_leaves: self.operation_leaves.clone(),
            metadata_proof: self.metadata_proof.clone(),
            operation_proofs: self.operation_proofs.clone(),
        }
    }

    /// True when `signing_hash` matches the root and expiry
    pub fn signing_hash_matches(&self) -> bool {
        signing_hash(&self.root, self.valid_until) == self.signing_hash
    }
}
