//! MCM Proposal Compiler
//!
//! Offline tooling for the Many-Chain Multisig program on Solana.
//!
//! # Architecture
//!
//! This crate provides:
//! - **hierarchy**: Compile a signer-hierarchy description into the flat
//!   group arrays the multisig config stores
//! - **proposal**: Load proposals, hash their leaves and compile the root
//! - **merkle**: Sorted-pair keccak tree, proofs and proof verification
//! - **utils**: Keccak, JSON helpers, logging and compiler settings
//!
//! Nothing here signs or submits transactions. The output is the root and
//! proofs that signers approve and executors submit.
//!
//! # Example
//!
//! ```rust,ignore
//! use mcm_compiler::{compute_proposal_root, parse_hierarchy, Proposal};
//!
//! let config = parse_hierarchy("m:root:1o1(s:0x01)")?;
//! let proposal = Proposal::from_file("proposal.json".as_ref())?;
//! let compiled = compute_proposal_root(&proposal)?;
//! println!("root: {}", compiled.root_hex());
//! ```

pub mod error;
pub mod types;
pub mod serde_bytes;
pub mod hierarchy;
pub mod proposal;
pub mod merkle;
pub mod utils;

// Re-export key types for convenience
pub use error::{ErrorCode, McmError, McmResult};
pub use types::{EvmAddress, Hash32};

pub use hierarchy::{parse_hierarchy, HierarchyError, ParsedHierarchy};
pub use proposal::{
    compute_proposal_root, signing_hash, AccountRef, AccountRole, Operation, Proposal,
    ProposalError, ProposalRoot, RootMetadata, RootReport,
};
pub use merkle::{build_merkle_tree, hash_pair, verify_proof, MerkleError, MerkleTree};

// Re-export crypto utilities for binaries
pub use utils::crypto::{keccak256, to_checksum_address};
pub use utils::settings::CompilerSettings;
