//! MCM Proposal Compiler
//!
//! Hashes a proposal's root metadata and operations into domain-separated
//! leaves, builds the merkle tree over them and produces the root signers
//! approve together with a proof for every leaf.
//!
//! # Example
//! ```rust,ignore
//! use mcm_compiler::proposal::{compute_proposal_root, Proposal};
//!
//! let proposal = Proposal::from_file("proposal.json".as_ref())?;
//! let compiled = compute_proposal_root(&proposal)?;
//! assert!(compiled.verify());
//! ```

pub mod types;
pub mod encoder;
pub mod hasher;
pub mod signing;
pub mod compiler;
pub mod loader;

pub use types::*;
pub use hasher::{metadata_leaf, operation_leaf};
pub use signing::signing_hash;
pub use compiler::*;
pub use loader::*;

#[cfg(test)]
mod tests;
