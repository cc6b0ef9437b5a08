//! Proposal Merkle Tree
//!
//! Binary keccak tree over an ordered list of leaves. Pairs are hashed in
//! sorted order, so proofs carry no left/right flags, and an odd node at
//! the end of a level is promoted unchanged instead of being duplicated.
//!
//! The shape must match the on-chain verifier exactly; proofs from a
//! pad-to-power-of-two tree will not verify.

pub mod tree;
pub mod proof;

pub use tree::*;
pub use proof::*;

#[cfg(test)]
mod tests;
