//! Proof folding, as the on-chain verifier does it

use super::tree::hash_pair;
use crate::types::Hash32;

/// Fold `leaf` through `proof` with the commutative pair hash
pub fn fold_proof(leaf: &Hash32, proof: &[Hash32]) -> Hash32 {
    proof
        .iter()
        .fold(*leaf, |node, sibling| hash_pair(&node, sibling))
}

/// True when `proof` links `leaf` to `root`
pub fn verify_proof(leaf: &Hash32, proof: &[Hash32], root: &Hash32) -> bool {
    fold_proof(leaf, proof) == *root
}
