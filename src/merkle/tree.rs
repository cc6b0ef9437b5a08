//! Tree construction and proof extraction

use crate::types::Hash32;
use crate::utils::crypto::keccak256_concat;

/// Sibling hashes from a leaf up to the root
pub type Proof = Vec<Hash32>;

/// Errors that can occur while building or querying a tree
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MerkleError {
    #[error("Cannot build a merkle tree from zero leaves")]
    EmptyTree,

    #[error("Leaf index {index} out of range for {leaves} leaves")]
    LeafIndexOutOfRange { index: usize, leaves: usize },
}

/// Commutative pair hash: `keccak256(min(a, b) || max(a, b))`
pub fn hash_pair(a: &Hash32, b: &Hash32) -> Hash32 {
    if a <= b {
        keccak256_concat(&[&a[..], &b[..]])
    } else {
        keccak256_concat(&[&b[..], &a[..]])
    }
}

/// All levels of a tree, leaves first, root last
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MerkleTree {
    levels: Vec<Vec<Hash32>>,
}

/// Root plus one proof per input leaf
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MerkleOutput {
    pub root: Hash32,
    pub proofs: Vec<Proof>,
}

impl MerkleTree {
    /// Build the tree bottom-up.
    ///
    /// A level with an odd count carries its last node to the next level
    /// as-is.
    pub fn new(leaves: Vec<Hash32>) -> Result<Self, MerkleError> {
        if leaves.is_empty() {
            return Err(MerkleError::EmptyTree);
        }

        let mut levels = vec![leaves];
        while let Some(current) = levels.last().filter(|level| level.len() > 1) {
            let next: Vec<Hash32> = current
                .chunks(2)
                .map(|pair| {
                    if pair.len() == 2 {
                        hash_pair(&pair[0], &pair[1])
                    } else {
                        pair[0]
                    }
                })
                .collect();
            levels.push(next);
        }

        Ok(Self { levels })
    }

    pub fn root(&self) -> Hash32 {
        // `new` guarantees a non-empty top level
        self.levels[self.levels.len() - 1][0]
    }

    pub fn leaves(&self) -> &[Hash32] {
        &self.levels[0]
    }

    pub fn leaf_count(&self) -> usize {
        self.levels[0].len()
    }

    pub fn levels(&self) -> &[Vec<Hash32>] {
        &self.levels
    }

    /// Inclusion proof for the leaf at `index`.
    ///
    /// Levels where the path node has no sibling (it was promoted)
    /// contribute nothing, so proof lengths differ between leaves.
    pub fn proof(&self, index: usize) -> Result<Proof, MerkleError> {
        if index >= self.leaf_count() {
            return Err(MerkleError::LeafIndexOutOfRange {
                index,
                leaves: self.leaf_count(),
            });
        }

        let mut proof = Vec::new();
        let mut position = index;
        for level in &self.levels[..self.levels.len() - 1] {
            let sibling = position ^ 1;
            if let Some(hash) = level.get(sibling) {
                proof.push(*hash);
            }
            position /= 2;
        }
        Ok(proof)
    }

    /// Proofs for every leaf, in leaf order
    pub fn proofs(&self) -> Vec<Proof> {
        (0..self.leaf_count())
            .filter_map(|i| self.proof(i).ok())
            .collect()
    }
}

/// Build a tree and return its root with a proof per leaf
pub fn build_merkle_tree(leaves: &[Hash32]) -> Result<MerkleOutput, MerkleError> {
    let tree = MerkleTree::new(leaves.to_vec())?;
    Ok(MerkleOutput {
        root: tree.root(),
        proofs: tree.proofs(),
    })
}
