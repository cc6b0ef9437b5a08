//! Tests for tree shape, proofs and the pair hash

#[cfg(test)]
mod integration_tests {
    use crate::merkle::*;
    use crate::types::Hash32;
    use crate::utils::crypto::keccak256;

    fn leaves(n: usize) -> Vec<Hash32> {
        (0..n).map(|i| keccak256(&(i as u64).to_le_bytes())).collect()
    }

    #[test]
    fn test_empty_input_is_structural_error() {
        assert_eq!(MerkleTree::new(Vec::new()), Err(MerkleError::EmptyTree));
        assert_eq!(build_merkle_tree(&[]), Err(MerkleError::EmptyTree));
    }

    #[test]
    fn test_single_leaf() {
        let l = leaves(1);
        let out = build_merkle_tree(&l).unwrap();
        assert_eq!(out.root, l[0]);
        assert_eq!(out.proofs, vec![Vec::<Hash32>::new()]);
    }

    #[test]
    fn test_hash_pair_is_commutative_and_sorted() {
        let a = [0x01u8; 32];
        let b = [0xffu8; 32];
        assert_eq!(hash_pair(&a, &b), hash_pair(&b, &a));

        let expected = keccak256(&[a.as_slice(), b.as_slice()].concat());
        assert_eq!(hash_pair(&b, &a), expected);
    }

    #[test]
    fn test_odd_node_promotion() {
        let l = leaves(3);
        let tree = MerkleTree::new(l.clone()).unwrap();

        let h01 = hash_pair(&l[0], &l[1]);
        assert_eq!(tree.levels()[1], vec![h01, l[2]]);
        assert_eq!(tree.root(), hash_pair(&h01, &l[2]));

        assert_eq!(tree.proof(2).unwrap(), vec![h01]);
        assert_eq!(tree.proof(0).unwrap(), vec![l[1], l[2]]);
        assert_eq!(tree.proof(1).unwrap(), vec![l[0], l[2]]);
    }

    #[test]
    fn test_five_leaves_shape() {
        // level1 = [h01, h23, l4], level2 = [h0123, l4], root = pair(h0123, l4)
        let l = leaves(5);
        let tree = MerkleTree::new(l.clone()).unwrap();

        assert_eq!(tree.levels().len(), 4);
        let h0123 = hash_pair(&hash_pair(&l[0], &l[1]), &hash_pair(&l[2], &l[3]));
        assert_eq!(tree.root(), hash_pair(&h0123, &l[4]));

        // The promoted leaf skips two levels
        assert_eq!(tree.proof(4).unwrap(), vec![h0123]);
        assert_eq!(tree.proof(0).unwrap().len(), 3);
    }

    #[test]
    fn test_proof_round_trip_for_small_trees() {
        for n in [1usize, 2, 3, 4, 5, 7] {
            let l = leaves(n);
            let out = build_merkle_tree(&l).unwrap();
            assert_eq!(out.proofs.len(), n);
            for (i, leaf) in l.iter().enumerate() {
                assert!(
                    verify_proof(leaf, &out.proofs[i], &out.root),
                    "leaf {} of {} did not fold to the root",
                    i,
                    n
                );
            }
        }
    }

    #[test]
    fn test_power_of_two_proofs_are_full_depth() {
        let tree = MerkleTree::new(leaves(8)).unwrap();
        assert!(tree.proofs().iter().all(|p| p.len() == 3));
    }

    #[test]
    fn test_proof_index_out_of_range() {
        let tree = MerkleTree::new(leaves(2)).unwrap();
        assert_eq!(
            tree.proof(2),
            Err(MerkleError::LeafIndexOutOfRange { index: 2, leaves: 2 })
        );
    }

    #[test]
    fn test_leaf_order_changes_root() {
        let l = leaves(3);
        let mut swapped = l.clone();
        swapped.swap(1, 2);
        assert_ne!(
            build_merkle_tree(&l).unwrap().root,
            build_merkle_tree(&swapped).unwrap().root
        );
    }
}
