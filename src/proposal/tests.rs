//! Proposal compilation tests

use super::*;
use crate::merkle::{hash_pair, verify_proof};
use serde_json::json;
use solana_sdk::pubkey::Pubkey;

fn key(byte: u8) -> Pubkey {
    Pubkey::new_from_array([byte; 32])
}

fn metadata(pre: u64, post: u64) -> RootMetadata {
    RootMetadata {
        chain_id: 1,
        multisig: key(0xAA),
        pre_op_count: pre,
        post_op_count: post,
        override_previous_root: false,
    }
}

fn transfer(byte: u8) -> Operation {
    Operation::new(
        key(0x10),
        vec![2, 0, 0, 0, byte],
        vec![
            AccountRef::new(key(byte), AccountRole::WritableSigner),
            AccountRef::new(key(byte.wrapping_add(1)), AccountRole::Writable),
        ],
    )
}

fn proposal(ops: usize, pre: u64) -> Proposal {
    let operations = (0..ops).map(|i| transfer(i as u8)).collect();
    Proposal::new([7u8; 32], 1_750_000_000, operations, metadata(pre, pre + ops as u64)).unwrap()
}

fn sample_json() -> serde_json::Value {
    json!({
        "multisigId": format!("0x{}", "07".repeat(32)),
        "validUntil": 1_750_000_000u32,
        "ixs": [
            {
                "programAddress": key(0x10).to_string(),
                "data": "0x0200000005",
                "accounts": [
                    { "address": key(5).to_string(), "role": 3 },
                    { "address": key(6).to_string(), "role": "writable" }
                ],
                "program": "system",
                "description": "fund fee payer"
            }
        ],
        "rootMetadata": {
            "chainId": "1",
            "multisig": key(0xAA).to_string(),
            "preOpCount": 4,
            "postOpCount": 5,
            "overridePreviousRoot": false
        }
    })
}

#[test]
fn test_compute_root_is_deterministic() {
    let p = proposal(3, 0);
    let first = compute_proposal_root(&p).unwrap();
    let second = compute_proposal_root(&p).unwrap();
    assert_eq!(first, second);
    assert_eq!(first.operation_leaves.len(), 3);
    assert_eq!(first.operation_proofs.len(), 3);
}

#[test]
fn test_zero_operations_root_is_metadata_leaf() {
    let p = proposal(0, 9);
    let compiled = compute_proposal_root(&p).unwrap();
    assert_eq!(compiled.root, compiled.metadata_leaf);
    assert!(compiled.metadata_proof.is_empty());
    assert!(compiled.operation_leaves.is_empty());
    assert!(compiled.verify());
}

#[test]
fn test_single_operation_root() {
    let p = proposal(1, 0);
    let compiled = compute_proposal_root(&p).unwrap();
    let expected = hash_pair(&compiled.metadata_leaf, &compiled.operation_leaves[0]);
    assert_eq!(compiled.root, expected);
    assert_eq!(compiled.metadata_proof, vec![compiled.operation_leaves[0]]);
    assert_eq!(compiled.operation_proofs[0], vec![compiled.metadata_leaf]);
}

#[test]
fn test_every_proof_verifies() {
    for ops in 0..9 {
        let compiled = compute_proposal_root(&proposal(ops, 100)).unwrap();
        assert!(compiled.verify(), "{} operations", ops);
        for (leaf, proof) in compiled.operation_leaves.iter().zip(&compiled.operation_proofs) {
            assert!(verify_proof(leaf, proof, &compiled.root));
        }
    }
}

#[test]
fn test_operation_leaves_use_sequential_nonces() {
    let p = proposal(3, 40);
    let compiled = compute_proposal_root(&p).unwrap();
    for (i, op) in p.operations().iter().enumerate() {
        let expected = operation_leaf(p.root_metadata(), 40 + i as u64, op);
        assert_eq!(compiled.operation_leaves[i], expected);
    }
}

#[test]
fn test_pre_op_count_changes_root() {
    let a = compute_proposal_root(&proposal(2, 0)).unwrap();
    let b = compute_proposal_root(&proposal(2, 1)).unwrap();
    assert_ne!(a.root, b.root);
}

#[test]
fn test_reordering_operations_changes_root() {
    let forward = proposal(2, 0);
    let mut ops = forward.operations().to_vec();
    ops.reverse();
    let reversed = Proposal::new([7u8; 32], 1_750_000_000, ops, metadata(0, 2)).unwrap();

    let a = compute_proposal_root(&forward).unwrap();
    let b = compute_proposal_root(&reversed).unwrap();
    assert_ne!(a.root, b.root);
}

#[test]
fn test_tampered_proof_fails() {
    let mut compiled = compute_proposal_root(&proposal(4, 0)).unwrap();
    assert!(compiled.verify());
    compiled.operation_proofs[2][0][0] ^= 1;
    assert!(!compiled.verify());
}

#[test]
fn test_report_round_trip() {
    let p = proposal(3, 2);
    let compiled = compute_proposal_root(&p).unwrap();
    let report = compiled.to_report(&p);
    assert!(report.signing_hash_matches());

    let json = serde_json::to_string(&report).unwrap();
    assert!(json.contains("\"operationProofs\""));
    assert!(json.contains(&compiled.root_hex()));

    let back: RootReport = serde_json::from_str(&json).unwrap();
    assert_eq!(back, report);
    assert_eq!(back.to_proposal_root(), compiled);
}

#[test]
fn test_report_detects_wrong_signing_hash() {
    let p = proposal(1, 0);
    let mut report = compute_proposal_root(&p).unwrap().to_report(&p);
    report.valid_until += 1;
    assert!(!report.signing_hash_matches());
}

#[test]
fn test_load_proposal_json() {
    let p = Proposal::from_json(&sample_json().to_string()).unwrap();

    assert_eq!(p.multisig_id(), &[7u8; 32]);
    assert_eq!(p.valid_until(), 1_750_000_000);
    assert_eq!(p.root_metadata().chain_id, 1);
    assert_eq!(p.nonce_of(0), 4);

    let op = &p.operations()[0];
    assert_eq!(op.target, key(0x10));
    assert_eq!(op.data, vec![2, 0, 0, 0, 5]);
    assert_eq!(op.accounts[0].role(), AccountRole::WritableSigner);
    assert_eq!(op.accounts[1].role(), AccountRole::Writable);
    assert_eq!(op.description.as_deref(), Some("fund fee payer"));
}

#[test]
fn test_loader_collects_all_violations() {
    let mut value = sample_json();
    value["multisigId"] = json!("0x1234");
    value["ixs"][0]["data"] = json!("0xzz");
    value["ixs"][0]["accounts"][1]["role"] = json!("owner");
    value["rootMetadata"]["multisig"] = json!("not-a-key");

    match Proposal::from_json(&value.to_string()) {
        Err(ProposalError::Validation(errors)) => {
            let paths: Vec<&str> = errors.violations().iter().map(|v| v.path.as_str()).collect();
            assert!(paths.contains(&"multisigId"));
            assert!(paths.contains(&"ixs[0].data"));
            assert!(paths.contains(&"ixs[0].accounts[1].role"));
            assert!(paths.contains(&"rootMetadata.multisig"));
            assert_eq!(errors.len(), 4);
        }
        other => panic!("expected validation errors, got {:?}", other),
    }
}

#[test]
fn test_loader_checks_op_count() {
    let mut value = sample_json();
    value["rootMetadata"]["postOpCount"] = json!(7);

    match Proposal::from_json(&value.to_string()) {
        Err(ProposalError::Validation(errors)) => {
            assert_eq!(errors.violations()[0].path, "rootMetadata.postOpCount");
        }
        other => panic!("expected validation errors, got {:?}", other),
    }
}

#[test]
fn test_loader_rejects_pre_above_post() {
    let mut value = sample_json();
    value["rootMetadata"]["preOpCount"] = json!(9);

    let err = Proposal::from_json(&value.to_string()).unwrap_err();
    assert!(err.to_string().contains("exceeds postOpCount"));
}

#[test]
fn test_loader_rejects_out_of_range_valid_until() {
    let mut value = sample_json();
    value["validUntil"] = json!(4_294_967_296u64);

    let err = Proposal::from_json(&value.to_string()).unwrap_err();
    assert!(err.to_string().contains("validUntil"));
}

#[test]
fn test_loader_reports_malformed_json() {
    let err = Proposal::from_json("{\"ixs\": [").unwrap_err();
    assert!(matches!(err, ProposalError::Json(_)));
}

#[test]
fn test_file_form_round_trip() {
    let p = proposal(2, 11);
    let file = p.to_file();
    let json = serde_json::to_string(&file).unwrap();
    let back = Proposal::from_json(&json).unwrap();

    assert_eq!(back, p);
    assert_eq!(
        compute_proposal_root(&back).unwrap().root,
        compute_proposal_root(&p).unwrap().root
    );
}
