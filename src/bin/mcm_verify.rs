use anyhow::{bail, Context, Result};
use mcm_compiler::merkle::verify_proof;
use mcm_compiler::proposal::RootReport;
use mcm_compiler::types::to_hex_prefixed;
use mcm_compiler::utils::json::parse_json;
use std::env;
use std::fs;
use std::io::{self, Read};

struct CheckResult {
    name: String,
    success: bool,
    message: String,
}

fn main() -> Result<()> {
    let args: Vec<String> = env::args().collect();
    let payload = if let Some(path) = args.get(1) {
        fs::read_to_string(path).with_context(|| format!("cannot read {}", path))?
    } else {
        let mut buffer = String::new();
        io::stdin()
            .read_to_string(&mut buffer)
            .context("cannot read report from stdin")?;
        buffer
    };

    let report: RootReport = parse_json(&payload).context("not a compute-root report")?;

    let mut results = Vec::new();
    results.push(run_check("signing hash", || validate_signing_hash(&report)));
    results.push(run_check("metadata", || {
        validate_leaf(&report, &report.metadata_leaf, &report.metadata_proof)
    }));
    results.push(run_check("proof count", || validate_proof_count(&report)));
    results.push(run_check("nonce range", || validate_nonce_range(&report)));
    for (i, (leaf, proof)) in report
        .operation_leaves
        .iter()
        .zip(&report.operation_proofs)
        .enumerate()
    {
        let name = match report.pre_op_count.checked_add(i as u64) {
            Some(nonce) => format!("op {}", nonce),
            None => format!("op #{}", i),
        };
        results.push(run_check(name, || {
            validate_leaf(&report, leaf, proof)
        }));
    }

    println!("================ Root Verification ================");
    println!("root: {}", to_hex_prefixed(&report.root));
    for result in &results {
        let status = if result.success {
            "✅ PASS"
        } else {
            "❌ FAIL"
        };
        println!("{:<14} {}", result.name, status);
        if !result.success {
            println!("    {}", result.message);
        }
    }

    let overall_success = results.iter().all(|r| r.success);
    println!("===================================================");
    if overall_success {
        println!("Overall status: ✅ Every leaf verifies against the root");
        Ok(())
    } else {
        println!("Overall status: ❌ Verification failed");
        bail!("root verification failed")
    }
}

fn run_check<F>(name: impl Into<String>, f: F) -> CheckResult
where
    F: FnOnce() -> Result<(), String>,
{
    match f() {
        Ok(_) => CheckResult {
            name: name.into(),
            success: true,
            message: String::new(),
        },
        Err(err) => CheckResult {
            name: name.into(),
            success: false,
            message: err,
        },
    }
}

fn validate_signing_hash(report: &RootReport) -> Result<(), String> {
    if !report.signing_hash_matches() {
        return Err(format!(
            "signingHash does not commit to root and validUntil {}",
            report.valid_until
        ));
    }
    Ok(())
}

fn validate_proof_count(report: &RootReport) -> Result<(), String> {
    if report.operation_leaves.len() != report.operation_proofs.len() {
        return Err(format!(
            "{} operation leaves but {} proofs",
            report.operation_leaves.len(),
            report.operation_proofs.len()
        ));
    }
    Ok(())
}

fn validate_nonce_range(report: &RootReport) -> Result<(), String> {
    let count = report.operation_leaves.len() as u64;
    if report.pre_op_count.checked_add(count).is_none() {
        return Err(format!(
            "preOpCount {} plus {} operation(s) overflows u64",
            report.pre_op_count, count
        ));
    }
    Ok(())
}

fn validate_leaf(report: &RootReport, leaf: &[u8; 32], proof: &[[u8; 32]]) -> Result<(), String> {
    if !verify_proof(leaf, proof, &report.root) {
        return Err(format!(
            "leaf {} does not fold to the root with {} proof element(s)",
            to_hex_prefixed(leaf),
            proof.len()
        ));
    }
    Ok(())
}
