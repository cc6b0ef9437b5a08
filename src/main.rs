//! `mcm`: offline compiler for Many-Chain Multisig configs and proposals
//!
//! # Usage
//!
//! ```bash
//! mcm parse-hierarchy "m:root:1o2(s:0xAA..0A,m:ops:2o3(s:0xBB..0B,s:0xCC..0C,s:0xDD..0D))"
//! mcm compute-root proposal.json > root.json
//! mcm verify-proof --leaf 0x.. --root 0x.. --proof 0x.. --proof 0x..
//! ```
//!
//! Results go to stdout as JSON. Failures are printed as a JSON `McmError`
//! and the process exits non-zero.

use clap::{Parser, Subcommand};
use mcm_compiler::error::{ErrorCode, McmError, McmResult};
use mcm_compiler::hierarchy::{parse_hierarchy, ParsedHierarchy};
use mcm_compiler::merkle::fold_proof;
use mcm_compiler::proposal::{compute_proposal_root, Proposal};
use mcm_compiler::types::{decode_hash32, to_hex_prefixed, Hash32};
use mcm_compiler::utils::json::to_pretty_json;
use mcm_compiler::utils::logging::enable_debug;
use mcm_compiler::utils::settings::CompilerSettings;
use mcm_compiler::{log_debug, log_error, log_info, log_warn};
use serde_json::{json, Value};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

/// Compile MCM signer hierarchies and proposal roots
#[derive(Parser, Debug)]
#[command(name = "mcm", version)]
#[command(about = "Compile MCM signer hierarchies and proposal merkle roots")]
struct Cli {
    /// Print debug logs to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Compiler settings file (JSON); falls back to $MCM_CONFIG
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Compile a hierarchy description into multisig config arrays
    ParseHierarchy {
        /// Hierarchy DSL, e.g. "m:root:1o1(s:0x01)"
        dsl: String,

        /// Order signers by address as the on-chain config expects
        #[arg(long)]
        sorted: bool,
    },

    /// Compile a proposal file into its root, leaves and proofs
    ComputeRoot {
        /// Proposal JSON file
        file: PathBuf,
    },

    /// Fold a proof over a leaf and compare with a root
    VerifyProof {
        #[arg(long)]
        leaf: String,

        #[arg(long)]
        root: String,

        /// Proof element; repeat in order from the leaf upward
        #[arg(long = "proof", value_name = "HASH")]
        proof: Vec<String>,
    },
}

/// What a command prints and whether it counts as success
struct Outcome {
    output: Value,
    success: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    if cli.verbose {
        enable_debug();
    }

    match run(cli) {
        Ok(outcome) => {
            if let Err(err) = print_json(&outcome.output) {
                log_error!("mcm", "failed to render output", error = err);
                return ExitCode::FAILURE;
            }
            if outcome.success {
                ExitCode::SUCCESS
            } else {
                ExitCode::FAILURE
            }
        }
        Err(err) => {
            log_error!("mcm", err.message.clone(), code = format!("{:?}", err.code));
            let rendered = serde_json::to_value(&err)
                .map_err(McmError::from)
                .and_then(|value| print_json(&value));
            if rendered.is_err() {
                eprintln!("{}", err);
            }
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> McmResult<Outcome> {
    let settings = CompilerSettings::resolve(cli.config.as_deref())?;
    log_debug!(
        "mcm",
        "settings resolved",
        profile = format!("{:?}", settings.profile),
        max_groups = settings.max_num_groups,
        max_signers = settings.max_num_signers
    );

    match cli.command {
        Command::ParseHierarchy { dsl, sorted } => parse_hierarchy_cmd(&dsl, sorted, &settings),
        Command::ComputeRoot { file } => compute_root_cmd(&file),
        Command::VerifyProof { leaf, root, proof } => verify_proof_cmd(&leaf, &root, &proof),
    }
}

fn parse_hierarchy_cmd(dsl: &str, sorted: bool, settings: &CompilerSettings) -> McmResult<Outcome> {
    let parsed = parse_hierarchy(dsl)?;
    let parsed = if sorted { parsed.sorted_for_chain() } else { parsed };
    parsed.validate(settings)?;

    log_info!(
        "parse-hierarchy",
        "hierarchy compiled",
        groups = parsed.group_count(),
        signers = parsed.signers.len()
    );

    Ok(Outcome {
        output: hierarchy_json(&parsed, settings)?,
        success: true,
    })
}

/// Hierarchy as JSON, with signer addresses checksummed when configured
fn hierarchy_json(parsed: &ParsedHierarchy, settings: &CompilerSettings) -> McmResult<Value> {
    let mut value = serde_json::to_value(parsed)?;
    if settings.emit_checksum_addresses {
        if let Some(signers) = value.get_mut("signers").and_then(Value::as_array_mut) {
            for (entry, signer) in signers.iter_mut().zip(&parsed.signers) {
                entry["address"] = Value::String(signer.address.to_checksum());
            }
        }
    }
    Ok(value)
}

fn compute_root_cmd(file: &Path) -> McmResult<Outcome> {
    log_debug!("compute-root", "loading proposal", file = file.display());
    let proposal = Proposal::from_file(file)?;

    if proposal.operations().is_empty() {
        log_warn!("compute-root", "proposal has no operations; root is the metadata leaf");
    }

    let compiled = compute_proposal_root(&proposal)?;
    if !compiled.verify() {
        return Err(McmError::internal("compiled proofs do not verify against the root"));
    }

    let report = compiled.to_report(&proposal);
    log_info!(
        "compute-root",
        "proposal compiled",
        root = compiled.root_hex(),
        operations = compiled.operation_leaves.len(),
        pre_op_count = report.pre_op_count
    );

    Ok(Outcome {
        output: serde_json::to_value(&report)?,
        success: true,
    })
}

fn verify_proof_cmd(leaf: &str, root: &str, proof: &[String]) -> McmResult<Outcome> {
    let leaf = parse_hash("leaf", leaf)?;
    let root = parse_hash("root", root)?;
    let proof = proof
        .iter()
        .enumerate()
        .map(|(i, element)| parse_hash(&format!("proof[{}]", i), element))
        .collect::<McmResult<Vec<Hash32>>>()?;

    let computed = fold_proof(&leaf, &proof);
    let valid = computed == root;
    log_info!("verify-proof", "proof folded", valid = valid, computed_root = to_hex_prefixed(&computed));

    Ok(Outcome {
        output: json!({
            "valid": valid,
            "computedRoot": to_hex_prefixed(&computed),
            "expectedRoot": to_hex_prefixed(&root),
        }),
        success: valid,
    })
}

fn parse_hash(name: &str, value: &str) -> McmResult<Hash32> {
    decode_hash32(value).map_err(|e| {
        McmError::new(ErrorCode::HexError, format!("invalid {}", name)).with_details(e)
    })
}

fn print_json(value: &Value) -> McmResult<()> {
    println!("{}", to_pretty_json(value)?);
    Ok(())
}
