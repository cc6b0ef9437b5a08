//! MCM Hierarchy Compiler
//!
//! Turns a nested signer-hierarchy description into the flat, fixed-size
//! arrays the on-chain multisig config stores.
//!
//! # Example
//! ```rust,ignore
//! use mcm_compiler::hierarchy::parse_hierarchy;
//!
//! let parsed = parse_hierarchy("m:root:1o2(s:0xAA...,m:child:2o3(s:0xBB...,s:0xCC...,s:0xDD...))")?;
//! assert_eq!(parsed.group_parents[1], 0);
//! ```

pub mod types;
pub mod parser;
pub mod validation;

pub use types::*;
pub use parser::*;
