//! Utilities Module
//!
//! Common utilities used across the crate.

pub mod crypto;
pub mod json;
pub mod logging;
pub mod settings;

pub use crypto::*;
pub use json::*;
pub use settings::CompilerSettings;
