//! Unified error types for the MCM compiler
//!
//! Module errors (hierarchy, proposal, merkle) stay typed where they are
//! raised; everything that reaches the CLI is folded into `McmError` so it
//! can be reported as JSON with a stable error code.

use crate::hierarchy::HierarchyError;
use crate::merkle::MerkleError;
use crate::proposal::ProposalError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Main error type for all MCM operations
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct McmError {
    pub code: ErrorCode,
    pub message: String,
    pub details: Option<String>,
}

impl McmError {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            details: None,
        }
    }

    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    // Convenience constructors
    pub fn syntax(msg: impl Into<String>) -> Self {
        Self::new(ErrorCode::SyntaxError, msg)
    }

    pub fn validation(msg: impl Into<String>) -> Self {
        Self::new(ErrorCode::ValidationError, msg)
    }

    pub fn structural(msg: impl Into<String>) -> Self {
        Self::new(ErrorCode::StructuralError, msg)
    }

    pub fn config(msg: impl Into<String>) -> Self {
        Self::new(ErrorCode::ConfigError, msg)
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        Self::new(ErrorCode::Internal, msg)
    }
}

impl fmt::Display for McmError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{:?}] {}", self.code, self.message)?;
        if let Some(ref details) = self.details {
            write!(f, " ({})", details)?;
        }
        Ok(())
    }
}

impl std::error::Error for McmError {}

/// Error codes for categorization
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    // Input errors
    SyntaxError,
    ValidationError,
    CapacityExceeded,

    // Construction errors
    StructuralError,

    // Parse errors
    JsonError,
    HexError,

    // Environment
    ConfigError,
    IoError,

    // Internal
    Internal,
}

/// Result type alias for MCM operations
pub type McmResult<T> = Result<T, McmError>;

impl From<HierarchyError> for McmError {
    fn from(e: HierarchyError) -> Self {
        match e {
            HierarchyError::Syntax { .. } => McmError::syntax(e.to_string()),
            HierarchyError::CapacityExceeded { .. } => {
                McmError::new(ErrorCode::CapacityExceeded, e.to_string())
            }
            HierarchyError::Validation(ref issues) => {
                McmError::validation("hierarchy violates chain limits")
                    .with_details(issues.join("; "))
            }
        }
    }
}

impl From<ProposalError> for McmError {
    fn from(e: ProposalError) -> Self {
        match e {
            ProposalError::Validation(ref errors) => {
                McmError::validation(format!("{} proposal violation(s)", errors.len()))
                    .with_details(errors.to_string())
            }
            ProposalError::Json(msg) => McmError::new(ErrorCode::JsonError, msg),
            ProposalError::Io(msg) => McmError::new(ErrorCode::IoError, msg),
        }
    }
}

impl From<MerkleError> for McmError {
    fn from(e: MerkleError) -> Self {
        McmError::structural(e.to_string())
    }
}

impl From<serde_json::Error> for McmError {
    fn from(e: serde_json::Error) -> Self {
        McmError::new(ErrorCode::JsonError, e.to_string())
    }
}

impl From<hex::FromHexError> for McmError {
    fn from(e: hex::FromHexError) -> Self {
        McmError::new(ErrorCode::HexError, e.to_string())
    }
}

impl From<std::io::Error> for McmError {
    fn from(e: std::io::Error) -> Self {
        McmError::new(ErrorCode::IoError, e.to_string())
    }
}
