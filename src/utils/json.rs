//! JSON Parsing Utilities
//!
//! Proposal files come from JavaScript tooling, where 64-bit integers are
//! often written as strings. These helpers accept both spellings.

use crate::error::{McmError, McmResult};
use serde::de::DeserializeOwned;
use serde::Serialize;

/// Safely parse JSON string into a type
pub fn parse_json<T: DeserializeOwned>(json_str: &str) -> McmResult<T> {
    serde_json::from_str(json_str)
        .map_err(|e| McmError::from(e).with_details("JSON parse error"))
}

/// Pretty-print a value for CLI output
pub fn to_pretty_json<T: Serialize>(value: &T) -> McmResult<String> {
    Ok(serde_json::to_string_pretty(value)?)
}

/// Read a u64 from a JSON number, decimal string or 0x hex string
pub fn value_as_u64(value: &serde_json::Value) -> Option<u64> {
    if let Some(n) = value.as_u64() {
        Some(n)
    } else if let Some(s) = value.as_str() {
        let s = s.trim();
        if s.starts_with("0x") || s.starts_with("0X") {
            u64::from_str_radix(&s[2..], 16).ok()
        } else {
            s.parse().ok()
        }
    } else {
        None
    }
}

/// Read a u32 from the same spellings as [`value_as_u64`]
pub fn value_as_u32(value: &serde_json::Value) -> Option<u32> {
    value_as_u64(value).and_then(|n| u32::try_from(n).ok())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_value_as_u64() {
        assert_eq!(value_as_u64(&json!(7)), Some(7));
        assert_eq!(value_as_u64(&json!("18446744073709551615")), Some(u64::MAX));
        assert_eq!(value_as_u64(&json!("0x10")), Some(16));
        assert_eq!(value_as_u64(&json!(-1)), None);
        assert_eq!(value_as_u64(&json!(1.5)), None);
        assert_eq!(value_as_u64(&json!("ten")), None);
        assert_eq!(value_as_u64(&json!(null)), None);
    }

    #[test]
    fn test_value_as_u32_range() {
        assert_eq!(value_as_u32(&json!(4_294_967_295u64)), Some(u32::MAX));
        assert_eq!(value_as_u32(&json!(4_294_967_296u64)), None);
    }

    #[test]
    fn test_parse_json_error() {
        let err = parse_json::<serde_json::Value>("{").unwrap_err();
        assert_eq!(err.code, crate::error::ErrorCode::JsonError);
    }
}
