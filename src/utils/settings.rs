//! Compiler Settings
//!
//! Chain limits and output options, with presets and an optional JSON
//! file override:
//! - `solana()` matches the deployed program's limits (default)
//! - `strict()` additionally requires signers to be given in ascending order
//!
//! A settings file only needs the fields it changes; the rest default.

use crate::error::{McmError, McmResult};
use crate::hierarchy::{MAX_NUM_GROUPS, MAX_NUM_SIGNERS};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Environment variable consulted when no `--config` flag is given
pub const CONFIG_ENV_VAR: &str = "MCM_CONFIG";

/// Settings preset
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SettingsProfile {
    Solana,
    Strict,
    Custom,
}

/// Compiler settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CompilerSettings {
    pub profile: SettingsProfile,
    /// Groups a hierarchy may declare (never above the on-chain array width)
    pub max_num_groups: usize,
    /// Signers a hierarchy may declare
    pub max_num_signers: usize,
    /// Reject hierarchies whose signers are not strictly ascending
    pub require_sorted_signers: bool,
    /// Print signer addresses in EIP-55 form
    pub emit_checksum_addresses: bool,
}

/// On-disk settings: only the fields a file sets
#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct SettingsFile {
    profile: Option<SettingsProfile>,
    max_num_groups: Option<usize>,
    max_num_signers: Option<usize>,
    require_sorted_signers: Option<bool>,
    emit_checksum_addresses: Option<bool>,
}

impl SettingsFile {
    fn apply(self) -> CompilerSettings {
        let base = CompilerSettings::preset(self.profile.unwrap_or(SettingsProfile::Solana));
        CompilerSettings {
            profile: base.profile,
            max_num_groups: self.max_num_groups.unwrap_or(base.max_num_groups),
            max_num_signers: self.max_num_signers.unwrap_or(base.max_num_signers),
            require_sorted_signers: self
                .require_sorted_signers
                .unwrap_or(base.require_sorted_signers),
            emit_checksum_addresses: self
                .emit_checksum_addresses
                .unwrap_or(base.emit_checksum_addresses),
        }
    }
}

impl Default for CompilerSettings {
    fn default() -> Self {
        Self::solana()
    }
}

impl CompilerSettings {
    /// Limits of the deployed Solana program
    pub fn solana() -> Self {
        Self {
            profile: SettingsProfile::Solana,
            max_num_groups: MAX_NUM_GROUPS,
            max_num_signers: MAX_NUM_SIGNERS,
            require_sorted_signers: false,
            emit_checksum_addresses: true,
        }
    }

    /// Solana limits plus signer ordering enforced at parse time
    pub fn strict() -> Self {
        Self {
            profile: SettingsProfile::Strict,
            require_sorted_signers: true,
            ..Self::solana()
        }
    }

    /// Preset for a profile; `Custom` starts from the Solana limits
    pub fn preset(profile: SettingsProfile) -> Self {
        match profile {
            SettingsProfile::Solana => Self::solana(),
            SettingsProfile::Strict => Self::strict(),
            SettingsProfile::Custom => Self {
                profile: SettingsProfile::Custom,
                ..Self::solana()
            },
        }
    }

    /// Parse settings from JSON, then validate them.
    ///
    /// The file's `profile` picks the preset; any other field present
    /// overrides that preset's value.
    pub fn from_json(json: &str) -> McmResult<Self> {
        let file: SettingsFile = serde_json::from_str(json)
            .map_err(|e| McmError::config(format!("invalid settings: {}", e)))?;
        let settings = file.apply();
        settings.validate()?;
        Ok(settings)
    }

    /// Load settings from a JSON file
    pub fn load(path: &Path) -> McmResult<Self> {
        let json = std::fs::read_to_string(path).map_err(|e| {
            McmError::config(format!("cannot read settings file {}", path.display()))
                .with_details(e.to_string())
        })?;
        Self::from_json(&json)
    }

    /// Resolve settings from an explicit path, then `MCM_CONFIG`, then defaults
    pub fn resolve(explicit: Option<&Path>) -> McmResult<Self> {
        if let Some(path) = explicit {
            return Self::load(path);
        }
        match std::env::var(CONFIG_ENV_VAR) {
            Ok(path) if !path.trim().is_empty() => Self::load(Path::new(path.trim())),
            _ => Ok(Self::default()),
        }
    }

    /// Validate settings
    pub fn validate(&self) -> McmResult<()> {
        if self.max_num_groups == 0 || self.max_num_groups > MAX_NUM_GROUPS {
            return Err(McmError::config(format!(
                "maxNumGroups must be between 1 and {}",
                MAX_NUM_GROUPS
            )));
        }
        if self.max_num_signers == 0 {
            return Err(McmError::config("maxNumSigners must be at least 1"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;

    #[test]
    fn test_presets() {
        let solana = CompilerSettings::solana();
        assert_eq!(solana.max_num_groups, 32);
        assert_eq!(solana.max_num_signers, 180);
        assert!(!solana.require_sorted_signers);

        let strict = CompilerSettings::strict();
        assert!(strict.require_sorted_signers);
        assert_eq!(strict.max_num_signers, solana.max_num_signers);
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let settings = CompilerSettings::from_json(r#"{"maxNumSigners": 12}"#).unwrap();
        assert_eq!(settings.max_num_signers, 12);
        assert_eq!(settings.max_num_groups, 32);
        assert_eq!(settings.profile, SettingsProfile::Solana);
    }

    #[test]
    fn test_profile_field_is_respected() {
        let settings =
            CompilerSettings::from_json(r#"{"profile": "custom", "requireSortedSigners": true}"#).unwrap();
        assert_eq!(settings.profile, SettingsProfile::Custom);
        assert!(settings.require_sorted_signers);
    }

    #[test]
    fn test_strict_profile_file_applies_preset() {
        let settings = CompilerSettings::from_json(r#"{"profile": "strict"}"#).unwrap();
        assert_eq!(settings, CompilerSettings::strict());
        assert!(settings.require_sorted_signers);

        let relaxed =
            CompilerSettings::from_json(r#"{"profile": "strict", "requireSortedSigners": false}"#)
                .unwrap();
        assert_eq!(relaxed.profile, SettingsProfile::Strict);
        assert!(!relaxed.require_sorted_signers);
    }

    #[test]
    fn test_rejects_groups_beyond_array_width() {
        let err = CompilerSettings::from_json(r#"{"maxNumGroups": 33}"#).unwrap_err();
        assert_eq!(err.code, ErrorCode::ConfigError);

        assert!(CompilerSettings::from_json(r#"{"maxNumSigners": 0}"#).is_err());
        assert!(CompilerSettings::from_json("not json").is_err());
    }

    #[test]
    fn test_load_missing_file() {
        let err = CompilerSettings::load(Path::new("/nonexistent/mcm.json")).unwrap_err();
        assert_eq!(err.code, ErrorCode::ConfigError);
    }
}
