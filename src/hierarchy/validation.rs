//! Chain-limit checks for a parsed hierarchy
//!
//! Parsing only guarantees the DSL was well-formed. These checks mirror what
//! the on-chain config instruction rejects, so a bad hierarchy is caught
//! before a transaction is built. Every issue is collected.

use super::types::*;
use crate::utils::settings::CompilerSettings;
use std::collections::HashSet;

impl ParsedHierarchy {
    /// Check the hierarchy against chain limits, reporting every issue found
    pub fn validate(&self, settings: &CompilerSettings) -> Result<(), HierarchyError> {
        let mut issues = Vec::new();

        if self.groups.len() > settings.max_num_groups {
            issues.push(format!(
                "{} groups declared, limit is {}",
                self.groups.len(),
                settings.max_num_groups
            ));
        }

        if self.signers.len() > settings.max_num_signers {
            issues.push(format!(
                "{} signers declared, limit is {}",
                self.signers.len(),
                settings.max_num_signers
            ));
        }

        let mut seen = HashSet::new();
        for signer in &self.signers {
            if !seen.insert(signer.address) {
                issues.push(format!("signer {} appears more than once", signer.address));
            }
        }

        if settings.require_sorted_signers {
            for pair in self.signers.windows(2) {
                if pair[0].address >= pair[1].address {
                    issues.push(format!(
                        "signer {} is not above {} (signers must be strictly ascending)",
                        pair[1].address, pair[0].address
                    ));
                }
            }
        }

        for group in &self.groups {
            let children = self.members_of(group.group_id).count()
                + self.children_of(group.group_id).count();
            let required = group.quorum.required as usize;

            if group.is_root() && required == 0 {
                issues.push(format!("root group '{}' has quorum 0", group.name));
            } else if required == 0 && children > 0 {
                issues.push(format!(
                    "group {} ('{}') has quorum 0 but {} member(s)",
                    group.group_id, group.name, children
                ));
            } else if required > children {
                issues.push(format!(
                    "group {} ('{}') requires {} approvals but has only {} member(s)",
                    group.group_id, group.name, required, children
                ));
            }
        }

        if issues.is_empty() {
            Ok(())
        } else {
            Err(HierarchyError::Validation(issues))
        }
    }

    /// Copy of this hierarchy with signers in ascending address order.
    ///
    /// Groups are untouched; `signer_groups` follows the new signer order.
    pub fn sorted_for_chain(&self) -> ParsedHierarchy {
        let mut sorted = self.clone();
        sorted.signers.sort_by(|a, b| a.address.cmp(&b.address));
        sorted.signer_groups = sorted.signers.iter().map(|s| s.group_id).collect();
        sorted
    }
}
