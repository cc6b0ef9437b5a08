//! Hierarchy DSL compiler
//!
//! ```text
//! node     := multisig | signer
//! multisig := "m:" name ":" required "o" total [ "(" node ("," node)* ")" ]
//! signer   := "s:" address
//! ```
//!
//! Groups are numbered in depth-first pre-order starting at the root (0).
//! A signer never gets a group of its own; it joins its enclosing multisig.

use super::types::*;
use crate::types::EvmAddress;

const MULTISIG_PREFIX: &str = "m:";
const SIGNER_PREFIX: &str = "s:";

/// Compile a hierarchy DSL string into its flat on-chain form.
///
/// Fails at the first structural or semantic violation; no partial
/// hierarchy is ever returned.
pub fn parse_hierarchy(text: &str) -> Result<ParsedHierarchy, HierarchyError> {
    check_balanced(text)?;

    let (root, offset) = trim_segment(text, 0);
    if !root.starts_with(MULTISIG_PREFIX) {
        return Err(HierarchyError::syntax(
            offset,
            "hierarchy must start with a multisig node (m:)",
        ));
    }

    let mut compiler = HierarchyCompiler {
        hierarchy: ParsedHierarchy::empty(),
        next_group_id: 0,
    };
    compiler.node(root, offset, None)?;
    Ok(compiler.hierarchy)
}

/// Recursive-descent state. `next_group_id` is the single pre-order counter.
struct HierarchyCompiler {
    hierarchy: ParsedHierarchy,
    next_group_id: usize,
}

impl HierarchyCompiler {
    fn node(&mut self, segment: &str, offset: usize, parent: Option<u8>) -> Result<(), HierarchyError> {
        let (segment, offset) = trim_segment(segment, offset);

        if segment.is_empty() {
            Err(HierarchyError::syntax(offset, "empty node"))
        } else if segment.starts_with(MULTISIG_PREFIX) {
            self.multisig(segment, offset, parent)
        } else if segment.starts_with(SIGNER_PREFIX) {
            self.signer(segment, offset, parent)
        } else {
            Err(HierarchyError::syntax(
                offset,
                format!("expected 'm:' or 's:' node, found '{}'", preview(segment)),
            ))
        }
    }

    fn multisig(&mut self, segment: &str, offset: usize, parent: Option<u8>) -> Result<(), HierarchyError> {
        let (header, members) = match segment.find('(') {
            Some(open) => {
                let close = matching_paren(segment, open).ok_or_else(|| {
                    HierarchyError::syntax(offset + open, "unclosed '('")
                })?;
                if close != segment.len() - 1 {
                    return Err(HierarchyError::syntax(
                        offset + close + 1,
                        "unexpected input after ')'",
                    ));
                }
                (&segment[..open], Some((&segment[open + 1..close], offset + open + 1)))
            }
            None => (segment, None),
        };

        let (name, quorum) = parse_header(header, offset)?;

        let group_id = self.allocate_group_id(offset)?;
        let parent_group_id = parent.unwrap_or(group_id);

        self.hierarchy.group_quorums[group_id as usize] = quorum.required;
        self.hierarchy.group_parents[group_id as usize] = parent_group_id;
        self.hierarchy.groups.push(Group {
            group_id,
            name,
            quorum,
            parent_group_id,
        });

        if let Some((body, body_offset)) = members {
            if body.trim().is_empty() {
                return Err(HierarchyError::syntax(body_offset, "empty member list"));
            }
            for (child, child_offset) in split_top_level(body, body_offset) {
                self.node(child, child_offset, Some(group_id))?;
            }
        }

        Ok(())
    }

    fn signer(&mut self, segment: &str, offset: usize, parent: Option<u8>) -> Result<(), HierarchyError> {
        let token = segment[SIGNER_PREFIX.len()..].trim();
        let address = EvmAddress::parse(token).map_err(|e| {
            HierarchyError::syntax(
                offset + SIGNER_PREFIX.len(),
                format!("invalid signer address '{}': {}", preview(token), e),
            )
        })?;

        let group_id = parent.unwrap_or(ROOT_GROUP_ID);
        self.hierarchy.signers.push(Signer { address, group_id });
        self.hierarchy.signer_groups.push(group_id);
        Ok(())
    }

    fn allocate_group_id(&mut self, offset: usize) -> Result<u8, HierarchyError> {
        if self.next_group_id >= MAX_NUM_GROUPS {
            return Err(HierarchyError::CapacityExceeded {
                capacity: MAX_NUM_GROUPS,
                offset,
            });
        }
        let id = self.next_group_id as u8;
        self.next_group_id += 1;
        Ok(id)
    }
}

/// Parse `m:name:RoT` into the group name and its quorum
fn parse_header(header: &str, offset: usize) -> Result<(String, Quorum), HierarchyError> {
    let body = header[MULTISIG_PREFIX.len()..].trim_end();
    let body_offset = offset + MULTISIG_PREFIX.len();

    let (name, quorum_token) = body.split_once(':').ok_or_else(|| {
        HierarchyError::syntax(body_offset, "expected 'name:requiredOtotal' after 'm:'")
    })?;

    if name.is_empty() || name.chars().any(|c| c.is_whitespace() || c == ',' || c == ')') {
        return Err(HierarchyError::syntax(
            body_offset,
            format!("invalid group name '{}'", name),
        ));
    }

    let quorum_offset = body_offset + name.len() + 1;
    let quorum = parse_quorum(quorum_token, quorum_offset)?;
    Ok((name.to_string(), quorum))
}

/// Parse `RoT`, e.g. `2o3`
fn parse_quorum(token: &str, offset: usize) -> Result<Quorum, HierarchyError> {
    let malformed = || {
        HierarchyError::syntax(
            offset,
            format!("malformed quorum '{}', expected <required>o<total>", token),
        )
    };

    let (required, total) = token.split_once('o').ok_or_else(malformed)?;
    let is_number = |s: &str| !s.is_empty() && s.chars().all(|c| c.is_ascii_digit());
    if !is_number(required) || !is_number(total) {
        return Err(malformed());
    }

    let out_of_range = |_: std::num::ParseIntError| {
        HierarchyError::syntax(offset, format!("quorum '{}' exceeds 255", token))
    };
    let required = required.parse::<u8>().map_err(out_of_range)?;
    let total = total.parse::<u8>().map_err(out_of_range)?;

    if required > total {
        return Err(HierarchyError::syntax(
            offset,
            format!("quorum requires {} of only {} members", required, total),
        ));
    }

    Ok(Quorum { required, total })
}

/// Reject unbalanced parentheses before any node is compiled
fn check_balanced(text: &str) -> Result<(), HierarchyError> {
    let mut open = Vec::new();
    for (i, c) in text.char_indices() {
        match c {
            '(' => open.push(i),
            ')' => {
                if open.pop().is_none() {
                    return Err(HierarchyError::syntax(i, "unmatched ')'"));
                }
            }
            _ => {}
        }
    }
    match open.pop() {
        Some(i) => Err(HierarchyError::syntax(i, "unclosed '('")),
        None => Ok(()),
    }
}

/// Index of the ')' closing the '(' at `open`
fn matching_paren(text: &str, open: usize) -> Option<usize> {
    let mut depth = 0usize;
    for (i, c) in text[open..].char_indices() {
        match c {
            '(' => depth += 1,
            ')' => {
                depth -= 1;
                if depth == 0 {
                    return Some(open + i);
                }
            }
            _ => {}
        }
    }
    None
}

/// Split on commas at parenthesis depth zero, keeping absolute offsets
fn split_top_level(text: &str, base: usize) -> Vec<(&str, usize)> {
    let mut parts = Vec::new();
    let mut depth = 0usize;
    let mut start = 0;

    for (i, c) in text.char_indices() {
        match c {
            '(' => depth += 1,
            ')' => depth = depth.saturating_sub(1),
            ',' if depth == 0 => {
                parts.push((&text[start..i], base + start));
                start = i + 1;
            }
            _ => {}
        }
    }
    parts.push((&text[start..], base + start));
    parts
}

fn trim_segment(segment: &str, offset: usize) -> (&str, usize) {
    let leading = segment.len() - segment.trim_start().len();
    (segment.trim(), offset + leading)
}

fn preview(token: &str) -> String {
    if token.chars().count() > 24 {
        format!("{}...", token.chars().take(24).collect::<String>())
    } else {
        token.to_string()
    }
}

#[cfg(test)]
mod parser_tests {
    use super::*;

    #[test]
    fn test_split_top_level_respects_nesting() {
        let parts = split_top_level("s:0x1,m:a:1o2(s:0x2,s:0x3),s:0x4", 10);
        let texts: Vec<&str> = parts.iter().map(|(t, _)| *t).collect();
        assert_eq!(texts, vec!["s:0x1", "m:a:1o2(s:0x2,s:0x3)", "s:0x4"]);
        assert_eq!(parts[1].1, 16);
    }

    #[test]
    fn test_parse_quorum() {
        assert_eq!(parse_quorum("2o3", 0).unwrap(), Quorum { required: 2, total: 3 });
        assert!(parse_quorum("2x3", 0).is_err());
        assert!(parse_quorum("o3", 0).is_err());
        assert!(parse_quorum("-1o3", 0).is_err());
        assert!(parse_quorum("4o3", 0).is_err());
        assert!(parse_quorum("1o256", 0).is_err());
    }

    #[test]
    fn test_check_balanced_reports_offsets() {
        assert_eq!(
            check_balanced("m:a:1o1(s:0x1"),
            Err(HierarchyError::syntax(7, "unclosed '('"))
        );
        assert_eq!(
            check_balanced("m:a:1o1)"),
            Err(HierarchyError::syntax(7, "unmatched ')'"))
        );
        assert!(check_balanced("m:a:1o1((()))").is_ok());
    }

    #[test]
    fn test_matching_paren() {
        let text = "m:a:1o2(m:b:1o1(s:0x1),s:0x2)";
        assert_eq!(matching_paren(text, 7), Some(text.len() - 1));
        assert_eq!(matching_paren(text, 15), Some(21));
    }
}
