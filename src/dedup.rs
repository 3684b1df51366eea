//! Duplicate detection across token listings
//!
//! Copycat launches reuse the name and ticker of an existing token under a
//! new address. Records are grouped by a normalized `name-symbol` key and
//! the earliest-created member of each group is marked as the original.
use std::collections::HashMap;

use serde::Serialize;

use crate::logger::{self, LogTag};
use crate::tokens::TokenRecord;

/// Placeholder rendered for a missing name or symbol
const MISSING_PART: &str = "undefined";

/// Duplicate annotation for a single record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DuplicateInfo {
    pub has_duplicates: bool,
    pub is_original: bool,
    /// Number of other records sharing the grouping key
    pub duplicate_count: usize,
}

impl DuplicateInfo {
    pub fn unique() -> Self {
        Self {
            has_duplicates: false,
            is_original: true,
            duplicate_count: 0,
        }
    }
}

/// Grouping key: lowercase name with all whitespace removed, a dash, then
/// the lowercase symbol. Address and chain are not part of the key.
pub fn grouping_key(token: &TokenRecord) -> String {
    let name = token
        .name
        .as_deref()
        .map(|name| {
            name.chars()
                .filter(|c| !c.is_whitespace())
                .collect::<String>()
                .to_lowercase()
        })
        .unwrap_or_else(|| MISSING_PART.to_string());

    let symbol = token
        .symbol
        .as_deref()
        .map(str::to_lowercase)
        .unwrap_or_else(|| MISSING_PART.to_string());

    format!("{}-{}", name, symbol)
}

/// Group record indices by grouping key, preserving input order per group
pub fn group_similar_tokens(tokens: &[TokenRecord]) -> HashMap<String, Vec<usize>> {
    let mut groups: HashMap<String, Vec<usize>> = HashMap::new();
    for (index, token) in tokens.iter().enumerate() {
        groups.entry(grouping_key(token)).or_default().push(index);
    }
    groups
}

/// Resolve duplicate annotations for every record, in input order
///
/// The original of a group is the member with the earliest `created_at`.
/// Undated members rank after every dated one and ties keep input order,
/// so each group has exactly one original.
pub fn annotate_duplicates(tokens: &[TokenRecord]) -> Vec<DuplicateInfo> {
    let mut annotations = vec![DuplicateInfo::unique(); tokens.len()];

    for (key, members) in group_similar_tokens(tokens) {
        if members.len() < 2 {
            continue;
        }

        // min_by_key returns the first minimum, so ties resolve to input order
        let original = members
            .iter()
            .copied()
            .min_by_key(|&index| match tokens[index].created_at {
                Some(created) => (0u8, created.timestamp_millis()),
                None => (1u8, 0),
            })
            .unwrap_or(members[0]);

        let duplicate_count = members.len() - 1;
        for &index in &members {
            annotations[index] = DuplicateInfo {
                has_duplicates: true,
                is_original: index == original,
                duplicate_count,
            };
        }

        logger::verbose(
            LogTag::Dedup,
            &format!(
                "Group '{}' has {} members, original is {}",
                key,
                members.len(),
                tokens[original].address
            ),
        );
    }

    annotations
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, Duration, Utc};

    fn t0() -> DateTime<Utc> {
        DateTime::parse_from_rfc3339("2024-03-01T12:00:00Z")
            .unwrap()
            .with_timezone(&Utc)
    }

    #[test]
    fn test_grouping_key_normalization() {
        let token = TokenRecord::new("a").with_identity("Moon  Dog\t", "MDOG");
        assert_eq!(grouping_key(&token), "moondog-mdog");

        let unnamed = TokenRecord::new("b");
        assert_eq!(grouping_key(&unnamed), "undefined-undefined");
    }

    #[test]
    fn test_case_insensitive_pair_is_one_group() {
        let tokens = vec![
            TokenRecord::new("addr1")
                .with_identity("Foo", "FOO")
                .with_created_at(t0()),
            TokenRecord::new("addr2")
                .with_identity("foo", "foo")
                .with_created_at(t0() + Duration::milliseconds(1000))
                .with_metrics(500.0, 0.0, 0.0),
        ];

        let groups = group_similar_tokens(&tokens);
        assert_eq!(groups.len(), 1);
        assert_eq!(groups["foo-foo"], vec![0, 1]);

        let annotations = annotate_duplicates(&tokens);
        assert!(annotations[0].is_original);
        assert!(!annotations[1].is_original);
        assert!(annotations.iter().all(|a| a.has_duplicates));
        assert!(annotations.iter().all(|a| a.duplicate_count == 1));
    }

    #[test]
    fn test_earliest_created_wins_regardless_of_position() {
        let tokens = vec![
            TokenRecord::new("late")
                .with_identity("Cat", "CAT")
                .with_created_at(t0() + Duration::days(2)),
            TokenRecord::new("undated").with_identity("Cat", "CAT"),
            TokenRecord::new("early")
                .with_identity("Cat", "CAT")
                .with_created_at(t0()),
        ];

        let annotations = annotate_duplicates(&tokens);
        let originals: Vec<usize> = annotations
            .iter()
            .enumerate()
            .filter(|(_, a)| a.is_original)
            .map(|(i, _)| i)
            .collect();
        assert_eq!(originals, vec![2]);
        assert!(annotations.iter().all(|a| a.duplicate_count == 2));
    }

    #[test]
    fn test_ties_and_undated_groups_resolve_to_first() {
        let tied = vec![
            TokenRecord::new("x").with_identity("Tie", "T").with_created_at(t0()),
            TokenRecord::new("y").with_identity("Tie", "T").with_created_at(t0()),
        ];
        let annotations = annotate_duplicates(&tied);
        assert!(annotations[0].is_original);
        assert!(!annotations[1].is_original);

        let undated = vec![
            TokenRecord::new("x").with_identity("Nod", "N"),
            TokenRecord::new("y").with_identity("Nod", "N"),
        ];
        let annotations = annotate_duplicates(&undated);
        assert!(annotations[0].is_original);
        assert!(!annotations[1].is_original);
    }

    #[test]
    fn test_singletons_are_unique_originals() {
        let tokens = vec![
            TokenRecord::new("a").with_identity("Alpha", "A"),
            TokenRecord::new("b").with_identity("Beta", "B"),
        ];
        let annotations = annotate_duplicates(&tokens);
        assert_eq!(annotations, vec![DuplicateInfo::unique(); 2]);
        assert!(annotate_duplicates(&[]).is_empty());
    }
}
