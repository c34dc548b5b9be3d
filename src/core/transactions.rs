//! Transaction history: raw request records -> logical transaction groups

use std::collections::HashSet;
use tracing::debug;

use super::model::TransactionRecord;

/// Marker after which a transaction id carries a per-request suffix.
const REQUEST_SUFFIX: &str = "-request";

/// Collapse a request-level id onto its transaction group.
///
/// Cuts at the first `-request`, then drops every `/` immediately followed by
/// one ASCII digit (together with that digit).
pub fn normalize_transaction_id(raw: &str) -> String {
    let head = raw.split(REQUEST_SUFFIX).next().unwrap_or(raw);

    let mut out = String::with_capacity(head.len());
    let mut chars = head.chars().peekable();
    while let Some(c) = chars.next() {
        if c == '/' && chars.peek().is_some_and(|n| n.is_ascii_digit()) {
            chars.next();
            continue;
        }
        out.push(c);
    }
    out
}

/// Unique normalized ids, ordered by the earliest timestamp seen for each.
///
/// Timestamps are ISO-8601 strings and compare lexicographically.
pub fn resolve_transactions(records: &[TransactionRecord]) -> Vec<String> {
    let mut sorted: Vec<&TransactionRecord> = records.iter().collect();
    sorted.sort_by(|a, b| a.timestamp.cmp(&b.timestamp));

    let mut seen = HashSet::new();
    let groups: Vec<String> = sorted
        .into_iter()
        .map(|r| normalize_transaction_id(&r.transaction_id))
        .filter(|id| seen.insert(id.clone()))
        .collect();

    debug!(records = records.len(), groups = groups.len(), "Transactions resolved");
    groups
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(id: &str, ts: &str) -> TransactionRecord {
        TransactionRecord {
            transaction_id: id.to_string(),
            timestamp: ts.to_string(),
        }
    }

    #[test]
    fn test_normalize() {
        assert_eq!(normalize_transaction_id("abc/1-request5"), "abc");
        assert_eq!(normalize_transaction_id("abc/1"), "abc");
        assert_eq!(normalize_transaction_id("abc/1/2/3"), "abc");
        assert_eq!(normalize_transaction_id("abc-request/1"), "abc");
        assert_eq!(normalize_transaction_id("abc/x"), "abc/x");
        assert_eq!(normalize_transaction_id("abc/12"), "abc2");
        assert_eq!(normalize_transaction_id("plain"), "plain");
        assert_eq!(normalize_transaction_id(""), "");
    }

    #[test]
    fn test_collapse_and_order() {
        let records = vec![record("abc/1-request5", "t1"), record("abc/1", "t0")];
        assert_eq!(resolve_transactions(&records), vec!["abc".to_string()]);
    }

    #[test]
    fn test_groups_ordered_by_first_occurrence() {
        let records = vec![
            record("late/0", "2024-01-03T00:00:00Z"),
            record("early-request2", "2024-01-01T00:00:00Z"),
            record("mid/4", "2024-01-02T00:00:00Z"),
            record("early/1", "2024-01-04T00:00:00Z"),
        ];
        assert_eq!(
            resolve_transactions(&records),
            vec!["early".to_string(), "mid".to_string(), "late".to_string()]
        );
    }

    #[test]
    fn test_empty_history() {
        assert!(resolve_transactions(&[]).is_empty());
    }
}
