//! Script/log correlation for a selected node and transaction

use std::fmt;
use tracing::{debug, trace};

use super::model::{LogEntry, ScriptMap};

/// Backend noise marker; entries containing it are never shown.
pub const UNKNOWN_OUTCOME: &str = "Unknown outcome";

/// Identifies the script whose logs belong to a node.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ScriptRef {
    pub id: String,
    pub name: String,
}

/// Level filter understood by `/api/logs/{id}` and `/api/logs/watch`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum LogFilter {
    All,
    Warn,
    #[default]
    Error,
    Debug,
}

impl LogFilter {
    /// Order shown in the filter picker.
    pub const CHOICES: &'static [LogFilter] =
        &[LogFilter::Warn, LogFilter::All, LogFilter::Error, LogFilter::Debug];

    pub fn as_str(self) -> &'static str {
        match self {
            LogFilter::All => "All",
            LogFilter::Warn => "Warn",
            LogFilter::Error => "Error",
            LogFilter::Debug => "Debug",
        }
    }
}

impl fmt::Display for LogFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for LogFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "all" => Ok(LogFilter::All),
            "warn" => Ok(LogFilter::Warn),
            "error" => Ok(LogFilter::Error),
            "debug" => Ok(LogFilter::Debug),
            other => Err(format!("unknown log filter '{other}'")),
        }
    }
}

/// First `type == "Script"` descriptor of a node, if it has one.
///
/// A node without scripts, or whose script descriptor lacks `_id` or `name`,
/// yields `None`: there is nothing to correlate, so no fetch happens.
pub fn select_script(scripts: &ScriptMap, node_id: &str) -> Option<ScriptRef> {
    let Some(descriptors) = scripts.get(node_id) else {
        trace!(node_id, "Node has no scripts entry");
        return None;
    };

    let script = descriptors.iter().find(|d| d.is_script())?;
    match (&script.id, &script.name) {
        (Some(id), Some(name)) => Some(ScriptRef {
            id: id.clone(),
            name: name.clone(),
        }),
        _ => {
            debug!(node_id, "Script descriptor without _id or name");
            None
        }
    }
}

pub fn is_unknown_outcome(entry: &LogEntry) -> bool {
    serde_json::to_string(entry)
        .map(|s| s.contains(UNKNOWN_OUTCOME))
        .unwrap_or(false)
}

/// Drop "Unknown outcome" entries, keeping backend order.
pub fn filter_unknown_outcomes(entries: Vec<LogEntry>) -> Vec<LogEntry> {
    let before = entries.len();
    let kept: Vec<LogEntry> = entries.into_iter().filter(|e| !is_unknown_outcome(e)).collect();
    if kept.len() != before {
        debug!(dropped = before - kept.len(), kept = kept.len(), "Filtered unknown outcomes");
    }
    kept
}

/// Follows a polled log window and reports only entries not seen before.
///
/// The backend returns its whole current window on every poll. Entries are
/// matched by content: the longest tail of the previous window that reappears
/// at the head of the new one is treated as already printed. A window with no
/// overlap (new transaction, or everything rolled out) is new in full.
#[derive(Debug, Default)]
pub struct LogTail {
    last: Vec<LogEntry>,
}

impl LogTail {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the window, returning the entries that were not in the previous one.
    pub fn advance(&mut self, window: Vec<LogEntry>) -> &[LogEntry] {
        let max = self.last.len().min(window.len());
        let overlap = (0..=max)
            .rev()
            .find(|&k| self.last[self.last.len() - k..] == window[..k])
            .unwrap_or(0);
        trace!(window = window.len(), overlap, "Log window advanced");
        self.last = window;
        &self.last[overlap..]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::model::ScriptDescriptor;

    fn descriptor(kind: &str, id: Option<&str>, name: Option<&str>) -> ScriptDescriptor {
        ScriptDescriptor {
            id: id.map(str::to_string),
            name: name.map(str::to_string),
            kind: Some(kind.to_string()),
            ..Default::default()
        }
    }

    fn entry(json: &str) -> LogEntry {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_select_script_entry() {
        let mut scripts = ScriptMap::new();
        scripts.insert(
            "n1".to_string(),
            vec![
                descriptor("Other", Some("cfg"), Some("config")),
                descriptor("Script", Some("s1"), Some("foo")),
                descriptor("Script", Some("s2"), Some("bar")),
            ],
        );

        let selected = select_script(&scripts, "n1").unwrap();
        assert_eq!(selected.id, "s1");
        assert_eq!(selected.name, "foo");
    }

    #[test]
    fn test_select_script_absent() {
        let mut scripts = ScriptMap::new();
        scripts.insert("n1".to_string(), vec![descriptor("Other", Some("cfg"), None)]);

        assert!(select_script(&scripts, "n1").is_none());
        assert!(select_script(&scripts, "missing").is_none());
    }

    #[test]
    fn test_select_script_incomplete_descriptor() {
        let mut scripts = ScriptMap::new();
        scripts.insert("n1".to_string(), vec![descriptor("Script", Some("s1"), None)]);
        assert!(select_script(&scripts, "n1").is_none());
    }

    #[test]
    fn test_filter_unknown_outcomes() {
        let entries = vec![
            entry(r#"{"payload": {"level": "INFO", "message": "first"}}"#),
            entry(r#"{"payload": {"level": "DEBUG", "message": "Unknown outcome for node"}}"#),
            entry(
                r#"{"payload": {"level": "ERROR", "message": "third",
                    "entries": [{"info": {"nodeOutcome": "Unknown outcome"}}]}}"#,
            ),
            entry(r#"{"payload": {"level": "ERROR", "message": "fourth"}}"#),
        ];

        let kept = filter_unknown_outcomes(entries.clone());
        assert_eq!(kept, vec![entries[0].clone(), entries[3].clone()]);
    }

    #[test]
    fn test_log_filter_roundtrip_names() {
        assert_eq!(LogFilter::Warn.to_string(), "Warn");
        assert_eq!("error".parse::<LogFilter>().unwrap(), LogFilter::Error);
        assert!("verbose".parse::<LogFilter>().is_err());
        assert_eq!(LogFilter::default(), LogFilter::Error);
    }

    fn lines(tail: &mut LogTail, messages: &[&str]) -> Vec<String> {
        let window = messages
            .iter()
            .map(|m| entry(&format!(r#"{{"payload": {{"level": "ERROR", "message": "{m}"}}}}"#)))
            .collect();
        tail.advance(window)
            .iter()
            .map(|e| e.payload.message.clone().unwrap_or_default())
            .collect()
    }

    #[test]
    fn test_log_tail_window_replaced() {
        let mut tail = LogTail::new();
        assert_eq!(lines(&mut tail, &["a1", "a2", "a3"]), vec!["a1", "a2", "a3"]);
        assert_eq!(lines(&mut tail, &["b1"]), vec!["b1"]);
        assert_eq!(lines(&mut tail, &["b1", "b2"]), vec!["b2"]);
    }

    #[test]
    fn test_log_tail_sliding_window() {
        let mut tail = LogTail::new();
        lines(&mut tail, &["a", "b", "c"]);
        assert_eq!(lines(&mut tail, &["b", "c", "d"]), vec!["d"]);
        assert!(lines(&mut tail, &["b", "c", "d"]).is_empty());
        assert!(lines(&mut tail, &[]).is_empty());
        assert_eq!(lines(&mut tail, &["d"]), vec!["d"]);
    }

    #[test]
    fn test_log_tail_repeated_entry() {
        let mut tail = LogTail::new();
        lines(&mut tail, &["retry"]);
        assert_eq!(lines(&mut tail, &["retry", "retry"]), vec!["retry"]);
    }
}
