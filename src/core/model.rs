//! Wire shapes returned by the journey backend
//!
//! Fields the dashboard never interprets are kept in `extra` maps so that a
//! node or log entry can be re-serialized without losing anything.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::HashMap;

/// Node/edge graph of one journey, optionally coloured by a transaction.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct JourneyGraph {
    pub nodes: Vec<JourneyNode>,
    pub edges: Vec<JourneyEdge>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct JourneyNode {
    pub id: String,
    #[serde(default)]
    pub data: NodeData,
    /// Outbound connection points, top to bottom.
    #[serde(default)]
    pub handles: Vec<Handle>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<Position>,
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct NodeData {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct Handle {
    #[serde(default)]
    pub id: String,
    #[serde(rename = "nodeId", default, skip_serializing_if = "Option::is_none")]
    pub node_id: Option<String>,
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, Default, PartialEq)]
pub struct Position {
    pub x: f32,
    pub y: f32,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct JourneyEdge {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub source: String,
    pub target: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_handle: Option<String>,
    /// Required by contract; `None` only so the transformer can report it.
    #[serde(default)]
    pub style: Option<EdgeStyle>,
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct EdgeStyle {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stroke: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// One backend-observed request belonging to a journey run.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct TransactionRecord {
    pub transaction_id: String,
    pub timestamp: String,
}

/// Metadata or payload object attached to a node by the scripts endpoint.
///
/// The scripts endpoint returns, per node, an ordered list of these: the node
/// config first, then the script itself (`type == "Script"`, base64 `script`).
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct ScriptDescriptor {
    #[serde(rename = "_id", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub script: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ScriptDescriptor {
    pub fn is_script(&self) -> bool {
        self.kind.as_deref() == Some("Script")
    }
}

/// node id -> descriptor list
pub type ScriptMap = HashMap<String, Vec<ScriptDescriptor>>;

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct LogEntry {
    #[serde(default)]
    pub payload: LogPayload,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct LogPayload {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub level: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl LogEntry {
    /// `LEVEL message` line used by every log list.
    pub fn summary(&self) -> String {
        format!(
            "{} {}",
            self.payload.level.as_deref().unwrap_or("-"),
            self.payload.message.as_deref().unwrap_or("")
        )
    }
}

/// Envelope of every `/api/logs/...` response.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct LogsResponse {
    #[serde(default)]
    pub result: Vec<LogEntry>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_flow_response() {
        let json = r#"{
            "nodes": [
                {
                    "id": "n1",
                    "position": {"x": 10.0, "y": 20.0},
                    "data": {"name": "Page Node", "type": "\"PageNode\""},
                    "handles": [{"id": "outcome", "x": 0.0, "y": 10.0}]
                }
            ],
            "edges": [
                {
                    "id": "n1/outcome",
                    "source": "n1",
                    "target": "n2",
                    "sourceHandle": "outcome",
                    "style": {"stroke": "grey"}
                }
            ]
        }"#;

        let graph: JourneyGraph = serde_json::from_str(json).unwrap();
        assert_eq!(graph.nodes[0].data.name.as_deref(), Some("Page Node"));
        assert!(graph.nodes[0].data.extra.contains_key("type"));
        assert_eq!(graph.nodes[0].handles[0].id, "outcome");
        assert_eq!(graph.edges[0].source_handle.as_deref(), Some("outcome"));
        assert_eq!(
            graph.edges[0].style.as_ref().and_then(|s| s.stroke.as_deref()),
            Some("grey")
        );
    }

    #[test]
    fn test_edge_without_style_still_parses() {
        let edge: JourneyEdge = serde_json::from_str(r#"{"source": "a", "target": "b"}"#).unwrap();
        assert!(edge.style.is_none());
    }

    #[test]
    fn test_node_without_id_is_rejected() {
        let res: Result<JourneyNode, _> = serde_json::from_str(r#"{"data": {}, "handles": []}"#);
        assert!(res.is_err());
    }

    #[test]
    fn test_script_descriptor_fields() {
        let d: ScriptDescriptor = serde_json::from_str(
            r#"{"_id": "s1", "name": "foo", "type": "Script", "script": "YQ=="}"#,
        )
        .unwrap();
        assert!(d.is_script());
        assert_eq!(d.id.as_deref(), Some("s1"));
    }

    #[test]
    fn test_log_summary() {
        let entry: LogEntry = serde_json::from_str(
            r#"{"payload": {"level": "ERROR", "message": "boom"}, "type": "text/plain"}"#,
        )
        .unwrap();
        assert_eq!(entry.summary(), "ERROR boom");
        assert!(entry.extra.contains_key("type"));
    }
}
