//! Journey graph -> render model
//!
//! Pure functions: the same `JourneyGraph` and `ScriptMap` always produce the
//! same `RenderGraph`.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use serde::Serialize;
use tracing::{debug, trace};

use super::error::DashboardError;
use super::model::{
    Handle, JourneyEdge, JourneyGraph, JourneyNode, NodeData, Position, ScriptDescriptor, ScriptMap,
};

/// Kind tag every rendered node carries.
pub const NODE_KIND: &str = "ping";
/// Stroke colour the backend uses for paths the transaction did not take.
pub const INACTIVE_STROKE: &str = "grey";
pub const ACTIVE_STROKE_WIDTH: u32 = 10;
pub const EDGE_MARKER_END: &str = "arrow";
pub const EDGE_KIND: &str = "simplebezier";

pub const MIN_NODE_HEIGHT: u32 = 80;
/// Vertical distance between two handles on a node.
pub const HANDLE_SPACING: u32 = 20;

/// Well-known terminal node of every journey.
pub const SUCCESS_NODE_ID: &str = "70e691a5-1e33-4ac3-a356-e7b6d60d92e0";
pub const FAILURE_NODE_ID: &str = "e301438c-0bd0-429c-ab0c-66126501069a";

#[derive(Serialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RenderNode {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub height: u32,
    pub display_name: Option<String>,
    pub handles: Vec<Handle>,
    pub script_content: Vec<ScriptDescriptor>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub position: Option<Position>,
    pub data: NodeData,
}

impl RenderNode {
    /// Vertical offset of handle `idx` from the top of the node.
    pub fn handle_offset(idx: usize) -> u32 {
        (idx as u32 + 1) * HANDLE_SPACING
    }

    /// Decoded source of the script attached to this node ("" when none).
    pub fn script_source(&self) -> Result<String, DashboardError> {
        decode_script(&self.id, &self.script_content)
    }
}

#[derive(Serialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RenderEdge {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub source: String,
    pub target: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_handle: Option<String>,
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub marker_end: &'static str,
    pub animated: bool,
    pub stroke: Option<String>,
    /// `None` means the renderer's default thin stroke.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stroke_width: Option<u32>,
}

#[derive(Serialize, Debug, Clone, Default, PartialEq)]
pub struct RenderGraph {
    pub nodes: Vec<RenderNode>,
    pub edges: Vec<RenderEdge>,
}

impl RenderGraph {
    pub fn node(&self, id: &str) -> Option<&RenderNode> {
        self.nodes.iter().find(|n| n.id == id)
    }

    /// Topmost node matching `hit`. Nodes are drawn in graph order, so later ones win.
    pub fn topmost(&self, mut hit: impl FnMut(&RenderNode) -> bool) -> Option<&RenderNode> {
        self.nodes.iter().rev().find(|n| hit(n))
    }

    /// Number of edges the selected transaction actually walked.
    pub fn active_edge_count(&self) -> usize {
        self.edges.iter().filter(|e| e.animated).count()
    }
}

pub fn node_height(handle_count: usize) -> u32 {
    (handle_count as u32 * HANDLE_SPACING + HANDLE_SPACING).max(MIN_NODE_HEIGHT)
}

/// Human label for a node name.
///
/// Names starting with `s` are script-state names and pass through untouched.
pub fn resolve_name(name: Option<&str>) -> Option<String> {
    match name {
        Some(n) if n.starts_with('s') => Some(n.to_string()),
        Some(SUCCESS_NODE_ID) => Some("Success".to_string()),
        Some(FAILURE_NODE_ID) => Some("Fail".to_string()),
        other => other.map(str::to_string),
    }
}

/// `[{}, {script: ""}]`, attached to nodes with no scripts entry.
pub fn empty_script_content() -> Vec<ScriptDescriptor> {
    vec![
        ScriptDescriptor::default(),
        ScriptDescriptor {
            script: Some(String::new()),
            ..Default::default()
        },
    ]
}

pub fn render_node(node: &JourneyNode, scripts: Option<&ScriptMap>) -> RenderNode {
    let script_content = scripts
        .and_then(|map| map.get(&node.id))
        .cloned()
        .unwrap_or_else(empty_script_content);

    RenderNode {
        id: node.id.clone(),
        kind: NODE_KIND,
        height: node_height(node.handles.len()),
        display_name: resolve_name(node.data.name.as_deref()),
        handles: node.handles.clone(),
        script_content,
        position: node.position,
        data: node.data.clone(),
    }
}

pub fn render_edge(index: usize, edge: &JourneyEdge) -> Result<RenderEdge, DashboardError> {
    let style = edge.style.as_ref().ok_or_else(|| DashboardError::MalformedEdge {
        index,
        source_id: edge.source.clone(),
        target_id: edge.target.clone(),
    })?;

    let animated = style.stroke.as_deref() != Some(INACTIVE_STROKE);

    Ok(RenderEdge {
        id: edge.id.clone(),
        source: edge.source.clone(),
        target: edge.target.clone(),
        source_handle: edge.source_handle.clone(),
        kind: EDGE_KIND,
        marker_end: EDGE_MARKER_END,
        animated,
        stroke: style.stroke.clone(),
        stroke_width: animated.then_some(ACTIVE_STROKE_WIDTH),
    })
}

/// Transform a raw graph. Fails on the first edge without a style.
pub fn transform_graph(
    graph: &JourneyGraph,
    scripts: Option<&ScriptMap>,
) -> Result<RenderGraph, DashboardError> {
    let nodes: Vec<RenderNode> = graph.nodes.iter().map(|n| render_node(n, scripts)).collect();
    let edges = graph
        .edges
        .iter()
        .enumerate()
        .map(|(i, e)| render_edge(i, e))
        .collect::<Result<Vec<_>, _>>()?;

    let rendered = RenderGraph { nodes, edges };
    debug!(
        nodes = rendered.nodes.len(),
        edges = rendered.edges.len(),
        active = rendered.active_edge_count(),
        "Journey graph transformed"
    );
    Ok(rendered)
}

/// Decode the base64 script carried in the second slot of a node's script content.
pub fn decode_script(
    node_id: &str,
    content: &[ScriptDescriptor],
) -> Result<String, DashboardError> {
    let encoded = content
        .get(1)
        .and_then(|d| d.script.as_deref())
        .unwrap_or("");
    trace!(node_id, len = encoded.len(), "Decoding script");

    let bytes = STANDARD.decode(encoded.trim()).map_err(|e| DashboardError::Decode {
        node_id: node_id.to_string(),
        message: e.to_string(),
    })?;

    String::from_utf8(bytes).map_err(|e| DashboardError::Decode {
        node_id: node_id.to_string(),
        message: e.to_string(),
    })
}
