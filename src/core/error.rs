//! Error taxonomy shared by the fetch clients, the transformers and the UI
//!
//! Every variant is `Clone` so a failure can sit in a panel's fetch state
//! next to the data it replaced.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DashboardError {
    /// Transport failure, non-2xx status, or a body that is not JSON.
    #[error("request to {url} failed: {message}")]
    Network { url: String, message: String },

    /// The graph service sent an edge without a `style` object.
    #[error("edge #{index} ({source_id} -> {target_id}) has no style")]
    MalformedEdge {
        index: usize,
        source_id: String,
        target_id: String,
    },

    /// A response did not have the shape its endpoint promises.
    #[error("malformed response: {0}")]
    MalformedGraph(String),

    /// Script payload for a node is not valid base64 or not UTF-8.
    #[error("script for node '{node_id}' could not be decoded: {message}")]
    Decode { node_id: String, message: String },

    #[error("invalid api url: {0}")]
    InvalidUrl(String),
}

impl DashboardError {
    pub fn network(url: impl Into<String>, message: impl ToString) -> Self {
        DashboardError::Network {
            url: url.into(),
            message: message.to_string(),
        }
    }
}

impl From<serde_json::Error> for DashboardError {
    fn from(e: serde_json::Error) -> Self {
        DashboardError::MalformedGraph(e.to_string())
    }
}

impl From<url::ParseError> for DashboardError {
    fn from(e: url::ParseError) -> Self {
        DashboardError::InvalidUrl(e.to_string())
    }
}
