//! Platform-agnostic core module - shared between WASM dashboard and CLI

pub mod endpoints;
pub mod error;
pub mod graph;
pub mod logs;
pub mod model;
pub mod session;
pub mod transactions;

pub use endpoints::{Endpoint, JourneySearch};
pub use error::DashboardError;
pub use graph::{transform_graph, RenderEdge, RenderGraph, RenderNode};
pub use logs::{filter_unknown_outcomes, select_script, LogFilter, LogTail, ScriptRef};
pub use model::{JourneyGraph, LogEntry, LogsResponse, ScriptMap, TransactionRecord};
pub use session::{FlowSession, LogSearch, LogWatch, Slot};
pub use transactions::{normalize_transaction_id, resolve_transactions};
