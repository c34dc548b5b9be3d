//! Selection state and stale-response handling
//!
//! Each panel owns a `Slot` keyed by the endpoint it currently wants. Responses
//! are accepted only if they answer that exact endpoint, so a slow reply to an
//! old selection can never overwrite data for the current one.

use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, trace};

use super::endpoints::{Endpoint, JourneySearch};
use super::error::DashboardError;
use super::graph::{transform_graph, RenderGraph, RenderNode};
use super::logs::{filter_unknown_outcomes, select_script, LogFilter};
use super::model::{JourneyGraph, LogEntry, LogsResponse, ScriptMap, TransactionRecord};
use super::transactions::resolve_transactions;
use crate::fetch_state::FetchState;

/// Deserialize a fetched JSON body into the shape its endpoint promises.
pub fn parse_body<T: DeserializeOwned>(
    body: Result<Value, DashboardError>,
) -> Result<T, DashboardError> {
    body.and_then(|v| serde_json::from_value(v).map_err(DashboardError::from))
}

pub fn parse_logs(body: Result<Value, DashboardError>) -> Result<Vec<LogEntry>, DashboardError> {
    parse_body::<LogsResponse>(body).map(|r| r.result)
}

pub struct Slot<T> {
    key: Option<Endpoint>,
    state: FetchState<T>,
}

impl<T> Default for Slot<T> {
    fn default() -> Self {
        Self {
            key: None,
            state: FetchState::Idle,
        }
    }
}

impl<T> Slot<T> {
    pub fn key(&self) -> Option<&Endpoint> {
        self.key.as_ref()
    }

    pub fn state(&self) -> &FetchState<T> {
        &self.state
    }

    pub fn data(&self) -> Option<&T> {
        self.state.data()
    }

    /// Point the slot at `key`; returns the endpoint to fetch if the key changed.
    pub fn want(&mut self, key: Option<Endpoint>) -> Option<Endpoint> {
        if self.key == key {
            return None;
        }
        self.state = if key.is_some() {
            FetchState::Loading
        } else {
            FetchState::Idle
        };
        self.key = key.clone();
        key
    }

    /// Re-request the current key (polling). Keeps the last data on screen.
    pub fn refresh(&self) -> Option<Endpoint> {
        self.key.clone()
    }

    pub fn accepts(&self, key: &Endpoint) -> bool {
        self.key.as_ref() == Some(key)
    }

    /// Store `res` if it answers the current key. Returns false for stale responses.
    pub fn resolve(&mut self, key: &Endpoint, res: Result<T, DashboardError>) -> bool {
        if !self.accepts(key) {
            debug!(endpoint = key.label(), "Dropping stale response");
            return false;
        }
        self.state = res.into();
        true
    }
}

/// Flow page: journey -> graph, transactions, scripts -> node logs.
#[derive(Default)]
pub struct FlowSession {
    search: JourneySearch,
    journey: Option<String>,
    transaction: Option<String>,
    node: Option<String>,

    pub journeys: Slot<Vec<String>>,
    pub graph: Slot<JourneyGraph>,
    pub transactions: Slot<Vec<String>>,
    pub scripts: Slot<ScriptMap>,
    pub node_logs: Slot<Vec<LogEntry>>,

    rendered: Option<Result<RenderGraph, DashboardError>>,
}

impl FlowSession {
    pub fn new(search: JourneySearch) -> Self {
        Self {
            search,
            ..Default::default()
        }
    }

    pub fn search(&self) -> &JourneySearch {
        &self.search
    }

    pub fn set_search(&mut self, search: JourneySearch) {
        self.search = search;
    }

    pub fn journey(&self) -> Option<&str> {
        self.journey.as_deref()
    }

    pub fn transaction(&self) -> Option<&str> {
        self.transaction.as_deref()
    }

    pub fn node(&self) -> Option<&str> {
        self.node.as_deref()
    }

    /// Switching journeys invalidates the transaction and node selection.
    pub fn select_journey(&mut self, journey: Option<String>) {
        if self.journey != journey {
            debug!(journey = ?journey, "Journey selected");
            self.journey = journey;
            self.transaction = None;
            self.node = None;
        }
    }

    pub fn select_transaction(&mut self, transaction: Option<String>) {
        self.transaction = transaction;
    }

    pub fn select_node(&mut self, node: Option<String>) {
        self.node = node;
    }

    /// Transformed graph, once both the flow and the scripts request settled.
    pub fn rendered(&self) -> Option<&Result<RenderGraph, DashboardError>> {
        self.rendered.as_ref()
    }

    pub fn selected_node(&self) -> Option<&RenderNode> {
        let node = self.node.as_deref()?;
        self.rendered.as_ref()?.as_ref().ok()?.node(node)
    }

    fn node_logs_key(&self) -> Option<Endpoint> {
        let scripts = self.scripts.data()?;
        let node = self.node.as_deref()?;
        let transaction = self.transaction.as_ref()?;
        let script = select_script(scripts, node)?;
        Some(Endpoint::ScriptLogs {
            transaction: transaction.clone(),
            script,
        })
    }

    /// Sync every slot with the selection; returns endpoints that need fetching.
    pub fn pending(&mut self) -> Vec<Endpoint> {
        let journeys_key = Endpoint::Journeys(self.search.clone());
        let flow_key = self.journey.clone().map(|journey| Endpoint::Flow {
            journey,
            transaction: self.transaction.clone(),
        });
        let transactions_key = self
            .journey
            .clone()
            .map(|journey| Endpoint::Transactions { journey });
        let scripts_key = self.journey.clone().map(|journey| Endpoint::Scripts { journey });

        let mut out = Vec::new();
        out.extend(self.journeys.want(Some(journeys_key)));
        out.extend(self.graph.want(flow_key));
        out.extend(self.transactions.want(transactions_key));
        out.extend(self.scripts.want(scripts_key));
        // depends on the scripts slot, so evaluated after it settled above
        let logs_key = self.node_logs_key();
        out.extend(self.node_logs.want(logs_key));

        if out
            .iter()
            .any(|e| matches!(e, Endpoint::Flow { .. } | Endpoint::Scripts { .. }))
            || (self.graph.key().is_none() && self.rendered.is_some())
        {
            self.rerender();
        }
        if !out.is_empty() {
            trace!(count = out.len(), "Flow requests pending");
        }
        out
    }

    /// Feed a fetched body back in. Returns false if no slot wanted it.
    pub fn apply(&mut self, endpoint: &Endpoint, body: Result<Value, DashboardError>) -> bool {
        match endpoint {
            Endpoint::Journeys(_) => {
                let res = parse_body::<Vec<String>>(body).map(|mut names| {
                    names.sort();
                    names
                });
                self.journeys.resolve(endpoint, res)
            }
            Endpoint::Flow { .. } => {
                let accepted = self.graph.resolve(endpoint, parse_body(body));
                if accepted {
                    self.rerender();
                }
                accepted
            }
            Endpoint::Transactions { .. } => {
                let res = parse_body::<Vec<TransactionRecord>>(body)
                    .map(|records| resolve_transactions(&records));
                self.transactions.resolve(endpoint, res)
            }
            Endpoint::Scripts { .. } => {
                let accepted = self.scripts.resolve(endpoint, parse_body(body));
                if accepted {
                    self.rerender();
                }
                accepted
            }
            Endpoint::ScriptLogs { .. } => {
                let res = parse_logs(body).map(filter_unknown_outcomes);
                self.node_logs.resolve(endpoint, res)
            }
            Endpoint::Logs { .. } | Endpoint::Watch { .. } => false,
        }
    }

    /// Recompute the render graph from the current raw inputs.
    ///
    /// Waits for the scripts request to settle so nodes carry their script
    /// content; a failed scripts request renders with placeholders.
    fn rerender(&mut self) {
        self.rendered = match (self.graph.state(), self.scripts.state()) {
            (FetchState::Loaded(graph), FetchState::Loaded(scripts)) => {
                Some(transform_graph(graph, Some(scripts)))
            }
            (FetchState::Loaded(graph), FetchState::Failed(_)) => {
                Some(transform_graph(graph, None))
            }
            (FetchState::Failed(e), _) => Some(Err(e.clone())),
            _ => None,
        };
    }
}

/// Search Logs page: logs of one transaction or request id.
pub struct LogSearch {
    pub id: String,
    pub filter: LogFilter,
    pub logs: Slot<Vec<LogEntry>>,
}

impl Default for LogSearch {
    fn default() -> Self {
        Self {
            id: String::new(),
            filter: LogFilter::Error,
            logs: Slot::default(),
        }
    }
}

impl LogSearch {
    pub fn pending(&mut self) -> Option<Endpoint> {
        let id = self.id.trim();
        let key = (!id.is_empty()).then(|| Endpoint::Logs {
            id: id.to_string(),
            filter: self.filter,
        });
        self.logs.want(key)
    }

    pub fn apply(&mut self, endpoint: &Endpoint, body: Result<Value, DashboardError>) -> bool {
        self.logs.resolve(endpoint, parse_logs(body))
    }
}

/// Watch Logs page: polls the watched transaction at a fixed interval.
pub struct LogWatch {
    pub filter: LogFilter,
    pub logs: Slot<Vec<LogEntry>>,
    last_poll: Option<f64>,
}

impl Default for LogWatch {
    fn default() -> Self {
        Self {
            filter: LogFilter::Error,
            logs: Slot::default(),
            last_poll: None,
        }
    }
}

impl LogWatch {
    /// `now` and `interval` in seconds.
    pub fn pending(&mut self, now: f64, interval: f64) -> Option<Endpoint> {
        let changed = self.logs.want(Some(Endpoint::Watch { filter: self.filter }));
        if changed.is_some() {
            self.last_poll = Some(now);
            return changed;
        }
        match self.last_poll {
            Some(last) if now - last < interval => None,
            _ => {
                self.last_poll = Some(now);
                self.logs.refresh()
            }
        }
    }

    pub fn apply(&mut self, endpoint: &Endpoint, body: Result<Value, DashboardError>) -> bool {
        self.logs.resolve(endpoint, parse_logs(body))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::graph::SUCCESS_NODE_ID;
    use serde_json::json;

    fn flow_body() -> Value {
        json!({
            "nodes": [
                {
                    "id": "n1",
                    "data": {"name": "s_check"},
                    "handles": [{"id": "true"}, {"id": "false"}]
                },
                {"id": SUCCESS_NODE_ID, "data": {"name": SUCCESS_NODE_ID}, "handles": []}
            ],
            "edges": [
                {"source": "n1", "target": SUCCESS_NODE_ID, "style": {"stroke": "green"}}
            ]
        })
    }

    fn scripts_body() -> Value {
        json!({
            "n1": [
                {"type": "ScriptConfig", "_id": "cfg"},
                {"type": "Script", "_id": "s1", "name": "check", "script": "Y2hlY2soKQ=="}
            ]
        })
    }

    fn select_login(session: &mut FlowSession) -> Vec<Endpoint> {
        session.select_journey(Some("Login".to_string()));
        session.pending()
    }

    #[test]
    fn test_pending_follows_selection() {
        let mut session = FlowSession::default();
        let first = session.pending();
        assert_eq!(first, vec![Endpoint::Journeys(JourneySearch::default())]);
        assert!(session.pending().is_empty());

        let wanted = select_login(&mut session);
        assert_eq!(wanted.len(), 3);
        assert!(wanted.contains(&Endpoint::Scripts {
            journey: "Login".to_string()
        }));
    }

    #[test]
    fn test_graph_waits_for_scripts() {
        let mut session = FlowSession::default();
        select_login(&mut session);

        let flow = Endpoint::Flow {
            journey: "Login".to_string(),
            transaction: None,
        };
        assert!(session.apply(&flow, Ok(flow_body())));
        assert!(session.rendered().is_none());

        let scripts = Endpoint::Scripts {
            journey: "Login".to_string(),
        };
        assert!(session.apply(&scripts, Ok(scripts_body())));

        let graph = session.rendered().unwrap().as_ref().unwrap();
        assert_eq!(graph.nodes.len(), 2);
        assert_eq!(graph.nodes[1].display_name.as_deref(), Some("Success"));
        assert_eq!(graph.node("n1").unwrap().script_source().unwrap(), "check()");
    }

    #[test]
    fn test_stale_response_dropped() {
        let mut session = FlowSession::default();
        select_login(&mut session);
        session.select_journey(Some("Register".to_string()));
        session.pending();

        let stale = Endpoint::Flow {
            journey: "Login".to_string(),
            transaction: None,
        };
        assert!(!session.apply(&stale, Ok(flow_body())));
        assert!(session.graph.state().is_loading());
    }

    #[test]
    fn test_node_logs_gated_on_script() {
        let mut session = FlowSession::default();
        select_login(&mut session);
        session.apply(
            &Endpoint::Scripts {
                journey: "Login".to_string(),
            },
            Ok(scripts_body()),
        );
        session.select_transaction(Some("abc".to_string()));
        session.select_node(Some(SUCCESS_NODE_ID.to_string()));
        let wanted = session.pending();
        assert!(!wanted.iter().any(|e| matches!(e, Endpoint::ScriptLogs { .. })));
        assert!(matches!(session.node_logs.state(), FetchState::Idle));

        session.select_node(Some("n1".to_string()));
        let wanted = session.pending();
        let logs = wanted
            .iter()
            .find(|e| matches!(e, Endpoint::ScriptLogs { .. }))
            .cloned()
            .unwrap();
        let base = url::Url::parse("http://localhost:8081").unwrap();
        assert_eq!(
            logs.url(&base).unwrap().as_str(),
            "http://localhost:8081/api/logs/abc?script_id=s1&script_name=check"
        );

        let body = json!({"result": [
            {"payload": {"level": "ERROR", "message": "kept"}},
            {"payload": {"level": "DEBUG", "message": "Unknown outcome"}}
        ]});
        assert!(session.apply(&logs, Ok(body)));
        let entries = session.node_logs.data().unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].payload.message.as_deref(), Some("kept"));
    }

    #[test]
    fn test_journey_change_clears_selection() {
        let mut session = FlowSession::default();
        select_login(&mut session);
        session.select_transaction(Some("abc".to_string()));
        session.select_node(Some("n1".to_string()));
        session.select_journey(Some("Register".to_string()));
        assert_eq!(session.transaction(), None);
        assert_eq!(session.node(), None);
    }

    #[test]
    fn test_transactions_and_journeys_shaped() {
        let mut session = FlowSession::default();
        session.pending();
        session.apply(
            &Endpoint::Journeys(JourneySearch::default()),
            Ok(json!(["Register", "Login"])),
        );
        assert_eq!(
            session.journeys.data().unwrap(),
            &vec!["Login".to_string(), "Register".to_string()]
        );

        select_login(&mut session);
        session.apply(
            &Endpoint::Transactions {
                journey: "Login".to_string(),
            },
            Ok(json!([
                {"transaction_id": "abc/1-request5", "timestamp": "t1"},
                {"transaction_id": "abc/1", "timestamp": "t0"}
            ])),
        );
        assert_eq!(session.transactions.data().unwrap(), &vec!["abc".to_string()]);
    }

    #[test]
    fn test_network_error_fails_only_its_panel() {
        let mut session = FlowSession::default();
        select_login(&mut session);
        let err = DashboardError::network(
            "http://x/api/journey/Login/transactions",
            "connection refused",
        );
        session.apply(
            &Endpoint::Transactions {
                journey: "Login".to_string(),
            },
            Err(err.clone()),
        );
        assert_eq!(session.transactions.state().error(), Some(&err));
        assert!(session.graph.state().is_loading());
    }

    #[test]
    fn test_watch_polls_on_interval() {
        let mut watch = LogWatch::default();
        assert!(watch.pending(0.0, 5.0).is_some());
        assert!(watch.pending(1.0, 5.0).is_none());
        assert!(watch.pending(5.5, 5.0).is_some());

        watch.filter = LogFilter::Warn;
        assert_eq!(
            watch.pending(6.0, 5.0),
            Some(Endpoint::Watch {
                filter: LogFilter::Warn
            })
        );
    }

    #[test]
    fn test_log_search_blank_id_is_idle() {
        let mut search = LogSearch::default();
        assert!(search.pending().is_none());
        search.id = " req-1 ".to_string();
        assert_eq!(
            search.pending(),
            Some(Endpoint::Logs {
                id: "req-1".to_string(),
                filter: LogFilter::Error
            })
        );
    }

    #[test]
    fn test_watch_refresh_keeps_previous_list() {
        let mut watch = LogWatch::default();
        let key = watch.pending(0.0, 5.0).unwrap();
        assert!(watch.logs.state().is_loading());
        let body = json!({"result": [{"payload": {"level": "ERROR", "message": "first"}}]});
        assert!(watch.apply(&key, Ok(body)));

        let again = watch.pending(6.0, 5.0).unwrap();
        assert_eq!(again, key);
        assert_eq!(watch.logs.data().unwrap().len(), 1);

        let body = json!({"result": [
            {"payload": {"level": "ERROR", "message": "first"}},
            {"payload": {"level": "ERROR", "message": "second"}}
        ]});
        assert!(watch.apply(&again, Ok(body)));
        assert_eq!(watch.logs.data().unwrap().len(), 2);
    }

    #[test]
    fn test_reselecting_previous_journey() {
        let mut session = FlowSession::default();
        select_login(&mut session);
        session.select_journey(Some("Register".to_string()));
        session.pending();

        let wanted = select_login(&mut session);
        let login_flow = Endpoint::Flow {
            journey: "Login".to_string(),
            transaction: None,
        };
        assert!(wanted.contains(&login_flow));
        assert!(session.graph.state().is_loading());

        let register_flow = Endpoint::Flow {
            journey: "Register".to_string(),
            transaction: None,
        };
        assert!(!session.apply(&register_flow, Ok(json!({"nodes": [], "edges": []}))));
        assert!(session.graph.state().is_loading());

        assert!(session.apply(&login_flow, Ok(flow_body())));
        assert_eq!(session.graph.data().unwrap().nodes.len(), 2);
    }
}
