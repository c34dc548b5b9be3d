//! Native HTTP client for the journey backend
//!
//! Plain GETs with reqwest: no retries and no timeout, the caller decides
//! whether to ask again.

use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, warn};
use url::Url;

use crate::config::ApiConfig;
use crate::core::session::{parse_body, parse_logs};
use crate::core::{
    filter_unknown_outcomes, resolve_transactions, select_script, transform_graph, DashboardError,
    Endpoint, JourneyGraph, JourneySearch, LogEntry, LogFilter, RenderGraph, ScriptMap,
    TransactionRecord,
};

#[derive(Debug, Serialize)]
pub struct JourneyInspection {
    pub graph: RenderGraph,
    pub transactions: Option<Vec<String>>,
    pub scripts: Option<ScriptMap>,
}

/// Keep a side panel's result, logging instead of failing the whole view.
fn settled<T>(journey: &str, panel: &str, res: Result<T, DashboardError>) -> Option<T> {
    res.map_err(|e| warn!(journey, panel, error = %e, "Panel unavailable"))
        .ok()
}

pub struct HttpFetcher {
    client: Client,
    config: ApiConfig,
}

impl HttpFetcher {
    pub fn new(config: ApiConfig) -> Self {
        Self {
            client: Client::new(),
            config,
        }
    }

    pub fn config(&self) -> &ApiConfig {
        &self.config
    }

    /// GET `url` and parse the body as JSON.
    pub async fn fetch_json(&self, url: Url) -> Result<Value, DashboardError> {
        debug!(url = %url, "GET");

        let res = self.client.get(url.clone()).send().await.map_err(|e| {
            warn!(url = %url, error = %e, "Request failed");
            DashboardError::network(url.as_str(), e)
        })?;

        let status = res.status();
        if !status.is_success() {
            warn!(url = %url, status = status.as_u16(), "Unexpected status");
            return Err(DashboardError::network(url.as_str(), format!("status {status}")));
        }

        let bytes = res
            .bytes()
            .await
            .map_err(|e| DashboardError::network(url.as_str(), e))?;
        serde_json::from_slice(&bytes).map_err(|e| {
            warn!(url = %url, error = %e, "Body is not JSON");
            DashboardError::network(url.as_str(), format!("invalid JSON body: {e}"))
        })
    }

    pub async fn fetch(&self, endpoint: &Endpoint) -> Result<Value, DashboardError> {
        let url = endpoint.url(&self.config.base_url)?;
        self.fetch_json(url).await
    }

    pub async fn fetch_as<T: DeserializeOwned>(
        &self,
        endpoint: &Endpoint,
    ) -> Result<T, DashboardError> {
        parse_body(self.fetch(endpoint).await)
    }

    /// Journey names matching `search`, sorted.
    pub async fn journeys(&self, search: JourneySearch) -> Result<Vec<String>, DashboardError> {
        let mut names: Vec<String> = self.fetch_as(&Endpoint::Journeys(search)).await?;
        names.sort();
        Ok(names)
    }

    pub async fn flow(
        &self,
        journey: &str,
        transaction: Option<&str>,
    ) -> Result<JourneyGraph, DashboardError> {
        self.fetch_as(&Endpoint::Flow {
            journey: journey.to_string(),
            transaction: transaction.map(str::to_string),
        })
        .await
    }

    /// Flow and scripts of a journey, transformed for rendering.
    ///
    /// A failed scripts request leaves placeholder script content on the nodes.
    pub async fn render_flow(
        &self,
        journey: &str,
        transaction: Option<&str>,
    ) -> Result<RenderGraph, DashboardError> {
        let (graph, scripts) =
            futures_util::join!(self.flow(journey, transaction), self.scripts(journey));
        transform_graph(&graph?, settled(journey, "scripts", scripts).as_ref())
    }

    /// Graph, transactions and scripts of a journey, fetched concurrently.
    ///
    /// Only the flow request is required; the other two are `None` on failure.
    pub async fn inspect(&self, journey: &str) -> Result<JourneyInspection, DashboardError> {
        let (graph, transactions, scripts) = futures_util::join!(
            self.flow(journey, None),
            self.transactions(journey),
            self.scripts(journey),
        );
        let scripts = settled(journey, "scripts", scripts);
        Ok(JourneyInspection {
            graph: transform_graph(&graph?, scripts.as_ref())?,
            transactions: settled(journey, "transactions", transactions),
            scripts,
        })
    }

    /// Transaction groups of a journey, oldest first.
    pub async fn transactions(&self, journey: &str) -> Result<Vec<String>, DashboardError> {
        let records: Vec<TransactionRecord> = self
            .fetch_as(&Endpoint::Transactions {
                journey: journey.to_string(),
            })
            .await?;
        Ok(resolve_transactions(&records))
    }

    pub async fn scripts(&self, journey: &str) -> Result<ScriptMap, DashboardError> {
        self.fetch_as(&Endpoint::Scripts {
            journey: journey.to_string(),
        })
        .await
    }

    pub async fn logs(&self, id: &str, filter: LogFilter) -> Result<Vec<LogEntry>, DashboardError> {
        parse_logs(
            self.fetch(&Endpoint::Logs {
                id: id.to_string(),
                filter,
            })
            .await,
        )
    }

    pub async fn watch(&self, filter: LogFilter) -> Result<Vec<LogEntry>, DashboardError> {
        parse_logs(self.fetch(&Endpoint::Watch { filter }).await)
    }

    /// Logs a node's script produced during `transaction`.
    ///
    /// `Ok(None)` when the node has no script: nothing is fetched.
    pub async fn node_logs(
        &self,
        scripts: &ScriptMap,
        node: &str,
        transaction: &str,
    ) -> Result<Option<Vec<LogEntry>>, DashboardError> {
        let Some(script) = select_script(scripts, node) else {
            debug!(node, "No script for node, log fetch suppressed");
            return Ok(None);
        };
        let entries = parse_logs(
            self.fetch(&Endpoint::ScriptLogs {
                transaction: transaction.to_string(),
                script,
            })
            .await,
        )?;
        Ok(Some(filter_unknown_outcomes(entries)))
    }
}
