//! Backend REST endpoints and their URLs
//!
//! An `Endpoint` doubles as the selection key of the panel that asked for it:
//! two requests for the same data compare equal.

use url::Url;

use super::error::DashboardError;
use super::logs::{LogFilter, ScriptRef};

/// Journey name search box contents.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct JourneySearch {
    pub starts_with: String,
    pub ends_with: String,
    pub contains: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Endpoint {
    /// `GET /api/journey?starts_with=&ends_with=&contains=` -> `string[]`
    Journeys(JourneySearch),
    /// `GET /api/journey/{name}/flow[?transaction_id=]` -> `JourneyGraph`
    Flow {
        journey: String,
        transaction: Option<String>,
    },
    /// `GET /api/journey/{name}/transactions` -> `TransactionRecord[]`
    Transactions { journey: String },
    /// `GET /api/journey/{name}/scripts` -> `ScriptMap`
    Scripts { journey: String },
    /// `GET /api/logs/{id}?filters={level}` -> `LogsResponse`
    Logs { id: String, filter: LogFilter },
    /// `GET /api/logs/{transaction}?script_id=&script_name=` -> `LogsResponse`
    ScriptLogs {
        transaction: String,
        script: ScriptRef,
    },
    /// `GET /api/logs/watch?filters={level}` -> `LogsResponse`
    Watch { filter: LogFilter },
}

impl Endpoint {
    /// Resolve against the backend base URL.
    pub fn url(&self, base: &Url) -> Result<Url, DashboardError> {
        let mut url = base.clone();
        url.set_query(None);
        url.set_fragment(None);

        {
            let mut segments = url
                .path_segments_mut()
                .map_err(|_| DashboardError::InvalidUrl(format!("{base} cannot be a base")))?;
            segments.pop_if_empty().push("api");
            match self {
                Endpoint::Journeys(_) => {
                    segments.push("journey");
                }
                Endpoint::Flow { journey, .. } => {
                    segments.extend(["journey", journey.as_str(), "flow"]);
                }
                Endpoint::Transactions { journey } => {
                    segments.extend(["journey", journey.as_str(), "transactions"]);
                }
                Endpoint::Scripts { journey } => {
                    segments.extend(["journey", journey.as_str(), "scripts"]);
                }
                Endpoint::Logs { id, .. } => {
                    segments.extend(["logs", id.as_str()]);
                }
                Endpoint::ScriptLogs { transaction, .. } => {
                    segments.extend(["logs", transaction.as_str()]);
                }
                Endpoint::Watch { .. } => {
                    segments.extend(["logs", "watch"]);
                }
            }
        }

        match self {
            Endpoint::Journeys(search) => {
                url.query_pairs_mut()
                    .append_pair("starts_with", &search.starts_with)
                    .append_pair("ends_with", &search.ends_with)
                    .append_pair("contains", &search.contains);
            }
            Endpoint::Flow {
                transaction: Some(tx),
                ..
            } => {
                url.query_pairs_mut().append_pair("transaction_id", tx);
            }
            Endpoint::Logs { filter, .. } | Endpoint::Watch { filter } => {
                url.query_pairs_mut().append_pair("filters", filter.as_str());
            }
            Endpoint::ScriptLogs { script, .. } => {
                url.query_pairs_mut()
                    .append_pair("script_id", &script.id)
                    .append_pair("script_name", &script.name);
            }
            Endpoint::Flow {
                transaction: None, ..
            }
            | Endpoint::Transactions { .. }
            | Endpoint::Scripts { .. } => {}
        }

        Ok(url)
    }

    /// Short label for log lines.
    pub fn label(&self) -> &'static str {
        match self {
            Endpoint::Journeys(_) => "journeys",
            Endpoint::Flow { .. } => "flow",
            Endpoint::Transactions { .. } => "transactions",
            Endpoint::Scripts { .. } => "scripts",
            Endpoint::Logs { .. } => "logs",
            Endpoint::ScriptLogs { .. } => "script_logs",
            Endpoint::Watch { .. } => "watch",
        }
    }
}
