//! Command line client for the journey backend
//!
//! Run with: cargo run --features cli --bin journey-cli -- <command>

#[cfg(not(target_arch = "wasm32"))]
mod cli {
    use clap::{Parser, Subcommand};
    use journey_lens::config::ApiConfig;
    use journey_lens::core::{JourneySearch, LogFilter, LogTail};
    use journey_lens::fetch_native::HttpFetcher;
    use serde::Serialize;
    use std::time::Duration;
    use tracing::{info, warn};

    #[derive(Parser)]
    #[command(name = "journey-cli", about = "Inspect journey graphs, transactions and logs")]
    pub struct Cli {
        /// Backend base URL
        #[arg(long, env = "JOURNEY_API")]
        pub api: Option<String>,

        #[command(subcommand)]
        pub command: Command,
    }

    #[derive(Subcommand)]
    pub enum Command {
        /// List journey names
        Journeys {
            #[arg(long, default_value = "")]
            starts_with: String,
            #[arg(long, default_value = "")]
            ends_with: String,
            #[arg(long, default_value = "")]
            contains: String,
        },
        /// Render-ready graph of a journey
        Flow {
            journey: String,
            #[arg(long)]
            transaction: Option<String>,
        },
        /// Transaction groups of a journey, oldest first
        Transactions { journey: String },
        /// Script map of a journey
        Scripts { journey: String },
        /// Logs of a transaction or request id
        Logs {
            id: String,
            #[arg(long, default_value = "Error")]
            filter: LogFilter,
        },
        /// Logs a node's script produced during a transaction
        NodeLogs {
            journey: String,
            node: String,
            transaction: String,
        },
        /// Graph, transactions and scripts of a journey in one go
        Inspect { journey: String },
        /// Poll the watched transaction's logs
        Watch {
            #[arg(long, default_value = "Error")]
            filter: LogFilter,
            /// Poll period in seconds (defaults to JOURNEY_WATCH_SECS or 5)
            #[arg(long, value_parser = clap::value_parser!(u64).range(1..))]
            every: Option<u64>,
        },
    }

    fn print_json<T: Serialize>(value: &T) -> Result<(), Box<dyn std::error::Error>> {
        println!("{}", serde_json::to_string_pretty(value)?);
        Ok(())
    }

    pub async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
        let mut config = ApiConfig::from_env()?;
        if let Some(url) = cli.api {
            config.base_url = url::Url::parse(&url)?;
        }
        let fetcher = HttpFetcher::new(config);

        match cli.command {
            Command::Journeys {
                starts_with,
                ends_with,
                contains,
            } => {
                let names = fetcher
                    .journeys(JourneySearch {
                        starts_with,
                        ends_with,
                        contains,
                    })
                    .await?;
                info!(count = names.len(), "Journeys");
                print_json(&names)
            }
            Command::Flow {
                journey,
                transaction,
            } => {
                let graph = fetcher.render_flow(&journey, transaction.as_deref()).await?;
                info!(
                    nodes = graph.nodes.len(),
                    edges = graph.edges.len(),
                    active = graph.active_edge_count(),
                    "Flow"
                );
                print_json(&graph)
            }
            Command::Transactions { journey } => print_json(&fetcher.transactions(&journey).await?),
            Command::Scripts { journey } => print_json(&fetcher.scripts(&journey).await?),
            Command::Logs { id, filter } => print_json(&fetcher.logs(&id, filter).await?),
            Command::NodeLogs {
                journey,
                node,
                transaction,
            } => {
                let scripts = fetcher.scripts(&journey).await?;
                match fetcher.node_logs(&scripts, &node, &transaction).await? {
                    Some(entries) => print_json(&entries),
                    None => {
                        warn!(node = %node, "Node has no script; nothing to fetch");
                        Ok(())
                    }
                }
            }
            Command::Inspect { journey } => print_json(&fetcher.inspect(&journey).await?),
            Command::Watch { filter, every } => {
                let period = every
                    .map(Duration::from_secs)
                    .unwrap_or(fetcher.config().watch_interval);
                watch(&fetcher, filter, period).await
            }
        }
    }

    async fn watch(
        fetcher: &HttpFetcher,
        filter: LogFilter,
        period: Duration,
    ) -> Result<(), Box<dyn std::error::Error>> {
        let mut poll = tokio::time::interval(period);
        let mut tail = LogTail::new();
        let mut seen = 0usize;
        info!(filter = %filter, secs = period.as_secs(), "Watching logs");

        loop {
            tokio::select! {
                _ = poll.tick() => {
                    match fetcher.watch(filter).await {
                        Ok(entries) => {
                            for entry in tail.advance(entries) {
                                println!("{}", entry.summary());
                                seen += 1;
                            }
                        }
                        // No retry policy beyond the next tick
                        Err(e) => warn!(error = %e, "Watch poll failed"),
                    }
                }
                _ = tokio::signal::ctrl_c() => {
                    info!(lines = seen, "Stopped watching");
                    return Ok(());
                }
            }
        }
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        #[test]
        fn test_watch_period_must_be_positive() {
            assert!(Cli::try_parse_from(["journey-cli", "watch", "--every", "0"]).is_err());

            let cli = Cli::try_parse_from(["journey-cli", "watch", "--every", "2"]).unwrap();
            assert!(matches!(cli.command, Command::Watch { every: Some(2), .. }));
        }
    }
}

#[cfg(not(target_arch = "wasm32"))]
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    use clap::Parser;
    use tracing_subscriber::{fmt, EnvFilter};

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,journey_lens=debug"));
    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();

    cli::run(cli::Cli::parse()).await
}

#[cfg(target_arch = "wasm32")]
fn main() {}
