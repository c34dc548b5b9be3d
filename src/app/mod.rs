//! Journey Lens dashboard app
//!
//! Owns the three page sessions and the browser fetcher. Every frame it
//! drains finished requests into the sessions, asks each session what it
//! needs next, and draws the active page.

mod flow;
mod graph_view;
mod header;
mod logs;
mod script;

use eframe::egui;
use tracing::{debug, info};

use crate::config::ApiConfig;
use crate::core::{Endpoint, FlowSession, JourneySearch, LogSearch, LogWatch};
use crate::fetch_wasm::BrowserFetcher;
use crate::theme::{colors, dashboard_visuals};
use crate::time::now_seconds;

/// Page shown in the central panel
#[derive(Clone, Copy, PartialEq, Eq, Default)]
pub enum Page {
    #[default]
    Flow,
    SearchLogs,
    WatchLogs,
}

pub struct JourneyApp {
    config: ApiConfig,
    fetcher: BrowserFetcher,
    /// Requests started but not yet drained
    pub(crate) in_flight: usize,
    pub(crate) page: Page,

    pub(crate) flow: FlowSession,
    /// Search box contents; pushed into the session when edited
    pub(crate) search_draft: JourneySearch,
    pub(crate) log_search: LogSearch,
    pub(crate) log_watch: LogWatch,

    pub(crate) show_script: bool,
    /// Pan offset of the graph canvas
    pub(crate) graph_pan: egui::Vec2,
}

impl JourneyApp {
    pub fn new(cc: &eframe::CreationContext<'_>, config: ApiConfig) -> Self {
        cc.egui_ctx.set_visuals(dashboard_visuals());
        info!(base = %config.base_url, "Starting dashboard");

        let fetcher = BrowserFetcher::new(config.base_url.clone(), cc.egui_ctx.clone());
        let search = JourneySearch::default();

        Self {
            config,
            fetcher,
            in_flight: 0,
            page: Page::default(),
            flow: FlowSession::new(search.clone()),
            search_draft: search,
            log_search: LogSearch::default(),
            log_watch: LogWatch::default(),
            show_script: false,
            graph_pan: egui::Vec2::ZERO,
        }
    }

    fn request(&mut self, endpoint: Endpoint) {
        debug!(endpoint = endpoint.label(), "Requesting");
        self.in_flight += 1;
        self.fetcher.request(endpoint);
    }

    /// Route finished requests to whichever session asked for them.
    fn process_responses(&mut self) {
        for (endpoint, body) in self.fetcher.drain() {
            self.in_flight = self.in_flight.saturating_sub(1);
            let accepted = match endpoint {
                Endpoint::Logs { .. } => self.log_search.apply(&endpoint, body),
                Endpoint::Watch { .. } => self.log_watch.apply(&endpoint, body),
                _ => self.flow.apply(&endpoint, body),
            };
            if !accepted {
                debug!(endpoint = endpoint.label(), "Response superseded");
            }
        }
    }

    /// Only the visible page issues requests; the others keep their last data.
    fn issue_requests(&mut self) {
        let wanted: Vec<Endpoint> = match self.page {
            Page::Flow => self.flow.pending(),
            Page::SearchLogs => self.log_search.pending().into_iter().collect(),
            Page::WatchLogs => {
                let interval = self.config.watch_interval.as_secs_f64();
                self.log_watch.pending(now_seconds(), interval).into_iter().collect()
            }
        };
        for endpoint in wanted {
            self.request(endpoint);
        }
    }
}

impl eframe::App for JourneyApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.process_responses();
        self.issue_requests();

        if self.page == Page::WatchLogs {
            ctx.request_repaint_after(self.config.watch_interval);
        }

        egui::TopBottomPanel::top("header")
            .frame(egui::Frame::new().fill(colors::BG_ELEVATED).inner_margin(6.0))
            .show(ctx, |ui| self.render_header(ui));

        match self.page {
            Page::Flow => self.render_flow_page(ctx),
            Page::SearchLogs => {
                egui::CentralPanel::default().show(ctx, |ui| self.render_search_logs(ui));
            }
            Page::WatchLogs => {
                egui::CentralPanel::default().show(ctx, |ui| self.render_watch_logs(ui));
            }
        }

        if self.show_script {
            self.render_script_window(ctx);
        }
    }
}
