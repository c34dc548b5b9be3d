//! Flow page: journey picker, transaction picker, node logs, graph

use eframe::egui;
use crate::core::{DashboardError, LogEntry};
use crate::fetch_state::FetchState;
use crate::theme::{colors, level_color};
use super::JourneyApp;

impl JourneyApp {
    pub(crate) fn render_flow_page(&mut self, ctx: &egui::Context) {
        let side_width = ctx.screen_rect().width() * 0.25;
        egui::SidePanel::left("transactions")
            .default_width(side_width)
            .min_width(220.0)
            .resizable(true)
            .frame(egui::Frame::new().fill(colors::BG_PRIMARY).inner_margin(8.0))
            .show(ctx, |ui| {
                self.render_transaction_picker(ui);
                ui.add_space(8.0);
                ui.separator();
                self.render_node_logs(ui);
            });

        egui::CentralPanel::default().show(ctx, |ui| {
            self.render_journey_picker(ui);
            ui.add_space(6.0);
            self.render_graph_panel(ui);
        });
    }

    fn render_journey_picker(&mut self, ui: &mut egui::Ui) {
        let names: Vec<String> = self.flow.journeys.data().cloned().unwrap_or_default();
        let mut selected = self.flow.journey().map(str::to_string);

        ui.horizontal(|ui| {
            egui::ComboBox::from_id_salt("journey")
                .width(260.0)
                .selected_text(selected.as_deref().unwrap_or("Select Journey"))
                .show_ui(ui, |ui| {
                    for name in &names {
                        ui.selectable_value(&mut selected, Some(name.clone()), name);
                    }
                });

            let mut edited = false;
            ui.label(egui::RichText::new("Starts With").color(colors::TEXT_MUTED));
            edited |= ui
                .add(
                    egui::TextEdit::singleline(&mut self.search_draft.starts_with)
                        .desired_width(120.0),
                )
                .changed();
            ui.label(egui::RichText::new("Contains").color(colors::TEXT_MUTED));
            edited |= ui
                .add(
                    egui::TextEdit::singleline(&mut self.search_draft.contains)
                        .desired_width(120.0),
                )
                .changed();
            if edited {
                self.flow.set_search(self.search_draft.clone());
            }

            if let Some(e) = self.flow.journeys.state().error() {
                ui.colored_label(colors::LEVEL_ERROR, "journeys unavailable")
                    .on_hover_text(e.to_string());
            }
        });

        if selected.as_deref() != self.flow.journey() {
            self.flow.select_journey(selected);
            self.graph_pan = egui::Vec2::ZERO;
            self.show_script = false;
        }
    }

    fn render_transaction_picker(&mut self, ui: &mut egui::Ui) {
        let groups: Vec<String> = self.flow.transactions.data().cloned().unwrap_or_default();
        let mut selected = self.flow.transaction().map(str::to_string);

        ui.label(egui::RichText::new("Select Transaction Id").color(colors::TEXT_MUTED));
        egui::ComboBox::from_id_salt("transaction")
            .width(ui.available_width())
            .selected_text(selected.as_deref().unwrap_or("-"))
            .show_ui(ui, |ui| {
                for id in &groups {
                    ui.selectable_value(
                        &mut selected,
                        Some(id.clone()),
                        egui::RichText::new(id).monospace(),
                    );
                }
            });

        match self.flow.transactions.state() {
            FetchState::Loading => {
                ui.spinner();
            }
            FetchState::Failed(e) => no_data(ui, e),
            _ => {}
        }

        if selected.as_deref() != self.flow.transaction() {
            self.flow.select_transaction(selected);
        }
    }

    fn render_node_logs(&mut self, ui: &mut egui::Ui) {
        match self.flow.node_logs.state() {
            FetchState::Idle => {
                ui.label(
                    egui::RichText::new("Pick a transaction and a scripted node")
                        .color(colors::TEXT_MUTED)
                        .small(),
                );
            }
            FetchState::Loading => {
                ui.spinner();
            }
            FetchState::Loaded(entries) => log_list(ui, "node_logs", entries),
            FetchState::Failed(e) => no_data(ui, e),
        }
    }

    fn render_graph_panel(&mut self, ui: &mut egui::Ui) {
        let Some(rendered) = self.flow.rendered() else {
            if self.flow.journey().is_some() {
                ui.spinner();
            }
            return;
        };

        match rendered {
            Ok(graph) => {
                let graph = graph.clone();
                let selected = self.flow.node().map(str::to_string);
                if let Some(clicked) = self.draw_graph(ui, &graph, selected.as_deref()) {
                    self.flow.select_node(Some(clicked));
                    self.show_script = true;
                }
            }
            Err(e) => {
                let e = e.clone();
                no_data(ui, &e);
            }
        }
    }
}

/// A panel whose request failed: say so, keep the rest of the page alive.
pub(crate) fn no_data(ui: &mut egui::Ui, e: &DashboardError) {
    ui.colored_label(colors::TEXT_MUTED, "No data available for this view")
        .on_hover_text(e.to_string());
}

pub(crate) fn log_list(ui: &mut egui::Ui, id: &str, entries: &[LogEntry]) {
    if entries.is_empty() {
        ui.label(egui::RichText::new("no logs").color(colors::TEXT_MUTED));
        return;
    }
    egui::ScrollArea::vertical().id_salt(id).show(ui, |ui| {
        for entry in entries {
            ui.horizontal_wrapped(|ui| {
                ui.label(
                    egui::RichText::new(entry.payload.level.as_deref().unwrap_or("-"))
                        .color(level_color(entry.payload.level.as_deref()))
                        .monospace()
                        .strong(),
                );
                ui.label(entry.payload.message.as_deref().unwrap_or(""));
            });
        }
    });
}
