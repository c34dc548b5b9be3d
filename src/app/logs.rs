//! Search Logs and Watch Logs pages

use eframe::egui;
use crate::core::LogFilter;
use crate::fetch_state::FetchState;
use crate::theme::colors;
use super::flow::{log_list, no_data};
use super::JourneyApp;

impl JourneyApp {
    pub(crate) fn render_search_logs(&mut self, ui: &mut egui::Ui) {
        ui.heading("Search Logs");
        ui.horizontal(|ui| {
            ui.label(egui::RichText::new("Transaction or request id").color(colors::TEXT_MUTED));
            ui.add(egui::TextEdit::singleline(&mut self.log_search.id).desired_width(360.0));
        });
        ui.add_space(8.0);

        match self.log_search.logs.state() {
            FetchState::Idle => {}
            FetchState::Loading => {
                ui.spinner();
            }
            FetchState::Loaded(entries) => log_list(ui, "search_logs", entries),
            FetchState::Failed(e) => no_data(ui, e),
        }
    }

    pub(crate) fn render_watch_logs(&mut self, ui: &mut egui::Ui) {
        ui.heading("Watching");
        ui.horizontal(|ui| {
            ui.label(egui::RichText::new("Log types to keep").color(colors::TEXT_MUTED));
            egui::ComboBox::from_id_salt("watch_filter")
                .selected_text(self.log_watch.filter.as_str())
                .show_ui(ui, |ui| {
                    for &filter in LogFilter::CHOICES {
                        ui.selectable_value(&mut self.log_watch.filter, filter, filter.as_str());
                    }
                });
            ui.label(
                egui::RichText::new(format!(
                    "every {}s",
                    self.config.watch_interval.as_secs()
                ))
                .color(colors::TEXT_MUTED)
                .small(),
            );
        });
        ui.add_space(8.0);

        // Keep the previous list visible while a poll is in flight
        match self.log_watch.logs.state() {
            FetchState::Loaded(entries) => log_list(ui, "watch_logs", entries),
            FetchState::Failed(e) => no_data(ui, e),
            FetchState::Loading => {
                ui.spinner();
            }
            FetchState::Idle => {}
        }
    }
}
