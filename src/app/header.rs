//! Header bar with page tabs and request status

use eframe::egui;
use crate::theme::colors;
use super::{JourneyApp, Page};

impl JourneyApp {
    pub(crate) fn render_header(&mut self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            ui.label(egui::RichText::new("Journey Lens").strong());
            ui.add_space(12.0);

            const PAGES: &[(Page, &str)] = &[
                (Page::Flow, "Flow"),
                (Page::SearchLogs, "Search Logs"),
                (Page::WatchLogs, "Watch Logs"),
            ];

            for &(page, label) in PAGES {
                let color = if self.page == page {
                    colors::TEXT_PRIMARY
                } else {
                    colors::TEXT_MUTED
                };
                if ui
                    .selectable_label(self.page == page, egui::RichText::new(label).color(color))
                    .clicked()
                {
                    self.page = page;
                }
            }

            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                let (text, color) = if self.in_flight > 0 {
                    (format!("{} loading", self.in_flight), colors::LEVEL_WARN)
                } else {
                    ("idle".to_string(), colors::TEXT_MUTED)
                };
                ui.label(egui::RichText::new(text).color(color).monospace());
                ui.label(egui::RichText::new("/").color(colors::TEXT_MUTED));
                ui.label(
                    egui::RichText::new(self.config.base_url.as_str())
                        .color(colors::TEXT_MUTED)
                        .monospace(),
                );
            });
        });
    }
}
