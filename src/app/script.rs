//! Script modal for the selected node

use eframe::egui;
use crate::theme::colors;
use super::flow::no_data;
use super::JourneyApp;

impl JourneyApp {
    pub(crate) fn render_script_window(&mut self, ctx: &egui::Context) {
        let Some(node) = self.flow.selected_node() else {
            return;
        };
        let title = node.display_name.clone().unwrap_or_else(|| node.id.clone());
        let node_id = node.id.clone();
        let source = node.script_source();

        let mut open = true;
        egui::Window::new(title)
            .id(egui::Id::new("script_window"))
            .open(&mut open)
            .resizable(true)
            .default_width(560.0)
            .default_height(420.0)
            .show(ctx, |ui| {
                ui.label(
                    egui::RichText::new(&node_id)
                        .color(colors::TEXT_MUTED)
                        .monospace()
                        .small(),
                );
                ui.separator();
                match &source {
                    Ok(text) if text.is_empty() => {
                        ui.label(
                            egui::RichText::new("No script attached").color(colors::TEXT_MUTED),
                        );
                    }
                    Ok(text) => {
                        egui::ScrollArea::vertical().show(ui, |ui| {
                            ui.add(
                                egui::TextEdit::multiline(&mut text.as_str())
                                    .code_editor()
                                    .desired_width(f32::INFINITY),
                            );
                        });
                    }
                    Err(e) => no_data(ui, e),
                }
            });

        if !open {
            self.show_script = false;
        }
    }
}
