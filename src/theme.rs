//! Dark operator theme for the journey dashboard

use egui::Color32;

pub mod colors {
    use super::Color32;

    // === Backgrounds ===
    pub const BG_PRIMARY: Color32 = Color32::from_rgb(14, 16, 20);
    pub const BG_ELEVATED: Color32 = Color32::from_rgb(24, 27, 33);
    pub const BG_NODE: Color32 = Color32::from_rgb(32, 36, 44);
    pub const BG_NODE_SELECTED: Color32 = Color32::from_rgb(46, 58, 80);

    // === Text ===
    pub const TEXT_PRIMARY: Color32 = Color32::from_rgb(230, 232, 236);
    pub const TEXT_SECONDARY: Color32 = Color32::from_rgb(150, 156, 168);
    pub const TEXT_MUTED: Color32 = Color32::from_rgb(88, 94, 106);

    pub const BORDER: Color32 = Color32::from_rgb(52, 58, 70);
    pub const ACCENT: Color32 = Color32::from_rgb(90, 160, 255);

    // === Log levels ===
    pub const LEVEL_ERROR: Color32 = Color32::from_rgb(235, 100, 100);
    pub const LEVEL_WARN: Color32 = Color32::from_rgb(230, 190, 90);
    pub const LEVEL_OTHER: Color32 = Color32::from_rgb(150, 156, 168);
}

/// Colour for a CSS-ish stroke name sent by the graph service.
pub fn stroke_color(stroke: Option<&str>) -> Color32 {
    match stroke {
        Some("grey") | Some("gray") => colors::TEXT_MUTED,
        Some("green") => Color32::from_rgb(90, 200, 120),
        Some("red") => colors::LEVEL_ERROR,
        Some("orange") | Some("yellow") => colors::LEVEL_WARN,
        Some("blue") => colors::ACCENT,
        _ => colors::TEXT_PRIMARY,
    }
}

pub fn level_color(level: Option<&str>) -> Color32 {
    match level.map(str::to_ascii_uppercase).as_deref() {
        Some("ERROR") => colors::LEVEL_ERROR,
        Some("WARN") | Some("WARNING") => colors::LEVEL_WARN,
        _ => colors::LEVEL_OTHER,
    }
}

pub fn dashboard_visuals() -> egui::Visuals {
    use colors::*;

    let mut visuals = egui::Visuals::dark();

    visuals.panel_fill = BG_PRIMARY;
    visuals.window_fill = BG_ELEVATED;
    visuals.extreme_bg_color = BG_PRIMARY;
    visuals.faint_bg_color = BG_ELEVATED;
    visuals.override_text_color = Some(TEXT_PRIMARY);

    visuals.widgets.noninteractive.bg_stroke = egui::Stroke::new(1.0, BORDER);
    visuals.widgets.inactive.bg_fill = BG_ELEVATED;
    visuals.widgets.inactive.weak_bg_fill = BG_ELEVATED;
    visuals.widgets.hovered.bg_stroke = egui::Stroke::new(1.0, ACCENT);

    visuals.selection.bg_fill = BG_NODE_SELECTED;
    visuals.selection.stroke = egui::Stroke::new(1.0, ACCENT);
    visuals.hyperlink_color = ACCENT;
    visuals.window_shadow = egui::Shadow::NONE;
    visuals.popup_shadow = egui::Shadow::NONE;

    visuals
}
