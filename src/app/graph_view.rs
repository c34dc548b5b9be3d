//! Journey graph canvas
//!
//! Nodes are boxes with their outbound handles stacked down the right edge;
//! edges are cubic curves from a source handle to the target's left side.

use eframe::egui;
use egui::epaint::CubicBezierShape;
use std::collections::HashMap;

use crate::core::{RenderEdge, RenderGraph, RenderNode};
use crate::theme::{colors, stroke_color};
use super::JourneyApp;

const NODE_WIDTH: f32 = 180.0;
/// Grid used for nodes the backend sent without a position
const GRID_COLUMNS: usize = 6;
const GRID_DX: f32 = 240.0;
const GRID_DY: f32 = 160.0;
const THIN_STROKE: f32 = 1.5;

fn node_rect(idx: usize, node: &RenderNode, origin: egui::Pos2) -> egui::Rect {
    let pos = match node.position {
        Some(p) => egui::vec2(p.x, p.y),
        None => egui::vec2(
            (idx % GRID_COLUMNS) as f32 * GRID_DX,
            (idx / GRID_COLUMNS) as f32 * GRID_DY,
        ),
    };
    egui::Rect::from_min_size(origin + pos, egui::vec2(NODE_WIDTH, node.height as f32))
}

/// Where an edge leaves its source: the matching handle, else mid-right.
fn source_anchor(rect: egui::Rect, node: &RenderNode, edge: &RenderEdge) -> egui::Pos2 {
    let idx = edge
        .source_handle
        .as_deref()
        .and_then(|h| node.handles.iter().position(|handle| handle.id == h));
    match idx {
        Some(i) => egui::pos2(rect.right(), rect.top() + RenderNode::handle_offset(i) as f32),
        None => rect.right_center(),
    }
}

impl JourneyApp {
    /// Draw the graph; returns the id of a node clicked this frame.
    pub(crate) fn draw_graph(
        &mut self,
        ui: &mut egui::Ui,
        graph: &RenderGraph,
        selected: Option<&str>,
    ) -> Option<String> {
        let (response, painter) =
            ui.allocate_painter(ui.available_size(), egui::Sense::click_and_drag());
        painter.rect_filled(response.rect, 0.0, colors::BG_PRIMARY);

        if response.dragged() {
            self.graph_pan += response.drag_delta();
        }
        let origin = response.rect.min + egui::vec2(20.0, 20.0) + self.graph_pan;

        let rects: HashMap<&str, (egui::Rect, &RenderNode)> = graph
            .nodes
            .iter()
            .enumerate()
            .map(|(i, n)| (n.id.as_str(), (node_rect(i, n, origin), n)))
            .collect();

        // Inactive edges first so the walked path stays on top
        let mut edges: Vec<&RenderEdge> = graph.edges.iter().collect();
        edges.sort_by_key(|e| e.animated);

        for edge in edges {
            let (Some((src_rect, src)), Some((dst_rect, _))) =
                (rects.get(edge.source.as_str()), rects.get(edge.target.as_str()))
            else {
                continue;
            };

            let from = source_anchor(*src_rect, src, edge);
            let to = dst_rect.left_center();
            let bend = ((to.x - from.x).abs() * 0.5).max(40.0);
            let width = edge.stroke_width.map(|w| w as f32 * 0.4).unwrap_or(THIN_STROKE);
            let stroke = egui::Stroke::new(width, stroke_color(edge.stroke.as_deref()));

            painter.add(CubicBezierShape::from_points_stroke(
                [from, from + egui::vec2(bend, 0.0), to - egui::vec2(bend, 0.0), to],
                false,
                egui::Color32::TRANSPARENT,
                stroke,
            ));
            painter.arrow(to - egui::vec2(10.0, 0.0), egui::vec2(8.0, 0.0), stroke);
        }

        // Graph order sets the z-order
        for node in &graph.nodes {
            let Some((rect, _)) = rects.get(node.id.as_str()) else {
                continue;
            };
            let is_selected = selected == Some(node.id.as_str());
            let fill = if is_selected {
                colors::BG_NODE_SELECTED
            } else {
                colors::BG_NODE
            };
            let border = if is_selected { colors::ACCENT } else { colors::BORDER };

            painter.rect_filled(*rect, 4.0, fill);
            painter.rect_stroke(
                *rect,
                4.0,
                egui::Stroke::new(1.0, border),
                egui::StrokeKind::Inside,
            );
            painter.text(
                rect.center() - egui::vec2(10.0, 0.0),
                egui::Align2::CENTER_CENTER,
                node.display_name.as_deref().unwrap_or("-"),
                egui::FontId::proportional(13.0),
                colors::TEXT_PRIMARY,
            );

            for (i, handle) in node.handles.iter().enumerate() {
                let y = rect.top() + RenderNode::handle_offset(i) as f32;
                painter.circle_filled(egui::pos2(rect.right(), y), 3.0, colors::TEXT_SECONDARY);
                painter.text(
                    egui::pos2(rect.right() - 6.0, y),
                    egui::Align2::RIGHT_CENTER,
                    &handle.id,
                    egui::FontId::monospace(10.0),
                    colors::TEXT_SECONDARY,
                );
            }
        }

        let pointer = response.interact_pointer_pos().filter(|_| response.clicked())?;
        graph
            .topmost(|n| rects.get(n.id.as_str()).is_some_and(|(r, _)| r.contains(pointer)))
            .map(|n| n.id.clone())
    }
}
