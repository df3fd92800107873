use eframe::egui::{self, Color32, FontId, PointerButton, Rect, Stroke, StrokeKind, Ui};
use egui_plot::{Line, Plot, PlotPoint, PlotPoints, PlotUi, Points, Polygon};

use crate::data::model::Point;
use crate::state::AppState;
use crate::ui::gesture::{DragMode, DragSelection};

const POINT_COLOR: Color32 = Color32::from_rgb(0x3A, 0x57, 0x85);
const SELECTED_COLOR: Color32 = Color32::from_rgb(0xE4, 0x6C, 0x0A);
const LINE_COLOR: Color32 = Color32::from_rgb(0x1F, 0x77, 0xB4);

const POINTS_NAME: &str = "points";
const SELECTED_NAME: &str = "selected";
const FIT_NAME: &str = "fit";

// ---------------------------------------------------------------------------
// Scatter plot (central panel)
// ---------------------------------------------------------------------------

/// Render the scatter plot, the fitted segment and the equation label, and
/// turn drag gestures into selections.
pub fn scatter_plot(ui: &mut Ui, state: &mut AppState) {
    if state.engine.dataset().is_empty() {
        let message = match state.engine.equation() {
            "" => "Load a table to start  (From file / From clipboard)",
            label => label,
        };
        ui.centered_and_justified(|ui: &mut Ui| {
            ui.heading(message);
        });
        return;
    }

    let engine = &state.engine;
    let points = engine.dataset().points();
    let radius = state.settings.point_radius;
    let drag_mode = DragMode::for_tool(state.tool);
    let gesture = &mut state.gesture;

    let mut plain: Vec<[f64; 2]> = Vec::with_capacity(points.len());
    let mut highlighted: Vec<[f64; 2]> = Vec::new();
    for (i, p) in points.iter().enumerate() {
        if engine.is_highlighted(i) {
            highlighted.push(p.xy());
        } else {
            plain.push(p.xy());
        }
    }
    let result = *engine.result();

    let response = Plot::new("scatter_plot")
        .x_axis_label("x")
        .y_axis_label("y")
        .allow_drag(drag_mode.is_none())
        .allow_boxed_zoom(true)
        .allow_scroll(true)
        .allow_zoom(true)
        .label_formatter(|name, value| hover_label(points, name, value))
        .show(ui, |plot_ui| {
            plot_ui.points(
                Points::new(PlotPoints::new(plain))
                    .name(POINTS_NAME)
                    .color(POINT_COLOR.gamma_multiply(0.6))
                    .radius(radius)
                    .filled(true),
            );
            if !highlighted.is_empty() {
                plot_ui.points(
                    Points::new(PlotPoints::new(highlighted))
                        .name(SELECTED_NAME)
                        .color(SELECTED_COLOR)
                        .radius(radius + 1.0)
                        .filled(true),
                );
            }

            if result.is_defined() {
                let (start, end) = (result.line_start, result.line_end);
                plot_ui.line(
                    Line::new(PlotPoints::new(vec![[start.x, start.y], [end.x, end.y]]))
                        .name(FIT_NAME)
                        .color(LINE_COLOR)
                        .width(2.0),
                );
            }

            track_gesture(plot_ui, drag_mode, gesture, points)
        });

    let plot_rect = response.response.rect;
    if let Some(indices) = response.inner {
        state.select(indices);
    }
    paint_equation(ui, plot_rect, state.engine.equation());
}

/// Advance the drag state machine for this frame.
///
/// Returns the new selection when a gesture finishes, or an empty selection
/// on a plain click.
fn track_gesture(
    plot_ui: &mut PlotUi,
    mode: Option<DragMode>,
    gesture: &mut Option<DragSelection>,
    points: &[Point],
) -> Option<Vec<usize>> {
    let (started, dragging, stopped, clicked) = {
        let resp = plot_ui.response();
        (
            resp.drag_started_by(PointerButton::Primary),
            resp.dragged_by(PointerButton::Primary),
            resp.drag_stopped_by(PointerButton::Primary),
            resp.clicked(),
        )
    };
    let pointer = plot_ui.pointer_coordinate().map(|p| [p.x, p.y]);

    let Some(mode) = mode else {
        *gesture = None;
        return clicked.then(Vec::new);
    };

    if started {
        if let Some(p) = pointer {
            *gesture = Some(DragSelection::new(mode, p));
        }
    }
    if dragging {
        if let (Some(drag), Some(p)) = (gesture.as_mut(), pointer) {
            drag.push_point(p);
        }
    }

    if let Some(drag) = gesture.as_ref() {
        let outline = drag.outline();
        if outline.len() >= 2 {
            plot_ui.polygon(
                Polygon::new(PlotPoints::new(outline))
                    .fill_color(SELECTED_COLOR.gamma_multiply(0.15))
                    .stroke(Stroke::new(1.5, SELECTED_COLOR)),
            );
        }
    }

    if stopped {
        return gesture.take().map(|drag| drag.selected(points));
    }
    clicked.then(Vec::new)
}

/// Tooltip text: index, coordinates and label for data points.
///
/// The plot only reports the hovered coordinates, so every point sitting
/// exactly there is listed.
fn hover_label(points: &[Point], name: &str, value: &PlotPoint) -> String {
    if name == POINTS_NAME || name == SELECTED_NAME {
        let hits: Vec<(usize, &Point)> = points
            .iter()
            .enumerate()
            .filter(|(_, p)| p.x == value.x && p.y == value.y)
            .collect();
        if !hits.is_empty() {
            let indices = hits.iter().map(|(i, _)| i.to_string()).collect::<Vec<_>>().join(", ");
            let labels = hits.iter().map(|(_, p)| p.label.as_str()).collect::<Vec<_>>().join(", ");
            return format!(
                "index: {indices}\n(x, y): ({}, {})\ndesc: {labels}",
                value.x, value.y
            );
        }
    }
    if name.is_empty() {
        format!("x = {:.3}\ny = {:.3}", value.x, value.y)
    } else {
        format!("{name}\nx = {:.3}\ny = {:.3}", value.x, value.y)
    }
}

/// Bordered equation label pinned to the top-left corner of the plot.
fn paint_equation(ui: &Ui, plot_rect: Rect, text: &str) {
    if text.is_empty() {
        return;
    }
    let painter = ui.painter_at(plot_rect);
    let galley = painter.layout_no_wrap(text.to_owned(), FontId::monospace(14.0), Color32::BLACK);
    let pos = plot_rect.left_top() + egui::vec2(60.0, 14.0);
    let frame = Rect::from_min_size(pos, galley.size()).expand(5.0);
    painter.rect(
        frame,
        0.0,
        Color32::WHITE,
        Stroke::new(1.0, Color32::BLACK),
        StrokeKind::Outside,
    );
    painter.galley(pos, galley, Color32::BLACK);
}
