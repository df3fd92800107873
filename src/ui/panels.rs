use eframe::egui::{self, Color32, RichText, Ui};
use egui_extras::{Column, TableBuilder};

use crate::config::SelectionTool;
use crate::data::selection::SelectionState;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Right side panel – active points
// ---------------------------------------------------------------------------

/// Render the side panel: counts, current fit and the active point table.
pub fn side_panel(ui: &mut Ui, state: &AppState) {
    ui.heading("Points");
    ui.separator();

    let engine = &state.engine;
    let dataset = engine.dataset();
    if dataset.is_empty() {
        ui.label("No dataset loaded.");
        return;
    }

    if let Some(source) = &state.source_name {
        ui.label(format!("Source: {source}"));
    }
    let emission = engine.emission();
    let selection = match emission.selection_state {
        SelectionState::Empty => "none (fit uses all points)".to_string(),
        SelectionState::Full => "all points".to_string(),
        SelectionState::Partial => format!("{} points", emission.selection_len),
    };
    ui.label(format!("{} points loaded", emission.dataset_len));
    ui.label(format!("Selected: {selection}"));
    ui.label(RichText::new(&emission.equation).monospace());
    ui.separator();

    let active = engine.active_indices();
    let show_labels = dataset.has_labels();

    let mut table = TableBuilder::new(ui)
        .striped(true)
        .resizable(true)
        .column(Column::auto().at_least(32.0));
    if show_labels {
        table = table.column(Column::auto().at_least(60.0).clip(true));
    }
    table
        .column(Column::auto().at_least(60.0))
        .column(Column::remainder().at_least(60.0))
        .header(20.0, |mut header| {
            header.col(|ui| {
                ui.strong("#");
            });
            if show_labels {
                header.col(|ui| {
                    ui.strong("desc");
                });
            }
            header.col(|ui| {
                ui.strong("x");
            });
            header.col(|ui| {
                ui.strong("y");
            });
        })
        .body(|body| {
            body.rows(18.0, active.len(), |mut row| {
                let idx = active[row.index()];
                let p = &dataset.points()[idx];
                row.col(|ui| {
                    ui.label(idx.to_string());
                });
                if show_labels {
                    row.col(|ui| {
                        ui.label(&p.label);
                    });
                }
                row.col(|ui| {
                    ui.label(format!("{}", p.x));
                });
                row.col(|ui| {
                    ui.label(format!("{}", p.y));
                });
            });
        });
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Open…").clicked() {
                open_file_dialog(state);
                ui.close_menu();
            }
        });

        ui.separator();

        let primary = state.settings.primary_source.display().to_string();
        if ui
            .button("From file")
            .on_hover_text(format!("Load {primary}"))
            .clicked()
        {
            state.load_primary();
        }
        if ui
            .button("From clipboard")
            .on_hover_text("Paste a 2- or 3-column table")
            .clicked()
        {
            state.request_paste();
            ui.ctx().send_viewport_cmd(egui::ViewportCommand::RequestPaste);
        }
        if ui.button("Clear").clicked() {
            state.clear();
        }

        ui.separator();

        for (tool, name) in [
            (SelectionTool::Pan, "Pan"),
            (SelectionTool::Box, "Box select"),
            (SelectionTool::Lasso, "Lasso select"),
        ] {
            if ui.selectable_label(state.tool == tool, name).clicked() {
                state.tool = tool;
                state.gesture = None;
            }
        }
        if ui.button("Reset selection").clicked() {
            state.reset_selection();
        }

        if let Some(msg) = &state.status_message {
            ui.separator();
            ui.label(RichText::new(msg).color(Color32::RED));
        }
    });
}

// ---------------------------------------------------------------------------
// File dialog
// ---------------------------------------------------------------------------

pub fn open_file_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Open point table")
        .add_filter(
            "Supported files",
            &["csv", "txt", "tsv", "json", "parquet", "pq", "xlsx", "xlsm", "xls", "ods"],
        )
        .add_filter("CSV", &["csv", "txt"])
        .add_filter("TSV", &["tsv"])
        .add_filter("JSON", &["json"])
        .add_filter("Parquet", &["parquet", "pq"])
        .add_filter("Spreadsheet", &["xlsx", "xlsm", "xls", "ods"])
        .pick_file();

    if let Some(path) = file {
        state.load_path(&path);
    }
}
