use eframe::egui;

use crate::config::Settings;
use crate::regression::Emission;
use crate::state::AppState;
use crate::ui::{panels, plot};

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

pub struct ScatterFitApp {
    pub state: AppState,
}

impl ScatterFitApp {
    pub fn new(settings: Settings) -> Self {
        let mut state = AppState::new(settings);
        state.engine.subscribe(|e: &Emission| {
            log::debug!(
                "fit over {} of {} points ({} selected): {}",
                e.result.n_points,
                e.dataset_len,
                e.selection_len,
                e.equation
            );
        });
        Self { state }
    }

    /// Clipboard text delivered this frame, if any.
    fn pasted_text(ctx: &egui::Context) -> Option<String> {
        ctx.input(|i| {
            i.events.iter().find_map(|e| match e {
                egui::Event::Paste(text) => Some(text.clone()),
                _ => None,
            })
        })
    }
}

impl Default for ScatterFitApp {
    fn default() -> Self {
        Self::new(Settings::default())
    }
}

impl eframe::App for ScatterFitApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // Paste events only count after "From clipboard".
        if self.state.awaiting_paste {
            self.state.poll_paste(Self::pasted_text(ctx));
            ctx.request_repaint();
        }

        // ---- Top panel: source buttons and tools ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(ui, &mut self.state);
        });

        // ---- Right side panel: active points ----
        egui::SidePanel::right("points_panel")
            .default_width(260.0)
            .resizable(true)
            .show(ctx, |ui| {
                panels::side_panel(ui, &self.state);
            });

        // ---- Central panel: plot ----
        egui::CentralPanel::default().show(ctx, |ui| {
            plot::scatter_plot(ui, &mut self.state);
        });
    }
}
