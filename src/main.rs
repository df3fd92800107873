mod app;
mod config;
mod data;
mod regression;
mod state;
mod ui;

use std::path::PathBuf;

use app::ScatterFitApp;
use config::Settings;
use eframe::egui;

fn main() -> eframe::Result {
    env_logger::init();

    let settings = Settings::load_or_default();
    // Optional file to open on startup.
    let initial = std::env::args_os().nth(1).map(PathBuf::from);
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size(settings.window_size)
            .with_min_inner_size([500.0, 400.0]),
        ..Default::default()
    };

    eframe::run_native(
        "ScatterFit",
        options,
        Box::new(|_cc| {
            let mut app = ScatterFitApp::new(settings);
            if let Some(path) = initial {
                app.state.load_path(&path);
            }
            Ok(Box::new(app))
        }),
    )
}
