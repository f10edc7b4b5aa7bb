mod app;
mod ui;

use std::path::PathBuf;

use app::ExperimentInspectorApp;
use eframe::egui;

fn main() -> eframe::Result {
    env_logger::init();

    // Optional: a CSV file to open at startup.
    let initial_file = std::env::args_os().nth(1).map(PathBuf::from);

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1200.0, 800.0])
            .with_min_inner_size([600.0, 400.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Experiment Inspector",
        options,
        Box::new(move |_cc| Ok(Box::new(ExperimentInspectorApp::new(initial_file.as_deref())))),
    )
}
