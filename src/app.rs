use std::path::Path;

use eframe::egui;
use experiment_inspector::state::AppState;

use crate::ui::{panels, plot};

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

#[derive(Default)]
pub struct ExperimentInspectorApp {
    pub state: AppState,
}

impl ExperimentInspectorApp {
    pub fn new(initial_file: Option<&Path>) -> Self {
        let mut app = Self::default();
        if let Some(path) = initial_file {
            app.state.load_path(path);
        }
        app
    }
}

impl eframe::App for ExperimentInspectorApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // ---- Top panel: menu bar ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(ui, &mut self.state);
        });

        // ---- Left side panel: experiment selector ----
        egui::SidePanel::left("experiment_panel")
            .default_width(240.0)
            .resizable(true)
            .show(ctx, |ui| {
                panels::side_panel(ui, &mut self.state);
            });

        // ---- Central panel: metric charts ----
        egui::CentralPanel::default().show(ctx, |ui| {
            plot::metric_charts(ui, &mut self.state);
        });
    }
}
