use eframe::egui::{self, Color32, RichText, ScrollArea, Sense, Ui};
use experiment_inspector::state::AppState;

/// Skipped-row diagnostics listed in the summary tooltip.
const MAX_DEFECTS_SHOWN: usize = 20;

// ---------------------------------------------------------------------------
// Left side panel – experiment selector
// ---------------------------------------------------------------------------

/// Render the left panel: upload button or the experiment checklist.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Experiments");
    ui.separator();

    if state.log.is_none() {
        ui.label("No data loaded.");
        ui.add_space(4.0);
        if ui.button("Upload CSV…").clicked() {
            open_file_dialog(state);
        }
        ui.small("Select a file from your machine.");
        return;
    }

    // Clone so we can mutate the selection inside the loop.
    let experiments = state.experiments().to_vec();
    let all_selected = state.all_selected();

    ui.horizontal(|ui: &mut Ui| {
        let label = if all_selected { "Deselect All" } else { "Select All" };
        if ui.link(label).clicked() {
            if all_selected {
                state.select_none();
            } else {
                state.select_all();
            }
        }
        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui: &mut Ui| {
            ui.weak(format!(
                "{} / {} selected",
                state.selected.len(),
                experiments.len()
            ));
        });
    });
    ui.separator();

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            for id in &experiments {
                let color = state.colors.color_for(id);
                ui.horizontal(|ui: &mut Ui| {
                    let mut checked = state.is_selected(id);
                    let text = RichText::new(id).color(if checked { color } else { ui.visuals().text_color() });
                    if ui.checkbox(&mut checked, text).on_hover_text(id).changed() {
                        state.toggle_experiment(id);
                    }
                    color_swatch(ui, color);
                });
            }
        });
}

fn color_swatch(ui: &mut Ui, color: Color32) {
    let (rect, _) = ui.allocate_exact_size(egui::vec2(12.0, 12.0), Sense::hover());
    ui.painter().circle_filled(rect.center(), 6.0, color);
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
            if ui
                .add_enabled(state.log.is_some(), egui::Button::new("Clear Data"))
                .clicked()
            {
                state.clear();
                ui.close_menu();
            }
        });

        ui.separator();

        if let Some(log) = &state.log {
            ui.label(format!(
                "{} data points, {} / {} experiments selected",
                log.len(),
                state.selected.len(),
                log.experiments().len()
            ));
        }

        if let Some(notice) = &state.notice {
            ui.separator();
            let response = ui.weak(notice);
            if !state.defects.is_empty() {
                let details: Vec<String> = state
                    .defects
                    .iter()
                    .take(MAX_DEFECTS_SHOWN)
                    .map(|d| d.to_string())
                    .collect();
                let mut text = details.join("\n");
                if state.defects.len() > MAX_DEFECTS_SHOWN {
                    text.push_str(&format!(
                        "\n… and {} more",
                        state.defects.len() - MAX_DEFECTS_SHOWN
                    ));
                }
                response.on_hover_text(text);
            }
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
        .set_title("Open experiment log")
        .add_filter("CSV", &["csv"])
        .pick_file();

    if let Some(path) = file {
        state.load_path(&path);
    }
}
