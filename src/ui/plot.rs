use eframe::egui::{self, Ui};
use egui_plot::{Legend, Line, Plot, PlotPoints};
use experiment_inspector::data::model::MetricSeriesTable;
use experiment_inspector::state::{AppState, ChartView};

const CHART_HEIGHT: f32 = 260.0;

// ---------------------------------------------------------------------------
// Metric charts (central panel)
// ---------------------------------------------------------------------------

/// Render one line chart per metric for the selected experiments.
pub fn metric_charts(ui: &mut Ui, state: &mut AppState) {
    if state.selected.is_empty() {
        empty_state(
            ui,
            "Ready to Inspect?",
            "Upload a CSV file and select experiments to visualize the metrics.",
        );
        return;
    }

    let view = state.chart_view();
    if view.tables.is_empty() {
        empty_state(
            ui,
            "No Metrics to Display",
            "The selected experiments do not have any metrics to visualize.",
        );
        return;
    }

    egui::ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            for table in view.tables {
                ui.group(|ui: &mut Ui| {
                    chart_header(ui, table);
                    metric_plot(ui, table, &view);
                });
                ui.add_space(8.0);
            }
        });
}

fn chart_header(ui: &mut Ui, table: &MetricSeriesTable) {
    ui.horizontal(|ui: &mut Ui| {
        ui.strong(&table.metric_name);
        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui: &mut Ui| {
            if ui
                .small_button("Copy data")
                .on_hover_text("Copy the chart rows as JSON")
                .clicked()
            {
                match table.to_json() {
                    Ok(json) => ui.ctx().copy_text(json),
                    Err(e) => log::error!("Failed to serialise '{}': {e}", table.metric_name),
                }
            }
        });
    });
}

fn metric_plot(ui: &mut Ui, table: &MetricSeriesTable, view: &ChartView<'_>) {
    Plot::new(("metric_plot", &table.metric_name))
        .height(CHART_HEIGHT)
        .legend(Legend::default())
        .x_axis_label("Step")
        .y_axis_label(&table.metric_name)
        .y_axis_formatter(|mark, _range| format!("{:.3}", mark.value))
        .allow_boxed_zoom(true)
        .allow_drag(true)
        .allow_scroll(false)
        .allow_zoom(true)
        .show(ui, |plot_ui| {
            for id in view.selected_experiments() {
                // Steps this experiment did not report contribute no point.
                let points: PlotPoints = table.points_for(id).into();
                let line = Line::new(points)
                    .name(id)
                    .color(view.colors.color_for(id))
                    .width(2.0);
                plot_ui.line(line);
            }
        });
}

fn empty_state(ui: &mut Ui, title: &str, hint: &str) {
    ui.centered_and_justified(|ui: &mut Ui| {
        ui.vertical_centered(|ui: &mut Ui| {
            ui.heading(title);
            ui.label(hint);
        });
    });
}
