use std::collections::BTreeSet;
use std::path::Path;

use crate::color::ExperimentColors;
use crate::data::aggregate::SeriesCache;
use crate::data::loader::load_file;
use crate::data::model::{ExperimentLog, MetricSeriesTable};
use crate::data::parser::{ParsedTable, RowDefect, parse_table};

// ---------------------------------------------------------------------------
// Chart view
// ---------------------------------------------------------------------------

/// Read-only snapshot handed to the chart renderer for one frame.
pub struct ChartView<'a> {
    pub tables: &'a [MetricSeriesTable],
    /// All experiments in first-occurrence order (legend order).
    pub experiments: &'a [String],
    pub selected: &'a BTreeSet<String>,
    pub colors: &'a ExperimentColors,
}

impl<'a> ChartView<'a> {
    /// Selected experiments in first-occurrence order.
    pub fn selected_experiments(&self) -> impl Iterator<Item = &'a String> {
        let selected = self.selected;
        self.experiments
            .iter()
            .filter(move |id| selected.contains(id.as_str()))
    }
}

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.
#[derive(Default)]
pub struct AppState {
    /// Loaded records (None until the user loads a file).
    pub log: Option<ExperimentLog>,

    /// Experiments whose series are plotted.
    pub selected: BTreeSet<String>,

    /// Colour per experiment, assigned on load.
    pub colors: ExperimentColors,

    /// Last aggregation result, keyed on `(log, selected)`.
    series: SeriesCache,

    /// Load summary shown after a successful load.
    pub notice: Option<String>,

    /// Rows dropped by the last successful load.
    pub defects: Vec<RowDefect>,

    /// Error message shown in the UI.
    pub status_message: Option<String>,
}

impl AppState {
    /// Load a CSV file from disk. On failure the current data is untouched.
    pub fn load_path(&mut self, path: &Path) {
        match load_file(path) {
            Ok(table) => self.set_table(table),
            Err(e) => {
                log::error!("Failed to load file: {e:#}");
                self.status_message = Some(format!("Error: {e:#}"));
            }
        }
    }

    /// Parse in-memory CSV text. On failure the current data is untouched.
    pub fn load_text(&mut self, text: &str) {
        match parse_table(text) {
            Ok(table) => self.set_table(table),
            Err(e) => {
                log::error!("CSV parsing error: {e}");
                self.status_message = Some(format!("Error: {e}"));
            }
        }
    }

    /// Replace the loaded data, select every experiment and reassign colours.
    pub fn set_table(&mut self, table: ParsedTable) {
        let notice = table.summary();
        let log = ExperimentLog::from_records(table.records);
        log::info!(
            "Loaded {} records from {} experiments",
            log.len(),
            log.experiments().len()
        );

        self.colors = ExperimentColors::new(log.experiments());
        self.selected = log.experiments().iter().cloned().collect();
        self.series.clear();
        self.log = Some(log);
        self.notice = Some(notice);
        self.defects = table.defects;
        self.status_message = None;
    }

    /// Forget the loaded data and everything derived from it.
    pub fn clear(&mut self) {
        self.log = None;
        self.selected.clear();
        self.colors = ExperimentColors::default();
        self.series.clear();
        self.notice = None;
        self.defects.clear();
        self.status_message = None;
    }

    /// Distinct experiments of the loaded log, in first-occurrence order.
    pub fn experiments(&self) -> &[String] {
        self.log
            .as_ref()
            .map(ExperimentLog::experiments)
            .unwrap_or(&[])
    }

    /// Per-metric tables for the current selection (memoised).
    pub fn tables(&mut self) -> &[MetricSeriesTable] {
        self.chart_view().tables
    }

    /// Everything the chart panel needs, borrowed together.
    pub fn chart_view(&mut self) -> ChartView<'_> {
        let (tables, experiments) = match &self.log {
            Some(log) => (
                self.series.get(log.records(), &self.selected),
                log.experiments(),
            ),
            None => (&[][..], &[][..]),
        };
        ChartView {
            tables,
            experiments,
            selected: &self.selected,
            colors: &self.colors,
        }
    }

    /// Toggle a single experiment in the selection.
    pub fn toggle_experiment(&mut self, experiment_id: &str) {
        if !self.selected.remove(experiment_id) {
            self.selected.insert(experiment_id.to_string());
        }
    }

    /// Select every experiment in the loaded log.
    pub fn select_all(&mut self) {
        self.selected = self.experiments().iter().cloned().collect();
    }

    /// Clear the selection.
    pub fn select_none(&mut self) {
        self.selected.clear();
    }

    /// True when at least one experiment exists and all are selected.
    pub fn all_selected(&self) -> bool {
        let experiments = self.experiments();
        !experiments.is_empty() && experiments.iter().all(|id| self.selected.contains(id))
    }

    pub fn is_selected(&self, experiment_id: &str) -> bool {
        self.selected.contains(experiment_id)
    }

    pub fn has_data(&self) -> bool {
        self.log.as_ref().is_some_and(|log| !log.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CSV: &str = "experiment_id,metric_name,step,value\n\
                       exp1,loss,0,1.0\n\
                       exp2,loss,0,2.0\n\
                       exp1,loss,1,0.8\n\
                       exp2,acc,0,0.1\n";

    fn loaded() -> AppState {
        let mut state = AppState::default();
        state.load_text(CSV);
        state
    }

    #[test]
    fn test_load_selects_all_and_assigns_colors() {
        let state = loaded();
        assert_eq!(state.experiments(), ["exp1", "exp2"]);
        assert!(state.all_selected());
        assert_ne!(state.colors.color_for("exp1"), ExperimentColors::FALLBACK);
        assert_eq!(
            state.notice.as_deref(),
            Some("4 data points parsed successfully.")
        );
        assert!(state.status_message.is_none());
    }

    #[test]
    fn test_structural_failure_keeps_previous_data() {
        let mut state = loaded();
        state.toggle_experiment("exp2");

        state.load_text("experiment_id,step,value\nexp9,0,1.0");

        assert_eq!(
            state.status_message.as_deref(),
            Some("Error: Missing required column: metric_name")
        );
        assert_eq!(state.experiments(), ["exp1", "exp2"]);
        assert!(state.is_selected("exp1"));
        assert!(!state.is_selected("exp2"));
    }

    #[test]
    fn test_tables_follow_selection() {
        let mut state = loaded();
        assert_eq!(state.tables().len(), 2);

        state.toggle_experiment("exp2");
        let tables = state.tables();
        assert_eq!(tables.len(), 1);
        assert_eq!(tables[0].metric_name, "loss");
        assert!(tables[0].rows.iter().all(|r| r.get("exp2").is_none()));

        state.select_none();
        assert!(state.tables().is_empty());
        assert!(!state.all_selected());

        state.select_all();
        assert_eq!(state.tables().len(), 2);
    }

    #[test]
    fn test_chart_view_orders_selected_by_first_occurrence() {
        let mut state = loaded();
        let view = state.chart_view();
        let ids: Vec<&String> = view.selected_experiments().collect();
        assert_eq!(ids, ["exp1", "exp2"]);
        assert_eq!(view.tables.len(), 2);
    }

    #[test]
    fn test_toggle_twice_restores_selection() {
        let mut state = loaded();
        state.toggle_experiment("exp1");
        assert!(!state.is_selected("exp1"));
        state.toggle_experiment("exp1");
        assert!(state.all_selected());
    }

    #[test]
    fn test_reload_resets_cache() {
        let mut state = loaded();
        assert_eq!(state.tables().len(), 2);
        state.load_text("experiment_id,metric_name,step,value\nexp3,f1,0,0.5");
        let tables = state.tables();
        assert_eq!(tables.len(), 1);
        assert_eq!(tables[0].metric_name, "f1");
    }

    #[test]
    fn test_clear_resets_everything() {
        let mut state = loaded();
        state.clear();
        assert!(state.log.is_none());
        assert!(state.selected.is_empty());
        assert!(state.colors.is_empty());
        assert!(state.tables().is_empty());
        assert!(!state.all_selected());
        assert!(!state.has_data());
    }

    #[test]
    fn test_all_rows_skipped_loads_empty_log() {
        let mut state = AppState::default();
        state.load_text("experiment_id,metric_name,step,value\nexp1,loss,x,1.0");
        assert!(state.log.is_some());
        assert!(!state.has_data());
        assert_eq!(state.defects.len(), 1);
        assert_eq!(
            state.notice.as_deref(),
            Some("0 data points parsed successfully (1 row skipped).")
        );
    }
}
