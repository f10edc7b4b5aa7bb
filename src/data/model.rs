use std::collections::{BTreeMap, HashSet};
use std::fmt;
use std::sync::Arc;

use serde::Serialize;

// ---------------------------------------------------------------------------
// Record – one validated observation
// ---------------------------------------------------------------------------

/// A single metric observation: `(experiment, metric, step, value)`.
///
/// Records can only be built inside the crate. The parser is the sole
/// production constructor, so every `Record` seen by callers has non-empty
/// identifiers and a finite value.
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    experiment_id: String,
    metric_name: String,
    step: i64,
    value: f64,
}

impl Record {
    pub(crate) fn new(
        experiment_id: impl Into<String>,
        metric_name: impl Into<String>,
        step: i64,
        value: f64,
    ) -> Self {
        Self {
            experiment_id: experiment_id.into(),
            metric_name: metric_name.into(),
            step,
            value,
        }
    }

    pub fn experiment_id(&self) -> &str {
        &self.experiment_id
    }

    pub fn metric_name(&self) -> &str {
        &self.metric_name
    }

    pub fn step(&self) -> i64 {
        self.step
    }

    pub fn value(&self) -> f64 {
        self.value
    }
}

impl fmt::Display for Record {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}/{} @ {} = {}",
            self.experiment_id, self.metric_name, self.step, self.value
        )
    }
}

// ---------------------------------------------------------------------------
// ExperimentLog – the complete loaded record set
// ---------------------------------------------------------------------------

/// All records from one upload, with pre-computed distinct identifiers.
///
/// The records live behind an `Arc` so derived views can be cached against
/// the identity of the slice rather than its contents.
#[derive(Debug, Clone)]
pub struct ExperimentLog {
    records: Arc<[Record]>,
    /// Distinct experiment ids in first-occurrence order.
    experiments: Vec<String>,
    /// Distinct metric names in first-occurrence order.
    metric_names: Vec<String>,
}

impl ExperimentLog {
    /// Build the distinct-id indices from parsed records.
    pub fn from_records(records: Vec<Record>) -> Self {
        let experiments = first_occurrence(records.iter().map(Record::experiment_id));
        let metric_names = first_occurrence(records.iter().map(Record::metric_name));
        ExperimentLog {
            records: records.into(),
            experiments,
            metric_names,
        }
    }

    pub fn records(&self) -> &Arc<[Record]> {
        &self.records
    }

    pub fn experiments(&self) -> &[String] {
        &self.experiments
    }

    pub fn metric_names(&self) -> &[String] {
        &self.metric_names
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the log holds no records.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

fn first_occurrence<'a>(ids: impl Iterator<Item = &'a str>) -> Vec<String> {
    let mut seen: HashSet<&str> = HashSet::new();
    ids.filter(|id| seen.insert(*id))
        .map(str::to_string)
        .collect()
}

// ---------------------------------------------------------------------------
// MetricSeriesTable – chart-ready output of the aggregator
// ---------------------------------------------------------------------------

/// One x-axis position of a metric chart.
///
/// `values` is sparse: an experiment without an observation at this step has
/// no key, which renderers must treat as "no point" rather than zero.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SeriesRow {
    pub step: i64,
    #[serde(flatten)]
    pub values: BTreeMap<String, f64>,
}

impl SeriesRow {
    pub fn new(step: i64) -> Self {
        Self {
            step,
            values: BTreeMap::new(),
        }
    }

    pub fn get(&self, experiment_id: &str) -> Option<f64> {
        self.values.get(experiment_id).copied()
    }
}

/// Step-ordered rows for a single metric.
#[derive(Debug, Clone, PartialEq)]
pub struct MetricSeriesTable {
    pub metric_name: String,
    pub rows: Vec<SeriesRow>,
}

impl MetricSeriesTable {
    /// Points `[step, value]` for one experiment, skipping steps it did not report.
    pub fn points_for(&self, experiment_id: &str) -> Vec<[f64; 2]> {
        self.rows
            .iter()
            .filter_map(|row| row.get(experiment_id).map(|v| [row.step as f64, v]))
            .collect()
    }

    /// Rows in the chart-ready JSON shape: `[{"step": 0, "exp1": 1.0}, ...]`.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(&self.rows)
    }
}
