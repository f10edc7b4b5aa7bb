use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::sync::Arc;

use super::model::{MetricSeriesTable, Record, SeriesRow};

// ---------------------------------------------------------------------------
// Series aggregation
// ---------------------------------------------------------------------------

/// Reshape flat records into one step-ordered table per metric.
///
/// * Only records whose experiment is in `selected` are used; an empty
///   selection yields no tables at all.
/// * Tables follow the first-occurrence order of each metric among the
///   selected records.
/// * Rows are keyed by step and sorted ascending. A repeated
///   `(metric, step, experiment)` keeps the value of the later record.
pub fn aggregate_series(records: &[Record], selected: &BTreeSet<String>) -> Vec<MetricSeriesTable> {
    if selected.is_empty() {
        return Vec::new();
    }

    let mut metrics: Vec<(&str, BTreeMap<i64, SeriesRow>)> = Vec::new();
    let mut slots: HashMap<&str, usize> = HashMap::new();

    for record in records
        .iter()
        .filter(|r| selected.contains(r.experiment_id()))
    {
        let slot = *slots.entry(record.metric_name()).or_insert_with(|| {
            metrics.push((record.metric_name(), BTreeMap::new()));
            metrics.len() - 1
        });
        metrics[slot]
            .1
            .entry(record.step())
            .or_insert_with(|| SeriesRow::new(record.step()))
            .values
            .insert(record.experiment_id().to_string(), record.value());
    }

    metrics
        .into_iter()
        .map(|(metric_name, rows)| MetricSeriesTable {
            metric_name: metric_name.to_string(),
            rows: rows.into_values().collect(),
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Memoisation
// ---------------------------------------------------------------------------

#[derive(Debug)]
struct CacheKey {
    records: Arc<[Record]>,
    selection: BTreeSet<String>,
}

/// Caches the last [`aggregate_series`] result.
///
/// A hit requires the *same* record allocation (pointer identity) and an
/// equal selection set. Since the selection is a `BTreeSet`, the order in
/// which experiments were ticked does not matter.
#[derive(Debug, Default)]
pub struct SeriesCache {
    key: Option<CacheKey>,
    tables: Vec<MetricSeriesTable>,
    recomputations: usize,
}

impl SeriesCache {
    /// Return the tables for `(records, selected)`, recomputing on a miss.
    pub fn get(&mut self, records: &Arc<[Record]>, selected: &BTreeSet<String>) -> &[MetricSeriesTable] {
        let hit = self
            .key
            .as_ref()
            .is_some_and(|k| Arc::ptr_eq(&k.records, records) && k.selection == *selected);

        if !hit {
            self.tables = aggregate_series(records, selected);
            self.key = Some(CacheKey {
                records: Arc::clone(records),
                selection: selected.clone(),
            });
            self.recomputations += 1;
            log::debug!(
                "Aggregated {} records into {} metric tables for {} experiments",
                records.len(),
                self.tables.len(),
                selected.len()
            );
        }
        &self.tables
    }

    /// Drop the cached tables and release the record reference.
    pub fn clear(&mut self) {
        self.key = None;
        self.tables.clear();
    }

    /// How many times the tables have been rebuilt.
    pub fn recomputations(&self) -> usize {
        self.recomputations
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rec(exp: &str, metric: &str, step: i64, value: f64) -> Record {
        Record::new(exp, metric, step, value)
    }

    fn select(ids: &[&str]) -> BTreeSet<String> {
        ids.iter().map(|s| s.to_string()).collect()
    }

    fn row(step: i64, values: &[(&str, f64)]) -> SeriesRow {
        SeriesRow {
            step,
            values: values.iter().map(|(k, v)| (k.to_string(), *v)).collect(),
        }
    }

    // ── aggregate_series ──────────────────────────────────────────────────────

    #[test]
    fn test_empty_selection_yields_no_tables() {
        let records = vec![rec("exp1", "loss", 0, 1.0), rec("exp2", "acc", 0, 0.5)];
        assert!(aggregate_series(&records, &BTreeSet::new()).is_empty());
    }

    #[test]
    fn test_groups_by_step_with_sparse_rows() {
        let records = vec![
            rec("exp1", "loss", 0, 1.0),
            rec("exp2", "loss", 0, 2.0),
            rec("exp1", "loss", 1, 0.8),
        ];
        let tables = aggregate_series(&records, &select(&["exp1", "exp2"]));
        assert_eq!(tables.len(), 1);
        assert_eq!(tables[0].metric_name, "loss");
        assert_eq!(
            tables[0].rows,
            vec![
                row(0, &[("exp1", 1.0), ("exp2", 2.0)]),
                row(1, &[("exp1", 0.8)]),
            ]
        );
        assert!(tables[0].rows[1].get("exp2").is_none());
    }

    #[test]
    fn test_last_write_wins() {
        let records = vec![rec("exp1", "loss", 3, 0.5), rec("exp1", "loss", 3, 0.25)];
        let tables = aggregate_series(&records, &select(&["exp1"]));
        assert_eq!(tables[0].rows, vec![row(3, &[("exp1", 0.25)])]);
    }

    #[test]
    fn test_rows_sorted_by_step() {
        let records = vec![
            rec("exp1", "loss", 10, 0.1),
            rec("exp1", "loss", -2, 0.9),
            rec("exp2", "loss", 5, 0.4),
            rec("exp1", "loss", 0, 0.7),
        ];
        let tables = aggregate_series(&records, &select(&["exp1", "exp2"]));
        let steps: Vec<i64> = tables[0].rows.iter().map(|r| r.step).collect();
        assert_eq!(steps, vec![-2, 0, 5, 10]);
    }

    #[test]
    fn test_metric_order_follows_first_occurrence() {
        let records = vec![
            rec("exp1", "zeta", 0, 1.0),
            rec("exp1", "alpha", 0, 1.0),
            rec("exp2", "mid", 0, 1.0),
            rec("exp1", "zeta", 1, 1.0),
        ];
        let tables = aggregate_series(&records, &select(&["exp1", "exp2"]));
        let names: Vec<&str> = tables.iter().map(|t| t.metric_name.as_str()).collect();
        assert_eq!(names, vec!["zeta", "alpha", "mid"]);
    }

    #[test]
    fn test_unselected_experiments_are_filtered_out() {
        let records = vec![
            rec("exp2", "acc", 0, 0.3),
            rec("exp1", "loss", 0, 1.0),
            rec("exp2", "loss", 0, 2.0),
        ];
        let tables = aggregate_series(&records, &select(&["exp1"]));
        assert_eq!(tables.len(), 1);
        assert_eq!(tables[0].rows, vec![row(0, &[("exp1", 1.0)])]);
    }

    #[test]
    fn test_selection_with_unknown_ids_only() {
        let records = vec![rec("exp1", "loss", 0, 1.0)];
        assert!(aggregate_series(&records, &select(&["ghost"])).is_empty());
    }

    #[test]
    fn test_aggregation_is_deterministic() {
        let records = vec![
            rec("b", "loss", 1, 0.5),
            rec("a", "loss", 0, 1.0),
            rec("a", "acc", 0, 0.1),
        ];
        let selected = select(&["a", "b"]);
        assert_eq!(
            aggregate_series(&records, &selected),
            aggregate_series(&records, &selected)
        );
    }

    // ── SeriesCache ───────────────────────────────────────────────────────────

    #[test]
    fn test_cache_hits_on_same_records_and_equal_selection() {
        let records: Arc<[Record]> = vec![rec("exp1", "loss", 0, 1.0), rec("exp2", "loss", 0, 2.0)].into();
        let mut cache = SeriesCache::default();

        let first = cache.get(&records, &select(&["exp1", "exp2"])).to_vec();
        let second = cache.get(&records, &select(&["exp2", "exp1"])).to_vec();
        assert_eq!(first, second);
        assert_eq!(cache.recomputations(), 1);
    }

    #[test]
    fn test_cache_misses_on_selection_change() {
        let records: Arc<[Record]> = vec![rec("exp1", "loss", 0, 1.0), rec("exp2", "loss", 0, 2.0)].into();
        let mut cache = SeriesCache::default();

        cache.get(&records, &select(&["exp1", "exp2"]));
        let tables = cache.get(&records, &select(&["exp1"])).to_vec();
        assert_eq!(cache.recomputations(), 2);
        assert_eq!(tables[0].rows, vec![row(0, &[("exp1", 1.0)])]);
    }

    #[test]
    fn test_cache_misses_on_new_record_allocation() {
        let a: Arc<[Record]> = vec![rec("exp1", "loss", 0, 1.0)].into();
        let b: Arc<[Record]> = vec![rec("exp1", "loss", 0, 1.0)].into();
        let mut cache = SeriesCache::default();
        let selected = select(&["exp1"]);

        cache.get(&a, &selected);
        cache.get(&b, &selected);
        assert_eq!(cache.recomputations(), 2);
    }

    #[test]
    fn test_cache_clear_forces_recompute() {
        let records: Arc<[Record]> = vec![rec("exp1", "loss", 0, 1.0)].into();
        let mut cache = SeriesCache::default();
        let selected = select(&["exp1"]);

        cache.get(&records, &selected);
        cache.clear();
        cache.get(&records, &selected);
        assert_eq!(cache.recomputations(), 2);
    }
}
