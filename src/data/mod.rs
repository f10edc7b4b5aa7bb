/// Data layer: core types, parsing, and aggregation.
///
/// Architecture:
/// ```text
///  experiments.csv
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  read file → text
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  parser   │  text → ParsedTable { records, defects }
///   └──────────┘
///        │
///        ▼
///   ┌───────────────┐
///   │ ExperimentLog │  Arc<[Record]>, distinct experiments
///   └───────────────┘
///        │  + selected experiments
///        ▼
///   ┌───────────┐
///   │ aggregate │  records → Vec<MetricSeriesTable>
///   └───────────┘
/// ```

pub mod aggregate;
pub mod error;
pub mod loader;
pub mod model;
pub mod parser;
