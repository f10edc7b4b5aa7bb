use std::fmt;

use super::error::ParseError;
use super::model::Record;

/// Header names every experiment log must carry, in the order they are checked.
pub const REQUIRED_COLUMNS: [&str; 4] = ["experiment_id", "metric_name", "step", "value"];

const DELIMITER: char = ',';

// ---------------------------------------------------------------------------
// Parse result
// ---------------------------------------------------------------------------

/// A data row that was dropped without aborting the parse.
///
/// `row` is the 1-based line number in the file, so the first data row is 2.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RowDefect {
    /// Field count differs from the header's.
    ColumnCount {
        row: usize,
        expected: usize,
        actual: usize,
    },
    /// `step` is not a base-10 integer or `value` is not a finite number.
    InvalidNumber { row: usize, line: String },
    /// `experiment_id` or `metric_name` is blank.
    EmptyIdentifier { row: usize, column: &'static str },
}

impl RowDefect {
    pub fn row(&self) -> usize {
        match self {
            RowDefect::ColumnCount { row, .. }
            | RowDefect::InvalidNumber { row, .. }
            | RowDefect::EmptyIdentifier { row, .. } => *row,
        }
    }
}

impl fmt::Display for RowDefect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RowDefect::ColumnCount {
                row,
                expected,
                actual,
            } => write!(
                f,
                "Row {row}: Mismatched number of columns. Expected {expected}, got {actual}. Skipping."
            ),
            RowDefect::InvalidNumber { row, line } => {
                write!(f, "Could not parse row {row}: \"{line}\". Skipping.")
            }
            RowDefect::EmptyIdentifier { row, column } => {
                write!(f, "Row {row}: empty {column}. Skipping.")
            }
        }
    }
}

/// Outcome of a structurally valid parse: accepted records plus skipped rows.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParsedTable {
    pub records: Vec<Record>,
    pub defects: Vec<RowDefect>,
}

impl ParsedTable {
    /// Number of records that made it through validation.
    pub fn accepted(&self) -> usize {
        self.records.len()
    }

    /// Number of non-blank data rows that were dropped.
    pub fn skipped(&self) -> usize {
        self.defects.len()
    }

    /// Human-readable load summary, e.g. `"42 data points parsed successfully (3 rows skipped)."`
    pub fn summary(&self) -> String {
        match self.skipped() {
            0 => format!("{} data points parsed successfully.", self.accepted()),
            1 => format!(
                "{} data points parsed successfully (1 row skipped).",
                self.accepted()
            ),
            n => format!(
                "{} data points parsed successfully ({n} rows skipped).",
                self.accepted()
            ),
        }
    }
}

// ---------------------------------------------------------------------------
// Column layout
// ---------------------------------------------------------------------------

/// Header positions of the required columns, resolved once per parse.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct ColumnLayout {
    experiment_id: usize,
    metric_name: usize,
    step: usize,
    value: usize,
    /// Total header field count; every data row must match it.
    width: usize,
}

impl ColumnLayout {
    /// First matching header field wins. Missing columns are reported in
    /// `REQUIRED_COLUMNS` order, so only the first absent one is named.
    fn resolve(header: &[&str]) -> Result<Self, ParseError> {
        let find = |name: &str| {
            header
                .iter()
                .position(|h| *h == name)
                .ok_or_else(|| ParseError::MissingColumn(name.to_string()))
        };
        let [experiment_id, metric_name, step, value] = REQUIRED_COLUMNS;
        Ok(ColumnLayout {
            experiment_id: find(experiment_id)?,
            metric_name: find(metric_name)?,
            step: find(step)?,
            value: find(value)?,
            width: header.len(),
        })
    }
}

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Parse the text of a comma-separated experiment log.
///
/// Layout: one header row naming at least `experiment_id`, `metric_name`,
/// `step` and `value` (any order, extra columns ignored), followed by data
/// rows of the same width. No quoting or escaping is supported.
///
/// Only structural problems (no data, missing column) fail the whole parse.
/// Bad rows are dropped and reported in [`ParsedTable::defects`]; blank lines
/// are skipped without a report.
pub fn parse_table(content: &str) -> Result<ParsedTable, ParseError> {
    let content = content.strip_prefix('\u{feff}').unwrap_or(content).trim_end();

    // `lines` accepts both `\n` and `\r\n`.
    let lines: Vec<&str> = content.lines().collect();
    if lines.len() < 2 {
        return Err(ParseError::EmptyOrHeaderOnly);
    }

    let header: Vec<&str> = lines[0].split(DELIMITER).map(str::trim).collect();
    let layout = ColumnLayout::resolve(&header)?;
    log::debug!("Resolved column layout {layout:?} from header {header:?}");

    let mut table = ParsedTable::default();
    for (i, line) in lines[1..].iter().enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        match parse_row(&layout, i + 2, line) {
            Ok(record) => table.records.push(record),
            Err(defect) => {
                log::warn!("{defect}");
                table.defects.push(defect);
            }
        }
    }

    Ok(table)
}

fn parse_row(layout: &ColumnLayout, row: usize, line: &str) -> Result<Record, RowDefect> {
    let fields: Vec<&str> = line.split(DELIMITER).collect();
    if fields.len() != layout.width {
        return Err(RowDefect::ColumnCount {
            row,
            expected: layout.width,
            actual: fields.len(),
        });
    }

    let experiment_id = fields[layout.experiment_id].trim();
    let metric_name = fields[layout.metric_name].trim();

    let step = fields[layout.step].trim().parse::<i64>().ok();
    let value = fields[layout.value]
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite());
    let (Some(step), Some(value)) = (step, value) else {
        return Err(RowDefect::InvalidNumber {
            row,
            line: line.to_string(),
        });
    };

    if experiment_id.is_empty() {
        return Err(RowDefect::EmptyIdentifier {
            row,
            column: "experiment_id",
        });
    }
    if metric_name.is_empty() {
        return Err(RowDefect::EmptyIdentifier {
            row,
            column: "metric_name",
        });
    }

    Ok(Record::new(experiment_id, metric_name, step, value))
}
