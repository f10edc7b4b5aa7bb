use std::path::Path;

use anyhow::{Context, Result, bail};

use super::parser::{ParsedTable, parse_table};

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load an experiment log from a `.csv` file.
///
/// The whole file is read into memory before parsing. Structural parse
/// failures are returned as errors; skipped rows are carried in the
/// returned [`ParsedTable`].
pub fn load_file(path: &Path) -> Result<ParsedTable> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    if ext != "csv" {
        bail!("Unsupported file extension: .{ext} (please select a CSV file)");
    }

    let text = std::fs::read_to_string(path)
        .with_context(|| format!("reading CSV file {}", path.display()))?;
    let table = parse_table(&text).with_context(|| format!("parsing {}", path.display()))?;

    log::info!(
        "Parsed {} records from {} ({} rows skipped)",
        table.accepted(),
        path.display(),
        table.skipped()
    );
    Ok(table)
}
