use thiserror::Error;

/// Structural failures that abort a parse.
///
/// Row-level problems are never reported here; see
/// [`RowDefect`](super::parser::RowDefect).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// Fewer than two lines after trimming: no header, or a header with no data.
    #[error("CSV file is empty or has only a header.")]
    EmptyOrHeaderOnly,

    /// A required column is absent from the header row.
    #[error("Missing required column: {0}")]
    MissingColumn(String),
}
