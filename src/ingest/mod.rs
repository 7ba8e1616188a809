//! Sales record ingestion.
//!
//! Turns an external record source into the strictly ordered `TimeSeries`
//! the analysis core consumes. Parsing problems belong to this module's
//! error domain, not the core's.
//!
//! Submodules:
//! - `sales_csv`: CSV files with a timestamp column and a numeric value column.

pub mod sales_csv;

pub use sales_csv::{load_sales_csv, parse_sales_csv, CsvLayout};

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

/// Errors that can arise when reading a sales record source.
#[derive(Debug)]
pub enum IngestError {
    /// The source file could not be opened or read.
    Io(std::io::Error),
    /// The CSV reader rejected the input.
    Csv(csv::Error),
    /// A configured column is not present in the header row.
    MissingColumn(String),
    /// A timestamp cell did not match the configured format.
    BadTimestamp { row: usize, value: String },
    /// A value cell is not a finite number.
    BadValue { row: usize, value: String },
    /// The source holds a header but no records.
    Empty,
}

impl std::fmt::Display for IngestError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            IngestError::Io(e) => write!(f, "I/O error: {}", e),
            IngestError::Csv(e) => write!(f, "CSV error: {}", e),
            IngestError::MissingColumn(name) => write!(f, "Missing column: {}", name),
            IngestError::BadTimestamp { row, value } => {
                write!(f, "Unparseable timestamp on row {}: '{}'", row, value)
            }
            IngestError::BadValue { row, value } => {
                write!(f, "Unparseable value on row {}: '{}'", row, value)
            }
            IngestError::Empty => write!(f, "No records found"),
        }
    }
}

impl std::error::Error for IngestError {}

impl From<std::io::Error> for IngestError {
    fn from(e: std::io::Error) -> Self {
        IngestError::Io(e)
    }
}

impl From<csv::Error> for IngestError {
    fn from(e: csv::Error) -> Self {
        IngestError::Csv(e)
    }
}
