use std::borrow::Cow;
use std::fmt::Display;

use serde::{Deserialize, Serialize};

use super::assembler::LogAssembler;
use super::mapping::{map_row, ColumnMapping};
use super::trace_grouper::TraceGrouper;
use crate::event_log::event_log_struct::{
    Attributes, EventLog, EventLogClassifier, EventLogExtension,
};

///
/// Error encountered while converting CSV rows to an event log
///
/// Conversion is all-or-nothing: the first offending row aborts the whole
/// conversion and no partial document is ever produced. Row indices are
/// 1-based and count data rows (the header row is row 0).
///
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub enum ConversionError {
    /// CSV parsing error
    Csv(String),
    /// A mapped source column is absent from a row and has no default
    MissingColumn {
        /// Row where the error occurred
        row: usize,
        /// Canonical field name (e.g., `concept:name`)
        field: String,
        /// Source column name that was looked up
        column: String,
    },
    /// The timestamp field could not be parsed under any supported format
    InvalidTimestamp {
        /// Row where the error occurred
        row: usize,
        /// The unparseable timestamp value
        value: String,
    },
    /// The case-ID column value is empty or absent in a row
    EmptyCaseId {
        /// Row where the error occurred
        row: usize,
    },
    /// A row has fewer fields than the header (usually a wrong delimiter)
    ColumnCountMismatch {
        /// Row where the error occurred
        row: usize,
        /// Number of header columns
        expected: usize,
        /// Number of fields found in the row
        got: usize,
    },
}

impl Display for ConversionError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Csv(e) => write!(f, "CSV error: {e}"),
            Self::MissingColumn { row, field, column } => {
                write!(f, "Missing column '{column}' for field '{field}' at row {row}")
            }
            Self::InvalidTimestamp { row, value } => {
                write!(f, "Invalid timestamp at row {row}: '{value}'")
            }
            Self::EmptyCaseId { row } => write!(f, "Empty case ID at row {row}"),
            Self::ColumnCountMismatch { row, expected, got } => write!(
                f,
                "Row {row} has {got} fields but the header has {expected} (wrong delimiter?)"
            ),
        }
    }
}

impl std::error::Error for ConversionError {}

impl From<csv::Error> for ConversionError {
    fn from(e: csv::Error) -> Self {
        Self::Csv(e.to_string())
    }
}

/// Character encoding of the CSV input
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub enum CsvEncoding {
    /// UTF-8 (invalid sequences replaced)
    #[default]
    Utf8,
    /// ISO 8859-1 / Latin-1
    Latin1,
}

///
/// Options for one CSV to XES conversion
///
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ConvertOptions {
    /// Field delimiter (commonly `b','` or `b';'`)
    pub delimiter: u8,
    /// Character encoding of the input bytes
    pub encoding: CsvEncoding,
    /// Optional date format to try first when parsing timestamps
    ///
    /// See <https://docs.rs/chrono/latest/chrono/format/strftime/index.html> for available specifiers.
    pub date_format: Option<String>,
    /// Install the default Time/Lifecycle/Concept extensions before any custom ones
    pub use_default_extensions: bool,
    /// Custom XES extensions
    pub extensions: Vec<EventLogExtension>,
    /// Event classifiers to declare in the log
    pub classifiers: Vec<EventLogClassifier>,
    /// Global trace attribute declarations
    pub global_trace_attrs: Attributes,
    /// Global event attribute declarations
    pub global_event_attrs: Attributes,
    /// Caller-supplied top-level log attributes
    pub log_attrs: Attributes,
}

impl Default for ConvertOptions {
    fn default() -> Self {
        Self {
            delimiter: b',',
            encoding: CsvEncoding::default(),
            date_format: None,
            use_default_extensions: true,
            extensions: Vec::new(),
            classifiers: Vec::new(),
            global_trace_attrs: Vec::new(),
            global_event_attrs: Vec::new(),
            log_attrs: Vec::new(),
        }
    }
}

///
/// Convert CSV data (with a header row) into an [`EventLog`]
///
/// Blocking, side-effect-free and atomic: either the complete document is
/// returned, or the error of the first offending row. The entire row set is
/// materialized in memory for the duration of the call, since a case can only
/// be closed once all rows have been consumed. Multiple conversions may run
/// concurrently without coordination; no state is shared between calls.
///
pub fn convert_csv_to_log(
    data: &[u8],
    mapping: &ColumnMapping,
    options: &ConvertOptions,
) -> Result<EventLog, ConversionError> {
    let decoded = decode(data, options.encoding);
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(options.delimiter)
        .flexible(true)
        .from_reader(decoded.as_bytes());
    let headers: Vec<String> = reader.headers()?.iter().map(str::to_string).collect();

    let mut grouper = TraceGrouper::new();
    for (i, result) in reader.records().enumerate() {
        let row = i + 1;
        let record = result?;
        if record.len() < headers.len() {
            return Err(ConversionError::ColumnCountMismatch {
                row,
                expected: headers.len(),
                got: record.len(),
            });
        }
        let (case_id, event) = map_row(
            mapping,
            &headers,
            &record,
            row,
            options.date_format.as_deref(),
        )?;
        grouper.push(case_id, event);
    }

    Ok(LogAssembler::new(options).build(grouper.into_groups()))
}

fn decode(data: &[u8], encoding: CsvEncoding) -> Cow<'_, str> {
    match encoding {
        CsvEncoding::Utf8 => String::from_utf8_lossy(data),
        // Latin-1 bytes map 1:1 onto the first 256 Unicode code points
        CsvEncoding::Latin1 => Cow::Owned(data.iter().map(|&b| b as char).collect()),
    }
}
