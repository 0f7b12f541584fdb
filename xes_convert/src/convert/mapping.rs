use serde::{Deserialize, Serialize};

use super::pipeline::ConversionError;
use crate::event_log::constants::{
    ACTIVITY_NAME, LIFECYCLE_COMPLETE, LIFECYCLE_TRANSITION_NAME, TIMESTAMP_NAME,
};
use crate::event_log::timestamp::{parse_timestamp, Timestamp};

///
/// Mapping of one canonical event field to a source CSV column
///
/// The default policy is explicit and caller-visible: with `default: Some(..)`
/// a missing column silently yields the default value; with `default: None` a
/// missing column fails the whole conversion with
/// [`ConversionError::MissingColumn`].
///
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct FieldMapping {
    /// Name of the source column in the CSV header
    pub column: String,
    /// Value to use when the column is absent from a row (`None` = required)
    #[serde(default)]
    pub default: Option<String>,
}

impl FieldMapping {
    /// Mapping for a required column (no default)
    pub fn required(column: impl Into<String>) -> Self {
        Self {
            column: column.into(),
            default: None,
        }
    }

    /// Mapping with a fallback value for rows missing the column
    pub fn with_default(column: impl Into<String>, default: impl Into<String>) -> Self {
        Self {
            column: column.into(),
            default: Some(default.into()),
        }
    }
}

///
/// Configuration mapping raw CSV columns to canonical event fields
///
/// The case-ID column is consumed first and never becomes an event attribute.
/// All remaining unmapped columns with non-empty values are folded into the
/// event as extra string attributes, in their original column order.
///
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ColumnMapping {
    /// Column holding the case identifier (groups rows into traces)
    pub case_id_column: String,
    /// Column holding the activity name (`concept:name`)
    pub activity: FieldMapping,
    /// Column holding the event timestamp (`time:timestamp`)
    pub timestamp: FieldMapping,
    /// Column holding the lifecycle transition (`lifecycle:transition`)
    ///
    /// When `None`, every event gets the literal `"complete"`.
    #[serde(default)]
    pub lifecycle: Option<FieldMapping>,
    /// Further mapped fields as (attribute key, column mapping) pairs
    #[serde(default)]
    pub additional: Vec<(String, FieldMapping)>,
}

impl ColumnMapping {
    /// Create a mapping from the three required column names
    pub fn new(
        case_id_column: impl Into<String>,
        activity_column: impl Into<String>,
        timestamp_column: impl Into<String>,
    ) -> Self {
        Self {
            case_id_column: case_id_column.into(),
            activity: FieldMapping::required(activity_column),
            timestamp: FieldMapping::required(timestamp_column),
            lifecycle: None,
            additional: Vec::new(),
        }
    }
}

///
/// Canonical event-field record produced from one CSV row
///
/// Fixed known fields plus ordered side maps for further mapped fields and
/// unmapped extras.
///
#[derive(Debug, Clone, PartialEq)]
pub struct EventRecord {
    /// Activity name (`concept:name`)
    pub activity: String,
    /// Normalized event timestamp (`time:timestamp`)
    pub timestamp: Timestamp,
    /// Lifecycle transition (`lifecycle:transition`)
    pub lifecycle: String,
    /// Further mapped fields, in mapping order
    pub additional: Vec<(String, String)>,
    /// Unmapped non-empty columns, in column order
    pub extras: Vec<(String, String)>,
}

///
/// Map one raw CSV row to its case ID and canonical [`EventRecord`]
///
/// `row` is the 1-based index of the data row, used in error diagnostics.
/// Pure transform; the record is untouched on error.
///
pub fn map_row(
    mapping: &ColumnMapping,
    headers: &[String],
    record: &csv::StringRecord,
    row: usize,
    date_format: Option<&str>,
) -> Result<(String, EventRecord), ConversionError> {
    // Cells in column order; consumed cells are taken out so the remainder
    // can be folded into extras afterwards.
    let mut cells: Vec<Option<(&str, &str)>> = headers
        .iter()
        .map(String::as_str)
        .zip(record.iter())
        .map(Some)
        .collect();

    let case_id = match take_cell(&mut cells, &mapping.case_id_column) {
        Some(id) if !id.trim().is_empty() => id,
        _ => return Err(ConversionError::EmptyCaseId { row }),
    };

    let activity = resolve_field(&mut cells, &mapping.activity, ACTIVITY_NAME, row)?;
    let raw_timestamp = resolve_field(&mut cells, &mapping.timestamp, TIMESTAMP_NAME, row)?;
    let lifecycle = match &mapping.lifecycle {
        Some(field) => resolve_field(&mut cells, field, LIFECYCLE_TRANSITION_NAME, row)?,
        None => LIFECYCLE_COMPLETE.to_string(),
    };
    let mut additional = Vec::with_capacity(mapping.additional.len());
    for (key, field) in &mapping.additional {
        additional.push((key.clone(), resolve_field(&mut cells, field, key, row)?));
    }

    let timestamp = parse_timestamp(&raw_timestamp, date_format).map_err(|_| {
        ConversionError::InvalidTimestamp {
            row,
            value: raw_timestamp.clone(),
        }
    })?;

    let extras = cells
        .into_iter()
        .flatten()
        .filter(|(_, v)| !v.is_empty())
        .map(|(h, v)| (h.to_string(), v.to_string()))
        .collect();

    Ok((
        case_id,
        EventRecord {
            activity,
            timestamp,
            lifecycle,
            additional,
            extras,
        },
    ))
}

/// Consume the cell of the given column, if present and not yet consumed
fn take_cell(cells: &mut [Option<(&str, &str)>], column: &str) -> Option<String> {
    cells
        .iter_mut()
        .find(|c| c.is_some_and(|(h, _)| h == column))
        .and_then(Option::take)
        .map(|(_, v)| v.to_string())
}

fn resolve_field(
    cells: &mut [Option<(&str, &str)>],
    field: &FieldMapping,
    key: &str,
    row: usize,
) -> Result<String, ConversionError> {
    match take_cell(cells, &field.column) {
        Some(v) => Ok(v),
        None => match &field.default {
            Some(d) => Ok(d.clone()),
            None => Err(ConversionError::MissingColumn {
                row,
                field: key.to_string(),
                column: field.column.clone(),
            }),
        },
    }
}
