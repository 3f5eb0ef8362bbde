mod deals;
mod transactions;

use tracing::warn;

use crate::classify::join_cells;
use crate::error::ConvertError;
use crate::metadata::Metadata;
use crate::model::{NormalizedTable, Record, Row};
use crate::vocabulary::{
    DEALS_FILE_MARKER, FOREX_MARKER, INSTRUMENTS_MARKER, TRANSACTIONS_FILE_MARKER,
};

pub use deals::{normalize_forex, normalize_instruments};
pub use transactions::normalize_transactions;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportKind {
    Transactions,
    Deals,
}

impl ReportKind {
    #[must_use]
    pub fn from_file_name(file_name: &str) -> Option<Self> {
        if file_name.contains(TRANSACTIONS_FILE_MARKER) {
            Some(Self::Transactions)
        } else if file_name.contains(DEALS_FILE_MARKER) {
            Some(Self::Deals)
        } else {
            None
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DealsKind {
    Instruments,
    Forex,
}

impl DealsKind {
    #[must_use]
    pub fn from_first_row(row: &[String]) -> Option<Self> {
        let joined = join_cells(row);
        if joined.contains(INSTRUMENTS_MARKER) {
            Some(Self::Instruments)
        } else if joined.contains(FOREX_MARKER) {
            Some(Self::Forex)
        } else {
            None
        }
    }
}

/// Normalizes the rows of one export. `Ok(None)` means the export is not a
/// recognized report and was skipped.
pub fn normalize_rows(
    file_name: &str,
    rows: &[Row],
    metadata: &Metadata,
) -> Result<Option<NormalizedTable>, ConvertError> {
    match ReportKind::from_file_name(file_name) {
        Some(ReportKind::Transactions) => normalize_transactions(rows, metadata),
        Some(ReportKind::Deals) => {
            let kind = rows.first().and_then(|row| DealsKind::from_first_row(row));
            match kind {
                Some(DealsKind::Instruments) => normalize_instruments(rows, metadata).map(Some),
                Some(DealsKind::Forex) => normalize_forex(rows, metadata).map(Some),
                None => {
                    warn!(file_name, "deals export of unknown kind; skipping");
                    Ok(None)
                }
            }
        }
        None => {
            warn!(file_name, "not a deals or cash transactions export; skipping");
            Ok(None)
        }
    }
}

pub(crate) fn trim_trailing_empty(row: &[String]) -> &[String] {
    let width = row
        .iter()
        .rposition(|cell| !cell.trim().is_empty())
        .map_or(0, |last| last + 1);
    &row[..width]
}

/// Renames repeated field names, walking from the right: each repeated name
/// gets the number of copies still carrying it appended, so `[A, B, A]`
/// becomes `[A, B, A2]`.
pub(crate) fn disambiguate_duplicates(fields: &mut [String]) {
    for index in (0..fields.len()).rev() {
        let name = fields[index].clone();
        let copies = fields.iter().filter(|field| **field == name).count();
        if copies > 1 {
            fields[index] = format!("{name}{copies}");
        }
    }
}

pub(crate) fn find_block_end(
    rows: &[Row],
    from: usize,
    marker: &str,
) -> Result<usize, ConvertError> {
    rows.iter()
        .enumerate()
        .skip(from)
        .find(|(_, row)| row.iter().any(|cell| cell.contains(marker)))
        .map(|(index, _)| index)
        .ok_or_else(|| ConvertError::MissingMarker {
            marker: marker.to_string(),
            row: from,
        })
}

pub(crate) fn record_from_row(
    fields: &[String],
    row: &[String],
    row_index: usize,
) -> Result<Record, ConvertError> {
    if row.len() > fields.len() {
        return Err(ConvertError::RowWiderThanHeader {
            row: row_index,
            width: row.len(),
            header_width: fields.len(),
        });
    }

    let mut record = Record::new();
    for (field, cell) in fields.iter().zip(row) {
        record.set(field.as_str(), cell.as_str());
    }
    Ok(record)
}

pub(crate) fn output_fields(mut fields: Vec<String>, metadata: &Metadata) -> Vec<String> {
    disambiguate_duplicates(&mut fields);
    metadata.append_fields(&mut fields);
    fields
}
