use tracing::{debug, warn};

use super::output_fields;
use crate::classify::is_empty;
use crate::error::ConvertError;
use crate::metadata::Metadata;
use crate::model::{NormalizedTable, Record, Row};
use crate::vocabulary::{
    ACCOUNT_CURRENCY_CELL, CREDIT_COLUMN, CURRENCY_COLUMN, DATE_COLUMN, DEBIT_COLUMN,
    OPERATION_COLUMN, TOTALS_MARKER,
};

const COPIED_COLUMNS: [&str; 4] = [DATE_COLUMN, OPERATION_COLUMN, CREDIT_COLUMN, DEBIT_COLUMN];

pub fn normalize_transactions(
    rows: &[Row],
    metadata: &Metadata,
) -> Result<Option<NormalizedTable>, ConvertError> {
    let Some(header) = rows
        .get(1)
        .filter(|header| header.iter().any(|cell| cell.contains(OPERATION_COLUMN)))
    else {
        warn!("cash transactions export has no '{OPERATION_COLUMN}' header; skipping");
        return Ok(None);
    };
    let currency = rows[0]
        .get(ACCOUNT_CURRENCY_CELL)
        .ok_or_else(|| ConvertError::MissingMarker {
            marker: "account currency".to_string(),
            row: 0,
        })?;

    // Later duplicates win, as with keyed lookups.
    let column = |name: &str| header.iter().rposition(|cell| cell == name);
    let copied = COPIED_COLUMNS
        .iter()
        .map(|name| (*name, column(*name)))
        .collect::<Vec<_>>();
    let operation_index = column(OPERATION_COLUMN);

    let fields = output_fields(
        COPIED_COLUMNS
            .iter()
            .chain(&[CURRENCY_COLUMN])
            .map(|name| (*name).to_string())
            .collect(),
        metadata,
    );

    let body_end = rows.len().saturating_sub(1).max(2);
    let mut records = Vec::new();
    for (offset, row) in rows[2..body_end].iter().enumerate() {
        let row_index = offset + 2;
        if is_empty(row) {
            continue;
        }
        let operation = operation_index
            .and_then(|index| row.get(index))
            .map_or("", String::as_str);
        if operation.contains(TOTALS_MARKER) {
            debug!(row = row_index, "skipping totals row");
            continue;
        }

        let mut record = Record::new();
        for (name, index) in &copied {
            if let Some(index) = index {
                record.set(*name, row.get(*index).map_or("", String::as_str));
            }
        }
        record.set(CURRENCY_COLUMN, currency.as_str());
        metadata.apply(&mut record);

        let credit = amount(&record, CREDIT_COLUMN, row_index)?;
        let debit = amount(&record, DEBIT_COLUMN, row_index)?;
        if credit > 0.0 && debit > 0.0 {
            let mut debit_side = record.clone();
            record.set(DEBIT_COLUMN, "");
            debit_side.set(CREDIT_COLUMN, "");
            records.push(record);
            records.push(debit_side);
        } else {
            records.push(record);
        }
    }

    Ok(Some(NormalizedTable { fields, records }))
}

fn amount(record: &Record, field: &str, row_index: usize) -> Result<f64, ConvertError> {
    parse_amount(record.get(field).unwrap_or_default()).ok_or_else(|| {
        ConvertError::InvalidAmount {
            value: record.get(field).unwrap_or_default().to_string(),
            row: row_index,
        }
    })
}

fn parse_amount(value: &str) -> Option<f64> {
    let cleaned = value
        .chars()
        .filter(|ch| !ch.is_whitespace())
        .map(|ch| if ch == ',' { '.' } else { ch })
        .collect::<String>();
    if cleaned.is_empty() {
        return Some(0.0);
    }
    cleaned.parse::<f64>().ok()
}
