use tracing::debug;

use super::{find_block_end, output_fields, record_from_row, trim_trailing_empty};
use crate::error::ConvertError;
use crate::metadata::Metadata;
use crate::model::{NormalizedTable, Row};
use crate::vocabulary::{
    FROM_FIELD, INSTRUMENTS_HEADER_ROW, ISIN_FIELD, ISIN_MARKER, LOT_CURRENCY_FIELD,
    LOT_CURRENCY_MARKER, PAIRED_CURRENCY_FIELD, PAYMENT_AMOUNT_COLUMN, SUBTOTAL_MARKER,
    TICKER_CELL, TICKER_FIELD, TO_FIELD,
};

pub fn normalize_instruments(
    rows: &[Row],
    metadata: &Metadata,
) -> Result<NormalizedTable, ConvertError> {
    let missing_header = || ConvertError::MissingHeaderColumn {
        column: PAYMENT_AMOUNT_COLUMN.to_string(),
        row: INSTRUMENTS_HEADER_ROW,
    };
    let header = rows
        .get(INSTRUMENTS_HEADER_ROW)
        .map(|row| trim_trailing_empty(row))
        .ok_or_else(missing_header)?;
    if !header.iter().any(|cell| cell == PAYMENT_AMOUNT_COLUMN) {
        return Err(missing_header());
    }

    let mut fields = header.to_vec();
    fields.push(TICKER_FIELD.to_string());
    fields.push(ISIN_FIELD.to_string());
    let fields = output_fields(fields, metadata);

    let mut records = Vec::new();
    let mut index = INSTRUMENTS_HEADER_ROW + 1;
    while index < rows.len() {
        let row = &rows[index];
        let Some(marker) = row.iter().position(|cell| cell == ISIN_MARKER) else {
            index += 1;
            continue;
        };

        let isin = row
            .get(marker + 1)
            .filter(|value| !value.trim().is_empty())
            .ok_or_else(|| ConvertError::MissingMarker {
                marker: format!("{ISIN_MARKER} value"),
                row: index,
            })?;
        let ticker = row.get(TICKER_CELL).ok_or_else(|| ConvertError::MissingMarker {
            marker: "ticker".to_string(),
            row: index,
        })?;
        let end = find_block_end(rows, index, SUBTOTAL_MARKER)?;

        let block = rows.get(index + 1..end).unwrap_or_default();
        for (offset, data) in block.iter().enumerate() {
            let mut record =
                record_from_row(&fields, trim_trailing_empty(data), index + 1 + offset)?;
            record.set(TICKER_FIELD, ticker.as_str());
            record.set(ISIN_FIELD, isin.as_str());
            metadata.apply(&mut record);
            records.push(record);
        }
        debug!(%isin, %ticker, rows = block.len(), "instrument block");
        index = end + 1;
    }

    Ok(NormalizedTable { fields, records })
}

pub fn normalize_forex(rows: &[Row], metadata: &Metadata) -> Result<NormalizedTable, ConvertError> {
    let header = rows.first().map_or(&[][..], |row| trim_trailing_empty(row));

    let mut fields = header.to_vec();
    fields.push(FROM_FIELD.to_string());
    fields.push(TO_FIELD.to_string());
    let fields = output_fields(fields, metadata);

    let mut records = Vec::new();
    let mut index = 1;
    while index < rows.len() {
        let row = &rows[index];
        if !row.iter().any(|cell| cell == LOT_CURRENCY_MARKER) {
            index += 1;
            continue;
        }

        let lot_currency = value_after(row, LOT_CURRENCY_FIELD, index)?;
        let paired_currency = value_after(row, PAIRED_CURRENCY_FIELD, index)?;
        let end = find_block_end(rows, index, SUBTOTAL_MARKER)?;

        let block = rows.get(index + 1..end).unwrap_or_default();
        for (offset, data) in block.iter().enumerate() {
            let mut record =
                record_from_row(&fields, trim_trailing_empty(data), index + 1 + offset)?;
            record.set(FROM_FIELD, paired_currency);
            record.set(TO_FIELD, lot_currency);
            metadata.apply(&mut record);
            records.push(record);
        }
        debug!(
            from = paired_currency,
            to = lot_currency,
            rows = block.len(),
            "forex block"
        );
        // The subtotal row is looked at again as a possible block start.
        index = end.max(index + 1);
    }

    Ok(NormalizedTable { fields, records })
}

fn value_after<'a>(
    row: &'a [String],
    label: &str,
    row_index: usize,
) -> Result<&'a str, ConvertError> {
    let missing = || ConvertError::MissingMarker {
        marker: label.to_string(),
        row: row_index,
    };
    let position = row
        .iter()
        .position(|cell| cell.contains(label))
        .ok_or_else(missing)?;
    row[position + 1..]
        .iter()
        .find(|cell| !cell.trim().is_empty())
        .map(String::as_str)
        .ok_or_else(missing)
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::{normalize_forex, normalize_instruments};
    use crate::error::ConvertError;
    use crate::metadata::Metadata;
    use crate::model::Row;

    fn row(cells: &[&str]) -> Row {
        cells.iter().map(|cell| (*cell).to_string()).collect()
    }

    fn instrument_rows() -> Vec<Row> {
        vec![
            row(&["Вид: Акция", "", ""]),
            row(&["Сделки с ценными бумагами", "", ""]),
            row(&["Дата", "Количество", "Цена", "Сумма платежа", "Цена", "", ""]),
            row(&["Основной рынок", "", ""]),
            row(&["Акция Сбербанк", "SBER", "ISIN:", "RU0009029540", ""]),
            row(&["01.02.2020", "10", "250", "2500", "250", ""]),
            row(&["03.02.2020", "5", "255", "1275", "255"]),
            row(&["Итого по SBER:", "15", "", "3775", ""]),
            row(&["Акция Газпром", "GAZP", "ISIN:", "RU0007661625"]),
            row(&["04.02.2020", "1", "200", "200", "200"]),
            row(&["Итого по GAZP:", "1"]),
            row(&["Итого по рынку:", "16"]),
        ]
    }

    #[test]
    fn instrument_blocks_are_tagged_with_ticker_and_isin() {
        let mut metadata = Metadata::new();
        metadata.insert("Account", "X1");
        let table = normalize_instruments(&instrument_rows(), &metadata)
            .expect("instrument deals should normalize");

        assert_eq!(
            table.fields,
            vec![
                "Дата",
                "Количество",
                "Цена",
                "Сумма платежа",
                "Цена2",
                "Ticker",
                "ISIN",
                "Account"
            ]
        );
        assert_eq!(table.records.len(), 3);

        let first = table.records[0].to_row(&table.fields);
        assert_eq!(
            first,
            vec!["01.02.2020", "10", "250", "2500", "250", "SBER", "RU0009029540", "X1"]
        );
        let last = &table.records[2];
        assert_eq!(last.get("Ticker"), Some("GAZP"));
        assert_eq!(last.get("ISIN"), Some("RU0007661625"));
        assert!(table.records.iter().all(|record| record.get("Account") == Some("X1")));
    }

    #[test]
    fn instrument_header_needs_payment_column() {
        let mut rows = instrument_rows();
        rows[2] = row(&["Дата", "Количество"]);
        let err = normalize_instruments(&rows, &Metadata::new()).expect_err("header is invalid");
        assert!(matches!(err, ConvertError::MissingHeaderColumn { row: 2, .. }));
    }

    #[test]
    fn isin_marker_without_value_fails() {
        let mut rows = instrument_rows();
        rows[4] = row(&["Акция Сбербанк", "SBER", "ISIN:", ""]);
        let err = normalize_instruments(&rows, &Metadata::new()).expect_err("isin is missing");
        assert!(matches!(err, ConvertError::MissingMarker { row: 4, .. }));
    }

    #[test]
    fn instrument_block_without_subtotal_fails() {
        let mut rows = instrument_rows();
        rows.truncate(10);
        let err = normalize_instruments(&rows, &Metadata::new()).expect_err("block is open");
        assert!(matches!(err, ConvertError::MissingMarker { row: 8, .. }));
    }

    fn forex_rows() -> Vec<Row> {
        vec![
            row(&["Дата", "Объём в валюте лота (в ед. валюты)", "Курс", "", ""]),
            row(&["Валюта лота:", "", "USD", "Сопряж. валюта", "", "RUB"]),
            row(&["10.03.2020", "1000", "72.5"]),
            row(&["11.03.2020", "500", "73.1"]),
            row(&["Итого по USD:", "1500"]),
            row(&["Валюта лота:", "EUR", "Сопряж. валюта", "USD"]),
            row(&["12.03.2020", "100", "1.1"]),
            row(&["Итого по EUR:", "100"]),
        ]
    }

    #[test]
    fn forex_blocks_carry_currency_pair() {
        let mut metadata = Metadata::new();
        metadata.insert("Account", "X1");
        let table = normalize_forex(&forex_rows(), &metadata).expect("forex should normalize");

        assert_eq!(
            table.fields,
            vec![
                "Дата",
                "Объём в валюте лота (в ед. валюты)",
                "Курс",
                "From",
                "To",
                "Account"
            ]
        );
        assert_eq!(table.records.len(), 3);
        assert_eq!(
            table.records[0].to_row(&table.fields),
            vec!["10.03.2020", "1000", "72.5", "RUB", "USD", "X1"]
        );
        assert_eq!(table.records[2].get("From"), Some("USD"));
        assert_eq!(table.records[2].get("To"), Some("EUR"));
    }

    #[test]
    fn forex_block_without_counter_currency_fails() {
        let mut rows = forex_rows();
        rows[1] = row(&["Валюта лота:", "USD"]);
        let err = normalize_forex(&rows, &Metadata::new()).expect_err("pair is missing");
        assert!(matches!(err, ConvertError::MissingMarker { row: 1, .. }));
    }
}
