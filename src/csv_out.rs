use std::io::Write;
use std::path::Path;

use csv::{Terminator, Writer, WriterBuilder};

use crate::error::ConvertError;
use crate::model::{NormalizedTable, Row};
use crate::options::Dialect;

fn builder(dialect: Dialect) -> WriterBuilder {
    let mut builder = WriterBuilder::new();
    builder
        .delimiter(dialect.delimiter)
        .terminator(Terminator::CRLF)
        .flexible(true);
    builder
}

fn write_rows_into<W: Write>(writer: &mut Writer<W>, rows: &[Row]) -> Result<(), ConvertError> {
    for row in rows {
        writer.write_record(row)?;
    }
    writer.flush()?;
    Ok(())
}

fn write_table_into<W: Write>(
    writer: &mut Writer<W>,
    table: &NormalizedTable,
) -> Result<(), ConvertError> {
    writer.write_record(&table.fields)?;
    for record in &table.records {
        writer.write_record(record.to_row(&table.fields))?;
    }
    writer.flush()?;
    Ok(())
}

fn into_string(writer: Writer<Vec<u8>>) -> Result<String, ConvertError> {
    let bytes = writer
        .into_inner()
        .map_err(|error| ConvertError::Csv(error.into_error().into()))?;
    String::from_utf8(bytes)
        .map_err(|error| ConvertError::InvalidOption(format!("invalid utf-8 output: {error}")))
}

pub fn write_rows(path: &Path, rows: &[Row], dialect: Dialect) -> Result<(), ConvertError> {
    let mut writer = builder(dialect).from_path(path)?;
    write_rows_into(&mut writer, rows)
}

pub fn write_rows_to_string(rows: &[Row], dialect: Dialect) -> Result<String, ConvertError> {
    let mut writer = builder(dialect).from_writer(Vec::<u8>::new());
    write_rows_into(&mut writer, rows)?;
    into_string(writer)
}

pub fn write_table(
    path: &Path,
    table: &NormalizedTable,
    dialect: Dialect,
) -> Result<(), ConvertError> {
    let mut writer = builder(dialect).from_path(path)?;
    write_table_into(&mut writer, table)
}

pub fn write_table_to_string(
    table: &NormalizedTable,
    dialect: Dialect,
) -> Result<String, ConvertError> {
    let mut writer = builder(dialect).from_writer(Vec::<u8>::new());
    write_table_into(&mut writer, table)?;
    into_string(writer)
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::{write_rows_to_string, write_table_to_string};
    use crate::model::{NormalizedTable, Record};
    use crate::options::Dialect;
    use crate::source::parse_delimited;

    fn row(cells: &[&str]) -> Vec<String> {
        cells.iter().map(|cell| (*cell).to_string()).collect()
    }

    #[test]
    fn table_rows_survive_a_write_read_cycle() {
        let rows = vec![
            row(&["Дата", "Сумма", "Комментарий"]),
            row(&["01.02.2020", "1 000,50", "with \"quotes\""]),
            row(&["02.02.2020", "", "a;b,c"]),
            row(&["short"]),
        ];

        let text = write_rows_to_string(&rows, Dialect::EXCEL_TAB).expect("rows should write");
        let parsed = parse_delimited(&text, b'\t').expect("rows should parse");
        assert_eq!(parsed, rows);
    }

    #[test]
    fn records_render_missing_fields_as_empty() {
        let mut first = Record::new();
        first.set("A", "1");
        first.set("C", "3");
        let table = NormalizedTable {
            fields: vec!["A".to_string(), "B".to_string(), "C".to_string()],
            records: vec![first],
        };

        let text = write_table_to_string(&table, Dialect { delimiter: b';' })
            .expect("table should write");
        assert_eq!(text, "A;B;C\r\n1;;3\r\n");
    }
}
