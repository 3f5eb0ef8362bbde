use std::path::Path;

use calamine::{Data, Reader, open_workbook_auto};
use csv::{ReaderBuilder, StringRecord};
use encoding_rs::WINDOWS_1251;

use crate::error::ConvertError;
use crate::model::Row;

pub const WORKBOOK_EXTENSIONS: &[&str] = &["xls", "xlsx", "xlsm", "xlsb", "ods"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RawFormat {
    Workbook,
    Delimited(u8),
}

impl RawFormat {
    #[must_use]
    pub fn from_path(path: &Path) -> Option<Self> {
        let extension = extension_of(path)?;
        if WORKBOOK_EXTENSIONS.contains(&extension.as_str()) {
            return Some(Self::Workbook);
        }
        match extension.as_str() {
            "csv" => Some(Self::Delimited(b',')),
            "tsv" => Some(Self::Delimited(b'\t')),
            _ => None,
        }
    }
}

pub(crate) fn extension_of(path: &Path) -> Option<String> {
    path.extension()
        .map(|extension| extension.to_string_lossy().to_ascii_lowercase())
}

pub fn read_rows(path: &Path, format: RawFormat) -> Result<Vec<Row>, ConvertError> {
    match format {
        RawFormat::Workbook => read_workbook_rows(path),
        RawFormat::Delimited(delimiter) => read_delimited_rows(path, delimiter),
    }
}

pub fn read_workbook_rows(path: &Path) -> Result<Vec<Row>, ConvertError> {
    let mut workbook = open_workbook_auto(path)?;
    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| ConvertError::EmptyWorkbook(path.to_path_buf()))??;

    Ok(range
        .rows()
        .map(|cells| cells.iter().map(cell_to_string).collect())
        .collect())
}

fn cell_to_string(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::String(text) => text.clone(),
        Data::Float(value) if value.fract() == 0.0 && value.abs() < 1e15 => format!("{value:.0}"),
        _ => cell.to_string(),
    }
}

pub fn read_delimited_rows(path: &Path, delimiter: u8) -> Result<Vec<Row>, ConvertError> {
    let bytes = std::fs::read(path)?;
    parse_delimited(&decode_text(&bytes), delimiter)
}

pub fn decode_text(bytes: &[u8]) -> String {
    let bytes = bytes.strip_prefix(b"\xEF\xBB\xBF").unwrap_or(bytes);
    match std::str::from_utf8(bytes) {
        Ok(text) => text.to_string(),
        Err(_) => WINDOWS_1251
            .decode_without_bom_handling(bytes)
            .0
            .into_owned(),
    }
}

pub fn parse_delimited(text: &str, delimiter: u8) -> Result<Vec<Row>, ConvertError> {
    split_records(text, delimiter)
        .into_iter()
        .map(|record| parse_record(record, delimiter))
        .collect()
}

// Only a quote at the start of a field opens a quoted field; anywhere else it
// is a plain character, as the csv reader treats it.
fn split_records(text: &str, delimiter: u8) -> Vec<&str> {
    let delimiter = char::from(delimiter);
    let mut records = Vec::new();
    let mut start = 0;
    let mut field_start = true;
    let mut in_quotes = false;
    let mut chars = text.char_indices().peekable();

    while let Some((index, ch)) = chars.next() {
        if in_quotes {
            // A doubled quote is an escaped one and keeps the field open.
            if ch == '"' && chars.next_if(|&(_, next)| next == '"').is_none() {
                in_quotes = false;
            }
            continue;
        }
        match ch {
            '"' if field_start => {
                in_quotes = true;
                field_start = false;
            }
            '\n' => {
                records.push(&text[start..=index]);
                start = index + 1;
                field_start = true;
            }
            ch if ch == delimiter => field_start = true,
            _ => field_start = false,
        }
    }
    if start < text.len() {
        records.push(&text[start..]);
    }
    records
}

fn parse_record(line: &str, delimiter: u8) -> Result<Row, ConvertError> {
    let line = line.trim_end_matches(['\r', '\n']);
    if line.is_empty() {
        return Ok(Row::new());
    }

    let mut reader = ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(false)
        .flexible(true)
        .from_reader(line.as_bytes());
    let mut record = StringRecord::new();
    reader.read_record(&mut record)?;
    Ok(record.iter().map(str::to_string).collect())
}
