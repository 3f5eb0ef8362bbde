use std::sync::LazyLock;

use regex::Regex;

use crate::model::Row;

static SECTION_HEADER_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*\d{1,2}\.(?:\d{1,2}\.)*\d{0,2}\s+\w")
        .expect("hardcoded section header regex is valid")
});

static FOOTNOTE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*\(\d*\*+\)\s*-").expect("hardcoded footnote regex is valid")
});

pub(crate) fn join_cells(row: &[String]) -> String {
    row.join(" ")
}

pub fn sanitize_row(row: Row) -> Row {
    row.into_iter()
        .map(|cell| {
            if cell.contains(['\r', '\n', '\t']) {
                cell.replace("\r\n", " ").replace(['\r', '\n', '\t'], " ")
            } else {
                cell
            }
        })
        .collect()
}

pub fn is_section_header(row: &[String]) -> bool {
    SECTION_HEADER_RE.is_match(&join_cells(row))
}

pub fn is_empty(row: &[String]) -> bool {
    row.iter().all(|cell| cell.trim().is_empty())
}

pub fn is_footnote_block(rows: &[Row]) -> bool {
    rows.len() > 1 && FOOTNOTE_RE.is_match(&join_cells(&rows[0]))
}
