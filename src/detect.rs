use tracing::{debug, warn};

use crate::classify::{is_empty, is_footnote_block, is_section_header, sanitize_row};
use crate::error::ConvertError;
use crate::model::{Row, TableUnit};
use crate::naming::{section_name, table_file_name};
use crate::options::ConvertOptions;

#[derive(Debug, Clone, PartialEq, Eq)]
enum State {
    Init,
    // Holds a header row until a blank row confirms it opens a section.
    AwaitingSectionName { header: Row },
    AwaitingTable,
    InTable,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RowKind {
    Empty,
    SectionHeader,
    Data,
}

impl RowKind {
    fn of(row: &[String]) -> Self {
        if is_empty(row) {
            Self::Empty
        } else if is_section_header(row) {
            Self::SectionHeader
        } else {
            Self::Data
        }
    }
}

#[derive(Debug)]
pub struct TableBoundaryDetector {
    state: State,
    section_name: String,
    table_count: usize,
    table_name: Option<String>,
    table_rows: Vec<Row>,
    min_table_rows: usize,
    max_name_chars: usize,
}

impl TableBoundaryDetector {
    #[must_use]
    pub fn new(options: &ConvertOptions) -> Self {
        Self {
            state: State::Init,
            section_name: String::new(),
            table_count: 0,
            table_name: None,
            table_rows: Vec::new(),
            min_table_rows: options.min_table_rows,
            max_name_chars: options.max_name_chars,
        }
    }

    pub fn push(&mut self, row: Row) -> Result<Option<TableUnit>, ConvertError> {
        let row = sanitize_row(row);
        let kind = RowKind::of(&row);
        self.step(row, kind)
    }

    /// Ends the stream. Returns the number of rows discarded from an
    /// unterminated table.
    pub fn finish(self) -> usize {
        if self.state == State::InTable && !self.table_rows.is_empty() {
            debug!(
                table = self.table_name.as_deref().unwrap_or_default(),
                rows = self.table_rows.len(),
                "input ended inside a table; dropping it"
            );
            return self.table_rows.len();
        }
        0
    }

    fn step(&mut self, row: Row, kind: RowKind) -> Result<Option<TableUnit>, ConvertError> {
        let state = std::mem::replace(&mut self.state, State::Init);
        match (state, kind) {
            (State::Init | State::AwaitingTable, RowKind::SectionHeader) => {
                self.state = State::AwaitingSectionName { header: row };
            }
            (State::Init, _) => {}
            (State::AwaitingSectionName { header }, RowKind::Empty) => {
                self.section_name = section_name(&header);
                self.table_count = 0;
                debug!(section = %self.section_name, "section started");
                self.state = State::AwaitingTable;
            }
            (State::AwaitingSectionName { .. }, kind) => {
                // Not a section after all; the current row gets a fresh look.
                return self.step(row, kind);
            }
            (State::AwaitingTable, RowKind::Empty) => {
                self.state = State::AwaitingTable;
            }
            (State::AwaitingTable, RowKind::Data) => {
                self.start_table()?;
                self.table_rows.push(row);
                self.state = State::InTable;
            }
            (State::InTable, RowKind::Empty) => {
                self.state = State::AwaitingTable;
                return self.close_table();
            }
            (State::InTable, _) => {
                self.table_rows.push(row);
                self.state = State::InTable;
            }
        }
        Ok(None)
    }

    fn start_table(&mut self) -> Result<(), ConvertError> {
        if !self.table_rows.is_empty() {
            return Err(ConvertError::TableBoundary(format!(
                "new table in section '{}' while {} rows of the previous table are unflushed",
                self.section_name,
                self.table_rows.len()
            )));
        }
        self.table_count += 1;
        self.table_name = Some(table_file_name(
            &self.section_name,
            self.table_count,
            self.max_name_chars,
        ));
        Ok(())
    }

    fn close_table(&mut self) -> Result<Option<TableUnit>, ConvertError> {
        let rows = std::mem::take(&mut self.table_rows);
        let name = self.table_name.take();

        if rows.len() < self.min_table_rows || is_footnote_block(&rows) {
            debug!(
                table = name.as_deref().unwrap_or_default(),
                rows = rows.len(),
                "rejected block"
            );
            self.table_count = self.table_count.saturating_sub(1);
            return Ok(None);
        }

        let name = name.ok_or_else(|| {
            ConvertError::TableBoundary(format!(
                "table in section '{}' closed without a name",
                self.section_name
            ))
        })?;
        debug!(table = %name, rows = rows.len(), "table detected");
        Ok(Some(TableUnit { name, rows }))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Detection {
    pub tables: Vec<TableUnit>,
    pub dropped_rows: usize,
}

pub fn detect_tables<I>(rows: I, options: &ConvertOptions) -> Result<Detection, ConvertError>
where
    I: IntoIterator<Item = Row>,
{
    let mut detector = TableBoundaryDetector::new(options);
    let mut tables = Vec::new();
    for row in rows {
        if let Some(table) = detector.push(row)? {
            tables.push(table);
        }
    }

    let dropped_rows = detector.finish();
    if dropped_rows > 0 {
        warn!(
            rows = dropped_rows,
            "report ends inside a table; its rows were not written"
        );
    }
    Ok(Detection {
        tables,
        dropped_rows,
    })
}
