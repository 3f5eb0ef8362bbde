pub mod classify;
mod csv_out;
pub mod detect;
mod error;
pub mod metadata;
pub mod model;
pub mod naming;
pub mod normalize;
mod options;
mod report;
pub mod source;
pub mod vocabulary;

use std::path::{Path, PathBuf};

use tracing::{error, info, info_span};

use crate::naming::{report_output_path, table_output_path};
use crate::source::{RawFormat, extension_of, read_delimited_rows, read_rows};

pub use csv_out::{write_rows, write_rows_to_string, write_table, write_table_to_string};
pub use detect::{Detection, TableBoundaryDetector, detect_tables};
pub use error::ConvertError;
pub use metadata::{Metadata, MetadataPair};
pub use model::{NormalizedTable, Record, Row, TableUnit};
pub use normalize::normalize_rows;
pub use options::{ConvertOptions, Dialect};
pub use report::{
    BatchReport, FileOutcome, FileReport, NormalizedReport, SplitReport, WrittenTable,
};

pub const REPORT_TEXT_EXTENSION: &str = "txt";
const REPORT_TEXT_DELIMITER: u8 = b'\t';

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConvertMode {
    Split,
    Normalize,
    Auto,
}

fn ensure_exists(input: &Path) -> Result<(), ConvertError> {
    if input.is_file() {
        Ok(())
    } else {
        Err(ConvertError::NotFound(input.to_path_buf()))
    }
}

/// Nothing is written when detection fails.
pub fn split_report_file(
    input: &Path,
    options: &ConvertOptions,
) -> Result<SplitReport, ConvertError> {
    options.validate()?;
    ensure_exists(input)?;
    let format = RawFormat::from_path(input).ok_or_else(|| ConvertError::UnsupportedExtension {
        path: input.to_path_buf(),
        expected: "xls, xlsx, xlsm, xlsb, ods, csv or tsv".to_string(),
    })?;

    let _span = info_span!("split", input = %input.display()).entered();
    let Detection {
        tables,
        dropped_rows,
    } = detect_tables(read_rows(input, format)?, options)?;

    let mut written = Vec::with_capacity(tables.len());
    for table in tables {
        let path = table_output_path(input, &table.name, &options.output_extension);
        write_rows(&path, &table.rows, options.dialect)?;
        info!(path = %path.display(), rows = table.rows.len(), "table written");
        written.push(WrittenTable {
            name: table.name,
            path,
            rows: table.rows.len(),
        });
    }

    Ok(SplitReport {
        tables: written,
        dropped_rows,
    })
}

/// Returns `Ok(None)` without writing anything when the export is not one of
/// the recognized kinds.
pub fn normalize_report_file(
    input: &Path,
    options: &ConvertOptions,
) -> Result<Option<NormalizedReport>, ConvertError> {
    options.validate()?;
    ensure_exists(input)?;
    if extension_of(input).as_deref() != Some(REPORT_TEXT_EXTENSION) {
        return Err(ConvertError::UnsupportedExtension {
            path: input.to_path_buf(),
            expected: REPORT_TEXT_EXTENSION.to_string(),
        });
    }
    let output = report_output_path(input, &options.output_extension);
    if output == input {
        return Err(ConvertError::InvalidOption(format!(
            "output extension '{}' would overwrite the input",
            options.output_extension
        )));
    }

    let file_name = input
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();
    let rows = read_delimited_rows(input, REPORT_TEXT_DELIMITER)?;
    let Some(table) = normalize_rows(&file_name, &rows, &options.metadata)? else {
        return Ok(None);
    };

    write_table(&output, &table, options.dialect)?;
    info!(path = %output.display(), records = table.records.len(), "report written");
    Ok(Some(NormalizedReport {
        output,
        records: table.records.len(),
    }))
}

pub fn convert_file(
    input: &Path,
    mode: ConvertMode,
    options: &ConvertOptions,
) -> Result<FileOutcome, ConvertError> {
    let normalize = match mode {
        ConvertMode::Split => false,
        ConvertMode::Normalize => true,
        ConvertMode::Auto => extension_of(input).as_deref() == Some(REPORT_TEXT_EXTENSION),
    };

    if normalize {
        Ok(normalize_report_file(input, options)?
            .map_or(FileOutcome::Skipped, FileOutcome::Normalized))
    } else {
        split_report_file(input, options).map(FileOutcome::Split)
    }
}

pub fn convert_batch(
    inputs: &[PathBuf],
    mode: ConvertMode,
    options: &ConvertOptions,
) -> BatchReport {
    let mut report = BatchReport::default();
    for input in inputs {
        let outcome = match convert_file(input, mode, options) {
            Ok(outcome) => outcome,
            Err(error) => {
                error!(input = %input.display(), "conversion failed: {error}");
                FileOutcome::Failed {
                    error: error.to_string(),
                }
            }
        };
        report.files.push(FileReport {
            input: input.clone(),
            outcome,
        });
    }
    report
}
