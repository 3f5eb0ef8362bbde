use std::path::PathBuf;

use serde::Serialize;

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct WrittenTable {
    pub name: String,
    pub path: PathBuf,
    pub rows: usize,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct SplitReport {
    pub tables: Vec<WrittenTable>,
    pub dropped_rows: usize,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct NormalizedReport {
    pub output: PathBuf,
    pub records: usize,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum FileOutcome {
    Split(SplitReport),
    Normalized(NormalizedReport),
    Skipped,
    Failed { error: String },
}

impl FileOutcome {
    #[must_use]
    pub fn output_count(&self) -> usize {
        match self {
            Self::Split(report) => report.tables.len(),
            Self::Normalized(_) => 1,
            Self::Skipped | Self::Failed { .. } => 0,
        }
    }
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct FileReport {
    pub input: PathBuf,
    #[serde(flatten)]
    pub outcome: FileOutcome,
}

#[derive(Debug, Clone, Default, Serialize, PartialEq, Eq)]
pub struct BatchReport {
    pub files: Vec<FileReport>,
}

impl BatchReport {
    #[must_use]
    pub fn failed_count(&self) -> usize {
        self.files
            .iter()
            .filter(|file| matches!(file.outcome, FileOutcome::Failed { .. }))
            .count()
    }

    #[must_use]
    pub fn output_count(&self) -> usize {
        self.files.iter().map(|file| file.outcome.output_count()).sum()
    }
}
