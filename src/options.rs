use crate::error::ConvertError;
use crate::metadata::Metadata;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Dialect {
    pub delimiter: u8,
}

impl Dialect {
    pub const EXCEL_TAB: Self = Self { delimiter: b'\t' };
}

impl Default for Dialect {
    fn default() -> Self {
        Self::EXCEL_TAB
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConvertOptions {
    pub dialect: Dialect,
    pub min_table_rows: usize,
    pub max_name_chars: usize,
    pub output_extension: String,
    pub metadata: Metadata,
}

impl ConvertOptions {
    pub fn validate(&self) -> Result<(), ConvertError> {
        if self.min_table_rows == 0 {
            return Err(ConvertError::InvalidOption(
                "min_table_rows must be at least 1".to_string(),
            ));
        }
        if self.max_name_chars == 0 {
            return Err(ConvertError::InvalidOption(
                "max_name_chars must be at least 1".to_string(),
            ));
        }
        if self.output_extension.is_empty() || self.output_extension.contains('.') {
            return Err(ConvertError::InvalidOption(format!(
                "invalid output extension '{}'",
                self.output_extension
            )));
        }
        Ok(())
    }
}

impl Default for ConvertOptions {
    fn default() -> Self {
        Self {
            dialect: Dialect::default(),
            min_table_rows: 3,
            max_name_chars: 50,
            output_extension: "csv".to_string(),
            metadata: Metadata::default(),
        }
    }
}
