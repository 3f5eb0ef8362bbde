use std::collections::HashMap;

pub type Row = Vec<String>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableUnit {
    pub name: String,
    pub rows: Vec<Row>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Record {
    values: HashMap<String, String>,
}

impl Record {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, field: impl Into<String>, value: impl Into<String>) {
        self.values.insert(field.into(), value.into());
    }

    #[must_use]
    pub fn get(&self, field: &str) -> Option<&str> {
        self.values.get(field).map(String::as_str)
    }

    #[must_use]
    pub fn to_row(&self, fields: &[String]) -> Row {
        fields
            .iter()
            .map(|field| self.get(field).unwrap_or_default().to_string())
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedTable {
    pub fields: Vec<String>,
    pub records: Vec<Record>,
}
