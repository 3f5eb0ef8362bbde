use std::str::FromStr;

use serde_json::Value;

use crate::error::ConvertError;
use crate::model::Record;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Metadata {
    entries: Vec<(String, String)>,
}

impl Metadata {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let value = value.into();
        if let Some(entry) = self.entries.iter_mut().find(|(existing, _)| *existing == key) {
            entry.1 = value;
        } else {
            self.entries.push((key, value));
        }
    }

    pub fn extend(&mut self, other: &Metadata) {
        for (key, value) in &other.entries {
            self.insert(key.clone(), value.clone());
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(key, _)| key.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries
            .iter()
            .map(|(key, value)| (key.as_str(), value.as_str()))
    }

    pub fn append_fields(&self, fields: &mut Vec<String>) {
        for key in self.keys() {
            if !fields.iter().any(|field| field == key) {
                fields.push(key.to_string());
            }
        }
    }

    pub fn apply(&self, record: &mut Record) {
        for (key, value) in self.iter() {
            record.set(key, value);
        }
    }

    pub fn from_json_str(json: &str) -> Result<Self, ConvertError> {
        let value: Value = serde_json::from_str(json)
            .map_err(|error| ConvertError::InvalidMetadata(error.to_string()))?;
        let Value::Object(map) = value else {
            return Err(ConvertError::InvalidMetadata(
                "expected a JSON object of key/value pairs".to_string(),
            ));
        };

        let mut metadata = Self::new();
        for (key, value) in map {
            let text = match value {
                Value::String(text) => text,
                Value::Number(number) => number.to_string(),
                Value::Bool(flag) => flag.to_string(),
                other => {
                    return Err(ConvertError::InvalidMetadata(format!(
                        "value of '{key}' must be a string, got {other}"
                    )));
                }
            };
            metadata.insert(key, text);
        }
        Ok(metadata)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetadataPair {
    pub key: String,
    pub value: String,
}

impl FromStr for MetadataPair {
    type Err = String;

    fn from_str(spec: &str) -> Result<Self, Self::Err> {
        let (key, value) = spec
            .split_once('=')
            .ok_or_else(|| format!("invalid metadata '{spec}', expected KEY=VALUE"))?;
        let key = key.trim();
        if key.is_empty() {
            return Err(format!("invalid metadata '{spec}': key is empty"));
        }
        Ok(Self {
            key: key.to_string(),
            value: value.to_string(),
        })
    }
}

impl FromIterator<MetadataPair> for Metadata {
    fn from_iter<I: IntoIterator<Item = MetadataPair>>(pairs: I) -> Self {
        let mut metadata = Self::new();
        for pair in pairs {
            metadata.insert(pair.key, pair.value);
        }
        metadata
    }
}
