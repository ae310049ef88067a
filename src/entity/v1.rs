// src/entity/v1.rs
use serde_json::Value;

use super::{detect_version, integer_id, is_truthy, text_field, RawRecord, SchemaVersion};
use crate::convert::to_spaced_placeholder;
use crate::error::{QuipError, Result};

/// A quip prompt for Quiplash 1 & 2.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptV1 {
    pub id: i64,
    /// Prompt text, player placeholder in spaced form
    pub prompt: String,
    /// Serialized as `x`
    pub is_audience_choice: bool,
}

impl PromptV1 {
    pub fn new(id: i64, prompt: impl Into<String>, is_audience_choice: bool) -> Self {
        Self {
            id,
            prompt: prompt.into(),
            is_audience_choice,
        }
    }

    /// Build from a JSON document record of either version.
    ///
    /// A version 3 record takes its `x` flag from the truthiness of its
    /// `prompt` field, not from its own `x`.
    pub fn from_raw_record(record: &RawRecord) -> Result<Self> {
        let version = detect_version(record)?;
        let id = integer_id(record.get("id")).map_err(|e| QuipError::invalid_field("id", e))?;
        let prompt =
            text_field(record, "prompt").map_err(|e| QuipError::invalid_field("prompt", e))?;

        match version {
            SchemaVersion::V1 => Ok(Self {
                id,
                prompt,
                is_audience_choice: record.get("x").is_some_and(is_truthy),
            }),
            SchemaVersion::V3 => Ok(Self {
                id,
                is_audience_choice: record.get("prompt").is_some_and(is_truthy),
                prompt: to_spaced_placeholder(&prompt),
            }),
        }
    }

    /// Build from a decoded CSV row, reading the flattened columns directly.
    pub fn from_csv_record(record: &RawRecord, row: usize) -> Result<Self> {
        let id = integer_id(record.get("id"))
            .map_err(|e| QuipError::row_import(row, format!("column 'id': {}", e)))?;
        let prompt = text_field(record, "prompt")
            .map_err(|e| QuipError::row_import(row, format!("column 'prompt': {}", e)))?;

        Ok(Self {
            id,
            prompt: to_spaced_placeholder(&prompt),
            is_audience_choice: record.get("x").is_some_and(is_truthy),
        })
    }

    /// Wire form: `{id, prompt, x}`.
    pub fn to_raw_record(&self) -> RawRecord {
        let mut record = RawRecord::new();
        record.insert("id".to_string(), Value::from(self.id));
        record.insert("prompt".to_string(), Value::from(self.prompt.clone()));
        record.insert("x".to_string(), Value::from(self.is_audience_choice));
        record
    }
}
