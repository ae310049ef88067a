// src/entity/v3.rs
use serde_json::Value;
use tracing::warn;

use super::{
    default_safety_quips, detect_version, includes_player_name, is_truthy, text_field,
    value_to_text, RawRecord, SchemaVersion,
};
use crate::convert::to_compact_placeholder;
use crate::error::{QuipError, Result};

/// A quip prompt for Quiplash 3.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptV3 {
    pub id: String,
    /// Prompt text, player placeholder in compact form
    pub prompt: String,
    /// Serialized as `x`
    pub is_audience_choice: bool,
    /// Always equal to whether `prompt` contains the compact placeholder
    pub includes_player_name: bool,
    /// Serialized as `us`
    pub is_us_region: bool,
    /// Fallback answers when no player answered
    pub safety_quips: [String; 3],
}

impl PromptV3 {
    /// New prompt with default region and safety quips.
    pub fn new(id: impl Into<String>, prompt: impl Into<String>, is_audience_choice: bool) -> Self {
        let prompt = prompt.into();
        Self {
            id: id.into(),
            includes_player_name: includes_player_name(&prompt),
            prompt,
            is_audience_choice,
            is_us_region: false,
            safety_quips: default_safety_quips(),
        }
    }

    /// Build from a JSON document record of either version.
    ///
    /// Every field is read from the record, with defaults only for absent
    /// ones. A version 1 shaped record also has its placeholder compacted.
    /// `includesPlayerName` is always recomputed from the prompt text.
    pub fn from_raw_record(record: &RawRecord) -> Result<Self> {
        let version = detect_version(record)?;
        let id = text_id(record).map_err(|e| QuipError::invalid_field("id", e))?;
        let mut prompt =
            text_field(record, "prompt").map_err(|e| QuipError::invalid_field("prompt", e))?;
        if version == SchemaVersion::V1 {
            prompt = to_compact_placeholder(&prompt);
        }
        let safety_quips = collect_safety_quips(&id, record.get("safetyQuips"))
            .map_err(|e| QuipError::invalid_field("safetyQuips", e))?;

        let computed = includes_player_name(&prompt);
        if let Some(supplied) = record.get("includesPlayerName").map(is_truthy) {
            if supplied != computed {
                warn!(
                    id = %id,
                    supplied,
                    "includesPlayerName disagrees with prompt text, recomputed"
                );
            }
        }

        Ok(Self {
            id,
            prompt,
            is_audience_choice: record.get("x").is_some_and(is_truthy),
            includes_player_name: computed,
            is_us_region: record.get("us").is_some_and(is_truthy),
            safety_quips,
        })
    }

    /// Build from a decoded CSV row, reading the flattened columns directly.
    ///
    /// The spaced placeholder is compacted, since sheets are edited by hand.
    pub fn from_csv_record(record: &RawRecord, row: usize) -> Result<Self> {
        let id = text_id(record)
            .map_err(|e| QuipError::row_import(row, format!("column 'id': {}", e)))?;
        let prompt = text_field(record, "prompt")
            .map_err(|e| QuipError::row_import(row, format!("column 'prompt': {}", e)))?;
        let safety_quips = collect_safety_quips(&id, record.get("safetyQuips"))
            .map_err(|e| QuipError::row_import(row, format!("safety quips: {}", e)))?;
        let prompt = to_compact_placeholder(&prompt);

        Ok(Self {
            id,
            includes_player_name: includes_player_name(&prompt),
            prompt,
            is_audience_choice: record.get("x").is_some_and(is_truthy),
            is_us_region: record.get("us").is_some_and(is_truthy),
            safety_quips,
        })
    }

    /// Wire form: `{id, includesPlayerName, prompt, safetyQuips, us, x}`.
    pub fn to_raw_record(&self) -> RawRecord {
        let mut record = RawRecord::new();
        record.insert("id".to_string(), Value::from(self.id.clone()));
        record.insert(
            "includesPlayerName".to_string(),
            Value::from(self.includes_player_name),
        );
        record.insert("prompt".to_string(), Value::from(self.prompt.clone()));
        record.insert(
            "safetyQuips".to_string(),
            Value::from(self.safety_quips.to_vec()),
        );
        record.insert("us".to_string(), Value::from(self.is_us_region));
        record.insert("x".to_string(), Value::from(self.is_audience_choice));
        record
    }
}

fn text_id(record: &RawRecord) -> std::result::Result<String, String> {
    record
        .get("id")
        .and_then(value_to_text)
        .ok_or_else(|| "missing".to_string())
}

/// Exactly three quips: missing positions take the default, extras are dropped.
fn collect_safety_quips(id: &str, value: Option<&Value>) -> std::result::Result<[String; 3], String> {
    let items = match value {
        None | Some(Value::Null) => return Ok(default_safety_quips()),
        Some(Value::Array(items)) => items,
        Some(other) => return Err(format!("expected a list, found {}", other)),
    };

    if items.len() != 3 {
        warn!(id, count = items.len(), "expected 3 safety quips, normalizing");
    }

    let mut quips = default_safety_quips();
    for (slot, item) in quips.iter_mut().zip(items) {
        if let Some(text) = value_to_text(item) {
            *slot = text;
        }
    }
    Ok(quips)
}
