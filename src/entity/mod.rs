//! Prompt entities for both supported schema versions.
//!
//! Quiplash 1 & 2 ship a flat prompt layout (`PromptV1`), Quiplash 3 adds
//! localization and safety fields (`PromptV3`). Neither layout carries a
//! version tag, so records are classified by their field fingerprint.

mod v1;
mod v3;

pub use v1::PromptV1;
pub use v3::PromptV3;

use serde_json::Value;

use crate::codec::table::CellKind;
use crate::error::{QuipError, Result};

/// A single record as it appears on the wire, before it becomes an entity.
pub type RawRecord = serde_json::Map<String, Value>;

/// Player-name placeholder as spelled in version 1 prompts.
pub const SPACED_PLACEHOLDER: &str = "<ANY PLAYER>";

/// Player-name placeholder as spelled in version 3 prompts.
pub const COMPACT_PLACEHOLDER: &str = "<ANYPLAYER>";

/// Fallback answers used when a version 3 prompt has none of its own.
pub const SAFETY_QUIPS_DEFAULT: [&str; 3] = ["jus de gouille", "le buszy", "jean-marc"];

/// Fresh copy of the default safety quips.
pub fn default_safety_quips() -> [String; 3] {
    SAFETY_QUIPS_DEFAULT.map(String::from)
}

/// Whether `prompt` mentions a player, i.e. holds the compact placeholder.
pub fn includes_player_name(prompt: &str) -> bool {
    prompt.contains(COMPACT_PLACEHOLDER)
}

/// The two prompt layouts this crate understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SchemaVersion {
    V1,
    V3,
}

impl SchemaVersion {
    pub fn number(self) -> u32 {
        match self {
            SchemaVersion::V1 => 1,
            SchemaVersion::V3 => 3,
        }
    }

    /// How a CSV cell in `column` is typed when read back for this version.
    pub fn cell_kind(self, column: &str) -> CellKind {
        match (self, column) {
            (SchemaVersion::V1, "id") => CellKind::Integer,
            (_, "x") => CellKind::Flag,
            (SchemaVersion::V3, "includesPlayerName" | "us") => CellKind::Flag,
            _ => CellKind::Text,
        }
    }
}

impl std::fmt::Display for SchemaVersion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.number())
    }
}

impl TryFrom<u32> for SchemaVersion {
    type Error = QuipError;

    fn try_from(value: u32) -> Result<Self> {
        match value {
            1 => Ok(SchemaVersion::V1),
            3 => Ok(SchemaVersion::V3),
            other => Err(QuipError::UnknownSchemaVersion(format!(
                "cannot convert to unknown target version {}",
                other
            ))),
        }
    }
}

impl std::str::FromStr for SchemaVersion {
    type Err = QuipError;

    fn from_str(s: &str) -> Result<Self> {
        let digits = s.trim().trim_start_matches(['v', 'V']);
        let number: u32 = digits.parse().map_err(|_| {
            QuipError::UnknownSchemaVersion(format!("cannot parse version '{}'", s))
        })?;
        SchemaVersion::try_from(number)
    }
}

/// Classify a raw record by its field fingerprint.
///
/// A record carrying `includesPlayerName` is version 3; otherwise a record
/// with all of `id`, `prompt` and `x` is version 1.
pub fn detect_version(record: &RawRecord) -> Result<SchemaVersion> {
    if record.contains_key("includesPlayerName") {
        Ok(SchemaVersion::V3)
    } else if ["id", "prompt", "x"].iter().all(|k| record.contains_key(*k)) {
        Ok(SchemaVersion::V1)
    } else {
        Err(QuipError::UnknownSchemaVersion(format!(
            "cannot identify {}",
            Value::Object(record.clone())
        )))
    }
}

/// A prompt of either version.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QuipPrompt {
    V1(PromptV1),
    V3(PromptV3),
}

impl QuipPrompt {
    /// Build an entity of `version` from a JSON document record.
    pub fn from_raw_record(record: &RawRecord, version: SchemaVersion) -> Result<Self> {
        match version {
            SchemaVersion::V1 => PromptV1::from_raw_record(record).map(QuipPrompt::V1),
            SchemaVersion::V3 => PromptV3::from_raw_record(record).map(QuipPrompt::V3),
        }
    }

    /// Build an entity of `version` from a decoded CSV row.
    pub fn from_csv_record(record: &RawRecord, row: usize, version: SchemaVersion) -> Result<Self> {
        match version {
            SchemaVersion::V1 => PromptV1::from_csv_record(record, row).map(QuipPrompt::V1),
            SchemaVersion::V3 => PromptV3::from_csv_record(record, row).map(QuipPrompt::V3),
        }
    }

    pub fn version(&self) -> SchemaVersion {
        match self {
            QuipPrompt::V1(_) => SchemaVersion::V1,
            QuipPrompt::V3(_) => SchemaVersion::V3,
        }
    }

    /// The id rendered as text, whatever its version-specific type.
    pub fn id(&self) -> String {
        match self {
            QuipPrompt::V1(p) => p.id.to_string(),
            QuipPrompt::V3(p) => p.id.clone(),
        }
    }

    pub fn prompt(&self) -> &str {
        match self {
            QuipPrompt::V1(p) => &p.prompt,
            QuipPrompt::V3(p) => &p.prompt,
        }
    }

    /// Project to the wire record of this entity's own version.
    pub fn to_raw_record(&self) -> RawRecord {
        match self {
            QuipPrompt::V1(p) => p.to_raw_record(),
            QuipPrompt::V3(p) => p.to_raw_record(),
        }
    }
}

impl From<PromptV1> for QuipPrompt {
    fn from(prompt: PromptV1) -> Self {
        QuipPrompt::V1(prompt)
    }
}

impl From<PromptV3> for QuipPrompt {
    fn from(prompt: PromptV3) -> Self {
        QuipPrompt::V3(prompt)
    }
}

/// Truthiness of a JSON value: null, false, zero and empty values are false.
pub(crate) fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(items) => !items.is_empty(),
        Value::Object(map) => !map.is_empty(),
    }
}

/// Render a scalar as text. Null has no text form.
pub(crate) fn value_to_text(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

/// Read an integer id from a number or an integer-like string.
///
/// Floats are accepted when they have no fractional part.
pub(crate) fn integer_id(value: Option<&Value>) -> std::result::Result<i64, String> {
    match value {
        Some(Value::Number(n)) => n
            .as_i64()
            .or_else(|| {
                n.as_f64()
                    .filter(|f| f.fract() == 0.0 && f.abs() < i64::MAX as f64)
                    .map(|f| f as i64)
            })
            .ok_or_else(|| format!("{} is not an integer", n)),
        Some(Value::String(s)) => s
            .trim()
            .parse()
            .map_err(|_| format!("'{}' is not an integer", s)),
        Some(Value::Null) | None => Err("missing".to_string()),
        Some(other) => Err(format!("{} is not an integer", other)),
    }
}

/// Read a required text field.
pub(crate) fn text_field(record: &RawRecord, field: &str) -> std::result::Result<String, String> {
    match record.get(field) {
        Some(Value::String(s)) => Ok(s.clone()),
        Some(Value::Null) | None => Err("missing".to_string()),
        Some(other) => Err(format!("expected text, found {}", other)),
    }
}
