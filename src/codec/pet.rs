//! JSON document codec.
//!
//! Game data files wrap their prompt records in a single `content` list:
//! `{"content": [ {...}, {...} ]}`.

use std::io::Read;

use serde::{Deserialize, Serialize};

use crate::entity::RawRecord;
use crate::error::Result;

#[derive(Serialize, Deserialize)]
struct PetDocument<T> {
    content: T,
}

/// Parse a document into its records, in order. Records are not validated here.
pub fn decode_document(text: &str) -> Result<Vec<RawRecord>> {
    let document: PetDocument<Vec<RawRecord>> = serde_json::from_str(text)?;
    Ok(document.content)
}

/// Like [`decode_document`], reading from any byte source.
pub fn decode_document_reader<R: Read>(reader: R) -> Result<Vec<RawRecord>> {
    let document: PetDocument<Vec<RawRecord>> = serde_json::from_reader(reader)?;
    Ok(document.content)
}

/// Wrap records under `content` and pretty-print with 2-space indentation.
///
/// Non-ASCII text is written as-is and the output ends with one newline.
pub fn encode_document(records: &[RawRecord]) -> Result<String> {
    let document = PetDocument { content: records };
    let mut text = serde_json::to_string_pretty(&document)?;
    text.push('\n');
    Ok(text)
}
