//! CSV codec for spreadsheet editing.
//!
//! List fields are spread over numbered columns: `safetyQuips` becomes
//! `safetyQuip_1`, `safetyQuip_2`, `safetyQuip_3`. Reading a sheet back
//! gathers those columns into one list again, ordered by suffix.

use std::collections::{BTreeMap, HashMap};
use std::io::{Read, Write};

use serde_json::Value;
use tracing::debug;

use crate::entity::{value_to_text, RawRecord};
use crate::error::{QuipError, Result};

/// How a cell's text is turned back into a JSON value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CellKind {
    Text,
    Integer,
    Flag,
}

/// Column name for the 1-based item `index` of list field `field`.
pub fn item_column(field: &str, index: usize) -> String {
    let singular = field.strip_suffix('s').unwrap_or(field);
    format!("{}_{}", singular, index)
}

/// Split `safetyQuip_2` into `("safetyQuips", 2)`.
fn split_item_column(column: &str) -> Option<(String, usize)> {
    let (singular, suffix) = column.rsplit_once('_')?;
    if singular.is_empty() || suffix.is_empty() || !suffix.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let index = suffix.parse().ok()?;
    Some((format!("{}s", singular), index))
}

/// Flatten a record into `(column, cell)` pairs, list items in place.
pub fn flatten_record(record: &RawRecord) -> Vec<(String, String)> {
    let mut cells = Vec::with_capacity(record.len());
    for (field, value) in record {
        match value {
            Value::Array(items) => {
                for (i, item) in items.iter().enumerate() {
                    cells.push((item_column(field, i + 1), cell_text(item)));
                }
            }
            other => cells.push((field.clone(), cell_text(other))),
        }
    }
    cells
}

fn cell_text(value: &Value) -> String {
    value_to_text(value).unwrap_or_default()
}

/// Write records as CSV. The header comes from the first record's
/// flattened shape, so every record must share that shape.
pub fn encode_table<W: Write>(records: &[RawRecord], writer: W) -> Result<()> {
    let first = records.first().ok_or(QuipError::EmptyDataset)?;
    let header: Vec<String> = flatten_record(first)
        .into_iter()
        .map(|(column, _)| column)
        .collect();

    let mut wtr = csv::Writer::from_writer(writer);
    wtr.write_record(&header)?;

    for record in records {
        let mut cells: HashMap<String, String> = flatten_record(record).into_iter().collect();
        let row: Vec<String> = header
            .iter()
            .map(|column| cells.remove(column).unwrap_or_default())
            .collect();
        if let Some(column) = cells.keys().next() {
            return Err(QuipError::invalid_field(
                column,
                "column is missing from the header derived from the first record",
            ));
        }
        wtr.write_record(&row)?;
    }

    wtr.flush()?;
    debug!(rows = records.len(), columns = header.len(), "encoded CSV table");
    Ok(())
}

/// Read a CSV sheet into records, typing cells with `kind_of(column)`.
///
/// Rows are numbered from 1 in errors. Empty integer and flag cells are
/// left out of the record; empty text cells are kept.
pub fn decode_table<R, F>(reader: R, kind_of: F) -> Result<Vec<RawRecord>>
where
    R: Read,
    F: Fn(&str) -> CellKind,
{
    let mut rdr = csv::Reader::from_reader(reader);
    let headers = rdr.headers()?.clone();
    if headers.iter().all(str::is_empty) {
        return Err(QuipError::row_import(0, "missing header"));
    }

    let mut records = Vec::new();
    for (i, result) in rdr.records().enumerate() {
        let row = i + 1;
        let cells = result.map_err(|e| QuipError::row_import(row, e.to_string()))?;
        records.push(unflatten_row(&headers, &cells, row, &kind_of)?);
    }

    debug!(rows = records.len(), columns = headers.len(), "decoded CSV table");
    Ok(records)
}

fn unflatten_row<F>(
    headers: &csv::StringRecord,
    cells: &csv::StringRecord,
    row: usize,
    kind_of: &F,
) -> Result<RawRecord>
where
    F: Fn(&str) -> CellKind,
{
    let mut record = RawRecord::new();
    let mut lists: BTreeMap<String, Vec<(usize, String)>> = BTreeMap::new();

    for (column, cell) in headers.iter().zip(cells.iter()) {
        if let Some((field, index)) = split_item_column(column) {
            lists.entry(field).or_default().push((index, cell.to_string()));
            continue;
        }
        let value = typed_cell(cell, kind_of(column))
            .map_err(|e| QuipError::row_import(row, format!("column '{}': {}", column, e)))?;
        if let Some(value) = value {
            record.insert(column.to_string(), value);
        }
    }

    for (field, mut items) in lists {
        items.sort_by_key(|(index, _)| *index);
        let values: Vec<String> = items.into_iter().map(|(_, item)| item).collect();
        record.insert(field, Value::from(values));
    }

    Ok(record)
}

fn typed_cell(cell: &str, kind: CellKind) -> std::result::Result<Option<Value>, String> {
    let trimmed = cell.trim();
    match kind {
        CellKind::Text => Ok(Some(Value::from(cell))),
        CellKind::Integer | CellKind::Flag if trimmed.is_empty() => Ok(None),
        CellKind::Integer => trimmed
            .parse::<i64>()
            .map(|n| Some(Value::from(n)))
            .map_err(|_| format!("'{}' is not an integer", cell)),
        CellKind::Flag => parse_flag(trimmed)
            .map(|b| Some(Value::from(b)))
            .ok_or_else(|| format!("'{}' is not a boolean", cell)),
    }
}

fn parse_flag(text: &str) -> Option<bool> {
    match text.to_lowercase().as_str() {
        "true" | "1" | "yes" => Some(true),
        "false" | "0" | "no" => Some(false),
        _ => None,
    }
}
