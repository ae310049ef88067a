use thiserror::Error;

#[derive(Error, Debug)]
pub enum QuipError {
    #[error("Unknown schema version: {0}")]
    UnknownSchemaVersion(String),

    #[error("Unsupported conversion of prompt '{id}' to version {target}: {reason}")]
    UnsupportedConversion {
        id: String,
        target: u32,
        reason: String,
    },

    #[error("Cannot import CSV row {row}: {reason}")]
    RowImport { row: usize, reason: String },

    #[error("Invalid field '{field}': {reason}")]
    InvalidField { field: String, reason: String },

    #[error("Cannot write an empty dataset as CSV: no header can be derived")]
    EmptyDataset,

    #[error("Operation not supported: {name} (must be one of {supported})")]
    UnknownOperation { name: String, supported: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

impl QuipError {
    pub(crate) fn invalid_field(field: &str, reason: impl Into<String>) -> Self {
        QuipError::InvalidField {
            field: field.to_string(),
            reason: reason.into(),
        }
    }

    pub(crate) fn row_import(row: usize, reason: impl Into<String>) -> Self {
        QuipError::RowImport {
            row,
            reason: reason.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, QuipError>;
