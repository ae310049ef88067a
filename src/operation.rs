//! The named conversions offered to callers.
//!
//! Each operation is a fixed load -> convert -> write sequence over one
//! input file and one output file.

use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::info;

use crate::dataset::QuipDataset;
use crate::entity::SchemaVersion;
use crate::error::{QuipError, Result};

/// On-disk representation of a dataset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DataFormat {
    Json,
    Csv,
}

impl std::fmt::Display for DataFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DataFormat::Json => write!(f, "JSON"),
            DataFormat::Csv => write!(f, "CSV"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    ToV3Jet,
    ToV3Csv,
    ToV1Jet,
    ToV1Csv,
    CsvToV1,
    CsvToV3,
}

impl Operation {
    pub const ALL: [Operation; 6] = [
        Operation::ToV3Jet,
        Operation::ToV3Csv,
        Operation::ToV1Jet,
        Operation::ToV1Csv,
        Operation::CsvToV1,
        Operation::CsvToV3,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Operation::ToV3Jet => "to_v3_jet",
            Operation::ToV3Csv => "to_v3_csv",
            Operation::ToV1Jet => "to_v1_jet",
            Operation::ToV1Csv => "to_v1_csv",
            Operation::CsvToV1 => "csv_to_v1",
            Operation::CsvToV3 => "csv_to_v3",
        }
    }

    /// Every operation name, joined with `|`.
    pub fn supported_names() -> String {
        Self::ALL.map(Operation::name).join("|")
    }

    pub fn input_format(self) -> DataFormat {
        match self {
            Operation::CsvToV1 | Operation::CsvToV3 => DataFormat::Csv,
            _ => DataFormat::Json,
        }
    }

    pub fn output_format(self) -> DataFormat {
        match self {
            Operation::ToV3Csv | Operation::ToV1Csv => DataFormat::Csv,
            _ => DataFormat::Json,
        }
    }

    /// Schema version of both the in-memory dataset and the output.
    pub fn version(self) -> SchemaVersion {
        match self {
            Operation::ToV3Jet | Operation::ToV3Csv | Operation::CsvToV3 => SchemaVersion::V3,
            Operation::ToV1Jet | Operation::ToV1Csv | Operation::CsvToV1 => SchemaVersion::V1,
        }
    }

    /// Load `input`, convert, and write `output`.
    pub fn run(self, input: &Path, output: &Path) -> Result<ConversionReport> {
        let version = self.version();
        info!(
            operation = self.name(),
            input = %input.display(),
            output = %output.display(),
            "starting conversion"
        );

        let dataset = match self.input_format() {
            DataFormat::Json => QuipDataset::open_pet(input, version)?,
            DataFormat::Csv => QuipDataset::open_csv(input, version)?,
        };

        match self.output_format() {
            DataFormat::Json => dataset.write_pet(output, Some(version))?,
            DataFormat::Csv => dataset.write_csv(output, Some(version))?,
        }

        info!(prompts = dataset.len(), "conversion finished");
        Ok(ConversionReport {
            operation: self.name().to_string(),
            input: input.to_path_buf(),
            output: output.to_path_buf(),
            prompts: dataset.len(),
            version: version.number(),
            format: self.output_format(),
        })
    }
}

impl std::fmt::Display for Operation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl std::str::FromStr for Operation {
    type Err = QuipError;

    fn from_str(s: &str) -> Result<Self> {
        let normalized = s.trim().to_lowercase().replace('-', "_");
        Self::ALL
            .into_iter()
            .find(|op| op.name() == normalized)
            .ok_or_else(|| QuipError::UnknownOperation {
                name: s.to_string(),
                supported: Self::supported_names(),
            })
    }
}

/// What a finished operation did.
#[derive(Debug, Clone, Serialize)]
pub struct ConversionReport {
    pub operation: String,
    pub input: PathBuf,
    pub output: PathBuf,
    pub prompts: usize,
    pub version: u32,
    pub format: DataFormat,
}
