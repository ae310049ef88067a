//! In-memory prompt dataset.
//!
//! A dataset holds prompts of a single target version. Loading converts
//! every record to that version; writing converts again to the requested
//! output version before encoding.

mod writer;

pub use writer::{write_atomic, write_string_atomic};

use std::collections::HashSet;
use std::fs::File;
use std::io::{BufReader, Read, Write};
use std::path::Path;

use tracing::{debug, warn};

use crate::codec::{decode_table, encode_document, encode_table, pet};
use crate::convert::to_version;
use crate::entity::{QuipPrompt, RawRecord, SchemaVersion};
use crate::Result;

pub struct QuipDataset {
    target: SchemaVersion,
    prompts: Vec<QuipPrompt>,
}

impl QuipDataset {
    /// Create an empty dataset whose prompts will be held as `target`.
    pub fn new(target: SchemaVersion) -> Self {
        Self {
            target,
            prompts: Vec::new(),
        }
    }

    /// Open a JSON document as a dataset of `target` prompts
    pub fn open_pet(path: &Path, target: SchemaVersion) -> Result<Self> {
        let mut dataset = Self::new(target);
        dataset.load_pet(path)?;
        Ok(dataset)
    }

    /// Open a CSV sheet as a dataset of `target` prompts
    pub fn open_csv(path: &Path, target: SchemaVersion) -> Result<Self> {
        let mut dataset = Self::new(target);
        dataset.load_csv(path)?;
        Ok(dataset)
    }

    pub fn target(&self) -> SchemaVersion {
        self.target
    }

    pub fn prompts(&self) -> &[QuipPrompt] {
        &self.prompts
    }

    pub fn len(&self) -> usize {
        self.prompts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.prompts.is_empty()
    }

    /// Append the prompts of a JSON document file.
    pub fn load_pet(&mut self, path: &Path) -> Result<()> {
        let file = File::open(path)?;
        let records = pet::decode_document_reader(BufReader::new(file))?;
        debug!(path = %path.display(), records = records.len(), "read JSON document");
        self.push_records(&records)
    }

    /// Append the prompts of a JSON document held in memory.
    pub fn load_pet_str(&mut self, text: &str) -> Result<()> {
        let records = pet::decode_document(text)?;
        self.push_records(&records)
    }

    /// Append the prompts of a CSV sheet file.
    pub fn load_csv(&mut self, path: &Path) -> Result<()> {
        let file = File::open(path)?;
        debug!(path = %path.display(), "reading CSV sheet");
        self.load_csv_reader(BufReader::new(file))
    }

    /// Append the prompts of a CSV sheet from any reader.
    ///
    /// Rows are built by the version's CSV constructor, which reads the
    /// flattened columns directly instead of fingerprinting the row.
    pub fn load_csv_reader<R: Read>(&mut self, reader: R) -> Result<()> {
        let target = self.target;
        let rows = decode_table(reader, |column| target.cell_kind(column))?;
        let start = self.prompts.len();
        for (i, row) in rows.iter().enumerate() {
            let prompt = QuipPrompt::from_csv_record(row, i + 1, target)?;
            self.prompts.push(prompt);
        }
        self.warn_duplicate_ids(start);
        Ok(())
    }

    /// Build one `target` prompt from a JSON document record and append it.
    pub fn push_record(&mut self, record: &RawRecord) -> Result<()> {
        let prompt = QuipPrompt::from_raw_record(record, self.target)?;
        self.prompts.push(prompt);
        Ok(())
    }

    fn push_records(&mut self, records: &[RawRecord]) -> Result<()> {
        let start = self.prompts.len();
        self.prompts.reserve(records.len());
        for record in records {
            self.push_record(record)?;
        }
        self.warn_duplicate_ids(start);
        Ok(())
    }

    fn warn_duplicate_ids(&self, from: usize) {
        let mut seen: HashSet<String> = self.prompts[..from].iter().map(QuipPrompt::id).collect();
        for prompt in &self.prompts[from..] {
            let id = prompt.id();
            if !seen.insert(id.clone()) {
                warn!(id = %id, "duplicate prompt id in dataset");
            }
        }
    }

    /// Prompts converted to `to_version` and projected to wire records.
    pub fn records(&self, to_version: Option<SchemaVersion>) -> Result<Vec<RawRecord>> {
        self.prompts
            .iter()
            .map(|prompt| to_version_record(prompt, to_version))
            .collect()
    }

    /// Render the dataset as a JSON document.
    pub fn serialize_pet(&self, to_version: Option<SchemaVersion>) -> Result<String> {
        encode_document(&self.records(to_version)?)
    }

    /// Write the dataset as a CSV sheet to any writer.
    pub fn serialize_csv<W: Write>(&self, writer: W, to_version: Option<SchemaVersion>) -> Result<()> {
        encode_table(&self.records(to_version)?, writer)
    }

    /// Write the dataset as a JSON document, replacing `path`.
    pub fn write_pet(&self, path: &Path, to_version: Option<SchemaVersion>) -> Result<()> {
        let text = self.serialize_pet(to_version)?;
        write_string_atomic(path, &text)
    }

    /// Write the dataset as a CSV sheet, replacing `path`.
    pub fn write_csv(&self, path: &Path, to_version: Option<SchemaVersion>) -> Result<()> {
        let records = self.records(to_version)?;
        write_atomic(path, |out| encode_table(&records, out))
    }
}

fn to_version_record(prompt: &QuipPrompt, target: Option<SchemaVersion>) -> Result<RawRecord> {
    Ok(to_version(prompt, target)?.to_raw_record())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::{PromptV1, PromptV3};
    use crate::error::QuipError;
    use std::fs;
    use tempfile::TempDir;

    const V1_DOC: &str = r#"{"content": [
        {"id": 1, "prompt": "Name a food <ANY PLAYER> hates", "x": false},
        {"id": 2, "prompt": "The worst superpower", "x": true}
    ]}"#;

    const V3_DOC: &str = r#"{"content": [
        {"id": "10", "includesPlayerName": true, "prompt": "Rename <ANYPLAYER>",
         "safetyQuips": ["a", "b", "c"], "us": true, "x": false}
    ]}"#;

    #[test]
    fn test_load_v1_document_as_v3() {
        let mut dataset = QuipDataset::new(SchemaVersion::V3);
        dataset.load_pet_str(V1_DOC).unwrap();

        assert_eq!(dataset.len(), 2);
        match &dataset.prompts()[0] {
            QuipPrompt::V3(p) => {
                assert_eq!(p.id, "1");
                assert_eq!(p.prompt, "Name a food <ANYPLAYER> hates");
                assert!(p.includes_player_name);
            }
            other => panic!("Expected V3 prompt, got {:?}", other),
        }
    }

    #[test]
    fn test_serialize_v1_document_to_v3() {
        let mut dataset = QuipDataset::new(SchemaVersion::V3);
        dataset
            .load_pet_str(r#"{"content":[{"id":1,"prompt":"Name a food <ANY PLAYER> hates","x":false}]}"#)
            .unwrap();

        let text = dataset.serialize_pet(Some(SchemaVersion::V3)).unwrap();
        let expected = r#"{
  "content": [
    {
      "id": "1",
      "includesPlayerName": true,
      "prompt": "Name a food <ANYPLAYER> hates",
      "safetyQuips": [
        "jus de gouille",
        "le buszy",
        "jean-marc"
      ],
      "us": false,
      "x": false
    }
  ]
}
"#;
        assert_eq!(text, expected);
    }

    #[test]
    fn test_load_record_without_player_flag_as_v3() {
        let mut dataset = QuipDataset::new(SchemaVersion::V3);
        dataset
            .load_pet_str(
                r#"{"content":[
                    {"id":"QX-1","prompt":"Hi <ANY PLAYER>","x":false},
                    {"id":1,"prompt":"p","x":false,"us":true,"safetyQuips":["a","b","c"]}
                ]}"#,
            )
            .unwrap();

        let records = dataset.records(Some(SchemaVersion::V3)).unwrap();
        assert_eq!(records[0]["id"], "QX-1");
        assert_eq!(records[0]["prompt"], "Hi <ANYPLAYER>");
        assert_eq!(records[1]["us"], true);
        assert_eq!(records[1]["safetyQuips"], serde_json::json!(["a", "b", "c"]));
    }

    #[test]
    fn test_load_v3_document_as_v1() {
        let mut dataset = QuipDataset::new(SchemaVersion::V1);
        dataset.load_pet_str(V3_DOC).unwrap();

        assert_eq!(
            dataset.prompts()[0],
            QuipPrompt::V1(PromptV1::new(10, "Rename <ANY PLAYER>", true))
        );
    }

    #[test]
    fn test_load_stops_at_first_bad_record() {
        let mut dataset = QuipDataset::new(SchemaVersion::V3);
        let result = dataset.load_pet_str(r#"{"content": [{"id": 1, "prompt": "a", "x": false}, {}]}"#);
        assert!(matches!(result, Err(QuipError::UnknownSchemaVersion(_))));
    }

    #[test]
    fn test_csv_round_trip_through_files() {
        let tmp = TempDir::new().unwrap();
        let csv_path = tmp.path().join("prompts.csv");

        let mut dataset = QuipDataset::new(SchemaVersion::V3);
        dataset.load_pet_str(V3_DOC).unwrap();
        dataset.write_csv(&csv_path, Some(SchemaVersion::V3)).unwrap();

        let text = fs::read_to_string(&csv_path).unwrap();
        assert!(text.starts_with("id,includesPlayerName,prompt,safetyQuip_1,safetyQuip_2,safetyQuip_3,us,x\n"));

        let reloaded = QuipDataset::open_csv(&csv_path, SchemaVersion::V3).unwrap();
        assert_eq!(reloaded.prompts(), dataset.prompts());
    }

    #[test]
    fn test_csv_v3_sheet_loaded_as_v1() {
        let sheet = "id,includesPlayerName,prompt,safetyQuip_1,safetyQuip_2,safetyQuip_3,us,x\n\
                     4,true,Hug <ANYPLAYER>,a,b,c,false,true\n";
        let mut dataset = QuipDataset::new(SchemaVersion::V1);
        dataset.load_csv_reader(sheet.as_bytes()).unwrap();
        assert_eq!(
            dataset.prompts()[0],
            QuipPrompt::V1(PromptV1::new(4, "Hug <ANY PLAYER>", true))
        );
    }

    #[test]
    fn test_csv_v1_sheet_loaded_as_v3() {
        let sheet = "id,prompt,x\n4,Hug <ANY PLAYER>,false\n";
        let mut dataset = QuipDataset::new(SchemaVersion::V3);
        dataset.load_csv_reader(sheet.as_bytes()).unwrap();
        assert_eq!(
            dataset.prompts()[0],
            QuipPrompt::V3(PromptV3::new("4", "Hug <ANYPLAYER>", false))
        );
    }

    #[test]
    fn test_empty_dataset_cannot_become_csv() {
        let dataset = QuipDataset::new(SchemaVersion::V1);
        let mut buf = Vec::new();
        assert!(matches!(
            dataset.serialize_csv(&mut buf, Some(SchemaVersion::V1)),
            Err(QuipError::EmptyDataset)
        ));
    }

    #[test]
    fn test_failed_csv_write_leaves_no_file() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("out.csv");

        let dataset = QuipDataset::new(SchemaVersion::V3);
        assert!(dataset.write_csv(&path, Some(SchemaVersion::V3)).is_err());
        assert!(!path.exists());
    }

    #[test]
    fn test_load_merges_sources() {
        let mut dataset = QuipDataset::new(SchemaVersion::V1);
        dataset.load_pet_str(V1_DOC).unwrap();
        dataset.load_csv_reader("id,prompt,x\n3,Third,false\n".as_bytes()).unwrap();
        assert_eq!(dataset.len(), 3);
        assert_eq!(dataset.prompts()[2].id(), "3");
    }

    #[test]
    fn test_open_pet_from_file() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("quips.jet");
        fs::write(&path, V1_DOC).unwrap();

        let dataset = QuipDataset::open_pet(&path, SchemaVersion::V1).unwrap();
        assert_eq!(dataset.target(), SchemaVersion::V1);
        assert_eq!(dataset.len(), 2);

        let text = dataset.serialize_pet(None).unwrap();
        assert!(text.contains("\"id\": 2"));
    }
}
