pub mod cli;
pub mod codec;
pub mod config;
pub mod convert;
pub mod dataset;
pub mod entity;
pub mod error;
pub mod operation;

pub use dataset::QuipDataset;
pub use entity::{PromptV1, PromptV3, QuipPrompt, RawRecord, SchemaVersion};
pub use error::{QuipError, Result};
pub use operation::{ConversionReport, Operation};
