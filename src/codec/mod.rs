//! Wire codecs for prompt datasets.
//!
//! Both codecs work on [`RawRecord`](crate::entity::RawRecord)s; turning
//! records into entities is the entity layer's job.

pub mod pet;
pub mod table;

pub use pet::{decode_document, encode_document};
pub use table::{decode_table, encode_table, CellKind};
