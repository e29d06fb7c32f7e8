//! Canonical dataset metadata model.
//!
//! Shared by every crate of the workspace: raw input maps, the fixed set of
//! output fields, typed values, vocabulary terms and the error taxonomy.

pub mod error;
pub mod field;
pub mod raw;
pub mod record;
pub mod value;
pub mod vocabulary;

pub use error::{ExtractError, NormalizationError, Result};
pub use field::FieldName;
pub use raw::{RAW_EXCERPT_LIMIT, RawMetadata};
pub use record::NormalizedRecord;
pub use value::FieldValue;
pub use vocabulary::{
    Slot, SlotKind, TermShapeError, UNKNOWN, VocabularyCategory, VocabularyTerm, truncate_chars,
};
