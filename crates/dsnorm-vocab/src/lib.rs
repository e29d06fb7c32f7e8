//! Controlled vocabulary resolution.
//!
//! Maps free-text platform, instrument, provider and related keywords onto
//! canonical vocabulary terms, synthesizing a placeholder when no canonical
//! term exists.

pub mod aliases;
pub mod catalog;
pub mod embedded;
pub mod error;
pub mod resolver;
pub mod service;

pub use aliases::AliasTable;
pub use catalog::VocabularyCatalog;
pub use error::{Result, VocabularyError};
pub use resolver::{VocabularyResolver, narrow};
pub use service::VocabularyService;
