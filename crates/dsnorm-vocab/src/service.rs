//! Vocabulary service contract.

use std::sync::Arc;

use dsnorm_model::{VocabularyCategory, VocabularyTerm};

use crate::error::Result;

/// Read-only lookup service over a controlled vocabulary.
///
/// Implementations must be safe to share across threads; the resolver holds
/// one behind an `Arc` and never mutates it.
pub trait VocabularyService: Send + Sync {
    /// All terms of `category` whose representation contains `keyword`,
    /// compared case-insensitively, in load order.
    fn search(&self, category: VocabularyCategory, keyword: &str) -> Result<Vec<VocabularyTerm>>;

    /// The first term of `category` with a name slot equal to `keyword`
    /// (case-insensitive), or `Ok(None)`.
    fn get(&self, category: VocabularyCategory, keyword: &str) -> Result<Option<VocabularyTerm>>;
}

impl<T: VocabularyService + ?Sized> VocabularyService for Arc<T> {
    fn search(&self, category: VocabularyCategory, keyword: &str) -> Result<Vec<VocabularyTerm>> {
        (**self).search(category, keyword)
    }

    fn get(&self, category: VocabularyCategory, keyword: &str) -> Result<Option<VocabularyTerm>> {
        (**self).get(category, keyword)
    }
}
