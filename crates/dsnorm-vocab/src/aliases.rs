//! Keyword alias tables.
//!
//! Providers spell the same platform or instrument in many ways. An alias
//! maps any of those spellings to the keyword the vocabulary actually uses.

use std::collections::BTreeMap;

use dsnorm_model::VocabularyCategory;

const BUILTIN_ALIASES: &[(VocabularyCategory, &str, &str)] = &[
    (VocabularyCategory::Instrument, "SAR-C SAR", "C-SAR"),
    (VocabularyCategory::Instrument, "SAR-C", "C-SAR"),
    (VocabularyCategory::Instrument, "C-BAND SAR", "C-SAR"),
    (VocabularyCategory::Instrument, "AMSR-2", "AMSR2"),
    (VocabularyCategory::Platform, "S1A", "Sentinel-1A"),
    (VocabularyCategory::Platform, "S1B", "Sentinel-1B"),
    (VocabularyCategory::Platform, "SENTINEL1A", "Sentinel-1A"),
    (VocabularyCategory::Platform, "SENTINEL1B", "Sentinel-1B"),
    (VocabularyCategory::Platform, "GCOM-W", "GCOM-W1"),
    (VocabularyCategory::Platform, "SHIZUKU", "GCOM-W1"),
    (VocabularyCategory::Provider, "EUROPEAN SPACE AGENCY", "ESA/EO"),
    (VocabularyCategory::Provider, "UNIVERSITY OF BREMEN", "UNI-BREMEN/IUP"),
    (VocabularyCategory::Provider, "MET NORWAY", "NO/MET"),
    (VocabularyCategory::Provider, "JAXA", "JP/JAXA/EOC"),
];

/// Many-aliases-to-one-canonical mapping per category.
///
/// Keys are stored uppercased; lookups ignore case and surrounding
/// whitespace.
#[derive(Debug, Clone, Default)]
pub struct AliasTable {
    aliases: BTreeMap<(VocabularyCategory, String), String>,
}

impl AliasTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Table with the aliases shipped inside the crate.
    pub fn builtin() -> Self {
        let mut table = Self::new();
        for (category, alias, canonical) in BUILTIN_ALIASES {
            table.insert(*category, alias, canonical);
        }
        table
    }

    /// Adds or replaces an alias.
    pub fn insert(&mut self, category: VocabularyCategory, alias: &str, canonical: &str) {
        self.aliases.insert(
            (category, alias.trim().to_uppercase()),
            canonical.to_string(),
        );
    }

    pub fn with_alias(mut self, category: VocabularyCategory, alias: &str, canonical: &str) -> Self {
        self.insert(category, alias, canonical);
        self
    }

    pub fn translate(&self, category: VocabularyCategory, keyword: &str) -> Option<&str> {
        self.aliases
            .get(&(category, keyword.trim().to_uppercase()))
            .map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.aliases.len()
    }

    pub fn is_empty(&self) -> bool {
        self.aliases.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn translates_case_insensitively() {
        let table = AliasTable::builtin();
        assert_eq!(
            table.translate(VocabularyCategory::Instrument, " sar-c sar "),
            Some("C-SAR")
        );
        assert_eq!(table.translate(VocabularyCategory::Platform, "SAR-C SAR"), None);
        assert_eq!(table.translate(VocabularyCategory::Instrument, "MODIS"), None);
    }

    #[test]
    fn custom_alias_overrides_builtin() {
        let table = AliasTable::builtin().with_alias(VocabularyCategory::Instrument, "SAR-C", "ASAR");
        assert_eq!(table.translate(VocabularyCategory::Instrument, "SAR-C"), Some("ASAR"));
    }
}
