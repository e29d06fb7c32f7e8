//! In-memory vocabulary catalog loaded from CSV.

use std::collections::BTreeMap;
use std::io::Read;

use csv::ReaderBuilder;
use dsnorm_model::{VocabularyCategory, VocabularyTerm};
use tracing::debug;

use crate::embedded;
use crate::error::{Result, VocabularyError};
use crate::service::VocabularyService;

#[derive(Debug, Clone)]
struct Entry {
    term: VocabularyTerm,
    /// Lowercased representation, matched by `search`.
    haystack: String,
}

impl Entry {
    fn new(term: VocabularyTerm) -> Self {
        let haystack = term.representation().to_lowercase();
        Self { term, haystack }
    }

    fn has_name(&self, keyword: &str) -> bool {
        self.term
            .names()
            .any(|name| !name.is_empty() && name.to_lowercase() == keyword)
    }
}

/// Read-only catalog of vocabulary terms grouped by category.
///
/// Terms keep their load order; both `search` and `get` report matches in
/// that order.
#[derive(Debug, Clone, Default)]
pub struct VocabularyCatalog {
    terms: BTreeMap<VocabularyCategory, Vec<Entry>>,
}

impl VocabularyCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Catalog seeded with the vocabulary shipped inside the crate.
    pub fn builtin() -> Result<Self> {
        let mut catalog = Self::new();
        for (category, name, contents) in embedded::SEED_FILES {
            catalog.load_csv(*category, contents.as_bytes(), name)?;
        }
        Ok(catalog)
    }

    pub fn insert(&mut self, term: VocabularyTerm) {
        self.terms
            .entry(term.category())
            .or_default()
            .push(Entry::new(term));
    }

    pub fn len(&self) -> usize {
        self.terms.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Terms of a category in load order.
    pub fn terms(&self, category: VocabularyCategory) -> impl Iterator<Item = &VocabularyTerm> {
        self.terms
            .get(&category)
            .into_iter()
            .flatten()
            .map(|entry| &entry.term)
    }

    /// Loads terms of `category` from CSV and appends them to the catalog.
    ///
    /// The header row must name every slot of the category layout; other
    /// columns are ignored. A leading `Keyword Version` banner line is
    /// skipped. Rows with no value in any slot are dropped. Returns the
    /// number of terms added.
    pub fn load_csv<R: Read>(
        &mut self,
        category: VocabularyCategory,
        mut reader: R,
        source_name: &str,
    ) -> Result<usize> {
        let mut contents = String::new();
        reader
            .read_to_string(&mut contents)
            .map_err(|error| VocabularyError::Csv {
                source_name: source_name.to_string(),
                message: error.to_string(),
            })?;
        let body = strip_banner(contents.trim_start_matches('\u{feff}'));

        let mut csv_reader = ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_reader(body.as_bytes());
        let headers = csv_reader
            .headers()
            .map_err(|error| VocabularyError::csv(source_name, &error))?
            .clone();

        let columns = category
            .schema()
            .iter()
            .map(|slot| {
                headers
                    .iter()
                    .position(|header| header.trim() == slot.key)
                    .ok_or(VocabularyError::MissingColumn {
                        source_name: source_name.to_string(),
                        category,
                        column: slot.key,
                    })
            })
            .collect::<Result<Vec<_>>>()?;

        let mut added = 0;
        for record in csv_reader.records() {
            let record = record.map_err(|error| VocabularyError::csv(source_name, &error))?;
            let values: Vec<String> = columns
                .iter()
                .map(|index| record.get(*index).unwrap_or("").trim().to_string())
                .collect();
            if values.iter().all(String::is_empty) {
                continue;
            }
            let term = VocabularyTerm::from_values(category, values).map_err(|error| {
                VocabularyError::Csv {
                    source_name: source_name.to_string(),
                    message: error.to_string(),
                }
            })?;
            self.insert(term);
            added += 1;
        }
        debug!(%category, source = source_name, added, "loaded vocabulary terms");
        Ok(added)
    }
}

fn strip_banner(contents: &str) -> &str {
    let first_line = contents.lines().next().unwrap_or("");
    if first_line.trim_start_matches('"').starts_with("Keyword Version") {
        contents
            .split_once('\n')
            .map(|(_, rest)| rest)
            .unwrap_or("")
    } else {
        contents
    }
}

impl VocabularyService for VocabularyCatalog {
    fn search(&self, category: VocabularyCategory, keyword: &str) -> Result<Vec<VocabularyTerm>> {
        let needle = keyword.to_lowercase();
        Ok(self
            .terms
            .get(&category)
            .into_iter()
            .flatten()
            .filter(|entry| entry.haystack.contains(&needle))
            .map(|entry| entry.term.clone())
            .collect())
    }

    fn get(&self, category: VocabularyCategory, keyword: &str) -> Result<Option<VocabularyTerm>> {
        let needle = keyword.trim().to_lowercase();
        if needle.is_empty() {
            return Ok(None);
        }
        Ok(self
            .terms
            .get(&category)
            .into_iter()
            .flatten()
            .find(|entry| entry.has_name(&needle))
            .map(|entry| entry.term.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PLATFORMS: &str = "\
\"Keyword Version: 17.9\",\"Revision: 2024-01-08\"
Category,Series_Entity,Short_Name,Long_Name,UUID
Earth Observation Satellites,Sentinel-1,Sentinel-1A,,a1
Earth Observation Satellites,Sentinel-1,Sentinel-1B,,b1
,,,,c1
";

    #[test]
    fn loads_csv_skipping_banner_and_extra_columns() {
        let mut catalog = VocabularyCatalog::new();
        let added = catalog
            .load_csv(VocabularyCategory::Platform, PLATFORMS.as_bytes(), "platforms.csv")
            .unwrap();
        assert_eq!(added, 2);
        let names: Vec<_> = catalog
            .terms(VocabularyCategory::Platform)
            .map(VocabularyTerm::short_name)
            .collect();
        assert_eq!(names, vec!["Sentinel-1A", "Sentinel-1B"]);
    }

    #[test]
    fn rejects_missing_columns() {
        let csv = "Category,Short_Name\nEarth Observation Satellites,Aqua\n";
        let err = VocabularyCatalog::new()
            .load_csv(VocabularyCategory::Platform, csv.as_bytes(), "broken.csv")
            .unwrap_err();
        assert_eq!(
            err,
            VocabularyError::MissingColumn {
                source_name: "broken.csv".to_string(),
                category: VocabularyCategory::Platform,
                column: "Series_Entity",
            }
        );
    }

    #[test]
    fn search_and_get_are_case_insensitive() {
        let mut catalog = VocabularyCatalog::new();
        catalog
            .load_csv(VocabularyCategory::Platform, PLATFORMS.as_bytes(), "platforms.csv")
            .unwrap();
        let hits = catalog.search(VocabularyCategory::Platform, "SENTINEL-1").unwrap();
        assert_eq!(hits.len(), 2);
        assert!(catalog.search(VocabularyCategory::Instrument, "sentinel").unwrap().is_empty());

        let term = catalog.get(VocabularyCategory::Platform, "sentinel-1b").unwrap();
        assert_eq!(term.map(|t| t.short_name().to_string()), Some("Sentinel-1B".to_string()));
        assert_eq!(catalog.get(VocabularyCategory::Platform, "Sentinel").unwrap(), None);
        assert_eq!(catalog.get(VocabularyCategory::Platform, "  ").unwrap(), None);
    }

    #[test]
    fn builtin_seed_loads_every_category() {
        let catalog = VocabularyCatalog::builtin().unwrap();
        for category in VocabularyCategory::ALL {
            assert!(
                catalog.terms(category).next().is_some(),
                "no builtin terms for {category}"
            );
        }
    }
}
