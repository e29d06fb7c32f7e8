//! Keyword to vocabulary term resolution.
//!
//! Resolution runs four steps and stops at the first that yields a term:
//!
//! 1. **Alias**: translate the keyword through the category's alias table.
//! 2. **Search**: fuzzy search with the translated keyword. A single hit is
//!    returned; several hits are narrowed with the disambiguators.
//! 3. **Strict get**: exact name lookup with the *original* keyword.
//! 4. **Synthesis**: a placeholder term built from the original keyword.
//!
//! Step 4 cannot fail, so every keyword resolves to a well-formed term. Only
//! service failures are reported as errors.

use std::sync::Arc;

use dsnorm_model::{VocabularyCategory, VocabularyTerm};
use tracing::debug;

use crate::aliases::AliasTable;
use crate::error::Result;
use crate::service::VocabularyService;

/// Narrows `candidates` with each disambiguator in turn.
///
/// A disambiguator replaces the current set with the members whose
/// representation contains it (case-insensitive), but only when that subset
/// is non-empty and strictly smaller. Narrowing stops once a single candidate
/// is left and never revisits an earlier disambiguator.
pub fn narrow(candidates: Vec<VocabularyTerm>, disambiguators: &[&str]) -> Vec<VocabularyTerm> {
    let mut current = candidates;
    for disambiguator in disambiguators {
        if current.len() <= 1 {
            break;
        }
        let needle = disambiguator.to_lowercase();
        let subset: Vec<VocabularyTerm> = current
            .iter()
            .filter(|term| term.representation().to_lowercase().contains(&needle))
            .cloned()
            .collect();
        if !subset.is_empty() && subset.len() < current.len() {
            current = subset;
        }
    }
    current
}

fn looks_like_url(candidate: &str) -> bool {
    let lower = candidate.trim().to_ascii_lowercase();
    lower.contains("://") || lower.starts_with("www.")
}

/// Resolves free-text keywords to vocabulary terms.
#[derive(Clone)]
pub struct VocabularyResolver {
    service: Arc<dyn VocabularyService>,
    aliases: AliasTable,
}

impl std::fmt::Debug for VocabularyResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VocabularyResolver")
            .field("aliases", &self.aliases.len())
            .finish_non_exhaustive()
    }
}

impl VocabularyResolver {
    /// Resolver over `service` with the builtin alias table.
    pub fn new(service: Arc<dyn VocabularyService>) -> Self {
        Self {
            service,
            aliases: AliasTable::builtin(),
        }
    }

    pub fn with_aliases(mut self, aliases: AliasTable) -> Self {
        self.aliases = aliases;
        self
    }

    pub fn aliases(&self) -> &AliasTable {
        &self.aliases
    }

    /// Resolves `keyword` to a term of `category`.
    pub fn resolve(
        &self,
        category: VocabularyCategory,
        keyword: &str,
        disambiguators: &[&str],
    ) -> Result<VocabularyTerm> {
        let trimmed = keyword.trim();
        if trimmed.is_empty() {
            return Ok(Self::synthesize(category, trimmed, ""));
        }
        match self.lookup(category, trimmed, disambiguators)? {
            Some(term) => Ok(term),
            None => {
                debug!(%category, keyword = trimmed, "no vocabulary match, synthesizing placeholder");
                Ok(Self::synthesize(category, trimmed, ""))
            }
        }
    }

    /// Steps 1 to 3; `None` when the keyword has no canonical term.
    fn lookup(
        &self,
        category: VocabularyCategory,
        keyword: &str,
        disambiguators: &[&str],
    ) -> Result<Option<VocabularyTerm>> {
        let translated = self.aliases.translate(category, keyword).unwrap_or(keyword);
        if translated != keyword {
            debug!(%category, keyword, translated, "translated vocabulary alias");
        }

        let hits = self.service.search(category, translated)?;
        match hits.len() {
            0 => {}
            1 => return Ok(hits.into_iter().next()),
            count => {
                let narrowed = narrow(hits, disambiguators);
                debug!(%category, keyword = translated, count, remaining = narrowed.len(), "disambiguated search hits");
                if narrowed.len() == 1 {
                    return Ok(narrowed.into_iter().next());
                }
            }
        }

        self.service.get(category, keyword)
    }

    /// Placeholder term for a keyword without a canonical match.
    pub fn synthesize(category: VocabularyCategory, keyword: &str, url: &str) -> VocabularyTerm {
        VocabularyTerm::placeholder(category, keyword, url)
    }

    pub fn resolve_platform(&self, keyword: &str, disambiguators: &[&str]) -> Result<VocabularyTerm> {
        self.resolve(VocabularyCategory::Platform, keyword, disambiguators)
    }

    pub fn resolve_instrument(
        &self,
        keyword: &str,
        disambiguators: &[&str],
    ) -> Result<VocabularyTerm> {
        self.resolve(VocabularyCategory::Instrument, keyword, disambiguators)
    }

    /// Resolves a provider from candidate names and URLs, tried in order.
    ///
    /// Blank candidates are ignored. When nothing resolves, the placeholder
    /// takes its names from the first non-URL candidate (or the first
    /// candidate) and its URL from the first URL-looking candidate.
    pub fn resolve_provider(&self, candidates: &[&str]) -> Result<VocabularyTerm> {
        let candidates: Vec<&str> = candidates
            .iter()
            .map(|candidate| candidate.trim())
            .filter(|candidate| !candidate.is_empty())
            .collect();
        for candidate in &candidates {
            if let Some(term) = self.lookup(VocabularyCategory::Provider, candidate, &[])? {
                return Ok(term);
            }
        }

        let name = candidates
            .iter()
            .find(|candidate| !looks_like_url(candidate))
            .or_else(|| candidates.first())
            .copied()
            .unwrap_or("");
        let url = candidates
            .iter()
            .find(|candidate| looks_like_url(candidate))
            .copied()
            .unwrap_or("");
        debug!(name, url, "no provider match, synthesizing placeholder");
        Ok(Self::synthesize(VocabularyCategory::Provider, name, url))
    }

    pub fn resolve_location(&self, keyword: &str) -> Result<VocabularyTerm> {
        self.resolve(VocabularyCategory::Location, keyword, &[])
    }

    pub fn resolve_iso_topic_category(&self, keyword: &str) -> Result<VocabularyTerm> {
        self.resolve(VocabularyCategory::IsoTopicCategory, keyword, &[])
    }

    /// Resolves a CF standard name.
    pub fn resolve_parameter(&self, keyword: &str) -> Result<VocabularyTerm> {
        self.resolve(VocabularyCategory::Parameter, keyword, &[])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::VocabularyCatalog;
    use crate::error::VocabularyError;
    use dsnorm_model::UNKNOWN;

    fn resolver() -> VocabularyResolver {
        VocabularyResolver::new(Arc::new(VocabularyCatalog::builtin().unwrap()))
    }

    fn instrument(short_name: &str, class: &str) -> VocabularyTerm {
        VocabularyTerm::from_pairs(
            VocabularyCategory::Instrument,
            [
                ("Category", "Earth Remote Sensing Instruments"),
                ("Class", class),
                ("Type", "Imaging Radars"),
                ("Subtype", ""),
                ("Short_Name", short_name),
                ("Long_Name", ""),
            ],
        )
        .unwrap()
    }

    #[test]
    fn alias_and_disambiguator_select_sentinel_sar() {
        let term = resolver().resolve_instrument("SAR-C SAR", &["SENTINEL-1"]).unwrap();
        assert_eq!(term.get("Short_Name"), Some("SENTINEL-1 C-SAR"));
    }

    #[test]
    fn unknown_platform_is_synthesized() {
        let term = resolver().resolve_platform("TEST", &[]).unwrap();
        assert_eq!(term.get("Category"), Some(UNKNOWN));
        assert_eq!(term.get("Short_Name"), Some("TEST"));
        assert_eq!(term.get("Long_Name"), Some("TEST"));
    }

    #[test]
    fn ambiguous_search_falls_back_to_strict_get() {
        // Both C-SAR terms match the search; the exact name picks one.
        let term = resolver().resolve_instrument("c-sar", &[]).unwrap();
        assert_eq!(term.short_name(), "C-SAR");
        assert!(!term.is_placeholder());

        // Strict get uses the untranslated keyword.
        let term = resolver().resolve_instrument("SAR-C SAR", &[]).unwrap();
        assert!(term.is_placeholder());
        assert_eq!(term.short_name(), "SAR-C SAR");

        // Two hits, no disambiguators and no exact name.
        let term = resolver().resolve_platform("Sentinel-1", &[]).unwrap();
        assert!(term.is_placeholder());
        assert_eq!(term.short_name(), "Sentinel-1");
    }

    #[test]
    fn narrowing_skips_disambiguators_that_empty_or_keep_the_set() {
        let candidates = vec![
            instrument("ALPHA", "Active Remote Sensing"),
            instrument("BETA", "Active Remote Sensing"),
            instrument("GAMMA", "Passive Remote Sensing"),
        ];
        // "zzz" matches nothing, "remote" matches all: both skipped.
        let narrowed = narrow(candidates.clone(), &["zzz", "remote", "active", "beta"]);
        assert_eq!(narrowed, vec![candidates[1].clone()]);

        let narrowed = narrow(candidates.clone(), &["active"]);
        assert_eq!(narrowed.len(), 2);
    }

    #[test]
    fn narrowing_stops_at_one_candidate() {
        let candidates = vec![
            instrument("ALPHA", "Active Remote Sensing"),
            instrument("BETA", "Passive Remote Sensing"),
        ];
        let narrowed = narrow(candidates.clone(), &["alpha", "beta"]);
        assert_eq!(narrowed, vec![candidates[0].clone()]);
    }

    #[test]
    fn provider_candidates_tried_in_order() {
        let term = resolver()
            .resolve_provider(&["Nobody Inc", "University of Bremen"])
            .unwrap();
        assert_eq!(term.short_name(), "UNI-BREMEN/IUP");
    }

    #[test]
    fn provider_placeholder_splits_names_and_urls() {
        let term = resolver()
            .resolve_provider(&["https://acme.example.org", "ACME Ocean Lab"])
            .unwrap();
        assert_eq!(term.get("Short_Name"), Some("ACME Ocean Lab"));
        assert_eq!(term.get("Data_Center_URL"), Some("https://acme.example.org"));
        assert_eq!(term.get("Bucket_Level0"), Some(UNKNOWN));

        let term = resolver().resolve_provider(&["https://only.example.org"]).unwrap();
        assert_eq!(term.get("Short_Name"), Some("https://only.example.org"));

        let term = resolver().resolve_provider(&[]).unwrap();
        assert_eq!(term.get("Short_Name"), Some(""));
    }

    #[test]
    fn blank_provider_candidates_are_ignored() {
        let term = resolver()
            .resolve_provider(&["", "  ", "ACME Ocean Lab", "https://acme.example.org"])
            .unwrap();
        assert!(term.is_placeholder());
        assert_eq!(term.get("Short_Name"), Some("ACME Ocean Lab"));
        assert_eq!(term.get("Long_Name"), Some("ACME Ocean Lab"));
        assert_eq!(term.get("Data_Center_URL"), Some("https://acme.example.org"));

        let term = resolver().resolve_provider(&[" ", "https://only.example.org"]).unwrap();
        assert_eq!(term.get("Short_Name"), Some("https://only.example.org"));
    }

    #[test]
    fn empty_keyword_synthesizes_directly() {
        let term = resolver().resolve_platform("", &[]).unwrap();
        assert_eq!(term.get("Category"), Some(UNKNOWN));
        assert_eq!(term.short_name(), "");

        let term = resolver().resolve_platform("   ", &[]).unwrap();
        assert_eq!(term.get("Short_Name"), Some(""));
        assert_eq!(term.get("Long_Name"), Some(""));
    }

    struct Offline;

    impl VocabularyService for Offline {
        fn search(&self, _: VocabularyCategory, _: &str) -> Result<Vec<VocabularyTerm>> {
            Err(VocabularyError::unavailable("connection refused"))
        }

        fn get(&self, _: VocabularyCategory, _: &str) -> Result<Option<VocabularyTerm>> {
            Err(VocabularyError::unavailable("connection refused"))
        }
    }

    #[test]
    fn service_failures_surface() {
        let resolver = VocabularyResolver::new(Arc::new(Offline));
        let err = resolver.resolve_platform("Aqua", &[]).unwrap_err();
        assert_eq!(err, VocabularyError::unavailable("connection refused"));
        // Empty keywords never reach the service.
        assert!(resolver.resolve_platform(" ", &[]).is_ok());
    }
}
