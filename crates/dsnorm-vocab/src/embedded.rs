//! Seed vocabulary compiled into the crate.
//!
//! A small excerpt of the GCMD keyword lists, ISO 19115 topic categories and
//! CF standard names, enough to resolve the products the bundled provider
//! units recognize. Larger vocabularies are loaded from files at runtime.

use dsnorm_model::VocabularyCategory;

pub const PLATFORMS: &str = include_str!("../data/platforms.csv");

pub const INSTRUMENTS: &str = include_str!("../data/instruments.csv");

pub const PROVIDERS: &str = include_str!("../data/providers.csv");

pub const LOCATIONS: &str = include_str!("../data/locations.csv");

pub const ISO_TOPIC_CATEGORIES: &str = include_str!("../data/iso_topic_categories.csv");

/// CF standard names.
pub const PARAMETERS: &str = include_str!("../data/parameters.csv");

/// `(category, file name, contents)` for every seed file.
pub const SEED_FILES: &[(VocabularyCategory, &str, &str)] = &[
    (VocabularyCategory::Platform, "platforms.csv", PLATFORMS),
    (VocabularyCategory::Instrument, "instruments.csv", INSTRUMENTS),
    (VocabularyCategory::Provider, "providers.csv", PROVIDERS),
    (VocabularyCategory::Location, "locations.csv", LOCATIONS),
    (
        VocabularyCategory::IsoTopicCategory,
        "iso_topic_categories.csv",
        ISO_TOPIC_CATEGORIES,
    ),
    (VocabularyCategory::Parameter, "parameters.csv", PARAMETERS),
];
