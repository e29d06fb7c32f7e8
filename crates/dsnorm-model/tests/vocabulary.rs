#![allow(missing_docs)]

use dsnorm_model::{SlotKind, UNKNOWN, VocabularyCategory, VocabularyTerm};

#[test]
fn every_category_layout_has_a_name_slot() {
    for category in VocabularyCategory::ALL {
        assert!(
            category.name_slots().next().is_some(),
            "{category} has no name slot"
        );
    }
}

#[test]
fn name_slot_limits() {
    let limits = |category: VocabularyCategory| -> Vec<usize> {
        category
            .schema()
            .iter()
            .filter_map(|slot| match slot.kind {
                SlotKind::Name { max_len } => Some(max_len),
                _ => None,
            })
            .collect()
    };
    assert_eq!(limits(VocabularyCategory::Platform), vec![100, 250]);
    assert_eq!(limits(VocabularyCategory::Instrument), vec![60, 200]);
    assert_eq!(limits(VocabularyCategory::Provider), vec![50, 250]);
    assert_eq!(limits(VocabularyCategory::Location), vec![80]);
    assert_eq!(limits(VocabularyCategory::IsoTopicCategory), vec![80]);
    assert_eq!(limits(VocabularyCategory::Parameter), vec![250]);
}

#[test]
fn platform_placeholder() {
    let term = VocabularyTerm::placeholder(VocabularyCategory::Platform, "TEST", "");
    assert_eq!(term.get("Category"), Some(UNKNOWN));
    assert_eq!(term.get("Series_Entity"), Some(UNKNOWN));
    assert_eq!(term.get("Short_Name"), Some("TEST"));
    assert_eq!(term.get("Long_Name"), Some("TEST"));
    assert_eq!(term.short_name(), "TEST");
}

#[test]
fn canonical_term_is_not_a_placeholder() {
    let term = VocabularyTerm::from_pairs(
        VocabularyCategory::Platform,
        [
            ("Category", "Earth Observation Satellites"),
            ("Series_Entity", "Sentinel-1"),
            ("Short_Name", "Sentinel-1A"),
            ("Long_Name", ""),
        ],
    )
    .unwrap();
    assert!(!term.is_placeholder());
    assert_eq!(
        term.representation(),
        "Earth Observation Satellites > Sentinel-1 > Sentinel-1A"
    );
    assert_eq!(term.to_string(), "Sentinel-1A");
}

#[test]
fn category_names_parse() {
    assert_eq!(
        "iso-topic-category".parse::<VocabularyCategory>(),
        Ok(VocabularyCategory::IsoTopicCategory)
    );
    assert_eq!("Platform".parse::<VocabularyCategory>(), Ok(VocabularyCategory::Platform));
    assert!("satellite".parse::<VocabularyCategory>().is_err());
}

#[test]
fn rejects_terms_with_missing_slots_when_deserializing() {
    let json = r#"{"category":"platform","fields":{"Short_Name":"Aqua"}}"#;
    assert!(serde_json::from_str::<VocabularyTerm>(json).is_err());
}

mod properties {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn placeholder_slots_respect_limits(keyword in "\\PC{0,400}", index in 0usize..6) {
            let category = VocabularyCategory::ALL[index];
            let term = VocabularyTerm::placeholder(category, &keyword, "");
            prop_assert_eq!(term.values().len(), category.schema().len());
            for (slot, value) in category.schema().iter().zip(term.values()) {
                match slot.kind {
                    SlotKind::Name { max_len } => {
                        prop_assert!(value.chars().count() <= max_len);
                        prop_assert!(keyword.starts_with(value.as_str()));
                    }
                    SlotKind::Classification => prop_assert_eq!(value.as_str(), UNKNOWN),
                    SlotKind::Url | SlotKind::Blank => prop_assert!(value.is_empty()),
                }
            }
        }
    }
}
