//! Controlled vocabulary term model.
//!
//! A vocabulary term is a fixed-shape, ordered record whose layout depends on
//! its category. Every slot is always present:
//!
//! - **Classification** slots (e.g. `Category`, `Bucket_Level0`) hold the
//!   literal [`UNKNOWN`] in a synthesized placeholder.
//! - **Name** slots (`Short_Name`, `Long_Name`, ...) hold the raw keyword,
//!   capped at the slot's maximum length.
//! - **Url** slots hold the supplied URL or an empty string.
//! - **Blank** slots are empty in a placeholder.
//!
//! ## Layouts
//!
//! ```text
//! Platform:          Category, Series_Entity, Short_Name(100), Long_Name(250)
//! Instrument:        Category, Class, Type, Subtype, Short_Name(60), Long_Name(200)
//! Provider:          Bucket_Level0..3, Short_Name(50), Long_Name(250), Data_Center_URL
//! Location:          Location_Category, Location_Type(80), Location_Subregion1..3
//! IsoTopicCategory:  iso_topic_category(80)
//! Parameter:         standard_name(250), canonical_units, definition
//! ```

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::de::Error as _;
use serde::ser::{SerializeMap, SerializeStruct};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;

/// Sentinel used in classification slots when no canonical term exists.
pub const UNKNOWN: &str = "Unknown";

/// Vocabulary category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VocabularyCategory {
    Platform,
    Instrument,
    Provider,
    Location,
    IsoTopicCategory,
    Parameter,
}

/// How a slot is filled when a placeholder is synthesized.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlotKind {
    /// Filled with [`UNKNOWN`].
    Classification,
    /// Filled with the keyword, truncated to `max_len` characters.
    Name { max_len: usize },
    /// Filled with the supplied URL, or empty.
    Url,
    /// Left empty.
    Blank,
}

/// One slot of a category layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Slot {
    pub key: &'static str,
    pub kind: SlotKind,
}

const fn classification(key: &'static str) -> Slot {
    Slot {
        key,
        kind: SlotKind::Classification,
    }
}

const fn name(key: &'static str, max_len: usize) -> Slot {
    Slot {
        key,
        kind: SlotKind::Name { max_len },
    }
}

const fn url(key: &'static str) -> Slot {
    Slot {
        key,
        kind: SlotKind::Url,
    }
}

const fn blank(key: &'static str) -> Slot {
    Slot {
        key,
        kind: SlotKind::Blank,
    }
}

const PLATFORM_SCHEMA: &[Slot] = &[
    classification("Category"),
    classification("Series_Entity"),
    name("Short_Name", 100),
    name("Long_Name", 250),
];

const INSTRUMENT_SCHEMA: &[Slot] = &[
    classification("Category"),
    classification("Class"),
    classification("Type"),
    classification("Subtype"),
    name("Short_Name", 60),
    name("Long_Name", 200),
];

const PROVIDER_SCHEMA: &[Slot] = &[
    classification("Bucket_Level0"),
    classification("Bucket_Level1"),
    classification("Bucket_Level2"),
    classification("Bucket_Level3"),
    name("Short_Name", 50),
    name("Long_Name", 250),
    url("Data_Center_URL"),
];

const LOCATION_SCHEMA: &[Slot] = &[
    classification("Location_Category"),
    name("Location_Type", 80),
    blank("Location_Subregion1"),
    blank("Location_Subregion2"),
    blank("Location_Subregion3"),
];

const ISO_TOPIC_CATEGORY_SCHEMA: &[Slot] = &[name("iso_topic_category", 80)];

const PARAMETER_SCHEMA: &[Slot] = &[
    name("standard_name", 250),
    classification("canonical_units"),
    blank("definition"),
];

impl VocabularyCategory {
    pub const ALL: [VocabularyCategory; 6] = [
        VocabularyCategory::Platform,
        VocabularyCategory::Instrument,
        VocabularyCategory::Provider,
        VocabularyCategory::Location,
        VocabularyCategory::IsoTopicCategory,
        VocabularyCategory::Parameter,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            VocabularyCategory::Platform => "platform",
            VocabularyCategory::Instrument => "instrument",
            VocabularyCategory::Provider => "provider",
            VocabularyCategory::Location => "location",
            VocabularyCategory::IsoTopicCategory => "iso_topic_category",
            VocabularyCategory::Parameter => "parameter",
        }
    }

    /// Ordered slot layout of the category.
    pub fn schema(&self) -> &'static [Slot] {
        match self {
            VocabularyCategory::Platform => PLATFORM_SCHEMA,
            VocabularyCategory::Instrument => INSTRUMENT_SCHEMA,
            VocabularyCategory::Provider => PROVIDER_SCHEMA,
            VocabularyCategory::Location => LOCATION_SCHEMA,
            VocabularyCategory::IsoTopicCategory => ISO_TOPIC_CATEGORY_SCHEMA,
            VocabularyCategory::Parameter => PARAMETER_SCHEMA,
        }
    }

    pub fn slot_index(&self, key: &str) -> Option<usize> {
        self.schema().iter().position(|slot| slot.key == key)
    }

    /// Indices of the name slots, in layout order.
    pub fn name_slots(&self) -> impl Iterator<Item = usize> {
        self.schema()
            .iter()
            .enumerate()
            .filter(|(_, slot)| matches!(slot.kind, SlotKind::Name { .. }))
            .map(|(index, _)| index)
    }
}

impl fmt::Display for VocabularyCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for VocabularyCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase().replace('-', "_");
        VocabularyCategory::ALL
            .into_iter()
            .find(|category| category.as_str() == normalized)
            .ok_or_else(|| format!("Unknown vocabulary category: {s}"))
    }
}

/// A term whose slots do not match its category layout.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TermShapeError {
    #[error("{category} term is missing field '{field}'")]
    MissingField {
        category: VocabularyCategory,
        field: &'static str,
    },

    #[error("{category} terms have no field '{field}'")]
    UnknownField {
        category: VocabularyCategory,
        field: String,
    },

    #[error("{category} terms have {expected} fields, got {actual}")]
    WrongArity {
        category: VocabularyCategory,
        expected: usize,
        actual: usize,
    },
}

/// A canonical (or synthesized) vocabulary term.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct VocabularyTerm {
    category: VocabularyCategory,
    values: Vec<String>,
}

impl VocabularyTerm {
    /// Builds a term from values given in layout order.
    pub fn from_values(
        category: VocabularyCategory,
        values: Vec<String>,
    ) -> Result<Self, TermShapeError> {
        let expected = category.schema().len();
        if values.len() != expected {
            return Err(TermShapeError::WrongArity {
                category,
                expected,
                actual: values.len(),
            });
        }
        Ok(Self { category, values })
    }

    /// Builds a term from `(key, value)` pairs in any order.
    ///
    /// Every slot of the layout must be supplied and no foreign key may appear.
    pub fn from_pairs<I, K, V>(category: VocabularyCategory, pairs: I) -> Result<Self, TermShapeError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        let schema = category.schema();
        let mut values: Vec<Option<String>> = vec![None; schema.len()];
        for (key, value) in pairs {
            let key = key.as_ref();
            let index = category
                .slot_index(key)
                .ok_or_else(|| TermShapeError::UnknownField {
                    category,
                    field: key.to_string(),
                })?;
            values[index] = Some(value.into());
        }
        let values = values
            .into_iter()
            .zip(schema)
            .map(|(value, slot)| {
                value.ok_or(TermShapeError::MissingField {
                    category,
                    field: slot.key,
                })
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { category, values })
    }

    /// Synthesizes a placeholder for a keyword with no canonical term.
    pub fn placeholder(category: VocabularyCategory, keyword: &str, url: &str) -> Self {
        let values = category
            .schema()
            .iter()
            .map(|slot| match slot.kind {
                SlotKind::Classification => UNKNOWN.to_string(),
                SlotKind::Name { max_len } => truncate_chars(keyword, max_len),
                SlotKind::Url => url.to_string(),
                SlotKind::Blank => String::new(),
            })
            .collect();
        Self { category, values }
    }

    pub fn category(&self) -> VocabularyCategory {
        self.category
    }

    /// Value of a slot by key.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.category
            .slot_index(key)
            .map(|index| self.values[index].as_str())
    }

    /// First name slot (`Short_Name` for most categories).
    pub fn short_name(&self) -> &str {
        self.category
            .name_slots()
            .next()
            .map(|index| self.values[index].as_str())
            .unwrap_or_default()
    }

    /// Values of the name slots, in layout order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.category
            .name_slots()
            .map(|index| self.values[index].as_str())
    }

    /// `(key, value)` pairs in layout order.
    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &str)> {
        self.category
            .schema()
            .iter()
            .zip(&self.values)
            .map(|(slot, value)| (slot.key, value.as_str()))
    }

    pub fn values(&self) -> &[String] {
        &self.values
    }

    /// Flat textual form searched by fuzzy lookup and disambiguation.
    ///
    /// Non-empty slot values joined in layout order, e.g.
    /// `Earth Observation Satellites > Sentinel-1 > Sentinel-1A`.
    pub fn representation(&self) -> String {
        self.values
            .iter()
            .filter(|value| !value.is_empty())
            .map(String::as_str)
            .collect::<Vec<_>>()
            .join(" > ")
    }

    /// Returns true when every classification slot holds [`UNKNOWN`].
    pub fn is_placeholder(&self) -> bool {
        let mut classifications = self
            .category
            .schema()
            .iter()
            .zip(&self.values)
            .filter(|(slot, _)| slot.kind == SlotKind::Classification)
            .peekable();
        classifications.peek().is_some() && classifications.all(|(_, value)| value == UNKNOWN)
    }
}

impl fmt::Display for VocabularyTerm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.short_name())
    }
}

/// Truncates to at most `max_len` characters without splitting a code point.
pub fn truncate_chars(value: &str, max_len: usize) -> String {
    value.chars().take(max_len).collect()
}

struct OrderedSlots<'a>(&'a VocabularyTerm);

impl Serialize for OrderedSlots<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.values.len()))?;
        for (key, value) in self.0.iter() {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

impl Serialize for VocabularyTerm {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("VocabularyTerm", 2)?;
        state.serialize_field("category", &self.category)?;
        state.serialize_field("fields", &OrderedSlots(self))?;
        state.end()
    }
}

#[derive(Deserialize)]
struct TermRepr {
    category: VocabularyCategory,
    fields: BTreeMap<String, String>,
}

impl<'de> Deserialize<'de> for VocabularyTerm {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let repr = TermRepr::deserialize(deserializer)?;
        VocabularyTerm::from_pairs(repr.category, repr.fields).map_err(D::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn placeholder_fills_every_slot() {
        let term = VocabularyTerm::placeholder(VocabularyCategory::Provider, "ACME", "https://acme.org");
        assert_eq!(term.get("Bucket_Level0"), Some(UNKNOWN));
        assert_eq!(term.get("Bucket_Level3"), Some(UNKNOWN));
        assert_eq!(term.get("Short_Name"), Some("ACME"));
        assert_eq!(term.get("Long_Name"), Some("ACME"));
        assert_eq!(term.get("Data_Center_URL"), Some("https://acme.org"));
        assert!(term.is_placeholder());
    }

    #[test]
    fn placeholder_truncates_on_char_boundaries() {
        let keyword = "é".repeat(300);
        let term = VocabularyTerm::placeholder(VocabularyCategory::Instrument, &keyword, "");
        assert_eq!(term.get("Short_Name").map(|v| v.chars().count()), Some(60));
        assert_eq!(term.get("Long_Name").map(|v| v.chars().count()), Some(200));
    }

    #[test]
    fn from_pairs_rejects_partial_terms() {
        let err = VocabularyTerm::from_pairs(
            VocabularyCategory::Platform,
            [("Category", "Earth Observation Satellites"), ("Short_Name", "Aqua")],
        )
        .unwrap_err();
        assert_eq!(
            err,
            TermShapeError::MissingField {
                category: VocabularyCategory::Platform,
                field: "Series_Entity"
            }
        );

        let err = VocabularyTerm::from_pairs(VocabularyCategory::IsoTopicCategory, [("Colour", "Blue")])
            .unwrap_err();
        assert!(matches!(err, TermShapeError::UnknownField { .. }));
    }

    #[test]
    fn from_values_checks_arity() {
        let err = VocabularyTerm::from_values(VocabularyCategory::IsoTopicCategory, vec![]).unwrap_err();
        assert_eq!(
            err,
            TermShapeError::WrongArity {
                category: VocabularyCategory::IsoTopicCategory,
                expected: 1,
                actual: 0
            }
        );
    }

    #[test]
    fn serializes_slots_in_layout_order() {
        let term = VocabularyTerm::placeholder(VocabularyCategory::Platform, "TEST", "");
        let json = serde_json::to_string(&term).unwrap();
        assert_eq!(
            json,
            r#"{"category":"platform","fields":{"Category":"Unknown","Series_Entity":"Unknown","Short_Name":"TEST","Long_Name":"TEST"}}"#
        );
        let back: VocabularyTerm = serde_json::from_str(&json).unwrap();
        assert_eq!(back, term);
    }
}
