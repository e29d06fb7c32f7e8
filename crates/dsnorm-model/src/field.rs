//! Canonical output fields of a normalized dataset record.
//!
//! Every provider convention is mapped onto the same fixed set of fields.
//! Exactly one field, [`FieldName::DatasetParameters`], is cumulative: its
//! value is the concatenation of every contributing unit's output. All other
//! fields are scalar and keep the first non-null value produced.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A field of the canonical record.
///
/// The declaration order is the canonical output order; `Ord` follows it so
/// maps keyed by `FieldName` iterate deterministically.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldName {
    /// Stable identifier of the dataset inside the catalog.
    EntryId,
    /// Human-readable title.
    EntryTitle,
    /// Free-text abstract.
    Summary,
    /// Start of the temporal coverage (UTC).
    TimeCoverageStart,
    /// End of the temporal coverage (UTC).
    TimeCoverageEnd,
    /// Acquisition platform (vocabulary term).
    Platform,
    /// Acquisition instrument (vocabulary term).
    Instrument,
    /// Data provider (vocabulary term).
    Provider,
    /// Spatial footprint as a WKT string.
    LocationGeometry,
    /// Geophysical parameters contained in the dataset (cumulative).
    DatasetParameters,
    /// ISO 19115 topic category (vocabulary term).
    IsoTopicCategory,
    /// GCMD location keyword (vocabulary term).
    GcmdLocation,
}

impl FieldName {
    /// All fields in canonical order.
    pub const ALL: [FieldName; 12] = [
        FieldName::EntryId,
        FieldName::EntryTitle,
        FieldName::Summary,
        FieldName::TimeCoverageStart,
        FieldName::TimeCoverageEnd,
        FieldName::Platform,
        FieldName::Instrument,
        FieldName::Provider,
        FieldName::LocationGeometry,
        FieldName::DatasetParameters,
        FieldName::IsoTopicCategory,
        FieldName::GcmdLocation,
    ];

    /// Returns the snake_case name used in raw maps and serialized records.
    pub fn as_str(&self) -> &'static str {
        match self {
            FieldName::EntryId => "entry_id",
            FieldName::EntryTitle => "entry_title",
            FieldName::Summary => "summary",
            FieldName::TimeCoverageStart => "time_coverage_start",
            FieldName::TimeCoverageEnd => "time_coverage_end",
            FieldName::Platform => "platform",
            FieldName::Instrument => "instrument",
            FieldName::Provider => "provider",
            FieldName::LocationGeometry => "location_geometry",
            FieldName::DatasetParameters => "dataset_parameters",
            FieldName::IsoTopicCategory => "iso_topic_category",
            FieldName::GcmdLocation => "gcmd_location",
        }
    }

    /// Returns true for the list-valued field that accumulates across units.
    pub fn is_cumulative(&self) -> bool {
        matches!(self, FieldName::DatasetParameters)
    }

    /// Iterates over the scalar fields in canonical order.
    pub fn scalars() -> impl Iterator<Item = FieldName> {
        Self::ALL.into_iter().filter(|field| !field.is_cumulative())
    }
}

impl fmt::Display for FieldName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FieldName {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase().replace('-', "_");
        FieldName::ALL
            .into_iter()
            .find(|field| field.as_str() == normalized)
            .ok_or_else(|| format!("Unknown field name: {s}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_dataset_parameters_is_cumulative() {
        let cumulative: Vec<_> = FieldName::ALL
            .into_iter()
            .filter(FieldName::is_cumulative)
            .collect();
        assert_eq!(cumulative, vec![FieldName::DatasetParameters]);
        assert_eq!(FieldName::scalars().count(), 11);
    }

    #[test]
    fn parses_names_case_insensitively() {
        assert_eq!("Entry_Id".parse::<FieldName>(), Ok(FieldName::EntryId));
        assert_eq!(
            "time-coverage-start".parse::<FieldName>(),
            Ok(FieldName::TimeCoverageStart)
        );
        assert!("bogus".parse::<FieldName>().is_err());
    }

    #[test]
    fn order_follows_declaration() {
        let mut shuffled = vec![FieldName::GcmdLocation, FieldName::EntryId, FieldName::Platform];
        shuffled.sort();
        assert_eq!(
            shuffled,
            vec![FieldName::EntryId, FieldName::Platform, FieldName::GcmdLocation]
        );
    }
}
