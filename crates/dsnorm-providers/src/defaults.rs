//! Fallback values used when no provider unit resolved a field.

use std::sync::Arc;

use dsnorm_core::DefaultUnit;
use dsnorm_model::{FieldName, RawMetadata};
use dsnorm_vocab::VocabularyResolver;

/// ISO topic category assumed for datasets that do not declare one.
pub const DEFAULT_ISO_TOPIC_CATEGORY: &str = "Oceans";

/// GCMD location assumed for datasets that do not declare one.
pub const DEFAULT_LOCATION: &str = "SEA SURFACE";

/// Default unit closing the builtin chain.
///
/// Free-text fields and the geometry resolve to null. The ISO topic category
/// and the GCMD location get vocabulary terms, resolved per record so a
/// vocabulary outage fails the record instead of engine construction.
/// Identifier, time coverage and the instrument context stay without a
/// fallback and fail the record when mandatory.
pub fn unit(resolver: Arc<VocabularyResolver>) -> DefaultUnit {
    let topics = resolver.clone();
    let locations = resolver;
    DefaultUnit::new()
        .with_fallback(FieldName::EntryTitle, None)
        .with_fallback(FieldName::Summary, None)
        .with_fallback(FieldName::LocationGeometry, None)
        .with_getter(FieldName::IsoTopicCategory, move |_: &RawMetadata| {
            Ok(Some(topics.resolve_iso_topic_category(DEFAULT_ISO_TOPIC_CATEGORY)?.into()))
        })
        .with_getter(FieldName::GcmdLocation, move |_: &RawMetadata| {
            Ok(Some(locations.resolve_location(DEFAULT_LOCATION)?.into()))
        })
}
