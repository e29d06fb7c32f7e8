//! Datasets described by ACDD/CF global attributes.
//!
//! Harvesters of NetCDF files and OPeNDAP endpoints store the file's global
//! attributes under `global_attributes` and its variables under `variables`.

use std::sync::Arc;

use dsnorm_core::{GetterTable, TableUnit};
use dsnorm_model::{ExtractError, FieldName, FieldValue, RawMetadata};
use dsnorm_time::parse_timestamp;
use dsnorm_vocab::VocabularyResolver;
use serde_json::Value;

use crate::common::{bounding_box_wkt, number_at, text_at, time_error};

pub const NAME: &str = "acdd";

const ATTRIBUTES: &str = "global_attributes";

fn attribute<'a>(raw: &'a RawMetadata, name: &str) -> Result<Option<&'a str>, ExtractError> {
    Ok(text_at(raw, &[ATTRIBUTES, name])?
        .map(str::trim)
        .filter(|value| !value.is_empty()))
}

fn text(raw: &RawMetadata, name: &str) -> Result<Option<FieldValue>, ExtractError> {
    Ok(attribute(raw, name)?.map(FieldValue::from))
}

fn timestamp(raw: &RawMetadata, name: &str) -> Result<Option<FieldValue>, ExtractError> {
    attribute(raw, name)?
        .map(|value| parse_timestamp(value).map(FieldValue::Timestamp).map_err(time_error))
        .transpose()
}

fn geometry(raw: &RawMetadata) -> Result<Option<FieldValue>, ExtractError> {
    let bound = |name: &str| number_at(raw, &[ATTRIBUTES, name]);
    let (Some(west), Some(south), Some(east), Some(north)) = (
        bound("geospatial_lon_min")?,
        bound("geospatial_lat_min")?,
        bound("geospatial_lon_max")?,
        bound("geospatial_lat_max")?,
    ) else {
        return Ok(None);
    };
    if south > north {
        return Err(ExtractError::invalid(format!(
            "geospatial_lat_min {south} is north of geospatial_lat_max {north}"
        )));
    }
    Ok(Some(bounding_box_wkt(west, south, east, north).into()))
}

/// CF standard names of the data variables.
fn standard_names(raw: &RawMetadata) -> Result<Vec<&str>, ExtractError> {
    let variables = match raw.lookup(&["variables"]) {
        None | Some(Value::Null) => return Ok(Vec::new()),
        Some(Value::Array(variables)) => variables,
        Some(_) => return Err(ExtractError::unexpected(&["variables"], "a list")),
    };
    Ok(variables
        .iter()
        .filter_map(|variable| variable.get("standard_name").and_then(Value::as_str))
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .collect())
}

/// Unit reading ACDD/CF global attributes.
pub fn unit(resolver: Arc<VocabularyResolver>) -> TableUnit {
    let platforms = resolver.clone();
    let instruments = resolver.clone();
    let providers = resolver.clone();
    let parameters = resolver.clone();
    let topics = resolver;

    let getters = GetterTable::new()
        .with(FieldName::EntryId, |raw: &RawMetadata| text(raw, "id"))
        .with(FieldName::EntryTitle, |raw: &RawMetadata| text(raw, "title"))
        .with(FieldName::Summary, |raw: &RawMetadata| text(raw, "summary"))
        .with(FieldName::TimeCoverageStart, |raw: &RawMetadata| {
            timestamp(raw, "time_coverage_start")
        })
        .with(FieldName::TimeCoverageEnd, |raw: &RawMetadata| {
            timestamp(raw, "time_coverage_end")
        })
        .with(FieldName::Platform, move |raw: &RawMetadata| {
            let Some(keyword) = attribute(raw, "platform")? else {
                return Ok(None);
            };
            Ok(Some(platforms.resolve_platform(keyword, &[])?.into()))
        })
        .with(FieldName::Instrument, move |raw: &RawMetadata| {
            let Some(keyword) = attribute(raw, "instrument")? else {
                return Ok(None);
            };
            let platform = attribute(raw, "platform")?;
            let disambiguators: Vec<&str> = platform.into_iter().collect();
            Ok(Some(instruments.resolve_instrument(keyword, &disambiguators)?.into()))
        })
        .with(FieldName::Provider, move |raw: &RawMetadata| {
            let mut candidates = Vec::new();
            for name in [
                "institution",
                "creator_institution",
                "publisher_name",
                "creator_url",
                "publisher_url",
            ] {
                if let Some(value) = attribute(raw, name)? {
                    candidates.push(value);
                }
            }
            if candidates.is_empty() {
                return Ok(None);
            }
            Ok(Some(providers.resolve_provider(&candidates)?.into()))
        })
        .with(FieldName::LocationGeometry, geometry)
        .with(FieldName::DatasetParameters, move |raw: &RawMetadata| {
            let names = standard_names(raw)?;
            if names.is_empty() {
                return Ok(None);
            }
            let terms = names
                .into_iter()
                .map(|name| parameters.resolve_parameter(name).map(FieldValue::Term))
                .collect::<Result<Vec<_>, _>>()?;
            Ok(Some(FieldValue::List(terms)))
        })
        .with(FieldName::IsoTopicCategory, move |raw: &RawMetadata| {
            let Some(keyword) = attribute(raw, "iso_topic_category")? else {
                return Ok(None);
            };
            Ok(Some(topics.resolve_iso_topic_category(keyword)?.into()))
        });

    TableUnit::new(NAME, getters)
        .with_description("ACDD/CF global attributes")
        .with_predicate(|raw: &RawMetadata| matches!(raw.get(ATTRIBUTES), Some(Value::Object(_))))
}

#[cfg(test)]
mod tests {
    use super::*;
    use dsnorm_core::{NormalizerUnit, extract_field};
    use dsnorm_model::NormalizationError;
    use dsnorm_vocab::VocabularyCatalog;
    use serde_json::json;

    fn acdd() -> TableUnit {
        let catalog = VocabularyCatalog::builtin().unwrap();
        unit(Arc::new(VocabularyResolver::new(Arc::new(catalog))))
    }

    fn raw(value: serde_json::Value) -> RawMetadata {
        RawMetadata::from_value(value).unwrap()
    }

    #[test]
    fn applies_to_attribute_maps_only() {
        let unit = acdd();
        assert!(unit.applies(&raw(json!({"global_attributes": {}}))));
        assert!(!unit.applies(&raw(json!({"global_attributes": "x"}))));
        assert!(!unit.applies(&raw(json!({"url": "x"}))));
    }

    #[test]
    fn absent_attributes_contribute_nothing() {
        let unit = acdd();
        let input = raw(json!({"global_attributes": {"title": "  "}}));
        for field in FieldName::ALL {
            match extract_field(&unit, field, &input) {
                Ok(value) => assert_eq!(value, None, "{field}"),
                Err(NormalizationError::FieldUnsupported { .. }) => {
                    assert_eq!(field, FieldName::GcmdLocation);
                }
                Err(other) => panic!("{field}: {other}"),
            }
        }
    }

    #[test]
    fn bad_timestamps_are_malformed() {
        let input = raw(json!({"global_attributes": {"time_coverage_start": "soon"}}));
        assert!(matches!(
            extract_field(&acdd(), FieldName::TimeCoverageStart, &input),
            Err(NormalizationError::MalformedInput { .. })
        ));
    }

    #[test]
    fn geometry_from_bounds() {
        let input = raw(json!({"global_attributes": {
            "geospatial_lon_min": -20, "geospatial_lon_max": 40,
            "geospatial_lat_min": "60", "geospatial_lat_max": 85.5
        }}));
        assert_eq!(
            extract_field(&acdd(), FieldName::LocationGeometry, &input),
            Ok(Some(FieldValue::text("POLYGON((-20 60,40 60,40 85.5,-20 85.5,-20 60))")))
        );
    }
}
