//! Provider-defined raw metadata.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::ExtractError;

/// Maximum number of characters of raw input quoted in error messages.
pub const RAW_EXCERPT_LIMIT: usize = 200;

/// Immutable, schema-less attribute map supplied by a harvester.
///
/// Keys are iterated in sorted order, so every rendering of the same map is
/// identical.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RawMetadata(Map<String, Value>);

impl RawMetadata {
    pub fn new(map: Map<String, Value>) -> Self {
        Self(map)
    }

    /// Wraps a JSON value, which must be an object.
    pub fn from_value(value: Value) -> Result<Self, ExtractError> {
        match value {
            Value::Object(map) => Ok(Self(map)),
            _ => Err(ExtractError::unexpected(&[], "a JSON object")),
        }
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Follows a key path through nested objects.
    ///
    /// Numeric segments index into arrays, so `["files", "0", "name"]`
    /// reaches the name of the first file.
    pub fn lookup(&self, path: &[&str]) -> Option<&Value> {
        let (first, rest) = path.split_first()?;
        let mut current = self.0.get(*first)?;
        for segment in rest {
            current = match current {
                Value::Object(map) => map.get(*segment)?,
                Value::Array(items) => items.get(segment.parse::<usize>().ok()?)?,
                _ => return None,
            };
        }
        Some(current)
    }

    /// String value at `path`, if present and a string.
    pub fn lookup_str(&self, path: &[&str]) -> Option<&str> {
        self.lookup(path).and_then(Value::as_str)
    }

    /// Value at `path`, or a `Missing` error naming the path.
    pub fn require(&self, path: &[&str]) -> Result<&Value, ExtractError> {
        self.lookup(path).ok_or_else(|| ExtractError::missing(path))
    }

    /// String value at `path`; fails when absent or not a string.
    pub fn require_str(&self, path: &[&str]) -> Result<&str, ExtractError> {
        self.require(path)?
            .as_str()
            .ok_or_else(|| ExtractError::unexpected(path, "a string"))
    }

    /// Bounded JSON rendering used in error messages.
    pub fn excerpt(&self) -> String {
        let rendered = serde_json::to_string(&self.0).unwrap_or_default();
        if rendered.chars().count() <= RAW_EXCERPT_LIMIT {
            return rendered;
        }
        let mut truncated: String = rendered.chars().take(RAW_EXCERPT_LIMIT).collect();
        truncated.push_str("...");
        truncated
    }
}

impl From<Map<String, Value>> for RawMetadata {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample() -> RawMetadata {
        RawMetadata::from_value(json!({
            "url": "ftp://example.org/data/file.nc",
            "global_attributes": {
                "title": "Sea ice concentration",
                "variables": [{"standard_name": "sea_ice_area_fraction"}]
            },
            "count": 3
        }))
        .unwrap()
    }

    #[test]
    fn lookup_walks_objects_and_arrays() {
        let raw = sample();
        assert_eq!(
            raw.lookup_str(&["global_attributes", "title"]),
            Some("Sea ice concentration")
        );
        assert_eq!(
            raw.lookup_str(&["global_attributes", "variables", "0", "standard_name"]),
            Some("sea_ice_area_fraction")
        );
        assert!(raw.lookup(&["global_attributes", "variables", "7"]).is_none());
        assert!(raw.lookup(&[]).is_none());
    }

    #[test]
    fn require_reports_path() {
        let raw = sample();
        let err = raw.require_str(&["global_attributes", "summary"]).unwrap_err();
        assert_eq!(err.to_string(), "missing key path 'global_attributes.summary'");

        let err = raw.require_str(&["count"]).unwrap_err();
        assert_eq!(err.to_string(), "unexpected value at 'count': expected a string");
    }

    #[test]
    fn rejects_non_objects() {
        assert!(RawMetadata::from_value(json!(["a"])).is_err());
    }

    #[test]
    fn excerpt_is_bounded() {
        let long = "x".repeat(1000);
        let raw = RawMetadata::from_value(json!({ "blob": long })).unwrap();
        let excerpt = raw.excerpt();
        assert_eq!(excerpt.chars().count(), RAW_EXCERPT_LIMIT + 3);
        assert!(excerpt.ends_with("..."));
        assert_eq!(sample().excerpt(), sample().excerpt());
    }
}
