//! Helpers shared by the provider units.

use dsnorm_model::{ExtractError, FieldValue, RawMetadata};
use dsnorm_time::{TimeError, TimeRule, find_time_coverage};
use serde_json::Value;

/// Key under which harvesters store the dataset location.
pub const URL_KEY: &str = "url";

/// Dataset URL, when present and a string.
pub fn url(raw: &RawMetadata) -> Option<&str> {
    raw.lookup_str(&[URL_KEY])
}

/// Dataset URL, required.
pub fn require_url(raw: &RawMetadata) -> Result<&str, ExtractError> {
    raw.require_str(&[URL_KEY])
}

/// Last path segment of a URL or path, ignoring a trailing slash.
pub fn basename(url: &str) -> &str {
    let trimmed = url.trim_end_matches('/');
    trimmed.rsplit('/').next().unwrap_or(trimmed)
}

/// File name without its last extension.
pub fn file_stem(url: &str) -> &str {
    let name = basename(url);
    name.rsplit_once('.').map_or(name, |(stem, _)| stem)
}

pub fn time_error(error: TimeError) -> ExtractError {
    ExtractError::invalid(error.to_string())
}

/// Start and end of coverage derived from the URL through `rules`.
pub fn coverage_from_url(
    raw: &RawMetadata,
    rules: &[TimeRule],
) -> Result<(Option<FieldValue>, Option<FieldValue>), ExtractError> {
    let coverage = find_time_coverage(rules, require_url(raw)?).map_err(time_error)?;
    Ok((
        coverage.start.map(FieldValue::Timestamp),
        coverage.end.map(FieldValue::Timestamp),
    ))
}

/// Numeric attribute that may be stored as a JSON number or a string.
pub fn number_at(raw: &RawMetadata, path: &[&str]) -> Result<Option<f64>, ExtractError> {
    match raw.lookup(path) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Number(number)) => Ok(number.as_f64()),
        Some(Value::String(text)) => text
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| ExtractError::unexpected(path, "a number")),
        Some(_) => Err(ExtractError::unexpected(path, "a number")),
    }
}

/// String attribute; absent or null is `None`, other shapes are an error.
pub fn text_at<'a>(raw: &'a RawMetadata, path: &[&str]) -> Result<Option<&'a str>, ExtractError> {
    match raw.lookup(path) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(text)) => Ok(Some(text.as_str())),
        Some(_) => Err(ExtractError::unexpected(path, "a string")),
    }
}

/// WKT polygon of a latitude/longitude bounding box, counter-clockwise from
/// the south-west corner.
pub fn bounding_box_wkt(west: f64, south: f64, east: f64, north: f64) -> String {
    format!(
        "POLYGON(({west} {south},{east} {south},{east} {north},{west} {north},{west} {south}))"
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn url_parts() {
        let url = "ftp://host/dir/asi-AMSR2-n6250-20240101-v5.4.nc";
        assert_eq!(basename(url), "asi-AMSR2-n6250-20240101-v5.4.nc");
        assert_eq!(file_stem(url), "asi-AMSR2-n6250-20240101-v5.4");
        assert_eq!(basename("https://host/S1A_X.SAFE/"), "S1A_X.SAFE");
        assert_eq!(file_stem("plain"), "plain");
    }

    #[test]
    fn numbers_from_numbers_or_strings() {
        let raw = RawMetadata::from_value(json!({"a": {"n": 1.5, "s": " -2 ", "b": true}})).unwrap();
        assert_eq!(number_at(&raw, &["a", "n"]), Ok(Some(1.5)));
        assert_eq!(number_at(&raw, &["a", "s"]), Ok(Some(-2.0)));
        assert_eq!(number_at(&raw, &["a", "missing"]), Ok(None));
        assert!(number_at(&raw, &["a", "b"]).is_err());
    }

    #[test]
    fn wkt_box() {
        assert_eq!(
            bounding_box_wkt(-180.0, 30.0, 180.0, 90.0),
            "POLYGON((-180 30,180 30,180 90,-180 90,-180 30))"
        );
    }
}
