//! Identity for anything harvested with a URL.

use dsnorm_core::{GetterTable, TableUnit};
use dsnorm_model::{FieldName, RawMetadata};

use crate::common::{basename, file_stem, url};

pub const NAME: &str = "url";

/// Unit deriving `entry_id` from the last URL segment.
///
/// Sits late in a chain so convention-specific units win the identifier.
pub fn unit() -> TableUnit {
    let getters = GetterTable::new().with(FieldName::EntryId, |raw: &RawMetadata| {
        Ok(url(raw)
            .map(file_stem)
            .filter(|stem| !stem.is_empty())
            .map(Into::into))
    });
    TableUnit::new(NAME, getters)
        .with_description("Entry id from the dataset URL")
        .with_predicate(|raw: &RawMetadata| url(raw).is_some_and(|url| !basename(url).is_empty()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use dsnorm_core::{NormalizerUnit, extract_field};
    use dsnorm_model::FieldValue;
    use serde_json::json;

    #[test]
    fn entry_id_is_the_file_stem() {
        let raw = RawMetadata::from_value(json!({"url": "https://host/data/sst_20240101.nc"})).unwrap();
        assert!(unit().applies(&raw));
        assert_eq!(
            extract_field(&unit(), FieldName::EntryId, &raw),
            Ok(Some(FieldValue::text("sst_20240101")))
        );
    }

    #[test]
    fn needs_a_url() {
        let raw = RawMetadata::from_value(json!({"path": "/tmp/x.nc"})).unwrap();
        assert!(!unit().applies(&raw));
        assert_eq!(extract_field(&unit(), FieldName::EntryId, &raw), Ok(None));
    }
}
