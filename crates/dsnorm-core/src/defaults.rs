//! Terminal units: the configurable fallback unit and the passthrough unit.

use dsnorm_model::{ExtractError, FieldName, FieldValue, NormalizedRecord, RawMetadata};
use serde_json::Value;

use crate::unit::{GetterTable, NormalizerUnit, extract_field};

/// Last resort for fields no other unit resolved.
///
/// Only fields with a configured fallback resolve; the chain reports the
/// others as normalization failures. Accepts every input, so it can also
/// close a classification list.
#[derive(Debug, Clone)]
pub struct DefaultUnit {
    name: String,
    getters: GetterTable,
}

impl Default for DefaultUnit {
    fn default() -> Self {
        Self::new()
    }
}

impl DefaultUnit {
    pub const NAME: &'static str = "default";

    pub fn new() -> Self {
        Self::named(Self::NAME)
    }

    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            getters: GetterTable::new(),
        }
    }

    /// Fixed fallback; `None` resolves the field to an explicit null.
    pub fn with_fallback(mut self, field: FieldName, value: Option<FieldValue>) -> Self {
        self.getters.insert(field, move |_: &RawMetadata| Ok(value.clone()));
        self
    }

    /// Fallback computed from the raw metadata.
    pub fn with_getter<F>(mut self, field: FieldName, getter: F) -> Self
    where
        F: Fn(&RawMetadata) -> Result<Option<FieldValue>, ExtractError> + Send + Sync + 'static,
    {
        self.getters.insert(field, getter);
        self
    }
}

impl NormalizerUnit for DefaultUnit {
    fn name(&self) -> &str {
        &self.name
    }

    fn description(&self) -> &str {
        "Fallback values for unresolved fields"
    }

    fn applies(&self, _raw: &RawMetadata) -> bool {
        true
    }

    fn is_catch_all(&self) -> bool {
        true
    }

    fn getters(&self) -> &GetterTable {
        &self.getters
    }
}

/// Reads back records rendered by [`dsnorm_model::NormalizedRecord::to_raw`].
///
/// Keys are field names and values serialized [`FieldValue`]s. A key that is
/// present with `null` resolves to null; an absent key is a failure.
/// `dataset_parameters` holds one serialized value per original
/// contribution; the getter returns them as one list, and a whole-record
/// [`normalize`](NormalizerUnit::normalize) replays them one by one.
#[derive(Debug, Clone)]
pub struct PassthroughUnit {
    getters: GetterTable,
}

impl Default for PassthroughUnit {
    fn default() -> Self {
        Self::new()
    }
}

impl PassthroughUnit {
    pub const NAME: &'static str = "passthrough";

    pub fn new() -> Self {
        let mut getters = GetterTable::new();
        for field in FieldName::ALL {
            getters.insert(field, move |raw: &RawMetadata| read_back(raw, field));
        }
        Self { getters }
    }
}

fn read_back(raw: &RawMetadata, field: FieldName) -> Result<Option<FieldValue>, ExtractError> {
    let key = field.as_str();
    match raw.require(&[key])? {
        Value::Null => Ok(None),
        Value::Array(items) if field.is_cumulative() => items
            .iter()
            .map(|item| decode(item, key))
            .collect::<Result<Vec<_>, _>>()
            .map(|items| Some(FieldValue::List(items))),
        other => decode(other, key).map(Some),
    }
}

fn decode(value: &Value, key: &str) -> Result<FieldValue, ExtractError> {
    serde_json::from_value(value.clone())
        .map_err(|error| ExtractError::invalid(format!("'{key}' is not a field value: {error}")))
}

impl NormalizerUnit for PassthroughUnit {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn description(&self) -> &str {
        "Reads back previously normalized records"
    }

    fn applies(&self, _raw: &RawMetadata) -> bool {
        true
    }

    fn is_catch_all(&self) -> bool {
        true
    }

    fn getters(&self) -> &GetterTable {
        &self.getters
    }

    fn normalize(
        &self,
        raw: &RawMetadata,
        fields: &[FieldName],
    ) -> dsnorm_model::Result<NormalizedRecord> {
        let mut record = NormalizedRecord::with_fields(fields.iter().copied());
        for &field in fields {
            match extract_field(self, field, raw)? {
                Some(FieldValue::List(contributions)) if field.is_cumulative() => {
                    for contribution in contributions {
                        record.push_parameter(contribution);
                    }
                }
                Some(value) if field.is_cumulative() => record.push_parameter(value),
                Some(value) => {
                    record.try_set(field, value);
                }
                None => {}
            }
        }
        Ok(record)
    }
}
