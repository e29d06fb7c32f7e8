//! The canonical record produced by normalization.

use std::collections::BTreeMap;

use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};
use serde_json::{Map, Value};

use crate::field::FieldName;
use crate::raw::RawMetadata;
use crate::value::FieldValue;

/// Canonical record: every requested scalar field (possibly null) plus the
/// cumulative `dataset_parameters` list (possibly empty).
///
/// A scalar field is set at most once. [`NormalizedRecord::try_set`] refuses
/// to overwrite a value that is already present.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NormalizedRecord {
    scalars: BTreeMap<FieldName, Option<FieldValue>>,
    parameters: Vec<FieldValue>,
}

impl NormalizedRecord {
    /// Creates an empty record carrying a null slot for every requested scalar.
    pub fn with_fields<I>(fields: I) -> Self
    where
        I: IntoIterator<Item = FieldName>,
    {
        let scalars = fields
            .into_iter()
            .filter(|field| !field.is_cumulative())
            .map(|field| (field, None))
            .collect();
        Self {
            scalars,
            parameters: Vec::new(),
        }
    }

    /// Record with a slot for every canonical field.
    pub fn all_fields() -> Self {
        Self::with_fields(FieldName::ALL)
    }

    pub fn is_requested(&self, field: FieldName) -> bool {
        field.is_cumulative() || self.scalars.contains_key(&field)
    }

    /// Value of a scalar field, `None` when unset or not requested.
    pub fn get(&self, field: FieldName) -> Option<&FieldValue> {
        self.scalars.get(&field).and_then(Option::as_ref)
    }

    /// Sets a scalar field unless it already holds a value.
    ///
    /// Returns true when the value was stored.
    pub fn try_set(&mut self, field: FieldName, value: FieldValue) -> bool {
        match self.scalars.get_mut(&field) {
            Some(slot @ None) => {
                *slot = Some(value);
                true
            }
            _ => false,
        }
    }

    /// Appends one unit's contribution to `dataset_parameters`.
    ///
    /// A contribution is kept whole: a [`FieldValue::List`] stays a single
    /// element, so the list length equals the number of contributors.
    pub fn push_parameter(&mut self, value: FieldValue) {
        self.parameters.push(value);
    }

    /// Contributions to `dataset_parameters`, one per contributing unit.
    pub fn parameters(&self) -> &[FieldValue] {
        &self.parameters
    }

    /// Requested scalar fields that are still null, in canonical order.
    pub fn unresolved(&self) -> Vec<FieldName> {
        self.scalars
            .iter()
            .filter(|(_, value)| value.is_none())
            .map(|(field, _)| *field)
            .collect()
    }

    /// Requested scalar fields, in canonical order.
    pub fn scalar_fields(&self) -> impl Iterator<Item = FieldName> + '_ {
        self.scalars.keys().copied()
    }

    /// Iterates over scalar fields and their values in canonical order.
    pub fn scalars(&self) -> impl Iterator<Item = (FieldName, Option<&FieldValue>)> {
        self.scalars
            .iter()
            .map(|(field, value)| (*field, value.as_ref()))
    }

    /// Converts the record back into raw metadata keyed by field name.
    ///
    /// Values are the serialized [`FieldValue`]s, so the map can be read back
    /// by a passthrough normalizer. `dataset_parameters` becomes an array
    /// holding one serialized value per contribution.
    pub fn to_raw(&self) -> RawMetadata {
        let mut map = Map::new();
        for (field, value) in &self.scalars {
            let rendered = value
                .as_ref()
                .and_then(|value| serde_json::to_value(value).ok())
                .unwrap_or(Value::Null);
            map.insert(field.as_str().to_string(), rendered);
        }
        let parameters = self
            .parameters
            .iter()
            .filter_map(|value| serde_json::to_value(value).ok())
            .collect();
        map.insert(
            FieldName::DatasetParameters.as_str().to_string(),
            Value::Array(parameters),
        );
        RawMetadata::new(map)
    }
}

impl Serialize for NormalizedRecord {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.scalars.len() + 1))?;
        let mut parameters_written = false;
        for (field, value) in &self.scalars {
            if !parameters_written && *field > FieldName::DatasetParameters {
                map.serialize_entry(FieldName::DatasetParameters.as_str(), &self.parameters)?;
                parameters_written = true;
            }
            map.serialize_entry(field.as_str(), value)?;
        }
        if !parameters_written {
            map.serialize_entry(FieldName::DatasetParameters.as_str(), &self.parameters)?;
        }
        map.end()
    }
}
